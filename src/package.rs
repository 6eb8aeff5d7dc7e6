//! ZIP package abstraction for OOXML documents.

use crate::error::{Error, Result};
use std::cell::RefCell;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;
use zip::result::ZipError;

/// Name of the part holding the visible document text.
pub const BODY_PART: &str = "word/document.xml";

/// An OOXML package held in memory.
///
/// Entries are read-only; rewriting produces a new package through
/// [`crate::rewrite_package`].
pub struct Package {
    archive: RefCell<zip::ZipArchive<Cursor<Vec<u8>>>>,
}

impl Package {
    /// Open a package from a file path.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use docfill::Package;
    ///
    /// let package = Package::open("template.docx")?;
    /// println!("{} entries", package.entry_names().len());
    /// # Ok::<(), docfill::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let mut reader = BufReader::new(file);
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Create a package from a byte vector.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let archive = zip::ZipArchive::new(Cursor::new(data))?;
        Ok(Self {
            archive: RefCell::new(archive),
        })
    }

    /// Create a package from a reader.
    pub fn from_reader<R: Read + Seek>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Entry names in archive order.
    pub fn entry_names(&self) -> Vec<String> {
        let archive = self.archive.borrow();
        (0..archive.len())
            .filter_map(|i| archive.name_for_index(i).map(String::from))
            .collect()
    }

    /// Check if an entry exists.
    pub fn exists(&self, name: &str) -> bool {
        let archive = self.archive.borrow();
        archive.index_for_name(name).is_some()
    }

    /// Read the full content of an entry.
    pub fn read_entry(&self, name: &str) -> Result<Vec<u8>> {
        let mut archive = self.archive.borrow_mut();
        let mut file = archive.by_name(name).map_err(|e| match e {
            ZipError::FileNotFound => Error::MissingComponent(name.to_string()),
            other => other.into(),
        })?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Ok(data)
    }

    /// Read the document body part.
    pub fn body(&self) -> Result<Vec<u8>> {
        self.read_entry(BODY_PART)
    }

    /// Run `f` against the underlying archive.
    pub(crate) fn with_archive<T>(
        &self,
        f: impl FnOnce(&mut zip::ZipArchive<Cursor<Vec<u8>>>) -> Result<T>,
    ) -> Result<T> {
        let mut archive = self.archive.borrow_mut();
        f(&mut archive)
    }
}

impl std::fmt::Debug for Package {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Package")
            .field("entries", &self.archive.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn build(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for (name, data) in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(data).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_entry_names_in_order() {
        let data = build(&[
            ("[Content_Types].xml", b"<Types/>".as_slice()),
            ("word/document.xml", b"<w:document/>".as_slice()),
            ("docProps/app.xml", b"<Properties/>".as_slice()),
        ]);
        let package = Package::from_bytes(data).unwrap();
        assert_eq!(
            package.entry_names(),
            vec!["[Content_Types].xml", "word/document.xml", "docProps/app.xml"]
        );
        assert!(package.exists(BODY_PART));
        assert!(!package.exists("word/styles.xml"));
    }

    #[test]
    fn test_read_body() {
        let data = build(&[("word/document.xml", b"<w:t>{{Title}}</w:t>".as_slice())]);
        let package = Package::from_reader(Cursor::new(data)).unwrap();
        assert_eq!(package.body().unwrap(), b"<w:t>{{Title}}</w:t>");
    }

    #[test]
    fn test_missing_entry() {
        let data = build(&[("word/styles.xml", b"<w:styles/>".as_slice())]);
        let package = Package::from_bytes(data).unwrap();
        assert!(matches!(package.body(), Err(Error::MissingComponent(_))));
    }

    #[test]
    fn test_not_a_zip() {
        let result = Package::from_bytes(b"plain text, not a package".to_vec());
        assert!(matches!(result, Err(Error::ZipArchive(_))));
    }

    #[test]
    fn test_unreadable_entry_is_not_missing() {
        let mut data = build(&[("[Content_Types].xml", b"<Types/>".as_slice())]);
        // Compression method 77 is not defined by the ZIP format.
        let local = data.windows(4).position(|w| w == b"PK\x03\x04").unwrap();
        data[local + 8..local + 10].copy_from_slice(&77u16.to_le_bytes());
        let central = data.windows(4).position(|w| w == b"PK\x01\x02").unwrap();
        data[central + 10..central + 12].copy_from_slice(&77u16.to_le_bytes());

        let package = Package::from_bytes(data).unwrap();
        assert!(package.exists("[Content_Types].xml"));
        assert!(!matches!(
            package.read_entry("[Content_Types].xml"),
            Err(Error::MissingComponent(_))
        ));
        assert!(!matches!(
            crate::detect::is_word_document(&package),
            Ok(false)
        ));
    }
}
