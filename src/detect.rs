//! Package sniffing for Word templates.

use crate::error::{Error, Result};
use crate::package::Package;
use quick_xml::events::Event;

/// ZIP file magic bytes: PK\x03\x04
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Content type for the DOCX main document part.
pub const DOCX_MAIN_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";

/// Content type for macro-enabled and template main document parts.
const DOCX_VARIANT_CONTENT_TYPES: [&str; 3] = [
    "application/vnd.ms-word.document.macroEnabled.main+xml",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.template.main+xml",
    "application/vnd.ms-word.template.macroEnabledTemplate.main+xml",
];

/// Check the ZIP local-header magic.
pub fn looks_like_package(data: &[u8]) -> bool {
    data.len() >= 4 && data[..4] == ZIP_MAGIC
}

/// Open `data` as a package, rejecting anything without the ZIP magic.
pub fn open_package(data: Vec<u8>) -> Result<Package> {
    if !looks_like_package(&data) {
        return Err(Error::NotAPackage);
    }
    Package::from_bytes(data)
}

/// Whether `[Content_Types].xml` declares a Word main document part.
///
/// A package without `[Content_Types].xml` is not a Word document.
pub fn is_word_document(package: &Package) -> Result<bool> {
    let content_types = match package.read_entry("[Content_Types].xml") {
        Ok(bytes) => bytes,
        Err(Error::MissingComponent(_)) => return Ok(false),
        Err(e) => return Err(e),
    };

    let mut reader = quick_xml::Reader::from_reader(content_types.as_slice());
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Empty(e) | Event::Start(e) if e.local_name().as_ref() == b"Override" => {
                for attr in e.attributes().flatten() {
                    if attr.key.local_name().as_ref() == b"ContentType" {
                        let value = String::from_utf8_lossy(&attr.value);
                        if value == DOCX_MAIN_CONTENT_TYPE
                            || DOCX_VARIANT_CONTENT_TYPES.contains(&value.as_ref())
                        {
                            return Ok(true);
                        }
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(false)
}
