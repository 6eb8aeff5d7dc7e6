//! Package rewriting.
//!
//! Every entry of the input archive is written to a fresh archive in input
//! order. Only [`BODY_PART`] passes through the substitution engine; all
//! other entries are copied byte-for-byte. Any read or write failure aborts
//! the whole rewrite.

use crate::error::Result;
use crate::options::RewriteOptions;
use crate::package::{Package, BODY_PART};
use crate::template::{substitute_with_report, ReplacementMap};
use serde::Serialize;
use std::fs;
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Upper bound on the buffer reserved from an entry's declared size.
const MAX_PREALLOC: u64 = 1 << 20;

/// Summary of a completed rewrite.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RewriteReport {
    /// Entries written to the output archive
    pub entries: usize,
    /// Whether the body part was present
    pub body_found: bool,
    /// Tokens replaced with a mapped value
    pub resolved: usize,
    /// Identifiers without a mapping, in order of occurrence
    pub unresolved: Vec<String>,
}

/// Rewrite `archive` into `sink`.
///
/// The sink is finished before returning; on error its contents must be
/// discarded.
pub fn rewrite<R, W>(
    archive: &mut ZipArchive<R>,
    sink: W,
    replacements: &ReplacementMap,
    options: &RewriteOptions,
) -> Result<(W, RewriteReport)>
where
    R: Read + Seek,
    W: Write + Seek,
{
    let mut writer = ZipWriter::new(sink);
    let mut report = RewriteReport::default();

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let name = entry.name().to_string();
        let file_options = entry_options(entry.compression(), options);

        if entry.is_dir() {
            writer.add_directory(name.as_str(), file_options)?;
            report.entries += 1;
            continue;
        }

        // Header sizes are untrusted; cap the pre-allocation.
        let hint = entry.size().min(MAX_PREALLOC) as usize;
        let mut content = Vec::with_capacity(hint);
        entry.read_to_end(&mut content)?;

        if name == BODY_PART {
            let substitution = substitute_with_report(&content, replacements);
            tracing::debug!(
                entry = %name,
                resolved = substitution.resolved,
                unresolved = substitution.unresolved.len(),
                "substituted body part"
            );
            if options.log_unresolved && !substitution.unresolved.is_empty() {
                tracing::debug!(identifiers = ?substitution.unresolved, "unresolved placeholders");
            }
            content = substitution.content;
            report.body_found = true;
            report.resolved += substitution.resolved;
            report.unresolved.extend(substitution.unresolved);
        } else {
            tracing::debug!(entry = %name, bytes = content.len(), "copied entry");
        }

        writer.start_file(name.as_str(), file_options)?;
        writer.write_all(&content)?;
        report.entries += 1;
    }

    if !report.body_found {
        tracing::warn!("package has no {} part; copied unchanged", BODY_PART);
    }

    let sink = writer.finish()?;
    Ok((sink, report))
}

fn entry_options(method: CompressionMethod, options: &RewriteOptions) -> SimpleFileOptions {
    match method {
        CompressionMethod::Stored => {
            SimpleFileOptions::default().compression_method(CompressionMethod::Stored)
        }
        _ => SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(options.compression_level),
    }
}

/// Rewrite a package held in memory, returning the new package bytes.
///
/// # Example
///
/// ```no_run
/// use docfill::{rewrite_bytes, ReplacementMap, RewriteOptions};
///
/// let template = std::fs::read("template.docx")?;
/// let mut replacements = ReplacementMap::new();
/// replacements.insert("Title".to_string(), "Quarterly report".to_string());
///
/// let (output, report) = rewrite_bytes(&template, &replacements, &RewriteOptions::default())?;
/// println!("{} unresolved", report.unresolved.len());
/// std::fs::write("output.docx", output)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn rewrite_bytes(
    input: &[u8],
    replacements: &ReplacementMap,
    options: &RewriteOptions,
) -> Result<(Vec<u8>, RewriteReport)> {
    let mut archive = ZipArchive::new(Cursor::new(input))?;
    let (sink, report) = rewrite(&mut archive, Cursor::new(Vec::new()), replacements, options)?;
    Ok((sink.into_inner(), report))
}

/// Rewrite an opened [`Package`], returning the new package bytes.
pub fn rewrite_package(
    package: &Package,
    replacements: &ReplacementMap,
    options: &RewriteOptions,
) -> Result<(Vec<u8>, RewriteReport)> {
    package.with_archive(|archive| {
        let (sink, report) = rewrite(archive, Cursor::new(Vec::new()), replacements, options)?;
        Ok((sink.into_inner(), report))
    })
}

/// Rewrite the package at `input` and write the result to `output`.
///
/// The output is built in memory and persisted through a temporary file in
/// the destination directory, so a failed rewrite leaves no file behind.
pub fn rewrite_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    replacements: &ReplacementMap,
    options: &RewriteOptions,
) -> Result<RewriteReport> {
    let package = Package::open(input)?;
    let (bytes, report) = rewrite_package(&package, replacements, options)?;

    let output = output.as_ref();
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(&bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(output).map_err(|e| e.error)?;

    Ok(report)
}
