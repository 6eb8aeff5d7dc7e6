//! # docfill
//!
//! Placeholder substitution for Microsoft Word (DOCX) templates.
//!
//! A template is an ordinary `.docx` package whose body text contains
//! `{{identifier}}` tokens. Rewriting copies every package entry unchanged
//! except `word/document.xml`, where each token is replaced by its mapped
//! value, or by `INVALID [{{identifier}}]` when no value is mapped.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docfill::{fill_file, ReplacementMap};
//!
//! let mut replacements = ReplacementMap::new();
//! replacements.insert("Title".to_string(), "Quarterly report".to_string());
//!
//! let report = fill_file("template.docx", "output.docx", &replacements)?;
//! println!("Resolved {} placeholders", report.resolved);
//! # Ok::<(), docfill::Error>(())
//! ```
//!
//! ## Working on raw bytes
//!
//! ```
//! use docfill::template::{substitute, ReplacementMap};
//!
//! let mut replacements = ReplacementMap::new();
//! replacements.insert("name".to_string(), "Ada".to_string());
//!
//! let out = substitute(b"<w:t>Hello {{name}}</w:t>", &replacements);
//! assert_eq!(out, b"<w:t>Hello Ada</w:t>");
//! ```

pub mod detect;
pub mod error;
pub mod options;
pub mod package;
pub mod rewrite;
pub mod template;

// Re-exports
pub use detect::{is_word_document, looks_like_package, open_package};
pub use error::{Error, Result};
pub use options::RewriteOptions;
pub use package::{Package, BODY_PART};
pub use rewrite::{rewrite, rewrite_bytes, rewrite_file, rewrite_package, RewriteReport};
pub use template::{parse_replacements, placeholders, substitute, ReplacementMap};

use std::path::Path;

/// Fill a template file with default options and write the result.
///
/// # Example
///
/// ```no_run
/// use docfill::{fill_file, ReplacementMap};
///
/// fill_file("template.docx", "output.docx", &ReplacementMap::new())?;
/// # Ok::<(), docfill::Error>(())
/// ```
pub fn fill_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    replacements: &ReplacementMap,
) -> Result<RewriteReport> {
    rewrite_file(input, output, replacements, &RewriteOptions::default())
}

/// Fill a template held in memory, returning the generated package.
///
/// Rejects input that does not start with the ZIP magic.
///
/// # Example
///
/// ```no_run
/// use docfill::{fill_bytes, ReplacementMap};
///
/// let template = std::fs::read("template.docx")?;
/// let output = fill_bytes(&template, &ReplacementMap::new())?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn fill_bytes(template: &[u8], replacements: &ReplacementMap) -> Result<Vec<u8>> {
    if !looks_like_package(template) {
        return Err(Error::NotAPackage);
    }
    let (output, _) = rewrite_bytes(template, replacements, &RewriteOptions::default())?;
    Ok(output)
}

/// List the placeholders in a template's body part.
///
/// # Example
///
/// ```no_run
/// let names = docfill::list_placeholders("template.docx")?;
/// for name in names {
///     println!("{}", name);
/// }
/// # Ok::<(), docfill::Error>(())
/// ```
pub fn list_placeholders(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let package = Package::open(path)?;
    let body = package.body()?;
    Ok(placeholders(&body))
}
