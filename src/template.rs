//! Placeholder substitution over raw XML bytes.
//!
//! Tokens have the form `{{identifier}}` where the identifier is an ASCII
//! letter followed by one or more word characters. Matching runs against the
//! serialized byte stream, so a token split across runs is not recognized.

use crate::error::Result;
use regex::bytes::{Captures, Regex};
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

/// Mapping from placeholder identifier to replacement text.
pub type ReplacementMap = HashMap<String, String>;

/// Token pattern. `(?-u)` keeps `\w` to `[0-9A-Za-z_]`.
const TOKEN_PATTERN: &str = r"(?-u)\{\{([a-zA-Z]\w+)\}\}";

fn token_regex() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| Regex::new(TOKEN_PATTERN).expect("token pattern is valid"))
}

/// Result of a substitution pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitution {
    /// Rewritten content
    pub content: Vec<u8>,
    /// Number of tokens replaced with a mapped value
    pub resolved: usize,
    /// Identifiers with no mapping, in order of occurrence
    pub unresolved: Vec<String>,
}

/// Replace every placeholder token in `content`.
///
/// Unknown identifiers become `INVALID [{{identifier}}]`. Replacement values
/// are inserted verbatim and never re-scanned.
///
/// # Example
///
/// ```
/// use docfill::template::{substitute, ReplacementMap};
///
/// let mut map = ReplacementMap::new();
/// map.insert("name".to_string(), "Ada".to_string());
///
/// let out = substitute(b"Hello {{name}} {{count}}", &map);
/// assert_eq!(out, b"Hello Ada INVALID [{{count}}]");
///
/// // Single-character identifiers are not tokens
/// assert_eq!(substitute(b"{{n}}", &map), b"{{n}}");
/// ```
pub fn substitute(content: &[u8], replacements: &ReplacementMap) -> Vec<u8> {
    substitute_with_report(content, replacements).content
}

/// Like [`substitute`], also reporting which tokens were resolved.
pub fn substitute_with_report(content: &[u8], replacements: &ReplacementMap) -> Substitution {
    let mut resolved = 0;
    let mut unresolved = Vec::new();

    let rewritten = token_regex().replace_all(content, |caps: &Captures<'_>| {
        let token = &caps[0];
        let ident = String::from_utf8_lossy(&caps[1]);
        tracing::trace!(identifier = %ident, "placeholder");

        match replacements.get(ident.as_ref()) {
            Some(value) => {
                resolved += 1;
                value.as_bytes().to_vec()
            }
            None => {
                unresolved.push(ident.into_owned());
                invalid_marker(token)
            }
        }
    });

    let content = match rewritten {
        Cow::Borrowed(_) => content.to_vec(),
        Cow::Owned(bytes) => bytes,
    };

    Substitution {
        content,
        resolved,
        unresolved,
    }
}

fn invalid_marker(token: &[u8]) -> Vec<u8> {
    let mut marker = Vec::with_capacity(token.len() + 10);
    marker.extend_from_slice(b"INVALID [");
    marker.extend_from_slice(token);
    marker.push(b']');
    marker
}

/// List the identifiers of all recognized tokens, first occurrence order.
pub fn placeholders(content: &[u8]) -> Vec<String> {
    let mut seen = HashSet::new();
    token_regex()
        .captures_iter(content)
        .map(|caps| String::from_utf8_lossy(&caps[1]).into_owned())
        .filter(|ident| seen.insert(ident.clone()))
        .collect()
}

/// Decode a replacement mapping from a flat JSON object of strings.
///
/// # Example
///
/// ```
/// use docfill::template::parse_replacements;
///
/// let map = parse_replacements(br#"{"name": "Ada"}"#)?;
/// assert_eq!(map["name"], "Ada");
/// # Ok::<(), docfill::Error>(())
/// ```
pub fn parse_replacements(json: &[u8]) -> Result<ReplacementMap> {
    Ok(serde_json::from_slice(json)?)
}
