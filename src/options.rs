//! Rewrite options configuration.

/// Options for rewriting a package.
#[derive(Debug, Clone, Default)]
pub struct RewriteOptions {
    /// Deflate level for compressed entries (`None` uses the zip default)
    pub compression_level: Option<i64>,

    /// Emit a `debug` event listing unresolved placeholders
    pub log_unresolved: bool,
}

impl RewriteOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the deflate level (clamped to 0-9).
    pub fn with_compression_level(mut self, level: i64) -> Self {
        self.compression_level = Some(level.clamp(0, 9));
        self
    }

    /// Log unresolved placeholders after substitution.
    pub fn with_log_unresolved(mut self, enabled: bool) -> Self {
        self.log_unresolved = enabled;
        self
    }
}
