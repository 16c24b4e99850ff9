//! Parsing options and configuration.

use crate::render::CleanupOptions;

/// Options for parsing résumé documents.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// What to do when a document cannot be read
    pub error_mode: ErrorMode,

    /// Text cleanup rules applied to extracted text
    pub cleanup: CleanupOptions,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Degrade unreadable documents to empty text (the default).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Report unreadable documents as errors.
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Set cleanup options.
    pub fn with_cleanup(mut self, cleanup: CleanupOptions) -> Self {
        self.cleanup = cleanup;
        self
    }
}

/// Error handling mode for extraction failures.
///
/// Input errors (missing path, missing file, unsupported extension) are
/// always reported; this only governs failures inside an extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Log the failure and continue with empty text and no links
    #[default]
    Lenient,
    /// Fail on any error
    Strict,
}
