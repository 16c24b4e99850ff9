//! # unresume
//!
//! Résumé text extraction library for Rust.
//!
//! This library reads a résumé stored as PDF or Word, recovers its text in
//! reading order together with hyperlinks and email addresses, normalizes
//! the text, and packages everything as a JSON-serializable record.
//!
//! ## Quick Start
//!
//! ```no_run
//! use unresume::{parse_file, render};
//!
//! fn main() -> unresume::Result<()> {
//!     let result = parse_file("resume.pdf")?;
//!     println!("{} characters, {} links", result.length, result.links.len());
//!
//!     let json = render::to_json(&result.into(), render::JsonFormat::Pretty)?;
//!     println!("{}", json);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Reading order**: PDF text blocks are sorted top-to-bottom, left-to-right
//! - **Links**: web and mail annotations from PDF pages
//! - **Emails**: harvested from the normalized text
//! - **Word tables**: rows flattened to `cell | cell` lines
//! - **Cleanup pipeline**: removes glyph artifacts and invisible characters

pub mod detect;
pub mod error;
pub mod extract;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use detect::{detect_format_from_path, DocumentFormat};
pub use error::{Error, Result};
pub use extract::{DocumentExtractor, Extraction, ExtractorRegistry, PdfExtractor, WordExtractor};
pub use model::{ErrorResult, LinkSet, ParseOutput, ParseResult};
pub use parser::{ErrorMode, ParseOptions};
pub use render::{clean, harvest_emails, CleanupOptions, CleanupPipeline, JsonFormat};

use std::path::Path;

/// Parse a résumé with default options.
///
/// A missing path, a path that does not exist and an unsupported extension
/// are reported as errors. Failures while reading a supported document are
/// logged and yield an empty result.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
///
/// let result = unresume::parse(Some(Path::new("resume.docx"))).unwrap();
/// println!("{}", result.text);
/// ```
pub fn parse(path: Option<&Path>) -> Result<ParseResult> {
    parse_with_options(path, &ParseOptions::default())
}

/// Parse a résumé with custom options.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use unresume::{parse_with_options, ParseOptions};
///
/// let options = ParseOptions::new().strict();
/// let result = parse_with_options(Some(Path::new("resume.pdf")), &options);
/// ```
pub fn parse_with_options(path: Option<&Path>, options: &ParseOptions) -> Result<ParseResult> {
    let registry = ExtractorRegistry::with_defaults();
    parse_with_registry(path, options, &registry)
}

/// Parse a résumé file with default options.
///
/// # Example
///
/// ```no_run
/// use unresume::parse_file;
///
/// let result = parse_file("resume.pdf").unwrap();
/// for email in &result.emails {
///     println!("{}", email);
/// }
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<ParseResult> {
    parse(Some(path.as_ref()))
}

fn parse_with_registry(
    path: Option<&Path>,
    options: &ParseOptions,
    registry: &ExtractorRegistry,
) -> Result<ParseResult> {
    let path = path.ok_or(Error::NoInput)?;
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }
    let extractor = registry.resolve(path)?;
    log::debug!(
        "{}: {} document, using {} extractor",
        path.display(),
        detect_format_from_path(path),
        extractor.name()
    );

    let extraction = match extractor.extract(path) {
        Ok(extraction) => extraction,
        // Input errors are reported even in lenient mode.
        Err(e) if options.error_mode == ErrorMode::Lenient && !e.is_input_error() => {
            log::error!(
                "{} extraction failed for {}: {}",
                extractor.name(),
                path.display(),
                e
            );
            Extraction::default()
        }
        Err(e) => return Err(e),
    };

    let text = CleanupPipeline::new(options.cleanup.clone()).process(&extraction.text);
    let emails = harvest_emails(&text);
    log::debug!(
        "{}: {} characters, {} links, {} emails",
        path.display(),
        text.chars().count(),
        extraction.links.len(),
        emails.len()
    );

    Ok(ParseResult::new(text, extraction.links, emails))
}

/// Builder for parsing résumé documents.
///
/// # Example
///
/// ```no_run
/// use unresume::{CleanupOptions, Unresume};
///
/// let result = Unresume::new()
///     .strict()
///     .with_cleanup(CleanupOptions::standard())
///     .parse("resume.pdf")?;
/// println!("{}", result.text);
/// # Ok::<(), unresume::Error>(())
/// ```
pub struct Unresume {
    options: ParseOptions,
    registry: ExtractorRegistry,
}

impl Unresume {
    /// Create a new builder with default options and extractors.
    pub fn new() -> Self {
        Self {
            options: ParseOptions::default(),
            registry: ExtractorRegistry::with_defaults(),
        }
    }

    /// Report extraction failures as errors.
    pub fn strict(mut self) -> Self {
        self.options = self.options.strict();
        self
    }

    /// Degrade extraction failures to empty text (the default).
    pub fn lenient(mut self) -> Self {
        self.options = self.options.lenient();
        self
    }

    /// Set cleanup options.
    pub fn with_cleanup(mut self, cleanup: CleanupOptions) -> Self {
        self.options = self.options.with_cleanup(cleanup);
        self
    }

    /// Replace all parse options.
    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// Use a custom extractor registry.
    pub fn with_registry(mut self, registry: ExtractorRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Current parse options.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse a résumé file.
    pub fn parse<P: AsRef<Path>>(&self, path: P) -> Result<ParseResult> {
        parse_with_registry(Some(path.as_ref()), &self.options, &self.registry)
    }

    /// Parse an optional path and fold any error into the output payload.
    pub fn parse_output(&self, path: Option<&Path>) -> ParseOutput {
        parse_with_registry(path, &self.options, &self.registry).into()
    }
}

impl Default for Unresume {
    fn default() -> Self {
        Self::new()
    }
}
