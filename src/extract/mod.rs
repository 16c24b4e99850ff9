//! Document extractors and the registry that dispatches to them.
//!
//! Each supported format implements [`DocumentExtractor`]; the
//! [`ExtractorRegistry`] picks one by file extension.
//!
//! # Example
//!
//! ```no_run
//! use unresume::extract::{ExtractorRegistry, PdfExtractor};
//! use std::sync::Arc;
//! use std::path::Path;
//!
//! fn main() -> unresume::Result<()> {
//!     let mut registry = ExtractorRegistry::new();
//!     registry.register(Arc::new(PdfExtractor::new()));
//!
//!     let extraction = registry.extract(Path::new("resume.pdf"))?;
//!     println!("{}", extraction.text);
//!     Ok(())
//! }
//! ```

mod pdf;
mod word;

pub use pdf::PdfExtractor;
pub use word::WordExtractor;

use crate::detect::extension_of;
use crate::error::{Error, Result};
use crate::model::LinkSet;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Raw output of an extractor, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Document text in reading order
    pub text: String,

    /// Hyperlinks with an allowed scheme
    pub links: LinkSet,
}

impl Extraction {
    /// Create an extraction from text and links.
    pub fn new(text: impl Into<String>, links: LinkSet) -> Self {
        Self {
            text: text.into(),
            links,
        }
    }

    /// Extraction carrying text only.
    pub fn text_only(text: impl Into<String>) -> Self {
        Self::new(text, LinkSet::new())
    }

    /// Check if nothing was extracted.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.links.is_empty()
    }
}

/// Trait for document extractors.
///
/// Implement this trait to add support for a new document format.
pub trait DocumentExtractor: Send + Sync {
    /// Get the supported file extensions for this extractor.
    ///
    /// Extensions should be lowercase without the leading dot (e.g., `["pdf"]`).
    fn supported_extensions(&self) -> &[&str];

    /// Get the name of this extractor.
    fn name(&self) -> &str;

    /// Extract text and links from the file at `path`.
    fn extract(&self, path: &Path) -> Result<Extraction>;

    /// Check if this extractor supports the given extension.
    fn supports_extension(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.supported_extensions().iter().any(|e| *e == ext_lower)
    }
}

/// Registry for document extractors.
///
/// The registry maps file extensions to extractors.
pub struct ExtractorRegistry {
    extractors: HashMap<String, Arc<dyn DocumentExtractor>>,
    by_name: HashMap<String, Arc<dyn DocumentExtractor>>,
}

impl ExtractorRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            extractors: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Create a registry with the default extractors (PDF, Word).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(PdfExtractor::new()));
        registry.register(Arc::new(WordExtractor::new()));
        registry
    }

    /// Register an extractor.
    ///
    /// The extractor will be registered for all its supported extensions,
    /// replacing any earlier registration for the same extension.
    pub fn register(&mut self, extractor: Arc<dyn DocumentExtractor>) {
        for ext in extractor.supported_extensions() {
            self.extractors
                .insert(ext.to_lowercase(), extractor.clone());
        }
        self.by_name
            .insert(extractor.name().to_lowercase(), extractor);
    }

    /// Get an extractor by file extension (without the dot).
    pub fn get_by_extension(&self, ext: &str) -> Option<Arc<dyn DocumentExtractor>> {
        self.extractors.get(&ext.to_lowercase()).cloned()
    }

    /// Get an extractor by name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn DocumentExtractor>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Check if an extension is supported.
    pub fn supports(&self, ext: &str) -> bool {
        self.extractors.contains_key(&ext.to_lowercase())
    }

    /// Get all supported extensions.
    pub fn supported_extensions(&self) -> Vec<&str> {
        self.extractors.keys().map(|s| s.as_str()).collect()
    }

    /// Find the extractor for `path`, or report the unsupported extension.
    pub fn resolve(&self, path: &Path) -> Result<Arc<dyn DocumentExtractor>> {
        let ext = extension_of(path);
        self.get_by_extension(&ext).ok_or_else(|| {
            if ext.is_empty() {
                Error::UnsupportedFormat(String::new())
            } else {
                Error::UnsupportedFormat(format!(".{}", ext))
            }
        })
    }

    /// Extract a file using the appropriate extractor.
    ///
    /// Extraction errors are returned as-is; the caller decides whether to
    /// degrade them.
    pub fn extract(&self, path: &Path) -> Result<Extraction> {
        self.resolve(path)?.extract(path)
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
