//! Document format detection.
//!
//! The format is inferred from the file extension alone, compared
//! case-insensitively. Contents are never sniffed: a `.doc` file holding a
//! PDF is still routed to the Word extractor.

use std::fmt;
use std::path::Path;

/// Format of an input document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentFormat {
    /// Portable Document Format (`.pdf`)
    Pdf,
    /// Word document (`.doc`, `.docx`)
    Word,
    /// Anything else. Holds the lowercase extension with its leading dot,
    /// or an empty string when the path has no extension.
    Unsupported(String),
}

impl DocumentFormat {
    /// Whether an extractor exists for this format.
    pub fn is_supported(&self) -> bool {
        !matches!(self, DocumentFormat::Unsupported(_))
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Pdf => write!(f, "PDF"),
            DocumentFormat::Word => write!(f, "Word"),
            DocumentFormat::Unsupported(ext) => write!(f, "unsupported ({})", ext),
        }
    }
}

/// Lowercase extension of `path` without the leading dot.
///
/// Returns an empty string when the path has no extension (including
/// dot-files such as `.profile`).
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Detect the document format from a file path.
///
/// # Example
/// ```
/// use std::path::Path;
/// use unresume::detect::{detect_format_from_path, DocumentFormat};
///
/// assert_eq!(detect_format_from_path(Path::new("cv.PDF")), DocumentFormat::Pdf);
/// assert_eq!(
///     detect_format_from_path(Path::new("cv.txt")),
///     DocumentFormat::Unsupported(".txt".to_string())
/// );
/// ```
pub fn detect_format_from_path(path: &Path) -> DocumentFormat {
    detect_format_from_extension(&extension_of(path))
}

/// Detect the document format from a bare extension (with or without dot).
pub fn detect_format_from_extension(ext: &str) -> DocumentFormat {
    let ext = ext.trim_start_matches('.').to_lowercase();
    match ext.as_str() {
        "pdf" => DocumentFormat::Pdf,
        "doc" | "docx" => DocumentFormat::Word,
        "" => DocumentFormat::Unsupported(String::new()),
        other => DocumentFormat::Unsupported(format!(".{}", other)),
    }
}
