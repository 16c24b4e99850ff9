//! Error types for unresume library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for unresume operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting a résumé.
///
/// The first three variants are input errors: they stop the pipeline before
/// any document is opened. The rest come from extraction and are downgraded
/// to an empty extraction unless the caller asked for strict mode.
#[derive(Error, Debug)]
pub enum Error {
    /// No input path was supplied.
    #[error("No file path provided")]
    NoInput,

    /// The input path does not exist.
    #[error("File not found")]
    FileNotFound(PathBuf),

    /// The extension is not one of `.pdf`, `.doc`, `.docx`.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// I/O error when reading files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// The Word package is missing a part or is otherwise malformed.
    #[error("Word document error: {0}")]
    Docx(String),

    /// Error reading the ZIP container of a Word package.
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Malformed WordprocessingML.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Error during rendering (JSON).
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    /// Whether this error was raised before extraction started.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Error::NoInput | Error::FileNotFound(_) | Error::UnsupportedFormat(_)
        )
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}
