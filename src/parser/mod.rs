//! Format-level readers: PDF content streams and Word packages.

pub mod backend;
mod docx;
mod layout;
mod options;

pub use backend::{FormXObject, LopdfBackend, PageId, PdfBackend};
pub use docx::{DocxDocument, DocxTable};
pub use layout::{group_spans_into_blocks, sort_blocks, LayoutAnalyzer, TextBlock, TextLine, TextSpan};
pub use options::{ErrorMode, ParseOptions};
