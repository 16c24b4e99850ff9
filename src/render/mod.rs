//! Post-extraction processing: text cleanup, contact harvesting, and JSON output.

mod cleanup;
mod contacts;
mod json;

pub use cleanup::{clean, is_printable, CleanupOptions, CleanupPipeline};
pub use contacts::harvest_emails;
pub use json::{to_json, JsonFormat};
