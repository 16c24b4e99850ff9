//! JSON rendering for parse outputs.

use crate::error::{Error, Result};
use crate::model::ParseOutput;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    Pretty,
    /// Single-line JSON, one self-contained payload per run
    #[default]
    Compact,
}

/// Convert a parse output to JSON.
pub fn to_json(output: &ParseOutput, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(output),
        JsonFormat::Compact => serde_json::to_string(output),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}
