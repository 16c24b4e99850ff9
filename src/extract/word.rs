//! Word (OOXML) extractor implementation.

use crate::error::Result;
use crate::parser::DocxDocument;
use std::path::Path;

use super::{DocumentExtractor, Extraction};

/// Separator between table cells on one output line.
const CELL_SEPARATOR: &str = " | ";

/// Word extractor.
///
/// Emits paragraphs first, then one line per table row. Word documents
/// contribute no links.
#[derive(Debug, Clone, Default)]
pub struct WordExtractor {
    _private: (),
}

impl WordExtractor {
    /// Create a new Word extractor.
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Flatten a parsed document into text lines.
    ///
    /// Blank paragraphs and rows whose cells are all blank are skipped.
    pub fn document_text(doc: &DocxDocument) -> String {
        let paragraphs = doc
            .paragraphs
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(str::to_string);

        let rows = doc.tables.iter().flat_map(|table| {
            table.rows.iter().filter_map(|row| {
                let cells: Vec<&str> = row
                    .iter()
                    .map(|c| c.trim())
                    .filter(|c| !c.is_empty())
                    .collect();
                (!cells.is_empty()).then(|| cells.join(CELL_SEPARATOR))
            })
        });

        paragraphs.chain(rows).collect::<Vec<_>>().join("\n")
    }
}

impl DocumentExtractor for WordExtractor {
    fn supported_extensions(&self) -> &[&str] {
        &["doc", "docx"]
    }

    fn name(&self) -> &str {
        "word"
    }

    fn extract(&self, path: &Path) -> Result<Extraction> {
        let doc = DocxDocument::open(path)?;
        log::debug!(
            "opened Word document {}: {} paragraphs, {} tables",
            path.display(),
            doc.paragraphs.len(),
            doc.tables.len()
        );
        Ok(Extraction::text_only(Self::document_text(&doc)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::DocxTable;

    #[test]
    fn test_word_extractor_extensions() {
        let extractor = WordExtractor::new();
        assert!(extractor.supports_extension("docx"));
        assert!(extractor.supports_extension("DOC"));
        assert!(!extractor.supports_extension("pdf"));
        assert_eq!(extractor.name(), "word");
    }

    #[test]
    fn test_paragraphs_then_table_rows() {
        let doc = DocxDocument {
            paragraphs: vec![
                "Jane Doe".to_string(),
                "   ".to_string(),
                " Engineer ".to_string(),
            ],
            tables: vec![DocxTable {
                rows: vec![
                    vec!["Skill".to_string(), "Level".to_string()],
                    vec!["Rust".to_string(), " ".to_string(), "Expert".to_string()],
                    vec!["".to_string(), "  ".to_string()],
                ],
            }],
        };

        assert_eq!(
            WordExtractor::document_text(&doc),
            "Jane Doe\nEngineer\nSkill | Level\nRust | Expert"
        );
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(WordExtractor::document_text(&DocxDocument::default()), "");
    }

    #[test]
    fn test_legacy_binary_doc_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("old.doc");
        std::fs::write(&path, b"\xD0\xCF\x11\xE0\xA1\xB1\x1A\xE1 not a zip").unwrap();
        assert!(WordExtractor::new().extract(&path).is_err());
    }
}
