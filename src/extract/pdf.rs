//! PDF extractor implementation.

use crate::error::Result;
use crate::model::{is_allowed_link, LinkSet};
use crate::parser::{LayoutAnalyzer, LopdfBackend, PdfBackend};
use std::path::Path;

use super::{DocumentExtractor, Extraction};

/// Separator between text blocks (and therefore between pages).
const BLOCK_SEPARATOR: &str = "\n\n";

/// PDF extractor.
///
/// Produces block text in reading order plus the document's web and
/// mail links.
#[derive(Debug, Clone, Default)]
pub struct PdfExtractor {
    _private: (),
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Extract from an already opened backend.
    ///
    /// Pages are visited in page-number order. A page whose content cannot
    /// be decoded fails the whole extraction; undecodable annotations only
    /// lose that page's links.
    pub fn extract_from<B: PdfBackend + ?Sized>(&self, backend: &B) -> Result<Extraction> {
        let analyzer = LayoutAnalyzer::new(backend);
        let mut blocks: Vec<String> = Vec::new();
        let mut links = LinkSet::new();

        for (page_num, page_id) in backend.pages() {
            let page_blocks = analyzer.extract_page_blocks(page_id)?;
            log::debug!("page {}: {} text blocks", page_num, page_blocks.len());

            blocks.extend(
                page_blocks
                    .into_iter()
                    .map(|b| b.text.trim().to_string())
                    .filter(|t| !t.is_empty()),
            );

            match backend.page_link_uris(page_id) {
                Ok(uris) => links.extend(
                    uris.into_iter()
                        .map(|u| u.trim().to_string())
                        .filter(|u| is_allowed_link(u)),
                ),
                Err(e) => log::warn!("page {}: skipping annotations: {}", page_num, e),
            }
        }

        Ok(Extraction::new(blocks.join(BLOCK_SEPARATOR), links))
    }
}

impl DocumentExtractor for PdfExtractor {
    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }

    fn name(&self) -> &str {
        "pdf"
    }

    fn extract(&self, path: &Path) -> Result<Extraction> {
        // The backend owns the document and is dropped on every return path.
        let backend = LopdfBackend::load_file(path)?;
        log::debug!("opened PDF {} ({})", path.display(), backend.version());
        self.extract_from(&backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::parser::backend::{ContentOp, PageId, PdfValue};
    use std::collections::BTreeMap;

    #[test]
    fn test_pdf_extractor_extensions() {
        let extractor = PdfExtractor::new();
        assert_eq!(extractor.supported_extensions(), &["pdf"]);
        assert!(extractor.supports_extension("pdf"));
        assert!(extractor.supports_extension("PDF"));
        assert!(!extractor.supports_extension("docx"));
        assert_eq!(extractor.name(), "pdf");
    }

    /// Two pages, one text object each, with fixed annotations.
    struct TwoPageBackend;

    impl PdfBackend for TwoPageBackend {
        fn pages(&self) -> BTreeMap<u32, PageId> {
            BTreeMap::from([(1, (10, 0)), (2, (20, 0))])
        }

        fn page_content(&self, page: PageId) -> Result<Vec<u8>> {
            Ok(format!("{}", page.0).into_bytes())
        }

        fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>> {
            let text = if data == b"10" { "  Page one  " } else { "Page two" };
            Ok(vec![
                ContentOp::new("BT", vec![]),
                ContentOp::new("Td", vec![PdfValue::Integer(72), PdfValue::Integer(700)]),
                ContentOp::new("Tj", vec![PdfValue::Str(text.as_bytes().to_vec())]),
                ContentOp::new("ET", vec![]),
            ])
        }

        fn decode_text(&self, _page: PageId, _font: &[u8], bytes: &[u8]) -> String {
            String::from_utf8_lossy(bytes).into_owned()
        }

        fn page_top(&self, _page: PageId) -> f32 {
            792.0
        }

        fn page_link_uris(&self, page: PageId) -> Result<Vec<String>> {
            match page.0 {
                10 => Ok(vec![
                    " https://github.com/jane ".to_string(),
                    "javascript:void(0)".to_string(),
                    "mailto:jane@example.com".to_string(),
                ]),
                _ => Ok(vec!["https://github.com/jane".to_string()]),
            }
        }
    }

    #[test]
    fn test_pages_joined_with_blank_line_and_links_filtered() {
        let extraction = PdfExtractor::new().extract_from(&TwoPageBackend).unwrap();
        assert_eq!(extraction.text, "Page one\n\nPage two");
        let links: Vec<&str> = extraction.links.iter().map(String::as_str).collect();
        assert_eq!(links.len(), 2);
        assert!(links.contains(&"https://github.com/jane"));
        assert!(links.contains(&"mailto:jane@example.com"));
    }

    #[test]
    fn test_missing_file_is_error() {
        let result = PdfExtractor::new().extract(Path::new("/nonexistent/resume.pdf"));
        assert!(matches!(result, Err(Error::Io(_)) | Err(Error::PdfParse(_))));
    }
}
