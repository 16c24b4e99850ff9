//! PDF backend abstraction layer.
//!
//! Provides a trait-based interface for PDF operations, isolating
//! the concrete PDF library (lopdf) from the layout logic.

use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// Page identifier: (object number, generation number).
pub type PageId = (u32, u16);

/// Height of a US Letter page, used when a page has no usable MediaBox.
pub const DEFAULT_PAGE_TOP: f32 = 792.0;

/// Parent-chain depth limit when resolving inherited page attributes.
const MAX_INHERIT_DEPTH: usize = 32;

/// A value from a PDF content stream operand.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfValue {
    Integer(i64),
    Real(f32),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<PdfValue>),
    Other,
}

/// A form XObject ready to be interpreted: its `/Matrix` and content bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct FormXObject {
    /// Form space to user space transform `[a b c d e f]`
    pub matrix: [f32; 6],
    /// Decoded content stream
    pub content: Vec<u8>,
}

/// A single operation from a PDF content stream.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentOp {
    pub operator: String,
    pub operands: Vec<PdfValue>,
}

impl ContentOp {
    /// Build an operation from an operator and its operands.
    pub fn new(operator: impl Into<String>, operands: Vec<PdfValue>) -> Self {
        Self {
            operator: operator.into(),
            operands,
        }
    }
}

/// Abstract interface for PDF document access.
///
/// Implementations provide page enumeration, content stream decoding,
/// text decoding, page geometry and link annotations, without exposing
/// any concrete PDF library types.
pub trait PdfBackend {
    /// Return all pages as (page_number → PageId), in document order.
    fn pages(&self) -> BTreeMap<u32, PageId>;

    /// Return the raw (decompressed) content stream bytes for a page.
    fn page_content(&self, page: PageId) -> Result<Vec<u8>>;

    /// Parse raw content stream bytes into a sequence of operations.
    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>>;

    /// Decode a text byte sequence using the font's encoding on the given page.
    /// Falls back to simple decoding if the font or encoding is unavailable.
    fn decode_text(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> String;

    /// Upper y coordinate of the page's MediaBox in user space.
    fn page_top(&self, page: PageId) -> f32;

    /// URIs of the page's link annotations, unfiltered.
    fn page_link_uris(&self, page: PageId) -> Result<Vec<String>>;

    /// Look up a form XObject by its resource name on the given page.
    ///
    /// Returns `None` for images, unknown names and unreadable streams.
    fn form_xobject(&self, _page: PageId, _name: &[u8]) -> Option<FormXObject> {
        None
    }
}

/// Simple text decoding fallback when no encoding is available.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter_map(|c| {
                if c.len() == 2 {
                    Some(u16::from_be_bytes([c[0], c[1]]))
                } else {
                    None
                }
            })
            .collect();
        return String::from_utf16(&utf16).unwrap_or_default();
    }

    if let Ok(s) = String::from_utf8(bytes.to_vec()) {
        return s;
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

// ---------------------------------------------------------------------------
// LopdfBackend: concrete implementation backed by lopdf
// ---------------------------------------------------------------------------

use lopdf::{Dictionary, Document as LopdfDocument, Object};

/// Concrete [`PdfBackend`] backed by `lopdf::Document`.
pub struct LopdfBackend {
    doc: LopdfDocument,
}

impl LopdfBackend {
    /// Load from a file path.
    pub fn load_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let doc = LopdfDocument::load(path)?;
        if doc.is_encrypted() {
            log::warn!("PDF is encrypted; text may be unreadable");
        }
        Ok(Self { doc })
    }

    /// Load from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data)?;
        Ok(Self { doc })
    }

    /// Get PDF version string.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    /// Follow a reference one level; other objects are returned as-is.
    fn resolve<'a>(&'a self, obj: &'a Object) -> &'a Object {
        match obj {
            Object::Reference(id) => self.doc.get_object(*id).unwrap_or(obj),
            _ => obj,
        }
    }

    /// Look up a page attribute, walking up `/Parent` for inherited values.
    fn inherited<'a>(&'a self, page: PageId, key: &[u8]) -> Option<&'a Object> {
        let mut dict: &Dictionary = self.doc.get_dictionary(page).ok()?;
        for _ in 0..MAX_INHERIT_DEPTH {
            if let Ok(value) = dict.get(key) {
                return Some(self.resolve(value));
            }
            let parent = dict.get(b"Parent").ok()?.as_reference().ok()?;
            dict = self.doc.get_dictionary(parent).ok()?;
        }
        None
    }

    /// Extract the `/URI` of a link annotation's action, if it has one.
    fn annotation_uri(&self, annot: &Dictionary) -> Option<String> {
        let subtype = annot.get(b"Subtype").ok()?.as_name().ok()?;
        if subtype != b"Link" {
            return None;
        }
        let action = self.resolve(annot.get(b"A").ok()?).as_dict().ok()?;
        let kind = action.get(b"S").ok()?.as_name().ok()?;
        if kind != b"URI" {
            return None;
        }
        match self.resolve(action.get(b"URI").ok()?) {
            Object::String(bytes, _) => Some(decode_text_simple(bytes)),
            _ => None,
        }
    }
}

impl PdfBackend for LopdfBackend {
    fn pages(&self) -> BTreeMap<u32, PageId> {
        self.doc.get_pages()
    }

    fn page_content(&self, page_id: PageId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        // A page without /Contents is blank.
        let Ok(contents) = page_dict.get(b"Contents") else {
            return Ok(Vec::new());
        };

        match self.resolve(contents) {
            Object::Stream(s) => stream_data(s),
            Object::Array(arr) => {
                let mut content = Vec::new();
                for obj in arr {
                    if let Object::Stream(s) = self.resolve(obj) {
                        match stream_data(s) {
                            Ok(data) => {
                                content.extend_from_slice(&data);
                                content.push(b' ');
                            }
                            Err(e) => log::warn!("Skipping unreadable content stream: {}", e),
                        }
                    }
                }
                Ok(content)
            }
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        }
    }

    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>> {
        let content =
            lopdf::content::Content::decode(data).map_err(|e| Error::PdfParse(e.to_string()))?;

        Ok(content
            .operations
            .into_iter()
            .map(|op| ContentOp {
                operator: op.operator,
                operands: op.operands.iter().map(convert_object).collect(),
            })
            .collect())
    }

    fn decode_text(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> String {
        if let Ok(lopdf_fonts) = self.doc.get_page_fonts(page) {
            if let Some(font_dict) = lopdf_fonts.get(font_name) {
                if let Ok(enc) = font_dict.get_font_encoding(&self.doc) {
                    if let Ok(text) = LopdfDocument::decode_text(&enc, bytes) {
                        return text;
                    }
                }
            }
        }
        decode_text_simple(bytes)
    }

    fn page_top(&self, page: PageId) -> f32 {
        let Some(Object::Array(rect)) = self.inherited(page, b"MediaBox") else {
            return DEFAULT_PAGE_TOP;
        };
        let coords: Vec<f32> = rect
            .iter()
            .filter_map(|o| get_number_from_value(&convert_object(self.resolve(o))))
            .collect();
        if coords.len() == 4 {
            coords[1].max(coords[3])
        } else {
            DEFAULT_PAGE_TOP
        }
    }

    fn page_link_uris(&self, page: PageId) -> Result<Vec<String>> {
        let page_dict = self.doc.get_dictionary(page)?;
        let Ok(annots) = page_dict.get(b"Annots") else {
            return Ok(Vec::new());
        };
        let Object::Array(annots) = self.resolve(annots) else {
            return Ok(Vec::new());
        };

        Ok(annots
            .iter()
            .filter_map(|annot| self.resolve(annot).as_dict().ok())
            .filter_map(|annot| self.annotation_uri(annot))
            .collect())
    }

    fn form_xobject(&self, page: PageId, name: &[u8]) -> Option<FormXObject> {
        let resources = self.inherited(page, b"Resources")?.as_dict().ok()?;
        let xobjects = self.resolve(resources.get(b"XObject").ok()?).as_dict().ok()?;
        let Object::Stream(stream) = self.resolve(xobjects.get(name).ok()?) else {
            return None;
        };
        if stream.dict.get(b"Subtype").and_then(Object::as_name).ok()? != b"Form" {
            return None;
        }

        let mut matrix = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];
        if let Ok(Object::Array(values)) = stream.dict.get(b"Matrix").map(|m| self.resolve(m)) {
            let nums: Vec<f32> = values
                .iter()
                .filter_map(|o| get_number_from_value(&convert_object(self.resolve(o))))
                .collect();
            if let Ok(m) = <[f32; 6]>::try_from(nums.as_slice()) {
                matrix = m;
            }
        }

        match stream_data(stream) {
            Ok(content) => Some(FormXObject { matrix, content }),
            Err(e) => {
                log::warn!("Skipping unreadable form XObject: {}", e);
                None
            }
        }
    }
}

/// Stream bytes with filters applied; unfiltered streams are returned as stored.
fn stream_data(stream: &lopdf::Stream) -> Result<Vec<u8>> {
    if stream.dict.get(b"Filter").is_err() {
        return Ok(stream.content.clone());
    }
    stream
        .decompressed_content()
        .map_err(|e| Error::PdfParse(e.to_string()))
}

/// Convert a `lopdf::Object` to [`PdfValue`].
fn convert_object(obj: &Object) -> PdfValue {
    match obj {
        Object::Integer(i) => PdfValue::Integer(*i),
        Object::Real(r) => PdfValue::Real(*r),
        Object::Name(n) => PdfValue::Name(n.clone()),
        Object::String(b, _) => PdfValue::Str(b.clone()),
        Object::Array(arr) => PdfValue::Array(arr.iter().map(convert_object).collect()),
        _ => PdfValue::Other,
    }
}

/// Helper: extract a number from a [`PdfValue`].
pub fn get_number_from_value(val: &PdfValue) -> Option<f32> {
    match val {
        PdfValue::Integer(i) => Some(*i as f32),
        PdfValue::Real(r) => Some(*r),
        _ => None,
    }
}
