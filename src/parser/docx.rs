//! WordprocessingML (.docx) reader.
//!
//! Only what text extraction needs is modeled: top-level body paragraphs
//! and top-level tables (rows of cells). A legacy binary `.doc` file is not
//! a ZIP package and fails to open.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use zip::ZipArchive;

use crate::error::{Error, Result};

/// Conventional location of the main document part.
const DEFAULT_DOCUMENT_PART: &str = "word/document.xml";
/// Package relationships part.
const PACKAGE_RELS_PART: &str = "_rels/.rels";
/// Relationship type suffix of the main document part.
const OFFICE_DOCUMENT_REL: &str = "/officeDocument";

/// A table as rows of cell texts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocxTable {
    /// Rows in document order; each cell's paragraphs are joined with `\n`
    pub rows: Vec<Vec<String>>,
}

/// Paragraphs and tables of a Word document body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocxDocument {
    /// Top-level body paragraphs, untrimmed, in document order
    pub paragraphs: Vec<String>,
    /// Top-level tables in document order
    pub tables: Vec<DocxTable>,
}

impl DocxDocument {
    /// Open a `.docx` package from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Read a `.docx` package from any seekable reader.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;

        let part_name = read_part(&mut archive, PACKAGE_RELS_PART)
            .ok()
            .and_then(|rels| main_part_from_rels(&rels))
            .unwrap_or_else(|| DEFAULT_DOCUMENT_PART.to_string());

        let xml = read_part(&mut archive, &part_name)
            .map_err(|_| Error::Docx(format!("missing main document part {}", part_name)))?;
        Self::from_xml(&xml)
    }

    /// Parse the main document part (`document.xml`).
    pub fn from_xml(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        let mut collector = BodyCollector::default();

        loop {
            match reader.read_event()? {
                Event::Start(e) => collector.open(&e),
                Event::Empty(e) => collector.empty(&e),
                Event::End(e) => collector.close(e.local_name().as_ref()),
                Event::Text(t) => {
                    if collector.in_text {
                        let text = t.unescape().map_err(|e| Error::Docx(e.to_string()))?;
                        collector.para.push_str(&text);
                    }
                }
                Event::CData(t) => {
                    if collector.in_text {
                        collector.para.push_str(&String::from_utf8_lossy(&t));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(collector.finish())
    }
}

fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<String> {
    let mut part = archive.by_name(name)?;
    let mut xml = String::new();
    part.read_to_string(&mut xml)?;
    Ok(xml)
}

/// Find the main document part named by the package relationships.
fn main_part_from_rels(rels: &str) -> Option<String> {
    let mut reader = Reader::from_str(rels);
    loop {
        match reader.read_event().ok()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                let mut rel_type = None;
                let mut target = None;
                for attr in e.attributes().flatten() {
                    let value = attr.unescape_value().ok()?.into_owned();
                    match attr.key.local_name().as_ref() {
                        b"Type" => rel_type = Some(value),
                        b"Target" => target = Some(value),
                        _ => {}
                    }
                }
                if rel_type.is_some_and(|t| t.ends_with(OFFICE_DOCUMENT_REL)) {
                    return target.map(|t| t.trim_start_matches('/').to_string());
                }
            }
            Event::Eof => return None,
            _ => {}
        }
    }
}

/// Streaming state while walking `w:body`.
///
/// Paragraph text is taken only from run children (`w:r/w:t`, `w:r/w:tab`,
/// `w:r/w:br`, `w:r/w:cr`) of paragraphs that are not nested in another
/// paragraph, which skips tab-stop definitions and text-box content.
#[derive(Debug, Default)]
struct BodyCollector {
    paragraphs: Vec<String>,
    tables: Vec<DocxTable>,
    /// Local names of open elements
    stack: Vec<Vec<u8>>,
    table_depth: usize,
    para_depth: usize,
    para: String,
    in_text: bool,
    row: Vec<String>,
    cell: Vec<String>,
}

impl BodyCollector {
    /// Whether we are directly inside a cell of a top-level table.
    fn in_top_table(&self) -> bool {
        self.table_depth == 1 && self.para_depth == 0
    }

    fn parent_is_run(&self) -> bool {
        self.stack.last().is_some_and(|name| name.as_slice() == b"r")
    }

    fn open(&mut self, e: &BytesStart<'_>) {
        let name = e.local_name().as_ref().to_vec();
        match name.as_slice() {
            b"tbl" => {
                self.table_depth += 1;
                if self.in_top_table() {
                    self.tables.push(DocxTable::default());
                }
            }
            b"tr" if self.in_top_table() => self.row.clear(),
            b"tc" if self.in_top_table() => self.cell.clear(),
            b"p" => {
                self.para_depth += 1;
                if self.para_depth == 1 {
                    self.para.clear();
                }
            }
            b"t" if self.para_depth == 1 && self.parent_is_run() => self.in_text = true,
            _ => {}
        }
        self.stack.push(name);
    }

    fn empty(&mut self, e: &BytesStart<'_>) {
        if self.para_depth != 1 || !self.parent_is_run() {
            return;
        }
        match e.local_name().as_ref() {
            b"tab" => self.para.push('\t'),
            b"br" | b"cr" => self.para.push('\n'),
            _ => {}
        }
    }

    fn close(&mut self, name: &[u8]) {
        self.stack.pop();
        match name {
            b"t" => self.in_text = false,
            b"p" => {
                if self.para_depth == 1 {
                    let text = std::mem::take(&mut self.para);
                    match self.table_depth {
                        0 => self.paragraphs.push(text),
                        1 => self.cell.push(text),
                        _ => {}
                    }
                }
                self.para_depth = self.para_depth.saturating_sub(1);
            }
            b"tc" if self.in_top_table() => {
                let text = std::mem::take(&mut self.cell).join("\n");
                self.row.push(text);
            }
            b"tr" if self.in_top_table() => {
                let row = std::mem::take(&mut self.row);
                if let Some(table) = self.tables.last_mut() {
                    table.rows.push(row);
                }
            }
            b"tbl" => self.table_depth = self.table_depth.saturating_sub(1),
            _ => {}
        }
    }

    fn finish(self) -> DocxDocument {
        DocxDocument {
            paragraphs: self.paragraphs,
            tables: self.tables,
        }
    }
}
