//! Layout analysis for PDF pages.
//!
//! Content streams are interpreted into positioned text spans, spans are
//! grouped into lines and lines into blocks, and blocks are put into
//! reading order by sorting on their top-left corner.

use crate::error::Result;

use super::backend::{get_number_from_value, ContentOp, FormXObject, PageId, PdfBackend, PdfValue};

/// Approximate glyph advance in ems, used when font metrics are not consulted.
const AVG_CHAR_WIDTH_EM: f32 = 0.5;
/// Ascender height relative to font size.
const ASCENT_EM: f32 = 0.8;
/// Largest horizontal gap (in ems) still treated as part of the same line.
const MAX_WORD_GAP_EM: f32 = 1.5;
/// Largest baseline step (in ems) still treated as the next line of a block.
const MAX_LINE_STEP_EM: f32 = 2.0;
/// Largest left-edge shift (in ems) between lines of one block.
const MAX_INDENT_EM: f32 = 2.0;
/// Minimum gap (in ems) between spans that gets a space inserted.
const SPACE_GAP_EM: f32 = 0.15;
/// TJ adjustment (thousandths of an em) that marks a word break.
const TJ_SPACE_THRESHOLD: f32 = 200.0;
/// Nesting limit for form XObjects drawn with `Do`.
const MAX_FORM_DEPTH: usize = 8;

/// A text fragment positioned on a page.
///
/// Coordinates are in default user space: y grows upward and `y` is the
/// baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline)
    pub y: f32,
    /// Estimated advance width
    pub width: f32,
    /// Effective font size in points
    pub font_size: f32,
}

impl TextSpan {
    /// Create a new text span.
    pub fn new(text: impl Into<String>, x: f32, y: f32, width: f32, font_size: f32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            width,
            font_size,
        }
    }

    /// Right edge of the span.
    pub fn end(&self) -> f32 {
        self.x + self.width
    }

    /// Top of the glyph box (approximate, based on font size).
    pub fn top(&self) -> f32 {
        self.y + self.font_size * ASCENT_EM
    }

    fn em(&self) -> f32 {
        self.font_size.max(1.0)
    }
}

/// A text line composed of spans on the same baseline.
#[derive(Debug, Clone)]
pub struct TextLine {
    /// The spans in this line, in left-to-right order
    pub spans: Vec<TextSpan>,
}

impl TextLine {
    /// Create a new text line from spans.
    pub fn from_spans(mut spans: Vec<TextSpan>) -> Self {
        spans.sort_by(|a, b| a.x.total_cmp(&b.x));
        Self { spans }
    }

    fn last(&self) -> Option<&TextSpan> {
        self.spans.last()
    }

    /// Whether `span` continues this line to the right.
    fn accepts(&self, span: &TextSpan) -> bool {
        let Some(last) = self.last() else {
            return true;
        };
        let em = last.em().max(span.em());
        (span.y - last.y).abs() <= em * 0.5
            && span.x >= last.x
            && span.x - last.end() <= em * MAX_WORD_GAP_EM
    }

    /// Get the combined text of all spans with appropriate spacing.
    ///
    /// A space is inserted where the gap between spans is wide enough,
    /// unless either side already has one or both sides are CJK.
    pub fn text(&self) -> String {
        let mut result = String::new();

        for (i, span) in self.spans.iter().enumerate() {
            if i > 0 {
                let prev = &self.spans[i - 1];
                let gap = span.x - prev.end();

                let prev_last = prev.text.chars().last();
                let curr_first = span.text.chars().next();

                let boundary_space = prev_last.map(char::is_whitespace).unwrap_or(true)
                    || curr_first.map(char::is_whitespace).unwrap_or(true);
                let both_cjk = prev_last.map(is_spaceless_script_char).unwrap_or(false)
                    && curr_first.map(is_spaceless_script_char).unwrap_or(false);

                if gap > span.em() * SPACE_GAP_EM && !boundary_space && !both_cjk {
                    result.push(' ');
                }
            }
            result.push_str(&span.text);
        }

        result
    }
}

/// A block of text with the position of its top-left corner.
///
/// `top` and `left` are page-space units measured from the top-left corner
/// of the page, so smaller `top` means higher on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    /// Block text; lines are separated by `\n`
    pub text: String,
    /// Distance from the top edge of the page
    pub top: f32,
    /// Distance from the left edge of the page
    pub left: f32,
}

impl TextBlock {
    /// Create a new text block.
    pub fn new(text: impl Into<String>, top: f32, left: f32) -> Self {
        Self {
            text: text.into(),
            top,
            left,
        }
    }

    /// Check if the block has no visible text.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Put blocks into reading order: top-to-bottom, then left-to-right.
///
/// Blocks are ordered by `(top, left)` with a stable sort. Blocks sharing a
/// top coordinate read left to right; a block that starts lower always
/// follows, whatever its column.
pub fn sort_blocks(blocks: &mut [TextBlock]) {
    blocks.sort_by(|a, b| a.top.total_cmp(&b.top).then(a.left.total_cmp(&b.left)));
}

/// Lines being assembled into one block.
#[derive(Debug, Default)]
struct BlockBuilder {
    lines: Vec<TextLine>,
    left: f32,
}

impl BlockBuilder {
    fn start(span: TextSpan) -> Self {
        Self {
            left: span.x,
            lines: vec![TextLine { spans: vec![span] }],
        }
    }

    /// Whether `span` begins the next line of this block.
    fn accepts_next_line(&self, span: &TextSpan) -> bool {
        let Some(last) = self.lines.last().and_then(TextLine::last) else {
            return false;
        };
        let em = last.em().max(span.em());
        let step = last.y - span.y;
        step > em * 0.5 && step <= em * MAX_LINE_STEP_EM && (span.x - self.left).abs() <= em * MAX_INDENT_EM
    }

    /// Try to place `span` in this block. Gives the span back on refusal.
    fn push(&mut self, span: TextSpan) -> Option<TextSpan> {
        if let Some(line) = self.lines.last_mut() {
            if line.accepts(&span) {
                line.spans.push(span);
                return None;
            }
        }
        if self.accepts_next_line(&span) {
            self.left = self.left.min(span.x);
            self.lines.push(TextLine { spans: vec![span] });
            return None;
        }
        Some(span)
    }

    fn finish(self, page_top: f32) -> TextBlock {
        let top = self
            .lines
            .iter()
            .flat_map(|l| l.spans.iter())
            .map(|s| page_top - s.top())
            .fold(f32::INFINITY, f32::min);
        let text = self
            .lines
            .into_iter()
            .map(|l| TextLine::from_spans(l.spans).text())
            .collect::<Vec<_>>()
            .join("\n");
        TextBlock::new(text, top, self.left)
    }
}

/// Group spans (in content order) into blocks.
///
/// Each span joins the most recent block whose last line it continues, or
/// whose next line it starts; otherwise it opens a new block. This keeps
/// column paragraphs together even when the producer interleaves columns
/// inside one text object.
pub fn group_spans_into_blocks(spans: Vec<TextSpan>, page_top: f32) -> Vec<TextBlock> {
    let mut builders: Vec<BlockBuilder> = Vec::new();

    'spans: for span in spans {
        let mut span = span;
        for builder in builders.iter_mut().rev() {
            match builder.push(span) {
                None => continue 'spans,
                Some(rejected) => span = rejected,
            }
        }
        builders.push(BlockBuilder::start(span));
    }

    builders
        .into_iter()
        .map(|b| b.finish(page_top))
        .filter(|b| !b.is_empty())
        .collect()
}

/// Layout analyzer for extracting ordered text blocks from PDF pages.
pub struct LayoutAnalyzer<'a, B: PdfBackend + ?Sized> {
    backend: &'a B,
}

impl<'a, B: PdfBackend + ?Sized> LayoutAnalyzer<'a, B> {
    /// Create a new layout analyzer.
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Extract text blocks from a page, in reading order.
    pub fn extract_page_blocks(&self, page: PageId) -> Result<Vec<TextBlock>> {
        let spans = self.extract_page_spans(page)?;
        let mut blocks = group_spans_into_blocks(spans, self.backend.page_top(page));
        sort_blocks(&mut blocks);
        Ok(blocks)
    }

    /// Extract positioned text spans from a page, in content order.
    pub fn extract_page_spans(&self, page: PageId) -> Result<Vec<TextSpan>> {
        let content = self.backend.page_content(page)?;
        if content.is_empty() {
            return Ok(Vec::new());
        }
        let ops = self.backend.decode_content(&content)?;
        Ok(self.interpret(page, &ops))
    }

    /// Run content stream operations and collect the text they show.
    fn interpret(&self, page: PageId, ops: &[ContentOp]) -> Vec<TextSpan> {
        let mut state = TextState::default();
        let mut spans = Vec::new();
        self.run(page, ops, &mut state, &mut spans, 0);
        spans
    }

    fn run(
        &self,
        page: PageId,
        ops: &[ContentOp],
        state: &mut TextState,
        spans: &mut Vec<TextSpan>,
        depth: usize,
    ) {
        for op in ops {
            let nums: Vec<f32> = op.operands.iter().filter_map(get_number_from_value).collect();
            match op.operator.as_str() {
                "q" => state.save(),
                "Q" => state.restore(),
                "cm" if nums.len() >= 6 => {
                    state.ctm = Matrix::new(nums[0], nums[1], nums[2], nums[3], nums[4], nums[5])
                        .multiply(&state.ctm);
                }
                "BT" => {
                    state.in_text = true;
                    state.tm = Matrix::IDENTITY;
                    state.tlm = Matrix::IDENTITY;
                }
                "ET" => state.in_text = false,
                "Tf" if op.operands.len() >= 2 => {
                    if let PdfValue::Name(name) = &op.operands[0] {
                        state.font = name.clone();
                    }
                    state.font_size = get_number_from_value(&op.operands[1]).unwrap_or(12.0);
                }
                "TL" if !nums.is_empty() => state.leading = nums[0],
                "Td" if nums.len() >= 2 => state.move_line(nums[0], nums[1]),
                "TD" if nums.len() >= 2 => {
                    state.leading = -nums[1];
                    state.move_line(nums[0], nums[1]);
                }
                "Tm" if nums.len() >= 6 => {
                    state.tlm = Matrix::new(nums[0], nums[1], nums[2], nums[3], nums[4], nums[5]);
                    state.tm = state.tlm;
                }
                "T*" => state.next_line(),
                "Tj" => {
                    if let Some(PdfValue::Str(bytes)) = op.operands.first() {
                        let text = self.backend.decode_text(page, &state.font, bytes);
                        let advance = state.advance_for(&text);
                        self.show(state, text, advance, spans);
                    }
                }
                "TJ" => {
                    if let Some(PdfValue::Array(items)) = op.operands.first() {
                        let (text, advance) = self.decode_tj(page, state, items);
                        self.show(state, text, advance, spans);
                    }
                }
                "'" | "\"" => {
                    state.next_line();
                    let text_idx = if op.operator == "\"" { 2 } else { 0 };
                    if let Some(PdfValue::Str(bytes)) = op.operands.get(text_idx) {
                        let text = self.backend.decode_text(page, &state.font, bytes);
                        let advance = state.advance_for(&text);
                        self.show(state, text, advance, spans);
                    }
                }
                "Do" => {
                    if let Some(PdfValue::Name(name)) = op.operands.first() {
                        if depth >= MAX_FORM_DEPTH {
                            log::warn!(
                                "form XObject nesting too deep; skipping {}",
                                String::from_utf8_lossy(name)
                            );
                        } else if let Some(form) = self.backend.form_xobject(page, name) {
                            self.run_form(page, &form, state, spans, depth + 1);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    /// Interpret a form XObject in a copy of the current state.
    ///
    /// `Do` brackets the form in an implicit `q`/`Q`, so nothing the form
    /// changes leaks back to the caller.
    fn run_form(
        &self,
        page: PageId,
        form: &FormXObject,
        state: &TextState,
        spans: &mut Vec<TextSpan>,
        depth: usize,
    ) {
        let ops = match self.backend.decode_content(&form.content) {
            Ok(ops) => ops,
            Err(e) => {
                log::warn!("Skipping undecodable form XObject: {}", e);
                return;
            }
        };
        let [a, b, c, d, e, f] = form.matrix;
        let mut inner = state.clone();
        inner.ctm = Matrix::new(a, b, c, d, e, f).multiply(&state.ctm);
        inner.saved.clear();
        self.run(page, &ops, &mut inner, spans, depth);
    }

    /// Decode a TJ array, turning large negative adjustments into spaces.
    fn decode_tj(&self, page: PageId, state: &TextState, items: &[PdfValue]) -> (String, f32) {
        let mut combined = String::new();
        let mut advance = 0.0;

        for item in items {
            match item {
                PdfValue::Str(bytes) => {
                    let decoded = self.backend.decode_text(page, &state.font, bytes);
                    advance += state.advance_for(&decoded);
                    combined.push_str(&decoded);
                }
                other => {
                    let Some(n) = get_number_from_value(other) else {
                        continue;
                    };
                    // Negative values move the pen to the right.
                    advance -= n / 1000.0 * state.font_size;
                    if -n > TJ_SPACE_THRESHOLD {
                        if let Some(c) = combined.chars().last() {
                            if !c.is_whitespace() && !is_spaceless_script_char(c) {
                                combined.push(' ');
                            }
                        }
                    }
                }
            }
        }

        (combined, advance)
    }

    /// Record shown text as a span and advance the text matrix.
    fn show(&self, state: &mut TextState, text: String, advance: f32, spans: &mut Vec<TextSpan>) {
        if !state.in_text {
            return;
        }
        let start = state.tm.multiply(&state.ctm);
        state.tm = Matrix::translation(advance, 0.0).multiply(&state.tm);
        let end = state.tm.multiply(&state.ctm);

        if text.trim().is_empty() {
            return;
        }
        let font_size = state.font_size.abs() * start.vertical_scale();
        spans.push(TextSpan::new(
            text,
            start.e,
            start.f,
            (end.e - start.e).abs(),
            font_size,
        ));
    }
}

/// Text and graphics state tracked while interpreting a content stream.
#[derive(Debug, Clone)]
struct TextState {
    ctm: Matrix,
    saved: Vec<Matrix>,
    tm: Matrix,
    tlm: Matrix,
    font: Vec<u8>,
    font_size: f32,
    leading: f32,
    in_text: bool,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            ctm: Matrix::IDENTITY,
            saved: Vec::new(),
            tm: Matrix::IDENTITY,
            tlm: Matrix::IDENTITY,
            font: Vec::new(),
            font_size: 12.0,
            leading: 0.0,
            in_text: false,
        }
    }
}

impl TextState {
    fn save(&mut self) {
        self.saved.push(self.ctm);
    }

    fn restore(&mut self) {
        if let Some(ctm) = self.saved.pop() {
            self.ctm = ctm;
        }
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.tlm = Matrix::translation(tx, ty).multiply(&self.tlm);
        self.tm = self.tlm;
    }

    fn next_line(&mut self) {
        let leading = if self.leading != 0.0 {
            self.leading
        } else {
            self.font_size * 1.2
        };
        self.move_line(0.0, -leading);
    }

    /// Estimated advance of `text` in text space.
    fn advance_for(&self, text: &str) -> f32 {
        text.chars().count() as f32 * AVG_CHAR_WIDTH_EM * self.font_size
    }
}

/// A PDF transformation matrix `[a b c d e f]`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    const IDENTITY: Matrix = Matrix::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    const fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    fn translation(tx: f32, ty: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// `self × other`, in PDF row-vector convention.
    fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

/// Check if character is from a script that doesn't use word spaces.
/// Chinese and Japanese don't use spaces between words, but Korean does.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs
    (0x4E00..=0x9FFF).contains(&code)
    // Extension A
    || (0x3400..=0x4DBF).contains(&code)
    // Extensions B-F
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana, Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::collections::BTreeMap;

    fn texts(blocks: &[TextBlock]) -> Vec<&str> {
        blocks.iter().map(|b| b.text.as_str()).collect()
    }

    #[test]
    fn test_sort_two_column_blocks() {
        let mut blocks = vec![
            TextBlock::new("Right-top", 10.0, 300.0),
            TextBlock::new("Left-top", 10.0, 0.0),
            TextBlock::new("Left-bottom", 50.0, 0.0),
        ];
        sort_blocks(&mut blocks);
        assert_eq!(texts(&blocks), vec!["Left-top", "Right-top", "Left-bottom"]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let mut blocks = vec![
            TextBlock::new("first", 5.0, 5.0),
            TextBlock::new("second", 5.0, 5.0),
        ];
        sort_blocks(&mut blocks);
        assert_eq!(texts(&blocks), vec!["first", "second"]);
    }

    #[test]
    fn test_lower_block_never_precedes_higher_one() {
        let mut blocks = vec![
            TextBlock::new("right column, lower", 200.0, 300.0),
            TextBlock::new("left column, higher", 199.0, 500.0),
        ];
        sort_blocks(&mut blocks);
        assert_eq!(blocks[0].text, "left column, higher");
    }

    #[test]
    fn test_line_text_inserts_spaces_at_gaps() {
        let line = TextLine::from_spans(vec![
            TextSpan::new("World", 50.0, 700.0, 25.0, 10.0),
            TextSpan::new("Hello", 10.0, 700.0, 25.0, 10.0),
        ]);
        assert_eq!(line.text(), "Hello World");
    }

    #[test]
    fn test_line_text_joins_adjacent_fragments() {
        let line = TextLine::from_spans(vec![
            TextSpan::new("Deve", 10.0, 700.0, 20.0, 10.0),
            TextSpan::new("loper", 30.0, 700.0, 25.0, 10.0),
        ]);
        assert_eq!(line.text(), "Developer");
    }

    #[test]
    fn test_line_text_cjk_has_no_spaces() {
        let line = TextLine::from_spans(vec![
            TextSpan::new("東京", 10.0, 700.0, 10.0, 10.0),
            TextSpan::new("大学", 40.0, 700.0, 10.0, 10.0),
        ]);
        assert_eq!(line.text(), "東京大学");
    }

    #[test]
    fn test_group_keeps_columns_apart() {
        // A single text object that alternates between two columns line by line.
        let spans = vec![
            TextSpan::new("Experience", 50.0, 740.0, 50.0, 10.0),
            TextSpan::new("Skills", 350.0, 740.0, 30.0, 10.0),
            TextSpan::new("Acme Corp", 50.0, 728.0, 45.0, 10.0),
            TextSpan::new("Rust", 350.0, 728.0, 20.0, 10.0),
        ];
        let blocks = group_spans_into_blocks(spans, 792.0);
        assert_eq!(texts(&blocks), vec!["Experience\nAcme Corp", "Skills\nRust"]);
        assert!((blocks[0].top - 44.0).abs() < 0.01);
        assert_eq!(blocks[1].left, 350.0);
    }

    #[test]
    fn test_group_splits_distant_paragraphs() {
        let spans = vec![
            TextSpan::new("Summary", 50.0, 740.0, 35.0, 10.0),
            TextSpan::new("Education", 50.0, 600.0, 45.0, 10.0),
        ];
        let blocks = group_spans_into_blocks(spans, 792.0);
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn test_matrix_multiply() {
        let scale = Matrix::new(2.0, 0.0, 0.0, 2.0, 0.0, 0.0);
        let shift = Matrix::translation(10.0, 20.0);
        let m = shift.multiply(&scale);
        assert_eq!((m.e, m.f), (20.0, 40.0));
        assert_eq!(m.vertical_scale(), 2.0);
    }

    /// In-memory backend serving pre-decoded operations.
    struct MockBackend {
        ops: Vec<ContentOp>,
    }

    impl PdfBackend for MockBackend {
        fn pages(&self) -> BTreeMap<u32, PageId> {
            BTreeMap::from([(1, (1, 0))])
        }

        fn page_content(&self, _page: PageId) -> Result<Vec<u8>> {
            Ok(b"mock".to_vec())
        }

        fn decode_content(&self, _data: &[u8]) -> Result<Vec<ContentOp>> {
            Ok(self.ops.clone())
        }

        fn decode_text(&self, _page: PageId, _font: &[u8], bytes: &[u8]) -> String {
            String::from_utf8_lossy(bytes).into_owned()
        }

        fn page_top(&self, _page: PageId) -> f32 {
            800.0
        }

        fn page_link_uris(&self, _page: PageId) -> Result<Vec<String>> {
            Err(Error::PdfParse("unused".into()))
        }
    }

    fn num(v: f32) -> PdfValue {
        PdfValue::Real(v)
    }

    fn text_object(x: f32, y: f32, text: &str) -> Vec<ContentOp> {
        vec![
            ContentOp::new("BT", vec![]),
            ContentOp::new("Tf", vec![PdfValue::Name(b"F1".to_vec()), num(10.0)]),
            ContentOp::new("Td", vec![num(x), num(y)]),
            ContentOp::new("Tj", vec![PdfValue::Str(text.as_bytes().to_vec())]),
            ContentOp::new("ET", vec![]),
        ]
    }

    #[test]
    fn test_page_blocks_in_reading_order() {
        let mut ops = Vec::new();
        ops.extend(text_object(300.0, 780.0, "Right-top"));
        ops.extend(text_object(50.0, 600.0, "Left-bottom"));
        ops.extend(text_object(50.0, 780.0, "Left-top"));
        let backend = MockBackend { ops };

        let blocks = LayoutAnalyzer::new(&backend)
            .extract_page_blocks((1, 0))
            .unwrap();
        assert_eq!(texts(&blocks), vec!["Left-top", "Right-top", "Left-bottom"]);
    }

    #[test]
    fn test_ctm_and_tj_are_applied() {
        let ops = vec![
            ContentOp::new("q", vec![]),
            ContentOp::new("cm", vec![num(1.0), num(0.0), num(0.0), num(1.0), num(100.0), num(0.0)]),
            ContentOp::new("BT", vec![]),
            ContentOp::new("Tf", vec![PdfValue::Name(b"F1".to_vec()), num(10.0)]),
            ContentOp::new("Tm", vec![num(1.0), num(0.0), num(0.0), num(1.0), num(20.0), num(500.0)]),
            ContentOp::new(
                "TJ",
                vec![PdfValue::Array(vec![
                    PdfValue::Str(b"Jane".to_vec()),
                    PdfValue::Integer(-300),
                    PdfValue::Str(b"Doe".to_vec()),
                ])],
            ),
            ContentOp::new("ET", vec![]),
            ContentOp::new("Q", vec![]),
        ];
        let backend = MockBackend { ops };

        let spans = LayoutAnalyzer::new(&backend)
            .extract_page_spans((1, 0))
            .unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "Jane Doe");
        assert_eq!(spans[0].x, 120.0);
        assert_eq!(spans[0].y, 500.0);
    }

    #[test]
    fn test_text_outside_bt_is_ignored() {
        let ops = vec![ContentOp::new("Tj", vec![PdfValue::Str(b"stray".to_vec())])];
        let backend = MockBackend { ops };
        let spans = LayoutAnalyzer::new(&backend)
            .extract_page_spans((1, 0))
            .unwrap();
        assert!(spans.is_empty());
    }

    #[test]
    fn test_t_star_uses_leading() {
        let ops = vec![
            ContentOp::new("BT", vec![]),
            ContentOp::new("Tf", vec![PdfValue::Name(b"F1".to_vec()), num(10.0)]),
            ContentOp::new("TL", vec![num(14.0)]),
            ContentOp::new("Td", vec![num(50.0), num(700.0)]),
            ContentOp::new("Tj", vec![PdfValue::Str(b"Line one".to_vec())]),
            ContentOp::new("T*", vec![]),
            ContentOp::new("Tj", vec![PdfValue::Str(b"Line two".to_vec())]),
            ContentOp::new("ET", vec![]),
        ];
        let backend = MockBackend { ops };
        let blocks = LayoutAnalyzer::new(&backend)
            .extract_page_blocks((1, 0))
            .unwrap();
        assert_eq!(texts(&blocks), vec!["Line one\nLine two"]);
    }

    /// Backend whose page draws form XObjects.
    ///
    /// Content bytes name which op list to return: `page`, `Fm0`, or
    /// `Loop` (a form that draws itself).
    struct FormBackend {
        page_ops: Vec<ContentOp>,
        form_ops: Vec<ContentOp>,
        form_matrix: [f32; 6],
    }

    impl PdfBackend for FormBackend {
        fn pages(&self) -> BTreeMap<u32, PageId> {
            BTreeMap::from([(1, (1, 0))])
        }

        fn page_content(&self, _page: PageId) -> Result<Vec<u8>> {
            Ok(b"page".to_vec())
        }

        fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>> {
            match data {
                b"page" => Ok(self.page_ops.clone()),
                b"Fm0" => Ok(self.form_ops.clone()),
                b"Loop" => {
                    let mut ops = text_object(50.0, 400.0, "again");
                    ops.push(ContentOp::new("Do", vec![PdfValue::Name(b"Loop".to_vec())]));
                    Ok(ops)
                }
                _ => Err(Error::PdfParse("unknown stream".into())),
            }
        }

        fn decode_text(&self, _page: PageId, _font: &[u8], bytes: &[u8]) -> String {
            String::from_utf8_lossy(bytes).into_owned()
        }

        fn page_top(&self, _page: PageId) -> f32 {
            792.0
        }

        fn page_link_uris(&self, _page: PageId) -> Result<Vec<String>> {
            Ok(Vec::new())
        }

        fn form_xobject(&self, _page: PageId, name: &[u8]) -> Option<FormXObject> {
            match name {
                b"Fm0" => Some(FormXObject {
                    matrix: self.form_matrix,
                    content: b"Fm0".to_vec(),
                }),
                b"Loop" => Some(FormXObject {
                    matrix: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
                    content: b"Loop".to_vec(),
                }),
                _ => None,
            }
        }
    }

    fn draw(name: &[u8]) -> ContentOp {
        ContentOp::new("Do", vec![PdfValue::Name(name.to_vec())])
    }

    #[test]
    fn test_form_xobject_text_is_extracted() {
        let backend = FormBackend {
            page_ops: vec![
                ContentOp::new("q", vec![]),
                ContentOp::new("cm", vec![num(1.0), num(0.0), num(0.0), num(1.0), num(0.0), num(-100.0)]),
                draw(b"Fm0"),
                ContentOp::new("Q", vec![]),
                draw(b"Im1"),
            ],
            form_ops: text_object(72.0, 700.0, "Jane Doe"),
            form_matrix: [1.0, 0.0, 0.0, 1.0, 10.0, 0.0],
        };

        let spans = LayoutAnalyzer::new(&backend)
            .extract_page_spans((1, 0))
            .unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "Jane Doe");
        assert_eq!(spans[0].x, 82.0);
        assert_eq!(spans[0].y, 600.0);
    }

    #[test]
    fn test_form_state_does_not_leak() {
        let mut page_ops = vec![
            ContentOp::new("BT", vec![]),
            ContentOp::new("Tf", vec![PdfValue::Name(b"F1".to_vec()), num(10.0)]),
            ContentOp::new("ET", vec![]),
            draw(b"Fm0"),
        ];
        page_ops.extend(vec![
            ContentOp::new("BT", vec![]),
            ContentOp::new("Td", vec![num(50.0), num(300.0)]),
            ContentOp::new("Tj", vec![PdfValue::Str(b"After".to_vec())]),
            ContentOp::new("ET", vec![]),
        ]);
        let backend = FormBackend {
            page_ops,
            form_ops: vec![
                ContentOp::new("cm", vec![num(2.0), num(0.0), num(0.0), num(2.0), num(0.0), num(0.0)]),
                ContentOp::new("BT", vec![]),
                ContentOp::new("Tf", vec![PdfValue::Name(b"F2".to_vec()), num(30.0)]),
                ContentOp::new("Td", vec![num(10.0), num(10.0)]),
                ContentOp::new("Tj", vec![PdfValue::Str(b"Inside".to_vec())]),
                ContentOp::new("ET", vec![]),
            ],
            form_matrix: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
        };

        let spans = LayoutAnalyzer::new(&backend)
            .extract_page_spans((1, 0))
            .unwrap();
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].font_size, 60.0);
        assert_eq!((spans[1].x, spans[1].y), (50.0, 300.0));
        assert_eq!(spans[1].font_size, 10.0);
    }

    #[test]
    fn test_self_referencing_form_terminates() {
        let backend = FormBackend {
            page_ops: vec![draw(b"Loop")],
            form_ops: Vec::new(),
            form_matrix: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
        };

        let spans = LayoutAnalyzer::new(&backend)
            .extract_page_spans((1, 0))
            .unwrap();
        assert_eq!(spans.len(), MAX_FORM_DEPTH);
        assert!(spans.iter().all(|s| s.text == "again"));
    }
}
