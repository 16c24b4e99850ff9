//! Text cleanup for downstream (LLM / NLP) consumption.
//!
//! The default pipeline is deterministic and idempotent:
//! `clean(&clean(x)) == clean(x)` for every input.

use regex::Regex;
use unicode_general_category::{get_general_category, GeneralCategory};

/// Glyph substitutions applied before the printable filter.
///
/// Both source code points live in the Private Use Area, so they would be
/// stripped if the filter ran first.
const ARTIFACT_MAP: [(char, &str); 2] = [
    ('\u{F0B7}', "\u{2022}"), // Symbol-font bullet -> •
    ('\u{F02D}', "-"),        // Symbol-font hyphen -> -
];

/// Options for text cleanup.
#[derive(Debug, Clone)]
pub struct CleanupOptions {
    /// Replace private-use bullet / hyphen glyphs with their meaning
    pub fix_artifacts: bool,

    /// Remove non-printable characters (newline, tab and CR are kept)
    pub strip_unprintable: bool,

    /// Collapse runs of ASCII spaces into a single space
    pub collapse_spaces: bool,

    /// Trim leading and trailing whitespace
    pub trim: bool,
}

impl CleanupOptions {
    /// All rules enabled.
    pub fn standard() -> Self {
        Self {
            fix_artifacts: true,
            strip_unprintable: true,
            collapse_spaces: true,
            trim: true,
        }
    }

    /// No rules enabled; text passes through untouched.
    pub fn none() -> Self {
        Self {
            fix_artifacts: false,
            strip_unprintable: false,
            collapse_spaces: false,
            trim: false,
        }
    }
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self::standard()
    }
}

/// Text cleanup pipeline.
pub struct CleanupPipeline {
    options: CleanupOptions,
    space_run_regex: Regex,
}

impl CleanupPipeline {
    /// Create a new cleanup pipeline with the given options.
    pub fn new(options: CleanupOptions) -> Self {
        Self {
            options,
            space_run_regex: Regex::new(r" {2,}").unwrap(),
        }
    }

    /// Options this pipeline was built with.
    pub fn options(&self) -> &CleanupOptions {
        &self.options
    }

    /// Process text through the cleanup pipeline.
    pub fn process(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        let mut result = text.to_string();

        if self.options.fix_artifacts {
            result = fix_artifacts(&result);
        }

        if self.options.strip_unprintable {
            result = result
                .chars()
                .filter(|&c| matches!(c, '\n' | '\t' | '\r') || is_printable(c))
                .collect();
        }

        // Tabs and newlines are left alone; only ASCII space runs collapse.
        if self.options.collapse_spaces {
            result = self.space_run_regex.replace_all(&result, " ").into_owned();
        }

        if self.options.trim {
            result = result.trim().to_string();
        }

        result
    }
}

impl Default for CleanupPipeline {
    fn default() -> Self {
        Self::new(CleanupOptions::default())
    }
}

/// Clean extracted text with the standard rules.
///
/// # Example
///
/// ```
/// use unresume::render::clean;
///
/// assert_eq!(clean("  Hello    World \n"), "Hello World");
/// assert_eq!(clean("\u{F0B7} Rust"), "\u{2022} Rust");
/// ```
pub fn clean(text: &str) -> String {
    CleanupPipeline::default().process(text)
}

fn fix_artifacts(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match ARTIFACT_MAP.iter().find(|(from, _)| *from == c) {
            Some((_, to)) => out.push_str(to),
            None => out.push(c),
        }
    }
    out
}

/// Whether `c` renders as a visible glyph or the ASCII space.
///
/// Non-printable: controls (Cc), format characters (Cf), surrogates (Cs),
/// private use (Co), unassigned code points and noncharacters (Cn), and
/// every separator except U+0020 (Zs/Zl/Zp).
pub fn is_printable(c: char) -> bool {
    if c == ' ' {
        return true;
    }
    !matches!(
        get_general_category(c),
        GeneralCategory::Control
            | GeneralCategory::Format
            | GeneralCategory::Surrogate
            | GeneralCategory::PrivateUse
            | GeneralCategory::Unassigned
            | GeneralCategory::SpaceSeparator
            | GeneralCategory::LineSeparator
            | GeneralCategory::ParagraphSeparator
    )
}
