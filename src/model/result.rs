//! Final result records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::LinkSet;
use std::collections::BTreeSet;

/// Successful extraction of a résumé.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    /// Cleaned text
    pub text: String,

    /// Hyperlinks found in the document (no duplicates, order not significant)
    pub links: Vec<String>,

    /// Email addresses found in the cleaned text (no duplicates)
    pub emails: Vec<String>,

    /// Number of characters in `text`
    pub length: usize,

    /// When extraction completed
    pub timestamp: DateTime<Utc>,
}

impl ParseResult {
    /// Assemble a result stamped with the current time.
    ///
    /// `length` is always derived from `text`.
    pub fn new(text: String, links: LinkSet, emails: BTreeSet<String>) -> Self {
        Self::with_timestamp(text, links, emails, Utc::now())
    }

    /// Assemble a result with an explicit completion time.
    pub fn with_timestamp(
        text: String,
        links: LinkSet,
        emails: BTreeSet<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let length = text.chars().count();
        Self {
            text,
            links: links.into_iter().collect(),
            emails: emails.into_iter().collect(),
            length,
            timestamp,
        }
    }

    /// Check whether any text was extracted.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// A run that could not proceed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResult {
    /// Human-readable reason
    pub error: String,
}

impl ErrorResult {
    /// Create an error result from a message.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

impl From<&Error> for ErrorResult {
    fn from(err: &Error) -> Self {
        Self::new(err.to_string())
    }
}

/// The single payload emitted per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParseOutput {
    /// Extraction completed
    Parsed(ParseResult),
    /// Extraction did not run
    Failed(ErrorResult),
}

impl ParseOutput {
    /// Check if this output carries an error.
    pub fn is_error(&self) -> bool {
        matches!(self, ParseOutput::Failed(_))
    }
}

impl From<ParseResult> for ParseOutput {
    fn from(parsed: ParseResult) -> Self {
        ParseOutput::Parsed(parsed)
    }
}

impl From<Result<ParseResult>> for ParseOutput {
    fn from(result: Result<ParseResult>) -> Self {
        match result {
            Ok(parsed) => ParseOutput::Parsed(parsed),
            Err(err) => ParseOutput::Failed(ErrorResult::from(&err)),
        }
    }
}
