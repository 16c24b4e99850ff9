//! Contact metadata harvested from cleaned text.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").unwrap())
}

/// Collect the distinct email addresses found in `text`.
///
/// Deduplication is exact: `a@b.com` and `A@B.COM` are two entries.
///
/// # Example
///
/// ```
/// use unresume::render::harvest_emails;
///
/// let emails = harvest_emails("jane@example.com, jane@example.com");
/// assert_eq!(emails.len(), 1);
/// ```
pub fn harvest_emails(text: &str) -> BTreeSet<String> {
    email_regex()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}
