//! Hyperlink filtering.

use std::collections::BTreeSet;

/// Set of harvested link URIs. Duplicate-free with a stable iteration order.
pub type LinkSet = BTreeSet<String>;

/// URI schemes kept in the link set.
pub const ALLOWED_LINK_SCHEMES: [&str; 3] = ["http", "https", "mailto"];

/// Whether `uri` uses one of [`ALLOWED_LINK_SCHEMES`].
///
/// The scheme is the text before the first `:`, compared ASCII
/// case-insensitively. Relative references and `javascript:` or `file:`
/// URIs are rejected.
pub fn is_allowed_link(uri: &str) -> bool {
    let Some((scheme, rest)) = uri.split_once(':') else {
        return false;
    };
    !rest.is_empty()
        && ALLOWED_LINK_SCHEMES
            .iter()
            .any(|allowed| scheme.eq_ignore_ascii_case(allowed))
}
