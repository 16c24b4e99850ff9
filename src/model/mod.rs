//! Result model for résumé extraction.
//!
//! A run produces either a [`ParseResult`] or an [`ErrorResult`]; the
//! [`ParseOutput`] enum carries whichever one it was to the caller.

mod link;
mod result;

pub use link::{is_allowed_link, LinkSet, ALLOWED_LINK_SCHEMES};
pub use result::{ErrorResult, ParseOutput, ParseResult};
