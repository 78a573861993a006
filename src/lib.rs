//! Parse, validate, and render scripture citations.
//!
//! ```
//! let passage = passage::parse("gen 1:1-3, 2:4, ex 3").unwrap();
//! assert_eq!(passage.to_string(), "Genesis 1:1-3, 2:4, Exodus 3");
//! ```
//!
//! A citation is split into segments at commas. Each segment becomes one
//! [`Reference`]; a segment that leaves out its book (or its chapter) takes
//! it from the segment before. The result is a [`Passage`].

pub mod canon;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod grammar;
pub mod parser;
pub mod passage;
pub mod reference;
pub mod resolver;
pub mod types;

pub use crate::canon::{Book, BookData, Canon};
pub use crate::config::Config;
pub use crate::error::{CitationError, Error, ErrorKind};
pub use crate::parser::Parser;
pub use crate::passage::Passage;
pub use crate::reference::Reference;
pub use crate::resolver::BookNames;
pub use crate::types::{Attributes, BookId, Bounds, Options};

/// Parse against the bundled canon, failing on the first error.
///
/// # Errors
///
/// Returns the first `CitationError` encountered; see [`Parser::parse`].
pub fn parse(text: &str) -> Result<Passage, CitationError> {
    return parse_with(text, Options::default());
}

/// Parse against the bundled canon with an explicit error policy.
///
/// # Errors
///
/// With `options.raise_errors` set, returns the first `CitationError`.
/// Otherwise never fails; problems are recorded on the passage.
pub fn parse_with(text: &str, options: Options) -> Result<Passage, CitationError> {
    return Parser::with_canon(Canon::standard(), options).parse(text);
}
