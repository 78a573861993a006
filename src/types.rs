//! Core value types shared by the parser, the references, and the canon.
use std::fmt;

/// Canonical identifier of a book, such as `genesis` or `1_john`.
/// Newtype prevents mixing with display names and raw book tokens.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct BookId(
    /// The lowercase key as it appears in the canon.
    pub String,
);

impl BookId {
    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        return &self.0;
    }

    /// Wrap a key without checking it against any canon.
    pub fn new(key: impl Into<String>) -> Self {
        return Self(key.into());
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f.write_str(&self.0);
    }
}

impl From<&str> for BookId {
    fn from(key: &str) -> Self {
        return Self(key.to_string());
    }
}

/// The four optional numbers of a range, before defaults are applied.
///
/// The grammar fills these positionally; the parser then moves them into
/// their real meaning before they reach [`crate::Reference::new`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bounds {
    /// First chapter of the range.
    pub from_chapter: Option<u32>,
    /// First verse of the range.
    pub from_verse: Option<u32>,
    /// Last chapter of the range.
    pub to_chapter: Option<u32>,
    /// Last verse of the range.
    pub to_verse: Option<u32>,
}

impl Bounds {
    /// A whole chapter.
    pub const fn chapter(chapter: u32) -> Self {
        return Self {
            from_chapter: Some(chapter),
            from_verse: None,
            to_chapter: None,
            to_verse: None,
        };
    }

    /// A span from `from_chapter:from_verse` to `to_chapter:to_verse`.
    pub const fn span(from: (u32, u32), to: (u32, u32)) -> Self {
        return Self {
            from_chapter: Some(from.0),
            from_verse: Some(from.1),
            to_chapter: Some(to.0),
            to_verse: Some(to.1),
        };
    }

    /// A single verse, `chapter:verse`.
    pub const fn verse(chapter: u32, verse: u32) -> Self {
        return Self {
            from_chapter: Some(chapter),
            from_verse: Some(verse),
            to_chapter: None,
            to_verse: None,
        };
    }
}

/// Controls how validation failures surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Return the first failure as an `Err` (`true`), or record it on the
    /// returned value and leave it to the caller to check validity (`false`).
    pub raise_errors: bool,
}

impl Options {
    /// Options that record failures instead of returning them.
    pub const fn lenient() -> Self {
        return Self { raise_errors: false };
    }
}

impl Default for Options {
    fn default() -> Self {
        return Self { raise_errors: true };
    }
}

/// The five attributes that define a reference's identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
pub struct Attributes {
    /// Canonical book id.
    pub book: BookId,
    /// First chapter of the range.
    pub from_chapter: u32,
    /// First verse of the range.
    pub from_verse: u32,
    /// Last chapter of the range.
    pub to_chapter: u32,
    /// Last verse of the range.
    pub to_verse: u32,
}
