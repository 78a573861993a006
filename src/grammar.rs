//! Citation grammar: split text into a book token, up to four positional
//! numbers, and whatever compound segment follows the next comma.
//!
//! The numbers are positional only. Whether the first one is a chapter or a
//! verse depends on the book and on the preceding segment, which is the
//! parser's business.
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::error::CitationError;
use crate::types::Bounds;

/// A segment that names its book: `<book> <n>:<n> - <n>:<n>, <rest>`.
/// Matches a prefix; trailing text that isn't a comma segment is ignored.
static FULL: LazyLock<Regex> = LazyLock::new(|| {
    return Regex::new(
        r"^\s*(?<book>\d?\s*[A-Za-z][A-Za-z\s]*)\s*(?<from_chapter>\d+)?(?<from_colon>:)?(?<from_verse>\d+)?\s*-?\s*(?<to_chapter>\d+)?(?<to_colon>:)?(?<to_verse>\d+)?\s*(?<rest>,.+)?",
    )
    .expect("valid regex");
});

/// A continuation segment that inherits its book: `<n>:<n> - <n>:<n>, <rest>`.
static CONTINUATION: LazyLock<Regex> = LazyLock::new(|| {
    return Regex::new(
        r"^\s*(?<from_chapter>\d+)(?<from_colon>:)?(?<from_verse>\d+)?\s*-?\s*(?<to_chapter>\d+)?(?<to_colon>:)?(?<to_verse>\d+)?\s*(?<rest>,.+)?$",
    )
    .expect("valid regex");
});

/// One tokenized segment of a citation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'t> {
    /// Book token, trimmed. `None` for continuation segments.
    pub book: Option<&'t str>,
    /// Whether a `:` separator appeared in this segment.
    pub has_colon: bool,
    /// Text after the comma that ends this segment, with the comma and
    /// leading whitespace stripped.
    pub rest: Option<&'t str>,
    /// The four numbers in the order written.
    pub slots: Bounds,
}

/// Tokenize a segment that starts with a book name.
///
/// Returns `Ok(None)` when the text doesn't start with a book token.
///
/// # Errors
///
/// Returns `CitationError::MalformedInput` for a verse without a chapter
/// or a number too large to be a chapter or verse.
///
/// # Panics
///
/// Panics if the hardcoded grammar regex is invalid (compile-time invariant).
pub fn full(text: &str) -> Result<Option<Segment<'_>>, CitationError> {
    let Some(cap) = FULL.captures(text) else {
        return Ok(None);
    };
    let book = cap.name("book").map(|m| return m.as_str().trim());
    return segment_from_captures(text, &cap, book).map(Some);
}

/// Tokenize a continuation segment, one that starts directly with a number.
///
/// Returns `Ok(None)` when the text isn't shaped like a continuation.
///
/// # Errors
///
/// Same as [`full`].
///
/// # Panics
///
/// Panics if the hardcoded grammar regex is invalid (compile-time invariant).
pub fn continuation(text: &str) -> Result<Option<Segment<'_>>, CitationError> {
    let Some(cap) = CONTINUATION.captures(text) else {
        return Ok(None);
    };
    return segment_from_captures(text, &cap, None).map(Some);
}

/// Convert captures into a segment, checking the numbers as we go.
///
/// # Errors
///
/// Returns `CitationError::MalformedInput` if a verse has no chapter before
/// it or a number overflows.
fn segment_from_captures<'t>(
    text: &'t str,
    cap: &Captures<'t>,
    book: Option<&'t str>,
) -> Result<Segment<'t>, CitationError> {
    let slots = Bounds {
        from_chapter: number(text, cap, "from_chapter")?,
        from_verse: number(text, cap, "from_verse")?,
        to_chapter: number(text, cap, "to_chapter")?,
        to_verse: number(text, cap, "to_verse")?,
    };

    // "Genesis :5" and "Genesis 1-:5" name a verse of no chapter.
    if (slots.from_verse.is_some() && slots.from_chapter.is_none())
        || (slots.to_verse.is_some() && slots.to_chapter.is_none())
    {
        return Err(CitationError::malformed(text));
    }

    let has_colon = cap.name("from_colon").is_some() || cap.name("to_colon").is_some();
    let rest = cap
        .name("rest")
        .map(|m| return m.as_str().trim_start_matches(',').trim_start());

    return Ok(Segment {
        book,
        has_colon,
        rest,
        slots,
    });
}

/// Read one named numeric group.
///
/// # Errors
///
/// Returns `CitationError::MalformedInput` if the digits don't fit in a `u32`.
fn number(text: &str, cap: &Captures<'_>, group: &str) -> Result<Option<u32>, CitationError> {
    let Some(digits) = cap.name(group) else {
        return Ok(None);
    };
    return digits
        .as_str()
        .parse::<u32>()
        .map(Some)
        .map_err(|_err| return CitationError::malformed(text));
}
