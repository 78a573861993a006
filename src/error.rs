//! Crate-level error types for citation parsing and canon loading.
use std::path::PathBuf;

use crate::types::BookId;

/// The five ways a citation can be wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The book token does not name a known book.
    InvalidBookName,
    /// A chapter is out of range, or a chapter was given where the book has none.
    InvalidChapter,
    /// The end of the range precedes its start.
    InvalidRange,
    /// A verse is out of range for its chapter.
    InvalidVerse,
    /// The text does not match the citation grammar at all.
    MalformedInput,
}

/// Why a citation or a structured reference was rejected.
///
/// Cloneable so that lenient parsing can keep the error on the rejected
/// reference instead of returning it. Messages name the book and the
/// offending number so they can be shown to a reader as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CitationError {
    /// The book token could not be resolved to a book id.
    #[error("{name} is not a valid book")]
    InvalidBookName {
        /// The book token as written.
        name: String,
    },

    /// A chapter number outside `1..=chapter_count`.
    #[error("{book} doesn't have a chapter {chapter}")]
    InvalidChapter {
        /// Display name of the book.
        book: String,
        /// The offending chapter number.
        chapter: u32,
        /// Number of chapters the book actually has.
        chapter_count: u32,
    },

    /// A verse number outside `1..=verse_count` for its chapter.
    #[error("{book} {chapter} doesn't have a verse {verse}")]
    InvalidVerse {
        /// Display name of the book.
        book: String,
        /// Chapter the verse was looked up in.
        chapter: u32,
        /// The offending verse number.
        verse: u32,
        /// Number of verses the chapter actually has.
        verse_count: u32,
    },

    /// The text does not match the citation grammar.
    #[error("{input} is not a valid reference")]
    MalformedInput {
        /// The text that failed to match.
        input: String,
    },

    /// A chapter separator was used in a book that has a single chapter.
    #[error("{book} doesn't have any chapters")]
    NoChapters {
        /// Display name of the single-chapter book.
        book: String,
    },

    /// The closing chapter comes before the opening chapter.
    #[error("to_chapter cannot be before from_chapter")]
    ToChapterBeforeFromChapter {
        /// Opening chapter of the range.
        from_chapter: u32,
        /// Closing chapter of the range.
        to_chapter: u32,
    },

    /// Within one chapter, the closing verse comes before the opening verse.
    #[error("to_verse cannot be before from_verse")]
    ToVerseBeforeFromVerse {
        /// Opening verse of the range.
        from_verse: u32,
        /// Closing verse of the range.
        to_verse: u32,
    },

    /// The book id is not known to the metadata provider.
    #[error("unknown book id `{book}`")]
    UnknownBook {
        /// The id that had no metadata.
        book: BookId,
    },
}

impl CitationError {
    /// Which of the five citation error categories this belongs to.
    pub const fn kind(&self) -> ErrorKind {
        return match self {
            Self::MalformedInput { .. } => ErrorKind::MalformedInput,
            Self::InvalidBookName { .. } | Self::UnknownBook { .. } => ErrorKind::InvalidBookName,
            Self::InvalidChapter { .. } | Self::NoChapters { .. } => ErrorKind::InvalidChapter,
            Self::InvalidVerse { .. } => ErrorKind::InvalidVerse,
            Self::ToChapterBeforeFromChapter { .. } | Self::ToVerseBeforeFromVerse { .. } => {
                ErrorKind::InvalidRange
            },
        };
    }

    /// Shorthand for a [`CitationError::MalformedInput`] on `input`.
    /// Blank input is shown as `""` so the message never starts with a space.
    pub(crate) fn malformed(input: &str) -> Self {
        let trimmed = input.trim();
        let input = if trimmed.is_empty() { "\"\"" } else { trimmed };
        return Self::MalformedInput {
            input: input.to_string(),
        };
    }
}

/// Errors from the binary and from loading canons and configuration.
#[allow(clippy::error_impl_error, reason = "crate-level error type")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A custom canon file is structurally unusable.
    #[error("canon corrupt: {reason}")]
    CanonCorrupt {
        /// Description of what is wrong with the canon.
        reason: String,
    },

    /// A configured canon file does not exist on disk.
    #[error("canon not found: {}", path.display())]
    CanonNotFound {
        /// Path to the missing canon file.
        path: PathBuf,
    },

    /// A citation failed to parse or validate.
    #[error(transparent)]
    Citation(
        /// The wrapped citation error.
        #[from]
        CitationError,
    ),

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// JSON serialization of command output failed.
    #[error("json: {0}")]
    Json(
        /// The wrapped JSON error.
        #[from]
        serde_json::Error,
    ),

    /// TOML deserialization failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// A configured alias points at a book key the canon does not contain.
    #[error("alias `{alias}` points at unknown book `{key}`")]
    UnknownAliasTarget {
        /// The alias as written in the config.
        alias: String,
        /// The book key it was meant to resolve to.
        key: String,
    },
}
