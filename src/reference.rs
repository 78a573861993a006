//! A validated contiguous verse range within one book.
use std::fmt;

use crate::canon::BookData;
use crate::error::CitationError;
use crate::types::{Attributes, BookId, Bounds, Options};

/// One contiguous range of verses in one book.
///
/// Built only through [`Reference::new`], which applies the defaults and
/// runs the bounds checks in a fixed order: from-chapter, from-verse,
/// to-chapter, to-verse. Each check relies on the earlier fields being in
/// range. A reference that failed a check keeps the numbers it was given
/// and carries the first failure; it renders as nothing.
#[derive(Debug, Clone)]
pub struct Reference {
    /// Canonical book id.
    book: BookId,
    /// Display name, cached from the metadata provider.
    book_name: String,
    /// Chapter count of the book.
    chapter_count: u32,
    /// First failed check, if any.
    error: Option<CitationError>,
    /// Whether `from_chapter` was written rather than defaulted.
    explicit_chapter: bool,
    /// Whether `from_verse` was written rather than defaulted.
    explicit_verse: bool,
    /// First chapter of the range.
    from_chapter: u32,
    /// First verse of the range.
    from_verse: u32,
    /// Last chapter of the range.
    to_chapter: u32,
    /// Verse count of `to_chapter`, zero when that chapter doesn't exist.
    to_chapter_verses: u32,
    /// Last verse of the range.
    to_verse: u32,
}

impl Reference {
    /// The five attributes that define this reference.
    pub fn attributes(&self) -> Attributes {
        return Attributes {
            book: self.book.clone(),
            from_chapter: self.from_chapter,
            from_verse: self.from_verse,
            to_chapter: self.to_chapter,
            to_verse: self.to_verse,
        };
    }

    /// Canonical book id.
    pub const fn book(&self) -> &BookId {
        return &self.book;
    }

    /// Display name of the book.
    pub fn book_name(&self) -> &str {
        return &self.book_name;
    }

    /// Number of chapters in the book.
    pub const fn chapter_count(&self) -> u32 {
        return self.chapter_count;
    }

    /// `" 1:1-2:3"` style span. Whole chapters drop their verses unless
    /// `spell_out_verses` is set.
    fn chapter_span(&self, spell_out_verses: bool) -> String {
        let verses_implied = self.whole_chapters() && !spell_out_verses;
        let mut out = format!(" {}", self.from_chapter);
        if !verses_implied {
            out.push(':');
            out.push_str(&self.from_verse.to_string());
        }

        if self.from_chapter == self.to_chapter {
            if !verses_implied && self.to_verse != self.from_verse {
                out.push('-');
                out.push_str(&self.to_verse.to_string());
            }
        } else {
            out.push('-');
            out.push_str(&self.to_chapter.to_string());
            if !verses_implied {
                out.push(':');
                out.push_str(&self.to_verse.to_string());
            }
        }
        return out;
    }

    /// Run the four range checks in assignment order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns `InvalidChapter`, `InvalidVerse`, or one of the two range-order
    /// errors for the first field out of bounds.
    fn check_bounds(&self, data: &dyn BookData, bounds: &Bounds) -> Result<(), CitationError> {
        if let Some(chapter) = bounds.from_chapter {
            self.check_chapter(chapter)?;
        }

        if let Some(verse) = bounds.from_verse {
            self.check_verse(data, self.from_chapter, verse)?;
        }

        if self.to_chapter < self.from_chapter {
            return Err(CitationError::ToChapterBeforeFromChapter {
                from_chapter: self.from_chapter,
                to_chapter: self.to_chapter,
            });
        }
        self.check_chapter(self.to_chapter)?;

        // Verses of different chapters are never compared.
        if self.to_verse < self.from_verse && self.from_chapter == self.to_chapter {
            return Err(CitationError::ToVerseBeforeFromVerse {
                from_verse: self.from_verse,
                to_verse: self.to_verse,
            });
        }
        return self.check_verse(data, self.to_chapter, self.to_verse);
    }

    /// Check that `chapter` exists in this book.
    ///
    /// # Errors
    ///
    /// Returns `CitationError::InvalidChapter` when it doesn't.
    fn check_chapter(&self, chapter: u32) -> Result<(), CitationError> {
        if chapter < 1 || chapter > self.chapter_count {
            return Err(CitationError::InvalidChapter {
                book: self.book_name.clone(),
                chapter,
                chapter_count: self.chapter_count,
            });
        }
        return Ok(());
    }

    /// Check that `verse` exists in `chapter` of this book.
    ///
    /// # Errors
    ///
    /// Returns `CitationError::InvalidVerse` when it doesn't.
    fn check_verse(&self, data: &dyn BookData, chapter: u32, verse: u32) -> Result<(), CitationError> {
        let verse_count = data.verse_count(&self.book, chapter).unwrap_or(0);
        if verse < 1 || verse > verse_count {
            return Err(CitationError::InvalidVerse {
                book: self.book_name.clone(),
                chapter,
                verse,
                verse_count,
            });
        }
        return Ok(());
    }

    /// The first failed check, if this reference is invalid.
    pub const fn error(&self) -> Option<&CitationError> {
        return self.error.as_ref();
    }

    /// First chapter of the range.
    pub const fn from_chapter(&self) -> u32 {
        return self.from_chapter;
    }

    /// First verse of the range.
    pub const fn from_verse(&self) -> u32 {
        return self.from_verse;
    }

    /// The chapter a following segment without its own chapter continues in.
    ///
    /// Only a reference that named a verse hands on a chapter; one that
    /// cites whole chapters ("Genesis 1, 3") hands on just its book.
    pub(crate) const fn inherited_chapter(&self) -> Option<u32> {
        if self.explicit_verse {
            return Some(self.to_chapter);
        }
        return None;
    }

    /// Whether the book was addressed by chapter, i.e. `from_chapter` was written.
    pub const fn is_chapter_explicit(&self) -> bool {
        return self.explicit_chapter;
    }

    /// Books with one chapter are cited by verse alone.
    const fn is_single_chapter_book(&self) -> bool {
        return self.chapter_count == 1;
    }

    /// Whether no check failed.
    pub const fn is_valid(&self) -> bool {
        return self.error.is_none();
    }

    /// Build a reference from a book id and up to four numbers.
    ///
    /// Defaults: `from_chapter` 1 and `from_verse` 1. `to_chapter` is the
    /// given `from_chapter`, or the book's last chapter when no chapter was
    /// given at all. `to_verse` is the given `from_verse` (unless a later
    /// `to_chapter` was given), otherwise the last verse of `to_chapter`.
    ///
    /// A `from_verse` without any chapter still leaves `to_chapter` at the
    /// last chapter: in Genesis, verse 3 alone is 1:3 to 50:3. The parser
    /// never produces such bounds for a book with chapters.
    ///
    /// # Errors
    ///
    /// Returns `CitationError::UnknownBook` if `data` has no such book.
    /// With `options.raise_errors`, also returns the first failed bounds
    /// check; otherwise that failure is stored on the returned reference.
    pub fn new(
        data: &dyn BookData,
        book: &BookId,
        bounds: Bounds,
        options: Options,
    ) -> Result<Self, CitationError> {
        let (Some(book_name), Some(chapter_count)) = (data.book_name(book), data.chapter_count(book))
        else {
            return Err(CitationError::UnknownBook { book: book.clone() });
        };

        let from_chapter = bounds.from_chapter.unwrap_or(1);
        let from_verse = bounds.from_verse.unwrap_or(1);
        let to_chapter = bounds.to_chapter.or(bounds.from_chapter).unwrap_or(chapter_count);
        let to_chapter_verses = data.verse_count(book, to_chapter).unwrap_or(0);
        let runs_past_from_chapter = bounds.to_chapter.is_some() && to_chapter > from_chapter;
        let to_verse = bounds
            .to_verse
            .or(if runs_past_from_chapter { None } else { bounds.from_verse })
            .unwrap_or(to_chapter_verses);

        let mut reference = Self {
            book: book.clone(),
            book_name: book_name.to_string(),
            chapter_count,
            error: None,
            explicit_chapter: bounds.from_chapter.is_some(),
            explicit_verse: bounds.from_verse.is_some(),
            from_chapter,
            from_verse,
            to_chapter,
            to_chapter_verses,
            to_verse,
        };

        if let Err(e) = reference.check_bounds(data, &bounds) {
            tracing::trace!(book = %book, error = %e, "reference failed validation");
            if options.raise_errors {
                return Err(e);
            }
            reference.error = Some(e);
        }
        return Ok(reference);
    }

    /// Render as a comma continuation of `parent`, returning the text and
    /// whether it names an opening verse. The book name is omitted when it
    /// is the parent's book.
    ///
    /// `after_verse` says whether the text before this entry named a verse.
    /// A bare number there reads as a verse, so whole chapters must spell
    /// out their verses.
    pub(crate) fn render_continuation(&self, parent: &Self, after_verse: bool) -> (String, bool) {
        let mut out = String::from(",");
        if self.book != parent.book || self.whole_book() {
            out.push(' ');
            out.push_str(&self.render_root());
            return (out, !self.whole_chapters());
        }
        if self.is_single_chapter_book() {
            out.push_str(&self.verse_span());
            return (out, !self.whole_chapters());
        }
        out.push_str(&self.chapter_span(after_verse));
        return (out, after_verse || !self.whole_chapters());
    }

    /// Render with the book name, as the first entry of a citation.
    pub(crate) fn render_root(&self) -> String {
        let mut out = self.book_name.clone();
        if self.is_single_chapter_book() {
            out.push_str(&self.verse_span());
        } else if !self.whole_book() {
            out.push_str(&self.chapter_span(false));
        }
        return out;
    }

    /// Whether the root rendering names an opening verse.
    pub(crate) const fn renders_opening_verse(&self) -> bool {
        return !self.whole_chapters();
    }

    /// Last chapter of the range.
    pub const fn to_chapter(&self) -> u32 {
        return self.to_chapter;
    }

    /// Canonical citation text, or `None` if the reference is invalid.
    pub fn to_citation(&self) -> Option<String> {
        if !self.is_valid() {
            return None;
        }
        return Some(self.render_root());
    }

    /// Last verse of the range.
    pub const fn to_verse(&self) -> u32 {
        return self.to_verse;
    }

    /// `" 3-5"` style span for books without chapters.
    fn verse_span(&self) -> String {
        if self.whole_chapters() {
            return String::new();
        }
        if self.from_verse == self.to_verse {
            return format!(" {}", self.from_verse);
        }
        return format!(" {}-{}", self.from_verse, self.to_verse);
    }

    /// Every verse of the book.
    pub const fn whole_book(&self) -> bool {
        return self.from_chapter == 1
            && self.from_verse == 1
            && self.to_chapter == self.chapter_count
            && self.to_verse == self.to_chapter_verses;
    }

    /// Exactly one complete chapter.
    pub const fn whole_chapter(&self) -> bool {
        return self.whole_chapters() && self.from_chapter == self.to_chapter;
    }

    /// Starts at verse 1 and ends on the last verse of its last chapter.
    pub const fn whole_chapters(&self) -> bool {
        return self.from_verse == 1 && self.to_verse == self.to_chapter_verses;
    }
}

impl PartialEq for Reference {
    /// Compare the five defining attributes; validity flags are not identity.
    fn eq(&self, other: &Self) -> bool {
        return self.book == other.book
            && self.from_chapter == other.from_chapter
            && self.from_verse == other.from_verse
            && self.to_chapter == other.to_chapter
            && self.to_verse == other.to_verse;
    }
}

impl Eq for Reference {}

impl fmt::Display for Reference {
    /// Writes the canonical citation, or nothing for an invalid reference.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return Ok(());
        }
        return f.write_str(&self.render_root());
    }
}
