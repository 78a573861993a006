//! Citation parser: turn text into a [`Passage`].
//!
//! The grammar only splits text into positional numbers. This module decides
//! what those numbers mean: in a one-chapter book every number is a verse;
//! in a continuation segment the first number may be a verse of the chapter
//! the previous segment ended in.

use crate::canon::{BookData, Canon};
use crate::error::CitationError;
use crate::grammar::{self, Segment};
use crate::passage::Passage;
use crate::reference::Reference;
use crate::resolver::BookNames;
use crate::types::{BookId, Bounds, Options};

/// Parses citations against one book metadata provider and one name resolver.
#[derive(Clone, Copy)]
pub struct Parser<'c> {
    /// Chapter and verse counts.
    data: &'c dyn BookData,
    /// Book token resolution.
    names: &'c dyn BookNames,
    /// Error policy shared by every reference this parser builds.
    options: Options,
}

impl<'c> Parser<'c> {
    /// Display name for error messages, falling back to the id.
    fn display_name<'b>(&'b self, book: &'b BookId) -> &'b str {
        return self.data.book_name(book).unwrap_or(book.as_str());
    }

    /// A parser over separate metadata and name collaborators.
    pub fn new(data: &'c dyn BookData, names: &'c dyn BookNames, options: Options) -> Self {
        return Self { data, names, options };
    }

    /// Parse a citation, possibly compound.
    ///
    /// # Errors
    ///
    /// With `raise_errors` set, returns the first failure: `MalformedInput`,
    /// `InvalidBookName`, `InvalidChapter`, `InvalidVerse`, or a range-order
    /// error. Without it, failures are recorded on the returned passage and
    /// parsing stops at the first one.
    pub fn parse(&self, text: &str) -> Result<Passage, CitationError> {
        let mut references = Vec::new();
        return match self.parse_segments(text, &mut references) {
            Ok(()) => Ok(Passage::new(references)),
            Err(e) if self.options.raise_errors => Err(e),
            Err(e) => {
                tracing::debug!(input = text, error = %e, "citation rejected");
                Ok(Passage::failed(references, e))
            },
        };
    }

    /// Parse the head segment and every continuation after it.
    ///
    /// # Errors
    ///
    /// Returns the first grammar, name, or bounds failure.
    fn parse_segments(&self, text: &str, references: &mut Vec<Reference>) -> Result<(), CitationError> {
        let segment = grammar::full(text)?.ok_or_else(|| return CitationError::malformed(text))?;
        let mut rest = self.push_with_book(&segment, references)?;

        while let Some(text) = rest {
            if references.last().is_some_and(|r| return !r.is_valid()) {
                break;
            }
            rest = self.push_continuation(text, references)?;
        }
        return Ok(());
    }

    /// Build the next reference of a compound citation.
    ///
    /// A segment that restates a book starts over as a head segment;
    /// otherwise it inherits the previous reference's book, and possibly its
    /// chapter.
    ///
    /// # Errors
    ///
    /// Returns `MalformedInput` for a segment that is neither, plus the
    /// failures of building the reference.
    fn push_continuation<'t>(
        &self,
        text: &'t str,
        references: &mut Vec<Reference>,
    ) -> Result<Option<&'t str>, CitationError> {
        if let Some(segment) = grammar::full(text)? {
            return self.push_with_book(&segment, references);
        }

        let segment = grammar::continuation(text)?.ok_or_else(|| return CitationError::malformed(text))?;
        let Some(parent) = references.last() else {
            return Err(CitationError::malformed(text));
        };

        let book = parent.book().clone();
        let bounds = if parent.chapter_count() == 1 {
            interpret_single_chapter(&segment, parent.book_name())?
        } else {
            inherit(parent.inherited_chapter(), segment.slots)
        };
        tracing::debug!(
            %book,
            inherited_chapter = ?parent.inherited_chapter(),
            ?bounds,
            "interpreted continuation"
        );

        let child = Reference::new(self.data, &book, bounds, self.options)?;
        references.push(child);
        return Ok(segment.rest);
    }

    /// Build a reference from a segment that names its book.
    ///
    /// # Errors
    ///
    /// Returns `InvalidBookName` if the book token doesn't resolve, plus the
    /// failures of [`interpret_single_chapter`] and [`Reference::new`].
    fn push_with_book<'t>(
        &self,
        segment: &Segment<'t>,
        references: &mut Vec<Reference>,
    ) -> Result<Option<&'t str>, CitationError> {
        let raw_name = segment.book.unwrap_or_default();
        let book = self
            .names
            .resolve(raw_name, self.options.raise_errors)?
            .ok_or_else(|| return CitationError::InvalidBookName {
                name: raw_name.to_string(),
            })?;

        let bounds = if self.data.chapter_count(&book) == Some(1) {
            interpret_single_chapter(segment, self.display_name(&book))?
        } else {
            interpret_multi_chapter(segment.slots)
        };
        tracing::debug!(%book, ?bounds, "interpreted segment");

        references.push(Reference::new(self.data, &book, bounds, self.options)?);
        return Ok(segment.rest);
    }

    /// A parser whose canon provides both metadata and names.
    pub fn with_canon(canon: &'c Canon, options: Options) -> Self {
        return Self::new(canon, canon, options);
    }
}

/// Map positional numbers onto a book that has chapters.
///
/// With a chapter and a verse but only one further number, that number is
/// the closing verse in the same chapter ("1:1-5"). Without a verse it is
/// the closing chapter ("1-3").
pub fn interpret_multi_chapter(slots: Bounds) -> Bounds {
    if slots.from_chapter.is_none() {
        return Bounds::default();
    }
    return resolve_closing_numbers(slots.from_chapter, slots.from_verse, slots);
}

/// Map positional numbers onto a book with a single chapter, where the
/// chapter slots hold verses.
///
/// # Errors
///
/// Returns `CitationError::NoChapters` if the segment used a `:` separator.
pub fn interpret_single_chapter(segment: &Segment<'_>, book_name: &str) -> Result<Bounds, CitationError> {
    if segment.has_colon {
        return Err(CitationError::NoChapters {
            book: book_name.to_string(),
        });
    }
    return Ok(Bounds {
        from_chapter: None,
        from_verse: segment.slots.from_chapter,
        to_chapter: None,
        to_verse: segment.slots.to_chapter,
    });
}

/// Map a continuation segment's numbers, given the chapter the previous
/// reference hands on (if it cited a verse).
///
/// With an inherited chapter, a lone opening number is a verse in that
/// chapter, and "n:m" overrides the chapter. Without one, the opening number
/// is the chapter.
pub fn inherit(inherited_chapter: Option<u32>, slots: Bounds) -> Bounds {
    let (from_chapter, from_verse) = match inherited_chapter {
        Some(_) if slots.from_verse.is_some() => (slots.from_chapter, slots.from_verse),
        Some(chapter) => (Some(chapter), slots.from_chapter),
        None => (slots.from_chapter, slots.from_verse),
    };
    return resolve_closing_numbers(from_chapter, from_verse, slots);
}

/// Decide whether the closing slots are chapter and verse, or a lone verse.
fn resolve_closing_numbers(from_chapter: Option<u32>, from_verse: Option<u32>, slots: Bounds) -> Bounds {
    let (to_chapter, to_verse) = if slots.to_verse.is_some() {
        (slots.to_chapter, slots.to_verse)
    } else if from_verse.is_some() {
        (None, slots.to_chapter)
    } else {
        (slots.to_chapter, None)
    };
    return Bounds {
        from_chapter,
        from_verse,
        to_chapter,
        to_verse,
    };
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::error::ErrorKind;
    use crate::types::Attributes;

    fn parse(text: &str) -> Result<Passage, CitationError> {
        return Parser::with_canon(Canon::standard(), Options::default()).parse(text);
    }

    fn parse_lenient(text: &str) -> Passage {
        return Parser::with_canon(Canon::standard(), Options::lenient())
            .parse(text)
            .unwrap();
    }

    fn attrs(book: &str, from: (u32, u32), to: (u32, u32)) -> Attributes {
        return Attributes {
            book: BookId::from(book),
            from_chapter: from.0,
            from_verse: from.1,
            to_chapter: to.0,
            to_verse: to.1,
        };
    }

    #[test]
    fn single_verse() {
        let passage = parse("John 3:16").unwrap();
        assert_eq!(passage.attributes(), vec![attrs("john", (3, 16), (3, 16))]);
        assert_eq!(passage.to_string(), "John 3:16");
    }

    #[test]
    fn cross_chapter_range() {
        let passage = parse("Genesis 1:1-2:3").unwrap();
        assert_eq!(passage.attributes(), vec![attrs("genesis", (1, 1), (2, 3))]);
        assert_eq!(passage.to_string(), "Genesis 1:1-2:3");
    }

    #[test]
    fn single_chapter_book_numbers_are_verses() {
        let passage = parse("Jude 3").unwrap();
        assert_eq!(passage.attributes(), vec![attrs("jude", (1, 3), (1, 3))]);
        assert_eq!(passage.to_string(), "Jude 3");

        let passage = parse("Philemon 4-7").unwrap();
        assert_eq!(passage.attributes(), vec![attrs("philemon", (1, 4), (1, 7))]);
    }

    #[test]
    fn colon_in_single_chapter_book() {
        let err = parse("Jude 1:3").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidChapter);
        assert_eq!(err.to_string(), "Jude doesn't have any chapters");
    }

    #[test]
    fn compound_inherits_book_and_takes_new_chapter() {
        let passage = parse("Genesis 1:1, 2:1").unwrap();
        assert_eq!(
            passage.attributes(),
            vec![attrs("genesis", (1, 1), (1, 1)), attrs("genesis", (2, 1), (2, 1))]
        );
        assert_eq!(passage.head().map(ToString::to_string).as_deref(), Some("Genesis 1:1"));
        assert_eq!(passage.to_string(), "Genesis 1:1, 2:1");
    }

    #[test]
    fn chapter_past_the_end() {
        let err = parse("Genesis 51").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidChapter);
        let message = err.to_string();
        assert!(message.contains("Genesis") && message.contains("51"), "{message}");
    }

    #[test]
    fn whole_book() {
        let passage = parse("Genesis").unwrap();
        let head = passage.head().unwrap();
        assert!(head.whole_book());
        assert_eq!(passage.attributes(), vec![attrs("genesis", (1, 1), (50, 26))]);
        assert_eq!(passage.to_string(), "Genesis");
    }

    #[test]
    fn lone_number_after_a_verse_is_a_verse() {
        let passage = parse("Genesis 1:1, 3").unwrap();
        assert_eq!(passage.attributes()[1], attrs("genesis", (1, 3), (1, 3)));
        assert_eq!(passage.to_string(), "Genesis 1:1, 1:3");
    }

    #[test]
    fn lone_number_after_a_chapter_is_a_chapter() {
        let passage = parse("Genesis 1, 3").unwrap();
        assert!(passage.head().unwrap().is_chapter_explicit());
        assert_eq!(passage.attributes()[1], attrs("genesis", (3, 1), (3, 24)));
        assert_eq!(passage.to_string(), "Genesis 1, 3");
    }

    #[test]
    fn continuation_follows_the_closing_chapter() {
        let passage = parse("Genesis 1:1-2:3, 5, 7-9").unwrap();
        assert_eq!(
            passage.attributes(),
            vec![
                attrs("genesis", (1, 1), (2, 3)),
                attrs("genesis", (2, 5), (2, 5)),
                attrs("genesis", (2, 7), (2, 9)),
            ]
        );
        assert_eq!(passage.to_string(), "Genesis 1:1-2:3, 2:5, 2:7-9");
    }

    #[test]
    fn continuation_can_restate_a_book() {
        let passage = parse("Genesis 1:1, Exodus 3:14, 15").unwrap();
        assert_eq!(passage.attributes()[1], attrs("exodus", (3, 14), (3, 14)));
        assert_eq!(passage.attributes()[2], attrs("exodus", (3, 15), (3, 15)));
        assert_eq!(passage.to_string(), "Genesis 1:1, Exodus 3:14, 3:15");
    }

    #[test]
    fn single_chapter_continuation() {
        let passage = parse("Jude 3, 5-7").unwrap();
        assert_eq!(
            passage.attributes(),
            vec![attrs("jude", (1, 3), (1, 3)), attrs("jude", (1, 5), (1, 7))]
        );
        assert_eq!(passage.to_string(), "Jude 3, 5-7");
        assert_eq!(parse("Jude 3, 5-7").unwrap(), parse(&passage.to_string()).unwrap());
    }

    #[test]
    fn colon_only_checked_in_own_segment() {
        let passage = parse("Jude 3, Genesis 1:1").unwrap();
        assert_eq!(passage.len(), 2);
        assert_eq!(passage.to_string(), "Jude 3, Genesis 1:1");
    }

    #[test]
    fn whole_chapter_after_verse_spells_out_verses() {
        let passage = parse("Genesis 1:1, 3:1-24").unwrap();
        assert_eq!(passage.attributes()[1], attrs("genesis", (3, 1), (3, 24)));
        let text = passage.to_string();
        assert_eq!(text, "Genesis 1:1, 3:1-24");
        assert_eq!(parse(&text).unwrap(), passage);
    }

    #[test]
    fn closing_verse_after_chapter_range() {
        let passage = parse("Genesis 1-2:3").unwrap();
        assert_eq!(passage.attributes(), vec![attrs("genesis", (1, 1), (2, 3))]);
    }

    #[test]
    fn abbreviations_and_numbered_books() {
        assert_eq!(parse("1 Jn 4:8").unwrap().to_string(), "1 John 4:8");
        assert_eq!(parse("ii kings 2:11").unwrap().to_string(), "2 Kings 2:11");
        assert_eq!(parse("Ps 23").unwrap().to_string(), "Psalms 23");
    }

    #[test]
    fn malformed_input() {
        let err = parse("3:16").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        assert_eq!(err.to_string(), "3:16 is not a valid reference");

        let err = parse("John 3:16, oops!").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidBookName);

        let err = parse("John 3:16, ?").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn unknown_book() {
        let err = parse("Hezekiah 1:1").unwrap_err();
        assert_eq!(err, CitationError::InvalidBookName { name: "Hezekiah".to_string() });
    }

    #[test]
    fn lenient_sentinel_for_unparseable_text() {
        let passage = parse_lenient("nonsense 1:1");
        assert!(!passage.is_valid());
        assert!(passage.is_empty());
        assert_eq!(passage.error().map(CitationError::kind), Some(ErrorKind::InvalidBookName));
        assert_eq!(passage.to_citation(), None);
    }

    #[test]
    fn blank_input_message_is_quoted() {
        let passage = parse_lenient("");
        assert!(passage.is_empty());
        assert_eq!(
            passage.error().map(ToString::to_string).as_deref(),
            Some("\"\" is not a valid reference")
        );
        assert_eq!(parse("   ").unwrap_err().to_string(), "\"\" is not a valid reference");
    }

    #[test]
    fn lenient_keeps_invalid_reference_and_stops() {
        let passage = parse_lenient("Genesis 1:1, 51, 2");
        assert_eq!(passage.len(), 2);
        assert!(passage.head().unwrap().is_valid());
        assert!(!passage.references()[1].is_valid());
        assert_eq!(passage.error().map(CitationError::kind), Some(ErrorKind::InvalidVerse));
        assert_eq!(passage.to_string(), "");
    }

    #[test]
    fn lenient_child_errors_follow_the_same_policy() {
        let passage = parse_lenient("Genesis 1, 51");
        assert_eq!(passage.error().map(CitationError::kind), Some(ErrorKind::InvalidChapter));
    }

    #[test]
    fn raise_mode_child_error() {
        let err = parse("Genesis 1:1, 1:40").unwrap_err();
        assert_eq!(err.to_string(), "Genesis 1 doesn't have a verse 40");
    }

    #[test]
    fn same_chapter_reversed_range() {
        let err = parse("John 3:16-14").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRange);
        let err = parse("John 4-3").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRange);
    }

    #[test]
    fn interpretation_rules() {
        let slots = Bounds {
            from_chapter: Some(1),
            from_verse: Some(1),
            to_chapter: Some(5),
            to_verse: None,
        };
        assert_eq!(interpret_multi_chapter(slots).to_verse, Some(5));
        assert_eq!(interpret_multi_chapter(slots).to_chapter, None);

        let chapters = Bounds {
            from_verse: None,
            ..slots
        };
        assert_eq!(interpret_multi_chapter(chapters).to_chapter, Some(5));

        assert_eq!(inherit(Some(2), Bounds::chapter(7)), Bounds::verse(2, 7));
        assert_eq!(inherit(None, Bounds::chapter(7)), Bounds::chapter(7));
        assert_eq!(inherit(Some(2), Bounds::verse(4, 1)), Bounds::verse(4, 1));
    }

    /// Every valid reference in the canon, as (book, from, to).
    fn valid_reference() -> impl Strategy<Value = (BookId, (u32, u32), (u32, u32))> {
        let books: Vec<BookId> = Canon::standard().books().map(|b| b.key.clone()).collect();
        return proptest::sample::select(books)
            .prop_flat_map(|book| {
                let chapters = Canon::standard().chapter_count(&book).unwrap();
                return (Just(book), 1..=chapters, 1..=chapters);
            })
            .prop_flat_map(|(book, a, b)| {
                let (from_chapter, to_chapter) = (a.min(b), a.max(b));
                let from_verses = Canon::standard().verse_count(&book, from_chapter).unwrap();
                let to_verses = Canon::standard().verse_count(&book, to_chapter).unwrap();
                return (
                    Just(book),
                    Just(from_chapter),
                    Just(to_chapter),
                    1..=from_verses,
                    1..=to_verses,
                );
            })
            .prop_map(|(book, from_chapter, to_chapter, v1, v2)| {
                let (from_verse, to_verse) = if from_chapter == to_chapter {
                    (v1.min(v2), v1.max(v2))
                } else {
                    (v1, v2)
                };
                return (book, (from_chapter, from_verse), (to_chapter, to_verse));
            });
    }

    proptest! {
        #[test]
        fn canonical_text_parses_back_to_the_same_reference((book, from, to) in valid_reference()) {
            let reference = Reference::new(Canon::standard(), &book, Bounds::span(from, to), Options::default()).unwrap();
            let text = reference.to_string();
            let reparsed = parse(&text).unwrap();
            prop_assert_eq!(reparsed.references(), std::slice::from_ref(&reference), "{}", text);
        }

        #[test]
        fn compound_text_parses_back((first, second) in (valid_reference(), valid_reference())) {
            let passage = Passage::new(vec![
                Reference::new(Canon::standard(), &first.0, Bounds::span(first.1, first.2), Options::default()).unwrap(),
                Reference::new(Canon::standard(), &second.0, Bounds::span(second.1, second.2), Options::default()).unwrap(),
            ]);
            let text = passage.to_string();
            prop_assert_eq!(parse(&text).unwrap(), passage, "{}", text);
        }

        #[test]
        fn chapters_past_the_end_are_invalid(extra in 1u32..20) {
            let chapters = Canon::standard().chapter_count(&BookId::from("john")).unwrap();
            let err = parse(&format!("John {}", chapters.saturating_add(extra))).unwrap_err();
            prop_assert_eq!(err.kind(), ErrorKind::InvalidChapter);
        }

        #[test]
        fn colon_always_fails_in_single_chapter_books(chapter in 0u32..30, verse in 0u32..30) {
            let err = parse(&format!("Obadiah {chapter}:{verse}")).unwrap_err();
            prop_assert_eq!(err.kind(), ErrorKind::InvalidChapter);
        }

        #[test]
        fn continuations_carry_the_book((book, from, _to) in valid_reference(), verse in 1u32..5) {
            let name = Canon::standard().book_name(&book).unwrap();
            let text = format!("{name} {}:{}, {verse}", from.0, from.1);
            let passage = parse_lenient(&text);
            for reference in &passage {
                prop_assert_eq!(reference.book(), &book);
            }
        }
    }
}
