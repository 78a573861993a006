//! Markdown rendering of errors for the command line.
use std::fmt::Write as _;

use crate::error::{CitationError, Error};

/// ANSI bold, applied to markdown headings on a terminal.
const BOLD: &str = "\x1b[1m";
/// ANSI reset.
const RESET: &str = "\x1b[0m";

/// Render an error as valid markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render an error as a structured markdown diagnostic.
///
/// Each variant produces a block with what happened and, where there is
/// one, how to fix it.
pub fn render_error(e: &Error) -> String {
    return match e {
        Error::CanonCorrupt { reason } => format!(
            "\
# Error: Canon Corrupt

{reason}

## Fix

Every book needs a unique `key`, a `name`, and at least one chapter with a
non-zero verse count.
"
        ),
        Error::CanonNotFound { path } => format!(
            "\
# Error: Canon Not Found

`{}` does not exist.

## Fix

Check the `canon` path in your `.passage.toml`.
",
            path.display()
        ),
        Error::Citation(citation) => render_citation_error(citation),
        Error::UnknownAliasTarget { alias, key } => format!(
            "\
# Error: Unknown Alias Target

Alias `{alias}` points at `{key}`, which is not a book of the canon.

## Fix

Use a book key listed by:

    passage books
"
        ),
        Error::Io(_) | Error::Json(_) | Error::TomlDe(_) => render_generic(e),
    };
}

/// Render a citation failure with the range that would have been valid.
pub fn render_citation_error(e: &CitationError) -> String {
    let mut out = format!(
        "\
# Error: Invalid Citation

{e}.
"
    );

    match e {
        CitationError::InvalidBookName { .. } | CitationError::UnknownBook { .. } => {
            out.push_str(
                "\
\n## Fix

List the accepted book names:

    passage books
",
            );
        },
        CitationError::InvalidChapter {
            book, chapter_count, ..
        } => {
            let _ = write!(out, "\n## Hint\n\n{book} has {}.\n", plural(*chapter_count, "chapter"));
        },
        CitationError::InvalidVerse {
            book,
            chapter,
            verse_count,
            ..
        } => {
            let _ = write!(out, "\n## Hint\n\n{book} {chapter} has {}.\n", plural(*verse_count, "verse"));
        },
        CitationError::MalformedInput { .. } => {
            out.push_str(
                "\
\n## Expected

    <book> <chapter>[:<verse>][-[<chapter>:]<verse>][, ...]
",
            );
        },
        CitationError::NoChapters { book } => {
            let _ = write!(out, "\n## Fix\n\nCite verses of {book} without a chapter, e.g. `{book} 5-7`.\n");
        },
        CitationError::ToChapterBeforeFromChapter { from_chapter, to_chapter } => {
            let _ = write!(out, "\n## Hint\n\nThe range ends at chapter {to_chapter}, before it starts at {from_chapter}.\n");
        },
        CitationError::ToVerseBeforeFromVerse { from_verse, to_verse } => {
            let _ = write!(out, "\n## Hint\n\nThe range ends at verse {to_verse}, before it starts at {from_verse}.\n");
        },
    }
    return out;
}

/// Fallback for errors that carry no more than their message.
fn render_generic(e: &Error) -> String {
    let title = match e {
        Error::Io(_) => "I/O",
        Error::Json(_) => "JSON Output",
        Error::TomlDe(_) => "Invalid TOML",
        _ => "Error",
    };
    return format!(
        "\
# Error: {title}

{e}
"
    );
}

/// `"1 chapter"`, `"50 chapters"`.
fn plural(count: u32, noun: &str) -> String {
    if count == 1 {
        return format!("1 {noun}");
    }
    return format!("{count} {noun}s");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chapter_error_names_the_count() {
        let err = crate::parse("Genesis 51").unwrap_err();
        let md = render_error(&Error::from(err));
        assert!(md.starts_with("# Error: Invalid Citation"));
        assert!(md.contains("Genesis doesn't have a chapter 51."));
        assert!(md.contains("Genesis has 50 chapters."));
    }

    #[test]
    fn verse_error_names_the_count() {
        let err = crate::parse("Psalm 117:3").unwrap_err();
        let md = render_citation_error(&err);
        assert!(md.contains("Psalms 117 has 2 verses."), "{md}");
    }

    #[test]
    fn unknown_book_points_at_books_command() {
        let err = crate::parse("Hezekiah 1:1").unwrap_err();
        let md = render_citation_error(&err);
        assert!(md.contains("Hezekiah is not a valid book."));
        assert!(md.contains("passage books"));
    }

    #[test]
    fn missing_canon_names_the_path() {
        let md = render_error(&Error::CanonNotFound {
            path: "custom/canon.toml".into(),
        });
        assert!(md.contains("`custom/canon.toml` does not exist."));
    }
}
