//! CLI commands for passage: parse, books.

use std::path::PathBuf;
use std::process::ExitCode;

use serde::Serialize;

use passage::{Attributes, Config, Error, ErrorKind, Parser, Passage};

/// One parsed citation in `--json` output.
#[derive(Serialize)]
struct CitationReport<'a> {
    /// Canonical text, absent when the citation is invalid.
    citation: Option<String>,
    /// Why the citation was rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorReport>,
    /// The text as given on the command line.
    input: &'a str,
    /// Attributes of every reference that was built.
    references: Vec<Attributes>,
}

/// The error part of a [`CitationReport`].
#[derive(Serialize)]
struct ErrorReport {
    /// Category of the failure.
    kind: ErrorKind,
    /// Human-readable message.
    message: String,
}

/// One book in `books --json` output.
#[derive(Serialize)]
struct BookReport<'a> {
    /// Accepted extra spellings.
    aliases: &'a [String],
    /// Number of chapters.
    chapters: u32,
    /// Canonical id.
    key: &'a str,
    /// Display name.
    name: &'a str,
    /// Total verses across all chapters.
    verses: u32,
}

/// List the books of the configured canon.
///
/// # Errors
///
/// Returns config or canon loading errors, or `Error::Json` if output
/// serialization fails.
pub fn books(json: bool) -> Result<(), Error> {
    let config = Config::load(&PathBuf::from("."))?;
    let canon = config.canon()?;

    let reports: Vec<BookReport<'_>> = canon
        .books()
        .map(|book| {
            return BookReport {
                aliases: &book.aliases,
                chapters: book.chapter_count(),
                key: book.key.as_str(),
                name: &book.name,
                verses: book.verses.iter().fold(0_u32, |sum, n| return sum.saturating_add(*n)),
            };
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    for book in &reports {
        if book.aliases.is_empty() {
            println!("{:<16} {:>3} ch", book.name, book.chapters);
        } else {
            println!("{:<16} {:>3} ch  {}", book.name, book.chapters, book.aliases.join(", "));
        }
    }
    return Ok(());
}

/// Parse each citation and print its canonical form.
///
/// With `lenient`, an invalid citation is reported on stdout and the exit
/// code is 1; otherwise the first invalid citation is returned as an error.
///
/// # Errors
///
/// Returns config or canon loading errors, `Error::Citation` for the first
/// invalid citation when not lenient, or `Error::Json` if output
/// serialization fails.
pub fn parse(citations: &[String], json: bool, lenient: bool) -> Result<ExitCode, Error> {
    let mut config = Config::load(&PathBuf::from("."))?;
    if lenient {
        config = config.with_raise_errors(false);
    }
    let canon = config.canon()?;
    let parser = Parser::with_canon(&canon, config.options());

    let mut passages: Vec<(&str, Passage)> = Vec::with_capacity(citations.len());
    for text in citations {
        passages.push((text.as_str(), parser.parse(text)?));
    }

    let invalid_count = passages.iter().filter(|(_, p)| return !p.is_valid()).count();
    if json {
        let reports: Vec<CitationReport<'_>> = passages
            .iter()
            .map(|(text, passage)| return report(text, passage))
            .collect();
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for (text, passage) in &passages {
            match passage.to_citation() {
                Some(citation) => println!("{citation}"),
                None => {
                    let reason = passage
                        .error()
                        .map_or_else(|| return "empty".to_string(), ToString::to_string);
                    println!("INVALID  {text} ({reason})");
                },
            }
        }
    }

    if invalid_count > 0 {
        if !json {
            println!();
            println!("{invalid_count} invalid");
        }
        return Ok(ExitCode::from(1));
    }
    return Ok(ExitCode::SUCCESS);
}

/// Build the JSON report for one citation.
fn report<'a>(input: &'a str, passage: &Passage) -> CitationReport<'a> {
    return CitationReport {
        citation: passage.to_citation(),
        error: passage.error().map(|e| {
            return ErrorReport {
                kind: e.kind(),
                message: e.to_string(),
            };
        }),
        input,
        references: passage.attributes(),
    };
}
