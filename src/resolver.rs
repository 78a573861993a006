//! Book name resolution: map whatever a writer typed ("Gen", "1 Jn",
//! "Song of Songs") to a canonical book id.

use std::collections::{BTreeSet, HashMap};

use crate::canon::{Book, Canon};
use crate::error::{CitationError, Error};
use crate::types::BookId;

/// Shortest normalized input that may resolve by prefix alone.
const MIN_PREFIX_LEN: usize = 2;

/// Turns a raw book token into a book id.
pub trait BookNames {
    /// Resolve `raw` to a book id.
    ///
    /// # Errors
    ///
    /// With `strict` set, an unresolvable name is `CitationError::InvalidBookName`;
    /// otherwise it is `Ok(None)`.
    fn resolve(&self, raw: &str, strict: bool) -> Result<Option<BookId>, CitationError>;
}

/// Normalized names and aliases of every book in a canon.
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    /// Normalized name or alias to the book it names.
    exact: HashMap<String, BookId>,
}

impl NameIndex {
    /// Index the key, display name, and aliases of every book.
    ///
    /// # Errors
    ///
    /// Returns `Error::CanonCorrupt` if one normalized name belongs to two books.
    pub fn build(books: &[Book]) -> Result<Self, Error> {
        let mut index = Self::default();
        for book in books {
            let key_as_name = book.key.as_str().replace('_', " ");
            let spellings = [key_as_name.as_str(), book.name.as_str()]
                .into_iter()
                .chain(book.aliases.iter().map(String::as_str));

            for spelling in spellings {
                let normalized = normalize(spelling);
                match index.exact.get(&normalized) {
                    Some(existing) if *existing != book.key => {
                        return Err(Error::CanonCorrupt {
                            reason: format!(
                                "name `{spelling}` belongs to both `{existing}` and `{}`",
                                book.key
                            ),
                        });
                    },
                    Some(_) => {},
                    None => {
                        index.exact.insert(normalized, book.key.clone());
                    },
                }
            }
        }
        return Ok(index);
    }

    /// Add or replace one spelling.
    pub fn insert(&mut self, spelling: &str, book: BookId) {
        self.exact.insert(normalize(spelling), book);
    }

    /// Find the book a raw token names: an exact spelling first, then a
    /// prefix shared by exactly one book.
    pub fn lookup(&self, raw: &str) -> Option<&BookId> {
        let normalized = normalize(raw);
        if normalized.is_empty() {
            return None;
        }
        if let Some(book) = self.exact.get(&normalized) {
            return Some(book);
        }
        if normalized.len() < MIN_PREFIX_LEN {
            return None;
        }

        let candidates: BTreeSet<&BookId> = self
            .exact
            .iter()
            .filter(|(spelling, _)| return spelling.starts_with(&normalized))
            .map(|(_, book)| return book)
            .collect();

        let mut iter = candidates.iter();
        return match (iter.next(), iter.next()) {
            (Some(book), None) => Some(*book),
            (Some(_), Some(_)) => {
                tracing::debug!(input = raw, ?candidates, "ambiguous book prefix");
                None
            },
            (None, _) => None,
        };
    }
}

impl BookNames for Canon {
    fn resolve(&self, raw: &str, strict: bool) -> Result<Option<BookId>, CitationError> {
        let found = self.names().lookup(raw).cloned();
        if found.is_none() && strict {
            return Err(CitationError::InvalidBookName {
                name: raw.trim().to_string(),
            });
        }
        return Ok(found);
    }
}

/// Fold a book name into its lookup form.
/// Lowercase, periods dropped, a leading ordinal word ("I", "Second") turned
/// into its digit, then all whitespace removed.
pub fn normalize(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase().replace('.', "");
    let mut words = lowered.split_whitespace();
    let Some(first) = words.next() else {
        return String::new();
    };

    let mut out = String::with_capacity(lowered.len());
    out.push_str(match first {
        "i" | "first" => "1",
        "ii" | "second" => "2",
        "iii" | "third" => "3",
        other => other,
    });
    for word in words {
        out.push_str(word);
    }
    return out;
}
