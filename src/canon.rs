//! Book metadata: which books exist, how many chapters each has, and how many
//! verses each chapter has.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::LazyLock;

use serde::Deserialize;

use crate::error::Error;
use crate::resolver::NameIndex;
use crate::types::BookId;

/// The bundled Protestant canon with KJV versification.
const STANDARD_CANON: &str = include_str!("../data/standard.toml");

/// Parsed once, then shared read-only by every parser in the process.
static STANDARD: LazyLock<Canon> = LazyLock::new(|| {
    return Canon::from_toml_str(STANDARD_CANON).expect("bundled canon is valid");
});

/// Structural facts about books, as needed to validate and render references.
///
/// `None` means the book (or the chapter) is unknown to this provider.
pub trait BookData {
    /// Name used when rendering citations and error messages.
    fn book_name(&self, book: &BookId) -> Option<&str>;

    /// Number of chapters in `book`.
    fn chapter_count(&self, book: &BookId) -> Option<u32>;

    /// Number of verses in `chapter` of `book`.
    fn verse_count(&self, book: &BookId, chapter: u32) -> Option<u32>;
}

/// One book of a canon, as stored in the canon TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct Book {
    /// Alternative spellings and abbreviations accepted by the resolver.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Canonical id.
    pub key: BookId,
    /// Display name, e.g. "Song of Solomon".
    pub name: String,
    /// Verse count of each chapter, in chapter order.
    pub verses: Vec<u32>,
}

impl Book {
    /// Number of chapters, saturating on absurdly long lists.
    pub fn chapter_count(&self) -> u32 {
        return u32::try_from(self.verses.len()).unwrap_or(u32::MAX);
    }

    /// Verse count of a 1-based chapter, `None` when out of range.
    pub fn verse_count(&self, chapter: u32) -> Option<u32> {
        let index = usize::try_from(chapter).ok()?.checked_sub(1)?;
        return self.verses.get(index).copied();
    }
}

/// Raw TOML structure of a canon file.
#[derive(Deserialize)]
struct CanonToml {
    /// Books in canonical order.
    book: Vec<Book>,
}

/// An ordered set of books plus the name index used to resolve them.
/// Constructed only through [`Canon::from_toml_str`] or [`Canon::load`],
/// both of which enforce the shape checks in `enforce_canon_shape`.
#[derive(Debug, Clone)]
pub struct Canon {
    /// Books in canonical order.
    books: Vec<Book>,
    /// Normalized names and aliases to book ids.
    names: NameIndex,
    /// Position of each book in `books`, by id.
    positions: HashMap<BookId, usize>,
}

impl Canon {
    /// Register an extra alias for an existing book. Replaces any earlier
    /// meaning of the same alias.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownAliasTarget` if `key` is not a book of this canon.
    pub fn add_alias(&mut self, alias: &str, key: &str) -> Result<(), Error> {
        let id = BookId::from(key);
        if !self.positions.contains_key(&id) {
            return Err(Error::UnknownAliasTarget {
                alias: alias.to_string(),
                key: key.to_string(),
            });
        }
        self.names.insert(alias, id);
        return Ok(());
    }

    /// Look up one book by id.
    pub fn book(&self, id: &BookId) -> Option<&Book> {
        let position = *self.positions.get(id)?;
        return self.books.get(position);
    }

    /// All books in canonical order.
    pub fn books(&self) -> impl Iterator<Item = &Book> {
        return self.books.iter();
    }

    /// Parse a canon from TOML content.
    ///
    /// # Errors
    ///
    /// Returns `Error::TomlDe` if the content is not valid TOML, or
    /// `Error::CanonCorrupt` if the books are empty, duplicated, or contain
    /// a chapter without verses.
    pub fn from_toml_str(content: &str) -> Result<Self, Error> {
        let raw: CanonToml = toml::from_str(content)?;
        enforce_canon_shape(&raw.book)?;

        let mut positions = HashMap::with_capacity(raw.book.len());
        for (position, book) in raw.book.iter().enumerate() {
            positions.insert(book.key.clone(), position);
        }
        let names = NameIndex::build(&raw.book)?;

        tracing::debug!(books = raw.book.len(), "loaded canon");
        return Ok(Self {
            books: raw.book,
            names,
            positions,
        });
    }

    /// Read and parse a canon file from disk.
    ///
    /// # Errors
    ///
    /// Returns `Error::CanonNotFound` if the file doesn't exist,
    /// `Error::Io` for other read failures, and the errors of
    /// [`Canon::from_toml_str`] for bad content.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let content = match std::fs::read_to_string(path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::CanonNotFound { path: path.to_path_buf() });
            },
            Err(e) => return Err(Error::Io(e)),
            Ok(c) => c,
        };
        return Self::from_toml_str(&content);
    }

    /// The name index used by the resolver.
    pub(crate) const fn names(&self) -> &NameIndex {
        return &self.names;
    }

    /// The bundled 66-book canon.
    ///
    /// # Panics
    ///
    /// Panics if the embedded canon data is invalid (compile-time invariant).
    pub fn standard() -> &'static Self {
        return &STANDARD;
    }
}

impl BookData for Canon {
    fn book_name(&self, book: &BookId) -> Option<&str> {
        return self.book(book).map(|b| return b.name.as_str());
    }

    fn chapter_count(&self, book: &BookId) -> Option<u32> {
        return self.book(book).map(Book::chapter_count);
    }

    fn verse_count(&self, book: &BookId, chapter: u32) -> Option<u32> {
        return self.book(book)?.verse_count(chapter);
    }
}

/// Validate that a canon has books, unique keys, and no empty chapters.
///
/// # Errors
///
/// Returns `Error::CanonCorrupt` describing the first violation.
fn enforce_canon_shape(books: &[Book]) -> Result<(), Error> {
    if books.is_empty() {
        return Err(Error::CanonCorrupt {
            reason: "no books".to_string(),
        });
    }

    let mut seen: HashSet<&BookId> = HashSet::with_capacity(books.len());
    for book in books {
        if !seen.insert(&book.key) {
            return Err(Error::CanonCorrupt {
                reason: format!("duplicate book key `{}`", book.key),
            });
        }
        if book.verses.is_empty() {
            return Err(Error::CanonCorrupt {
                reason: format!("book `{}` has no chapters", book.key),
            });
        }
        if let Some(position) = book.verses.iter().position(|&count| return count == 0) {
            return Err(Error::CanonCorrupt {
                reason: format!("book `{}` chapter {} has no verses", book.key, position.saturating_add(1)),
            });
        }
    }
    return Ok(());
}
