//! Compound citations: an ordered run of references where each entry after
//! the first continues from the one before it.
use std::fmt;

use crate::error::CitationError;
use crate::reference::Reference;
use crate::types::Attributes;

/// The parsed form of a whole citation such as `"Genesis 1:1, 2:1, Exodus 3"`.
///
/// Entry `i - 1` is the parent of entry `i`: it supplied whatever book or
/// chapter entry `i` left out, and it decides how entry `i` is rendered.
#[derive(Debug, Clone, Default)]
pub struct Passage {
    /// Failure that stopped parsing before a reference could be built.
    error: Option<CitationError>,
    /// Entries in citation order.
    references: Vec<Reference>,
}

impl Passage {
    /// One attribute set per entry.
    pub fn attributes(&self) -> Vec<Attributes> {
        return self.references.iter().map(Reference::attributes).collect();
    }

    /// The entry that follows entry `index`.
    pub fn child_of(&self, index: usize) -> Option<&Reference> {
        return self.references.get(index.checked_add(1)?);
    }

    /// The first failure, whether it stopped parsing or invalidated an entry.
    pub fn error(&self) -> Option<&CitationError> {
        return self
            .error
            .as_ref()
            .or_else(|| return self.references.iter().find_map(Reference::error));
    }

    /// A passage whose parsing stopped at `error`, keeping whatever came before.
    pub(crate) const fn failed(references: Vec<Reference>, error: CitationError) -> Self {
        return Self {
            error: Some(error),
            references,
        };
    }

    /// The first entry.
    pub fn head(&self) -> Option<&Reference> {
        return self.references.first();
    }

    /// Whether the passage has no entries at all.
    pub const fn is_empty(&self) -> bool {
        return self.references.is_empty();
    }

    /// Whether parsing finished and every entry passed validation.
    pub fn is_valid(&self) -> bool {
        return self.error.is_none()
            && !self.references.is_empty()
            && self.references.iter().all(Reference::is_valid);
    }

    /// Entries in citation order.
    pub fn iter(&self) -> std::slice::Iter<'_, Reference> {
        return self.references.iter();
    }

    /// Number of entries.
    pub const fn len(&self) -> usize {
        return self.references.len();
    }

    /// A passage made of already-validated references.
    pub(crate) const fn new(references: Vec<Reference>) -> Self {
        return Self {
            error: None,
            references,
        };
    }

    /// The entry that precedes entry `index`.
    pub fn parent_of(&self, index: usize) -> Option<&Reference> {
        return self.references.get(index.checked_sub(1)?);
    }

    /// Entries in citation order.
    pub fn references(&self) -> &[Reference] {
        return &self.references;
    }

    /// Canonical text for the whole chain, comma-joined, or `None` if any
    /// part of the passage is invalid.
    pub fn to_citation(&self) -> Option<String> {
        if !self.is_valid() {
            return None;
        }
        let head = self.references.first()?;
        let mut out = head.render_root();
        let mut after_verse = head.renders_opening_verse();
        for pair in self.references.windows(2) {
            if let [parent, child] = pair {
                let (text, names_verse) = child.render_continuation(parent, after_verse);
                out.push_str(&text);
                after_verse = names_verse;
            }
        }
        return Some(out);
    }
}

impl PartialEq for Passage {
    /// Entries compare by their attributes; the recorded error does not take part.
    fn eq(&self, other: &Self) -> bool {
        return self.references == other.references;
    }
}

impl Eq for Passage {}

impl fmt::Display for Passage {
    /// Writes the canonical citation, or nothing for an invalid passage.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return self.to_citation().map_or(Ok(()), |text| return f.write_str(&text));
    }
}

impl<'p> IntoIterator for &'p Passage {
    type IntoIter = std::slice::Iter<'p, Reference>;
    type Item = &'p Reference;

    fn into_iter(self) -> Self::IntoIter {
        return self.references.iter();
    }
}
