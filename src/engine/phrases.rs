//! Phrase list storage.
//!
//! Phrases are plain `char` sequences. Each phrase keeps the byte offset of
//! every character boundary so a visible prefix is a borrowed slice and can
//! never split a multi-byte character.

use crate::error::ConfigurationError;

/// One phrase plus its precomputed character boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Phrase {
    text: String,
    /// `boundaries[k]` is the byte length of the first `k` characters.
    boundaries: Vec<usize>,
}

impl Phrase {
    fn new(text: String) -> Self {
        let boundaries = std::iter::once(0)
            .chain(text.char_indices().map(|(i, c)| i + c.len_utf8()))
            .collect();
        Self { text, boundaries }
    }

    fn char_len(&self) -> usize {
        self.boundaries.len() - 1
    }

    fn prefix(&self, chars: usize) -> &str {
        self.boundaries
            .get(chars)
            .map_or(self.text.as_str(), |&end| &self.text[..end])
    }
}

/// Ordered, non-empty list of phrases. Insertion order is the cycling order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseList {
    phrases: Vec<Phrase>,
}

impl PhraseList {
    /// Builds a phrase list.
    ///
    /// Empty phrases are allowed; an empty list is not.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::EmptyPhraseList`] if `phrases` yields
    /// nothing.
    pub fn new<I, S>(phrases: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let phrases: Vec<Phrase> = phrases
            .into_iter()
            .map(|p| Phrase::new(p.into()))
            .collect();
        if phrases.is_empty() {
            return Err(ConfigurationError::EmptyPhraseList);
        }
        Ok(Self { phrases })
    }

    /// Number of phrases (always at least one).
    #[must_use]
    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    /// Always `false`; present for API symmetry with collections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// Returns the phrase at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.phrases.get(index).map(|p| p.text.as_str())
    }

    /// Length of the phrase at `index` in characters, or 0 when out of range.
    #[must_use]
    pub fn char_len(&self, index: usize) -> usize {
        self.phrases.get(index).map_or(0, Phrase::char_len)
    }

    /// The first `chars` characters of the phrase at `index`.
    ///
    /// `chars` past the end yields the whole phrase; an out-of-range
    /// `index` yields `""`.
    #[must_use]
    pub fn prefix(&self, index: usize, chars: usize) -> &str {
        self.phrases.get(index).map_or("", |p| p.prefix(chars))
    }

    /// Iterates the phrases in cycling order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.phrases.iter().map(|p| p.text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_rejected() {
        let err = PhraseList::new(Vec::<String>::new()).unwrap_err();
        assert_eq!(err, ConfigurationError::EmptyPhraseList);
    }

    #[test]
    fn empty_phrase_allowed() {
        let list = PhraseList::new([""]).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list.char_len(0), 0);
        assert_eq!(list.prefix(0, 0), "");
    }

    #[test]
    fn prefix_counts_characters_not_bytes() {
        let list = PhraseList::new(["héllo"]).unwrap();
        assert_eq!(list.char_len(0), 5);
        assert_eq!(list.prefix(0, 2), "hé");
        assert_eq!(list.prefix(0, 5), "héllo");
    }

    #[test]
    fn prefix_past_end_is_whole_phrase() {
        let list = PhraseList::new(["abc"]).unwrap();
        assert_eq!(list.prefix(0, 10), "abc");
    }

    #[test]
    fn out_of_range_index_is_empty() {
        let list = PhraseList::new(["abc"]).unwrap();
        assert_eq!(list.prefix(3, 1), "");
        assert_eq!(list.char_len(3), 0);
        assert!(list.get(3).is_none());
    }

    #[test]
    fn iteration_keeps_insertion_order() {
        let list = PhraseList::new(["one", "two", "three"]).unwrap();
        let collected: Vec<&str> = list.iter().collect();
        assert_eq!(collected, vec!["one", "two", "three"]);
    }
}
