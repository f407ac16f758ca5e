//! Snippet corpus: the fixed reference texts retrieval runs against.

use serde::Deserialize;
use serde::Serialize;

/// An immutable, ordered collection of reference snippets.
///
/// A snippet's position in the corpus is its identity: the vector index
/// stores exactly one embedding per snippet, in the same order, so search
/// results map back to text by position alone. The corpus is fixed at
/// construction; there are no deletions or updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnippetCorpus {
    snippets: Vec<String>,
}

impl SnippetCorpus {
    pub const fn new(snippets: Vec<String>) -> Self {
        Self { snippets }
    }

    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }

    /// Snippet text at the given position, if it exists.
    pub fn get(&self, position: usize) -> Option<&str> {
        self.snippets.get(position).map(String::as_str)
    }

    /// All snippet texts in corpus order, shaped for batch embedding.
    pub fn texts(&self) -> &[String] {
        &self.snippets
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.snippets.iter().map(String::as_str)
    }
}

impl From<Vec<String>> for SnippetCorpus {
    fn from(snippets: Vec<String>) -> Self {
        Self::new(snippets)
    }
}

impl FromIterator<String> for SnippetCorpus {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_is_identity() {
        let corpus = SnippetCorpus::new(vec!["first".to_string(), "second".to_string()]);

        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.get(0), Some("first"));
        assert_eq!(corpus.get(1), Some("second"));
        assert_eq!(corpus.get(2), None);
    }

    #[test]
    fn texts_preserve_order() {
        let corpus: SnippetCorpus = ["a", "b", "c"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        assert_eq!(corpus.texts(), &["a", "b", "c"]);
        assert_eq!(corpus.iter().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn empty_corpus_is_legal() {
        let corpus = SnippetCorpus::new(Vec::new());
        assert!(corpus.is_empty());
        assert_eq!(corpus.get(0), None);
    }
}
