//! Token → sparse index assignment.
//!
//! Indices are handed out in first-seen order starting at 0. An index, once
//! assigned, is never reassigned or reused; the table only grows.

use std::collections::HashMap;

/// Append-only token → index table.
#[derive(Debug, Default, Clone)]
pub struct Vocabulary {
    indices: HashMap<String, u32>,
    next_index: u32,
}

impl Vocabulary {
    /// Creates an empty vocabulary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the index of `token`, assigning the next free index if unseen.
    pub fn get_or_insert(&mut self, token: &str) -> u32 {
        if let Some(&index) = self.indices.get(token) {
            return index;
        }
        let index = self.next_index;
        self.indices.insert(token.to_string(), index);
        self.next_index += 1;
        index
    }

    /// Returns the index of `token` without assigning one.
    pub fn get(&self, token: &str) -> Option<u32> {
        self.indices.get(token).copied()
    }

    /// Number of assigned tokens.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns `true` if no token has been assigned yet.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_are_sequential() {
        let mut vocab = Vocabulary::new();
        assert!(vocab.is_empty());
        assert_eq!(vocab.get_or_insert("fox"), 0);
        assert_eq!(vocab.get_or_insert("dog"), 1);
        assert_eq!(vocab.get_or_insert("cat"), 2);
        assert_eq!(vocab.len(), 3);
    }

    #[test]
    fn test_index_is_stable() {
        let mut vocab = Vocabulary::new();
        let fox = vocab.get_or_insert("fox");
        vocab.get_or_insert("dog");
        assert_eq!(vocab.get_or_insert("fox"), fox);
        assert_eq!(vocab.get("fox"), Some(fox));
        assert_eq!(vocab.len(), 2);
    }

    #[test]
    fn test_get_does_not_assign() {
        let mut vocab = Vocabulary::new();
        assert_eq!(vocab.get("fox"), None);
        assert!(vocab.is_empty());
        assert_eq!(vocab.get_or_insert("fox"), 0);
    }
}
