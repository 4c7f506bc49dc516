//! Text preprocessing: lowercase, ASCII-alphanumeric cleanup, word split, stop word removal.
//!
//! Every character that is not an ASCII letter, digit, or whitespace is replaced
//! by a space before splitting, so tokens only ever contain `[a-z0-9]`. Stop words
//! come from the standard English list (the NLTK set, minus entries containing an
//! apostrophe, which cleanup makes unreachable). No stemming is applied.
//! Uses a zero-per-token allocation design via byte spans.

use std::collections::HashSet;
use std::sync::LazyLock;

static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
        "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
        "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
        "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
        "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
        "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by",
        "for", "with", "about", "against", "between", "into", "through", "during", "before",
        "after", "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
        "under", "again", "further", "then", "once", "here", "there", "when", "where", "why",
        "how", "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
        "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s", "t", "can", "will",
        "just", "don", "should", "now", "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren",
        "couldn", "didn", "doesn", "hadn", "hasn", "haven", "isn", "ma", "mightn", "mustn",
        "needn", "shan", "shouldn", "wasn", "weren", "won", "wouldn",
    ]
    .into_iter()
    .collect()
});

/// Fused colloquial forms that the word splitter breaks in two, with the split offset.
const SPLIT_WORDS: &[(&str, usize)] = &[
    ("cannot", 3),
    ("gimme", 3),
    ("gonna", 3),
    ("gotta", 3),
    ("lemme", 3),
    ("wanna", 3),
];

/// Returns `true` if `token` is in the English stop word set.
pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(token)
}

/// Preprocessed text: owns the cleaned buffer, provides &str slices via byte spans.
/// Only 1 heap allocation for the buffer instead of N per-token Strings.
#[derive(Debug, Clone, Default)]
pub struct Tokens {
    buffer: String,
    spans: Vec<(u32, u32)>, // (start, end) byte offsets into buffer
}

impl Tokens {
    /// Returns an iterator over the token `&str` slices, in text order.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.spans
            .iter()
            .map(|&(s, e)| &self.buffer[s as usize..e as usize])
    }

    /// Returns the number of tokens (duplicates included).
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Returns `true` if there are no tokens.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Copies the tokens out into owned strings.
    pub fn to_vec(&self) -> Vec<String> {
        self.iter().map(str::to_owned).collect()
    }
}

/// Preprocess text: lowercase, replace non-ASCII-alphanumeric characters with spaces,
/// split into words, and drop stop words.
///
/// The result may be empty for text made only of punctuation and stop words.
pub fn preprocess(text: &str) -> Tokens {
    let buffer: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    let mut spans = Vec::new();
    let mut start: Option<usize> = None;
    for (i, c) in buffer.char_indices() {
        if c.is_whitespace() {
            if let Some(s) = start.take() {
                push_word(&buffer, s, i, &mut spans);
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    // Handle last word (no trailing separator)
    if let Some(s) = start {
        push_word(&buffer, s, buffer.len(), &mut spans);
    }

    Tokens { buffer, spans }
}

fn push_word(buffer: &str, start: usize, end: usize, spans: &mut Vec<(u32, u32)>) {
    let word = &buffer[start..end];
    let parts = match SPLIT_WORDS.iter().find(|(w, _)| *w == word) {
        Some(&(_, at)) => [(start, start + at), (start + at, end)],
        None => [(start, end), (end, end)],
    };
    for (s, e) in parts {
        if s < e && !is_stop_word(&buffer[s..e]) {
            spans.push((s as u32, e as u32));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str) -> Vec<String> {
        preprocess(text).to_vec()
    }

    #[test]
    fn test_preprocess_drops_stop_words() {
        assert_eq!(
            words("The quick brown fox jumps over the lazy dog"),
            vec!["quick", "brown", "fox", "jumps", "lazy", "dog"]
        );
    }

    #[test]
    fn test_punctuation_becomes_separator() {
        assert_eq!(words("state-of-the-art, e.g. C++!"), vec!["state", "art", "e", "g", "c"]);
        // the trailing "s" of a possessive is a stop word
        assert_eq!(words("rust's"), vec!["rust"]);
    }

    #[test]
    fn test_non_ascii_letters_are_separators() {
        // "ve" is left over from "naïve" and is a stop word
        assert_eq!(words("Café naïve"), vec!["caf", "na"]);
    }

    #[test]
    fn test_digits_are_kept() {
        assert_eq!(words("Chapter 12: 1937 edition"), vec!["chapter", "12", "1937", "edition"]);
    }

    #[test]
    fn test_duplicates_preserved_in_order() {
        assert_eq!(words("fox FOX Fox"), vec!["fox", "fox", "fox"]);
    }

    #[test]
    fn test_fused_forms_are_split() {
        assert_eq!(words("gonna wanna"), vec!["gon", "na", "wan", "na"]);
        // "can" and "not" are both stop words
        assert!(words("cannot").is_empty());
    }

    #[test]
    fn test_empty_and_degenerate_input() {
        assert!(preprocess("").is_empty());
        assert!(preprocess("   \t\n").is_empty());
        assert!(preprocess("!!! ... ???").is_empty());
        assert!(preprocess("the and of a").is_empty());
    }

    #[test]
    fn test_len_counts_tokens() {
        let tokens = preprocess("alpha beta, gamma");
        assert_eq!(tokens.len(), 3);
        assert!(!tokens.is_empty());
    }
}
