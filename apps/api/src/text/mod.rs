//! Text utilities shared by the metric evaluators: normalization, tokenization,
//! sentence splitting, stopword filtering and syllable counting.
//!
//! Everything here is a pure function of its input.

use std::collections::{BTreeSet, HashSet};
use std::sync::OnceLock;

use regex::Regex;

static STOP_WORDS: OnceLock<HashSet<&'static str>> = OnceLock::new();
static SENTENCE_BOUNDARY: OnceLock<Regex> = OnceLock::new();

/// Basic English stopwords used for content-token extraction.
const STOP_WORD_LIST: &[&str] = &[
    "the", "a", "an", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had",
    "do", "does", "did", "will", "would", "could", "should", "may", "might", "must", "shall",
    "can", "need", "dare", "ought", "used", "to", "of", "in", "for", "on", "with", "at", "by",
    "from", "as", "into", "through", "during", "before", "after", "above", "below", "between",
    "under", "again", "further", "then", "once", "here", "there", "when", "where", "why", "how",
    "all", "each", "few", "more", "most", "other", "some", "such", "no", "nor", "not", "only",
    "own", "same", "so", "than", "too", "very", "just", "and", "but", "if", "or", "because",
    "until", "while", "this", "that", "these", "those", "i", "me", "my", "myself", "we", "our",
    "ours", "ourselves", "you", "your", "yours", "yourself", "yourselves", "he", "him", "his",
    "himself", "she", "her", "hers", "herself", "it", "its", "itself", "they", "them", "their",
    "theirs",
];

const VOWELS: &[char] = &['a', 'e', 'i', 'o', 'u', 'y'];

fn stop_words() -> &'static HashSet<&'static str> {
    STOP_WORDS.get_or_init(|| STOP_WORD_LIST.iter().copied().collect())
}

fn sentence_boundary() -> &'static Regex {
    SENTENCE_BOUNDARY.get_or_init(|| Regex::new(r"[.!?]+").expect("static sentence regex"))
}

pub fn is_stop_word(word: &str) -> bool {
    stop_words().contains(word)
}

/// Collapses runs of whitespace to a single space and trims both ends.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Replaces every character that is neither a word character nor whitespace
/// with a space, lowercases, and splits on whitespace.
pub fn tokenize_simple(text: &str) -> Vec<String> {
    let stripped: String = text
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    stripped
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Splits on runs of `.`, `!` and `?`, trimming fragments and dropping empty ones.
pub fn split_sentences(text: &str) -> Vec<String> {
    sentence_boundary()
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Content tokens of `text`: lowercase, not a stopword, longer than two
/// characters and purely alphabetic. Ordered so callers iterate deterministically.
pub fn tokenize_and_filter(text: &str) -> BTreeSet<String> {
    tokenize_simple(text)
        .into_iter()
        .filter(|t| !is_stop_word(t))
        .filter(|t| t.chars().count() > 2 && t.chars().all(char::is_alphabetic))
        .collect()
}

/// Heuristic syllable count: one per transition into a vowel group, minus a
/// trailing silent "e" when more than one syllable was counted. Never below 1
/// for a non-empty word; an empty word has 0.
pub fn count_syllables(word: &str) -> usize {
    let chars: Vec<char> = word.to_lowercase().chars().collect();
    if chars.is_empty() {
        return 0;
    }

    let is_vowel = |c: &char| VOWELS.contains(c);

    let mut count = usize::from(is_vowel(&chars[0]));
    for pair in chars.windows(2) {
        if is_vowel(&pair[1]) && !is_vowel(&pair[0]) {
            count += 1;
        }
    }

    if chars.last() == Some(&'e') && count > 1 {
        count -= 1;
    }

    count.max(1)
}

/// Jaccard similarity `|A∩B| / |A∪B|`; 0.0 when both sets are empty.
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_collapses_whitespace() {
        assert_eq!(clean_text("  hello \n\t world  "), "hello world");
        assert_eq!(clean_text("   "), "");
    }

    #[test]
    fn test_tokenize_simple_strips_punctuation() {
        assert_eq!(
            tokenize_simple("Object-Oriented Programming, right?"),
            vec!["object", "oriented", "programming", "right"]
        );
    }

    #[test]
    fn test_tokenize_simple_keeps_digits_and_underscores() {
        assert_eq!(tokenize_simple("HTTP_2 in 2024"), vec!["http_2", "in", "2024"]);
    }

    #[test]
    fn test_split_sentences_handles_runs_of_terminators() {
        let sentences = split_sentences("First one... Second one?! Third");
        assert_eq!(sentences, vec!["First one", "Second one", "Third"]);
    }

    #[test]
    fn test_split_sentences_drops_empty_fragments() {
        assert!(split_sentences("...!!?").is_empty());
        assert!(split_sentences("").is_empty());
    }

    #[test]
    fn test_tokenize_and_filter_removes_stopwords_and_short_tokens() {
        let tokens = tokenize_and_filter("The API is an HTTP2 interface to our database");
        let expected: BTreeSet<String> = ["api", "database", "interface"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(tokens, expected);
    }

    #[test]
    fn test_tokenize_and_filter_collapses_duplicates() {
        let tokens = tokenize_and_filter("cache cache CACHE");
        assert_eq!(tokens.len(), 1);
    }

    #[test]
    fn test_count_syllables() {
        assert_eq!(count_syllables("cat"), 1);
        assert_eq!(count_syllables("table"), 1);
        assert_eq!(count_syllables("because"), 2);
        assert_eq!(count_syllables("popular"), 3);
        assert_eq!(count_syllables("encapsulation"), 5);
        assert_eq!(count_syllables("sql"), 1, "no vowels still floors at 1");
        assert_eq!(count_syllables(""), 0);
    }

    #[test]
    fn test_jaccard() {
        let a = tokenize_and_filter("rust memory safety");
        let b = tokenize_and_filter("memory safety guarantees");
        assert!((jaccard(&a, &b) - 0.5).abs() < f64::EPSILON);
        assert_eq!(jaccard(&BTreeSet::new(), &BTreeSet::new()), 0.0);
    }
}
