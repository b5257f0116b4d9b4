use rust_stemmers::{Algorithm, Stemmer};

use super::Lemmatizer;

/// Endings a word may carry past its stem and still be an inflection of it.
const INFLECTIONS: &[&str] = &["", "e", "s", "es", "d", "ed", "ing", "y", "ies", "ied"];

/// Inflection-only lemmatizer on top of the Snowball English stemmer.
///
/// A word is reduced to its stem only when what the stemmer removed is an
/// inflectional ending ("classes" → "class", "using" → "use"). Derivational
/// endings are left alone, so "relational" and "relatively" stay distinct
/// even though both stem to "relat".
pub struct StemmerLemmatizer {
    stemmer: Stemmer,
}

impl StemmerLemmatizer {
    pub fn english() -> Self {
        Self {
            stemmer: Stemmer::create(Algorithm::English),
        }
    }
}

/// Whether `word` is `stem` plus an inflectional ending. Handles the
/// stemmer's restored "e" and "y" → "i" as well as consonant doubling.
fn is_inflection_of(word: &str, stem: &str) -> bool {
    let root = stem.strip_suffix(['e', 'i']).unwrap_or(stem);
    let Some(mut rest) = word.strip_prefix(root) else {
        return false;
    };
    if let Some(last) = root.chars().last() {
        if rest.len() > 1 && rest.starts_with(last) {
            let undoubled = &rest[last.len_utf8()..];
            if undoubled == "ed" || undoubled == "ing" {
                rest = undoubled;
            }
        }
    }
    INFLECTIONS.contains(&rest)
}

impl Lemmatizer for StemmerLemmatizer {
    fn lemmatize(&self, word: &str) -> String {
        let word = word.to_lowercase();
        let stem = self.stemmer.stem(&word);
        if is_inflection_of(&word, &stem) {
            stem.into_owned()
        } else {
            word
        }
    }
}
