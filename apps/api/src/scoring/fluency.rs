//! Fluency, scored as four sub-scores of up to 25 points each: sentence length,
//! readability, coherence (transition words) and completeness (word count).

use serde::Serialize;
use serde_json::json;

use crate::scoring::types::{details, round2, MetricScore, MAX_SCORE};
use crate::text::{count_syllables, split_sentences, tokenize_simple};

pub const FLUENCY_WEIGHT: f64 = 0.25;
pub const COMPONENT_MAX: u32 = 25;
/// Added to the sentence-length component when sentence lengths vary enough.
pub const VARIETY_BONUS: u32 = 5;
pub const VARIETY_MIN_SENTENCES: usize = 3;
pub const VARIETY_MIN_SPREAD: usize = 5;

/// Transition words and phrases, matched as case-insensitive substrings.
pub const TRANSITION_WORDS: &[&str] = &[
    "however", "therefore", "furthermore", "moreover", "additionally", "consequently",
    "meanwhile", "nevertheless", "nonetheless", "for example", "for instance", "in addition",
    "on the other hand", "in conclusion", "to summarize", "first", "second", "third", "finally",
    "next", "then", "also", "besides", "thus", "hence", "similarly", "likewise", "in contrast",
    "although", "even though", "because", "since", "as a result", "specifically",
    "particularly",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FluencyComponents {
    pub sentence_length: u32,
    pub readability: u32,
    pub coherence: u32,
    pub completeness: u32,
}

impl FluencyComponents {
    pub fn total(&self) -> u32 {
        self.sentence_length + self.readability + self.coherence + self.completeness
    }
}

/// Flesch Reading Ease, clamped to [0, 100]. `None` without words or sentences.
pub fn flesch_reading_ease(words: &[String], sentence_count: usize) -> Option<f64> {
    if words.is_empty() || sentence_count == 0 {
        return None;
    }
    let word_count = words.len() as f64;
    let syllables: usize = words.iter().map(|w| count_syllables(w)).sum();

    let flesch = 206.835
        - 1.015 * (word_count / sentence_count as f64)
        - 84.6 * (syllables as f64 / word_count);
    Some(flesch.clamp(0.0, 100.0))
}

fn sentence_length_points(lengths: &[usize]) -> (u32, f64) {
    if lengths.is_empty() {
        return (0, 0.0);
    }
    let avg = lengths.iter().sum::<usize>() as f64 / lengths.len() as f64;

    let mut points = if (10.0..=25.0).contains(&avg) {
        25
    } else if (5.0..10.0).contains(&avg) || (avg > 25.0 && avg <= 35.0) {
        15
    } else {
        5
    };

    if lengths.len() >= VARIETY_MIN_SENTENCES {
        let longest = lengths.iter().copied().max().unwrap_or(0);
        let shortest = lengths.iter().copied().min().unwrap_or(0);
        if longest - shortest >= VARIETY_MIN_SPREAD {
            points = (points + VARIETY_BONUS).min(COMPONENT_MAX);
        }
    }

    (points, avg)
}

fn readability_points(flesch: Option<f64>) -> u32 {
    match flesch {
        None => 0,
        Some(f) if (50.0..=80.0).contains(&f) => 25,
        Some(f) if (30.0..50.0).contains(&f) || (f > 80.0 && f <= 90.0) => 15,
        Some(_) => 10,
    }
}

fn coherence_points(transitions_found: usize) -> u32 {
    match transitions_found {
        0 => 5,
        1..=2 => 15,
        _ => 25,
    }
}

fn completeness_points(word_count: usize) -> u32 {
    match word_count {
        50..=300 => 25,
        30..=49 | 301..=500 => 15,
        15..=29 => 10,
        _ => 5,
    }
}

/// Transition words present in `text`, in `TRANSITION_WORDS` order.
pub fn transitions_in(text: &str) -> Vec<&'static str> {
    let lower = text.to_lowercase();
    TRANSITION_WORDS
        .iter()
        .copied()
        .filter(|t| lower.contains(t))
        .collect()
}

#[derive(Debug, Clone)]
pub struct FluencyEvaluator {
    weight: f64,
}

impl FluencyEvaluator {
    pub fn new(weight: f64) -> Self {
        Self { weight }
    }

    pub fn evaluate(&self, answer: &str) -> MetricScore {
        let sentences = split_sentences(answer);
        let words = tokenize_simple(answer);
        let lengths: Vec<usize> = sentences.iter().map(|s| tokenize_simple(s).len()).collect();

        let (sentence_length, avg_sentence_length) = sentence_length_points(&lengths);
        let flesch = flesch_reading_ease(&words, sentences.len());
        let transitions = transitions_in(answer);

        let components = FluencyComponents {
            sentence_length,
            readability: readability_points(flesch),
            coherence: coherence_points(transitions.len()),
            completeness: completeness_points(words.len()),
        };
        let total = f64::from(components.total()).min(MAX_SCORE);

        let info = details(json!({
            "avg_sentence_length": round2(avg_sentence_length),
            "sentence_count": sentences.len(),
            "flesch_reading_ease": round2(flesch.unwrap_or(0.0)),
            "transition_words_found": transitions,
            "word_count": words.len(),
            "components": components,
        }));

        MetricScore::new(total, self.weight, fluency_feedback(total), info)
    }
}

fn fluency_feedback(score: f64) -> &'static str {
    if score >= 80.0 {
        "Excellent fluency! Your answer is well-structured and easy to follow."
    } else if score >= 60.0 {
        "Good fluency. Consider adding transition words for better flow."
    } else if score >= 40.0 {
        "Fair fluency. Try varying sentence length and using connecting phrases."
    } else {
        "Needs improvement. Focus on complete sentences and logical flow."
    }
}
