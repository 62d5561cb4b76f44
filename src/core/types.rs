// src/core/types.rs
use serde::{Deserialize, Serialize};

/// A short, fixed-length character sequence taken from a word, e.g. "th".
/// Two occurrences of the same string are the same n-gram.
pub type Ngram = String;

/// Mastery level of a bin. 0 is the weakest (newest) level.
pub type Level = usize;

/// One recorded keystroke from a practice session.
/// This is the record format of the session telemetry file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeystrokeEvent {
    /// What the user actually typed.
    pub input: char,
    /// What the practice text expected at this position.
    pub expected: char,
    pub correct: bool,
    /// The space-separated word of the practice text this position belongs to.
    pub word: String,
    /// Character offset of the expected character inside `word`.
    /// A trailing space is recorded at `word.chars().count()`.
    pub location_in_word: usize,
    /// Seconds since the unix epoch.
    pub timestamp: f64,
}

/// The n-grams observed in one session, with multiplicity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionOutcome {
    pub correct: Vec<Ngram>,
    pub typo: Vec<Ngram>,
}
