//! Practice session state
//!
//! Tracks:
//! - The target text and the cursor inside it
//! - Every keystroke as a [`KeystrokeEvent`], including ones later erased
//! - What is currently typed, for rendering

use crate::core::types::KeystrokeEvent;

/// For every character of `text`, the index of the space-separated word it
/// belongs to. A space belongs to the word before it.
pub fn index_text_to_words(text: &str) -> (Vec<&str>, Vec<usize>) {
    let words = text.split(' ').collect();
    let mut indices = Vec::with_capacity(text.len());
    let mut counter = 0;
    for c in text.chars() {
        indices.push(counter);
        if c == ' ' {
            counter += 1;
        }
    }
    (words, indices)
}

/// One character the user has typed over the target text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TypedChar {
    pub input: char,
    pub correct: bool,
}

/// A single run through one practice text.
#[derive(Clone, Debug)]
pub struct PracticeSession {
    target: Vec<char>,
    /// (word, offset in word) per target position
    positions: Vec<(String, usize)>,
    typed: Vec<TypedChar>,
    events: Vec<KeystrokeEvent>,
}

impl PracticeSession {
    pub fn new(text: &str) -> Self {
        let (words, word_indices) = index_text_to_words(text);
        let mut positions = Vec::with_capacity(word_indices.len());
        let mut offset = 0;
        let mut previous = 0;
        for &word_idx in &word_indices {
            if word_idx != previous {
                offset = 0;
                previous = word_idx;
            }
            let word = words.get(word_idx).copied().unwrap_or_default();
            positions.push((word.to_string(), offset));
            offset += 1;
        }

        PracticeSession {
            target: text.chars().collect(),
            positions,
            typed: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn target(&self) -> &[char] {
        &self.target
    }

    pub fn typed(&self) -> &[TypedChar] {
        &self.typed
    }

    pub fn cursor(&self) -> usize {
        self.typed.len()
    }

    /// Character expected next, `None` once the text is done.
    pub fn expected(&self) -> Option<char> {
        self.target.get(self.cursor()).copied()
    }

    pub fn is_finished(&self) -> bool {
        self.cursor() >= self.target.len()
    }

    /// Records a keystroke against the current position and advances.
    /// Returns whether it matched. Ignored once finished.
    pub fn type_char(&mut self, input: char, timestamp: f64) -> Option<bool> {
        let expected = self.expected()?;
        let (word, location_in_word) = self.positions[self.cursor()].clone();
        let correct = input == expected;

        self.events.push(KeystrokeEvent {
            input,
            expected,
            correct,
            word,
            location_in_word,
            timestamp,
        });
        self.typed.push(TypedChar { input, correct });
        Some(correct)
    }

    /// Steps back one character. Recorded events stay, so a corrected typo
    /// still counts as a typo.
    pub fn backspace(&mut self) {
        self.typed.pop();
    }

    /// Share of recorded keystrokes that were correct; 1.0 before any input.
    pub fn accuracy(&self) -> f32 {
        if self.events.is_empty() {
            return 1.0;
        }
        let correct = self.events.iter().filter(|e| e.correct).count();
        correct as f32 / self.events.len() as f32
    }

    pub fn events(&self) -> &[KeystrokeEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<KeystrokeEvent> {
        self.events
    }
}
