// File: src/ngram.rs
use crate::core::types::{KeystrokeEvent, Ngram, SessionOutcome};

/// N-gram lengths used when none are configured.
pub const DEFAULT_SIZES: [usize; 2] = [2, 3];

/// All n-grams of the given sizes that lie wholly inside `word` and cover
/// the character at `location`.
///
/// For "hello" at location 2 with size 2 this yields "el" and "ll".
/// Indexing is by character, so multi-byte letters count once.
pub fn create_ngrams(word: &str, location: usize, sizes: &[usize]) -> Vec<Ngram> {
    let chars: Vec<char> = word.chars().collect();
    let mut ngrams = Vec::new();

    for &n in sizes {
        if n == 0 || location >= chars.len() {
            continue;
        }
        let first_start = (location + 1).saturating_sub(n);
        for start in first_start..=location {
            let end = start + n;
            if end > chars.len() {
                break;
            }
            ngrams.push(chars[start..end].iter().collect());
        }
    }
    ngrams
}

/// Splits a session's keystrokes into correct and typo n-gram multisets.
pub fn extract(events: &[KeystrokeEvent], sizes: &[usize]) -> SessionOutcome {
    let mut outcome = SessionOutcome::default();
    for event in events {
        let ngrams = create_ngrams(&event.word, event.location_in_word, sizes);
        if event.correct {
            outcome.correct.extend(ngrams);
        } else {
            outcome.typo.extend(ngrams);
        }
    }
    outcome
}
