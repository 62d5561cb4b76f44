//! Turns sampled n-grams into readable practice text.
//!
//! N-grams are mapped back to dictionary words that contain them. An n-gram
//! no word contains is practiced on its own.

use crate::core::error::{Result, SrsError};
use crate::core::types::Ngram;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Used when no dictionary is configured and nothing has been learned yet.
pub const FALLBACK_TEXT: &str = "the quick brown fox jumps over the lazy dog \
pack my box with five dozen liquor jugs \
how vexingly quick daft zebras jump \
sphinx of black quartz judge my vow";

/// Loads a whitespace-separated word list, dropping duplicates.
/// Words shorter than `min_len` characters are skipped.
pub fn load_dictionary(path: &Path, min_len: usize) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    let words: BTreeSet<&str> = content
        .split_whitespace()
        .filter(|w| w.chars().count() >= min_len)
        .collect();

    if words.is_empty() {
        return Err(SrsError::EmptyDictionary(path.to_path_buf()));
    }
    Ok(words.into_iter().map(str::to_string).collect())
}

/// Distinct dictionary words that contain at least one of `ngrams`.
pub fn words_containing<'a>(ngrams: &[Ngram], dictionary: &'a [String]) -> BTreeSet<&'a str> {
    dictionary
        .iter()
        .filter(|word| ngrams.iter().any(|ngram| word.contains(ngram.as_str())))
        .map(String::as_str)
        .collect()
}

/// Builds a space-joined practice string of `word_count` items.
///
/// The pool is every matching dictionary word plus each n-gram that matched
/// nothing. Items repeat only once the whole pool has been used.
pub fn assemble<R: Rng + ?Sized>(
    ngrams: &[Ngram],
    dictionary: &[String],
    word_count: usize,
    rng: &mut R,
) -> String {
    let mut pool: Vec<&str> = words_containing(ngrams, dictionary).into_iter().collect();
    for ngram in ngrams {
        if !dictionary.iter().any(|word| word.contains(ngram.as_str())) {
            pool.push(ngram.as_str());
        }
    }
    fill_from_pool(pool, word_count, rng)
}

/// Random practice text straight from the dictionary, for a store with no
/// n-grams yet.
pub fn random_words<R: Rng + ?Sized>(dictionary: &[String], word_count: usize, rng: &mut R) -> String {
    let pool = if dictionary.is_empty() {
        FALLBACK_TEXT.split_whitespace().collect()
    } else {
        dictionary.iter().map(String::as_str).collect()
    };
    fill_from_pool(pool, word_count, rng)
}

fn fill_from_pool<R: Rng + ?Sized>(mut pool: Vec<&str>, word_count: usize, rng: &mut R) -> String {
    pool.sort_unstable();
    pool.dedup();
    if pool.is_empty() {
        return String::new();
    }

    let mut words = Vec::with_capacity(word_count);
    while words.len() < word_count {
        pool.shuffle(rng);
        let remaining = word_count - words.len();
        words.extend(pool.iter().take(remaining).copied());
    }
    words.join(" ")
}
