// src/core/store.rs
use crate::core::error::{Result, SrsError};
use crate::core::types::{Level, Ngram};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// The n-grams currently sitting at one mastery level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SrsBin {
    ngrams: BTreeSet<Ngram>,
}

impl SrsBin {
    pub fn contains(&self, ngram: &str) -> bool {
        self.ngrams.contains(ngram)
    }

    pub fn len(&self) -> usize {
        self.ngrams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ngrams.is_empty()
    }

    /// N-grams in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = &Ngram> {
        self.ngrams.iter()
    }
}

/// Bin-indexed spaced-repetition store.
///
/// Every n-gram lives in at most one bin. Bins are created lazily and are
/// never removed, so a bin can exist and be empty. Alongside the bins the
/// store remembers which sessions were already folded into it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SrsStore {
    bins: BTreeMap<Level, SrsBin>,
    sessions: Vec<String>,
}

impl SrsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finds the level holding `ngram`, if any.
    /// O(b) lookups where b is the number of bins.
    pub fn find(&self, ngram: &str) -> Option<Level> {
        self.bins
            .iter()
            .find(|(_, bin)| bin.contains(ngram))
            .map(|(&level, _)| level)
    }

    /// Returns the bin at `level`, creating an empty one if needed.
    pub fn get_or_create_bin(&mut self, level: Level) -> &mut SrsBin {
        self.bins.entry(level).or_default()
    }

    pub fn bin(&self, level: Level) -> Option<&SrsBin> {
        self.bins.get(&level)
    }

    /// All bins in ascending level order, empty ones included.
    pub fn bins(&self) -> impl Iterator<Item = (Level, &SrsBin)> {
        self.bins.iter().map(|(&level, bin)| (level, bin))
    }

    /// Inserts a never-seen n-gram at level 0.
    pub fn add_new(&mut self, ngram: &str) -> Result<()> {
        if let Some(level) = self.find(ngram) {
            return Err(SrsError::AlreadyPresent {
                ngram: ngram.to_string(),
                level,
            });
        }
        self.get_or_create_bin(0).ngrams.insert(ngram.to_string());
        Ok(())
    }

    /// Moves `ngram` from `level` to `level + 1`.
    pub fn promote(&mut self, ngram: &str, level: Level) -> Result<()> {
        self.take(ngram, level)?;
        self.get_or_create_bin(level + 1)
            .ngrams
            .insert(ngram.to_string());
        Ok(())
    }

    /// Moves `ngram` from `level` to `level - 1`. Level 0 is the floor.
    pub fn demote(&mut self, ngram: &str, level: Level) -> Result<()> {
        if level == 0 {
            if self.bin(0).is_some_and(|bin| bin.contains(ngram)) {
                return Ok(());
            }
            return Err(SrsError::NotAtLevel {
                ngram: ngram.to_string(),
                level,
            });
        }
        let below = level - 1;
        if !self.bins.contains_key(&below) {
            return Err(SrsError::MissingLevel {
                level: below,
                above: level,
            });
        }
        self.take(ngram, level)?;
        self.get_or_create_bin(below).ngrams.insert(ngram.to_string());
        Ok(())
    }

    fn take(&mut self, ngram: &str, level: Level) -> Result<()> {
        let removed = self
            .bins
            .get_mut(&level)
            .is_some_and(|bin| bin.ngrams.remove(ngram));
        if removed {
            Ok(())
        } else {
            Err(SrsError::NotAtLevel {
                ngram: ngram.to_string(),
                level,
            })
        }
    }

    /// Highest level whose bin holds at least one n-gram.
    /// Emptied bins above it are ignored.
    pub fn max_level(&self) -> Result<Level> {
        self.bins
            .iter()
            .rev()
            .find(|(_, bin)| !bin.is_empty())
            .map(|(&level, _)| level)
            .ok_or(SrsError::EmptyStore)
    }

    /// True when no n-gram appears in more than one bin.
    pub fn check_integrity(&self) -> bool {
        self.first_duplicate().is_none()
    }

    /// Like [`check_integrity`](Self::check_integrity) but names the offender.
    pub fn verify(&self) -> Result<()> {
        match self.first_duplicate() {
            Some(ngram) => Err(SrsError::Duplicate { ngram }),
            None => Ok(()),
        }
    }

    fn first_duplicate(&self) -> Option<Ngram> {
        let mut seen = HashSet::new();
        self.bins
            .values()
            .flat_map(|bin| bin.iter())
            .find(|ngram| !seen.insert(ngram.as_str()))
            .cloned()
    }

    /// Total number of tracked n-grams.
    pub fn len(&self) -> usize {
        self.bins.values().map(SrsBin::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.values().all(SrsBin::is_empty)
    }

    pub fn has_session(&self, session_id: &str) -> bool {
        self.sessions.iter().any(|s| s == session_id)
    }

    pub(crate) fn record_session(&mut self, session_id: &str) {
        self.sessions.push(session_id.to_string());
    }

    /// Applied session ids, oldest first.
    pub fn sessions(&self) -> &[String] {
        &self.sessions
    }

    #[cfg(test)]
    pub(crate) fn insert_unchecked(&mut self, ngram: &str, level: Level) {
        self.get_or_create_bin(level)
            .ngrams
            .insert(ngram.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_new_lands_in_level_zero() {
        let mut store = SrsStore::new();
        store.add_new("th").unwrap();
        assert_eq!(store.find("th"), Some(0));
        assert_eq!(store.find("er"), None);
    }

    #[test]
    fn add_new_rejects_existing() {
        let mut store = SrsStore::new();
        store.add_new("th").unwrap();
        store.promote("th", 0).unwrap();
        let err = store.add_new("th").unwrap_err();
        assert!(matches!(err, SrsError::AlreadyPresent { level: 1, .. }));
        assert!(store.check_integrity());
    }

    #[test]
    fn promote_moves_exactly_one_level() {
        let mut store = SrsStore::new();
        store.add_new("th").unwrap();
        store.promote("th", 0).unwrap();
        store.promote("th", 1).unwrap();
        assert_eq!(store.find("th"), Some(2));
        assert!(store.bin(1).unwrap().is_empty());
    }

    #[test]
    fn promote_requires_presence() {
        let mut store = SrsStore::new();
        store.add_new("th").unwrap();
        let err = store.promote("th", 1).unwrap_err();
        assert!(matches!(err, SrsError::NotAtLevel { level: 1, .. }));
        assert_eq!(store.find("th"), Some(0));
    }

    #[test]
    fn demote_at_floor_is_noop() {
        let mut store = SrsStore::new();
        store.add_new("th").unwrap();
        store.demote("th", 0).unwrap();
        assert_eq!(store.find("th"), Some(0));
    }

    #[test]
    fn demote_moves_down() {
        let mut store = SrsStore::new();
        store.add_new("th").unwrap();
        store.promote("th", 0).unwrap();
        store.demote("th", 1).unwrap();
        assert_eq!(store.find("th"), Some(0));
    }

    #[test]
    fn demote_into_missing_level_is_corruption() {
        let mut store = SrsStore::new();
        store.insert_unchecked("th", 3);
        let err = store.demote("th", 3).unwrap_err();
        assert!(matches!(err, SrsError::MissingLevel { level: 2, above: 3 }));
        // Nothing was removed on failure.
        assert_eq!(store.find("th"), Some(3));
    }

    #[test]
    fn max_level_of_empty_store_is_an_error() {
        let store = SrsStore::new();
        assert!(matches!(store.max_level(), Err(SrsError::EmptyStore)));
    }

    #[test]
    fn max_level_ignores_emptied_top_bin() {
        let mut store = SrsStore::new();
        store.add_new("th").unwrap();
        store.add_new("er").unwrap();
        store.promote("th", 0).unwrap();
        assert_eq!(store.max_level().unwrap(), 1);

        store.demote("th", 1).unwrap();
        assert!(store.bin(1).is_some());
        assert_eq!(store.max_level().unwrap(), 0);
    }

    #[test]
    fn all_bins_emptied_counts_as_empty() {
        let mut store = SrsStore::new();
        store.get_or_create_bin(0);
        assert!(store.is_empty());
        assert!(matches!(store.max_level(), Err(SrsError::EmptyStore)));
    }

    #[test]
    fn integrity_detects_duplicates() {
        let mut store = SrsStore::new();
        store.add_new("th").unwrap();
        assert!(store.check_integrity());
        store.insert_unchecked("th", 1);
        assert!(!store.check_integrity());
        assert!(matches!(store.verify(), Err(SrsError::Duplicate { ngram }) if ngram == "th"));
    }
}
