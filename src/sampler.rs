//! Level-biased sampling of n-grams for the next practice text.
//!
//! Levels are drawn from a geometric distribution, so weak levels dominate,
//! but every level up to the current maximum is guaranteed at least one slot.

use crate::core::error::{Result, SrsError};
use crate::core::store::SrsStore;
use crate::core::types::{Level, Ngram};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;
use tracing::debug;

pub const DEFAULT_DECAY: f64 = 0.5;

#[derive(Debug, Clone, Copy)]
pub struct Sampler {
    decay: f64,
}

impl Sampler {
    /// `decay` is the success probability of the geometric level draw.
    /// Higher values concentrate samples on level 0.
    pub fn new(decay: f64) -> Result<Self> {
        if decay > 0.0 && decay < 1.0 {
            Ok(Self { decay })
        } else {
            Err(SrsError::InvalidDecay(decay))
        }
    }

    pub fn decay(&self) -> f64 {
        self.decay
    }

    /// Draws up to `count` distinct n-grams from `store`.
    ///
    /// Returns fewer than `count` when the bins are too small to fill their
    /// share. When `count` is at least the number of non-empty levels, every
    /// one of them is represented. Errors only when the store holds no n-grams.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        store: &SrsStore,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<Ngram>> {
        let max_level = store.max_level()?;

        let mut tally: BTreeMap<Level, usize> = BTreeMap::new();
        for _ in 0..count {
            *tally.entry(self.draw_level(max_level, rng)).or_insert(0) += 1;
        }
        for level in 0..=max_level {
            tally.entry(level).or_insert(1);
        }

        // One pick per non-empty level survives truncation; the rest compete.
        let mut anchors = Vec::with_capacity(max_level + 1);
        let mut extras = Vec::with_capacity(count);
        for (&level, &wanted) in &tally {
            let Some(bin) = store.bin(level) else {
                continue;
            };
            let members: Vec<&Ngram> = bin.iter().collect();
            let take = wanted.min(members.len());
            let mut picks = members.choose_multiple(rng, take).map(|n| (*n).clone());
            anchors.extend(picks.next());
            extras.extend(picks);
            debug!(level, wanted, taken = take, "sampled bin");
        }

        anchors.shuffle(rng);
        anchors.truncate(count);
        extras.shuffle(rng);
        extras.truncate(count - anchors.len());

        let mut selected = anchors;
        selected.append(&mut extras);
        selected.shuffle(rng);
        Ok(selected)
    }

    /// Number of failures before the first success, capped at `max_level`.
    /// Equivalent to a clipped `Geometric(p) - 1` draw.
    fn draw_level<R: Rng + ?Sized>(&self, max_level: Level, rng: &mut R) -> Level {
        let mut level = 0;
        while level < max_level && !rng.gen_bool(self.decay) {
            level += 1;
        }
        level
    }
}

impl Default for Sampler {
    fn default() -> Self {
        Self {
            decay: DEFAULT_DECAY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn store_with(levels: &[&[&str]]) -> SrsStore {
        let mut store = SrsStore::new();
        for (level, ngrams) in levels.iter().enumerate() {
            for ngram in *ngrams {
                store.add_new(ngram).unwrap();
                for l in 0..level {
                    store.promote(ngram, l).unwrap();
                }
            }
        }
        store
    }

    #[test]
    fn rejects_decay_outside_unit_interval() {
        assert!(Sampler::new(0.0).is_err());
        assert!(Sampler::new(1.0).is_err());
        assert!(Sampler::new(-0.3).is_err());
        assert!(Sampler::new(0.3).is_ok());
    }

    #[test]
    fn empty_store_is_an_error() {
        let mut rng = StdRng::seed_from_u64(0);
        let store = SrsStore::new();
        let err = Sampler::default().sample(&store, 5, &mut rng).unwrap_err();
        assert!(matches!(err, SrsError::EmptyStore));
    }

    #[test]
    fn single_level_sample_stays_inside_bin() {
        let store = store_with(&[&["an", "th", "er"]]);
        let allowed: HashSet<&str> = ["an", "th", "er"].into();
        let sampler = Sampler::default();
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let picked = sampler.sample(&store, 2, &mut rng).unwrap();
            assert!(picked.len() <= 2);
            let distinct: HashSet<&str> = picked.iter().map(String::as_str).collect();
            assert_eq!(distinct.len(), picked.len());
            assert!(distinct.is_subset(&allowed));
        }
    }

    #[test]
    fn every_level_is_represented() {
        let store = store_with(&[&["aa", "ab", "ac", "ad"], &["ba", "bb"], &["ca"], &["da", "db"]]);
        let sampler = Sampler::default();
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let picked = sampler.sample(&store, 4, &mut rng).unwrap();
            let levels: HashSet<Level> = picked.iter().filter_map(|n| store.find(n)).collect();
            assert_eq!(levels, (0..=3).collect::<HashSet<_>>());
        }
    }

    #[test]
    fn small_store_under_samples() {
        let store = store_with(&[&["an"]]);
        let mut rng = StdRng::seed_from_u64(3);
        let picked = Sampler::default().sample(&store, 10, &mut rng).unwrap();
        assert_eq!(picked, vec!["an".to_string()]);
    }

    #[test]
    fn zero_count_returns_nothing() {
        let store = store_with(&[&["an"]]);
        let mut rng = StdRng::seed_from_u64(3);
        let picked = Sampler::default().sample(&store, 0, &mut rng).unwrap();
        assert!(picked.is_empty());
    }

    #[test]
    fn emptied_top_bin_is_not_sampled_from() {
        let mut store = store_with(&[&["an", "er"], &["th"]]);
        store.demote("th", 1).unwrap();
        assert_eq!(store.max_level().unwrap(), 0);

        let mut rng = StdRng::seed_from_u64(9);
        let picked = Sampler::default().sample(&store, 3, &mut rng).unwrap();
        let mut sorted = picked.clone();
        sorted.sort();
        assert_eq!(sorted, vec!["an", "er", "th"]);
    }

    #[test]
    fn emptied_middle_bin_still_samples_the_rest() {
        let mut store = store_with(&[&["an"], &["er"], &["th"]]);
        store.demote("er", 1).unwrap();
        assert!(store.bin(1).unwrap().is_empty());
        assert_eq!(store.max_level().unwrap(), 2);

        let mut rng = StdRng::seed_from_u64(11);
        let picked = Sampler::default().sample(&store, 3, &mut rng).unwrap();
        assert!(picked.contains(&"th".to_string()));
        assert!(picked.len() <= 3);
        assert!(picked.iter().all(|n| store.find(n).is_some()));
    }

    #[test]
    fn high_decay_favours_level_zero() {
        let weak: Vec<String> = (0..40).map(|i| format!("w{i:02}")).collect();
        let strong: Vec<String> = (0..40).map(|i| format!("s{i:02}")).collect();
        let weak_refs: Vec<&str> = weak.iter().map(String::as_str).collect();
        let strong_refs: Vec<&str> = strong.iter().map(String::as_str).collect();
        let store = store_with(&[&weak_refs, &strong_refs]);

        let mut rng = StdRng::seed_from_u64(5);
        let picked = Sampler::new(0.9).unwrap().sample(&store, 20, &mut rng).unwrap();
        let at_zero = picked.iter().filter(|n| store.find(n) == Some(0)).count();
        assert!(at_zero > picked.len() / 2);
    }
}
