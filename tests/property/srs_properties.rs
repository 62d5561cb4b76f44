use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use srs_core::{LearningEngine, Sampler, SessionOutcome, SrsStore};
use std::collections::{HashMap, HashSet};

const ALPHABET: [&str; 6] = ["th", "he", "er", "an", "in", "the"];

#[derive(Debug, Clone, Copy)]
enum Op {
    Add(usize),
    Promote(usize),
    Demote(usize),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..ALPHABET.len()).prop_map(Op::Add),
        (0..ALPHABET.len()).prop_map(Op::Promote),
        (0..ALPHABET.len()).prop_map(Op::Demote),
    ]
}

fn arb_ngrams() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop::sample::select(ALPHABET.to_vec()).prop_map(String::from),
        0..12,
    )
}

// ── Uniqueness under valid operation sequences ──────────────────────────

proptest! {
    #[test]
    fn ngrams_never_share_bins(ops in prop::collection::vec(arb_op(), 0..64)) {
        let mut store = SrsStore::new();
        let mut model: HashMap<&str, usize> = HashMap::new();

        for op in ops {
            match op {
                Op::Add(i) => {
                    let ngram = ALPHABET[i];
                    if store.find(ngram).is_none() {
                        store.add_new(ngram).unwrap();
                        model.insert(ngram, 0);
                    } else {
                        prop_assert!(store.add_new(ngram).is_err());
                    }
                }
                Op::Promote(i) => {
                    let ngram = ALPHABET[i];
                    if let Some(level) = store.find(ngram) {
                        store.promote(ngram, level).unwrap();
                        prop_assert_eq!(store.find(ngram), Some(level + 1));
                        model.insert(ngram, level + 1);
                    }
                }
                Op::Demote(i) => {
                    let ngram = ALPHABET[i];
                    if let Some(level) = store.find(ngram) {
                        store.demote(ngram, level).unwrap();
                        let expected = level.saturating_sub(1);
                        prop_assert_eq!(store.find(ngram), Some(expected));
                        model.insert(ngram, expected);
                    }
                }
            }
            prop_assert!(store.check_integrity());
        }

        prop_assert_eq!(store.len(), model.len());
        for (ngram, level) in model {
            prop_assert_eq!(store.find(ngram), Some(level));
        }
    }
}

// ── Update engine ───────────────────────────────────────────────────────

proptest! {
    #[test]
    fn replay_changes_nothing(
        sessions in prop::collection::vec((arb_ngrams(), arb_ngrams()), 1..6),
        seed in any::<u64>(),
    ) {
        let engine = LearningEngine::new();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut store = SrsStore::new();

        for (i, (correct, typo)) in sessions.iter().enumerate() {
            let outcome = SessionOutcome { correct: correct.clone(), typo: typo.clone() };
            let id = format!("s{i}");
            let before = store.clone();
            engine.apply(&mut store, &outcome, &id, &mut rng).unwrap();

            // n-grams move by at most one level per session
            for ngram in ALPHABET {
                if let (Some(old), Some(new)) = (before.find(ngram), store.find(ngram)) {
                    prop_assert!(old.abs_diff(new) <= 1);
                }
            }

            let after_first = store.clone();
            engine.apply(&mut store, &outcome, &id, &mut rng).unwrap();
            prop_assert_eq!(&store, &after_first);
            prop_assert!(store.check_integrity());
        }
    }
}

// ── Sampler ─────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn sample_is_bounded_and_from_store(
        promotions in prop::collection::vec(0usize..4, ALPHABET.len()),
        count in 0usize..12,
        decay in 0.05f64..0.95,
        seed in any::<u64>(),
    ) {
        let mut store = SrsStore::new();
        for (ngram, &ups) in ALPHABET.iter().zip(&promotions) {
            store.add_new(ngram).unwrap();
            for level in 0..ups {
                store.promote(ngram, level).unwrap();
            }
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let sampler = Sampler::new(decay).unwrap();
        let picked = sampler.sample(&store, count, &mut rng).unwrap();

        prop_assert!(picked.len() <= count);
        let distinct: HashSet<&String> = picked.iter().collect();
        prop_assert_eq!(distinct.len(), picked.len());
        prop_assert!(picked.iter().all(|n| store.find(n).is_some()));

        let max_level = store.max_level().unwrap();
        if count > max_level {
            let non_empty: HashSet<usize> = store
                .bins()
                .filter(|(_, bin)| !bin.is_empty())
                .map(|(level, _)| level)
                .collect();
            let sampled: HashSet<usize> = picked.iter().filter_map(|n| store.find(n)).collect();
            prop_assert_eq!(sampled, non_empty);
        }
    }
}
