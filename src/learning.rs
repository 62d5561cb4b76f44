// File: src/learning.rs
use crate::core::error::Result;
use crate::core::store::SrsStore;
use crate::core::types::SessionOutcome;
use rand::Rng;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

/// Folds the result of one practice session into an [`SrsStore`].
///
/// Each distinct n-gram of the session moves by at most one level:
/// correct-only n-grams are promoted, typo-only n-grams are demoted (or
/// added at level 0 when new), and n-grams seen both ways are demoted with
/// probability `typos / (typos + corrects)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LearningEngine;

/// What happened to the store during one [`LearningEngine::apply`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied(UpdateSummary),
    /// The session id was folded in earlier; the store was left alone.
    AlreadyApplied,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateSummary {
    pub added: usize,
    pub promoted: usize,
    pub demoted: usize,
    pub unchanged: usize,
}

impl LearningEngine {
    pub fn new() -> Self {
        Self
    }

    /// Applies one session to `store`.
    ///
    /// The update runs against a working copy that replaces `store` only once
    /// every n-gram has been processed. On error `store` is untouched.
    pub fn apply<R: Rng + ?Sized>(
        &self,
        store: &mut SrsStore,
        outcome: &SessionOutcome,
        session_id: &str,
        rng: &mut R,
    ) -> Result<ApplyOutcome> {
        if store.has_session(session_id) {
            warn!(session_id, "session already applied, skipping");
            return Ok(ApplyOutcome::AlreadyApplied);
        }
        store.verify()?;

        let correct_counts = occurrences(&outcome.correct);
        let typo_counts = occurrences(&outcome.typo);
        let distinct: BTreeSet<&str> = correct_counts
            .keys()
            .chain(typo_counts.keys())
            .copied()
            .collect();

        let mut working = store.clone();
        working.record_session(session_id);
        let mut summary = UpdateSummary::default();

        for ngram in distinct {
            let correct = correct_counts.get(ngram).copied().unwrap_or(0);
            let typo = typo_counts.get(ngram).copied().unwrap_or(0);

            match (working.find(ngram), typo == 0) {
                // correct only
                (None, true) => summary.unchanged += 1,
                (Some(level), true) => {
                    working.promote(ngram, level)?;
                    debug!(ngram, from = level, "promoted");
                    summary.promoted += 1;
                }
                // typo only, or both: new n-grams start at the bottom
                (None, false) => {
                    working.add_new(ngram)?;
                    debug!(ngram, "added");
                    summary.added += 1;
                }
                (Some(level), false) => {
                    let demote = if correct == 0 {
                        true
                    } else {
                        let p_demote = typo as f64 / (typo + correct) as f64;
                        rng.gen::<f64>() < p_demote
                    };
                    if demote && level > 0 {
                        working.demote(ngram, level)?;
                        debug!(ngram, from = level, "demoted");
                        summary.demoted += 1;
                    } else {
                        summary.unchanged += 1;
                    }
                }
            }
        }

        *store = working;
        info!(
            session_id,
            added = summary.added,
            promoted = summary.promoted,
            demoted = summary.demoted,
            "session applied"
        );
        Ok(ApplyOutcome::Applied(summary))
    }
}

fn occurrences(ngrams: &[String]) -> BTreeMap<&str, usize> {
    let mut counts = BTreeMap::new();
    for ngram in ngrams {
        *counts.entry(ngram.as_str()).or_insert(0) += 1;
    }
    counts
}
