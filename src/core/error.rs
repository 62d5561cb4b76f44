//! Error types shared by the store, the update engine, the sampler and the
//! persistence layer.

use crate::core::types::Level;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, SrsError>;

#[derive(Debug, thiserror::Error)]
pub enum SrsError {
    #[error("n-gram '{ngram}' is already stored at level {level}")]
    AlreadyPresent { ngram: String, level: Level },

    #[error("n-gram '{ngram}' is not stored at level {level}")]
    NotAtLevel { ngram: String, level: Level },

    /// Demotion target does not exist. Levels are only ever filled from
    /// below, so a gap means the store was corrupted.
    #[error("level {level} is missing below level {above}; store is corrupted")]
    MissingLevel { level: Level, above: Level },

    #[error("n-gram '{ngram}' appears in more than one bin; store is corrupted")]
    Duplicate { ngram: String },

    #[error("store holds no n-grams yet")]
    EmptyStore,

    #[error("decay parameter must lie strictly between 0 and 1, got {0}")]
    InvalidDecay(f64),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("no session files found in {0}")]
    NoSessions(PathBuf),

    #[error("dictionary {0} contains no words")]
    EmptyDictionary(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store encoding error: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("session file error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to persist temporary file: {0}")]
    Persist(#[from] tempfile::PersistError),
}
