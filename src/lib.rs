// src/lib.rs

pub mod cli;
pub mod config;
pub mod core;
pub mod learning;
pub mod ngram;
pub mod persistence;
pub mod sampler;
pub mod session;
pub mod text;

pub use crate::core::error::{Result, SrsError};
pub use crate::core::store::{SrsBin, SrsStore};
pub use crate::core::types::{KeystrokeEvent, Level, Ngram, SessionOutcome};
pub use crate::learning::{ApplyOutcome, LearningEngine, UpdateSummary};
pub use crate::sampler::Sampler;
