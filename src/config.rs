//! User configuration, read from `config.toml` in the data directory.

use crate::core::error::{Result, SrsError};
use crate::ngram::DEFAULT_SIZES;
use crate::sampler::DEFAULT_DECAY;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "config.toml";
const APP_DIR_NAME: &str = "srs-typer";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// N-gram lengths extracted around every keystroke.
    pub ngram_sizes: Vec<usize>,
    /// How many n-grams to draw from the store for one practice text.
    pub sample_size: usize,
    /// Success probability of the geometric level draw.
    pub decay: f64,
    /// Words per practice text.
    pub word_count: usize,
    /// Whitespace-separated word list used to build practice text.
    pub dictionary: Option<PathBuf>,
    pub min_word_len: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            ngram_sizes: DEFAULT_SIZES.to_vec(),
            sample_size: 10,
            decay: DEFAULT_DECAY,
            word_count: 30,
            dictionary: None,
            min_word_len: 2,
        }
    }
}

impl Config {
    /// Reads `<data_dir>/config.toml`; defaults when the file is absent.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE_NAME);
        let config = if path.exists() {
            toml::from_str(&fs::read_to_string(&path)?)?
        } else {
            Config::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.ngram_sizes.is_empty() || self.ngram_sizes.contains(&0) {
            return Err(SrsError::InvalidConfig(
                "ngram_sizes must be non-empty and positive".into(),
            ));
        }
        if !(self.decay > 0.0 && self.decay < 1.0) {
            return Err(SrsError::InvalidDecay(self.decay));
        }
        if self.word_count == 0 {
            return Err(SrsError::InvalidConfig("word_count must be positive".into()));
        }
        Ok(())
    }
}

/// `$XDG_DATA_HOME/srs-typer` or the platform equivalent; `./data` when no
/// such directory is known.
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("data"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::load(dir.path()).unwrap(), Config::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "ngram_sizes = [2]\nword_count = 12\n",
        )
        .unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.ngram_sizes, vec![2]);
        assert_eq!(config.word_count, 12);
        assert_eq!(config.decay, DEFAULT_DECAY);
    }

    #[test]
    fn bad_decay_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "decay = 1.5\n").unwrap();
        assert!(matches!(
            Config::load(dir.path()),
            Err(SrsError::InvalidDecay(_))
        ));
    }

    #[test]
    fn zero_ngram_size_is_rejected() {
        let config = Config {
            ngram_sizes: vec![0, 2],
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
