//! Store maintenance: fold recorded sessions into the store, inspect it, or
//! draw a sample from it.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use srs_core::config::{default_data_dir, Config};
use srs_core::persistence::{self, STORE_FILE_NAME};
use srs_core::{text, ApplyOutcome, Sampler, SrsError};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "srs_maintain")]
#[command(about = "Maintain the spaced-repetition n-gram store")]
struct Args {
    /// Directory holding the store, sessions and config.toml
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fold the newest session file into the store
    Fold {
        /// Print the store afterwards
        #[arg(short, long)]
        show: bool,
    },
    /// Fold every session file not yet in the store, oldest first
    FoldAll,
    /// Print every level and its n-grams
    Show,
    /// Draw n-grams the way the practice command would
    Sample {
        /// Number of n-grams (defaults to the configured sample size)
        #[arg(short, long)]
        count: Option<usize>,
        /// Also print the practice text built from the sample
        #[arg(short, long)]
        text: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let data_dir = args.data_dir.unwrap_or_else(default_data_dir);
    let config = Config::load(&data_dir).context("loading config")?;
    let mut rng = rand::thread_rng();

    match args.command {
        Command::Fold { show } => {
            match persistence::fold_latest_session(&data_dir, &config.ngram_sizes, &mut rng)? {
                ApplyOutcome::Applied(summary) => println!(
                    "Folded latest session: {} new, {} promoted, {} demoted, {} unchanged",
                    summary.added, summary.promoted, summary.demoted, summary.unchanged
                ),
                ApplyOutcome::AlreadyApplied => {
                    println!("Latest session is already in the store.")
                }
            }
            if show {
                show_store(&data_dir)?;
            }
        }
        Command::FoldAll => {
            let applied =
                persistence::fold_all_sessions(&data_dir, &config.ngram_sizes, &mut rng)?;
            println!("Folded {applied} new session(s).");
        }
        Command::Show => show_store(&data_dir)?,
        Command::Sample { count, text: with_text } => {
            let store = persistence::load_store_or_new(&data_dir.join(STORE_FILE_NAME))?;
            let count = count.unwrap_or(config.sample_size);
            let ngrams = match Sampler::new(config.decay)?.sample(&store, count, &mut rng) {
                Ok(ngrams) => ngrams,
                Err(SrsError::EmptyStore) => {
                    println!("The store is empty; practice a session first.");
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            };
            println!("{}", ngrams.join(" "));

            if with_text {
                let dictionary = match &config.dictionary {
                    Some(path) => text::load_dictionary(path, config.min_word_len)?,
                    None => Vec::new(),
                };
                println!(
                    "{}",
                    text::assemble(&ngrams, &dictionary, config.word_count, &mut rng)
                );
            }
        }
    }
    Ok(())
}

fn show_store(data_dir: &std::path::Path) -> Result<()> {
    let store = persistence::load_store_or_new(&data_dir.join(STORE_FILE_NAME))?;
    if store.is_empty() {
        println!("The store is empty.");
        return Ok(());
    }
    for (level, bin) in store.bins() {
        let ngrams: Vec<&str> = bin.iter().map(String::as_str).collect();
        println!("level {level:>2} ({:>3}): {}", bin.len(), ngrams.join(" "));
    }
    println!(
        "{} n-grams, {} sessions applied, integrity {}",
        store.len(),
        store.sessions().len(),
        if store.check_integrity() { "ok" } else { "BROKEN" }
    );
    Ok(())
}
