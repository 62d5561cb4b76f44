//! Interactive practice session.
//!
//! Builds a practice text from the weakest n-grams in the store, lets the
//! user type it, writes the session telemetry on finish or cancel and folds
//! it into the store.

use anyhow::{Context, Result};
use clap::Parser;
use srs_core::cli::display::Display;
use srs_core::cli::input::{InputHandler, KeyAction};
use srs_core::config::{default_data_dir, Config};
use srs_core::persistence::{self, STORE_FILE_NAME};
use srs_core::session::PracticeSession;
use srs_core::{text, ApplyOutcome, Sampler, SrsStore};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "srs_typer.log";

#[derive(Parser, Debug)]
#[command(name = "srs_typer")]
#[command(about = "Typing practice focused on the n-grams you mistype")]
struct Args {
    /// Directory holding the store, sessions and config.toml
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Words in the practice text (overrides config)
    #[arg(short, long)]
    words: Option<usize>,

    /// Only write the session file; fold it later with srs_maintain
    #[arg(long)]
    no_fold: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let data_dir = args.data_dir.unwrap_or_else(default_data_dir);
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating {}", data_dir.display()))?;

    // Logs go to a file so they don't tear the terminal UI.
    let file_appender = tracing_appender::rolling::never(&data_dir, LOG_FILE_NAME);
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();

    let mut config = Config::load(&data_dir).context("loading config")?;
    if let Some(words) = args.words {
        config.word_count = words;
        config.validate()?;
    }

    let mut rng = rand::thread_rng();
    let dictionary = match &config.dictionary {
        Some(path) => text::load_dictionary(path, config.min_word_len)
            .with_context(|| format!("loading dictionary {}", path.display()))?,
        None => Vec::new(),
    };
    let store = persistence::load_store_or_new(&data_dir.join(STORE_FILE_NAME))
        .context("loading store")?;

    let practice_text = build_practice_text(&store, &dictionary, &config, &mut rng)?;
    info!(words = config.word_count, "starting practice session");

    let session = run_session(&practice_text)?;
    let accuracy = session.accuracy();
    let events = session.into_events();

    if events.is_empty() {
        println!("Nothing typed, no session written.");
        return Ok(());
    }

    let session_path =
        persistence::write_session(&data_dir, &events).context("writing session file")?;
    println!("Session saved to {}", session_path.display());
    println!(
        "Accuracy: {:.0}% over {} keystrokes",
        accuracy * 100.0,
        events.len()
    );

    if args.no_fold {
        return Ok(());
    }
    match persistence::fold_session_file(&data_dir, &session_path, &config.ngram_sizes, &mut rng)
        .context("updating store")?
    {
        ApplyOutcome::Applied(summary) => println!(
            "Store updated: {} new, {} promoted, {} demoted",
            summary.added, summary.promoted, summary.demoted
        ),
        ApplyOutcome::AlreadyApplied => println!("Session was already in the store."),
    }
    Ok(())
}

fn build_practice_text(
    store: &SrsStore,
    dictionary: &[String],
    config: &Config,
    rng: &mut impl rand::Rng,
) -> Result<String> {
    if store.is_empty() {
        return Ok(text::random_words(dictionary, config.word_count, rng));
    }
    let ngrams = Sampler::new(config.decay)?.sample(store, config.sample_size, rng)?;
    info!(?ngrams, "sampled n-grams");
    let practice = text::assemble(&ngrams, dictionary, config.word_count, rng);
    if practice.is_empty() {
        Ok(text::random_words(dictionary, config.word_count, rng))
    } else {
        Ok(practice)
    }
}

/// Runs the interactive loop until the text is done or the user cancels.
/// Either way the keystrokes recorded so far are returned.
fn run_session(practice_text: &str) -> Result<PracticeSession> {
    let mut session = PracticeSession::new(practice_text);
    let display = Display::new();
    let input = InputHandler::new();

    InputHandler::enable_raw_mode()?;
    display.render(&session)?;

    while !session.is_finished() {
        let Some(key) = input.read_key()? else {
            continue;
        };
        match InputHandler::classify(&key) {
            KeyAction::Cancel => {
                info!(typed = session.cursor(), "session cancelled");
                break;
            }
            KeyAction::Backspace => session.backspace(),
            KeyAction::Type(c) => {
                session.type_char(c, now_secs());
            }
            KeyAction::Ignore => continue,
        }
        display.render(&session)?;
    }

    display.clear()?;
    display.shutdown()?;
    Ok(session)
}

fn now_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}
