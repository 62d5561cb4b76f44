// File: src/persistence.rs
use crate::core::error::{Result, SrsError};
use crate::core::store::SrsStore;
use crate::core::types::KeystrokeEvent;
use crate::learning::{ApplyOutcome, LearningEngine};
use crate::ngram;
use chrono::Local;
use rand::Rng;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{info, warn};

pub const STORE_FILE_NAME: &str = "srs_store.bin";
const SESSION_PREFIX: &str = "session_";
const SESSION_SUFFIX: &str = ".json";

/// Runs `write` against a temporary file next to `path`, then renames it into
/// place. The old file stays intact if anything fails before the rename.
fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<&NamedTempFile>) -> Result<()>,
{
    let parent_dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        write(&mut writer)?;
        writer.flush()?;
    }
    temp_file.persist(path)?;
    Ok(())
}

pub fn save_store(store: &SrsStore, path: &Path) -> Result<()> {
    write_atomically(path, |writer| {
        bincode::serialize_into(writer, store)?;
        Ok(())
    })
}

pub fn load_store(path: &Path) -> Result<SrsStore> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let store: SrsStore = bincode::deserialize_from(reader)?;
    Ok(store)
}

/// A missing file means a fresh store. Anything unreadable is an error, so a
/// damaged store is never silently replaced.
pub fn load_store_or_new(path: &Path) -> Result<SrsStore> {
    if path.exists() {
        load_store(path)
    } else {
        Ok(SrsStore::new())
    }
}

#[derive(Serialize)]
struct SessionFileRef<'a> {
    entries: &'a [KeystrokeEvent],
}

#[derive(serde::Deserialize)]
struct SessionFile {
    entries: Vec<KeystrokeEvent>,
}

/// File name for a session started at the current local time.
/// Names sort chronologically.
pub fn session_file_name() -> String {
    format!(
        "{SESSION_PREFIX}{}{SESSION_SUFFIX}",
        Local::now().format("%Y%m%d_%H%M%S_%3f")
    )
}

pub fn write_session(dir: &Path, events: &[KeystrokeEvent]) -> Result<PathBuf> {
    let path = dir.join(session_file_name());
    write_session_to(&path, events)?;
    Ok(path)
}

pub fn write_session_to(path: &Path, events: &[KeystrokeEvent]) -> Result<()> {
    write_atomically(path, |writer| {
        serde_json::to_writer_pretty(writer, &SessionFileRef { entries: events })?;
        Ok(())
    })
}

pub fn read_session(path: &Path) -> Result<Vec<KeystrokeEvent>> {
    let file = File::open(path)?;
    let session: SessionFile = serde_json::from_reader(BufReader::new(file))?;
    Ok(session.entries)
}

/// Session files in `dir`, oldest first.
pub fn session_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_session = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(SESSION_PREFIX) && n.ends_with(SESSION_SUFFIX));
        if is_session && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

pub fn latest_session(dir: &Path) -> Result<PathBuf> {
    session_files(dir)?
        .pop()
        .ok_or_else(|| SrsError::NoSessions(dir.to_path_buf()))
}

/// The session id of a session file is its file name.
pub fn session_id(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Folds one session file into `store` in memory.
pub fn fold_session<R: Rng + ?Sized>(
    store: &mut SrsStore,
    session_path: &Path,
    sizes: &[usize],
    rng: &mut R,
) -> Result<ApplyOutcome> {
    let events = read_session(session_path)?;
    let outcome = ngram::extract(&events, sizes);
    LearningEngine::new().apply(store, &outcome, &session_id(session_path), rng)
}

/// Loads the store in `data_dir`, folds `session_path` into it and saves it
/// back. A replayed session writes nothing.
pub fn fold_session_file<R: Rng + ?Sized>(
    data_dir: &Path,
    session_path: &Path,
    sizes: &[usize],
    rng: &mut R,
) -> Result<ApplyOutcome> {
    let store_path = data_dir.join(STORE_FILE_NAME);
    let mut store = load_store_or_new(&store_path)?;

    let outcome = fold_session(&mut store, session_path, sizes, rng)?;
    if let ApplyOutcome::Applied(_) = outcome {
        store.verify()?;
        save_store(&store, &store_path)?;
        info!(path = %store_path.display(), ngrams = store.len(), "store saved");
    }
    Ok(outcome)
}

/// [`fold_session_file`] for the newest session in `data_dir`.
pub fn fold_latest_session<R: Rng + ?Sized>(
    data_dir: &Path,
    sizes: &[usize],
    rng: &mut R,
) -> Result<ApplyOutcome> {
    let session_path = latest_session(data_dir)?;
    fold_session_file(data_dir, &session_path, sizes, rng)
}

/// Folds every session file in chronological order, skipping ones already
/// applied. Returns how many were newly applied.
pub fn fold_all_sessions<R: Rng + ?Sized>(
    data_dir: &Path,
    sizes: &[usize],
    rng: &mut R,
) -> Result<usize> {
    let store_path = data_dir.join(STORE_FILE_NAME);
    let mut store = load_store_or_new(&store_path)?;

    let mut applied = 0;
    for session_path in session_files(data_dir)? {
        match fold_session(&mut store, &session_path, sizes, rng)? {
            ApplyOutcome::Applied(_) => applied += 1,
            ApplyOutcome::AlreadyApplied => {}
        }
    }

    if applied > 0 {
        store.verify()?;
        save_store(&store, &store_path)?;
        info!(applied, path = %store_path.display(), "store saved");
    } else {
        warn!("no new sessions to fold");
    }
    Ok(applied)
}
