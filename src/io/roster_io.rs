use std::fs;
use std::path::{Path, PathBuf};

use crate::io::recovery::{RecoveryCategory, RecoveryEntry, atomic_write, log_recovery};
use crate::model::{RECENT_LIMIT, RosterDocument};
use crate::ops::roster_ops::{self, RosterError};

/// Default data file, looked up in the working directory
pub const DATA_FILE: &str = "act.txt";

/// Why a data file could not be read as a roster
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("{path} does not exist")]
    Missing { path: PathBuf },
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path} is not valid UTF-8: {source}")]
    Encoding {
        path: PathBuf,
        source: std::str::Utf8Error,
        /// The file with bad sequences replaced by U+FFFD
        content: String,
    },
    #[error("could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
        content: String,
    },
}

/// How `load_or_default` came by its document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    /// No file existed; a default one was written
    CreatedDefault,
    /// The file was not a roster (bad UTF-8 or bad JSON). Its text went to
    /// the recovery log and a default was written over it.
    ReplacedCorrupt,
    /// The file exists but could not be read. The default document is used
    /// in memory and the file is left as it is.
    Unreadable,
}

/// Directory holding the data file (for the recovery log and config)
pub fn data_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Read and normalize a roster document.
pub fn read_document(path: &Path) -> Result<RosterDocument, LoadError> {
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(LoadError::Missing {
                path: path.to_path_buf(),
            });
        }
        Err(e) => {
            return Err(LoadError::Read {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    let content = String::from_utf8(bytes).map_err(|e| LoadError::Encoding {
        path: path.to_path_buf(),
        source: e.utf8_error(),
        content: String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })?;
    let mut doc: RosterDocument =
        serde_json::from_str(&content).map_err(|e| LoadError::Parse {
            path: path.to_path_buf(),
            source: e,
            content: content.clone(),
        })?;
    normalize(&mut doc);
    Ok(doc)
}

/// Bring a freshly parsed document up to the current shape: ids on every
/// record, id-keyed recent/favorites, no empty notes, bounded recency.
pub fn normalize(doc: &mut RosterDocument) {
    roster_ops::assign_missing_ids(doc);
    roster_ops::resolve_name_keys(doc);
    for c in &mut doc.accounts {
        if c.note.as_deref().is_some_and(|n| n.trim().is_empty()) {
            c.note = None;
        }
    }
    let excess = doc.recent.len().saturating_sub(RECENT_LIMIT);
    doc.recent.drain(..excess);
}

/// Serialize a document the way it is stored on disk
pub fn to_json(doc: &RosterDocument) -> Result<String, serde_json::Error> {
    let mut json = serde_json::to_string_pretty(doc)?;
    json.push('\n');
    Ok(json)
}

/// Write the whole document atomically. On failure the serialized document
/// is copied to the recovery log before the error is returned.
pub fn write_document(path: &Path, doc: &RosterDocument) -> Result<(), RosterError> {
    let json = to_json(doc).map_err(|e| RosterError::Save {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    atomic_write(path, json.as_bytes()).map_err(|e| {
        log_recovery(
            &data_dir(path),
            RecoveryEntry::new(RecoveryCategory::Write, "could not save roster")
                .field("File", path.display())
                .field("Error", &e)
                .body(json.as_str()),
        );
        RosterError::Save {
            path: path.to_path_buf(),
            source: e,
        }
    })
}

/// A save that must not touch `path` (it could not be read when opened).
/// The serialized document still goes to the recovery log.
pub fn refuse_write(path: &Path, doc: &RosterDocument) -> RosterError {
    let mut entry = RecoveryEntry::new(RecoveryCategory::Write, "roster left untouched")
        .field("File", path.display());
    if let Ok(json) = to_json(doc) {
        entry = entry.body(json);
    }
    log_recovery(&data_dir(path), entry);
    RosterError::Unwritable {
        path: path.to_path_buf(),
    }
}

/// Load the roster, substituting a default document when the file is
/// missing or not a roster. Never fails.
///
/// A missing or corrupt file is replaced on disk (corrupt text is logged to
/// the recovery log first). A file that exists but cannot be read is never
/// written over.
pub fn load_or_default(path: &Path) -> (RosterDocument, LoadOutcome) {
    let outcome = match read_document(path) {
        Ok(doc) => return (doc, LoadOutcome::Loaded),
        Err(LoadError::Missing { .. }) => LoadOutcome::CreatedDefault,
        Err(LoadError::Encoding {
            source, content, ..
        }) => {
            log_replaced(path, &source, content);
            LoadOutcome::ReplacedCorrupt
        }
        Err(LoadError::Parse {
            source, content, ..
        }) => {
            log_replaced(path, &source, content);
            LoadOutcome::ReplacedCorrupt
        }
        Err(err @ LoadError::Read { .. }) => {
            log_recovery(
                &data_dir(path),
                RecoveryEntry::new(RecoveryCategory::Parser, "roster could not be read")
                    .field("File", path.display())
                    .field("Error", &err),
            );
            return (RosterDocument::default(), LoadOutcome::Unreadable);
        }
    };

    let doc = RosterDocument::default();
    // A failed write is already in the recovery log; open with the default anyway
    let _ = write_document(path, &doc);
    (doc, outcome)
}

fn log_replaced(path: &Path, error: &dyn std::fmt::Display, content: String) {
    log_recovery(
        &data_dir(path),
        RecoveryEntry::new(RecoveryCategory::Parser, "unreadable roster replaced")
            .field("File", path.display())
            .field("Error", error)
            .body(content),
    );
}
