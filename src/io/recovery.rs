use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;

/// Past this size the oldest entries are dropped before the next append.
const MAX_LOG_SIZE: u64 = 1_048_576;

/// Header written at the top of a new recovery log.
const FILE_HEADER: &str = "\
<!-- roster recovery log: append-only
     Data the roster could not save or read normally ends up here.
     Each entry's body is the full text involved, ready to paste back.
     Safe to delete once you have what you need. -->

---
";

/// What went wrong when the entry was written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryCategory {
    /// The data file could not be parsed and was replaced
    Parser,
    /// The data file could not be written
    Write,
}

impl fmt::Display for RecoveryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryCategory::Parser => write!(f, "parser"),
            RecoveryCategory::Write => write!(f, "write"),
        }
    }
}

/// A single entry in the recovery log.
#[derive(Debug, Clone)]
pub struct RecoveryEntry {
    pub timestamp: DateTime<Utc>,
    pub category: RecoveryCategory,
    pub description: String,
    pub fields: Vec<(String, String)>,
    pub body: String,
}

impl RecoveryEntry {
    pub fn new(category: RecoveryCategory, description: impl Into<String>) -> Self {
        RecoveryEntry {
            timestamp: Utc::now(),
            category,
            description: description.into(),
            fields: Vec::new(),
            body: String::new(),
        }
    }

    pub fn field(mut self, key: &str, value: impl fmt::Display) -> Self {
        self.fields.push((key.to_string(), value.to_string()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Format this entry as a markdown block for the recovery log.
    fn to_markdown(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!(
            "## {} [{}] {}\n\n",
            self.timestamp
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            self.category,
            self.description,
        ));

        for (key, value) in &self.fields {
            out.push_str(&format!("{}: {}\n", key, value));
        }

        if !self.body.is_empty() {
            out.push_str("\n```text\n");
            out.push_str(&self.body);
            if !self.body.ends_with('\n') {
                out.push('\n');
            }
            out.push_str("```\n");
        }

        out.push_str("\n---\n");
        out
    }
}

/// The recovery log lives next to the data file.
pub fn recovery_log_path(data_dir: &Path) -> PathBuf {
    data_dir.join(".roster-recovery.log")
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Append a recovery entry to the log. Errors are swallowed and printed to stderr.
pub fn log_recovery(data_dir: &Path, entry: RecoveryEntry) {
    if let Err(e) = log_recovery_inner(data_dir, entry) {
        eprintln!("warning: could not write to recovery log: {}", e);
    }
}

fn log_recovery_inner(data_dir: &Path, entry: RecoveryEntry) -> io::Result<()> {
    let path = recovery_log_path(data_dir);

    if let Ok(meta) = std::fs::metadata(&path)
        && meta.len() > MAX_LOG_SIZE
    {
        trim_log(&path, MAX_LOG_SIZE as usize / 2);
    }

    let needs_header = std::fs::metadata(&path).map_or(true, |m| m.len() == 0);

    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    if needs_header {
        file.write_all(FILE_HEADER.as_bytes())?;
    }
    file.write_all(entry.to_markdown().as_bytes())?;
    Ok(())
}

/// Rewrite the log without its oldest entries. Best effort: a log that
/// cannot be read or rewritten is left to grow.
fn trim_log(path: &Path, target: usize) {
    let Ok(content) = std::fs::read_to_string(path) else {
        return;
    };
    let trimmed = trim_entries(&content, target);
    if trimmed.len() < content.len() {
        let _ = atomic_write(path, trimmed.as_bytes());
    }
}

/// Drop entries from the front until the text fits in `target` bytes.
/// The header and the newest entry are always kept.
fn trim_entries(content: &str, target: usize) -> String {
    let header_end = content.find("\n---\n").map_or(0, |i| i + "\n---\n".len());
    let (header, entries) = content.split_at(header_end);

    let starts: Vec<usize> = entries
        .match_indices("## ")
        .map(|(i, _)| i)
        .filter(|&i| i == 0 || entries.as_bytes()[i - 1] == b'\n')
        .collect();
    let Some(&newest) = starts.last() else {
        return content.to_string();
    };

    let keep_from = starts
        .iter()
        .copied()
        .find(|&start| header.len() + entries.len() - start <= target)
        .unwrap_or(newest);
    format!("{}{}", header, &entries[keep_from..])
}
