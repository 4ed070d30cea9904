//! Append-only prescription history log.
//!
//! The log is a flat text file with one line per generated prescription:
//!
//! ```text
//! Patient: <id> | Symptoms: <text> | Prescription: <text>
//! ```
//!
//! Lines are never parsed back. The whole file is fed into later prompts as context and
//! returned verbatim by history queries.

use std::fs::{self, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct HistoryLog {
    path: PathBuf,
}

impl HistoryLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the full log content.
    ///
    /// A log that does not exist yet is an empty history. Any other read failure is logged and
    /// also treated as empty, since the history is only best-effort prompt context.
    pub fn read_all(&self) -> String {
        match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
            Err(e) => {
                tracing::warn!(
                    "failed to read history log {}: {}",
                    self.path.display(),
                    e
                );
                String::new()
            }
        }
    }

    /// Appends `entry` followed by a newline.
    ///
    /// The file is created if needed and opened in append mode. The entry and its separator
    /// are written with a single `write_all` so concurrent appends do not interleave.
    pub fn append(&self, entry: &str) -> io::Result<()> {
        let mut line = String::with_capacity(entry.len() + 1);
        line.push_str(entry);
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())
    }
}

/// Renders one history line.
///
/// Line breaks inside the fields are flattened to spaces so every generation stays on one line.
pub fn format_entry(patient_id: &str, symptoms: &str, prescription: &str) -> String {
    format!(
        "Patient: {} | Symptoms: {} | Prescription: {}",
        single_line(patient_id),
        single_line(symptoms),
        single_line(prescription)
    )
}

fn single_line(text: &str) -> String {
    text.lines().collect::<Vec<_>>().join(" ")
}
