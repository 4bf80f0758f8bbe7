//! Purpose: Per-entry outcomes and run totals for both tools.
//! Exports: `Status`, `Entry`, `Summary`.
//! Role: Plain data handed from core runs to the CLI renderer.
//! Invariants: Every visited entry produces exactly one `Entry`; skipped entries produce none.
//! Invariants: Status markers are fixed strings; scripts may grep for them.
use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Line endings already match.
    Untouched,
    /// Line endings differ; check mode left the file alone.
    Detected,
    /// Line endings were rewritten in place.
    Converted,
    /// Output directory created.
    Mkdir,
    /// Text file copied with the token substituted.
    Renamed,
    /// Binary file, not copied.
    Ignored,
    Failed,
}

impl Status {
    pub fn marker(self) -> &'static str {
        match self {
            Status::Untouched => "[ ]",
            Status::Detected => "[X]",
            Status::Converted => "[C]",
            Status::Mkdir => "[ MKDIR]",
            Status::Renamed => "[RENAME]",
            Status::Ignored => "[IGNORE]",
            Status::Failed => "[ ERROR]",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub status: Status,
    #[serde(serialize_with = "serialize_path")]
    pub path: PathBuf,
    #[serde(serialize_with = "serialize_opt_path")]
    pub output: Option<PathBuf>,
    pub message: Option<String>,
}

impl Entry {
    pub fn new(status: Status, path: impl Into<PathBuf>) -> Self {
        Self {
            status,
            path: path.into(),
            output: None,
            message: None,
        }
    }

    pub fn mapped(status: Status, path: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            output: Some(output.into()),
            ..Self::new(status, path)
        }
    }

    pub fn failed(path: &Path, err: &crate::core::error::Error) -> Self {
        let message = err.message().unwrap_or("failed").to_string();
        let detail = std::error::Error::source(err)
            .map(|source| format!("{message}: {source}"))
            .unwrap_or(message);
        Self {
            message: Some(detail),
            ..Self::new(Status::Failed, path)
        }
    }
}

// Lossy so that non-UTF-8 names still produce a record.
fn serialize_path<S: Serializer>(path: &Path, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&path.display())
}

fn serialize_opt_path<S: Serializer>(
    path: &Option<PathBuf>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match path {
        Some(path) => serializer.collect_str(&path.display()),
        None => serializer.serialize_none(),
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub untouched: u64,
    pub detected: u64,
    pub converted: u64,
    pub mkdir: u64,
    pub renamed: u64,
    pub ignored: u64,
    pub failed: u64,
}

impl Summary {
    pub fn record(&mut self, status: Status) {
        let slot = match status {
            Status::Untouched => &mut self.untouched,
            Status::Detected => &mut self.detected,
            Status::Converted => &mut self.converted,
            Status::Mkdir => &mut self.mkdir,
            Status::Renamed => &mut self.renamed,
            Status::Ignored => &mut self.ignored,
            Status::Failed => &mut self.failed,
        };
        *slot += 1;
    }

    pub fn total(&self) -> u64 {
        self.untouched
            + self.detected
            + self.converted
            + self.mkdir
            + self.renamed
            + self.ignored
            + self.failed
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}
