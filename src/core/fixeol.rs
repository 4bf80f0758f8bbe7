//! Purpose: Check or rewrite line endings for a file or a directory tree.
//! Exports: `FixEolOptions`, `fix_file`, `run`.
//! Role: Core of the `fixeol` binary; reports one `Entry` per visited file.
//! Invariants: Files are only written when `auto_convert` is set and content changed.
//! Invariants: A per-file failure never aborts the run.
use std::fs;
use std::path::Path;

use crate::core::content::{Eol, is_binary, normalize_eol};
use crate::core::error::Error;
use crate::core::report::{Entry, Status, Summary};
use crate::core::walk::{collect_files, is_skipped_extension};

#[derive(Copy, Clone, Debug)]
pub struct FixEolOptions {
    pub eol: Eol,
    pub auto_convert: bool,
}

pub fn fix_file(path: &Path, options: FixEolOptions) -> Result<Status, Error> {
    let data = fs::read(path).map_err(|err| Error::from_io(err, "failed to read", path))?;
    if is_binary(&data) {
        tracing::debug!(path = %path.display(), "binary file left as-is");
        return Ok(Status::Untouched);
    }
    let normalized = normalize_eol(&data, options.eol);
    if normalized.as_ref() == data.as_slice() {
        return Ok(Status::Untouched);
    }
    if !options.auto_convert {
        return Ok(Status::Detected);
    }
    fs::write(path, normalized.as_ref())
        .map_err(|err| Error::from_io(err, "failed to write", path))?;
    Ok(Status::Converted)
}

/// Processes every eligible file under `target`, calling `on_entry` as each
/// one completes.
///
/// Only an invalid `target` is returned as an error.
pub fn run<F>(target: &Path, options: FixEolOptions, mut on_entry: F) -> Result<Summary, Error>
where
    F: FnMut(&Entry),
{
    let files = collect_files(target)?;
    let mut summary = Summary::default();
    for path in files {
        if is_skipped_extension(&path) {
            tracing::debug!(path = %path.display(), "skipped by extension");
            continue;
        }
        let entry = match fix_file(&path, options) {
            Ok(status) => Entry::new(status, path),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "file failed");
                Entry::failed(&path, &err)
            }
        };
        summary.record(entry.status);
        on_entry(&entry);
    }
    Ok(summary)
}
