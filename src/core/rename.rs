//! Purpose: Copy a template tree to a new directory, substituting the template token.
//! Exports: `RenameOptions`, `validate_paths`, `rename_name`, `run`.
//! Role: Core of the `renametree` binary; reports one `Entry` per created dir or visited file.
//! Invariants: The template tree is never written to; an output inside it is refused.
//! Invariants: Two entries never write to the same output path.
//! Invariants: Binary files are reported and never copied.
//! Invariants: Entry names get the literal token replaced; contents also get the uppercase form.
use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::core::content::{is_binary, substitute_token};
use crate::core::error::{Error, ErrorKind};
use crate::core::report::{Entry, Status, Summary};
use crate::core::walk::{IgnoreRules, sorted_children};

pub const DEFAULT_TOKEN: &str = "xtree";

#[derive(Debug, Clone)]
pub struct RenameOptions {
    pub token: String,
    pub new_name: String,
    pub ignore: IgnoreRules,
    pub dry_run: bool,
}

impl RenameOptions {
    pub fn new(
        token: impl Into<String>,
        new_name: impl Into<String>,
        ignore: IgnoreRules,
    ) -> Result<Self, Error> {
        let token = token.into();
        let new_name = new_name.into();
        if token.is_empty() {
            return Err(Error::new(ErrorKind::Usage)
                .with_message("the template token is empty")
                .with_hint("Pass a non-empty --token (default: xtree)."));
        }
        if new_name.is_empty() {
            return Err(Error::new(ErrorKind::Usage)
                .with_message("the new name is empty")
                .with_hint("Pass a non-empty --new-name."));
        }
        Ok(Self {
            token,
            new_name,
            ignore,
            dry_run: false,
        })
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Checks the template exists, the output does not, and the output does not
/// sit inside the template, before anything is touched.
pub fn validate_paths(template: &Path, output: &Path) -> Result<(), Error> {
    if output.exists() {
        return Err(Error::new(ErrorKind::AlreadyExists)
            .with_message(format!(
                "the output directory \"{}\" already exists",
                output.display()
            ))
            .with_path(output)
            .with_hint("Choose a new --output path; existing trees are never merged into."));
    }
    if !template.is_dir() {
        return Err(Error::new(ErrorKind::NotFound)
            .with_message(format!(
                "the template directory \"{}\" does not exist",
                template.display()
            ))
            .with_path(template));
    }
    let template_root = template
        .canonicalize()
        .map_err(|err| Error::from_io(err, "failed to resolve the template directory", template))?;
    let output_root = resolve_missing(output)?;
    if output_root.starts_with(&template_root) {
        return Err(Error::new(ErrorKind::Usage)
            .with_message(format!(
                "the output directory \"{}\" is inside the template directory \"{}\"",
                output.display(),
                template.display()
            ))
            .with_path(output)
            .with_hint("Choose an --output path outside the template tree."));
    }
    Ok(())
}

/// Absolute form of a path that may not exist yet: the deepest existing
/// ancestor is canonicalized and the missing tail appended.
fn resolve_missing(path: &Path) -> Result<PathBuf, Error> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|err| Error::from_io(err, "failed to read the current directory", path))?
            .join(path)
    };
    let mut absolute = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                absolute.pop();
            }
            other => absolute.push(other.as_os_str()),
        }
    }
    let mut tail = Vec::new();
    let mut cursor = absolute.as_path();
    loop {
        if let Ok(resolved) = cursor.canonicalize() {
            return Ok(tail
                .iter()
                .rev()
                .fold(resolved, |acc: PathBuf, part: &OsString| acc.join(part)));
        }
        match (cursor.parent(), cursor.file_name()) {
            (Some(parent), Some(name)) => {
                tail.push(name.to_os_string());
                cursor = parent;
            }
            _ => return Ok(absolute),
        }
    }
}

/// Output name for an entry: the literal token replaced, case untouched.
pub fn rename_name(name: &OsStr, token: &str, new_name: &str) -> OsString {
    match name.to_str() {
        Some(text) => OsString::from(text.replace(token, new_name)),
        None => name.to_os_string(),
    }
}

pub fn run<F>(
    template: &Path,
    output: &Path,
    options: &RenameOptions,
    mut on_entry: F,
) -> Result<Summary, Error>
where
    F: FnMut(&Entry),
{
    validate_paths(template, output)?;
    let mut summary = Summary::default();
    let mut emit = |entry: Entry| {
        summary.record(entry.status);
        on_entry(&entry);
    };
    mirror_dir(template, output, options, &mut emit);
    Ok(summary)
}

fn mirror_dir<F>(input: &Path, output: &Path, options: &RenameOptions, emit: &mut F)
where
    F: FnMut(Entry),
{
    if !output.exists() {
        if !options.dry_run {
            if let Err(err) = fs::create_dir(output) {
                let err = Error::from_io(err, "failed to create directory", output);
                tracing::warn!(error = %err, "directory failed");
                emit(Entry::failed(input, &err));
                return;
            }
        }
        emit(Entry::mapped(Status::Mkdir, input, output));
    }

    let children = match sorted_children(input) {
        Ok(children) => children,
        Err(err) => {
            tracing::warn!(error = %err, "directory failed");
            emit(Entry::failed(input, &err));
            return;
        }
    };

    let mut claimed = HashSet::new();
    for child in children {
        let name = child.file_name();
        if options.ignore.is_ignored(&name.to_string_lossy()) {
            tracing::debug!(path = %child.path().display(), "ignored by name");
            continue;
        }
        let input_path = child.path();
        let output_name = rename_name(&name, &options.token, &options.new_name);
        let output_path = output.join(&output_name);
        let is_real_dir = child
            .file_type()
            .map(|file_type| file_type.is_dir())
            .unwrap_or(false);
        if !is_real_dir && !input_path.is_file() {
            tracing::debug!(path = %input_path.display(), "not a regular file, skipped");
            continue;
        }
        if claimed.contains(&output_name) {
            let err = Error::new(ErrorKind::AlreadyExists)
                .with_message(format!(
                    "output \"{}\" is already taken by an earlier entry",
                    output_path.display()
                ))
                .with_path(&output_path);
            tracing::warn!(error = %err, "output name collision");
            emit(Entry::failed(&input_path, &err));
            continue;
        }
        if is_real_dir {
            claimed.insert(output_name);
            mirror_dir(&input_path, &output_path, options, emit);
        } else {
            let entry = convert_file(&input_path, &output_path, options);
            if entry.status == Status::Renamed {
                claimed.insert(output_name);
            }
            emit(entry);
        }
    }
}

fn convert_file(input: &Path, output: &Path, options: &RenameOptions) -> Entry {
    let result = fs::read(input)
        .map_err(|err| Error::from_io(err, "failed to read", input))
        .and_then(|data| {
            if is_binary(&data) {
                return Ok(Status::Ignored);
            }
            if !options.dry_run {
                let renamed = substitute_token(&data, &options.token, &options.new_name);
                fs::write(output, renamed)
                    .map_err(|err| Error::from_io(err, "failed to write", output))?;
            }
            Ok(Status::Renamed)
        });
    match result {
        Ok(Status::Renamed) => Entry::mapped(Status::Renamed, input, output),
        Ok(status) => Entry::new(status, input),
        Err(err) => {
            tracing::warn!(error = %err, "file failed");
            Entry::failed(input, &err)
        }
    }
}
