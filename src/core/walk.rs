//! Purpose: Decide which filesystem entries each tool visits.
//! Exports: `collect_files`, `is_skipped_extension`, `IgnoreRules`, `sorted_children`.
//! Role: Traversal helpers; no content is read here.
//! Invariants: Listings are deterministic (lexicographic per directory).
//! Invariants: Directory symlinks are never descended.
use std::fs;
use std::path::{Path, PathBuf};

use regex::RegexSet;
use walkdir::WalkDir;

use crate::core::error::{Error, ErrorKind};

/// Extensions `fixeol` never touches (compared lowercased, without the dot).
pub const SKIPPED_EXTENSIONS: &[&str] = &["pyc", "pyo", "jpg", "png", "gif", "exe", "i"];

/// Entry names `renametree` never copies.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    r"^\.git$",
    r"^\.hg$",
    r"^dist$",
    r"^temp$",
    r"^tmp$",
    r"^.+~$",
    r"^.+~\..+$",
    r"^.+\.bak$",
    r"^.+\.ccscc$",
    r"^.+\.ncb$",
    r"^.+\.suo$",
    r"^.+\.cmd$",
    r"^.+\.py[co]$",
];

pub fn is_skipped_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            SKIPPED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Lists the regular files under `target`.
///
/// A file target yields itself. A directory yields every file beneath it,
/// hidden entries included. Unreadable subdirectories are logged and skipped.
pub fn collect_files(target: &Path) -> Result<Vec<PathBuf>, Error> {
    if target.is_file() {
        return Ok(vec![target.to_path_buf()]);
    }
    if !target.is_dir() {
        return Err(Error::new(ErrorKind::NotFound)
            .with_message(format!(
                "{} is neither a directory nor a file",
                target.display()
            ))
            .with_path(target)
            .with_hint("Pass an existing file or directory."));
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(target)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable entry");
                continue;
            }
        };
        let file_type = entry.file_type();
        if file_type.is_file() || (file_type.is_symlink() && entry.path().is_file()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Name-based ignore rules for template trees.
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    set: RegexSet,
}

impl IgnoreRules {
    /// Builds the default rules plus `extra` user patterns.
    ///
    /// User patterns must match the whole name, like the defaults.
    pub fn new<S: AsRef<str>>(extra: &[S]) -> Result<Self, Error> {
        let patterns = DEFAULT_IGNORE_PATTERNS
            .iter()
            .map(|pattern| pattern.to_string())
            .chain(
                extra
                    .iter()
                    .map(|pattern| format!("^(?:{})$", pattern.as_ref())),
            );
        let set = RegexSet::new(patterns).map_err(|err| {
            Error::new(ErrorKind::Usage)
                .with_message("invalid exclude pattern")
                .with_hint("Exclude patterns use Rust regex syntax, e.g. '^build$'.")
                .with_source(err)
        })?;
        Ok(Self { set })
    }

    pub fn is_ignored(&self, name: &str) -> bool {
        self.set.is_match(name)
    }
}

/// Reads the direct children of `dir`, sorted by file name.
pub fn sorted_children(dir: &Path) -> Result<Vec<fs::DirEntry>, Error> {
    let read_dir =
        fs::read_dir(dir).map_err(|err| Error::from_io(err, "failed to list directory", dir))?;
    let mut entries = read_dir
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| Error::from_io(err, "failed to list directory", dir))?;
    entries.sort_by_key(|entry| entry.file_name());
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::{IgnoreRules, collect_files, is_skipped_extension, sorted_children};
    use crate::core::error::ErrorKind;
    use std::fs;
    use std::path::Path;

    #[test]
    fn skipped_extensions_ignore_case() {
        for name in ["a.pyc", "b.PYO", "c.Jpg", "d.png", "e.GIF", "f.exe", "g.i"] {
            assert!(is_skipped_extension(Path::new(name)), "{name}");
        }
        for name in ["a.py", "b.ii", "Makefile", ".gitignore", "c.cpp"] {
            assert!(!is_skipped_extension(Path::new(name)), "{name}");
        }
    }

    #[test]
    fn default_rules_match_template_junk() {
        let rules = IgnoreRules::new::<&str>(&[]).expect("rules");
        for name in [
            ".git", ".hg", "dist", "temp", "tmp", "notes~", "main~.cpp", "x.bak", "a.ccscc",
            "b.ncb", "c.suo", "build.cmd", "mod.pyc", "mod.pyo",
        ] {
            assert!(rules.is_ignored(name), "{name}");
        }
        for name in [
            "src", ".gitignore", "distro", "mytmp", "~", ".bak", "mod.py", "xtree.hpp",
        ] {
            assert!(!rules.is_ignored(name), "{name}");
        }
    }

    #[test]
    fn extra_rules_extend_defaults() {
        let rules = IgnoreRules::new(&["^build$"]).expect("rules");
        assert!(rules.is_ignored("build"));
        assert!(rules.is_ignored(".git"));
        assert!(!rules.is_ignored("builder"));
    }

    #[test]
    fn unanchored_extra_rules_match_whole_names_only() {
        let rules = IgnoreRules::new(&["build", r"gen|.*\.log"]).expect("rules");
        assert!(rules.is_ignored("build"));
        assert!(rules.is_ignored("gen"));
        assert!(rules.is_ignored("run.log"));
        for name in ["builder", "rebuild.c", "generated", "run.log.txt"] {
            assert!(!rules.is_ignored(name), "{name}");
        }
    }

    #[test]
    fn invalid_extra_rule_is_usage_error() {
        let err = IgnoreRules::new(&["(unclosed"]).expect_err("invalid");
        assert_eq!(err.kind(), ErrorKind::Usage);
    }

    #[test]
    fn collect_files_walks_hidden_entries_in_order() {
        let temp = tempfile::tempdir().expect("tempdir");
        let root = temp.path();
        fs::create_dir_all(root.join("b/.hidden")).expect("mkdir");
        fs::write(root.join("b/.hidden/z.txt"), "z").expect("write");
        fs::write(root.join("b/a.txt"), "a").expect("write");
        fs::write(root.join("a.txt"), "a").expect("write");

        let files = collect_files(root).expect("collect");
        let rel: Vec<_> = files
            .iter()
            .map(|path| path.strip_prefix(root).expect("prefix").to_path_buf())
            .collect();
        assert_eq!(
            rel,
            vec![
                Path::new("a.txt").to_path_buf(),
                Path::new("b/.hidden/z.txt").to_path_buf(),
                Path::new("b/a.txt").to_path_buf(),
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn collect_files_follows_file_links_but_not_dir_links() {
        use std::os::unix::fs::symlink;

        let temp = tempfile::tempdir().expect("tempdir");
        let outside = temp.path().join("outside");
        fs::create_dir(&outside).expect("mkdir");
        fs::write(outside.join("deep.txt"), "d").expect("write");
        let root = temp.path().join("root");
        fs::create_dir(&root).expect("mkdir");
        fs::write(root.join("real.txt"), "r").expect("write");
        symlink(root.join("real.txt"), root.join("link.txt")).expect("file link");
        symlink(&outside, root.join("linkdir")).expect("dir link");

        let files = collect_files(&root).expect("collect");
        assert_eq!(files, vec![root.join("link.txt"), root.join("real.txt")]);
    }

    #[test]
    fn collect_files_accepts_single_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let file = temp.path().join("one.txt");
        fs::write(&file, "x").expect("write");
        assert_eq!(collect_files(&file).expect("collect"), vec![file]);
    }

    #[test]
    fn collect_files_rejects_missing_target() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = collect_files(&temp.path().join("missing")).expect_err("missing");
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn sorted_children_orders_by_name() {
        let temp = tempfile::tempdir().expect("tempdir");
        for name in ["c", "a", "b"] {
            fs::write(temp.path().join(name), "").expect("write");
        }
        let names: Vec<_> = sorted_children(temp.path())
            .expect("children")
            .into_iter()
            .map(|entry| entry.file_name().into_string().expect("utf8"))
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
