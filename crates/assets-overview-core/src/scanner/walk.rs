use crate::error::Error;
use crate::paths::relative_key;
use dashmap::DashSet;
use glob::Pattern;
use rayon::prelude::*;
use std::fs::{self, ReadDir};
use std::path::Path;
use tracing::{trace, warn};

/// Parallel directory traversal. Collects the root-relative key of every
/// regular file under `root`, filtering by glob ignore patterns. Skips symlinks.
///
/// Only a root that cannot be opened is an error; unreadable subdirectories
/// and entries are logged and skipped.
pub fn collect_disk_paths(root: &Path, ignore_globs: &[String]) -> Result<DashSet<String>, Error> {
    let source_name = || format!("asset root '{}'", root.display());
    if !root.is_dir() {
        return Err(Error::source_unavailable(source_name(), "not a directory"));
    }
    let entries = fs::read_dir(root).map_err(|e| Error::source_unavailable(source_name(), e))?;

    let ignore_patterns: Vec<Pattern> = ignore_globs
        .iter()
        .filter_map(|glob| match Pattern::new(glob) {
            Ok(p) => Some(p),
            Err(e) => {
                warn!("Invalid glob pattern '{}': {}", glob, e);
                None
            }
        })
        .collect();

    let paths = DashSet::new();
    visit_entries(root, root, entries, &paths, &ignore_patterns);
    Ok(paths)
}

fn is_ignored(root: &Path, path: &Path, ignore_patterns: &[Pattern]) -> bool {
    let key = relative_key(root, path);
    ignore_patterns.iter().any(|pattern| {
        pattern.matches_path(path) || key.as_deref().is_some_and(|k| pattern.matches(k))
    })
}

fn visit_dirs(root: &Path, dir: &Path, paths: &DashSet<String>, ignore_patterns: &[Pattern]) {
    if is_ignored(root, dir, ignore_patterns) {
        trace!("Ignoring directory {}", dir.display());
        return;
    }

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!("Skipping unreadable directory {}: {}", dir.display(), err);
            return;
        }
    };

    visit_entries(root, dir, entries, paths, ignore_patterns);
}

fn visit_entries(
    root: &Path,
    dir: &Path,
    entries: ReadDir,
    paths: &DashSet<String>,
    ignore_patterns: &[Pattern],
) {
    entries.par_bridge().for_each(|entry_result| {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Error reading entry in directory {}: {}", dir.display(), err);
                return;
            }
        };

        let path = entry.path();
        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(err) => {
                warn!("Error getting file type for {}: {}", path.display(), err);
                return;
            }
        };

        if file_type.is_symlink() {
            trace!("Skipping symlink {}", path.display());
        } else if file_type.is_dir() {
            visit_dirs(root, &path, paths, ignore_patterns);
        } else if file_type.is_file() && !is_ignored(root, &path, ignore_patterns) {
            if let Some(key) = relative_key(root, &path) {
                paths.insert(key);
            }
        }
    });
}
