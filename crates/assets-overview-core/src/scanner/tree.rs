use super::walk::collect_disk_paths;
use crate::error::Error;
use crate::storage::{CatalogSnapshot, Stage};
use ahash::{AHashMap, AHashSet};
use std::collections::{btree_map, BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// One member of the disk ∪ database union.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEntry {
    /// Root-relative key. The on-disk spelling wins when a database path was folded in.
    pub path: String,
    pub exists_on_disk: bool,
    /// Path of the staging row attached to this entry, if any.
    pub staging_match: Option<String>,
    /// Path of the live row attached to this entry, if any.
    pub live_match: Option<String>,
}

impl ScanEntry {
    fn on_disk(path: &str) -> Self {
        Self {
            path: path.to_string(),
            exists_on_disk: true,
            staging_match: None,
            live_match: None,
        }
    }

    fn database_only(path: &str) -> Self {
        Self {
            path: path.to_string(),
            exists_on_disk: false,
            staging_match: None,
            live_match: None,
        }
    }

    pub fn matched(&self, stage: Stage) -> Option<&str> {
        match stage {
            Stage::Staging => self.staging_match.as_deref(),
            Stage::Live => self.live_match.as_deref(),
        }
    }

    fn set_match(&mut self, stage: Stage, db_path: &str) {
        let slot = match stage {
            Stage::Staging => &mut self.staging_match,
            Stage::Live => &mut self.live_match,
        };
        *slot = Some(db_path.to_string());
    }
}

/// Sorted, finite sequence of scan entries. Each `scan` call builds a new one.
///
/// Not streaming: the whole union is walked and merged in memory before the
/// first entry is yielded.
pub struct ScanEntries {
    inner: btree_map::IntoValues<String, ScanEntry>,
}

impl Iterator for ScanEntries {
    type Item = ScanEntry;

    fn next(&mut self) -> Option<ScanEntry> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for ScanEntries {}

pub struct TreeScanner {
    asset_root: PathBuf,
    ignore_patterns: Vec<String>,
}

impl TreeScanner {
    pub fn new(asset_root: impl Into<PathBuf>, ignore_patterns: Vec<String>) -> Self {
        Self {
            asset_root: asset_root.into(),
            ignore_patterns,
        }
    }

    pub fn asset_root(&self) -> &Path {
        &self.asset_root
    }

    /// Sorted root-relative keys of every file on disk.
    pub fn disk_paths(&self) -> Result<BTreeSet<String>, Error> {
        let start = Instant::now();
        let found = collect_disk_paths(&self.asset_root, &self.ignore_patterns)?;
        let paths: BTreeSet<String> = found.into_iter().collect();
        debug!(
            "Disk walk of {} found {} files in {:.2}s",
            self.asset_root.display(),
            paths.len(),
            start.elapsed().as_secs_f64()
        );
        Ok(paths)
    }

    /// Union of disk files and database paths, sorted by key.
    ///
    /// A database path missing from disk that matches exactly one disk file
    /// case-insensitively is attached to that file instead of becoming its own
    /// entry, provided the disk file has no exact row in the same table.
    pub fn scan(&self, catalog: &CatalogSnapshot) -> Result<ScanEntries, Error> {
        info!("Scanning {}", self.asset_root.display());
        let disk = self.disk_paths()?;

        let mut entries: BTreeMap<String, ScanEntry> = disk
            .iter()
            .map(|path| (path.clone(), ScanEntry::on_disk(path)))
            .collect();

        let mut disk_by_lower: AHashMap<String, Vec<&str>> = AHashMap::new();
        for path in &disk {
            disk_by_lower
                .entry(path.to_lowercase())
                .or_default()
                .push(path.as_str());
        }

        for stage in [Stage::Staging, Stage::Live] {
            merge_stage(&mut entries, &disk, &disk_by_lower, catalog, stage);
        }

        let database_only = entries.values().filter(|e| !e.exists_on_disk).count();
        info!(
            "Scan union: {} entries ({} on disk, {} database only)",
            entries.len(),
            disk.len(),
            database_only
        );

        Ok(ScanEntries {
            inner: entries.into_values(),
        })
    }
}

fn merge_stage(
    entries: &mut BTreeMap<String, ScanEntry>,
    disk: &BTreeSet<String>,
    disk_by_lower: &AHashMap<String, Vec<&str>>,
    catalog: &CatalogSnapshot,
    stage: Stage,
) {
    // Sorted so folding is deterministic.
    let mut db_paths: Vec<&str> = catalog.paths(stage).collect();
    db_paths.sort_unstable();

    let mut folded_targets: AHashSet<String> = AHashSet::new();
    for db_path in db_paths {
        if disk.contains(db_path) {
            if let Some(entry) = entries.get_mut(db_path) {
                entry.set_match(stage, db_path);
            }
            continue;
        }

        let fold_target = disk_by_lower
            .get(&db_path.to_lowercase())
            .filter(|candidates| candidates.len() == 1)
            .map(|candidates| candidates[0])
            .filter(|target| {
                !catalog.contains(stage, target) && !folded_targets.contains(*target)
            });

        if let Some(target) = fold_target {
            debug!(
                "{} path '{}' differs in case from disk file '{}'",
                stage.table_name(),
                db_path,
                target
            );
            if let Some(entry) = entries.get_mut(target) {
                entry.set_match(stage, db_path);
            }
            folded_targets.insert(target.to_string());
            continue;
        }

        entries
            .entry(db_path.to_string())
            .or_insert_with(|| ScanEntry::database_only(db_path))
            .set_match(stage, db_path);
    }
}
