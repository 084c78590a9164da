//! Per-path classification: merges disk metadata with the staging and live
//! rows for one path into a single [`FileRecord`].

pub mod disk;
mod record;
pub mod rules;

pub use disk::DiskInfo;
pub use record::FileRecord;
pub use rules::{AssetsPrefixRule, LegacyPathRule, NoLegacyRule};

use crate::paths;
use crate::scanner::ScanEntry;
use crate::storage::{CatalogSnapshot, DbFileRecord, Stage};
use std::path::Path;
use tracing::trace;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp"];

/// Database-side checks needed to compute the error flags.
pub struct RecordChecks<'a> {
    pub folder_exists: &'a (dyn Fn(i64) -> bool + Sync),
    pub legacy_rule: &'a dyn LegacyPathRule,
}

pub struct FileClassifier<'a> {
    asset_root: &'a Path,
    catalog: &'a CatalogSnapshot,
    legacy_rule: &'a dyn LegacyPathRule,
}

impl<'a> FileClassifier<'a> {
    pub fn new(
        asset_root: &'a Path,
        catalog: &'a CatalogSnapshot,
        legacy_rule: &'a dyn LegacyPathRule,
    ) -> Self {
        Self {
            asset_root,
            catalog,
            legacy_rule,
        }
    }

    /// Classify a scan entry using the rows the scanner attached to it.
    /// `None` only for an entry with no disk file and no attached row.
    pub fn classify(&self, entry: &ScanEntry) -> Option<FileRecord> {
        let staging = entry
            .matched(Stage::Staging)
            .and_then(|p| self.catalog.get(Stage::Staging, p));
        let live = entry
            .matched(Stage::Live)
            .and_then(|p| self.catalog.get(Stage::Live, p));
        self.classify_with(&entry.path, entry.exists_on_disk, staging, live)
    }

    /// Classify a bare path: exact row lookup first, then a unique
    /// case-insensitive match. `None` when neither disk nor database knows the path.
    pub fn classify_path(&self, path: &str, exists_on_disk: bool) -> Option<FileRecord> {
        let path = paths::normalize_relative(path);
        let staging = self.lookup(Stage::Staging, &path);
        let live = self.lookup(Stage::Live, &path);
        self.classify_with(&path, exists_on_disk, staging, live)
    }

    fn lookup(&self, stage: Stage, path: &str) -> Option<&'a DbFileRecord> {
        self.catalog
            .get(stage, path)
            .or_else(|| self.catalog.find_case_insensitive(stage, path))
    }

    fn classify_with(
        &self,
        path: &str,
        exists_on_disk: bool,
        staging: Option<&DbFileRecord>,
        live: Option<&DbFileRecord>,
    ) -> Option<FileRecord> {
        let disk = exists_on_disk.then(|| {
            let probe_image = looks_like_image(path, staging.or(live));
            disk::read_disk_info(&self.asset_root.join(path), probe_image)
        });
        let folder_exists = |id: i64| self.catalog.folder_exists(id);
        let checks = RecordChecks {
            folder_exists: &folder_exists,
            legacy_rule: self.legacy_rule,
        };
        let record = build_file_record(path, disk.as_ref(), staging, live, &checks);
        trace!("Classified {:?}", record);
        record
    }
}

fn looks_like_image(path: &str, record: Option<&DbFileRecord>) -> bool {
    IMAGE_EXTENSIONS.contains(&paths::lower_extension(path).as_str())
        || record.is_some_and(|r| r.class_name.ends_with("Image"))
}

/// Merge the two existence signals and their metadata into one record.
/// No I/O and no hidden state. Returns `None` when no source backs the path.
pub fn build_file_record(
    path: &str,
    disk: Option<&DiskInfo>,
    staging: Option<&DbFileRecord>,
    live: Option<&DbFileRecord>,
    checks: &RecordChecks<'_>,
) -> Option<FileRecord> {
    if disk.is_none() && staging.is_none() && live.is_none() {
        return None;
    }
    let primary = staging.or(live);
    let raw_extension = paths::raw_extension(path);
    let extension = raw_extension.to_lowercase();

    let (width_px, height_px) = disk.and_then(|d| d.dimensions).unwrap_or((0, 0));
    let ratio = if height_px > 0 {
        width_px as f64 / height_px as f64
    } else {
        0.0
    };

    let last_edited_timestamp = disk
        .map(|d| d.modified)
        .filter(|t| *t > 0)
        .or_else(|| primary.and_then(|r| r.last_edited))
        .unwrap_or(0)
        .max(0);

    let rows = || staging.into_iter().chain(live);

    Some(FileRecord {
        absolute_path: format!("/{}", path),
        path_from_assets_folder: path.to_string(),
        folder_only: paths::folder_of(path).to_string(),
        file_name: paths::file_name(path).to_string(),
        is_image: looks_like_image(path, primary),
        extension,

        exists_on_disk: disk.is_some(),
        exists_in_staging_db: staging.is_some(),
        exists_in_live_db: live.is_some(),

        database_title: primary.map(|r| r.title.clone()).unwrap_or_default(),
        class_name: primary.map(|r| r.class_name.clone()).unwrap_or_default(),

        file_size: disk.map(|d| d.size).unwrap_or(0),
        last_edited_timestamp,

        width_px,
        height_px,
        ratio: if ratio.is_finite() { ratio } else { 0.0 },

        // Only a file actually on disk can carry a mis-cased extension.
        has_irregular_extension: disk.is_some() && raw_extension != raw_extension.to_lowercase(),
        error_in_filename_case: rows().any(|r| r.path != path),
        error_in_legacy_path_comparison: primary
            .is_some_and(|r| checks.legacy_rule.is_inconsistent(r)),
        error_parent_folder_id: rows()
            .any(|r| r.parent_id != 0 && !(checks.folder_exists)(r.parent_id)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(path: &str, parent_id: i64) -> DbFileRecord {
        DbFileRecord {
            id: 7,
            path: path.to_string(),
            title: "Cat".to_string(),
            class_name: "Image".to_string(),
            parent_id,
            legacy_filename: None,
            last_edited: Some(1_700_000_000),
        }
    }

    fn build(
        path: &str,
        disk: Option<&DiskInfo>,
        staging: Option<&DbFileRecord>,
        live: Option<&DbFileRecord>,
    ) -> FileRecord {
        let folders = |id: i64| id == 3;
        let checks = RecordChecks {
            folder_exists: &folders,
            legacy_rule: &NoLegacyRule,
        };
        build_file_record(path, disk, staging, live, &checks).unwrap()
    }

    #[test]
    fn test_case_mismatch_sets_both_flags() {
        let disk = DiskInfo {
            size: 2048,
            modified: 1_600_000_000,
            dimensions: None,
        };
        let staging = row("a/cat.jpg", 0);
        let record = build("a/cat.JPG", Some(&disk), Some(&staging), None);

        assert!(record.exists_on_disk);
        assert!(record.exists_in_staging_db);
        assert!(!record.exists_in_live_db);
        assert!(record.has_irregular_extension);
        assert!(record.error_in_filename_case);
        assert_eq!(record.extension, "jpg");
        assert_eq!(record.database_title, "Cat");
        assert_eq!(record.file_size, 2048);
        assert_eq!(record.last_edited_timestamp, 1_600_000_000);
        assert_eq!(record.absolute_path, "/a/cat.JPG");
        assert_eq!(record.folder_only, "a");
    }

    #[test]
    fn test_database_only_record_uses_row_timestamp() {
        let live = row("b/dog.png", 0);
        let record = build("b/dog.png", None, None, Some(&live));

        assert!(!record.exists_on_disk);
        assert!(record.exists_in_live_db);
        assert_eq!(record.file_size, 0);
        assert_eq!(record.last_edited_timestamp, 1_700_000_000);
        assert!(!record.error_in_filename_case);
        assert!(record.is_image);
    }

    #[test]
    fn test_ratio_is_zero_without_height() {
        let disk = DiskInfo {
            size: 10,
            modified: 1,
            dimensions: Some((640, 0)),
        };
        let record = build("x.png", Some(&disk), None, None);
        assert_eq!(record.ratio, 0.0);

        let disk = DiskInfo {
            dimensions: Some((640, 480)),
            ..disk
        };
        let record = build("x.png", Some(&disk), None, None);
        assert!((record.ratio - 4.0 / 3.0).abs() < 1e-9);
        assert_eq!(record.human_image_dimensions(), "640x480");
        assert_eq!(record.pixels(), 307_200);
    }

    #[test]
    fn test_parent_folder_check() {
        let ok = row("a/cat.jpg", 3);
        let dangling = row("a/cat.jpg", 99);
        assert!(!build("a/cat.jpg", None, Some(&ok), None).error_parent_folder_id);
        assert!(build("a/cat.jpg", None, Some(&ok), Some(&dangling)).error_parent_folder_id);
        assert!(!build("a/cat.jpg", None, Some(&row("a/cat.jpg", 0)), None).error_parent_folder_id);
    }

    #[test]
    fn test_no_source_means_no_record() {
        let folders = |_: i64| true;
        let checks = RecordChecks {
            folder_exists: &folders,
            legacy_rule: &NoLegacyRule,
        };
        assert!(build_file_record("ghost/file.txt", None, None, None, &checks).is_none());
    }

    #[test]
    fn test_database_only_upper_case_extension_is_not_irregular() {
        let live = row("b/dog.PNG", 0);
        let record = build("b/dog.PNG", None, None, Some(&live));
        assert!(!record.exists_on_disk);
        assert!(!record.has_irregular_extension);
        assert_eq!(record.extension, "png");
    }
}
