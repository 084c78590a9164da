use super::models::*;
use super::sqlite::Database;
use super::AssetCatalog;
use crate::error::Error;
use crate::paths::normalize_relative;
use ahash::AHashSet;
use chrono::{DateTime, NaiveDateTime};
use rusqlite::Row;
use tracing::debug;

impl Database {
    // ── File records ─────────────────────────────────────────────

    /// All non-folder rows of one stage that carry a file path.
    pub fn file_records(&self, stage: Stage) -> Result<Vec<DbFileRecord>, Error> {
        let sql = format!(
            "SELECT \"ID\", \"FileFilename\", \"Title\", \"ClassName\", \"ParentID\", \
                    \"Filename\", \"LastEdited\" \
             FROM \"{}\" \
             WHERE \"ClassName\" NOT LIKE '%Folder' AND \"FileFilename\" <> '' \
             ORDER BY \"ID\"",
            stage.table_name()
        );
        let mut stmt = self.connection().prepare(&sql)?;
        let records = stmt
            .query_map([], row_to_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        debug!("Loaded {} {:?} file records", records.len(), stage);
        Ok(records)
    }

    // ── Folders ──────────────────────────────────────────────────

    pub fn load_folder_ids(&self) -> Result<AHashSet<i64>, Error> {
        let mut stmt = self
            .connection()
            .prepare("SELECT \"ID\" FROM \"File\" WHERE \"ClassName\" LIKE '%Folder'")?;
        let ids = stmt
            .query_map([], |row| row.get::<_, i64>(0))?
            .collect::<rusqlite::Result<AHashSet<_>>>()?;
        debug!("Loaded {} folder ids", ids.len());
        Ok(ids)
    }
}

impl AssetCatalog for Database {
    fn staging_records(&self) -> Result<Vec<DbFileRecord>, Error> {
        self.file_records(Stage::Staging)
    }

    fn live_records(&self) -> Result<Vec<DbFileRecord>, Error> {
        self.file_records(Stage::Live)
    }

    fn folder_ids(&self) -> Result<AHashSet<i64>, Error> {
        self.load_folder_ids()
    }
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<DbFileRecord> {
    let path: String = row.get(1)?;
    let legacy: Option<String> = row.get(5)?;
    let last_edited: Option<String> = row.get(6)?;
    Ok(DbFileRecord {
        id: row.get(0)?,
        path: normalize_relative(&path),
        title: row.get(2)?,
        class_name: row.get(3)?,
        parent_id: row.get(4)?,
        legacy_filename: legacy.filter(|l| !l.trim().is_empty()),
        last_edited: last_edited.as_deref().and_then(parse_last_edited),
    })
}

/// Accepts the CMS `YYYY-MM-DD HH:MM:SS` form as UTC, or RFC 3339.
pub fn parse_last_edited(value: &str) -> Option<i64> {
    let value = value.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc().timestamp());
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.timestamp())
}
