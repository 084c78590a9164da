pub mod models;
mod queries;
mod sqlite;

pub use models::{DbFileRecord, Stage};
pub use queries::parse_last_edited;
pub use sqlite::Database;

use crate::error::Error;
use ahash::{AHashMap, AHashSet};
use tracing::{debug, warn};

/// Read-only view of the CMS file tables.
pub trait AssetCatalog {
    /// Every file row of the draft table.
    fn staging_records(&self) -> Result<Vec<DbFileRecord>, Error>;
    /// Every file row of the published table.
    fn live_records(&self) -> Result<Vec<DbFileRecord>, Error>;
    /// Ids of all existing folder rows.
    fn folder_ids(&self) -> Result<AHashSet<i64>, Error>;
}

/// Both file tables and the folder set, loaded once per request and indexed
/// by exact path.
#[derive(Debug, Default)]
pub struct CatalogSnapshot {
    staging: AHashMap<String, DbFileRecord>,
    live: AHashMap<String, DbFileRecord>,
    staging_by_lower: AHashMap<String, Vec<String>>,
    live_by_lower: AHashMap<String, Vec<String>>,
    folder_ids: AHashSet<i64>,
}

impl CatalogSnapshot {
    /// Any failure here means the database cannot be reached, which is fatal.
    pub fn load<C: AssetCatalog + ?Sized>(catalog: &C) -> Result<Self, Error> {
        let unavailable = |e: Error| match e {
            e @ Error::SourceUnavailable { .. } => e,
            other => Error::source_unavailable("database", other),
        };
        let staging = catalog.staging_records().map_err(unavailable)?;
        let live = catalog.live_records().map_err(unavailable)?;
        let folder_ids = catalog.folder_ids().map_err(unavailable)?;
        Ok(Self::from_parts(staging, live, folder_ids))
    }

    pub fn from_parts(
        staging: Vec<DbFileRecord>,
        live: Vec<DbFileRecord>,
        folder_ids: AHashSet<i64>,
    ) -> Self {
        let staging = index_by_path(staging, Stage::Staging);
        let live = index_by_path(live, Stage::Live);
        let snapshot = Self {
            staging_by_lower: index_by_lower(&staging),
            live_by_lower: index_by_lower(&live),
            staging,
            live,
            folder_ids,
        };
        debug!(
            "Catalog snapshot: {} staging, {} live, {} folders",
            snapshot.staging.len(),
            snapshot.live.len(),
            snapshot.folder_ids.len()
        );
        snapshot
    }

    pub fn get(&self, stage: Stage, path: &str) -> Option<&DbFileRecord> {
        self.table(stage).get(path)
    }

    pub fn contains(&self, stage: Stage, path: &str) -> bool {
        self.table(stage).contains_key(path)
    }

    pub fn paths(&self, stage: Stage) -> impl Iterator<Item = &str> {
        self.table(stage).keys().map(|k| k.as_str())
    }

    /// The single row whose path equals `path` ignoring case. Ambiguous matches yield `None`.
    pub fn find_case_insensitive(&self, stage: Stage, path: &str) -> Option<&DbFileRecord> {
        let by_lower = match stage {
            Stage::Staging => &self.staging_by_lower,
            Stage::Live => &self.live_by_lower,
        };
        match by_lower.get(&path.to_lowercase())?.as_slice() {
            [only] => self.get(stage, only),
            _ => None,
        }
    }

    pub fn folder_exists(&self, id: i64) -> bool {
        self.folder_ids.contains(&id)
    }

    pub fn record_count(&self, stage: Stage) -> usize {
        self.table(stage).len()
    }

    fn table(&self, stage: Stage) -> &AHashMap<String, DbFileRecord> {
        match stage {
            Stage::Staging => &self.staging,
            Stage::Live => &self.live,
        }
    }
}

fn index_by_lower(table: &AHashMap<String, DbFileRecord>) -> AHashMap<String, Vec<String>> {
    let mut by_lower: AHashMap<String, Vec<String>> = AHashMap::new();
    for path in table.keys() {
        by_lower.entry(path.to_lowercase()).or_default().push(path.clone());
    }
    by_lower
}

/// Several rows sharing one path keep the lowest id.
fn index_by_path(records: Vec<DbFileRecord>, stage: Stage) -> AHashMap<String, DbFileRecord> {
    let mut map: AHashMap<String, DbFileRecord> = AHashMap::with_capacity(records.len());
    for record in records {
        if record.path.is_empty() {
            continue;
        }
        match map.get(&record.path) {
            Some(existing) if existing.id <= record.id => {
                warn!(
                    "Duplicate {} rows for '{}' (ids {} and {}), keeping {}",
                    stage.table_name(),
                    record.path,
                    existing.id,
                    record.id,
                    existing.id
                );
            }
            _ => {
                map.insert(record.path.clone(), record);
            }
        }
    }
    map
}
