use crate::classify::{AssetsPrefixRule, FileClassifier, FileRecord, LegacyPathRule};
use crate::config::AppConfig;
use crate::error::Error;
use crate::paths::lower_extension;
use crate::progress::ProgressReporter;
use crate::query::{QueryConfig, TotalsMode};
use crate::scanner::{ScanEntry, TreeScanner};
use crate::storage::{AssetCatalog, CatalogSnapshot};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Entries classified in parallel before being folded into the totals in order.
const CLASSIFY_BATCH: usize = 512;

/// Running totals over the whole filtered set, not just the materialized page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Aggregates {
    /// Entries that passed the extension allow-list and were classified.
    pub total_raw_count: usize,
    pub total_filtered_count: usize,
    pub total_filtered_size_bytes: u64,
    /// The pass stopped early; counts are lower bounds.
    pub partial: bool,
}

#[derive(Debug)]
pub struct Reconciliation {
    /// Filtered records inside the page window, in scan order.
    pub records: Vec<FileRecord>,
    pub aggregates: Aggregates,
    /// Lower-cased extensions seen anywhere in the union.
    pub available_extensions: Vec<String>,
    pub scan_duration: Duration,
    pub classify_duration: Duration,
}

pub struct ReconciliationEngine<'a> {
    scanner: TreeScanner,
    catalog: &'a dyn AssetCatalog,
    legacy_rule: Box<dyn LegacyPathRule>,
}

impl<'a> ReconciliationEngine<'a> {
    pub fn new(config: &AppConfig, catalog: &'a dyn AssetCatalog) -> Self {
        Self {
            scanner: TreeScanner::new(config.asset_root_path(), config.ignore_patterns.clone()),
            catalog,
            legacy_rule: Box::new(AssetsPrefixRule::new(&config.legacy_prefix)),
        }
    }

    pub fn with_legacy_rule(mut self, rule: Box<dyn LegacyPathRule>) -> Self {
        self.legacy_rule = rule;
        self
    }

    pub fn asset_root(&self) -> &Path {
        self.scanner.asset_root()
    }

    /// Single pass over the disk ∪ database union:
    /// 1. Skip entries whose extension is not allowed
    /// 2. Classify the rest (parallel batches) and count them raw
    /// 3. Apply the row filter, count filtered records and their size
    /// 4. Keep only filtered records inside the page window
    pub fn reconcile(
        &self,
        query: &QueryConfig,
        reporter: &dyn ProgressReporter,
    ) -> Result<Reconciliation, Error> {
        let snapshot = CatalogSnapshot::load(self.catalog)?;

        reporter.on_scan_start(&self.asset_root().to_string_lossy());
        let scan_start = Instant::now();
        let entries: Vec<ScanEntry> = self.scanner.scan(&snapshot)?.collect();
        let scan_duration = scan_start.elapsed();
        reporter.on_scan_complete(entries.len(), scan_duration.as_secs_f64());

        let available_extensions: BTreeSet<String> = entries
            .iter()
            .map(|e| lower_extension(&e.path))
            .filter(|e| !e.is_empty())
            .collect();

        let classify_start = Instant::now();
        let classifier = FileClassifier::new(self.asset_root(), &snapshot, self.legacy_rule.as_ref());
        let (records, aggregates) = fold_entries(&entries, &classifier, query, reporter);
        let classify_duration = classify_start.elapsed();

        debug!(
            "Scan {:.2}s, classification {:.2}s",
            scan_duration.as_secs_f64(),
            classify_duration.as_secs_f64()
        );
        info!(
            "Reconciled {} files: {} match, {} bytes, {} on this page{}",
            aggregates.total_raw_count,
            aggregates.total_filtered_count,
            aggregates.total_filtered_size_bytes,
            records.len(),
            if aggregates.partial { " (partial)" } else { "" }
        );
        reporter.on_reconcile_complete(&aggregates, classify_duration.as_secs_f64());

        Ok(Reconciliation {
            records,
            aggregates,
            available_extensions: available_extensions.into_iter().collect(),
            scan_duration,
            classify_duration,
        })
    }

    /// Every filtered record, ignoring pagination. Used for bulk export.
    pub fn export(
        &self,
        query: &QueryConfig,
        reporter: &dyn ProgressReporter,
    ) -> Result<Vec<FileRecord>, Error> {
        let export_query = query.for_export().with_totals(TotalsMode::Exact);
        Ok(self.reconcile(&export_query, reporter)?.records)
    }

    /// The bare union: key → present on disk.
    pub fn file_map(&self) -> Result<BTreeMap<String, bool>, Error> {
        let snapshot = CatalogSnapshot::load(self.catalog)?;
        Ok(self
            .scanner
            .scan(&snapshot)?
            .map(|entry| (entry.path, entry.exists_on_disk))
            .collect())
    }
}

fn fold_entries(
    entries: &[ScanEntry],
    classifier: &FileClassifier<'_>,
    query: &QueryConfig,
    reporter: &dyn ProgressReporter,
) -> (Vec<FileRecord>, Aggregates) {
    let window = query.window();
    let row_filter = query.row_filter();
    let mut aggregates = Aggregates::default();
    let mut records = Vec::new();
    let mut processed = 0usize;

    'batches: for batch in entries.chunks(CLASSIFY_BATCH) {
        let classified: Vec<Option<FileRecord>> = batch
            .par_iter()
            .map(|entry| {
                query
                    .allows_extension(&lower_extension(&entry.path))
                    .then(|| classifier.classify(entry))
                    .flatten()
            })
            .collect();

        for record in classified {
            if query.totals == TotalsMode::WindowOnly
                && aggregates.total_filtered_count >= window.end
            {
                aggregates.partial = true;
                break 'batches;
            }
            let Some(record) = record else {
                processed += 1;
                continue;
            };
            if query
                .max_entries
                .is_some_and(|max| aggregates.total_raw_count >= max)
            {
                aggregates.partial = true;
                break 'batches;
            }
            processed += 1;
            debug_assert!(
                record.exists_on_disk || record.exists_in_staging_db || record.exists_in_live_db
            );

            aggregates.total_raw_count += 1;
            if row_filter.is_some_and(|filter| !filter.accepts(&record)) {
                continue;
            }
            let filtered_index = aggregates.total_filtered_count;
            aggregates.total_filtered_count += 1;
            aggregates.total_filtered_size_bytes += record.file_size;
            if window.contains(&filtered_index) {
                records.push(record);
            }
        }
        reporter.on_classify_progress(processed, entries.len());
    }

    if aggregates.partial {
        info!(
            "Stopped after {} of {} entries; totals are partial",
            processed,
            entries.len()
        );
    }
    (records, aggregates)
}
