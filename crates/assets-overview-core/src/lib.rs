pub mod classify;
pub mod compare;
pub mod config;
pub mod engine;
pub mod error;
pub mod format;
pub mod paths;
pub mod progress;
pub mod query;
pub mod report;
pub mod scanner;
pub mod storage;

pub use classify::{FileClassifier, FileRecord};
pub use config::AppConfig;
pub use engine::{Aggregates, Reconciliation, ReconciliationEngine};
pub use error::Error;
pub use progress::{ProgressReporter, SilentReporter};
pub use query::{QueryConfig, QueryOptions, QueryWarning};
pub use report::{Report, ReportAssembler, ReportGroup};
pub use scanner::{ScanEntry, TreeScanner};
pub use storage::{AssetCatalog, CatalogSnapshot, Database};
