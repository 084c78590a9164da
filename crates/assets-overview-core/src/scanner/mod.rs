mod tree;
pub mod walk;

pub use tree::{ScanEntries, ScanEntry, TreeScanner};
