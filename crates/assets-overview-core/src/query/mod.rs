//! Per-request options, resolved once against the fixed sorter/filter/display
//! catalogs into an immutable [`QueryConfig`].

mod filter;
mod sorter;

pub use filter::{FilterField, FilterKey, RowFilter};
pub use sorter::{GroupField, SortField, SortKey};

use std::ops::Range;
use thiserror::Error;
use tracing::warn;

pub const DEFAULT_LIMIT: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Thumbnails,
    FlatList,
    FullRawFields,
}

impl DisplayMode {
    pub const ALL: [DisplayMode; 3] = [
        DisplayMode::Thumbnails,
        DisplayMode::FlatList,
        DisplayMode::FullRawFields,
    ];

    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.key() == key)
    }

    pub fn key(self) -> &'static str {
        match self {
            DisplayMode::Thumbnails => "thumbs",
            DisplayMode::FlatList => "rawlist",
            DisplayMode::FullRawFields => "rawlistfull",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            DisplayMode::Thumbnails => "Thumbnails",
            DisplayMode::FlatList => "File List",
            DisplayMode::FullRawFields => "Raw Data",
        }
    }
}

/// Whether totals must cover the whole filtered set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TotalsMode {
    #[default]
    Exact,
    /// Stop once the page window is filled; totals are then partial.
    WindowOnly,
}

/// An option value that is not in its catalog. Reported, never fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryWarning {
    #[error("unknown sorter '{0}', using '{}'", SortKey::default().key())]
    UnknownSorter(String),
    #[error("unknown filter '{0}', showing all files")]
    UnknownFilter(String),
    #[error("unknown display mode '{0}', using '{}'", DisplayMode::default().key())]
    UnknownDisplayMode(String),
    #[error("invalid limit '{0}', using {}", DEFAULT_LIMIT)]
    InvalidLimit(String),
    #[error("invalid page '{0}', using 1")]
    InvalidPage(String),
}

/// Raw caller-supplied values. Every field is optional; blanks count as unset.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    pub sorter: Option<String>,
    pub filter: Option<String>,
    pub extensions: Vec<String>,
    pub limit: Option<String>,
    pub page: Option<String>,
    pub display_mode: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryConfig {
    pub sorter: SortKey,
    pub filter: Option<FilterKey>,
    /// Lower-cased, without dots, sorted. Empty allows every extension.
    pub allowed_extensions: Vec<String>,
    pub limit: usize,
    /// 1-based.
    pub page: usize,
    pub display_mode: DisplayMode,
    /// When false the window spans the whole filtered set.
    pub paginate: bool,
    /// Cap on classified entries; a capped run reports partial totals.
    pub max_entries: Option<usize>,
    pub totals: TotalsMode,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            sorter: SortKey::default(),
            filter: None,
            allowed_extensions: Vec::new(),
            limit: DEFAULT_LIMIT,
            page: 1,
            display_mode: DisplayMode::default(),
            paginate: true,
            max_entries: None,
            totals: TotalsMode::default(),
        }
    }
}

impl QueryConfig {
    pub fn resolve(options: &QueryOptions) -> (Self, Vec<QueryWarning>) {
        let mut config = QueryConfig::default();
        let mut warnings = Vec::new();

        if let Some(value) = non_blank(&options.sorter) {
            match SortKey::parse(value) {
                Some(sorter) => config.sorter = sorter,
                None => warnings.push(QueryWarning::UnknownSorter(value.to_string())),
            }
        }
        if let Some(value) = non_blank(&options.filter) {
            match FilterKey::parse(value) {
                Some(filter) => config.filter = Some(filter),
                None => warnings.push(QueryWarning::UnknownFilter(value.to_string())),
            }
        }
        if let Some(value) = non_blank(&options.display_mode) {
            match DisplayMode::parse(value) {
                Some(mode) => config.display_mode = mode,
                None => warnings.push(QueryWarning::UnknownDisplayMode(value.to_string())),
            }
        }
        if let Some(value) = non_blank(&options.limit) {
            match value.parse::<usize>() {
                Ok(limit) if limit > 0 => config.limit = limit,
                _ => warnings.push(QueryWarning::InvalidLimit(value.to_string())),
            }
        }
        if let Some(value) = non_blank(&options.page) {
            match value.parse::<usize>() {
                Ok(page) if page > 0 => config.page = page,
                _ => warnings.push(QueryWarning::InvalidPage(value.to_string())),
            }
        }
        config.allowed_extensions = normalize_extensions(&options.extensions);

        for warning in &warnings {
            warn!("Query option ignored: {}", warning);
        }
        (config, warnings)
    }

    /// Same filter and extensions, no pagination: the whole filtered set.
    pub fn for_export(&self) -> Self {
        Self {
            paginate: false,
            ..self.clone()
        }
    }

    pub fn with_max_entries(mut self, max_entries: Option<usize>) -> Self {
        self.max_entries = max_entries;
        self
    }

    pub fn with_totals(mut self, totals: TotalsMode) -> Self {
        self.totals = totals;
        self
    }

    /// First filtered index of the page, counted in filtered records.
    pub fn page_start(&self) -> usize {
        if self.paginate {
            self.limit.saturating_mul(self.page.saturating_sub(1))
        } else {
            0
        }
    }

    /// One past the last filtered index of the page.
    pub fn page_end(&self) -> usize {
        if self.paginate {
            self.limit.saturating_mul(self.page)
        } else {
            usize::MAX
        }
    }

    pub fn window(&self) -> Range<usize> {
        self.page_start()..self.page_end()
    }

    pub fn sort_field(&self) -> SortField {
        self.sorter.sort_field()
    }

    pub fn group_field(&self) -> GroupField {
        self.sorter.group_field()
    }

    pub fn row_filter(&self) -> Option<RowFilter> {
        self.filter.map(FilterKey::predicate)
    }

    pub fn allows_extension(&self, extension: &str) -> bool {
        self.allowed_extensions.is_empty()
            || self
                .allowed_extensions
                .binary_search_by(|allowed| allowed.as_str().cmp(extension))
                .is_ok()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn normalize_extensions(extensions: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_lowercase())
        .filter(|e| !e.is_empty())
        .collect();
    normalized.sort();
    normalized.dedup();
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> QueryOptions {
        QueryOptions::default()
    }

    #[test]
    fn test_defaults() {
        let (config, warnings) = QueryConfig::resolve(&options());
        assert!(warnings.is_empty());
        assert_eq!(config.sorter, SortKey::ByFolder);
        assert_eq!(config.filter, None);
        assert_eq!(config.limit, 1000);
        assert_eq!(config.page, 1);
        assert_eq!(config.display_mode, DisplayMode::Thumbnails);
        assert_eq!(config.window(), 0..1000);
    }

    #[test]
    fn test_page_window() {
        let opts = QueryOptions {
            limit: Some("10".into()),
            page: Some("2".into()),
            ..options()
        };
        let (config, _) = QueryConfig::resolve(&opts);
        assert_eq!(config.page_start(), 10);
        assert_eq!(config.page_end(), 20);
        assert_eq!(config.for_export().window(), 0..usize::MAX);
    }

    #[test]
    fn test_unknown_values_fall_back_with_warnings() {
        let opts = QueryOptions {
            sorter: Some("bycolour".into()),
            filter: Some("byeverything".into()),
            display_mode: Some("gallery".into()),
            limit: Some("0".into()),
            page: Some("first".into()),
            ..options()
        };
        let (config, warnings) = QueryConfig::resolve(&opts);
        assert_eq!(config, QueryConfig::default());
        assert_eq!(warnings.len(), 5);
        assert!(warnings.contains(&QueryWarning::UnknownSorter("bycolour".into())));
        assert!(warnings.contains(&QueryWarning::InvalidLimit("0".into())));
    }

    #[test]
    fn test_blank_values_are_unset() {
        let opts = QueryOptions {
            sorter: Some("  ".into()),
            filter: Some(String::new()),
            ..options()
        };
        let (config, warnings) = QueryConfig::resolve(&opts);
        assert!(warnings.is_empty());
        assert_eq!(config.sorter, SortKey::ByFolder);
    }

    #[test]
    fn test_catalog_lookups() {
        let opts = QueryOptions {
            sorter: Some("byratio".into()),
            filter: Some("byfilesystemstatus".into()),
            display_mode: Some("rawlistfull".into()),
            ..options()
        };
        let (config, warnings) = QueryConfig::resolve(&opts);
        assert!(warnings.is_empty());
        assert_eq!(config.sort_field(), SortField::Ratio);
        assert_eq!(config.group_field(), GroupField::Ratio);
        assert_eq!(config.display_mode, DisplayMode::FullRawFields);
        let filter = config.row_filter().unwrap();
        assert_eq!(filter.field, FilterField::ExistsOnDisk);
        assert_eq!(filter.accepted, &[false]);
    }

    #[test]
    fn test_extension_allow_list() {
        let opts = QueryOptions {
            extensions: vec![".JPG".into(), "png".into(), "".into(), "jpg".into()],
            ..options()
        };
        let (config, _) = QueryConfig::resolve(&opts);
        assert_eq!(config.allowed_extensions, vec!["jpg", "png"]);
        assert!(config.allows_extension("jpg"));
        assert!(!config.allows_extension("gif"));
        assert!(QueryConfig::default().allows_extension("anything"));
    }

    #[test]
    fn test_every_catalog_key_round_trips() {
        for key in SortKey::ALL {
            assert_eq!(SortKey::parse(key.key()), Some(key));
        }
        for key in FilterKey::ALL {
            assert_eq!(FilterKey::parse(key.key()), Some(key));
        }
        for mode in DisplayMode::ALL {
            assert_eq!(DisplayMode::parse(mode.key()), Some(mode));
        }
    }
}
