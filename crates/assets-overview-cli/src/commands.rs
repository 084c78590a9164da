use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use assets_overview_core::query::{QueryOptions, TotalsMode};

#[derive(Debug, Parser)]
#[command(name = "assets-overview")]
#[command(about = "Reconcile an asset folder against its CMS file tables", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print one page of the grouped overview
    Report(ReportArgs),
    /// Write every filtered record as JSON or CSV
    Export(ExportArgs),
    /// Print the union of disk and database paths with their disk status
    Files,
    /// Compare two images byte by byte, then pixel by pixel
    CompareImages {
        first: PathBuf,
        second: PathBuf,
    },
    /// List the available sorters, filters and display modes
    ListOptions,
    /// Print configuration values
    PrintConfig,
}

#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Sorter key, e.g. byfolder, byfilesize, bydimensions
    #[arg(long)]
    pub sorter: Option<String>,
    /// Filter key, e.g. byfilesystemstatus, byfoldererror
    #[arg(long)]
    pub filter: Option<String>,
    /// Only include these extensions (comma separated, case-insensitive)
    #[arg(long = "ext", value_delimiter = ',')]
    pub extensions: Vec<String>,
    /// Stop classifying after this many entries and report partial totals
    #[arg(long)]
    pub max_entries: Option<usize>,
    /// Stop once the requested page is filled; totals become partial
    #[arg(long)]
    pub window_only: bool,
}

impl QueryArgs {
    pub fn totals(&self) -> TotalsMode {
        if self.window_only {
            TotalsMode::WindowOnly
        } else {
            TotalsMode::Exact
        }
    }
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub query: QueryArgs,
    /// Records per page
    #[arg(long)]
    pub limit: Option<String>,
    /// 1-based page number
    #[arg(long)]
    pub page: Option<String>,
    /// Display mode: thumbs, rawlist or rawlistfull
    #[arg(long)]
    pub displayer: Option<String>,
    /// Print the report as JSON instead of text
    #[arg(long)]
    pub json: bool,
}

impl ReportArgs {
    pub fn options(&self) -> QueryOptions {
        QueryOptions {
            sorter: self.query.sorter.clone(),
            filter: self.query.filter.clone(),
            extensions: self.query.extensions.clone(),
            limit: self.limit.clone(),
            page: self.page.clone(),
            display_mode: self.displayer.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub query: QueryArgs,
    #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
    pub format: ExportFormat,
    /// Write to this file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

impl ExportArgs {
    pub fn options(&self) -> QueryOptions {
        QueryOptions {
            sorter: self.query.sorter.clone(),
            filter: self.query.filter.clone(),
            extensions: self.query.extensions.clone(),
            ..QueryOptions::default()
        }
    }
}
