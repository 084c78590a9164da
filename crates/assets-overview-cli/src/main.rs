mod commands;
mod logging;
mod output;
mod progress;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::process;

use anyhow::Context;
use assets_overview_core::compare::compare_images;
use assets_overview_core::query::{DisplayMode, FilterKey, QueryOptions, SortKey};
use assets_overview_core::{
    AppConfig, Database, QueryConfig, ReconciliationEngine, ReportAssembler,
};
use clap::{CommandFactory, Parser};
use colored::*;
use commands::{Cli, Commands, ExportArgs, ExportFormat, QueryArgs, ReportArgs};
use dotenv::dotenv;
use progress::CliReporter;
use tracing::{error, info, warn};

fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let _guard = logging::init_logger();

    let config = match assets_overview_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    let args = Cli::parse();

    let result = match args.command {
        Some(Commands::Report(report_args)) => run_report(&config, &report_args),
        Some(Commands::Export(export_args)) => run_export(&config, &export_args),
        Some(Commands::Files) => run_files(&config),
        Some(Commands::CompareImages { first, second }) => run_compare(&first, &second),
        Some(Commands::ListOptions) => {
            print_options();
            Ok(())
        }
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:#?}", config);
            Ok(())
        }
        None => {
            let _ = Cli::command().print_long_help();
            Ok(())
        }
    };

    if let Err(err) = result {
        error!("Error: {:#}", err);
        process::exit(1);
    }
    Ok(())
}

fn open_catalog(config: &AppConfig) -> anyhow::Result<Database> {
    Database::open(&config.database_path)
        .with_context(|| format!("opening file tables at {}", config.database_path))
}

fn resolve_query(config: &AppConfig, options: &QueryOptions, query: &QueryArgs) -> QueryConfig {
    let (resolved, warnings) = QueryConfig::resolve(options);
    for warning in &warnings {
        eprintln!("{} {}", "warning:".yellow().bold(), warning);
    }
    resolved
        .with_max_entries(query.max_entries.or(config.max_entries))
        .with_totals(query.totals())
}

fn run_report(config: &AppConfig, args: &ReportArgs) -> anyhow::Result<()> {
    let db = open_catalog(config)?;
    let engine = ReconciliationEngine::new(config, &db);
    let query = resolve_query(config, &args.options(), &args.query);

    let reporter = CliReporter::new();
    let reconciliation = engine.reconcile(&query, &reporter)?;
    let report = ReportAssembler::build_report(reconciliation, &query);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &report)?;
        writeln!(out)?;
    } else {
        output::print_report(&report, query.display_mode, &mut out)?;
    }
    Ok(())
}

fn run_export(config: &AppConfig, args: &ExportArgs) -> anyhow::Result<()> {
    let db = open_catalog(config)?;
    let engine = ReconciliationEngine::new(config, &db);
    let query = resolve_query(config, &args.options(), &args.query);

    let reporter = CliReporter::new();
    let mut records = engine.export(&query, &reporter)?;
    ReportAssembler::sort(&mut records, query.sort_field());

    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout())),
    };
    match args.format {
        ExportFormat::Json => output::write_json(&records, writer)?,
        ExportFormat::Csv => output::write_csv(&records, writer)?,
    }

    match &args.output {
        Some(path) => info!("Exported {} records to {}", records.len(), path.display()),
        None => info!("Exported {} records", records.len()),
    }
    if let Some(max) = query.max_entries {
        warn!("Export stops after {} entries; the record set may be partial", max);
    }
    Ok(())
}

fn run_compare(first: &Path, second: &Path) -> anyhow::Result<()> {
    let comparison = compare_images(first, second)?;
    let verdict = if comparison.is_same_picture() {
        "same picture".green()
    } else {
        "different".red()
    };
    println!("{}", verdict);
    println!("{}", serde_json::to_string_pretty(&comparison)?);
    Ok(())
}

fn run_files(config: &AppConfig) -> anyhow::Result<()> {
    let db = open_catalog(config)?;
    let engine = ReconciliationEngine::new(config, &db);
    let files = engine.file_map()?;
    println!("{}", serde_json::to_string_pretty(&files)?);
    Ok(())
}

fn print_options() {
    println!("{}", "Sorters".bold());
    for sorter in SortKey::ALL {
        println!("  {:<22} {}", sorter.key().cyan(), sorter.title());
    }
    println!("{}", "Filters".bold());
    for filter in FilterKey::ALL {
        println!("  {:<22} {}", filter.key().cyan(), filter.title());
    }
    println!("{}", "Display modes".bold());
    for mode in DisplayMode::ALL {
        println!("  {:<22} {}", mode.key().cyan(), mode.title());
    }
}
