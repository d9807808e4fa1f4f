mod config;
mod loader;
mod report;
mod selector;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use corrcalc_core::CorrelationEngine;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{error, info, Level};

use crate::config::{AppConfig, EngineArgs};
use crate::loader::{load_csv, DataTable};
use crate::report::{write_report, OutputFormat, ReportConfig};
use crate::selector::{list_columns, resolve_pair, ColumnPrompt};

#[derive(Parser)]
#[command(name = "corrcalc")]
#[command(about = "Pearson, Spearman and Kendall correlation between two CSV columns")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    engine: EngineArgs,

    /// TOML file with [engine] and [report] sections
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit log events as JSON
    #[arg(long, global = true)]
    log_json: bool,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the columns of a data file
    Columns {
        /// CSV file path
        file: PathBuf,
    },
    /// Correlate two columns
    Calculate {
        /// CSV file path
        file: PathBuf,
        /// First column, by header name or 1-based number
        #[arg(long)]
        first: String,
        /// Second column, by header name or 1-based number
        #[arg(long)]
        second: String,
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
        /// Decimal places shown
        #[arg(long)]
        precision: Option<u32>,
    },
    /// Prompt for the data file and the two columns
    Interactive {
        /// CSV file path; asked for when omitted
        file: Option<PathBuf>,
    },
}

fn init_logging(json: bool, verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let builder = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level);
    let installed = if json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    if let Err(e) = installed {
        eprintln!("logging unavailable: {e}");
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_json, cli.verbose);

    if let Err(e) = run(cli) {
        let message = format!("{e:#}");
        error!(error = %message, "Fatal Error");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut settings = AppConfig::load(cli.config.as_deref())?;
    cli.engine.apply(&mut settings.engine);
    info!(config = ?settings.engine, "Engine configuration");

    let engine = CorrelationEngine::new(settings.engine);
    match cli.command {
        Commands::Columns { file } => {
            let table = load(&file)?;
            let mut out = io::stdout().lock();
            list_columns(&mut out, &table)?;
            out.flush()?;
            Ok(())
        }
        Commands::Calculate {
            file,
            first,
            second,
            format,
            precision,
        } => {
            let mut report = settings.report;
            if let Some(format) = format {
                report.format = format;
            }
            if let Some(precision) = precision {
                report.precision = precision;
            }
            let table = load(&file)?;
            let (first, second) = resolve_pair(&table, &first, &second)?;
            correlate(&engine, &table, first, second, &report)
        }
        Commands::Interactive { file } => {
            let mut prompt = ColumnPrompt::new(io::stdin().lock(), io::stdout());
            let table = match file {
                Some(file) => load(&file)?,
                None => prompt.ask_table()?,
            };
            let (first, second) = prompt.select_pair(&table)?;
            correlate(&engine, &table, first, second, &settings.report)
        }
    }
}

fn load(path: &Path) -> Result<DataTable> {
    load_csv(path).with_context(|| format!("cannot load {}", path.display()))
}

fn correlate(
    engine: &CorrelationEngine,
    table: &DataTable,
    first: usize,
    second: usize,
    report: &ReportConfig,
) -> Result<()> {
    let (a, b) = (&table.columns[first], &table.columns[second]);
    info!(first = %a.header, second = %b.header, rows = a.data.len(), "Calculating correlation");

    let result = engine
        .calculate(&a.header, &a.data, &b.header, &b.data)
        .with_context(|| format!("cannot correlate `{}` with `{}`", a.header, b.header))?;
    write_report(io::stdout().lock(), &result, report)
}
