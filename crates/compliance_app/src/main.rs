mod samples;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info};

use compliance_core::config::{ExcelMode, ExportConfig};
use compliance_core::{ExportError, logging};
use compliance_docs::{
    DirectorySink, ExportFormat, ExportOutcome, ExportRequest, Exporter, Record, ReportKind,
};

#[derive(Parser, Debug)]
#[command(name = "chub-export", version, about = "Export ComplianceHub registries as CSV, PDF or Excel")]
struct Cli {
    /// Config file to use instead of ~/.compliancehub/config.json
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured Excel behaviour
    #[arg(long, global = true, value_enum)]
    excel_mode: Option<ExcelModeArg>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export a JSON array of flat records
    Export {
        /// JSON file holding an array of objects
        #[arg(long)]
        input: PathBuf,
        /// csv, pdf or excel
        #[arg(long)]
        format: String,
        /// Base name of the exported file (no extension)
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Export one of the built-in sample registries
    Report {
        #[arg(value_enum)]
        kind: ReportArg,
        /// csv, pdf or excel
        #[arg(long)]
        format: String,
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Show the config path and the effective configuration
    Config,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ReportArg {
    SebiRules,
    Brokers,
    Clients,
    Fees,
    Alerts,
}

impl From<ReportArg> for ReportKind {
    fn from(arg: ReportArg) -> Self {
        match arg {
            ReportArg::SebiRules => ReportKind::SebiRules,
            ReportArg::Brokers => ReportKind::BrokerDetails,
            ReportArg::Clients => ReportKind::ClientReports,
            ReportArg::Fees => ReportKind::FeesCollected,
            ReportArg::Alerts => ReportKind::Alerts,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ExcelModeArg {
    Workbook,
    DelimitedFallback,
}

impl From<ExcelModeArg> for ExcelMode {
    fn from(arg: ExcelModeArg) -> Self {
        match arg {
            ExcelModeArg::Workbook => ExcelMode::Workbook,
            ExcelModeArg::DelimitedFallback => ExcelMode::DelimitedFallback,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", ExportError::Config(format!("{e:#}")).user_message());
            return ExitCode::FAILURE;
        }
    };

    let _guard = match logging::init_logging(&config) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {e:#}");
            None
        }
    };

    match run(cli.command, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            match e.downcast_ref::<ExportError>() {
                Some(export_err) => eprintln!("{}", export_err.user_message()),
                None => eprintln!("Error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> Result<ExportConfig> {
    let mut config = match &cli.config {
        Some(path) => ExportConfig::load_from_path(path)?,
        None => ExportConfig::load()?,
    };
    if let Some(mode) = cli.excel_mode {
        config.excel_mode = mode.into();
    }
    Ok(config)
}

fn run(command: Command, config: ExportConfig) -> Result<()> {
    match command {
        Command::Export {
            input,
            format,
            name,
            out_dir,
        } => {
            let records = read_records(&input)?;
            let format: ExportFormat = format.parse()?;
            let name = name.unwrap_or_else(|| config.default_filename.clone());
            let exporter = exporter_for(config, out_dir)?;
            let outcome = exporter.export(&ExportRequest::new(&records, format).with_filename(&name))?;
            print_outcome(&outcome)
        }
        Command::Report {
            kind,
            format,
            out_dir,
        } => {
            let kind = ReportKind::from(kind);
            let format: ExportFormat = format.parse()?;
            let records = samples::records_for(kind);
            let exporter = exporter_for(config, out_dir)?;
            let outcome = exporter.report(kind, &records).export(format)?;
            print_outcome(&outcome)
        }
        Command::Config => {
            let path = ExportConfig::config_path()?;
            println!("# {}", path.display());
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn exporter_for(config: ExportConfig, out_dir: Option<PathBuf>) -> Result<Exporter<DirectorySink>> {
    let dir = match out_dir {
        Some(dir) => dir,
        None => config.resolve_output_dir()?,
    };
    let sink = DirectorySink::new(dir);
    info!("Writing exports to {}", sink.dir().display());
    Ok(Exporter::new(sink, config))
}

fn read_records(path: &Path) -> Result<Vec<Record>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read records: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Expected a JSON array of flat objects in {}", path.display()))
}

fn print_outcome(outcome: &ExportOutcome) -> Result<()> {
    if outcome.is_fallback() {
        eprintln!(
            "Note: {} export written as {} ({})",
            outcome.requested, outcome.written, outcome.filename
        );
    }
    println!("{}", serde_json::to_string_pretty(outcome)?);
    Ok(())
}
