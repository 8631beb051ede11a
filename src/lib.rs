//! oid2yolo: rewrite Open Images label files as YOLO labels.
//!
//! Open Images downloads store one label file per image with pixel-space
//! corner boxes (`<class> <x_min> <y_min> <x_max> <y_max>`). YOLO training
//! expects `<class_id> <cx> <cy> <w> <h>` normalized by the image size. This
//! crate walks an `OID/Dataset/<split>/<class>/Label/` tree and rewrites every
//! label file in place.
//!
//! # Modules
//!
//! - [`ir`]: Boxes, label line codec, class map, image probing, layout discovery
//! - [`conversion`]: The batch conversion pass and its report
//! - [`inspect`]: Read-only scan of which files are already converted
//! - [`error`]: Error types for oid2yolo operations

pub mod conversion;
pub mod error;
pub mod inspect;
pub mod ir;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use serde::Serialize;

pub use error::Oid2YoloError;

use conversion::{ConversionReport, ConvertOptions};
use ir::{ClassMap, DatasetLayout};

/// The oid2yolo CLI application.
#[derive(Parser)]
#[command(name = "oid2yolo")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Convert every label file in place to normalized YOLO boxes.
    Convert(ConvertArgs),
    /// Report which label files are pixel-scale or already converted.
    Inspect(InspectArgs),
}

/// Arguments for the convert subcommand.
#[derive(clap::Args)]
struct ConvertArgs {
    /// Project root containing OID/Dataset/, or the Dataset directory itself.
    #[arg(default_value = ".", env = "OID2YOLO_ROOT")]
    root: PathBuf,

    /// Class map file: classes.txt (one name per line) or a YAML file with `names:`.
    /// Without it the built-in Hammer=0, Pipes=1 table is used.
    #[arg(long, env = "OID2YOLO_CLASSES")]
    classes: Option<PathBuf>,

    /// Convert and report, but do not write any file.
    #[arg(long)]
    dry_run: bool,

    /// Keep a `<name>.txt.bak` copy of each label file before rewriting it.
    #[arg(long)]
    backup: bool,

    /// Convert files even if they already look normalized.
    #[arg(long)]
    force: bool,

    /// Exit non-zero if any line was dropped or any file skipped.
    #[arg(long)]
    strict: bool,

    /// Hide progress bars.
    #[arg(long, short)]
    quiet: bool,

    /// Output format for the report.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    output: ReportFormat,
}

/// Arguments for the inspect subcommand.
#[derive(clap::Args)]
struct InspectArgs {
    /// Project root containing OID/Dataset/, or the Dataset directory itself.
    #[arg(default_value = ".", env = "OID2YOLO_ROOT")]
    root: PathBuf,

    /// Output format for the report.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    output: ReportFormat,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

/// Run the oid2yolo CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), Oid2YoloError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Convert(args)) => run_convert(args),
        Some(Commands::Inspect(args)) => run_inspect(args),
        None => {
            println!("oid2yolo {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Rewrite Open Images label files as YOLO labels.");
            println!();
            println!("Run 'oid2yolo --help' for usage information.");
            Ok(())
        }
    }
}

fn run_convert(args: ConvertArgs) -> Result<(), Oid2YoloError> {
    let layout = DatasetLayout::discover(&args.root)?;
    let class_map = load_class_map(args.classes.as_deref())?;

    let opts = ConvertOptions {
        dry_run: args.dry_run,
        backup: args.backup,
        force: args.force,
        show_progress: !args.quiet,
    };
    let report = conversion::convert_dataset(&layout, &class_map, &opts)?;

    emit(&report, args.output)?;
    check_strict(&report, args.strict)
}

fn run_inspect(args: InspectArgs) -> Result<(), Oid2YoloError> {
    let layout = DatasetLayout::discover(&args.root)?;
    let report = inspect::inspect_dataset(&layout)?;
    emit(&report, args.output)
}

fn load_class_map(path: Option<&Path>) -> Result<ClassMap, Oid2YoloError> {
    match path {
        Some(path) => {
            let map = ClassMap::load(path)?;
            info!("Loaded {} class name(s) from {}", map.len(), path.display());
            Ok(map)
        }
        None => Ok(ClassMap::builtin()),
    }
}

fn emit<R>(report: &R, format: ReportFormat) -> Result<(), Oid2YoloError>
where
    R: Serialize + std::fmt::Display,
{
    match format {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        ReportFormat::Text => print!("{}", report),
    }
    Ok(())
}

fn check_strict(report: &ConversionReport, strict: bool) -> Result<(), Oid2YoloError> {
    if strict && report.has_losses() {
        return Err(Oid2YoloError::StrictFailed {
            dropped_lines: report.dropped_lines(),
            skipped_files: report.counts.files_skipped_normalized,
        });
    }
    Ok(())
}
