//! CCS Converter CLI
//!
//! Command-line tool for validating Custom Crafting Stations documents and
//! converting them into Content Patcher packs for Better Crafting.

use ccs_core::{
    convert, run_batch, scan_directory, BatchFile, CcsDocument, CpDocument, SchemaDocument,
    Station,
};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ccs-cli")]
#[command(about = "Custom Crafting Stations to Content Patcher converter", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a CCS document into a Content Patcher document
    Convert {
        /// Path to the CCS document (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (prints to stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },

    /// Validate a document and list every violation
    Validate {
        /// Path to the document (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Which schema to validate against
        #[arg(short, long, value_enum, default_value = "ccs")]
        kind: DocumentKind,
    },

    /// Scan directories for CCS documents
    Scan {
        /// Root directories to scan
        #[arg(short, long, required = true)]
        root: Vec<PathBuf>,
    },

    /// Convert every CCS document listed by a batch file
    Batch {
        /// Path to batch file (JSON)
        #[arg(short, long)]
        batch: PathBuf,
    },

    /// Create a batch file template
    CreateBatch {
        /// Output path for the batch file
        #[arg(short, long)]
        output: PathBuf,

        /// Root directories to include
        #[arg(short, long)]
        root: Vec<PathBuf>,

        /// Output directory for converted documents
        #[arg(long)]
        output_dir: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DocumentKind {
    Ccs,
    Cp,
    Station,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> ccs_core::Result<ExitCode> {
    match command {
        Commands::Convert {
            input,
            output,
            compact,
        } => cmd_convert(&input, output.as_deref(), compact),
        Commands::Validate { input, kind } => cmd_validate(&input, kind),
        Commands::Scan { root } => cmd_scan(&root),
        Commands::Batch { batch } => cmd_batch(&batch),
        Commands::CreateBatch {
            output,
            root,
            output_dir,
        } => cmd_create_batch(&output, &root, &output_dir),
    }
}

fn cmd_convert(input: &Path, output: Option<&Path>, compact: bool) -> ccs_core::Result<ExitCode> {
    let document = CcsDocument::load(input)?;
    let conversion = convert(&document)?;

    let json = if compact {
        serde_json::to_string(&conversion.document)?
    } else {
        serde_json::to_string_pretty(&conversion.document)?
    };

    match output {
        Some(path) => {
            fs::write(path, json)?;
            eprintln!(
                "Converted {} station(s) into {} change(s): {}",
                document.station_count(),
                conversion.document.changes.len(),
                path.display()
            );
        }
        None => println!("{}", json),
    }

    if conversion.auto_generated {
        eprintln!(
            "Warning: some stations had no TileData; replace every Converted_Station_*_CHANGEME key with a real one"
        );
    }

    if !conversion.tile_ids.is_empty() {
        eprintln!("Tile IDs: {}", conversion.tile_ids.join(", "));
    }

    Ok(ExitCode::SUCCESS)
}

fn cmd_validate(input: &Path, kind: DocumentKind) -> ccs_core::Result<ExitCode> {
    let content = fs::read_to_string(input).map_err(|e| ccs_core::Error::FileRead {
        path: input.to_path_buf(),
        source: e,
    })?;
    let value: Value = serde_json::from_str(&content)?;

    let result = match kind {
        DocumentKind::Ccs => CcsDocument::validate(&value),
        DocumentKind::Cp => CpDocument::validate(&value),
        DocumentKind::Station => Station::validate(&value),
    };

    match result {
        Ok(()) => {
            println!("{}: valid", input.display());
            Ok(ExitCode::SUCCESS)
        }
        Err(ccs_core::Error::Validation { schema, violations }) => {
            println!(
                "{}: {} violation(s) against the {} schema",
                input.display(),
                violations.len(),
                schema
            );
            for violation in &violations {
                println!("  {}", violation);
            }
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e),
    }
}

fn cmd_scan(roots: &[PathBuf]) -> ccs_core::Result<ExitCode> {
    let result = scan_directory(roots)?;

    println!("Scanned {} root(s):", result.roots.len());
    for root in &result.roots {
        println!("  {}", root.display());
    }
    println!();
    println!(
        "Found {} CCS document(s) in {} JSON file(s)",
        result.documents.len(),
        result.total_files
    );
    for doc in &result.documents {
        println!("  {}", doc.path.display());
    }

    Ok(ExitCode::SUCCESS)
}

fn cmd_batch(batch_path: &Path) -> ccs_core::Result<ExitCode> {
    let batch = BatchFile::load(batch_path)?;

    println!("Roots: {:?}", batch.roots);
    println!("Output: {}", batch.output_dir.display());
    println!();

    let report = run_batch(&batch)?;

    for item in &report.converted {
        let marker = if item.auto_generated { " (needs TileData)" } else { "" };
        println!("  {} -> {}{}", item.source.display(), item.output.display(), marker);
    }

    println!();
    println!("Batch complete:");
    println!("  {} document(s) converted", report.converted.len());
    if report.needs_attention() > 0 {
        println!(
            "  {} document(s) contain generated station keys",
            report.needs_attention()
        );
    }

    if report.errors.is_empty() {
        return Ok(ExitCode::SUCCESS);
    }

    println!("\nErrors ({}):", report.errors.len());
    for (path, err) in &report.errors {
        println!("  {}: {}", path.display(), err);
    }

    Ok(ExitCode::FAILURE)
}

fn cmd_create_batch(output: &Path, roots: &[PathBuf], output_dir: &Path) -> ccs_core::Result<ExitCode> {
    let batch = BatchFile {
        roots: roots.to_vec(),
        output_dir: output_dir.to_path_buf(),
    };

    batch.save(output)?;
    println!("Created batch file: {}", output.display());
    println!();
    println!("Edit the file to configure your batch, then run:");
    println!("  ccs-cli batch --batch {}", output.display());

    Ok(ExitCode::SUCCESS)
}
