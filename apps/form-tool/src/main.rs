//! CLI tool for form schema files.
//!
//! Provides commands for:
//! - Schema integrity checks
//! - Column layout inspection
//! - Editor resolution per field

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use form_engine_core::config::EngineConfig;
use form_engine_core::schema::Schema;
use tracing_subscriber::EnvFilter;

mod commands;

/// Command-line arguments for the schema tool.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Engine configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check order, names and fetch bindings
    Validate { schema: PathBuf },
    /// Print the column layout
    Columns { schema: PathBuf },
    /// Print the editor each field resolves to
    Editors { schema: PathBuf },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level.as_str()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = match &args.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    config.apply_env_overrides()?;
    tracing::debug!("Using configuration {:?}", config);

    match args.command {
        Command::Validate { schema } => {
            let schema = load_schema(&schema)?;
            let problems = commands::validate(&schema);
            if problems.is_empty() {
                println!("{}: ok ({} entries)", schema.entity_type, schema.len());
            } else {
                for problem in &problems {
                    println!("{}", problem);
                }
                bail!("{} problem(s) in schema '{}'", problems.len(), schema.entity_type);
            }
        }
        Command::Columns { schema } => {
            print!("{}", commands::render_columns(&load_schema(&schema)?));
        }
        Command::Editors { schema } => {
            print!("{}", commands::render_editors(&load_schema(&schema)?));
        }
    }
    Ok(())
}

fn load_schema(path: &Path) -> anyhow::Result<Schema> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read schema file {}", path.display()))?;
    let schema = Schema::from_json(&json)
        .with_context(|| format!("Failed to parse schema file {}", path.display()))?;
    tracing::info!("Loaded schema '{}' from {}", schema.entity_type, path.display());
    Ok(schema)
}
