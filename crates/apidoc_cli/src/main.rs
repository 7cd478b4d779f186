//! apidoc - OData operation and options class documentation generator
//!
//! Reads declaration dumps produced by the C# front end and writes the
//! frontend and backend documentation trees.

use std::path::PathBuf;

use anyhow::{Context, Result};
use apidoc_etch::{FileLevel, Generator, GeneratorConfig};
use clap::{ArgGroup, Parser};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
const LOG_ENV: &str = "APIDOC_LOG";

/// Generate reference documentation for OData operations and options classes
#[derive(Parser, Debug)]
#[command(name = "apidoc")]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("level").args(["cat", "op", "flat"])))]
struct Cli {
    /// Declaration dump (*.json) or directory of dumps
    input: PathBuf,

    /// Output directory; replaced as a whole on success
    output: Option<PathBuf>,

    /// One file per operation category
    #[arg(long)]
    cat: bool,

    /// One file per operation inside category directories
    #[arg(long)]
    op: bool,

    /// One file per operation in a single directory (default)
    #[arg(long)]
    flat: bool,

    /// Also document legacy framework and test operations
    #[arg(long)]
    all: bool,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Classification dataset replacing the built-in one
    #[arg(long)]
    classification: Option<PathBuf>,

    /// Write directly into the output directory without staging
    #[arg(long)]
    direct: bool,

    /// Disable colored diagnostics
    #[arg(long)]
    no_color: bool,
}

impl Cli {
    fn file_level(&self) -> Option<FileLevel> {
        if self.cat {
            Some(FileLevel::Category)
        } else if self.op {
            Some(FileLevel::Operation)
        } else if self.flat {
            Some(FileLevel::Flat)
        } else {
            None
        }
    }

    /// Configuration file settings overridden by command line arguments
    fn generator_config(&self) -> Result<GeneratorConfig> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::from_file(path)
                .with_context(|| format!("Failed to read configuration {}", path.display()))?,
            None => GeneratorConfig::default(),
        };

        config.input = self.input.clone();
        if let Some(output) = &self.output {
            config.output_dir = output.clone();
        }
        if let Some(level) = self.file_level() {
            config.file_level = level;
        }
        if self.all {
            config.include_all = true;
        }
        if let Some(path) = &self.classification {
            config.classification = Some(path.clone());
        }
        if self.direct {
            config.atomic_publish = false;
        }
        Ok(config)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = cli.generator_config()?;
    let input = config.input.clone();
    let mut generator = Generator::new(config);
    let result = generator.run();

    let diagnostics = generator.diagnostics();
    if diagnostics.error_count() > 0 || diagnostics.warning_count() > 0 {
        diagnostics.print(!cli.no_color);
        diagnostics.print_summary();
    }

    let output = result.with_context(|| format!("Documentation generation failed for {}", input.display()))?;
    tracing::info!(
        output = %output.output_dir.display(),
        files = output.files.len(),
        operations = output.operation_count,
        options_classes = output.options_class_count,
        "documentation generated"
    );
    Ok(())
}
