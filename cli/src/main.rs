use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use typedef_jsonschema_core::{convert_with, ConvertOptions, Descriptor};

#[derive(Parser)]
#[command(name = "typedef-jsonschema")]
#[command(about = "Convert a type descriptor document into a JSON Schema")]
#[command(version)]
struct Cli {
    /// Input descriptor document (JSON)
    input: PathBuf,

    /// Output schema file (defaults to stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Deduplicate required keys produced by intersection merging
    #[arg(long)]
    dedup_required: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
    format: OutputFormat,

    /// Enable verbose logging (sets log level to debug)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum OutputFormat {
    Pretty,
    Compact,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for JSON
    let log_level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    let file = File::open(&cli.input)
        .with_context(|| format!("Failed to open input file: {}", cli.input.display()))?;
    let reader = BufReader::new(file);
    let document: serde_json::Value = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse descriptor from: {}", cli.input.display()))?;

    let descriptor = Descriptor::from_value(&document)
        .map_err(|e| anyhow::Error::from(e).context("Invalid descriptor document"))?;

    let options = ConvertOptions {
        dedup_required: cli.dedup_required,
    };
    let schema = convert_with(&descriptor, &options)
        .map_err(|e| anyhow::Error::from(e).context("Conversion failed"))?;

    write_json(&schema, cli.output.as_ref(), cli.format)
}

fn write_json<T: serde::Serialize>(
    val: &T,
    path: Option<&PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let mut writer: Box<dyn Write> = if let Some(p) = path {
        let file = File::create(p)
            .with_context(|| format!("Failed to create output file: {}", p.display()))?;
        Box::new(BufWriter::new(file))
    } else {
        Box::new(BufWriter::new(io::stdout()))
    };

    match format {
        OutputFormat::Pretty => {
            serde_json::to_writer_pretty(&mut writer, val).context("Failed to write JSON")?;
        }
        OutputFormat::Compact => {
            serde_json::to_writer(&mut writer, val).context("Failed to write JSON")?;
        }
    }

    // Ensure trailing newline
    writeln!(writer).context("Failed to write trailing newline")?;

    Ok(())
}
