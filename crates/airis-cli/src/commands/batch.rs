//! Batch processing command for multiple receipts.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{debug, error, warn};

use airis_core::{decode_text, ExtractionResult, OnnxRecognizer, ReceiptParser, Recognizer};

use crate::input::{self, Source};
use crate::output::{self, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern of input files (.txt raw text or images)
    #[arg(required = true)]
    input: String,

    /// Output directory for per-file results
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,
}

/// Decoded text of one input, or why it could not be read.
#[derive(Debug)]
struct LoadedText {
    source: Source,
    text: Result<String, String>,
    started: Instant,
}

/// Outcome of processing a single file.
struct FileOutcome {
    path: PathBuf,
    result: Result<ExtractionResult, String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let mut config = super::load_config(config_path)?;

    if let Some(dir) = &args.model_dir {
        config.recognition.model_dir = dir.clone();
    }

    let sources = collect_sources(&args.input)?;
    if sources.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        sources.len()
    );

    if let Some(output_dir) = &args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let recognizer: Option<OnnxRecognizer> = if sources.iter().any(Source::is_image) {
        Some(input::load_recognizer(&config.recognition)?)
    } else {
        None
    };

    let pb = ProgressBar::new(sources.len() as u64 * 2);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=>-"),
    );

    // Reading and recognition run one file at a time; parsing runs in parallel.
    pb.set_message("reading");
    let loaded = load_all(
        sources,
        recognizer.as_ref().map(|r| r as &dyn Recognizer),
        !args.continue_on_error,
        &pb,
    )?;

    pb.set_message("parsing");
    let parser = super::process::build_parser(&config, None);
    let outcomes: Vec<FileOutcome> = loaded
        .into_par_iter()
        .map(|loaded| {
            let result = loaded.text.map(|text| parser.parse(&text));
            pb.inc(1);
            FileOutcome {
                path: source_path(&loaded.source),
                result,
                processing_time_ms: loaded.started.elapsed().as_millis() as u64,
            }
        })
        .collect();

    pb.finish_with_message("complete");

    let mut succeeded = 0usize;
    let mut failed = Vec::new();

    for outcome in &outcomes {
        match &outcome.result {
            Ok(result) => {
                succeeded += 1;
                if !result.diagnostics.is_empty() {
                    debug!(
                        "{}: {}",
                        outcome.path.display(),
                        result.warnings().join("; ")
                    );
                }
                if let Some(output_dir) = &args.output_dir {
                    let output_path = output_dir.join(output_name(&outcome.path, args.format));
                    let rendered = output::render(result, args.format, &config.export)?;
                    fs::write(&output_path, rendered)?;
                    debug!("Wrote output to {}", output_path.display());
                }
            }
            Err(message) => {
                warn!("Failed to process {}: {}", outcome.path.display(), message);
                failed.push((&outcome.path, message));
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &outcomes)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    eprintln!();
    eprintln!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        outcomes.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} successful, {} failed",
        style(succeeded).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        eprintln!();
        eprintln!("{}", style("Failed files:").red());
        for (path, message) in &failed {
            eprintln!("  - {}: {}", path.display(), message);
        }
    }

    Ok(())
}

/// Read and decode every source in order. With `fail_fast`, stop at the
/// first source that cannot be read.
fn load_all(
    sources: Vec<Source>,
    recognizer: Option<&dyn Recognizer>,
    fail_fast: bool,
    pb: &ProgressBar,
) -> anyhow::Result<Vec<LoadedText>> {
    let mut loaded = Vec::with_capacity(sources.len());

    for source in sources {
        let started = Instant::now();
        let text = input::load_raw(&source, recognizer)
            .and_then(|bytes| Ok(decode_text(&bytes)?.to_string()))
            .map_err(|e| e.to_string());
        pb.inc(1);

        if let Err(message) = &text {
            if fail_fast {
                pb.abandon();
                error!("Failed to process {}: {}", source.name(), message);
                anyhow::bail!("Processing failed for {}: {}", source.name(), message);
            }
        }

        loaded.push(LoadedText {
            source,
            text,
            started,
        });
    }

    Ok(loaded)
}

/// Expand a glob into supported input sources, in path order.
fn collect_sources(pattern: &str) -> anyhow::Result<Vec<Source>> {
    let mut paths: Vec<PathBuf> = glob(pattern)?.filter_map(|r| r.ok()).collect();
    paths.sort();

    Ok(paths
        .iter()
        .filter(|p| p.is_file())
        .filter_map(|p| match Source::classify(p) {
            Ok(source) => Some(source),
            Err(_) => {
                debug!("Skipping unsupported file {}", p.display());
                None
            }
        })
        .collect())
}

fn source_path(source: &Source) -> PathBuf {
    match source {
        Source::Text(path) | Source::Image(path) => path.clone(),
        Source::Stdin => PathBuf::from("-"),
    }
}

/// Per-file output name: the input's stem with the format's extension.
fn output_name(path: &Path, format: OutputFormat) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("receipt");
    format!("{}.{}", stem, format.extension())
}

fn write_summary(path: &Path, outcomes: &[FileOutcome]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "tax_price",
        "service_tax",
        "other_tax",
        "total_tax",
        "item_count",
        "diagnostics",
        "processing_time_ms",
        "error",
    ])?;

    for outcome in outcomes {
        let filename = outcome
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        let time = outcome.processing_time_ms.to_string();

        match &outcome.result {
            Ok(result) => {
                let receipt = &result.receipt;
                let item_count = if receipt.has_no_items() {
                    0
                } else {
                    receipt.items().len()
                };
                wtr.write_record([
                    filename,
                    "success",
                    &receipt.tax_price().normalize().to_string(),
                    &receipt.service_tax().normalize().to_string(),
                    &receipt.other_tax().normalize().to_string(),
                    &receipt.total_tax().normalize().to_string(),
                    &item_count.to_string(),
                    &result.diagnostics.len().to_string(),
                    &time,
                    "",
                ])?;
            }
            Err(message) => {
                wtr.write_record([filename, "error", "", "", "", "", "", "", &time, message])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}
