//! Process command - extract tax fields and items from a single receipt.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use rust_decimal::Decimal;
use tracing::{debug, info};

use airis_core::{AirisConfig, ExtractionResult, LayoutReceiptParser, ReceiptParser, Recognizer};

use crate::input::{self, Source};
use crate::output::{self, OutputFormat};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (raw text .txt or image), or - for stdin
    #[arg(required = true)]
    input: PathBuf,

    /// Output file or directory (default: stdout, or a generated name for spreadsheets)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Discount recorded on the receipt
    #[arg(long)]
    discount: Option<Decimal>,

    /// Prefix for generated file names
    #[arg(long)]
    prefix: Option<String>,

    /// Print the raw recognized text to stderr
    #[arg(long)]
    show_raw: bool,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let mut config = super::load_config(config_path)?;

    if let Some(dir) = &args.model_dir {
        config.recognition.model_dir = dir.clone();
    }

    let source = Source::classify(&args.input)?;
    info!("Processing {}", source.name());

    let recognizer = if source.is_image() {
        Some(input::load_recognizer(&config.recognition)?)
    } else {
        None
    };

    let raw = input::load_raw(&source, recognizer.as_ref().map(|r| r as &dyn Recognizer))?;

    let parser = build_parser(&config, args.discount);
    let result = parser.parse_bytes(&raw)?;

    if args.show_raw {
        eprintln!("{}", style("Raw text:").blue());
        eprintln!("{}", result.raw_text);
    }

    report_diagnostics(&result);

    let rendered = output::render(&result, args.format, &config.export)?;
    let prefix = args.prefix.as_deref().or(config.export.file_prefix.as_deref());

    match output_target(args.output.as_deref(), args.format, prefix) {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, &rendered)?;
            eprintln!(
                "{} Output written to {}",
                style("✓").green(),
                path.display()
            );
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&rendered)?;
            stdout.flush()?;
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Parser configured with the command-line discount, else the configured one.
pub fn build_parser(config: &AirisConfig, discount: Option<Decimal>) -> LayoutReceiptParser {
    LayoutReceiptParser::new().with_discount(discount.unwrap_or(config.extraction.default_discount))
}

/// Print diagnostics as warnings on stderr.
pub fn report_diagnostics(result: &ExtractionResult) {
    if result.diagnostics.is_empty() {
        return;
    }

    eprintln!("{}", style("Warnings:").yellow());
    for warning in result.warnings() {
        eprintln!("  - {}", warning);
    }
}

/// Where to write output. `None` means stdout.
///
/// Spreadsheets always go to a file; an existing directory receives a
/// generated file name.
fn output_target(
    output: Option<&Path>,
    format: OutputFormat,
    prefix: Option<&str>,
) -> Option<PathBuf> {
    let generated = || {
        output::export_file_name(prefix, format.extension(), chrono::Local::now().naive_local())
    };

    match output {
        Some(path) if path.is_dir() => Some(path.join(generated())),
        Some(path) => Some(path.to_path_buf()),
        None if format.is_binary() => Some(PathBuf::from(generated())),
        None => None,
    }
}
