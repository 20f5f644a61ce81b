//! CLI binary for coilscan.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ExtractionConfig` and prints the extracted records.

use anyhow::{Context, Result};
use clap::Parser;
use coilscan::{
    extract_records, parse_input, read_input_file, ExtractionConfig, FormatRegistry,
    JsonConfigFile, TextFragment,
};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # OCR result with boxes (JSON array of {"text", "box"})
  coilscan fragments.json

  # Plain text lines from stdin
  printf '01234567890XDC01超宽5mm\n' | coilscan

  # Looser row grouping, wider column gaps
  coilscan --y-threshold 14 --x-gap 60 fragments.json

  # Records as JSON
  coilscan --json fragments.json > records.json

  # Raw text wrapped at 30 characters
  coilscan --format generic_v1 fragments.json

  # Trace rows, columns and hits on stderr
  coilscan --debug -v fragments.json

INPUT FORMAT:
  A JSON array is read as OCR fragments:
    [{"text": "Q1234567890A", "box": [[0,0],[120,0],[120,20],[0,20]]}, ...]
  Fragments without "box" (or with "box": null) are read as plain lines.
  Anything else is read as plain text, one ticket line per line.

CONFIG FILE (config/engine_config.json):
  {
    "ocr":   { "y_threshold": 10, "x_col_gap": 40, "debug_format": false },
    "debug": { "steel_quality": false }
  }
  Missing keys keep their defaults. A missing or broken file is not an error.

ENVIRONMENT VARIABLES:
  COILSCAN_FORMAT        Output format name
  COILSCAN_CONFIG        Config file path
  COILSCAN_Y_THRESHOLD   Row grouping tolerance in pixels
  COILSCAN_X_GAP         Column split gap in pixels
  RUST_LOG               Overrides -v / -q log filtering
"#;

/// Extract steel-coil inspection records from OCR output.
#[derive(Parser, Debug)]
#[command(
    name = "coilscan",
    version,
    about = "Extract steel-coil inspection records from OCR output",
    long_about = "Extract coil id, batch id, grade code and defect text from OCR fragments \
(JSON with bounding boxes) or plain text lines. Prints one tab-separated record per line, \
or \"没有找到有效记录\" when nothing usable is found.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input file; `-` or absent reads stdin.
    input: Option<PathBuf>,

    /// Output format name.
    #[arg(long, env = "COILSCAN_FORMAT", default_value = "steel_quality_v1")]
    format: String,

    /// JSON config file.
    #[arg(long, env = "COILSCAN_CONFIG", default_value = coilscan::config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Row grouping tolerance in pixels (overrides the config file).
    #[arg(long, env = "COILSCAN_Y_THRESHOLD")]
    y_threshold: Option<u32>,

    /// Column split gap in pixels (overrides the config file).
    #[arg(long, env = "COILSCAN_X_GAP")]
    x_gap: Option<f64>,

    /// Trace extraction steps (visible with -v).
    #[arg(long)]
    debug: bool,

    /// Output records as JSON instead of text.
    #[arg(long)]
    json: bool,

    /// List available formats and exit.
    #[arg(long)]
    list_formats: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all logs except errors.
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let registry = FormatRegistry::default();

    if cli.list_formats {
        for name in registry.names() {
            println!("{name}");
        }
        return Ok(());
    }

    let config = build_config(&cli)?;
    let fragments = read_fragments(cli.input.as_ref())?;
    info!("Read {} input fragments", fragments.len());

    let output = if cli.json {
        let extraction = extract_records(&fragments, &config);
        serde_json::to_string_pretty(&extraction).context("Failed to serialise records")?
    } else {
        let format = registry.get(&cli.format);
        debug!("Using format {}", format.name());
        format.process(&fragments, &config)
    };

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(output.as_bytes())
        .context("Failed to write to stdout")?;
    if !output.ends_with('\n') {
        handle.write_all(b"\n").ok();
    }

    Ok(())
}

/// Config file first, then CLI overrides.
fn build_config(cli: &Cli) -> Result<ExtractionConfig> {
    let base = ExtractionConfig::from_source(&JsonConfigFile::new(cli.config.clone()));

    ExtractionConfig::builder()
        .y_threshold(cli.y_threshold.unwrap_or(base.y_threshold))
        .x_gap(cli.x_gap.unwrap_or(base.x_gap))
        .debug(cli.debug || base.debug)
        .build()
        .context("Invalid configuration")
}

fn read_fragments(input: Option<&PathBuf>) -> Result<Vec<TextFragment>> {
    match input {
        Some(path) if path.as_os_str() != "-" => read_input_file(path)
            .with_context(|| format!("Failed to load input from {:?}", path)),
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read input from stdin")?;
            parse_input(&buf).context("Failed to parse input from stdin")
        }
    }
}
