// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Saltwerk — command-line front end for Salt Intelligence.
//
// Entry point. Initialises logging (stderr), loads the pipeline config, and
// dispatches to a subcommand. Results are printed as JSON on stdout.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use saltwerk_core::human_errors::{HumanError, humanize_error};
use saltwerk_core::{OcrResult, SaltConfig};
use saltwerk_intel::{parse_composition, process_text, rescore, validate_component};
use serde_json::json;

/// Config picked up from the working directory when `--config` is not given.
const DEFAULT_CONFIG_FILE: &str = "saltwerk.json";

#[derive(Debug, Parser)]
#[command(name = "saltwerk", version, about = "Extract drug salt compositions from label text and images")]
struct Cli {
    /// Pipeline config file (JSON). When omitted, `saltwerk.json` in the
    /// working directory is used if present, otherwise built-in defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse one composition string.
    Parse {
        text: String,
        /// Apply the three-tier confidence scorer to each component.
        #[arg(long)]
        score: bool,
    },
    /// Parse a composition string and report problems per component.
    Validate { text: String },
    /// Run the post-OCR pipeline over a transcript (file, or stdin when omitted).
    Extract {
        file: Option<PathBuf>,
        /// Transcript confidence reported by the OCR engine (0–100).
        #[arg(long, default_value_t = 100.0)]
        confidence: f64,
    },
    /// Run OCR and the full pipeline over a label image.
    #[cfg(feature = "ocr")]
    Scan {
        image: PathBuf,
        /// Directory holding text-detection.rten and text-recognition.rten.
        #[arg(long)]
        model_dir: Option<PathBuf>,
    },
    /// Print the effective pipeline config.
    Config {
        /// Also write it to this file, e.g. as a starting point for edits.
        #[arg(long)]
        write: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    tracing::debug!(?config, "config loaded");

    match cli.command {
        Command::Parse { text, score } => {
            let mut components = parse_composition(&text);
            if score {
                rescore(&mut components);
            }
            print_json(&components)?;
        }
        Command::Validate { text } => {
            let report: Vec<_> = parse_composition(&text)
                .into_iter()
                .map(|component| {
                    let validation = validate_component(&component);
                    json!({ "component": component, "validation": validation })
                })
                .collect();
            print_json(&report)?;
        }
        Command::Extract { file, confidence } => {
            let raw_text = read_transcript(file.as_ref())?;
            report_result(&process_text(raw_text, confidence, &config))?;
        }
        #[cfg(feature = "ocr")]
        Command::Scan { image, model_dir } => {
            scan(image, model_dir, config).await?;
        }
        Command::Config { write } => {
            if let Some(path) = write {
                config
                    .save(&path)
                    .with_context(|| format!("writing config to {}", path.display()))?;
                tracing::info!(path = %path.display(), "config written");
            }
            print_json(&config)?;
        }
    }

    Ok(())
}

/// A config file named on the command line must exist; the implicit one
/// may be absent.
fn load_config(explicit: Option<&Path>) -> anyhow::Result<SaltConfig> {
    match explicit {
        Some(path) => SaltConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => SaltConfig::load_or_default(DEFAULT_CONFIG_FILE)
            .with_context(|| format!("loading config from {DEFAULT_CONFIG_FILE}")),
    }
}

#[cfg(feature = "ocr")]
async fn scan(image: PathBuf, model_dir: Option<PathBuf>, config: SaltConfig) -> anyhow::Result<()> {
    use saltwerk_core::ImageSource;
    use saltwerk_intel::{OcrsEngineFactory, SaltOcrService};

    let factory = match model_dir {
        Some(dir) => OcrsEngineFactory::from_model_dir(dir),
        None => OcrsEngineFactory::with_defaults(),
    };
    let factory = factory.inspect_err(print_human)?;

    let service = SaltOcrService::new(factory, config);
    let result = service
        .process_image(&ImageSource::Path(image))
        .await
        .inspect_err(print_human)?;
    report_result(&result)
}

fn read_transcript(file: Option<&PathBuf>) -> anyhow::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading transcript {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("reading transcript from stdin")?;
            Ok(text)
        }
    }
}

/// Print the result; an empty result gets a notice on stderr.
fn report_result(result: &OcrResult) -> anyhow::Result<()> {
    if result.is_empty() {
        print_notice(&HumanError::no_composition_detected());
    }
    print_json(result)
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg_attr(not(feature = "ocr"), allow(dead_code))]
fn print_human(err: &saltwerk_core::SaltError) {
    tracing::error!(error = %err, "salt extraction failed");
    print_notice(&humanize_error(err));
}

fn print_notice(human: &HumanError) {
    eprintln!("{}", human.message);
    eprintln!("{}", human.suggestion);
}
