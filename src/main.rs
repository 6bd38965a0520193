//! TrainSpec - workout specification normalization CLI
//!
//! Usage:
//! ```bash
//! # Normalize a stored workout document
//! trainspec facts workout.json --units imperial
//!
//! # Time-in-zone distribution of a power series
//! trainspec zones power.json --ftp 250
//!
//! # Decode authoring tokens
//! trainspec decode swim_warmup_200yd swim_drill_catchup_4x50yd_r15
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use trainspec::config::{load_config, load_config_from, EngineConfig};
use trainspec::metrics::zones::{classify, classify_pace, SampleSeries, Zone};
use trainspec::units::{Pace, Units};
use trainspec::workouts::facts::{normalize, NormalizeContext};
use trainspec::workouts::tokens::decode;
use trainspec::workouts::types::WorkoutSpec;

#[derive(Parser)]
#[command(
    name = "trainspec",
    version,
    about = "Workout specification normalization and metrics",
    long_about = "Derives durations, target ranges, summaries and zone distributions from stored workout specifications."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Normalize a workout document into display facts
    Facts {
        /// Workout JSON document
        file: PathBuf,

        /// Unit preference (metric or imperial); overrides the config
        #[arg(long)]
        units: Option<Units>,

        /// Print the full facts record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Time-in-zone distribution of a sample series
    Zones {
        /// JSON array of values or {t, v} samples
        file: PathBuf,

        /// FTP in watts; overrides the config
        #[arg(long)]
        ftp: Option<f64>,

        /// Treat samples as paces (seconds per unit distance)
        #[arg(long)]
        pace: bool,

        /// Threshold pace such as 7:00/mi; overrides the config
        #[arg(long)]
        threshold: Option<String>,

        /// Print the distribution as JSON
        #[arg(long)]
        json: bool,
    },

    /// Decode authoring tokens
    Decode {
        /// Tokens such as swim_drill_catchup_4x50yd_r15
        #[arg(required = true)]
        tokens: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match cli.config {
        Some(ref path) => load_config_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => load_config().context("Failed to load config")?,
    };

    match cli.command {
        Command::Facts { file, units, json } => run_facts(&file, units, json, &config),
        Command::Zones {
            file,
            ftp,
            pace,
            threshold,
            json,
        } => run_zones(&file, ftp, pace, threshold.as_deref(), json, &config),
        Command::Decode { tokens } => {
            run_decode(&tokens);
            Ok(())
        }
    }
}

fn run_facts(file: &Path, units: Option<Units>, json: bool, config: &EngineConfig) -> Result<()> {
    let spec = WorkoutSpec::from_file(file)
        .with_context(|| format!("Failed to read workout {}", file.display()))?;

    let mut ctx = NormalizeContext::from_config(config);
    if let Some(units) = units {
        ctx.units = units;
    }
    let facts = normalize(&spec, &ctx);

    if json {
        println!("{}", serde_json::to_string_pretty(&facts)?);
        return Ok(());
    }

    println!("{}", facts.title);
    if let Some(headline) = facts.headline(ctx.units) {
        println!("{}", headline);
    }
    for line in &facts.lines {
        println!("  {}", line);
    }
    let d = &facts.diagnostics;
    if !d.is_clean() {
        println!(
            "({} skipped tokens, {} skipped steps, {} malformed fields, {} steps without duration)",
            d.skipped_tokens, d.skipped_steps, d.malformed_fields, d.unresolved_steps
        );
    }
    Ok(())
}

fn run_zones(
    file: &Path,
    ftp: Option<f64>,
    pace: bool,
    threshold: Option<&str>,
    json: bool,
    config: &EngineConfig,
) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read samples {}", file.display()))?;
    let samples: SampleSeries =
        serde_json::from_str(&text).context("Samples must be a JSON array of numbers or {t, v} objects")?;

    let distribution = if pace {
        let threshold = match threshold {
            Some(text) => Some(
                Pace::parse(text).with_context(|| format!("Invalid threshold pace: {}", text))?,
            ),
            None => config.athlete.valid_threshold_pace(),
        };
        classify_pace(&samples, threshold.map(|p| p.seconds))
    } else {
        classify(&samples, ftp.or(config.athlete.valid_ftp()))
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&distribution)?);
        return Ok(());
    }

    for zone in Zone::ALL {
        println!("{} {:<16} {:>5.1}%", zone, zone.name(), distribution.get(zone));
    }
    Ok(())
}

fn run_decode(tokens: &[String]) {
    for token in tokens {
        match decode(token) {
            Ok(decoded) => println!("{:<40} {}", token, decoded.display),
            Err(e) => println!("{:<40} skipped ({})", token, e),
        }
    }
}
