//! Command line front end
//!
//! Commands print pretty JSON. A `CheckError` is printed as an
//! `ErrorResponse` and the process exits with status 1.

use crate::config::CheckerConfig;
use crate::dataset::Dataset;
use crate::error::{CheckError, ErrorResponse};
use crate::services::{ConsistencyChecker, SummaryService};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "narrative-check")]
#[command(about = "Check financial narratives against the price data they describe")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Verify every claim in a narrative and print the consistency report
    Check {
        /// Path to the narrative text
        #[arg(short, long)]
        narrative: PathBuf,

        /// Path to the dataset JSON (column name -> values)
        #[arg(short, long)]
        data: PathBuf,

        /// Checker config JSON
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Derive Daily_Return, MA_20, MA_50 and Volatility_20d when absent
        #[arg(long)]
        indicators: bool,
    },

    /// List the claims found in a narrative
    Extract {
        /// Path to the narrative text
        #[arg(short, long)]
        narrative: PathBuf,
    },

    /// Print the reference statistics of a dataset
    Summarize {
        /// Path to the dataset JSON (column name -> values)
        #[arg(short, long)]
        data: PathBuf,

        /// Derive Daily_Return, MA_20, MA_50 and Volatility_20d when absent
        #[arg(long)]
        indicators: bool,
    },
}

impl Cli {
    /// Log filter for the chosen verbosity
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "narrative_consistency=debug,narrative_check=debug"
        } else {
            "narrative_consistency=info,narrative_check=info"
        }
    }
}

/// Run a command and write its output, returning the exit status
///
/// `env` resolves configuration overrides such as
/// `NARRATIVE_CONSISTENCY_THRESHOLD`.
pub fn execute<F, W>(command: Commands, env: F, out: &mut W) -> u8
where
    F: Fn(&str) -> Option<String>,
    W: Write,
{
    let written = run(command, env).and_then(|value| write_json(out, &value));
    match written {
        Ok(()) => 0,
        Err(e) => {
            match e.downcast_ref::<CheckError>() {
                Some(check_error) => {
                    let response = ErrorResponse::from(check_error);
                    if let Err(write_error) = write_json(out, &response) {
                        error!("{}: {}", check_error, write_error);
                    }
                }
                None => error!("{:#}", e),
            }
            1
        }
    }
}

/// Run a command, returning its JSON output
pub fn run<F>(command: Commands, env: F) -> Result<Value>
where
    F: Fn(&str) -> Option<String>,
{
    match command {
        Commands::Check {
            narrative,
            data,
            config,
            indicators,
        } => {
            let config = match config {
                Some(path) => CheckerConfig::from_json_file(&path)?,
                None => CheckerConfig::default(),
            }
            .with_overrides(env)?;

            let narrative = read_narrative(&narrative)?;
            let dataset = load_dataset(&data, indicators)?;

            let checker = ConsistencyChecker::new(config);
            let report = checker.check(&narrative, &dataset)?;
            let assessment = checker.assess(&report);
            info!(
                "Checked {} claims: score {:.3}, threshold {:.2}, passed {}",
                report.checked_claims, assessment.score, assessment.threshold, assessment.passed
            );

            Ok(json!({ "report": report, "assessment": assessment }))
        }
        Commands::Extract { narrative } => {
            let narrative = read_narrative(&narrative)?;
            let claims = crate::claims::extract_claims(&narrative);
            info!("Extracted {} claims", claims.len());
            Ok(serde_json::to_value(claims)?)
        }
        Commands::Summarize { data, indicators } => {
            let dataset = load_dataset(&data, indicators)?;
            let stats = SummaryService::summarize(&dataset)?;
            Ok(json!({ "statistics": stats, "summary": stats.to_string() }))
        }
    }
}

fn read_narrative(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read narrative from {}", path.display()))
}

fn load_dataset(path: &Path, indicators: bool) -> Result<Dataset> {
    let dataset = Dataset::from_json_file(path)?;
    if indicators {
        Ok(dataset.with_indicators()?)
    } else {
        Ok(dataset)
    }
}

fn write_json<W: Write, T: serde::Serialize + ?Sized>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
