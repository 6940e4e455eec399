// ==============================================================================
// main.rs - SnpSniffer Summary Entry Point
// ==============================================================================
// Description: Command line entry point for SNP fingerprint QC summarization
// Author: Matt Barham
// Created: 2025-10-31
// Modified: 2025-11-14
// Version: 2.0.0
// ==============================================================================

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use snpsniffer_summary::config::{validate_thresholds, ConfigError, RunConfig};
use snpsniffer_summary::models::{MalformedRowPolicy, Thresholds};
use snpsniffer_summary::processor::SummaryProcessor;

#[derive(Parser, Debug)]
#[command(author, version, about = "Summarize SNPSniffer sample-matching QC results", long_about = None)]
struct Args {
    /// SNPSniffer pairwise comparison table (tab-delimited, no header; .gz accepted)
    #[arg(short, long, env = "SNPSNIFFER_COMPARISON")]
    comparison: Option<PathBuf>,

    /// SNPSniffer heterozygosity table (tab-delimited, no header; .gz accepted)
    #[arg(short = 'e', long, env = "SNPSNIFFER_HET")]
    het: Option<PathBuf>,

    /// Directory for summary tables, plots, and the run summary
    #[arg(short, long, default_value = ".", env = "SNPSNIFFER_OUTPUT_DIR")]
    output_dir: PathBuf,

    /// Match ratio at or above which two samples are considered identical
    #[arg(long, default_value_t = 0.8, env = "SNPSNIFFER_HIGH_MATCH_THRESHOLD")]
    high_match_threshold: f64,

    /// Match ratio below which two samples are considered unrelated
    #[arg(long, default_value_t = 0.6, env = "SNPSNIFFER_LOW_MATCH_THRESHOLD")]
    low_match_threshold: f64,

    /// Heterozygosity rate at or above which a sample may be contaminated
    #[arg(long, default_value_t = 0.6, env = "SNPSNIFFER_HET_THRESHOLD")]
    het_threshold: f64,

    /// Number of fingerprint SNPs genotyped (plot reference line only)
    #[arg(long, default_value_t = 387, env = "SNPSNIFFER_GENOTYPES_TESTED")]
    genotypes_tested: u64,

    /// Skip rows with malformed sample names instead of aborting
    #[arg(long)]
    skip_malformed: bool,

    /// Do not render plots
    #[arg(long)]
    no_plots: bool,
}

impl Args {
    fn into_config(self) -> Result<RunConfig, ConfigError> {
        let comparison = self
            .comparison
            .ok_or(ConfigError::MissingInput { name: "Comparison" })?;
        let het = self
            .het
            .ok_or(ConfigError::MissingInput { name: "Heterozygosity" })?;

        let thresholds = Thresholds {
            high_match: self.high_match_threshold,
            low_match: self.low_match_threshold,
            het: self.het_threshold,
            genotypes_tested: self.genotypes_tested,
        };
        validate_thresholds(&thresholds)?;

        let policy = if self.skip_malformed {
            MalformedRowPolicy::Skip
        } else {
            MalformedRowPolicy::Abort
        };

        let config = RunConfig::new(comparison, het, self.output_dir)
            .with_thresholds(thresholds)
            .with_malformed_rows(policy)
            .with_plots(!self.no_plots);
        config.validate()?;

        Ok(config)
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "snpsniffer_summary=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let config = match args.into_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return Err(e.into());
        }
    };

    info!("SnpSniffer Summary v{} starting...", env!("CARGO_PKG_VERSION"));

    let output_dir = config.output_dir.clone();
    let summary = SummaryProcessor::new(config).process()?;

    info!(
        "Done: {} flagged rows, outputs in {}",
        summary.flagged_total(),
        output_dir.display()
    );

    Ok(())
}
