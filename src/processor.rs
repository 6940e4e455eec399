// ==============================================================================
// processor.rs - SNPSniffer Summary Pipeline
// ==============================================================================
// Description: Reads SNPSniffer tables, enriches and classifies rows, writes outputs
// Author: Matt Barham
// Created: 2025-10-31
// Modified: 2025-11-14
// Version: 3.0.0
// ==============================================================================

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::config::RunConfig;
use crate::enrich::{enrich_all, enrich_het, enrich_pair};
use crate::output::{
    count_het_flags, count_match_flags, OutputFile, OutputGenerator, RunSummary, TableCounts,
};
use crate::parsers::{ComparisonParser, HetRateParser};
use crate::plots;

pub struct SummaryProcessor {
    config: RunConfig,
}

impl SummaryProcessor {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    /// Main processing pipeline
    pub fn process(&self) -> Result<RunSummary> {
        let config = &self.config;
        let thresholds = &config.thresholds;

        info!("Starting SNPSniffer summary");
        info!(
            "Thresholds: high match {}, low match {}, het {}",
            thresholds.high_match, thresholds.low_match, thresholds.het
        );
        info!("Malformed sample names: {:?}", config.malformed_rows);

        config.validate()?;

        // Step 1: Read inputs
        info!("Step 1: Reading SNPSniffer tables...");
        let comparisons = ComparisonParser::parse(&config.comparison_path)?;
        let het_records = HetRateParser::parse(&config.het_path)?;
        let comparison_rows = comparisons.len();
        let het_rows = het_records.len();

        // Step 2: Enrich and classify
        info!("Step 2: Classifying pairwise comparisons...");
        let pairs = enrich_all(comparisons, config.malformed_rows, "comparison", |record| {
            enrich_pair(record, thresholds)
        })
        .with_context(|| {
            format!("Failed to summarize {}", config.comparison_path.display())
        })?;

        info!("Step 3: Classifying heterozygosity rates...");
        let hets = enrich_all(het_records, config.malformed_rows, "heterozygosity", |record| {
            enrich_het(record, thresholds)
        })
        .with_context(|| format!("Failed to summarize {}", config.het_path.display()))?;

        if pairs.skipped + hets.skipped > 0 {
            warn!(
                "Skipped {} comparison rows and {} heterozygosity rows with malformed sample names",
                pairs.skipped, hets.skipped
            );
        }

        // Step 4: Write tables
        info!("Step 4: Writing summary tables...");
        let generator = OutputGenerator::new(&config.output_dir)?;
        let mut outputs = BTreeMap::new();
        let flagged_pairs = generator.write_pairs(&pairs.rows, &mut outputs)?;
        let flagged_hets = generator.write_het_rates(&hets.rows, &mut outputs)?;

        // Step 5: Plots
        if config.plots {
            info!("Step 5: Rendering plots...");
            let match_plot = OutputFile::MatchRatioPlot.path_in(generator.output_dir());
            plots::plot_match_ratios(&match_plot, &pairs.rows, thresholds)?;
            outputs.insert(OutputFile::MatchRatioPlot, match_plot);

            let het_plot = OutputFile::HetRatePlot.path_in(generator.output_dir());
            plots::plot_het_rates(&het_plot, &hets.rows, thresholds)?;
            outputs.insert(OutputFile::HetRatePlot, het_plot);
        } else {
            info!("Step 5: Plots disabled, skipping");
        }

        // Step 6: Run summary
        outputs.insert(
            OutputFile::RunSummary,
            OutputFile::RunSummary.path_in(generator.output_dir()),
        );
        let summary = RunSummary {
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            processing_date: chrono::Utc::now().to_rfc3339(),
            comparison_file: config.comparison_path.display().to_string(),
            het_file: config.het_path.display().to_string(),
            thresholds: *thresholds,
            malformed_rows: config.malformed_rows,
            pairs: TableCounts {
                input_rows: comparison_rows,
                skipped_rows: pairs.skipped,
                summarized_rows: pairs.rows.len(),
                flagged_rows: flagged_pairs,
                by_flag: count_match_flags(&pairs.rows),
            },
            het_rates: TableCounts {
                input_rows: het_rows,
                skipped_rows: hets.skipped,
                summarized_rows: hets.rows.len(),
                flagged_rows: flagged_hets,
                by_flag: count_het_flags(&hets.rows),
            },
            outputs,
        };
        generator.write_run_summary(&summary)?;

        info!(
            "Summary complete: {} possible match errors, {} possible cross-contaminations",
            flagged_pairs, flagged_hets
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use crate::models::MalformedRowPolicy;
    use std::path::Path;

    const COMPARISONS: &str = "\
a.bam\tb.bam\t350\t340\t0.9714\tS1_P01_V1_Blood_F1_C_X-S1_P01_V2_FFPE_F1_T_X
a.bam\tc.bam\t350\t320\t0.9143\tS1_P01_V1_Blood_F1_C_X-S1_P02_V1_Blood_F1_C_X
b.bam\tc.bam\t350\t245\t0.7\tS1_P01_V2_FFPE_F1_T_X-S1_P02_V1_Blood_F1_C_X
c.bam\td.bam\t350\t105\t0.3\tS1_P02_V1_Blood_F1_C_X-S1_P03_V1_Blood_F1_C_Y
";

    const HET_RATES: &str = "\
S1_P01_V1_Blood_F1_C_X\t200\t150\t350\t0.4286
S1_P01_V2_FFPE_F1_T_X\t100\t250\t350\t0.7143
S1_P02_V1_Blood_F1_C_X\t190\t160\t350\t0.4571
";

    fn write_inputs(dir: &Path, comparisons: &str, het_rates: &str) -> RunConfig {
        let comparison_path = dir.join("comparisons.tsv");
        let het_path = dir.join("het.tsv");
        std::fs::write(&comparison_path, comparisons).unwrap();
        std::fs::write(&het_path, het_rates).unwrap();
        RunConfig::new(comparison_path, het_path, dir.join("out"))
    }

    fn line_count(path: &Path) -> usize {
        std::fs::read_to_string(path).unwrap().lines().count()
    }

    #[test]
    fn test_process_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_inputs(dir.path(), COMPARISONS, HET_RATES);
        let out = config.output_dir.clone();

        let summary = SummaryProcessor::new(config).process().unwrap();

        assert_eq!(summary.pairs.input_rows, 4);
        assert_eq!(summary.pairs.summarized_rows, 4);
        // Different patients at 0.91 (Fail) and 0.7 (Warning)
        assert_eq!(summary.pairs.flagged_rows, 2);
        assert_eq!(summary.pairs.by_flag["Pass"], 2);
        assert_eq!(summary.pairs.by_flag["Fail"], 1);
        assert_eq!(summary.pairs.by_flag["Warning"], 1);
        assert_eq!(summary.het_rates.flagged_rows, 1);
        assert_eq!(summary.flagged_total(), 3);

        assert_eq!(line_count(&out.join(OutputFile::AllPairs.file_name())), 5);
        assert_eq!(line_count(&out.join(OutputFile::PossibleMatchErrors.file_name())), 3);
        assert_eq!(line_count(&out.join(OutputFile::HetRate.file_name())), 4);
        assert_eq!(
            line_count(&out.join(OutputFile::PossibleCrossContamination.file_name())),
            2
        );
        assert!(out.join(OutputFile::MatchRatioPlot.file_name()).exists());
        assert!(out.join(OutputFile::HetRatePlot.file_name()).exists());

        let json = std::fs::read_to_string(out.join(OutputFile::RunSummary.file_name())).unwrap();
        let parsed: RunSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.pairs, summary.pairs);
        assert_eq!(parsed.outputs.len(), 7);
    }

    #[test]
    fn test_process_without_plots() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_inputs(dir.path(), COMPARISONS, HET_RATES).with_plots(false);
        let out = config.output_dir.clone();

        let summary = SummaryProcessor::new(config).process().unwrap();

        assert!(!out.join(OutputFile::MatchRatioPlot.file_name()).exists());
        assert!(!summary.outputs.contains_key(&OutputFile::HetRatePlot));
        assert_eq!(summary.outputs.len(), 5);
    }

    #[test]
    fn test_malformed_sample_aborts_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let het_rates = format!("{HET_RATES}STUDY1_P01_V1\t1\t1\t2\t0.5\n");
        let config = write_inputs(dir.path(), COMPARISONS, &het_rates);
        let out = config.output_dir.clone();

        let err = SummaryProcessor::new(config).process().unwrap_err();
        assert!(format!("{err:#}").contains("STUDY1_P01_V1"));
        assert!(!out.join(OutputFile::AllPairs.file_name()).exists());
    }

    #[test]
    fn test_malformed_sample_skipped_when_requested() {
        let dir = tempfile::tempdir().unwrap();
        let het_rates = format!("{HET_RATES}STUDY1_P01_V1\t1\t1\t2\t0.5\n");
        let config = write_inputs(dir.path(), COMPARISONS, &het_rates)
            .with_malformed_rows(MalformedRowPolicy::Skip)
            .with_plots(false);

        let summary = SummaryProcessor::new(config).process().unwrap();
        assert_eq!(summary.het_rates.input_rows, 4);
        assert_eq!(summary.het_rates.skipped_rows, 1);
        assert_eq!(summary.het_rates.summarized_rows, 3);
    }

    #[test]
    fn test_missing_input_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = write_inputs(dir.path(), COMPARISONS, HET_RATES);
        config.het_path = dir.path().join("missing.tsv");

        let err = SummaryProcessor::new(config).process().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::InputNotFound { name: "Heterozygosity", .. })
        ));
    }

    #[test]
    fn test_empty_inputs_produce_header_only_tables() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_inputs(dir.path(), "", "");
        let out = config.output_dir.clone();

        let summary = SummaryProcessor::new(config).process().unwrap();
        assert_eq!(summary.pairs.summarized_rows, 0);
        assert_eq!(line_count(&out.join(OutputFile::AllPairs.file_name())), 1);
        assert_eq!(line_count(&out.join(OutputFile::HetRate.file_name())), 1);
    }
}
