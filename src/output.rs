// ==============================================================================
// output.rs - Summary Table and Run Summary Generation
// ==============================================================================
// Description: Writes enriched SNPSniffer tables and a JSON run summary
// Author: Matt Barham
// Created: 2025-11-06
// Modified: 2025-11-14
// Version: 2.0.0
// ==============================================================================

use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::models::{
    EnrichedHetRecord, EnrichedPair, HetFlag, MatchFlag, MalformedRowPolicy, PatientPair,
    Subgroup, SubgroupPair, Thresholds,
};

/// Files produced by a summary run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OutputFile {
    /// Every enriched comparison
    AllPairs,
    /// Comparisons whose MatchFlag is not Pass
    PossibleMatchErrors,
    /// Every enriched heterozygosity record
    HetRate,
    /// Heterozygosity records flagged Fail
    PossibleCrossContamination,
    /// JSON run summary
    RunSummary,
    /// Match ratio scatter plot
    MatchRatioPlot,
    /// Heterozygosity scatter plot
    HetRatePlot,
}

impl OutputFile {
    pub fn file_name(&self) -> &'static str {
        match self {
            OutputFile::AllPairs => "SnpSniffer_AllPairs_Summary.tsv",
            OutputFile::PossibleMatchErrors => "SnpSniffer_PossibleMatchErrors_Summary.tsv",
            OutputFile::HetRate => "SnpSniffer_HetRate_Summary.tsv",
            OutputFile::PossibleCrossContamination => {
                "SnpSniffer_PossibleCrossContamination_Summary.tsv"
            }
            OutputFile::RunSummary => "SnpSniffer_Run_Summary.json",
            OutputFile::MatchRatioPlot => "SnpSniffer_MatchRatio.svg",
            OutputFile::HetRatePlot => "SnpSniffer_HetRate.svg",
        }
    }

    pub fn path_in(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(self.file_name())
    }
}

/// Pair table row as written to disk
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct PairRowOutput<'a> {
    #[serde(rename = "BAM1")]
    bam1: &'a str,
    #[serde(rename = "BAM2")]
    bam2: &'a str,
    shared_calls: u64,
    matching_calls: u64,
    match_ratio: f64,
    ordered_pair: &'a str,
    file1: &'a str,
    file2: &'a str,
    #[serde(rename = "PatientID1")]
    patient_id1: &'a str,
    #[serde(rename = "PatientID2")]
    patient_id2: &'a str,
    #[serde(rename = "VisitID1")]
    visit_id1: &'a str,
    #[serde(rename = "VisitID2")]
    visit_id2: &'a str,
    assay_pair: &'a str,
    subgroup1: Subgroup,
    subgroup2: Subgroup,
    subgroup_pair: SubgroupPair,
    patient_pair: PatientPair,
    match_flag: MatchFlag,
}

impl<'a> From<&'a EnrichedPair> for PairRowOutput<'a> {
    fn from(pair: &'a EnrichedPair) -> Self {
        Self {
            bam1: &pair.record.bam1,
            bam2: &pair.record.bam2,
            shared_calls: pair.record.shared_calls,
            matching_calls: pair.record.matching_calls,
            match_ratio: pair.record.match_ratio,
            ordered_pair: &pair.record.ordered_pair,
            file1: &pair.file1,
            file2: &pair.file2,
            patient_id1: &pair.patient_id1,
            patient_id2: &pair.patient_id2,
            visit_id1: &pair.visit_id1,
            visit_id2: &pair.visit_id2,
            assay_pair: &pair.assay_pair,
            subgroup1: pair.subgroup1,
            subgroup2: pair.subgroup2,
            subgroup_pair: pair.subgroup_pair,
            patient_pair: pair.patient_pair,
            match_flag: pair.match_flag,
        }
    }
}

/// Heterozygosity table row as written to disk
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct HetRowOutput<'a> {
    sample: &'a str,
    homozygous: u64,
    heterozygous: u64,
    total: u64,
    het_ratio: f64,
    #[serde(rename = "PatientID")]
    patient_id: &'a str,
    #[serde(rename = "VisitID")]
    visit_id: &'a str,
    subgroup: Subgroup,
    het_flag: HetFlag,
}

impl<'a> From<&'a EnrichedHetRecord> for HetRowOutput<'a> {
    fn from(row: &'a EnrichedHetRecord) -> Self {
        Self {
            sample: &row.record.sample,
            homozygous: row.record.homozygous,
            heterozygous: row.record.heterozygous,
            total: row.record.total,
            het_ratio: row.record.het_ratio,
            patient_id: &row.patient_id,
            visit_id: &row.visit_id,
            subgroup: row.subgroup,
            het_flag: row.het_flag,
        }
    }
}

/// Column names of the pair tables, in file order
pub const PAIR_COLUMNS: [&str; 18] = [
    "BAM1",
    "BAM2",
    "SharedCalls",
    "MatchingCalls",
    "MatchRatio",
    "OrderedPair",
    "File1",
    "File2",
    "PatientID1",
    "PatientID2",
    "VisitID1",
    "VisitID2",
    "AssayPair",
    "Subgroup1",
    "Subgroup2",
    "SubgroupPair",
    "PatientPair",
    "MatchFlag",
];

/// Column names of the heterozygosity tables, in file order
pub const HET_COLUMNS: [&str; 9] = [
    "Sample",
    "Homozygous",
    "Heterozygous",
    "Total",
    "HetRatio",
    "PatientID",
    "VisitID",
    "Subgroup",
    "HetFlag",
];

/// Row counts for one input table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableCounts {
    /// Rows read from the input file
    pub input_rows: usize,
    /// Rows dropped because a sample name was malformed
    pub skipped_rows: usize,
    /// Rows written to the full summary table
    pub summarized_rows: usize,
    /// Rows written to the flagged subset table
    pub flagged_rows: usize,
    /// Summarized rows per flag label
    pub by_flag: BTreeMap<String, usize>,
}

/// Machine-readable record of one summary run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub tool_version: String,
    pub processing_date: String,
    pub comparison_file: String,
    pub het_file: String,
    pub thresholds: Thresholds,
    pub malformed_rows: MalformedRowPolicy,
    pub pairs: TableCounts,
    pub het_rates: TableCounts,
    /// Output file kind to path, including the summary itself
    pub outputs: BTreeMap<OutputFile, PathBuf>,
}

impl RunSummary {
    pub fn flagged_total(&self) -> usize {
        self.pairs.flagged_rows + self.het_rates.flagged_rows
    }
}

/// Count pair flags for the run summary
pub fn count_match_flags(pairs: &[EnrichedPair]) -> BTreeMap<String, usize> {
    MatchFlag::ALL
        .iter()
        .map(|flag| {
            let n = pairs.iter().filter(|p| p.match_flag == *flag).count();
            (flag.as_str().to_string(), n)
        })
        .collect()
}

/// Count heterozygosity flags for the run summary
pub fn count_het_flags(rows: &[EnrichedHetRecord]) -> BTreeMap<String, usize> {
    HetFlag::ALL
        .iter()
        .map(|flag| {
            let n = rows.iter().filter(|r| r.het_flag == *flag).count();
            (flag.as_str().to_string(), n)
        })
        .collect()
}

/// Writes summary tables into one output directory
pub struct OutputGenerator {
    output_dir: PathBuf,
}

impl OutputGenerator {
    /// Create a generator, creating `output_dir` if needed
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        std::fs::create_dir_all(&output_dir).with_context(|| {
            format!("Failed to create output directory: {}", output_dir.display())
        })?;
        Ok(Self { output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write the full pair table and the subset whose MatchFlag is not Pass.
    ///
    /// Returns the number of flagged rows.
    pub fn write_pairs(
        &self,
        pairs: &[EnrichedPair],
        outputs: &mut BTreeMap<OutputFile, PathBuf>,
    ) -> Result<usize> {
        let all_path = OutputFile::AllPairs.path_in(&self.output_dir);
        write_tsv(&all_path, &PAIR_COLUMNS, pairs.iter().map(PairRowOutput::from))?;
        outputs.insert(OutputFile::AllPairs, all_path);

        let flagged: Vec<&EnrichedPair> = pairs
            .iter()
            .filter(|p| p.match_flag != MatchFlag::Pass)
            .collect();
        let flagged_path = OutputFile::PossibleMatchErrors.path_in(&self.output_dir);
        write_tsv(
            &flagged_path,
            &PAIR_COLUMNS,
            flagged.iter().map(|p| PairRowOutput::from(*p)),
        )?;
        outputs.insert(OutputFile::PossibleMatchErrors, flagged_path);

        info!(
            "Wrote {} pairs ({} possible match errors)",
            pairs.len(),
            flagged.len()
        );
        Ok(flagged.len())
    }

    /// Write the full heterozygosity table and the subset flagged Fail.
    ///
    /// Returns the number of flagged rows.
    pub fn write_het_rates(
        &self,
        rows: &[EnrichedHetRecord],
        outputs: &mut BTreeMap<OutputFile, PathBuf>,
    ) -> Result<usize> {
        let all_path = OutputFile::HetRate.path_in(&self.output_dir);
        write_tsv(&all_path, &HET_COLUMNS, rows.iter().map(HetRowOutput::from))?;
        outputs.insert(OutputFile::HetRate, all_path);

        let flagged: Vec<&EnrichedHetRecord> = rows
            .iter()
            .filter(|r| r.het_flag == HetFlag::Fail)
            .collect();
        let flagged_path = OutputFile::PossibleCrossContamination.path_in(&self.output_dir);
        write_tsv(
            &flagged_path,
            &HET_COLUMNS,
            flagged.iter().map(|r| HetRowOutput::from(*r)),
        )?;
        outputs.insert(OutputFile::PossibleCrossContamination, flagged_path);

        info!(
            "Wrote {} heterozygosity rates ({} possible cross-contaminations)",
            rows.len(),
            flagged.len()
        );
        Ok(flagged.len())
    }

    /// Write the JSON run summary
    pub fn write_run_summary(&self, summary: &RunSummary) -> Result<PathBuf> {
        let path = OutputFile::RunSummary.path_in(&self.output_dir);
        let json = serde_json::to_string_pretty(summary)
            .context("Failed to serialize run summary")?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write run summary: {}", path.display()))?;

        info!("Run summary written: {}", path.display());
        Ok(path)
    }
}

/// Write rows as TSV with an explicit header, so empty tables still get one
fn write_tsv<T, I>(path: &Path, columns: &[&str], rows: I) -> Result<()>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let mut writer = WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    writer
        .write_record(columns)
        .with_context(|| format!("Failed to write header: {}", path.display()))?;

    let mut n = 0usize;
    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("Failed to write row {} to {}", n + 1, path.display()))?;
        n += 1;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;

    debug!("Wrote {} rows to {}", n, path.display());
    Ok(())
}
