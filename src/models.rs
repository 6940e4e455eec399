// ==============================================================================
// models.rs - Fingerprint QC Data Models
// ==============================================================================
// Description: Input rows, enriched rows, and classification thresholds
// Author: Matt Barham
// Created: 2025-11-12
// Modified: 2025-11-14
// Version: 2.1.0
// ==============================================================================

use serde::{Deserialize, Serialize};

/// Tissue classification derived from the Increment field of a sample name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subgroup {
    /// Germline / normal tissue (Increment contains "C")
    Constitutional,
    /// Tumor tissue (Increment contains "T", but not "C")
    Tumor,
    /// Anything else
    Other,
}

impl Subgroup {
    /// "C" is checked before "T", so an increment containing both is constitutional
    pub fn from_increment(increment: &str) -> Self {
        if increment.contains('C') {
            Subgroup::Constitutional
        } else if increment.contains('T') {
            Subgroup::Tumor
        } else {
            Subgroup::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Subgroup::Constitutional => "Constitutional",
            Subgroup::Tumor => "Tumor",
            Subgroup::Other => "Other",
        }
    }
}

/// Unordered combination of the two subgroups of a comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubgroupPair {
    #[serde(rename = "Constitutional-Constitutional")]
    ConstitutionalConstitutional,
    #[serde(rename = "Constitutional-Tumor")]
    ConstitutionalTumor,
    #[serde(rename = "Tumor-Tumor")]
    TumorTumor,
    /// At least one side is `Subgroup::Other`
    Other,
}

impl SubgroupPair {
    pub fn from_subgroups(first: Subgroup, second: Subgroup) -> Self {
        use Subgroup::{Constitutional, Tumor};

        match (first, second) {
            (Constitutional, Constitutional) => SubgroupPair::ConstitutionalConstitutional,
            (Constitutional, Tumor) | (Tumor, Constitutional) => SubgroupPair::ConstitutionalTumor,
            (Tumor, Tumor) => SubgroupPair::TumorTumor,
            _ => SubgroupPair::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SubgroupPair::ConstitutionalConstitutional => "Constitutional-Constitutional",
            SubgroupPair::ConstitutionalTumor => "Constitutional-Tumor",
            SubgroupPair::TumorTumor => "Tumor-Tumor",
            SubgroupPair::Other => "Other",
        }
    }
}

/// Whether both samples of a comparison belong to the same patient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatientPair {
    Same,
    Different,
}

impl PatientPair {
    pub fn from_patient_ids(first: &str, second: &str) -> Self {
        if first == second {
            PatientPair::Same
        } else {
            PatientPair::Different
        }
    }
}

/// Outcome of classifying a pairwise comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchFlag {
    Pass,
    Fail,
    Warning,
    /// Ratio could not be placed in any band (NaN)
    Error,
}

impl MatchFlag {
    pub const ALL: [MatchFlag; 4] = [
        MatchFlag::Pass,
        MatchFlag::Fail,
        MatchFlag::Warning,
        MatchFlag::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchFlag::Pass => "Pass",
            MatchFlag::Fail => "Fail",
            MatchFlag::Warning => "Warning",
            MatchFlag::Error => "Error",
        }
    }
}

/// Outcome of classifying a heterozygosity rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HetFlag {
    Pass,
    Fail,
    /// Ratio not comparable with the threshold (NaN)
    Error,
}

impl HetFlag {
    pub const ALL: [HetFlag; 3] = [HetFlag::Pass, HetFlag::Fail, HetFlag::Error];

    pub fn as_str(&self) -> &'static str {
        match self {
            HetFlag::Pass => "Pass",
            HetFlag::Fail => "Fail",
            HetFlag::Error => "Error",
        }
    }
}

/// Classification thresholds for one run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Match ratio at or above which two samples are considered identical
    pub high_match: f64,
    /// Match ratio below which two samples are considered unrelated
    pub low_match: f64,
    /// Heterozygosity rate at or above which a sample is flagged
    pub het: f64,
    /// Number of fingerprint SNPs in the panel (plot reference line only)
    pub genotypes_tested: u64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            high_match: 0.8,
            low_match: 0.6,
            het: 0.6,
            genotypes_tested: 387,
        }
    }
}

impl Thresholds {
    /// Decision table for pairwise comparisons; first matching band wins.
    pub fn match_flag(&self, patient_pair: PatientPair, match_ratio: f64) -> MatchFlag {
        let high = match_ratio >= self.high_match;
        let low = match_ratio < self.low_match;
        let middle = match_ratio >= self.low_match && match_ratio < self.high_match;

        match patient_pair {
            PatientPair::Same if high => MatchFlag::Pass,
            PatientPair::Same if low => MatchFlag::Fail,
            PatientPair::Same if middle => MatchFlag::Warning,
            PatientPair::Different if high => MatchFlag::Fail,
            PatientPair::Different if low => MatchFlag::Pass,
            PatientPair::Different if middle => MatchFlag::Warning,
            _ => MatchFlag::Error,
        }
    }

    pub fn het_flag(&self, het_ratio: f64) -> HetFlag {
        if het_ratio >= self.het {
            HetFlag::Fail
        } else if het_ratio < self.het {
            HetFlag::Pass
        } else {
            HetFlag::Error
        }
    }
}

/// What to do with a row whose sample name cannot be decomposed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedRowPolicy {
    /// Stop the run at the first malformed row
    #[default]
    Abort,
    /// Drop the row, log a warning, and keep going
    Skip,
}

/// One row of the SNPSniffer pairwise comparison table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    pub bam1: String,
    pub bam2: String,
    pub shared_calls: u64,
    pub matching_calls: u64,
    pub match_ratio: f64,
    /// `File1-File2`
    pub ordered_pair: String,
}

/// One row of the SNPSniffer heterozygosity table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HetRecord {
    pub sample: String,
    pub homozygous: u64,
    pub heterozygous: u64,
    pub total: u64,
    pub het_ratio: f64,
}

/// Comparison row with sample identity and classification attached
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedPair {
    pub record: ComparisonRecord,
    pub file1: String,
    pub file2: String,
    pub patient_id1: String,
    pub patient_id2: String,
    pub visit_id1: String,
    pub visit_id2: String,
    /// Both assays joined by "-", smaller name first
    pub assay_pair: String,
    pub subgroup1: Subgroup,
    pub subgroup2: Subgroup,
    pub subgroup_pair: SubgroupPair,
    pub patient_pair: PatientPair,
    pub match_flag: MatchFlag,
}

/// Heterozygosity row with sample identity and classification attached
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedHetRecord {
    pub record: HetRecord,
    pub patient_id: String,
    pub visit_id: String,
    pub subgroup: Subgroup,
    pub het_flag: HetFlag,
}
