// ==============================================================================
// enrich.rs - Row Enrichment and Classification
// ==============================================================================
// Description: Attaches sample identity and QC flags to SNPSniffer rows
// Author: Matt Barham
// Created: 2025-11-12
// Modified: 2025-11-14
// Version: 1.0.0
// ==============================================================================

use tracing::warn;

use crate::models::{
    ComparisonRecord, EnrichedHetRecord, EnrichedPair, HetRecord, MalformedRowPolicy,
    PatientPair, SubgroupPair, Thresholds,
};
use crate::sample_id::{split_ordered_pair, SampleIdError, SampleIdentifier};

/// Enrich one pairwise comparison.
///
/// Splits `OrderedPair` into its two sample names, decomposes both, and
/// classifies the match ratio against the high/low thresholds.
pub fn enrich_pair(
    record: ComparisonRecord,
    thresholds: &Thresholds,
) -> Result<EnrichedPair, SampleIdError> {
    let (file1, file2) = split_ordered_pair(&record.ordered_pair)?;
    let (file1, file2) = (file1.to_string(), file2.to_string());
    let sample1 = SampleIdentifier::parse(&file1)?;
    let sample2 = SampleIdentifier::parse(&file2)?;

    let assay_pair = if sample1.assay < sample2.assay {
        format!("{}-{}", sample1.assay, sample2.assay)
    } else {
        format!("{}-{}", sample2.assay, sample1.assay)
    };

    let subgroup1 = sample1.subgroup();
    let subgroup2 = sample2.subgroup();
    let patient_id1 = sample1.patient_id();
    let patient_id2 = sample2.patient_id();
    let patient_pair = PatientPair::from_patient_ids(&patient_id1, &patient_id2);
    let match_flag = thresholds.match_flag(patient_pair, record.match_ratio);

    Ok(EnrichedPair {
        file1,
        file2,
        patient_id1,
        patient_id2,
        visit_id1: sample1.visit_id(),
        visit_id2: sample2.visit_id(),
        assay_pair,
        subgroup1,
        subgroup2,
        subgroup_pair: SubgroupPair::from_subgroups(subgroup1, subgroup2),
        patient_pair,
        match_flag,
        record,
    })
}

/// Enrich one heterozygosity record.
pub fn enrich_het(
    record: HetRecord,
    thresholds: &Thresholds,
) -> Result<EnrichedHetRecord, SampleIdError> {
    let sample = SampleIdentifier::parse(&record.sample)?;
    let het_flag = thresholds.het_flag(record.het_ratio);

    Ok(EnrichedHetRecord {
        patient_id: sample.patient_id(),
        visit_id: sample.visit_id(),
        subgroup: sample.subgroup(),
        het_flag,
        record,
    })
}

/// Rows that survived enrichment plus the number dropped under `Skip`
#[derive(Debug, Clone)]
pub struct Enriched<T> {
    pub rows: Vec<T>,
    pub skipped: usize,
}

/// Map `enrich` over `records` in input order, applying the malformed-row policy.
///
/// `label` names the table in warnings; row numbers are 1-based like file lines.
pub fn enrich_all<R, T, F>(
    records: Vec<R>,
    policy: MalformedRowPolicy,
    label: &str,
    mut enrich: F,
) -> Result<Enriched<T>, SampleIdError>
where
    F: FnMut(R) -> Result<T, SampleIdError>,
{
    let mut rows = Vec::with_capacity(records.len());
    let mut skipped = 0;

    for (idx, record) in records.into_iter().enumerate() {
        match enrich(record) {
            Ok(row) => rows.push(row),
            Err(e) => match policy {
                MalformedRowPolicy::Abort => return Err(e),
                MalformedRowPolicy::Skip => {
                    warn!("Skipping {} row {}: {}", label, idx + 1, e);
                    skipped += 1;
                }
            },
        }
    }

    Ok(Enriched { rows, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HetFlag, MatchFlag, Subgroup};

    fn comparison(ordered_pair: &str, match_ratio: f64) -> ComparisonRecord {
        ComparisonRecord {
            bam1: "a.bam".to_string(),
            bam2: "b.bam".to_string(),
            shared_calls: 350,
            matching_calls: (350.0 * match_ratio) as u64,
            match_ratio,
            ordered_pair: ordered_pair.to_string(),
        }
    }

    fn het(sample: &str, het_ratio: f64) -> HetRecord {
        HetRecord {
            sample: sample.to_string(),
            homozygous: 200,
            heterozygous: 150,
            total: 350,
            het_ratio,
        }
    }

    #[test]
    fn test_enrich_pair_same_patient_warning() {
        let pair = enrich_pair(
            comparison("S1_P01_V1_Blood_F1_C_AssayB-S1_P01_V2_FFPE_F1_T_AssayA", 0.75),
            &Thresholds::default(),
        )
        .unwrap();

        assert_eq!(pair.file1, "S1_P01_V1_Blood_F1_C_AssayB");
        assert_eq!(pair.file2, "S1_P01_V2_FFPE_F1_T_AssayA");
        assert_eq!(pair.patient_id1, "S1_P01");
        assert_eq!(pair.patient_id2, "S1_P01");
        assert_eq!(pair.visit_id1, "S1_P01_V1");
        assert_eq!(pair.visit_id2, "S1_P01_V2");
        assert_eq!(pair.assay_pair, "AssayA-AssayB");
        assert_eq!(pair.subgroup1, Subgroup::Constitutional);
        assert_eq!(pair.subgroup2, Subgroup::Tumor);
        assert_eq!(pair.subgroup_pair, SubgroupPair::ConstitutionalTumor);
        assert_eq!(pair.patient_pair, PatientPair::Same);
        assert_eq!(pair.match_flag, MatchFlag::Warning);
        assert_eq!(pair.record.match_ratio, 0.75);
    }

    #[test]
    fn test_enrich_pair_different_patient_high_ratio_fails() {
        let pair = enrich_pair(
            comparison("S1_P01_V1_Blood_F1_C_X-S1_P02_V1_Blood_F1_C_X", 0.9),
            &Thresholds::default(),
        )
        .unwrap();

        assert_eq!(pair.patient_pair, PatientPair::Different);
        assert_eq!(pair.assay_pair, "X-X");
        assert_eq!(pair.subgroup_pair, SubgroupPair::ConstitutionalConstitutional);
        assert_eq!(pair.match_flag, MatchFlag::Fail);
    }

    #[test]
    fn test_enrich_pair_is_symmetric_under_swap() {
        let a = "S1_P01_V1_Blood_F1_T_Zeta";
        let b = "S1_P01_V3_Blood_F2_N_Alpha";
        let thresholds = Thresholds::default();

        for ratio in [0.1, 0.65, 0.95] {
            let forward = enrich_pair(comparison(&format!("{a}-{b}"), ratio), &thresholds).unwrap();
            let reverse = enrich_pair(comparison(&format!("{b}-{a}"), ratio), &thresholds).unwrap();

            assert_eq!(forward.assay_pair, "Alpha-Zeta");
            assert_eq!(forward.assay_pair, reverse.assay_pair);
            assert_eq!(forward.subgroup_pair, reverse.subgroup_pair);
            assert_eq!(forward.patient_pair, reverse.patient_pair);
            assert_eq!(forward.match_flag, reverse.match_flag);
        }
    }

    #[test]
    fn test_enrich_pair_uses_given_thresholds() {
        let strict = Thresholds {
            high_match: 0.95,
            low_match: 0.9,
            ..Thresholds::default()
        };
        let pair = enrich_pair(
            comparison("S_P_V1_B_F_C_A-S_P_V2_B_F_C_A", 0.85),
            &strict,
        )
        .unwrap();
        assert_eq!(pair.match_flag, MatchFlag::Fail);
    }

    #[test]
    fn test_enrich_pair_malformed_sample() {
        let result = enrich_pair(
            comparison("STUDY1_P01_V1-S1_P02_V1_Blood_F1_C_X", 0.5),
            &Thresholds::default(),
        );
        assert!(matches!(result, Err(SampleIdError::FieldCount { found: 3, .. })));
    }

    #[test]
    fn test_enrich_het() {
        let row = enrich_het(het("S1_P01_V1_Blood_F1_C_AssayA", 0.65), &Thresholds::default())
            .unwrap();
        assert_eq!(row.patient_id, "S1_P01");
        assert_eq!(row.visit_id, "S1_P01_V1");
        assert_eq!(row.subgroup, Subgroup::Constitutional);
        assert_eq!(row.het_flag, HetFlag::Fail);

        let row = enrich_het(het("S1_P01_V1_Blood_F1_T_AssayA", 0.3), &Thresholds::default())
            .unwrap();
        assert_eq!(row.subgroup, Subgroup::Tumor);
        assert_eq!(row.het_flag, HetFlag::Pass);
    }

    #[test]
    fn test_enrich_het_malformed_sample() {
        let result = enrich_het(het("STUDY1_P01_V1", 0.3), &Thresholds::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_enrich_all_abort_stops_at_first_error() {
        let records = vec![
            het("S_P_V_B_F_C_A", 0.1),
            het("bad", 0.1),
            het("S_P_V_B_F_T_A", 0.1),
        ];
        let thresholds = Thresholds::default();
        let result = enrich_all(records, MalformedRowPolicy::Abort, "het", |r| {
            enrich_het(r, &thresholds)
        });
        assert!(matches!(result, Err(SampleIdError::FieldCount { found: 1, .. })));
    }

    #[test]
    fn test_enrich_all_skip_preserves_order() {
        let records = vec![
            het("S_P1_V_B_F_C_A", 0.1),
            het("bad", 0.1),
            het("S_P2_V_B_F_T_A", 0.7),
        ];
        let thresholds = Thresholds::default();
        let enriched = enrich_all(records, MalformedRowPolicy::Skip, "het", |r| {
            enrich_het(r, &thresholds)
        })
        .unwrap();

        assert_eq!(enriched.skipped, 1);
        assert_eq!(enriched.rows.len(), 2);
        assert_eq!(enriched.rows[0].patient_id, "S_P1");
        assert_eq!(enriched.rows[1].patient_id, "S_P2");
        assert_eq!(enriched.rows[1].het_flag, HetFlag::Fail);
    }
}
