// ==============================================================================
// comparison.rs - SNPSniffer Pairwise Comparison Parser
// ==============================================================================
// Description: Parser for SNPSniffer pairwise genotype concordance tables
// Author: Matt Barham
// Created: 2025-11-12
// Modified: 2025-11-12
// Version: 1.0.0
// ==============================================================================
// Format: Tab-delimited, no header, 6 columns
//   BAM1  BAM2  SharedCalls  MatchingCalls  MatchRatio  OrderedPair
// Example:
//   a.bam  b.bam  350  340  0.9714  S1_P01_V1_Blood_F1_C_X-S1_P01_V2_FFPE_F1_T_X
// ==============================================================================

use std::path::Path;
use tracing::{info, warn};

use super::{read_headerless_tsv, TableParseError};
use crate::models::ComparisonRecord;

/// Fixed column count of the table
pub const COMPARISON_COLUMNS: usize = 6;

/// Parser for the pairwise comparison table
pub struct ComparisonParser;

impl ComparisonParser {
    /// Parse a comparison table (plain or `.gz`).
    ///
    /// Rows must have exactly 6 fields; the counts must be non-negative
    /// integers and the ratio a float. An empty file yields no records.
    pub fn parse(path: impl AsRef<Path>) -> Result<Vec<ComparisonRecord>, TableParseError> {
        let path = path.as_ref();
        let records: Vec<ComparisonRecord> = read_headerless_tsv(path, COMPARISON_COLUMNS)?;

        if records.is_empty() {
            warn!("Comparison table {} contains no rows", path.display());
        } else {
            info!("Read {} comparisons from {}", records.len(), path.display());
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_parse_valid_file() {
        let contents = "\
a.bam\tb.bam\t350\t340\t0.9714\tS1_P01_V1_Blood_F1_C_X-S1_P01_V2_FFPE_F1_T_X
a.bam\tc.bam\t300\t120\t0.4\tS1_P01_V1_Blood_F1_C_X-S1_P02_V1_Blood_F1_C_X
";
        let file = create_test_file(contents);
        let records = ComparisonParser::parse(file.path()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].bam1, "a.bam");
        assert_eq!(records[0].bam2, "b.bam");
        assert_eq!(records[0].shared_calls, 350);
        assert_eq!(records[0].matching_calls, 340);
        assert!((records[0].match_ratio - 0.9714).abs() < 1e-12);
        assert_eq!(
            records[0].ordered_pair,
            "S1_P01_V1_Blood_F1_C_X-S1_P01_V2_FFPE_F1_T_X"
        );
        assert_eq!(records[1].bam2, "c.bam");
        assert_eq!(records[1].match_ratio, 0.4);
    }

    #[test]
    fn test_nan_ratio_is_accepted() {
        let file = create_test_file("a.bam\tb.bam\t0\t0\tNaN\tA_B_C_D_E_F_G-A_B_C_D_E_F_H\n");
        let records = ComparisonParser::parse(file.path()).unwrap();
        assert!(records[0].match_ratio.is_nan());
    }

    #[test]
    fn test_empty_file() {
        let file = create_test_file("");
        let records = ComparisonParser::parse(file.path()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_too_few_fields() {
        let file = create_test_file("a.bam\tb.bam\t350\t340\t0.97\n");
        let result = ComparisonParser::parse(file.path());
        assert!(matches!(result, Err(TableParseError::ColumnCount { found: 5, .. })));
    }

    #[test]
    fn test_invalid_count() {
        let file = create_test_file("a.bam\tb.bam\tmany\t340\t0.97\tA-B\n");
        let result = ComparisonParser::parse(file.path());
        assert!(matches!(result, Err(TableParseError::Row { .. })));
    }
}
