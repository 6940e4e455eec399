// ==============================================================================
// het_rate.rs - SNPSniffer Heterozygosity Parser
// ==============================================================================
// Description: Parser for SNPSniffer per-sample heterozygosity tables
// Author: Matt Barham
// Created: 2025-11-12
// Modified: 2025-11-12
// Version: 1.0.0
// ==============================================================================
// Format: Tab-delimited, no header, 5 columns
//   Sample  Homozygous  Heterozygous  Total  HetRatio
// ==============================================================================

use std::path::Path;
use tracing::{info, warn};

use super::{read_headerless_tsv, TableParseError};
use crate::models::HetRecord;

/// Fixed column count of the table
pub const HET_RATE_COLUMNS: usize = 5;

/// Parser for the heterozygosity table
pub struct HetRateParser;

impl HetRateParser {
    pub fn parse(path: impl AsRef<Path>) -> Result<Vec<HetRecord>, TableParseError> {
        let path = path.as_ref();
        let records: Vec<HetRecord> = read_headerless_tsv(path, HET_RATE_COLUMNS)?;

        if records.is_empty() {
            warn!("Heterozygosity table {} contains no rows", path.display());
        } else {
            info!("Read {} heterozygosity rates from {}", records.len(), path.display());
        }

        Ok(records)
    }
}
