// ==============================================================================
// sample_id.rs - Structured Sample Name Parser
// ==============================================================================
// Description: Decomposes SNPSniffer sample names into study/patient/visit/assay
// Author: Matt Barham
// Created: 2025-11-04
// Modified: 2025-11-12
// Version: 1.1.0
// ==============================================================================
// Format: 7 underscore-separated fields
// Example:
//   STUDY1_P01_V1_Blood_F1_C_AssayA
//   Study  Patient  Visit  Source  Fraction  Increment  Assay
// ==============================================================================

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Subgroup;

/// Number of underscore-separated fields in a sample name
pub const SAMPLE_FIELD_COUNT: usize = 7;

/// Separator between the two sample names of an ordered pair
pub const PAIR_SEPARATOR: char = '-';

/// Errors raised while decomposing sample names
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SampleIdError {
    #[error("Malformed sample name '{token}': expected 7 underscore-separated fields, found {found}")]
    FieldCount { token: String, found: usize },

    #[error("Ambiguous ordered pair '{pair}': expected exactly one '-', found {separators}")]
    AmbiguousPair { pair: String, separators: usize },
}

/// Parsed sample name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleIdentifier {
    pub study: String,
    pub patient: String,
    pub visit: String,
    /// Tissue source (e.g., "Blood", "FFPE")
    pub source: String,
    pub fraction: String,
    /// Increment code; "C" marks constitutional, "T" tumor
    pub increment: String,
    pub assay: String,
}

impl SampleIdentifier {
    /// Parse a sample name of exactly 7 underscore-separated fields.
    ///
    /// Fields are taken verbatim: no trimming, case folding, or value checks.
    ///
    /// # Example
    /// ```
    /// use snpsniffer_summary::sample_id::SampleIdentifier;
    ///
    /// let id = SampleIdentifier::parse("STUDY1_P01_V1_Blood_F1_C_AssayA").unwrap();
    /// assert_eq!(id.patient_id(), "STUDY1_P01");
    /// ```
    pub fn parse(token: &str) -> Result<Self, SampleIdError> {
        let fields: Vec<&str> = token.split('_').collect();

        if fields.len() != SAMPLE_FIELD_COUNT {
            return Err(SampleIdError::FieldCount {
                token: token.to_string(),
                found: fields.len(),
            });
        }

        Ok(Self {
            study: fields[0].to_string(),
            patient: fields[1].to_string(),
            visit: fields[2].to_string(),
            source: fields[3].to_string(),
            fraction: fields[4].to_string(),
            increment: fields[5].to_string(),
            assay: fields[6].to_string(),
        })
    }

    /// `Study_Patient`
    pub fn patient_id(&self) -> String {
        format!("{}_{}", self.study, self.patient)
    }

    /// `Study_Patient_Visit`
    pub fn visit_id(&self) -> String {
        format!("{}_{}_{}", self.study, self.patient, self.visit)
    }

    pub fn subgroup(&self) -> Subgroup {
        Subgroup::from_increment(&self.increment)
    }
}

/// Split an ordered pair (`File1-File2`) into its two sample names.
///
/// Sample names carry no escaping, so a pair with anything other than a
/// single separator cannot be split reliably and is rejected.
pub fn split_ordered_pair(pair: &str) -> Result<(&str, &str), SampleIdError> {
    let separators = pair.matches(PAIR_SEPARATOR).count();
    match pair.split_once(PAIR_SEPARATOR) {
        Some((first, second)) if separators == 1 => Ok((first, second)),
        _ => Err(SampleIdError::AmbiguousPair {
            pair: pair.to_string(),
            separators,
        }),
    }
}
