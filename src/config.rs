// ==============================================================================
// config.rs - Run Configuration
// ==============================================================================
// Description: Input paths, thresholds, and options for one summary run
// Author: Matt Barham
// Created: 2025-11-12
// Modified: 2025-11-14
// Version: 1.0.0
// ==============================================================================

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::{MalformedRowPolicy, Thresholds};

/// Problems detected before any input is read
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Missing required input: {name} file path must be provided")]
    MissingInput { name: &'static str },

    #[error("{name} file does not exist: {path}")]
    InputNotFound { name: &'static str, path: String },

    #[error("Invalid {name}: {value} (must be between 0 and 1)")]
    InvalidThreshold { name: &'static str, value: f64 },

    #[error("Low match threshold {low} is greater than high match threshold {high}")]
    InvertedMatchThresholds { low: f64, high: f64 },
}

/// Everything one summary run needs
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub comparison_path: PathBuf,
    pub het_path: PathBuf,
    pub output_dir: PathBuf,
    pub thresholds: Thresholds,
    pub malformed_rows: MalformedRowPolicy,
    pub plots: bool,
}

impl RunConfig {
    /// Build a config with default thresholds, aborting on malformed rows
    pub fn new(
        comparison_path: impl Into<PathBuf>,
        het_path: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            comparison_path: comparison_path.into(),
            het_path: het_path.into(),
            output_dir: output_dir.into(),
            thresholds: Thresholds::default(),
            malformed_rows: MalformedRowPolicy::default(),
            plots: true,
        }
    }

    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_malformed_rows(mut self, policy: MalformedRowPolicy) -> Self {
        self.malformed_rows = policy;
        self
    }

    pub fn with_plots(mut self, plots: bool) -> Self {
        self.plots = plots;
        self
    }

    /// Check input files exist and thresholds satisfy `0 <= low <= high <= 1`
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_input("Comparison", &self.comparison_path)?;
        check_input("Heterozygosity", &self.het_path)?;
        validate_thresholds(&self.thresholds)
    }
}

fn check_input(name: &'static str, path: &Path) -> Result<(), ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::InputNotFound {
            name,
            path: path.display().to_string(),
        });
    }
    Ok(())
}

pub fn validate_thresholds(thresholds: &Thresholds) -> Result<(), ConfigError> {
    for (name, value) in [
        ("high match threshold", thresholds.high_match),
        ("low match threshold", thresholds.low_match),
        ("het threshold", thresholds.het),
    ] {
        // NaN is rejected here as well
        if !(0.0..=1.0).contains(&value) {
            return Err(ConfigError::InvalidThreshold { name, value });
        }
    }

    if thresholds.low_match > thresholds.high_match {
        return Err(ConfigError::InvertedMatchThresholds {
            low: thresholds.low_match,
            high: thresholds.high_match,
        });
    }

    Ok(())
}
