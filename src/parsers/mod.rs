// ==============================================================================
// parsers/mod.rs - SNPSniffer table readers
// ==============================================================================
// Description: Readers for headerless tab-delimited SNPSniffer output tables
// Author: Matt Barham
// Created: 2025-11-03
// Modified: 2025-11-14
// Version: 2.0.0
// ==============================================================================

pub mod comparison;
pub mod het_rate;

pub use comparison::ComparisonParser;
pub use het_rate::HetRateParser;

use csv::{ReaderBuilder, Trim};
use flate2::read::MultiGzDecoder;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while reading a SNPSniffer table
#[derive(Error, Debug)]
pub enum TableParseError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed row at {path}:{line}: expected {expected} tab-delimited fields, found {found}")]
    ColumnCount {
        path: String,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("Malformed row in {path}: {source}")]
    Row {
        path: String,
        #[source]
        source: csv::Error,
    },
}

/// Open a file for reading, decompressing on the fly when it ends in `.gz`
fn open_maybe_gzipped(path: &Path) -> std::io::Result<Box<dyn Read>> {
    let file = File::open(path)?;
    let is_gzip = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("gz"))
        .unwrap_or(false);

    if is_gzip {
        debug!("Reading gzip-compressed table: {}", path.display());
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Deserialize every row of a headerless TSV positionally into `T`.
///
/// Every row must carry exactly `columns` fields.
pub(crate) fn read_headerless_tsv<T: DeserializeOwned>(
    path: &Path,
    columns: usize,
) -> Result<Vec<T>, TableParseError> {
    let display = path.display().to_string();
    let input = open_maybe_gzipped(path).map_err(|source| TableParseError::Open {
        path: display.clone(),
        source,
    })?;

    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(input);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|source| TableParseError::Row {
            path: display.clone(),
            source,
        })?;

        if record.len() != columns {
            return Err(TableParseError::ColumnCount {
                path: display,
                line: record.position().map(|p| p.line()).unwrap_or(0),
                expected: columns,
                found: record.len(),
            });
        }

        let row: T = record.deserialize(None).map_err(|source| TableParseError::Row {
            path: display.clone(),
            source,
        })?;
        rows.push(row);
    }

    Ok(rows)
}
