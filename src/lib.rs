// ==============================================================================
// lib.rs - SnpSniffer Summary Library
// ==============================================================================
// Description: Library interface for SNP fingerprint QC summarization modules
// Author: Matt Barham
// Created: 2025-11-03
// Modified: 2025-11-14
// Version: 2.0.0
// ==============================================================================

pub mod config;
pub mod enrich;
pub mod models;
pub mod output;
pub mod parsers;
pub mod plots;
pub mod processor;
pub mod sample_id;
