// ==============================================================================
// plots.rs - Diagnostic Plots
// ==============================================================================
// Description: SVG scatter plots of match ratios and heterozygosity rates
// Author: Matt Barham
// Created: 2025-11-14
// Modified: 2025-11-14
// Version: 1.0.0
// ==============================================================================

use anyhow::{Context, Result};
use plotters::prelude::*;
use std::path::Path;
use tracing::info;

use crate::models::{EnrichedHetRecord, EnrichedPair, MatchFlag, Subgroup, Thresholds};

const PLOT_SIZE: (u32, u32) = (1000, 700);
const POINT_RADIUS: i32 = 4;
/// Headroom above the largest ratio (1.0) so points on the edge stay visible
const Y_MAX: f64 = 1.05;

fn match_flag_color(flag: MatchFlag) -> RGBColor {
    match flag {
        MatchFlag::Pass => RGBColor(46, 139, 87),
        MatchFlag::Fail => RGBColor(200, 30, 45),
        MatchFlag::Warning => RGBColor(240, 160, 20),
        MatchFlag::Error => RGBColor(90, 90, 90),
    }
}

fn subgroup_color(subgroup: Subgroup) -> RGBColor {
    match subgroup {
        Subgroup::Constitutional => RGBColor(30, 90, 200),
        Subgroup::Tumor => RGBColor(200, 30, 45),
        Subgroup::Other => RGBColor(90, 90, 90),
    }
}

/// Upper bound of the call-count axis: the larger of the data and the panel size
fn x_axis_max(max_calls: Option<u64>, genotypes_tested: u64) -> f64 {
    let max = max_calls.unwrap_or(0).max(genotypes_tested).max(1);
    max as f64 * 1.05
}

/// Scatter of shared calls vs match ratio, one series per MatchFlag.
///
/// Reference lines mark the low/high match thresholds and the number of
/// genotypes tested. Rows with a NaN ratio are not drawn.
pub fn plot_match_ratios(
    path: &Path,
    pairs: &[EnrichedPair],
    thresholds: &Thresholds,
) -> Result<()> {
    let x_max = x_axis_max(
        pairs.iter().map(|p| p.record.shared_calls).max(),
        thresholds.genotypes_tested,
    );
    let genotypes_tested = thresholds.genotypes_tested as f64;

    let root = SVGBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("SNPSniffer pairwise match ratio", ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..x_max, 0f64..Y_MAX)?;

    chart
        .configure_mesh()
        .x_desc("Shared calls")
        .y_desc("Match ratio")
        .draw()?;

    for (label, value, color) in [
        ("High match threshold", thresholds.high_match, BLACK),
        ("Low match threshold", thresholds.low_match, RGBColor(128, 128, 128)),
    ] {
        chart
            .draw_series(LineSeries::new(
                vec![(0.0, value), (x_max, value)],
                color.stroke_width(1),
            ))?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    chart
        .draw_series(LineSeries::new(
            vec![(genotypes_tested, 0.0), (genotypes_tested, Y_MAX)],
            BLUE.stroke_width(1),
        ))?
        .label("Genotypes tested")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.stroke_width(2)));

    for flag in MatchFlag::ALL {
        let color = match_flag_color(flag);
        let points: Vec<(f64, f64)> = pairs
            .iter()
            .filter(|p| p.match_flag == flag && p.record.match_ratio.is_finite())
            .map(|p| (p.record.shared_calls as f64, p.record.match_ratio))
            .collect();

        chart
            .draw_series(
                points
                    .iter()
                    .map(|&point| Circle::new(point, POINT_RADIUS, color.filled())),
            )?
            .label(flag.as_str())
            .legend(move |(x, y)| Circle::new((x, y), POINT_RADIUS, color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()
        .with_context(|| format!("Failed to write plot: {}", path.display()))?;

    info!("Match ratio plot written: {}", path.display());
    Ok(())
}

/// Scatter of total calls vs heterozygosity rate, one series per Subgroup
pub fn plot_het_rates(
    path: &Path,
    rows: &[EnrichedHetRecord],
    thresholds: &Thresholds,
) -> Result<()> {
    let x_max = x_axis_max(
        rows.iter().map(|r| r.record.total).max(),
        thresholds.genotypes_tested,
    );
    let genotypes_tested = thresholds.genotypes_tested as f64;

    let root = SVGBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("SNPSniffer heterozygosity rate", ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..x_max, 0f64..Y_MAX)?;

    chart
        .configure_mesh()
        .x_desc("Total calls")
        .y_desc("Heterozygosity rate")
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            vec![(0.0, thresholds.het), (x_max, thresholds.het)],
            BLACK.stroke_width(1),
        ))?
        .label("Het threshold")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK.stroke_width(2)));

    chart
        .draw_series(LineSeries::new(
            vec![(genotypes_tested, 0.0), (genotypes_tested, Y_MAX)],
            BLUE.stroke_width(1),
        ))?
        .label("Genotypes tested")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.stroke_width(2)));

    for subgroup in [Subgroup::Constitutional, Subgroup::Tumor, Subgroup::Other] {
        let color = subgroup_color(subgroup);
        let points: Vec<(f64, f64)> = rows
            .iter()
            .filter(|r| r.subgroup == subgroup && r.record.het_ratio.is_finite())
            .map(|r| (r.record.total as f64, r.record.het_ratio))
            .collect();

        chart
            .draw_series(
                points
                    .iter()
                    .map(|&point| Circle::new(point, POINT_RADIUS, color.filled())),
            )?
            .label(subgroup.as_str())
            .legend(move |(x, y)| Circle::new((x, y), POINT_RADIUS, color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()
        .with_context(|| format!("Failed to write plot: {}", path.display()))?;

    info!("Heterozygosity plot written: {}", path.display());
    Ok(())
}
