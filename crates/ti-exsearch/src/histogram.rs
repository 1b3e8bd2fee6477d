//! Optional histogram of `TImax_ROI`/`TImean_ROI` across all montages,
//! mirroring the original's matplotlib step in `ex_analyzer.py`. This is
//! ambient output, not a correctness surface: a render failure is logged
//! and does not fail the ex-search run.

use std::path::{Path, PathBuf};

use plotters::prelude::*;
use ti_core::{TiError, TiResult};

use crate::scheduler::MontageRecord;

fn plot_err<E: std::fmt::Display>(e: E) -> TiError {
    TiError::Other(e.to_string())
}

/// Render `montage_distributions.png`: side-by-side histograms of
/// `TImax_ROI` and `TImean_ROI` over all successfully evaluated
/// montages (sentinel/failed rows, whose metrics are `NaN`, are
/// excluded). Returns `Ok(None)` rather than an error if there are no
/// finite values to plot.
pub fn write_montage_distributions(dir: &Path, records: &[MontageRecord]) -> TiResult<Option<PathBuf>> {
    let timax: Vec<f64> = records.iter().map(|r| r.timax_roi).filter(|v| v.is_finite()).collect();
    let timean: Vec<f64> = records.iter().map(|r| r.timean_roi).filter(|v| v.is_finite()).collect();
    if timax.is_empty() && timean.is_empty() {
        return Ok(None);
    }

    let path = dir.join("montage_distributions.png");
    let root = BitMapBackend::new(&path, (1280, 480)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;
    let (left, right) = root.split_horizontally(640);

    draw_histogram(&left, "TImax_ROI (V/m)", &timax)?;
    draw_histogram(&right, "TImean_ROI (V/m)", &timean)?;

    root.present().map_err(plot_err)?;
    Ok(Some(path))
}

fn draw_histogram(
    area: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    title: &str,
    values: &[f64],
) -> TiResult<()> {
    if values.is_empty() {
        return Ok(());
    }
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let span = (max - min).max(1e-9);
    const BINS: usize = 20;
    let bin_width = span / BINS as f64;

    let mut counts = vec![0u32; BINS];
    for &v in values {
        let idx = (((v - min) / bin_width) as usize).min(BINS - 1);
        counts[idx] += 1;
    }
    let max_count = counts.iter().copied().max().unwrap_or(1).max(1);

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 18))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(30)
        .build_cartesian_2d(min..max, 0u32..(max_count + 1))
        .map_err(plot_err)?;

    chart.configure_mesh().draw().map_err(plot_err)?;

    chart
        .draw_series(counts.iter().enumerate().map(|(i, &count)| {
            let x0 = min + i as f64 * bin_width;
            let x1 = x0 + bin_width;
            Rectangle::new([(x0, 0), (x1, count)], BLUE.filled())
        }))
        .map_err(plot_err)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(timax: f64, timean: f64) -> MontageRecord {
        MontageRecord {
            key: "A_B_and_C_D_I1-1.0mA_I2-1.0mA".into(),
            montage: "A_B <> C_D".into(),
            current_ch1_ma: 1.0,
            current_ch2_ma: 1.0,
            timax_roi: timax,
            timean_roi: timean,
            timean_gm: timean * 0.5,
            focality: 1.5,
            composite_index: timean * 1.5,
            n_elements: 10,
        }
    }

    #[test]
    fn writes_png_when_finite_values_present() {
        let records = vec![record(0.3, 0.2), record(0.5, 0.35), record(0.1, 0.05)];
        let dir = tempdir().unwrap();
        let path = write_montage_distributions(dir.path(), &records).unwrap();
        assert!(path.is_some());
        assert!(path.unwrap().exists());
    }

    #[test]
    fn skips_rendering_when_all_values_are_nan() {
        let records = vec![MontageRecord {
            key: "A_B_and_C_D_I1-1.0mA_I2-1.0mA".into(),
            montage: "A_B <> C_D".into(),
            current_ch1_ma: 1.0,
            current_ch2_ma: 1.0,
            timax_roi: f64::NAN,
            timean_roi: f64::NAN,
            timean_gm: f64::NAN,
            focality: f64::NAN,
            composite_index: f64::NEG_INFINITY,
            n_elements: 0,
        }];
        let dir = tempdir().unwrap();
        let result = write_montage_distributions(dir.path(), &records).unwrap();
        assert!(result.is_none());
    }
}
