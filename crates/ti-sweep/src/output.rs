//! Persisting a finished (or partially finished) sweep: JSON, plot, and
//! text summary, mirroring `save_results` in the reference
//! implementation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use plotters::prelude::*;
use serde::Serialize;
use ti_core::{write_json_pretty, TiResult};

use crate::grid::SweepPoint;
use crate::summary::generate_summary_text;

#[derive(Debug, Serialize)]
struct PointJson<'a> {
    roi_pct: f64,
    nonroi_pct: f64,
    roi_threshold_vm: f64,
    nonroi_threshold_vm: f64,
    focality_score: Option<f64>,
    status: &'a str,
    output_folder: &'a str,
}

#[derive(Debug, Serialize)]
struct ResultsJson<'a> {
    achievable_roi_mean_vm: f64,
    roi_pcts: Vec<f64>,
    nonroi_pcts: Vec<f64>,
    points: Vec<PointJson<'a>>,
}

pub struct SavedPaths {
    pub json_path: PathBuf,
    pub plot_path: PathBuf,
    pub summary_path: PathBuf,
}

/// Write `pareto_results.json`, `pareto_sweep_plot.png`, and
/// `pareto_summary.txt` into `output_folder`.
pub fn save_results(
    points: &[SweepPoint],
    achievable_roi_mean: f64,
    output_folder: &Path,
) -> TiResult<SavedPaths> {
    std::fs::create_dir_all(output_folder)?;

    let mut roi_pcts: Vec<f64> = points.iter().map(|p| p.roi_pct).collect();
    roi_pcts.dedup_by(|a, b| a == b);
    let mut nonroi_pcts: Vec<f64> = points.iter().map(|p| p.nonroi_pct).collect();
    nonroi_pcts.sort_by(|a, b| a.partial_cmp(b).unwrap());
    nonroi_pcts.dedup();

    let doc = ResultsJson {
        achievable_roi_mean_vm: achievable_roi_mean,
        roi_pcts: roi_pcts.clone(),
        nonroi_pcts: nonroi_pcts.clone(),
        points: points
            .iter()
            .map(|p| PointJson {
                roi_pct: p.roi_pct,
                nonroi_pct: p.nonroi_pct,
                roi_threshold_vm: p.roi_threshold_vm,
                nonroi_threshold_vm: p.nonroi_threshold_vm,
                focality_score: p.focality_score,
                status: p.status(),
                output_folder: &p.output_folder,
            })
            .collect(),
    };
    let json_path = output_folder.join("pareto_results.json");
    write_json_pretty(&json_path, &doc)?;

    let plot_path = output_folder.join("pareto_sweep_plot.png");
    generate_pareto_plot(points, &plot_path)?;

    let summary_path = output_folder.join("pareto_summary.txt");
    std::fs::write(&summary_path, generate_summary_text(points))?;

    Ok(SavedPaths {
        json_path,
        plot_path,
        summary_path,
    })
}

/// One scatter/line series per distinct `roi_pct`, x = `nonroi_pct`,
/// y = `focality_score`, restricted to points with `status == "done"`.
pub fn generate_pareto_plot(points: &[SweepPoint], output_path: &Path) -> TiResult<()> {
    let done: Vec<&SweepPoint> = points.iter().filter(|p| p.status() == "done").collect();

    let root = BitMapBackend::new(output_path, (960, 720)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| ti_core::TiError::Other(e.to_string()))?;

    let (x_min, x_max) = points
        .iter()
        .map(|p| p.nonroi_pct)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    let y_values: Vec<f64> = done.iter().filter_map(|p| p.focality_score).collect();
    let (y_min, y_max) = if y_values.is_empty() {
        (0.0, 1.0)
    } else {
        y_values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    };
    let pad = ((y_max - y_min).abs() * 0.1).max(1e-6);

    let mut chart = ChartBuilder::on(&root)
        .caption("Focality-Threshold Trade-off Sweep", ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d((x_min - 1.0)..(x_max + 1.0), (y_min - pad)..(y_max + pad))
        .map_err(|e| ti_core::TiError::Other(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc("Non-ROI %")
        .y_desc("Focality score")
        .draw()
        .map_err(|e| ti_core::TiError::Other(e.to_string()))?;

    let mut roi_groups: BTreeMap<u64, Vec<&SweepPoint>> = BTreeMap::new();
    for point in &done {
        roi_groups.entry(point.roi_pct.to_bits()).or_default().push(point);
    }

    let palette = [&RED, &BLUE, &GREEN, &MAGENTA, &CYAN, &BLACK];
    for (idx, (_, mut group)) in roi_groups.into_iter().enumerate() {
        group.sort_by(|a, b| a.nonroi_pct.partial_cmp(&b.nonroi_pct).unwrap());
        let color = palette[idx % palette.len()];
        let roi_pct = group[0].roi_pct;
        let series: Vec<(f64, f64)> = group
            .iter()
            .filter_map(|p| p.focality_score.map(|score| (p.nonroi_pct, score)))
            .collect();

        chart
            .draw_series(LineSeries::new(series.iter().copied(), color))
            .map_err(|e| ti_core::TiError::Other(e.to_string()))?
            .label(format!("ROI {roi_pct:.0}%"))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));

        chart
            .draw_series(series.iter().map(|&(x, y)| Circle::new((x, y), 4, color.filled())))
            .map_err(|e| ti_core::TiError::Other(e.to_string()))?;

        for point in &group {
            if let Some(score) = point.focality_score {
                chart
                    .draw_series(std::iter::once(Text::new(
                        format!("({:.0},{:.0})", point.roi_pct, point.nonroi_pct),
                        (point.nonroi_pct, score),
                        ("sans-serif", 12),
                    )))
                    .map_err(|e| ti_core::TiError::Other(e.to_string()))?;
            }
        }
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(|e| ti_core::TiError::Other(e.to_string()))?;

    root.present().map_err(|e| ti_core::TiError::Other(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::compute_sweep_grid;
    use tempfile::tempdir;

    #[test]
    fn writes_all_three_artifacts() {
        let mut points = compute_sweep_grid(&[80.0, 70.0], &[20.0, 30.0], 2.0, "/out");
        for p in points.iter_mut() {
            p.focality_score = Some(0.42);
            p.status = "done".into();
        }
        let dir = tempdir().unwrap();
        let saved = save_results(&points, 2.0, dir.path()).unwrap();
        assert!(saved.json_path.exists());
        assert!(saved.plot_path.exists());
        assert!(saved.summary_path.exists());
    }

    #[test]
    fn plot_tolerates_no_done_points() {
        let points = compute_sweep_grid(&[80.0], &[20.0], 2.0, "/out");
        let dir = tempdir().unwrap();
        let path = dir.path().join("plot.png");
        generate_pareto_plot(&points, &path).unwrap();
        assert!(path.exists());
    }
}
