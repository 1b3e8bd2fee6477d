//! Pareto sweep grid construction and validation, ported from
//! `compute_sweep_grid`/`validate_grid` in the reference implementation
//! nearly verbatim.

use serde::{Deserialize, Serialize};
use ti_core::{TiError, TiResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepStatus {
    Pending,
    Running,
    Done,
    Failed,
}

impl SweepStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SweepStatus::Pending => "pending",
            SweepStatus::Running => "running",
            SweepStatus::Done => "done",
            SweepStatus::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepPoint {
    pub roi_pct: f64,
    pub nonroi_pct: f64,
    pub roi_threshold_vm: f64,
    pub nonroi_threshold_vm: f64,
    pub run_index: usize,
    pub output_folder: String,
    pub focality_score: Option<f64>,
    pub status: String,
}

impl SweepPoint {
    pub fn status(&self) -> &str {
        self.status.as_str()
    }
}

/// Reject the entire grid (no runs started) if any pair has
/// `nonroi_pct >= roi_pct`. Lists every invalid pair in the error.
pub fn validate_grid(roi_pcts: &[f64], nonroi_pcts: &[f64]) -> TiResult<()> {
    let mut bad = Vec::new();
    for &roi in roi_pcts {
        for &nonroi in nonroi_pcts {
            if nonroi >= roi {
                bad.push((roi, nonroi));
            }
        }
    }
    if !bad.is_empty() {
        let pairs: Vec<String> = bad.iter().map(|(r, n)| format!("({r}, {n})")).collect();
        return Err(TiError::InvalidInput(format!(
            "Non-ROI % must be strictly less than ROI % for all combinations. Invalid pairs: [{}]",
            pairs.join(", ")
        )));
    }
    Ok(())
}

/// Cartesian product, `roi_pcts` outer loop, `nonroi_pcts` inner loop.
/// Directory names: `{idx+1:02}_roi{roi_pct}_nonroi{nonroi_pct}`.
pub fn compute_sweep_grid(
    roi_pcts: &[f64],
    nonroi_pcts: &[f64],
    achievable_roi_mean: f64,
    base_output_folder: &str,
) -> Vec<SweepPoint> {
    let mut points = Vec::with_capacity(roi_pcts.len() * nonroi_pcts.len());
    let mut idx = 0usize;
    for &roi_pct in roi_pcts {
        for &nonroi_pct in nonroi_pcts {
            let roi_threshold_vm = (roi_pct / 100.0) * achievable_roi_mean;
            let nonroi_threshold_vm = (nonroi_pct / 100.0) * achievable_roi_mean;
            let folder_name = format!(
                "{:02}_roi{}_nonroi{}",
                idx + 1,
                roi_pct as i64,
                nonroi_pct as i64
            );
            points.push(SweepPoint {
                roi_pct,
                nonroi_pct,
                roi_threshold_vm,
                nonroi_threshold_vm,
                run_index: idx,
                output_folder: format!("{base_output_folder}/{folder_name}"),
                focality_score: None,
                status: SweepStatus::Pending.as_str().to_string(),
            });
            idx += 1;
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_spec_scenario_s5_single_pair() {
        let err = validate_grid(&[50.0], &[50.0]).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("(50, 50)"));
    }

    #[test]
    fn matches_spec_scenario_s5_strict_inequality() {
        let err = validate_grid(&[40.0], &[60.0]).unwrap_err();
        assert!(err.to_string().contains("(40, 60)"));
    }

    #[test]
    fn matches_spec_scenario_s5_multiple_bad_pairs() {
        let err = validate_grid(&[80.0, 70.0], &[20.0, 80.0]).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("(80, 80)"));
        assert!(msg.contains("(70, 80)"));
    }

    #[test]
    fn accepts_strictly_decreasing_grid() {
        validate_grid(&[80.0, 70.0], &[20.0, 30.0]).unwrap();
    }

    #[test]
    fn matches_spec_scenario_s6_grid_construction() {
        let points = compute_sweep_grid(&[80.0, 70.0], &[20.0, 30.0], 2.0, "/out");
        assert_eq!(points.len(), 4);
        let expected = [
            (80.0, 20.0, 1.6, 0.4, "01_roi80_nonroi20"),
            (80.0, 30.0, 1.6, 0.6, "02_roi80_nonroi30"),
            (70.0, 20.0, 1.4, 0.4, "03_roi70_nonroi20"),
            (70.0, 30.0, 1.4, 0.6, "04_roi70_nonroi30"),
        ];
        for (point, (roi, nonroi, roi_thr, nonroi_thr, folder)) in points.iter().zip(expected.iter()) {
            assert_eq!(point.roi_pct, *roi);
            assert_eq!(point.nonroi_pct, *nonroi);
            assert!((point.roi_threshold_vm - roi_thr).abs() < 1e-9);
            assert!((point.nonroi_threshold_vm - nonroi_thr).abs() < 1e-9);
            assert!(point.output_folder.ends_with(folder));
        }
    }
}
