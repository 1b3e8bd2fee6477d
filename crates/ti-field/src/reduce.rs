//! Volume-weighted ROI reduction.

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use ti_core::{RoiMask, TiError, TiResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoiMetrics {
    pub max: f64,
    pub volume_weighted_mean: f64,
    pub focality_ratio: f64,
    pub n_elements: usize,
}

fn weighted_mean(field: &[f64], mask: &RoiMask, volumes: &Array1<f64>) -> (f64, f64) {
    let mut max = f64::NEG_INFINITY;
    let mut weighted_sum = 0.0;
    let mut volume_sum = 0.0;
    let mut saw_nan = false;
    for &idx in &mask.indices {
        let value = field[idx as usize];
        let volume = volumes[idx as usize];
        if value.is_nan() {
            saw_nan = true;
        } else if value > max {
            max = value;
        }
        weighted_sum += volume * value;
        volume_sum += volume;
    }
    if saw_nan {
        tracing::warn!("reduce_roi saw NaN field values within the ROI");
        max = f64::NAN;
    }
    let mean = if volume_sum > 0.0 {
        weighted_sum / volume_sum
    } else {
        0.0
    };
    (max, mean)
}

/// Reduce `field` over `roi_mask`, computing `focality_ratio` against
/// `gm_mask` (typically [`ti_core::Leadfield::grey_matter_mask`]).
pub fn reduce_roi(
    field: &[f64],
    roi_mask: &RoiMask,
    gm_mask: &RoiMask,
    volumes: &Array1<f64>,
) -> TiResult<RoiMetrics> {
    if roi_mask.is_empty() {
        return Err(TiError::EmptyRoi("reduce_roi received an empty ROI mask".into()));
    }
    let max_index = roi_mask.indices.iter().chain(gm_mask.indices.iter()).max();
    if let Some(&idx) = max_index {
        if idx as usize >= field.len() || idx as usize >= volumes.len() {
            return Err(TiError::DimensionMismatch(format!(
                "mask index {idx} out of range for field of length {}",
                field.len()
            )));
        }
    }

    let (max, roi_mean) = weighted_mean(field, roi_mask, volumes);
    let (_, gm_mean) = weighted_mean(field, gm_mask, volumes);
    let focality_ratio = if gm_mean != 0.0 { roi_mean / gm_mean } else { 0.0 };

    Ok(RoiMetrics {
        max,
        volume_weighted_mean: roi_mean,
        focality_ratio,
        n_elements: roi_mask.len(),
    })
}
