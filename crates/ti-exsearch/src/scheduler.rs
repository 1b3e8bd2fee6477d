//! Exhaustive ex-search scheduler: Cartesian enumeration over
//! electrode label sets and current ratios, evaluated in parallel with
//! rayon while preserving enumeration order in the output.

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use serde::Serialize;

use ti_core::{ChannelAssignment, ElectrodePair, Leadfield, Milliamperes, ProgressSink, RoiMask, TiError, TiResult};
use ti_field::{channel_field, reduce_roi, ti_envelope};

use crate::config::ExSearchConfig;
use crate::montage::{montage_display, montage_key};
use crate::ratios::generate_current_ratios;

#[derive(Debug, Clone, Serialize)]
pub struct MontageRecord {
    /// Unique per-trial key (electrode tuple + current ratio); not a
    /// CSV/JSON-row field in its own right, used to key `analysis_results.json`.
    #[serde(skip)]
    pub key: String,
    #[serde(rename = "Montage")]
    pub montage: String,
    #[serde(rename = "Current_Ch1_mA")]
    pub current_ch1_ma: f64,
    #[serde(rename = "Current_Ch2_mA")]
    pub current_ch2_ma: f64,
    #[serde(rename = "TImax_ROI")]
    pub timax_roi: f64,
    #[serde(rename = "TImean_ROI")]
    pub timean_roi: f64,
    #[serde(rename = "TImean_GM")]
    pub timean_gm: f64,
    #[serde(rename = "Focality")]
    pub focality: f64,
    #[serde(rename = "Composite_Index")]
    pub composite_index: f64,
    #[serde(rename = "n_elements")]
    pub n_elements: usize,
}

impl MontageRecord {
    fn failed(key: String, montage: String, i1_ma: f64, i2_ma: f64) -> Self {
        Self {
            key,
            montage,
            current_ch1_ma: i1_ma,
            current_ch2_ma: i2_ma,
            timax_roi: f64::NAN,
            timean_roi: f64::NAN,
            timean_gm: f64::NAN,
            focality: f64::NAN,
            composite_index: f64::NEG_INFINITY,
            n_elements: 0,
        }
    }
}

struct Trial {
    e1_plus: usize,
    e1_minus: usize,
    e2_plus: usize,
    e2_minus: usize,
    i1_ma: f64,
    i2_ma: f64,
}

fn evaluate_trial(
    leadfield: &Leadfield,
    roi_mask: &RoiMask,
    gm_mask: &RoiMask,
    trial: &Trial,
    labels: (&str, &str, &str, &str),
) -> MontageRecord {
    let key = montage_key(labels.0, labels.1, labels.2, labels.3, trial.i1_ma, trial.i2_ma);
    let montage = montage_display(&key);
    let run = || -> TiResult<MontageRecord> {
        let e1 = channel_field(
            leadfield,
            &[trial.e1_plus],
            &[trial.e1_minus],
            Milliamperes(trial.i1_ma).to_amperes().0,
        )?;
        let e2 = channel_field(
            leadfield,
            &[trial.e2_plus],
            &[trial.e2_minus],
            Milliamperes(trial.i2_ma).to_amperes().0,
        )?;
        let field = ti_envelope(&e1, &e2);
        let roi_metrics = reduce_roi(&field, roi_mask, gm_mask, &leadfield.mesh.volumes)?;
        let gm_metrics = reduce_roi(&field, gm_mask, gm_mask, &leadfield.mesh.volumes)?;
        let composite = roi_metrics.volume_weighted_mean * roi_metrics.focality_ratio;
        Ok(MontageRecord {
            key: key.clone(),
            montage: montage.clone(),
            current_ch1_ma: trial.i1_ma,
            current_ch2_ma: trial.i2_ma,
            timax_roi: roi_metrics.max,
            timean_roi: roi_metrics.volume_weighted_mean,
            timean_gm: gm_metrics.volume_weighted_mean,
            focality: roi_metrics.focality_ratio,
            composite_index: composite,
            n_elements: roi_metrics.n_elements,
        })
    };
    match run() {
        Ok(record) => record,
        Err(err) if err.is_recoverable_per_trial() => {
            MontageRecord::failed(key, montage, trial.i1_ma, trial.i2_ma)
        }
        Err(err) => {
            tracing::warn!(error = %err, montage = %montage, "ex-search trial failed with a non-recoverable error, recording sentinel");
            MontageRecord::failed(key, montage, trial.i1_ma, trial.i2_ma)
        }
    }
}

/// Run the full ex-search sweep, returning the montage records in
/// enumeration order. Checks `sink.is_cancelled()` between batches of
/// evaluations; on cancellation, returns `Err(TiError::Cancelled)` after
/// the caller inspects whatever records have already been pushed via
/// `partial_out`.
pub fn run_ex_search(
    leadfield: &Leadfield,
    config: &ExSearchConfig,
    roi_mask: &RoiMask,
    sink: &dyn ProgressSink,
) -> TiResult<Vec<MontageRecord>> {
    config.validate()?;

    let gm_mask = leadfield.grey_matter_mask()?;
    let ratios = generate_current_ratios(config.total_current_ma, config.current_step_ma, config.channel_limit_ma)?;

    let mut combos: Vec<(&String, &String, &String, &String)> = Vec::with_capacity(config.total_combinations());
    for e1p in &config.e1_plus {
        for e1m in &config.e1_minus {
            for e2p in &config.e2_plus {
                for e2m in &config.e2_minus {
                    combos.push((e1p, e1m, e2p, e2m));
                }
            }
        }
    }

    // Reject electrode sets that reuse a physical electrode across the
    // two channels before scheduling any trial for the combo; the
    // current value here is a placeholder solely to satisfy
    // `ElectrodePair::new`'s positivity check, not the trial's real ratio.
    for (e1p, e1m, e2p, e2m) in &combos {
        let channel_1 = ElectrodePair::new((*e1p).clone(), (*e1m).clone(), Milliamperes(1.0))?;
        let channel_2 = ElectrodePair::new((*e2p).clone(), (*e2m).clone(), Milliamperes(1.0))?;
        ChannelAssignment::new(channel_1, channel_2)?;
    }

    let mut trials: Vec<Trial> = Vec::with_capacity(combos.len() * ratios.len());
    for (e1p, e1m, e2p, e2m) in &combos {
        let e1_plus = leadfield.electrode_index(e1p)?;
        let e1_minus = leadfield.electrode_index(e1m)?;
        let e2_plus = leadfield.electrode_index(e2p)?;
        let e2_minus = leadfield.electrode_index(e2m)?;
        for &(i1, i2) in &ratios {
            trials.push(Trial {
                e1_plus,
                e1_minus,
                e2_plus,
                e2_minus,
                i1_ma: i1,
                i2_ma: i2,
            });
        }
    }

    let total = trials.len();
    sink.info(&format!("ex-search: {total} evaluations queued"));

    let thread_count = if config.threads == 0 {
        num_cpus::get()
    } else {
        config.threads
    };
    let pool = ThreadPoolBuilder::new()
        .num_threads(thread_count)
        .build()
        .map_err(|e| TiError::Other(format!("failed to build ex-search thread pool: {e}")))?;

    // Evaluate in fixed-size chunks so cancellation is observed between
    // chunks rather than only once at the very end.
    const CHUNK: usize = 256;
    let mut records = Vec::with_capacity(total);
    let mut combo_labels = Vec::with_capacity(combos.len());
    for (e1p, e1m, e2p, e2m) in &combos {
        combo_labels.push((e1p.as_str(), e1m.as_str(), e2p.as_str(), e2m.as_str()));
    }
    let labels_per_trial: Vec<(&str, &str, &str, &str)> = combo_labels
        .iter()
        .flat_map(|&labels| std::iter::repeat(labels).take(ratios.len()))
        .collect();

    for (chunk_trials, chunk_labels) in trials.chunks(CHUNK).zip(labels_per_trial.chunks(CHUNK)) {
        if sink.is_cancelled() {
            sink.warn("ex-search cancelled; returning partial results");
            return Err(TiError::Cancelled);
        }
        let chunk_records: Vec<MontageRecord> = pool.install(|| {
            chunk_trials
                .par_iter()
                .zip(chunk_labels.par_iter())
                .map(|(trial, &labels)| evaluate_trial(leadfield, roi_mask, &gm_mask, trial, labels))
                .collect()
        });
        records.extend(chunk_records);
        sink.info(&format!("ex-search: {}/{total} evaluated", records.len()));
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array3};
    use ti_core::{ElectrodeMeta, Mesh, NullSink, RoiSpec, Vec3};

    fn toy_leadfield() -> Leadfield {
        let l = Array3::from_shape_vec(
            (4, 3, 3),
            vec![
                1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.2, 0.0, 0.0, // electrode 0
                0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.3, 0.0, // electrode 1
                0.0, 0.0, 1.0, 0.5, 0.5, 0.0, 0.1, 0.1, 0.0, // electrode 2
                0.3, 0.3, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.5, // electrode 3
            ],
        )
        .unwrap();
        let mesh = Mesh::new(
            array![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]],
            array![1.0, 1.0, 1.0],
            array![2, 1002, 1],
        )
        .unwrap();
        let electrodes = ["A", "B", "C", "D"]
            .iter()
            .map(|l| ElectrodeMeta {
                label: l.to_string(),
                position: Vec3::default(),
            })
            .collect();
        Leadfield::new(l, mesh, electrodes).unwrap()
    }

    #[test]
    fn produces_k4_times_ratio_count_records_in_order() {
        let leadfield = toy_leadfield();
        let config = ExSearchConfig {
            e1_plus: vec!["A".into()],
            e1_minus: vec!["B".into()],
            e2_plus: vec!["C".into()],
            e2_minus: vec!["D".into()],
            total_current_ma: 2.0,
            current_step_ma: 0.2,
            channel_limit_ma: 1.6,
            threads: 1,
        };
        let roi = ti_core::resolve_roi(
            &RoiSpec::Sphere {
                center: Vec3::new(0.0, 0.0, 0.0),
                radius_mm: 5.0,
            },
            &leadfield.mesh,
        )
        .unwrap();
        let sink = NullSink;
        let records = run_ex_search(&leadfield, &config, &roi, &sink).unwrap();
        assert_eq!(records.len(), 7);
        assert!(records[0].montage.starts_with("A_B <> C_D"));

        let unique_keys: std::collections::HashSet<&str> =
            records.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(unique_keys.len(), records.len(), "every trial must have a distinct key");
    }

    #[test]
    fn rejects_electrode_reused_across_channels() {
        let leadfield = toy_leadfield();
        let config = ExSearchConfig {
            e1_plus: vec!["A".into()],
            e1_minus: vec!["B".into()],
            e2_plus: vec!["A".into()],
            e2_minus: vec!["D".into()],
            total_current_ma: 2.0,
            current_step_ma: 0.2,
            channel_limit_ma: 1.6,
            threads: 1,
        };
        let roi = ti_core::resolve_roi(
            &RoiSpec::Sphere {
                center: Vec3::new(0.0, 0.0, 0.0),
                radius_mm: 5.0,
            },
            &leadfield.mesh,
        )
        .unwrap();
        let sink = NullSink;
        let err = run_ex_search(&leadfield, &config, &roi, &sink).unwrap_err();
        assert!(matches!(err, TiError::InvalidInput(_)));
    }

    #[test]
    fn cancellation_short_circuits_before_completion() {
        let leadfield = toy_leadfield();
        let config = ExSearchConfig {
            e1_plus: vec!["A".into()],
            e1_minus: vec!["B".into()],
            e2_plus: vec!["C".into()],
            e2_minus: vec!["D".into()],
            total_current_ma: 2.0,
            current_step_ma: 0.2,
            channel_limit_ma: 1.6,
            threads: 1,
        };
        let roi = ti_core::resolve_roi(
            &RoiSpec::Sphere {
                center: Vec3::new(0.0, 0.0, 0.0),
                radius_mm: 5.0,
            },
            &leadfield.mesh,
        )
        .unwrap();
        let sink = ti_core::StdoutSink::new();
        sink.cancellation_token().cancel();
        let err = run_ex_search(&leadfield, &config, &roi, &sink).unwrap_err();
        assert!(matches!(err, TiError::Cancelled));
    }
}
