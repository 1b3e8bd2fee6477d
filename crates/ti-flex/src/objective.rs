//! The flex-search decision variable and its cost functions.

use ti_core::{Leadfield, Milliamperes, RoiMask, TiError, TiResult, Vec3};
use ti_field::{channel_field, ti_envelope};

use crate::traits::BlackBoxObjective;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Goal {
    Mean,
    Max,
    Focality,
}

/// Decoded decision variable: four free electrode positions (mapped to
/// the nearest physical electrode at evaluation time) and two channel
/// currents in mA.
pub struct Decoded {
    pub positions: [Vec3; 4],
    pub current_ch1_ma: f64,
    pub current_ch2_ma: f64,
}

pub fn decode(x: &[f64]) -> Decoded {
    let pos = |i: usize| Vec3::new(x[i * 3], x[i * 3 + 1], x[i * 3 + 2]);
    Decoded {
        positions: [pos(0), pos(1), pos(2), pos(3)],
        current_ch1_ma: x[12],
        current_ch2_ma: x[13],
    }
}

fn nearest_electrode_index(leadfield: &Leadfield, position: Vec3) -> usize {
    leadfield
        .electrodes
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            a.position
                .distance(position)
                .partial_cmp(&b.position.distance(position))
                .unwrap()
        })
        .map(|(i, _)| i)
        .expect("leadfield must have at least one electrode")
}

pub struct FlexObjective<'a> {
    leadfield: &'a Leadfield,
    roi_mask: RoiMask,
    gm_mask: RoiMask,
    nonroi_mask_indices: Vec<u32>,
    goal: Goal,
    channel_limit_ma: f64,
    focality_thresholds: Option<(f64, f64)>,
    position_bounds: [(f64, f64); 3],
}

impl<'a> FlexObjective<'a> {
    pub fn new(
        leadfield: &'a Leadfield,
        roi_mask: RoiMask,
        goal: Goal,
        channel_limit_ma: f64,
        focality_thresholds: Option<(f64, f64)>,
    ) -> TiResult<Self> {
        if goal == Goal::Focality && focality_thresholds.is_none() {
            return Err(TiError::Config(
                "focality goal requires roi/nonroi thresholds".into(),
            ));
        }
        let gm_mask = leadfield.grey_matter_mask()?;
        let roi_set: std::collections::HashSet<u32> = roi_mask.indices.iter().copied().collect();
        let nonroi_mask_indices: Vec<u32> = gm_mask
            .indices
            .iter()
            .copied()
            .filter(|i| !roi_set.contains(i))
            .collect();

        let mut mins = [f64::INFINITY; 3];
        let mut maxs = [f64::NEG_INFINITY; 3];
        for electrode in &leadfield.electrodes {
            let p = [electrode.position.x, electrode.position.y, electrode.position.z];
            for axis in 0..3 {
                mins[axis] = mins[axis].min(p[axis]);
                maxs[axis] = maxs[axis].max(p[axis]);
            }
        }
        let position_bounds = [(mins[0], maxs[0]), (mins[1], maxs[1]), (mins[2], maxs[2])];

        Ok(Self {
            leadfield,
            roi_mask,
            gm_mask,
            nonroi_mask_indices,
            goal,
            channel_limit_ma,
            focality_thresholds,
            position_bounds,
        })
    }

    fn field_for(&self, decoded: &Decoded) -> TiResult<Vec<f64>> {
        let Decoded {
            positions,
            current_ch1_ma,
            current_ch2_ma,
        } = decoded;
        let e1p = nearest_electrode_index(self.leadfield, positions[0]);
        let e1m = nearest_electrode_index(self.leadfield, positions[1]);
        let e2p = nearest_electrode_index(self.leadfield, positions[2]);
        let e2m = nearest_electrode_index(self.leadfield, positions[3]);
        let chosen = [e1p, e1m, e2p, e2m];
        for i in 0..4 {
            for j in (i + 1)..4 {
                if chosen[i] == chosen[j] {
                    return Err(TiError::NumericalFailure(
                        "decision vector mapped two roles to the same physical electrode".into(),
                    ));
                }
            }
        }
        let e1 = channel_field(self.leadfield, &[e1p], &[e1m], Milliamperes(*current_ch1_ma).to_amperes().0)?;
        let e2 = channel_field(self.leadfield, &[e2p], &[e2m], Milliamperes(*current_ch2_ma).to_amperes().0)?;
        Ok(ti_envelope(&e1, &e2))
    }

    fn cost_from_field(&self, field: &[f64]) -> TiResult<f64> {
        match self.goal {
            Goal::Mean => {
                let metrics = ti_field::reduce_roi(field, &self.roi_mask, &self.gm_mask, &self.leadfield.mesh.volumes)?;
                Ok(-metrics.volume_weighted_mean)
            }
            Goal::Max => {
                let metrics = ti_field::reduce_roi(field, &self.roi_mask, &self.gm_mask, &self.leadfield.mesh.volumes)?;
                Ok(-metrics.max)
            }
            Goal::Focality => {
                let (roi_thr, nonroi_thr) = self
                    .focality_thresholds
                    .expect("validated present at construction");
                let volumes = &self.leadfield.mesh.volumes;
                let roi_penalty: f64 = self
                    .roi_mask
                    .indices
                    .iter()
                    .filter(|&&i| field[i as usize] < roi_thr)
                    .map(|&i| volumes[i as usize])
                    .sum();
                let nonroi_penalty: f64 = self
                    .nonroi_mask_indices
                    .iter()
                    .filter(|&&i| field[i as usize] > nonroi_thr)
                    .map(|&i| volumes[i as usize])
                    .sum();
                Ok(roi_penalty + nonroi_penalty)
            }
        }
    }
}

impl<'a> BlackBoxObjective for FlexObjective<'a> {
    fn evaluate(&self, x: &[f64]) -> TiResult<f64> {
        let decoded = decode(x);
        let field = self.field_for(&decoded)?;
        self.cost_from_field(&field)
    }

    fn dimension(&self) -> usize {
        14
    }

    fn bounds(&self) -> Vec<(f64, f64)> {
        let mut bounds = Vec::with_capacity(14);
        for _ in 0..4 {
            bounds.extend_from_slice(&self.position_bounds);
        }
        bounds.push((1e-6, self.channel_limit_ma));
        bounds.push((1e-6, self.channel_limit_ma));
        bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array3};
    use ti_core::{ElectrodeMeta, Mesh, RoiSpec};

    fn toy_leadfield() -> Leadfield {
        let l = Array3::from_shape_vec(
            (4, 3, 3),
            vec![
                1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.2, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0,
                0.3, 0.0, 0.0, 0.0, 1.0, 0.5, 0.5, 0.0, 0.1, 0.1, 0.0, 0.3, 0.3, 0.0, 0.0, 0.0,
                1.0, 0.0, 0.0, 0.5,
            ],
        )
        .unwrap();
        let mesh = Mesh::new(
            array![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]],
            array![1.0, 1.0, 1.0],
            array![2, 1002, 1],
        )
        .unwrap();
        let electrodes = [
            (0.0, 0.0, 0.0),
            (1.0, 0.0, 0.0),
            (0.0, 1.0, 0.0),
            (1.0, 1.0, 0.0),
        ]
        .iter()
        .enumerate()
        .map(|(i, &(x, y, z))| ElectrodeMeta {
            label: format!("E{i}"),
            position: Vec3::new(x, y, z),
        })
        .collect();
        Leadfield::new(l, mesh, electrodes).unwrap()
    }

    fn roi(leadfield: &Leadfield) -> RoiMask {
        ti_core::resolve_roi(
            &RoiSpec::Sphere {
                center: Vec3::new(0.0, 0.0, 0.0),
                radius_mm: 5.0,
            },
            &leadfield.mesh,
        )
        .unwrap()
    }

    #[test]
    fn mean_goal_evaluates_to_negative_mean() {
        let leadfield = toy_leadfield();
        let objective = FlexObjective::new(&leadfield, roi(&leadfield), Goal::Mean, 2.0, None).unwrap();
        let x = vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0];
        let cost = objective.evaluate(&x).unwrap();
        assert!(cost <= 0.0);
    }

    #[test]
    fn focality_goal_requires_thresholds() {
        let leadfield = toy_leadfield();
        let err = FlexObjective::new(&leadfield, roi(&leadfield), Goal::Focality, 2.0, None).unwrap_err();
        assert!(matches!(err, TiError::Config(_)));
    }

    #[test]
    fn mapping_two_roles_to_same_electrode_is_recoverable_failure() {
        let leadfield = toy_leadfield();
        let objective = FlexObjective::new(&leadfield, roi(&leadfield), Goal::Mean, 2.0, None).unwrap();
        // All four positions map to electrode 0.
        let x = vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0];
        let err = objective.evaluate(&x).unwrap_err();
        assert!(err.is_recoverable_per_trial());
    }
}
