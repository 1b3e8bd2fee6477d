//! The leadfield dataset produced by loading a stimulation model.
//!
//! `Leadfield` is immutable once constructed: loading, subsetting, and
//! interpolation are deliberately kept out of this type so it stays
//! trivially testable and cache-friendly. Downstream components (ROI
//! resolution, field engine) borrow it by reference.

use std::collections::HashSet;

use ndarray::Array3;
use serde::{Deserialize, Serialize};

use crate::error::{TiError, TiResult};
use crate::geometry::Vec3;
use crate::mesh::Mesh;
use crate::roi::RoiMask;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElectrodeMeta {
    pub label: String,
    pub position: Vec3,
}

#[derive(Debug, Clone)]
pub struct Leadfield {
    /// `(E, N, 3)` dense tensor mapping unit electrode currents to field
    /// vectors at every mesh element.
    pub l: Array3<f32>,
    pub mesh: Mesh,
    pub electrodes: Vec<ElectrodeMeta>,
}

impl Leadfield {
    /// Construct and validate a leadfield:
    /// `E >= 2`, `N > 0`, all volumes positive (checked by [`Mesh::new`]),
    /// electrode labels unique, electrode count equal to `E`.
    pub fn new(l: Array3<f32>, mesh: Mesh, electrodes: Vec<ElectrodeMeta>) -> TiResult<Self> {
        let (e, n, axis) = (l.shape()[0], l.shape()[1], l.shape()[2]);
        if axis != 3 {
            return Err(TiError::InvalidShape(format!(
                "leadfield last axis must be 3, got {axis}"
            )));
        }
        if e < 2 {
            return Err(TiError::InvalidShape(format!(
                "leadfield must have at least 2 electrodes, got {e}"
            )));
        }
        if n == 0 {
            return Err(TiError::InvalidShape(
                "leadfield must have at least one mesh element".into(),
            ));
        }
        if n != mesh.len() {
            return Err(TiError::DimensionMismatch(format!(
                "leadfield mesh-element axis {n} does not match mesh length {}",
                mesh.len()
            )));
        }
        if electrodes.len() != e {
            return Err(TiError::DimensionMismatch(format!(
                "electrode count {} does not match leadfield electrode axis {e}",
                electrodes.len()
            )));
        }
        let mut seen = HashSet::with_capacity(electrodes.len());
        for electrode in &electrodes {
            if !seen.insert(electrode.label.as_str()) {
                return Err(TiError::InvalidFormat(format!(
                    "duplicate electrode label '{}'",
                    electrode.label
                )));
            }
        }
        Ok(Self { l, mesh, electrodes })
    }

    pub fn num_electrodes(&self) -> usize {
        self.l.shape()[0]
    }

    pub fn num_elements(&self) -> usize {
        self.l.shape()[1]
    }

    pub fn electrode_index(&self, label: &str) -> TiResult<usize> {
        self.electrodes
            .iter()
            .position(|e| e.label == label)
            .ok_or_else(|| TiError::NotFound(format!("electrode '{label}' not found")))
    }

    /// The unit-current field vector contributed by electrode `index` at
    /// mesh element `elem`.
    pub fn field_vector(&self, electrode_index: usize, elem: usize) -> Vec3 {
        Vec3::new(
            self.l[[electrode_index, elem, 0]] as f64,
            self.l[[electrode_index, elem, 1]] as f64,
            self.l[[electrode_index, elem, 2]] as f64,
        )
    }

    /// The grey-matter mask used as the default focality-ratio denominator.
    pub fn grey_matter_mask(&self) -> TiResult<RoiMask> {
        let indices = self.mesh.grey_matter_indices();
        RoiMask::from_indices(indices, &self.mesh.volumes)
    }
}
