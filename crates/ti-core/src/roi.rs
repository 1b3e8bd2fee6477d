//! ROI resolution: turning a declarative [`RoiSpec`] into a concrete
//! [`RoiMask`] over mesh elements.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::error::{TiError, TiResult};
use crate::geometry::Vec3;
use crate::mesh::Mesh;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RoiSpec {
    /// All elements whose centroid lies within `radius_mm` of `center`,
    /// inclusive of the boundary (ties go to the sphere).
    Sphere { center: Vec3, radius_mm: f64 },
    /// All elements tagged with one of `labels` in an external atlas.
    SurfaceLabel { atlas: String, labels: Vec<i32> },
    /// All elements whose tissue tag is in `tags`.
    Volume { tags: Vec<i32> },
}

#[derive(Debug, Clone)]
pub struct RoiMask {
    /// Sorted, deduplicated mesh-element indices.
    pub indices: Vec<u32>,
    pub total_volume: f64,
}

impl RoiMask {
    pub fn from_indices(mut indices: Vec<u32>, volumes: &Array1<f64>) -> TiResult<Self> {
        if indices.is_empty() {
            return Err(TiError::EmptyRoi(
                "ROI resolved to zero mesh elements".into(),
            ));
        }
        indices.sort_unstable();
        indices.dedup();
        let total_volume = indices.iter().map(|&i| volumes[i as usize]).sum();
        Ok(Self {
            indices,
            total_volume,
        })
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Resolve `spec` against `mesh` into a concrete [`RoiMask`].
///
/// `SurfaceLabel` is resolved purely by tissue tag here: the external atlas
/// lookup (mapping label names to tag ids) happens one layer up in
/// `ti-io`, which hands this function the already-resolved numeric tags.
pub fn resolve(spec: &RoiSpec, mesh: &Mesh) -> TiResult<RoiMask> {
    let indices: Vec<u32> = match spec {
        RoiSpec::Sphere { center, radius_mm } => {
            if *radius_mm <= 0.0 {
                return Err(TiError::InvalidInput(format!(
                    "sphere radius must be positive, got {radius_mm}"
                )));
            }
            (0..mesh.len())
                .filter(|&i| mesh.centroid(i).distance(*center) <= *radius_mm)
                .map(|i| i as u32)
                .collect()
        }
        RoiSpec::SurfaceLabel { labels, .. } | RoiSpec::Volume { tags: labels } => mesh
            .tissue_tags
            .iter()
            .enumerate()
            .filter(|(_, tag)| labels.contains(tag))
            .map(|(i, _)| i as u32)
            .collect(),
    };
    RoiMask::from_indices(indices, &mesh.volumes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn toy_mesh() -> Mesh {
        Mesh::new(
            array![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [10.0, 0.0, 0.0],
                [2.0, 0.0, 0.0],
            ],
            array![1.0, 1.0, 1.0, 1.0],
            array![2, 1, 1, 1002],
        )
        .unwrap()
    }

    #[test]
    fn sphere_includes_boundary_tie() {
        let mesh = toy_mesh();
        let spec = RoiSpec::Sphere {
            center: Vec3::new(0.0, 0.0, 0.0),
            radius_mm: 1.0,
        };
        let mask = resolve(&spec, &mesh).unwrap();
        assert_eq!(mask.indices, vec![0, 1]);
    }

    #[test]
    fn sphere_excludes_elements_beyond_radius() {
        let mesh = toy_mesh();
        let spec = RoiSpec::Sphere {
            center: Vec3::new(0.0, 0.0, 0.0),
            radius_mm: 1.0,
        };
        let mask = resolve(&spec, &mesh).unwrap();
        assert!(!mask.indices.contains(&2));
    }

    #[test]
    fn empty_roi_is_a_hard_error() {
        let mesh = toy_mesh();
        let spec = RoiSpec::Sphere {
            center: Vec3::new(100.0, 100.0, 100.0),
            radius_mm: 1.0,
        };
        let err = resolve(&spec, &mesh).unwrap_err();
        assert!(matches!(err, TiError::EmptyRoi(_)));
    }

    #[test]
    fn volume_resolves_by_tissue_tag() {
        let mesh = toy_mesh();
        let spec = RoiSpec::Volume { tags: vec![2, 1002] };
        let mask = resolve(&spec, &mesh).unwrap();
        assert_eq!(mask.indices, vec![0, 3]);
    }
}
