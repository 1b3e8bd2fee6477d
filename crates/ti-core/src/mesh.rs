//! Mesh geometry: per-element centroids, volumes, and tissue tags.
//!
//! Co-indexed with the second axis of the leadfield tensor `L`. Kept as its
//! own type (rather than folded entirely into [`crate::leadfield::Leadfield`])
//! because ROI resolution only ever needs geometry, never the tensor itself.

use crate::error::{TiError, TiResult};
use crate::geometry::Vec3;
use ndarray::{Array1, Array2};

/// Grey matter tissue tags, following the SimNIBS convention (GM surface
/// tag 2, GM volume tag 1002) used by the original TI-Toolbox reference
/// implementation this core replaces.
pub const GREY_MATTER_TAGS: [i32; 2] = [2, 1002];

#[derive(Debug, Clone)]
pub struct Mesh {
    /// `(N, 3)` element centroids.
    pub positions: Array2<f64>,
    /// `(N,)` element volumes; every entry must be strictly positive.
    pub volumes: Array1<f64>,
    /// `(N,)` per-element tissue tags.
    pub tissue_tags: Array1<i32>,
}

impl Mesh {
    pub fn new(
        positions: Array2<f64>,
        volumes: Array1<f64>,
        tissue_tags: Array1<i32>,
    ) -> TiResult<Self> {
        let n = positions.shape()[0];
        if positions.shape()[1] != 3 {
            return Err(TiError::InvalidShape(format!(
                "positions must be (N, 3), got (N, {})",
                positions.shape()[1]
            )));
        }
        if volumes.len() != n {
            return Err(TiError::DimensionMismatch(format!(
                "volumes length {} does not match position count {}",
                volumes.len(),
                n
            )));
        }
        if tissue_tags.len() != n {
            return Err(TiError::DimensionMismatch(format!(
                "tissue_tags length {} does not match position count {}",
                tissue_tags.len(),
                n
            )));
        }
        if let Some(bad) = volumes.iter().position(|&v| !(v > 0.0)) {
            return Err(TiError::InvalidShape(format!(
                "volume at element {bad} is not strictly positive"
            )));
        }
        Ok(Self {
            positions,
            volumes,
            tissue_tags,
        })
    }

    pub fn len(&self) -> usize {
        self.positions.shape()[0]
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn centroid(&self, index: usize) -> Vec3 {
        Vec3::new(
            self.positions[[index, 0]],
            self.positions[[index, 1]],
            self.positions[[index, 2]],
        )
    }

    /// Indices whose tissue tag is a grey-matter tag (§4.1 supplement).
    pub fn grey_matter_indices(&self) -> Vec<u32> {
        self.tissue_tags
            .iter()
            .enumerate()
            .filter(|(_, tag)| GREY_MATTER_TAGS.contains(tag))
            .map(|(i, _)| i as u32)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn rejects_non_positive_volume() {
        let positions = array![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]];
        let volumes = array![1.0, 0.0];
        let tags = array![1, 2];
        let err = Mesh::new(positions, volumes, tags).unwrap_err();
        assert!(matches!(err, TiError::InvalidShape(_)));
    }

    #[test]
    fn grey_matter_indices_match_tags() {
        let positions = array![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]];
        let volumes = array![1.0, 1.0, 1.0];
        let tags = array![1, 2, 1002];
        let mesh = Mesh::new(positions, volumes, tags).unwrap();
        assert_eq!(mesh.grey_matter_indices(), vec![1, 2]);
    }
}
