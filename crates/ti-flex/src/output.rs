//! `electrode_positions.json` writer.

use std::path::{Path, PathBuf};

use serde::Serialize;
use ti_core::{write_json_pretty, Leadfield, TiResult};

use crate::objective::decode;

#[derive(Debug, Serialize)]
struct ElectrodePositionsJson {
    optimized_positions: Vec<[f64; 3]>,
    channel_array_indices: Vec<[usize; 2]>,
}

/// Resolve the winning decision vector's four positions to physical
/// electrode indices and write the canonical JSON layout.
pub fn write_electrode_positions(dir: &Path, leadfield: &Leadfield, best_position: &[f64]) -> TiResult<PathBuf> {
    let decoded = decode(best_position);
    let nearest = |p: ti_core::Vec3| -> (usize, [f64; 3]) {
        let (idx, electrode) = leadfield
            .electrodes
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                a.position
                    .distance(p)
                    .partial_cmp(&b.position.distance(p))
                    .unwrap()
            })
            .unwrap();
        (idx, [electrode.position.x, electrode.position.y, electrode.position.z])
    };

    let (e1p, p0) = nearest(decoded.positions[0]);
    let (e1m, p1) = nearest(decoded.positions[1]);
    let (e2p, p2) = nearest(decoded.positions[2]);
    let (e2m, p3) = nearest(decoded.positions[3]);

    let doc = ElectrodePositionsJson {
        optimized_positions: vec![p0, p1, p2, p3],
        channel_array_indices: vec![[e1p, e1m], [e2p, e2m]],
    };
    let path = dir.join("electrode_positions.json");
    write_json_pretty(&path, &doc)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array3};
    use ti_core::{ElectrodeMeta, Mesh, Vec3};
    use tempfile::tempdir;

    fn toy_leadfield() -> Leadfield {
        let l = Array3::zeros((4, 1, 3));
        let mesh = Mesh::new(array![[0.0, 0.0, 0.0]], array![1.0], array![2]).unwrap();
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

    #[test]
    fn writes_expected_json_shape() {
        let leadfield = toy_leadfield();
        let dir = tempdir().unwrap();
        let x = vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0];
        let path = write_electrode_positions(dir.path(), &leadfield, &x).unwrap();
        let contents = std::fs::read_to_string(path).unwrap();
        assert!(contents.contains("optimized_positions"));
        assert!(contents.contains("channel_array_indices"));
    }
}
