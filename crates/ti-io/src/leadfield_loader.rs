//! Loads a `Leadfield` from a `TILF` container file.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use ndarray::{Array1, Array2, Array3};
use ti_core::{ElectrodeMeta, Leadfield, Mesh, TiError, TiResult, Vec3};

use crate::container::Container;

pub fn load(path: &Path) -> TiResult<Leadfield> {
    let file = File::open(path)
        .map_err(|e| TiError::NotFound(format!("cannot open leadfield '{}': {e}", path.display())))?;
    let container = Container::read(BufReader::new(file))?;
    load_from_container(&container)
}

fn load_from_container(container: &Container) -> TiResult<Leadfield> {
    let leadfield_section = container.get("/leadfield")?;
    let shape = &leadfield_section.shape;
    if shape.len() != 3 || shape[2] != 3 {
        return Err(TiError::InvalidShape(format!(
            "/leadfield must have shape (E, N, 3), got {shape:?}"
        )));
    }
    let (e, n) = (shape[0] as usize, shape[1] as usize);
    let l_flat = leadfield_section.as_f32()?;
    let l = Array3::from_shape_vec((e, n, 3), l_flat)
        .map_err(|err| TiError::InvalidShape(format!("/leadfield data does not match shape: {err}")))?;

    let positions_section = container.get("/positions")?;
    let positions_flat = positions_section.as_f64()?;
    let positions = Array2::from_shape_vec((n, 3), positions_flat)
        .map_err(|err| TiError::InvalidShape(format!("/positions data does not match shape: {err}")))?;

    let volumes_section = container.get("/volumes")?;
    let volumes = Array1::from_vec(volumes_section.as_f64()?);

    let tags_section = container.get("/tissue_tags")?;
    let tissue_tags = Array1::from_vec(tags_section.as_i32()?);

    let mesh = Mesh::new(positions, volumes, tissue_tags)?;

    let labels = container.get("/electrodes/labels")?.as_strings()?;
    let electrode_positions_flat = container.get("/electrodes/positions")?.as_f64()?;
    let electrode_positions = Array2::from_shape_vec((e, 3), electrode_positions_flat)
        .map_err(|err| {
            TiError::InvalidShape(format!("/electrodes/positions data does not match shape: {err}"))
        })?;

    let electrodes: Vec<ElectrodeMeta> = labels
        .into_iter()
        .enumerate()
        .map(|(i, label)| ElectrodeMeta {
            label,
            position: Vec3::new(
                electrode_positions[[i, 0]],
                electrode_positions[[i, 1]],
                electrode_positions[[i, 2]],
            ),
        })
        .collect();

    Leadfield::new(l, mesh, electrodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{f32_section, f64_section, i32_section, strings_section};
    use std::io::Cursor;

    fn sample_container() -> Container {
        let mut container = Container::new();
        container.insert(f32_section(
            "/leadfield",
            vec![2, 2, 3],
            &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 0.0],
        ));
        container.insert(f64_section(
            "/positions",
            vec![2, 3],
            &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0],
        ));
        container.insert(f64_section("/volumes", vec![2], &[1.0, 1.0]));
        container.insert(i32_section("/tissue_tags", vec![2], &[2, 1]));
        container.insert(strings_section(
            "/electrodes/labels",
            &["E1".to_string(), "E2".to_string()],
        ));
        container.insert(f64_section(
            "/electrodes/positions",
            vec![2, 3],
            &[0.0, 0.0, 1.0, 1.0, 0.0, 1.0],
        ));
        container
    }

    #[test]
    fn loads_valid_container_round_trip() {
        let container = sample_container();
        let mut buf = Vec::new();
        container.write(&mut buf).unwrap();
        let parsed = Container::read(Cursor::new(buf)).unwrap();
        let leadfield = load_from_container(&parsed).unwrap();
        assert_eq!(leadfield.num_electrodes(), 2);
        assert_eq!(leadfield.num_elements(), 2);
        assert_eq!(leadfield.electrodes[0].label, "E1");
    }

    #[test]
    fn rejects_missing_section() {
        let mut container = sample_container();
        // Force a different container without /volumes by rebuilding.
        let mut stripped = Container::new();
        for name in [
            "/leadfield",
            "/positions",
            "/tissue_tags",
            "/electrodes/labels",
            "/electrodes/positions",
        ] {
            if let Ok(section) = container.get(name) {
                stripped.insert(section.clone());
            }
        }
        container = stripped;
        let err = load_from_container(&container).unwrap_err();
        assert!(matches!(err, TiError::MissingField(_)));
    }
}
