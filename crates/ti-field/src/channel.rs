//! Channel field assembly: summing leadfield contributions from a set of
//! anode/cathode electrode indices at a given current.

use ndarray::Array2;
use ti_core::{Leadfield, TiError, TiResult, Vec3};

/// `current_A * (sum of anode field vectors - sum of cathode field
/// vectors)`, evaluated at every mesh element. Supports multi-pad
/// channels (more than one anode or cathode).
pub fn channel_field(
    leadfield: &Leadfield,
    anodes: &[usize],
    cathodes: &[usize],
    current_a: f64,
) -> TiResult<Array2<f64>> {
    if anodes.is_empty() && cathodes.is_empty() {
        return Err(TiError::InvalidInput(
            "channel_field requires at least one anode or cathode".into(),
        ));
    }
    let n = leadfield.num_elements();
    let e = leadfield.num_electrodes();
    for &idx in anodes.iter().chain(cathodes.iter()) {
        if idx >= e {
            return Err(TiError::DimensionMismatch(format!(
                "electrode index {idx} out of range for leadfield with {e} electrodes"
            )));
        }
    }
    let mut field = Array2::<f64>::zeros((n, 3));
    for &a in anodes {
        for elem in 0..n {
            let v = leadfield.field_vector(a, elem);
            field[[elem, 0]] += v.x;
            field[[elem, 1]] += v.y;
            field[[elem, 2]] += v.z;
        }
    }
    for &c in cathodes {
        for elem in 0..n {
            let v = leadfield.field_vector(c, elem);
            field[[elem, 0]] -= v.x;
            field[[elem, 1]] -= v.y;
            field[[elem, 2]] -= v.z;
        }
    }
    field.mapv_inplace(|x| x * current_a);
    Ok(field)
}

pub fn field_at(field: &Array2<f64>, elem: usize) -> Vec3 {
    Vec3::new(field[[elem, 0]], field[[elem, 1]], field[[elem, 2]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array3};
    use ti_core::{ElectrodeMeta, Mesh};

    fn toy_leadfield() -> Leadfield {
        // L[0] = [(1,0,0),(0,1,0)], L[1] = [(0,0,1),(1,1,0)]
        let l = Array3::from_shape_vec(
            (2, 2, 3),
            vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 0.0],
        )
        .unwrap();
        let mesh = Mesh::new(
            array![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]],
            array![1.0, 1.0],
            array![2, 1],
        )
        .unwrap();
        let electrodes = vec![
            ElectrodeMeta {
                label: "E1".into(),
                position: Vec3::default(),
            },
            ElectrodeMeta {
                label: "E2".into(),
                position: Vec3::default(),
            },
        ];
        Leadfield::new(l, mesh, electrodes).unwrap()
    }

    #[test]
    fn matches_hand_computed_channel_field() {
        let lf = toy_leadfield();
        let field = channel_field(&lf, &[0], &[1], 2.0).unwrap();
        assert_eq!(field_at(&field, 0), Vec3::new(2.0, 0.0, -2.0));
        assert_eq!(field_at(&field, 1), Vec3::new(-2.0, 0.0, 0.0));
    }

    #[test]
    fn is_linear_in_current() {
        let lf = toy_leadfield();
        let full = channel_field(&lf, &[0], &[1], 2.0).unwrap();
        let half = channel_field(&lf, &[0], &[1], 1.0).unwrap();
        for elem in 0..lf.num_elements() {
            let a = field_at(&full, elem);
            let b = field_at(&half, elem).scale(2.0);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn is_antisymmetric_in_anodes_and_cathodes() {
        let lf = toy_leadfield();
        let forward = channel_field(&lf, &[0], &[1], 2.0).unwrap();
        let swapped = channel_field(&lf, &[1], &[0], 2.0).unwrap();
        for elem in 0..lf.num_elements() {
            assert_eq!(field_at(&forward, elem), -field_at(&swapped, elem));
        }
    }

    #[test]
    fn rejects_out_of_range_electrode_index() {
        let lf = toy_leadfield();
        let err = channel_field(&lf, &[5], &[1], 1.0).unwrap_err();
        assert!(matches!(err, TiError::DimensionMismatch(_)));
    }
}
