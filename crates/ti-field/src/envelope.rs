//! The TI envelope (maximum modulation amplitude) formula and its
//! directional and multi-TI variants.

use ndarray::Array2;
use ti_core::Vec3;

use crate::channel::field_at;

/// Grossman et al. 2017 maximum-modulation-amplitude formula for two
/// interfering field vectors. Polarity-invariant per channel: flipping
/// the sign of either input does not change the result.
fn max_modulation_amplitude(e1: Vec3, e2: Vec3) -> f64 {
    let (mut e1, mut e2) = (e1, e2);
    let mut m1 = e1.norm();
    let mut m2 = e2.norm();
    if m2 > m1 {
        std::mem::swap(&mut e1, &mut e2);
        std::mem::swap(&mut m1, &mut m2);
    }
    if m1 < 1e-12 {
        return 0.0;
    }
    let mut cos_alpha = if m2 > 1e-12 { e1.dot(e2) / (m1 * m2) } else { 0.0 };
    if cos_alpha < 0.0 {
        e2 = -e2;
        cos_alpha = -cos_alpha;
    }
    if m2 <= m1 * cos_alpha {
        2.0 * m2
    } else {
        let cross_mag = e1.cross(e2).norm();
        let diff_mag = (e1 - e2).norm();
        if diff_mag < 1e-12 {
            0.0
        } else {
            2.0 * cross_mag / diff_mag
        }
    }
}

/// Scalar (directional) counterpart of [`max_modulation_amplitude`]: two
/// colinear projections always satisfy `cos_alpha == +-1` after polarity
/// normalization, so the closed form degenerates to twice the smaller
/// magnitude; the sign of the dominant projection is kept so the result
/// stays directional (mirrors `TI_utils.get_dirTI`).
fn directional_envelope(d1: f64, d2: f64) -> f64 {
    let (mut a, mut b) = (d1, d2);
    if b.abs() > a.abs() {
        std::mem::swap(&mut a, &mut b);
    }
    if a * b < 0.0 {
        b = -b;
    }
    let sign = if a >= 0.0 { 1.0 } else { -1.0 };
    sign * 2.0 * b.abs().min(a.abs())
}

/// Per-element envelope magnitude for two channel fields.
pub fn ti_envelope(e1: &Array2<f64>, e2: &Array2<f64>) -> Vec<f64> {
    let n = e1.nrows();
    (0..n)
        .map(|i| {
            let v1 = field_at(e1, i);
            let v2 = field_at(e2, i);
            if v1.x.is_nan() || v1.y.is_nan() || v1.z.is_nan() || v2.x.is_nan() || v2.y.is_nan() || v2.z.is_nan() {
                tracing::warn!(element = i, "ti_envelope saw NaN input, propagating NaN");
                return f64::NAN;
            }
            max_modulation_amplitude(v1, v2)
        })
        .collect()
}

/// Directional projection of the TI envelope along per-element unit
/// normals.
pub fn ti_normal(e1: &Array2<f64>, e2: &Array2<f64>, normals: &Array2<f64>) -> Vec<f64> {
    let n = e1.nrows();
    (0..n)
        .map(|i| {
            let v1 = field_at(e1, i);
            let v2 = field_at(e2, i);
            let normal = field_at(normals, i);
            directional_envelope(v1.dot(normal), v2.dot(normal))
        })
        .collect()
}

/// Multi-TI: the elementwise maximum of two independently-computed TI
/// envelope fields. Not the same as computing a single envelope over
/// all four electrodes at once: each pair's envelope is taken first,
/// and only then are the two envelopes combined by maximum.
pub fn mti_max(ti_a: &[f64], ti_b: &[f64]) -> Vec<f64> {
    ti_a.iter()
        .zip(ti_b.iter())
        .map(|(&a, &b)| if a.is_nan() || b.is_nan() { f64::NAN } else { a.max(b) })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn orthogonal_equal_magnitude_pairs_match_hand_computation() {
        let e1 = array![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let e2 = array![[0.0, 1.0, 0.0], [1.0, 0.0, 0.0]];
        let envelope = ti_envelope(&e1, &e2);
        let expected = 2f64.sqrt();
        assert!((envelope[0] - expected).abs() < 1e-6);
        assert!((envelope[1] - expected).abs() < 1e-6);
    }

    #[test]
    fn envelope_is_polarity_invariant() {
        let e1 = array![[1.0, 0.5, 0.0]];
        let e2 = array![[0.3, -0.2, 0.1]];
        let neg_e2 = array![[-0.3, 0.2, -0.1]];
        let a = ti_envelope(&e1, &e2);
        let b = ti_envelope(&e1, &neg_e2);
        assert!((a[0] - b[0]).abs() < 1e-12);
    }

    #[test]
    fn nan_input_propagates_as_nan() {
        let e1 = array![[f64::NAN, 0.0, 0.0]];
        let e2 = array![[1.0, 0.0, 0.0]];
        let envelope = ti_envelope(&e1, &e2);
        assert!(envelope[0].is_nan());
    }

    #[test]
    fn mti_max_picks_larger_of_two_envelopes() {
        let a = vec![1.0, 5.0, 3.0];
        let b = vec![4.0, 2.0, 3.0];
        assert_eq!(mti_max(&a, &b), vec![4.0, 5.0, 3.0]);
    }

    #[test]
    fn directional_envelope_matches_aligned_scalar_case() {
        let e1 = array![[1.0, 0.0, 0.0]];
        let e2 = array![[1.0, 0.0, 0.0]];
        let normals = array![[1.0, 0.0, 0.0]];
        let dir = ti_normal(&e1, &e2, &normals);
        assert!((dir[0] - 2.0).abs() < 1e-12);
    }
}
