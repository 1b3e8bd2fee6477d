//! Current-ratio grid generation.

use ti_core::{TiError, TiResult};

const EPS: f64 = 1e-9;

/// All `(I1, I2)` pairs with `I1 + I2 == total`, both positive, both
/// `<= limit`, spaced by `step`, generated in descending `I1` order
/// starting at `limit` down to `total - limit`.
pub fn generate_current_ratios(total_ma: f64, step_ma: f64, limit_ma: f64) -> TiResult<Vec<(f64, f64)>> {
    if step_ma <= 0.0 {
        return Err(TiError::InvalidInput(format!(
            "current_step_mA must be positive, got {step_ma}"
        )));
    }
    if limit_ma <= 0.0 || limit_ma > total_ma {
        return Err(TiError::InvalidInput(format!(
            "channel_limit_mA must be in (0, total_current_mA], got {limit_ma} with total {total_ma}"
        )));
    }
    let lowest_i1 = total_ma - limit_ma;
    if lowest_i1 <= 0.0 {
        return Err(TiError::InvalidInput(format!(
            "channel_limit_mA {limit_ma} leaves no positive current for the other channel at total {total_ma}"
        )));
    }
    let span = limit_ma - lowest_i1;
    let steps = (span / step_ma).round();
    if (steps * step_ma - span).abs() > 1e-6 * step_ma.max(1.0) {
        return Err(TiError::InvalidInput(format!(
            "current_step_mA {step_ma} does not evenly divide the range [{lowest_i1}, {limit_ma}]"
        )));
    }
    let count = steps as i64 + 1;
    let mut ratios = Vec::with_capacity(count.max(0) as usize);
    for i in 0..count {
        let i1 = limit_ma - i as f64 * step_ma;
        let i2 = total_ma - i1;
        if i1 <= EPS || i2 <= EPS || i1 > limit_ma + EPS || i2 > limit_ma + EPS {
            continue;
        }
        ratios.push((i1, i2));
    }
    Ok(ratios)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_spec_scenario_s4() {
        let ratios = generate_current_ratios(2.0, 0.2, 1.6).unwrap();
        let expected = vec![
            (1.6, 0.4),
            (1.4, 0.6),
            (1.2, 0.8),
            (1.0, 1.0),
            (0.8, 1.2),
            (0.6, 1.4),
            (0.4, 1.6),
        ];
        assert_eq!(ratios.len(), 7);
        for ((got1, got2), (exp1, exp2)) in ratios.iter().zip(expected.iter()) {
            assert!((got1 - exp1).abs() < 1e-9);
            assert!((got2 - exp2).abs() < 1e-9);
        }
    }

    #[test]
    fn every_pair_sums_to_total_within_tolerance() {
        let ratios = generate_current_ratios(2.0, 0.2, 1.6).unwrap();
        for (i1, i2) in ratios {
            assert!((i1 + i2 - 2.0).abs() < 1e-9);
            assert!(i1 > 0.0 && i1 <= 1.6 + 1e-9);
            assert!(i2 > 0.0 && i2 <= 1.6 + 1e-9);
        }
    }

    #[test]
    fn rejects_non_dividing_step() {
        let err = generate_current_ratios(2.0, 0.3, 1.6).unwrap_err();
        assert!(matches!(err, TiError::InvalidInput(_)));
    }

    #[test]
    fn rejects_limit_leaving_no_room_for_other_channel() {
        let err = generate_current_ratios(2.0, 0.2, 2.0).unwrap_err();
        assert!(matches!(err, TiError::InvalidInput(_)));
    }
}
