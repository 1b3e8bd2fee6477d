//! Deterministic montage naming.

/// Unique key for one `(electrode tuple, current ratio)` trial, matching
/// the underlying mesh file's base name: `"<e1p>_<e1m>_and_<e2p>_<e2m>_I1-<i1>mA_I2-<i2>mA"`.
/// Folding the currents in keeps the key unique across the `|current_ratios|`
/// trials run per electrode tuple.
pub fn montage_key(
    e1_plus: &str,
    e1_minus: &str,
    e2_plus: &str,
    e2_minus: &str,
    current_ch1_ma: f64,
    current_ch2_ma: f64,
) -> String {
    format!(
        "{e1_plus}_{e1_minus}_and_{e2_plus}_{e2_minus}_I1-{current_ch1_ma:.1}mA_I2-{current_ch2_ma:.1}mA"
    )
}

/// Human-readable montage label for the CSV `Montage` column: the key
/// with `"_and_"` rendered as `" <> "`.
pub fn montage_display(key: &str) -> String {
    key.replace("_and_", " <> ")
}

/// The mesh/JSON key: `"TI_field_<key>.msh"`.
pub fn json_key(key: &str) -> String {
    format!("TI_field_{key}.msh")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn montage_key_folds_in_currents() {
        let a = montage_key("F3", "F4", "C3", "C4", 1.6, 0.4);
        let b = montage_key("F3", "F4", "C3", "C4", 1.2, 0.8);
        assert_ne!(a, b, "distinct current ratios must not collide");
        assert_eq!(a, "F3_F4_and_C3_C4_I1-1.6mA_I2-0.4mA");
    }

    #[test]
    fn montage_display_replaces_and_with_arrow() {
        assert_eq!(
            montage_display("F3_F4_and_C3_C4_I1-1.6mA_I2-0.4mA"),
            "F3_F4 <> C3_C4_I1-1.6mA_I2-0.4mA"
        );
    }

    #[test]
    fn json_key_wraps_montage_key() {
        assert_eq!(
            json_key("F3_F4_and_C3_C4_I1-1.6mA_I2-0.4mA"),
            "TI_field_F3_F4_and_C3_C4_I1-1.6mA_I2-0.4mA.msh"
        );
    }
}
