//! Electrode-set helpers: mapping flex-search's continuous optimized
//! positions back to the nearest physical electrode label.

use ti_core::{ElectrodeMeta, Vec3};

/// Returns the label of the electrode in `electrodes` nearest to
/// `position`, along with the distance. Panics only if `electrodes` is
/// empty, which callers must guarantee (a `Leadfield` always has at
/// least two).
pub fn nearest_electrode<'a>(electrodes: &'a [ElectrodeMeta], position: Vec3) -> (&'a str, f64) {
    let mut best: Option<(&str, f64)> = None;
    for electrode in electrodes {
        let d = electrode.position.distance(position);
        if best.map(|(_, bd)| d < bd).unwrap_or(true) {
            best = Some((electrode.label.as_str(), d));
        }
    }
    best.expect("electrode set must be non-empty")
}
