//! Channel assignments: the electrode-pair/current representation shared
//! by ex-search enumeration and flex-search optimization.

use serde::{Deserialize, Serialize};

use crate::error::{TiError, TiResult};
use crate::units::Milliamperes;

/// A single TI current pair: current flows from `anode` to `cathode` at
/// `current`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElectrodePair {
    pub anode: String,
    pub cathode: String,
    pub current: Milliamperes,
}

impl ElectrodePair {
    pub fn new(anode: impl Into<String>, cathode: impl Into<String>, current: Milliamperes) -> TiResult<Self> {
        let anode = anode.into();
        let cathode = cathode.into();
        if anode == cathode {
            return Err(TiError::InvalidInput(format!(
                "electrode pair anode and cathode must differ, both are '{anode}'"
            )));
        }
        if current.0 <= 0.0 {
            return Err(TiError::InvalidInput(format!(
                "electrode pair current must be positive, got {}",
                current.0
            )));
        }
        Ok(Self {
            anode,
            cathode,
            current,
        })
    }
}

/// A full two-channel TI assignment. For standard TI, `channel_2` is
/// `Some`; `None` represents a degenerate single-channel run used only in
/// tests and diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelAssignment {
    pub channel_1: ElectrodePair,
    pub channel_2: ElectrodePair,
}

impl ChannelAssignment {
    pub fn new(channel_1: ElectrodePair, channel_2: ElectrodePair) -> TiResult<Self> {
        let labels = [
            &channel_1.anode,
            &channel_1.cathode,
            &channel_2.anode,
            &channel_2.cathode,
        ];
        for (i, a) in labels.iter().enumerate() {
            for b in labels.iter().skip(i + 1) {
                if a == b {
                    return Err(TiError::InvalidInput(format!(
                        "channel assignment reuses electrode '{a}' across pairs"
                    )));
                }
            }
        }
        Ok(Self {
            channel_1,
            channel_2,
        })
    }

    pub fn electrode_labels(&self) -> [&str; 4] {
        [
            self.channel_1.anode.as_str(),
            self.channel_1.cathode.as_str(),
            self.channel_2.anode.as_str(),
            self.channel_2.cathode.as_str(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(a: &str, b: &str, ma: f64) -> ElectrodePair {
        ElectrodePair::new(a, b, Milliamperes(ma)).unwrap()
    }

    #[test]
    fn rejects_same_anode_and_cathode() {
        let err = ElectrodePair::new("E1", "E1", Milliamperes(1.0)).unwrap_err();
        assert!(matches!(err, TiError::InvalidInput(_)));
    }

    #[test]
    fn rejects_non_positive_current() {
        let err = ElectrodePair::new("E1", "E2", Milliamperes(0.0)).unwrap_err();
        assert!(matches!(err, TiError::InvalidInput(_)));
    }

    #[test]
    fn rejects_electrode_reuse_across_channels() {
        let c1 = pair("E1", "E2", 2.0);
        let c2 = pair("E2", "E3", 2.0);
        let err = ChannelAssignment::new(c1, c2).unwrap_err();
        assert!(matches!(err, TiError::InvalidInput(_)));
    }

    #[test]
    fn accepts_disjoint_four_electrode_assignment() {
        let c1 = pair("E1", "E2", 2.0);
        let c2 = pair("E3", "E4", 2.0);
        let assignment = ChannelAssignment::new(c1, c2).unwrap();
        assert_eq!(
            assignment.electrode_labels(),
            ["E1", "E2", "E3", "E4"]
        );
    }
}
