//! Combustion phase and burn type
//!
//! Emission factors are tabulated per combustion stage. Flaming and
//! smoldering share one EF group per cover type; residual (long-term
//! smoldering of woody debris and duff) has its own pair of tables.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Combustion phase classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Active flaming combustion
    Flaming,
    /// Short-term smoldering following the flaming front
    Smoldering,
    /// Residual smoldering combustion (woody debris, duff)
    Residual,
}

impl Phase {
    /// All phases in combustion order
    pub const ALL: [Phase; 3] = [Phase::Flaming, Phase::Smoldering, Phase::Residual];

    /// Name as it appears in the reference tables
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Flaming => "flaming",
            Phase::Smoldering => "smoldering",
            Phase::Residual => "residual",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the three phase names
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown combustion phase '{0}'")]
pub struct UnknownPhase(pub String);

impl FromStr for Phase {
    type Err = UnknownPhase;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flaming" => Ok(Phase::Flaming),
            "smoldering" => Ok(Phase::Smoldering),
            "residual" => Ok(Phase::Residual),
            other => Err(UnknownPhase(other.to_owned())),
        }
    }
}

/// Prescribed burns and wildfires use different EF group columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BurnType {
    Wildfire,
    Prescribed,
}

impl BurnType {
    /// `true` maps to [`BurnType::Prescribed`]
    pub fn from_is_rx(is_rx: bool) -> Self {
        if is_rx {
            BurnType::Prescribed
        } else {
            BurnType::Wildfire
        }
    }

    pub fn is_rx(self) -> bool {
        self == BurnType::Prescribed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_names_parse_back() {
        for phase in Phase::ALL {
            assert_eq!(phase.as_str().parse::<Phase>(), Ok(phase));
        }
    }

    #[test]
    fn test_phase_parse_is_exact_match() {
        assert!("Flaming".parse::<Phase>().is_err());
        assert!(" residual".parse::<Phase>().is_err());
        assert_eq!(
            "smouldering".parse::<Phase>(),
            Err(UnknownPhase("smouldering".to_owned()))
        );
    }

    #[test]
    fn test_burn_type_from_flag() {
        assert_eq!(BurnType::from_is_rx(true), BurnType::Prescribed);
        assert_eq!(BurnType::from_is_rx(false), BurnType::Wildfire);
        assert!(BurnType::Prescribed.is_rx());
        assert!(!BurnType::Wildfire.is_rx());
    }
}
