//! Per-level allocation weights, in basis points.
//!
//! `10_000` bps is the whole balance. A level without an explicit weight
//! falls back to [`FALLBACK_WEIGHT_BPS`]. Validation bounds the *effective*
//! total (explicit weights plus fallbacks for the remaining levels), so an
//! allocation can never hand out more than the balance.

use birthright_types::GovernmentLevel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::GovernanceError;

/// Basis points in a whole balance.
pub const BPS_SCALE: u32 = 10_000;

/// Weight applied to a level missing from the map (0.05).
pub const FALLBACK_WEIGHT_BPS: u32 = 500;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelWeights {
    weights_bps: BTreeMap<GovernmentLevel, u32>,
}

impl LevelWeights {
    /// Build from explicit basis-point weights.
    pub fn new(
        weights: impl IntoIterator<Item = (GovernmentLevel, u32)>,
    ) -> Result<Self, GovernanceError> {
        let weights = Self {
            weights_bps: weights.into_iter().collect(),
        };
        weights.validate()?;
        Ok(weights)
    }

    /// Build from fractional weights in `[0, 1]`, rounded to the nearest bps.
    pub fn from_ratios(
        ratios: impl IntoIterator<Item = (GovernmentLevel, f64)>,
    ) -> Result<Self, GovernanceError> {
        let mut weights_bps = BTreeMap::new();
        for (level, ratio) in ratios {
            if !ratio.is_finite() || !(0.0..=1.0).contains(&ratio) {
                return Err(GovernanceError::InvalidRatio {
                    level,
                    ratio: ratio.to_string(),
                });
            }
            weights_bps.insert(level, (ratio * BPS_SCALE as f64).round() as u32);
        }
        Self::new(weights_bps)
    }

    /// local 0.30, county 0.15, state 0.25, federal 0.25.
    pub fn reference() -> Self {
        Self {
            weights_bps: BTreeMap::from([
                (GovernmentLevel::Local, 3_000),
                (GovernmentLevel::County, 1_500),
                (GovernmentLevel::State, 2_500),
                (GovernmentLevel::Federal, 2_500),
            ]),
        }
    }

    /// Effective weight for `level`, falling back for unlisted levels.
    pub fn weight_bps(&self, level: GovernmentLevel) -> u32 {
        self.weights_bps
            .get(&level)
            .copied()
            .unwrap_or(FALLBACK_WEIGHT_BPS)
    }

    /// The weight configured for `level`, if any.
    pub fn explicit_bps(&self, level: GovernmentLevel) -> Option<u32> {
        self.weights_bps.get(&level).copied()
    }

    /// Sum of effective weights over every level.
    pub fn effective_total_bps(&self) -> u32 {
        GovernmentLevel::ALL
            .iter()
            .map(|level| self.weight_bps(*level))
            .sum()
    }

    /// Check every weight and the effective total against [`BPS_SCALE`].
    ///
    /// Deserialized weights skip the constructor, so loaders call this.
    pub fn validate(&self) -> Result<(), GovernanceError> {
        for (&level, &bps) in &self.weights_bps {
            if bps > BPS_SCALE {
                return Err(GovernanceError::InvalidWeight { level, bps });
            }
        }
        let total_bps = self.effective_total_bps();
        if total_bps > BPS_SCALE {
            return Err(GovernanceError::WeightsExceedTotal { total_bps });
        }
        Ok(())
    }
}

impl Default for LevelWeights {
    fn default() -> Self {
        Self::reference()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_weights_are_valid() {
        let weights = LevelWeights::reference();
        assert!(weights.validate().is_ok());
        assert_eq!(weights.effective_total_bps(), 9_500);
        assert_eq!(weights.weight_bps(GovernmentLevel::Local), 3_000);
    }

    #[test]
    fn missing_level_falls_back_to_five_percent() {
        let weights = LevelWeights::new([(GovernmentLevel::Local, 3_000)]).unwrap();
        assert_eq!(weights.weight_bps(GovernmentLevel::County), FALLBACK_WEIGHT_BPS);
        assert_eq!(weights.explicit_bps(GovernmentLevel::County), None);
    }

    #[test]
    fn weight_above_scale_rejected() {
        let err = LevelWeights::new([(GovernmentLevel::State, 10_001)]).unwrap_err();
        assert_eq!(
            err,
            GovernanceError::InvalidWeight {
                level: GovernmentLevel::State,
                bps: 10_001
            }
        );
    }

    #[test]
    fn fallbacks_count_toward_total() {
        // 9_000 explicit + 3 × 500 fallback = 10_500.
        let err = LevelWeights::new([(GovernmentLevel::Local, 9_000)]).unwrap_err();
        assert_eq!(err, GovernanceError::WeightsExceedTotal { total_bps: 10_500 });
    }

    #[test]
    fn ratios_round_to_bps() {
        let weights = LevelWeights::from_ratios([
            (GovernmentLevel::Local, 0.3),
            (GovernmentLevel::County, 0.15),
            (GovernmentLevel::State, 0.25),
            (GovernmentLevel::Federal, 0.25),
        ])
        .unwrap();
        assert_eq!(weights, LevelWeights::reference());
    }

    #[test]
    fn ratio_out_of_range_rejected() {
        assert!(LevelWeights::from_ratios([(GovernmentLevel::Local, 1.5)]).is_err());
        assert!(LevelWeights::from_ratios([(GovernmentLevel::Local, f64::NAN)]).is_err());
        assert!(LevelWeights::from_ratios([(GovernmentLevel::Local, -0.1)]).is_err());
    }

    #[test]
    fn deserializes_from_level_keyed_map() {
        let weights: LevelWeights =
            serde_json::from_str(r#"{"local":3000,"county":1500,"state":2500,"federal":2500}"#)
                .unwrap();
        assert_eq!(weights, LevelWeights::reference());
    }
}
