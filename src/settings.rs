//! Game settings
//!
//! Loaded once per session from JSON (the host element's `data-settings`
//! attribute on the web, a file on native). Nothing is written back.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::{Rules, ScalingProfile};

/// Difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Relaxed,
    #[default]
    Classic,
    Marathon,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Relaxed => "Relaxed",
            Difficulty::Classic => "Classic",
            Difficulty::Marathon => "Marathon",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "relaxed" | "easy" => Some(Difficulty::Relaxed),
            "classic" | "normal" => Some(Difficulty::Classic),
            "marathon" | "hard" => Some(Difficulty::Marathon),
            _ => None,
        }
    }

    /// Shark speed relative to the base profile
    pub fn shark_speed_factor(&self) -> f32 {
        match self {
            Difficulty::Relaxed => 0.8,
            Difficulty::Classic => 1.0,
            Difficulty::Marathon => 1.2,
        }
    }

    /// Score to beat (strictly) for a win
    pub fn win_score(&self) -> u32 {
        match self {
            Difficulty::Relaxed => 1650,
            Difficulty::Classic => WIN_SCORE,
            Difficulty::Marathon => 2900,
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,

    // === Scoring ===
    pub pellet_reward: u32,
    /// Overrides the difficulty's win score
    pub win_score: Option<u32>,

    // === Shark steering ===
    pub straight_weight: u32,
    pub turn_weight: u32,

    // === Touch ===
    pub swipe_min_px: f32,
    pub swipe_max_ms: f64,

    /// Fixed RNG seed; the host clock is used when absent
    pub seed: Option<u64>,

    // === Accessibility ===
    /// Disables the water displacement effect
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Classic,
            pellet_reward: PELLET_REWARD,
            win_score: None,
            straight_weight: STRAIGHT_WEIGHT,
            turn_weight: TURN_WEIGHT,
            swipe_min_px: SWIPE_MIN_PX,
            swipe_max_ms: SWIPE_MAX_MS,
            seed: None,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Defaults for a difficulty preset
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    /// Parse and validate; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the game cannot run with. Zero steering weights are
    /// raised to 1 so every open direction stays possible.
    pub fn validate(&mut self) -> Result<(), SettingsError> {
        if self.pellet_reward == 0 {
            return Err(SettingsError::Invalid {
                field: "pellet_reward",
                reason: "must be positive",
            });
        }
        if !(self.swipe_min_px > 0.0) {
            return Err(SettingsError::Invalid {
                field: "swipe_min_px",
                reason: "must be positive",
            });
        }
        if !(self.swipe_max_ms > 0.0) {
            return Err(SettingsError::Invalid {
                field: "swipe_max_ms",
                reason: "must be positive",
            });
        }
        if !(self.difficulty.shark_speed_factor() > 0.0) {
            return Err(SettingsError::Invalid {
                field: "difficulty",
                reason: "shark speed must be positive",
            });
        }
        if self.straight_weight == 0 || self.turn_weight == 0 {
            log::warn!("Steering weights must be at least 1, clamping");
            self.straight_weight = self.straight_weight.max(1);
            self.turn_weight = self.turn_weight.max(1);
        }
        Ok(())
    }

    /// Effective win threshold
    pub fn win_score(&self) -> u32 {
        self.win_score.unwrap_or_else(|| self.difficulty.win_score())
    }

    pub fn rules(&self) -> Rules {
        Rules {
            pellet_reward: self.pellet_reward,
            win_score: self.win_score(),
            straight_weight: self.straight_weight,
            turn_weight: self.turn_weight,
        }
    }

    /// Base scaling profile with the difficulty's shark speed applied
    pub fn profile(&self) -> ScalingProfile {
        let base = ScalingProfile::default();
        ScalingProfile {
            shark_speed: base.shark_speed * self.difficulty.shark_speed_factor(),
            displacement_scale: if self.reduced_motion {
                0.0
            } else {
                base.displacement_scale
            },
            ..base
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_round_trips_names() {
        for d in [Difficulty::Relaxed, Difficulty::Classic, Difficulty::Marathon] {
            assert_eq!(Difficulty::from_str(d.as_str()), Some(d));
        }
        assert_eq!(Difficulty::from_str("HARD"), Some(Difficulty::Marathon));
        assert_eq!(Difficulty::from_str("nightmare"), None);
    }

    #[test]
    fn test_empty_json_gives_defaults() {
        let s = Settings::from_json("{}").unwrap();
        assert_eq!(s, Settings::default());
        assert_eq!(s.rules(), Rules::default());
        assert_eq!(s.profile(), ScalingProfile::default());
    }

    #[test]
    fn test_partial_json() {
        let s = Settings::from_json(r#"{"difficulty":"Marathon","seed":42}"#).unwrap();
        assert_eq!(s.seed, Some(42));
        assert_eq!(s.win_score(), 2900);
        assert!((s.profile().shark_speed - BASE_SHARK_SPEED * 1.2).abs() < 1e-5);
        assert_eq!(s.profile().player_speed, BASE_PLAYER_SPEED);
    }

    #[test]
    fn test_explicit_win_score_overrides_preset() {
        let s = Settings::from_json(r#"{"difficulty":"Relaxed","win_score":100}"#).unwrap();
        assert_eq!(s.rules().win_score, 100);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            Settings::from_json(r#"{"pellet_reward":0}"#),
            Err(SettingsError::Invalid { field: "pellet_reward", .. })
        ));
        assert!(matches!(
            Settings::from_json(r#"{"swipe_max_ms":-1}"#),
            Err(SettingsError::Invalid { field: "swipe_max_ms", .. })
        ));
        assert!(matches!(
            Settings::from_json("{not json"),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn test_zero_weights_are_clamped() {
        let s = Settings::from_json(r#"{"straight_weight":0,"turn_weight":0}"#).unwrap();
        assert_eq!((s.straight_weight, s.turn_weight), (1, 1));
    }

    #[test]
    fn test_reduced_motion_disables_displacement() {
        let s = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        assert_eq!(s.profile().displacement_scale, 0.0);
    }
}
