//! Data-driven game balance
//!
//! Every gameplay constant lives in [`Tuning`]. The defaults reproduce the
//! classic values in [`crate::consts`]; hosts may override any subset from JSON.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Reasons a tuning file is rejected
#[derive(Debug, thiserror::Error)]
pub enum TuningError {
    /// JSON could not be parsed
    #[error("invalid tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Tuning file could not be read
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),

    /// Field width/height must be positive
    #[error("field size must be positive (got {width}x{height})")]
    FieldSize { width: f32, height: f32 },

    /// A length that must be strictly positive was not
    #[error("{name} must be positive (got {value})")]
    NonPositive { name: &'static str, value: f32 },

    /// Scroll speed can be zero but not negative
    #[error("scroll_speed must not be negative (got {0})")]
    NegativeScroll(f32),

    /// Flap must push upward
    #[error("flap_impulse must be negative (got {0})")]
    FlapDirection(f32),

    /// Sprite spawn rectangle does not lie strictly inside the field
    #[error("sprite spawn rect does not fit inside the field")]
    SpriteOutOfField,
}

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Field ===
    pub field_width: f32,
    pub field_height: f32,

    // === Sprite ===
    pub sprite_x: f32,
    pub sprite_y: f32,
    pub sprite_width: f32,
    pub sprite_height: f32,

    // === Physics (per tick) ===
    pub gravity: f32,
    pub flap_impulse: f32,

    // === Obstacles ===
    pub obstacle_width: f32,
    /// Vertical opening between top and bottom gate
    pub gap: f32,
    pub scroll_speed: f32,
    pub spawn_interval: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,

            sprite_x: SPRITE_X,
            sprite_y: SPRITE_Y,
            sprite_width: SPRITE_WIDTH,
            sprite_height: SPRITE_HEIGHT,

            gravity: GRAVITY,
            flap_impulse: FLAP_IMPULSE,

            obstacle_width: OBSTACLE_WIDTH,
            gap: OBSTACLE_GAP,
            scroll_speed: SCROLL_SPEED,
            spawn_interval: SPAWN_INTERVAL,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON (missing keys fall back to defaults) and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check that the parameters describe a playable field
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.field_width <= 0.0 || self.field_height <= 0.0 {
            return Err(TuningError::FieldSize {
                width: self.field_width,
                height: self.field_height,
            });
        }

        for (name, value) in [
            ("sprite_width", self.sprite_width),
            ("sprite_height", self.sprite_height),
            ("obstacle_width", self.obstacle_width),
            ("gap", self.gap),
            ("spawn_interval", self.spawn_interval),
        ] {
            if value <= 0.0 {
                return Err(TuningError::NonPositive { name, value });
            }
        }

        if self.scroll_speed < 0.0 {
            return Err(TuningError::NegativeScroll(self.scroll_speed));
        }
        if self.flap_impulse >= 0.0 {
            return Err(TuningError::FlapDirection(self.flap_impulse));
        }

        // Spawning inside the floor/ceiling would end the run on the first tick
        let fits = self.sprite_x >= 0.0
            && self.sprite_x + self.sprite_width <= self.field_width
            && self.sprite_y > 0.0
            && self.sprite_y + self.sprite_height < self.field_height;
        if !fits {
            return Err(TuningError::SpriteOutOfField);
        }

        Ok(())
    }

    /// Environment variable naming an optional tuning file (native only)
    pub const ENV_PATH: &'static str = "GATEFALL_TUNING";

    /// Load tuning from the file named by `GATEFALL_TUNING`, or defaults if unset
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Result<Self, TuningError> {
        match std::env::var_os(Self::ENV_PATH) {
            Some(path) => {
                let json = std::fs::read_to_string(&path)?;
                let tuning = Self::from_json(&json)?;
                log::info!("Loaded tuning from {}", path.to_string_lossy());
                Ok(tuning)
            }
            None => {
                log::info!("Using default tuning");
                Ok(Self::default())
            }
        }
    }

    /// Web builds always use the compiled-in defaults
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Result<Self, TuningError> {
        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.field_width, 400.0);
        assert_eq!(tuning.gap, 150.0);
        assert_eq!(tuning.flap_impulse, -8.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "gravity": 0.25, "gap": 180.0 }"#).unwrap();
        assert_eq!(tuning.gravity, 0.25);
        assert_eq!(tuning.gap, 180.0);
        assert_eq!(tuning.scroll_speed, SCROLL_SPEED);
        assert_eq!(tuning.field_height, FIELD_HEIGHT);
    }

    #[test]
    fn test_rejects_bad_json() {
        let err = Tuning::from_json("{ gravity: ").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }

    #[test]
    fn test_rejects_downward_flap() {
        let err = Tuning::from_json(r#"{ "flap_impulse": 4.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::FlapDirection(_)));
    }

    #[test]
    fn test_rejects_zero_gap() {
        let tuning = Tuning {
            gap: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::NonPositive { name: "gap", .. })
        ));
    }

    #[test]
    fn test_zero_scroll_is_allowed() {
        let tuning = Tuning {
            scroll_speed: 0.0,
            ..Default::default()
        };
        assert!(tuning.validate().is_ok());
    }

    #[test]
    fn test_rejects_sprite_on_ceiling() {
        let tuning = Tuning {
            sprite_y: 0.0,
            ..Default::default()
        };
        assert!(matches!(tuning.validate(), Err(TuningError::SpriteOutOfField)));
    }
}
