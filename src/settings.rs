//! Game tuning
//!
//! Every gameplay constant the engine reads lives here so a build can be
//! rebalanced from a JSON file without touching the simulation.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Failure to load a tuning file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(&'static str),
}

/// Gameplay tuning (velocities are pixels per tick, durations are seconds)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Play field ===
    pub canvas_width: f32,
    pub canvas_height: f32,

    // === Paddle ===
    /// Horizontal speed while a direction key is held
    pub paddle_speed: f32,
    /// Baseline width (restored when wide paddle ends or a life is lost)
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Gap between paddle top and the bottom of the field
    pub paddle_bottom_offset: f32,

    // === Ball ===
    pub ball_radius: f32,
    /// Horizontal launch velocity (vertical comes from the level)
    pub ball_launch_vx: f32,
    /// Launch point distance above the bottom of the field
    pub ball_launch_offset: f32,
    pub min_ball_speed: f32,
    /// Max speed as a multiple of the level's base ball speed
    pub max_speed_factor: f32,
    /// Horizontal speed when the ball strikes a paddle edge
    pub max_paddle_deflection: f32,
    /// How far below the field the ball must fall to cost a life
    pub ball_loss_margin: f32,
    /// Reflect on the shallower-penetration axis instead of always vertical
    pub axis_aware_block_bounce: bool,

    // === Power-ups ===
    pub power_up_size: f32,
    pub power_up_fall_speed: f32,
    pub wide_paddle_factor: f32,
    pub wide_paddle_max: f32,
    pub wide_paddle_duration: f32,
    pub coffee_break_factor: f32,
    pub coffee_break_duration: f32,
    pub schedule_clear_count: usize,

    // === Run ===
    pub starting_lives: u32,
    /// Pause between clearing a week and loading the next
    pub level_complete_delay: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            canvas_width: 1000.0,
            canvas_height: 700.0,

            paddle_speed: 8.0,
            paddle_width: 120.0,
            paddle_height: 12.0,
            paddle_bottom_offset: 40.0,

            ball_radius: 8.0,
            ball_launch_vx: 4.0,
            ball_launch_offset: 60.0,
            min_ball_speed: 3.0,
            max_speed_factor: 1.5,
            max_paddle_deflection: 5.0,
            ball_loss_margin: 50.0,
            axis_aware_block_bounce: false,

            power_up_size: 24.0,
            power_up_fall_speed: 2.0,
            wide_paddle_factor: 1.5,
            wide_paddle_max: 200.0,
            wide_paddle_duration: 10.0,
            coffee_break_factor: 0.7,
            coffee_break_duration: 8.0,
            schedule_clear_count: 3,

            starting_lives: 3,
            level_complete_delay: 2.0,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file on disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Reject values that would break the simulation invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canvas_width <= 0.0 || self.canvas_height <= 0.0 {
            return Err(ConfigError::Invalid("canvas must have positive size"));
        }
        if self.paddle_width <= 0.0
            || self.paddle_width > self.canvas_width
            || self.wide_paddle_max > self.canvas_width
        {
            return Err(ConfigError::Invalid("paddle must fit inside the canvas"));
        }
        if self.wide_paddle_max < self.paddle_width {
            return Err(ConfigError::Invalid("wide_paddle_max below paddle_width"));
        }
        if self.wide_paddle_factor < 1.0 {
            return Err(ConfigError::Invalid("wide_paddle_factor below 1"));
        }
        if self.min_ball_speed <= 0.0 {
            return Err(ConfigError::Invalid("min_ball_speed must be positive"));
        }
        if self.max_speed_factor <= 0.0 {
            return Err(ConfigError::Invalid("max_speed_factor must be positive"));
        }
        if self.coffee_break_factor <= 0.0 {
            return Err(ConfigError::Invalid("coffee_break_factor must be positive"));
        }
        if self.starting_lives == 0 {
            return Err(ConfigError::Invalid("starting_lives must be at least 1"));
        }
        Ok(())
    }

    /// Upper speed bound for a level with the given base speed
    pub fn max_ball_speed(&self, base_speed: f32) -> f32 {
        (base_speed * self.max_speed_factor).max(self.min_ball_speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "starting_lives": 5 }"#).unwrap();
        assert_eq!(tuning.starting_lives, 5);
        assert_eq!(tuning.paddle_width, 120.0);
        assert_eq!(tuning.canvas_width, 1000.0);
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = Tuning::from_json(r#"{ "starting_lives": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = Tuning::from_json(r#"{ "min_ball_speed": 0.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        for json in [
            r#"{ "paddle_width": 1500.0 }"#,
            r#"{ "wide_paddle_max": 60.0 }"#,
            r#"{ "wide_paddle_factor": 0.0 }"#,
            r#"{ "wide_paddle_factor": -1.5 }"#,
            r#"{ "max_speed_factor": 0.0 }"#,
        ] {
            let err = Tuning::from_json(json).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{json}");
        }
    }

    #[test]
    fn test_widest_paddle_still_fits() {
        let json = r#"{ "paddle_width": 200.0, "wide_paddle_max": 200.0 }"#;
        let tuning = Tuning::from_json(json).unwrap();
        assert_eq!(tuning.paddle_width, tuning.wide_paddle_max);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Tuning::load("/definitely/not/here/tuning.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_max_ball_speed() {
        let tuning = Tuning::default();
        assert!((tuning.max_ball_speed(6.0) - 9.0).abs() < 1e-6);
        // Never below the floor
        assert!((tuning.max_ball_speed(1.0) - 3.0).abs() < 1e-6);
    }
}
