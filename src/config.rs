//! # Sandbox Configuration
//!
//! Tunable constants of the interaction core. [`SandboxConfig::default`] gives
//! the values the sandbox ships with; the `with_*` setters adjust single
//! values and [`SandboxConfig::validate`] rejects combinations the state
//! machine cannot work with.

use cgmath::Vector3;

use crate::error::ConfigError;
use crate::graph::DuplicatePolicy;

/// Gamepad indices in the xr-standard mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GamepadLayout {
    /// Axis that cycles the preview colour (thumbstick x)
    pub color_axis: usize,
    /// Axis that pushes/pulls a grabbed object (thumbstick y)
    pub move_axis: usize,
    /// Button that deletes the grabbed object (A / X)
    pub delete_button: usize,
}

impl Default for GamepadLayout {
    fn default() -> Self {
        Self {
            color_axis: 2,
            move_axis: 3,
            delete_button: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SandboxConfig {
    /// Where a new cube sits relative to the spawning hand
    pub spawn_offset: Vector3<f32>,
    /// Bounding radius of a cube at scale 1.0
    pub bounding_radius: f32,
    /// Colours a preview can cycle through; the first entry is the default
    pub palette: Vec<[f32; 3]>,
    /// Axis deflection that counts as a colour-cycle step
    pub axis_threshold: f32,
    pub gamepad: GamepadLayout,
    /// Push/pull speed of a grabbed object, in metres per second at full deflection
    pub move_speed: f32,
    /// Emissive tint applied while an object is grabbed
    pub grab_emissive: [f32; 3],
    /// Smallest scale two-handed scaling can produce
    pub min_scale: f32,
    pub duplicate_policy: DuplicatePolicy,
    /// Pointer cursor distance when the pointer hits nothing
    pub cursor_neutral_distance: f32,
    /// Button mesh scale while hovered or pressed
    pub button_hover_scale: f32,
    /// Seconds between pressing exit and the session ending
    pub exit_delay: f32,
    pub exit_message: String,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            spawn_offset: Vector3::new(0.0, 0.0, -0.1),
            bounding_radius: 0.05,
            palette: vec![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            axis_threshold: 0.8,
            gamepad: GamepadLayout::default(),
            move_speed: 1.0,
            grab_emissive: [0.3, 0.3, 0.3],
            min_scale: 0.01,
            duplicate_policy: DuplicatePolicy::Reject,
            cursor_neutral_distance: 1.5,
            button_hover_scale: 1.1,
            exit_delay: 2.0,
            exit_message: "Exiting session...".to_string(),
        }
    }
}

impl SandboxConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_spawn_offset(mut self, offset: Vector3<f32>) -> Self {
        self.spawn_offset = offset;
        self
    }

    pub fn with_bounding_radius(mut self, radius: f32) -> Self {
        self.bounding_radius = radius;
        self
    }

    pub fn with_palette(mut self, palette: Vec<[f32; 3]>) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_axis_threshold(mut self, threshold: f32) -> Self {
        self.axis_threshold = threshold;
        self
    }

    pub fn with_move_speed(mut self, speed: f32) -> Self {
        self.move_speed = speed;
        self
    }

    pub fn with_min_scale(mut self, min_scale: f32) -> Self {
        self.min_scale = min_scale;
        self
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    pub fn with_exit_delay(mut self, seconds: f32) -> Self {
        self.exit_delay = seconds;
        self
    }

    /// Check that every value is usable by the interaction core
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        if !(self.axis_threshold > 0.0 && self.axis_threshold < 1.0) {
            return Err(ConfigError::AxisThreshold(self.axis_threshold));
        }
        if self.move_speed.is_nan() || self.move_speed <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "move_speed",
                value: self.move_speed,
            });
        }
        if self.min_scale.is_nan() || self.min_scale <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "min_scale",
                value: self.min_scale,
            });
        }
        if self.bounding_radius.is_nan() || self.bounding_radius <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "bounding_radius",
                value: self.bounding_radius,
            });
        }
        if self.exit_delay.is_nan() || self.exit_delay < 0.0 {
            return Err(ConfigError::NegativeDelay(self.exit_delay));
        }
        if self.button_hover_scale.is_nan() || self.button_hover_scale < 1.0 {
            return Err(ConfigError::HoverScale(self.button_hover_scale));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SandboxConfig::default().validate().is_ok());
    }

    #[test]
    fn test_empty_palette_rejected() {
        let config = SandboxConfig::new().with_palette(Vec::new());
        assert!(matches!(config.validate(), Err(ConfigError::EmptyPalette)));
    }

    #[test]
    fn test_threshold_must_be_inside_unit_range() {
        for bad in [0.0, 1.0, -0.5, f32::NAN] {
            let config = SandboxConfig::new().with_axis_threshold(bad);
            assert!(matches!(config.validate(), Err(ConfigError::AxisThreshold(_))));
        }
    }

    #[test]
    fn test_non_positive_speed_names_field() {
        let err = SandboxConfig::new().with_move_speed(0.0).validate().unwrap_err();
        assert_eq!(err.to_string(), "move_speed must be positive, got 0");
    }
}
