//! Controller configuration.
//!
//! This module defines the tuning parameters for the motion controller:
//! movement speed, jump impulse, the jump-assist windows (coyote time and
//! jump buffering), gravity shaping, and the ground-probe geometry.

use bevy::prelude::*;
use thiserror::Error;

use crate::backend::LayerMask;

/// Error returned when a [`MotionConfig`] fails validation.
///
/// Configuration mistakes are rejected when the controller is constructed
/// rather than silently misbehaving at runtime.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("move_speed must be positive, got {0}")]
    NonPositiveMoveSpeed(f32),
    #[error("jump_impulse must be positive, got {0}")]
    NonPositiveJumpImpulse(f32),
    #[error("max_jumps must be at least 1")]
    ZeroMaxJumps,
    #[error("jump_cut_multiplier must lie in (0, 1], got {0}")]
    CutMultiplierOutOfRange(f32),
    #[error("coyote_time must not be negative, got {0}")]
    NegativeCoyoteTime(f32),
    #[error("jump_buffer_time must not be negative, got {0}")]
    NegativeJumpBufferTime(f32),
    #[error("base_gravity_scale must be positive, got {0}")]
    NonPositiveGravityScale(f32),
    #[error("fall_gravity_multiplier must be at least 1, got {0}")]
    FallMultiplierBelowOne(f32),
    #[error("max_fall_speed must be positive, got {0}")]
    NonPositiveMaxFallSpeed(f32),
    #[error("ground_probe_radius must be positive, got {0}")]
    NonPositiveProbeRadius(f32),
    #[error("grounded_speed_threshold must be positive when set, got {0}")]
    NonPositiveSpeedThreshold(f32),
}

/// Tuning parameters for a character's motion.
///
/// Immutable per character once the controller is constructed. The defaults
/// describe a responsive single-jump platformer character; use the builder
/// methods or the [`MotionConfig::double_jump`] preset to tune from there.
///
/// # Example
///
/// ```rust
/// use platformer_motion_controller::prelude::*;
///
/// let config = MotionConfig::default()
///     .with_max_jumps(2)
///     .with_coyote_time(0.15)
///     .with_jump_buffer_time(0.1);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotionConfig {
    // === Movement ===
    /// Horizontal speed at full input deflection (units/second).
    pub move_speed: f32,

    // === Jumping ===
    /// Vertical velocity imparted by a jump (units/second).
    pub jump_impulse: f32,

    /// Jump budget between grounded resets. 1 = single jump, 2 = double jump.
    pub max_jumps: u32,

    /// Fraction of upward velocity kept when the jump control is released
    /// mid-ascent. Must lie in (0, 1].
    pub jump_cut_multiplier: f32,

    /// Coyote time duration in seconds: how long after leaving ground a jump
    /// press is still honored as a grounded jump.
    pub coyote_time: f32,

    /// Jump buffer duration in seconds: how long before grounding becomes
    /// valid an early jump press is remembered.
    pub jump_buffer_time: f32,

    /// Require a fresh release of the jump control between consecutive
    /// air jumps. Disable to let a held control spend the whole budget
    /// without intervening releases.
    pub single_press_per_jump: bool,

    // === Gravity shaping ===
    /// Gravity-scale multiplier while ascending with the jump control held.
    pub base_gravity_scale: f32,

    /// Extra gravity factor while falling, or ascending after an early
    /// release. Must be at least 1.
    pub fall_gravity_multiplier: f32,

    /// Terminal fall speed (units/second, positive).
    pub max_fall_speed: f32,

    // === Ground probe ===
    /// Radius of the overlap disc used for ground detection.
    pub ground_probe_radius: f32,

    /// Collision layers the ground probe tests against.
    pub ground_layer: LayerMask,

    /// When set, grounding additionally requires `|vertical velocity|` below
    /// this threshold, rejecting overlaps while launching or falling fast
    /// through thin platforms. Disable on sloped or moving platforms, where
    /// vertical velocity drifts even when standing still.
    pub grounded_speed_threshold: Option<f32>,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            move_speed: 8.0,
            jump_impulse: 16.0,
            max_jumps: 1,
            jump_cut_multiplier: 0.5,
            coyote_time: 0.2,
            jump_buffer_time: 0.2,
            single_press_per_jump: true,
            base_gravity_scale: 1.0,
            fall_gravity_multiplier: 2.0,
            max_fall_speed: 25.0,
            ground_probe_radius: 0.2,
            ground_layer: LayerMask::ALL,
            grounded_speed_threshold: Some(0.5),
        }
    }
}

impl MotionConfig {
    /// Preset for a double-jump character.
    pub fn double_jump() -> Self {
        Self {
            max_jumps: 2,
            ..default()
        }
    }

    /// Check every parameter against its valid range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.move_speed <= 0.0 {
            return Err(ConfigError::NonPositiveMoveSpeed(self.move_speed));
        }
        if self.jump_impulse <= 0.0 {
            return Err(ConfigError::NonPositiveJumpImpulse(self.jump_impulse));
        }
        if self.max_jumps == 0 {
            return Err(ConfigError::ZeroMaxJumps);
        }
        if self.jump_cut_multiplier <= 0.0 || self.jump_cut_multiplier > 1.0 {
            return Err(ConfigError::CutMultiplierOutOfRange(
                self.jump_cut_multiplier,
            ));
        }
        if self.coyote_time < 0.0 {
            return Err(ConfigError::NegativeCoyoteTime(self.coyote_time));
        }
        if self.jump_buffer_time < 0.0 {
            return Err(ConfigError::NegativeJumpBufferTime(self.jump_buffer_time));
        }
        if self.base_gravity_scale <= 0.0 {
            return Err(ConfigError::NonPositiveGravityScale(self.base_gravity_scale));
        }
        if self.fall_gravity_multiplier < 1.0 {
            return Err(ConfigError::FallMultiplierBelowOne(
                self.fall_gravity_multiplier,
            ));
        }
        if self.max_fall_speed <= 0.0 {
            return Err(ConfigError::NonPositiveMaxFallSpeed(self.max_fall_speed));
        }
        if self.ground_probe_radius <= 0.0 {
            return Err(ConfigError::NonPositiveProbeRadius(self.ground_probe_radius));
        }
        if let Some(threshold) = self.grounded_speed_threshold {
            if threshold <= 0.0 {
                return Err(ConfigError::NonPositiveSpeedThreshold(threshold));
            }
        }
        Ok(())
    }

    /// Gravity scale applied while falling or after an early release.
    #[inline]
    pub fn fall_gravity_scale(&self) -> f32 {
        self.base_gravity_scale * self.fall_gravity_multiplier
    }

    /// Builder: set horizontal movement speed.
    pub fn with_move_speed(mut self, speed: f32) -> Self {
        self.move_speed = speed;
        self
    }

    /// Builder: set jump impulse.
    pub fn with_jump_impulse(mut self, impulse: f32) -> Self {
        self.jump_impulse = impulse;
        self
    }

    /// Builder: set the jump budget.
    pub fn with_max_jumps(mut self, max_jumps: u32) -> Self {
        self.max_jumps = max_jumps;
        self
    }

    /// Builder: set the early-release cut multiplier.
    pub fn with_jump_cut_multiplier(mut self, multiplier: f32) -> Self {
        self.jump_cut_multiplier = multiplier;
        self
    }

    /// Builder: set coyote time.
    pub fn with_coyote_time(mut self, time: f32) -> Self {
        self.coyote_time = time;
        self
    }

    /// Builder: set jump buffer time.
    pub fn with_jump_buffer_time(mut self, time: f32) -> Self {
        self.jump_buffer_time = time;
        self
    }

    /// Builder: enable or disable the single-press-per-jump latch.
    pub fn with_single_press_per_jump(mut self, enabled: bool) -> Self {
        self.single_press_per_jump = enabled;
        self
    }

    /// Builder: set base gravity scale and fall multiplier.
    pub fn with_gravity_shaping(mut self, base_scale: f32, fall_multiplier: f32) -> Self {
        self.base_gravity_scale = base_scale;
        self.fall_gravity_multiplier = fall_multiplier;
        self
    }

    /// Builder: set terminal fall speed.
    pub fn with_max_fall_speed(mut self, speed: f32) -> Self {
        self.max_fall_speed = speed;
        self
    }

    /// Builder: set ground-probe radius and layer mask.
    pub fn with_ground_probe(mut self, radius: f32, layer: LayerMask) -> Self {
        self.ground_probe_radius = radius;
        self.ground_layer = layer;
        self
    }

    /// Builder: set the grounding velocity threshold.
    pub fn with_grounded_speed_threshold(mut self, threshold: f32) -> Self {
        self.grounded_speed_threshold = Some(threshold);
        self
    }

    /// Builder: ground on shape overlap alone, ignoring vertical speed.
    pub fn without_grounded_speed_threshold(mut self) -> Self {
        self.grounded_speed_threshold = None;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(MotionConfig::default().validate(), Ok(()));
    }

    #[test]
    fn double_jump_preset() {
        let config = MotionConfig::double_jump();
        assert_eq!(config.max_jumps, 2);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn zero_max_jumps_rejected() {
        let config = MotionConfig::default().with_max_jumps(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroMaxJumps));
    }

    #[test]
    fn negative_durations_rejected() {
        let config = MotionConfig::default().with_coyote_time(-0.1);
        assert_eq!(
            config.validate(),
            Err(ConfigError::NegativeCoyoteTime(-0.1))
        );

        let config = MotionConfig::default().with_jump_buffer_time(-0.5);
        assert_eq!(
            config.validate(),
            Err(ConfigError::NegativeJumpBufferTime(-0.5))
        );
    }

    #[test]
    fn zero_durations_are_valid() {
        // Zero windows degrade the assists to plain grounded jumping,
        // which is a legitimate configuration.
        let config = MotionConfig::default()
            .with_coyote_time(0.0)
            .with_jump_buffer_time(0.0);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn cut_multiplier_range() {
        assert_eq!(
            MotionConfig::default()
                .with_jump_cut_multiplier(0.0)
                .validate(),
            Err(ConfigError::CutMultiplierOutOfRange(0.0))
        );
        assert_eq!(
            MotionConfig::default()
                .with_jump_cut_multiplier(1.5)
                .validate(),
            Err(ConfigError::CutMultiplierOutOfRange(1.5))
        );
        // A multiplier of exactly 1 disables the cut without being an error.
        assert_eq!(
            MotionConfig::default()
                .with_jump_cut_multiplier(1.0)
                .validate(),
            Ok(())
        );
    }

    #[test]
    fn fall_multiplier_below_one_rejected() {
        let config = MotionConfig::default().with_gravity_shaping(1.0, 0.5);
        assert_eq!(
            config.validate(),
            Err(ConfigError::FallMultiplierBelowOne(0.5))
        );
    }

    #[test]
    fn probe_radius_must_be_positive() {
        let config = MotionConfig::default().with_ground_probe(0.0, LayerMask::ALL);
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositiveProbeRadius(0.0))
        );
    }

    #[test]
    fn speed_threshold_must_be_positive_when_set() {
        let config = MotionConfig::default().with_grounded_speed_threshold(0.0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositiveSpeedThreshold(0.0))
        );
        assert_eq!(
            MotionConfig::default()
                .without_grounded_speed_threshold()
                .validate(),
            Ok(())
        );
    }

    #[test]
    fn fall_gravity_scale_is_product() {
        let config = MotionConfig::default().with_gravity_shaping(2.0, 3.0);
        assert_eq!(config.fall_gravity_scale(), 6.0);
    }
}
