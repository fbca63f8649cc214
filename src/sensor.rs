//! Ground sensing.
//!
//! The sensor turns a physics overlap query into the per-frame grounded
//! fact the controller consumes. Grounding is a sensor reading, never a
//! controller decision: the only qualification applied on top of the shape
//! overlap is the optional vertical-speed threshold from the config.

use bevy::prelude::*;

use crate::backend::GroundProbe;
use crate::config::MotionConfig;

/// Ground-probe anchor for one character.
///
/// The anchor is an offset from the body origin to the probe center,
/// typically just below the feet. An unanchored sensor never reports
/// grounded; the fail-safe is an airborne character, not a crash.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct GroundSensor {
    anchor: Option<Vec2>,
}

impl GroundSensor {
    /// Sensor probing at `anchor`, an offset from the body origin.
    pub fn new(anchor: Vec2) -> Self {
        Self {
            anchor: Some(anchor),
        }
    }

    /// Sensor with no probe anchor; always reports airborne.
    pub fn unanchored() -> Self {
        Self { anchor: None }
    }

    /// The configured probe offset, if any.
    pub fn anchor(&self) -> Option<Vec2> {
        self.anchor
    }

    /// Probe center in world space for a body at `body_position`.
    pub fn probe_center(&self, body_position: Vec2) -> Option<Vec2> {
        self.anchor.map(|anchor| body_position + anchor)
    }

    /// Sample the grounded fact for this frame.
    ///
    /// Overlaps a disc of `config.ground_probe_radius` at the anchor against
    /// `config.ground_layer`. When `config.grounded_speed_threshold` is set,
    /// bodies moving vertically faster than the threshold are treated as
    /// airborne even while the probe overlaps terrain.
    pub fn sample<P: GroundProbe>(
        &self,
        probe: &P,
        config: &MotionConfig,
        body_position: Vec2,
        vertical_velocity: f32,
    ) -> bool {
        let Some(center) = self.probe_center(body_position) else {
            return false;
        };
        if let Some(threshold) = config.grounded_speed_threshold {
            if vertical_velocity.abs() >= threshold {
                return false;
            }
        }
        probe.overlap_circle(center, config.ground_probe_radius, config.ground_layer)
    }
}
