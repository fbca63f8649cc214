//! Physics backend abstraction.
//!
//! This module defines the traits that physics backends must implement
//! to work with the motion controller. This allows easy swapping between
//! physics engines (Rapier2D, XPBD, custom, etc.) and lets the core state
//! machine run against scripted doubles in tests.

use bevy::prelude::*;

/// Collision-layer bitmask used to restrict the ground probe to terrain.
///
/// Backends translate this into their own filtering primitive (collision
/// groups for Rapier2D). The default mask matches everything.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// Mask matching every layer.
    pub const ALL: Self = Self(u32::MAX);
    /// Mask matching no layer.
    pub const NONE: Self = Self(0);

    /// Check whether two masks share at least one layer.
    #[inline]
    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// Handle to a single rigid body, as the controller core sees it.
///
/// The core mutates exactly these capabilities: linear velocity,
/// instantaneous impulses, and the body's gravity-scale multiplier. The
/// Rapier backend implements this over its velocity/impulse/gravity-scale
/// components; tests implement it over a plain struct.
pub trait PhysicsBody2d {
    /// Current linear velocity of the body.
    fn linear_velocity(&self) -> Vec2;

    /// Overwrite the linear velocity of the body.
    fn set_linear_velocity(&mut self, velocity: Vec2);

    /// Apply an instantaneous impulse (a velocity change for a unit mass).
    fn apply_impulse(&mut self, impulse: Vec2);

    /// Current gravity-scale multiplier of the body.
    fn gravity_scale(&self) -> f32;

    /// Set the gravity-scale multiplier of the body.
    fn set_gravity_scale(&mut self, scale: f32);
}

/// Shape-overlap query against the physics world.
///
/// The ground sensor asks one question per frame: does a disc overlap any
/// collider on the configured terrain layers?
pub trait GroundProbe {
    /// Test a disc of `radius` at `center` against colliders on `layer`.
    fn overlap_circle(&self, center: Vec2, radius: f32, layer: LayerMask) -> bool;
}

/// Any matching closure is a probe; backends wrap their query pipeline in
/// one instead of exposing engine types through the seam.
impl<F> GroundProbe for F
where
    F: Fn(Vec2, f32, LayerMask) -> bool,
{
    fn overlap_circle(&self, center: Vec2, radius: f32, layer: LayerMask) -> bool {
        self(center, radius, layer)
    }
}

/// Trait for physics backend implementations.
///
/// A backend supplies the plugin that registers its sensor and
/// body-application systems. The controller plugin is generic over this
/// trait, so swapping engines is a one-type-parameter change.
pub trait MotionPhysicsBackend: 'static + Send + Sync {
    /// Returns the plugin that sets up this backend.
    fn plugin() -> impl Plugin;
}

/// Backend that registers no physics systems.
///
/// Useful for headless tests of the plugin wiring, and for hosts that
/// drive [`MotionController`](crate::controller::MotionController) manually
/// from their own schedules.
pub struct NoOpBackend;

impl MotionPhysicsBackend for NoOpBackend {
    fn plugin() -> impl Plugin {
        NoOpBackendPlugin
    }
}

/// Empty plugin for backends that don't need additional setup.
pub struct NoOpBackendPlugin;

impl Plugin for NoOpBackendPlugin {
    fn build(&self, _app: &mut App) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_mask_default_matches_all() {
        assert_eq!(LayerMask::default(), LayerMask::ALL);
        assert!(LayerMask::default().intersects(LayerMask(0b0100)));
    }

    #[test]
    fn layer_mask_disjoint() {
        let terrain = LayerMask(0b0001);
        let hazards = LayerMask(0b0010);
        assert!(!terrain.intersects(hazards));
        assert!(terrain.intersects(LayerMask(0b0011)));
    }

    #[test]
    fn layer_mask_none_matches_nothing() {
        assert!(!LayerMask::NONE.intersects(LayerMask::ALL));
        assert!(!LayerMask::ALL.intersects(LayerMask::NONE));
    }
}
