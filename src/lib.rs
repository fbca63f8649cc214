//! # `platformer_motion_controller`
//!
//! A 2D platformer character-movement controller with physics backend
//! abstraction.
//!
//! This crate converts raw directional and jump input into physics-body
//! velocity and impulse changes, compensating for the imprecision of human
//! input timing near ground transitions:
//! - Coyote time: a grace window after walking off a platform
//! - Jump buffering: a grace window before landing
//! - Variable jump height: early release cuts the ascent short
//! - Multi-jump budget with single-press-per-jump discipline
//! - Asymmetric gravity shaping with a terminal fall speed
//!
//! ## Architecture
//!
//! The core is [`MotionController`](controller::MotionController), a plain
//! state machine with two scheduler-agnostic update methods:
//! `advance_logic` per display frame and `advance_physics` per fixed
//! physics step. It talks to the physics engine only through the
//! [`PhysicsBody2d`](backend::PhysicsBody2d) and
//! [`GroundProbe`](backend::GroundProbe) traits, so it is fully testable
//! without an engine runtime. The plugin layer wires the core into Bevy
//! schedules through a swappable backend; Rapier2D is included behind the
//! `rapier2d` feature.
//!
//! ## Usage
//!
//! ```rust
//! use bevy::math::Vec2;
//! use platformer_motion_controller::prelude::*;
//!
//! // Tune a double-jump character and build its controller.
//! let config = MotionConfig::double_jump()
//!     .with_jump_impulse(14.0)
//!     .with_coyote_time(0.2);
//! let controller = MotionController::new(config).expect("config is valid");
//!
//! // Spawn these on the character entity, together with the backend's
//! // body components (see `RapierMotionBundle` for the Rapier backend).
//! let intent = MotionIntent::new();
//! let sensor = GroundSensor::new(Vec2::new(0.0, -0.5));
//! # let _ = (controller, intent, sensor);
//! ```

use bevy::prelude::*;

pub mod backend;
pub mod config;
pub mod controller;
pub mod intent;
pub mod sensor;
pub mod state;
pub mod systems;

#[cfg(feature = "rapier2d")]
pub mod rapier;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::backend::{
        GroundProbe, LayerMask, MotionPhysicsBackend, NoOpBackend, PhysicsBody2d,
    };
    pub use crate::config::{ConfigError, MotionConfig};
    pub use crate::controller::{FrameReport, MotionController};
    pub use crate::intent::MotionIntent;
    pub use crate::sensor::GroundSensor;
    pub use crate::state::{Airborne, CharacterMotionState, GroundEdge, Grounded};
    pub use crate::{MotionControllerPlugin, MotionEvent, MotionSet};

    #[cfg(feature = "rapier2d")]
    pub use crate::rapier::{Rapier2dBackend, RapierBody, RapierMotionBundle};
}

/// System sets for the controller schedules.
///
/// On `Update`: intent draining, then the state-machine advance, then the
/// reaction systems (markers, facing). On `FixedUpdate`: locomotion.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotionSet {
    /// Drain host-written intent into the controllers.
    Intent,
    /// Sample ground sensors and advance the state machines.
    Advance,
    /// React to the frame's outcome: markers, facing, observers.
    React,
    /// Apply horizontal locomotion on the fixed schedule.
    Locomotion,
}

/// Observer event emitted after each controller logic frame.
///
/// Purely observational: debug overlays and animation can consume it,
/// nothing feeds back into the core.
#[derive(Event, Debug, Clone, Copy)]
pub struct MotionEvent {
    /// The character entity.
    pub entity: Entity,
    /// What happened this frame.
    pub report: controller::FrameReport,
}

/// Main plugin for the motion controller.
///
/// Generic over a physics backend `B` which provides the systems that
/// touch the physics body.
///
/// # Type Parameters
/// - `B`: The physics backend implementation (e.g., `Rapier2dBackend`)
pub struct MotionControllerPlugin<B: backend::MotionPhysicsBackend> {
    _marker: std::marker::PhantomData<B>,
}

impl<B: backend::MotionPhysicsBackend> Default for MotionControllerPlugin<B> {
    fn default() -> Self {
        Self {
            _marker: std::marker::PhantomData,
        }
    }
}

impl<B: backend::MotionPhysicsBackend> Plugin for MotionControllerPlugin<B> {
    fn build(&self, app: &mut App) {
        // Register core types
        app.register_type::<config::MotionConfig>();
        app.register_type::<state::CharacterMotionState>();
        app.register_type::<intent::MotionIntent>();
        app.register_type::<sensor::GroundSensor>();
        app.register_type::<state::Grounded>();
        app.register_type::<state::Airborne>();

        app.add_event::<MotionEvent>();

        app.configure_sets(
            Update,
            (MotionSet::Intent, MotionSet::Advance, MotionSet::React).chain(),
        );
        app.configure_sets(FixedUpdate, MotionSet::Locomotion);

        // Add the physics backend plugin
        app.add_plugins(B::plugin());

        app.add_systems(Update, systems::apply_intent.in_set(MotionSet::Intent));
        app.add_systems(
            Update,
            (systems::sync_state_markers, systems::apply_facing).in_set(MotionSet::React),
        );
    }
}
