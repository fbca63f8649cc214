//! Rapier2D physics backend implementation.
//!
//! This module provides the physics backend for Bevy Rapier2D.
//! Enable with the `rapier2d` feature.
//!
//! The backend contributes two systems: one on the logic schedule that
//! samples the ground probe and advances the jump-assist state machine,
//! and one on the fixed schedule that applies horizontal locomotion.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::backend::{LayerMask, MotionPhysicsBackend, PhysicsBody2d};
use crate::controller::MotionController;
use crate::sensor::GroundSensor;
use crate::{MotionEvent, MotionSet};

/// Rapier2D physics backend for the motion controller.
///
/// ```rust,no_run
/// use bevy::prelude::*;
/// use bevy_rapier2d::prelude::*;
/// use platformer_motion_controller::prelude::*;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
///     .add_plugins(MotionControllerPlugin::<Rapier2dBackend>::default())
///     .run();
/// ```
pub struct Rapier2dBackend;

impl MotionPhysicsBackend for Rapier2dBackend {
    fn plugin() -> impl Plugin {
        Rapier2dBackendPlugin
    }
}

/// Plugin that registers the Rapier-specific controller systems.
pub struct Rapier2dBackendPlugin;

impl Plugin for Rapier2dBackendPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (advance_motion, warn_missing_body_components).in_set(MotionSet::Advance),
        );
        app.add_systems(
            FixedUpdate,
            apply_locomotion.in_set(MotionSet::Locomotion),
        );
    }
}

/// View of one Rapier rigid body through the controller's body trait.
///
/// Impulses go through [`ExternalImpulse`] when the entity carries one and
/// fall back to a direct velocity change otherwise.
pub struct RapierBody<'a> {
    velocity: &'a mut Velocity,
    impulse: Option<&'a mut ExternalImpulse>,
    gravity_scale: &'a mut GravityScale,
}

impl<'a> RapierBody<'a> {
    /// Borrow a body from its Rapier components.
    pub fn new(
        velocity: &'a mut Velocity,
        impulse: Option<&'a mut ExternalImpulse>,
        gravity_scale: &'a mut GravityScale,
    ) -> Self {
        Self {
            velocity,
            impulse,
            gravity_scale,
        }
    }
}

impl PhysicsBody2d for RapierBody<'_> {
    fn linear_velocity(&self) -> Vec2 {
        self.velocity.linvel
    }

    fn set_linear_velocity(&mut self, velocity: Vec2) {
        self.velocity.linvel = velocity;
    }

    fn apply_impulse(&mut self, impulse: Vec2) {
        if let Some(external) = self.impulse.as_deref_mut() {
            external.impulse += impulse;
        } else {
            self.velocity.linvel += impulse;
        }
    }

    fn gravity_scale(&self) -> f32 {
        self.gravity_scale.0
    }

    fn set_gravity_scale(&mut self, scale: f32) {
        self.gravity_scale.0 = scale;
    }
}

/// Sample the ground probe and advance the jump-assist state machine.
///
/// Runs once per display frame on the logic schedule, after the intent has
/// been drained. Emits one [`MotionEvent`] per character for observers.
fn advance_motion(
    time: Res<Time>,
    rapier_context: ReadRapierContext,
    mut events: EventWriter<MotionEvent>,
    mut q_controllers: Query<(
        Entity,
        &GlobalTransform,
        &GroundSensor,
        &mut MotionController,
        &mut Velocity,
        Option<&mut ExternalImpulse>,
        &mut GravityScale,
    )>,
) {
    let Ok(context) = rapier_context.single() else {
        return;
    };
    let dt = time.delta_secs();

    for (entity, transform, sensor, mut controller, mut velocity, mut impulse, mut gravity_scale) in
        &mut q_controllers
    {
        // Overlap probe over the Rapier query pipeline, excluding the
        // character's own body and any sensor colliders.
        let probe = |center: Vec2, radius: f32, layer: LayerMask| -> bool {
            let filter = QueryFilter::default()
                .exclude_rigid_body(entity)
                .exclude_sensors()
                .groups(CollisionGroups::new(
                    Group::ALL,
                    Group::from_bits_truncate(layer.0),
                ));
            context
                .intersection_with_shape(center, 0.0, &Collider::ball(radius), filter)
                .is_some()
        };
        let grounded = sensor.sample(
            &probe,
            controller.config(),
            transform.translation().xy(),
            velocity.linvel.y,
        );

        let mut body = RapierBody::new(&mut velocity, impulse.as_deref_mut(), &mut gravity_scale);
        let report = controller.advance_logic(dt, grounded, &mut body);
        if report.jumped {
            debug!(
                "jump executed on {entity:?} ({} charges left)",
                report.jumps_remaining
            );
        }
        events.write(MotionEvent { entity, report });
    }
}

/// Apply horizontal locomotion on the fixed physics schedule.
fn apply_locomotion(
    mut q_controllers: Query<(
        &MotionController,
        &mut Velocity,
        Option<&mut ExternalImpulse>,
        &mut GravityScale,
    )>,
) {
    for (controller, mut velocity, mut impulse, mut gravity_scale) in &mut q_controllers {
        let mut body = RapierBody::new(&mut velocity, impulse.as_deref_mut(), &mut gravity_scale);
        controller.advance_physics(&mut body);
    }
}

/// Warn once when a controller is spawned without the Rapier components
/// it needs; such a character is skipped rather than driven.
fn warn_missing_body_components(
    q_controllers: Query<(Entity, Has<Velocity>, Has<GravityScale>), Added<MotionController>>,
) {
    for (entity, has_velocity, has_gravity_scale) in &q_controllers {
        if !has_velocity || !has_gravity_scale {
            warn!(
                "motion controller on {entity:?} is missing Velocity or GravityScale; \
                 it will not be driven"
            );
        }
    }
}

/// Physics components for a controller-driven character.
///
/// Rotation is locked: the controller owns the body's orientation through
/// the visual flip, not through physics.
#[derive(Bundle)]
pub struct RapierMotionBundle {
    pub rigid_body: RigidBody,
    pub velocity: Velocity,
    pub impulse: ExternalImpulse,
    pub gravity_scale: GravityScale,
    pub locked_axes: LockedAxes,
}

impl Default for RapierMotionBundle {
    fn default() -> Self {
        Self::rotation_locked()
    }
}

impl RapierMotionBundle {
    /// Dynamic body with rotation locked, at rest, unit gravity scale.
    pub fn rotation_locked() -> Self {
        Self {
            rigid_body: RigidBody::Dynamic,
            velocity: Velocity::zero(),
            impulse: ExternalImpulse::default(),
            gravity_scale: GravityScale(1.0),
            locked_axes: LockedAxes::ROTATION_LOCKED,
        }
    }
}
