//! Engine-agnostic controller systems.
//!
//! These systems run regardless of the physics backend: draining the
//! host-written intent into the controller, mirroring the grounded state
//! into marker components, and applying the facing flip to the visual
//! transform. The backend plugin contributes the systems that touch the
//! physics body.

use bevy::prelude::*;

use crate::controller::MotionController;
use crate::intent::MotionIntent;
use crate::state::{Airborne, Grounded};

/// Drain [`MotionIntent`] into the controller.
///
/// Runs first on the logic schedule so the frame's arbitration sees the
/// freshest input. Jump edges are derived here; the buffer can only be
/// armed by a genuine press transition.
pub fn apply_intent(mut q_intents: Query<(&mut MotionIntent, &mut MotionController)>) {
    for (mut intent, mut controller) in &mut q_intents {
        controller.on_move(intent.axis);
        if let Some(pressed) = intent.jump_edge() {
            controller.on_jump(pressed);
            intent.jump_pressed_prev = intent.jump_pressed;
        }
    }
}

/// Sync [`Grounded`]/[`Airborne`] marker components from controller state.
pub fn sync_state_markers(
    mut commands: Commands,
    q_controllers: Query<(Entity, &MotionController, Has<Grounded>, Has<Airborne>)>,
) {
    for (entity, controller, has_grounded, has_airborne) in &q_controllers {
        let grounded = controller.state().is_grounded;
        if grounded && !has_grounded {
            commands.entity(entity).insert(Grounded).remove::<Airborne>();
        } else if !grounded && has_grounded {
            commands.entity(entity).remove::<Grounded>().insert(Airborne);
        } else if !grounded && !has_airborne {
            commands.entity(entity).insert(Airborne);
        }
    }
}

/// Mirror the visual transform to match the facing direction.
///
/// Pure presentation: flips the sign of the horizontal scale, never the
/// physics body.
pub fn apply_facing(mut q_transforms: Query<(&MotionController, &mut Transform)>) {
    for (controller, mut transform) in &mut q_transforms {
        let magnitude = transform.scale.x.abs();
        transform.scale.x = if controller.state().facing_right {
            magnitude
        } else {
            -magnitude
        };
    }
}
