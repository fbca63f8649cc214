//! Movement intent.
//!
//! [`MotionIntent`] is the seam between the host's input bindings and the
//! controller. The host writes the current axis value and jump state from
//! any source (keyboard, gamepad, touch, AI, network); the controller
//! derives press/release edges internally, so level-triggered input cannot
//! re-arm the jump buffer by being held.

use bevy::prelude::*;

/// Desired movement for one character, written by the host every frame.
///
/// # Example
///
/// ```rust,ignore
/// // Your code handles input bindings, the controller handles jump logic:
/// intent.set_axis(keyboard_axis);
/// intent.set_jump_pressed(keyboard.pressed(KeyCode::Space));
/// ```
#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component)]
pub struct MotionIntent {
    /// Horizontal input (-1.0 = left, 1.0 = right).
    pub axis: f32,
    /// Whether the jump control is currently down.
    pub jump_pressed: bool,
    /// Previous frame's jump state (for edge detection).
    /// Managed internally by the controller.
    pub(crate) jump_pressed_prev: bool,
}

impl Default for MotionIntent {
    fn default() -> Self {
        Self {
            axis: 0.0,
            jump_pressed: false,
            jump_pressed_prev: false,
        }
    }
}

impl MotionIntent {
    /// Create a neutral intent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the horizontal axis value, clamped to [-1, 1].
    pub fn set_axis(&mut self, axis: f32) {
        self.axis = axis.clamp(-1.0, 1.0);
    }

    /// Set the jump control state. Edges are detected by the controller.
    pub fn set_jump_pressed(&mut self, pressed: bool) {
        self.jump_pressed = pressed;
    }

    /// Whether the jump state changed since it was last applied.
    pub(crate) fn jump_edge(&self) -> Option<bool> {
        (self.jump_pressed != self.jump_pressed_prev).then_some(self.jump_pressed)
    }
}
