//! Motion state.
//!
//! [`CharacterMotionState`] is the mutable heart of the controller: input
//! intent, grounded contact with edge detection, the jump-assist timers,
//! and the jump budget. The marker components at the bottom mirror the
//! grounded state into the ECS for animation and gameplay queries.

use bevy::prelude::*;

/// Frame-to-frame transition of the grounded flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroundEdge {
    /// Grounded state unchanged since last frame.
    None,
    /// Was airborne, now grounded.
    Landed,
    /// Was grounded, now airborne.
    Left,
}

/// Per-character motion state, owned by the controller.
///
/// All timers count down in seconds and are clamped at zero. The internal
/// latches (`jump_rearmed`, `cut_applied`, and the fall-tracking flags)
/// implement the single-press-per-jump discipline, the once-per-ascent
/// early-release cut, and the forfeiture of the grounded jump charge after
/// walking off a ledge.
#[derive(Reflect, Debug, Clone, PartialEq)]
pub struct CharacterMotionState {
    /// Latest horizontal input, clamped to [-1, 1].
    pub horizontal_intent: f32,
    /// Current visual orientation.
    pub facing_right: bool,
    /// Ground contact this frame, as reported by the sensor.
    pub is_grounded: bool,
    /// Ground contact last frame.
    pub was_grounded: bool,
    /// Seconds left in which a jump still counts as grounded.
    pub coyote_timer: f32,
    /// Seconds left in which a buffered press is still honored.
    pub jump_buffer_timer: f32,
    /// Whether the jump control is currently held.
    pub jump_held: bool,
    /// Jump budget until the next grounded reset.
    pub jumps_remaining: u32,
    /// Single-press latch: a fresh release has occurred since the last jump.
    pub(crate) jump_rearmed: bool,
    /// Early-release cut already fired this ascent.
    pub(crate) cut_applied: bool,
    /// A jump has executed since the last land edge.
    pub(crate) jumped_since_grounded: bool,
    /// Airborne by walking off a ledge; the grounded charge is forfeited
    /// once the coyote window closes.
    pub(crate) airborne_from_fall: bool,
}

impl Default for CharacterMotionState {
    fn default() -> Self {
        Self::new(1)
    }
}

impl CharacterMotionState {
    /// Spawn-time state: facing right, timers at zero, full jump budget.
    pub fn new(max_jumps: u32) -> Self {
        Self {
            horizontal_intent: 0.0,
            facing_right: true,
            is_grounded: false,
            was_grounded: false,
            coyote_timer: 0.0,
            jump_buffer_timer: 0.0,
            jump_held: false,
            jumps_remaining: max_jumps,
            jump_rearmed: true,
            cut_applied: false,
            jumped_since_grounded: false,
            airborne_from_fall: false,
        }
    }

    /// Count both assist timers down by `dt` seconds, clamping at zero.
    ///
    /// Caller contract: `dt >= 0`, called once per logic frame before the
    /// grounding and arbitration steps.
    pub fn tick_timers(&mut self, dt: f32) {
        self.coyote_timer = (self.coyote_timer - dt).max(0.0);
        self.jump_buffer_timer = (self.jump_buffer_timer - dt).max(0.0);
    }

    /// The grounded transition between the previous and current frame.
    pub fn ground_edge(&self) -> GroundEdge {
        match (self.was_grounded, self.is_grounded) {
            (false, true) => GroundEdge::Landed,
            (true, false) => GroundEdge::Left,
            _ => GroundEdge::None,
        }
    }

    /// Whether a grounded-style jump is currently allowed by contact or
    /// by the coyote window.
    #[inline]
    pub fn grounded_window(&self) -> bool {
        self.is_grounded || self.coyote_timer > 0.0
    }

    /// Whether a buffered jump press is waiting to be honored.
    #[inline]
    pub fn wants_jump(&self) -> bool {
        self.jump_buffer_timer > 0.0
    }
}

/// Marker component indicating the character is grounded.
///
/// Added and removed by the controller systems from the sensor reading.
/// Mutually exclusive with [`Airborne`].
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Grounded;

/// Marker component indicating the character is airborne.
///
/// Mutually exclusive with [`Grounded`].
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Airborne;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_has_full_budget_and_faces_right() {
        let state = CharacterMotionState::new(3);
        assert_eq!(state.jumps_remaining, 3);
        assert!(state.facing_right);
        assert_eq!(state.coyote_timer, 0.0);
        assert_eq!(state.jump_buffer_timer, 0.0);
        assert!(state.jump_rearmed);
    }

    #[test]
    fn timers_clamp_at_zero() {
        let mut state = CharacterMotionState::new(1);
        state.coyote_timer = 0.05;
        state.jump_buffer_timer = 0.02;
        state.tick_timers(0.1);
        assert_eq!(state.coyote_timer, 0.0);
        assert_eq!(state.jump_buffer_timer, 0.0);
    }

    #[test]
    fn timers_decrement_by_dt() {
        let mut state = CharacterMotionState::new(1);
        state.coyote_timer = 0.2;
        state.tick_timers(0.05);
        assert!((state.coyote_timer - 0.15).abs() < 1e-6);
    }

    #[test]
    fn ground_edges() {
        let mut state = CharacterMotionState::new(1);
        state.was_grounded = false;
        state.is_grounded = true;
        assert_eq!(state.ground_edge(), GroundEdge::Landed);

        state.was_grounded = true;
        state.is_grounded = false;
        assert_eq!(state.ground_edge(), GroundEdge::Left);

        state.is_grounded = true;
        assert_eq!(state.ground_edge(), GroundEdge::None);
    }

    #[test]
    fn grounded_window_covers_coyote() {
        let mut state = CharacterMotionState::new(1);
        assert!(!state.grounded_window());

        state.coyote_timer = 0.1;
        assert!(state.grounded_window());

        state.coyote_timer = 0.0;
        state.is_grounded = true;
        assert!(state.grounded_window());
    }
}
