//! The motion controller core.
//!
//! [`MotionController`] owns a [`MotionConfig`] and a
//! [`CharacterMotionState`] and advances them with two scheduler-agnostic
//! methods: [`advance_logic`](MotionController::advance_logic) once per
//! display frame and [`advance_physics`](MotionController::advance_physics)
//! once per fixed physics step. The host engine is only a driver; the core
//! runs against anything implementing [`PhysicsBody2d`].
//!
//! Per logic frame the pipeline is: timer bank, grounded edges, jump
//! arbitration, early-release cut, gravity shaping, facing. The jump
//! arbiter combines the buffer and coyote windows with the jump budget and
//! the single-press latch; see the field docs on [`CharacterMotionState`]
//! for the latches involved.

use bevy::prelude::*;

use crate::backend::PhysicsBody2d;
use crate::config::{ConfigError, MotionConfig};
use crate::state::{CharacterMotionState, GroundEdge};

/// What happened during one logic frame.
///
/// Returned by [`MotionController::advance_logic`] and forwarded by the
/// ECS layer as a [`MotionEvent`](crate::MotionEvent). Purely
/// observational; nothing feeds back into the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameReport {
    /// Grounded fact for this frame.
    pub grounded: bool,
    /// The character touched down this frame.
    pub landed: bool,
    /// The character left the ground this frame.
    pub left_ground: bool,
    /// A jump executed this frame.
    pub jumped: bool,
    /// The early-release cut fired this frame.
    pub cut: bool,
    /// The facing direction flipped this frame.
    pub flipped: bool,
    /// Jump budget after this frame.
    pub jumps_remaining: u32,
}

/// Converts move/jump input into velocity and impulse changes, with
/// jump-assist around ground transitions.
///
/// One controller per character. Construction validates the configuration;
/// the config is immutable afterwards.
#[derive(Component, Debug, Clone)]
pub struct MotionController {
    config: MotionConfig,
    state: CharacterMotionState,
}

impl MotionController {
    /// Build a controller from a validated configuration.
    pub fn new(config: MotionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            state: CharacterMotionState::new(config.max_jumps),
            config,
        })
    }

    /// The controller's configuration.
    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    /// The current motion state.
    pub fn state(&self) -> &CharacterMotionState {
        &self.state
    }

    /// Record a horizontal input change. Values are clamped to [-1, 1].
    pub fn on_move(&mut self, axis: f32) {
        self.state.horizontal_intent = axis.clamp(-1.0, 1.0);
    }

    /// Record a jump press or release edge.
    ///
    /// A press is the only place the jump buffer is set to a nonzero value.
    /// A release re-arms the single-press latch; the early-release cut
    /// itself is applied on the next [`advance_logic`](Self::advance_logic).
    pub fn on_jump(&mut self, pressed: bool) {
        if pressed {
            self.state.jump_held = true;
            self.state.jump_buffer_timer = self.config.jump_buffer_time;
        } else {
            self.state.jump_held = false;
            self.state.jump_rearmed = true;
        }
    }

    /// Advance the jump-assist state machine by one logic frame.
    ///
    /// `dt` is the elapsed wall-clock frame time (must be non-negative);
    /// `grounded_now` is this frame's sensor reading. Call once per display
    /// frame, before the fixed-step [`advance_physics`](Self::advance_physics)
    /// work that follows it.
    pub fn advance_logic<B: PhysicsBody2d>(
        &mut self,
        dt: f32,
        grounded_now: bool,
        body: &mut B,
    ) -> FrameReport {
        let config = &self.config;
        let state = &mut self.state;

        // Timer bank.
        state.tick_timers(dt);

        // Grounded edges.
        state.was_grounded = state.is_grounded;
        state.is_grounded = grounded_now;
        let edge = state.ground_edge();
        match edge {
            GroundEdge::Landed => {
                state.jumps_remaining = config.max_jumps;
                state.jump_rearmed = true;
                state.coyote_timer = 0.0;
                state.cut_applied = false;
                state.jumped_since_grounded = false;
                state.airborne_from_fall = false;
            }
            GroundEdge::Left => {
                // The grace window belongs to fall-offs. A jump's own leave
                // edge keeps the timer at zero, or the window would hand out
                // a second grounded jump right after takeoff.
                if !state.jumped_since_grounded {
                    state.coyote_timer = config.coyote_time;
                    state.airborne_from_fall = true;
                }
            }
            GroundEdge::None => {}
        }
        // Coyote time measures time-since-left-ground, so it stays topped
        // up while contact lasts rather than decaying on the ground.
        if state.is_grounded && !state.jumped_since_grounded {
            state.coyote_timer = config.coyote_time;
        }

        // Walking off a ledge costs the grounded charge once the coyote
        // window closes; jump-initiated airtime never forfeits.
        if !state.is_grounded && state.airborne_from_fall && state.coyote_timer <= 0.0 {
            state.jumps_remaining = state.jumps_remaining.saturating_sub(1);
            state.airborne_from_fall = false;
        }

        // Jump arbiter.
        let can_ground_jump = state.grounded_window() && state.jumps_remaining > 0;
        let can_air_jump = !state.is_grounded
            && state.jumps_remaining > 0
            && (!config.single_press_per_jump || state.jump_rearmed);
        let jumped = state.wants_jump() && (can_ground_jump || can_air_jump);
        if jumped {
            // Zero vertical speed before the impulse so residual falling
            // speed never shortens the jump.
            let mut velocity = body.linear_velocity();
            velocity.y = 0.0;
            body.set_linear_velocity(velocity);
            body.apply_impulse(Vec2::Y * config.jump_impulse);

            state.jumps_remaining -= 1;
            state.jump_buffer_timer = 0.0;
            state.coyote_timer = 0.0;
            state.jump_rearmed = false;
            state.cut_applied = false;
            state.jumped_since_grounded = true;
            state.airborne_from_fall = false;
        }

        // Early-release cut, at most once per ascent.
        let mut cut = false;
        let ascending = body.linear_velocity().y > 0.0;
        if ascending && !state.jump_held && !state.cut_applied {
            let mut velocity = body.linear_velocity();
            velocity.y *= config.jump_cut_multiplier;
            body.set_linear_velocity(velocity);
            state.cut_applied = true;
            cut = true;
        }

        // Gravity shaping and terminal fall speed.
        let vertical = body.linear_velocity().y;
        let gravity_scale = if vertical < 0.0 {
            if vertical < -config.max_fall_speed {
                let mut velocity = body.linear_velocity();
                velocity.y = -config.max_fall_speed;
                body.set_linear_velocity(velocity);
            }
            config.fall_gravity_scale()
        } else if vertical > 0.0 && !state.jump_held {
            config.fall_gravity_scale()
        } else {
            config.base_gravity_scale
        };
        body.set_gravity_scale(gravity_scale);

        // Facing follows the sign of the horizontal intent.
        let mut flipped = false;
        if state.horizontal_intent > 0.0 && !state.facing_right {
            state.facing_right = true;
            flipped = true;
        } else if state.horizontal_intent < 0.0 && state.facing_right {
            state.facing_right = false;
            flipped = true;
        }

        FrameReport {
            grounded: state.is_grounded,
            landed: edge == GroundEdge::Landed,
            left_ground: edge == GroundEdge::Left,
            jumped,
            cut,
            flipped,
            jumps_remaining: state.jumps_remaining,
        }
    }

    /// Apply horizontal locomotion for one fixed physics step.
    ///
    /// Horizontal velocity is set to `intent * move_speed`; vertical
    /// velocity is owned by the arbiter and gravity shaping and is left
    /// untouched here. Call once per fixed physics step.
    pub fn advance_physics<B: PhysicsBody2d>(&self, body: &mut B) {
        let mut velocity = body.linear_velocity();
        velocity.x = self.state.horizontal_intent * self.config.move_speed;
        body.set_linear_velocity(velocity);
    }
}
