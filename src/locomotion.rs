//! Locomotion state and gating logic.
//!
//! [`LocomotionState`] is the hub for everything the body knows about its
//! contact with the world: the grounded flag and contact from the latest
//! probe, and the two timers the jump gate runs on. The physics-facing
//! systems in [`crate::systems`] read and advance this state; the math
//! that decides what happens lives here so it can be tested without a
//! physics backend.

use bevy::prelude::*;

use crate::config::LocomotionConfig;
use crate::detection::GroundContact;

/// Per-body locomotion state.
///
/// `grounded` and `ground` are overwritten by the ground probe every fixed
/// step; the timers advance every variable step so jump gating reacts at
/// input rate rather than physics rate.
#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component)]
pub struct LocomotionState {
    /// Whether the latest ground probe found at least one contact.
    pub grounded: bool,
    /// The first contact from the latest probe, if any.
    #[reflect(ignore)]
    pub ground: Option<GroundContact>,
    /// Seconds since the body was last grounded. Zeroed while grounded.
    pub time_since_grounded: f32,
    /// Seconds since the last accepted jump.
    pub time_since_jumped: f32,
    /// Force accumulated this fixed step, finalized into the physics
    /// backend once per step.
    #[reflect(ignore)]
    pub(crate) accumulated_force: Vec3,
}

impl Default for LocomotionState {
    fn default() -> Self {
        Self {
            grounded: false,
            ground: None,
            // "Never yet": a fresh body can neither coyote-jump before it
            // has touched ground nor be cooldown-blocked on its first jump.
            time_since_grounded: f32::INFINITY,
            time_since_jumped: f32::INFINITY,
            accumulated_force: Vec3::ZERO,
        }
    }
}

impl LocomotionState {
    /// Create a fresh, airborne state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the result of a ground probe.
    ///
    /// Grounded iff the probe returned at least one contact; the first
    /// contact is kept for friction coupling.
    pub fn note_probe(&mut self, contact: Option<GroundContact>) {
        self.grounded = contact.is_some();
        self.ground = contact;
    }

    /// Whether a jump would be accepted right now.
    ///
    /// Accepted iff the body was grounded less than `coyote_time` ago and
    /// the last accepted jump is more than `jump_cooldown` in the past.
    pub fn jump_permitted(&self, config: &LocomotionConfig) -> bool {
        self.time_since_grounded < config.coyote_time
            && self.time_since_jumped > config.jump_cooldown
    }

    /// Advance the jump timers by one variable step and evaluate a jump
    /// request. Returns whether the jump was accepted.
    ///
    /// The ordering mirrors the gate's definition: the grounded timer is
    /// brought up to date first, the gate is evaluated, and only an
    /// accepted jump resets the cooldown timer before it accumulates.
    pub fn try_jump(&mut self, requested: bool, config: &LocomotionConfig, dt: f32) -> bool {
        if self.grounded {
            self.time_since_grounded = 0.0;
        } else {
            self.time_since_grounded += dt;
        }

        let accepted = requested && self.jump_permitted(config);

        if accepted {
            self.time_since_jumped = 0.0;
        }
        self.time_since_jumped += dt;

        accepted
    }

    /// Acceleration magnitude for the current state.
    ///
    /// Airborne overrides the sprint/walk selection; the walk/run *flags*
    /// are derived from intent alone and are not affected by this.
    pub fn acceleration(&self, config: &LocomotionConfig, sprinting: bool) -> f32 {
        if !self.grounded {
            config.air_force
        } else if sprinting {
            config.sprint_force
        } else {
            config.walk_force
        }
    }

    /// Velocity of the ground contact's attached body, if it has one.
    pub fn ground_velocity(&self) -> Option<Vec3> {
        self.ground.as_ref().and_then(|g| g.velocity)
    }

    pub(crate) fn add_force(&mut self, force: Vec3) {
        self.accumulated_force += force;
    }
}

/// Blend a velocity toward a target at `rate` per second.
///
/// With a zero target this is exponential decay; with a platform velocity
/// as target it converges the body onto the platform. The factor is
/// clamped so one oversized step cannot overshoot the target.
pub(crate) fn friction_blend(velocity: Vec3, target: Vec3, rate: f32, dt: f32) -> Vec3 {
    velocity.lerp(target, (rate * dt).min(1.0))
}
