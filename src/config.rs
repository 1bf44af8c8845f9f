//! Controller configuration components.
//!
//! Each of the three controllers has its own config component so they can
//! be tuned (and omitted) independently. Configs are validated at
//! construction: a bad value is a fatal setup error, not something the
//! per-step systems work around.

use bevy::prelude::*;
use thiserror::Error;

/// A configuration or wiring error detected at construction time.
///
/// These are fatal: the controller cannot produce a meaningful pose from
/// an invalid setup, so there is no degraded-mode fallback. The message
/// names the offending field.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// A numeric field is NaN or infinite.
    #[error("`{field}` must be a finite number")]
    NonFinite {
        /// Name of the offending field.
        field: &'static str,
    },
    /// A numeric field is negative where only zero or positive makes sense.
    #[error("`{field}` must not be negative")]
    Negative {
        /// Name of the offending field.
        field: &'static str,
    },
    /// A numeric field is outside its documented range.
    #[error("`{field}` must be within [{min}, {max}]")]
    OutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// Inclusive lower bound.
        min: f32,
        /// Inclusive upper bound.
        max: f32,
    },
    /// The first-person rig was wired with the same entity twice.
    #[error("camera and hands must be distinct entities")]
    RigEntitiesNotDistinct,
}

fn check_finite(value: f32, field: &'static str) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field })
    }
}

fn check_non_negative(value: f32, field: &'static str) -> Result<(), ConfigError> {
    check_finite(value, field)?;
    if value < 0.0 {
        Err(ConfigError::Negative { field })
    } else {
        Ok(())
    }
}

fn check_range(value: f32, field: &'static str, min: f32, max: f32) -> Result<(), ConfigError> {
    check_finite(value, field)?;
    if value < min || value > max {
        Err(ConfigError::OutOfRange { field, min, max })
    } else {
        Ok(())
    }
}

/// Configuration for the locomotion controller.
///
/// Force values are accelerations (m/s²); the systems scale them by body
/// mass before handing them to the physics backend, so tuning is
/// independent of collider density.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq)]
#[reflect(Component)]
pub struct LocomotionConfig {
    // === Movement ===
    /// Acceleration while walking on the ground.
    pub walk_force: f32,
    /// Acceleration while sprinting on the ground.
    pub sprint_force: f32,
    /// Acceleration while airborne. Kept small so air control nudges
    /// rather than steers.
    pub air_force: f32,
    /// Velocity decay rate while grounded (1/s). Also the rate at which
    /// the body's velocity converges to a moving platform's. The body's
    /// physics material is assumed frictionless so this is the only
    /// horizontal damping.
    pub ground_friction: f32,

    // === Jumping ===
    /// Instantaneous upward velocity change applied on jump.
    pub jump_impulse: f32,
    /// Grace window after leaving the ground during which a jump is
    /// still accepted.
    pub coyote_time: f32,
    /// Minimum time between two accepted jumps. Prevents double jumps
    /// fired inside the coyote window.
    pub jump_cooldown: f32,

    // === Ground probe ===
    /// How much the probe sphere is shrunk relative to the capsule
    /// radius, so side contact does not read as ground.
    pub probe_skin: f32,
    /// How far the probe sphere is pushed down from the capsule bottom.
    pub probe_offset: f32,
    /// Collision group `(memberships, filter)` bits for the probe.
    /// `None` probes against everything except the character itself.
    /// Should cover everything ground-eligible and exclude the player.
    #[reflect(ignore)]
    pub ground_groups: Option<(u32, u32)>,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            // Movement
            walk_force: 80.0,
            sprint_force: 160.0,
            air_force: 2.0,
            ground_friction: 20.0,
            // Jumping
            jump_impulse: 6.0,
            coyote_time: 0.3,
            jump_cooldown: 0.3,
            // Ground probe
            probe_skin: 0.01,
            probe_offset: 0.02,
            ground_groups: None,
        }
    }
}

impl LocomotionConfig {
    /// Validate the configuration.
    ///
    /// Flags suspicious but workable values with a warning; returns an
    /// error only for values the systems cannot interpret.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_non_negative(self.walk_force, "walk_force")?;
        check_non_negative(self.sprint_force, "sprint_force")?;
        check_non_negative(self.air_force, "air_force")?;
        check_non_negative(self.ground_friction, "ground_friction")?;
        check_non_negative(self.jump_impulse, "jump_impulse")?;
        check_non_negative(self.coyote_time, "coyote_time")?;
        check_non_negative(self.jump_cooldown, "jump_cooldown")?;
        check_non_negative(self.probe_skin, "probe_skin")?;
        check_non_negative(self.probe_offset, "probe_offset")?;

        if self.sprint_force < self.walk_force {
            warn!("sprint_force is below walk_force; sprinting will be slower than walking");
        }

        Ok(())
    }

    /// Builder: set walk and sprint accelerations.
    pub fn with_movement(mut self, walk_force: f32, sprint_force: f32) -> Self {
        self.walk_force = walk_force;
        self.sprint_force = sprint_force;
        self
    }

    /// Builder: set airborne acceleration.
    pub fn with_air_force(mut self, air_force: f32) -> Self {
        self.air_force = air_force;
        self
    }

    /// Builder: set ground friction rate.
    pub fn with_ground_friction(mut self, ground_friction: f32) -> Self {
        self.ground_friction = ground_friction;
        self
    }

    /// Builder: set jump impulse.
    pub fn with_jump_impulse(mut self, jump_impulse: f32) -> Self {
        self.jump_impulse = jump_impulse;
        self
    }

    /// Builder: set coyote time.
    pub fn with_coyote_time(mut self, coyote_time: f32) -> Self {
        self.coyote_time = coyote_time;
        self
    }

    /// Builder: set jump cooldown.
    pub fn with_jump_cooldown(mut self, jump_cooldown: f32) -> Self {
        self.jump_cooldown = jump_cooldown;
        self
    }

    /// Builder: set the probe collision groups.
    pub fn with_ground_groups(mut self, memberships: u32, filter: u32) -> Self {
        self.ground_groups = Some((memberships, filter));
        self
    }
}

/// Configuration for the look controller.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq)]
#[reflect(Component)]
pub struct LookConfig {
    /// How fast the view turns per unit of look input. The applied delta
    /// is `input * sensitivity * 0.01` degrees.
    pub sensitivity: f32,
    /// Pitch clamp in degrees; the camera may pitch within
    /// `[-pitch_limit, pitch_limit]`. At most 90.
    pub pitch_limit: f32,
}

impl Default for LookConfig {
    fn default() -> Self {
        Self {
            sensitivity: 6.0,
            pitch_limit: 90.0,
        }
    }
}

impl LookConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_non_negative(self.sensitivity, "sensitivity")?;
        check_range(self.pitch_limit, "pitch_limit", 0.0, 90.0)?;
        Ok(())
    }

    /// Builder: set look sensitivity.
    pub fn with_sensitivity(mut self, sensitivity: f32) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    /// Builder: set the pitch clamp.
    pub fn with_pitch_limit(mut self, pitch_limit: f32) -> Self {
        self.pitch_limit = pitch_limit;
        self
    }
}

/// Configuration for the hand-rig sway simulator.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq)]
#[reflect(Component)]
pub struct SwayConfig {
    /// How strongly the rig is passively carried along when the camera
    /// rotates, in `[0, 1]`. 1 means the rig copies every camera delta
    /// outright; 0 leaves all catching-up to the spring.
    pub follow_strength: f32,
    /// Spring gain: angular acceleration per radian of error between the
    /// rig and the camera.
    pub spring_force: f32,
    /// Angular velocity decay rate (1/s). How quickly the rig loses its
    /// inertia.
    pub drag: f32,
}

impl Default for SwayConfig {
    fn default() -> Self {
        Self {
            follow_strength: 0.75,
            spring_force: 250.0,
            drag: 20.0,
        }
    }
}

impl SwayConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range(self.follow_strength, "follow_strength", 0.0, 1.0)?;
        check_non_negative(self.spring_force, "spring_force")?;
        check_non_negative(self.drag, "drag")?;
        Ok(())
    }

    /// A tight rig that barely trails the camera.
    pub fn stiff() -> Self {
        Self {
            follow_strength: 0.9,
            spring_force: 300.0,
            drag: 30.0,
        }
    }

    /// A heavy, floaty rig with pronounced lag and overshoot.
    pub fn loose() -> Self {
        Self {
            follow_strength: 0.5,
            spring_force: 150.0,
            drag: 10.0,
        }
    }

    /// Builder: set the camera-follow strength.
    pub fn with_follow_strength(mut self, follow_strength: f32) -> Self {
        self.follow_strength = follow_strength;
        self
    }

    /// Builder: set the spring gain.
    pub fn with_spring_force(mut self, spring_force: f32) -> Self {
        self.spring_force = spring_force;
        self
    }

    /// Builder: set the drag rate.
    pub fn with_drag(mut self, drag: f32) -> Self {
        self.drag = drag;
        self
    }
}

/// Wiring between the body entity and its camera and hand-rig entities.
///
/// Lives on the body entity. The references are injected at construction
/// instead of discovered at runtime, so a missing collaborator is caught
/// when the character is assembled rather than mid-game.
///
/// The camera entity is expected to be a child of the body (its transform
/// is the camera's pose relative to the body); the hands entity must be a
/// world-root entity, since the sway system writes its world pose
/// directly.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirstPersonRig {
    /// The camera node. Receives the pitch-only rotation.
    pub camera: Entity,
    /// The hand/weapon rig. Receives the sway rotation and the camera's
    /// position.
    pub hands: Entity,
}

impl FirstPersonRig {
    /// Wire a rig from its camera and hands entities.
    pub fn new(camera: Entity, hands: Entity) -> Result<Self, ConfigError> {
        if camera == hands {
            return Err(ConfigError::RigEntitiesNotDistinct);
        }
        Ok(Self { camera, hands })
    }
}
