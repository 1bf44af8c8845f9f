//! # `fps_character_controller`
//!
//! First-person character motion for Bevy with physics backend
//! abstraction.
//!
//! This crate provides the three motion pieces of a first-person
//! character and nothing else:
//! - **Locomotion**: force-based rigid-body movement with a sphere ground
//!   probe, moving-platform friction, and coyote-time jump gating
//! - **Look**: pitch/yaw view control with a clamped camera and a wrapped
//!   body yaw, applied to camera and body independently
//! - **Sway**: a rotational spring-damper that makes a hand/weapon rig
//!   trail and overshoot the camera like it has inertia
//!
//! Audio, particles, animation blending, input binding, and cursor
//! handling are collaborators, not residents: the controller consumes
//! intent components, and publishes flags and events for the rest of the
//! game to act on.
//!
//! ## Architecture
//!
//! Physics access goes through the [`CharacterPhysicsBackend`] trait so
//! the engine can be swapped; a Rapier3D backend ships behind the
//! `rapier3d` feature. Systems run on two cadences: `FixedUpdate` for the
//! probe/force/friction pipeline and `Update` for jump gating, look,
//! sway, and the shoot relay.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bevy::prelude::*;
//! use bevy_rapier3d::prelude::*;
//! use fps_character_controller::prelude::*;
//!
//! fn spawn_player(mut commands: Commands) -> Result<(), ConfigError> {
//!     let camera = commands
//!         .spawn((Camera3d::default(), Transform::from_xyz(0.0, 0.7, 0.0)))
//!         .id();
//!     let hands = commands
//!         .spawn((Transform::default(), SwayRigBundle::new(SwayConfig::default())?))
//!         .id();
//!
//!     let body = commands
//!         .spawn((
//!             Transform::default(),
//!             FpsCharacterBundle::new(
//!                 LocomotionConfig::default(),
//!                 LookConfig::default(),
//!                 camera,
//!                 hands,
//!             )?,
//!             Rapier3dCharacterBundle::rotation_locked(),
//!             Collider::capsule_y(0.5, 0.25),
//!         ))
//!         .id();
//!     commands.entity(body).add_child(camera);
//!     Ok(())
//! }
//!
//! App::new()
//!     .add_plugins(DefaultPlugins)
//!     .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
//!     .add_plugins(FpsControllerPlugin::<Rapier3dBackend>::default())
//!     .run();
//! ```

use bevy::prelude::*;

pub mod angles;
pub mod backend;
pub mod config;
pub mod detection;
pub mod intent;
pub mod locomotion;
pub mod look;
pub mod state;
pub mod sway;
pub mod systems;

#[cfg(feature = "rapier3d")]
pub mod rapier;

use backend::CharacterPhysicsBackend;
use config::{ConfigError, FirstPersonRig, LocomotionConfig, LookConfig, SwayConfig};
use intent::{LookIntent, MovementIntent, ShootIntent};
use locomotion::LocomotionState;
use look::LookState;
use state::{MovementFlags, ShootRequested};
use sway::SwayState;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::backend::CharacterPhysicsBackend;
    pub use crate::config::{
        ConfigError, FirstPersonRig, LocomotionConfig, LookConfig, SwayConfig,
    };
    pub use crate::detection::GroundContact;
    pub use crate::intent::{LookIntent, MovementIntent, ShootIntent};
    pub use crate::locomotion::LocomotionState;
    pub use crate::look::LookState;
    pub use crate::state::{Airborne, Grounded, MovementFlags, ShootRequested};
    pub use crate::sway::SwayState;
    pub use crate::{ControllerSet, FpsCharacterBundle, FpsControllerPlugin, SwayRigBundle};

    #[cfg(feature = "rapier3d")]
    pub use crate::rapier::{Rapier3dBackend, Rapier3dCharacterBundle};
}

/// Fixed-step phases of the controller pipeline.
///
/// Backend plugins schedule their probe and force-finalization systems
/// into these sets; embedding code can order its own fixed-step systems
/// relative to them.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerSet {
    /// Clear per-step accumulators.
    Preparation,
    /// Ground probing (backend-specific).
    Probe,
    /// Movement forces, friction, marker sync.
    Forces,
    /// Hand accumulated forces to the physics engine (backend-specific).
    Finalization,
}

/// Main plugin for the character controller.
///
/// Generic over a physics backend `B` which provides the actual physics
/// operations (ground probing, force application, velocity access).
///
/// # Examples
///
/// With the Rapier3D backend:
/// ```rust,no_run
/// use bevy::prelude::*;
/// use bevy_rapier3d::prelude::*;
/// use fps_character_controller::prelude::*;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
///     .add_plugins(FpsControllerPlugin::<Rapier3dBackend>::default())
///     .run();
/// ```
pub struct FpsControllerPlugin<B: CharacterPhysicsBackend> {
    _marker: std::marker::PhantomData<B>,
}

impl<B: CharacterPhysicsBackend> Default for FpsControllerPlugin<B> {
    fn default() -> Self {
        Self {
            _marker: std::marker::PhantomData,
        }
    }
}

impl<B: CharacterPhysicsBackend> Plugin for FpsControllerPlugin<B> {
    fn build(&self, app: &mut App) {
        // Register core types
        app.register_type::<LocomotionConfig>();
        app.register_type::<LookConfig>();
        app.register_type::<SwayConfig>();
        app.register_type::<FirstPersonRig>();
        app.register_type::<MovementIntent>();
        app.register_type::<LookIntent>();
        app.register_type::<ShootIntent>();
        app.register_type::<LocomotionState>();
        app.register_type::<LookState>();
        app.register_type::<SwayState>();
        app.register_type::<MovementFlags>();
        app.register_type::<state::Grounded>();
        app.register_type::<state::Airborne>();

        app.add_event::<ShootRequested>();

        app.configure_sets(
            FixedUpdate,
            (
                ControllerSet::Preparation,
                ControllerSet::Probe,
                ControllerSet::Forces,
                ControllerSet::Finalization,
            )
                .chain(),
        );

        // Add the physics backend plugin (probe + force finalization)
        app.add_plugins(B::plugin());

        // Fixed-rate pipeline: forces and friction feed the integrator
        app.add_systems(
            FixedUpdate,
            (
                systems::apply_movement_forces::<B>,
                systems::apply_ground_friction::<B>,
                systems::sync_state_markers,
            )
                .chain()
                .in_set(ControllerSet::Forces),
        );

        // Variable-rate pipeline: input-facing updates, look before sway
        app.add_systems(
            Update,
            (
                systems::update_jump::<B>,
                systems::update_look,
                systems::update_sway,
                systems::relay_shoot,
            )
                .chain(),
        );
    }
}

/// Everything the body entity of a first-person character needs.
///
/// Constructed, not assembled ad hoc: [`FpsCharacterBundle::new`]
/// validates the configs and the rig wiring, so a bad setup fails at
/// spawn time with a [`ConfigError`] naming the problem. Physics
/// components (rigid body, collider, velocity) come from the backend's
/// own bundle.
#[derive(Bundle)]
pub struct FpsCharacterBundle {
    /// Ground contact and jump timing state.
    pub locomotion: LocomotionState,
    /// Locomotion tuning.
    pub locomotion_config: LocomotionConfig,
    /// Pitch/yaw view state.
    pub look: LookState,
    /// Look tuning.
    pub look_config: LookConfig,
    /// Camera and hands wiring.
    pub rig: FirstPersonRig,
    /// Per-step movement input.
    pub movement_intent: MovementIntent,
    /// Per-step look input.
    pub look_intent: LookIntent,
    /// Per-step fire input.
    pub shoot_intent: ShootIntent,
    /// Walk/run flags for the animation collaborator.
    pub flags: MovementFlags,
}

impl FpsCharacterBundle {
    /// Build a validated character bundle.
    ///
    /// `camera` receives the pitch rotation and should be a child of the
    /// body; `hands` receives the sway and must carry a [`SwayRigBundle`].
    pub fn new(
        locomotion: LocomotionConfig,
        look: LookConfig,
        camera: Entity,
        hands: Entity,
    ) -> Result<Self, ConfigError> {
        locomotion.validate()?;
        look.validate()?;

        Ok(Self {
            locomotion: LocomotionState::new(),
            locomotion_config: locomotion,
            look: LookState::new(),
            look_config: look,
            rig: FirstPersonRig::new(camera, hands)?,
            movement_intent: MovementIntent::default(),
            look_intent: LookIntent::default(),
            shoot_intent: ShootIntent::default(),
            flags: MovementFlags::default(),
        })
    }

    /// Build a character that starts at the given view angles instead of
    /// the identity orientation.
    pub fn with_start_angles(mut self, pitch_degrees: f32, yaw_degrees: f32) -> Self {
        self.look = LookState::with_angles(pitch_degrees, yaw_degrees);
        self
    }
}

/// Sway components for the hand-rig entity.
#[derive(Bundle)]
pub struct SwayRigBundle {
    /// Spring-damper state.
    pub sway: SwayState,
    /// Sway tuning.
    pub config: SwayConfig,
}

impl SwayRigBundle {
    /// Build a validated sway rig bundle.
    pub fn new(config: SwayConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            sway: SwayState::new(),
            config,
        })
    }

    /// Seed the sway reference with the camera's starting rotation, so an
    /// already-rotated camera does not register as a first-step rotation.
    pub fn with_reference(mut self, camera_rotation: Quat) -> Self {
        self.sway = SwayState::with_reference(camera_rotation);
        self
    }
}
