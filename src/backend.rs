//! Physics backend abstraction.
//!
//! The controller never talks to a physics engine directly; it goes
//! through this trait so the engine can be swapped (Rapier3D included,
//! test mocks, custom integrators). The backend also owns the ground
//! probe: overlap queries need engine-specific context, so they run as
//! systems added by the backend's plugin (scheduled in
//! [`ControllerSet::Probe`](crate::ControllerSet::Probe)) rather than as
//! trait calls.

use bevy::prelude::*;

/// Trait for physics backend implementations.
///
/// The velocity and force accessors operate on whatever components the
/// backend uses for its rigid bodies. Entities without those components
/// are treated as massless phantoms: reads return zero, writes are
/// dropped. Per-step operations never fail; wiring errors are caught at
/// construction time instead.
///
/// # Implementing
///
/// `plugin()` must return a plugin that schedules a ground-probe system
/// in [`ControllerSet::Probe`](crate::ControllerSet::Probe), feeding each
/// character's [`LocomotionState`](crate::locomotion::LocomotionState)
/// via `note_probe`. See the `rapier` module for the reference
/// implementation.
pub trait CharacterPhysicsBackend: 'static + Send + Sync {
    /// The plugin that sets up this backend's systems.
    fn plugin() -> impl Plugin;

    /// Get the current linear velocity of an entity.
    fn get_velocity(world: &World, entity: Entity) -> Vec3;

    /// Set the linear velocity of an entity.
    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec3);

    /// Apply an instantaneous change in momentum.
    fn apply_impulse(world: &mut World, entity: Entity, impulse: Vec3);

    /// Apply a force over the current physics timestep.
    fn apply_force(world: &mut World, entity: Entity, force: Vec3);

    /// Get the mass of an entity.
    ///
    /// Used to scale configured accelerations into forces, so tuning
    /// values behave the same across bodies of different mass. Defaults
    /// to 1.0 (no scaling).
    fn get_mass(_world: &World, _entity: Entity) -> f32 {
        1.0
    }

    /// Get the fixed timestep delta, with a 60 Hz fallback for worlds
    /// that have no fixed-time resource (headless tests).
    fn get_fixed_timestep(world: &World) -> f32 {
        world
            .get_resource::<Time<Fixed>>()
            .map(|t| t.delta_secs())
            .filter(|&dt| dt > 0.0)
            .unwrap_or(1.0 / 60.0)
    }
}
