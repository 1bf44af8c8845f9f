//! Rapier3D physics backend implementation.
//!
//! This module provides the physics backend for Bevy Rapier3D. Enable
//! with the `rapier3d` feature.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::backend::CharacterPhysicsBackend;
use crate::config::LocomotionConfig;
use crate::detection::{ground_probe_sphere, GroundContact};
use crate::locomotion::LocomotionState;
use crate::ControllerSet;

/// Rapier3D physics backend for the character controller.
///
/// Velocity and impulses go through the Rapier components directly.
/// Forces are accumulated into [`LocomotionState`] during the fixed step
/// and written to [`ExternalForce`] once at the end: `ExternalForce`
/// persists across steps in Rapier, so the accumulate-then-finalize pass
/// is what gives the controller per-step force semantics. The ground
/// probe is a dedicated system because overlap queries need the
/// `RapierContext` system parameter.
pub struct Rapier3dBackend;

impl CharacterPhysicsBackend for Rapier3dBackend {
    fn plugin() -> impl Plugin {
        Rapier3dBackendPlugin
    }

    fn get_velocity(world: &World, entity: Entity) -> Vec3 {
        world
            .get::<Velocity>(entity)
            .map(|v| v.linvel)
            .unwrap_or(Vec3::ZERO)
    }

    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec3) {
        if let Some(mut vel) = world.get_mut::<Velocity>(entity) {
            vel.linvel = velocity;
        }
    }

    fn apply_impulse(world: &mut World, entity: Entity, impulse: Vec3) {
        let mass = Self::get_mass(world, entity);
        if let Some(mut ext_impulse) = world.get_mut::<ExternalImpulse>(entity) {
            ext_impulse.impulse += impulse;
        } else if let Some(mut vel) = world.get_mut::<Velocity>(entity) {
            // No ExternalImpulse component: fall back to a direct velocity
            // change, dividing the momentum back out.
            vel.linvel += impulse / mass;
        }
    }

    fn apply_force(world: &mut World, entity: Entity, force: Vec3) {
        // Accumulated here, applied to ExternalForce by
        // finalize_accumulated_forces at the end of the fixed step.
        if let Some(mut state) = world.get_mut::<LocomotionState>(entity) {
            state.add_force(force);
        }
    }

    fn get_mass(world: &World, entity: Entity) -> f32 {
        world
            .get::<ReadMassProperties>(entity)
            .map(|props| props.mass)
            .filter(|mass| mass.is_finite() && *mass > 0.0)
            .unwrap_or(1.0)
    }
}

/// Plugin that sets up Rapier3D-specific systems for the controller.
pub struct Rapier3dBackendPlugin;

impl Plugin for Rapier3dBackendPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            clear_accumulated_forces.in_set(ControllerSet::Preparation),
        );
        app.add_systems(
            FixedUpdate,
            rapier_ground_probe.in_set(ControllerSet::Probe),
        );
        app.add_systems(
            FixedUpdate,
            finalize_accumulated_forces.in_set(ControllerSet::Finalization),
        );
    }
}

/// Zero the per-step force accumulators before this step's systems run.
fn clear_accumulated_forces(mut q_states: Query<&mut LocomotionState>) {
    for mut state in &mut q_states {
        state.accumulated_force = Vec3::ZERO;
    }
}

/// Write the accumulated forces into Rapier's `ExternalForce`.
fn finalize_accumulated_forces(mut q_forces: Query<(&LocomotionState, &mut ExternalForce)>) {
    for (state, mut force) in &mut q_forces {
        force.force = state.accumulated_force;
    }
}

/// Ground probe: sphere overlap at the bottom of the capsule.
///
/// The sphere is shrunk by `probe_skin` and pushed down by `probe_offset`
/// (both from [`LocomotionConfig`]) so that brushing a wall with the side
/// of the capsule cannot register as ground. The first overlapping
/// collider becomes the ground contact; if it has an attached rigid body,
/// that body's velocity rides along for platform friction.
fn rapier_ground_probe(
    rapier_context: ReadRapierContext,
    mut q_controllers: Query<(
        Entity,
        &GlobalTransform,
        &LocomotionConfig,
        &Collider,
        &mut LocomotionState,
    )>,
    q_velocities: Query<&Velocity>,
) {
    let Ok(context) = rapier_context.single() else {
        return;
    };

    for (entity, transform, config, collider, mut state) in &mut q_controllers {
        let Some(capsule) = collider.as_capsule() else {
            // Only capsule characters are probed; anything else stays
            // airborne rather than guessing at its bottom.
            continue;
        };

        let segment = capsule.segment();
        let half_height = (segment.a().y - segment.b().y).abs() / 2.0;
        let probe = ground_probe_sphere(half_height, capsule.radius(), config);

        let transform = transform.compute_transform();
        let up = *transform.up();
        let center = transform.translation - up * probe.drop;

        let mut filter = QueryFilter::default()
            .exclude_rigid_body(entity)
            .exclude_sensors();
        if let Some((memberships, filters)) = config.ground_groups {
            filter = filter.groups(CollisionGroups::new(
                Group::from_bits_truncate(memberships),
                Group::from_bits_truncate(filters),
            ));
        }

        let mut first_hit = None;
        context.intersections_with_shape(
            center,
            Quat::IDENTITY,
            &Collider::ball(probe.radius),
            filter,
            |hit| {
                first_hit = Some(hit);
                false
            },
        );

        state.note_probe(first_hit.map(|hit| GroundContact {
            entity: hit,
            velocity: q_velocities.get(hit).ok().map(|v| v.linvel),
        }));
    }
}

/// Physics components a Rapier character needs, pre-wired.
///
/// Rotation is fully locked: the body's yaw is driven by the look
/// controller through its `Transform`, not by the physics integrator.
#[derive(Bundle)]
pub struct Rapier3dCharacterBundle {
    /// Dynamic rigid body.
    pub rigid_body: RigidBody,
    /// Linear and angular velocity.
    pub velocity: Velocity,
    /// Per-step force sink, written by the finalize pass.
    pub external_force: ExternalForce,
    /// Impulse sink for jumps.
    pub external_impulse: ExternalImpulse,
    /// Mass readback for acceleration scaling.
    pub mass_properties: ReadMassProperties,
    /// Rotation lock.
    pub locked_axes: LockedAxes,
}

impl Rapier3dCharacterBundle {
    /// A dynamic body with all rotation locked.
    pub fn rotation_locked() -> Self {
        Self {
            rigid_body: RigidBody::Dynamic,
            velocity: Velocity::default(),
            external_force: ExternalForce::default(),
            external_impulse: ExternalImpulse::default(),
            mass_properties: ReadMassProperties::default(),
            locked_axes: LockedAxes::ROTATION_LOCKED,
        }
    }
}

impl Default for Rapier3dCharacterBundle {
    fn default() -> Self {
        Self::rotation_locked()
    }
}
