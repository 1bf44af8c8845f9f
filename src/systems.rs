//! Core controller systems.
//!
//! Two cadences, kept strictly separate:
//!
//! - `FixedUpdate`: ground probing (backend plugin), movement forces, and
//!   friction, everything that feeds the physics integrator.
//! - `Update`: jump gating, view rotation, sway, and the shoot relay,
//!   everything that should react at input/frame rate.
//!
//! Systems that talk to the physics backend are exclusive-world systems
//! generic over the backend; they collect what they need up front, then
//! apply changes through the backend's static methods.

use bevy::prelude::*;

use crate::backend::CharacterPhysicsBackend;
use crate::config::{FirstPersonRig, LocomotionConfig, LookConfig, SwayConfig};
use crate::intent::{LookIntent, MovementIntent, ShootIntent};
use crate::locomotion::{friction_blend, LocomotionState};
use crate::look::LookState;
use crate::state::{Airborne, Grounded, MovementFlags, ShootRequested};
use crate::sway::SwayState;

/// Apply movement forces and refresh the walk/run flags.
///
/// Runs every fixed step. The shaped local input is rotated into world
/// space by the body's current yaw, and the acceleration magnitude is
/// selected by state (airborne overrides the sprint/walk choice). The
/// force handed to the backend is mass-scaled so the configured values
/// stay accelerations.
pub fn apply_movement_forces<B: CharacterPhysicsBackend>(world: &mut World) {
    let entities: Vec<(Entity, MovementIntent, f32)> = world
        .query::<(Entity, &LocomotionConfig, &MovementIntent, &LocomotionState)>()
        .iter(world)
        .map(|(entity, config, intent, state)| {
            (entity, *intent, state.acceleration(config, intent.sprint))
        })
        .collect();

    for (entity, intent, acceleration) in entities {
        let flags = MovementFlags::from_intent(&intent);
        if let Some(mut current) = world.get_mut::<MovementFlags>(entity) {
            current.set_if_neq(flags);
        }

        let local = intent.shaped_direction();
        if local == Vec2::ZERO {
            continue;
        }

        let rotation = world
            .get::<Transform>(entity)
            .map(|t| t.rotation)
            .unwrap_or(Quat::IDENTITY);
        // Input y is forward, which is -Z in the body frame.
        let direction = (rotation * Vec3::new(local.x, 0.0, -local.y)).normalize_or_zero();

        let mass = B::get_mass(world, entity);
        B::apply_force(world, entity, direction * acceleration * mass);
    }
}

/// Damp grounded bodies toward their ground's velocity.
///
/// Runs every fixed step, after the movement forces. On static ground the
/// target is zero, which is plain exponential decay; on a moving platform
/// the body converges onto the platform's velocity, so characters ride
/// vehicles without sliding off. Airborne bodies get no friction at all;
/// the body's physics material is expected to be frictionless so it
/// cannot stick to walls.
pub fn apply_ground_friction<B: CharacterPhysicsBackend>(world: &mut World) {
    let dt = B::get_fixed_timestep(world);

    let entities: Vec<(Entity, f32, Vec3)> = world
        .query::<(Entity, &LocomotionConfig, &LocomotionState)>()
        .iter(world)
        .filter(|(_, _, state)| state.grounded)
        .map(|(entity, config, state)| {
            (
                entity,
                config.ground_friction,
                state.ground_velocity().unwrap_or(Vec3::ZERO),
            )
        })
        .collect();

    for (entity, rate, target) in entities {
        let velocity = B::get_velocity(world, entity);
        B::set_velocity(world, entity, friction_blend(velocity, target, rate, dt));
    }
}

/// Advance jump timers and apply accepted jumps.
///
/// Runs every variable step so the coyote and cooldown windows are
/// measured in real frames, not physics ticks. An accepted jump is an
/// instantaneous upward velocity change along world up.
pub fn update_jump<B: CharacterPhysicsBackend>(world: &mut World) {
    let dt = world
        .get_resource::<Time>()
        .map(|t| t.delta_secs())
        .unwrap_or(0.0);

    let entities: Vec<(Entity, LocomotionConfig, bool)> = world
        .query::<(Entity, &LocomotionConfig, &LocomotionState, Option<&MovementIntent>)>()
        .iter(world)
        .map(|(entity, config, _, intent)| {
            (entity, *config, intent.map(|i| i.jump).unwrap_or(false))
        })
        .collect();

    for (entity, config, requested) in entities {
        let Some(mut state) = world.get_mut::<LocomotionState>(entity) else {
            continue;
        };
        let accepted = state.try_jump(requested, &config, dt);
        if !accepted {
            continue;
        }

        debug!("jump accepted for {entity}");
        let mass = B::get_mass(world, entity);
        B::apply_impulse(world, entity, Vec3::Y * config.jump_impulse * mass);
    }
}

/// Sync the [`Grounded`]/[`Airborne`] markers from the locomotion state.
pub fn sync_state_markers(
    mut commands: Commands,
    q_controllers: Query<(Entity, &LocomotionState, Has<Grounded>, Has<Airborne>)>,
) {
    for (entity, state, has_grounded, has_airborne) in &q_controllers {
        if state.grounded && !has_grounded {
            debug!("{entity} grounded");
            commands.entity(entity).insert(Grounded).remove::<Airborne>();
        } else if !state.grounded && (has_grounded || !has_airborne) {
            if has_grounded {
                debug!("{entity} airborne");
            }
            commands.entity(entity).insert(Airborne).remove::<Grounded>();
        }
    }
}

/// Apply look input: pitch to the camera node, yaw to the body node.
///
/// Runs every variable step. The two axes are written independently so
/// pitching the view never turns the body and yawing never disturbs the
/// stored pitch.
pub fn update_look(
    mut q_bodies: Query<(Entity, &LookIntent, &LookConfig, &mut LookState, &FirstPersonRig)>,
    mut q_transforms: Query<&mut Transform>,
) {
    for (entity, intent, config, mut state, rig) in &mut q_bodies {
        state.apply(intent.delta, config);

        let Ok([mut body, mut camera]) = q_transforms.get_many_mut([entity, rig.camera]) else {
            continue;
        };
        body.rotation = state.body_rotation();
        camera.rotation = state.camera_rotation();
    }
}

/// Step the hand-rig sway and pin the rig to the camera.
///
/// Runs every variable step, after [`update_look`]. The camera's world
/// pose is composed from the body transform and the camera's local
/// transform directly (not from last frame's propagated global), so the
/// rig reacts to this step's look input without a frame of latency. Only
/// the rotation lags; the position is hard-set every step.
pub fn update_sway(
    time: Res<Time>,
    q_bodies: Query<(Entity, &FirstPersonRig)>,
    mut q_sway: Query<(&mut SwayState, &SwayConfig)>,
    mut q_transforms: Query<&mut Transform>,
) {
    let dt = time.delta_secs();

    for (entity, rig) in &q_bodies {
        let Ok((mut sway, config)) = q_sway.get_mut(rig.hands) else {
            continue;
        };
        let Ok([body, camera, mut hands]) =
            q_transforms.get_many_mut([entity, rig.camera, rig.hands])
        else {
            continue;
        };

        let camera_rotation = body.rotation * camera.rotation;
        let camera_position = body.translation + body.rotation * camera.translation;

        hands.rotation = sway.step(hands.rotation, camera_rotation, dt, config);
        hands.translation = camera_position;
    }
}

/// Relay shoot intents as [`ShootRequested`] events.
///
/// The controller does not play the effect itself; the animation
/// collaborator consumes the event and fires the actual shot from its
/// timeline callback.
pub fn relay_shoot(
    q_shooters: Query<(Entity, &ShootIntent)>,
    mut events: EventWriter<ShootRequested>,
) {
    for (entity, intent) in &q_shooters {
        if intent.triggered {
            events.write(ShootRequested { shooter: entity });
        }
    }
}
