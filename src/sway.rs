//! Rotational spring-damper sway for the hand rig.
//!
//! The rig trails the camera with inertia: a fraction of every camera
//! rotation is copied outright (the follow term), while a spring
//! accelerates the rig's angular velocity toward the camera along the
//! shortest rotational path and drag bleeds that velocity off again. The
//! rig's position never lags; it is pinned to the camera every step.

use std::f32::consts::{PI, TAU};

use bevy::prelude::*;

use crate::config::SwayConfig;

/// Sway simulation state for one rig.
///
/// Angular velocity is kept in world space (rad/s) and converted into the
/// rig's local frame only at integration time, matching how the spring
/// axis is computed in world space.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct SwayState {
    /// World-space angular velocity of the rig, rad/s.
    pub angular_velocity: Vec3,
    /// Camera rotation observed at the end of the previous step.
    last_camera_rotation: Quat,
}

impl Default for SwayState {
    fn default() -> Self {
        Self {
            angular_velocity: Vec3::ZERO,
            last_camera_rotation: Quat::IDENTITY,
        }
    }
}

impl SwayState {
    /// State for a rig whose camera starts at the identity orientation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the reference with the camera's starting rotation, so a rig
    /// attached to an already-rotated camera does not read the whole
    /// starting orientation as one step of camera motion.
    pub fn with_reference(camera_rotation: Quat) -> Self {
        Self {
            angular_velocity: Vec3::ZERO,
            last_camera_rotation: camera_rotation,
        }
    }

    /// The camera rotation this state last observed.
    pub fn last_camera_rotation(&self) -> Quat {
        self.last_camera_rotation
    }

    /// Advance the sway simulation by one step and return the rig's new
    /// rotation.
    ///
    /// Drag is applied to the carried-over velocity *before* the spring
    /// adds this step's acceleration; damping the fresh contribution as
    /// well would weaken the spring at exactly the moments it has the
    /// most work to do.
    pub fn step(
        &mut self,
        rig_rotation: Quat,
        camera_rotation: Quat,
        dt: f32,
        config: &SwayConfig,
    ) -> Quat {
        // Drag, clamped so a single oversized step stops the rig instead
        // of reversing it.
        self.angular_velocity *= (1.0 - config.drag * dt).max(0.0);

        // Carry the rig along with this step's camera motion.
        let camera_delta = self.last_camera_rotation.inverse() * camera_rotation;
        let mut rotation =
            rig_rotation.slerp(rig_rotation * camera_delta, config.follow_strength);

        // Spring toward the camera along the shortest rotational path.
        let (axis, angle) = shortest_arc(rotation.inverse() * camera_rotation);
        let world_axis = rotation * axis;
        self.angular_velocity += world_axis * (config.spring_force * angle * dt);

        // Integrate the angular velocity as a rotation in the rig's local
        // frame.
        let local_velocity = rotation.inverse() * self.angular_velocity;
        rotation = (rotation * Quat::from_scaled_axis(local_velocity * dt)).normalize();

        self.last_camera_rotation = camera_rotation;
        rotation
    }
}

/// Decompose a rotation into its shortest-path axis and angle.
///
/// `Quat::to_axis_angle` may report the long way around (angle above π)
/// for quaternions with a negative scalar part; fold those back so the
/// spring always pulls the short way.
fn shortest_arc(rotation: Quat) -> (Vec3, f32) {
    let (axis, angle) = rotation.normalize().to_axis_angle();
    if angle > PI {
        (-axis, TAU - angle)
    } else {
        (axis, angle)
    }
}
