//! View orientation state.
//!
//! Pitch and yaw are kept as independent scalars and only composed into
//! rotations on the way out: a pitch-only rotation for the camera node
//! and a yaw-only rotation for the body node. Pitching the view therefore
//! never turns the body, and yawing never disturbs the stored pitch.

use bevy::prelude::*;

use crate::angles::wrap_degrees;
use crate::config::LookConfig;

/// Pitch/yaw view state, in degrees.
///
/// Pitch is clamped to the configured limit (at most ±90°, so the camera
/// can never flip over the vertical). Yaw is wrapped into `(-360, 360]`,
/// so winding the view by any number of full turns leaves the orientation
/// identical to the wrapped remainder.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct LookState {
    pitch_degrees: f32,
    yaw_degrees: f32,
}

impl LookState {
    /// Identity orientation: level pitch, forward along -Z.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a configured orientation. Pitch is clamped to ±90° and
    /// yaw wrapped, so the invariants hold from the first step.
    pub fn with_angles(pitch_degrees: f32, yaw_degrees: f32) -> Self {
        Self {
            pitch_degrees: pitch_degrees.clamp(-90.0, 90.0),
            yaw_degrees: wrap_degrees(yaw_degrees),
        }
    }

    /// Current pitch in degrees.
    pub fn pitch_degrees(&self) -> f32 {
        self.pitch_degrees
    }

    /// Current yaw in degrees.
    pub fn yaw_degrees(&self) -> f32 {
        self.yaw_degrees
    }

    /// Apply one step of look input.
    ///
    /// `delta.x` yaws right, `delta.y` pitches up, both scaled by
    /// `sensitivity * 0.01` degrees per input unit.
    pub fn apply(&mut self, delta: Vec2, config: &LookConfig) {
        let scale = config.sensitivity * 0.01;

        self.pitch_degrees = (self.pitch_degrees + delta.y * scale)
            .clamp(-config.pitch_limit, config.pitch_limit);

        self.yaw_degrees = wrap_degrees(self.yaw_degrees + delta.x * scale);
    }

    /// Pitch-only rotation for the camera node.
    pub fn camera_rotation(&self) -> Quat {
        Quat::from_rotation_x(self.pitch_degrees.to_radians())
    }

    /// Yaw-only rotation for the body node.
    ///
    /// Positive yaw turns right, which is a negative rotation about +Y.
    pub fn body_rotation(&self) -> Quat {
        Quat::from_rotation_y(-self.yaw_degrees.to_radians())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drive the state with raw deltas at sensitivity 100, so one input
    /// unit is one degree.
    fn degrees(state: &mut LookState, pitch: f32, yaw: f32) {
        let config = LookConfig::default().with_sensitivity(100.0);
        state.apply(Vec2::new(yaw, pitch), &config);
    }

    #[test]
    fn pitch_accumulates_and_clamps() {
        let mut state = LookState::new();
        degrees(&mut state, 30.0, 0.0);
        assert!((state.pitch_degrees() - 30.0).abs() < 1e-4);

        degrees(&mut state, 80.0, 0.0);
        assert_eq!(state.pitch_degrees(), 90.0);

        degrees(&mut state, -300.0, 0.0);
        assert_eq!(state.pitch_degrees(), -90.0);
    }

    #[test]
    fn pitch_stays_bounded_for_any_delta_sequence() {
        let mut state = LookState::new();
        for (i, delta) in [250.0, -1000.0, 33.3, 720.0, -0.1, 5000.0].iter().enumerate() {
            degrees(&mut state, *delta, i as f32);
            assert!(state.pitch_degrees() >= -90.0);
            assert!(state.pitch_degrees() <= 90.0);
        }
    }

    #[test]
    fn yaw_wraps_to_a_single_representation() {
        let mut wound = LookState::new();
        // +370° in steps.
        for _ in 0..37 {
            degrees(&mut wound, 0.0, 10.0);
        }

        let mut direct = LookState::new();
        degrees(&mut direct, 0.0, 10.0);

        assert!((wound.yaw_degrees() - direct.yaw_degrees()).abs() < 1e-3);
        assert!(wound.body_rotation().angle_between(direct.body_rotation()) < 1e-4);
    }

    #[test]
    fn yaw_wraps_in_both_directions() {
        let mut state = LookState::new();
        for _ in 0..100 {
            degrees(&mut state, 0.0, -45.0);
        }
        assert!(state.yaw_degrees() > -360.0);
        assert!(state.yaw_degrees() <= 360.0);
    }

    #[test]
    fn pitching_never_turns_the_body() {
        let mut state = LookState::new();
        degrees(&mut state, 45.0, 0.0);
        assert_eq!(state.body_rotation(), Quat::IDENTITY);
    }

    #[test]
    fn yawing_never_disturbs_the_camera_pitch() {
        let mut state = LookState::with_angles(20.0, 0.0);
        let camera_before = state.camera_rotation();
        degrees(&mut state, 0.0, 90.0);
        assert_eq!(state.camera_rotation(), camera_before);
    }

    #[test]
    fn configured_start_orientation_is_normalized() {
        let state = LookState::with_angles(120.0, 400.0);
        assert_eq!(state.pitch_degrees(), 90.0);
        assert_eq!(state.yaw_degrees(), 40.0);
    }

    #[test]
    fn positive_yaw_turns_right() {
        let mut state = LookState::new();
        degrees(&mut state, 0.0, 90.0);
        let forward = state.body_rotation() * Vec3::NEG_Z;
        // Facing +X after a 90° right turn.
        assert!((forward - Vec3::X).length() < 1e-4);
    }

    #[test]
    fn positive_pitch_looks_up() {
        let mut state = LookState::new();
        degrees(&mut state, 90.0, 0.0);
        let forward = state.camera_rotation() * Vec3::NEG_Z;
        assert!((forward - Vec3::Y).length() < 1e-4);
    }
}
