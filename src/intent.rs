//! Movement, look, and shoot intent components.
//!
//! Intents represent the desired motion for the current step, written by
//! player input or AI. The controller systems read these intents and apply
//! the appropriate physics; input binding itself (which key maps to which
//! signal) stays outside the crate.

use bevy::prelude::*;

/// Desired planar movement for the current step.
///
/// `direction` is a raw 2D axis in `[-1, 1]²`: `x` strafes right, `y`
/// moves forward. `sprint` is the held state of the sprint modifier, and
/// `jump` must be true only on the step the jump action fired (the edge,
/// not the held state; edge detection belongs to the input layer).
///
/// # Example
///
/// ```rust
/// use fps_character_controller::prelude::*;
/// use bevy::math::Vec2;
///
/// let mut intent = MovementIntent::default();
/// intent.set_direction(Vec2::new(0.0, 1.0));
/// intent.sprint = true;
/// assert!(intent.is_active());
/// ```
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct MovementIntent {
    /// Planar movement axis, each component clamped to `[-1, 1]`.
    pub direction: Vec2,
    /// Whether the sprint modifier is held.
    pub sprint: bool,
    /// Whether the jump action fired this step.
    pub jump: bool,
}

impl MovementIntent {
    /// Set the movement axis, clamping each component to `[-1, 1]`.
    pub fn set_direction(&mut self, direction: Vec2) {
        self.direction = direction.clamp(Vec2::splat(-1.0), Vec2::splat(1.0));
    }

    /// Clear all movement input.
    pub fn clear(&mut self) {
        self.direction = Vec2::ZERO;
        self.sprint = false;
        self.jump = false;
    }

    /// Check if there is active movement input.
    pub fn is_active(&self) -> bool {
        self.direction.length() > 0.001
    }

    /// The movement axis after response shaping.
    ///
    /// The raw axis is magnitude-normalized, then each component is run
    /// through a concave curve that leaves -1, 0, and 1 fixed while
    /// boosting mid-range values, giving finer analog control near the
    /// center of a stick's travel.
    pub fn shaped_direction(&self) -> Vec2 {
        let normalized = self.direction.normalize_or_zero();
        Vec2::new(shape_axis(normalized.x), shape_axis(normalized.y))
    }
}

/// Concave response curve `sign(x) * sqrt(|x|)`.
///
/// The sign is split off before the square root: exponentiating a
/// negative base would be undefined, so the magnitude is shaped and the
/// sign restored afterwards.
fn shape_axis(x: f32) -> f32 {
    let shaped = x.abs().sqrt();
    if x < 0.0 {
        -shaped
    } else {
        shaped
    }
}

/// Desired view rotation for the current step.
///
/// `delta` is this step's look input (mouse delta or right-stick axis):
/// `x` yaws right, `y` pitches up. Sampled once per step and scaled by
/// [`LookConfig::sensitivity`](crate::config::LookConfig).
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct LookIntent {
    /// Look delta for this step.
    pub delta: Vec2,
}

impl LookIntent {
    /// Set the look delta for this step.
    pub fn set_delta(&mut self, delta: Vec2) {
        self.delta = delta;
    }

    /// Clear the look delta.
    pub fn clear(&mut self) {
        self.delta = Vec2::ZERO;
    }
}

/// Fire request for the current step.
///
/// True only on the step the shoot action fired. The controller relays it
/// as a [`ShootRequested`](crate::state::ShootRequested) event; whether
/// and when the shot effect actually plays is decided by the animation
/// collaborator consuming that event.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct ShootIntent {
    /// Whether the shoot action fired this step.
    pub triggered: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_direction_clamps_each_axis() {
        let mut intent = MovementIntent::default();
        intent.set_direction(Vec2::new(5.0, -5.0));
        assert_eq!(intent.direction, Vec2::new(1.0, -1.0));

        intent.set_direction(Vec2::new(0.5, -0.25));
        assert_eq!(intent.direction, Vec2::new(0.5, -0.25));
    }

    #[test]
    fn is_active_ignores_noise_below_threshold() {
        let mut intent = MovementIntent::default();
        assert!(!intent.is_active());

        intent.set_direction(Vec2::new(0.0005, 0.0));
        assert!(!intent.is_active());

        intent.set_direction(Vec2::new(0.5, 0.0));
        assert!(intent.is_active());
    }

    #[test]
    fn clear_resets_everything() {
        let mut intent = MovementIntent {
            direction: Vec2::ONE,
            sprint: true,
            jump: true,
        };
        intent.clear();
        assert_eq!(intent.direction, Vec2::ZERO);
        assert!(!intent.sprint);
        assert!(!intent.jump);
    }

    #[test]
    fn response_curve_fixes_the_extremes() {
        assert_eq!(shape_axis(0.0), 0.0);
        assert_eq!(shape_axis(1.0), 1.0);
        assert_eq!(shape_axis(-1.0), -1.0);
    }

    #[test]
    fn response_curve_boosts_mid_range() {
        assert!(shape_axis(0.25) > 0.25);
        assert!(shape_axis(-0.25) < -0.25);
    }

    #[test]
    fn response_curve_is_monotonic_on_unit_interval() {
        let mut previous = 0.0;
        for step in 1..=100 {
            let x = step as f32 / 100.0;
            let y = shape_axis(x);
            assert!(y > previous, "curve must increase at x={x}");
            previous = y;
        }
    }

    #[test]
    fn response_curve_never_produces_nan() {
        for x in [-1.0, -0.7, -0.1, 0.0, 0.1, 0.7, 1.0] {
            assert!(shape_axis(x).is_finite());
        }
    }

    #[test]
    fn shaped_direction_normalizes_before_shaping() {
        let mut intent = MovementIntent::default();
        intent.set_direction(Vec2::new(1.0, 1.0));

        let shaped = intent.shaped_direction();
        let expected = (1.0f32 / 2.0f32.sqrt()).sqrt();
        assert!((shaped.x - expected).abs() < 1e-6);
        assert!((shaped.y - expected).abs() < 1e-6);
    }

    #[test]
    fn shaped_direction_of_zero_input_is_zero() {
        let intent = MovementIntent::default();
        assert_eq!(intent.shaped_direction(), Vec2::ZERO);
    }

    #[test]
    fn look_intent_roundtrip() {
        let mut intent = LookIntent::default();
        intent.set_delta(Vec2::new(3.0, -2.0));
        assert_eq!(intent.delta, Vec2::new(3.0, -2.0));

        intent.clear();
        assert_eq!(intent.delta, Vec2::ZERO);
    }
}
