//! Angle utilities.
//!
//! Scalar helpers for keeping view angles in a well-defined range. All
//! functions are total and operate in degrees.

/// Normalize an angle to the signed shortest-path range `(-180, 180]`.
///
/// Used when a rotation difference must represent the shortest way around,
/// e.g. the sway spring's angular error.
pub fn normalize_degrees(angle: f32) -> f32 {
    let mut angle = angle;
    while angle > 180.0 {
        angle -= 360.0;
    }
    while angle <= -180.0 {
        angle += 360.0;
    }
    angle
}

/// Wrap an angle into `(-360, 360]`, one representation per revolution
/// and sign.
///
/// Unlike [`normalize_degrees`] this keeps a full turn of headroom on each
/// side, so yaw can be displayed as "350°" rather than snapping to "-10°".
pub fn wrap_degrees(angle: f32) -> f32 {
    let mut angle = angle;
    while angle > 360.0 {
        angle -= 360.0;
    }
    while angle < -360.0 {
        angle += 360.0;
    }
    angle
}
