//! Ground detection results and probe geometry.
//!
//! The ground probe is an overlap query: a sphere placed at the bottom of
//! the character's capsule, slightly shrunk and pushed down so that side
//! contact with walls does not register as ground. The backend plugin runs
//! the actual query; this module defines the result type and the shared
//! sphere derivation.

use bevy::prelude::*;

use crate::config::LocomotionConfig;

/// A single ground contact reported by the probe.
///
/// The probe keeps the first overlapping collider it finds. When that
/// collider has an attached rigid body, its velocity is recorded so the
/// friction system can let the character ride moving platforms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundContact {
    /// The collider entity the probe overlapped.
    pub entity: Entity,
    /// Velocity of the attached rigid body, if the ground is dynamic.
    pub velocity: Option<Vec3>,
}

impl GroundContact {
    /// Contact with static ground.
    pub fn fixed(entity: Entity) -> Self {
        Self {
            entity,
            velocity: None,
        }
    }

    /// Contact with a moving body (platform, vehicle).
    pub fn moving(entity: Entity, velocity: Vec3) -> Self {
        Self {
            entity,
            velocity: Some(velocity),
        }
    }
}

/// Probe sphere in the character's local frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeSphere {
    /// Distance from the body origin to the sphere center, along the
    /// body's down axis.
    pub drop: f32,
    /// Sphere radius.
    pub radius: f32,
}

/// Derive the probe sphere from capsule dimensions.
///
/// The sphere is centered on the capsule's bottom sphere, then shrunk by
/// `probe_skin` and lowered by `probe_offset` so that touching a wall with
/// the side of the capsule cannot count as standing on it.
///
/// `half_height` is the capsule's half segment length (as in
/// `Collider::capsule_y(half_height, radius)`), so the bottom sphere
/// center sits `half_height` below the body origin.
pub fn ground_probe_sphere(
    half_height: f32,
    radius: f32,
    config: &LocomotionConfig,
) -> ProbeSphere {
    ProbeSphere {
        drop: half_height + config.probe_offset,
        radius: (radius - config.probe_skin).max(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_with_static_ground_has_no_velocity() {
        let contact = GroundContact::fixed(Entity::from_raw(7));
        assert!(contact.velocity.is_none());
    }

    #[test]
    fn contact_with_platform_carries_its_velocity() {
        let contact = GroundContact::moving(Entity::from_raw(7), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(contact.velocity, Some(Vec3::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn probe_sphere_sits_below_capsule_bottom() {
        let config = LocomotionConfig::default();
        let probe = ground_probe_sphere(0.5, 0.25, &config);

        assert_eq!(probe.drop, 0.5 + config.probe_offset);
        assert_eq!(probe.radius, 0.25 - config.probe_skin);
    }

    #[test]
    fn probe_sphere_radius_never_goes_negative() {
        let config = LocomotionConfig::default();
        let probe = ground_probe_sphere(0.5, 0.005, &config);

        assert_eq!(probe.radius, 0.0);
    }
}
