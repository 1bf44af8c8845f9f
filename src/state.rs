//! Derived movement state: markers, animation flags, and effect events.
//!
//! These are the controller's outputs toward the rest of the game:
//! marker components for query filtering, the walk/run flags an animation
//! system mirrors, and the shoot request event.

use bevy::prelude::*;

use crate::intent::MovementIntent;

/// Marker component indicating the character is grounded.
///
/// Added automatically when the ground probe finds a contact and removed
/// when the character becomes airborne. Mutually exclusive with
/// [`Airborne`].
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Grounded;

/// Marker component indicating the character is airborne.
///
/// Mutually exclusive with [`Grounded`].
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Airborne;

/// Walk/run flags for the animation collaborator.
///
/// Recomputed every fixed step from movement intent: `running` iff there
/// is movement input with sprint held, `walking` iff there is movement
/// input without sprint. Never both; both false at zero input. The flags
/// describe intent, so they are valid airborne too.
#[derive(Component, Reflect, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[reflect(Component)]
pub struct MovementFlags {
    /// Moving without the sprint modifier.
    pub walking: bool,
    /// Moving with the sprint modifier held.
    pub running: bool,
}

impl MovementFlags {
    /// Derive the flags from this step's movement intent.
    pub fn from_intent(intent: &MovementIntent) -> Self {
        let moving = intent.is_active();
        Self {
            walking: moving && !intent.sprint,
            running: moving && intent.sprint,
        }
    }

    /// Whether there is any movement at all.
    pub fn moving(&self) -> bool {
        self.walking || self.running
    }
}

/// A shot was requested this step.
///
/// The controller only raises the request; the animation collaborator
/// owns the timing. It should drive the actual effect (muzzle flash,
/// sound) from an animation-timeline callback so the effect stays
/// synchronized with the fire animation, and drop the request while a
/// blocking animation (e.g. reload) is playing.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShootRequested {
    /// The character that requested the shot.
    pub shooter: Entity,
}
