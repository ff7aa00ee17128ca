//! Vertical sprite physics
//!
//! Semi-implicit Euler in tick units: velocity first, then position with the
//! new velocity.

use super::state::Sprite;

/// Advance the sprite by one tick under gravity
///
/// A flap this tick replaces the gravity-incremented velocity with the
/// impulse before the position update.
pub fn integrate(sprite: &mut Sprite, gravity: f32, flap_impulse: Option<f32>) {
    sprite.velocity = match flap_impulse {
        Some(impulse) => impulse,
        None => sprite.velocity + gravity,
    };
    sprite.y += sprite.velocity;
}

/// Apply an upward impulse immediately (replaces, never adds)
#[inline]
pub fn flap(sprite: &mut Sprite, impulse: f32) {
    sprite.velocity = impulse;
}
