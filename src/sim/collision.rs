//! Distance-based collision checks
//!
//! Everything in the combat sub-system collides as points with a fixed
//! radius; sprite geometry plays no part.

use glam::Vec2;

/// Enemy vs. falling note (pixels)
pub const ENEMY_NOTE_RADIUS: f32 = 104.0;

/// Projectile vs. enemy (pixels)
pub const PROJECTILE_ENEMY_RADIUS: f32 = 62.0;

/// True when `a` and `b` are no further apart than `radius` (inclusive)
#[inline]
pub fn within_radius(a: Vec2, b: Vec2, radius: f32) -> bool {
    a.distance_squared(b) <= radius * radius
}

/// True when `point` lies outside the `width` x `height` playfield
#[inline]
pub fn outside_bounds(point: Vec2, width: f32, height: f32) -> bool {
    point.x < 0.0 || point.x > width || point.y < 0.0 || point.y > height
}
