//! Axis-aligned collision detection
//!
//! Pure predicates over the sprite rectangle and the obstacle field. The
//! field bounds count as solid: touching the floor or the ceiling ends a run.

use serde::{Deserialize, Serialize};

use super::state::{Obstacle, Sprite};

/// Which gate of an obstacle was hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gate {
    Top,
    Bottom,
}

/// What the sprite collided with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Collision {
    Floor,
    Ceiling,
    Obstacle { id: u32, gate: Gate },
}

/// Whether the sprite and obstacle spans overlap horizontally (open intervals)
#[inline]
pub fn overlaps_horizontally(sprite: &Sprite, obstacle: &Obstacle) -> bool {
    sprite.x < obstacle.right() && sprite.right() > obstacle.x
}

/// Check the sprite against the field bounds
pub fn bounds_collision(sprite: &Sprite, field_height: f32) -> Option<Collision> {
    if sprite.bottom() >= field_height {
        Some(Collision::Floor)
    } else if sprite.y <= 0.0 {
        Some(Collision::Ceiling)
    } else {
        None
    }
}

/// Check the sprite against a single obstacle
///
/// Only meaningful while the spans overlap horizontally; the sprite must sit
/// entirely inside the gap to pass.
pub fn obstacle_collision(sprite: &Sprite, obstacle: &Obstacle) -> Option<Collision> {
    if !overlaps_horizontally(sprite, obstacle) {
        return None;
    }
    let gate = if sprite.y < obstacle.top_height {
        Gate::Top
    } else if sprite.bottom() > obstacle.bottom_y {
        Gate::Bottom
    } else {
        return None;
    };
    Some(Collision::Obstacle {
        id: obstacle.id,
        gate,
    })
}

/// First collision found, bounds before obstacles (in spawn order)
pub fn detect(sprite: &Sprite, obstacles: &[Obstacle], field_height: f32) -> Option<Collision> {
    bounds_collision(sprite, field_height)
        .or_else(|| obstacles.iter().find_map(|o| obstacle_collision(sprite, o)))
}

/// Boolean form of [`detect`]
#[inline]
pub fn collides(sprite: &Sprite, obstacles: &[Obstacle], field_height: f32) -> bool {
    detect(sprite, obstacles, field_height).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    const FIELD_H: f32 = 600.0;

    fn sprite_at(y: f32) -> Sprite {
        Sprite {
            y,
            ..Sprite::spawn(&Tuning::default())
        }
    }

    /// Obstacle overlapping the sprite column (sprite spans x 50..90)
    fn gate_over_sprite(top_height: f32) -> Obstacle {
        Obstacle::new(1, 60.0, 50.0, top_height, 150.0)
    }

    #[test]
    fn test_ceiling_always_collides() {
        let sprite = sprite_at(0.0);
        assert_eq!(detect(&sprite, &[], FIELD_H), Some(Collision::Ceiling));
        // Obstacle state is irrelevant
        let far = Obstacle::new(1, 300.0, 50.0, 100.0, 150.0);
        assert!(collides(&sprite, &[far], FIELD_H));
        assert!(collides(&sprite, &[gate_over_sprite(0.0)], FIELD_H));
    }

    #[test]
    fn test_floor_collides_on_touch() {
        // Bottom edge exactly on the floor
        assert_eq!(detect(&sprite_at(570.0), &[], FIELD_H), Some(Collision::Floor));
        assert!(!collides(&sprite_at(569.5), &[], FIELD_H));
    }

    #[test]
    fn test_inside_gap_is_safe() {
        let gate = gate_over_sprite(100.0);
        assert_eq!(gate.bottom_y, 250.0);
        // Sprite spans 100..130, 150..180, 220..250
        for y in [100.0, 150.0, 220.0] {
            assert!(!collides(&sprite_at(y), &[gate], FIELD_H), "y = {y}");
        }
    }

    #[test]
    fn test_outside_gap_collides() {
        let gate = gate_over_sprite(100.0);
        assert_eq!(
            detect(&sprite_at(90.0), &[gate], FIELD_H),
            Some(Collision::Obstacle { id: 1, gate: Gate::Top })
        );
        assert_eq!(
            detect(&sprite_at(221.0), &[gate], FIELD_H),
            Some(Collision::Obstacle { id: 1, gate: Gate::Bottom })
        );
    }

    #[test]
    fn test_no_horizontal_overlap_no_collision() {
        let sprite = sprite_at(10.0);
        // Edges touching is not an overlap
        let ahead = Obstacle::new(1, 90.0, 50.0, 100.0, 150.0);
        let behind = Obstacle::new(2, 0.0, 50.0, 100.0, 150.0);
        assert!(!overlaps_horizontally(&sprite, &ahead));
        assert!(!overlaps_horizontally(&sprite, &behind));
        assert!(!collides(&sprite, &[ahead, behind], FIELD_H));

        let touching = Obstacle::new(3, 89.0, 50.0, 100.0, 150.0);
        assert!(collides(&sprite, &[touching], FIELD_H));
    }

    #[test]
    fn test_any_obstacle_is_enough() {
        let sprite = sprite_at(200.0);
        let safe = Obstacle::new(1, 300.0, 50.0, 0.0, 150.0);
        let hit = Obstacle::new(2, 40.0, 50.0, 250.0, 150.0);
        assert_eq!(
            detect(&sprite, &[safe, hit], FIELD_H),
            Some(Collision::Obstacle { id: 2, gate: Gate::Top })
        );
    }
}
