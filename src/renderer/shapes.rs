//! Shape generation for 2D primitives
//!
//! All positions are in field coordinates (origin top-left, y down); the
//! pipeline maps them to clip space.

use glam::Vec2;

use super::vertex::{Vertex, colors};
use crate::sim::{GamePhase, Obstacle, Snapshot};

/// Height of the lip drawn at the open end of each gate
const CAP_HEIGHT: f32 = 12.0;
/// How far the lip overhangs each side of the gate
const CAP_OVERHANG: f32 = 3.0;

/// Generate vertices for an axis-aligned filled rectangle (two triangles)
pub fn rect(min: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    if size.x <= 0.0 || size.y <= 0.0 {
        return Vec::new();
    }
    let max = min + size;
    vec![
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
    ]
}

/// Generate vertices for both gates of an obstacle, clipped to the field
pub fn obstacle(obstacle: &Obstacle, field_height: f32) -> Vec<Vertex> {
    let body = if obstacle.passed {
        colors::GATE_PASSED
    } else {
        colors::GATE
    };
    let x = obstacle.x;
    let w = obstacle.width;
    let bottom_height = field_height - obstacle.bottom_y;

    let mut vertices = Vec::with_capacity(24);
    // Top gate hangs from the ceiling
    vertices.extend(rect(Vec2::new(x, 0.0), Vec2::new(w, obstacle.top_height), body));
    // Bottom gate stands on the floor
    vertices.extend(rect(
        Vec2::new(x, obstacle.bottom_y),
        Vec2::new(w, bottom_height),
        body,
    ));

    // Lips at the gap edges
    let cap_w = w + CAP_OVERHANG * 2.0;
    let top_cap = CAP_HEIGHT.min(obstacle.top_height);
    vertices.extend(rect(
        Vec2::new(x - CAP_OVERHANG, obstacle.top_height - top_cap),
        Vec2::new(cap_w, top_cap),
        colors::GATE_CAP,
    ));
    vertices.extend(rect(
        Vec2::new(x - CAP_OVERHANG, obstacle.bottom_y),
        Vec2::new(cap_w, CAP_HEIGHT.min(bottom_height)),
        colors::GATE_CAP,
    ));

    vertices
}

/// Build the full frame for a snapshot
pub fn frame(snapshot: &Snapshot) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(snapshot.obstacles.len() * 24 + 12);

    for o in &snapshot.obstacles {
        vertices.extend(obstacle(o, snapshot.field.y));
    }

    if snapshot.sprite_visible {
        let sprite = &snapshot.sprite;
        let color = if snapshot.phase == GamePhase::Over {
            colors::SPRITE_CRASHED
        } else {
            colors::SPRITE
        };
        vertices.extend(rect(
            Vec2::new(sprite.x, sprite.y),
            Vec2::new(sprite.width, sprite.height),
            color,
        ));
    }

    if snapshot.phase != GamePhase::Running {
        vertices.extend(rect(Vec2::ZERO, snapshot.field, colors::OVERLAY));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;
    use crate::sim::GameState;

    #[test]
    fn test_rect_is_two_triangles() {
        let v = rect(Vec2::new(10.0, 20.0), Vec2::new(5.0, 8.0), colors::SPRITE);
        assert_eq!(v.len(), 6);
        assert_eq!(v[0].position, [10.0, 20.0]);
        assert_eq!(v[5].position, [15.0, 28.0]);
    }

    #[test]
    fn test_empty_rect_emits_nothing() {
        assert!(rect(Vec2::ZERO, Vec2::new(0.0, 10.0), colors::SPRITE).is_empty());
    }

    #[test]
    fn test_obstacle_gates_leave_gap_open() {
        let o = Obstacle::new(1, 100.0, 50.0, 120.0, 150.0);
        let vertices = obstacle(&o, 600.0);
        assert_eq!(vertices.len(), 24);
        // No vertex lies strictly inside the opening
        assert!(
            !vertices
                .iter()
                .any(|v| v.position[1] > 120.0 && v.position[1] < 270.0)
        );
    }

    #[test]
    fn test_zero_height_top_gate() {
        let o = Obstacle::new(1, 100.0, 50.0, 0.0, 150.0);
        // Top gate and its lip are both empty
        assert_eq!(obstacle(&o, 600.0).len(), 12);
    }

    #[test]
    fn test_idle_frame_has_overlay() {
        let state = GameState::new(Tuning::default(), 1);
        let vertices = frame(&state.snapshot());
        // Sprite + overlay
        assert_eq!(vertices.len(), 12);
        assert_eq!(vertices[6].color, colors::OVERLAY);
    }
}
