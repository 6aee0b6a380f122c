//! Shape generation for 2D primitives
//!
//! Everything here works in playfield pixels (y down) and emits triangle lists.

use glam::Vec2;
use std::f32::consts::{PI, TAU};

use super::vertex::Vertex;

/// Push one triangle
#[inline]
fn tri(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) {
    out.push(Vertex::new(a.x, a.y, color));
    out.push(Vertex::new(b.x, b.y, color));
    out.push(Vertex::new(c.x, c.y, color));
}

/// Axis-aligned filled rectangle
pub fn rect(out: &mut Vec<Vertex>, x: f32, y: f32, width: f32, height: f32, color: [f32; 4]) {
    let tl = Vec2::new(x, y);
    let tr = Vec2::new(x + width, y);
    let bl = Vec2::new(x, y + height);
    let br = Vec2::new(x + width, y + height);
    tri(out, tl, tr, bl, color);
    tri(out, bl, tr, br, color);
}

/// Rectangle of the given size centered on `center`, rotated by `rotation` radians
pub fn rotated_rect(
    out: &mut Vec<Vertex>,
    center: Vec2,
    half: Vec2,
    rotation: f32,
    color: [f32; 4],
) {
    let [tl, tr, br, bl] = rect_points(center, half, rotation);
    tri(out, tl, tr, bl, color);
    tri(out, bl, tr, br, color);
}

/// Closed polygon around `center` filled as a triangle fan.
/// Works for the star outlines too since every spoke is visible from the center.
pub fn polygon_fan(out: &mut Vec<Vertex>, center: Vec2, points: &[Vec2], color: [f32; 4]) {
    if points.len() < 3 {
        return;
    }
    for (i, &p) in points.iter().enumerate() {
        let next = points[(i + 1) % points.len()];
        tri(out, center, p, next, color);
    }
}

/// Star outline with alternating outer and inner radii.
/// The first point sits at `start_angle`, rotated by `rotation`.
pub fn star_points(
    center: Vec2,
    points: u32,
    outer: f32,
    inner: f32,
    start_angle: f32,
    rotation: f32,
) -> Vec<Vec2> {
    let count = points * 2;
    (0..count)
        .map(|i| {
            let angle = start_angle + rotation + i as f32 * PI / points as f32;
            let r = if i % 2 == 0 { outer } else { inner };
            center + Vec2::from_angle(angle) * r
        })
        .collect()
}

/// Points of a regular polygon approximating a circle
pub fn circle_points(center: Vec2, radius: f32, segments: u32) -> Vec<Vec2> {
    let segments = segments.max(3);
    (0..segments)
        .map(|i| center + Vec2::from_angle(i as f32 / segments as f32 * TAU) * radius)
        .collect()
}

/// Filled circle
pub fn disc(out: &mut Vec<Vertex>, center: Vec2, radius: f32, segments: u32, color: [f32; 4]) {
    let outline = circle_points(center, radius, segments);
    polygon_fan(out, center, &outline, color);
}

/// Triangle pointing up before rotation: apex at top center, base along the bottom
pub fn triangle_points(center: Vec2, half: f32, rotation: f32) -> [Vec2; 3] {
    let rot = Vec2::from_angle(rotation);
    [
        center + rot.rotate(Vec2::new(0.0, -half)),
        center + rot.rotate(Vec2::new(half, half)),
        center + rot.rotate(Vec2::new(-half, half)),
    ]
}

/// Stroke a closed outline with quads of the given thickness
pub fn outline(out: &mut Vec<Vertex>, points: &[Vec2], thickness: f32, color: [f32; 4]) {
    if points.len() < 2 {
        return;
    }
    let half = thickness * 0.5;
    for (i, &a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        let dir = (b - a).normalize_or_zero();
        // Perpendicular for width
        let perp = Vec2::new(-dir.y, dir.x) * half;
        // Extend along the edge so corners close
        let a = a - dir * half;
        let b = b + dir * half;
        tri(out, a + perp, a - perp, b + perp, color);
        tri(out, b + perp, a - perp, b - perp, color);
    }
}

/// Corners of a rotated rectangle, clockwise from top-left
pub fn rect_points(center: Vec2, half: Vec2, rotation: f32) -> [Vec2; 4] {
    let rot = Vec2::from_angle(rotation);
    [
        center + rot.rotate(Vec2::new(-half.x, -half.y)),
        center + rot.rotate(Vec2::new(half.x, -half.y)),
        center + rot.rotate(Vec2::new(half.x, half.y)),
        center + rot.rotate(Vec2::new(-half.x, half.y)),
    ]
}
