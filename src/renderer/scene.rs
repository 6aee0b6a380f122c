//! Frame assembly
//!
//! Turns a simulation snapshot into one triangle list in playfield pixels.
//! Draw order: grid, player, shapes, particles, scanlines.

use glam::Vec2;
use std::f32::consts::PI;

use super::shapes;
use super::vertex::{Vertex, colors, rgba};
use crate::consts::GRID_SIZE;
use crate::settings::Settings;
use crate::sim::{Playfield, Shape, ShapeKind, Snapshot};

/// Stroke width for shape outlines
const OUTLINE_WIDTH: f32 = 2.0;
/// Grid line width
const GRID_LINE_WIDTH: f32 = 1.0;
/// Scanline spacing and height
const SCANLINE_PERIOD: f32 = 4.0;
const SCANLINE_HEIGHT: f32 = 2.0;

/// Build every vertex for one frame
pub fn build(snapshot: &Snapshot<'_>, playfield: &Playfield, settings: &Settings) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(4096);

    if settings.show_grid() {
        grid(&mut out, playfield);
    }

    // Player
    let p = snapshot.player;
    shapes::rect(
        &mut out,
        p.x,
        p.y,
        p.width,
        p.height,
        rgba(snapshot.player_color, 1.0),
    );
    if settings.outlines {
        let half = Vec2::new(p.width, p.height) * 0.5;
        let corners = shapes::rect_points(p.center(), half, 0.0);
        shapes::outline(&mut out, &corners, OUTLINE_WIDTH, colors::OUTLINE);
    }

    for shape in snapshot.shapes {
        falling_shape(&mut out, shape, settings);
    }

    // Newest particles win when the preset caps the count
    let cap = settings.max_particles();
    let skip = snapshot.particles.len().saturating_sub(cap);
    for particle in &snapshot.particles[skip..] {
        shapes::rect(
            &mut out,
            particle.pos.x,
            particle.pos.y,
            particle.size,
            particle.size,
            rgba(particle.color, particle.life),
        );
    }

    if settings.show_scanlines() {
        scanlines(&mut out, playfield);
    }

    out
}

fn grid(out: &mut Vec<Vertex>, playfield: &Playfield) {
    let mut x = 0.0;
    while x < playfield.width {
        shapes::rect(out, x, 0.0, GRID_LINE_WIDTH, playfield.height, colors::GRID);
        x += GRID_SIZE;
    }
    let mut y = 0.0;
    while y < playfield.height {
        shapes::rect(out, 0.0, y, playfield.width, GRID_LINE_WIDTH, colors::GRID);
        y += GRID_SIZE;
    }
}

fn scanlines(out: &mut Vec<Vertex>, playfield: &Playfield) {
    let mut y = 0.0;
    while y < playfield.height {
        shapes::rect(
            out,
            0.0,
            y,
            playfield.width,
            SCANLINE_HEIGHT,
            colors::SCANLINE,
        );
        y += SCANLINE_PERIOD;
    }
}

/// One primitive per kind, rotated about the shape's center
fn falling_shape(out: &mut Vec<Vertex>, shape: &Shape, settings: &Settings) {
    let center = shape.center();
    let size = shape.size;
    let half = size * 0.5;
    let rotation = if settings.show_rotation() {
        shape.rotation
    } else {
        0.0
    };
    let color = rgba(shape.color, 1.0);
    let stroke = settings.outlines;

    match shape.kind {
        ShapeKind::Cube => {
            square(out, center, half, rotation, color, stroke);
        }
        ShapeKind::Spike => {
            // 4 spikes: eight points alternating full and half radius
            let pts = shapes::star_points(center, 4, half, size / 4.0, 0.0, rotation);
            shapes::polygon_fan(out, center, &pts, color);
            if stroke {
                shapes::outline(out, &pts, OUTLINE_WIDTH, colors::OUTLINE);
            }
        }
        ShapeKind::Disc => {
            let segments = settings.quality.disc_segments();
            shapes::disc(out, center, half, segments, color);
            if stroke {
                let pts = shapes::circle_points(center, half, segments);
                shapes::outline(out, &pts, OUTLINE_WIDTH, colors::OUTLINE);
            }
        }
        ShapeKind::Cross => {
            let bar = Vec2::new(size / 6.0, half);
            let vertical = shapes::rect_points(center, bar, rotation);
            let horizontal = shapes::rect_points(center, Vec2::new(bar.y, bar.x), rotation);
            shapes::rotated_rect(out, center, bar, rotation, color);
            shapes::rotated_rect(out, center, Vec2::new(bar.y, bar.x), rotation, color);
            if stroke {
                shapes::outline(out, &vertical, OUTLINE_WIDTH, colors::OUTLINE);
                shapes::outline(out, &horizontal, OUTLINE_WIDTH, colors::OUTLINE);
            }
        }
        ShapeKind::Splitter => {
            let pts = shapes::triangle_points(center, half, rotation);
            shapes::polygon_fan(out, center, &pts, color);
            if stroke {
                shapes::outline(out, &pts, OUTLINE_WIDTH, colors::OUTLINE);
            }
        }
        ShapeKind::Bonus => {
            let pts = shapes::star_points(center, 5, half, half * 0.4, -PI / 2.0, rotation);
            shapes::polygon_fan(out, center, &pts, color);
            if stroke {
                shapes::outline(out, &pts, OUTLINE_WIDTH, colors::OUTLINE);
            }
        }
        ShapeKind::Boss => {
            square(out, center, half, rotation, color, stroke);
            let core = Vec2::splat(size / 4.0);
            shapes::rotated_rect(out, center, core, rotation, colors::BOSS_CORE);
        }
    }
}

fn square(
    out: &mut Vec<Vertex>,
    center: Vec2,
    half: f32,
    rotation: f32,
    color: [f32; 4],
    stroke: bool,
) {
    let half = Vec2::splat(half);
    shapes::rotated_rect(out, center, half, rotation, color);
    if stroke {
        let pts = shapes::rect_points(center, half, rotation);
        shapes::outline(out, &pts, OUTLINE_WIDTH, colors::OUTLINE);
    }
}
