//! Shape generation for 2D primitives
//!
//! All coordinates are screen pixels with y pointing down; the pipeline maps
//! them to NDC.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, colors};
use crate::sim::{Aabb, ObstacleKind, RenderSnapshot};

/// Spacing of the ground hatch lines in pixels
const GROUND_LINE_SPACING: f32 = 48.0;

/// Generate vertices for a filled axis-aligned rectangle
pub fn rect(x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) -> [Vertex; 6] {
    let (x2, y2) = (x + w, y + h);
    [
        Vertex::new(x, y, color),
        Vertex::new(x2, y, color),
        Vertex::new(x, y2, color),
        Vertex::new(x, y2, color),
        Vertex::new(x2, y, color),
        Vertex::new(x2, y2, color),
    ]
}

fn aabb(b: &Aabb, color: [f32; 4]) -> [Vertex; 6] {
    rect(b.x, b.y, b.w, b.h, color)
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

fn obstacle_color(kind: ObstacleKind) -> [f32; 4] {
    match kind {
        ObstacleKind::High => colors::OBSTACLE_HIGH,
        ObstacleKind::Low => colors::OBSTACLE_LOW,
    }
}

/// Build the whole frame: stars, ground, obstacles, then the player on top
pub fn scene_vertices(snap: &RenderSnapshot<'_>) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(
        snap.stars.len() * 18 + snap.obstacles.len() * 6 + 128,
    );

    for star in snap.stars {
        vertices.extend(circle(
            Vec2::new(star.x, star.y),
            star.radius,
            colors::STAR,
            6,
        ));
    }

    let width = snap.viewport.width;
    vertices.extend(rect(
        0.0,
        snap.ground_y,
        width,
        snap.ground_height,
        colors::GROUND,
    ));
    vertices.extend(rect(0.0, snap.ground_y, width, 2.0, colors::GROUND_LINE));
    let mut x = 0.0;
    while x < width {
        vertices.extend(rect(
            x,
            snap.ground_y + 12.0,
            GROUND_LINE_SPACING * 0.5,
            1.0,
            colors::GROUND_LINE,
        ));
        x += GROUND_LINE_SPACING;
    }

    for (kind, hitbox) in snap.obstacle_boxes() {
        vertices.extend(aabb(&hitbox, obstacle_color(kind)));
    }

    let player = snap.player;
    vertices.extend(aabb(&player, colors::PLAYER));
    let eye_y = if snap.crouching {
        player.y + player.h * 0.4
    } else {
        player.y + player.h * 0.25
    };
    vertices.extend(circle(
        Vec2::new(player.right() - player.w * 0.25, eye_y),
        4.0,
        colors::PLAYER_EYE,
        10,
    ));

    vertices
}
