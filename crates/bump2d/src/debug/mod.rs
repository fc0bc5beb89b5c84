//! Debug rendering boundary — opt-in body and contact visualization.
//!
//! The core never draws anything itself. A host passes a [`DebugDraw`]
//! implementation to `World::step_with_draw` and rasterizes the primitives
//! however it likes; [`shape_outline`] and [`DebugVertex`] help hosts that
//! batch outlines into line buffers.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::api::types::DrawColor;
use crate::core::shape::Shape;

/// Capability interface the world calls at the end of a step when debug
/// drawing is enabled: once per body, once per active contact.
///
/// Invocations are synchronous and must not mutate the world — the port
/// sees a read-only snapshot (enforced by convention, not by the type
/// system, since the port receives plain values).
pub trait DebugDraw {
    fn draw_body(&mut self, shape: &Shape, position: Vec2, rotation: f32, color: DrawColor);
    fn draw_contact(&mut self, point: Vec2, normal: Vec2, color: DrawColor);
}

/// One line-list vertex: position plus color, 6 floats. Hosts can upload a
/// `&[DebugVertex]` slice directly as a GPU line buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct DebugVertex {
    pub x: f32,
    pub y: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl DebugVertex {
    pub const FLOATS: usize = 6;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub fn new(position: Vec2, color: DrawColor) -> Self {
        let [r, g, b, a] = color.rgba();
        Self {
            x: position.x,
            y: position.y,
            r,
            g,
            b,
            a,
        }
    }
}

/// Closed polyline outlining a shape at the given transform.
///
/// Circles become 24-segment loops with a radius spoke at the start so the
/// rotation is visible; polygons are their corner loop. The first point is
/// repeated at the end to close the loop.
pub fn shape_outline(shape: &Shape, position: Vec2, rotation: f32) -> Vec<[f32; 2]> {
    match shape {
        Shape::Circle { radius } => {
            let segments = 24;
            let mut points = Vec::with_capacity(segments + 2);
            // Spoke from center to the rim at the body's rotation.
            points.push([position.x, position.y]);
            for i in 0..segments {
                let angle = rotation + (i as f32 / segments as f32) * std::f32::consts::TAU;
                points.push([
                    position.x + angle.cos() * radius,
                    position.y + angle.sin() * radius,
                ]);
            }
            // Repeat the first rim point verbatim to close the loop; a
            // recomputed angle + TAU point would differ in the last bit.
            points.push(points[1]);
            points
        }
        Shape::Polygon { .. } => {
            let mut points: Vec<[f32; 2]> = shape
                .world_vertices(position, rotation)
                .iter()
                .map(|v| [v.x, v.y])
                .collect();
            if let Some(&first) = points.first() {
                points.push(first);
            }
            points
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circle_outline_is_closed_and_starts_at_center() {
        let outline = shape_outline(&Shape::Circle { radius: 2.0 }, Vec2::new(1.0, 1.0), 0.0);
        assert_eq!(outline[0], [1.0, 1.0]);
        // Spoke end sits on the rim at rotation 0.
        assert_eq!(outline[1], [3.0, 1.0]);
        assert_eq!(outline[1], *outline.last().unwrap());
    }

    #[test]
    fn polygon_outline_closes_the_loop() {
        let outline = shape_outline(&Shape::box_polygon(1.0, 1.0), Vec2::ZERO, 0.0);
        assert_eq!(outline.len(), 5);
        assert_eq!(outline[0], *outline.last().unwrap());
    }

    #[test]
    fn rotated_polygon_outline_moves_corners() {
        let outline = shape_outline(
            &Shape::box_polygon(1.0, 1.0),
            Vec2::ZERO,
            std::f32::consts::FRAC_PI_4,
        );
        // At 45 degrees a corner lands on the Y axis.
        assert!(outline.iter().any(|p| p[0].abs() < 1e-5 && p[1] > 1.0));
    }

    #[test]
    fn debug_vertex_stride_matches_layout() {
        assert_eq!(std::mem::size_of::<DebugVertex>(), DebugVertex::STRIDE_BYTES);
        let v = DebugVertex::new(Vec2::new(1.0, 2.0), DrawColor::Red);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.a, 1.0);
    }
}
