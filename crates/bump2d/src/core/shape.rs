use glam::{Mat2, Vec2};

use crate::api::error::PhysicsError;

/// Collision shape attached to a body. Read-only once attached.
///
/// Shape variants are a closed set dispatched by exhaustive `match`, so the
/// mass and collision formulas stay centralized instead of spreading across
/// a subtype hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle {
        radius: f32,
    },
    /// Convex polygon. Vertices are in body-local space, counter-clockwise,
    /// with no repeated or collinear points.
    Polygon {
        vertices: Vec<Vec2>,
    },
}

/// Mass and rotational inertia derived from a shape and a density.
/// Inertia is taken about the body-local origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassProperties {
    pub mass: f32,
    pub inertia: f32,
}

/// Axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Grow the box by `margin` on every side.
    pub fn inflate(self, margin: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(margin),
            max: self.max + Vec2::splat(margin),
        }
    }

    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }
}

impl Shape {
    /// Convenience constructor for an axis-aligned box polygon centered on
    /// the body origin.
    pub fn box_polygon(half_width: f32, half_height: f32) -> Self {
        Shape::Polygon {
            vertices: vec![
                Vec2::new(-half_width, -half_height),
                Vec2::new(half_width, -half_height),
                Vec2::new(half_width, half_height),
                Vec2::new(-half_width, half_height),
            ],
        }
    }

    /// Reject degenerate geometry before it reaches the collision pipeline.
    ///
    /// Polygons must have at least 3 vertices and be strictly convex with
    /// counter-clockwise winding.
    pub fn validate(&self) -> Result<(), PhysicsError> {
        match self {
            Shape::Circle { radius } => {
                if !radius.is_finite() || *radius <= 0.0 {
                    return Err(PhysicsError::invalid_shape(format!(
                        "circle radius must be positive and finite, got {radius}"
                    )));
                }
                Ok(())
            }
            Shape::Polygon { vertices } => {
                if vertices.len() < 3 {
                    return Err(PhysicsError::invalid_shape(format!(
                        "polygon needs at least 3 vertices, got {}",
                        vertices.len()
                    )));
                }
                if vertices.iter().any(|v| !v.is_finite()) {
                    return Err(PhysicsError::invalid_shape("polygon vertex is not finite"));
                }
                let n = vertices.len();
                for i in 0..n {
                    let a = vertices[i];
                    let b = vertices[(i + 1) % n];
                    let c = vertices[(i + 2) % n];
                    // Strictly convex and CCW: every consecutive edge pair
                    // turns left. Zero cross also catches repeated vertices.
                    if (b - a).perp_dot(c - b) <= 0.0 {
                        return Err(PhysicsError::invalid_shape(
                            "polygon must be convex with counter-clockwise winding",
                        ));
                    }
                }
                Ok(())
            }
        }
    }

    /// Derive mass and inertia from the shape and a material density.
    ///
    /// Circle: `m = pi r^2 rho`, `I = m r^2 / 2`. Polygon: integral over
    /// signed triangle areas fanned from the body origin.
    pub fn mass_properties(&self, density: f32) -> MassProperties {
        match self {
            Shape::Circle { radius } => {
                let mass = std::f32::consts::PI * radius * radius * density;
                MassProperties {
                    mass,
                    inertia: 0.5 * mass * radius * radius,
                }
            }
            Shape::Polygon { vertices } => {
                let mut area = 0.0f32;
                let mut second_moment = 0.0f32;
                let n = vertices.len();
                for i in 0..n {
                    let v1 = vertices[i];
                    let v2 = vertices[(i + 1) % n];
                    let cross = v1.perp_dot(v2);
                    area += 0.5 * cross;
                    second_moment += (cross / 12.0) * (v1.dot(v1) + v1.dot(v2) + v2.dot(v2));
                }
                MassProperties {
                    mass: density * area,
                    inertia: density * second_moment,
                }
            }
        }
    }

    /// World-space bounding box of the shape at the given transform.
    pub fn aabb(&self, position: Vec2, rotation: f32) -> Aabb {
        match self {
            Shape::Circle { radius } => Aabb {
                min: position - Vec2::splat(*radius),
                max: position + Vec2::splat(*radius),
            },
            Shape::Polygon { vertices } => {
                let rot = Mat2::from_angle(rotation);
                let mut min = Vec2::splat(f32::INFINITY);
                let mut max = Vec2::splat(f32::NEG_INFINITY);
                for v in vertices {
                    let w = position + rot * *v;
                    min = min.min(w);
                    max = max.max(w);
                }
                Aabb { min, max }
            }
        }
    }

    /// Polygon vertices transformed to world space. Circles return an empty
    /// list; callers dispatch on the variant before asking.
    pub(crate) fn world_vertices(&self, position: Vec2, rotation: f32) -> Vec<Vec2> {
        match self {
            Shape::Circle { .. } => Vec::new(),
            Shape::Polygon { vertices } => {
                let rot = Mat2::from_angle(rotation);
                vertices.iter().map(|v| position + rot * *v).collect()
            }
        }
    }
}
