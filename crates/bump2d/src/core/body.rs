use glam::Vec2;

use crate::core::shape::Shape;

/// The kind of rigid body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    /// Never moves, infinite mass. Terrain and walls.
    Static,
    /// Moved by setting velocity, unaffected by forces or impulses.
    Kinematic,
    /// Fully simulated.
    Dynamic,
}

/// Physical material properties for a body's shape.
#[derive(Debug, Clone, Copy)]
pub struct Material {
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            density: 1.0,
            friction: 0.5,
            restitution: 0.3,
        }
    }
}

/// Builder for describing a rigid body before creation.
#[derive(Debug, Clone)]
pub struct BodyDesc {
    pub body_type: BodyType,
    pub position: Vec2,
    pub rotation: f32,
    pub velocity: Vec2,
    pub angular_velocity: f32,
    pub shape: Shape,
    pub material: Material,
}

impl BodyDesc {
    pub fn new(body_type: BodyType, shape: Shape) -> Self {
        Self {
            body_type,
            position: Vec2::ZERO,
            rotation: 0.0,
            velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            shape,
            material: Material::default(),
        }
    }

    /// Create a dynamic body description with the given shape.
    pub fn dynamic(shape: Shape) -> Self {
        Self::new(BodyType::Dynamic, shape)
    }

    /// Create a static body description with the given shape.
    /// Named `fixed` because `static` is a keyword.
    pub fn fixed(shape: Shape) -> Self {
        Self::new(BodyType::Static, shape)
    }

    /// Create a kinematic body description with the given shape.
    pub fn kinematic(shape: Shape) -> Self {
        Self::new(BodyType::Kinematic, shape)
    }

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_angular_velocity(mut self, angular_velocity: f32) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }
}

/// A rigid body owned by a world.
///
/// Mass and inertia are derived once from shape and density at creation and
/// never change. Static and kinematic bodies carry `inv_mass == 0.0` and
/// `inv_inertia == 0.0`, which is what makes them absorb zero impulse in the
/// solver without special cases.
#[derive(Debug, Clone)]
pub struct Body {
    pub body_type: BodyType,
    pub position: Vec2,
    pub rotation: f32,
    pub linear_velocity: Vec2,
    pub angular_velocity: f32,
    pub mass: f32,
    pub inv_mass: f32,
    pub inertia: f32,
    pub inv_inertia: f32,
    pub friction: f32,
    pub restitution: f32,
    pub shape: Shape,
}

impl Body {
    /// Build a body from a validated description. The caller (the world)
    /// has already run `Shape::validate`.
    pub(crate) fn from_desc(desc: &BodyDesc) -> Self {
        let (mass, inv_mass, inertia, inv_inertia) = match desc.body_type {
            BodyType::Dynamic => {
                let props = desc.shape.mass_properties(desc.material.density);
                let inv_mass = if props.mass > 0.0 { 1.0 / props.mass } else { 0.0 };
                let inv_inertia = if props.inertia > 0.0 {
                    1.0 / props.inertia
                } else {
                    0.0
                };
                (props.mass, inv_mass, props.inertia, inv_inertia)
            }
            // Infinite mass: velocities may be set but impulses have no effect.
            BodyType::Static | BodyType::Kinematic => (0.0, 0.0, 0.0, 0.0),
        };
        Self {
            body_type: desc.body_type,
            position: desc.position,
            rotation: desc.rotation,
            // Static bodies never have velocity, whatever the desc says.
            linear_velocity: if desc.body_type == BodyType::Static {
                Vec2::ZERO
            } else {
                desc.velocity
            },
            angular_velocity: if desc.body_type == BodyType::Static {
                0.0
            } else {
                desc.angular_velocity
            },
            mass,
            inv_mass,
            inertia,
            inv_inertia,
            friction: desc.material.friction,
            restitution: desc.material.restitution,
            shape: desc.shape.clone(),
        }
    }

    pub fn is_static(&self) -> bool {
        self.body_type == BodyType::Static
    }

    pub fn is_dynamic(&self) -> bool {
        self.body_type == BodyType::Dynamic
    }

    /// Velocity of the material point at world-space `point`.
    pub(crate) fn velocity_at(&self, point: Vec2) -> Vec2 {
        let r = point - self.position;
        self.linear_velocity + self.angular_velocity * r.perp()
    }

    /// Apply an impulse at world-space `point`. No-op for infinite mass.
    pub(crate) fn apply_impulse_at(&mut self, impulse: Vec2, point: Vec2) {
        let r = point - self.position;
        self.linear_velocity += impulse * self.inv_mass;
        self.angular_velocity += r.perp_dot(impulse) * self.inv_inertia;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dynamic_body_derives_mass_from_density() {
        let desc = BodyDesc::dynamic(Shape::Circle { radius: 1.0 }).with_material(Material {
            density: 2.0,
            ..Material::default()
        });
        let body = Body::from_desc(&desc);
        let expected = 2.0 * std::f32::consts::PI;
        assert!((body.mass - expected).abs() < 1e-4);
        assert!((body.inv_mass - 1.0 / expected).abs() < 1e-6);
        assert!(body.inv_inertia > 0.0);
    }

    #[test]
    fn static_body_has_zero_inverse_mass() {
        let desc = BodyDesc::fixed(Shape::box_polygon(10.0, 1.0)).with_velocity(Vec2::X);
        let body = Body::from_desc(&desc);
        assert_eq!(body.inv_mass, 0.0);
        assert_eq!(body.inv_inertia, 0.0);
        // Velocity on a static desc is discarded.
        assert_eq!(body.linear_velocity, Vec2::ZERO);
    }

    #[test]
    fn kinematic_body_keeps_velocity_but_absorbs_impulses() {
        let desc = BodyDesc::kinematic(Shape::Circle { radius: 1.0 }).with_velocity(Vec2::new(3.0, 0.0));
        let mut body = Body::from_desc(&desc);
        assert_eq!(body.linear_velocity, Vec2::new(3.0, 0.0));
        body.apply_impulse_at(Vec2::new(100.0, 100.0), body.position);
        assert_eq!(body.linear_velocity, Vec2::new(3.0, 0.0));
    }

    #[test]
    fn impulse_at_offset_spins_the_body() {
        let desc = BodyDesc::dynamic(Shape::box_polygon(1.0, 1.0));
        let mut body = Body::from_desc(&desc);
        body.apply_impulse_at(Vec2::new(0.0, 1.0), Vec2::new(1.0, 0.0));
        assert!(body.angular_velocity > 0.0);
        assert!(body.linear_velocity.y > 0.0);
    }

    #[test]
    fn velocity_at_includes_rotation() {
        let desc = BodyDesc::dynamic(Shape::Circle { radius: 1.0 }).with_angular_velocity(2.0);
        let body = Body::from_desc(&desc);
        // Point one unit to the right of center: v = w * r.perp() = (0, 2).
        let v = body.velocity_at(Vec2::new(1.0, 0.0));
        assert!((v.y - 2.0).abs() < 1e-6);
        assert!(v.x.abs() < 1e-6);
    }

    #[test]
    fn builder_chains() {
        let desc = BodyDesc::dynamic(Shape::Circle { radius: 0.5 })
            .with_position(Vec2::new(1.0, 2.0))
            .with_rotation(0.3)
            .with_velocity(Vec2::new(-1.0, 0.0))
            .with_angular_velocity(4.0);
        assert_eq!(desc.body_type, BodyType::Dynamic);
        assert_eq!(desc.position, Vec2::new(1.0, 2.0));
        assert!((desc.rotation - 0.3).abs() < 1e-6);
        assert_eq!(desc.velocity, Vec2::new(-1.0, 0.0));
        assert!((desc.angular_velocity - 4.0).abs() < 1e-6);
    }
}
