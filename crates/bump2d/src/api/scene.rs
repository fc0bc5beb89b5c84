use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::error::PhysicsError;
use crate::api::types::BodyHandle;
use crate::core::body::{BodyDesc, BodyType, Material};
use crate::core::shape::Shape;
use crate::core::world::World;

/// Declarative scene description, loaded from JSON at runtime.
///
/// Hosts that prefer data-driven setup over imperative `create_body` calls
/// describe gravity and bodies here and spawn the lot in one go. Geometry
/// is still validated body by body at spawn time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneManifest {
    /// Gravity vector in world units per second squared.
    pub gravity: [f32; 2],
    #[serde(default)]
    pub bodies: Vec<BodyDef>,
}

/// One body in a scene manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyDef {
    #[serde(default)]
    pub kind: BodyKind,
    pub position: [f32; 2],
    #[serde(default)]
    pub rotation: f32,
    #[serde(default)]
    pub velocity: [f32; 2],
    pub shape: ShapeDef,
    #[serde(default = "default_density")]
    pub density: f32,
    #[serde(default = "default_friction")]
    pub friction: f32,
    #[serde(default = "default_restitution")]
    pub restitution: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyKind {
    Static,
    Kinematic,
    #[default]
    Dynamic,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShapeDef {
    Circle { radius: f32 },
    Box { half_width: f32, half_height: f32 },
    Polygon { vertices: Vec<[f32; 2]> },
}

fn default_density() -> f32 {
    Material::default().density
}

fn default_friction() -> f32 {
    Material::default().friction
}

fn default_restitution() -> f32 {
    Material::default().restitution
}

impl SceneManifest {
    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Spawn every body into `world`, returning handles in manifest order.
    ///
    /// Fails on the first degenerate shape. Bodies spawned before the
    /// failure remain in the world; the world itself stays valid.
    pub fn spawn_into(&self, world: &mut World) -> Result<Vec<BodyHandle>, PhysicsError> {
        let mut handles = Vec::with_capacity(self.bodies.len());
        for def in &self.bodies {
            handles.push(world.create_body(&def.to_desc())?);
        }
        Ok(handles)
    }

    pub fn gravity_vec(&self) -> Vec2 {
        Vec2::from(self.gravity)
    }
}

impl BodyDef {
    fn to_desc(&self) -> BodyDesc {
        let body_type = match self.kind {
            BodyKind::Static => BodyType::Static,
            BodyKind::Kinematic => BodyType::Kinematic,
            BodyKind::Dynamic => BodyType::Dynamic,
        };
        let shape = match &self.shape {
            ShapeDef::Circle { radius } => Shape::Circle { radius: *radius },
            ShapeDef::Box {
                half_width,
                half_height,
            } => Shape::box_polygon(*half_width, *half_height),
            ShapeDef::Polygon { vertices } => Shape::Polygon {
                vertices: vertices.iter().map(|v| Vec2::from(*v)).collect(),
            },
        };
        BodyDesc::new(body_type, shape)
            .with_position(Vec2::from(self.position))
            .with_rotation(self.rotation)
            .with_velocity(Vec2::from(self.velocity))
            .with_material(Material {
                density: self.density,
                friction: self.friction,
                restitution: self.restitution,
            })
    }
}
