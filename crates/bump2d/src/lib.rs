pub mod api;
pub mod collision;
pub mod core;
pub mod debug;

// Re-export key types at crate root for convenience
pub use crate::api::error::PhysicsError;
pub use crate::api::scene::{BodyDef, BodyKind, SceneManifest, ShapeDef};
pub use crate::api::types::{BodyHandle, DrawColor};
pub use crate::collision::narrow_phase::Contact;
pub use crate::core::body::{Body, BodyDesc, BodyType, Material};
pub use crate::core::shape::{Aabb, MassProperties, Shape};
pub use crate::core::time::FixedTimestep;
pub use crate::core::world::World;
pub use crate::debug::{shape_outline, DebugDraw, DebugVertex};
