pub mod body;
pub mod shape;
pub mod time;
pub mod world;
