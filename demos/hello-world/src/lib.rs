pub mod game;

pub use game::{DebugLineBuffer, HelloWorldScene, PTM_RATIO};
