/// Handle to a rigid body owned by a [`World`](crate::core::world::World).
///
/// Handles are process-local indices into the world's body table, never raw
/// addresses. A handle stays valid until the body is destroyed; operations on
/// a destroyed handle fail with `UnknownHandle` rather than dangling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyHandle(pub u32);

impl BodyHandle {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Palette for debug-draw primitives.
/// The host maps these to whatever its line renderer uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawColor {
    /// Static bodies.
    Green,
    /// Kinematic bodies.
    Blue,
    /// Dynamic bodies.
    White,
    /// Contact points and normals.
    Red,
}

impl DrawColor {
    /// RGBA components in 0.0..=1.0.
    pub fn rgba(self) -> [f32; 4] {
        match self {
            DrawColor::Green => [0.3, 0.9, 0.3, 1.0],
            DrawColor::Blue => [0.4, 0.6, 1.0, 1.0],
            DrawColor::White => [1.0, 1.0, 1.0, 1.0],
            DrawColor::Red => [1.0, 0.25, 0.25, 1.0],
        }
    }
}
