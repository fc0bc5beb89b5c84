use thiserror::Error;

use crate::api::types::BodyHandle;

/// Errors reported by the physics core.
///
/// All errors are synchronous — they surface at the offending call — and
/// recoverable: the world remains usable afterwards. There is no retry
/// machinery; the fix is always to call again with corrected input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    /// Degenerate geometry rejected at body creation.
    #[error("invalid shape: {reason}")]
    InvalidShape { reason: String },
    /// Operation on a destroyed or never-created body handle.
    #[error("unknown body handle: {0:?}")]
    UnknownHandle(BodyHandle),
    /// `step` called with a non-positive or non-finite timestep.
    #[error("invalid timestep: dt = {dt}")]
    InvalidStep { dt: f32 },
}

impl PhysicsError {
    pub(crate) fn invalid_shape(reason: impl Into<String>) -> Self {
        PhysicsError::InvalidShape {
            reason: reason.into(),
        }
    }
}
