//! Error type for the fallible parts of the API.
//!
//! The per-step hot path never returns errors: unknown ids and empty worlds
//! are silent no-ops. Errors are reserved for configuration, checked body
//! access and structural validation of the broadphase tree.

use thiserror::Error;

use crate::objects::registry::BodyId;

#[derive(Debug, Error)]
pub enum PhysicsError {
    /// The id is stale or was never issued by this world.
    #[error("body {0} does not exist")]
    UnknownBody(BodyId),
    /// World boundary must have a positive, finite size.
    #[error("invalid world boundary {width}x{height}")]
    InvalidBoundary { width: f64, height: f64 },
    /// A settings value is out of its legal range.
    #[error("invalid settings: {0}")]
    InvalidSettings(&'static str),
    /// Settings could not be parsed.
    #[error("settings parse error: {0}")]
    Settings(#[from] serde_json::Error),
    /// The broadphase tree failed a structural check.
    #[error("corrupt broadphase tree: {0}")]
    CorruptTree(String),
}

pub type Result<T> = std::result::Result<T, PhysicsError>;
