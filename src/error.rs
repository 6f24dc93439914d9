//! Error handling for the occlusion culling core.
//!
//! The geometric query paths are total functions that fail toward
//! visibility and never error; fallible operations only exist at the
//! configuration and buffer-accessor surface.

use thiserror::Error;

/// Errors produced by the occlusion culling core
#[derive(Error, Debug)]
pub enum OcclusionError {
    /// A configuration field failed validation
    #[error("invalid configuration: {field}: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// Configuration text failed to parse
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A mip level index past the end of the pyramid chain
    #[error("mip level {lod} out of range (pyramid has {count} levels)")]
    LevelOutOfRange { lod: usize, count: usize },
}

/// Result alias for occlusion operations
pub type OcclusionResult<T> = Result<T, OcclusionError>;
