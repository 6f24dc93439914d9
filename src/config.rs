//! Culling configuration surface.
//!
//! Injected into the culler at construction instead of read from a global,
//! so independent cullers can run with different settings side by side.

use serde::{Deserialize, Serialize};
use static_assertions::const_assert;

use crate::error::{OcclusionError, OcclusionResult};

/// Frames an object stays visible after its last visible verdict when
/// temporal jitter is enabled.
pub const DEFAULT_HOLD_FRAMES: u64 = 9;

/// Short hold for diagnosing jitter flicker; selectable at runtime through
/// [`CullingConfig::hold_frames`].
pub const DEBUG_JITTER_HOLD_FRAMES: u64 = 1;

// A zero hold would make the hysteresis wrapper a no-op.
const_assert!(DEFAULT_HOLD_FRAMES > 0);
const_assert!(DEBUG_JITTER_HOLD_FRAMES > 0);

/// Build quality hint for the external occluder rasterization stage.
///
/// Accepted and stored here, consumed by the mip source; the query
/// algorithm does not change with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BuildQuality {
    Low,
    #[default]
    Medium,
    High,
}

/// Culling configuration - pure data
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CullingConfig {
    /// Whether jittered sampling (and with it the hysteresis path and the
    /// debug instrumentation raster) is enabled
    pub jitter_enabled: bool,

    /// Hold duration in frames for the hysteresis wrapper
    pub hold_frames: u64,

    /// Maintain the 2x-resolution debug raster on each query
    pub debug_instrumentation: bool,

    /// Optional cap on sampled pixels per query; queries that would exceed
    /// it bail out as visible. `None` leaves the scan unbounded.
    pub max_samples: Option<u32>,

    /// Passthrough hint for the external mip source
    pub build_quality: BuildQuality,
}

impl Default for CullingConfig {
    fn default() -> Self {
        Self {
            jitter_enabled: false,
            hold_frames: DEFAULT_HOLD_FRAMES,
            debug_instrumentation: false,
            max_samples: None,
            build_quality: BuildQuality::Medium,
        }
    }
}

/// Parse a configuration from TOML text and validate it
pub fn config_from_toml_str(text: &str) -> OcclusionResult<CullingConfig> {
    let config: CullingConfig = toml::from_str(text)?;
    validate_config(&config)?;
    Ok(config)
}

/// Validate a configuration
pub fn validate_config(config: &CullingConfig) -> OcclusionResult<()> {
    if config.hold_frames == 0 {
        return Err(OcclusionError::InvalidConfig {
            field: "hold_frames",
            reason: "must be at least 1".to_string(),
        });
    }
    if let Some(0) = config.max_samples {
        return Err(OcclusionError::InvalidConfig {
            field: "max_samples",
            reason: "must be nonzero when set".to_string(),
        });
    }
    Ok(())
}
