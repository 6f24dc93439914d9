//! Depth pyramid data structures - Pure DOP
//!
//! NO METHODS. Just data.
//! All lifecycle and sampling happens in hzb_operations.rs

/// Hierarchical Z-buffer: a mip chain of "far is larger" occluder depths.
///
/// All levels live in one flat arena indexed through `mip_offsets`; level 0
/// is the finest resolution and every subsequent level halves each
/// dimension (rounded up, so every finer pixel is covered) until 1x1.
#[derive(Debug, Clone, Default)]
pub struct HzBuffer {
    /// Level arena, all mips back to back
    pub data: Vec<f32>,

    /// (width, height) per level, finest first
    pub sizes: Vec<(u32, u32)>,

    /// Start of each level inside `data`; parallel to `sizes`
    pub mip_offsets: Vec<usize>,

    /// Resolution of level 0; (0, 0) when unallocated
    pub buffer_size: (u32, u32),

    /// Incremented once per mip update; virtual clock for occlusion holds
    pub frame: u64,

    /// 2x-resolution instrumentation raster, present only when the culler
    /// runs with debug instrumentation on
    pub debug: Option<DebugRaster>,
}

/// Visualization raster mirroring recent query footprints - pure data
#[derive(Debug, Clone)]
pub struct DebugRaster {
    /// Depth samples, row major
    pub data: Vec<f32>,

    /// Raster resolution (2x the pyramid base)
    pub size: (u32, u32),

    /// Smoothed normalization range for texture output
    pub range: f32,
}
