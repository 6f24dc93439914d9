/// Occlusion Culling Module - Data-Oriented Programming (DOP) style
///
/// This module follows pure DOP principles:
/// - hzb_data.rs / query_data.rs: Pure data structures with NO methods
/// - hzb_operations.rs / query_operations.rs / debug_raster.rs: Pure
///   functions that operate on data
/// - culler.rs: The backend capability set handed to the renderer
///

pub mod culler;
pub mod debug_raster;
pub mod hzb_data;
pub mod hzb_operations;
pub mod query_data;
pub mod query_operations;

// Re-export data structures
pub use culler::{OcclusionCuller, RasterHzbCuller};
pub use hzb_data::{DebugRaster, HzBuffer};
pub use query_data::{BoxProjection, Plane2d};

// Re-export all operations
pub use hzb_operations::{
    // Lifecycle
    hzb_resize,
    hzb_clear,
    hzb_is_empty,
    hzb_level_count,

    // Mip source surface
    hzb_level0_mut,
    hzb_fill_level0,
    hzb_update_mips,

    // Accessors
    hzb_level,
    hzb_level_size,
    hzb_try_level_bytes,

    // Instrumentation
    hzb_set_debug_enabled,
};

pub use query_operations::{
    is_occluded,
    is_occluded_raw,
    mip_level_for_rect,
    project_box,
};

pub use debug_raster::{debug_clear, debug_paint, debug_texture};
