// Hearth Occlusion - hierarchical-Z occlusion culling core
//
// Data-Oriented Programming (DOP) architecture:
// - *_data modules hold pure data structures with no methods
// - *_operations modules hold pure functions over that data
//
// The renderer feeds occluder depth into a pyramid once per frame
// (level0_mut + update_mips), then asks per-object whether a bounding box
// is fully hidden (is_occluded / is_occluded_raw / cull_batch). Every
// degenerate geometric case answers "visible"; culling may only ever be
// wrong in the direction that costs performance, never correctness.

pub mod aabb;
pub mod camera;
pub mod config;
pub mod culling;
pub mod error;

pub use aabb::{aabb_from_center_half_extents, aabb_new, Aabb};
pub use camera::{
    build_orthographic_projection, build_perspective_projection, init_camera_view, CameraView,
};
pub use config::{config_from_toml_str, BuildQuality, CullingConfig};
pub use culling::{
    is_occluded, is_occluded_raw, HzBuffer, OcclusionCuller, RasterHzbCuller,
};
pub use error::{OcclusionError, OcclusionResult};
