/// Camera Module - Data-Oriented Programming (DOP) style
///
/// This module follows pure DOP principles:
/// - camera_data.rs: Pure data structures with NO methods
/// - camera_operations.rs: Pure functions that operate on data
///

pub mod camera_data;
pub mod camera_operations;

// Re-export data structures
pub use camera_data::CameraView;

// Re-export all operations
pub use camera_operations::{
    // Initialization
    init_camera_view,
    build_perspective_projection,
    build_orthographic_projection,

    // Transforms
    view_point,
    view_depth,
    project_to_screen,
    is_orthogonal,

    // Utilities
    calculate_forward_vector,
};
