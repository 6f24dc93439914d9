//! Camera data structures - Pure DOP
//!
//! NO METHODS. Just data.
//! All transformations happen in camera_operations.rs

use cgmath::{Matrix4, Point3, SquareMatrix};

/// Everything an occlusion query needs to know about the camera - pure data
#[derive(Debug, Clone, Copy)]
pub struct CameraView {
    /// Camera position in world space
    pub position: Point3<f32>,

    /// World-to-camera (view) matrix; the camera looks down -Z
    pub inv_transform: Matrix4<f32>,

    /// Camera projection matrix (perspective or orthographic)
    pub projection: Matrix4<f32>,

    /// Near clipping plane distance
    pub near: f32,
}

impl Default for CameraView {
    fn default() -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 0.0),
            inv_transform: Matrix4::identity(),
            projection: Matrix4::identity(),
            near: 0.1,
        }
    }
}
