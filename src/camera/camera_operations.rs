//! Camera operations - Pure DOP functions
//!
//! All functions are pure: they take data, return new data, no side effects.
//! No methods, no self, just transformations.

use super::camera_data::CameraView;
use cgmath::{InnerSpace, Matrix4, Point3, Rad, Transform, Vector2, Vector3, Vector4};

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Build a camera view from a position, yaw/pitch orientation, a projection
/// matrix and a near plane distance.
pub fn init_camera_view(
    position: Point3<f32>,
    yaw: f32,
    pitch: f32,
    projection: Matrix4<f32>,
    near: f32,
) -> CameraView {
    let forward = calculate_forward_vector(yaw, pitch);
    let target = position + forward;
    let up = Vector3::new(0.0, 1.0, 0.0);

    CameraView {
        position,
        inv_transform: Matrix4::look_at_rh(position, target, up),
        projection,
        near,
    }
}

/// Build a perspective projection matrix
pub fn build_perspective_projection(
    fov_radians: f32,
    aspect_ratio: f32,
    near: f32,
    far: f32,
) -> Matrix4<f32> {
    cgmath::perspective(Rad(fov_radians), aspect_ratio, near, far)
}

/// Build an orthographic projection matrix from symmetric half extents
pub fn build_orthographic_projection(
    half_width: f32,
    half_height: f32,
    near: f32,
    far: f32,
) -> Matrix4<f32> {
    cgmath::ortho(-half_width, half_width, -half_height, half_height, near, far)
}

// ============================================================================
// TRANSFORMS
// ============================================================================

/// Transform a world-space point into camera space
pub fn view_point(view: &CameraView, world: Point3<f32>) -> Point3<f32> {
    view.inv_transform.transform_point(world)
}

/// Camera-space depth of a view point: distance along the view direction,
/// larger = farther ("far is larger" convention)
pub fn view_depth(view_point: Point3<f32>) -> f32 {
    -view_point.z
}

/// Project a camera-space point to normalized screen space.
///
/// Homogeneous projection with perspective divide, then clip [-1,1] remapped
/// to [0,1] on both axes. Points at or behind the camera plane of a
/// perspective projection produce non-finite coordinates; callers clamp the
/// resulting rectangle, which keeps the verdict conservative.
pub fn project_to_screen(projection: &Matrix4<f32>, point: Point3<f32>) -> Vector2<f32> {
    let clip = projection * Vector4::new(point.x, point.y, point.z, 1.0);
    Vector2::new(
        clip.x / clip.w * 0.5 + 0.5,
        clip.y / clip.w * 0.5 + 0.5,
    )
}

/// True iff the projection has no perspective divide.
///
/// An orthographic matrix keeps w untouched, so its (3,3) entry is 1; a
/// perspective matrix moves -z into w and zeroes that entry.
pub fn is_orthogonal(projection: &Matrix4<f32>) -> bool {
    projection[3][3] == 1.0
}

// ============================================================================
// UTILITIES
// ============================================================================

/// Calculate forward vector from yaw and pitch
pub fn calculate_forward_vector(yaw: f32, pitch: f32) -> Vector3<f32> {
    Vector3::new(
        yaw.cos() * pitch.cos(),
        pitch.sin(),
        yaw.sin() * pitch.cos(),
    )
    .normalize()
}
