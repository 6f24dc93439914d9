/// Data-Oriented Axis-Aligned Bounding Box System
///
/// Pure functions over bounding-box data - no methods, just data transformations.

use cgmath::{Point3, Vector3};

/// Axis-Aligned Bounding Box - pure data structure
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

/// Create new AABB from min/max points
pub fn aabb_new(min: Point3<f32>, max: Point3<f32>) -> Aabb {
    Aabb { min, max }
}

/// Create AABB from center point and half extents
pub fn aabb_from_center_half_extents(center: Point3<f32>, half_extents: Vector3<f32>) -> Aabb {
    Aabb {
        min: Point3::new(
            center.x - half_extents.x,
            center.y - half_extents.y,
            center.z - half_extents.z,
        ),
        max: Point3::new(
            center.x + half_extents.x,
            center.y + half_extents.y,
            center.z + half_extents.z,
        ),
    }
}

/// Get center point of AABB
pub fn aabb_center(aabb: &Aabb) -> Point3<f32> {
    Point3::new(
        (aabb.min.x + aabb.max.x) * 0.5,
        (aabb.min.y + aabb.max.y) * 0.5,
        (aabb.min.z + aabb.max.z) * 0.5,
    )
}

/// Get half extents of AABB
pub fn aabb_half_extents(aabb: &Aabb) -> Vector3<f32> {
    Vector3::new(
        (aabb.max.x - aabb.min.x) * 0.5,
        (aabb.max.y - aabb.min.y) * 0.5,
        (aabb.max.z - aabb.min.z) * 0.5,
    )
}

/// Test if AABB contains a point (inclusive on all faces)
pub fn aabb_contains_point(aabb: &Aabb, point: Point3<f32>) -> bool {
    point.x >= aabb.min.x && point.x <= aabb.max.x &&
    point.y >= aabb.min.y && point.y <= aabb.max.y &&
    point.z >= aabb.min.z && point.z <= aabb.max.z
}

/// Clamp a point into the AABB extents per axis.
///
/// This is the closest point of the box to `point`; equal to `point`
/// when the point is inside the box.
pub fn aabb_closest_point(aabb: &Aabb, point: Point3<f32>) -> Point3<f32> {
    Point3::new(
        point.x.clamp(aabb.min.x, aabb.max.x),
        point.y.clamp(aabb.min.y, aabb.max.y),
        point.z.clamp(aabb.min.z, aabb.max.z),
    )
}

/// Enumerate one of the 8 corners by bit pattern.
///
/// Bit 0 selects x, bit 1 selects y, bit 2 selects z; a set bit picks the
/// min bound on that axis. Corners that share an edge differ by exactly
/// one bit, which the silhouette construction relies on.
pub fn aabb_corner(aabb: &Aabb, index: usize) -> Point3<f32> {
    debug_assert!(index < 8);
    Point3::new(
        if index & 1 != 0 { aabb.min.x } else { aabb.max.x },
        if index & 2 != 0 { aabb.min.y } else { aabb.max.y },
        if index & 4 != 0 { aabb.min.z } else { aabb.max.z },
    )
}
