//! Per-query transient state - Pure DOP
//!
//! Built fresh for every tested box; nothing here persists in the pyramid.

use cgmath::Vector2;

/// Screen-space depth interpolation plane.
///
/// Evaluates box depth at normalized screen coordinate (x, y) as
/// `c + a*x + b*y`. A zeroed plane contributes nothing to the 3-plane max.
#[derive(Debug, Clone, Copy, Default)]
pub struct Plane2d {
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl Plane2d {
    pub const ZERO: Plane2d = Plane2d { a: 0.0, b: 0.0, c: 0.0 };

    /// Depth at a normalized screen coordinate
    #[inline]
    pub fn depth_at(&self, x: f32, y: f32) -> f32 {
        self.c + self.a * x + self.b * y
    }
}

/// Projected footprint of one box: corners, silhouette planes and the
/// screen-space rectangle the mip walk samples.
#[derive(Debug, Clone, Copy)]
pub struct BoxProjection {
    /// Normalized [0,1] screen projections of the 8 corners
    pub proj: [Vector2<f32>; 8],

    /// Camera-space depths of the 8 corners, larger = farther
    pub depth: [f32; 8],

    /// Index of the corner nearest the camera
    pub nearest: usize,

    /// Depth of the nearest corner
    pub min_depth: f32,

    /// Screen-space bounding rectangle, clamped to [0,1]
    pub rect_min: Vector2<f32>,
    pub rect_max: Vector2<f32>,

    /// Depth planes for the 3 silhouette edges off the nearest corner
    pub planes: [Plane2d; 3],
}
