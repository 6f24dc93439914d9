//! Occlusion query - Pure DOP functions
//!
//! Answers whether a world-space box is fully hidden by the depth recorded
//! in a pyramid. Every degenerate or ambiguous geometric case resolves to
//! "not occluded"; a wrong answer here may only ever cost performance,
//! never make geometry disappear.

use cgmath::{Vector2, Vector3};

use super::hzb_data::HzBuffer;
use super::hzb_operations::{hzb_is_empty, hzb_level, hzb_level_count};
use super::query_data::{BoxProjection, Plane2d};
use crate::aabb::{aabb_closest_point, aabb_corner, Aabb};
use crate::camera::{is_orthogonal, project_to_screen, view_depth, view_point, CameraView};
use crate::config::CullingConfig;

/// Conservative depth bias subtracted at the nearest corner so the box's
/// own silhouette never occludes itself.
const DEPTH_OFFSET: f32 = 0.05;

/// Depth-delta scale for silhouette edges under a perspective projection.
const PERSPECTIVE_DEPTH_ADJUST: f32 = 0.9;

/// Threshold under which a silhouette plane is parallel to the view and
/// contributes nothing.
const DEGENERATE_PLANE_EPSILON: f32 = 1e-4;

/// Raw verdict plus the transient state the debug raster paints from.
#[derive(Debug, Clone, Copy)]
pub(crate) enum RawOutcome {
    /// One of the conservative early-outs fired; nothing was sampled
    EarlyVisible,
    /// The pyramid was scanned; `visible` is the disproof flag
    Scanned {
        projection: BoxProjection,
        visible: bool,
    },
}

impl RawOutcome {
    pub(crate) fn occluded(&self) -> bool {
        match self {
            RawOutcome::EarlyVisible => false,
            RawOutcome::Scanned { visible, .. } => !visible,
        }
    }
}

/// Project a box's 8 corners and build its silhouette depth planes.
///
/// The three planes span the silhouette edges leaving the corner nearest
/// the camera; evaluated together via max they give a conservative
/// screen-space depth for every pixel the box may touch.
pub fn project_box(aabb: &Aabb, camera: &CameraView) -> BoxProjection {
    let mut proj = [Vector2::new(0.0f32, 0.0); 8];
    let mut depth = [0.0f32; 8];
    let mut min_depth = f32::MAX;
    let mut nearest = 0usize;
    let mut rect_min = Vector2::new(f32::MAX, f32::MAX);
    let mut rect_max = Vector2::new(f32::MIN, f32::MIN);

    for j in 0..8 {
        let view = view_point(camera, aabb_corner(aabb, j));
        depth[j] = view_depth(view);
        if depth[j] < min_depth {
            min_depth = depth[j];
            nearest = j;
        }

        proj[j] = project_to_screen(&camera.projection, view);
        rect_min.x = rect_min.x.min(proj[j].x);
        rect_min.y = rect_min.y.min(proj[j].y);
        rect_max.x = rect_max.x.max(proj[j].x);
        rect_max.y = rect_max.y.max(proj[j].y);
    }

    let adj = if is_orthogonal(&camera.projection) {
        1.0
    } else {
        PERSPECTIVE_DEPTH_ADJUST
    };

    // Silhouette edge vectors: the nearest corner to its three
    // edge-adjacent corners (one flipped index bit each).
    let mut vn = [Vector3::new(0.0f32, 0.0, 0.0); 3];
    for (i, edge) in vn.iter_mut().enumerate() {
        let j = nearest ^ (1 << i);
        *edge = Vector3::new(
            proj[j].x - proj[nearest].x,
            proj[j].y - proj[nearest].y,
            adj * (depth[j] - min_depth),
        );
    }

    // Pivot plane: the cross product with the most depth-discriminating
    // (largest magnitude) z component.
    let mut cn = [Vector3::new(0.0f32, 0.0, 0.0); 3];
    let mut p = 0usize;
    for i in 0..3 {
        cn[i] = vn[(i + 1) % 3].cross(vn[(i + 2) % 3]);
        if cn[p].z.abs() < cn[i].z.abs() {
            p = i;
        }
    }

    let mut planes = [Plane2d::ZERO; 3];
    for i in 0..3 {
        if cn[p].z * cn[i].z <= DEGENERATE_PLANE_EPSILON {
            // Parallel to the view direction; no depth influence.
            planes[i] = Plane2d::ZERO;
        } else {
            let a = -cn[i].x / cn[i].z;
            let b = -cn[i].y / cn[i].z;
            planes[i] = Plane2d {
                a,
                b,
                c: min_depth - DEPTH_OFFSET - a * proj[nearest].x - b * proj[nearest].y,
            };
        }
    }

    rect_min.x = rect_min.x.max(0.0);
    rect_min.y = rect_min.y.max(0.0);
    rect_max.x = rect_max.x.min(1.0);
    rect_max.y = rect_max.y.min(1.0);

    BoxProjection {
        proj,
        depth,
        nearest,
        min_depth,
        rect_min,
        rect_max,
        planes,
    }
}

/// Mip level whose footprint best matches a screen rectangle.
///
/// Larger projected footprint picks a coarser level: fewer samples at the
/// cost of precision. Always within `[0, level_count - 1]`.
pub fn mip_level_for_rect(
    rect_min: Vector2<f32>,
    rect_max: Vector2<f32>,
    base_size: (u32, u32),
    level_count: usize,
) -> usize {
    let dx = (rect_max.x - rect_min.x) * base_size.0 as f32;
    let dy = (rect_max.y - rect_min.y) * base_size.1 as f32;
    let footprint = dx.max(dy);
    let l = footprint.log2().ceil();
    (l as i32).clamp(0, level_count.saturating_sub(1) as i32) as usize
}

/// Pixel index bounds of a normalized rect at one level: inclusive, padded
/// one pixel outward, clamped to the level extents.
#[inline]
fn rect_pixel_bounds(
    rect_min: Vector2<f32>,
    rect_max: Vector2<f32>,
    w: u32,
    h: u32,
) -> (u32, u32, u32, u32) {
    let minx = (rect_min.x * w as f32 - 1.0).clamp(0.0, (w - 1) as f32) as u32;
    let maxx = (rect_max.x * w as f32 + 1.0).clamp(0.0, (w - 1) as f32) as u32;
    let miny = (rect_min.y * h as f32 - 1.0).clamp(0.0, (h - 1) as f32) as u32;
    let maxy = (rect_max.y * h as f32 + 1.0).clamp(0.0, (h - 1) as f32) as u32;
    (minx, maxx, miny, maxy)
}

#[inline]
fn sample_level(level: &[f32], idx: usize) -> f32 {
    debug_assert!(idx < level.len());
    // SAFETY: callers index with x <= w-1, y <= h-1, so idx < w*h == len.
    unsafe { *level.get_unchecked(idx) }
}

/// Core test: project, pick a starting level, then walk toward level 0.
pub(crate) fn test_box(
    hzb: &HzBuffer,
    aabb: &Aabb,
    camera: &CameraView,
    max_samples: Option<u32>,
) -> RawOutcome {
    if hzb_is_empty(hzb) {
        return RawOutcome::EarlyVisible;
    }

    // A box containing (or touching) the camera can never be culled.
    let closest_point = aabb_closest_point(aabb, camera.position);
    if closest_point == camera.position {
        return RawOutcome::EarlyVisible;
    }

    // Geometry at or in front of the near plane cannot be tested reliably.
    let closest_view = view_point(camera, closest_point);
    if closest_view.z >= -camera.near {
        return RawOutcome::EarlyVisible;
    }

    let projection = project_box(aabb, camera);

    let mut lod = mip_level_for_rect(
        projection.rect_min,
        projection.rect_max,
        hzb.sizes[0],
        hzb_level_count(hzb),
    ) as i32;

    // Walk from the selected level toward level 0. A level fully scanned
    // with no disproof is a definitive occluded verdict; a disproving
    // pixel sends the walk one level finer for a sharper retry.
    let mut visible = true;
    let mut sampled: u64 = 0;
    while lod >= 0 {
        let level = hzb_level(hzb, lod as usize);
        let (w, h) = hzb.sizes[lod as usize];
        let (minx, maxx, miny, maxy) =
            rect_pixel_bounds(projection.rect_min, projection.rect_max, w, h);

        sampled += u64::from(maxx - minx + 1) * u64::from(maxy - miny + 1);
        if let Some(cap) = max_samples {
            if sampled > u64::from(cap) {
                visible = true;
                break;
            }
        }

        visible = false;
        'scan: for y in miny..=maxy {
            for x in minx..=maxx {
                let sx = x as f32 / w as f32;
                let sy = y as f32 / h as f32;
                let t_depth = projection.planes[0]
                    .depth_at(sx, sy)
                    .max(projection.planes[1].depth_at(sx, sy))
                    .max(projection.planes[2].depth_at(sx, sy));

                // Stored depth beyond the box surface means the recorded
                // occluder sits behind the box there: not occluded.
                if sample_level(level, (y * w + x) as usize) > t_depth {
                    visible = true;
                    break 'scan;
                }
            }
        }

        if !visible {
            break;
        }
        lod -= 1;
    }

    RawOutcome::Scanned { projection, visible }
}

/// Raw occlusion test against a pyramid snapshot.
///
/// Pure: identical arguments against an unchanged pyramid always return
/// the same verdict.
pub fn is_occluded_raw(hzb: &HzBuffer, aabb: &Aabb, camera: &CameraView) -> bool {
    test_box(hzb, aabb, camera, None).occluded()
}

/// Occlusion test with temporal hysteresis.
///
/// `timeout` is the caller-owned per-object hold counter; 0 means no
/// active hold. A visible verdict arms a hold of `config.hold_frames`
/// frames; an occluded verdict only propagates once the hold has expired
/// against the pyramid's frame counter. With jitter disabled the raw
/// verdict passes through and `timeout` is left untouched.
pub fn is_occluded(
    hzb: &HzBuffer,
    aabb: &Aabb,
    camera: &CameraView,
    timeout: &mut u64,
    config: &CullingConfig,
) -> bool {
    let occluded = test_box(hzb, aabb, camera, config.max_samples).occluded();
    apply_hysteresis(occluded, hzb.frame, timeout, config)
}

/// Fold a raw verdict through the caller's hold counter.
pub(crate) fn apply_hysteresis(
    occluded: bool,
    frame: u64,
    timeout: &mut u64,
    config: &CullingConfig,
) -> bool {
    if !config.jitter_enabled {
        return occluded;
    }

    if !occluded {
        *timeout = frame + config.hold_frames;
    } else if *timeout != 0 && frame >= *timeout {
        *timeout = 0;
    }

    occluded && *timeout == 0
}
