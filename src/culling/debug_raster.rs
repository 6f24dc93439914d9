//! Debug raster maintenance - Pure DOP functions
//!
//! Rewrites the 2x-resolution instrumentation raster with the footprint of
//! a query and renders it to an 8-bit image for inspection tooling.
//! Purely diagnostic; never feeds back into a verdict.

use image::GrayImage;

use super::hzb_data::DebugRaster;
use super::query_data::BoxProjection;

/// Smoothing factor for the running normalization range
const RANGE_APPROACH: f32 = 0.1;

/// Zero the raster for a fresh frame of query footprints
pub fn debug_clear(raster: &mut DebugRaster) {
    raster.data.fill(0.0);
}

/// Paint one query footprint into the raster.
///
/// Every pixel of the padded rectangle gets the 3-plane depth (floored at
/// the nearest corner depth). Border pixels are blanked to outline the
/// rectangle: all of them for a visible verdict, alternate ones for an
/// occluded verdict. The nearest corner's projection is blanked as a
/// marker.
pub fn debug_paint(raster: &mut DebugRaster, projection: &BoxProjection, visible: bool) {
    let (w, h) = raster.size;
    if w == 0 || h == 0 {
        return;
    }
    let wf = w as f32;
    let hf = h as f32;

    let minx = (projection.rect_min.x * wf - 1.0).clamp(0.0, wf - 1.0) as u32;
    let maxx = (projection.rect_max.x * wf + 1.0).clamp(0.0, wf - 1.0) as u32;
    let miny = (projection.rect_min.y * hf - 1.0).clamp(0.0, hf - 1.0) as u32;
    let maxy = (projection.rect_max.y * hf + 1.0).clamp(0.0, hf - 1.0) as u32;

    for y in miny..=maxy {
        for x in minx..=maxx {
            let sx = x as f32 / wf;
            let sy = y as f32 / hf;
            let t_depth = projection.planes[0]
                .depth_at(sx, sy)
                .max(projection.planes[1].depth_at(sx, sy))
                .max(projection.planes[2].depth_at(sx, sy));

            let idx = (y * w + x) as usize;
            raster.data[idx] = projection.min_depth.max(t_depth);

            if x == minx || x == maxx || y == miny || y == maxy {
                if visible || (x + y) % 2 == 0 {
                    raster.data[idx] = 0.0;
                }
            }
        }
    }

    let nx = (projection.proj[projection.nearest].x * wf - 1.0).clamp(0.0, wf - 1.0) as u32;
    let ny = (projection.proj[projection.nearest].y * hf - 1.0).clamp(0.0, hf - 1.0) as u32;
    raster.data[(ny * w + nx) as usize] = 0.0;
}

/// Render the raster to an 8-bit grayscale image.
///
/// Depths are normalized by a running range that approaches the observed
/// maximum, so the output stays stable frame to frame instead of
/// flickering with each query.
pub fn debug_texture(raster: &mut DebugRaster) -> GrayImage {
    let (w, h) = raster.size;
    let max_depth = raster.data.iter().copied().fold(0.0f32, f32::max);

    if raster.range == 0.0 {
        raster.range = max_depth;
    } else {
        raster.range += (max_depth - raster.range) * RANGE_APPROACH;
    }

    let range = raster.range.max(f32::EPSILON);
    let pixels: Vec<u8> = raster
        .data
        .iter()
        .map(|&d| (d / range * 255.0).clamp(0.0, 255.0) as u8)
        .collect();

    GrayImage::from_raw(w, h, pixels).expect("raster dimensions match pixel count")
}
