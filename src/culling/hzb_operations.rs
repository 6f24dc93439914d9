//! Depth pyramid operations - Pure DOP functions
//!
//! Lifecycle (resize/clear), the max-reduction mip update, and
//! bounds-checked level accessors over [`HzBuffer`] data.

use log::debug;

use super::hzb_data::{DebugRaster, HzBuffer};
use crate::error::{OcclusionError, OcclusionResult};

/// True iff no levels are allocated
pub fn hzb_is_empty(hzb: &HzBuffer) -> bool {
    hzb.sizes.is_empty()
}

/// Number of mip levels
pub fn hzb_level_count(hzb: &HzBuffer) -> usize {
    hzb.sizes.len()
}

/// (Re)allocate the level chain for a new base resolution.
///
/// Rebuilds the mip chain from `size` down to 1x1, halving each dimension
/// with round-up so the coarser level always covers every finer pixel.
/// Contents are invalidated (zeroed) and the frame counter resets. No-op
/// when the requested size matches the current one; a zero dimension
/// clears the buffer.
pub fn hzb_resize(hzb: &mut HzBuffer, size: (u32, u32)) {
    if size == hzb.buffer_size && !hzb_is_empty(hzb) {
        return;
    }
    if size.0 == 0 || size.1 == 0 {
        hzb_clear(hzb);
        return;
    }

    hzb.sizes.clear();
    hzb.mip_offsets.clear();

    let (mut w, mut h) = size;
    let mut total = 0usize;
    loop {
        hzb.sizes.push((w, h));
        hzb.mip_offsets.push(total);
        total += (w * h) as usize;
        if w == 1 && h == 1 {
            break;
        }
        w = w.div_ceil(2);
        h = h.div_ceil(2);
    }

    hzb.data.clear();
    hzb.data.resize(total, 0.0);
    hzb.buffer_size = size;
    hzb.frame = 0;

    if hzb.debug.is_some() {
        hzb_set_debug_enabled(hzb, true);
    }

    debug!(
        "occlusion buffer resized to {}x{} ({} levels, {} samples)",
        size.0,
        size.1,
        hzb.sizes.len(),
        total
    );
}

/// Release all level storage and the debug raster
pub fn hzb_clear(hzb: &mut HzBuffer) {
    hzb.data = Vec::new();
    hzb.sizes = Vec::new();
    hzb.mip_offsets = Vec::new();
    hzb.buffer_size = (0, 0);
    hzb.frame = 0;
    hzb.debug = None;
    debug!("occlusion buffer cleared");
}

/// Attach or drop the 2x-resolution debug raster
pub fn hzb_set_debug_enabled(hzb: &mut HzBuffer, enabled: bool) {
    if !enabled || hzb_is_empty(hzb) {
        hzb.debug = None;
        return;
    }
    let size = (hzb.buffer_size.0 * 2, hzb.buffer_size.1 * 2);
    let len = (size.0 * size.1) as usize;
    match hzb.debug.as_mut() {
        Some(raster) if raster.size == size => {}
        _ => {
            hzb.debug = Some(DebugRaster {
                data: vec![0.0; len],
                size,
                range: 0.0,
            });
        }
    }
}

/// Mutable access to the full-resolution level, for the external occluder
/// rasterization stage. Empty when no pyramid is allocated.
pub fn hzb_level0_mut(hzb: &mut HzBuffer) -> &mut [f32] {
    if hzb_is_empty(hzb) {
        return &mut [];
    }
    let len = (hzb.sizes[0].0 * hzb.sizes[0].1) as usize;
    &mut hzb.data[..len]
}

/// Fill level 0 with a constant depth
pub fn hzb_fill_level0(hzb: &mut HzBuffer, depth: f32) {
    hzb_level0_mut(hzb).fill(depth);
}

/// Regenerate levels 1..N from level 0 and advance the frame counter.
///
/// Each coarser pixel takes the max of its up-to-4 finer pixels; samples
/// past the finer level's edge are absent.
pub fn hzb_update_mips(hzb: &mut HzBuffer) {
    for lod in 1..hzb.sizes.len() {
        let (pw, ph) = hzb.sizes[lod - 1];
        let (cw, ch) = hzb.sizes[lod];
        let prev_off = hzb.mip_offsets[lod - 1];
        let cur_off = hzb.mip_offsets[lod];

        let (head, tail) = hzb.data.split_at_mut(cur_off);
        let prev = &head[prev_off..prev_off + (pw * ph) as usize];
        let cur = &mut tail[..(cw * ch) as usize];

        for y in 0..ch {
            for x in 0..cw {
                let mut max_depth = f32::MIN;
                for sy in (y * 2)..(y * 2 + 2).min(ph) {
                    for sx in (x * 2)..(x * 2 + 2).min(pw) {
                        max_depth = max_depth.max(prev[(sy * pw + sx) as usize]);
                    }
                }
                cur[(y * cw + x) as usize] = max_depth;
            }
        }
    }
    hzb.frame += 1;
}

/// One level of the pyramid as a slice
pub fn hzb_level(hzb: &HzBuffer, lod: usize) -> &[f32] {
    debug_assert!(lod < hzb.sizes.len());
    let (w, h) = hzb.sizes[lod];
    let off = hzb.mip_offsets[lod];
    &hzb.data[off..off + (w * h) as usize]
}

/// Dimensions of one level
pub fn hzb_level_size(hzb: &HzBuffer, lod: usize) -> (u32, u32) {
    debug_assert!(lod < hzb.sizes.len());
    hzb.sizes[lod]
}

/// Raw byte view of one level, for GPU upload by embedding renderers
pub fn hzb_try_level_bytes(hzb: &HzBuffer, lod: usize) -> OcclusionResult<&[u8]> {
    if lod >= hzb.sizes.len() {
        return Err(OcclusionError::LevelOutOfRange {
            lod,
            count: hzb.sizes.len(),
        });
    }
    Ok(bytemuck::cast_slice(hzb_level(hzb, lod)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_new_buffer_is_empty() {
        let hzb = HzBuffer::default();
        assert!(hzb_is_empty(&hzb));
        assert_eq!(hzb_level_count(&hzb), 0);
    }

    #[test]
    fn test_resize_builds_level_chain() {
        test_logger();
        let mut hzb = HzBuffer::default();
        hzb_resize(&mut hzb, (64, 64));
        assert!(!hzb_is_empty(&hzb));
        assert_eq!(hzb.sizes[0], (64, 64));
        assert_eq!(hzb_level_count(&hzb), 7);
        assert_eq!(*hzb.sizes.last().unwrap(), (1, 1));

        // Dimensions never increase down the chain.
        for pair in hzb.sizes.windows(2) {
            assert!(pair[1].0 <= pair[0].0);
            assert!(pair[1].1 <= pair[0].1);
        }
    }

    #[test]
    fn test_resize_non_square_rounds_up() {
        let mut hzb = HzBuffer::default();
        hzb_resize(&mut hzb, (5, 3));
        assert_eq!(hzb.sizes, vec![(5, 3), (3, 2), (2, 1), (1, 1)]);
    }

    #[test]
    fn test_resize_roundtrip_is_noop() {
        let mut hzb = HzBuffer::default();
        hzb_resize(&mut hzb, (32, 16));
        hzb_fill_level0(&mut hzb, 7.0);
        hzb_resize(&mut hzb, (32, 16));
        assert!(!hzb_is_empty(&hzb));
        assert_eq!(hzb.sizes[0], (32, 16));
        // Unchanged size keeps contents.
        assert_eq!(hzb_level(&hzb, 0)[0], 7.0);
    }

    #[test]
    fn test_resize_resets_frame() {
        let mut hzb = HzBuffer::default();
        hzb_resize(&mut hzb, (8, 8));
        hzb_update_mips(&mut hzb);
        hzb_update_mips(&mut hzb);
        assert_eq!(hzb.frame, 2);
        hzb_resize(&mut hzb, (16, 16));
        assert_eq!(hzb.frame, 0);
    }

    #[test]
    fn test_clear_roundtrip() {
        let mut hzb = HzBuffer::default();
        hzb_resize(&mut hzb, (8, 8));
        hzb_clear(&mut hzb);
        assert!(hzb_is_empty(&hzb));
        assert_eq!(hzb.data.len(), 0);
        assert!(hzb_level0_mut(&mut hzb).is_empty());
    }

    #[test]
    fn test_zero_size_clears() {
        let mut hzb = HzBuffer::default();
        hzb_resize(&mut hzb, (8, 8));
        hzb_resize(&mut hzb, (0, 8));
        assert!(hzb_is_empty(&hzb));
    }

    #[test]
    fn test_update_mips_max_reduction() {
        let mut hzb = HzBuffer::default();
        hzb_resize(&mut hzb, (4, 4));
        {
            let level0 = hzb_level0_mut(&mut hzb);
            for (i, v) in level0.iter_mut().enumerate() {
                *v = i as f32;
            }
        }
        hzb_update_mips(&mut hzb);

        // Level 1 pixel (0,0) covers level-0 pixels {0,1,4,5} -> max 5.
        let level1 = hzb_level(&hzb, 1);
        assert_eq!(hzb_level_size(&hzb, 1), (2, 2));
        assert_eq!(level1, &[5.0, 7.0, 13.0, 15.0]);

        // Apex is the global max.
        let apex = hzb_level(&hzb, 2);
        assert_eq!(apex, &[15.0]);
    }

    #[test]
    fn test_update_mips_odd_dimensions_cover_all() {
        // A 3x3 level reduces to 2x2; the odd edge pixels must still feed
        // into the coarser level (absent samples, not dropped columns).
        let mut hzb = HzBuffer::default();
        hzb_resize(&mut hzb, (3, 3));
        {
            let level0 = hzb_level0_mut(&mut hzb);
            level0.fill(1.0);
            level0[8] = 99.0; // bottom-right corner
        }
        hzb_update_mips(&mut hzb);

        let level1 = hzb_level(&hzb, 1);
        assert_eq!(hzb_level_size(&hzb, 1), (2, 2));
        assert_eq!(level1[3], 99.0);
        assert_eq!(hzb_level(&hzb, 2), &[99.0]);
    }

    #[test]
    fn test_update_mips_advances_frame() {
        let mut hzb = HzBuffer::default();
        hzb_resize(&mut hzb, (8, 8));
        assert_eq!(hzb.frame, 0);
        hzb_update_mips(&mut hzb);
        assert_eq!(hzb.frame, 1);
    }

    #[test]
    fn test_level_bytes() {
        let mut hzb = HzBuffer::default();
        hzb_resize(&mut hzb, (2, 2));
        hzb_fill_level0(&mut hzb, 1.0);
        let bytes = hzb_try_level_bytes(&hzb, 0).unwrap();
        assert_eq!(bytes.len(), 16);

        assert!(matches!(
            hzb_try_level_bytes(&hzb, 9),
            Err(OcclusionError::LevelOutOfRange { lod: 9, count: 2 })
        ));
    }

    #[test]
    fn test_debug_raster_lifecycle() {
        let mut hzb = HzBuffer::default();
        hzb_resize(&mut hzb, (8, 4));
        hzb_set_debug_enabled(&mut hzb, true);
        let raster = hzb.debug.as_ref().unwrap();
        assert_eq!(raster.size, (16, 8));

        // Resize reshapes the raster along with the levels.
        hzb_resize(&mut hzb, (16, 16));
        assert_eq!(hzb.debug.as_ref().unwrap().size, (32, 32));

        hzb_set_debug_enabled(&mut hzb, false);
        assert!(hzb.debug.is_none());
    }
}
