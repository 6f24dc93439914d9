//! Occlusion culler backends.
//!
//! The culler is an owned value injected into the renderer; independent
//! cullers (and their pyramids) can coexist, which keeps tests hermetic.
//! The disabled backend answers every query with "visible" and warns once
//! when asked to do real work.

use std::sync::Once;

use image::GrayImage;
use log::warn;
use rayon::prelude::*;

use super::debug_raster::{debug_clear, debug_paint, debug_texture};
use super::hzb_data::HzBuffer;
use super::hzb_operations::{
    hzb_clear, hzb_is_empty, hzb_level0_mut, hzb_resize, hzb_set_debug_enabled, hzb_update_mips,
};
use super::query_operations::{apply_hysteresis, test_box, RawOutcome};
use crate::aabb::Aabb;
use crate::camera::CameraView;
use crate::config::{BuildQuality, CullingConfig};

static DISABLED_WARNING: Once = Once::new();

fn warn_disabled() {
    DISABLED_WARNING.call_once(|| {
        warn!("occlusion culling is disabled; culling requests are ignored");
    });
}

/// Raster-HZB culling backend: one depth pyramid plus its configuration
#[derive(Debug, Clone, Default)]
pub struct RasterHzbCuller {
    pub config: CullingConfig,
    pub hzb: HzBuffer,
}

/// Occlusion culling capability set
#[derive(Debug, Clone)]
pub enum OcclusionCuller {
    /// No-op backend; every query reports visible
    Disabled,
    /// CPU hierarchical-Z backend
    RasterHzb(RasterHzbCuller),
}

impl OcclusionCuller {
    /// Construct the raster backend with the given configuration
    pub fn new_raster(config: CullingConfig) -> Self {
        Self::RasterHzb(RasterHzbCuller {
            config,
            hzb: HzBuffer::default(),
        })
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::RasterHzb(_))
    }

    /// (Re)allocate the depth pyramid
    pub fn buffer_resize(&mut self, size: (u32, u32)) {
        match self {
            Self::Disabled => warn_disabled(),
            Self::RasterHzb(culler) => {
                hzb_resize(&mut culler.hzb, size);
                hzb_set_debug_enabled(&mut culler.hzb, culler.config.debug_instrumentation);
            }
        }
    }

    /// Release the depth pyramid
    pub fn buffer_clear(&mut self) {
        match self {
            Self::Disabled => warn_disabled(),
            Self::RasterHzb(culler) => hzb_clear(&mut culler.hzb),
        }
    }

    pub fn buffer_is_empty(&self) -> bool {
        match self {
            Self::Disabled => true,
            Self::RasterHzb(culler) => hzb_is_empty(&culler.hzb),
        }
    }

    /// Mutable full-resolution depth for the external occluder rasterizer
    pub fn level0_mut(&mut self) -> Option<&mut [f32]> {
        match self {
            Self::Disabled => {
                warn_disabled();
                None
            }
            Self::RasterHzb(culler) => {
                if hzb_is_empty(&culler.hzb) {
                    None
                } else {
                    Some(hzb_level0_mut(&mut culler.hzb))
                }
            }
        }
    }

    /// Rebuild coarse levels from level 0 and advance the frame clock.
    /// Must run after the occluder rasterizer and before this frame's
    /// queries.
    pub fn update_mips(&mut self) {
        match self {
            Self::Disabled => warn_disabled(),
            Self::RasterHzb(culler) => {
                hzb_update_mips(&mut culler.hzb);
                if let Some(raster) = culler.hzb.debug.as_mut() {
                    debug_clear(raster);
                }
            }
        }
    }

    /// Frame counter of the owned pyramid
    pub fn frame(&self) -> u64 {
        match self {
            Self::Disabled => 0,
            Self::RasterHzb(culler) => culler.hzb.frame,
        }
    }

    /// Store the build-quality hint for the external mip source
    pub fn set_build_quality(&mut self, quality: BuildQuality) {
        match self {
            Self::Disabled => warn_disabled(),
            Self::RasterHzb(culler) => culler.config.build_quality = quality,
        }
    }

    pub fn build_quality(&self) -> BuildQuality {
        match self {
            Self::Disabled => BuildQuality::default(),
            Self::RasterHzb(culler) => culler.config.build_quality,
        }
    }

    /// Raw occlusion verdict, no hysteresis, no instrumentation
    pub fn is_occluded_raw(&self, aabb: &Aabb, camera: &CameraView) -> bool {
        match self {
            Self::Disabled => false,
            Self::RasterHzb(culler) => {
                test_box(&culler.hzb, aabb, camera, culler.config.max_samples).occluded()
            }
        }
    }

    /// Occlusion verdict with temporal hysteresis and (when enabled) debug
    /// instrumentation. `timeout` is the caller-owned hold counter for this
    /// object; it must not be shared between objects.
    pub fn is_occluded(&mut self, aabb: &Aabb, camera: &CameraView, timeout: &mut u64) -> bool {
        match self {
            Self::Disabled => false,
            Self::RasterHzb(culler) => {
                let outcome = test_box(&culler.hzb, aabb, camera, culler.config.max_samples);

                if let (Some(raster), RawOutcome::Scanned { projection, visible }) =
                    (culler.hzb.debug.as_mut(), &outcome)
                {
                    debug_paint(raster, projection, *visible);
                }

                apply_hysteresis(outcome.occluded(), culler.hzb.frame, timeout, &culler.config)
            }
        }
    }

    /// Hysteresis-wrapped verdicts for a batch of independent boxes,
    /// evaluated in parallel against the same pyramid snapshot.
    ///
    /// `timeouts` holds one hold counter per box. The debug raster is not
    /// painted on this path.
    pub fn cull_batch(
        &self,
        boxes: &[Aabb],
        camera: &CameraView,
        timeouts: &mut [u64],
    ) -> Vec<bool> {
        assert_eq!(boxes.len(), timeouts.len(), "one timeout slot per box");
        match self {
            Self::Disabled => vec![false; boxes.len()],
            Self::RasterHzb(culler) => boxes
                .par_iter()
                .zip(timeouts.par_iter_mut())
                .map(|(aabb, timeout)| {
                    let occluded =
                        test_box(&culler.hzb, aabb, camera, culler.config.max_samples).occluded();
                    apply_hysteresis(occluded, culler.hzb.frame, timeout, &culler.config)
                })
                .collect(),
        }
    }

    /// Snapshot of the debug raster as a grayscale image; `None` when the
    /// backend is disabled, the pyramid is unallocated, or instrumentation
    /// is off.
    pub fn debug_texture(&mut self) -> Option<GrayImage> {
        match self {
            Self::Disabled => None,
            Self::RasterHzb(culler) => culler.hzb.debug.as_mut().map(debug_texture),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{build_perspective_projection, init_camera_view};
    use cgmath::Point3;

    fn test_camera() -> CameraView {
        init_camera_view(
            Point3::new(0.0, 0.0, 0.0),
            -std::f32::consts::FRAC_PI_2,
            0.0,
            build_perspective_projection(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 1000.0),
            0.1,
        )
    }

    fn box_ahead() -> Aabb {
        Aabb {
            min: Point3::new(-0.5, -0.5, -5.5),
            max: Point3::new(0.5, 0.5, -4.5),
        }
    }

    fn raster_culler(depth: f32) -> OcclusionCuller {
        let mut culler = OcclusionCuller::new_raster(CullingConfig::default());
        culler.buffer_resize((64, 64));
        culler.level0_mut().unwrap().fill(depth);
        culler.update_mips();
        culler
    }

    #[test]
    fn test_disabled_is_safe_noop() {
        let mut culler = OcclusionCuller::Disabled;
        culler.buffer_resize((64, 64));
        assert!(!culler.is_active());
        assert!(culler.buffer_is_empty());
        assert!(culler.level0_mut().is_none());
        assert!(culler.debug_texture().is_none());
        assert_eq!(culler.frame(), 0);

        let mut timeout = 0u64;
        assert!(!culler.is_occluded(&box_ahead(), &test_camera(), &mut timeout));
        assert!(!culler.is_occluded_raw(&box_ahead(), &test_camera()));
        assert_eq!(
            culler.cull_batch(&[box_ahead()], &test_camera(), &mut [0]),
            vec![false]
        );
    }

    #[test]
    fn test_raster_culler_end_to_end() {
        let mut culler = raster_culler(1.0);
        assert!(culler.is_active());
        assert!(!culler.buffer_is_empty());
        assert_eq!(culler.frame(), 1);

        let mut timeout = 0u64;
        assert!(culler.is_occluded(&box_ahead(), &test_camera(), &mut timeout));
        assert!(culler.is_occluded_raw(&box_ahead(), &test_camera()));

        culler.buffer_clear();
        assert!(culler.buffer_is_empty());
        assert!(!culler.is_occluded_raw(&box_ahead(), &test_camera()));
    }

    #[test]
    fn test_query_before_resize_degrades_to_visible() {
        let culler = OcclusionCuller::new_raster(CullingConfig::default());
        assert!(!culler.is_occluded_raw(&box_ahead(), &test_camera()));
    }

    #[test]
    fn test_batch_matches_serial() {
        let culler = raster_culler(1.0);
        let camera = test_camera();
        let boxes: Vec<Aabb> = (0..32)
            .map(|i| {
                let offset = (i as f32 - 16.0) * 0.75;
                Aabb {
                    min: Point3::new(offset - 0.5, -0.5, -5.5),
                    max: Point3::new(offset + 0.5, 0.5, -4.5),
                }
            })
            .collect();

        let mut batch_timeouts = vec![0u64; boxes.len()];
        let batch = culler.cull_batch(&boxes, &camera, &mut batch_timeouts);

        let serial: Vec<bool> = boxes
            .iter()
            .map(|aabb| culler.is_occluded_raw(aabb, &camera))
            .collect();
        assert_eq!(batch, serial);
    }

    #[test]
    fn test_build_quality_passthrough() {
        let mut culler = OcclusionCuller::new_raster(CullingConfig::default());
        assert_eq!(culler.build_quality(), BuildQuality::Medium);
        culler.set_build_quality(BuildQuality::High);
        assert_eq!(culler.build_quality(), BuildQuality::High);
    }

    #[test]
    fn test_debug_texture_lifecycle() {
        let config = CullingConfig {
            debug_instrumentation: true,
            ..Default::default()
        };
        let mut culler = OcclusionCuller::new_raster(config);
        assert!(culler.debug_texture().is_none());

        culler.buffer_resize((16, 16));
        culler.level0_mut().unwrap().fill(1.0);
        culler.update_mips();

        let mut timeout = 0u64;
        culler.is_occluded(&box_ahead(), &test_camera(), &mut timeout);

        let img = culler.debug_texture().unwrap();
        assert_eq!(img.dimensions(), (32, 32));
    }
}
