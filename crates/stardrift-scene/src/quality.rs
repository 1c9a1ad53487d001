//! Frame-rate sampling and entity-count downgrades.

use stardrift_core::SceneParams;
use tracing::info;

/// Delay after start before sampling begins.
pub const ARM_DELAY_MS: u64 = 3000;
/// Length of one sampling window.
pub const WINDOW_MS: u64 = 1000;
/// A window with fewer frames than this triggers a downgrade.
pub const FPS_FLOOR: u32 = 30;

const MIN_PARTICLES: usize = 500;
const MIN_OBJECTS: usize = 10;
const REDUCTION: f32 = 0.8;

/// Counts shrunk by one downgrade step, never below the floors.
pub fn reduced_counts(particles: usize, objects: usize) -> (usize, usize) {
    (
        MIN_PARTICLES.max((particles as f32 * REDUCTION) as usize),
        MIN_OBJECTS.max((objects as f32 * REDUCTION) as usize),
    )
}

/// Counts frames per window once armed.
///
/// A slow window lowers the target counts in the given [`SceneParams`]; the
/// running collections keep their size until the next full rebuild.
#[derive(Debug, Clone, Default)]
pub struct QualityMonitor {
    window_start_ms: Option<u64>,
    frames: u32,
    last_fps: Option<u32>,
}

impl QualityMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&mut self, now_ms: u64) {
        self.window_start_ms = Some(now_ms);
        self.frames = 0;
    }

    pub fn disarm(&mut self) {
        self.window_start_ms = None;
        self.frames = 0;
    }

    /// Frame count of the last completed window.
    pub fn last_fps(&self) -> Option<u32> {
        self.last_fps
    }

    /// Count one frame. Returns the window's frame count when it closes.
    pub fn record_frame(&mut self, now_ms: u64, params: &mut SceneParams) -> Option<u32> {
        let start = self.window_start_ms?;
        self.frames += 1;
        if now_ms.saturating_sub(start) < WINDOW_MS {
            return None;
        }

        let fps = self.frames;
        self.frames = 0;
        self.window_start_ms = Some(now_ms);
        self.last_fps = Some(fps);

        if fps < FPS_FLOOR {
            let (particles, objects) =
                reduced_counts(params.particle_count, params.floating_object_count);
            if (particles, objects) != (params.particle_count, params.floating_object_count) {
                info!(fps, particles, objects, "low frame rate; lowering entity counts");
            }
            params.particle_count = particles;
            params.floating_object_count = objects;
        }
        Some(fps)
    }
}
