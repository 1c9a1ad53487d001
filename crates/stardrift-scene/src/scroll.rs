//! Scroll-to-scene mapping.
//!
//! The raw scroll offset is eased into `current`, normalized by the
//! scrollable extent and mapped onto camera, scene yaw and lights. The
//! mapping only runs while a scroll is in progress; a debounce timer owned by
//! the frame driver calls [`ScrollState::settle`] once input goes quiet.

use std::f32::consts::{PI, TAU};

use stardrift_core::{Vec3, ease_toward};

use crate::scene::Scene;

/// Normalized scroll progress in `[0, 1]`. A zero or negative extent yields 0.
pub fn scroll_progress(current: f32, limit: f32) -> f32 {
    if limit <= 0.0 || !current.is_finite() || !limit.is_finite() {
        return 0.0;
    }
    (current / limit).clamp(0.0, 1.0)
}

/// Eased scroll position and activity flags.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrollState {
    /// Eased offset.
    pub current: f32,
    /// Raw offset from the last signal.
    pub target: f32,
    /// Scrollable extent.
    pub limit: f32,
    is_scrolling: bool,
    animation_running: bool,
}

impl ScrollState {
    pub fn new(limit: f32) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    pub fn is_scrolling(&self) -> bool {
        self.is_scrolling
    }

    pub fn animation_running(&self) -> bool {
        self.animation_running
    }

    pub fn progress(&self) -> f32 {
        scroll_progress(self.current, self.limit)
    }

    /// Record a raw scroll offset. Returns `true` when the scroll loop was
    /// idle and has just been started.
    pub fn signal(&mut self, raw_offset: f32) -> bool {
        self.target = raw_offset;
        self.is_scrolling = true;
        let started = !self.animation_running;
        self.animation_running = true;
        started
    }

    /// Input went quiet; the loop stops on its next step.
    pub fn settle(&mut self) {
        self.is_scrolling = false;
    }

    /// Advance the eased offset by one frame and return the new progress, or
    /// `None` once scrolling has settled (which also stops the loop).
    pub fn step(&mut self, ease: f32) -> Option<f32> {
        if !self.animation_running {
            return None;
        }
        if !self.is_scrolling {
            self.animation_running = false;
            return None;
        }
        self.current += (self.target - self.current) * ease;
        Some(self.progress())
    }

    /// Stop immediately, keeping the offsets.
    pub fn halt(&mut self) {
        self.is_scrolling = false;
        self.animation_running = false;
    }
}

/// Scene pose derived from one progress value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneMapping {
    pub camera_target: Vec3,
    pub scene_yaw: f32,
    pub particle_yaw: f32,
    /// Light 0 `(x, y)`.
    pub light0_xy: (f32, f32),
    pub light0_intensity: f32,
    /// Light 1 `(x, z)`.
    pub light1_xz: (f32, f32),
    pub light1_intensity: f32,
}

/// Map scroll progress onto the scene pose.
pub fn map_progress(progress: f32) -> SceneMapping {
    let p = progress;
    SceneMapping {
        camera_target: Vec3::new((p * TAU).sin() * 10.0, p * -30.0, 100.0 + p * 50.0),
        scene_yaw: p * PI * 0.5,
        particle_yaw: p * PI,
        light0_xy: ((p * TAU).sin() * 50.0, (p * PI * 3.0).cos() * 50.0),
        light0_intensity: 0.5 + p * 0.5,
        light1_xz: ((p * TAU).cos() * -50.0, (p * PI * 3.0).sin() * 50.0),
        light1_intensity: 1.0 - p * 0.5,
    }
}

impl SceneMapping {
    /// Write the pose into `scene`, easing the camera toward its target.
    pub fn apply(&self, scene: &mut Scene, camera_ease: f32) {
        ease_toward(&mut scene.camera.position, self.camera_target, camera_ease);
        scene.rotation_y = self.scene_yaw;
        scene.particles.rotation_y = self.particle_yaw;

        let [light0, light1] = &mut scene.lights.dynamic;
        (light0.position.x, light0.position.y) = self.light0_xy;
        light0.intensity = self.light0_intensity;
        (light1.position.x, light1.position.z) = self.light1_xz;
        light1.intensity = self.light1_intensity;
    }
}
