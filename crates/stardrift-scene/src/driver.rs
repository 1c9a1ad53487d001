//! Frame driver: owns the simulation and turns clock ticks and input events
//! into scene updates.
//!
//! One frame runs, in order: due timers, particles, floating objects,
//! shooting stars, the scroll mapping (only while a scroll is in progress),
//! cursor tracking. Input events never touch the scene directly except for
//! explicit spawns; bursts and the periodic spawner go through [`Timers`].

use rand::SeedableRng;
use rand::rngs::StdRng;
use stardrift_core::{BurstParams, PointerSample, Settings, Viewport};
use tracing::{debug, info, warn};

use crate::clock::{Clock, ms_to_secs};
use crate::pointer::PointerTrail;
use crate::quality::{self, QualityMonitor};
use crate::render::Renderer;
use crate::scene::{ReleaseReport, Scene};
use crate::scroll::{ScrollState, map_progress};
use crate::simulation::Simulation;
use crate::stars::StarId;
use crate::timers::{TimerEvent, TimerId, Timers};
use crate::tracking;

/// Lifecycle of a [`FrameDriver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Running,
    /// Rendering context gone; frames are skipped until it is restored.
    ContextLost,
    /// Torn down; every entry point is a no-op.
    Disposed,
}

/// Summary of one processed frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub now_ms: u64,
    pub active_stars: usize,
    pub expired_stars: usize,
    /// Progress applied by the scroll mapping this frame, if it ran.
    pub scroll_progress: Option<f32>,
    /// Frame count of a sampling window that closed this frame.
    pub fps: Option<u32>,
}

pub struct FrameDriver<C: Clock> {
    clock: C,
    settings: Settings,
    rng: StdRng,
    sim: Option<Simulation>,
    trail: PointerTrail,
    viewport: Viewport,
    scroll: ScrollState,
    timers: Timers,
    scroll_timer: Option<TimerId>,
    quality: QualityMonitor,
    state: DriverState,
}

impl<C: Clock> FrameDriver<C> {
    /// Build the simulation and arm the start-up timers.
    pub fn new(settings: Settings, clock: C, viewport: Viewport) -> Self {
        let mut rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let sim = Simulation::build(&settings, &mut rng);

        let now = clock.elapsed_ms();
        let mut timers = Timers::new();
        timers.after(
            now,
            settings.stars.spawn_delay_ms,
            TimerEvent::StartSpawnInterval,
        );
        timers.after(now, quality::ARM_DELAY_MS, TimerEvent::StartQualityMonitor);

        info!(
            particles = sim.particles.len(),
            floating = sim.floating.len(),
            seed = ?settings.seed,
            "frame driver started"
        );

        Self {
            clock,
            settings,
            rng,
            sim: Some(sim),
            trail: PointerTrail::new(),
            viewport,
            scroll: ScrollState::default(),
            timers,
            scroll_timer: None,
            quality: QualityMonitor::new(),
            state: DriverState::Running,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn simulation(&self) -> Option<&Simulation> {
        self.sim.as_ref()
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.sim.as_ref().map(|sim| &sim.scene)
    }

    pub fn trail(&self) -> &PointerTrail {
        &self.trail
    }

    pub fn scroll(&self) -> &ScrollState {
        &self.scroll
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    pub fn active_stars(&self) -> usize {
        self.sim.as_ref().map_or(0, |sim| sim.stars.len())
    }

    /// Frame count of the last completed quality window.
    pub fn last_fps(&self) -> Option<u32> {
        self.quality.last_fps()
    }

    /// Read the clock, process a frame and hand the scene to `renderer`.
    ///
    /// Returns `Ok(None)` without rendering when the loop is halted.
    pub fn tick<R: Renderer>(
        &mut self,
        renderer: &mut R,
    ) -> Result<Option<FrameReport>, R::Error> {
        let now = self.clock.elapsed_ms();
        let Some(report) = self.on_frame(now) else {
            return Ok(None);
        };
        if let Some(sim) = &mut self.sim {
            renderer.render(&mut sim.scene)?;
        }
        Ok(Some(report))
    }

    /// Process one frame at `now_ms` without rendering.
    pub fn on_frame(&mut self, now_ms: u64) -> Option<FrameReport> {
        if self.state != DriverState::Running {
            return None;
        }
        self.run_timers(now_ms);

        let secs = ms_to_secs(now_ms);
        let sim = self.sim.as_mut()?;
        let expired_stars = sim.step(secs, &self.trail, &self.viewport, &self.settings);

        let scroll_progress = self.scroll.step(self.settings.scroll.ease);
        if let Some(progress) = scroll_progress {
            map_progress(progress).apply(&mut sim.scene, self.settings.scroll.camera_ease);
            sim.floating.apply_scroll(&mut sim.scene, progress);
        }

        tracking::track(
            &mut sim.scene,
            secs,
            &self.trail,
            &self.viewport,
            &self.settings.sensitivity,
            self.settings.scene.camera_speed,
        );

        let fps = self.quality.record_frame(now_ms, &mut self.settings.scene);

        Some(FrameReport {
            now_ms,
            active_stars: sim.stars.len(),
            expired_stars,
            scroll_progress,
            fps,
        })
    }

    /// Fire every timer due at `now_ms`. Returns how many fired.
    pub fn run_timers(&mut self, now_ms: u64) -> usize {
        let due = self.timers.take_due(now_ms);
        let fired = due.len();
        for (id, event) in due {
            match event {
                TimerEvent::StartSpawnInterval => {
                    self.timers.every(
                        now_ms,
                        self.settings.stars.spawn_interval_ms,
                        TimerEvent::SpawnStar,
                    );
                }
                TimerEvent::SpawnStar | TimerEvent::BurstStar => {
                    self.spawn_at(now_ms);
                }
                TimerEvent::ScrollSettled => {
                    if self.scroll_timer == Some(id) {
                        self.scroll_timer = None;
                        self.scroll.settle();
                    }
                }
                TimerEvent::StartQualityMonitor => self.quality.arm(now_ms),
            }
        }
        fired
    }

    /// Spawn one shooting star now.
    pub fn spawn_shooting_star(&mut self) -> Option<StarId> {
        let now = self.clock.elapsed_ms();
        self.spawn_at(now)
    }

    fn spawn_at(&mut self, now_ms: u64) -> Option<StarId> {
        if self.state != DriverState::Running {
            debug!(state = ?self.state, "spawn ignored");
            return None;
        }
        let sim = self.sim.as_mut()?;
        sim.stars
            .spawn(&mut self.rng, &mut sim.scene, ms_to_secs(now_ms))
    }

    fn schedule_burst(&mut self, burst: BurstParams) {
        if self.state != DriverState::Running {
            debug!(state = ?self.state, "burst ignored");
            return;
        }
        let now = self.clock.elapsed_ms();
        for i in 0..u64::from(burst.count) {
            self.timers
                .after(now, i * burst.stagger_ms, TimerEvent::BurstStar);
        }
    }

    pub fn on_pointer_move(&mut self, sample: PointerSample) {
        if self.state != DriverState::Disposed {
            self.trail.push(sample);
        }
    }

    /// Queue the click burst.
    pub fn on_click(&mut self) {
        self.schedule_burst(self.settings.stars.click_burst);
    }

    /// Queue the hover burst for the pointer entering an interactive element.
    pub fn on_hover_enter(&mut self) {
        self.schedule_burst(self.settings.stars.hover_burst);
    }

    /// Record a raw scroll offset and restart the settle countdown.
    pub fn on_scroll_signal(&mut self, raw_offset: f32) {
        if self.state == DriverState::Disposed {
            return;
        }
        if self.scroll.signal(raw_offset) {
            debug!(offset = raw_offset, "scroll loop started");
        }
        if let Some(previous) = self.scroll_timer.take() {
            self.timers.cancel(previous);
        }
        let now = self.clock.elapsed_ms();
        self.scroll_timer = Some(self.timers.after(
            now,
            self.settings.scroll.debounce_ms,
            TimerEvent::ScrollSettled,
        ));
    }

    pub fn set_scroll_limit(&mut self, limit: f32) {
        self.scroll.limit = limit.max(0.0);
    }

    pub fn on_resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Halt the frame loop until [`on_context_restored`](Self::on_context_restored).
    pub fn on_context_lost(&mut self) {
        if self.state == DriverState::Running {
            let dropped_bursts = self.timers.cancel_event(TimerEvent::BurstStar);
            warn!(dropped_bursts, "rendering context lost; frame loop halted");
            self.state = DriverState::ContextLost;
        }
    }

    /// Rebuild every collection from scratch and resume.
    pub fn on_context_restored(&mut self) {
        if self.state != DriverState::ContextLost {
            return;
        }
        if let Some(old) = self.sim.take() {
            let released = old.dispose();
            debug!(meshes = released.meshes, "released scene from lost context");
        }
        let sim = Simulation::build(&self.settings, &mut self.rng);
        info!(
            particles = sim.particles.len(),
            floating = sim.floating.len(),
            "rendering context restored; scene rebuilt"
        );
        self.sim = Some(sim);
        self.state = DriverState::Running;
    }

    /// Cancel timers, stop the loop and release the scene. Only the first
    /// call releases anything.
    pub fn teardown(&mut self) -> Option<ReleaseReport> {
        if self.state == DriverState::Disposed {
            return None;
        }
        let cancelled = self.timers.cancel_all();
        self.scroll_timer = None;
        self.scroll.halt();
        self.quality.disarm();
        self.state = DriverState::Disposed;

        let report = self.sim.take().map(Simulation::dispose);
        info!(
            cancelled,
            meshes = report.map_or(0, |r| r.meshes),
            "frame driver torn down"
        );
        report
    }
}

impl<C: Clock> Drop for FrameDriver<C> {
    fn drop(&mut self) {
        self.teardown();
    }
}
