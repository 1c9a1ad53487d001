//! Animated backdrop simulation for stardrift.
//!
//! A [`FrameDriver`] owns a [`Simulation`] (drifting particles, floating
//! shapes and shooting stars drawn into a [`Scene`]) and advances it once per
//! frame from a [`Clock`]. Input arrives through explicit driver entry
//! points; timed behavior (periodic and burst spawns, scroll settling) runs
//! through a timer queue pumped by the frame. [`SceneView`] projects the
//! scene onto a ratatui buffer.

mod arena;
mod camera;
mod clock;
mod driver;
mod floating;
mod particles;
mod pointer;
mod quality;
mod render;
mod scene;
mod scroll;
mod simulation;
mod stars;
mod timers;
mod tracking;
mod view;

pub use arena::{Arena, SlotKey};
pub use camera::{CAMERA_HOME, Camera, Projected, Projector};
pub use clock::{Clock, ManualClock, MonotonicClock, ms_to_secs};
pub use driver::{DriverState, FrameDriver, FrameReport};
pub use floating::{FloatingField, FloatingObject, float_offset, pulse_scale, scroll_phase};
pub use particles::{PARTICLE_BOUND, Particle, ParticleField};
pub use pointer::{PointerTrail, TRAIL_CAPACITY};
pub use quality::{QualityMonitor, reduced_counts};
pub use render::Renderer;
pub use scene::{
    Lights, Material, MaterialKind, Mesh, MeshId, PointCloud, PointLight, ReleaseReport, Scene,
    Shape, Transform,
};
pub use scroll::{SceneMapping, ScrollState, map_progress, scroll_progress};
pub use simulation::{SECTION_POINTS, Simulation, section_cloud};
pub use stars::{ShootingStar, StarField, StarId, StarSeed, arc_drift, envelope};
pub use timers::{TimerEvent, TimerId, Timers};
pub use view::{PointBuffers, SceneView, project_to_cell, terminal_aspect};
