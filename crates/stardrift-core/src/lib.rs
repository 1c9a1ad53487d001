//! Core types shared across the stardrift crates.
//!
//! Geometry ([`Vec3`]), colors and palettes, pointer input primitives and the
//! tunable parameter blocks that the simulation and the config file share.

mod color;
mod math;
mod params;
mod pointer;

pub use color::{Rgb, SECTION_PALETTE, STAR_PALETTE, hsl_to_rgb};
pub use glam::Vec3;
pub use math::{ease_toward, planar_distance};
pub use params::{BurstParams, SceneParams, ScrollParams, Sensitivity, Settings, StarParams};
pub use pointer::{PointerSample, Viewport};
