//! Drifting particle field (stateful).
//!
//! Positions live in the scene's [`PointCloud`]; this module keeps the
//! per-particle constants. Velocity is applied once per *frame*, not per
//! second, so the visual drift speed scales with the display refresh rate.

use rand::Rng;
use stardrift_core::{Rgb, STAR_PALETTE, Sensitivity, Vec3, Viewport, planar_distance};

use crate::pointer::PointerTrail;
use crate::scene::PointCloud;

/// Half extent of the cube particles live in. Crossing it on an axis resets
/// that axis to the particle's original value.
pub const PARTICLE_BOUND: f32 = 500.0;

/// Pointer repulsion radius in world units.
pub const REPULSION_RADIUS: f32 = 50.0;

/// World units per normalized pointer unit.
pub const POINTER_WORLD_SCALE: f32 = 100.0;

const REPULSION_X_WEIGHT: f32 = 0.6;
const REPULSION_Y_WEIGHT: f32 = 0.4;

/// Per-particle constants.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Displacement added every frame.
    pub velocity: Vec3,
    /// Where an axis is teleported back to after leaving the bounds.
    pub original_position: Vec3,
}

/// The fixed-size particle set.
#[derive(Debug, Clone, Default)]
pub struct ParticleField {
    particles: Vec<Particle>,
}

impl ParticleField {
    /// Scatter `count` particles through the bounds cube, writing their
    /// positions, colors and sizes into `cloud`.
    pub fn spawn(rng: &mut impl Rng, count: usize) -> (Self, PointCloud) {
        let mut cloud = PointCloud::with_capacity(count);
        let particles = (0..count)
            .map(|_| {
                let position = Vec3::new(
                    rng.gen_range(-PARTICLE_BOUND..PARTICLE_BOUND),
                    rng.gen_range(-PARTICLE_BOUND..PARTICLE_BOUND),
                    rng.gen_range(-PARTICLE_BOUND..PARTICLE_BOUND),
                );
                let color = STAR_PALETTE[rng.gen_range(0..STAR_PALETTE.len())];
                cloud.push(position, color, rng.gen_range(1.0..3.0));
                Particle {
                    velocity: Vec3::new(
                        rng.gen_range(-0.25..0.25),
                        rng.gen_range(-0.25..0.25),
                        rng.gen_range(-0.25..0.25),
                    ),
                    original_position: position,
                }
            })
            .collect();
        (Self { particles }, cloud)
    }

    /// Build a field from explicit particles, positioned at their originals.
    pub fn from_particles(particles: Vec<Particle>) -> (Self, PointCloud) {
        let mut cloud = PointCloud::with_capacity(particles.len());
        for p in &particles {
            cloud.push(p.original_position, Rgb::WHITE, 1.0);
        }
        (Self { particles }, cloud)
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Advance every particle by one frame.
    pub fn update(
        &self,
        cloud: &mut PointCloud,
        trail: &PointerTrail,
        viewport: &Viewport,
        sensitivity: &Sensitivity,
    ) {
        // Latest sample only, mapped into world units.
        let cursor = trail.latest().map(|sample| {
            let (nx, ny) = viewport.normalize(sample);
            (
                nx * POINTER_WORLD_SCALE * sensitivity.horizontal,
                ny * POINTER_WORLD_SCALE * sensitivity.vertical,
            )
        });

        for (i, particle) in self.particles.iter().enumerate() {
            let mut p = cloud.position(i) + particle.velocity;

            if let Some((cx, cy)) = cursor {
                let distance = planar_distance(p, cx, cy);
                if distance < REPULSION_RADIUS {
                    let force = (REPULSION_RADIUS - distance) / REPULSION_RADIUS;
                    let (dx, dy) = (p.x - cx, p.y - cy);
                    p.x += dx * force * REPULSION_X_WEIGHT * sensitivity.particle;
                    p.y += dy * force * REPULSION_Y_WEIGHT * sensitivity.particle;
                }
            }

            let origin = particle.original_position;
            if p.x.abs() > PARTICLE_BOUND {
                p.x = origin.x;
            }
            if p.y.abs() > PARTICLE_BOUND {
                p.y = origin.y;
            }
            if p.z.abs() > PARTICLE_BOUND {
                p.z = origin.z;
            }

            cloud.set_position(i, p);
        }

        cloud.mark_needs_upload();
    }
}
