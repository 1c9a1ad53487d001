//! All entity collections and the scene they draw into.

use rand::Rng;
use stardrift_core::{SECTION_PALETTE, Settings, Vec3, Viewport};
use tracing::debug;

use crate::floating::FloatingField;
use crate::particles::ParticleField;
use crate::pointer::PointerTrail;
use crate::scene::{PointCloud, ReleaseReport, Scene};
use crate::stars::StarField;

/// Points in each section cloud.
pub const SECTION_POINTS: usize = 100;
/// Vertical gap between consecutive section clouds.
pub const SECTION_SPACING: f32 = 100.0;

/// Static point cloud for page section `index`.
pub fn section_cloud(rng: &mut impl Rng, index: usize) -> PointCloud {
    let color = SECTION_PALETTE[index % SECTION_PALETTE.len()];
    let offset = index as f32 * SECTION_SPACING;
    let mut cloud = PointCloud::with_capacity(SECTION_POINTS);
    for _ in 0..SECTION_POINTS {
        let position = Vec3::new(
            rng.gen_range(-100.0..100.0),
            rng.gen_range(-100.0..100.0) + offset,
            rng.gen_range(-50.0..50.0),
        );
        cloud.push(position, color, 2.0);
    }
    cloud.opacity = 0.6;
    cloud
}

/// Owns the scene and every entity collection.
#[derive(Debug, Clone)]
pub struct Simulation {
    pub scene: Scene,
    pub particles: ParticleField,
    pub floating: FloatingField,
    pub stars: StarField,
}

impl Simulation {
    /// Build every collection from scratch.
    pub fn build(settings: &Settings, rng: &mut impl Rng) -> Self {
        let params = &settings.scene;
        let mut scene = Scene::new();

        let (particles, cloud) = ParticleField::spawn(rng, params.particle_count);
        scene.particles = cloud;
        scene.sections = (0..params.section_count)
            .map(|k| section_cloud(rng, k))
            .collect();

        let floating = FloatingField::spawn(
            rng,
            &mut scene,
            params.floating_object_count,
            params.show_labels,
        );
        let stars = StarField::new(&settings.stars);

        debug!(
            particles = particles.len(),
            floating = floating.len(),
            sections = scene.sections.len(),
            "simulation built"
        );

        Self {
            scene,
            particles,
            floating,
            stars,
        }
    }

    /// Per-entity updates for one frame: particles, then floating objects,
    /// then shooting stars. Returns how many stars expired.
    pub fn step(
        &mut self,
        elapsed_secs: f32,
        trail: &PointerTrail,
        viewport: &Viewport,
        settings: &Settings,
    ) -> usize {
        let sensitivity = &settings.sensitivity;
        self.particles
            .update(&mut self.scene.particles, trail, viewport, sensitivity);
        self.floating
            .update(&mut self.scene, elapsed_secs, trail, viewport, sensitivity);
        self.stars
            .update(&mut self.scene, elapsed_secs, trail, viewport)
    }

    /// Release the scene's resources.
    pub fn dispose(self) -> ReleaseReport {
        self.scene.dispose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_build_uses_configured_counts() {
        let mut settings = Settings::default();
        settings.scene.particle_count = 50;
        settings.scene.floating_object_count = 4;
        settings.scene.show_labels = false;
        settings.scene.section_count = 3;

        let sim = Simulation::build(&settings, &mut StdRng::seed_from_u64(3));
        assert_eq!(sim.particles.len(), 50);
        assert_eq!(sim.scene.particles.len(), 50);
        assert_eq!(sim.floating.len(), 4);
        assert_eq!(sim.scene.sections.len(), 3);
        assert!(sim.stars.is_empty());
    }

    #[test]
    fn test_section_cloud_offset_and_color() {
        let mut rng = StdRng::seed_from_u64(9);
        let cloud = section_cloud(&mut rng, 2);
        assert_eq!(cloud.len(), SECTION_POINTS);
        assert!(cloud.colors.iter().all(|&c| c == SECTION_PALETTE[2]));
        for p in cloud.iter_positions() {
            assert!((100.0..300.0).contains(&p.y));
            assert!(p.z.abs() <= 50.0);
        }
    }

    #[test]
    fn test_same_seed_same_scene() {
        let settings = Settings::default();
        let a = Simulation::build(&settings, &mut StdRng::seed_from_u64(42));
        let b = Simulation::build(&settings, &mut StdRng::seed_from_u64(42));
        assert_eq!(a.scene.particles, b.scene.particles);
        assert_eq!(a.floating.objects(), b.floating.objects());
    }
}
