//! Shooting stars: spawn, animate, expire.
//!
//! Each star is a group mesh holding a bright core, a glow halo and a short
//! trail of dots. A star is removed on the first update at which its age
//! reaches its lifespan; its handle resolves to `None` from then on.

use rand::Rng;
use stardrift_core::{STAR_PALETTE, StarParams, Vec3, Viewport, planar_distance};
use tracing::debug;

use crate::arena::{Arena, SlotKey};
use crate::pointer::PointerTrail;
use crate::scene::{Material, MaterialKind, Mesh, MeshId, Scene, Shape, Transform};

/// Fraction of the lifespan spent fading in.
pub const FADE_IN_END: f32 = 0.2;
/// Fraction of the lifespan after which the star fades out.
pub const FADE_OUT_START: f32 = 0.8;
/// Glow halo opacity relative to the core.
pub const GLOW_OPACITY: f32 = 0.4;
/// Depth gap between consecutive trail segments.
pub const TRAIL_SPACING: f32 = 5.0;

/// World units per normalized pointer unit for star influence.
const POINTER_SCALE: f32 = 50.0;
const POINTER_RADIUS: f32 = 100.0;
const POINTER_STRENGTH: f32 = 0.02;

/// Handle to an active star.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StarId(SlotKey);

/// Opacity multiplier at a given lifecycle progress: linear fade in over
/// `[0, 0.2)`, full over `[0.2, 0.8]`, linear fade out over `(0.8, 1]`.
pub fn envelope(progress: f32) -> f32 {
    let p = progress.clamp(0.0, 1.0);
    if p < FADE_IN_END {
        p / FADE_IN_END
    } else if p > FADE_OUT_START {
        1.0 - (p - FADE_OUT_START) / (1.0 - FADE_OUT_START)
    } else {
        1.0
    }
}

/// Base opacity of trail segment `index` of `count`.
pub fn trail_base_opacity(index: usize, count: usize) -> f32 {
    0.7 - (index as f32 / count.max(1) as f32) * 0.5
}

/// Offset of trail segment `index` behind a star moving at `velocity`.
pub fn trail_offset(velocity: Vec3, index: usize) -> Vec3 {
    let j = index as f32;
    Vec3::new(-j * velocity.x * 0.5, -j * velocity.y * 0.5, -j * TRAIL_SPACING)
}

/// Secondary drift layered on the linear motion at a given age.
pub fn arc_drift(age_secs: f32) -> Vec3 {
    Vec3::new((age_secs * 2.0).sin() * 0.05, (age_secs * 1.5).cos() * 0.03, 0.0)
}

/// Everything random about a star, drawn once at spawn.
#[derive(Debug, Clone, PartialEq)]
pub struct StarSeed {
    pub position: Vec3,
    pub velocity: Vec3,
    pub rotation_rate: Vec3,
    pub color_index: usize,
    pub core_radius: f32,
    pub glow_radius: f32,
    pub trail_radii: Vec<f32>,
}

impl StarSeed {
    /// Deep behind the scene, heading toward the viewer.
    pub fn random(rng: &mut impl Rng) -> Self {
        let trail_len = rng.gen_range(5..15);
        Self {
            position: Vec3::new(
                rng.gen_range(-100.0..100.0),
                rng.gen_range(-100.0..100.0),
                -300.0 - rng.gen_range(0.0..200.0),
            ),
            velocity: Vec3::new(
                rng.gen_range(-0.25..0.25),
                rng.gen_range(-0.25..0.25),
                rng.gen_range(0.4..1.2),
            ),
            rotation_rate: Vec3::new(
                rng.gen_range(-0.01..0.01),
                rng.gen_range(-0.01..0.01),
                rng.gen_range(-0.01..0.01),
            ),
            color_index: rng.gen_range(0..STAR_PALETTE.len()),
            core_radius: rng.gen_range(0.1..0.4),
            glow_radius: rng.gen_range(0.2..0.7),
            trail_radii: (0..trail_len).map(|_| rng.gen_range(0.05..0.15)).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrailSegment {
    pub mesh: MeshId,
    pub base_opacity: f32,
}

/// An active shooting star.
#[derive(Debug, Clone, PartialEq)]
pub struct ShootingStar {
    pub group: MeshId,
    pub core: MeshId,
    pub glow: MeshId,
    pub trail: Vec<TrailSegment>,
    /// Per-frame displacement, fixed at spawn.
    pub velocity: Vec3,
    /// Per-frame rotation, fixed at spawn.
    pub rotation_rate: Vec3,
    pub color_index: usize,
    pub start_secs: f32,
    pub lifespan_secs: f32,
}

impl ShootingStar {
    pub fn age(&self, now_secs: f32) -> f32 {
        now_secs - self.start_secs
    }

    pub fn progress(&self, now_secs: f32) -> f32 {
        self.age(now_secs) / self.lifespan_secs
    }

    fn mesh_ids(&self) -> impl Iterator<Item = MeshId> + '_ {
        [self.core, self.glow]
            .into_iter()
            .chain(self.trail.iter().map(|s| s.mesh))
            .chain(std::iter::once(self.group))
    }
}

/// The pool of active stars.
#[derive(Debug, Clone)]
pub struct StarField {
    stars: Arena<ShootingStar>,
    lifespan_secs: f32,
    cap: Option<usize>,
}

impl StarField {
    pub fn new(params: &StarParams) -> Self {
        Self {
            stars: Arena::new(),
            lifespan_secs: params.lifespan_secs,
            cap: params.cap(),
        }
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    pub fn get(&self, id: StarId) -> Option<&ShootingStar> {
        self.stars.get(id.0)
    }

    pub fn contains(&self, id: StarId) -> bool {
        self.stars.contains(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (StarId, &ShootingStar)> {
        self.stars.iter().map(|(key, star)| (StarId(key), star))
    }

    /// Group position of an active star.
    pub fn position(&self, scene: &Scene, id: StarId) -> Option<Vec3> {
        let star = self.get(id)?;
        scene.mesh(star.group).map(|m| m.transform.position)
    }

    /// Spawn a randomized star. Returns `None` when the cap is reached.
    pub fn spawn(
        &mut self,
        rng: &mut impl Rng,
        scene: &mut Scene,
        now_secs: f32,
    ) -> Option<StarId> {
        if self.at_capacity() {
            return None;
        }
        let seed = StarSeed::random(rng);
        self.spawn_seeded(&seed, scene, now_secs)
    }

    /// Spawn a star from explicit parameters.
    pub fn spawn_seeded(
        &mut self,
        seed: &StarSeed,
        scene: &mut Scene,
        now_secs: f32,
    ) -> Option<StarId> {
        if self.at_capacity() {
            return None;
        }

        let color = STAR_PALETTE[seed.color_index % STAR_PALETTE.len()];
        let opacity = envelope(0.0);

        let group = scene.add_mesh(Mesh::group().with_transform(Transform::at(seed.position)));
        let core = scene.add_child(
            group,
            Mesh::new(
                Shape::Sphere,
                Material::new(MaterialKind::Additive, color, opacity),
                seed.core_radius,
            ),
        );
        let mut glow_transform = Transform::default();
        glow_transform.set_uniform_scale(1.5);
        let glow = scene.add_child(
            group,
            Mesh::new(
                Shape::Sphere,
                Material::new(MaterialKind::Additive, color, opacity * GLOW_OPACITY),
                seed.glow_radius,
            )
            .with_transform(glow_transform),
        );

        let count = seed.trail_radii.len();
        let trail = seed
            .trail_radii
            .iter()
            .enumerate()
            .map(|(j, &radius)| {
                let base_opacity = trail_base_opacity(j, count);
                let mesh = scene.add_child(
                    group,
                    Mesh::new(
                        Shape::Sphere,
                        Material::new(MaterialKind::Additive, color, opacity * base_opacity),
                        radius,
                    )
                    .with_transform(Transform::at(trail_offset(seed.velocity, j))),
                );
                TrailSegment { mesh, base_opacity }
            })
            .collect();

        let key = self.stars.insert(ShootingStar {
            group,
            core,
            glow,
            trail,
            velocity: seed.velocity,
            rotation_rate: seed.rotation_rate,
            color_index: seed.color_index,
            start_secs: now_secs,
            lifespan_secs: self.lifespan_secs,
        });
        Some(StarId(key))
    }

    fn at_capacity(&self) -> bool {
        match self.cap {
            Some(cap) if self.stars.len() >= cap => {
                debug!(cap, "active star cap reached; spawn dropped");
                true
            }
            _ => false,
        }
    }

    /// Age, move and fade every star; remove the expired ones.
    ///
    /// Returns how many stars expired this frame.
    pub fn update(
        &mut self,
        scene: &mut Scene,
        now_secs: f32,
        trail: &PointerTrail,
        viewport: &Viewport,
    ) -> usize {
        let cursor = trail.latest().map(|sample| {
            let (nx, ny) = viewport.normalize(sample);
            (nx * POINTER_SCALE, ny * POINTER_SCALE)
        });

        let expired = self.stars.retain_mut(|_, star| {
            let age = star.age(now_secs);
            let progress = star.progress(now_secs);
            if progress >= 1.0 {
                return false;
            }
            animate(scene, star, age, progress, cursor);
            true
        });

        for star in &expired {
            for mesh in star.mesh_ids() {
                scene.remove_mesh(mesh);
            }
        }
        expired.len()
    }
}

fn animate(
    scene: &mut Scene,
    star: &ShootingStar,
    age: f32,
    progress: f32,
    cursor: Option<(f32, f32)>,
) {
    if let Some(group) = scene.mesh_mut(star.group) {
        let t = &mut group.transform;
        t.position += star.velocity + arc_drift(age);
        t.rotation += star.rotation_rate;

        if let Some((cx, cy)) = cursor {
            let distance = planar_distance(t.position, cx, cy);
            if distance < POINTER_RADIUS {
                let influence = (POINTER_RADIUS - distance) / POINTER_RADIUS * POINTER_STRENGTH;
                let (dx, dy) = (t.position.x - cx, t.position.y - cy);
                t.position.x += dx * influence;
                t.position.y += dy * influence;
            }
        }
    }

    let opacity = envelope(progress);
    if let Some(core) = scene.mesh_mut(star.core) {
        core.material.opacity = opacity;
    }
    if let Some(glow) = scene.mesh_mut(star.glow) {
        glow.material.opacity = opacity * GLOW_OPACITY;
    }

    let count = star.trail.len();
    for (j, segment) in star.trail.iter().enumerate() {
        if let Some(mesh) = scene.mesh_mut(segment.mesh) {
            mesh.material.opacity = opacity * trail_base_opacity(j, count);
            mesh.transform.position = trail_offset(star.velocity, j);
        }
    }
}
