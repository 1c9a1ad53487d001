//! Floating shapes and text labels (stateful).

use std::f32::consts::{PI, TAU};

use rand::Rng;
use stardrift_core::{Rgb, Sensitivity, Vec3, Viewport, planar_distance};

use crate::particles::POINTER_WORLD_SCALE;
use crate::pointer::PointerTrail;
use crate::scene::{Material, MaterialKind, Mesh, MeshId, Scene, Shape, Transform};

/// Pointer influence radius in world units.
pub const INFLUENCE_RADIUS: f32 = 100.0;

const INFLUENCE_X_WEIGHT: f32 = 0.025;
const INFLUENCE_Y_WEIGHT: f32 = 0.018;

/// Half extent of the cube floating shapes are scattered through.
const SPAWN_EXTENT: f32 = 100.0;

/// Text labels that join the floating set: text, position, color.
const LABELS: [(&str, Vec3, u32); 3] = [
    ("Code", Vec3::new(-50.0, 20.0, -20.0), 0x00f5ff),
    ("Create", Vec3::new(50.0, 10.0, -30.0), 0x8b5cf6),
    ("Innovate", Vec3::new(-30.0, -20.0, -25.0), 0xec4899),
];

/// A mesh-bearing entity that rotates, bobs and pulses.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatingObject {
    pub mesh: MeshId,
    /// Radians added to the rotation every frame.
    pub rotation_speed: Vec3,
    pub original_position: Vec3,
    pub float_amplitude: f32,
    /// Angular speed of the bobbing, radians per second.
    pub float_speed: f32,
}

/// Vertical bobbing offset at `elapsed_secs`. Pure in time.
pub fn float_offset(elapsed_secs: f32, float_speed: f32, float_amplitude: f32) -> f32 {
    (elapsed_secs * float_speed).sin() * float_amplitude
}

/// Uniform pulse scale, staggered by index so objects desynchronize.
pub fn pulse_scale(elapsed_secs: f32, index: usize) -> f32 {
    1.0 + (elapsed_secs * 2.0 + index as f32).sin() * 0.05
}

/// Per-object phase when the set is driven by scroll progress.
pub fn scroll_phase(progress: f32, index: usize) -> f32 {
    (progress + index as f32 * 0.05).rem_euclid(1.0)
}

fn random_material(rng: &mut impl Rng) -> Material {
    let roll: f32 = rng.gen_range(0.0..1.0);
    if roll < 0.3 {
        Material::new(MaterialKind::Wireframe, Rgb::from_hex(0x00f5ff), 0.6)
    } else if roll < 0.6 {
        Material::new(MaterialKind::Glass, Rgb::from_hex(0x8b5cf6), 0.3)
    } else {
        Material::new(MaterialKind::Emissive, Rgb::from_hex(0xec4899), 0.8)
    }
}

/// The floating object set.
#[derive(Debug, Clone, Default)]
pub struct FloatingField {
    objects: Vec<FloatingObject>,
}

impl FloatingField {
    /// Create `count` random shapes (plus the text labels when enabled) and
    /// add their meshes to `scene`.
    pub fn spawn(rng: &mut impl Rng, scene: &mut Scene, count: usize, labels: bool) -> Self {
        let mut objects = Vec::with_capacity(count + LABELS.len());

        for _ in 0..count {
            let shape = Shape::SOLIDS[rng.gen_range(0..Shape::SOLIDS.len())];
            let material = random_material(rng);
            let position = Vec3::new(
                rng.gen_range(-SPAWN_EXTENT..SPAWN_EXTENT),
                rng.gen_range(-SPAWN_EXTENT..SPAWN_EXTENT),
                rng.gen_range(-SPAWN_EXTENT..SPAWN_EXTENT),
            );
            let mut transform = Transform::at(position);
            transform.rotation = Vec3::new(
                rng.gen_range(0.0..TAU),
                rng.gen_range(0.0..TAU),
                rng.gen_range(0.0..TAU),
            );
            transform.set_uniform_scale(rng.gen_range(0.5..2.5));
            let mesh = scene.add_mesh(Mesh::new(shape, material, 1.0).with_transform(transform));

            objects.push(FloatingObject {
                mesh,
                rotation_speed: Vec3::new(
                    rng.gen_range(-0.01..0.01),
                    rng.gen_range(-0.01..0.01),
                    rng.gen_range(-0.01..0.01),
                ),
                original_position: position,
                float_amplitude: rng.gen_range(2.0..7.0),
                float_speed: rng.gen_range(0.01..0.03),
            });
        }

        if labels {
            for (text, position, color) in LABELS {
                let mut transform = Transform::at(position);
                transform.scale = Vec3::new(20.0, 5.0, 1.0);
                let material = Material::new(MaterialKind::Sprite, Rgb::from_hex(color), 0.8);
                let mesh = scene.add_mesh(
                    Mesh::new(Shape::Label(text), material, 1.0).with_transform(transform),
                );
                objects.push(FloatingObject {
                    mesh,
                    rotation_speed: Vec3::new(0.0, 0.01, 0.0),
                    original_position: position,
                    float_amplitude: 3.0,
                    float_speed: 0.02,
                });
            }
        }

        Self { objects }
    }

    pub fn from_objects(objects: Vec<FloatingObject>) -> Self {
        Self { objects }
    }

    pub fn objects(&self) -> &[FloatingObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Advance every object by one frame.
    pub fn update(
        &self,
        scene: &mut Scene,
        elapsed_secs: f32,
        trail: &PointerTrail,
        viewport: &Viewport,
        sensitivity: &Sensitivity,
    ) {
        for (index, obj) in self.objects.iter().enumerate() {
            let Some(mesh) = scene.mesh_mut(obj.mesh) else {
                continue;
            };
            let t = &mut mesh.transform;

            t.rotation += obj.rotation_speed;
            t.position.y = obj.original_position.y
                + float_offset(elapsed_secs, obj.float_speed, obj.float_amplitude);

            if let Some((ix, iy)) = trail_influence(t.position, trail, viewport, sensitivity) {
                t.position.x -= ix;
                t.position.y -= iy;
            }

            t.set_uniform_scale(pulse_scale(elapsed_secs, index));
        }
    }

    /// Pose every object as a function of scroll progress.
    pub fn apply_scroll(&self, scene: &mut Scene, progress: f32) {
        for (index, obj) in self.objects.iter().enumerate() {
            let Some(mesh) = scene.mesh_mut(obj.mesh) else {
                continue;
            };
            let phase = scroll_phase(progress, index);
            let t = &mut mesh.transform;
            t.position.y = obj.original_position.y + (phase * PI * 4.0).sin() * obj.float_amplitude;
            t.rotation.x = phase * TAU;
            t.rotation.y = phase * PI * 3.0;
            t.set_uniform_scale(1.0 + (phase * TAU).sin() * 0.3);
        }
    }
}

/// Average displacement the whole trail exerts on `position`, or `None`
/// when no sample is in range. Older samples weigh less.
fn trail_influence(
    position: Vec3,
    trail: &PointerTrail,
    viewport: &Viewport,
    sensitivity: &Sensitivity,
) -> Option<(f32, f32)> {
    let len = trail.len() as f32;
    let mut total_x = 0.0;
    let mut total_y = 0.0;
    let mut count = 0u32;

    for (j, sample) in trail.iter().enumerate() {
        let (nx, ny) = viewport.normalize(*sample);
        let cx = nx * POINTER_WORLD_SCALE * sensitivity.horizontal;
        let cy = ny * POINTER_WORLD_SCALE * sensitivity.vertical;
        let distance = planar_distance(position, cx, cy);
        if distance < INFLUENCE_RADIUS {
            let influence = (INFLUENCE_RADIUS - distance) / INFLUENCE_RADIUS;
            let recency = j as f32 / len;
            let weight = influence * recency * sensitivity.object;
            total_x += (position.x - cx) * weight * INFLUENCE_X_WEIGHT;
            total_y += (position.y - cy) * weight * INFLUENCE_Y_WEIGHT;
            count += 1;
        }
    }

    (count > 0).then(|| (total_x / count as f32, total_y / count as f32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use stardrift_core::PointerSample;

    fn one_object(scene: &mut Scene, origin: Vec3) -> FloatingField {
        let mesh = scene.add_mesh(
            Mesh::new(
                Shape::Cube,
                Material::new(MaterialKind::Glass, Rgb::WHITE, 1.0),
                1.0,
            )
            .with_transform(Transform::at(origin)),
        );
        FloatingField::from_objects(vec![FloatingObject {
            mesh,
            rotation_speed: Vec3::new(0.01, -0.02, 0.005),
            original_position: origin,
            float_amplitude: 4.0,
            float_speed: 0.02,
        }])
    }

    #[test]
    fn test_spawn_adds_shapes_and_labels() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut scene = Scene::new();
        let field = FloatingField::spawn(&mut rng, &mut scene, 20, true);
        assert_eq!(field.len(), 23);
        assert_eq!(scene.mesh_count(), 23);
        for obj in field.objects() {
            assert!(obj.float_amplitude > 0.0);
            assert!(obj.float_speed > 0.0);
        }
    }

    #[test]
    fn test_float_offset_is_pure() {
        let a = float_offset(12.5, 0.02, 4.0);
        let b = float_offset(12.5, 0.02, 4.0);
        assert_eq!(a, b);
        assert_eq!(float_offset(0.0, 0.02, 4.0), 0.0);
    }

    #[test]
    fn test_update_without_pointer_is_restart_safe() {
        let origin = Vec3::new(5.0, -3.0, 8.0);
        let mut scene = Scene::new();
        let field = one_object(&mut scene, origin);
        let (trail, vp, sens) = (PointerTrail::new(), Viewport::default(), Sensitivity::default());

        field.update(&mut scene, 40.0, &trail, &vp, &sens);
        let first = scene.mesh(field.objects()[0].mesh).unwrap().transform.position;
        field.update(&mut scene, 40.0, &trail, &vp, &sens);
        let second = scene.mesh(field.objects()[0].mesh).unwrap().transform;

        assert_eq!(first, second.position);
        assert_eq!(second.position.y, origin.y + float_offset(40.0, 0.02, 4.0));
        // Rotation keeps accumulating.
        assert!((second.rotation.x - 0.02).abs() < 1e-6);
        assert_eq!(second.scale, Vec3::splat(pulse_scale(40.0, 0)));
    }

    #[test]
    fn test_trail_pushes_object_away() {
        let origin = Vec3::new(20.0, 0.0, 0.0);
        let mut scene = Scene::new();
        let field = one_object(&mut scene, origin);
        let vp = Viewport::new(800.0, 600.0);
        let mut trail = PointerTrail::new();
        // Two samples at the world origin; the oldest has zero weight.
        trail.push(PointerSample::new(400.0, 300.0));
        trail.push(PointerSample::new(400.0, 300.0));

        field.update(&mut scene, 0.0, &trail, &vp, &Sensitivity::default());
        let x = scene.mesh(field.objects()[0].mesh).unwrap().transform.position.x;

        // Sign convention: the averaged influence is subtracted.
        let influence = (100.0 - 20.0) / 100.0;
        let expected = 20.0 - (20.0 * influence * 0.025 * 0.5 * 1.4) / 2.0;
        assert!((x - expected).abs() < 1e-5, "x = {x}, expected {expected}");
    }

    #[test]
    fn test_apply_scroll_is_function_of_progress() {
        let origin = Vec3::new(0.0, 10.0, 0.0);
        let mut scene = Scene::new();
        let field = one_object(&mut scene, origin);

        field.apply_scroll(&mut scene, 0.25);
        let t = scene.mesh(field.objects()[0].mesh).unwrap().transform;
        assert!((t.position.y - (10.0 + (PI).sin() * 4.0)).abs() < 1e-5);
        assert!((t.rotation.x - 0.25 * TAU).abs() < 1e-6);
        assert!((t.scale.x - 1.3).abs() < 1e-6);

        assert!((scroll_phase(0.98, 1) - 0.03).abs() < 1e-5);
    }
}
