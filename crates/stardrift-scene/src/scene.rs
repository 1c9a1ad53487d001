//! Renderable scene state.
//!
//! The simulation writes into a [`Scene`]; a renderer only reads it. Meshes
//! live in an [`Arena`] and are addressed through [`MeshId`] handles that
//! go stale once the mesh is removed.

use glam::{EulerRot, Mat4, Quat, Vec3};
use stardrift_core::Rgb;

use crate::arena::{Arena, SlotKey};
use crate::camera::Camera;

/// Opaque handle to a mesh in a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(SlotKey);

/// Geometry of a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Cube,
    Sphere,
    Cone,
    Torus,
    Octahedron,
    Icosahedron,
    /// Camera-facing text sprite.
    Label(&'static str),
    /// Transform-only node that parents other meshes.
    Group,
}

impl Shape {
    /// Shapes a floating object may be built from.
    pub const SOLIDS: [Shape; 6] = [
        Shape::Cube,
        Shape::Sphere,
        Shape::Cone,
        Shape::Torus,
        Shape::Octahedron,
        Shape::Icosahedron,
    ];
}

/// Surface style of a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialKind {
    Wireframe,
    Glass,
    Emissive,
    /// Unlit and additively blended.
    Additive,
    Sprite,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub kind: MaterialKind,
    pub color: Rgb,
    pub opacity: f32,
}

impl Material {
    pub fn new(kind: MaterialKind, color: Rgb, opacity: f32) -> Self {
        Self {
            kind,
            color,
            opacity,
        }
    }
}

/// Position, Euler rotation and scale relative to the parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn set_uniform_scale(&mut self, s: f32) {
        self.scale = Vec3::splat(s);
    }

    /// The Euler triple as a quaternion (`Rx * Ry * Rz`).
    pub fn quat(&self) -> Quat {
        Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        )
    }

    /// Local to parent matrix: scale, then rotate, then translate.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.quat(), self.position)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub shape: Shape,
    pub material: Material,
    pub transform: Transform,
    /// Nominal size used by renderers to pick a glyph weight.
    pub radius: f32,
    pub parent: Option<MeshId>,
}

impl Mesh {
    pub fn new(shape: Shape, material: Material, radius: f32) -> Self {
        Self {
            shape,
            material,
            transform: Transform::default(),
            radius,
            parent: None,
        }
    }

    pub fn group() -> Self {
        Self::new(
            Shape::Group,
            Material::new(MaterialKind::Additive, Rgb::BLACK, 0.0),
            0.0,
        )
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }
}

/// Flat point buffer (three floats per point) with a re-upload flag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    positions: Vec<f32>,
    pub colors: Vec<Rgb>,
    pub sizes: Vec<f32>,
    pub opacity: f32,
    /// Yaw of the whole cloud, radians.
    pub rotation_y: f32,
    needs_upload: bool,
}

impl PointCloud {
    pub fn with_capacity(count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(count * 3),
            colors: Vec::with_capacity(count),
            sizes: Vec::with_capacity(count),
            opacity: 1.0,
            rotation_y: 0.0,
            needs_upload: true,
        }
    }

    pub fn push(&mut self, position: Vec3, color: Rgb, size: f32) {
        self.positions
            .extend_from_slice(&[position.x, position.y, position.z]);
        self.colors.push(color);
        self.sizes.push(size);
        self.needs_upload = true;
    }

    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn position(&self, index: usize) -> Vec3 {
        let i = index * 3;
        Vec3::new(
            self.positions[i],
            self.positions[i + 1],
            self.positions[i + 2],
        )
    }

    pub fn set_position(&mut self, index: usize, p: Vec3) {
        let i = index * 3;
        self.positions[i] = p.x;
        self.positions[i + 1] = p.y;
        self.positions[i + 2] = p.z;
    }

    /// Raw `[x0, y0, z0, x1, ...]` buffer.
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn iter_positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.positions
            .chunks_exact(3)
            .map(|c| Vec3::new(c[0], c[1], c[2]))
    }

    pub fn mark_needs_upload(&mut self) {
        self.needs_upload = true;
    }

    pub fn needs_upload(&self) -> bool {
        self.needs_upload
    }

    /// Clear the re-upload flag, returning whether it was set.
    pub fn take_needs_upload(&mut self) -> bool {
        std::mem::take(&mut self.needs_upload)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointLight {
    pub color: Rgb,
    pub intensity: f32,
    pub range: f32,
    pub position: Vec3,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AmbientLight {
    pub color: Rgb,
    pub intensity: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalLight {
    pub color: Rgb,
    pub intensity: f32,
    pub position: Vec3,
}

/// The scene's light rig: two static lights plus two animated point lights.
#[derive(Debug, Clone, PartialEq)]
pub struct Lights {
    pub ambient: AmbientLight,
    pub directional: DirectionalLight,
    pub dynamic: [PointLight; 2],
}

impl Default for Lights {
    fn default() -> Self {
        Self {
            ambient: AmbientLight {
                color: Rgb::from_hex(0x404040),
                intensity: 0.4,
            },
            directional: DirectionalLight {
                color: Rgb::from_hex(0x00f5ff),
                intensity: 1.0,
                position: Vec3::new(100.0, 100.0, 50.0),
            },
            dynamic: [
                PointLight {
                    color: Rgb::from_hex(0x8b5cf6),
                    intensity: 1.0,
                    range: 200.0,
                    position: Vec3::new(50.0, 50.0, 50.0),
                },
                PointLight {
                    color: Rgb::from_hex(0xec4899),
                    intensity: 1.0,
                    range: 200.0,
                    position: Vec3::new(-50.0, -50.0, 50.0),
                },
            ],
        }
    }
}

/// Counts of resources handed back by [`Scene::dispose`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReleaseReport {
    pub meshes: usize,
    pub point_clouds: usize,
}

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    /// The drifting particle field.
    pub particles: PointCloud,
    /// Static per-section point clouds.
    pub sections: Vec<PointCloud>,
    meshes: Arena<Mesh>,
    pub lights: Lights,
    pub camera: Camera,
    /// Yaw of the whole scene, radians.
    pub rotation_y: f32,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshId {
        MeshId(self.meshes.insert(mesh))
    }

    /// Add a mesh positioned relative to `parent`.
    pub fn add_child(&mut self, parent: MeshId, mut mesh: Mesh) -> MeshId {
        mesh.parent = Some(parent);
        self.add_mesh(mesh)
    }

    pub fn mesh(&self, id: MeshId) -> Option<&Mesh> {
        self.meshes.get(id.0)
    }

    pub fn mesh_mut(&mut self, id: MeshId) -> Option<&mut Mesh> {
        self.meshes.get_mut(id.0)
    }

    pub fn remove_mesh(&mut self, id: MeshId) -> Option<Mesh> {
        self.meshes.remove(id.0)
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn meshes(&self) -> impl Iterator<Item = (MeshId, &Mesh)> {
        self.meshes.iter().map(|(key, mesh)| (MeshId(key), mesh))
    }

    /// Position of a mesh in scene space, composing its parent chain.
    pub fn local_position(&self, id: MeshId) -> Option<Vec3> {
        let mesh = self.mesh(id)?;
        let mut p = mesh.transform.position;
        let mut parent = mesh.parent;
        while let Some(pid) = parent {
            let Some(node) = self.mesh(pid) else {
                break;
            };
            p = node.transform.matrix().transform_point3(p);
            parent = node.parent;
        }
        Some(p)
    }

    /// Apply the scene yaw to a scene-space point.
    pub fn to_world(&self, p: Vec3) -> Vec3 {
        Quat::from_rotation_y(self.rotation_y) * p
    }

    /// Release all geometry and materials. Consumes the scene so nothing can
    /// reference the released resources afterwards.
    pub fn dispose(mut self) -> ReleaseReport {
        let meshes = self.meshes.drain().len();
        let point_clouds = 1 + self.sections.len();
        ReleaseReport {
            meshes,
            point_clouds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot() -> Mesh {
        Mesh::new(
            Shape::Sphere,
            Material::new(MaterialKind::Additive, Rgb::WHITE, 1.0),
            0.2,
        )
    }

    #[test]
    fn test_child_position_follows_parent() {
        let mut scene = Scene::new();
        let parent = scene.add_mesh(Mesh::group().with_transform(Transform::at(Vec3::new(
            10.0, 0.0, 0.0,
        ))));
        let child = scene.add_child(parent, dot().with_transform(Transform::at(Vec3::new(
            0.0, 0.0, -5.0,
        ))));
        let p = scene.local_position(child).unwrap();
        assert!(p.abs_diff_eq(Vec3::new(10.0, 0.0, -5.0), 1e-6));
    }

    #[test]
    fn test_child_inherits_parent_rotation_and_scale() {
        let mut scene = Scene::new();
        let mut parent_transform = Transform::at(Vec3::new(0.0, 5.0, 0.0));
        parent_transform.rotation = Vec3::new(0.0, 0.0, std::f32::consts::FRAC_PI_2);
        parent_transform.set_uniform_scale(2.0);
        let parent = scene.add_mesh(Mesh::group().with_transform(parent_transform));
        let child = scene.add_child(parent, dot().with_transform(Transform::at(Vec3::X)));

        let p = scene.local_position(child).unwrap();
        assert!(p.abs_diff_eq(Vec3::new(0.0, 7.0, 0.0), 1e-5));
    }

    #[test]
    fn test_scene_yaw_rotates_into_world() {
        let mut scene = Scene::new();
        scene.rotation_y = std::f32::consts::FRAC_PI_2;
        let world = scene.to_world(Vec3::Z);
        assert!(world.abs_diff_eq(Vec3::X, 1e-5));
    }

    #[test]
    fn test_removed_mesh_handle_goes_stale() {
        let mut scene = Scene::new();
        let id = scene.add_mesh(dot());
        assert!(scene.remove_mesh(id).is_some());
        assert!(scene.mesh(id).is_none());
        assert!(scene.remove_mesh(id).is_none());
    }

    #[test]
    fn test_point_cloud_upload_flag() {
        let mut cloud = PointCloud::with_capacity(2);
        cloud.push(Vec3::new(1.0, 2.0, 3.0), Rgb::WHITE, 1.0);
        assert!(cloud.take_needs_upload());
        assert!(!cloud.needs_upload());
        cloud.set_position(0, Vec3::ZERO);
        cloud.mark_needs_upload();
        assert!(cloud.needs_upload());
        assert_eq!(cloud.positions(), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_dispose_counts_resources() {
        let mut scene = Scene::new();
        scene.add_mesh(dot());
        scene.add_mesh(dot());
        scene.sections.push(PointCloud::default());
        let report = scene.dispose();
        assert_eq!(report.meshes, 2);
        assert_eq!(report.point_clouds, 2);
    }
}
