//! Perspective camera.

use glam::{Mat4, Vec3};

/// Camera start position (on the Z axis, looking at the origin).
pub const CAMERA_HOME: Vec3 = Vec3::new(0.0, 0.0, 100.0);

/// A point projected into normalized device coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    /// Horizontal position, `-1` left edge to `1` right edge.
    pub x: f32,
    /// Vertical position, `-1` bottom edge to `1` top edge.
    pub y: f32,
    /// Distance along the view direction.
    pub depth: f32,
}

impl Projected {
    pub fn on_screen(&self) -> bool {
        (-1.0..=1.0).contains(&self.x) && (-1.0..=1.0).contains(&self.y)
    }
}

/// Perspective camera with a look-at target.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: CAMERA_HOME,
            target: Vec3::ZERO,
            fov_deg: 75.0,
            near: 1.0,
            far: 1000.0,
        }
    }
}

impl Camera {
    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// World to view transform, or `None` when the camera sits on its target.
    pub fn view_matrix(&self) -> Option<Mat4> {
        let forward = (self.target - self.position).try_normalize()?;
        let up = if forward.cross(Vec3::Y).length_squared() > f32::EPSILON {
            Vec3::Y
        } else {
            // Looking straight up or down.
            Vec3::X.cross(forward)
        };
        Some(Mat4::look_at_rh(self.position, self.target, up))
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        let aspect = if aspect > 0.0 { aspect } else { 1.0 };
        Mat4::perspective_rh(self.fov_deg.to_radians(), aspect, self.near, self.far)
    }

    /// Matrices for projecting many points with the current pose.
    pub fn projector(&self, aspect: f32) -> Option<Projector> {
        Some(Projector {
            view: self.view_matrix()?,
            projection: self.projection_matrix(aspect),
            near: self.near,
            far: self.far,
        })
    }

    /// Project a world-space point. Returns `None` outside the near/far range.
    pub fn project(&self, point: Vec3, aspect: f32) -> Option<Projected> {
        self.projector(aspect)?.project(point)
    }
}

/// A camera pose frozen into view and projection matrices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    view: Mat4,
    projection: Mat4,
    near: f32,
    far: f32,
}

impl Projector {
    pub fn project(&self, point: Vec3) -> Option<Projected> {
        let eye = self.view.transform_point3(point);
        let depth = -eye.z;
        if depth < self.near || depth > self.far {
            return None;
        }
        let ndc = self.projection.project_point3(eye);
        Some(Projected {
            x: ndc.x,
            y: ndc.y,
            depth,
        })
    }
}
