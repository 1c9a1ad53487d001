//! Terminal projection of a [`Scene`].
//!
//! Every point and mesh is projected through the scene camera and drawn as
//! a single colored glyph; the nearest item wins each cell. Terminal cells
//! are roughly twice as tall as they are wide, which the aspect ratio
//! accounts for.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use glam::{Quat, Vec3};
use stardrift_core::Rgb;

use crate::camera::{Projected, Projector};
use crate::scene::{MaterialKind, Mesh, PointCloud, Scene, Shape};

/// Opacity below which nothing is drawn.
const MIN_VISIBLE_OPACITY: f32 = 0.05;

/// Aspect ratio of a cell grid, assuming cells twice as tall as wide.
pub fn terminal_aspect(width: u16, height: u16) -> f32 {
    if height == 0 {
        return 1.0;
    }
    width as f32 / (height as f32 * 2.0)
}

/// Glyph for a mesh, or `None` for meshes that draw nothing themselves.
pub fn mesh_glyph(mesh: &Mesh) -> Option<char> {
    let wire = mesh.material.kind == MaterialKind::Wireframe;
    let ch = match mesh.shape {
        Shape::Group | Shape::Label(_) => return None,
        Shape::Sphere if mesh.radius < 0.2 => '·',
        Shape::Sphere if mesh.radius < 0.5 => '•',
        Shape::Sphere => {
            if wire {
                '○'
            } else {
                '●'
            }
        }
        Shape::Cube => {
            if wire {
                '□'
            } else {
                '■'
            }
        }
        Shape::Cone => {
            if wire {
                '△'
            } else {
                '▲'
            }
        }
        Shape::Torus => 'o',
        Shape::Octahedron => {
            if wire {
                '◇'
            } else {
                '◆'
            }
        }
        Shape::Icosahedron => '✦',
    };
    Some(ch)
}

/// Brightness falloff with distance from the camera.
fn depth_fade(depth: f32, far: f32) -> f32 {
    (1.0 - depth / far).clamp(0.25, 1.0)
}

#[derive(Debug, Clone, Copy)]
struct Cell {
    ch: char,
    color: Rgb,
    depth: f32,
}

/// Depth-tested glyph grid.
struct Canvas {
    width: u16,
    height: u16,
    cells: Vec<Option<Cell>>,
}

impl Canvas {
    fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
        }
    }

    fn cell_of(&self, p: &Projected) -> Option<(i32, i32)> {
        let col = ((p.x + 1.0) * 0.5 * self.width as f32).floor() as i32;
        let row = ((1.0 - p.y) * 0.5 * self.height as f32).floor() as i32;
        (col >= 0 && row >= 0 && col < self.width as i32 && row < self.height as i32)
            .then_some((col, row))
    }

    fn put(&mut self, col: i32, row: i32, cell: Cell) {
        if col < 0 || row < 0 || col >= self.width as i32 || row >= self.height as i32 {
            return;
        }
        let idx = row as usize * self.width as usize + col as usize;
        match &self.cells[idx] {
            Some(existing) if existing.depth <= cell.depth => {}
            _ => self.cells[idx] = Some(cell),
        }
    }

    fn plot(&mut self, p: &Projected, ch: char, color: Rgb) {
        if let Some((col, row)) = self.cell_of(p) {
            self.put(
                col,
                row,
                Cell {
                    ch,
                    color,
                    depth: p.depth,
                },
            );
        }
    }

    /// Write `text` centered on the projected point.
    fn text(&mut self, p: &Projected, text: &str, color: Rgb) {
        if let Some((col, row)) = self.cell_of(p) {
            let start = col - text.chars().count() as i32 / 2;
            for (i, ch) in text.chars().enumerate() {
                self.put(
                    start + i as i32,
                    row,
                    Cell {
                        ch,
                        color,
                        depth: p.depth,
                    },
                );
            }
        }
    }

    fn into_lines(self) -> Vec<Line<'static>> {
        self.cells
            .chunks(self.width.max(1) as usize)
            .map(|row| {
                let spans: Vec<Span> = row
                    .iter()
                    .map(|cell| match cell {
                        Some(c) => Span::styled(
                            c.ch.to_string(),
                            Style::default().fg(Color::from(c.color)),
                        ),
                        None => Span::raw(" "),
                    })
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}

/// Renderer-side copies of the scene's point cloud positions.
///
/// A cloud is copied only while its upload flag is set, and
/// [`sync`](Self::sync) clears the flag.
#[derive(Debug, Clone, Default)]
pub struct PointBuffers {
    particles: Vec<Vec3>,
    sections: Vec<Vec<Vec3>>,
}

impl PointBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy every flagged cloud out of `scene`. Returns how many were copied.
    pub fn sync(&mut self, scene: &mut Scene) -> usize {
        let mut uploaded = usize::from(upload(&mut self.particles, &mut scene.particles));
        self.sections.resize_with(scene.sections.len(), Vec::new);
        for (buffer, cloud) in self.sections.iter_mut().zip(&mut scene.sections) {
            uploaded += usize::from(upload(buffer, cloud));
        }
        uploaded
    }

    pub fn particles(&self) -> &[Vec3] {
        &self.particles
    }

    pub fn section(&self, index: usize) -> Option<&[Vec3]> {
        self.sections.get(index).map(Vec::as_slice)
    }
}

fn upload(buffer: &mut Vec<Vec3>, cloud: &mut PointCloud) -> bool {
    if !cloud.take_needs_upload() {
        return false;
    }
    buffer.clear();
    buffer.extend(cloud.iter_positions());
    true
}

/// Widget drawing a scene snapshot.
///
/// Point clouds are read from the scene unless [`PointBuffers`] are
/// attached, in which case the last uploaded positions are drawn.
pub struct SceneView<'a> {
    scene: &'a Scene,
    buffers: Option<&'a PointBuffers>,
}

impl<'a> SceneView<'a> {
    pub fn new(scene: &'a Scene) -> Self {
        Self {
            scene,
            buffers: None,
        }
    }

    pub fn with_buffers(mut self, buffers: &'a PointBuffers) -> Self {
        self.buffers = Some(buffers);
        self
    }

    fn draw_cloud(
        &self,
        canvas: &mut Canvas,
        projector: &Projector,
        cloud: &PointCloud,
        positions: impl Iterator<Item = Vec3>,
    ) {
        let far = self.scene.camera.far;
        let yaw = Quat::from_rotation_y(cloud.rotation_y);
        for (i, p) in positions.enumerate() {
            let Some(proj) = projector.project(self.scene.to_world(yaw * p)) else {
                continue;
            };
            let size = cloud.sizes.get(i).copied().unwrap_or(1.0);
            let ch = if size >= 2.0 && proj.depth < 200.0 {
                '•'
            } else {
                '·'
            };
            let color = cloud.colors.get(i).copied().unwrap_or(Rgb::WHITE);
            canvas.plot(
                &proj,
                ch,
                color.dim(cloud.opacity * depth_fade(proj.depth, far)),
            );
        }
    }

    fn draw_meshes(&self, canvas: &mut Canvas, projector: &Projector) {
        let far = self.scene.camera.far;
        for (id, mesh) in self.scene.meshes() {
            if mesh.material.opacity < MIN_VISIBLE_OPACITY {
                continue;
            }
            let Some(local) = self.scene.local_position(id) else {
                continue;
            };
            let Some(proj) = projector.project(self.scene.to_world(local)) else {
                continue;
            };
            let color = mesh
                .material
                .color
                .dim(mesh.material.opacity.max(0.3) * depth_fade(proj.depth, far));
            match (mesh.shape, mesh_glyph(mesh)) {
                (Shape::Label(text), _) => canvas.text(&proj, text, color),
                (_, Some(ch)) => canvas.plot(&proj, ch, color),
                _ => {}
            }
        }
    }

    /// Rasterize to styled lines of `width` cells.
    pub fn lines(&self, width: u16, height: u16) -> Vec<Line<'static>> {
        if width == 0 || height == 0 {
            return Vec::new();
        }
        let mut canvas = Canvas::new(width, height);
        let Some(projector) = self
            .scene
            .camera
            .projector(terminal_aspect(width, height))
        else {
            return canvas.into_lines();
        };

        for (i, cloud) in self.scene.sections.iter().enumerate() {
            match self.buffers.and_then(|b| b.section(i)) {
                Some(buffer) => {
                    self.draw_cloud(&mut canvas, &projector, cloud, buffer.iter().copied())
                }
                None => self.draw_cloud(&mut canvas, &projector, cloud, cloud.iter_positions()),
            }
        }
        let particles = &self.scene.particles;
        match self.buffers {
            Some(buffers) => self.draw_cloud(
                &mut canvas,
                &projector,
                particles,
                buffers.particles().iter().copied(),
            ),
            None => self.draw_cloud(
                &mut canvas,
                &projector,
                particles,
                particles.iter_positions(),
            ),
        }
        self.draw_meshes(&mut canvas, &projector);

        canvas.into_lines()
    }
}

impl Widget for SceneView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = self.lines(area.width, area.height);
        Paragraph::new(lines).render(area, buf);
    }
}

/// Project a single world point to a cell of a `width` x `height` grid.
pub fn project_to_cell(
    scene: &Scene,
    point: Vec3,
    width: u16,
    height: u16,
) -> Option<(u16, u16)> {
    let proj = scene
        .camera
        .project(scene.to_world(point), terminal_aspect(width, height))?;
    Canvas::new(width, height)
        .cell_of(&proj)
        .map(|(col, row)| (col as u16, row as u16))
}
