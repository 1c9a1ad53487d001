//! Renderer seam.

use crate::scene::Scene;

/// Something that can draw a finished frame.
///
/// The frame driver hands over the scene after every update; failures are
/// returned to the caller of [`FrameDriver::tick`](crate::FrameDriver::tick)
/// untouched. Renderers take point cloud upload flags (see
/// [`PointBuffers`](crate::PointBuffers)) and leave the rest of the scene as is.
pub trait Renderer {
    type Error;

    fn render(&mut self, scene: &mut Scene) -> Result<(), Self::Error>;
}
