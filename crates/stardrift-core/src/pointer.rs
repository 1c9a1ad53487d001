//! Pointer input primitives.

/// A pointer position in screen pixels, captured at move time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub x: f32,
    pub y: f32,
}

impl PointerSample {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Size of the surface the pointer moves over, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn half_width(&self) -> f32 {
        self.width / 2.0
    }

    pub fn half_height(&self) -> f32 {
        self.height / 2.0
    }

    /// Offset of a sample from the viewport center, in pixels.
    pub fn centered(&self, sample: PointerSample) -> (f32, f32) {
        (sample.x - self.half_width(), sample.y - self.half_height())
    }

    /// Map a sample to `[-1, 1]` on both axes (y grows downward).
    ///
    /// A degenerate viewport maps everything to the center.
    pub fn normalize(&self, sample: PointerSample) -> (f32, f32) {
        let (hx, hy) = (self.half_width(), self.half_height());
        let (cx, cy) = self.centered(sample);
        let nx = if hx > 0.0 { cx / hx } else { 0.0 };
        let ny = if hy > 0.0 { cy / hy } else { 0.0 };
        (nx, ny)
    }

    /// Aspect ratio, falling back to 1 for a degenerate viewport.
    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }
}
