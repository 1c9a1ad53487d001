//! Drawing the scene, HUD and help bar into the terminal.

use std::io;

use ratatui::{
    DefaultTerminal, Frame,
    layout::{Alignment, Constraint, Layout},
    style::{Color, Style, Stylize},
    text::Line,
    widgets::Paragraph,
};
use stardrift_core::{PointerSample, Rgb, Viewport};
use stardrift_scene::{PointBuffers, Renderer, Scene, SceneView};

use crate::help;

/// Pseudo-pixel size of one terminal cell.
pub const CELL_WIDTH_PX: f32 = 8.0;
pub const CELL_HEIGHT_PX: f32 = 16.0;

/// Rows below the scene: HUD and help bar.
pub const CHROME_ROWS: u16 = 2;

const ACCENT: Rgb = Rgb::from_hex(0x00f5ff);

/// Viewport in pseudo-pixels of the scene area in a terminal of
/// `cols` x `rows` cells.
pub fn scene_viewport(cols: u16, rows: u16) -> Viewport {
    let scene_rows = rows.saturating_sub(CHROME_ROWS);
    Viewport::new(
        cols as f32 * CELL_WIDTH_PX,
        scene_rows as f32 * CELL_HEIGHT_PX,
    )
}

/// Pointer sample at the center of a cell.
pub fn cell_to_sample(col: u16, row: u16) -> PointerSample {
    PointerSample::new(
        (col as f32 + 0.5) * CELL_WIDTH_PX,
        (row as f32 + 0.5) * CELL_HEIGHT_PX,
    )
}

/// Status shown above the help bar.
#[derive(Debug, Clone, Default)]
pub struct Hud {
    pub active_stars: usize,
    pub scroll_percent: f32,
    pub fps: Option<u32>,
    pub context_lost: bool,
}

impl Hud {
    fn line(&self) -> Line<'static> {
        let accent = Color::from(ACCENT);
        let fps = self
            .fps
            .map_or_else(|| "--".to_string(), |fps| fps.to_string());
        let mut spans = vec![
            "stars ".dark_gray(),
            self.active_stars.to_string().fg(accent),
            "  scroll ".dark_gray(),
            format!("{:>3.0}%", self.scroll_percent).fg(accent),
            "  fps ".dark_gray(),
            fps.fg(accent),
        ];
        if self.context_lost {
            spans.push("  context lost".red().bold());
        }
        Line::from(spans).centered()
    }
}

fn draw(frame: &mut Frame, scene: Option<SceneView<'_>>, hud: &Hud) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),   // Scene
        Constraint::Length(1), // HUD
        Constraint::Length(1), // Help text
    ])
    .split(frame.area());

    match scene {
        Some(view) => frame.render_widget(view, chunks[0]),
        None => {
            let paused = Paragraph::new("rendering paused, press r to restore")
                .style(Style::new().dark_gray())
                .alignment(Alignment::Center);
            let middle = Layout::vertical([
                Constraint::Fill(1),
                Constraint::Length(1),
                Constraint::Fill(1),
            ])
            .split(chunks[0]);
            frame.render_widget(paused, middle[1]);
        }
    }

    frame.render_widget(hud.line(), chunks[1]);
    frame.render_widget(help::help_line(Color::from(ACCENT)), chunks[2]);
}

pub struct TerminalRenderer {
    terminal: DefaultTerminal,
    buffers: PointBuffers,
    pub hud: Hud,
}

impl TerminalRenderer {
    pub fn new(terminal: DefaultTerminal) -> Self {
        Self {
            terminal,
            buffers: PointBuffers::new(),
            hud: Hud::default(),
        }
    }

    /// Terminal size as `(cols, rows)`.
    pub fn size(&self) -> io::Result<(u16, u16)> {
        let size = self.terminal.size()?;
        Ok((size.width, size.height))
    }

    /// Draw the chrome without a scene while the frame loop is halted.
    pub fn render_halted(&mut self) -> io::Result<()> {
        let hud = &self.hud;
        self.terminal.draw(|frame| draw(frame, None, hud))?;
        Ok(())
    }
}

impl Renderer for TerminalRenderer {
    type Error = io::Error;

    fn render(&mut self, scene: &mut Scene) -> Result<(), Self::Error> {
        self.buffers.sync(scene);
        let view = SceneView::new(scene).with_buffers(&self.buffers);
        let hud = &self.hud;
        self.terminal.draw(|frame| draw(frame, Some(view), hud))?;
        Ok(())
    }
}
