use std::io::{self, stdout};
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use ratatui::DefaultTerminal;
use stardrift_config::Config;
use stardrift_scene::{DriverState, FrameDriver, MonotonicClock};
use tracing::{info, warn};

mod cli;
mod help;
mod logging;
mod terminal;

use cli::Cli;
use terminal::{Hud, TerminalRenderer, cell_to_sample, scene_viewport};

/// Longest wait for input per frame.
const FRAME_POLL: Duration = Duration::from_millis(16);

/// Rows scrolled per wheel notch.
const WHEEL_ROWS: f32 = 3.0;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    cli.apply(&mut config);

    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    if let Some(path) = logging::init(&config)? {
        info!(log = %path.display(), "logging started");
    }
    for warning in config.validate() {
        warn!("{warning}");
    }

    let terminal = ratatui::init();
    let result = run(config, terminal);
    log_cleanup_error("disable mouse capture", execute!(stdout(), DisableMouseCapture));
    ratatui::restore();
    result
}

/// Log a failed terminal cleanup step. Returns whether it failed.
fn log_cleanup_error(step: &str, result: io::Result<()>) -> bool {
    match result {
        Ok(()) => false,
        Err(e) => {
            warn!("failed to {step}: {e}");
            true
        }
    }
}

fn run(config: Config, terminal: DefaultTerminal) -> Result<()> {
    execute!(stdout(), EnableMouseCapture)?;
    App::new(config, terminal)?.run()
}

/// Terminal front end around a [`FrameDriver`].
pub struct App {
    /// Is the application running?
    running: bool,
    driver: FrameDriver<MonotonicClock>,
    renderer: TerminalRenderer,
    /// Terminal size in cells.
    size: (u16, u16),
    /// Virtual scroll position in pseudo-pixels.
    scroll_offset: f32,
    /// Help bar entry under the pointer.
    hovered: Option<usize>,
}

impl App {
    pub fn new(config: Config, terminal: DefaultTerminal) -> Result<Self> {
        let renderer = TerminalRenderer::new(terminal);
        let size = renderer.size()?;
        let driver = FrameDriver::new(
            config.settings,
            MonotonicClock::new(),
            scene_viewport(size.0, size.1),
        );
        let mut app = Self {
            running: false,
            driver,
            renderer,
            size,
            scroll_offset: 0.0,
            hovered: None,
        };
        app.on_resize(size.0, size.1);
        Ok(app)
    }

    /// Run the application's main loop.
    pub fn run(mut self) -> Result<()> {
        self.running = true;
        while self.running {
            self.renderer.hud = self.hud();
            if self.driver.tick(&mut self.renderer)?.is_none() {
                self.renderer.render_halted()?;
            }
            self.handle_crossterm_events()?;
        }
        if let Some(released) = self.driver.teardown() {
            info!(
                meshes = released.meshes,
                point_clouds = released.point_clouds,
                "scene released"
            );
        }
        Ok(())
    }

    fn hud(&self) -> Hud {
        Hud {
            active_stars: self.driver.active_stars(),
            scroll_percent: self.driver.scroll().progress() * 100.0,
            fps: self.driver.last_fps(),
            context_lost: self.driver.state() == DriverState::ContextLost,
        }
    }

    /// Wait up to one frame for input, then drain whatever else is queued.
    fn handle_crossterm_events(&mut self) -> Result<()> {
        let mut timeout = FRAME_POLL;
        while event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Mouse(mouse) => self.on_mouse_event(mouse),
                Event::Resize(cols, rows) => self.on_resize(cols, rows),
                _ => {}
            }
            timeout = Duration::ZERO;
        }
        Ok(())
    }

    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char('s')) => {
                self.driver.spawn_shooting_star();
            }
            (_, KeyCode::Char('r')) => self.toggle_context(),
            _ => {}
        }
    }

    fn on_mouse_event(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                self.driver
                    .on_pointer_move(cell_to_sample(mouse.column, mouse.row));
                self.update_hover(mouse.column, mouse.row);
            }
            MouseEventKind::Down(MouseButton::Left) => self.driver.on_click(),
            MouseEventKind::ScrollDown => self.scroll_by(1.0),
            MouseEventKind::ScrollUp => self.scroll_by(-1.0),
            _ => {}
        }
    }

    /// Fire the hover burst when the pointer enters a help bar entry.
    fn update_hover(&mut self, col: u16, row: u16) {
        let (cols, rows) = self.size;
        let entry = if row + 1 == rows {
            help::entry_at(cols, col)
        } else {
            None
        };
        if entry.is_some() && entry != self.hovered {
            self.driver.on_hover_enter();
        }
        self.hovered = entry;
    }

    fn scroll_by(&mut self, notches: f32) {
        let step = WHEEL_ROWS * terminal::CELL_HEIGHT_PX;
        let limit = self.driver.scroll().limit;
        self.scroll_offset = (self.scroll_offset + notches * step).clamp(0.0, limit);
        self.driver.on_scroll_signal(self.scroll_offset);
    }

    /// One scene height of scroll per section boundary.
    fn on_resize(&mut self, cols: u16, rows: u16) {
        self.size = (cols, rows);
        let viewport = scene_viewport(cols, rows);
        self.driver.on_resize(viewport);

        let sections = self.driver.settings().scene.section_count;
        let limit = sections.saturating_sub(1).max(1) as f32 * viewport.height;
        self.driver.set_scroll_limit(limit);
        self.scroll_offset = self.scroll_offset.min(limit);
    }

    fn toggle_context(&mut self) {
        match self.driver.state() {
            DriverState::Running => self.driver.on_context_lost(),
            DriverState::ContextLost => self.driver.on_context_restored(),
            DriverState::Disposed => {}
        }
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}
