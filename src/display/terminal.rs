use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io::{self, stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::color::ColorScheme;
use crate::config::Config;
use crate::display::DisplayOptions;
use crate::export::{self, ExportOptions};
use crate::scene::{stroke_dots, BrailleCanvas, Scene, Spin, Viewport};
use crate::share::{self, SharedState};
use crate::spiral::{PresetCatalog, Scale, SpiralParameters};

/// Rows reserved for the status line and the help/message line
const CHROME_ROWS: u16 = 2;
const MESSAGE_TTL: Duration = Duration::from_secs(4);
const ZOOM_STEP: f64 = 1.25;
const PERIOD_STEP: f64 = 1.25;
const STROKE_STEP: f64 = 0.5;
/// Scene units added per press for the radius and offset keys
const LENGTH_STEP: f64 = 1.0;
/// One degree per press for the angle key
const ANGLE_STEP: f64 = std::f64::consts::PI / 180.0;

/// Everything the live view can change. Edits replace values instead of
/// mutating them in place.
pub struct ViewState {
    pub parameters: SpiralParameters,
    pub display: DisplayOptions,
    pub preset_name: String,
    pub color_scheme: ColorScheme,
    pub zoom: f64,
    pub viewport: Viewport,
    pub spin: Spin,
    export_size: (u32, u32),
    export_dir: Option<PathBuf>,
    message: Option<(String, Instant)>,
}

impl ViewState {
    pub fn new(state: SharedState, config: &Config, catalog: &PresetCatalog, viewport: Viewport) -> Self {
        Self {
            parameters: state.parameters,
            display: state.display,
            preset_name: catalog.identify(&state.parameters).to_string(),
            color_scheme: config.display.color_scheme,
            zoom: config.view.zoom,
            viewport,
            spin: Spin::default(),
            export_size: (config.export.width, config.export.height),
            export_dir: config.export.directory.clone(),
            message: None,
        }
    }

    fn set_parameters(&mut self, parameters: SpiralParameters, catalog: &PresetCatalog) {
        self.parameters = parameters;
        self.preset_name = catalog.identify(&parameters).to_string();
    }

    fn notify(&mut self, text: impl Into<String>) {
        self.message = Some((text.into(), Instant::now()));
    }

    /// Current message, if it has not expired yet
    pub fn message(&self) -> Option<&str> {
        self.message
            .as_ref()
            .filter(|(_, at)| at.elapsed() < MESSAGE_TTL)
            .map(|(text, _)| text.as_str())
    }

    /// Terminal was resized to `cols` x `rows` character cells.
    pub fn on_resize(&mut self, cols: u16, rows: u16) {
        let scene = Viewport::from_cells(cols, rows.saturating_sub(CHROME_ROWS));
        if self.viewport.resize(scene.width, scene.height) {
            debug!("Viewport resized to {}x{} dots", scene.width, scene.height);
        }
    }

    pub fn shared(&self) -> SharedState {
        SharedState::new(self.parameters, self.display)
    }

    /// Apply a key press. Returns false when the view should close.
    pub fn handle_key(&mut self, key: KeyEvent, catalog: &PresetCatalog) -> bool {
        match key {
            KeyEvent {
                code: KeyCode::Char('q'),
                ..
            }
            | KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            }
            | KeyEvent {
                code: KeyCode::Esc, ..
            } => return false,
            KeyEvent {
                code: KeyCode::Char('r'),
                ..
            } => {
                self.display = self.display.toggled_reverse();
                self.notify(format!("direction: {}", self.display.direction().class_name()));
            }
            KeyEvent {
                code: KeyCode::Char('c'),
                ..
            } => {
                self.color_scheme = self.color_scheme.next();
                self.notify(format!("color: {}", self.color_scheme.name()));
            }
            KeyEvent {
                code: KeyCode::Char('n'),
                ..
            } => {
                if let Some(preset) = catalog.next_after(&self.preset_name) {
                    self.set_parameters(preset.parameters, catalog);
                }
            }
            KeyEvent {
                code: KeyCode::Char('p'),
                ..
            } => {
                if let Some(preset) = catalog.prev_before(&self.preset_name) {
                    self.set_parameters(preset.parameters, catalog);
                }
            }
            KeyEvent {
                code: KeyCode::Char('+') | KeyCode::Char('='),
                ..
            } => self.zoom *= ZOOM_STEP,
            KeyEvent {
                code: KeyCode::Char('-'),
                ..
            } => self.zoom /= ZOOM_STEP,
            KeyEvent {
                code: KeyCode::Char(']'),
                ..
            } => {
                self.display = self.display.with_stroke_width(self.display.stroke_width + STROKE_STEP);
            }
            KeyEvent {
                code: KeyCode::Char('['),
                ..
            } => {
                let width = self.display.stroke_width;
                let thinner = (width - STROKE_STEP).max(width.min(STROKE_STEP));
                self.display = self.display.with_stroke_width(thinner);
            }
            KeyEvent {
                code: KeyCode::Char('>'),
                ..
            } => {
                // Longer period, slower spin
                let period = self.display.animation_period_ms * PERIOD_STEP;
                self.display = self.display.with_animation_period_ms(period);
            }
            KeyEvent {
                code: KeyCode::Char('<'),
                ..
            } => {
                let period = self.display.animation_period_ms / PERIOD_STEP;
                self.display = self.display.with_animation_period_ms(period);
            }
            KeyEvent {
                code: KeyCode::Up,
                ..
            } => {
                let more = self.parameters.number_of_circles.saturating_add(1);
                self.set_parameters(self.parameters.with_number_of_circles(more), catalog);
            }
            KeyEvent {
                code: KeyCode::Down,
                ..
            } => {
                let fewer = self.parameters.number_of_circles.saturating_sub(1);
                self.set_parameters(self.parameters.with_number_of_circles(fewer), catalog);
            }
            KeyEvent {
                code: KeyCode::Char(ch @ ('s' | 'S' | 'd' | 'D' | 'i' | 'I' | 'a' | 'A')),
                ..
            } => {
                // Lower case steps up, upper case steps down
                let sign = if ch.is_ascii_lowercase() { 1.0 } else { -1.0 };
                let p = self.parameters;
                let updated = match ch.to_ascii_lowercase() {
                    's' => p.with_starting_radius(p.starting_radius + sign * LENGTH_STEP),
                    'd' => p.with_offset_distance(p.offset_distance + sign * LENGTH_STEP),
                    'i' => p.with_radius_increment(p.radius_increment + sign * LENGTH_STEP),
                    _ => p.with_angle_increment(p.angle_increment + sign * ANGLE_STEP),
                };
                self.set_parameters(updated, catalog);
            }
            KeyEvent {
                code: KeyCode::Char(digit @ '1'..='8'),
                ..
            } => {
                let scale = match digit {
                    '1' | '5' => Scale::TimesPi,
                    '2' | '6' => Scale::OverPi,
                    '3' | '7' => Scale::TimesPhi,
                    _ => Scale::OverPhi,
                };
                let (updated, field) = if digit <= '4' {
                    (self.parameters.scale_radius_increment(scale), "radius increment")
                } else {
                    (self.parameters.scale_angle_increment(scale), "angle increment")
                };
                self.set_parameters(updated, catalog);
                self.notify(format!("{} {}", field, scale.label()));
            }
            KeyEvent {
                code: KeyCode::Char('u'),
                ..
            } => {
                let query = share::encode(&self.parameters, &self.display);
                info!("Share query: ?{}", query);
                self.notify(format!("?{}", query));
            }
            KeyEvent {
                code: KeyCode::Char('e'),
                ..
            } => self.export_current(),
            _ => {}
        }
        true
    }

    fn export_current(&mut self) {
        let filename = export::export_filename(&self.preset_name);
        let path = match &self.export_dir {
            Some(dir) => dir.join(&filename),
            None => PathBuf::from(&filename),
        };
        let options = ExportOptions::default()
            .with_size(self.export_size.0, self.export_size.1)
            .with_display(self.display);
        let document = export::svg_document(&self.parameters, &options);

        match export::write_svg(&path, &document) {
            Ok(()) => self.notify(format!("exported {}", path.display())),
            Err(e) => {
                warn!("{}", e);
                self.notify(format!("export failed: {}", e));
            }
        }
    }
}

pub async fn run(state: SharedState, config: Config, catalog: PresetCatalog) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, state, config, catalog).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: SharedState,
    config: Config,
    catalog: PresetCatalog,
) -> Result<()> {
    let size = terminal.size()?;
    let mut view = ViewState::new(state, &config, &catalog, Viewport::new(0, 0));
    view.on_resize(size.width, size.height);

    info!("Viewing '{}' ({} circles)", view.preset_name, view.parameters.number_of_circles);

    let mut last_frame = Instant::now();
    let target_fps = Duration::from_secs_f64(1.0 / config.view.fps.max(1) as f64);

    loop {
        let now = Instant::now();
        let dt = now.duration_since(last_frame);
        last_frame = now;

        view.spin
            .advance(dt, view.display.animation_period_ms, view.display.direction());

        terminal.draw(|frame| {
            let area = frame.area();

            let block = ratatui::widgets::Block::default().style(Style::default().bg(Color::Reset));
            frame.render_widget(block, area);

            render_scene(frame, area, &view);
            render_status(frame, area, &view);
        })?;

        if event::poll(target_fps)? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    if !view.handle_key(key, &catalog) {
                        break;
                    }
                }
                Event::Resize(cols, rows) => view.on_resize(cols, rows),
                _ => {}
            }
        }
    }

    Ok(())
}

fn scene_area(area: Rect) -> Rect {
    Rect::new(
        area.x,
        area.y + 1,
        area.width,
        area.height.saturating_sub(CHROME_ROWS),
    )
}

fn render_scene(frame: &mut Frame, area: Rect, view: &ViewState) {
    let scene = scene_area(area);
    if scene.width == 0 || scene.height == 0 {
        return;
    }

    // The viewport follows resize notifications but never exceeds the area
    // ratatui handed us for this frame.
    let cols = (view.viewport.width / 2).min(scene.width as usize);
    let rows = (view.viewport.height / 4).min(scene.height as usize);
    let mut canvas = BrailleCanvas::new(cols, rows);
    let viewport = Viewport::new(canvas.grid_w, canvas.grid_h);

    let placed = Scene::layout(view.parameters.circles(), &viewport, view.zoom, view.spin.angle);
    Scene::draw(&mut canvas, &placed, stroke_dots(view.display.stroke_width, view.zoom));

    let count = view.parameters.number_of_circles;
    let scheme = view.color_scheme;
    canvas.render(frame, scene, |ink| Some(scheme.circle_color(ink, count)));
}

fn write_line(frame: &mut Frame, area: Rect, y: u16, text: &str, color: Color) {
    for (i, ch) in text.chars().enumerate() {
        if i < area.width as usize {
            let cell = frame.buffer_mut().cell_mut((area.x + i as u16, y));
            if let Some(cell) = cell {
                cell.set_char(ch);
                cell.set_fg(color);
            }
        }
    }
}

fn render_status(frame: &mut Frame, area: Rect, view: &ViewState) {
    if area.height == 0 {
        return;
    }
    let p = &view.parameters;
    let status = format!(
        " {} | n={} r={:.2} +{:.3} offset={:.2} angle={:.4} | stroke={} {:.2}s {} ",
        view.preset_name,
        p.number_of_circles,
        p.starting_radius,
        p.radius_increment,
        p.offset_distance,
        p.angle_increment,
        view.display.stroke_width,
        view.display.animation_period_secs(),
        view.display.direction().class_name(),
    );
    write_line(frame, area, area.y, &status, Color::DarkGray);

    if area.height < CHROME_ROWS {
        return;
    }
    let help = " [n/p]reset [r]everse [c]olor [+/-]zoom [ ]stroke < >speed ↑↓circles [s/S]radius [d/D]offset [i/I]increment [a/A]angle [1-4]increment×÷π/φ [5-8]angle×÷π/φ [e]xport [u]rl [q]uit";
    let (bottom, color) = match view.message() {
        Some(msg) => (format!(" {}", msg), Color::Yellow),
        None => (help.to_string(), Color::DarkGray),
    };
    write_line(frame, area, area.y + area.height - 1, &bottom, color);
}
