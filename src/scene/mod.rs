//! Live scene layout
//!
//! Circles live in scene units with the origin at the center of the view.
//! The scene rotates the whole group about the origin and maps the result
//! onto a dot grid whose size follows the host surface.

pub mod braille;

pub use braille::BrailleCanvas;

use crate::display::Direction;
use crate::spiral::Circle;
use std::f64::consts::TAU;
use std::time::Duration;

/// Visible size of the drawing surface, in grid dots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: usize,
    pub height: usize,
}

impl Viewport {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Dot viewport for a terminal area measured in character cells
    pub fn from_cells(cols: u16, rows: u16) -> Self {
        Self::new(cols as usize * 2, rows as usize * 4)
    }

    /// Overwrite the size after a resize notification. Returns true when the
    /// size actually changed.
    pub fn resize(&mut self, width: usize, height: usize) -> bool {
        let changed = self.width != width || self.height != height;
        self.width = width;
        self.height = height;
        changed
    }

    /// `(min_x, min_y, width, height)`, centered on the origin
    pub fn view_box(&self) -> (f64, f64, f64, f64) {
        let (w, h) = (self.width as f64, self.height as f64);
        (-w / 2.0, -h / 2.0, w, h)
    }

    /// Grid position of the scene origin
    pub fn center(&self) -> (f64, f64) {
        let (min_x, min_y, _, _) = self.view_box();
        (-min_x, -min_y)
    }
}

/// Angle of a linear, endlessly repeating rotation after `elapsed`.
/// Falls back to no rotation for a period that is not positive and finite.
pub fn rotation_angle(elapsed: Duration, period_ms: f64, direction: Direction) -> f64 {
    if !(period_ms.is_finite() && period_ms > 0.0) {
        return 0.0;
    }
    let phase = (elapsed.as_secs_f64() * 1000.0).rem_euclid(period_ms) / period_ms;
    direction.sign() * TAU * phase
}

/// Accumulated rotation of the live group. Advancing by frame time keeps
/// the motion continuous when the direction or period changes mid-turn.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Spin {
    pub angle: f64,
}

impl Spin {
    pub fn advance(&mut self, dt: Duration, period_ms: f64, direction: Direction) {
        self.angle = (self.angle + rotation_angle(dt, period_ms, direction)).rem_euclid(TAU);
    }
}

/// A circle positioned on the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedCircle {
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

pub struct Scene;

impl Scene {
    /// Rotate every center by `angle` about the origin and map scene units to
    /// grid dots at `zoom` dots per unit.
    pub fn layout(
        circles: impl IntoIterator<Item = Circle>,
        viewport: &Viewport,
        zoom: f64,
        angle: f64,
    ) -> Vec<PlacedCircle> {
        let (ox, oy) = viewport.center();
        let (sin, cos) = angle.sin_cos();

        circles
            .into_iter()
            .enumerate()
            .map(|(index, c)| {
                let rx = c.center_x * cos - c.center_y * sin;
                let ry = c.center_x * sin + c.center_y * cos;
                PlacedCircle {
                    index,
                    x: ox + rx * zoom,
                    y: oy + ry * zoom,
                    radius: c.radius * zoom,
                }
            })
            .collect()
    }

    /// Draw placed circles as unfilled outlines.
    pub fn draw(canvas: &mut BrailleCanvas, placed: &[PlacedCircle], stroke_dots: usize) {
        for c in placed {
            canvas.circle(c.x, c.y, c.radius, stroke_dots, c.index);
        }
    }
}

/// Stroke width in scene units converted to whole grid dots, at least one.
pub fn stroke_dots(stroke_width: f64, zoom: f64) -> usize {
    let dots = (stroke_width * zoom).round();
    if dots.is_finite() && dots >= 1.0 {
        dots as usize
    } else {
        1
    }
}
