use ratatui::prelude::*;
use std::f64::consts::TAU;

/// Braille dot positions within a 2x4 cell:
/// (0,0)=0x01 (1,0)=0x08
/// (0,1)=0x02 (1,1)=0x10
/// (0,2)=0x04 (1,2)=0x20
/// (0,3)=0x40 (1,3)=0x80
pub const DOT_MAP: [[u8; 4]; 2] = [
    [0x01, 0x02, 0x04, 0x40],
    [0x08, 0x10, 0x20, 0x80],
];

const MIN_SEGMENTS: usize = 12;
const MAX_SEGMENTS: usize = 720;

/// A canvas for sub-character braille rendering.
/// Each terminal character cell maps to a 2x4 grid of braille dots. Every
/// dot remembers which shape inked it last so cells can be tinted per shape.
pub struct BrailleCanvas {
    pub grid: Vec<Option<usize>>,
    pub grid_w: usize,
    pub grid_h: usize,
    char_w: usize,
    char_h: usize,
}

impl BrailleCanvas {
    /// Create a new braille canvas for the given character dimensions.
    pub fn new(char_w: usize, char_h: usize) -> Self {
        let grid_w = char_w * 2;
        let grid_h = char_h * 4;
        Self {
            grid: vec![None; grid_w * grid_h],
            grid_w,
            grid_h,
            char_w,
            char_h,
        }
    }

    /// Set a single dot on the braille grid. Off-grid dots are dropped.
    #[inline]
    pub fn set(&mut self, gx: isize, gy: isize, ink: usize) {
        if gx >= 0 && gy >= 0 && (gx as usize) < self.grid_w && (gy as usize) < self.grid_h {
            self.grid[gy as usize * self.grid_w + gx as usize] = Some(ink);
        }
    }

    #[cfg(test)]
    pub fn is_set(&self, gx: usize, gy: usize) -> bool {
        gx < self.grid_w && gy < self.grid_h && self.grid[gy * self.grid_w + gx].is_some()
    }

    #[cfg(test)]
    pub fn dot_count(&self) -> usize {
        self.grid.iter().filter(|d| d.is_some()).count()
    }

    /// Draw a line using Bresenham's algorithm.
    pub fn line(&mut self, x0: isize, y0: isize, x1: isize, y1: isize, ink: usize) {
        bresenham_line(self, x0, y0, x1, y1, ink);
    }

    /// Stroke a circle outline centered at (cx, cy) in dot coordinates.
    /// `thickness` concentric rings are drawn around the nominal radius.
    pub fn circle(&mut self, cx: f64, cy: f64, radius: f64, thickness: usize, ink: usize) {
        if !(cx.is_finite() && cy.is_finite() && radius.is_finite()) {
            return;
        }
        let thickness = thickness.max(1);
        let half = (thickness - 1) as f64 / 2.0;
        let inner = radius.abs() - half;
        let outer = radius.abs() + half;

        // Only rings between the nearest and farthest grid point can land on
        // the grid, so a very wide stroke costs no more than the grid size.
        let (near, far) = self.ring_span(cx, cy);
        let mut next_ring = if inner < near - 1.0 {
            (near - 1.0).floor() + inner.rem_euclid(1.0)
        } else {
            inner
        };
        let last = outer.min(far + 1.0);

        while next_ring <= last {
            let r = next_ring;
            next_ring += 1.0;
            if r < 0.0 || !self.ring_visible(cx, cy, r) {
                continue;
            }
            if r < 0.5 {
                self.set(cx.round() as isize, cy.round() as isize, ink);
                continue;
            }

            let segments = ((TAU * r / 2.0).ceil() as usize).clamp(MIN_SEGMENTS, MAX_SEGMENTS);
            let point = |k: usize| {
                let angle = TAU * k as f64 / segments as f64;
                polar_to_grid(cx, cy, angle, r)
            };

            let mut prev = point(0);
            for k in 1..=segments {
                let next = point(k);
                if self.segment_visible(prev, next) {
                    self.line(
                        prev.0.round() as isize,
                        prev.1.round() as isize,
                        next.0.round() as isize,
                        next.1.round() as isize,
                        ink,
                    );
                }
                prev = next;
            }
        }
    }

    /// Distance from (cx, cy) to the nearest and the farthest point of the grid
    fn ring_span(&self, cx: f64, cy: f64) -> (f64, f64) {
        let (w, h) = (self.grid_w as f64, self.grid_h as f64);
        let dx = (0.0 - cx).max(cx - w).max(0.0);
        let dy = (0.0 - cy).max(cy - h).max(0.0);
        let far_x = cx.abs().max((w - cx).abs());
        let far_y = cy.abs().max((h - cy).abs());
        (dx.hypot(dy), far_x.hypot(far_y))
    }

    /// False when the ring misses the grid entirely or encloses all of it.
    fn ring_visible(&self, cx: f64, cy: f64, r: f64) -> bool {
        let (w, h) = (self.grid_w as f64, self.grid_h as f64);
        if cx + r < 0.0 || cy + r < 0.0 || cx - r > w || cy - r > h {
            return false;
        }
        let far_x = cx.abs().max((w - cx).abs());
        let far_y = cy.abs().max((h - cy).abs());
        (far_x * far_x + far_y * far_y).sqrt() >= r
    }

    fn segment_visible(&self, a: (f64, f64), b: (f64, f64)) -> bool {
        let (w, h) = (self.grid_w as f64, self.grid_h as f64);
        !(a.0.max(b.0) < 0.0 || a.1.max(b.1) < 0.0 || a.0.min(b.0) > w || a.1.min(b.1) > h)
    }

    /// Encode braille grid to characters and write to the frame buffer.
    /// `color_fn(ink)` returns an optional RGB color for the shape that last
    /// inked a character cell.
    pub fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        color_fn: impl Fn(usize) -> Option<(u8, u8, u8)>,
    ) {
        for cy in 0..self.char_h.min(area.height as usize) {
            for cx in 0..self.char_w.min(area.width as usize) {
                let mut braille: u8 = 0;
                let mut ink = None;

                for (dx, col) in DOT_MAP.iter().enumerate() {
                    for (dy, &bit) in col.iter().enumerate() {
                        let gx = cx * 2 + dx;
                        let gy = cy * 4 + dy;
                        if let Some(Some(owner)) = self.grid.get(gy * self.grid_w + gx) {
                            braille |= bit;
                            ink = Some(*owner);
                        }
                    }
                }

                if let Some(owner) = ink {
                    if let Some((r, g, b)) = color_fn(owner) {
                        let ch = char::from_u32(0x2800 + braille as u32).unwrap_or(' ');
                        let cell = frame
                            .buffer_mut()
                            .cell_mut((area.x + cx as u16, area.y + cy as u16));
                        if let Some(cell) = cell {
                            cell.set_char(ch);
                            cell.set_fg(Color::Rgb(r, g, b));
                        }
                    }
                }
            }
        }
    }
}

/// Convert polar coordinates to cartesian grid coordinates.
/// `cx`, `cy`: center point; `angle`: radians; `radius`: distance from center.
#[inline]
pub fn polar_to_grid(cx: f64, cy: f64, angle: f64, radius: f64) -> (f64, f64) {
    (cx + angle.cos() * radius, cy + angle.sin() * radius)
}

/// Draw a line on the canvas using Bresenham's algorithm.
pub fn bresenham_line(canvas: &mut BrailleCanvas, x0: isize, y0: isize, x1: isize, y1: isize, ink: usize) {
    let mut x0 = x0;
    let mut y0 = y0;

    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx: isize = if x0 < x1 { 1 } else { -1 };
    let sy: isize = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        canvas.set(x0, y0, ink);

        if x0 == x1 && y0 == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_dimensions() {
        let canvas = BrailleCanvas::new(10, 5);
        assert_eq!(canvas.grid_w, 20);
        assert_eq!(canvas.grid_h, 20);
        assert_eq!(canvas.dot_count(), 0);
    }

    #[test]
    fn test_set_clips_off_grid() {
        let mut canvas = BrailleCanvas::new(2, 1);
        canvas.set(-1, 0, 0);
        canvas.set(0, -3, 0);
        canvas.set(4, 0, 0);
        canvas.set(0, 4, 0);
        assert_eq!(canvas.dot_count(), 0);
        canvas.set(3, 3, 7);
        assert!(canvas.is_set(3, 3));
        assert_eq!(canvas.grid[3 * 4 + 3], Some(7));
    }

    #[test]
    fn test_line_endpoints() {
        let mut canvas = BrailleCanvas::new(10, 3);
        canvas.line(0, 0, 19, 11, 1);
        assert!(canvas.is_set(0, 0));
        assert!(canvas.is_set(19, 11));
    }

    #[test]
    fn test_circle_outline_is_hollow() {
        let mut canvas = BrailleCanvas::new(20, 10);
        canvas.circle(20.0, 20.0, 10.0, 1, 0);
        assert!(canvas.is_set(30, 20));
        assert!(canvas.is_set(10, 20));
        assert!(canvas.is_set(20, 10));
        assert!(canvas.is_set(20, 30));
        assert!(!canvas.is_set(20, 20));
    }

    #[test]
    fn test_thick_circle_adds_rings() {
        let mut thin = BrailleCanvas::new(20, 10);
        thin.circle(20.0, 20.0, 10.0, 1, 0);
        let mut thick = BrailleCanvas::new(20, 10);
        thick.circle(20.0, 20.0, 10.0, 3, 0);
        assert!(thick.dot_count() > thin.dot_count());
        assert!(thick.is_set(31, 20));
        assert!(thick.is_set(29, 20));
    }

    #[test]
    fn test_circle_outside_grid_draws_nothing() {
        let mut canvas = BrailleCanvas::new(10, 5);
        canvas.circle(-100.0, -100.0, 5.0, 1, 0);
        // Encloses the whole grid, no part of the outline is visible
        canvas.circle(10.0, 10.0, 1_000.0, 1, 0);
        canvas.circle(f64::NAN, 0.0, 5.0, 1, 0);
        assert_eq!(canvas.dot_count(), 0);
    }

    #[test]
    fn test_wide_stroke_only_draws_rings_on_grid() {
        let mut canvas = BrailleCanvas::new(20, 10);
        canvas.circle(20.0, 20.0, 5.0, usize::MAX, 3);
        assert!(canvas.is_set(20, 20));
        assert!(canvas.dot_count() > canvas.grid.len() / 2);

        // Centered far away, only the band crossing the grid is stroked
        let mut far = BrailleCanvas::new(20, 10);
        far.circle(-1_000.0, 20.0, 1_020.0, 9, 0);
        assert!(far.is_set(20, 20));
        assert!(!far.is_set(35, 20));
    }

    #[test]
    fn test_zero_radius_is_a_dot() {
        let mut canvas = BrailleCanvas::new(10, 5);
        canvas.circle(4.0, 4.0, 0.0, 1, 2);
        assert_eq!(canvas.dot_count(), 1);
        assert!(canvas.is_set(4, 4));
    }
}
