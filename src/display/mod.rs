pub mod terminal;

/// Default rotation period, one turn every two seconds
pub const DEFAULT_PERIOD_MS: f64 = 2000.0;
pub const DEFAULT_STROKE_WIDTH: f64 = 1.0;

/// Rotation direction of the spiral group
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}

impl Direction {
    pub fn from_reverse(reverse: bool) -> Self {
        if reverse {
            Direction::Reverse
        } else {
            Direction::Forward
        }
    }

    /// Animation state name attached to the rotating group
    pub fn class_name(&self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Reverse => "reverse",
        }
    }

    /// +1 for forward (clockwise on a y-down surface), -1 for reverse
    pub fn sign(&self) -> f64 {
        match self {
            Direction::Forward => 1.0,
            Direction::Reverse => -1.0,
        }
    }
}

/// How the spiral is drawn, independent of its geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayOptions {
    pub reverse: bool,
    pub stroke_width: f64,
    pub animation_period_ms: f64,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            reverse: false,
            stroke_width: DEFAULT_STROKE_WIDTH,
            animation_period_ms: DEFAULT_PERIOD_MS,
        }
    }
}

impl DisplayOptions {
    pub fn direction(&self) -> Direction {
        Direction::from_reverse(self.reverse)
    }

    pub fn toggled_reverse(self) -> Self {
        Self {
            reverse: !self.reverse,
            ..self
        }
    }

    pub fn with_stroke_width(self, stroke_width: f64) -> Self {
        Self { stroke_width, ..self }
    }

    pub fn with_animation_period_ms(self, animation_period_ms: f64) -> Self {
        Self {
            animation_period_ms,
            ..self
        }
    }

    /// Period in seconds, the unit CSS animations are written in
    pub fn animation_period_secs(&self) -> f64 {
        self.animation_period_ms / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_classes() {
        assert_eq!(Direction::from_reverse(false).class_name(), "forward");
        assert_eq!(Direction::from_reverse(true).class_name(), "reverse");
        assert_eq!(DisplayOptions::default().direction(), Direction::Forward);
        assert_eq!(Direction::Reverse.sign(), -Direction::Forward.sign());
    }

    #[test]
    fn test_toggle_only_flips_reverse() {
        let opts = DisplayOptions::default().with_stroke_width(2.5);
        let toggled = opts.toggled_reverse();
        assert!(toggled.reverse);
        assert_eq!(toggled.stroke_width, 2.5);
        assert_eq!(toggled.animation_period_ms, opts.animation_period_ms);
        assert_eq!(toggled.toggled_reverse(), opts);
    }

    #[test]
    fn test_period_secs() {
        let opts = DisplayOptions::default().with_animation_period_ms(3500.0);
        assert_eq!(opts.animation_period_secs(), 3.5);
        assert_eq!(DisplayOptions::default().animation_period_secs(), 2.0);
    }
}
