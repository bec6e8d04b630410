mod presets;

pub use presets::{PresetCatalog, CUSTOM, GOLDEN_RATIO};

use std::f64::consts::PI;
use std::iter::FusedIterator;

/// The five numbers that fully determine a demisphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpiralParameters {
    pub number_of_circles: usize,
    pub starting_radius: f64,
    pub radius_increment: f64,
    pub offset_distance: f64,
    /// Radians added to the center angle for every successive circle
    pub angle_increment: f64,
}

/// One stroked circle of the artwork.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
}

/// Multipliers offered next to the increment inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    TimesPi,
    OverPi,
    TimesPhi,
    OverPhi,
}

impl Scale {
    pub fn apply(&self, value: f64) -> f64 {
        match self {
            Scale::TimesPi => value * PI,
            Scale::OverPi => value / PI,
            Scale::TimesPhi => value * GOLDEN_RATIO,
            Scale::OverPhi => value / GOLDEN_RATIO,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Scale::TimesPi => "×π",
            Scale::OverPi => "÷π",
            Scale::TimesPhi => "×φ",
            Scale::OverPhi => "÷φ",
        }
    }
}

impl Default for SpiralParameters {
    /// Divine Proportion, the first built-in preset
    fn default() -> Self {
        Self::new(11, 16.0, 16.0 * GOLDEN_RATIO, 13.0, (PI * 2.0) / GOLDEN_RATIO)
    }
}

impl SpiralParameters {
    pub fn new(
        number_of_circles: usize,
        starting_radius: f64,
        radius_increment: f64,
        offset_distance: f64,
        angle_increment: f64,
    ) -> Self {
        Self {
            number_of_circles,
            starting_radius,
            radius_increment,
            offset_distance,
            angle_increment,
        }
    }

    /// Closed form for the circle at `index`. Defined for any index, not only
    /// those below `number_of_circles`.
    #[inline]
    pub fn circle(&self, index: usize) -> Circle {
        let i = index as f64;
        let theta = i * self.angle_increment;
        Circle {
            center_x: self.offset_distance * theta.cos(),
            center_y: self.offset_distance * theta.sin(),
            radius: self.starting_radius + i * self.radius_increment,
        }
    }

    /// Lazy, restartable sequence of exactly `number_of_circles` circles.
    pub fn circles(&self) -> Circles {
        Circles {
            parameters: *self,
            next: 0,
        }
    }

    pub fn with_number_of_circles(self, number_of_circles: usize) -> Self {
        Self { number_of_circles, ..self }
    }

    pub fn with_starting_radius(self, starting_radius: f64) -> Self {
        Self { starting_radius, ..self }
    }

    pub fn with_radius_increment(self, radius_increment: f64) -> Self {
        Self { radius_increment, ..self }
    }

    pub fn with_offset_distance(self, offset_distance: f64) -> Self {
        Self { offset_distance, ..self }
    }

    pub fn with_angle_increment(self, angle_increment: f64) -> Self {
        Self { angle_increment, ..self }
    }

    pub fn scale_radius_increment(self, scale: Scale) -> Self {
        self.with_radius_increment(scale.apply(self.radius_increment))
    }

    pub fn scale_angle_increment(self, scale: Scale) -> Self {
        self.with_angle_increment(scale.apply(self.angle_increment))
    }
}

/// Generate every circle of the spiral, in radius order.
pub fn generate(parameters: &SpiralParameters) -> Vec<Circle> {
    parameters.circles().collect()
}

/// Iterator returned by [`SpiralParameters::circles`]. Cloning it restarts
/// from the clone's position.
#[derive(Debug, Clone)]
pub struct Circles {
    parameters: SpiralParameters,
    next: usize,
}

impl Iterator for Circles {
    type Item = Circle;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.parameters.number_of_circles {
            return None;
        }
        let circle = self.parameters.circle(self.next);
        self.next += 1;
        Some(circle)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.parameters.number_of_circles.saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Circles {}

impl FusedIterator for Circles {}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_concentric_example() {
        let params = SpiralParameters::new(3, 10.0, 5.0, 0.0, 0.0);
        let circles = generate(&params);
        assert_eq!(
            circles,
            vec![
                Circle { center_x: 0.0, center_y: 0.0, radius: 10.0 },
                Circle { center_x: 0.0, center_y: 0.0, radius: 15.0 },
                Circle { center_x: 0.0, center_y: 0.0, radius: 20.0 },
            ]
        );
    }

    #[test]
    fn test_length_matches_count() {
        for n in [0usize, 1, 7, 30, 250] {
            let params = SpiralParameters::new(n, 4.0, 2.0, 9.0, 0.3);
            assert_eq!(generate(&params).len(), n);
            assert_eq!(params.circles().len(), n);
        }
    }

    #[test]
    fn test_closed_form() {
        let params = SpiralParameters::new(12, 25.0, 20.0, 7.5, PI / 3.0);
        for (i, c) in params.circles().enumerate() {
            let theta = i as f64 * PI / 3.0;
            assert!(close(c.center_x, 7.5 * theta.cos()), "cx of circle {i}");
            assert!(close(c.center_y, 7.5 * theta.sin()), "cy of circle {i}");
            assert!(close(c.radius, 25.0 + 20.0 * i as f64), "r of circle {i}");
        }
    }

    #[test]
    fn test_zero_angle_and_offset_collapse_to_origin() {
        let params = SpiralParameters::new(9, 3.0, 1.5, 0.0, 0.0);
        assert!(params
            .circles()
            .all(|c| c.center_x == 0.0 && c.center_y == 0.0));

        // A nonzero offset with no angle still stacks every center on one point
        let stacked = SpiralParameters::new(9, 3.0, 1.5, 4.0, 0.0);
        assert!(stacked
            .circles()
            .all(|c| c.center_x == 4.0 && c.center_y == 0.0));
    }

    #[test]
    fn test_restartable() {
        let params = SpiralParameters::new(5, 1.0, 1.0, 2.0, 0.5);
        let mut iter = params.circles();
        iter.next();
        let snapshot = iter.clone();
        let rest: Vec<Circle> = iter.collect();
        let again: Vec<Circle> = snapshot.collect();
        assert_eq!(rest, again);
        assert_eq!(rest.len(), 4);
        assert_eq!(params.circles().collect::<Vec<_>>(), generate(&params));
    }

    #[test]
    fn test_nan_input_is_not_a_fault() {
        let params = SpiralParameters::new(3, f64::NAN, 1.0, 1.0, 1.0);
        let circles = generate(&params);
        assert_eq!(circles.len(), 3);
        assert!(circles.iter().all(|c| c.radius.is_nan()));
    }

    #[test]
    fn test_immutable_updates() {
        let base = SpiralParameters::new(4, 10.0, 2.0, 3.0, 1.0);
        let changed = base.with_offset_distance(8.0).with_number_of_circles(6);
        assert_eq!(base.offset_distance, 3.0);
        assert_eq!(base.number_of_circles, 4);
        assert_eq!(changed.offset_distance, 8.0);
        assert_eq!(changed.number_of_circles, 6);
        assert_eq!(changed.starting_radius, base.starting_radius);
    }

    #[test]
    fn test_scale_buttons() {
        let base = SpiralParameters::new(4, 10.0, 2.0, 3.0, 1.0);
        assert!(close(base.scale_radius_increment(Scale::TimesPi).radius_increment, 2.0 * PI));
        assert!(close(base.scale_radius_increment(Scale::OverPhi).radius_increment, 2.0 / GOLDEN_RATIO));
        assert!(close(base.scale_angle_increment(Scale::OverPi).angle_increment, 1.0 / PI));
        assert!(close(base.scale_angle_increment(Scale::TimesPhi).angle_increment, GOLDEN_RATIO));

        let round_trip = base
            .scale_angle_increment(Scale::TimesPhi)
            .scale_angle_increment(Scale::OverPhi);
        assert!(close(round_trip.angle_increment, base.angle_increment));
    }
}
