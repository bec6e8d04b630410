//! Shareable query-string form of a spiral and its display options.
//!
//! `circles=12&radius=25&increment=20&offset=7.5&angle=1.0471975511965976&stroke=1&speed=2000`
//!
//! Floats are written with Rust's shortest round-trip formatting so decoding
//! restores the exact same bits. Missing or unparsable keys fall back to the
//! defaults (the default preset, stroke 1, a 2000 ms period, forward).

use tracing::debug;
use url::form_urlencoded;

use crate::display::DisplayOptions;
use crate::spiral::SpiralParameters;

pub const KEY_CIRCLES: &str = "circles";
pub const KEY_RADIUS: &str = "radius";
pub const KEY_INCREMENT: &str = "increment";
pub const KEY_OFFSET: &str = "offset";
pub const KEY_ANGLE: &str = "angle";
pub const KEY_STROKE: &str = "stroke";
pub const KEY_SPEED: &str = "speed";
pub const KEY_REVERSE: &str = "reverse";

/// Everything a shared link carries
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SharedState {
    pub parameters: SpiralParameters,
    pub display: DisplayOptions,
}

impl SharedState {
    pub fn new(parameters: SpiralParameters, display: DisplayOptions) -> Self {
        Self { parameters, display }
    }

    pub fn to_query(&self) -> String {
        encode(&self.parameters, &self.display)
    }
}

/// Flat `key=value&...` form. `reverse` is written only when set.
pub fn encode(parameters: &SpiralParameters, display: &DisplayOptions) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query
        .append_pair(KEY_CIRCLES, &parameters.number_of_circles.to_string())
        .append_pair(KEY_RADIUS, &parameters.starting_radius.to_string())
        .append_pair(KEY_INCREMENT, &parameters.radius_increment.to_string())
        .append_pair(KEY_OFFSET, &parameters.offset_distance.to_string())
        .append_pair(KEY_ANGLE, &parameters.angle_increment.to_string())
        .append_pair(KEY_STROKE, &display.stroke_width.to_string())
        .append_pair(KEY_SPEED, &display.animation_period_ms.to_string());
    if display.reverse {
        query.append_pair(KEY_REVERSE, "1");
    }
    query.finish()
}

/// Decode against the built-in defaults.
#[allow(dead_code)]
pub fn decode(query: &str) -> SharedState {
    decode_with_defaults(query, SharedState::default())
}

/// Decode, taking every absent or unparsable value from `defaults`.
/// A leading `?` and unknown keys are ignored; the last occurrence of a
/// repeated key wins.
pub fn decode_with_defaults(query: &str, defaults: SharedState) -> SharedState {
    let mut state = defaults;

    for (key, value) in query_pairs(query) {
        let value = value.trim();
        let p = &mut state.parameters;
        let d = &mut state.display;
        match key.as_str() {
            KEY_CIRCLES => p.number_of_circles = parse_count(value).unwrap_or(defaults.parameters.number_of_circles),
            KEY_RADIUS => p.starting_radius = parse_float(value).unwrap_or(defaults.parameters.starting_radius),
            KEY_INCREMENT => p.radius_increment = parse_float(value).unwrap_or(defaults.parameters.radius_increment),
            KEY_OFFSET => p.offset_distance = parse_float(value).unwrap_or(defaults.parameters.offset_distance),
            KEY_ANGLE => p.angle_increment = parse_float(value).unwrap_or(defaults.parameters.angle_increment),
            KEY_STROKE => d.stroke_width = parse_float(value).unwrap_or(defaults.display.stroke_width),
            KEY_SPEED => d.animation_period_ms = parse_float(value).unwrap_or(defaults.display.animation_period_ms),
            KEY_REVERSE => d.reverse = parse_flag(value),
            other => debug!("Ignoring unknown query key '{}'", other),
        }
    }

    state
}

/// Decoded `(key, value)` pairs. `%XX` escapes and `+` are unescaped,
/// malformed escapes are kept verbatim.
fn query_pairs(query: &str) -> Vec<(String, String)> {
    let query = query.trim().trim_start_matches('?');
    form_urlencoded::parse(query.as_bytes())
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect()
}

fn parse_float(value: &str) -> Option<f64> {
    value.parse::<f64>().ok()
}

/// Whole counts, or a non-negative float truncated toward zero
fn parse_count(value: &str) -> Option<usize> {
    value.parse::<usize>().ok().or_else(|| {
        let f = value.parse::<f64>().ok()?;
        if f.is_finite() && f >= 0.0 {
            Some(f.trunc() as usize)
        } else {
            None
        }
    })
}

/// A bare key (`&reverse`) counts as set
fn parse_flag(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "" | "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spiral::PresetCatalog;

    #[test]
    fn test_round_trip_every_preset() {
        let display = DisplayOptions::default()
            .with_stroke_width(1.75)
            .with_animation_period_ms(1234.5)
            .toggled_reverse();
        for preset in PresetCatalog::builtin().all() {
            let query = encode(&preset.parameters, &display);
            let decoded = decode(&query);
            assert_eq!(decoded.parameters, preset.parameters, "{}", preset.name);
            assert_eq!(decoded.display, display);
        }
    }

    #[test]
    fn test_encoded_keys() {
        let params = SpiralParameters::new(3, 10.0, 5.0, 0.0, 0.0);
        let query = encode(&params, &DisplayOptions::default());
        assert_eq!(
            query,
            "circles=3&radius=10&increment=5&offset=0&angle=0&stroke=1&speed=2000"
        );
        let reversed = encode(&params, &DisplayOptions::default().toggled_reverse());
        assert!(reversed.ends_with("&reverse=1"));
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let decoded = decode("circles=5");
        let defaults = SharedState::default();
        assert_eq!(decoded.parameters.number_of_circles, 5);
        assert_eq!(decoded.parameters.starting_radius, defaults.parameters.starting_radius);
        assert_eq!(decoded.display, defaults.display);
        assert_eq!(decode(""), defaults);
        assert_eq!(decode("?"), defaults);
    }

    #[test]
    fn test_unparsable_values_use_defaults() {
        let defaults = SharedState::default();
        let decoded = decode("?circles=many&radius=abc&offset=&stroke=thick&speed=4000");
        assert_eq!(decoded.parameters.number_of_circles, defaults.parameters.number_of_circles);
        assert_eq!(decoded.parameters.starting_radius, defaults.parameters.starting_radius);
        assert_eq!(decoded.parameters.offset_distance, defaults.parameters.offset_distance);
        assert_eq!(decoded.display.stroke_width, defaults.display.stroke_width);
        assert_eq!(decoded.display.animation_period_ms, 4000.0);
    }

    #[test]
    fn test_custom_defaults() {
        let base = SharedState::new(
            SpiralParameters::new(2, 1.0, 1.0, 1.0, 1.0),
            DisplayOptions::default().toggled_reverse(),
        );
        let decoded = decode_with_defaults("angle=0.5&bogus=1", base);
        assert_eq!(decoded.parameters.angle_increment, 0.5);
        assert_eq!(decoded.parameters.number_of_circles, 2);
        assert!(decoded.display.reverse);
    }

    #[test]
    fn test_counts() {
        assert_eq!(decode("circles=12.9").parameters.number_of_circles, 12);
        assert_eq!(decode("circles=0").parameters.number_of_circles, 0);
        let defaults = SharedState::default().parameters.number_of_circles;
        assert_eq!(decode("circles=-3").parameters.number_of_circles, defaults);
    }

    #[test]
    fn test_reverse_flag() {
        assert!(decode("reverse=1").display.reverse);
        assert!(decode("reverse=true").display.reverse);
        assert!(decode("reverse").display.reverse);
        assert!(!decode("reverse=0").display.reverse);
        assert!(!decode("circles=4").display.reverse);
    }

    #[test]
    fn test_percent_escapes() {
        assert_eq!(decode("radius=%2D4.5").parameters.starting_radius, -4.5);
        assert_eq!(decode("offset=+2.5").parameters.offset_distance, 2.5);
        assert_eq!(
            query_pairs("?a+b=%20c&50%&%zz=1"),
            vec![
                ("a b".to_string(), " c".to_string()),
                ("50%".to_string(), String::new()),
                ("%zz".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_encoded_values_are_escaped() {
        let params = SpiralParameters::new(1, -2.5, f64::NAN, 0.0, 0.0);
        let query = encode(&params, &DisplayOptions::default());
        assert!(query.contains("radius=-2.5&increment=NaN&"));
        assert!(decode(&query).parameters.radius_increment.is_nan());
    }

    #[test]
    fn test_non_finite_values_survive() {
        let params = SpiralParameters::new(2, f64::INFINITY, 1.0, 1.0, 1.0);
        let decoded = decode(&encode(&params, &DisplayOptions::default()));
        assert_eq!(decoded.parameters.starting_radius, f64::INFINITY);
    }
}
