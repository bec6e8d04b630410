use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::color::ColorScheme;
use crate::display::{DisplayOptions, DEFAULT_PERIOD_MS, DEFAULT_STROKE_WIDTH};
use crate::error::DemisphereError;
use crate::share::{self, SharedState};
use crate::spiral::PresetCatalog;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub spiral: SpiralConfig,
    pub display: DisplayConfig,
    pub view: ViewConfig,
    pub export: ExportConfig,
}

/// Starting geometry: a preset, optionally with individual fields replaced
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpiralConfig {
    pub preset: String,
    pub number_of_circles: Option<usize>,
    pub starting_radius: Option<f64>,
    pub radius_increment: Option<f64>,
    pub offset_distance: Option<f64>,
    pub angle_increment: Option<f64>,
}

impl Default for SpiralConfig {
    fn default() -> Self {
        Self {
            preset: "Divine Proportion".to_string(),
            number_of_circles: None,
            starting_radius: None,
            radius_increment: None,
            offset_distance: None,
            angle_increment: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub reverse: bool,
    pub stroke_width: f64,
    pub animation_period_ms: f64,
    pub color_scheme: ColorScheme,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            reverse: false,
            stroke_width: DEFAULT_STROKE_WIDTH,
            animation_period_ms: DEFAULT_PERIOD_MS,
            color_scheme: ColorScheme::default(),
        }
    }
}

/// Terminal view settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewConfig {
    /// Grid dots per scene unit
    pub zoom: f64,
    pub fps: u32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self { zoom: 0.5, fps: 60 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExportConfig {
    pub width: u32,
    pub height: u32,
    /// Where exports land when no output path is given (working directory if unset)
    pub directory: Option<PathBuf>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            directory: None,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, DemisphereError> {
        let content = std::fs::read_to_string(path).map_err(|source| DemisphereError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| DemisphereError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Get the default XDG config path (~/.config/demisphere/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("demisphere").join("config.toml"))
    }

    /// Load config from the default XDG path if it exists
    /// Returns None if file doesn't exist, logs warning on parse errors
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if path.exists() {
            match Self::load(&path) {
                Ok(config) => Some(config),
                Err(e) => {
                    warn!("{}; using defaults", e);
                    None
                }
            }
        } else {
            None
        }
    }

    /// Initialize default config file at XDG path, returns the path
    pub fn init_default_config() -> Result<PathBuf> {
        let path = Self::default_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&path, Self::generate_config_template())?;

        Ok(path)
    }

    /// Generate a commented TOML config template
    pub fn generate_config_template() -> String {
        r#"# Demisphere Configuration
# This file is auto-generated. Edit as needed.

[spiral]
# Starting preset (run `demisphere presets` for the list, empty for the first one)
preset = "Divine Proportion"
# Replace individual preset values:
# number_of_circles = 12
# starting_radius = 25.0
# radius_increment = 20.0
# offset_distance = 7.5
# angle_increment = 1.0471975511965976   # radians

[display]
# Start rotating in reverse
reverse = false
# Circle stroke width
stroke_width = 1.0
# Milliseconds per full turn
animation_period_ms = 2000.0
# Terminal tint: "spectrum", "rainbow", "fire", "ocean", "forest", "purple", "monochrome"
color_scheme = "monochrome"

[view]
# Terminal dots per scene unit
zoom = 0.5
# Redraw rate of the terminal view
fps = 60

[export]
# Exported SVG canvas size
width = 1920
height = 1080
# Directory for exported files (defaults to the working directory)
# directory = "~/Pictures"
"#
        .to_string()
    }

    /// Merge the non-geometry CLI arguments into config (CLI takes priority)
    pub fn merge_args(&mut self, args: &crate::SpiralArgs) {
        if let Some(ref colors) = args.colors {
            self.display.color_scheme = colors.parse().unwrap_or(self.display.color_scheme);
        }
        if let Some(zoom) = args.zoom {
            if zoom.is_finite() && zoom > 0.0 {
                self.view.zoom = zoom;
            } else {
                warn!("Ignoring zoom {}: must be a positive number", zoom);
            }
        }
    }

    /// Layer the starting state: config file, then a preset, then a shared
    /// query string, then explicit flags. A preset named on the command line
    /// discards the geometry overrides from the file.
    pub fn resolve(
        &self,
        catalog: &PresetCatalog,
        args: &crate::SpiralArgs,
    ) -> Result<SharedState, DemisphereError> {
        let preset_name = args.preset.as_deref().unwrap_or(&self.spiral.preset).trim();
        let preset = if preset_name.is_empty() {
            catalog.default_preset()
        } else {
            catalog.find(preset_name)
        }
        .ok_or_else(|| DemisphereError::UnknownPreset(preset_name.to_string()))?;

        let mut parameters = preset.parameters;
        if args.preset.is_none() {
            let s = &self.spiral;
            if let Some(n) = s.number_of_circles {
                parameters = parameters.with_number_of_circles(n);
            }
            if let Some(r) = s.starting_radius {
                parameters = parameters.with_starting_radius(r);
            }
            if let Some(r) = s.radius_increment {
                parameters = parameters.with_radius_increment(r);
            }
            if let Some(d) = s.offset_distance {
                parameters = parameters.with_offset_distance(d);
            }
            if let Some(a) = s.angle_increment {
                parameters = parameters.with_angle_increment(a);
            }
        }

        let display = DisplayOptions {
            reverse: self.display.reverse,
            stroke_width: self.display.stroke_width,
            animation_period_ms: self.display.animation_period_ms,
        };

        let mut state = SharedState::new(parameters, display);
        if let Some(ref query) = args.query {
            state = share::decode_with_defaults(query, state);
        }

        Ok(apply_flags(state, args))
    }
}

fn apply_flags(state: SharedState, args: &crate::SpiralArgs) -> SharedState {
    let mut p = state.parameters;
    let mut d = state.display;
    if let Some(n) = args.circles {
        p = p.with_number_of_circles(n);
    }
    if let Some(r) = args.radius {
        p = p.with_starting_radius(r);
    }
    if let Some(r) = args.increment {
        p = p.with_radius_increment(r);
    }
    if let Some(o) = args.offset {
        p = p.with_offset_distance(o);
    }
    if let Some(a) = args.angle {
        p = p.with_angle_increment(a);
    }
    if let Some(s) = args.stroke {
        d = d.with_stroke_width(s);
    }
    if let Some(s) = args.speed {
        d = d.with_animation_period_ms(s);
    }
    if args.reverse {
        d.reverse = true;
    }
    SharedState::new(p, d)
}
