//! Standalone SVG export
//!
//! The exported document carries its own CSS keyframes and a click handler,
//! so it keeps spinning (and can be reversed) when opened on its own.

use std::path::Path;
use svg::node::element::{Circle, Group, Script, Style};
use svg::Document;
use tracing::info;

use crate::display::DisplayOptions;
use crate::error::DemisphereError;
use crate::spiral::{generate, SpiralParameters};

pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
const SVG_NS: &str = "http://www.w3.org/2000/svg";
const FILENAME_SUFFIX: &str = "-demisphere.svg";

const TOGGLE_SCRIPT: &str = "
    function toggleDirection() {
      const group = document.querySelector('.rotary-group');
      group.classList.toggle('reverse');
    }
  ";

/// Canvas size and drawing options for an exported document
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportOptions {
    pub width: u32,
    pub height: u32,
    pub display: DisplayOptions,
}

impl Default for ExportOptions {
    /// Download size
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            display: DisplayOptions::default(),
        }
    }
}

impl ExportOptions {
    /// Smaller canvas used for quick previews
    pub fn preview() -> Self {
        Self {
            width: 800,
            height: 600,
            ..Self::default()
        }
    }

    pub fn with_size(self, width: u32, height: u32) -> Self {
        Self { width, height, ..self }
    }

    pub fn with_display(self, display: DisplayOptions) -> Self {
        Self { display, ..self }
    }
}

fn stylesheet(display: &DisplayOptions) -> String {
    let period = display.animation_period_secs();
    format!(
        "
    .rotary-group {{
      animation: rotate-forward {period}s infinite linear;
      transform-origin: 0 0;
    }}
    .rotary-group.reverse {{
      animation: rotate-reverse {period}s infinite linear;
    }}
    @keyframes rotate-forward {{
      from {{ transform: rotate(0deg); }}
      to {{ transform: rotate(360deg); }}
    }}
    @keyframes rotate-reverse {{
      from {{ transform: rotate(360deg); }}
      to {{ transform: rotate(0deg); }}
    }}
    .circle {{
      fill: none;
      stroke: black;
      stroke-width: {stroke};
    }}
  ",
        stroke = display.stroke_width,
    )
}

/// Class list of the rotating group. Reversed exports start spinning the
/// other way; clicking still toggles.
pub fn group_class(display: &DisplayOptions) -> &'static str {
    if display.reverse {
        "rotary-group reverse"
    } else {
        "rotary-group"
    }
}

/// Build the SVG element tree.
pub fn svg_element(parameters: &SpiralParameters, options: &ExportOptions) -> Document {
    let (w, h) = (options.width as f64, options.height as f64);

    let group = generate(parameters).into_iter().fold(
        Group::new().set("class", group_class(&options.display)),
        |group, c| {
            group.add(
                Circle::new()
                    .set("class", "circle")
                    .set("cx", c.center_x)
                    .set("cy", c.center_y)
                    .set("r", c.radius),
            )
        },
    );

    Document::new()
        .set("xmlns", SVG_NS)
        .set("width", options.width)
        .set("height", options.height)
        .set("viewBox", (-w / 2.0, -h / 2.0, w, h))
        .set("style", "background: white; cursor: pointer;")
        .set("onclick", "toggleDirection()")
        .add(Style::new(stylesheet(&options.display)))
        .add(Script::new(TOGGLE_SCRIPT))
        .add(group)
}

/// Serialize the spiral to a complete SVG document, declaration included.
pub fn svg_document(parameters: &SpiralParameters, options: &ExportOptions) -> String {
    format!("{}\n{}\n", XML_DECLARATION, svg_element(parameters, options))
}

/// `"Classic Duchamp Spiral"` becomes `"classic-duchamp-spiral-demisphere.svg"`.
/// Each run of whitespace collapses into one hyphen.
pub fn export_filename(preset_name: &str) -> String {
    let mut stem = String::with_capacity(preset_name.len());
    let mut in_space = false;
    for ch in preset_name.to_lowercase().chars() {
        if ch.is_whitespace() {
            if !in_space {
                stem.push('-');
            }
            in_space = true;
        } else {
            stem.push(ch);
            in_space = false;
        }
    }
    stem.push_str(FILENAME_SUFFIX);
    stem
}

pub fn write_svg(path: &Path, contents: &str) -> Result<(), DemisphereError> {
    std::fs::write(path, contents).map_err(|source| DemisphereError::Export {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}
