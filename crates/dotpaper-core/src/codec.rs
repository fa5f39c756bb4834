//! Save format: an SVG whose leading comment carries the drawing as JSON.
//!
//! The SVG body renders in any viewer; only the header is read back.

use crate::line::Line;
use crate::state::{InvalidState, PartialState, State};
use thiserror::Error;

const HEADER_OPEN: &str = "<!--";
const HEADER_CLOSE: &str = "-->";

/// Errors reading or writing save data.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("No drawing header found")]
    MissingHeader,
    #[error("Malformed drawing header: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid drawing: {0}")]
    Invalid(#[from] InvalidState),
}

/// Render `state` as a self-describing SVG document.
pub fn serialize(state: &State) -> Result<String, CodecError> {
    let header = serde_json::to_string(&PartialState::drawing(state))?;
    let camera = &state.camera;

    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n");
    out.push_str(&format!("{HEADER_OPEN} {header} {HEADER_CLOSE}\n"));
    out.push_str("<svg width=\"100%\" height=\"100%\" xmlns=\"http://www.w3.org/2000/svg\">\n");
    out.push_str(&format!(
        "<g id=\"lines\" transform=\"translate({} {}) scale({} {})\">\n",
        camera.translation.x, camera.translation.y, camera.scale.x, camera.scale.y
    ));
    for line in &state.lines {
        out.push_str(&svg_line(line));
    }
    out.push_str("</g>\n</svg>\n");
    Ok(out)
}

fn svg_line(line: &Line) -> String {
    format!(
        "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"{}\" stroke-dasharray=\"{}\"/>\n",
        line.start.x,
        line.start.y,
        line.end.x,
        line.end.y,
        line.style.stroke.to_hex(),
        line.style.stroke_width,
        line.style.dash,
    )
}

/// Read the drawing back out of a saved document, validated.
pub fn deserialize(text: &str) -> Result<PartialState, CodecError> {
    let start = text.find(HEADER_OPEN).ok_or(CodecError::MissingHeader)?;
    let rest = &text[start + HEADER_OPEN.len()..];
    let end = rest.find(HEADER_CLOSE).ok_or(CodecError::MissingHeader)?;

    let partial: PartialState = serde_json::from_str(rest[..end].trim())?;
    partial.validate()?;
    Ok(partial)
}

/// File name for a download: the trimmed name with an `.svg` extension.
pub fn file_name(name: &str) -> String {
    let name = name.trim();
    let name = if name.is_empty() { "dotpaper" } else { name };
    if name.to_ascii_lowercase().ends_with(".svg") {
        name.to_string()
    } else {
        format!("{name}.svg")
    }
}
