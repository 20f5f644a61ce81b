//! Input data model: recognised text fragments and their quadrilaterals.
//!
//! The recognition collaborator reports each text span as
//! `{"text": "...", "box": [[x,y],[x,y],[x,y],[x,y]]}`. Plain-text input has
//! no box at all; such fragments drive the flat-line path.

use crate::error::CoilScanError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A 2D point `[x, y]` in image coordinates.
pub type Point = [f64; 2];

/// The four corner points of a detected text region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quad(pub [Point; 4]);

impl Quad {
    /// Axis-aligned rectangle from its top-left and bottom-right corners.
    pub fn from_coords(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self([[x1, y1], [x2, y1], [x2, y2], [x1, y2]])
    }

    /// Mean x of the four corners.
    pub fn center_x(&self) -> f64 {
        self.0.iter().map(|p| p[0]).sum::<f64>() / 4.0
    }

    /// Mean y of the four corners.
    pub fn center_y(&self) -> f64 {
        self.0.iter().map(|p| p[1]).sum::<f64>() / 4.0
    }
}

/// One recognised text span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    #[serde(default)]
    pub text: String,
    #[serde(rename = "box", default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Quad>,
}

impl TextFragment {
    pub fn new(text: impl Into<String>, bbox: Quad) -> Self {
        Self {
            text: text.into(),
            bbox: Some(bbox),
        }
    }

    /// A fragment without spatial data (one plain text line).
    pub fn line(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bbox: None,
        }
    }
}

/// Wrap plain text lines as box-less fragments.
pub fn fragments_from_lines<S: AsRef<str>>(lines: &[S]) -> Vec<TextFragment> {
    lines
        .iter()
        .map(|l| TextFragment::line(l.as_ref()))
        .collect()
}

/// Decode the recognition collaborator's JSON fragment list.
pub fn parse_fragments_json(json: &str) -> Result<Vec<TextFragment>, CoilScanError> {
    serde_json::from_str(json).map_err(|e| CoilScanError::InvalidFragments {
        detail: e.to_string(),
    })
}

/// Decide how to read raw input text.
///
/// A JSON array is parsed as fragments; anything else is split into plain
/// lines. Only a document that starts like a JSON array and then fails to
/// decode is an error.
pub fn parse_input(raw: &str) -> Result<Vec<TextFragment>, CoilScanError> {
    let trimmed = raw.trim_start_matches('\u{FEFF}').trim();
    if trimmed.starts_with('[') && trimmed.ends_with(']') {
        return parse_fragments_json(trimmed);
    }
    Ok(raw.lines().map(TextFragment::line).collect())
}

/// Read and parse an input file with [`parse_input`].
pub fn read_input_file(path: &Path) -> Result<Vec<TextFragment>, CoilScanError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CoilScanError::InputRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_input(&raw)
}
