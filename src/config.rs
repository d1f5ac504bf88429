//! # Paper Configuration
//!
//! Page geometry and the fixed boilerplate printed on page 1. Every field has
//! a default matching the A4 exam layout, so an empty JSON object (or no
//! config file at all) yields the standard paper.

use crate::error::PaperError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The tallest fixed-height block (diagram placeholder). A fresh page must
/// have at least this much body space or layout cannot make progress.
pub const MIN_BODY_SPACE: f64 = 30.0;

/// Page geometry in millimetres, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageGeometry {
    pub page_width: f64,
    pub page_height: f64,
    /// Top, left and bottom margin.
    pub margin: f64,
    /// Content width starting at the left margin.
    pub max_width: f64,
    /// Baseline of the running header on pages after the first.
    pub header_y: f64,
    /// Where body content resumes below a running header.
    pub body_resume_y: f64,
    pub line_height: f64,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            page_width: 210.0,
            page_height: 297.0,
            margin: 20.0,
            max_width: 170.0,
            header_y: 15.0,
            body_resume_y: 25.0,
            line_height: 5.0,
        }
    }
}

impl PageGeometry {
    /// The lowest y any content may reach.
    pub fn bottom_limit(&self) -> f64 {
        self.page_height - self.margin
    }

    /// Right edge of the content box, used for right-aligned marks.
    pub fn content_right(&self) -> f64 {
        self.margin + self.max_width
    }

    pub fn center_x(&self) -> f64 {
        self.page_width / 2.0
    }
}

/// Everything about a paper's appearance that isn't in the exam document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaperConfig {
    pub geometry: PageGeometry,
    /// "Times", "Helvetica" or "Courier".
    pub font_family: String,
    /// First line of page 1. `{{totalPages}}` is filled in at write time.
    pub print_notice: String,
    pub copyright: String,
    /// Page-1 instructions in order. Empty strings are spacing entries.
    pub instructions: Vec<String>,
    pub compulsory_note: String,
    pub marks_note: String,
    pub continuation_marker: String,
}

impl Default for PaperConfig {
    fn default() -> Self {
        Self {
            geometry: PageGeometry::default(),
            font_family: "Times".to_string(),
            print_notice: "This Paper consists of {{totalPages}} printed pages.".to_string(),
            copyright: "\u{00A9} Copyright reserved.".to_string(),
            instructions: vec![
                "Answers to this Paper must be written on the paper provided separately.".to_string(),
                String::new(),
                "You will not be allowed to write during the first 15 minutes.".to_string(),
                "This time is to be spent in reading the question paper.".to_string(),
                "The time given at the head of this Paper is the time allowed for writing the answers."
                    .to_string(),
                String::new(),
            ],
            compulsory_note: "Section A is compulsory. Attempt any four questions from Section B."
                .to_string(),
            marks_note:
                "The intended marks for questions or parts of questions are given in brackets [ ]."
                    .to_string(),
            continuation_marker: "Turn Over".to_string(),
        }
    }
}

impl PaperConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, PaperError> {
        let config: PaperConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PaperError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Reject geometry the layout engine cannot make progress on.
    pub fn validate(&self) -> Result<(), PaperError> {
        let g = &self.geometry;
        let sizes = [
            ("page_width", g.page_width),
            ("page_height", g.page_height),
            ("margin", g.margin),
            ("max_width", g.max_width),
            ("header_y", g.header_y),
            ("body_resume_y", g.body_resume_y),
            ("line_height", g.line_height),
        ];
        for (name, value) in sizes {
            if !value.is_finite() || value <= 0.0 {
                return Err(PaperError::Config(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }

        if g.content_right() > g.page_width {
            return Err(PaperError::Config(format!(
                "margin + max_width ({}) exceeds page_width ({})",
                g.content_right(),
                g.page_width
            )));
        }
        if g.header_y >= g.body_resume_y {
            return Err(PaperError::Config(format!(
                "header_y ({}) must be above body_resume_y ({})",
                g.header_y, g.body_resume_y
            )));
        }

        let top = g.margin.max(g.body_resume_y);
        if g.bottom_limit() - top < MIN_BODY_SPACE.max(g.line_height) {
            return Err(PaperError::Config(format!(
                "page body between {top} and the bottom limit {} is too short; need at least {MIN_BODY_SPACE}",
                g.bottom_limit()
            )));
        }
        Ok(())
    }
}
