//! # Doclin Paper
//!
//! Page-native exam paper layout.
//!
//! A question paper is laid out straight into fixed A4 pages. Every block
//! (section heading, question, part, sub-part, option, diagram) measures
//! itself before it is drawn and asks the cursor whether it still fits on
//! the current page. When it doesn't, the page is closed, a running header
//! is printed on the next one and the block lands below it. Nothing is
//! sliced after the fact.
//!
//! ## Architecture
//!
//! ```text
//! Input (JSON/API)
//!       ↓
//!   [model]    : ExamPaper, sections, questions, prepared parts
//!       ↓
//!   [layout]   : Cursor, page-break decisions, block renderers
//!       ↓
//!   [pdf]      : Serialize to PDF bytes
//!       ↓
//!   [viewer]   : Artifact, display handles, page navigation
//! ```

pub mod config;
pub mod error;
pub mod font;
pub mod layout;
pub mod model;
pub mod pdf;
pub mod style;
pub mod text;
pub mod viewer;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use config::{PageGeometry, PaperConfig};
pub use error::PaperError;
pub use layout::{LayoutEngine, PaperLayout};
pub use model::ExamPaper;
pub use viewer::{DisplayHandle, Navigator, PaperArtifact, ViewMode, ViewerSession};

/// Render an exam paper to PDF bytes with the default configuration.
///
/// This is the primary entry point.
pub fn render(paper: &ExamPaper) -> Result<Vec<u8>, PaperError> {
    render_with_config(paper, PaperConfig::default())
}

/// Render an exam paper with a custom page geometry, font or first-page text.
pub fn render_with_config(paper: &ExamPaper, config: PaperConfig) -> Result<Vec<u8>, PaperError> {
    Ok(render_artifact(paper, config)?.bytes)
}

/// Render an exam paper described as JSON (nested API shape or flat).
pub fn render_json(json: &str) -> Result<Vec<u8>, PaperError> {
    let paper = ExamPaper::from_json(json)?;
    render(&paper)
}

/// Render and keep the download name and page-break log alongside the bytes.
pub fn render_artifact(paper: &ExamPaper, config: PaperConfig) -> Result<PaperArtifact, PaperError> {
    let engine = LayoutEngine::new(config)?;
    Ok(PaperArtifact::render(&engine, paper))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_json_produces_pdf() {
        let bytes = render_json(r#"{"exam": {"subject": "Physics"}, "sections": []}"#).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.7"));
        assert!(bytes.ends_with(b"%%EOF\n"));
    }

    #[test]
    fn bad_json_is_a_parse_error() {
        assert!(matches!(render_json("{"), Err(PaperError::Parse { .. })));
    }

    #[test]
    fn unknown_font_fails_before_layout() {
        let config = PaperConfig {
            font_family: "Comic Sans".to_string(),
            ..PaperConfig::default()
        };
        let err = render_with_config(&ExamPaper::default(), config).unwrap_err();
        assert!(matches!(err, PaperError::Font(_)));
    }
}
