//! # Viewer
//!
//! The consumer side of a layout pass: the finished artifact, the display
//! handles a front end uses to show it, and page navigation.
//!
//! A [`ViewerSession`] owns every handle it has handed out. Generating a new
//! paper revokes the previous handle first, and closing (or dropping) the
//! session revokes the rest, so repeated generations never leak artifacts.

mod navigator;

pub use navigator::{Navigator, ViewMode};

use crate::error::PaperError;
use crate::layout::page_break::BreakEvent;
use crate::layout::LayoutEngine;
use crate::model::ExamPaper;
use crate::pdf::{DocumentInfo, PdfWriter};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// One rendered exam paper.
#[derive(Debug, Clone)]
pub struct PaperArtifact {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    /// Download name, `<subject>_<year>_Paper.pdf`.
    pub file_name: String,
    pub breaks: Vec<BreakEvent>,
}

impl PaperArtifact {
    /// Lay out and serialize one paper. A fresh cursor every time.
    pub fn render(engine: &LayoutEngine, paper: &ExamPaper) -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        let started = std::time::Instant::now();

        let layout = engine.layout(paper);
        let info = DocumentInfo::from_meta(&paper.meta);
        let bytes = PdfWriter::new().write(&layout.pages, &info, engine.font_context());

        #[cfg(not(target_arch = "wasm32"))]
        log::info!(
            "Rendered {} pages, {} page breaks ({} bytes) in {:.1}ms",
            layout.page_count(),
            layout.breaks.len(),
            bytes.len(),
            started.elapsed().as_secs_f64() * 1000.0
        );
        #[cfg(target_arch = "wasm32")]
        log::info!(
            "Rendered {} pages, {} page breaks ({} bytes)",
            layout.page_count(),
            layout.breaks.len(),
            bytes.len()
        );

        Self {
            page_count: layout.page_count(),
            file_name: paper.file_name(),
            breaks: layout.breaks,
            bytes,
        }
    }

    /// Write the PDF into `dir` under its download name.
    pub fn write_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf, PaperError> {
        let path = dir.as_ref().join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

/// A revocable reference to a displayed artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DisplayHandle {
    id: u64,
}

impl DisplayHandle {
    fn fresh() -> Self {
        Self {
            id: NEXT_HANDLE.fetch_add(1, Ordering::Relaxed),
        }
    }
}

impl fmt::Display for DisplayHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "blob:doclin/{}", self.id)
    }
}

/// Generates papers and tracks the handles shown to the user.
///
/// Only one layout pass runs at a time: `generate` takes `&mut self`.
#[derive(Debug)]
pub struct ViewerSession {
    engine: LayoutEngine,
    live: HashMap<DisplayHandle, PaperArtifact>,
    current: Option<DisplayHandle>,
}

impl ViewerSession {
    pub fn new(engine: LayoutEngine) -> Self {
        Self {
            engine,
            live: HashMap::new(),
            current: None,
        }
    }

    /// Discard the current artifact, render `paper` and publish it under a
    /// new handle.
    pub fn generate(&mut self, paper: &ExamPaper) -> DisplayHandle {
        if let Some(previous) = self.current.take() {
            self.revoke(&previous);
        }
        let artifact = PaperArtifact::render(&self.engine, paper);
        let handle = DisplayHandle::fresh();
        log::debug!("publishing {} ({} pages)", handle, artifact.page_count);
        self.live.insert(handle.clone(), artifact);
        self.current = Some(handle.clone());
        handle
    }

    /// Parse and generate in one step.
    pub fn generate_json(&mut self, json: &str) -> Result<DisplayHandle, PaperError> {
        let paper = ExamPaper::from_json(json)?;
        Ok(self.generate(&paper))
    }

    /// The artifact behind a handle, or `None` once it has been revoked.
    pub fn resolve(&self, handle: &DisplayHandle) -> Option<&PaperArtifact> {
        self.live.get(handle)
    }

    pub fn current(&self) -> Option<&DisplayHandle> {
        self.current.as_ref()
    }

    /// Release one handle. Returns false if it was already gone.
    pub fn revoke(&mut self, handle: &DisplayHandle) -> bool {
        if self.current.as_ref() == Some(handle) {
            self.current = None;
        }
        let removed = self.live.remove(handle).is_some();
        if removed {
            log::debug!("revoked {}", handle);
        }
        removed
    }

    pub fn live_handles(&self) -> usize {
        self.live.len()
    }

    /// Release every handle.
    pub fn close(&mut self) {
        let handles: Vec<DisplayHandle> = self.live.keys().cloned().collect();
        for handle in handles {
            self.revoke(&handle);
        }
    }

    /// A navigator sized to the current artifact.
    pub fn navigator(&self) -> Option<Navigator> {
        let handle = self.current.as_ref()?;
        self.live.get(handle).map(|a| Navigator::new(a.page_count))
    }
}

impl Drop for ViewerSession {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PaperConfig;

    fn session() -> ViewerSession {
        ViewerSession::new(LayoutEngine::new(PaperConfig::default()).unwrap())
    }

    #[test]
    fn regenerating_revokes_previous_handle() {
        let mut session = session();
        let first = session
            .generate_json(r#"{"subject": "Physics", "year": 2023}"#)
            .unwrap();
        assert!(session.resolve(&first).is_some());

        let second = session
            .generate_json(r#"{"subject": "Chemistry", "year": 2024}"#)
            .unwrap();
        assert_ne!(first, second);
        assert!(session.resolve(&first).is_none());
        let artifact = session.resolve(&second).unwrap();
        assert_eq!(artifact.file_name, "Chemistry_2024_Paper.pdf");
        assert_eq!(session.live_handles(), 1);
    }

    #[test]
    fn close_revokes_everything() {
        let mut session = session();
        let handle = session.generate(&ExamPaper::default());
        session.close();
        assert!(session.resolve(&handle).is_none());
        assert!(session.current().is_none());
        assert_eq!(session.live_handles(), 0);
        assert!(!session.revoke(&handle));
    }

    #[test]
    fn parse_failure_keeps_nothing_new() {
        let mut session = session();
        assert!(session.generate_json("{ not json").is_err());
        assert_eq!(session.live_handles(), 0);
    }

    #[test]
    fn handle_display() {
        let handle = DisplayHandle { id: 7 };
        assert_eq!(handle.to_string(), "blob:doclin/7");
    }

    #[test]
    fn navigator_matches_artifact() {
        let mut session = session();
        session.generate(&ExamPaper::default());
        let nav = session.navigator().unwrap();
        assert_eq!(nav.page_count(), 1);
        assert_eq!(nav.indicator(), "Cover");
    }

    #[test]
    fn write_to_uses_download_name() {
        let engine = LayoutEngine::new(PaperConfig::default()).unwrap();
        let paper = ExamPaper::from_json(r#"{"subject": "Biology", "year": 2022}"#).unwrap();
        let artifact = PaperArtifact::render(&engine, &paper);
        let dir = std::env::temp_dir().join(format!("doclin-paper-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = artifact.write_to(&dir).unwrap();
        assert!(path.ends_with("Biology_2022_Paper.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), artifact.bytes);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
