//! # Layout Engine
//!
//! Walks an exam paper top to bottom and places every line at an explicit
//! position on a fixed-size page.
//!
//! The walk order is fixed: sections in array order, their questions in
//! array order, each question's parts in array order, and within a part the
//! label block, then sub-parts, then options, then the diagram placeholder.
//! Nothing is reordered or sorted, whatever the `number` fields say.
//!
//! Each block renderer (see `blocks`) asks [`page_break::decide_break`]
//! for room before it draws, then advances the cursor by what it used plus
//! a fixed gap. Pages after the first always open with the running header.
//!
//! Output is a [`PaperLayout`]: pages of positioned draw commands plus the
//! log of break events. It serializes to JSON for inspection.

mod blocks;
pub mod page_break;

use crate::config::{PageGeometry, PaperConfig};
use crate::error::PaperError;
use crate::font::FontContext;
use crate::model::ExamPaper;
use crate::style::{TextAlign, TextStyle};
use crate::text::TextLayout;
use blocks::Blocks;
use page_break::{BreakEvent, Cursor};
use serde::Serialize;

/// The kind of document block an element was drawn for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BlockKind {
    FirstPageHeader,
    Instruction,
    RunningHeader,
    SectionHeading,
    Question,
    Part,
    SubPart,
    OptionLine,
    Diagram,
}

/// What to draw for one element. Coordinates live on the element.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum DrawCommand {
    /// One line of text. The element's `x` is the left edge after alignment
    /// and `y` the baseline.
    Text {
        text: String,
        style: TextStyle,
        align: TextAlign,
    },
    /// Horizontal rule from `(x, y)` to `(x + width, y)`.
    Rule { line_width: f64 },
    /// Stroked rectangle with top-left `(x, y)`.
    Rect { line_width: f64 },
}

/// A positioned element on a page. Millimetres, origin top-left.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutElement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub kind: BlockKind,
    pub draw: DrawCommand,
}

impl LayoutElement {
    /// The text of a text element.
    pub fn text(&self) -> Option<&str> {
        match &self.draw {
            DrawCommand::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// A finished page.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutPage {
    /// 1-based page number.
    pub number: usize,
    pub width: f64,
    pub height: f64,
    pub elements: Vec<LayoutElement>,
}

impl LayoutPage {
    fn new(number: usize, geometry: &PageGeometry) -> Self {
        Self {
            number,
            width: geometry.page_width,
            height: geometry.page_height,
            elements: Vec::new(),
        }
    }

    /// Text lines drawn for one block kind, in drawing order.
    pub fn texts(&self, kind: BlockKind) -> impl Iterator<Item = &LayoutElement> {
        self.elements
            .iter()
            .filter(move |e| e.kind == kind && e.text().is_some())
    }
}

/// Result of one layout pass.
#[derive(Debug, Clone, Serialize)]
pub struct PaperLayout {
    pub pages: Vec<LayoutPage>,
    /// Every page break in order; always one fewer than the pages.
    pub breaks: Vec<BreakEvent>,
}

impl PaperLayout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn to_json(&self) -> Result<String, PaperError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Pages being filled plus the cursor on the last one.
#[derive(Debug)]
pub(crate) struct PageStack {
    pub(crate) cursor: Cursor,
    pages: Vec<LayoutPage>,
    breaks: Vec<BreakEvent>,
}

impl PageStack {
    pub(crate) fn new(geometry: PageGeometry) -> Self {
        Self {
            pages: vec![LayoutPage::new(1, &geometry)],
            cursor: Cursor::new(geometry),
            breaks: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, element: LayoutElement) {
        if let Some(page) = self.pages.last_mut() {
            page.elements.push(element);
        }
    }

    /// Finish the current page and open the next, body at `resume_y`.
    pub(crate) fn add_page(&mut self, resume_y: f64, cause: BlockKind, needed: f64) {
        let event = BreakEvent {
            page: self.cursor.page() + 1,
            cause,
            cursor_y: self.cursor.y(),
            needed,
        };
        log::debug!(
            "page break -> page {} ({:?} needed {:.1}mm at y={:.1})",
            event.page,
            event.cause,
            event.needed,
            event.cursor_y
        );
        self.cursor.next_page(resume_y);
        let page = LayoutPage::new(self.cursor.page(), self.cursor.geometry());
        self.pages.push(page);
        self.breaks.push(event);
    }

    pub(crate) fn current_page(&self) -> usize {
        self.cursor.page()
    }

    pub(crate) fn finish(self) -> PaperLayout {
        PaperLayout {
            pages: self.pages,
            breaks: self.breaks,
        }
    }
}

/// Lays out exam papers with one configuration and font family.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    config: PaperConfig,
    font_context: FontContext,
    text_layout: TextLayout,
}

impl LayoutEngine {
    /// Validates the config and resolves the font family. Fails before any
    /// layout happens; there is no partial output.
    pub fn new(config: PaperConfig) -> Result<Self, PaperError> {
        config.validate()?;
        let font_context = FontContext::new(&config.font_family)?;
        Ok(Self {
            config,
            font_context,
            text_layout: TextLayout::new(),
        })
    }

    pub fn config(&self) -> &PaperConfig {
        &self.config
    }

    pub fn font_context(&self) -> &FontContext {
        &self.font_context
    }

    /// Main entry point: lay out a paper into pages.
    ///
    /// Each call starts from a fresh cursor on page 1; nothing carries over
    /// between calls.
    pub fn layout(&self, paper: &ExamPaper) -> PaperLayout {
        let blocks = Blocks {
            config: &self.config,
            fonts: &self.font_context,
            text: &self.text_layout,
            header_code: paper.header_code(),
        };
        let mut stack = PageStack::new(self.config.geometry);

        blocks.first_page_header(&mut stack, paper);

        for (index, section) in paper.sections.iter().enumerate() {
            blocks.section_heading(&mut stack, section, index == 0);
            for question in &section.questions {
                blocks.question(&mut stack, question);
            }
        }

        stack.finish()
    }
}
