//! # Page Break Decisions
//!
//! The vertical cursor and the rule for when a block no longer fits.
//!
//! A block asks for the height it needs before drawing anything. If the
//! cursor plus that height would pass the bottom limit (page height minus
//! the bottom margin), the current page is finished and a new one begins.
//! Where the new page's body starts depends on which kind of block asked;
//! see [`BreakAnchor`].

use super::BlockKind;
use crate::config::PageGeometry;
use serde::Serialize;

/// Where body content resumes after a break.
///
/// Every new page gets the running header at `header_y`. Questions, parts
/// and sub-parts continue just below it at `body_resume_y`; instruction
/// lines, options and diagrams continue at the plain top margin instead.
/// Section starts use the question anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BreakAnchor {
    Compact,
    Margin,
    Section,
}

impl BreakAnchor {
    pub fn resume_y(self, geometry: &PageGeometry) -> f64 {
        match self {
            BreakAnchor::Compact | BreakAnchor::Section => geometry.body_resume_y,
            BreakAnchor::Margin => geometry.margin,
        }
    }
}

/// What to do with the next block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakDecision {
    /// It fits (or nothing would be gained by breaking).
    Place,
    /// Finish this page and draw the block on a new one.
    MoveToNextPage,
}

/// One page break, recorded in the order it happened.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakEvent {
    /// Number of the page the break created (1-based).
    pub page: usize,
    /// The block that didn't fit.
    pub cause: BlockKind,
    /// Cursor position on the page that was finished.
    pub cursor_y: f64,
    /// Height the block asked for.
    pub needed: f64,
}

/// The walker's position: current page and vertical offset in millimetres.
#[derive(Debug, Clone)]
pub struct Cursor {
    y: f64,
    page: usize,
    fresh: bool,
    geometry: PageGeometry,
}

impl Cursor {
    /// Page 1, top margin.
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            y: geometry.margin,
            page: 1,
            fresh: true,
            geometry,
        }
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// Current page number, counted by the walker itself.
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn bottom_limit(&self) -> f64 {
        self.geometry.bottom_limit()
    }

    pub fn remaining(&self) -> f64 {
        self.bottom_limit() - self.y
    }

    /// True until anything advances the cursor on this page.
    pub fn is_fresh(&self) -> bool {
        self.fresh
    }

    /// Move down by `dy`, never past the bottom limit.
    pub fn advance(&mut self, dy: f64) {
        if dy > 0.0 {
            self.fresh = false;
        }
        self.y = (self.y + dy).min(self.bottom_limit());
    }

    /// Start the next page with the body at `resume_y`.
    pub fn next_page(&mut self, resume_y: f64) {
        self.page += 1;
        self.y = resume_y;
        self.fresh = true;
    }
}

/// Whether a block of height `needed` would pass the bottom limit.
pub fn should_break(cursor: &Cursor, needed: f64) -> bool {
    cursor.y + needed > cursor.bottom_limit()
}

/// Decide whether the next block goes here or on a new page.
///
/// A fresh page is never abandoned: if the block doesn't fit on an empty
/// body it won't fit on the next one either, and its lines flow instead.
pub fn decide_break(cursor: &Cursor, needed: f64) -> BreakDecision {
    if should_break(cursor, needed) && !cursor.is_fresh() {
        BreakDecision::MoveToNextPage
    } else {
        BreakDecision::Place
    }
}
