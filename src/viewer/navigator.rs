//! Page navigation over a rendered paper.
//!
//! Position 0 is the cover; pages are 1..=N. Double view shows a spread of
//! two pages and steps by two.

pub const MIN_ZOOM: f64 = 0.6;
pub const MAX_ZOOM: f64 = 2.0;
pub const ZOOM_STEP: f64 = 0.15;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    Single,
    #[default]
    Double,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Navigator {
    page_count: usize,
    current: usize,
    mode: ViewMode,
    zoom: f64,
}

impl Navigator {
    /// Starts on the cover in double view at 100%.
    pub fn new(page_count: usize) -> Self {
        Self {
            page_count,
            current: 0,
            mode: ViewMode::default(),
            zoom: 1.0,
        }
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// 0 for the cover.
    pub fn current(&self) -> usize {
        self.current
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    fn step(&self) -> usize {
        match self.mode {
            ViewMode::Single => 1,
            ViewMode::Double => 2,
        }
    }

    /// Forward one page or spread. A step that would run past the last page
    /// is refused, so double view from the cover lands on page 2; use
    /// [`go_to`] to open page 1.
    ///
    /// [`go_to`]: Navigator::go_to
    pub fn next(&mut self) -> bool {
        let target = self.current + self.step();
        if target > self.page_count {
            return false;
        }
        self.current = target;
        true
    }

    /// Back one page or spread. A step that would pass page 1 is refused;
    /// use [`home`] for the cover.
    ///
    /// [`home`]: Navigator::home
    pub fn prev(&mut self) -> bool {
        match self.current.checked_sub(self.step()) {
            Some(target) if target >= 1 => {
                self.current = target;
                true
            }
            _ => false,
        }
    }

    pub fn home(&mut self) {
        self.current = 0;
    }

    pub fn end(&mut self) {
        self.current = self.page_count;
    }

    /// Jump to a page, clamped to the document.
    pub fn go_to(&mut self, page: usize) {
        self.current = page.min(self.page_count);
    }

    pub fn set_mode(&mut self, mode: ViewMode) {
        self.mode = mode;
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            ViewMode::Single => ViewMode::Double,
            ViewMode::Double => ViewMode::Single,
        };
    }

    pub fn zoom_in(&mut self) {
        self.zoom = round_zoom((self.zoom + ZOOM_STEP).min(MAX_ZOOM));
    }

    pub fn zoom_out(&mut self) {
        self.zoom = round_zoom((self.zoom - ZOOM_STEP).max(MIN_ZOOM));
    }

    pub fn can_zoom_in(&self) -> bool {
        self.zoom < MAX_ZOOM
    }

    pub fn can_zoom_out(&self) -> bool {
        self.zoom > MIN_ZOOM
    }

    /// Zoom as a whole percentage, e.g. 115.
    pub fn zoom_percent(&self) -> u32 {
        (self.zoom * 100.0).round() as u32
    }

    /// Pages on screen right now; empty on the cover.
    pub fn visible_pages(&self) -> Vec<usize> {
        if self.current == 0 {
            return Vec::new();
        }
        let mut pages = vec![self.current];
        if self.mode == ViewMode::Double && self.current < self.page_count {
            pages.push(self.current + 1);
        }
        pages
    }

    /// "Cover", "3 / 9" or "3-4 / 9".
    pub fn indicator(&self) -> String {
        match self.visible_pages().as_slice() {
            [] => "Cover".to_string(),
            [left, right] => format!("{}-{} / {}", left, right, self.page_count),
            [page, ..] => format!("{} / {}", page, self.page_count),
        }
    }
}

fn round_zoom(zoom: f64) -> f64 {
    (zoom * 100.0).round() / 100.0
}
