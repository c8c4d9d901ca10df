//! Document viewer: pagination, zoom, and scroll bookkeeping
//!
//! The viewer owns the loaded document handle exclusively; switching
//! documents replaces it wholesale. State transitions live in
//! [`state::ViewerState`]; this module adds the controller that executes
//! render effects (page layout, scroll restoration) against the parsed
//! document.

pub mod document;
pub mod state;
pub mod zoom;

pub use document::{DocumentError, LoadedDocument, Page};
pub use state::{Command, Effect, LoadStatus, ViewerState};
pub use zoom::Zoom;

/// Narrowest column the viewer will wrap page text at
const MIN_WRAP_COLS: u16 = 16;

/// A single renderable row of the continuous page scroll
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Row {
    /// Boundary row before a page, labelled with its number
    Separator { page: usize },
    /// One wrapped line of page text
    Text { page: usize, line: String },
}

/// Pages laid out at a concrete zoom factor and panel width
#[derive(Clone, Debug, Default)]
pub struct PageLayout {
    pub rows: Vec<Row>,
    /// Row index where each page starts (index 0 = page 1)
    pub page_offsets: Vec<usize>,
    /// Wrap width the layout was computed at
    pub wrap_cols: u16,
}

impl PageLayout {
    fn compute(document: &LoadedDocument, zoom: Zoom, area_width: u16) -> Self {
        let scaled = (f32::from(document.native_width) * zoom.factor()).round() as u16;
        let wrap_cols = scaled.clamp(MIN_WRAP_COLS, area_width.max(MIN_WRAP_COLS));

        let mut rows = Vec::new();
        let mut page_offsets = Vec::with_capacity(document.pages.len());

        for page in &document.pages {
            page_offsets.push(rows.len());
            rows.push(Row::Separator { page: page.number });
            for src_line in page.text.lines() {
                if src_line.trim().is_empty() {
                    rows.push(Row::Text {
                        page: page.number,
                        line: String::new(),
                    });
                    continue;
                }
                for wrapped in textwrap::wrap(src_line, wrap_cols as usize) {
                    rows.push(Row::Text {
                        page: page.number,
                        line: wrapped.into_owned(),
                    });
                }
            }
        }

        Self {
            rows,
            page_offsets,
            wrap_cols,
        }
    }

    /// Page visible at the given scroll row (1-based)
    #[must_use]
    pub fn page_at_row(&self, row: usize) -> usize {
        self.page_offsets
            .iter()
            .rposition(|&offset| offset <= row)
            .map_or(1, |idx| idx + 1)
    }
}

/// Controller tying viewer state to the parsed document and scroll position
pub struct Viewer {
    pub state: ViewerState,
    document: Option<LoadedDocument>,
    layout: PageLayout,
    layout_valid: bool,
    layout_width: u16,
    /// Top visible row of the continuous scroll
    pub scroll_row: usize,
    /// Page to bring into view once the next layout pass ran
    pending_scroll: Option<usize>,
}

impl Viewer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: ViewerState::new(),
            document: None,
            layout: PageLayout::default(),
            layout_valid: false,
            layout_width: 0,
            scroll_row: 0,
            pending_scroll: None,
        }
    }

    #[must_use]
    pub fn document(&self) -> Option<&LoadedDocument> {
        self.document.as_ref()
    }

    /// Apply a command; render/scroll effects are executed internally and
    /// fetch effects are returned for the caller to dispatch.
    pub fn apply(&mut self, cmd: Command) -> Option<String> {
        let mut fetch = None;
        for effect in self.state.apply(cmd) {
            match effect {
                Effect::FetchDocument(filename) => {
                    // The handle is dropped before the fetch completes so a
                    // failed load leaves no stale pages behind.
                    self.document = None;
                    self.invalidate_layout();
                    self.scroll_row = 0;
                    fetch = Some(filename);
                }
                Effect::RerenderPages => self.invalidate_layout(),
                Effect::ScrollToPage(page) => self.pending_scroll = Some(page),
            }
        }
        fetch
    }

    /// Install a freshly parsed document
    pub fn document_loaded(&mut self, document: LoadedDocument) {
        let cmd = Command::DocumentLoaded {
            page_count: document.page_count(),
            native_width: document.native_width,
        };
        self.document = Some(document);
        let _ = self.apply(cmd);
    }

    /// Record a failed fetch/parse; the pane shows the message inline
    pub fn load_failed(&mut self, message: impl Into<String>) {
        self.document = None;
        self.invalidate_layout();
        let _ = self.apply(Command::LoadFailed(message.into()));
    }

    fn invalidate_layout(&mut self) {
        self.layout_valid = false;
    }

    /// Recompute the layout if needed and settle pending scrolls.
    /// Called once per draw with the panel's inner dimensions.
    pub fn prepare(&mut self, area_width: u16, viewport_height: usize) {
        if !self.layout_valid || self.layout_width != area_width {
            self.layout = match &self.document {
                Some(doc) => PageLayout::compute(doc, self.state.zoom, area_width),
                None => PageLayout::default(),
            };
            self.layout_valid = true;
            self.layout_width = area_width;
        }

        if let Some(page) = self.pending_scroll.take() {
            if let Some(&offset) = self.layout.page_offsets.get(page.saturating_sub(1)) {
                self.scroll_row = offset;
            }
        }

        let max_scroll = self
            .layout
            .rows
            .len()
            .saturating_sub(viewport_height.max(1));
        self.scroll_row = self.scroll_row.min(max_scroll);
    }

    #[must_use]
    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    /// Manual scroll in rows; keeps the page indicator in sync
    pub fn scroll_by(&mut self, delta: isize) {
        let max_row = self.layout.rows.len().saturating_sub(1);
        let row = if delta.is_negative() {
            self.scroll_row.saturating_sub(delta.unsigned_abs())
        } else {
            self.scroll_row.saturating_add(delta.unsigned_abs())
        };
        self.scroll_row = row.min(max_row);
        let page = self.layout.page_at_row(self.scroll_row);
        self.state.page_scrolled_to(page);
    }
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new()
    }
}
