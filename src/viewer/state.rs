//! Viewer state management
//!
//! The viewer is a command/effect state machine: UI events become
//! [`Command`]s, the state applies them and returns [`Effect`]s for the
//! controller to execute (fetch a document, re-render pages, scroll).
//! Keeping the transition logic pure makes the ordering rules testable
//! without a terminal or a backend.

use super::zoom::Zoom;

/// Load status of the viewer pane
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum LoadStatus {
    /// No document selected yet
    #[default]
    Empty,
    /// A fetch for the named document is in flight
    Loading(String),
    /// Document parsed and rendered
    Loaded,
    /// Last load failed; terminal until the next explicit load
    Failed(String),
}

/// Current state of the document viewer
#[derive(Clone, Debug, Default)]
pub struct ViewerState {
    /// Filename of the document this state belongs to
    pub filename: Option<String>,
    pub status: LoadStatus,
    /// Current page, 1-based. Meaningless while no document is loaded.
    pub current_page: usize,
    /// Total pages of the loaded document
    pub page_count: usize,
    /// Native width of the first page in columns, used for zoom-to-fit
    pub native_width: u16,
    pub zoom: Zoom,
}

impl ViewerState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            filename: None,
            status: LoadStatus::Empty,
            current_page: 1,
            page_count: 0,
            native_width: 0,
            zoom: Zoom::default(),
        }
    }

    #[must_use]
    pub fn has_document(&self) -> bool {
        self.status == LoadStatus::Loaded && self.page_count > 0
    }

    /// Apply a command and return resulting effects
    #[must_use]
    pub fn apply(&mut self, cmd: Command) -> Vec<Effect> {
        match cmd {
            Command::LoadDocument(filename) => {
                // Wholesale replacement: prior pages are gone even if the
                // fetch later fails. Zoom survives document switches.
                self.filename = Some(filename.clone());
                self.status = LoadStatus::Loading(filename.clone());
                self.current_page = 1;
                self.page_count = 0;
                self.native_width = 0;
                vec![Effect::FetchDocument(filename)]
            }

            Command::DocumentLoaded {
                page_count,
                native_width,
            } => {
                self.status = LoadStatus::Loaded;
                self.page_count = page_count;
                self.native_width = native_width;
                self.current_page = 1;
                vec![Effect::RerenderPages, Effect::ScrollToPage(1)]
            }

            Command::LoadFailed(message) => {
                self.status = LoadStatus::Failed(message);
                self.page_count = 0;
                self.native_width = 0;
                self.current_page = 1;
                vec![]
            }

            Command::GoToPage(page) => self.go_to(page),
            Command::NextPage => self.go_to(self.current_page.saturating_add(1)),
            Command::PrevPage => self.go_to(self.current_page.saturating_sub(1)),

            Command::SetZoom(factor) => self.apply_zoom(Zoom::clamp_factor(factor)),
            Command::ZoomIn => self.apply_zoom(self.zoom.factor() + Zoom::STEP),
            Command::ZoomOut => self.apply_zoom(self.zoom.factor() - Zoom::STEP),
            Command::WheelZoomIn => self.apply_zoom(self.zoom.factor() + Zoom::WHEEL_STEP),
            Command::WheelZoomOut => self.apply_zoom(self.zoom.factor() - Zoom::WHEEL_STEP),

            Command::ZoomToFit { container_width } => {
                if !self.has_document() {
                    return vec![];
                }
                self.apply_zoom(Zoom::fit_width(container_width, self.native_width))
            }
        }
    }

    /// Page navigation never re-renders: pages are already drawn, the
    /// effect only scrolls the target page into view. Out-of-range
    /// requests (0 or past the last page) leave the cursor untouched.
    fn go_to(&mut self, page: usize) -> Vec<Effect> {
        if !self.has_document() {
            return vec![];
        }
        if page == 0 || page > self.page_count {
            return vec![];
        }
        if page == self.current_page {
            return vec![];
        }
        self.current_page = page;
        vec![Effect::ScrollToPage(page)]
    }

    /// Any zoom mutation re-renders all pages, then restores the reading
    /// position by scrolling the current page back into view.
    fn apply_zoom(&mut self, factor: f32) -> Vec<Effect> {
        if !self.zoom.set(factor) {
            return vec![];
        }
        if self.has_document() {
            vec![Effect::RerenderPages, Effect::ScrollToPage(self.current_page)]
        } else {
            vec![]
        }
    }

    /// Sync the page cursor after the user scrolled manually.
    /// Returns true if the indicator needs a redraw.
    pub fn page_scrolled_to(&mut self, page: usize) -> bool {
        if !self.has_document() {
            return false;
        }
        let clamped = page.clamp(1, self.page_count);
        if clamped == self.current_page {
            return false;
        }
        self.current_page = clamped;
        true
    }
}

/// Commands that modify viewer state
#[derive(Clone, Debug)]
pub enum Command {
    /// Start loading a document by filename
    LoadDocument(String),
    /// The fetched document was parsed successfully
    DocumentLoaded { page_count: usize, native_width: u16 },
    /// Fetch or parse failed
    LoadFailed(String),
    /// Jump to a page (1-based)
    GoToPage(usize),
    NextPage,
    PrevPage,
    /// Set an absolute zoom factor
    SetZoom(f32),
    ZoomIn,
    ZoomOut,
    WheelZoomIn,
    WheelZoomOut,
    /// Fit the first page's native width to the container
    ZoomToFit { container_width: u16 },
}

/// Effects produced by state changes
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Fetch the document bytes from the backend
    FetchDocument(String),
    /// Re-render every page at the current zoom
    RerenderPages,
    /// Scroll the given page into view
    ScrollToPage(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded_state(pages: usize) -> ViewerState {
        let mut state = ViewerState::new();
        let _ = state.apply(Command::LoadDocument("report.pdf".into()));
        let _ = state.apply(Command::DocumentLoaded {
            page_count: pages,
            native_width: 80,
        });
        state
    }

    #[test]
    fn load_resets_page_and_requests_fetch() {
        let mut state = loaded_state(10);
        let _ = state.apply(Command::GoToPage(7));
        assert_eq!(state.current_page, 7);

        let effects = state.apply(Command::LoadDocument("other.pdf".into()));
        assert_eq!(effects, vec![Effect::FetchDocument("other.pdf".into())]);
        assert_eq!(state.current_page, 1);
        assert_eq!(state.page_count, 0);
        assert_eq!(state.status, LoadStatus::Loading("other.pdf".into()));
    }

    #[test]
    fn document_loaded_renders_and_scrolls_to_first_page() {
        let mut state = ViewerState::new();
        let _ = state.apply(Command::LoadDocument("report.pdf".into()));
        let effects = state.apply(Command::DocumentLoaded {
            page_count: 4,
            native_width: 72,
        });
        assert_eq!(effects, vec![Effect::RerenderPages, Effect::ScrollToPage(1)]);
        assert!(state.has_document());
    }

    #[test]
    fn go_to_page_zero_is_a_noop() {
        let mut state = loaded_state(5);
        let _ = state.apply(Command::GoToPage(3));
        let effects = state.apply(Command::GoToPage(0));
        assert!(effects.is_empty());
        assert_eq!(state.current_page, 3);
    }

    #[test]
    fn go_to_page_past_end_is_a_noop() {
        let mut state = loaded_state(5);
        let effects = state.apply(Command::GoToPage(6));
        assert!(effects.is_empty());
        assert_eq!(state.current_page, 1);
    }

    #[test]
    fn go_to_page_scrolls_without_rerender() {
        let mut state = loaded_state(5);
        let effects = state.apply(Command::GoToPage(4));
        assert_eq!(effects, vec![Effect::ScrollToPage(4)]);
    }

    #[test]
    fn prev_page_at_first_page_stays_put() {
        let mut state = loaded_state(5);
        let effects = state.apply(Command::PrevPage);
        assert!(effects.is_empty());
        assert_eq!(state.current_page, 1);
    }

    #[test]
    fn next_page_at_last_page_stays_put() {
        let mut state = loaded_state(2);
        let _ = state.apply(Command::NextPage);
        assert_eq!(state.current_page, 2);
        let effects = state.apply(Command::NextPage);
        assert!(effects.is_empty());
        assert_eq!(state.current_page, 2);
    }

    #[test]
    fn zoom_change_rerenders_and_restores_position() {
        let mut state = loaded_state(10);
        let _ = state.apply(Command::GoToPage(6));
        let effects = state.apply(Command::ZoomIn);
        assert_eq!(effects, vec![Effect::RerenderPages, Effect::ScrollToPage(6)]);
    }

    #[test]
    fn zoom_out_at_floor_produces_no_effects() {
        let mut state = loaded_state(3);
        let _ = state.apply(Command::SetZoom(0.5));
        let effects = state.apply(Command::ZoomOut);
        assert!(effects.is_empty());
    }

    #[test]
    fn zoom_survives_document_switch() {
        let mut state = loaded_state(3);
        let _ = state.apply(Command::SetZoom(2.0));
        let _ = state.apply(Command::LoadDocument("next.pdf".into()));
        assert!((state.zoom.factor() - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn failed_load_clears_pages() {
        let mut state = loaded_state(9);
        let _ = state.apply(Command::LoadDocument("broken.pdf".into()));
        let effects = state.apply(Command::LoadFailed("not a pdf".into()));
        assert!(effects.is_empty());
        assert_eq!(state.page_count, 0);
        assert_eq!(state.status, LoadStatus::Failed("not a pdf".into()));
        assert!(!state.has_document());
        // Navigation is inert until the next load
        assert!(state.apply(Command::GoToPage(2)).is_empty());
    }

    #[test]
    fn zoom_to_fit_uses_native_width() {
        let mut state = loaded_state(3);
        let effects = state.apply(Command::ZoomToFit {
            container_width: 160,
        });
        assert_eq!(
            effects,
            vec![Effect::RerenderPages, Effect::ScrollToPage(1)]
        );
        assert!((state.zoom.factor() - 2.0).abs() < f32::EPSILON);
    }
}
