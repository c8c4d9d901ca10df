//! Application controller and event loop
//!
//! All state lives in [`App`]; the loop turns terminal events into state
//! changes and polls the backend service every tick. Rendering reads the
//! state, it never mutates it besides viewer layout bookkeeping.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use log::{info, warn};
use ratatui::Frame;
use ratatui::Terminal;
use ratatui::backend::Backend;
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use crate::api::service::{ApiResponse, ApiService, RequestId};
use crate::chat::{ChatInput, ChatLog, normalized_question};
use crate::event_source::EventSource;
use crate::notification::NotificationManager;
use crate::settings;
use crate::theme::{current_theme, current_theme_id, set_theme};
use crate::viewer::{Command, LoadedDocument, Viewer};
use crate::widget::chat_panel::{self, ChatPanelView};
use crate::widget::dialogs::{ConfirmDialog, DialogAction, PathPrompt, PromptAction};
use crate::widget::document_selector::{DocumentSelector, SelectorAction};
use crate::widget::{help_popup, toast, viewer_panel};

const TICK: Duration = Duration::from_millis(50);
/// Below this terminal width only the focused panel is shown
const NARROW_WIDTH: u16 = 80;
const TRANSPORT_ERROR_TEXT: &str = "Network error. Please try again.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocusedPanel {
    Viewer,
    Chat,
}

enum Popup {
    Selector(DocumentSelector),
    ConfirmClear(ConfirmDialog),
    UploadPrompt(PathPrompt),
    Help,
}

pub struct App {
    pub viewer: Viewer,
    pub chat: ChatLog,
    pub input: ChatInput,
    /// Documents known to the server, in selector order
    pub documents: Vec<String>,
    pub active_document: Option<String>,
    pub notifications: NotificationManager,
    api: ApiService,
    focused: FocusedPanel,
    popup: Option<Popup>,
    /// Pending ask; the input stays locked until it resolves
    chat_in_flight: Option<RequestId>,
    upload_in_flight: Option<RequestId>,
    /// Rows scrolled up from the newest chat message
    chat_scroll: usize,
    tick: u64,
    viewer_area: Rect,
    chat_area: Rect,
    should_quit: bool,
}

impl App {
    #[must_use]
    pub fn new(api: ApiService) -> Self {
        let mut app = Self {
            viewer: Viewer::new(),
            chat: ChatLog::new(),
            input: ChatInput::new(),
            documents: Vec::new(),
            active_document: None,
            notifications: NotificationManager::new(),
            api,
            focused: FocusedPanel::Chat,
            popup: None,
            chat_in_flight: None,
            upload_in_flight: None,
            chat_scroll: 0,
            tick: 0,
            viewer_area: Rect::default(),
            chat_area: Rect::default(),
            should_quit: false,
        };
        app.api.list_documents();
        app
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Make `filename` the active document, server-side first. The viewer
    /// fetch only starts once the backend acknowledged the switch.
    pub fn switch_document(&mut self, filename: String) {
        self.api.set_active_document(filename);
    }

    /// Submit the current input as a question. One exchange at a time:
    /// while an answer is pending the input is locked and further submits
    /// are ignored.
    pub fn submit_question(&mut self) {
        if self.chat_in_flight.is_some() {
            return;
        }
        let Some(question) = normalized_question(self.input.text()) else {
            return;
        };
        let _ = self.input.take();
        self.chat.push_user(&question);
        self.chat.set_typing(true);
        self.chat_scroll = 0;

        let active = self.active_document.clone().unwrap_or_default();
        self.chat_in_flight = Some(self.api.ask(question, active));
    }

    /// Validate and start an upload. Returns the user-facing reason when
    /// the path is rejected; no request is sent in that case.
    pub fn request_upload(&mut self, path: &str) -> Result<(), String> {
        let path = validate_upload_path(path)?;
        if self.upload_in_flight.is_some() {
            return Err("An upload is already in progress".to_string());
        }
        self.notifications.info(format!(
            "Uploading {}\u{2026}",
            path.file_name().map_or_else(
                || path.display().to_string(),
                |n| n.to_string_lossy().into_owned()
            )
        ));
        self.upload_in_flight = Some(self.api.upload(path));
        Ok(())
    }

    pub fn request_clear_chat(&mut self) {
        self.api.clear_chat();
    }

    pub fn toggle_theme(&mut self) {
        let next = current_theme_id().toggled();
        set_theme(next);
        settings::set_theme_name(next.name());
    }

    /// Advance timers and drain backend responses. Called once per tick.
    pub fn on_tick(&mut self) {
        self.tick += 1;
        self.notifications.update();
        for response in self.api.poll_responses() {
            self.handle_response(response);
        }
    }

    fn handle_response(&mut self, response: ApiResponse) {
        match response {
            ApiResponse::Answer { result, .. } => {
                self.chat.set_typing(false);
                self.chat_in_flight = None;
                match result {
                    Ok(answer) => self.chat.push_assistant(answer),
                    Err(e) if e.is_transport() => {
                        warn!("ask failed: {e}");
                        self.chat.push_error(TRANSPORT_ERROR_TEXT);
                    }
                    Err(e) => self.chat.push_error(e.to_string()),
                }
                self.chat_scroll = 0;
            }

            ApiResponse::Document {
                filename, result, ..
            } => match result {
                Ok(bytes) => match LoadedDocument::parse(&filename, &bytes) {
                    Ok(document) => {
                        info!("loaded {} ({} pages)", filename, document.page_count());
                        self.viewer.document_loaded(document);
                    }
                    Err(e) => {
                        self.viewer.load_failed(e.to_string());
                        self.notifications.error(format!("Could not open {filename}"));
                    }
                },
                Err(e) => {
                    warn!("fetch of {filename} failed: {e}");
                    let message = if e.is_transport() {
                        TRANSPORT_ERROR_TEXT.to_string()
                    } else {
                        e.to_string()
                    };
                    self.viewer.load_failed(message);
                }
            },

            ApiResponse::Uploaded { result, .. } => {
                self.upload_in_flight = None;
                match result {
                    Ok(uploaded) => {
                        if !self.documents.contains(&uploaded.filename) {
                            self.documents.push(uploaded.filename.clone());
                        }
                        self.notifications.success(uploaded.message);
                        self.switch_document(uploaded.filename);
                    }
                    Err(e) if e.is_transport() => {
                        warn!("upload failed: {e}");
                        self.notifications.error(TRANSPORT_ERROR_TEXT);
                    }
                    Err(e) => self.notifications.error(e.to_string()),
                }
            }

            ApiResponse::ActiveDocumentSet {
                filename, result, ..
            } => match result {
                Ok(true) => {
                    self.active_document = Some(filename.clone());
                    self.chat
                        .push_system(format!("Now chatting about document: {filename}"));
                    self.chat_scroll = 0;
                    self.viewer_command(Command::LoadDocument(filename));
                }
                Ok(false) => self
                    .notifications
                    .error(format!("Server refused to switch to {filename}")),
                Err(e) => {
                    warn!("switch to {filename} failed: {e}");
                    self.notifications.error(TRANSPORT_ERROR_TEXT);
                }
            },

            ApiResponse::ChatCleared { result, .. } => match result {
                Ok(true) => {
                    self.chat.clear();
                    self.chat_in_flight = None;
                    self.chat_scroll = 0;
                }
                Ok(false) => self.notifications.error("Server refused to clear the chat"),
                Err(e) => {
                    warn!("clear chat failed: {e}");
                    self.notifications.error(TRANSPORT_ERROR_TEXT);
                }
            },

            ApiResponse::DocumentList { result, .. } => match result {
                Ok(list) => {
                    for name in list {
                        if !self.documents.contains(&name) {
                            self.documents.push(name);
                        }
                    }
                }
                // Listing happens at startup; a dead backend will surface
                // on the first real interaction instead.
                Err(e) => warn!("document listing failed: {e}"),
            },
        }
    }

    fn viewer_command(&mut self, cmd: Command) {
        if let Some(filename) = self.viewer.apply(cmd) {
            self.api.fetch_document(filename);
        }
    }

    fn viewer_inner_width(&self) -> u16 {
        self.viewer_area.width.saturating_sub(2)
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if self.popup.is_some() {
            self.handle_popup_key(key);
            return;
        }

        // Esc closes the newest toast first; anything else it might mean
        // (leaving the chat input) waits for the next press.
        if key.code == KeyCode::Esc && self.notifications.dismiss_current() {
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => self.quit(),
                KeyCode::Char('o') => self.open_selector(),
                KeyCode::Char('u') => self.popup = Some(Popup::UploadPrompt(PathPrompt::new())),
                KeyCode::Char('l') => {
                    self.popup = Some(Popup::ConfirmClear(ConfirmDialog::new(
                        "Clear chat",
                        "Clear the conversation history?",
                    )));
                }
                KeyCode::Char('t') => self.toggle_theme(),
                KeyCode::Char('=' | '+') => self.viewer_command(Command::ZoomIn),
                KeyCode::Char('-') => self.viewer_command(Command::ZoomOut),
                KeyCode::Char('0') => {
                    let width = self.viewer_inner_width();
                    self.viewer_command(Command::ZoomToFit {
                        container_width: width,
                    });
                }
                _ => {}
            }
            return;
        }

        if key.code == KeyCode::Tab {
            self.focused = match self.focused {
                FocusedPanel::Viewer => FocusedPanel::Chat,
                FocusedPanel::Chat => FocusedPanel::Viewer,
            };
            return;
        }

        match self.focused {
            FocusedPanel::Viewer => self.handle_viewer_key(key),
            FocusedPanel::Chat => self.handle_chat_key(key),
        }
    }

    fn handle_viewer_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.quit(),
            KeyCode::Char('?') => self.popup = Some(Popup::Help),
            KeyCode::Char('j') | KeyCode::Down => self.viewer.scroll_by(1),
            KeyCode::Char('k') | KeyCode::Up => self.viewer.scroll_by(-1),
            KeyCode::PageDown | KeyCode::Right | KeyCode::Char(' ') => {
                self.viewer_command(Command::NextPage);
            }
            KeyCode::PageUp | KeyCode::Left => self.viewer_command(Command::PrevPage),
            KeyCode::Char('g') | KeyCode::Home => self.viewer_command(Command::GoToPage(1)),
            KeyCode::Char('G') | KeyCode::End => {
                let last = self.viewer.state.page_count;
                self.viewer_command(Command::GoToPage(last));
            }
            _ => {}
        }
    }

    fn handle_chat_key(&mut self, key: KeyEvent) {
        // Scrolling the history works even while an answer is pending
        match key.code {
            KeyCode::Up => {
                self.chat_scroll = self.chat_scroll.saturating_add(1);
                return;
            }
            KeyCode::Down => {
                self.chat_scroll = self.chat_scroll.saturating_sub(1);
                return;
            }
            KeyCode::Esc => {
                self.focused = FocusedPanel::Viewer;
                return;
            }
            _ => {}
        }

        if self.chat_in_flight.is_some() {
            return;
        }
        match key.code {
            KeyCode::Enter => self.submit_question(),
            KeyCode::Char(c) => self.input.insert(c),
            KeyCode::Backspace => self.input.backspace(),
            KeyCode::Delete => self.input.delete(),
            KeyCode::Left => self.input.move_left(),
            KeyCode::Right => self.input.move_right(),
            KeyCode::Home => self.input.move_home(),
            KeyCode::End => self.input.move_end(),
            _ => {}
        }
    }

    fn open_selector(&mut self) {
        self.popup = Some(Popup::Selector(DocumentSelector::new(
            self.documents.clone(),
            self.active_document.as_deref(),
        )));
    }

    fn handle_popup_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit();
            return;
        }

        let Some(popup) = self.popup.take() else {
            return;
        };
        match popup {
            Popup::Selector(mut selector) => match selector.handle_key(key) {
                SelectorAction::Select(filename) => self.switch_document(filename),
                SelectorAction::Close => {}
                SelectorAction::Noop => self.popup = Some(Popup::Selector(selector)),
            },
            Popup::ConfirmClear(mut dialog) => match dialog.handle_key(key) {
                DialogAction::Confirm => self.request_clear_chat(),
                DialogAction::Cancel => {}
                DialogAction::Noop => self.popup = Some(Popup::ConfirmClear(dialog)),
            },
            Popup::UploadPrompt(mut prompt) => match prompt.handle_key(key) {
                PromptAction::Submit(path) => {
                    if let Err(reason) = self.request_upload(&path) {
                        self.notifications.error(reason.clone());
                        prompt.error = Some(reason);
                        self.popup = Some(Popup::UploadPrompt(prompt));
                    }
                }
                PromptAction::Cancel => {}
                PromptAction::Noop => self.popup = Some(Popup::UploadPrompt(prompt)),
            },
            Popup::Help => {}
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.popup.is_some() {
            return;
        }
        let position = Position::new(mouse.column, mouse.row);
        let in_viewer = self.viewer_area.contains(position);
        let in_chat = self.chat_area.contains(position);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if in_viewer {
                    self.focused = FocusedPanel::Viewer;
                } else if in_chat {
                    self.focused = FocusedPanel::Chat;
                }
            }
            MouseEventKind::ScrollUp if in_viewer => {
                if mouse.modifiers.contains(KeyModifiers::CONTROL) {
                    self.viewer_command(Command::WheelZoomIn);
                } else {
                    self.viewer.scroll_by(-3);
                }
            }
            MouseEventKind::ScrollDown if in_viewer => {
                if mouse.modifiers.contains(KeyModifiers::CONTROL) {
                    self.viewer_command(Command::WheelZoomOut);
                } else {
                    self.viewer.scroll_by(3);
                }
            }
            MouseEventKind::ScrollUp if in_chat => {
                self.chat_scroll = self.chat_scroll.saturating_add(3);
            }
            MouseEventKind::ScrollDown if in_chat => {
                self.chat_scroll = self.chat_scroll.saturating_sub(3);
            }
            _ => {}
        }
    }

    pub fn draw(&mut self, frame: &mut Frame) {
        let palette = current_theme();
        let area = frame.area();
        frame.render_widget(
            Block::default().style(Style::default().bg(palette.bg)),
            area,
        );

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(area);
        let content = chunks[0];

        if content.width < NARROW_WIDTH {
            // Narrow terminal: only the focused panel, Tab flips between them
            match self.focused {
                FocusedPanel::Viewer => {
                    self.viewer_area = content;
                    self.chat_area = Rect::default();
                }
                FocusedPanel::Chat => {
                    self.viewer_area = Rect::default();
                    self.chat_area = content;
                }
            }
        } else {
            let panels = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
                .split(content);
            self.viewer_area = panels[0];
            self.chat_area = panels[1];
        }

        if self.viewer_area.width > 0 {
            viewer_panel::render(
                frame,
                self.viewer_area,
                &mut self.viewer,
                self.focused == FocusedPanel::Viewer,
            );
        }
        if self.chat_area.width > 0 {
            let view = ChatPanelView {
                log: &self.chat,
                input: &self.input,
                active_document: self.active_document.as_deref(),
                locked: self.chat_in_flight.is_some(),
                is_focused: self.focused == FocusedPanel::Chat,
                tick: self.tick,
                scroll_from_bottom: self.chat_scroll,
            };
            chat_panel::render(frame, self.chat_area, &view);
        }

        self.draw_help_bar(frame, chunks[1]);

        match &mut self.popup {
            Some(Popup::Selector(selector)) => selector.render(frame, content),
            Some(Popup::ConfirmClear(dialog)) => dialog.render(frame, content),
            Some(Popup::UploadPrompt(prompt)) => prompt.render(frame, content),
            Some(Popup::Help) => help_popup::render(frame, content),
            None => {}
        }

        toast::render(frame, content, &self.notifications);
    }

    fn draw_help_bar(&self, frame: &mut Frame, area: Rect) {
        let palette = current_theme();
        let hint = |keys: &str, action: &str| {
            vec![
                Span::styled(format!(" {keys}"), Style::default().fg(palette.accent)),
                Span::styled(format!(" {action} "), Style::default().fg(palette.muted)),
            ]
        };

        let mut spans = Vec::new();
        if self.upload_in_flight.is_some() {
            // Stays up for the whole request, unlike a toast
            let dots = ".".repeat((self.tick / 4 % 3 + 1) as usize);
            spans.push(Span::styled(
                format!(" Uploading{dots}  "),
                Style::default().fg(palette.warning),
            ));
        }
        spans.extend(hint("Tab", "panel"));
        spans.extend(hint("^O", "documents"));
        spans.extend(hint("^U", "upload"));
        spans.extend(hint("^L", "clear"));
        spans.extend(hint("^T", "theme"));
        spans.extend(hint("^+/-", "zoom"));
        spans.extend(hint("?", "help"));
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

/// Client-side upload validation: extension first, then existence, so a
/// non-PDF is rejected identically whether or not it exists.
fn validate_upload_path(raw: &str) -> Result<PathBuf, String> {
    let path = Path::new(raw);
    let is_pdf = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    if !is_pdf {
        return Err("Please select a PDF file".to_string());
    }
    if !path.is_file() {
        return Err(format!("File not found: {raw}"));
    }
    Ok(path.to_path_buf())
}

/// Main loop: draw, then wait up to one tick for input
pub fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    events: &mut impl EventSource,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    while !app.should_quit() {
        app.on_tick();
        terminal.draw(|frame| app.draw(frame))?;

        if events.poll(TICK)? {
            match events.read()? {
                Event::Key(key) => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }
    }
    Ok(())
}
