//! Modal dialogs: clear-chat confirmation and the upload path prompt

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::centered_rect;
use crate::theme::current_theme;

pub enum DialogAction {
    Confirm,
    Cancel,
    Noop,
}

/// Yes/no confirmation, used before clearing the chat history
pub struct ConfirmDialog {
    pub title: String,
    pub message: String,
}

impl ConfirmDialog {
    #[must_use]
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> DialogAction {
        match key.code {
            KeyCode::Char('y' | 'Y') | KeyCode::Enter => DialogAction::Confirm,
            KeyCode::Char('n' | 'N') | KeyCode::Esc => DialogAction::Cancel,
            _ => DialogAction::Noop,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let palette = current_theme();
        let width = (self.message.chars().count() as u16 + 6).clamp(30, area.width);
        let popup = centered_rect(width, 6, area);

        frame.render_widget(Clear, popup);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.warning))
            .style(Style::default().bg(palette.panel_bg))
            .title(Span::styled(
                format!(" {} ", self.title),
                Style::default().fg(palette.warning),
            ));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let lines = vec![
            Line::from(Span::styled(
                self.message.clone(),
                Style::default().fg(palette.fg),
            )),
            Line::default(),
            Line::from(vec![
                Span::styled("[y]", Style::default().fg(palette.accent).add_modifier(Modifier::BOLD)),
                Span::styled("es  ", Style::default().fg(palette.muted)),
                Span::styled("[n]", Style::default().fg(palette.accent).add_modifier(Modifier::BOLD)),
                Span::styled("o", Style::default().fg(palette.muted)),
            ]),
        ];
        frame.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center),
            inner,
        );
    }
}

pub enum PromptAction {
    Submit(String),
    Cancel,
    Noop,
}

/// Free-text path prompt for uploading a local PDF
pub struct PathPrompt {
    input: String,
    cursor: usize,
    /// Validation message from the last rejected submit
    pub error: Option<String>,
}

impl PathPrompt {
    #[must_use]
    pub fn new() -> Self {
        Self {
            input: String::new(),
            cursor: 0,
            error: None,
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.input
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PromptAction {
        match key.code {
            KeyCode::Esc => PromptAction::Cancel,
            KeyCode::Enter => {
                let path = self.input.trim().to_string();
                if path.is_empty() {
                    PromptAction::Noop
                } else {
                    PromptAction::Submit(path)
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                let byte_idx = self.byte_index(self.cursor);
                self.input.insert(byte_idx, c);
                self.cursor += 1;
                self.error = None;
                PromptAction::Noop
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    let byte_idx = self.byte_index(self.cursor - 1);
                    self.input.remove(byte_idx);
                    self.cursor -= 1;
                    self.error = None;
                }
                PromptAction::Noop
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                PromptAction::Noop
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.input.chars().count());
                PromptAction::Noop
            }
            KeyCode::Home => {
                self.cursor = 0;
                PromptAction::Noop
            }
            KeyCode::End => {
                self.cursor = self.input.chars().count();
                PromptAction::Noop
            }
            _ => PromptAction::Noop,
        }
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_idx)
            .map_or(self.input.len(), |(i, _)| i)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let palette = current_theme();
        let width = area.width.saturating_sub(10).clamp(30, 70);
        let popup = centered_rect(width, 6, area);

        frame.render_widget(Clear, popup);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.border_focused))
            .style(Style::default().bg(palette.panel_bg))
            .title(Span::styled(
                " Upload PDF ",
                Style::default().fg(palette.accent),
            ));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let status = match &self.error {
            Some(error) => Span::styled(error.clone(), Style::default().fg(palette.error)),
            None => Span::styled(
                "Enter a path to a .pdf file, Esc to cancel",
                Style::default().fg(palette.muted),
            ),
        };

        let width = inner.width as usize;
        let skip = self.cursor.saturating_sub(width.saturating_sub(1));
        let visible: String = self.input.chars().skip(skip).take(width).collect();

        let lines = vec![
            Line::from(Span::styled(visible, Style::default().fg(palette.fg))),
            Line::default(),
            Line::from(status),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
        frame.set_cursor_position((inner.x + (self.cursor - skip) as u16, inner.y));
    }
}

impl Default for PathPrompt {
    fn default() -> Self {
        Self::new()
    }
}
