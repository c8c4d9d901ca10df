//! Popup list for switching the active document

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState};

use super::centered_rect;
use crate::theme::current_theme;

pub enum SelectorAction {
    /// Switch to the chosen document
    Select(String),
    Close,
    Noop,
}

pub struct DocumentSelector {
    documents: Vec<String>,
    state: ListState,
}

impl DocumentSelector {
    #[must_use]
    pub fn new(documents: Vec<String>, active: Option<&str>) -> Self {
        let selected = active
            .and_then(|name| documents.iter().position(|d| d == name))
            .unwrap_or(0);
        let mut state = ListState::default();
        if !documents.is_empty() {
            state.select(Some(selected));
        }
        Self { documents, state }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> SelectorAction {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => SelectorAction::Close,
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_selection(-1);
                SelectorAction::Noop
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_selection(1);
                SelectorAction::Noop
            }
            KeyCode::Enter => match self.state.selected() {
                Some(idx) => SelectorAction::Select(self.documents[idx].clone()),
                None => SelectorAction::Close,
            },
            _ => SelectorAction::Noop,
        }
    }

    fn move_selection(&mut self, delta: isize) {
        if self.documents.is_empty() {
            return;
        }
        let len = self.documents.len() as isize;
        let current = self.state.selected().unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(len);
        self.state.select(Some(next as usize));
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let palette = current_theme();
        let width = self
            .documents
            .iter()
            .map(|d| d.chars().count())
            .max()
            .unwrap_or(0)
            .max(24) as u16
            + 4;
        let height = (self.documents.len().max(1) as u16 + 2).min(area.height);
        let popup = centered_rect(width.min(area.width), height, area);

        frame.render_widget(Clear, popup);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.border_focused))
            .style(Style::default().bg(palette.panel_bg))
            .title(Span::styled(
                " Documents ",
                Style::default().fg(palette.accent),
            ));

        if self.documents.is_empty() {
            let inner = block.inner(popup);
            frame.render_widget(block, popup);
            frame.render_widget(
                ratatui::widgets::Paragraph::new("No documents on the server")
                    .style(Style::default().fg(palette.muted)),
                inner,
            );
            return;
        }

        let items: Vec<ListItem> = self
            .documents
            .iter()
            .map(|d| ListItem::new(d.clone()).style(Style::default().fg(palette.fg)))
            .collect();

        let list = List::new(items).block(block).highlight_style(
            Style::default()
                .bg(palette.selection_bg)
                .fg(palette.selection_fg)
                .add_modifier(Modifier::BOLD),
        );

        frame.render_stateful_widget(list, popup, &mut self.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn selector() -> DocumentSelector {
        DocumentSelector::new(
            vec!["a.pdf".into(), "b.pdf".into(), "c.pdf".into()],
            Some("b.pdf"),
        )
    }

    #[test]
    fn opens_on_the_active_document() {
        let mut sel = selector();
        let SelectorAction::Select(name) = sel.handle_key(key(KeyCode::Enter)) else {
            panic!("expected selection");
        };
        assert_eq!(name, "b.pdf");
    }

    #[test]
    fn selection_wraps_around() {
        let mut sel = selector();
        sel.handle_key(key(KeyCode::Down));
        sel.handle_key(key(KeyCode::Down));
        let SelectorAction::Select(name) = sel.handle_key(key(KeyCode::Enter)) else {
            panic!("expected selection");
        };
        assert_eq!(name, "a.pdf");
    }

    #[test]
    fn escape_closes_without_selecting() {
        let mut sel = selector();
        assert!(matches!(sel.handle_key(key(KeyCode::Esc)), SelectorAction::Close));
    }

    #[test]
    fn empty_list_enter_just_closes() {
        let mut sel = DocumentSelector::new(vec![], None);
        assert!(sel.is_empty());
        assert!(matches!(sel.handle_key(key(KeyCode::Enter)), SelectorAction::Close));
    }
}
