//! Chat message log and input line
//!
//! Messages are append-only per session and live only in memory; the log
//! is replaced by the welcome placeholder on an explicit clear and lost on
//! exit. The transient typing placeholder is a flag rather than a message
//! so it can never survive a completed exchange.

use chrono::{DateTime, Local};

/// Who a chat message is attributed to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
    System,
    /// Backend-reported or transport error, rendered inline like a reply
    Error,
}

#[derive(Clone, Debug)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Local>,
}

impl ChatMessage {
    fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: Local::now(),
        }
    }

    /// Timestamp the way the message list displays it
    #[must_use]
    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M").to_string()
    }
}

/// Append-only message log for one session
#[derive(Debug, Default)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
    /// True while an answer is pending; renders the typing placeholder
    typing: bool,
}

impl ChatLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The welcome placeholder is shown instead of an empty list
    #[must_use]
    pub fn shows_welcome(&self) -> bool {
        self.messages.is_empty() && !self.typing
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[must_use]
    pub fn is_typing(&self) -> bool {
        self.typing
    }

    pub fn set_typing(&mut self, typing: bool) {
        self.typing = typing;
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage::new(Role::User, text));
    }

    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage::new(Role::Assistant, text));
    }

    pub fn push_system(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage::new(Role::System, text));
    }

    pub fn push_error(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage::new(Role::Error, text));
    }

    /// Wholesale clear back to the welcome placeholder
    pub fn clear(&mut self) {
        self.messages.clear();
        self.typing = false;
    }
}

/// Trim a submitted question; `None` means "do nothing at all" - no
/// request, no message.
#[must_use]
pub fn normalized_question(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Single-line input editor for the chat prompt
#[derive(Debug, Default)]
pub struct ChatInput {
    buffer: String,
    /// Cursor position in characters
    cursor: usize,
}

impl ChatInput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.buffer
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn insert(&mut self, c: char) {
        let byte_idx = self.byte_index(self.cursor);
        self.buffer.insert(byte_idx, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let byte_idx = self.byte_index(self.cursor - 1);
        self.buffer.remove(byte_idx);
        self.cursor -= 1;
    }

    pub fn delete(&mut self) {
        if self.cursor >= self.char_len() {
            return;
        }
        let byte_idx = self.byte_index(self.cursor);
        self.buffer.remove(byte_idx);
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_len());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_len();
    }

    /// Take the buffer contents, leaving an empty input
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.buffer)
    }

    fn char_len(&self) -> usize {
        self.buffer.chars().count()
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.buffer
            .char_indices()
            .nth(char_idx)
            .map_or(self.buffer.len(), |(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_only_question_is_rejected() {
        assert_eq!(normalized_question(""), None);
        assert_eq!(normalized_question("   \t \n"), None);
        assert_eq!(
            normalized_question("  what is this about?  "),
            Some("what is this about?".to_string())
        );
    }

    #[test]
    fn log_starts_with_welcome_and_clears_back_to_it() {
        let mut log = ChatLog::new();
        assert!(log.shows_welcome());

        log.push_user("hi");
        log.push_assistant("hello");
        assert!(!log.shows_welcome());
        assert_eq!(log.messages().len(), 2);

        log.clear();
        assert!(log.shows_welcome());
        assert!(log.messages().is_empty());
    }

    #[test]
    fn typing_placeholder_suppresses_welcome() {
        let mut log = ChatLog::new();
        log.set_typing(true);
        assert!(!log.shows_welcome());
        log.set_typing(false);
        assert!(log.shows_welcome());
    }

    #[test]
    fn clear_drops_typing_placeholder() {
        let mut log = ChatLog::new();
        log.push_user("q");
        log.set_typing(true);
        log.clear();
        assert!(!log.is_typing());
    }

    #[test]
    fn input_edits_at_cursor() {
        let mut input = ChatInput::new();
        for c in "what".chars() {
            input.insert(c);
        }
        input.move_home();
        input.insert('>');
        assert_eq!(input.text(), ">what");

        input.move_end();
        input.backspace();
        assert_eq!(input.text(), ">wha");

        assert_eq!(input.take(), ">wha");
        assert!(input.is_empty());
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn input_handles_multibyte_chars() {
        let mut input = ChatInput::new();
        input.insert('é');
        input.insert('ß');
        input.move_left();
        input.backspace();
        assert_eq!(input.text(), "ß");
    }
}
