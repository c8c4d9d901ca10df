//! Event-port abstraction over terminal input
//!
//! Controllers consume [`EventSource`] instead of crossterm directly so
//! that the whole input path can be driven from a scripted sequence in
//! tests.

use anyhow::Result;
pub use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use std::time::Duration;

pub trait EventSource {
    /// Poll for events with a timeout
    fn poll(&mut self, timeout: Duration) -> Result<bool>;

    /// Read the next event
    fn read(&mut self) -> Result<Event>;
}

/// Real terminal input via crossterm
pub struct TerminalEventSource;

impl EventSource for TerminalEventSource {
    fn poll(&mut self, timeout: Duration) -> Result<bool> {
        Ok(crossterm::event::poll(timeout)?)
    }

    fn read(&mut self) -> Result<Event> {
        Ok(crossterm::event::read()?)
    }
}

/// Scripted event source for tests
pub struct SimulatedEventSource {
    events: Vec<Event>,
    current_index: usize,
}

impl SimulatedEventSource {
    #[must_use]
    pub fn new(events: Vec<Event>) -> Self {
        Self {
            events,
            current_index: 0,
        }
    }

    #[must_use]
    pub fn key_event(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: crossterm::event::KeyEventKind::Press,
            state: crossterm::event::KeyEventState::empty(),
        })
    }

    #[must_use]
    pub fn char_key(c: char) -> Event {
        Self::key_event(KeyCode::Char(c), KeyModifiers::empty())
    }

    #[must_use]
    pub fn ctrl_char_key(c: char) -> Event {
        Self::key_event(KeyCode::Char(c), KeyModifiers::CONTROL)
    }
}

impl EventSource for SimulatedEventSource {
    fn poll(&mut self, _timeout: Duration) -> Result<bool> {
        Ok(self.current_index < self.events.len())
    }

    fn read(&mut self) -> Result<Event> {
        if self.current_index < self.events.len() {
            let event = self.events[self.current_index].clone();
            self.current_index += 1;
            Ok(event)
        } else {
            // Exhausted scripts quit the app so test runs terminate
            Ok(Self::ctrl_char_key('c'))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulated_source_replays_in_order() {
        let mut source = SimulatedEventSource::new(vec![
            SimulatedEventSource::char_key('a'),
            SimulatedEventSource::ctrl_char_key('o'),
        ]);

        assert!(source.poll(Duration::ZERO).unwrap());
        let Event::Key(key) = source.read().unwrap() else {
            panic!("expected key event");
        };
        assert_eq!(key.code, KeyCode::Char('a'));

        let Event::Key(key) = source.read().unwrap() else {
            panic!("expected key event");
        };
        assert_eq!(key.code, KeyCode::Char('o'));
        assert!(key.modifiers.contains(KeyModifiers::CONTROL));

        assert!(!source.poll(Duration::ZERO).unwrap());
    }
}
