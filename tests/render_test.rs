//! Rendering checks against a test backend buffer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use paperchat::api::service::ApiService;
use paperchat::main_app::App;
use paperchat::viewer::{Command, LoadedDocument};
use ratatui::Terminal;
use ratatui::backend::TestBackend;

fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
    let buffer = terminal.backend().buffer();
    let area = buffer.area;
    let mut text = String::new();
    for y in 0..area.height {
        for x in 0..area.width {
            if let Some(cell) = buffer.cell((x, y)) {
                text.push_str(cell.symbol());
            }
        }
        text.push('\n');
    }
    text
}

fn test_app() -> App {
    let (service, _requests, _responses) = ApiService::detached();
    App::new(service)
}

fn draw(app: &mut App, width: u16, height: u16) -> String {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(|frame| app.draw(frame)).unwrap();
    buffer_text(&terminal)
}

fn load_sample(app: &mut App, pages: usize) {
    let text = (1..=pages)
        .map(|n| format!("page {n} body text"))
        .collect::<Vec<_>>()
        .join("\x0C");
    let _ = app.viewer.apply(Command::LoadDocument("sample.pdf".into()));
    app.viewer
        .document_loaded(LoadedDocument::from_text("sample.pdf", &text).unwrap());
}

#[test]
fn empty_app_shows_both_panels_and_welcome() {
    let mut app = test_app();
    let screen = draw(&mut app, 120, 30);

    assert!(screen.contains("Document"));
    assert!(screen.contains("Chat"));
    assert!(screen.contains("No document selected"));
    assert!(screen.contains("Upload a PDF or pick a document"));
    assert!(screen.contains("Ask a question"));
}

#[test]
fn loaded_document_shows_pages_and_zoom_indicator() {
    let mut app = test_app();
    load_sample(&mut app, 3);
    let screen = draw(&mut app, 120, 30);

    assert!(screen.contains("sample.pdf"));
    assert!(screen.contains("Page 1"));
    assert!(screen.contains("page 1 body text"));
    // Default zoom is 150%
    assert!(screen.contains("Page 1/3"));
    assert!(screen.contains("150%"));
}

#[test]
fn zoom_indicator_tracks_key_zoom() {
    let mut app = test_app();
    load_sample(&mut app, 2);
    let _ = draw(&mut app, 120, 30);

    app.handle_key(KeyEvent::new(KeyCode::Char('='), KeyModifiers::CONTROL));
    let screen = draw(&mut app, 120, 30);
    assert!(screen.contains("175%"));

    app.handle_key(KeyEvent::new(KeyCode::Char('-'), KeyModifiers::CONTROL));
    app.handle_key(KeyEvent::new(KeyCode::Char('-'), KeyModifiers::CONTROL));
    let screen = draw(&mut app, 120, 30);
    assert!(screen.contains("125%"));
}

#[test]
fn narrow_terminal_shows_only_the_focused_panel() {
    let mut app = test_app();
    load_sample(&mut app, 1);

    // Chat panel has initial focus
    let screen = draw(&mut app, 60, 24);
    assert!(screen.contains("Chat"));
    assert!(!screen.contains("sample.pdf"));

    app.handle_key(KeyEvent::new(KeyCode::Tab, KeyModifiers::empty()));
    let screen = draw(&mut app, 60, 24);
    assert!(screen.contains("sample.pdf"));
    assert!(!screen.contains("Ask a question"));
}

#[test]
fn help_popup_lists_bindings() {
    let mut app = test_app();
    app.handle_key(KeyEvent::new(KeyCode::Tab, KeyModifiers::empty()));
    app.handle_key(KeyEvent::new(KeyCode::Char('?'), KeyModifiers::empty()));

    let screen = draw(&mut app, 120, 30);
    assert!(screen.contains("Upload a PDF"));
    assert!(screen.contains("Toggle light/dark theme"));
}

#[test]
fn typing_indicator_appears_while_waiting() {
    let (service, requests, _responses) = ApiService::detached();
    let mut app = App::new(service);
    let _ = requests.try_recv();

    for c in "hello".chars() {
        app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::empty()));
    }
    app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::empty()));

    let screen = draw(&mut app, 120, 30);
    assert!(screen.contains("Assistant is typing"));
    assert!(screen.contains("Waiting for answer"));
}
