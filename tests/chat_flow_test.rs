//! End-to-end chat and upload flows driven through key events, with the
//! backend worker replaced by test channels.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use paperchat::api::service::{ApiRequest, ApiResponse, ApiService};
use paperchat::main_app::App;

fn test_app() -> (App, flume::Receiver<ApiRequest>, flume::Sender<ApiResponse>) {
    let (service, requests, responses) = ApiService::detached();
    let app = App::new(service);
    // App::new requests the document listing on startup
    assert!(matches!(
        requests.try_recv().unwrap(),
        ApiRequest::ListDocuments { .. }
    ));
    (app, requests, responses)
}

fn press(app: &mut App, code: KeyCode) {
    app.handle_key(KeyEvent::new(code, KeyModifiers::empty()));
}

fn press_ctrl(app: &mut App, c: char) {
    app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL));
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

#[test]
fn question_typed_via_keys_reaches_the_backend() {
    let (mut app, requests, responses) = test_app();

    type_text(&mut app, "what is this paper about?");
    press(&mut app, KeyCode::Enter);

    let ApiRequest::Ask { id, query, .. } = requests.try_recv().unwrap() else {
        panic!("expected an ask request");
    };
    assert_eq!(query, "what is this paper about?");
    assert_eq!(app.chat.messages().len(), 1);
    assert!(app.chat.is_typing());
    assert!(app.input.is_empty());

    // Keystrokes while waiting do not edit the locked input
    type_text(&mut app, "ignored");
    assert!(app.input.is_empty());

    responses
        .send(ApiResponse::Answer {
            id,
            result: Ok("It is about PDF parsing.".into()),
        })
        .unwrap();
    app.on_tick();

    assert!(!app.chat.is_typing());
    let texts: Vec<&str> = app.chat.messages().iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, vec!["what is this paper about?", "It is about PDF parsing."]);
}

#[test]
fn enter_on_blank_input_is_inert() {
    let (mut app, requests, _responses) = test_app();
    type_text(&mut app, "   ");
    press(&mut app, KeyCode::Enter);

    assert!(requests.try_recv().is_err());
    assert!(app.chat.shows_welcome());
}

#[test]
fn clear_chat_requires_confirmation() {
    let (mut app, requests, responses) = test_app();
    app.chat.push_user("q");
    app.chat.push_assistant("a");

    // Declining leaves the log alone and sends nothing
    press_ctrl(&mut app, 'l');
    press(&mut app, KeyCode::Char('n'));
    assert!(requests.try_recv().is_err());
    assert_eq!(app.chat.messages().len(), 2);

    press_ctrl(&mut app, 'l');
    press(&mut app, KeyCode::Char('y'));
    let ApiRequest::ClearChat { id } = requests.try_recv().unwrap() else {
        panic!("expected a clear request");
    };
    responses
        .send(ApiResponse::ChatCleared {
            id,
            result: Ok(true),
        })
        .unwrap();
    app.on_tick();

    assert!(app.chat.shows_welcome());
}

#[test]
fn upload_prompt_rejects_non_pdf_and_stays_open() {
    let (mut app, requests, _responses) = test_app();

    press_ctrl(&mut app, 'u');
    type_text(&mut app, "notes.txt");
    press(&mut app, KeyCode::Enter);

    // Nothing was sent and the rejection is surfaced as a toast
    assert!(requests.try_recv().is_err());
    assert_eq!(
        app.notifications.current().unwrap().message,
        "Please select a PDF file"
    );

    // The prompt is still up: correcting the name works without reopening
    for _ in 0..3 {
        press(&mut app, KeyCode::Backspace);
    }
    type_text(&mut app, "pdf");
    press(&mut app, KeyCode::Enter);
    // Extension now passes; the missing file is the next failure
    assert!(
        app.notifications
            .current()
            .unwrap()
            .message
            .starts_with("File not found")
    );
    assert!(requests.try_recv().is_err());
}

#[test]
fn upload_of_existing_pdf_switches_documents_on_ack() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("paper.pdf");
    std::fs::write(&path, b"%PDF-1.4 stub").unwrap();

    let (mut app, requests, responses) = test_app();
    press_ctrl(&mut app, 'u');
    type_text(&mut app, path.to_str().unwrap());
    press(&mut app, KeyCode::Enter);

    let ApiRequest::Upload { id, path: sent } = requests.try_recv().unwrap() else {
        panic!("expected an upload request");
    };
    assert_eq!(sent, path);

    responses
        .send(ApiResponse::Uploaded {
            id,
            result: Ok(paperchat::api::UploadedDocument {
                filename: "paper.pdf".into(),
                message: "Document uploaded successfully".into(),
            }),
        })
        .unwrap();
    app.on_tick();

    let ApiRequest::SetActiveDocument { id, filename } = requests.try_recv().unwrap() else {
        panic!("expected a switch request");
    };
    assert_eq!(filename, "paper.pdf");

    responses
        .send(ApiResponse::ActiveDocumentSet {
            id,
            filename,
            result: Ok(true),
        })
        .unwrap();
    app.on_tick();

    assert_eq!(app.active_document.as_deref(), Some("paper.pdf"));
    assert!(matches!(
        requests.try_recv().unwrap(),
        ApiRequest::FetchDocument { .. }
    ));
    assert_eq!(
        app.chat.messages().last().unwrap().text,
        "Now chatting about document: paper.pdf"
    );
}

#[test]
fn answers_from_an_abandoned_question_never_surface() {
    let (mut app, requests, responses) = test_app();

    type_text(&mut app, "first question");
    press(&mut app, KeyCode::Enter);
    let ApiRequest::Ask { id: first, .. } = requests.try_recv().unwrap() else {
        panic!("expected an ask request");
    };

    // The exchange is abandoned by a clear before the answer lands
    press_ctrl(&mut app, 'l');
    press(&mut app, KeyCode::Char('y'));
    let ApiRequest::ClearChat { id: clear } = requests.try_recv().unwrap() else {
        panic!("expected a clear request");
    };
    responses
        .send(ApiResponse::ChatCleared {
            id: clear,
            result: Ok(true),
        })
        .unwrap();
    app.on_tick();
    assert!(app.chat.shows_welcome());

    // A new question goes out; the old answer then arrives late
    type_text(&mut app, "second question");
    press(&mut app, KeyCode::Enter);
    let ApiRequest::Ask { id: second, .. } = requests.try_recv().unwrap() else {
        panic!("expected an ask request");
    };
    responses
        .send(ApiResponse::Answer {
            id: first,
            result: Ok("stale answer".into()),
        })
        .unwrap();
    app.on_tick();

    assert!(app.chat.is_typing());
    assert!(app.chat.messages().iter().all(|m| m.text != "stale answer"));

    responses
        .send(ApiResponse::Answer {
            id: second,
            result: Ok("fresh answer".into()),
        })
        .unwrap();
    app.on_tick();
    assert_eq!(app.chat.messages().last().unwrap().text, "fresh answer");
}
