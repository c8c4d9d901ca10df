use std::fs::File;
use std::io::stdout;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{error, info};
use ratatui::{Terminal, backend::CrosstermBackend};
use simplelog::{Config, LevelFilter, WriteLogger};

use paperchat::api::BackendClient;
use paperchat::api::service::ApiService;
use paperchat::event_source::TerminalEventSource;
use paperchat::main_app::{App, run_app};
use paperchat::panic_handler::initialize_panic_handler;
use paperchat::{settings, theme};

/// Terminal client for a document-chat backend
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Base URL of the backend
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    backend: String,

    /// Document to open on startup
    #[arg(value_name = "FILENAME")]
    document: Option<String>,

    /// Log file path
    #[arg(long, default_value = "paperchat.log")]
    log_file: String,

    /// Override the persisted theme (light or dark)
    #[arg(long)]
    theme: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    WriteLogger::init(
        LevelFilter::Debug,
        Config::default(),
        File::create(&args.log_file)
            .with_context(|| format!("could not create log file {}", args.log_file))?,
    )?;
    info!("starting paperchat against {}", args.backend);

    settings::load_settings();
    let theme_name = args.theme.unwrap_or_else(settings::theme_name);
    theme::set_theme(theme::ThemeId::from_name(&theme_name));

    let client = BackendClient::new(&args.backend)
        .with_context(|| format!("could not build client for {}", args.backend))?;
    let api = ApiService::spawn(client);

    let mut app = App::new(api);
    if let Some(document) = args.document {
        app.switch_document(document);
    }

    initialize_panic_handler();
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut events = TerminalEventSource;
    let result = run_app(&mut terminal, &mut app, &mut events);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        error!("application error: {err:?}");
    }
    info!("shutting down");
    result
}
