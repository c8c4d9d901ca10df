pub mod api;
pub mod chat;
pub mod event_source;
pub mod main_app;
pub mod notification;
pub mod panic_handler;
pub mod settings;
pub mod theme;
pub mod viewer;
pub mod widget;

pub use api::BackendClient;
pub use api::service::ApiService;
pub use main_app::{App, run_app};
