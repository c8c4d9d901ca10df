//! Backend HTTP client
//!
//! Thin blocking client over the document-chat backend. All request
//! bodies are url-encoded forms except the multipart upload; responses
//! are small JSON envelopes. Nothing here retries - callers surface
//! failures and wait for the user.

pub mod service;

use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

use log::debug;
use regex::Regex;
use serde::Deserialize;

/// The backend may take a while to answer a question (it runs a model),
/// so the request timeout is generous.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors talking to the backend
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Transport-level failure (connection refused, timeout, bad status)
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with an `{error}` payload
    #[error("{0}")]
    Server(String),

    /// 2xx response whose body did not match the expected envelope
    #[error("malformed backend response: {0}")]
    Malformed(String),

    #[error("could not read upload file: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// True for failures the UI should describe as a network problem
    /// rather than echoing backend-provided text.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Malformed(_))
    }
}

/// Successful upload result
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadedDocument {
    pub filename: String,
    pub message: String,
}

#[derive(Deserialize)]
struct AskReply {
    answer: Option<String>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct UploadReply {
    filename: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct AckReply {
    #[serde(default)]
    success: bool,
}

/// Matches the options of the server-rendered document selector on `/`
static SELECTOR_OPTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<option\s+value="([^"]+)""#).expect("selector option regex")
});

/// Blocking HTTP client bound to one backend base URL
pub struct BackendClient {
    http: reqwest::blocking::Client,
    base: String,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    /// `POST /ask` with the question and the active document
    pub fn ask(&self, query: &str, active_document: &str) -> Result<String, ApiError> {
        let reply: AskReply = self
            .http
            .post(self.url("/ask"))
            .form(&[("query", query), ("active_document", active_document)])
            .send()?
            .error_for_status()?
            .json()
            .map_err(|e| ApiError::Malformed(e.to_string()))?;

        if let Some(error) = reply.error {
            return Err(ApiError::Server(error));
        }
        reply
            .answer
            .ok_or_else(|| ApiError::Malformed("reply carries neither answer nor error".into()))
    }

    /// `POST /set_active_document`; returns the backend's success flag
    pub fn set_active_document(&self, filename: &str) -> Result<bool, ApiError> {
        let reply: AckReply = self
            .http
            .post(self.url("/set_active_document"))
            .form(&[("filename", filename)])
            .send()?
            .error_for_status()?
            .json()
            .map_err(|e| ApiError::Malformed(e.to_string()))?;
        Ok(reply.success)
    }

    /// `POST /clear_chat`; returns the backend's success flag
    pub fn clear_chat(&self) -> Result<bool, ApiError> {
        let reply: AckReply = self
            .http
            .post(self.url("/clear_chat"))
            .send()?
            .error_for_status()?
            .json()
            .map_err(|e| ApiError::Malformed(e.to_string()))?;
        Ok(reply.success)
    }

    /// `POST /upload` multipart with field `file`
    pub fn upload(&self, path: &Path) -> Result<UploadedDocument, ApiError> {
        let form = reqwest::blocking::multipart::Form::new().file("file", path)?;
        let reply: UploadReply = self
            .http
            .post(self.url("/upload"))
            .multipart(form)
            .send()?
            .error_for_status()?
            .json()
            .map_err(|e| ApiError::Malformed(e.to_string()))?;

        if let Some(error) = reply.error {
            return Err(ApiError::Server(error));
        }
        let filename = reply
            .filename
            .ok_or_else(|| ApiError::Malformed("upload reply without filename".into()))?;
        Ok(UploadedDocument {
            message: reply
                .message
                .unwrap_or_else(|| "Document uploaded successfully".into()),
            filename,
        })
    }

    /// `GET /pdf/{filename}` returning the raw PDF bytes
    pub fn fetch_pdf(&self, filename: &str) -> Result<Vec<u8>, ApiError> {
        let encoded = urlencoding::encode(filename);
        let bytes = self
            .http
            .get(self.url(&format!("/pdf/{encoded}")))
            .send()?
            .error_for_status()?
            .bytes()?;
        debug!("fetched {} ({} bytes)", filename, bytes.len());
        Ok(bytes.to_vec())
    }

    /// Scrape the document selector of the server-rendered index page.
    /// The backend has no JSON listing endpoint; the selector options on
    /// `/` are the canonical list of uploaded documents.
    pub fn list_documents(&self) -> Result<Vec<String>, ApiError> {
        let html = self
            .http
            .get(self.url("/"))
            .send()?
            .error_for_status()?
            .text()?;
        Ok(parse_document_options(&html))
    }
}

fn parse_document_options(html: &str) -> Vec<String> {
    let mut documents = Vec::new();
    for captures in SELECTOR_OPTION_RE.captures_iter(html) {
        let value = captures[1].trim().to_string();
        if !value.is_empty() && !documents.contains(&value) {
            documents.push(value);
        }
    }
    documents
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_selector_options_in_order() {
        let html = r#"
            <select id="documentSelector">
                <option value="">Choose...</option>
                <option value="report.pdf">report.pdf</option>
                <option value="notes 2.pdf" selected>notes 2.pdf</option>
            </select>
        "#;
        assert_eq!(
            parse_document_options(html),
            vec!["report.pdf".to_string(), "notes 2.pdf".to_string()]
        );
    }

    #[test]
    fn deduplicates_selector_options() {
        let html = r#"<option value="a.pdf"><option value="a.pdf">"#;
        assert_eq!(parse_document_options(html), vec!["a.pdf".to_string()]);
    }

    #[test]
    fn no_options_yields_empty_list() {
        assert!(parse_document_options("<html><body/></html>").is_empty());
    }

    #[test]
    fn server_error_is_not_transport() {
        assert!(!ApiError::Server("no document".into()).is_transport());
        assert!(ApiError::Malformed("bad json".into()).is_transport());
    }
}
