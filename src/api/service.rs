//! Backend request service
//!
//! UI handlers never talk HTTP directly: they enqueue requests here and
//! poll for responses each tick, so the event loop stays responsive while
//! a request is in flight. Every request carries a monotonic [`RequestId`]
//! and belongs to a logical [`Stream`]; when responses arrive out of order
//! (an old ask finishing after a newer one was issued) the stale response
//! is discarded instead of overwriting the newer render.

use std::collections::HashMap;
use std::path::PathBuf;

use flume::{Receiver, Sender};
use log::{debug, error};

use super::{ApiError, BackendClient, UploadedDocument};

/// Unique identifier for backend requests, increasing per service
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

/// Logical request stream; staleness is tracked per stream
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stream {
    /// Question/answer exchanges
    Chat,
    /// Document fetches driving the viewer
    Viewer,
    /// Uploads
    Upload,
    /// Acks that must never be dropped (switch, clear, listing)
    Control,
}

/// Request sent to the worker
#[derive(Debug)]
pub enum ApiRequest {
    Ask {
        id: RequestId,
        query: String,
        active_document: String,
    },
    FetchDocument {
        id: RequestId,
        filename: String,
    },
    Upload {
        id: RequestId,
        path: PathBuf,
    },
    SetActiveDocument {
        id: RequestId,
        filename: String,
    },
    ClearChat {
        id: RequestId,
    },
    ListDocuments {
        id: RequestId,
    },
    Shutdown,
}

/// Response from the worker
#[derive(Debug)]
pub enum ApiResponse {
    Answer {
        id: RequestId,
        result: Result<String, ApiError>,
    },
    Document {
        id: RequestId,
        filename: String,
        result: Result<Vec<u8>, ApiError>,
    },
    Uploaded {
        id: RequestId,
        result: Result<UploadedDocument, ApiError>,
    },
    ActiveDocumentSet {
        id: RequestId,
        filename: String,
        result: Result<bool, ApiError>,
    },
    ChatCleared {
        id: RequestId,
        result: Result<bool, ApiError>,
    },
    DocumentList {
        id: RequestId,
        result: Result<Vec<String>, ApiError>,
    },
}

impl ApiResponse {
    #[must_use]
    pub fn id(&self) -> RequestId {
        match self {
            Self::Answer { id, .. }
            | Self::Document { id, .. }
            | Self::Uploaded { id, .. }
            | Self::ActiveDocumentSet { id, .. }
            | Self::ChatCleared { id, .. }
            | Self::DocumentList { id, .. } => *id,
        }
    }

    #[must_use]
    pub fn stream(&self) -> Stream {
        match self {
            Self::Answer { .. } => Stream::Chat,
            Self::Document { .. } => Stream::Viewer,
            Self::Uploaded { .. } => Stream::Upload,
            Self::ActiveDocumentSet { .. } | Self::ChatCleared { .. } | Self::DocumentList { .. } => {
                Stream::Control
            }
        }
    }
}

/// Handle to the background worker; owned by the app
pub struct ApiService {
    request_tx: Sender<ApiRequest>,
    response_rx: Receiver<ApiResponse>,
    next_request_id: u64,
    /// Latest request id issued per stream; older responses are stale
    latest: HashMap<Stream, RequestId>,
}

impl ApiService {
    /// Spawn the worker thread around a connected client
    #[must_use]
    pub fn spawn(client: BackendClient) -> Self {
        let (request_tx, request_rx) = flume::unbounded();
        let (response_tx, response_rx) = flume::unbounded();

        std::thread::spawn(move || {
            api_worker(&client, &request_rx, &response_tx);
        });

        Self::from_channels(request_tx, response_rx)
    }

    /// Build a service with no worker attached. The returned channel ends
    /// let tests inspect queued requests and inject responses.
    #[must_use]
    pub fn detached() -> (Self, Receiver<ApiRequest>, Sender<ApiResponse>) {
        let (request_tx, request_rx) = flume::unbounded();
        let (response_tx, response_rx) = flume::unbounded();
        (
            Self::from_channels(request_tx, response_rx),
            request_rx,
            response_tx,
        )
    }

    fn from_channels(
        request_tx: Sender<ApiRequest>,
        response_rx: Receiver<ApiResponse>,
    ) -> Self {
        Self {
            request_tx,
            response_rx,
            next_request_id: 1,
            latest: HashMap::new(),
        }
    }

    pub fn ask(&mut self, query: String, active_document: String) -> RequestId {
        let id = self.next_id(Stream::Chat);
        let _ = self.request_tx.send(ApiRequest::Ask {
            id,
            query,
            active_document,
        });
        id
    }

    pub fn fetch_document(&mut self, filename: String) -> RequestId {
        let id = self.next_id(Stream::Viewer);
        let _ = self
            .request_tx
            .send(ApiRequest::FetchDocument { id, filename });
        id
    }

    pub fn upload(&mut self, path: PathBuf) -> RequestId {
        let id = self.next_id(Stream::Upload);
        let _ = self.request_tx.send(ApiRequest::Upload { id, path });
        id
    }

    pub fn set_active_document(&mut self, filename: String) -> RequestId {
        let id = self.next_id(Stream::Control);
        let _ = self
            .request_tx
            .send(ApiRequest::SetActiveDocument { id, filename });
        id
    }

    pub fn clear_chat(&mut self) -> RequestId {
        let id = self.next_id(Stream::Control);
        let _ = self.request_tx.send(ApiRequest::ClearChat { id });
        id
    }

    pub fn list_documents(&mut self) -> RequestId {
        let id = self.next_id(Stream::Control);
        let _ = self.request_tx.send(ApiRequest::ListDocuments { id });
        id
    }

    /// Drain completed responses, dropping stale ones. Control acks are
    /// never dropped - each one matters regardless of ordering.
    pub fn poll_responses(&mut self) -> Vec<ApiResponse> {
        let mut responses = Vec::new();
        while let Ok(response) = self.response_rx.try_recv() {
            let stream = response.stream();
            if stream != Stream::Control
                && self.latest.get(&stream) != Some(&response.id())
            {
                debug!(
                    "discarding stale {:?} response {:?} (latest is {:?})",
                    stream,
                    response.id(),
                    self.latest.get(&stream)
                );
                continue;
            }
            responses.push(response);
        }
        responses
    }

    pub fn shutdown(&self) {
        let _ = self.request_tx.send(ApiRequest::Shutdown);
    }

    fn next_id(&mut self, stream: Stream) -> RequestId {
        let id = RequestId(self.next_request_id);
        self.next_request_id += 1;
        if stream != Stream::Control {
            self.latest.insert(stream, id);
        }
        id
    }
}

impl Drop for ApiService {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn api_worker(
    client: &BackendClient,
    request_rx: &Receiver<ApiRequest>,
    response_tx: &Sender<ApiResponse>,
) {
    while let Ok(request) = request_rx.recv() {
        let response = match request {
            ApiRequest::Ask {
                id,
                query,
                active_document,
            } => ApiResponse::Answer {
                id,
                result: client.ask(&query, &active_document),
            },

            ApiRequest::FetchDocument { id, filename } => {
                let result = client.fetch_pdf(&filename);
                ApiResponse::Document {
                    id,
                    filename,
                    result,
                }
            }

            ApiRequest::Upload { id, path } => ApiResponse::Uploaded {
                id,
                result: client.upload(&path),
            },

            ApiRequest::SetActiveDocument { id, filename } => {
                let result = client.set_active_document(&filename);
                ApiResponse::ActiveDocumentSet {
                    id,
                    filename,
                    result,
                }
            }

            ApiRequest::ClearChat { id } => ApiResponse::ChatCleared {
                id,
                result: client.clear_chat(),
            },

            ApiRequest::ListDocuments { id } => ApiResponse::DocumentList {
                id,
                result: client.list_documents(),
            },

            ApiRequest::Shutdown => break,
        };

        if let Err(e) = response_tx.send(response) {
            error!("api worker response channel closed: {e}");
            break;
        }
    }
}
