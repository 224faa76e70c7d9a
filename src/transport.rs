use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use tokio::sync::mpsc;

use crate::progress::percent;
use crate::types::{RawResponse, SelectedFile, UploadRequest};

/// Multipart field name for the repeated file parts.
pub const FIELD_FILES: &str = "files[]";

/// Default path of the grid generation endpoint. An earlier deployment used
/// `/api/create-grid`; configure via [`HttpTransport::with_path`].
pub const DEFAULT_PATH: &str = "/api/generate-grid";

/// Default upper bound on one request attempt.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(360);

const UPLOAD_CHUNK: usize = 64 * 1024;

/// Failure below the response-classification layer.
#[derive(Debug, Clone)]
pub enum TransportFailure {
    /// The request was issued but nothing came back: connect failure,
    /// timeout, or a dropped transfer.
    NoResponse { context: String },
    /// The request could not be built before it left the client.
    Setup { message: String },
}

/// Seam between the submission workflow and the wire.
///
/// `send` issues exactly one request for the given payload and reports raw
/// upload progress as percentages in `[0, 100]`; callers are expected to run
/// the values through a [`ProgressTracker`](crate::ProgressTracker).
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(
        &self,
        request: UploadRequest,
        on_progress: &mut dyn FnMut(u8),
    ) -> Result<RawResponse, TransportFailure>;
}

fn normalize(endpoint: String) -> String {
    endpoint.trim_end_matches('/').to_string()
}

/// HTTP transport for a grid service instance.
///
/// Streams each file part in chunks so upload progress can be observed while
/// the body is on the wire.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
    endpoint: String,
    path: String,
    timeout: Duration,
}

impl HttpTransport {
    /// Create a transport pointing at the given service endpoint,
    /// e.g. `http://127.0.0.1:5000`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: normalize(endpoint.into()),
            path: DEFAULT_PATH.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Use a custom `reqwest::Client` (for connection pooling, proxies, TLS).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// Override the generation endpoint path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Override the per-attempt timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Check whether the grid service is reachable via `GET /api/test`.
    pub async fn health(&self) -> Result<bool, TransportFailure> {
        let url = format!("{}/api/test", self.endpoint);
        let resp = self
            .http
            .get(&url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .map_err(|e| TransportFailure::NoResponse {
                context: format!("cannot reach grid service at {}: {}", self.endpoint, e),
            })?;
        Ok(resp.status().is_success())
    }
}

/// Wrap one file's bytes in a chunked stream that publishes the cumulative
/// byte count on every chunk handed to the wire.
fn counting_part(
    file: SelectedFile,
    sent: Arc<AtomicU64>,
    tx: mpsc::UnboundedSender<u64>,
) -> Part {
    let len = file.bytes.len() as u64;
    let chunks: Vec<Vec<u8>> = file
        .bytes
        .chunks(UPLOAD_CHUNK)
        .map(|c| c.to_vec())
        .collect();
    let stream = futures_util::stream::iter(chunks.into_iter().map(move |chunk| {
        let total = sent.fetch_add(chunk.len() as u64, Ordering::Relaxed) + chunk.len() as u64;
        let _ = tx.send(total);
        Ok::<_, std::io::Error>(chunk)
    }));
    Part::stream_with_length(Body::wrap_stream(stream), len).file_name(file.name)
}

impl Transport for HttpTransport {
    async fn send(
        &self,
        request: UploadRequest,
        on_progress: &mut dyn FnMut(u8),
    ) -> Result<RawResponse, TransportFailure> {
        let url = format!("{}{}", self.endpoint, self.path);
        let total_bytes = request.total_bytes();

        let (tx, mut rx) = mpsc::unbounded_channel::<u64>();
        let sent = Arc::new(AtomicU64::new(0));

        let mut form = Form::new();
        for file in request.files {
            form = form.part(FIELD_FILES, counting_part(file, sent.clone(), tx.clone()));
        }
        for (name, value) in request.fields {
            form = form.text(name, value);
        }
        drop(tx);

        let send_fut = self
            .http
            .post(&url)
            .multipart(form)
            .timeout(self.timeout)
            .send();
        tokio::pin!(send_fut);

        // Relay byte counts from the streaming body while the request runs.
        let result = loop {
            tokio::select! {
                Some(count) = rx.recv() => {
                    on_progress(percent(count, total_bytes));
                }
                result = &mut send_fut => break result,
            }
        };
        while let Ok(count) = rx.try_recv() {
            on_progress(percent(count, total_bytes));
        }

        match result {
            Ok(resp) => {
                let status = resp.status().as_u16();
                let headers = resp
                    .headers()
                    .iter()
                    .map(|(name, value)| {
                        (
                            name.as_str().to_string(),
                            value.to_str().unwrap_or_default().to_string(),
                        )
                    })
                    .collect();
                let body = resp
                    .bytes()
                    .await
                    .map_err(|e| TransportFailure::NoResponse {
                        context: format!("failed reading response body: {}", e),
                    })?
                    .to_vec();
                Ok(RawResponse {
                    status,
                    headers,
                    body,
                })
            }
            Err(e) if e.is_builder() => Err(TransportFailure::Setup {
                message: e.to_string(),
            }),
            Err(e) => Err(TransportFailure::NoResponse {
                context: e.to_string(),
            }),
        }
    }
}
