//! HTTP client for the comparison backend.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use tracing::{debug, info, warn};

use crate::deadline::with_deadline;
use crate::{ApiError, ComparisonResult, ErrorEnvelope, HealthStatus, ProgressTracker, UploadFile};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Upper bound for a whole comparison round trip (upload + training).
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5 * 60);

const HEALTH_TIMEOUT: Duration = Duration::from_secs(10);
const COMPARE_PATH: &str = "/api/v1/compare";
/// Message for error bodies that are JSON but name no reason.
const UPLOAD_FAILED: &str = "Upload failed";
const HEALTH_PATH: &str = "/health";
const UPLOAD_FIELD: &str = "file";
const CSV_MIME: &str = "text/csv";

#[cfg(not(target_arch = "wasm32"))]
const CHUNK_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Clone)]
pub struct CompareClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl CompareClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Upload `file` and wait for the backend's comparison.
    ///
    /// `on_progress` receives whole percentages in non-decreasing order and is
    /// not called again once this future resolves.
    pub async fn compare<P>(
        &self,
        file: UploadFile,
        on_progress: P,
    ) -> Result<ComparisonResult, ApiError>
    where
        P: Fn(u8) + Send + Sync + 'static,
    {
        file.validate()?;

        let url = self.config.endpoint(COMPARE_PATH);
        info!(file = %file.name, bytes = file.size(), %url, "uploading dataset for comparison");

        let reporter = Reporter::new(file.size(), Arc::new(on_progress));
        let request = async {
            let form = Form::new().part(UPLOAD_FIELD, upload_part(file, reporter.clone())?);
            let response = self.http.post(&url).multipart(form).send().await?;
            reporter.emit(100);

            let status = response.status();
            let body = response.text().await?;
            decode_compare_response(status.as_u16(), status.canonical_reason(), &body)
        };

        let outcome = with_deadline(request, self.config.request_timeout).await;
        match &outcome {
            Ok(result) => info!(
                task = %result.task_type,
                models = result.models.len(),
                "comparison received"
            ),
            Err(err) => warn!(%err, "comparison request failed"),
        }
        outcome
    }

    pub async fn health_check(&self) -> Result<HealthStatus, ApiError> {
        let url = self.config.endpoint(HEALTH_PATH);
        let request = async {
            let response = self.http.get(&url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(ApiError::Remote {
                    status: status.as_u16(),
                    message: "API health check failed".to_string(),
                });
            }
            response
                .json::<HealthStatus>()
                .await
                .map_err(|err| ApiError::invalid_response(err.to_string()))
        };
        with_deadline(request, HEALTH_TIMEOUT).await
    }

    /// Health probe folded into a yes/no answer. Never fails.
    pub async fn is_reachable(&self) -> bool {
        match self.health_check().await {
            Ok(health) => {
                debug!(status = %health.status, "comparison backend reachable");
                true
            }
            Err(err) => {
                warn!(%err, base_url = %self.config.base_url, "comparison backend unreachable");
                false
            }
        }
    }
}

impl Default for CompareClient {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

/// Map a finished HTTP exchange onto the comparison outcome.
pub(crate) fn decode_compare_response(
    status: u16,
    reason: Option<&str>,
    body: &str,
) -> Result<ComparisonResult, ApiError> {
    if status == 200 {
        return serde_json::from_str(body).map_err(|err| ApiError::invalid_response(err.to_string()));
    }

    let message = match serde_json::from_str::<serde_json::Value>(body) {
        Ok(json) => ErrorEnvelope::from_json(json)
            .message()
            .unwrap_or(UPLOAD_FAILED)
            .to_string(),
        Err(_) => match reason {
            Some(reason) => format!("HTTP {status}: {reason}"),
            None => format!("HTTP {status}"),
        },
    };
    Err(ApiError::Remote { status, message })
}

#[derive(Clone)]
struct Reporter {
    tracker: Arc<Mutex<ProgressTracker>>,
    sink: Arc<dyn Fn(u8) + Send + Sync>,
}

impl Reporter {
    fn new(total: u64, sink: Arc<dyn Fn(u8) + Send + Sync>) -> Self {
        Self {
            tracker: Arc::new(Mutex::new(ProgressTracker::new(total))),
            sink,
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn advance(&self, bytes: u64) {
        self.push(|tracker| tracker.advance(bytes));
    }

    fn emit(&self, pct: u8) {
        self.push(|tracker| tracker.emit(pct));
    }

    fn push(&self, step: impl FnOnce(&mut ProgressTracker) -> Option<u8>) {
        let next = match self.tracker.lock() {
            Ok(mut tracker) => step(&mut tracker),
            Err(_) => None,
        };
        if let Some(pct) = next {
            debug!(pct, "upload progress");
            (self.sink)(pct);
        }
    }
}

/// Streams the dataset in fixed-size chunks so progress follows the bytes the
/// transport has actually pulled.
#[cfg(not(target_arch = "wasm32"))]
fn upload_part(file: UploadFile, reporter: Reporter) -> Result<Part, ApiError> {
    use bytes::Bytes;
    use futures::StreamExt;

    let total = file.size();
    let data = Bytes::from(file.bytes);
    let chunks: Vec<Bytes> = (0..data.len())
        .step_by(CHUNK_SIZE)
        .map(|start| data.slice(start..(start + CHUNK_SIZE).min(data.len())))
        .collect();

    reporter.emit(0);
    let stream = futures::stream::iter(chunks).map(move |chunk| {
        reporter.advance(chunk.len() as u64);
        Ok::<Bytes, std::io::Error>(chunk)
    });

    let part = Part::stream_with_length(reqwest::Body::wrap_stream(stream), total)
        .file_name(file.name)
        .mime_str(CSV_MIME)?;
    Ok(part)
}

/// Browser fetch exposes no upload progress; report the start and let the
/// caller report completion.
#[cfg(target_arch = "wasm32")]
fn upload_part(file: UploadFile, reporter: Reporter) -> Result<Part, ApiError> {
    reporter.emit(0);
    let part = Part::bytes(file.bytes)
        .file_name(file.name)
        .mime_str(CSV_MIME)?;
    Ok(part)
}
