//! Client side of the model comparison backend: wire types, upload checks and the
//! HTTP client that talks to `/api/v1/compare` and `/health`.

mod client;
mod deadline;
mod error;
mod progress;
mod types;
mod upload;

pub use client::{ClientConfig, CompareClient, DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT};
pub use error::ApiError;
pub use progress::ProgressTracker;
pub use types::{
    ComparisonResult, DatasetInfo, ErrorEnvelope, HealthStatus, ModelResult, Polarity,
    PreprocessingInfo, TaskType,
};
pub use upload::{validate_upload, UploadFile, MAX_UPLOAD_BYTES};
