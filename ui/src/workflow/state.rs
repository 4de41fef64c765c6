//! Plain state values owned by the workflow.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadStatus {
    #[default]
    Idle,
    Uploading,
    Processing,
    Completed,
    Error,
}

impl UploadStatus {
    pub fn is_busy(&self) -> bool {
        matches!(self, UploadStatus::Uploading | UploadStatus::Processing)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UploadStatus::Idle => "idle",
            UploadStatus::Uploading => "uploading",
            UploadStatus::Processing => "processing",
            UploadStatus::Completed => "completed",
            UploadStatus::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadState {
    pub progress_percent: u8,
    pub status: UploadStatus,
    pub error_message: Option<String>,
}

impl UploadState {
    pub fn idle() -> Self {
        Self::default()
    }

    pub(crate) fn uploading(progress_percent: u8) -> Self {
        Self {
            progress_percent,
            status: UploadStatus::Uploading,
            error_message: None,
        }
    }

    pub(crate) fn at(status: UploadStatus, progress_percent: u8) -> Self {
        Self {
            progress_percent,
            status,
            error_message: None,
        }
    }

    pub(crate) fn failed(message: impl Into<String>) -> Self {
        Self {
            progress_percent: 0,
            status: UploadStatus::Error,
            error_message: Some(message.into()),
        }
    }
}

/// Outcome of the startup health probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reachability {
    #[default]
    Unknown,
    Reachable,
    Unreachable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartKind {
    #[default]
    Bar,
    Radar,
}
