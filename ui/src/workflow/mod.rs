//! Upload → processing → results lifecycle.
//!
//! [`Workflow`] owns the committed comparison and the upload state and is the
//! only place that writes the result cache. Views hold it in a signal and call
//! the transition methods; every transition that is not valid for the current
//! status is ignored and reported through the `bool` return.

mod state;

pub use state::{ChartKind, Reachability, UploadState, UploadStatus};

use api::{validate_upload, ApiError, ComparisonResult};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::core::config::AppConfig;
use crate::core::storage::{persist_result, restore_result, ResultStore};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorkflowError {
    #[error("an upload is already in progress")]
    Busy,
    #[error(transparent)]
    Api(#[from] ApiError),
}

pub struct Workflow<S: ResultStore> {
    store: S,
    config: AppConfig,
    upload: UploadState,
    result: Option<ComparisonResult>,
    pending: Option<ComparisonResult>,
    selected_metric: Option<String>,
    chart: ChartKind,
    backend: Reachability,
}

impl<S: ResultStore> Workflow<S> {
    /// Start from whatever the cache holds. A corrupt entry is dropped.
    pub fn restore(store: S, config: AppConfig) -> Self {
        let result = restore_result(&store);
        let selected_metric = result
            .as_ref()
            .and_then(|r| r.first_metric())
            .map(str::to_string);
        Self {
            store,
            config,
            upload: UploadState::idle(),
            result,
            pending: None,
            selected_metric,
            chart: ChartKind::default(),
            backend: Reachability::default(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn upload(&self) -> &UploadState {
        &self.upload
    }

    pub fn status(&self) -> UploadStatus {
        self.upload.status
    }

    pub fn result(&self) -> Option<&ComparisonResult> {
        self.result.as_ref()
    }

    pub fn chart(&self) -> ChartKind {
        self.chart
    }

    pub fn backend(&self) -> Reachability {
        self.backend
    }

    /// The metric the bar chart plots. Falls back to the first key when
    /// nothing valid is selected.
    pub fn selected_metric(&self) -> Option<&str> {
        let result = self.result.as_ref()?;
        self.selected_metric
            .as_deref()
            .filter(|key| result.metric_keys().contains(key))
            .or_else(|| result.first_metric())
    }

    pub fn can_upload(&self) -> bool {
        !self.upload.status.is_busy() && self.backend != Reachability::Unreachable
    }

    /// Clear the previous outcome and validate the chosen file.
    ///
    /// On a validation failure the workflow lands in `Error` and the error is
    /// returned so the caller skips reading the file.
    pub fn begin_upload(&mut self, name: &str, size: u64) -> Result<(), WorkflowError> {
        if self.upload.status.is_busy() {
            return Err(WorkflowError::Busy);
        }

        self.pending = None;
        self.selected_metric = None;
        self.commit(None);
        self.upload = UploadState::uploading(0);

        if let Err(err) = validate_upload(name, size) {
            self.fail(&err);
            return Err(err.into());
        }

        info!(file = name, size, "upload started");
        Ok(())
    }

    pub fn record_progress(&mut self, percent: u8) -> bool {
        let percent = percent.min(100);
        if self.upload.status != UploadStatus::Uploading || percent <= self.upload.progress_percent
        {
            return false;
        }
        self.upload.progress_percent = percent;
        true
    }

    /// The server answered; hold the result until [`Workflow::settle`].
    pub fn transport_finished(&mut self, result: ComparisonResult) -> bool {
        if self.upload.status != UploadStatus::Uploading {
            debug!(status = self.upload.status.as_str(), "ignoring late response");
            return false;
        }
        self.pending = Some(result);
        self.upload = UploadState::at(UploadStatus::Processing, 100);
        true
    }

    pub fn settle(&mut self) -> bool {
        if self.upload.status != UploadStatus::Processing {
            return false;
        }
        let Some(result) = self.pending.take() else {
            return false;
        };

        info!(
            task = result.task_type.as_str(),
            models = result.models.len(),
            "comparison completed"
        );
        self.selected_metric = result.first_metric().map(str::to_string);
        self.commit(Some(result));
        self.upload = UploadState::at(UploadStatus::Completed, 100);
        true
    }

    pub fn fail(&mut self, err: &ApiError) {
        error!(%err, "upload failed");
        self.pending = None;
        self.upload = UploadState::failed(err.to_string());
    }

    /// Back to the empty drop zone. Refused while a request is in flight.
    pub fn reset(&mut self) -> bool {
        if self.upload.status.is_busy() {
            return false;
        }
        self.pending = None;
        self.selected_metric = None;
        self.commit(None);
        self.upload = UploadState::idle();
        true
    }

    pub fn mark_backend(&mut self, reachable: bool) {
        self.backend = if reachable {
            Reachability::Reachable
        } else {
            Reachability::Unreachable
        };
    }

    /// Only keys the current result reports are accepted.
    pub fn select_metric(&mut self, key: &str) -> bool {
        let known = self
            .result
            .as_ref()
            .is_some_and(|r| r.metric_keys().contains(&key));
        if known {
            self.selected_metric = Some(key.to_string());
        }
        known
    }

    pub fn select_chart(&mut self, kind: ChartKind) {
        self.chart = kind;
    }

    fn commit(&mut self, result: Option<ComparisonResult>) {
        self.result = result;
        if let Err(err) = persist_result(&self.store, self.result.as_ref()) {
            warn!(%err, "could not update result cache");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::storage::tests::sample_result;
    use crate::core::storage::MemoryStore;

    fn fresh() -> Workflow<MemoryStore> {
        Workflow::restore(MemoryStore::new(), AppConfig::default())
    }

    fn completed() -> Workflow<MemoryStore> {
        let mut wf = fresh();
        wf.begin_upload("data.csv", 1024).unwrap();
        wf.transport_finished(sample_result());
        wf.settle();
        wf
    }

    #[test]
    fn happy_path_walks_every_status_in_order() {
        let mut wf = fresh();
        let mut seen = vec![wf.status()];
        let mut progress = vec![wf.upload().progress_percent];

        wf.begin_upload("data.csv", 2048).unwrap();
        seen.push(wf.status());
        for pct in [0, 12, 12, 40, 35, 88, 100] {
            wf.record_progress(pct);
            progress.push(wf.upload().progress_percent);
        }

        assert!(wf.transport_finished(sample_result()));
        seen.push(wf.status());
        assert_eq!(wf.upload().progress_percent, 100);
        assert!(wf.result().is_none());

        assert!(wf.settle());
        seen.push(wf.status());

        assert_eq!(
            seen,
            vec![
                UploadStatus::Idle,
                UploadStatus::Uploading,
                UploadStatus::Processing,
                UploadStatus::Completed,
            ]
        );
        assert!(progress.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(wf.result(), Some(&sample_result()));
        assert!(wf.upload().error_message.is_none());
    }

    #[test]
    fn settle_persists_and_selects_first_metric() {
        let wf = completed();
        assert_eq!(wf.selected_metric(), Some("r2_score"));
        assert_eq!(restore_result(wf.store()), Some(sample_result()));
    }

    #[test]
    fn new_upload_clears_previous_result_and_cache() {
        let mut wf = completed();
        wf.begin_upload("next.csv", 10).unwrap();
        assert!(wf.result().is_none());
        assert!(wf.store().raw().is_none());
        assert_eq!(wf.upload().progress_percent, 0);
    }

    #[test]
    fn invalid_file_goes_straight_to_error() {
        let mut wf = completed();
        let err = wf.begin_upload("notes.txt", 10).unwrap_err();
        assert!(matches!(err, WorkflowError::Api(ApiError::Validation(_))));
        assert_eq!(wf.status(), UploadStatus::Error);
        assert!(wf.upload().error_message.as_deref().unwrap().contains("CSV"));
        assert!(wf.result().is_none());
        assert!(wf.store().raw().is_none());
    }

    #[test]
    fn busy_workflow_rejects_second_upload() {
        let mut wf = fresh();
        wf.begin_upload("a.csv", 1).unwrap();
        assert_eq!(wf.begin_upload("b.csv", 1), Err(WorkflowError::Busy));
        assert!(!wf.can_upload());

        wf.transport_finished(sample_result());
        assert_eq!(wf.begin_upload("b.csv", 1), Err(WorkflowError::Busy));
        assert!(!wf.reset());
    }

    #[test]
    fn failure_reports_message_and_keeps_cache_empty() {
        let mut wf = fresh();
        wf.begin_upload("a.csv", 1).unwrap();
        wf.record_progress(50);
        wf.fail(&ApiError::Remote {
            status: 400,
            message: "Target column missing".into(),
        });
        assert_eq!(wf.status(), UploadStatus::Error);
        assert_eq!(wf.upload().error_message.as_deref(), Some("Target column missing"));
        assert!(wf.store().raw().is_none());
        assert!(wf.can_upload());
    }

    #[test]
    fn late_response_after_failure_is_ignored() {
        let mut wf = fresh();
        wf.begin_upload("a.csv", 1).unwrap();
        wf.fail(&ApiError::Timeout);
        assert!(!wf.transport_finished(sample_result()));
        assert!(!wf.settle());
        assert!(wf.result().is_none());
    }

    #[test]
    fn progress_outside_uploading_is_ignored() {
        let mut wf = fresh();
        assert!(!wf.record_progress(30));
        assert_eq!(wf.upload().progress_percent, 0);
    }

    #[test]
    fn reset_clears_result_and_cache() {
        let mut wf = completed();
        assert!(wf.reset());
        assert_eq!(wf.upload(), &UploadState::idle());
        assert!(wf.result().is_none());
        assert!(wf.store().raw().is_none());
    }

    #[test]
    fn restore_picks_up_cached_result() {
        let store = MemoryStore::new();
        persist_result(&store, Some(&sample_result())).unwrap();
        let wf = Workflow::restore(store, AppConfig::default());
        assert_eq!(wf.result(), Some(&sample_result()));
        assert_eq!(wf.status(), UploadStatus::Idle);
        assert_eq!(wf.selected_metric(), Some("r2_score"));
    }

    #[test]
    fn unreachable_backend_blocks_uploads_but_keeps_results() {
        let store = MemoryStore::new();
        persist_result(&store, Some(&sample_result())).unwrap();
        let mut wf = Workflow::restore(store, AppConfig::default());
        wf.mark_backend(false);
        assert_eq!(wf.backend(), Reachability::Unreachable);
        assert!(!wf.can_upload());
        assert!(wf.result().is_some());

        wf.mark_backend(true);
        assert!(wf.can_upload());
    }

    #[test]
    fn metric_selection_only_accepts_known_keys() {
        let mut wf = completed();
        assert!(wf.select_metric("mse"));
        assert_eq!(wf.selected_metric(), Some("mse"));
        assert!(!wf.select_metric("accuracy"));
        assert_eq!(wf.selected_metric(), Some("mse"));

        wf.select_chart(ChartKind::Radar);
        assert_eq!(wf.chart(), ChartKind::Radar);
    }
}
