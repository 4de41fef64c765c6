//! Payloads exchanged with the comparison backend.
//!
//! Field names follow the backend's snake_case JSON. Metric maps keep their wire
//! order because the first key drives ranking and the default chart metric.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Classification,
    Regression,
    Clustering,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Classification => "classification",
            TaskType::Regression => "regression",
            TaskType::Clustering => "clustering",
        }
    }
}

impl std::fmt::Display for TaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a larger or smaller score is the better one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    HigherIsBetter,
    LowerIsBetter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResult {
    pub name: String,
    #[serde(rename = "type")]
    pub task: TaskType,
    pub metrics: IndexMap<String, f64>,
    pub training_time: f64,
}

impl ModelResult {
    /// Score for `key`, NaN when this model did not report it.
    pub fn metric(&self, key: &str) -> f64 {
        self.metrics.get(key).copied().unwrap_or(f64::NAN)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetInfo {
    #[serde(rename = "rows")]
    pub row_count: u64,
    #[serde(rename = "columns")]
    pub column_count: u64,
    #[serde(rename = "features", default)]
    pub feature_names: Vec<String>,
    #[serde(rename = "target", default, skip_serializing_if = "Option::is_none")]
    pub target_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessingInfo {
    pub missing_values_handled: u64,
    pub categorical_features_encoded: u64,
    pub features_scaled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub task_type: TaskType,
    pub models: Vec<ModelResult>,
    pub dataset_info: DatasetInfo,
    pub preprocessing_info: PreprocessingInfo,
    /// Optional per-metric polarity hints sent by the backend.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub metric_polarity: IndexMap<String, Polarity>,
}

impl ComparisonResult {
    /// Metric keys in the order the first model reports them.
    pub fn metric_keys(&self) -> Vec<&str> {
        self.models
            .first()
            .map(|model| model.metrics.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn first_metric(&self) -> Option<&str> {
        self.models
            .first()
            .and_then(|model| model.metrics.keys().next())
            .map(String::as_str)
    }
}

/// Error body returned by the backend on non-2xx responses. Both fields are
/// free-form: FastAPI puts a list of issues in `detail` on validation errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub detail: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<serde_json::Value>,
}

impl ErrorEnvelope {
    /// Read any JSON document as an envelope; non-objects carry no detail.
    pub fn from_json(json: serde_json::Value) -> Self {
        serde_json::from_value(json).unwrap_or_default()
    }

    /// `detail` when it is a non-blank string.
    pub fn message(&self) -> Option<&str> {
        self.detail.as_str().filter(|detail| !detail.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SAMPLE: &str = r#"{
        "task_type": "regression",
        "models": [
            {"name": "Ridge", "type": "regression", "metrics": {"r2_score": 0.91, "mse": 3.2, "mae": 1.1}, "training_time": 0.05},
            {"name": "Lasso", "type": "regression", "metrics": {"r2_score": 0.88, "mse": 3.9, "mae": 1.3}, "training_time": 0.04}
        ],
        "dataset_info": {"rows": 506, "columns": 14, "features": ["crim", "zn"], "target": "medv"},
        "preprocessing_info": {"missing_values_handled": 3, "categorical_features_encoded": 0, "features_scaled": true}
    }"#;

    #[test]
    fn decodes_backend_payload() {
        let result: ComparisonResult = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(result.task_type, TaskType::Regression);
        assert_eq!(result.models.len(), 2);
        assert_eq!(result.dataset_info.row_count, 506);
        assert_eq!(result.dataset_info.target_name.as_deref(), Some("medv"));
        assert!(result.preprocessing_info.features_scaled);
        assert!(result.metric_polarity.is_empty());
    }

    #[test]
    fn metric_order_follows_the_wire() {
        let result: ComparisonResult = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(result.metric_keys(), vec!["r2_score", "mse", "mae"]);
        assert_eq!(result.first_metric(), Some("r2_score"));
    }

    #[test]
    fn missing_metric_reads_as_nan() {
        let result: ComparisonResult = serde_json::from_str(SAMPLE).unwrap();
        assert!(result.models[0].metric("accuracy").is_nan());
        assert_eq!(result.models[1].metric("mse"), 3.9);
    }

    #[test]
    fn polarity_hints_are_optional_on_the_wire() {
        let mut value: serde_json::Value = serde_json::from_str(SAMPLE).unwrap();
        value["metric_polarity"] = serde_json::json!({"mse": "lower_is_better"});
        let result: ComparisonResult = serde_json::from_value(value).unwrap();
        assert_eq!(
            result.metric_polarity.get("mse"),
            Some(&Polarity::LowerIsBetter)
        );
    }

    #[test]
    fn error_envelope_code_is_optional() {
        let env: ErrorEnvelope = serde_json::from_str(r#"{"detail": "Only CSV files are supported"}"#).unwrap();
        assert_eq!(env.message(), Some("Only CSV files are supported"));
        assert!(env.code.is_none());
    }

    #[test]
    fn error_envelope_without_string_detail_has_no_message() {
        let listed = ErrorEnvelope::from_json(json!({
            "detail": [{"loc": ["body", "file"], "msg": "field required"}]
        }));
        assert_eq!(listed.message(), None);

        assert_eq!(ErrorEnvelope::from_json(json!({"code": 7})).message(), None);
        assert_eq!(ErrorEnvelope::from_json(json!(["oops"])).message(), None);
        assert_eq!(ErrorEnvelope::from_json(json!({"detail": "  "})).message(), None);
    }
}
