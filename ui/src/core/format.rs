//! Formatting helpers for presenting metrics.

/// Display label for a metric key.
pub fn format_metric_name(key: &str) -> String {
    let known = match key {
        "accuracy" => Some("Accuracy"),
        "precision" => Some("Precision"),
        "recall" => Some("Recall"),
        "f1_score" => Some("F1 Score"),
        "roc_auc" => Some("ROC-AUC"),
        "mse" => Some("MSE"),
        "mae" => Some("MAE"),
        "r2_score" => Some("R² Score"),
        "silhouette_score" => Some("Silhouette Score"),
        "inertia" => Some("Inertia"),
        _ => None,
    };

    match known {
        Some(label) => label.to_string(),
        None => title_case(&key.replace('_', " ")),
    }
}

/// Upper-case the first letter of every word (word = run of alphanumerics).
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.push(ch);
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}

pub fn format_fixed(value: f64, places: usize) -> String {
    format!("{value:.places$}")
}

/// `1234567` → `1,234,567`.
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_metrics_use_curated_labels() {
        assert_eq!(format_metric_name("f1_score"), "F1 Score");
        assert_eq!(format_metric_name("roc_auc"), "ROC-AUC");
        assert_eq!(format_metric_name("r2_score"), "R² Score");
        assert_eq!(format_metric_name("mse"), "MSE");
    }

    #[test]
    fn unknown_metrics_are_title_cased() {
        assert_eq!(format_metric_name("custom_metric"), "Custom Metric");
        assert_eq!(format_metric_name("balanced_accuracy_v2"), "Balanced Accuracy V2");
        assert_eq!(format_metric_name("log_loss"), "Log Loss");
    }

    #[test]
    fn fixed_precision() {
        assert_eq!(format_fixed(0.9, 4), "0.9000");
        assert_eq!(format_fixed(1.2344, 3), "1.234");
    }

    #[test]
    fn counts_get_thousands_separators() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    #[test]
    fn capitalize_first_letter_only() {
        assert_eq!(capitalize("regression"), "Regression");
        assert_eq!(capitalize(""), "");
    }
}
