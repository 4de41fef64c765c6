use api::ComparisonResult;
use dioxus::prelude::*;

use crate::{
    core::format::{capitalize, format_count},
    t,
};

/// Feature chips shown before collapsing the rest into "+N more".
pub const FEATURE_PREVIEW: usize = 10;

/// Visible feature names plus how many were left out.
pub fn feature_preview(features: &[String]) -> (&[String], usize) {
    let shown = features.len().min(FEATURE_PREVIEW);
    (&features[..shown], features.len() - shown)
}

#[component]
pub fn DatasetOverview(result: ComparisonResult) -> Element {
    let dataset = &result.dataset_info;
    let prep = &result.preprocessing_info;
    let rows = format_count(dataset.row_count);
    let columns = dataset.column_count;
    let task = capitalize(result.task_type.as_str());
    let scaled = if prep.features_scaled {
        t!("common-yes")
    } else {
        t!("common-no")
    };
    let (features, hidden) = feature_preview(&dataset.feature_names);

    rsx! {
        section { class: "results-card dataset-overview",
            div { class: "results-card__header",
                h3 { {t!("dataset-title")} }
            }

            div { class: "dataset-overview__cards",
                InfoCard { title: t!("dataset-rows"), value: rows, description: t!("dataset-rows-hint") }
                InfoCard { title: t!("dataset-columns"), value: columns.to_string(), description: t!("dataset-columns-hint") }
                InfoCard { title: t!("dataset-task"), value: task, description: t!("dataset-task-hint") }
            }

            div { class: "dataset-overview__panel",
                h4 { {t!("preprocessing-title")} }
                dl { class: "dataset-overview__facts",
                    dt { {t!("preprocessing-missing")} }
                    dd { "{prep.missing_values_handled}" }
                    dt { {t!("preprocessing-categorical")} }
                    dd { "{prep.categorical_features_encoded}" }
                    dt { {t!("preprocessing-scaled")} }
                    dd { "{scaled}" }
                    if let Some(target) = dataset.target_name.as_ref() {
                        dt { {t!("dataset-target")} }
                        dd { "{target}" }
                    }
                }
            }

            if !features.is_empty() {
                div { class: "dataset-overview__panel",
                    h4 { {t!("dataset-features")} }
                    ul { class: "feature-chips",
                        for (idx, feature) in features.iter().enumerate() {
                            li { key: "{idx}", class: "feature-chip", "{feature}" }
                        }
                        if hidden > 0 {
                            li { class: "feature-chip feature-chip--more", "+{hidden} " {t!("dataset-features-more")} }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn InfoCard(title: String, value: String, description: String) -> Element {
    rsx! {
        div { class: "info-card",
            p { class: "info-card__title", "{title}" }
            p { class: "info-card__value", "{value}" }
            p { class: "info-card__hint", "{description}" }
        }
    }
}
