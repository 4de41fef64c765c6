use api::ComparisonResult;
use dioxus::prelude::*;
use tracing::error;

use crate::{
    core::platform,
    export::{export_csv, export_report, Delivered, ExportError, ReportRequest},
    t,
    workflow::ChartKind,
};

#[derive(Clone, Debug, PartialEq)]
enum ExportStatus {
    Idle,
    Working(&'static str),
    Done(String),
    Error(String),
}

fn describe(delivered: Delivered) -> String {
    match delivered {
        Delivered::Download => t!("export-download-started"),
        Delivered::Saved(path) => format!("{} {path}", t!("export-saved-to")),
    }
}

fn settle_status(outcome: Result<Delivered, ExportError>) -> ExportStatus {
    match outcome {
        Ok(delivered) => ExportStatus::Done(describe(delivered)),
        Err(err) => {
            error!(%err, "export failed");
            ExportStatus::Error(err.to_string())
        }
    }
}

/// How the outcome of an export is surfaced.
#[derive(Debug, Clone, PartialEq)]
enum Notice {
    None,
    /// Status line next to the buttons.
    Inline(String),
    /// Modal that stays up until dismissed.
    Blocking(String),
}

fn notice_for(status: &ExportStatus) -> Notice {
    match status {
        ExportStatus::Idle | ExportStatus::Working(_) => Notice::None,
        ExportStatus::Done(message) => Notice::Inline(format!("✅ {message}")),
        ExportStatus::Error(err) => Notice::Blocking(err.clone()),
    }
}

#[component]
pub fn ExportButtons(result: ComparisonResult, chart: ChartKind, metric: Option<String>) -> Element {
    let mut status = use_signal(|| ExportStatus::Idle);
    let busy = use_signal(|| false);

    let notice = notice_for(&status());

    let csv_handler = {
        let result = result.clone();
        let mut status_signal = status;
        let mut busy_signal = busy;
        move |_| {
            if busy_signal() {
                return;
            }
            busy_signal.set(true);
            status_signal.set(ExportStatus::Working("csv"));
            let result = result.clone();
            platform::spawn_future(async move {
                let outcome = export_csv(&result).await;
                status_signal.set(settle_status(outcome));
                busy_signal.set(false);
            });
        }
    };

    let pdf_handler = {
        let result = result.clone();
        let metric = metric.clone();
        let mut status_signal = status;
        let mut busy_signal = busy;
        move |_| {
            if busy_signal() {
                return;
            }
            busy_signal.set(true);
            status_signal.set(ExportStatus::Working("pdf"));
            let request = ReportRequest {
                result: Some(result.clone()),
                chart,
                metric: metric.clone(),
            };
            platform::spawn_future(async move {
                let outcome = export_report(request).await;
                status_signal.set(settle_status(outcome));
                busy_signal.set(false);
            });
        }
    };

    let generating = status() == ExportStatus::Working("pdf");

    rsx! {
        div { class: "export-buttons",
            button {
                r#type: "button",
                class: "button",
                disabled: busy(),
                onclick: csv_handler,
                {t!("export-csv")}
            }
            button {
                r#type: "button",
                class: "button button--primary",
                disabled: busy(),
                onclick: pdf_handler,
                if generating {
                    span { class: "spinner spinner--small" }
                    {t!("export-generating")}
                } else {
                    {t!("export-pdf")}
                }
            }
            span { class: "export-buttons__hint", {t!("export-hint")} }
        }
        {match notice {
            Notice::None => rsx! {},
            Notice::Inline(message) => rsx! {
                p { class: "export-buttons__feedback export-buttons__feedback--success", role: "status", "{message}" }
            },
            Notice::Blocking(message) => rsx! {
                div { class: "modal-backdrop",
                    div {
                        class: "modal modal--error",
                        role: "alertdialog",
                        aria_modal: "true",
                        aria_labelledby: "export-error-title",
                        h3 { id: "export-error-title", class: "modal__title", {t!("export-error-title")} }
                        p { class: "modal__body", "{message}" }
                        div { class: "modal__actions",
                            button {
                                r#type: "button",
                                class: "button button--primary",
                                autofocus: true,
                                onclick: move |_| status.set(ExportStatus::Idle),
                                {t!("common-dismiss")}
                            }
                        }
                    }
                }
            },
        }}
    }
}
