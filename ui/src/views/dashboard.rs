use std::sync::Arc;

use api::{ApiError, CompareClient, UploadFile};
use dioxus::html::FileEngine;
use dioxus::prelude::*;
use futures::future::{select, Either};
use futures::StreamExt;
use tracing::debug;

use crate::{
    components::{file_name, UploadDropzone},
    core::{config::AppConfig, storage::platform_store, storage::ResultStore, timing},
    export::DASHBOARD_ID,
    results::{
        ranking::PolarityTable, ChartControls, DatasetOverview, ExportButtons, ModelChart,
        ResultsTable,
    },
    t,
    workflow::{ChartKind, Reachability, Workflow},
};

type DashboardWorkflow = Workflow<Box<dyn ResultStore>>;

/// Upload, wait, inspect. The single screen of the application.
#[component]
pub fn Dashboard() -> Element {
    let config = use_hook(AppConfig::from_build_env);
    let client = use_hook({
        let transport = config.client_config();
        move || CompareClient::new(transport)
    });
    let mut workflow =
        use_signal(move || -> DashboardWorkflow { Workflow::restore(platform_store(), config) });

    // Startup probe; the outcome is advisory only.
    use_future({
        let client = client.clone();
        move || {
            let client = client.clone();
            async move {
                let reachable = client.is_reachable().await;
                workflow.write().mark_backend(reachable);
            }
        }
    });

    // One upload at a time: files queue here and run in order.
    let uploads = use_coroutine(move |mut rx: UnboundedReceiver<UploadFile>| {
        let client = client.clone();
        async move {
            while let Some(file) = rx.next().await {
                run_upload(workflow, &client, file).await;
            }
        }
    });

    let on_files = move |engine: Arc<dyn FileEngine>| {
        spawn(async move {
            let Some(path) = engine.files().into_iter().next() else {
                return;
            };
            let name = file_name(&path);
            let size = engine.file_size(&path).await.unwrap_or(0);
            if let Err(err) = workflow.write().begin_upload(&name, size) {
                debug!(%err, "upload not started");
                return;
            }
            match engine.read_file(&path).await {
                Some(bytes) => uploads.send(UploadFile::new(name, bytes)),
                None => workflow
                    .write()
                    .fail(&ApiError::validation(t!("upload-read-failed"))),
            }
        });
    };

    let state = workflow.read();
    let upload = state.upload().clone();
    let can_upload = state.can_upload();
    let unreachable = state.backend() == Reachability::Unreachable;
    let result = state.result().cloned();
    let chart = state.chart();
    let selected = state.selected_metric().map(str::to_string);
    drop(state);

    rsx! {
        main { class: "page dashboard",
            if unreachable {
                div { class: "banner banner--warning", role: "alert",
                    h3 { class: "banner__title", {t!("backend-unreachable-title")} }
                    p { class: "banner__body", {t!("backend-unreachable-body")} }
                    p { class: "banner__body banner__body--strong", {t!("backend-unreachable-demo")} }
                }
            }

            {match result {
                None => rsx! {
                    section { class: "intro",
                        h2 { class: "intro__title", {t!("intro-title")} }
                        p { class: "intro__lead", {t!("intro-lead")} }

                        UploadDropzone {
                            upload: upload.clone(),
                            disabled: !can_upload && !upload.status.is_busy(),
                            on_files,
                        }

                        if let Some(message) = upload.error_message.clone() {
                            div { class: "banner banner--error", role: "alert",
                                p { class: "banner__body", "{message}" }
                            }
                        }

                        ul { class: "intro__features",
                            li { class: "feature",
                                span { class: "feature__icon", "🤖" }
                                h3 { {t!("feature-algorithms-title")} }
                                p { {t!("feature-algorithms-body")} }
                            }
                            li { class: "feature",
                                span { class: "feature__icon", "📊" }
                                h3 { {t!("feature-analysis-title")} }
                                p { {t!("feature-analysis-body")} }
                            }
                            li { class: "feature",
                                span { class: "feature__icon", "⚡" }
                                h3 { {t!("feature-speed-title")} }
                                p { {t!("feature-speed-body")} }
                            }
                        }
                    }
                },
                Some(result) => {
                    let metrics: Vec<String> = result.metric_keys().into_iter().map(str::to_string).collect();
                    let metric = selected.clone().unwrap_or_default();
                    let polarity = PolarityTable::for_result(&result);
                    let summary = format!(
                        "{} {} · {} {}",
                        result.task_type,
                        t!("results-task-suffix"),
                        result.models.len(),
                        t!("results-models-suffix"),
                    );
                    rsx! {
                        section { id: DASHBOARD_ID, class: "results",
                            div { class: "results__header",
                                div {
                                    h2 { class: "results__title", {t!("results-title")} }
                                    p { class: "results__summary", "{summary}" }
                                }
                                div { class: "results__actions",
                                    ExportButtons { result: result.clone(), chart, metric: selected.clone() }
                                    button {
                                        r#type: "button",
                                        class: "button button--ghost",
                                        onclick: move |_| {
                                            workflow.write().reset();
                                        },
                                        {t!("results-reset")}
                                    }
                                }
                            }

                            DatasetOverview { result: result.clone() }

                            section { class: "results-card",
                                div { class: "results-card__header",
                                    h3 { {t!("chart-title")} }
                                }
                                ChartControls {
                                    metrics: metrics.clone(),
                                    chart,
                                    selected: metric.clone(),
                                    on_chart: move |kind: ChartKind| workflow.write().select_chart(kind),
                                    on_metric: move |key: String| {
                                        workflow.write().select_metric(&key);
                                    },
                                }
                                ModelChart { models: result.models.clone(), metrics, chart, metric }
                            }

                            section { class: "results-card",
                                div { class: "results-card__header",
                                    h3 { {t!("table-title")} }
                                }
                                ResultsTable { models: result.models.clone(), polarity }
                            }
                        }
                    }
                }
            }}
        }
    }
}

/// Send one file, stream progress into the workflow, then hold the result for
/// the settle delay before committing it.
async fn run_upload(mut workflow: Signal<DashboardWorkflow>, client: &CompareClient, file: UploadFile) {
    let settle_delay = workflow.peek().config().settle_delay;
    let (progress_tx, mut progress_rx) = futures_channel::mpsc::unbounded::<u8>();

    let outcome = {
        let request = client.compare(file, move |percent| {
            let _ = progress_tx.unbounded_send(percent);
        });
        let drain = async {
            while let Some(percent) = progress_rx.next().await {
                workflow.write().record_progress(percent);
            }
        };
        futures::pin_mut!(request, drain);
        match select(request, drain).await {
            Either::Left((outcome, _)) => outcome,
            Either::Right(((), request)) => request.await,
        }
    };
    while let Ok(Some(percent)) = progress_rx.try_next() {
        workflow.write().record_progress(percent);
    }

    match outcome {
        Ok(result) => {
            if workflow.write().transport_finished(result) {
                timing::sleep(settle_delay).await;
                workflow.write().settle();
            }
        }
        Err(err) => workflow.write().fail(&err),
    }
}
