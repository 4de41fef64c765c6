use api::{ModelResult, Polarity};
use dioxus::prelude::*;

use crate::{
    core::format::{format_fixed, format_metric_name},
    results::ranking::{Comparison, PolarityTable, Standing},
    t,
};

/// One rendered row, ranked and annotated.
#[derive(Debug, Clone, PartialEq)]
struct Row {
    rank: usize,
    name: String,
    task: String,
    cells: Vec<Cell>,
    training_time: String,
}

#[derive(Debug, Clone, PartialEq)]
struct Cell {
    metric: String,
    value: String,
    marker: Option<Marker>,
}

/// Arrow next to a metric value. Direction follows the value, colour follows
/// whether that direction is good for the metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Marker {
    up: bool,
    good: bool,
}

impl Marker {
    fn of(standing: Standing, polarity: Polarity) -> Self {
        let good = standing == Standing::Best;
        let up = match polarity {
            Polarity::HigherIsBetter => good,
            Polarity::LowerIsBetter => !good,
        };
        Self { up, good }
    }

    fn glyph(&self) -> &'static str {
        if self.up {
            "▲"
        } else {
            "▼"
        }
    }

    fn class(&self) -> &'static str {
        if self.good {
            "results-table__marker results-table__marker--best"
        } else {
            "results-table__marker results-table__marker--worst"
        }
    }
}

fn build_rows(models: &[ModelResult], polarity: &PolarityTable) -> (Vec<String>, Vec<Row>) {
    let comparison = Comparison::new(models, polarity);
    let rows = comparison
        .ranked
        .iter()
        .enumerate()
        .map(|(idx, model)| Row {
            rank: idx + 1,
            name: model.name.clone(),
            task: model.task.to_string(),
            cells: comparison
                .metrics
                .iter()
                .map(|metric| Cell {
                    metric: metric.clone(),
                    value: format_fixed(model.metric(metric), 4),
                    marker: comparison
                        .standing(metric, model)
                        .zip(comparison.polarity(metric))
                        .map(|(standing, polarity)| Marker::of(standing, polarity)),
                })
                .collect(),
            training_time: format_fixed(model.training_time, 3),
        })
        .collect();
    (comparison.metrics, rows)
}

fn row_class(rank: usize) -> &'static str {
    if rank == 1 {
        "results-table__row results-table__row--leader"
    } else {
        "results-table__row"
    }
}

fn badge_class(rank: usize) -> &'static str {
    match rank {
        1 => "rank-badge rank-badge--gold",
        2 => "rank-badge rank-badge--silver",
        3 => "rank-badge rank-badge--bronze",
        _ => "rank-badge",
    }
}

#[component]
pub fn ResultsTable(models: Vec<ModelResult>, polarity: PolarityTable) -> Element {
    if models.is_empty() {
        return rsx! {};
    }

    let (metrics, rows) = build_rows(&models, &polarity);

    rsx! {
        div { class: "results-table__scroll",
            table { class: "results-table",
                thead {
                    tr {
                        th { {t!("table-rank")} }
                        th { {t!("table-model")} }
                        for metric in metrics.iter() {
                            th { key: "{metric}", {format_metric_name(metric)} }
                        }
                        th { {t!("table-training-time")} }
                    }
                }
                tbody {
                    for row in rows.into_iter() {
                        tr {
                            key: "{row.rank}-{row.name}",
                            class: row_class(row.rank),
                            td {
                                span { class: badge_class(row.rank), "{row.rank}" }
                                if row.rank == 1 {
                                    span { class: "results-table__best", {t!("table-best")} }
                                }
                            }
                            td {
                                div { class: "results-table__model", "{row.name}" }
                                div { class: "results-table__task", "{row.task}" }
                            }
                            for cell in row.cells.iter() {
                                td { key: "{cell.metric}", class: "results-table__metric",
                                    "{cell.value}"
                                    if let Some(marker) = cell.marker {
                                        span { class: marker.class(), {marker.glyph()} }
                                    }
                                }
                            }
                            td { class: "results-table__metric", "{row.training_time}" }
                        }
                    }
                }
            }
        }
    }
}
