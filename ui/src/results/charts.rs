use api::ModelResult;
use dioxus::prelude::*;

use crate::{
    core::format::{format_fixed, format_metric_name},
    results::geometry::{
        bar_layout, polygon_points, radar_layout, series_color, Frame, Point, RadarLayout,
    },
    t,
    workflow::ChartKind,
};

const BAR_FRAME: Frame = Frame::new(960.0, 384.0);
const RADAR_SIZE: f64 = 520.0;

#[component]
pub fn ChartControls(
    metrics: Vec<String>,
    chart: ChartKind,
    selected: String,
    on_chart: EventHandler<ChartKind>,
    on_metric: EventHandler<String>,
) -> Element {
    if metrics.is_empty() {
        return rsx! {};
    }

    let toggle_class = |kind: ChartKind| {
        if kind == chart {
            "chart-toggle__option chart-toggle__option--active"
        } else {
            "chart-toggle__option"
        }
    };

    rsx! {
        div { class: "chart-controls",
            div { class: "chart-controls__group",
                label { class: "chart-controls__label", {t!("chart-type-label")} }
                div { class: "chart-toggle", role: "group",
                    button {
                        r#type: "button",
                        class: toggle_class(ChartKind::Bar),
                        onclick: move |_| on_chart.call(ChartKind::Bar),
                        {t!("chart-type-bar")}
                    }
                    button {
                        r#type: "button",
                        class: toggle_class(ChartKind::Radar),
                        onclick: move |_| on_chart.call(ChartKind::Radar),
                        {t!("chart-type-radar")}
                    }
                }
            }

            if chart == ChartKind::Bar {
                div { class: "chart-controls__group",
                    label { class: "chart-controls__label", r#for: "metric-select", {t!("chart-metric-label")} }
                    select {
                        id: "metric-select",
                        class: "chart-controls__select",
                        value: "{selected}",
                        onchange: move |evt| on_metric.call(evt.value()),
                        for metric in metrics.iter() {
                            option {
                                key: "{metric}",
                                value: "{metric}",
                                selected: *metric == selected,
                                {format_metric_name(metric)}
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
pub fn ModelChart(models: Vec<ModelResult>, metrics: Vec<String>, chart: ChartKind, metric: String) -> Element {
    if models.is_empty() {
        return rsx! {};
    }

    match chart {
        ChartKind::Bar => rsx! { BarChart { models, metric } },
        ChartKind::Radar => rsx! { RadarChart { models, metrics } },
    }
}

#[component]
fn BarChart(models: Vec<ModelResult>, metric: String) -> Element {
    let layout = bar_layout(&models, &metric, BAR_FRAME);
    let frame = layout.frame;
    let view_box = format!("0 0 {} {}", frame.width, frame.height);
    let axis_right = frame.width - frame.right;
    let label_y = frame.height - frame.bottom + 14.0;
    let metric_label = format_metric_name(&metric);

    rsx! {
        figure { class: "chart chart--bar",
            svg {
                class: "chart__svg",
                view_box: "{view_box}",
                preserve_aspect_ratio: "xMidYMid meet",
                role: "img",
                "aria-label": "{metric_label}",

                for tick in layout.ticks.iter() {
                    g { key: "{tick.value}",
                        line {
                            class: "chart__grid",
                            x1: "{frame.left}",
                            x2: "{axis_right}",
                            y1: "{tick.y}",
                            y2: "{tick.y}",
                        }
                        text {
                            class: "chart__tick",
                            x: "{frame.left - 8.0}",
                            y: "{tick.y}",
                            text_anchor: "end",
                            dominant_baseline: "middle",
                            {format_tick(tick.value)}
                        }
                    }
                }

                line {
                    class: "chart__axis",
                    x1: "{frame.left}",
                    x2: "{axis_right}",
                    y1: "{layout.baseline}",
                    y2: "{layout.baseline}",
                }

                for bar in layout.bars.iter() {
                    g { key: "{bar.label}", class: "chart__bar",
                        rect {
                            x: "{bar.x}",
                            y: "{bar.y}",
                            width: "{bar.width}",
                            height: "{bar.height}",
                            rx: "4",
                            fill: series_color(0),
                        }
                        if bar.value.is_finite() {
                            text {
                                class: "chart__value",
                                x: "{bar.x + bar.width / 2.0}",
                                y: "{bar.y - 4.0}",
                                text_anchor: "middle",
                                {format_fixed(bar.value, 4)}
                            }
                        }
                        text {
                            class: "chart__label",
                            transform: "translate({bar.x + bar.width / 2.0} {label_y}) rotate(-45)",
                            text_anchor: "end",
                            "{bar.label}"
                        }
                    }
                }
            }
            figcaption { class: "chart__caption", "{metric_label}" }
        }
    }
}

#[component]
fn RadarChart(models: Vec<ModelResult>, metrics: Vec<String>) -> Element {
    let center = Point {
        x: RADAR_SIZE / 2.0,
        y: RADAR_SIZE / 2.0,
    };
    let RadarLayout {
        axes,
        rings,
        series,
        ..
    } = radar_layout(&models, &metrics, center, RADAR_SIZE * 0.36);
    let view_box = format!("0 0 {RADAR_SIZE} {RADAR_SIZE}");

    rsx! {
        figure { class: "chart chart--radar",
            svg {
                class: "chart__svg",
                view_box: "{view_box}",
                role: "img",

                for (idx, ring) in rings.iter().enumerate() {
                    polygon { key: "ring-{idx}", class: "chart__grid", fill: "none", points: polygon_points(ring) }
                }
                for axis in axes.iter() {
                    g { key: "{axis.metric}",
                        line {
                            class: "chart__grid",
                            x1: "{center.x}",
                            y1: "{center.y}",
                            x2: "{axis.end.x}",
                            y2: "{axis.end.y}",
                        }
                        text {
                            class: "chart__label",
                            x: "{axis.label_at.x}",
                            y: "{axis.label_at.y}",
                            text_anchor: anchor_for(axis.label_at.x, center.x),
                            dominant_baseline: "middle",
                            {format_metric_name(&axis.metric)}
                        }
                    }
                }
                for trace in series.iter() {
                    polygon {
                        key: "{trace.name}",
                        points: polygon_points(&trace.points),
                        fill: trace.color,
                        fill_opacity: "0.1",
                        stroke: trace.color,
                        stroke_width: "2",
                    }
                }
            }
            ul { class: "chart__legend",
                for trace in series.iter() {
                    li { key: "{trace.name}", class: "chart__legend-item",
                        span { class: "chart__swatch", style: "background: {trace.color}" }
                        "{trace.name}"
                    }
                }
            }
        }
    }
}

pub(crate) fn format_tick(value: f64) -> String {
    if value.abs() >= 100.0 || value.fract() == 0.0 {
        format_fixed(value, 0)
    } else {
        format_fixed(value, 2)
    }
}

pub(crate) fn anchor_for(x: f64, center_x: f64) -> &'static str {
    if (x - center_x).abs() < 1.0 {
        "middle"
    } else if x > center_x {
        "start"
    } else {
        "end"
    }
}
