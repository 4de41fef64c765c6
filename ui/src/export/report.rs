//! Dashboard snapshot for the PDF report.
//!
//! The dashboard is redrawn as one self-contained SVG document from the same
//! result, ranking and chart geometry the live view uses, then rasterised to
//! JPEG: through a canvas in the browser, through resvg on desktop.

use std::fmt::Write as _;

use api::ComparisonResult;

use crate::{
    core::format::{capitalize, format_count, format_fixed, format_metric_name},
    export::{pdf::JpegImage, ExportError},
    results::{
        charts::{anchor_for, format_tick},
        geometry::{bar_layout, polygon_points, radar_layout, series_color, Frame, Point},
        ranking::{Comparison, PolarityTable, Standing},
    },
    t,
    workflow::ChartKind,
};

/// DOM id of the rendered dashboard; the report refuses to run without it.
pub const DASHBOARD_ID: &str = "results-dashboard";

const WIDTH: f64 = 1200.0;
const PAD: f64 = 40.0;
const ROW_HEIGHT: f64 = 32.0;
const RADAR_SIZE: f64 = 480.0;
const FONT: &str = "DejaVu Sans, Helvetica, Arial, sans-serif";
/// Raster scale relative to SVG user units.
const SCALE: f32 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub markup: String,
    pub width: u32,
    pub height: u32,
}

/// What the dashboard is showing right now.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRequest {
    pub result: Option<ComparisonResult>,
    pub chart: ChartKind,
    pub metric: Option<String>,
}

/// Snapshot, rasterise and wrap the dashboard in a PDF.
pub async fn build_report(request: ReportRequest) -> Result<Vec<u8>, ExportError> {
    let result = request.result.ok_or(ExportError::MissingTarget)?;
    ensure_dashboard_mounted()?;

    let metric = request
        .metric
        .or_else(|| result.first_metric().map(str::to_string))
        .unwrap_or_default();
    let snapshot = dashboard_svg(&result, request.chart, &metric);
    let jpeg = rasterize_jpeg(&snapshot).await?;
    super::pdf::write_pdf(&jpeg, &t!("results-title"))
}

#[cfg(target_arch = "wasm32")]
fn ensure_dashboard_mounted() -> Result<(), ExportError> {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(DASHBOARD_ID))
        .map(|_| ())
        .ok_or(ExportError::MissingTarget)
}

#[cfg(not(target_arch = "wasm32"))]
fn ensure_dashboard_mounted() -> Result<(), ExportError> {
    Ok(())
}

pub fn dashboard_svg(result: &ComparisonResult, chart: ChartKind, metric: &str) -> Snapshot {
    let mut body = String::new();
    let mut y = PAD;

    // Title block
    y += 28.0;
    text(&mut body, PAD, y, 28.0, "#111827", "700", "start", &t!("results-title"));
    y += 30.0;
    let summary = format!(
        "{} · {} · {}",
        capitalize(result.task_type.as_str()),
        result.models.len(),
        t!("results-models-suffix")
    );
    text(&mut body, PAD, y, 16.0, "#4B5563", "400", "start", &summary);

    // Dataset cards
    y += 24.0;
    let cards = [
        (t!("dataset-rows"), format_count(result.dataset_info.row_count)),
        (t!("dataset-columns"), result.dataset_info.column_count.to_string()),
        (t!("dataset-task"), capitalize(result.task_type.as_str())),
    ];
    let card_w = (WIDTH - 2.0 * PAD - 2.0 * 16.0) / 3.0;
    for (idx, (label, value)) in cards.iter().enumerate() {
        let x = PAD + idx as f64 * (card_w + 16.0);
        let _ = write!(
            body,
            r##"<rect x="{x:.1}" y="{y:.1}" width="{card_w:.1}" height="76" rx="8" fill="#F9FAFB" stroke="#E5E7EB"/>"##
        );
        text(&mut body, x + 16.0, y + 26.0, 13.0, "#374151", "600", "start", label);
        text(&mut body, x + 16.0, y + 58.0, 24.0, "#2563EB", "700", "start", value);
    }
    y += 76.0 + 28.0;

    let prep = &result.preprocessing_info;
    let prep_line = format!(
        "{}: {}   {}: {}   {}: {}",
        t!("preprocessing-missing"),
        prep.missing_values_handled,
        t!("preprocessing-categorical"),
        prep.categorical_features_encoded,
        t!("preprocessing-scaled"),
        if prep.features_scaled { t!("common-yes") } else { t!("common-no") },
    );
    text(&mut body, PAD, y, 13.0, "#4B5563", "400", "start", &prep_line);

    // Chart
    y += 40.0;
    text(&mut body, PAD, y, 18.0, "#111827", "600", "start", &t!("chart-title"));
    y += 16.0;
    let chart_height = match chart {
        ChartKind::Bar => {
            let frame = Frame::new(WIDTH - 2.0 * PAD, 384.0);
            let _ = write!(body, r#"<g transform="translate({PAD} {y:.1})">"#);
            bar_chart(&mut body, result, metric, frame);
            body.push_str("</g>");
            frame.height
        }
        ChartKind::Radar => {
            let offset = (WIDTH - RADAR_SIZE) / 2.0;
            let _ = write!(body, r#"<g transform="translate({offset:.1} {y:.1})">"#);
            radar_chart(&mut body, result);
            body.push_str("</g>");
            RADAR_SIZE
        }
    };
    y += chart_height + 32.0;

    // Table
    text(&mut body, PAD, y, 18.0, "#111827", "600", "start", &t!("table-title"));
    y += 16.0;
    y = results_table(&mut body, result, y);

    let height = (y + PAD).ceil();
    let markup = format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{height}" viewBox="0 0 {WIDTH} {height}" font-family="{FONT}"><rect width="100%" height="100%" fill="#FFFFFF"/>{body}</svg>"##
    );

    Snapshot {
        markup,
        width: WIDTH as u32,
        height: height as u32,
    }
}

fn bar_chart(out: &mut String, result: &ComparisonResult, metric: &str, frame: Frame) {
    let layout = bar_layout(&result.models, metric, frame);
    let right = frame.width - frame.right;
    for tick in &layout.ticks {
        let _ = write!(
            out,
            r##"<line x1="{:.1}" x2="{right:.1}" y1="{:.1}" y2="{:.1}" stroke="#E5E7EB" stroke-dasharray="3 3"/>"##,
            frame.left, tick.y, tick.y
        );
        text(out, frame.left - 8.0, tick.y + 4.0, 11.0, "#6B7280", "400", "end", &format_tick(tick.value));
    }
    let _ = write!(
        out,
        r##"<line x1="{:.1}" x2="{right:.1}" y1="{:.1}" y2="{:.1}" stroke="#9CA3AF"/>"##,
        frame.left, layout.baseline, layout.baseline
    );
    let label_y = frame.height - frame.bottom + 14.0;
    for bar in &layout.bars {
        let _ = write!(
            out,
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" rx="4" fill="{}"/>"#,
            bar.x,
            bar.y,
            bar.width,
            bar.height,
            series_color(0)
        );
        let cx = bar.x + bar.width / 2.0;
        if bar.value.is_finite() {
            text(out, cx, bar.y - 4.0, 11.0, "#374151", "400", "middle", &format_fixed(bar.value, 4));
        }
        let _ = write!(
            out,
            r##"<text transform="translate({cx:.1} {label_y:.1}) rotate(-45)" font-size="12" fill="#374151" text-anchor="end">{}</text>"##,
            escape(&bar.label)
        );
    }
    text(
        out,
        frame.width / 2.0,
        frame.height - 4.0,
        13.0,
        "#111827",
        "600",
        "middle",
        &format_metric_name(metric),
    );
}

fn radar_chart(out: &mut String, result: &ComparisonResult) {
    let center = Point {
        x: RADAR_SIZE / 2.0,
        y: RADAR_SIZE / 2.0 - 20.0,
    };
    let metrics: Vec<String> = result.metric_keys().into_iter().map(str::to_string).collect();
    let layout = radar_layout(&result.models, &metrics, center, RADAR_SIZE * 0.34);

    for ring in &layout.rings {
        let _ = write!(
            out,
            r##"<polygon points="{}" fill="none" stroke="#E5E7EB"/>"##,
            polygon_points(ring)
        );
    }
    for axis in &layout.axes {
        let _ = write!(
            out,
            r##"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="#E5E7EB"/>"##,
            center.x, center.y, axis.end.x, axis.end.y
        );
        text(
            out,
            axis.label_at.x,
            axis.label_at.y + 4.0,
            12.0,
            "#374151",
            "400",
            anchor_for(axis.label_at.x, center.x),
            &format_metric_name(&axis.metric),
        );
    }
    for series in &layout.series {
        let _ = write!(
            out,
            r#"<polygon points="{}" fill="{c}" fill-opacity="0.1" stroke="{c}" stroke-width="2"/>"#,
            polygon_points(&series.points),
            c = series.color
        );
    }

    // Legend, wrapped every four entries.
    let legend_top = RADAR_SIZE - 40.0;
    for (idx, series) in layout.series.iter().enumerate() {
        let x = 10.0 + (idx % 4) as f64 * 118.0;
        let y = legend_top + (idx / 4) as f64 * 18.0;
        let _ = write!(
            out,
            r#"<rect x="{x:.1}" y="{:.1}" width="10" height="10" fill="{}"/>"#,
            y - 9.0,
            series.color
        );
        text(out, x + 14.0, y, 11.0, "#374151", "400", "start", &series.name);
    }
}

/// Returns the y coordinate below the last row.
fn results_table(out: &mut String, result: &ComparisonResult, top: f64) -> f64 {
    let comparison = Comparison::new(&result.models, &PolarityTable::for_result(result));
    let metric_count = comparison.metrics.len();
    let rank_w = 60.0;
    let model_w = 260.0;
    let time_w = 140.0;
    let metric_w = if metric_count == 0 {
        0.0
    } else {
        (WIDTH - 2.0 * PAD - rank_w - model_w - time_w) / metric_count as f64
    };

    let header_y = top + ROW_HEIGHT * 0.65;
    let _ = write!(
        out,
        r##"<rect x="{PAD}" y="{top:.1}" width="{:.1}" height="{ROW_HEIGHT}" fill="#F9FAFB"/>"##,
        WIDTH - 2.0 * PAD
    );
    let mut x = PAD + 12.0;
    text(out, x, header_y, 11.0, "#6B7280", "600", "start", &t!("table-rank"));
    x += rank_w;
    text(out, x, header_y, 11.0, "#6B7280", "600", "start", &t!("table-model"));
    x += model_w;
    for metric in &comparison.metrics {
        text(out, x, header_y, 11.0, "#6B7280", "600", "start", &format_metric_name(metric));
        x += metric_w;
    }
    text(out, x, header_y, 11.0, "#6B7280", "600", "start", &t!("table-training-time"));

    let mut y = top + ROW_HEIGHT;
    for (idx, model) in comparison.ranked.iter().enumerate() {
        if idx == 0 {
            let _ = write!(
                out,
                r##"<rect x="{PAD}" y="{y:.1}" width="{:.1}" height="{ROW_HEIGHT}" fill="#F0FDF4"/>"##,
                WIDTH - 2.0 * PAD
            );
        }
        let baseline = y + ROW_HEIGHT * 0.65;
        let mut x = PAD + 12.0;
        text(out, x, baseline, 13.0, "#111827", "600", "start", &(idx + 1).to_string());
        x += rank_w;
        text(out, x, baseline, 13.0, "#111827", "500", "start", &model.name);
        x += model_w;
        for metric in &comparison.metrics {
            let mut value = format_fixed(model.metric(metric), 4);
            let color = match comparison.standing(metric, model) {
                Some(Standing::Best) => {
                    value.push_str(" ★");
                    "#16A34A"
                }
                Some(Standing::Worst) => "#DC2626",
                None => "#111827",
            };
            text(out, x, baseline, 13.0, color, "400", "start", &value);
            x += metric_w;
        }
        text(out, x, baseline, 13.0, "#111827", "400", "start", &format_fixed(model.training_time, 3));

        let _ = write!(
            out,
            r##"<line x1="{PAD}" x2="{:.1}" y1="{:.1}" y2="{:.1}" stroke="#E5E7EB"/>"##,
            WIDTH - PAD,
            y + ROW_HEIGHT,
            y + ROW_HEIGHT
        );
        y += ROW_HEIGHT;
    }
    y
}

#[allow(clippy::too_many_arguments)]
fn text(out: &mut String, x: f64, y: f64, size: f64, fill: &str, weight: &str, anchor: &str, content: &str) {
    let _ = write!(
        out,
        r#"<text x="{x:.1}" y="{y:.1}" font-size="{size}" fill="{fill}" font-weight="{weight}" text-anchor="{anchor}">{}</text>"#,
        escape(content)
    );
}

/// XML text escaping. Also strips the bidi isolation marks Fluent wraps
/// arguments in, which some rasterisers draw as boxes.
pub(crate) fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\u{2068}' | '\u{2069}' => {}
            other => out.push(other),
        }
    }
    out
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn rasterize_jpeg(snapshot: &Snapshot) -> Result<JpegImage, ExportError> {
    use std::sync::Arc;

    use image::{codecs::jpeg::JpegEncoder, ExtendedColorType};
    use tiny_skia::{Color, Pixmap, Transform};

    let mut fonts = usvg::fontdb::Database::new();
    fonts.load_font_data(super::pdf::REPORT_FONT.to_vec());
    fonts.load_system_fonts();
    let options = usvg::Options {
        fontdb: Arc::new(fonts),
        ..usvg::Options::default()
    };

    let tree = usvg::Tree::from_str(&snapshot.markup, &options)
        .map_err(|err| ExportError::Render(err.to_string()))?;
    let size = tree.size().to_int_size().scale_by(SCALE).ok_or_else(|| {
        ExportError::Render("snapshot has no area".into())
    })?;

    let mut pixmap = Pixmap::new(size.width(), size.height())
        .ok_or_else(|| ExportError::Render("unable to allocate canvas".into()))?;
    pixmap.fill(Color::WHITE);
    resvg::render(&tree, Transform::from_scale(SCALE, SCALE), &mut pixmap.as_mut());

    // The white fill leaves every pixel opaque, so dropping alpha is lossless.
    let rgb: Vec<u8> = pixmap
        .data()
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();

    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, 90)
        .encode(&rgb, size.width(), size.height(), ExtendedColorType::Rgb8)
        .map_err(|err| ExportError::Encode(err.to_string()))?;

    Ok(JpegImage {
        bytes,
        width: size.width(),
        height: size.height(),
    })
}

#[cfg(target_arch = "wasm32")]
pub async fn rasterize_jpeg(snapshot: &Snapshot) -> Result<JpegImage, ExportError> {
    use base64::Engine as _;
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{
        Blob, BlobPropertyBag, CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, Url,
    };

    let render = |msg: &str| ExportError::Render(msg.to_string());

    let mut opts = BlobPropertyBag::new();
    opts.type_("image/svg+xml");
    let parts = js_sys::Array::new();
    parts.push(&JsValue::from_str(&snapshot.markup));
    let blob = Blob::new_with_str_sequence_and_options(&parts, &opts)
        .map_err(|_| render("unable to build SVG blob"))?;
    let url = Url::create_object_url_with_blob(&blob).map_err(|_| render("unable to create SVG URL"))?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| render("document unavailable"))?;

    let width = (snapshot.width as f32 * SCALE) as u32;
    let height = (snapshot.height as f32 * SCALE) as u32;
    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|_| render("unable to create canvas"))?
        .dyn_into()
        .map_err(|_| render("canvas cast failed"))?;
    canvas.set_width(width);
    canvas.set_height(height);

    let context: CanvasRenderingContext2d = canvas
        .get_context("2d")
        .map_err(|_| render("canvas context unavailable"))?
        .ok_or_else(|| render("canvas context missing"))?
        .dyn_into()
        .map_err(|_| render("context cast failed"))?;

    let image = HtmlImageElement::new().map_err(|_| render("unable to create image"))?;
    image.set_src(&url);
    let decoded = JsFuture::from(image.decode()).await;
    Url::revoke_object_url(&url).ok();
    decoded.map_err(|_| render("snapshot decode failed"))?;

    #[allow(deprecated)]
    context.set_fill_style(&JsValue::from_str("#ffffff"));
    context.fill_rect(0.0, 0.0, f64::from(width), f64::from(height));
    context
        .draw_image_with_html_image_element_and_dw_and_dh(
            &image,
            0.0,
            0.0,
            f64::from(width),
            f64::from(height),
        )
        .map_err(|_| render("unable to draw snapshot"))?;

    let data_url = canvas
        .to_data_url_with_type_and_encoder_options("image/jpeg", &JsValue::from_f64(0.9))
        .map_err(|_| ExportError::Encode("unable to serialise canvas".into()))?;
    let payload = data_url
        .split(',')
        .nth(1)
        .ok_or_else(|| ExportError::Encode("malformed data URL".into()))?;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|err| ExportError::Encode(err.to_string()))?;

    Ok(JpegImage {
        bytes,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::storage::tests::sample_result;

    #[test]
    fn escape_handles_markup_and_isolation_marks() {
        assert_eq!(escape("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
        assert_eq!(escape("\u{2068}12\u{2069}"), "12");
    }

    #[test]
    fn snapshot_contains_every_model_and_metric() {
        crate::i18n::init();
        let mut result = sample_result();
        let mut other = result.models[0].clone();
        other.name = "Gradient <Boost>".into();
        result.models.push(other);

        let snapshot = dashboard_svg(&result, ChartKind::Bar, "r2_score");
        assert!(snapshot.markup.starts_with("<svg"));
        assert!(snapshot.markup.ends_with("</svg>"));
        assert!(snapshot.markup.contains("Gradient &lt;Boost&gt;"));
        assert!(snapshot.markup.contains("R² Score"));
        assert!(snapshot.markup.contains("MSE"));
        assert_eq!(snapshot.width, 1200);
        assert!(snapshot.height > 600);
    }

    #[test]
    fn more_models_make_a_taller_snapshot() {
        crate::i18n::init();
        let one = sample_result();
        let mut many = sample_result();
        for idx in 0..5 {
            let mut extra = many.models[0].clone();
            extra.name = format!("M{idx}");
            many.models.push(extra);
        }
        let short = dashboard_svg(&one, ChartKind::Radar, "r2_score");
        let tall = dashboard_svg(&many, ChartKind::Radar, "r2_score");
        assert_eq!(tall.height - short.height, 5 * ROW_HEIGHT as u32);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn missing_result_is_reported() {
        let request = ReportRequest {
            result: None,
            chart: ChartKind::Bar,
            metric: None,
        };
        let err = futures::executor::block_on(build_report(request)).unwrap_err();
        assert!(matches!(err, ExportError::MissingTarget));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn desktop_report_is_a_pdf() {
        crate::i18n::init();
        let request = ReportRequest {
            result: Some(sample_result()),
            chart: ChartKind::Bar,
            metric: None,
        };
        let pdf = futures::executor::block_on(build_report(request)).unwrap();
        assert!(pdf.starts_with(b"%PDF-"));
        assert!(pdf.windows(5).any(|w| w == b"%%EOF"));
    }
}
