//! CSV and PDF exports of the committed comparison.

mod csv;
pub mod pdf;
pub mod report;

pub use csv::build_csv;
pub use report::{build_report, ReportRequest, DASHBOARD_ID};

use api::ComparisonResult;
use thiserror::Error;
use time::{Date, OffsetDateTime};
use tracing::info;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Nothing to export yet")]
    MissingTarget,
    #[error("Could not render the report: {0}")]
    Render(String),
    #[error("Could not encode the report: {0}")]
    Encode(String),
    #[error("Could not save the file: {0}")]
    Delivery(String),
}

/// Where an export ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivered {
    /// Handed to the browser's download manager.
    Download,
    /// Written to disk.
    Saved(String),
}

pub fn csv_filename(date: Date) -> String {
    format!("ml-comparison-results-{date}.csv")
}

pub fn report_filename(date: Date) -> String {
    format!("ml-comparison-report-{date}.pdf")
}

/// Current UTC date, used for export file names.
pub fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

pub async fn export_csv(result: &ComparisonResult) -> Result<Delivered, ExportError> {
    let filename = csv_filename(today());
    let delivered = download_bytes(&filename, "text/csv", build_csv(result).into_bytes()).await?;
    info!(file = %filename, "csv exported");
    Ok(delivered)
}

pub async fn export_report(request: ReportRequest) -> Result<Delivered, ExportError> {
    let pdf = build_report(request).await?;
    let filename = report_filename(today());
    let delivered = download_bytes(&filename, "application/pdf", pdf).await?;
    info!(file = %filename, "report exported");
    Ok(delivered)
}

async fn download_bytes(
    filename: &str,
    mime: &str,
    bytes: Vec<u8>,
) -> Result<Delivered, ExportError> {
    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::JsCast;
        use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

        let fail = |msg: &str| ExportError::Delivery(msg.to_string());

        let array = js_sys::Uint8Array::from(bytes.as_slice());
        let parts = js_sys::Array::new();
        parts.push(&array.buffer());

        let mut opts = BlobPropertyBag::new();
        opts.type_(mime);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &opts)
            .map_err(|_| fail("failed to create blob"))?;
        let url = Url::create_object_url_with_blob(&blob).map_err(|_| fail("unable to create download"))?;

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| fail("document unavailable"))?;
        let anchor: HtmlAnchorElement = document
            .create_element("a")
            .map_err(|_| fail("unable to create anchor"))?
            .dyn_into()
            .map_err(|_| fail("anchor cast failed"))?;
        anchor.set_href(&url);
        anchor.set_download(filename);
        anchor.style().set_property("display", "none").ok();

        document
            .body()
            .ok_or_else(|| fail("missing body"))?
            .append_child(&anchor)
            .ok();
        anchor.click();
        anchor.remove();
        Url::revoke_object_url(&url).ok();

        Ok(Delivered::Download)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = mime;
        let dir = export_dir()?;
        save_into(&dir, filename, &bytes)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn export_dir() -> Result<std::path::PathBuf, ExportError> {
    let dirs = directories::ProjectDirs::from("com", "MLCompare", "MLCompare")
        .ok_or_else(|| ExportError::Delivery("unable to determine export directory".into()))?;
    Ok(dirs.data_dir().join("exports"))
}

#[cfg(not(target_arch = "wasm32"))]
fn save_into(dir: &std::path::Path, filename: &str, bytes: &[u8]) -> Result<Delivered, ExportError> {
    let delivery = |err: std::io::Error| ExportError::Delivery(err.to_string());
    std::fs::create_dir_all(dir).map_err(delivery)?;
    let path = dir.join(filename);
    std::fs::write(&path, bytes).map_err(delivery)?;
    Ok(Delivered::Saved(path.to_string_lossy().into_owned()))
}
