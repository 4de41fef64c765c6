//! Shared UI crate for the ML Models Comparator. State, views and exports
//! live here; the platform crates only launch it.

pub mod core;
pub mod export;
pub mod i18n;
pub mod results;
pub mod views;
pub mod workflow;

pub mod components {
    // Brand and locale switcher (components/app_header.rs)
    mod app_header;
    pub use app_header::AppHeader;

    // Dataset drop zone (components/upload.rs)
    mod upload;
    pub use upload::{file_name, UploadDropzone};
}
