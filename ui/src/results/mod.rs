//! Everything rendered once a comparison is available.

pub mod charts;
pub use charts::{ChartControls, ModelChart};

mod export;
pub use export::ExportButtons;

pub mod geometry;

mod overview;
pub use overview::{feature_preview, DatasetOverview};

pub mod ranking;

mod table;
pub use table::ResultsTable;
