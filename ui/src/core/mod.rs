//! Platform-neutral building blocks shared by the dashboard views.

pub mod config;
pub mod format;
pub mod platform;
pub mod storage;
pub mod timing;
