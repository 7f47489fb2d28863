//! Utility functions shared by the catalog builder and the CLI.
//!
//! ## Modules
//!
//! - [`app_data`] - Configuration file and app data directory management
//! - [`binary`] - Binary content detection for skipping files
//! - [`progress`] - Progress spinners (no-op without the `progress` feature)

pub mod app_data;
pub mod binary;
pub mod progress;

pub use app_data::*;
pub use binary::*;
