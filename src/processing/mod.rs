//! Campus export processing logic.
//!
//! This module contains the logic that turns export text into CIDR blocks:
//! - [`summarize`] - collapsing address ranges into CIDR blocks
//! - [`export`] - splitting the export into campuses and records

mod export;
mod summarize;

// Re-export public functions
pub use export::{campus_name, parse_campus_export, read_campus_export, ExportError, ExportOptions};
pub use summarize::summarize_range;
