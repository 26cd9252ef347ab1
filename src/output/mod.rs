//! Rendering of [`EventReport`](crate::EventReport)s.
//!
//! - [`json`]: compact and pretty JSON through serde
//! - [`terminal`]: colored human-readable summary

pub mod json;
pub mod terminal;

pub use json::{to_json, to_json_pretty};
pub use terminal::format_report;
