//! JSON serialization for detection reports.

use crate::result::EventReport;

/// Serialize an EventReport to a compact JSON string.
///
/// Non-finite numbers are written as `null`.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for EventReport).
pub fn to_json(report: &EventReport) -> Result<String, serde_json::Error> {
    serde_json::to_string(report)
}

/// Serialize an EventReport to a pretty-printed JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for EventReport).
pub fn to_json_pretty(report: &EventReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}
