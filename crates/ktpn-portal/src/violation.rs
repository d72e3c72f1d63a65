//! Violation records extracted from the result page.

use serde::{Deserialize, Serialize};

/// One traffic violation as rendered by the portal.
///
/// Every field is the portal's display string copied verbatim. Serialized
/// field names follow the portal tool's established JSON output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Violation {
    /// Plate number as displayed
    pub plate_number: String,
    /// Plate color
    pub plate_color: String,
    /// Vehicle type as displayed (not the request code)
    pub vehicle_type: String,
    /// Violation time, free text
    pub date: String,
    /// Where the violation happened
    pub location: String,
    /// Violation description
    pub reason: String,
    /// Processing status
    pub status: String,
    /// Unit that detected the violation
    pub traffic_enforcement: String,
    /// Court handling the case; never populated by the current page layout
    #[serde(default)]
    pub traffic_court: Option<String>,
}
