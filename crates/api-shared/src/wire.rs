//! Request and response types shared by every RxPad surface.
//!
//! These are plain serde structs with `utoipa` schemas so the REST surface can publish them in
//! its OpenAPI document and the tool surface can serialise them as JSON text payloads.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A patient record as held by the patient directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Patient {
    /// Unique, stable patient identifier.
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub age: u32,
    pub diagnosis: String,
    /// Free-text prior conditions and medications, in recorded order.
    #[serde(default)]
    pub history: Vec<String>,
}

/// Body of a prescription generation request.
///
/// Every field defaults to empty so that missing fields are reported by request validation
/// rather than by the JSON decoder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GeneratePrescriptionReq {
    #[serde(default)]
    pub patient_id: String,
    #[serde(default)]
    pub symptoms: String,
    /// Caller-supplied prescription that replaces the generated one when non-empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_prescription: Option<String>,
}

/// Result of a prescription generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GeneratePrescriptionRes {
    /// Trimmed model output, independent of any override.
    pub generated: String,
    /// The prescription that was recorded in the history log.
    pub prescription: String,
    pub patient: Patient,
}

/// Error body returned by the REST surface.
///
/// `generated` and `prescription` are only present when a prescription was computed but could
/// not be recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prescription: Option<String>,
}

impl ErrorRes {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            generated: None,
            prescription: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}
