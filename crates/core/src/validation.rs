//! Input validation utilities.
//!
//! Checks applied to caller-supplied request fields before any lookup, generation or log write
//! takes place.

use crate::{PrescriptionError, PrescriptionResult};

/// Returns the trimmed value of a required text field.
///
/// # Errors
///
/// Returns `PrescriptionError::InvalidInput` naming `field` if the value is empty or contains
/// only whitespace.
pub fn require_text(field: &str, value: &str) -> PrescriptionResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PrescriptionError::InvalidInput(format!("{field} is required")));
    }
    Ok(trimmed.to_owned())
}

/// Returns the override text unchanged, or `None` if it is absent or blank.
pub fn optional_text(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Validates the two required fields of a prescription request together.
///
/// Both fields are checked so the message names everything that is missing.
pub fn require_prescription_fields(
    patient_id: &str,
    symptoms: &str,
) -> PrescriptionResult<(String, String)> {
    match (require_text("patient_id", patient_id), require_text("symptoms", symptoms)) {
        (Ok(id), Ok(symptoms)) => Ok((id, symptoms)),
        (Err(_), Err(_)) => Err(PrescriptionError::InvalidInput(
            "patient_id and symptoms are required".into(),
        )),
        (Err(e), _) | (_, Err(e)) => Err(e),
    }
}
