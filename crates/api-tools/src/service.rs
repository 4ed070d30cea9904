//! Tool registry and dispatch.

use api_shared::GeneratePrescriptionReq;
use rxpad_core::{
    validation::require_text, PrescriptionError, PrescriptionService, EMPTY_HISTORY_PLACEHOLDER,
    PATIENT_NOT_FOUND_MESSAGE,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};

pub const GET_ALL_PATIENTS: &str = "get_all_patients";
pub const GET_PATIENT_BY_ID: &str = "get_patient_by_id";
pub const GENERATE_PRESCRIPTION: &str = "generate_prescription";
pub const GET_PRESCRIPTION_HISTORY: &str = "get_prescription_history";

/// A tool as advertised to clients.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// The single text payload every tool call produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub text: String,
    pub is_error: bool,
}

impl ToolOutput {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    fn error(message: impl std::fmt::Display) -> Self {
        Self {
            text: format!("Error: {message}"),
            is_error: true,
        }
    }

    fn json<T: Serialize>(value: &T) -> Self {
        match serde_json::to_string_pretty(value) {
            Ok(text) => Self::text(text),
            Err(e) => Self::error(e),
        }
    }
}

#[derive(Deserialize, Default)]
struct PatientIdArgs {
    #[serde(default)]
    patient_id: String,
}

/// Adapts `PrescriptionService` to named tool calls.
#[derive(Clone)]
pub struct ToolService {
    prescriptions: PrescriptionService,
}

impl ToolService {
    pub fn new(prescriptions: PrescriptionService) -> Self {
        Self { prescriptions }
    }

    pub fn definitions() -> Vec<ToolDefinition> {
        vec![
            ToolDefinition {
                name: GET_ALL_PATIENTS,
                description: "List every patient record.",
                input_schema: json!({ "type": "object", "properties": {} }),
            },
            ToolDefinition {
                name: GET_PATIENT_BY_ID,
                description: "Fetch one patient record by its exact id.",
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "patient_id": { "type": "string", "description": "Patient identifier" }
                    },
                    "required": ["patient_id"]
                }),
            },
            ToolDefinition {
                name: GENERATE_PRESCRIPTION,
                description: "Generate a prescription from the patient's record and current \
                              symptoms, and record it in the prescription history.",
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "patient_id": { "type": "string", "description": "Patient identifier" },
                        "symptoms": { "type": "string", "description": "Current symptoms" },
                        "final_prescription": {
                            "type": "string",
                            "description": "Prescription to record instead of the generated one"
                        }
                    },
                    "required": ["patient_id", "symptoms"]
                }),
            },
            ToolDefinition {
                name: GET_PRESCRIPTION_HISTORY,
                description: "Return the full prescription history log.",
                input_schema: json!({ "type": "object", "properties": {} }),
            },
        ]
    }

    /// Runs the named tool. Failures come back as `Error: …` payloads.
    pub async fn call(&self, name: &str, arguments: &Value) -> ToolOutput {
        tracing::debug!("tool call: {}", name);
        match name {
            GET_ALL_PATIENTS => ToolOutput::json(&self.prescriptions.list_patients()),
            GET_PATIENT_BY_ID => {
                let args: PatientIdArgs = match parse_args(arguments) {
                    Ok(args) => args,
                    Err(output) => return output,
                };
                let patient = require_text("patient_id", &args.patient_id)
                    .and_then(|_| self.prescriptions.get_patient(&args.patient_id));
                match patient {
                    Ok(patient) => ToolOutput::json(&patient),
                    Err(e) => error_output(e),
                }
            }
            GENERATE_PRESCRIPTION => {
                let req: GeneratePrescriptionReq = match parse_args(arguments) {
                    Ok(req) => req,
                    Err(output) => return output,
                };
                match self.prescriptions.generate(req).await {
                    Ok(res) => ToolOutput::json(&res),
                    Err(e) => error_output(e),
                }
            }
            GET_PRESCRIPTION_HISTORY => {
                let history = self.prescriptions.history();
                if history.is_empty() {
                    ToolOutput::text(EMPTY_HISTORY_PLACEHOLDER)
                } else {
                    ToolOutput::text(history)
                }
            }
            other => ToolOutput::error(format!("Unknown tool: {other}")),
        }
    }
}

/// Missing or null arguments are treated as an empty object.
fn parse_args<T: DeserializeOwned + Default>(arguments: &Value) -> Result<T, ToolOutput> {
    if arguments.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(arguments.clone())
        .map_err(|e| ToolOutput::error(format!("invalid arguments: {e}")))
}

fn error_output(err: PrescriptionError) -> ToolOutput {
    let detail = err.to_string();
    match err {
        PrescriptionError::InvalidInput(msg) => ToolOutput::error(msg),
        PrescriptionError::PatientNotFound(_) => ToolOutput::error(PATIENT_NOT_FOUND_MESSAGE),
        PrescriptionError::HistoryAppend { outcome, .. } => ToolOutput::error(format!(
            "{detail}. Unrecorded prescription: {}",
            outcome.prescription
        )),
        _ => {
            tracing::error!("tool call failed: {}", detail);
            ToolOutput::error(detail)
        }
    }
}
