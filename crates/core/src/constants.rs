//! Constants used throughout the RxPad core crate.
//!
//! Default paths, generator endpoints and fixed response text live here so the REST and tool
//! surfaces render identical output.

/// Default location of the patient data file when no explicit path is configured.
pub const DEFAULT_PATIENT_DATA_PATH: &str = "data/patients.json";

/// Default location of the append-only prescription history log.
pub const DEFAULT_HISTORY_LOG_PATH: &str = "prescription_history.txt";

/// Default REST listen port.
pub const DEFAULT_PORT: u16 = 8000;

/// Default Gemini model used for prescription generation.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Default base URL of the Gemini API.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Text returned by history queries when nothing has been recorded yet.
pub const EMPTY_HISTORY_PLACEHOLDER: &str = "No prescription history yet.";

/// Message used for unknown patient ids on every surface.
pub const PATIENT_NOT_FOUND_MESSAGE: &str = "Patient not found";
