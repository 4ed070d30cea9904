use crate::generator::GenerationError;
use api_shared::GeneratePrescriptionRes;

#[derive(Debug, thiserror::Error)]
pub enum PrescriptionError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("Patient not found")]
    PatientNotFound(String),
    #[error("text generation service failed: {0}")]
    Generation(#[from] GenerationError),
    /// The prescription was generated but the history log could not be appended to.
    ///
    /// The computed result is carried so callers can still surface it.
    #[error("prescription generated but not recorded in history log: {source}")]
    HistoryAppend {
        #[source]
        source: std::io::Error,
        outcome: Box<GeneratePrescriptionRes>,
    },

    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type PrescriptionResult<T> = std::result::Result<T, PrescriptionError>;
