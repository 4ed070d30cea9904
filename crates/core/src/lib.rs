//! # RxPad Core
//!
//! Core business logic for the RxPad prescription assistant.
//!
//! This crate contains the data operations behind every front-end:
//! - The in-memory patient directory loaded from a static data file
//! - The append-only prescription history log
//! - Prompt rendering and the external text generator
//! - `PrescriptionService`, which ties them into the generation workflow
//!
//! **No API concerns**: HTTP routing, the tool protocol or CLI parsing belong in `api-rest`,
//! `api-tools` or `rxpad-cli`.

pub mod config;
pub mod constants;
pub mod directory;
pub mod error;
pub mod generator;
pub mod history;
pub mod prescription;
pub mod prompt;
pub mod validation;

pub use api_shared::{GeneratePrescriptionReq, GeneratePrescriptionRes, Patient};
pub use config::{ApiKey, CoreConfig, GeneratorConfig, StartupValues};
pub use constants::*;
pub use directory::PatientDirectory;
pub use error::{PrescriptionError, PrescriptionResult};
pub use generator::{GeminiClient, GenerationError, TextGenerator};
pub use history::HistoryLog;
pub use prescription::PrescriptionService;

use std::sync::Arc;

/// Builds the production service from startup configuration.
///
/// Loads the patient directory (empty on failure) and wires in the Gemini client.
pub fn build_service(cfg: &CoreConfig) -> PrescriptionService {
    let directory = Arc::new(PatientDirectory::load(cfg.patient_data_path()));
    let history = HistoryLog::new(cfg.history_log_path());
    let generator = Arc::new(GeminiClient::new(cfg.generator().clone()));
    PrescriptionService::new(directory, history, generator)
}
