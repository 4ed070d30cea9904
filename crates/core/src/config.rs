//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services.
//! The environment is only read by [`StartupValues::from_env`]; every other helper takes
//! already-read values, so request handling never depends on process-wide state and tests can
//! build configs directly.

use crate::constants::{
    DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, DEFAULT_HISTORY_LOG_PATH,
    DEFAULT_PATIENT_DATA_PATH, DEFAULT_PORT,
};
use crate::{PrescriptionError, PrescriptionResult};
use std::path::{Path, PathBuf};

/// Credential for the external text generation service.
///
/// `Debug` output is redacted so the key never ends up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl AsRef<str>) -> PrescriptionResult<Self> {
        let key = key.as_ref().trim();
        if key.is_empty() {
            return Err(PrescriptionError::MissingApiKey);
        }
        Ok(Self(key.to_owned()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Settings for the Gemini client.
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    api_key: ApiKey,
    model: String,
    base_url: String,
}

impl GeneratorConfig {
    /// Create a generator config using the default model and endpoint.
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            model: DEFAULT_GEMINI_MODEL.into(),
            base_url: DEFAULT_GEMINI_BASE_URL.into(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the API base URL. A trailing slash is dropped.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    patient_data_path: PathBuf,
    history_log_path: PathBuf,
    generator: GeneratorConfig,
}

impl CoreConfig {
    pub fn new(
        patient_data_path: PathBuf,
        history_log_path: PathBuf,
        generator: GeneratorConfig,
    ) -> Self {
        Self {
            patient_data_path,
            history_log_path,
            generator,
        }
    }

    pub fn patient_data_path(&self) -> &Path {
        &self.patient_data_path
    }

    pub fn history_log_path(&self) -> &Path {
        &self.history_log_path
    }

    pub fn generator(&self) -> &GeneratorConfig {
        &self.generator
    }
}

/// Raw startup values, normally read from the process environment.
#[derive(Debug, Default, Clone)]
pub struct StartupValues {
    pub api_key: Option<String>,
    pub patient_data: Option<String>,
    pub history_log: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

impl StartupValues {
    /// Reads `GEMINI_API_KEY`, `RXPAD_PATIENT_DATA`, `RXPAD_HISTORY_LOG`,
    /// `RXPAD_GEMINI_MODEL` and `RXPAD_GEMINI_BASE_URL`.
    ///
    /// Only call this at startup.
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("GEMINI_API_KEY").ok(),
            patient_data: std::env::var("RXPAD_PATIENT_DATA").ok(),
            history_log: std::env::var("RXPAD_HISTORY_LOG").ok(),
            model: std::env::var("RXPAD_GEMINI_MODEL").ok(),
            base_url: std::env::var("RXPAD_GEMINI_BASE_URL").ok(),
        }
    }

    /// Patient data file path, or the default when unset.
    pub fn patient_data_path(&self) -> PathBuf {
        path_from_env_value(self.patient_data.clone(), DEFAULT_PATIENT_DATA_PATH)
    }

    /// History log path, or the default when unset.
    pub fn history_log_path(&self) -> PathBuf {
        path_from_env_value(self.history_log.clone(), DEFAULT_HISTORY_LOG_PATH)
    }

    /// Resolves the values into a `CoreConfig`, applying defaults.
    ///
    /// # Errors
    ///
    /// Returns `PrescriptionError::MissingApiKey` if no API key was provided.
    pub fn into_config(self) -> PrescriptionResult<CoreConfig> {
        let patient_data_path = self.patient_data_path();
        let history_log_path = self.history_log_path();
        let api_key = api_key_from_env_value(self.api_key)?;
        let generator = GeneratorConfig::new(api_key)
            .with_model(text_from_env_value(self.model, DEFAULT_GEMINI_MODEL))
            .with_base_url(text_from_env_value(self.base_url, DEFAULT_GEMINI_BASE_URL));

        Ok(CoreConfig::new(patient_data_path, history_log_path, generator))
    }
}

/// Parse the API key from an optional environment value.
///
/// # Errors
///
/// Returns `PrescriptionError::MissingApiKey` if the value is absent or blank.
pub fn api_key_from_env_value(value: Option<String>) -> PrescriptionResult<ApiKey> {
    ApiKey::new(value.unwrap_or_default())
}

/// Parse the listen port from an optional environment value.
///
/// If `value` is `None` or blank, returns [`DEFAULT_PORT`].
pub fn port_from_env_value(value: Option<String>) -> PrescriptionResult<u16> {
    match value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(DEFAULT_PORT),
        Some(v) => v
            .parse::<u16>()
            .map_err(|e| PrescriptionError::InvalidConfig(format!("invalid PORT {v:?}: {e}"))),
    }
}

/// Returns the configured path, or `default` if the value is absent or blank.
pub fn path_from_env_value(value: Option<String>, default: &str) -> PathBuf {
    PathBuf::from(text_from_env_value(value, default))
}

/// Returns the trimmed configured text, or `default` if the value is absent or blank.
pub fn text_from_env_value(value: Option<String>, default: &str) -> String {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_owned())
}
