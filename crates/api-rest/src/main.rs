//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own.
//!
//! ## Intended use
//! Useful for development when only the HTTP surface is wanted. The workspace's main
//! `rxpad-run` binary can additionally serve the tool protocol on stdio.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use rxpad_core::{config::port_from_env_value, StartupValues};

/// Main entry point for the RxPad REST API server
///
/// # Environment Variables
/// - `GEMINI_API_KEY`: credential for the text generation service (required)
/// - `PORT`: listen port (default: 8000)
/// - `RXPAD_PATIENT_DATA`: patient data file (default: "data/patients.json")
/// - `RXPAD_HISTORY_LOG`: prescription history log (default: "prescription_history.txt")
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the API key is missing or the port is invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("rxpad_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = StartupValues::from_env().into_config()?;
    let port = port_from_env_value(std::env::var("PORT").ok())?;
    let addr = format!("0.0.0.0:{port}");

    let prescriptions = rxpad_core::build_service(&cfg);
    let app = router(AppState { prescriptions });

    tracing::info!("-- Starting RxPad REST API on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
