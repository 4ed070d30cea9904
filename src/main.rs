use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, router};
use api_tools::{ToolService, serve_stdio};
use rxpad_core::{StartupValues, config::port_from_env_value};

/// Main entry point for the RxPad application
///
/// Starts the REST server and, when enabled, the tool server on stdio:
/// - REST server on port 8000 (configurable via PORT)
/// - Tool server on stdin/stdout when RXPAD_TOOLS_STDIO is "true"
///
/// Both front-ends share one `PrescriptionService`, so they see the same patient directory
/// and append to the same history log. Logs go to stderr since stdout may carry the tool
/// protocol.
///
/// # Environment Variables
/// - `GEMINI_API_KEY`: credential for the text generation service (required)
/// - `PORT`: REST listen port (default: 8000)
/// - `RXPAD_PATIENT_DATA`: patient data file (default: "data/patients.json")
/// - `RXPAD_HISTORY_LOG`: prescription history log (default: "prescription_history.txt")
/// - `RXPAD_GEMINI_MODEL`, `RXPAD_GEMINI_BASE_URL`: generator overrides
/// - `RXPAD_TOOLS_STDIO`: also serve the tool protocol on stdio (default: false)
///
/// # Returns
/// * `Ok(())` - If the servers start and run successfully
/// * `Err(anyhow::Error)` - If configuration, startup or a running server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rxpad_run=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("api_tools=info".parse()?)
                .add_directive("rxpad_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cfg = StartupValues::from_env().into_config()?;
    let port = port_from_env_value(std::env::var("PORT").ok())?;
    let rest_addr = format!("0.0.0.0:{port}");
    let tools_enabled = std::env::var("RXPAD_TOOLS_STDIO")
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    let prescriptions = rxpad_core::build_service(&cfg);

    tracing::info!("++ Starting RxPad REST on {}", rest_addr);
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    let rest_app = router(AppState {
        prescriptions: prescriptions.clone(),
    });
    let rest_server = tokio::spawn(async move { axum::serve(listener, rest_app).await });

    if tools_enabled {
        tracing::info!("++ Starting RxPad tools on stdio");
        let tools = ToolService::new(prescriptions);
        let tool_server = tokio::spawn(serve_stdio(tools));

        let (rest_result, tools_result) = tokio::join!(rest_server, tool_server);
        rest_result??;
        tools_result??;
    } else {
        rest_server.await??;
    }

    Ok(())
}
