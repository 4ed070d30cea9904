//! Standalone tool server binary.
//!
//! ## Purpose
//! Serves the RxPad tools over newline-delimited JSON-RPC on stdin/stdout, for use as a
//! subprocess of an AI assistant client.
//!
//! ## Intended use
//! Logs are written to stderr because stdout carries protocol frames.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_tools::{serve_stdio, ToolService};
use rxpad_core::StartupValues;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_tools=info".parse()?)
                .add_directive("rxpad_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cfg = StartupValues::from_env().into_config()?;
    let tools = ToolService::new(rxpad_core::build_service(&cfg));

    serve_stdio(tools).await?;

    Ok(())
}
