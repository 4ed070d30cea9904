//! Newline-delimited JSON-RPC 2.0 transport for the tool server.
//!
//! One request per line in, one response per line out. Supported methods are `initialize`,
//! `ping`, `tools/list` and `tools/call`; messages without an `id` are notifications and get no
//! reply. Requests run concurrently, so replies can arrive out of order and are matched by `id`.
//! Logs must not go to stdout while this runs on stdio.

use crate::service::ToolService;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

pub const PROTOCOL_VERSION: &str = "2024-11-05";

const PARSE_ERROR: i64 = -32700;
const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMS: i64 = -32602;

#[derive(Deserialize)]
struct RpcRequest {
    #[serde(default)]
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Value,
}

#[derive(Serialize)]
struct RpcResponse {
    jsonrpc: &'static str,
    id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<RpcError>,
}

#[derive(Serialize)]
struct RpcError {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
struct CallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

impl RpcResponse {
    fn result(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    fn error(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

/// Handles one incoming line and returns the serialised reply, if any.
pub async fn handle_line(service: &ToolService, line: &str) -> Option<String> {
    let response = match serde_json::from_str::<RpcRequest>(line) {
        Ok(req) => dispatch(service, req).await?,
        Err(e) => {
            tracing::warn!("unparsable tool request: {}", e);
            RpcResponse::error(Value::Null, PARSE_ERROR, format!("parse error: {e}"))
        }
    };

    match serde_json::to_string(&response) {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::error!("failed to serialise tool response: {}", e);
            None
        }
    }
}

async fn dispatch(service: &ToolService, req: RpcRequest) -> Option<RpcResponse> {
    let Some(id) = req.id else {
        tracing::debug!("notification: {}", req.method);
        return None;
    };

    let response = match req.method.as_str() {
        "initialize" => RpcResponse::result(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": { "tools": {} },
                "serverInfo": {
                    "name": "rxpad",
                    "version": env!("CARGO_PKG_VERSION")
                }
            }),
        ),
        "ping" => RpcResponse::result(id, json!({})),
        "tools/list" => RpcResponse::result(id, json!({ "tools": ToolService::definitions() })),
        "tools/call" => match serde_json::from_value::<CallParams>(req.params) {
            Ok(params) => {
                let output = service.call(&params.name, &params.arguments).await;
                RpcResponse::result(
                    id,
                    json!({
                        "content": [{ "type": "text", "text": output.text }],
                        "isError": output.is_error
                    }),
                )
            }
            Err(e) => RpcResponse::error(id, INVALID_PARAMS, format!("invalid params: {e}")),
        },
        other => RpcResponse::error(id, METHOD_NOT_FOUND, format!("method not found: {other}")),
    };

    Some(response)
}

/// Serves requests from `reader` until end of input, writing replies to `writer`.
///
/// Every request is handled in its own task, so a slow generation only delays its own reply.
/// Replies are funnelled through one channel and written whole, one per line. Returns once
/// input has ended and every in-flight request has replied.
pub async fn serve<R, W>(service: ToolService, reader: R, mut writer: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let mut tx = Some(tx);
    let mut lines = reader.lines();

    loop {
        tokio::select! {
            line = lines.next_line(), if tx.is_some() => match line? {
                Some(line) if !line.trim().is_empty() => {
                    if let Some(tx) = tx.clone() {
                        let service = service.clone();
                        tokio::spawn(async move {
                            if let Some(reply) = handle_line(&service, &line).await {
                                // Only fails once the writer is gone.
                                let _ = tx.send(reply);
                            }
                        });
                    }
                }
                Some(_) => {}
                None => tx = None,
            },
            Some(reply) = rx.recv() => {
                writer.write_all(reply.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
            else => break,
        }
    }
    Ok(())
}

/// Serves the tool protocol on the process's stdin and stdout.
pub async fn serve_stdio(service: ToolService) -> std::io::Result<()> {
    tracing::info!("-- Serving RxPad tools on stdio");
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    serve(service, stdin, tokio::io::stdout()).await
}
