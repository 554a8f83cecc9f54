//! HTTP transport: the JSON-RPC endpoint plus read-only status routes.
//!
//! | Route | Purpose |
//! |-------|---------|
//! | `POST /mcp` | JSON-RPC envelope (`initialize`, `tools/list`, `tools/call`) |
//! | `GET /` | service descriptor with backend connectivity |
//! | `GET /health` | per-backend connectivity and a timestamp |
//! | `GET /tools` | the tool catalogue, same as `tools/list` |

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::GraphMindConfig;
use crate::graph;
use crate::llm::LlmGateway;
use crate::protocol::{RpcRequest, RpcResponse, PROTOCOL_VERSION};
use crate::tools::{MemoryTools, ToolRegistry};

pub const SERVER_NAME: &str = "GraphMind MCP";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Shared setup: connect both gateways and build the tool handler.
pub async fn build_tools(config: &GraphMindConfig) -> MemoryTools {
    let graph = graph::connect(&config.graph).await;
    let llm = LlmGateway::from_config(&config.llm);
    MemoryTools::new(Arc::new(ToolRegistry::builtin()), graph, llm)
}

pub fn router(tools: MemoryTools) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/tools", get(list_tools))
        .route("/mcp", post(rpc))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(tools)
}

/// Start the HTTP server and run until ctrl-c.
pub async fn serve(config: GraphMindConfig) -> Result<()> {
    let bind_addr = config.bind_addr();
    tracing::info!(addr = %bind_addr, "starting {SERVER_NAME}");

    let tools = build_tools(&config).await;
    tracing::info!(
        graph = tools.graph().is_connected(),
        llm = tools.llm().is_configured(),
        "backends ready"
    );

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(addr = %bind_addr, "MCP endpoint at http://{bind_addr}/mcp");

    axum::serve(listener, router(tools))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
            }
            tracing::info!("shutting down HTTP server");
        })
        .await?;

    Ok(())
}

/// Decode one JSON-RPC body and produce its response. Never fails: a body
/// that is not a request yields an internal-error envelope with a null id.
pub async fn handle_message(tools: &MemoryTools, body: &[u8]) -> RpcResponse {
    let request: RpcRequest = match serde_json::from_slice(body) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(error = %e, "malformed JSON-RPC request");
            return RpcResponse::malformed(format!("invalid request: {e}"));
        }
    };

    let id = request.id.clone().unwrap_or(Value::Null);
    tracing::debug!(method = %request.method, "MCP request");

    match request.method.as_str() {
        "initialize" => RpcResponse::ok(id, initialize_result()),
        "tools/list" => RpcResponse::ok(id, json!({ "tools": tools.registry().list() })),
        "tools/call" => {
            let params = request.params();
            let name = params.get("name").and_then(Value::as_str).unwrap_or_default();
            let arguments = params.get("arguments").cloned().unwrap_or_else(|| json!({}));

            match tools.call(name, &arguments).await {
                Ok(result) => RpcResponse::ok(id, serde_json::to_value(result).unwrap_or(Value::Null)),
                Err(e) => RpcResponse::err(id, e.code(), e.to_string()),
            }
        }
        other => RpcResponse::not_implemented(id, other),
    }
}

fn initialize_result() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {
            "tools": {},
            "prompts": {}
        },
        "serverInfo": {
            "name": SERVER_NAME,
            "version": SERVER_VERSION
        }
    })
}

fn connectivity(up: bool) -> &'static str {
    if up {
        "connected"
    } else {
        "disconnected"
    }
}

async fn rpc(State(tools): State<MemoryTools>, body: Bytes) -> Json<RpcResponse> {
    Json(handle_message(&tools, &body).await)
}

async fn root(State(tools): State<MemoryTools>) -> Json<Value> {
    Json(json!({
        "name": SERVER_NAME,
        "version": SERVER_VERSION,
        "features": {
            "graph": connectivity(tools.graph().is_connected()),
            "llm": connectivity(tools.llm().is_configured()),
        }
    }))
}

async fn health(State(tools): State<MemoryTools>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "graph": tools.graph().is_connected(),
        "llm": tools.llm().is_configured(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn list_tools(State(tools): State<MemoryTools>) -> Json<Value> {
    Json(json!({ "tools": tools.registry().list() }))
}
