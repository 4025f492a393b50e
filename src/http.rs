//! HTTP transport for the MCP server.
//!
//! A single `POST /mcp` endpoint carries every protocol method, plus a
//! `GET /health` probe. Responses are SSE-framed when the client's `Accept`
//! header admits `text/event-stream`, matching streamable HTTP servers.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::mcp::server::McpServer;
use crate::{MCP_ENDPOINT, SESSION_HEADER, VERSION};

/// SSE content type.
const EVENT_STREAM: &str = "text/event-stream";

/// Build the application router around a constructed server.
pub fn router(server: Arc<McpServer>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(MCP_ENDPOINT, post(handle_mcp))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(server)
}

/// Bind and serve until the listener is closed.
pub async fn serve(config: &Config, server: Arc<McpServer>) -> Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{addr}{MCP_ENDPOINT}");

    axum::serve(listener, router(server))
        .await
        .map_err(|e| Error::HttpServer(e.to_string()))
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": VERSION
    }))
}

/// The protocol endpoint: dispatch the body, then frame the response to
/// match the client's declared `Accept` preference.
async fn handle_mcp(
    State(server): State<Arc<McpServer>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let session = headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let dispatch = server.dispatch(&body, session.as_deref()).await;

    let payload = match serde_json::to_string(&dispatch.response) {
        Ok(json) => json,
        Err(e) => {
            error!("Failed to serialize response envelope: {e}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let mut response = if wants_event_stream(&headers) {
        let framed = format!("event: message\ndata: {payload}\n\n");
        ([(header::CONTENT_TYPE, EVENT_STREAM)], framed).into_response()
    } else {
        ([(header::CONTENT_TYPE, "application/json")], payload).into_response()
    };

    if let Some(session_id) = dispatch.new_session {
        if let Ok(value) = HeaderValue::from_str(&session_id) {
            response.headers_mut().insert(SESSION_HEADER, value);
        }
    }

    response
}

/// Whether the `Accept` header admits SSE framing.
fn wants_event_stream(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains(EVENT_STREAM))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wants_event_stream() {
        let mut headers = HeaderMap::new();
        assert!(!wants_event_stream(&headers));

        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/json, text/event-stream"),
        );
        assert!(wants_event_stream(&headers));

        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        assert!(!wants_event_stream(&headers));
    }
}
