//! HTTP server for the MCP endpoint

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{
        sse::{Event, Sse},
        IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use futures::stream;
use tower_http::trace::TraceLayer;

use crate::mcp::protocol::{McpHandler, McpRequest, McpResponse, SERVER_NAME};

/// Default path of the MCP endpoint
pub const DEFAULT_MCP_PATH: &str = "/mcp";

/// Handler shared by every HTTP request
pub type SharedHandler = Arc<dyn McpHandler>;

/// HTTP server exposing one MCP endpoint and a health check
pub struct HttpServer {
    handler: SharedHandler,
    addr: SocketAddr,
    path: String,
}

impl HttpServer {
    /// Create a new HTTP server
    pub fn new(handler: SharedHandler, addr: SocketAddr, path: impl Into<String>) -> Self {
        Self {
            handler,
            addr,
            path: path.into(),
        }
    }

    /// Build the router
    pub fn router(handler: SharedHandler, path: &str) -> Router {
        Router::new()
            .route(path, post(mcp_handler))
            .route("/health", get(health_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(handler)
    }

    /// Start the server
    pub async fn start(self) -> std::io::Result<()> {
        let app = Self::router(self.handler, &self.path);

        tracing::info!("MCP HTTP endpoint listening on http://{}{}", self.addr, self.path);

        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}

/// Health check endpoint
async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "server": SERVER_NAME,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// JSON-RPC over POST
async fn mcp_handler(
    State(handler): State<SharedHandler>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let request = match McpRequest::parse(&body) {
        Ok(request) => request,
        Err(response) => {
            tracing::debug!("Rejected HTTP body: {:?}", response.error);
            return (StatusCode::BAD_REQUEST, Json(response)).into_response();
        }
    };

    match handler.handle_request(request).await {
        None => StatusCode::ACCEPTED.into_response(),
        Some(response) if wants_event_stream(&headers) => event_stream(&response),
        Some(response) => Json(response).into_response(),
    }
}

/// SSE only when the client accepts it and cannot take plain JSON
fn wants_event_stream(headers: &HeaderMap) -> bool {
    let accept = headers
        .get_all(header::ACCEPT)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect::<Vec<_>>()
        .join(",");
    accept.contains("text/event-stream") && !accept.contains("application/json")
}

/// Wrap a single response in an SSE stream of one `message` event
fn event_stream(response: &McpResponse) -> Response {
    match Event::default().event("message").json_data(response) {
        Ok(event) => {
            Sse::new(stream::once(async move { Ok::<_, Infallible>(event) })).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to encode SSE event: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct PingHandler;

    #[async_trait]
    impl McpHandler for PingHandler {
        async fn handle_request(&self, request: McpRequest) -> Option<McpResponse> {
            if request.is_notification() {
                return None;
            }
            Some(McpResponse::success(request.id, json!({"pong": true})))
        }
    }

    fn app() -> Router {
        HttpServer::router(Arc::new(PingHandler), DEFAULT_MCP_PATH)
    }

    fn post_mcp(body: &str, accept: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/mcp")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, accept)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_json_reply() {
        let response = app()
            .oneshot(post_mcp(
                r#"{"jsonrpc":"2.0","id":7,"method":"ping"}"#,
                "application/json, text/event-stream",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["id"], 7);
        assert_eq!(body["result"]["pong"], true);
    }

    #[tokio::test]
    async fn test_sse_reply() {
        let response = app()
            .oneshot(post_mcp(
                r#"{"jsonrpc":"2.0","id":8,"method":"ping"}"#,
                "text/event-stream",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/event-stream"
        );
        let body = body_text(response).await;
        assert!(body.contains("event: message"));
        let data = body
            .lines()
            .find_map(|l| l.strip_prefix("data: "))
            .unwrap();
        let message: Value = serde_json::from_str(data).unwrap();
        assert_eq!(message["id"], 8);
    }

    #[tokio::test]
    async fn test_notification_is_accepted() {
        let response = app()
            .oneshot(post_mcp(
                r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
                "application/json",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn test_parse_error() {
        let response = app()
            .oneshot(post_mcp("{broken", "application/json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["error"]["code"], -32700);
    }

    #[tokio::test]
    async fn test_invalid_request() {
        let response = app()
            .oneshot(post_mcp(r#"{"jsonrpc":"2.0","id":4}"#, "application/json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["error"]["code"], -32600);
        assert_eq!(body["id"], 4);
    }

    #[tokio::test]
    async fn test_null_id_gets_reply() {
        let response = app()
            .oneshot(post_mcp(
                r#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#,
                "application/json",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["id"], Value::Null);
        assert!(body.as_object().unwrap().contains_key("id"));
        assert_eq!(body["result"]["pong"], true);
    }

    #[tokio::test]
    async fn test_get_is_not_allowed() {
        let response = app()
            .oneshot(Request::builder().uri("/mcp").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["status"], "ok");
    }
}
