use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use chatbot_relay::{
    config::{ServerConfig, UpstreamConfig},
    server,
    upstream::ChatbotClient,
};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt; // for `oneshot`

/// Router wired to the given client with default server settings
pub fn create_test_app(client: Arc<dyn ChatbotClient>) -> Router {
    server::router(&ServerConfig::default(), client)
}

/// Upstream configuration pointing at a mock server
pub fn upstream_config_for(endpoint: &str) -> UpstreamConfig {
    UpstreamConfig {
        endpoint: Some(endpoint.to_string()),
        ..UpstreamConfig::default()
    }
}

/// JSON POST to `/`
pub fn json_request(body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Sends a request and returns the status with the parsed JSON body
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

/// Writes a config YAML file into a fresh temp dir
pub fn create_test_config_file(content: &str) -> (TempDir, String) {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let config_path = dir.path().join("config.yaml");
    std::fs::write(&config_path, content).unwrap();
    let path = config_path.to_string_lossy().to_string();
    (dir, path)
}

/// Sample configuration YAML for testing
pub const SAMPLE_CONFIG_YAML: &str = r#"
server:
  host: "127.0.0.1"
  port: 9090
  path: "/chatBot"
  cors: true
  logs:
    level: "debug"

upstream:
  schema: "generate_content"
  project: "demo-project"
  location: "europe-west4"
  model: "gemini-1.5-flash"
  api_key_env: "DEMO_CHATBOT_KEY"
  timeout_secs: 30
  parameters:
    temperature: 0.2
    max_output_tokens: 512
"#;

/// Minimal configuration relying on defaults
pub const MINIMAL_CONFIG_YAML: &str = r#"
upstream:
  project: "zero-demo"
"#;

/// Invalid configuration YAML for testing error cases
pub const INVALID_CONFIG_YAML: &str = r#"
server:
  port: "not-a-number"
upstream:
  schema: "chat"
"#;
