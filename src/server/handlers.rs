use super::types::{
    ErrorResponse, INVALID_BODY, InboundRequest, RelayResponse, UPSTREAM_FAILURE,
};
use crate::upstream::{ChatbotClient, text_or_fallback};
use axum::{body::Bytes, extract::State, http::StatusCode, response::Json};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[derive(Clone)]
pub struct AppState {
    pub client: Arc<dyn ChatbotClient>,
}

impl AppState {
    pub fn new(client: Arc<dyn ChatbotClient>) -> Self {
        Self { client }
    }
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

/// Relays one message to the chatbot API. Accepts any method; an empty body
/// counts as a request without a message.
pub async fn relay(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<RelayResponse>, HandlerError> {
    let request = parse_body(&body)?;
    let message = request.effective_message();

    info!("Received relay request ({} chars)", message.chars().count());

    match state.client.complete(&message).await {
        Ok(text) => {
            if text.is_none() {
                debug!("Upstream returned no text, using fallback");
            }
            Ok(Json(RelayResponse {
                response: text_or_fallback(text),
            }))
        }
        Err(e) => {
            error!("Error connecting to chatbot API: {}", e);
            if let Some(body) = e.upstream_body() {
                debug!("Upstream error response body: {}", body);
            }
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: UPSTREAM_FAILURE.to_string(),
                    details: e.to_string(),
                }),
            ))
        }
    }
}

fn parse_body(body: &[u8]) -> Result<InboundRequest, HandlerError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(InboundRequest::default());
    }

    match serde_json::from_slice(body) {
        Ok(value) => Ok(InboundRequest::from_json(&value)),
        Err(e) => {
            warn!("Rejecting request with invalid JSON body: {}", e);
            Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: INVALID_BODY.to_string(),
                    details: e.to_string(),
                }),
            ))
        }
    }
}
