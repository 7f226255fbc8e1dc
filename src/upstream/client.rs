use super::types::*;
use crate::{
    Result,
    config::{ApiKey, UpstreamConfig},
    error::UpstreamError,
};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use std::time::Duration;
use tracing::debug;

#[async_trait]
pub trait ChatbotClient: Send + Sync {
    /// Sends one message upstream and returns the generated text, if the
    /// response carried any.
    async fn complete(&self, message: &str) -> std::result::Result<Option<String>, UpstreamError>;
}

pub struct HttpChatbotClient {
    client: reqwest::Client,
    endpoint: String,
    schema: UpstreamSchema,
    parameters: GenerationParameters,
}

impl HttpChatbotClient {
    pub fn new(config: &UpstreamConfig, api_key: &ApiKey) -> Result<Self> {
        let endpoint = config.endpoint_url()?;

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key.expose()))
            .map_err(|_| crate::Error::config("API key contains invalid header characters"))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(UpstreamError::from)?;

        debug!("Created {:?} client for endpoint: {}", config.schema, endpoint);

        Ok(Self {
            client,
            endpoint,
            schema: config.schema,
            parameters: config.parameters.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ChatbotClient for HttpChatbotClient {
    async fn complete(&self, message: &str) -> std::result::Result<Option<String>, UpstreamError> {
        let payload = OutboundPayload::new(self.schema, message, &self.parameters);

        debug!("Sending {} byte message upstream", payload.message().map_or(0, str::len));

        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        debug!("Received {} byte response with status {}", body.len(), status);

        self.schema.decode_text(&body)
    }
}
