use async_trait::async_trait;
use chatbot_relay::{UpstreamError, upstream::ChatbotClient};
use std::sync::{Arc, Mutex};

/// Mock chatbot client for testing
#[derive(Debug, Clone)]
pub struct MockChatbotClient {
    pub reply: Option<String>,
    pub error: Option<UpstreamError>,
    pub messages: Arc<Mutex<Vec<String>>>,
}

impl MockChatbotClient {
    pub fn new() -> Self {
        Self {
            reply: None,
            error: None,
            messages: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_reply(mut self, reply: impl Into<String>) -> Self {
        self.reply = Some(reply.into());
        self
    }

    pub fn with_error(mut self, error: UpstreamError) -> Self {
        self.error = Some(error);
        self
    }

    pub fn get_messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatbotClient for MockChatbotClient {
    async fn complete(&self, message: &str) -> Result<Option<String>, UpstreamError> {
        self.messages.lock().unwrap().push(message.to_string());

        if let Some(ref error) = self.error {
            return Err(error.clone());
        }

        Ok(self.reply.clone())
    }
}

impl Default for MockChatbotClient {
    fn default() -> Self {
        Self::new()
    }
}
