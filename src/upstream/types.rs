use crate::error::UpstreamError;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

/// Substituted when the upstream response carries no generated text.
pub const FALLBACK_TEXT: &str = "No response from chatbot.";

/// Request/response shape spoken to the text-generation endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpstreamSchema {
    /// `instances` / `parameters` in, `predictions[0].content` out.
    #[default]
    Predict,
    /// `contents` / `generationConfig` in, `candidates[0].content.parts[].text` out.
    GenerateContent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct GenerationParameters {
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    #[serde(default = "default_top_k")]
    pub top_k: u32,
    #[serde(default = "default_top_p")]
    pub top_p: f64,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            top_k: default_top_k(),
            top_p: default_top_p(),
        }
    }
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_output_tokens() -> u32 {
    256
}

fn default_top_k() -> u32 {
    40
}

fn default_top_p() -> f64 {
    0.8
}

/// Body of the outbound POST.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OutboundPayload {
    Predict(PredictRequest),
    GenerateContent(GenerateContentRequest),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictRequest {
    pub instances: Vec<PredictInstance>,
    pub parameters: GenerationParameters,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictInstance {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<RequestContent>,
    pub generation_config: GenerationParameters,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestContent {
    pub role: String,
    pub parts: Vec<RequestPart>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestPart {
    pub text: String,
}

impl OutboundPayload {
    pub fn new(schema: UpstreamSchema, message: &str, parameters: &GenerationParameters) -> Self {
        match schema {
            UpstreamSchema::Predict => Self::Predict(PredictRequest {
                instances: vec![PredictInstance {
                    content: message.to_string(),
                }],
                parameters: parameters.clone(),
            }),
            UpstreamSchema::GenerateContent => Self::GenerateContent(GenerateContentRequest {
                contents: vec![RequestContent {
                    role: "user".to_string(),
                    parts: vec![RequestPart {
                        text: message.to_string(),
                    }],
                }],
                generation_config: parameters.clone(),
            }),
        }
    }

    /// The message text carried by the payload.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Predict(request) => request.instances.first().map(|i| i.content.as_str()),
            Self::GenerateContent(request) => request
                .contents
                .first()
                .and_then(|c| c.parts.first())
                .map(|p| p.text.as_str()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictResponse {
    #[serde(default)]
    pub predictions: Option<Vec<Option<Prediction>>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Prediction {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Option<Vec<Option<Candidate>>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Option<Vec<Option<CandidatePart>>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidatePart {
    #[serde(default)]
    pub text: Option<String>,
}

impl PredictResponse {
    pub fn into_text(self) -> Option<String> {
        self.predictions?
            .into_iter()
            .next()??
            .content
            .filter(|text| !text.is_empty())
    }
}

impl GenerateContentResponse {
    pub fn into_text(self) -> Option<String> {
        let parts = self.candidates?.into_iter().next()??.content?.parts?;
        let text: String = parts.into_iter().flatten().filter_map(|p| p.text).collect();
        Some(text).filter(|text| !text.is_empty())
    }
}

impl UpstreamSchema {
    /// Decodes a successful response body into the generated text, if any.
    pub fn decode_text(self, body: &[u8]) -> Result<Option<String>, UpstreamError> {
        let value: Value =
            serde_json::from_slice(body).map_err(|e| UpstreamError::decode(e.to_string()))?;
        if !value.is_object() {
            return Err(UpstreamError::decode("invalid type: expected a JSON object"));
        }

        let text = match self {
            Self::Predict => decode_object::<PredictResponse>(value)?.into_text(),
            Self::GenerateContent => decode_object::<GenerateContentResponse>(value)?.into_text(),
        };
        Ok(text)
    }
}

fn decode_object<T: DeserializeOwned>(value: Value) -> Result<T, UpstreamError> {
    serde_json::from_value(value).map_err(|e| UpstreamError::decode(e.to_string()))
}

/// Applies the fallback rule: no generated text means [`FALLBACK_TEXT`].
pub fn text_or_fallback(text: Option<String>) -> String {
    text.unwrap_or_else(|| FALLBACK_TEXT.to_string())
}
