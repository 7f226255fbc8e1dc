use crate::upstream::{GenerationParameters, UpstreamSchema};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_path")]
    pub path: String,
    #[serde(default)]
    pub cors: bool,
    #[serde(default)]
    pub logs: LogsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default)]
    pub schema: UpstreamSchema,
    #[serde(default)]
    pub project: String,
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Full URL; takes precedence over the one derived from project/location/model.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Name of the environment variable holding the bearer credential.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub parameters: GenerationParameters,
}

/// Bearer credential resolved at startup. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

impl UpstreamConfig {
    /// URL the relay posts to.
    pub fn endpoint_url(&self) -> crate::Result<String> {
        if let Some(endpoint) = self.endpoint.as_deref().filter(|e| !e.is_empty()) {
            return Ok(endpoint.to_string());
        }

        if self.project.is_empty() {
            return Err(crate::Error::config(
                "upstream.project is required when upstream.endpoint is not set",
            ));
        }

        let base = format!(
            "https://{location}-aiplatform.googleapis.com/v1/projects/{project}/locations/{location}",
            location = self.location,
            project = self.project,
        );

        Ok(match self.schema {
            UpstreamSchema::Predict => format!("{}/models/{}:predict", base, self.model),
            UpstreamSchema::GenerateContent => format!(
                "{}/publishers/google/models/{}:generateContent",
                base, self.model
            ),
        })
    }

    pub fn resolve_api_key(&self) -> crate::Result<ApiKey> {
        self.resolve_api_key_with(|name| std::env::var(name).ok())
    }

    pub fn resolve_api_key_with<F>(&self, lookup: F) -> crate::Result<ApiKey>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        match lookup(&self.api_key_env) {
            Some(key) if !key.trim().is_empty() => Ok(ApiKey::new(key.trim())),
            _ => Err(crate::Error::config(format!(
                "API key not found: set the {} environment variable",
                self.api_key_env
            ))),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            path: default_path(),
            cors: false,
            logs: LogsConfig::default(),
        }
    }
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            schema: UpstreamSchema::default(),
            project: String::new(),
            location: default_location(),
            model: default_model(),
            endpoint: None,
            api_key_env: default_api_key_env(),
            timeout_secs: None,
            parameters: GenerationParameters::default(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_path() -> String {
    "/".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_location() -> String {
    "us-central1".to_string()
}

fn default_model() -> String {
    "text-bison".to_string()
}

fn default_api_key_env() -> String {
    "CHATBOT_API_KEY".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn upstream(project: &str) -> UpstreamConfig {
        UpstreamConfig {
            project: project.to_string(),
            ..UpstreamConfig::default()
        }
    }

    #[test]
    fn test_predict_endpoint_derivation() {
        let url = upstream("demo-project").endpoint_url().unwrap();
        assert_eq!(
            url,
            "https://us-central1-aiplatform.googleapis.com/v1/projects/demo-project/locations/us-central1/models/text-bison:predict"
        );
    }

    #[test]
    fn test_generate_content_endpoint_derivation() {
        let mut config = upstream("demo-project");
        config.schema = UpstreamSchema::GenerateContent;
        config.location = "europe-west4".to_string();
        config.model = "gemini-1.5-flash".to_string();

        assert_eq!(
            config.endpoint_url().unwrap(),
            "https://europe-west4-aiplatform.googleapis.com/v1/projects/demo-project/locations/europe-west4/publishers/google/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn test_explicit_endpoint_wins() {
        let mut config = upstream("");
        config.endpoint = Some("http://localhost:9000/predict".to_string());
        assert_eq!(config.endpoint_url().unwrap(), "http://localhost:9000/predict");
    }

    #[test]
    fn test_missing_project_without_endpoint_is_an_error() {
        let err = upstream("").endpoint_url().unwrap_err();
        assert!(err.to_string().contains("upstream.project"));
    }

    #[test]
    fn test_api_key_resolution() {
        let config = upstream("p");
        let key = config
            .resolve_api_key_with(|name| {
                assert_eq!(name, "CHATBOT_API_KEY");
                Some("secret-value\n".to_string())
            })
            .unwrap();
        assert_eq!(key.expose(), "secret-value");
    }

    #[test]
    fn test_missing_or_blank_api_key_is_rejected() {
        let config = upstream("p");
        assert!(config.resolve_api_key_with(|_| None).is_err());
        assert!(config.resolve_api_key_with(|_| Some("  ".to_string())).is_err());
    }

    #[test]
    fn test_api_key_debug_is_redacted() {
        let key = ApiKey::new("super-secret");
        assert!(!format!("{:?}", key).contains("super-secret"));
    }
}
