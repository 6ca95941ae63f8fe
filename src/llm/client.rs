use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://integrate.api.nvidia.com/v1";
pub const DEFAULT_MODEL: &str = "meta/llama-4-maverick-17b-128e-instruct";

const GENERATE_TIMEOUT: Duration = Duration::from_secs(60);
const PROBE_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_TOKENS: u32 = 512;
const TEMPERATURE: f64 = 0.2;

const DIRECT_SQL_HINTS: &[&str] = &[
    "Try using direct SQL commands instead:",
    "  SHOW TABLES;",
    "  SHOW DATABASES;",
    "  DESCRIBE table_name;",
    "  SELECT * FROM table_name LIMIT 10;",
];

/// Why the model produced no text. Every variant is treated the same by the
/// pipeline ("no candidate SQL"); the distinction only feeds user messages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LlmFailure {
    #[error("Request timeout (API is taking too long)")]
    Timeout,

    #[error("Connection failed (check internet connection)")]
    Connection,

    #[error("Invalid API key")]
    Unauthorized,

    #[error("Access forbidden (403)")]
    Forbidden,

    #[error("Rate limit exceeded (429)")]
    RateLimited,

    #[error("HTTP {status}{}", detail_suffix(.detail))]
    Http { status: u16, detail: Option<String> },

    #[error("No API key configured")]
    MissingApiKey,

    #[error("Model returned an empty response")]
    EmptyResponse,

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Request failed: {0}")]
    Request(String),
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_ref()
        .map(|d| format!(" ({})", d))
        .unwrap_or_default()
}

impl LlmFailure {
    /// Follow-up advice shown under the failure message.
    pub fn hints(&self) -> Vec<&'static str> {
        match self {
            LlmFailure::Forbidden => {
                let mut hints = vec![
                    "Possible reasons:",
                    "  - API key doesn't have access to this model",
                    "  - API quota or rate limit exceeded",
                    "  - Request may be too large",
                ];
                hints.extend_from_slice(DIRECT_SQL_HINTS);
                hints
            }
            LlmFailure::RateLimited => {
                let mut hints = vec!["Please wait a moment and try again."];
                hints.extend_from_slice(DIRECT_SQL_HINTS);
                hints
            }
            LlmFailure::MissingApiKey | LlmFailure::Unauthorized => {
                let mut hints = vec!["Store a key with: snapbase set-key <KEY>"];
                hints.extend_from_slice(DIRECT_SQL_HINTS);
                hints
            }
            _ => DIRECT_SQL_HINTS.to_vec(),
        }
    }

    fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmFailure::Timeout
        } else if err.is_connect() {
            LlmFailure::Connection
        } else {
            LlmFailure::Request(err.to_string())
        }
    }

    fn from_status(status: u16, body: &str) -> Self {
        match status {
            401 => LlmFailure::Unauthorized,
            403 => LlmFailure::Forbidden,
            429 => LlmFailure::RateLimited,
            _ => LlmFailure::Http {
                status,
                detail: error_detail(body),
            },
        }
    }
}

/// `detail` or `error` field of a JSON error body, if any.
fn error_detail(body: &str) -> Option<String> {
    let json: serde_json::Value = serde_json::from_str(body).ok()?;
    let field = json.get("detail").or_else(|| json.get("error"))?;
    match field {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Something that turns a prompt into model text.
#[async_trait]
pub trait SqlGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> std::result::Result<String, LlmFailure>;
}

/// Client for an OpenAI-compatible chat-completions endpoint.
#[derive(Clone)]
pub struct LlmClient {
    api_key: String,
    base_url: String,
    model: String,
    timeout: Duration,
    http: reqwest::Client,
}

impl LlmClient {
    pub fn new(api_key: String, model: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            timeout: GENERATE_TIMEOUT,
            http: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check that the key is accepted: a tiny completion must return HTTP 200.
    pub async fn probe(&self) -> bool {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [{"role": "user", "content": "Say OK"}],
            "max_tokens": 5,
        });

        match self.post(&body, PROBE_TIMEOUT.min(self.timeout)).await {
            Ok(response) => response.status().as_u16() == 200,
            Err(e) => {
                warn!("API key validation failed: {}", e);
                false
            }
        }
    }

    async fn post(
        &self,
        body: &serde_json::Value,
        timeout: Duration,
    ) -> std::result::Result<reqwest::Response, LlmFailure> {
        self.http
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Accept", "application/json")
            .json(body)
            .timeout(timeout)
            .send()
            .await
            .map_err(LlmFailure::from_transport)
    }

    async fn complete(&self, prompt: &str) -> std::result::Result<String, LlmFailure> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "max_tokens": MAX_TOKENS,
            "temperature": TEMPERATURE,
        });

        let response = self.post(&body, self.timeout).await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmFailure::from_status(status.as_u16(), &error_text));
        }

        let response_json: serde_json::Value = response.json().await.map_err(|e| {
            if e.is_timeout() {
                LlmFailure::Timeout
            } else {
                LlmFailure::Malformed(e.to_string())
            }
        })?;

        let content = response_json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| LlmFailure::Malformed("no choices[0].message.content".to_string()))?
            .trim();

        if content.is_empty() {
            return Err(LlmFailure::EmptyResponse);
        }

        Ok(content.to_string())
    }
}

/// Stand-in generator when no API key is configured; every call fails.
pub struct MissingKeyGenerator;

#[async_trait]
impl SqlGenerator for MissingKeyGenerator {
    async fn generate(&self, _prompt: &str) -> std::result::Result<String, LlmFailure> {
        Err(LlmFailure::MissingApiKey)
    }
}

#[async_trait]
impl SqlGenerator for LlmClient {
    async fn generate(&self, prompt: &str) -> std::result::Result<String, LlmFailure> {
        debug!("Sending prompt to {} ({} chars)", self.model, prompt.len());
        let result = self.complete(prompt).await;
        if let Err(ref failure) = result {
            warn!("LLM error: {}", failure);
        }
        result
    }
}
