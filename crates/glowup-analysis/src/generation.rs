//! Client for the generative-language `generateContent` endpoint.
//!
//! Wraps `reqwest` with the envelope handling the service requires: prompt
//! text goes out as a single user turn, structured tasks attach a response
//! schema, and the reply text is dug out of `candidates[0].content.parts[0]`.
//! Every failure mode is absorbed into [`GenerationError`]; callers receive a
//! plain `Result` and nothing ever panics across this boundary. Each call is
//! a single attempt with no retry.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, GenerationError};
use crate::schema::ResponseSchema;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Endpoint configuration for [`GeminiClient`].
///
/// Defaults point at the production service; tests override `base_url` to
/// target a local mock server.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl GeminiConfig {
    /// Reads the configuration from environment variables, falling back to
    /// the defaults for anything unset.
    ///
    /// Recognized variables: `GLOWUP_GEMINI_BASE_URL`, `GLOWUP_GEMINI_MODEL`,
    /// `GLOWUP_REQUEST_TIMEOUT_SECS`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvVar`] if the timeout is set but does
    /// not parse as an integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::build(|var| std::env::var(var))
    }

    /// Builds the configuration from the provided env-var lookup function.
    ///
    /// Decoupled from the real environment so it can be tested with a plain
    /// `HashMap` lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvVar`] if `GLOWUP_REQUEST_TIMEOUT_SECS`
    /// is present but not an integer.
    pub fn build<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        let or_default = |var: &str, default: &str| -> String {
            lookup(var).unwrap_or_else(|_| default.to_string())
        };

        let base_url = or_default("GLOWUP_GEMINI_BASE_URL", DEFAULT_BASE_URL);
        let model = or_default("GLOWUP_GEMINI_MODEL", DEFAULT_MODEL);

        let raw_timeout = or_default(
            "GLOWUP_REQUEST_TIMEOUT_SECS",
            &DEFAULT_TIMEOUT_SECS.to_string(),
        );
        let timeout_secs = raw_timeout
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: "GLOWUP_REQUEST_TIMEOUT_SECS".to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            base_url,
            model,
            timeout_secs,
        })
    }
}

/// The payload of a successful generation call.
///
/// Tasks that request a response schema get [`Generated::Structured`] with
/// the parsed JSON; free-text tasks get [`Generated::Text`]. Callers match
/// both arms; there is no implicit coercion between them.
#[derive(Debug, Clone, PartialEq)]
pub enum Generated {
    /// The raw reply text of a free-text task.
    Text(String),
    /// The parsed JSON reply of a schema-constrained task.
    Structured(serde_json::Value),
}

/// Client for the `generateContent` endpoint.
///
/// Holds the HTTP client and the injected endpoint (base URL + model id).
/// The API key travels per call, since the invoking process supplies it with
/// each analysis request.
pub struct GeminiClient {
    http: Client,
    base_url: String,
    model: String,
}

impl GeminiClient {
    /// Creates a client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Transport`] if the underlying
    /// `reqwest::Client` cannot be constructed.
    pub fn new(config: &GeminiConfig) -> Result<Self, GenerationError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("glowup/0.1 (post-analysis)")
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    /// Runs one generation call: a single user turn, optionally constrained
    /// by a response schema.
    ///
    /// One attempt, no retry; the configured request timeout bounds the call
    /// and a timeout surfaces as [`GenerationError::Transport`].
    ///
    /// # Errors
    ///
    /// - [`GenerationError::MissingApiKey`] if `api_key` is absent or empty;
    ///   returned before any network activity.
    /// - [`GenerationError::Transport`] on connection failure, timeout, or a
    ///   non-2xx HTTP status.
    /// - [`GenerationError::UnexpectedResponse`] if the reply envelope does
    ///   not carry `candidates[0].content.parts[0].text`.
    /// - [`GenerationError::MalformedJson`] if a schema was supplied but the
    ///   reply text is not valid JSON.
    pub async fn generate(
        &self,
        prompt: &str,
        api_key: Option<&str>,
        schema: Option<&ResponseSchema>,
    ) -> Result<Generated, GenerationError> {
        let Some(api_key) = api_key.filter(|key| !key.is_empty()) else {
            return Err(GenerationError::MissingApiKey);
        };

        let payload = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            generation_config: schema.map(|response_schema| GenerationConfig {
                response_mime_type: "application/json",
                response_schema,
            }),
        };

        let url = self.endpoint(api_key);
        let response = self.http.post(url).json(&payload).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;

        let envelope: GenerateContentResponse = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::debug!(error = %e, body = %body, "response is not a known envelope");
                return Err(GenerationError::UnexpectedResponse);
            }
        };

        let text = envelope
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text);

        let Some(text) = text else {
            tracing::debug!(body = %body, "envelope carries no candidate text");
            return Err(GenerationError::UnexpectedResponse);
        };

        match schema {
            Some(_) => match serde_json::from_str(&text) {
                Ok(value) => Ok(Generated::Structured(value)),
                Err(e) => {
                    tracing::debug!(error = %e, text = %text, "structured reply is not valid JSON");
                    Err(GenerationError::MalformedJson)
                }
            },
            None => Ok(Generated::Text(text)),
        }
    }

    /// Builds the full request URL for the configured model, with the API
    /// key as the `key` query parameter.
    fn endpoint(&self, api_key: &str) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, api_key
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: &'a ResponseSchema,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}
