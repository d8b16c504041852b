use thiserror::Error;

/// Errors produced by a single generation call.
///
/// Every failure mode of [`crate::generation::GeminiClient::generate`] maps to
/// exactly one variant, and the rendered messages reproduce the strings the
/// report has always surfaced, so callers that embed them keep emitting the
/// same user-visible text.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// No API key was supplied; the request was never sent.
    #[error("AI Summary Error: Gemini API Key is not found.")]
    MissingApiKey,

    /// Network, TLS, timeout, or non-2xx status from the HTTP layer.
    #[error("AI Summary Error: Failed to connect to AI service. {0}")]
    Transport(#[from] reqwest::Error),

    /// The service replied but the envelope carried no usable text part.
    #[error("AI Summary: Could not generate summary due to unexpected API response.")]
    UnexpectedResponse,

    /// A schema-constrained reply was not valid JSON.
    #[error("AI Summary: Failed to parse structured JSON response.")]
    MalformedJson,
}

/// Errors from reading client configuration out of the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable was set to a value that does not parse.
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
