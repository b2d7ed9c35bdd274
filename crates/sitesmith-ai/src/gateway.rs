//! Uniform entry point into the generative model.

use std::time::Duration;

use async_trait::async_trait;

/// Output format hint passed to the model service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    /// Ask the service to constrain output to a JSON document.
    Json,
}

impl ResponseFormat {
    /// MIME type understood by the service.
    pub fn mime_type(self) -> &'static str {
        match self {
            ResponseFormat::Json => "application/json",
        }
    }
}

/// A single generation request.
#[derive(Debug, Clone)]
pub struct GenerateRequest<'a> {
    /// Model identifier
    pub model: &'a str,
    /// Full prompt text
    pub prompt: &'a str,
    /// Optional output format hint
    pub format: Option<ResponseFormat>,
    /// Per-call timeout
    pub timeout: Duration,
}

/// Errors raised while talking to the model service.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model service returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("could not decode model response: {0}")]
    Decode(String),

    #[error("model returned an empty response")]
    Empty,
}

impl AiError {
    /// Short tag naming the failure category, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AiError::Timeout(_) => "timeout",
            AiError::Http(_) => "http",
            AiError::Api { .. } => "api",
            AiError::Decode(_) => "decode",
            AiError::Empty => "empty",
        }
    }
}

/// Something that can turn a prompt into text.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn generate(&self, request: &GenerateRequest<'_>) -> Result<String, AiError>;
}

/// Gateway over a [`ModelClient`].
///
/// Enforces the timeout, strips code fences and collapses every failure into
/// `None` after logging it. Retrying is left to callers.
pub struct AiGateway {
    client: Box<dyn ModelClient>,
}

impl AiGateway {
    pub fn new(client: impl ModelClient + 'static) -> Self {
        Self {
            client: Box::new(client),
        }
    }

    /// Call the model and return cleaned text, or `None` on any failure.
    pub async fn call(
        &self,
        model: &str,
        prompt: &str,
        format: Option<ResponseFormat>,
        timeout: Duration,
    ) -> Option<String> {
        tracing::info!(model, timeout_secs = timeout.as_secs(), "Calling model");

        let request = GenerateRequest {
            model,
            prompt,
            format,
            timeout,
        };

        let result = match tokio::time::timeout(timeout, self.client.generate(&request)).await {
            Ok(result) => result,
            Err(_) => Err(AiError::Timeout(timeout)),
        };

        let cleaned = result.and_then(|text| {
            let cleaned = strip_fences(&text);
            if cleaned.is_empty() {
                Err(AiError::Empty)
            } else {
                Ok(cleaned)
            }
        });

        match cleaned {
            Ok(text) => {
                tracing::debug!(bytes = text.len(), "Response received and cleaned");
                Some(text)
            }
            Err(e) => {
                tracing::error!(kind = e.kind(), error = %e, "Failed to generate content");
                None
            }
        }
    }
}

/// Remove a leading fence line (with any language tag) and a trailing fence.
///
/// A fence on a single line loses only its backticks and a language tag
/// glued directly to the content, as in ```` ```html<p>hi</p>``` ````.
pub fn strip_fences(text: &str) -> String {
    let mut body = text.trim();

    if let Some(rest) = body.strip_prefix("```") {
        body = match rest.find('\n') {
            Some(idx) => &rest[idx + 1..],
            None => {
                let tagless = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
                let has_body = !tagless.trim_end_matches('`').trim().is_empty();
                if has_body && tagless.starts_with(|c: char| !c.is_alphanumeric()) {
                    tagless
                } else {
                    rest
                }
            }
        };
    }

    if let Some(stripped) = body.trim_end().strip_suffix("```") {
        body = stripped;
    }

    body.trim().to_string()
}
