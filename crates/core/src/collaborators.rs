//! Interfaces of the external analysis collaborators.
//!
//! Sentiment scoring and entity extraction are delegated to an inference
//! service. The core only defines what it consumes from them and how their
//! results are folded into version metadata. Implementations receive an
//! [`InferenceConfig`] through their constructor; there is no process-wide
//! client. Collaborator calls must complete before a write transaction is
//! opened.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::versioning::strip_html_tags;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Key under which a sentiment score is stored in `SceneVersion.meta`.
pub const SENTIMENT_META_KEY: &str = "sentiment";

/// Default model requested from the inference service.
pub const DEFAULT_INFERENCE_MODEL: &str = "gpt-4o-mini";

/// Default inference endpoint.
pub const DEFAULT_INFERENCE_BASE_URL: &str = "https://api.openai.com/v1";

/// Default request timeout for inference calls, in seconds.
pub const DEFAULT_INFERENCE_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the inference service, read once at startup and
/// handed to each collaborator instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceConfig {
    /// API key; `None` disables collaborators that need the service.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_INFERENCE_MODEL.to_string(),
            base_url: DEFAULT_INFERENCE_BASE_URL.to_string(),
            timeout_secs: DEFAULT_INFERENCE_TIMEOUT_SECS,
        }
    }
}

impl InferenceConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                       |
    /// |--------------------------|-------------------------------|
    /// | `INFERENCE_API_KEY`      | unset                         |
    /// | `INFERENCE_MODEL`        | `gpt-4o-mini`                 |
    /// | `INFERENCE_BASE_URL`     | `https://api.openai.com/v1`   |
    /// | `INFERENCE_TIMEOUT_SECS` | `30`                          |
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_key = lookup("INFERENCE_API_KEY").filter(|k| !k.trim().is_empty());
        let model = lookup("INFERENCE_MODEL").unwrap_or(defaults.model);
        let base_url = lookup("INFERENCE_BASE_URL").unwrap_or(defaults.base_url);
        let timeout_secs = match lookup("INFERENCE_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(CoreError::BadRequest(format!(
                        "INFERENCE_TIMEOUT_SECS must be a positive integer, got '{raw}'"
                    )))
                }
            },
            None => defaults.timeout_secs,
        };

        Ok(Self {
            api_key,
            model,
            base_url,
            timeout_secs,
        })
    }

    /// Whether an API key is available.
    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }
}

// ---------------------------------------------------------------------------
// Collaborator traits
// ---------------------------------------------------------------------------

/// Failure reported by an external collaborator.
#[derive(Debug, thiserror::Error)]
pub enum CollaboratorError {
    #[error("Collaborator unavailable: {0}")]
    Unavailable(String),

    #[error("Collaborator returned an invalid response: {0}")]
    InvalidResponse(String),
}

/// Scores the emotional tone of plain text in `[-1, 1]`.
#[async_trait]
pub trait SentimentScorer: Send + Sync {
    async fn score(&self, text: &str) -> Result<f64, CollaboratorError>;
}

/// A named entity found in a version's plain text.
///
/// Offsets are character indices into the text the extractor was given;
/// provenance rows elsewhere reference them together with the scene id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedMention {
    pub name: String,
    pub kind: String,
    pub start_idx: usize,
    pub end_idx: usize,
    pub confidence: f64,
}

impl ExtractedMention {
    /// Check the span lies within a text of `text_len` characters and the
    /// confidence is a probability.
    pub fn validate(&self, text_len: usize) -> Result<(), CoreError> {
        if self.start_idx >= self.end_idx || self.end_idx > text_len {
            return Err(CoreError::BadRequest(format!(
                "Mention '{}' span {}..{} is outside text of length {text_len}",
                self.name, self.start_idx, self.end_idx
            )));
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(CoreError::BadRequest(format!(
                "Mention '{}' confidence must be between 0 and 1, got {}",
                self.name, self.confidence
            )));
        }
        Ok(())
    }
}

/// Finds entity mentions in plain text.
#[async_trait]
pub trait EntityExtractor: Send + Sync {
    async fn extract(&self, text: &str) -> Result<Vec<ExtractedMention>, CollaboratorError>;
}

// ---------------------------------------------------------------------------
// Metadata helpers
// ---------------------------------------------------------------------------

/// Store `score` under [`SENTIMENT_META_KEY`], clamped into `[-1, 1]`.
///
/// Non-object metadata is replaced by a fresh object. Non-finite scores are
/// ignored.
pub fn with_sentiment(meta: serde_json::Value, score: f64) -> serde_json::Value {
    let mut map = match meta {
        serde_json::Value::Object(map) => map,
        _ => serde_json::Map::new(),
    };
    if let Some(number) = serde_json::Number::from_f64(score.clamp(-1.0, 1.0)) {
        map.insert(SENTIMENT_META_KEY.to_string(), serde_json::Value::Number(number));
    }
    serde_json::Value::Object(map)
}

/// Read the sentiment score from version metadata, `0.0` when absent or not
/// a number.
pub fn sentiment_score(meta: &serde_json::Value) -> f64 {
    meta.get(SENTIMENT_META_KEY)
        .and_then(serde_json::Value::as_f64)
        .unwrap_or(0.0)
}

/// Score the text of `content_html` and fold the result into `meta`.
pub async fn annotate_sentiment(
    scorer: &dyn SentimentScorer,
    content_html: &str,
    meta: serde_json::Value,
) -> Result<serde_json::Value, CollaboratorError> {
    let text = strip_html_tags(content_html);
    let score = scorer.score(&text).await?;
    Ok(with_sentiment(meta, score))
}
