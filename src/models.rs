use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// Ollama /api/generate request format
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    #[serde(default)]
    pub stream: bool,
}

impl GenerateRequest {
    // Always non-streaming, one JSON body per call
    pub fn new(model: &str, prompt: &str) -> Self {
        Self {
            model: model.to_string(),
            prompt: prompt.to_string(),
            stream: false,
        }
    }
}

// Ollama /api/generate response format
// Only `response` is required, everything else is informational.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct GenerateResponse {
    #[serde(default)]
    pub model: String,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    pub response: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub done_reason: Option<String>,
    #[serde(default)]
    pub context: Vec<i64>,
    #[serde(default)]
    pub total_duration: u64,
    #[serde(default)]
    pub load_duration: u64,
    #[serde(default)]
    pub prompt_eval_count: u64,
    #[serde(default)]
    pub prompt_eval_duration: u64,
    #[serde(default)]
    pub eval_count: u64,
    #[serde(default)]
    pub eval_duration: u64,
}

// Informational only, anything that is not an RFC 3339 string becomes None
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(s)) => DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|t| t.with_timezone(&Utc)),
        Some(Raw::Other(_)) | None => None,
    })
}

impl GenerateResponse {
    // Wrap a cached text, no timing or token data is kept for those
    pub fn from_cached(model: &str, response: String) -> Self {
        Self {
            model: model.to_string(),
            response,
            done: true,
            ..Default::default()
        }
    }
}

/// Where a dispatched response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Cache,
    Backend,
}

/// A resolved prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatched {
    pub response: GenerateResponse,
    pub source: Source,
}

impl Dispatched {
    pub fn text(&self) -> &str {
        &self.response.response
    }
}
