use std::time::Duration;

use serde::Serialize;

use crate::{
    credentials::CredentialSource,
    error::{AnalysisError, AttemptError},
    prompt::{DEFAULT_LANGUAGE, compose_instructions},
    provider::ModelConfig,
    style::StyleProfile,
    video::VideoPayload,
};

const QUOTA_MARKERS: [&str; 3] = ["429", "quota", "RESOURCE_EXHAUSTED"];
const SERVER_BUSY: &str = "Server busy, try again later.";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(skip)]
    pub model: String,
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Part {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    Text {
        text: String,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub data: String,
    pub mime_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationConfig {
    pub temperature: f64,
}

/// One network round trip to the model.
pub trait Transport {
    async fn generate(
        &self,
        credential: &str,
        request: &GenerateRequest,
    ) -> Result<String, AttemptError>;
}

/// Suspends the analysis between quota retries.
pub trait Cooldown {
    async fn wait(&self, period: Duration);
}

pub struct TokioCooldown;

impl Cooldown for TokioCooldown {
    async fn wait(&self, period: Duration) {
        tokio::time::sleep(period).await;
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts_per_credential: u32,
    pub cooldown: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts_per_credential: 3,
            // Provider advertises ~21s until the quota window resets.
            cooldown: Duration::from_secs(25),
        }
    }
}

/// Classify a failed call from its HTTP status (when there is one) and body.
pub fn classify_failure(status: Option<u16>, body: &str) -> AttemptError {
    let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
    let provider_status = parsed
        .as_ref()
        .and_then(|v| v["error"]["status"].as_str())
        .unwrap_or_default();
    let message = parsed
        .as_ref()
        .and_then(|v| v["error"]["message"].as_str())
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string());

    let rate_limited = status == Some(429)
        || provider_status == "RESOURCE_EXHAUSTED"
        || QUOTA_MARKERS.iter().any(|marker| message.contains(marker));

    if rate_limited {
        return AttemptError::RateLimited { message };
    }

    let message = match status {
        Some(code) => format!("HTTP {}: {}", code, message),
        None => message,
    };
    AttemptError::Transient { message }
}

/// Concatenate the text parts of the first candidate.
pub fn extract_text(response: &serde_json::Value) -> Result<String, AttemptError> {
    let text: String = response["candidates"][0]["content"]["parts"]
        .as_array()
        .map(|parts| parts.iter().filter_map(|p| p["text"].as_str()).collect())
        .unwrap_or_default();

    if text.is_empty()
        && let Some(reason) = response["promptFeedback"]["blockReason"].as_str()
    {
        return Err(AttemptError::Transient {
            message: format!("Request blocked by model: {}", reason),
        });
    }

    Ok(text)
}

pub struct GeminiTransport {
    http: reqwest::Client,
    api_base: String,
}

impl GeminiTransport {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.into(),
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            model
        )
    }
}

impl Transport for GeminiTransport {
    async fn generate(
        &self,
        credential: &str,
        request: &GenerateRequest,
    ) -> Result<String, AttemptError> {
        let response = self
            .http
            .post(self.endpoint(&request.model))
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", credential)
            .json(request)
            .send()
            .await
            .map_err(|e| classify_failure(None, &e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| classify_failure(Some(status.as_u16()), &e.to_string()))?;

        if !status.is_success() {
            return Err(classify_failure(Some(status.as_u16()), &body));
        }

        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| AttemptError::Transient {
                message: format!("Invalid API response: {}", e),
            })?;
        extract_text(&value)
    }
}

/// Rotating, retrying client: every credential gets up to
/// `max_attempts_per_credential` tries, with a cooldown between quota failures.
pub struct InferenceClient<T, C = TokioCooldown> {
    transport: T,
    cooldown: C,
    credentials: CredentialSource,
    model: ModelConfig,
    policy: RetryPolicy,
    language: String,
}

impl InferenceClient<GeminiTransport, TokioCooldown> {
    pub fn gemini(credentials: CredentialSource, model: ModelConfig) -> Self {
        let transport = GeminiTransport::new(model.api_base.clone());
        Self::new(transport, TokioCooldown, credentials).with_model(model)
    }
}

impl<T: Transport, C: Cooldown> InferenceClient<T, C> {
    pub fn new(transport: T, cooldown: C, credentials: CredentialSource) -> Self {
        Self {
            transport,
            cooldown,
            credentials,
            model: ModelConfig::default(),
            policy: RetryPolicy::default(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    pub fn with_model(mut self, model: ModelConfig) -> Self {
        self.model = model;
        self
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn build_request(
        &self,
        video: &VideoPayload,
        style: StyleProfile,
        include_audio: bool,
    ) -> GenerateRequest {
        GenerateRequest {
            model: self.model.model.clone(),
            contents: vec![Content {
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            data: video.to_base64(),
                            mime_type: video.mime_type.clone(),
                        },
                    },
                    Part::Text {
                        text: compose_instructions(style, include_audio, &self.language),
                    },
                ],
            }],
            generation_config: GenerationConfig {
                temperature: self.model.temperature,
            },
        }
    }

    /// Run the analysis, returning the first non-empty model response.
    pub async fn analyze(
        &self,
        video: &VideoPayload,
        style: StyleProfile,
        include_audio: bool,
    ) -> Result<String, AnalysisError> {
        let pool = self.credentials.resolve()?;
        let request = self.build_request(video, style, include_audio);
        let max_attempts = self.policy.max_attempts_per_credential.max(1);
        let mut last_error: Option<AttemptError> = None;

        for (index, credential) in pool.iter().enumerate() {
            let key = index + 1;
            let mut attempt = 0;

            while attempt < max_attempts {
                tracing::info!(key, attempt = attempt + 1, "sending analysis request");

                let error = match self.attempt(credential, &request).await {
                    Ok(text) => return Ok(text),
                    Err(e) => e,
                };

                if error.is_rate_limited() && attempt + 1 < max_attempts {
                    tracing::warn!(
                        key,
                        cooldown_secs = self.policy.cooldown.as_secs(),
                        "quota exhausted, waiting before retrying"
                    );
                    self.cooldown.wait(self.policy.cooldown).await;
                    attempt += 1;
                    continue;
                }

                tracing::warn!(key, error = %error, "giving up on key");
                last_error = Some(error);
                break;
            }
        }

        Err(AnalysisError::Exhausted {
            cause: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| SERVER_BUSY.to_string()),
        })
    }

    async fn attempt(
        &self,
        credential: &str,
        request: &GenerateRequest,
    ) -> Result<String, AttemptError> {
        let text = self.transport.generate(credential, request).await?;
        if text.trim().is_empty() {
            return Err(AttemptError::EmptyResponse);
        }
        Ok(text)
    }
}
