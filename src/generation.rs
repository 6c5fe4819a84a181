//! Prompt-to-image generation against the external collaborator.
//!
//! The collaborator is any service implementing [`GenerationBackend`]:
//! prompt + aspect ratio in, a data-URI raster out. The production
//! implementation is [`GeminiBackend`], a `reqwest` client for the
//! `generateContent` endpoint. Tests drive the session with a stub.
//!
//! Failure taxonomy (all user-visible, none fatal):
//! - [`GenerationError::EmptyPrompt`] — rejected before any network call;
//! - [`GenerationError::Http`] — transport failure;
//! - [`GenerationError::Api`] — the service answered with an error status;
//! - [`GenerationError::NoImagePayload`] — a successful response carrying
//!   no inline image. Logically distinct from a transport failure even
//!   though both surface the same way to the user.
//!
//! A missing API key is a configuration error
//! ([`ConfigError::MissingApiKey`](crate::config::ConfigError)), raised
//! when the backend is constructed — before any generation is attempted.

use crate::asset::{Asset, AssetId, AspectRatio};
use crate::config::{Config, ConfigError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("prompt must not be empty")]
    EmptyPrompt,
    #[error("request to the image service failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("image service returned status {status}: {message}")]
    Api { status: u16, message: String },
    #[error("image service response contained no image payload")]
    NoImagePayload,
}

/// A successfully generated raster, as a data URI. Guaranteed non-empty
/// by every backend; the session re-checks before building an asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub data_uri: String,
}

/// The external generation collaborator.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate_image(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<GeneratedImage, GenerationError>;
}

/// Reject empty and whitespace-only prompts before any external call.
/// Returns the trimmed prompt on success.
pub fn validate_prompt(prompt: &str) -> Result<&str, GenerationError> {
    let trimmed = prompt.trim();
    if trimmed.is_empty() {
        return Err(GenerationError::EmptyPrompt);
    }
    Ok(trimmed)
}

/// Build a fresh asset from a generation result. Id and timestamp are
/// minted here; the history takes ownership afterwards.
pub fn build_asset(prompt: &str, aspect_ratio: AspectRatio, image: GeneratedImage) -> Asset {
    Asset {
        id: AssetId::generate(),
        image_data: image.data_uri,
        prompt: prompt.to_string(),
        created_at: chrono::Utc::now(),
        aspect_ratio,
    }
}

// =============================================================================
// Gemini backend
// =============================================================================

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: [RequestContent<'a>; 1],
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: [TextPart<'a>; 1],
}

#[derive(Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseModalities")]
    response_modalities: [&'static str; 2],
    #[serde(rename = "imageConfig")]
    image_config: ImageConfig,
}

#[derive(Serialize)]
struct ImageConfig {
    #[serde(rename = "aspectRatio")]
    aspect_ratio: &'static str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(rename = "inlineData", default)]
    inline_data: Option<InlineData>,
}

#[derive(Deserialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

/// `reqwest` client for a Gemini-style `generateContent` endpoint.
pub struct GeminiBackend {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiBackend {
    /// Fails with [`ConfigError::MissingApiKey`] when no credential is
    /// configured — surfaced before any generation is attempted.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            http: reqwest::Client::new(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.require_api_key()?.to_string(),
        })
    }

    /// Pull the first inline image out of a response, as a data URI.
    fn extract_image(response: GenerateContentResponse) -> Result<GeneratedImage, GenerationError> {
        response
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .find_map(|p| p.inline_data)
            .filter(|inline| !inline.data.is_empty())
            .map(|inline| GeneratedImage {
                data_uri: format!("data:{};base64,{}", inline.mime_type, inline.data),
            })
            .ok_or(GenerationError::NoImagePayload)
    }
}

#[async_trait]
impl GenerationBackend for GeminiBackend {
    async fn generate_image(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<GeneratedImage, GenerationError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint, self.model
        );
        let request = GenerateContentRequest {
            contents: [RequestContent {
                parts: [TextPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_modalities: ["TEXT", "IMAGE"],
                image_config: ImageConfig {
                    aspect_ratio: aspect_ratio.as_str(),
                },
            },
        };

        tracing::debug!(model = %self.model, aspect_ratio = %aspect_ratio, "requesting image generation");
        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateContentResponse = response.json().await?;
        Self::extract_image(body)
    }
}
