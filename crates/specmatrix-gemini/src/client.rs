//! HTTP client for the Gemini `generateContent` endpoint.

// Latency in milliseconds fits in u64
#![allow(clippy::cast_possible_truncation)]

use crate::error::{GenerationError, Result};
use crate::model::ModelType;
use crate::prompt::{build_prompt, SYSTEM_INSTRUCTION};
use crate::response::{classify_api_error, interpret_response};
use crate::schema::response_schema;
use crate::wire::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part,
    SafetySetting, SAFETY_CATEGORIES,
};
use async_trait::async_trait;
use reqwest::Client;
use specmatrix_core::{FilePayload, MatrixConfig, MatrixData};
use std::time::Instant;
use tracing::{debug, info};

/// Public endpoint of the Generative Language API.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const TEMPERATURE: f64 = 0.2;

/// Everything needed for one generation call.
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    pub model: ModelType,
    /// Encoded source files in selection order
    pub files: Vec<FilePayload>,
    /// Requested distribution, stated in the prompt as fixed counts
    pub config: Option<MatrixConfig>,
    pub additional_instructions: String,
}

/// A successful generation.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub data: MatrixData,
    pub model: ModelType,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub latency_ms: u64,
}

/// Something that turns source files into a matrix.
///
/// Implemented by [`GeminiClient`]; tests and offline tools can provide
/// their own.
#[async_trait]
pub trait MatrixGenerator: Send + Sync {
    /// Run one generation request.
    ///
    /// # Errors
    ///
    /// Returns a [`GenerationError`] describing why no matrix was produced.
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationOutcome>;
}

/// Gemini API client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a client for the public endpoint.
    #[must_use = "creates Gemini client with API key"]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client for another endpoint, e.g. a proxy.
    #[must_use]
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into().trim().to_string(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, model: ModelType) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model.model_id())
    }

    /// Request body for `request`, without sending it.
    #[must_use]
    pub fn build_request(request: &GenerationRequest) -> GenerateContentRequest {
        let mut parts: Vec<Part> = request.files.iter().cloned().map(Part::inline).collect();
        parts.push(Part::text(build_prompt(
            request.config.as_ref(),
            &request.additional_instructions,
        )));

        GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part::text(SYSTEM_INSTRUCTION)],
            },
            contents: vec![Content {
                role: Some("user".to_string()),
                parts,
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: response_schema(),
                temperature: TEMPERATURE,
            },
            safety_settings: SAFETY_CATEGORIES
                .iter()
                .map(|category| SafetySetting {
                    category: (*category).to_string(),
                    threshold: "BLOCK_NONE".to_string(),
                })
                .collect(),
        }
    }
}

#[async_trait]
impl MatrixGenerator for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationOutcome> {
        if self.api_key.is_empty() {
            return Err(GenerationError::MissingApiKey);
        }
        if request.files.is_empty() {
            return Err(GenerationError::NoSourceFiles);
        }

        let start = Instant::now();
        let body = Self::build_request(request);
        info!(
            model = %request.model,
            files = request.files.len(),
            "sending generation request"
        );

        let response = self
            .client
            .post(self.endpoint(request.model))
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(classify_api_error(status.as_u16(), error_text));
        }

        let response: GenerateContentResponse = response.json().await?;
        let latency_ms = start.elapsed().as_millis() as u64;
        let usage = response.usage_metadata.unwrap_or_default();
        debug!(
            latency_ms,
            input_tokens = usage.prompt_token_count,
            output_tokens = usage.candidates_token_count,
            "generation response received"
        );

        let data = interpret_response(&response)?;
        info!(rows = data.rows.len(), latency_ms, "matrix generated");

        Ok(GenerationOutcome {
            data,
            model: request.model,
            input_tokens: usage.prompt_token_count,
            output_tokens: usage.candidates_token_count,
            latency_ms,
        })
    }
}
