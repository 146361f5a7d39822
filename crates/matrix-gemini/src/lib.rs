// SPDX-FileCopyrightText: 2026 Matrix Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gemini provider adapter for Matrix Agent.
//!
//! One [`GeminiProvider`] serves every Gemini model; the model name is taken
//! from each [`ProviderRequest`]. Inline attachment data rides on the final
//! user turn.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use matrix_config::MatrixConfig;
use matrix_core::error::MatrixError;
use matrix_core::traits::{PluginAdapter, ProviderAdapter};
use matrix_core::types::{AdapterType, HealthStatus, ProviderRequest, ProviderResponse, Role};
use tracing::{debug, info};

use crate::client::GeminiClient;
use crate::types::{Blob, Content, GenerateRequest, GenerationConfig, Part};

/// Gemini provider implementing [`ProviderAdapter`].
///
/// API key resolution order: config -> `GEMINI_API_KEY` env var -> error.
pub struct GeminiProvider {
    client: GeminiClient,
}

impl GeminiProvider {
    pub fn new(config: &MatrixConfig) -> Result<Self, MatrixError> {
        let api_key = resolve_api_key(&config.gemini.api_key)?;
        let client = GeminiClient::new(
            &api_key,
            &config.gemini.base_url,
            Duration::from_secs(config.chat.request_timeout_secs),
        )?;
        info!(base_url = config.gemini.base_url, "Gemini provider initialized");
        Ok(Self { client })
    }

    pub fn with_client(client: GeminiClient) -> Self {
        Self { client }
    }

    fn to_generate_request(request: &ProviderRequest) -> GenerateRequest {
        let mut contents: Vec<Content> = request
            .messages
            .iter()
            .map(|m| Content::text(Some(wire_role(m.role)), m.text.clone()))
            .collect();

        if let Some(data) = &request.inline_data {
            let blob = Part::Inline {
                inline_data: Blob {
                    mime_type: data.mime_type.clone(),
                    data: data.data.clone(),
                },
            };
            match contents.last_mut() {
                Some(last) if last.role.as_deref() == Some("user") => last.parts.push(blob),
                _ => contents.push(Content {
                    role: Some("user".into()),
                    parts: vec![blob],
                }),
            }
        }

        GenerateRequest {
            system_instruction: request
                .system_prompt
                .as_deref()
                .map(|s| Content::text(None, s)),
            contents,
            generation_config: GenerationConfig {
                temperature: request.temperature,
            },
        }
    }
}

fn wire_role(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "model",
    }
}

#[async_trait]
impl PluginAdapter for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, MatrixError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MatrixError> {
        debug!("Gemini provider shutting down");
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for GeminiProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, MatrixError> {
        let body = Self::to_generate_request(&request);
        let response = self.client.generate(&request.model, &body).await?;

        Ok(ProviderResponse {
            content: response.text(),
            id: response.response_id.clone().unwrap_or_default(),
            model: response.model_version.clone().unwrap_or(request.model),
        })
    }
}

fn resolve_api_key(config_key: &Option<String>) -> Result<String, MatrixError> {
    if let Some(key) = config_key.as_deref().filter(|k| !k.is_empty()) {
        return Ok(key.to_string());
    }

    std::env::var("GEMINI_API_KEY")
        .ok()
        .filter(|k| !k.is_empty())
        .ok_or_else(|| {
            MatrixError::Config(
                "Gemini API key not found. Set gemini.api_key in config or GEMINI_API_KEY environment variable.".into(),
            )
        })
}
