// SPDX-FileCopyrightText: 2026 Matrix Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! DeepSeek provider adapter for Matrix Agent.
//!
//! Implements [`ProviderAdapter`] over the OpenAI-compatible chat-completions
//! endpoint. The backend is text only: inline attachment data is dropped.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use matrix_config::MatrixConfig;
use matrix_core::error::MatrixError;
use matrix_core::traits::{PluginAdapter, ProviderAdapter};
use matrix_core::types::{AdapterType, HealthStatus, ProviderRequest, ProviderResponse};
use tracing::{debug, info};

use crate::client::DeepSeekClient;
use crate::types::{ChatMessage, ChatRequest};

/// DeepSeek provider implementing [`ProviderAdapter`].
///
/// API key resolution order: config -> `DEEPSEEK_API_KEY` env var -> error.
pub struct DeepSeekProvider {
    client: DeepSeekClient,
}

impl DeepSeekProvider {
    /// Creates a new DeepSeek provider from the given configuration.
    pub fn new(config: &MatrixConfig) -> Result<Self, MatrixError> {
        let api_key = resolve_api_key(&config.deepseek.api_key)?;
        let client = DeepSeekClient::new(
            &api_key,
            &config.deepseek.base_url,
            Duration::from_secs(config.chat.request_timeout_secs),
        )?;

        info!(
            model = config.deepseek.model,
            "DeepSeek provider initialized"
        );
        Ok(Self { client })
    }

    /// Creates a provider around an existing client.
    pub fn with_client(client: DeepSeekClient) -> Self {
        Self { client }
    }

    fn to_chat_request(request: &ProviderRequest) -> ChatRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if let Some(system) = request.system_prompt.as_deref() {
            messages.push(ChatMessage {
                role: "system".into(),
                content: system.to_string(),
            });
        }
        messages.extend(request.messages.iter().map(|m| ChatMessage {
            role: m.role.to_string(),
            content: m.text.clone(),
        }));

        ChatRequest {
            model: request.model.clone(),
            messages,
            temperature: request.temperature,
        }
    }
}

#[async_trait]
impl PluginAdapter for DeepSeekProvider {
    fn name(&self) -> &str {
        "deepseek"
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
        debug!("DeepSeek provider shutting down");
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for DeepSeekProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, MatrixError> {
        if let Some(data) = &request.inline_data {
            debug!(mime_type = %data.mime_type, "text-only backend, dropping inline data");
        }
        let chat_request = Self::to_chat_request(&request);
        let response = self.client.complete(&chat_request).await?;

        Ok(ProviderResponse {
            content: response.first_content(),
            id: response.id.unwrap_or_default(),
            model: response.model.unwrap_or(request.model),
        })
    }
}

/// Resolves the API key from config or the `DEEPSEEK_API_KEY` environment variable.
fn resolve_api_key(config_key: &Option<String>) -> Result<String, MatrixError> {
    if let Some(key) = config_key.as_deref().filter(|k| !k.is_empty()) {
        return Ok(key.to_string());
    }

    std::env::var("DEEPSEEK_API_KEY")
        .ok()
        .filter(|k| !k.is_empty())
        .ok_or_else(|| {
            MatrixError::Config(
                "DeepSeek API key not found. Set deepseek.api_key in config or DEEPSEEK_API_KEY environment variable.".into(),
            )
        })
}
