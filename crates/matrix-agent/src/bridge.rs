// SPDX-FileCopyrightText: 2026 Matrix Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! LLM bridge: one entry point over every registered provider.
//!
//! [`LlmBridge::complete`] is total. Transport failures, API errors,
//! timeouts and unregistered providers all resolve to [`FALLBACK_REPLY`], so
//! callers never render an error state for a chat turn.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use matrix_config::MatrixConfig;
use matrix_core::error::MatrixError;
use matrix_core::traits::ProviderAdapter;
use matrix_core::types::{InlineData, ModelProvider, ProviderMessage, ProviderRequest, Role};
use tracing::{debug, info, warn};

/// Reply used when the provider call fails for any reason.
pub const FALLBACK_REPLY: &str = "I encountered an error connecting to the Matrix node. Please check your API key or model availability.";

/// Reply used when the provider answers with no text.
pub const INCOMPLETE_REPLY: &str = "Analysis incomplete. Network error.";

/// Routes chat turns to the selected provider.
pub struct LlmBridge {
    providers: HashMap<ModelProvider, Arc<dyn ProviderAdapter>>,
    system_prompt: String,
    deepseek_model: String,
    temperature: f32,
    timeout: Duration,
}

impl LlmBridge {
    pub fn new(system_prompt: impl Into<String>, deepseek_model: impl Into<String>) -> Self {
        Self {
            providers: HashMap::new(),
            system_prompt: system_prompt.into(),
            deepseek_model: deepseek_model.into(),
            temperature: 0.7,
            timeout: Duration::from_secs(60),
        }
    }

    /// Builds an empty bridge from config, resolving the system prompt.
    ///
    /// Providers are registered separately so that a missing credential for
    /// one backend does not disable the others.
    pub async fn from_config(config: &MatrixConfig) -> Self {
        let system_prompt = load_system_prompt(
            &config.agent.name,
            &config.agent.system_prompt,
            &config.agent.system_prompt_file,
        )
        .await;
        Self::new(system_prompt, config.deepseek.model.clone())
            .with_temperature(config.chat.temperature)
            .with_timeout(Duration::from_secs(config.chat.request_timeout_secs))
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Registers the adapter serving `provider`, replacing any previous one.
    pub fn register(&mut self, provider: ModelProvider, adapter: Arc<dyn ProviderAdapter>) {
        info!(provider = %provider, adapter = adapter.name(), "provider registered");
        self.providers.insert(provider, adapter);
    }

    pub fn with_provider(
        mut self,
        provider: ModelProvider,
        adapter: Arc<dyn ProviderAdapter>,
    ) -> Self {
        self.register(provider, adapter);
        self
    }

    pub fn is_registered(&self, provider: ModelProvider) -> bool {
        self.providers.contains_key(&provider)
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Wire model name for `provider`.
    pub fn model_name(&self, provider: ModelProvider) -> String {
        match provider {
            ModelProvider::DeepSeek => self.deepseek_model.clone(),
            other => other.to_string(),
        }
    }

    /// Assembles the request: system instruction, history, current turn and
    /// inline data (multimodal providers only).
    pub fn build_request(
        &self,
        prompt: &str,
        history: &[ProviderMessage],
        attachment: Option<&InlineData>,
        provider: ModelProvider,
    ) -> ProviderRequest {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.extend_from_slice(history);
        messages.push(ProviderMessage {
            role: Role::User,
            text: prompt.to_string(),
        });

        let inline_data = match attachment {
            Some(data) if provider.is_multimodal() => Some(data.clone()),
            Some(data) => {
                debug!(
                    provider = %provider,
                    mime_type = %data.mime_type,
                    "provider is text-only, attachment not sent"
                );
                None
            }
            None => None,
        };

        ProviderRequest {
            model: self.model_name(provider),
            system_prompt: Some(self.system_prompt.clone()),
            messages,
            inline_data,
            temperature: self.temperature,
        }
    }

    /// Sends one turn and returns the raw reply text, surfacing every failure.
    pub async fn try_complete(
        &self,
        prompt: &str,
        history: &[ProviderMessage],
        attachment: Option<&InlineData>,
        provider: ModelProvider,
    ) -> Result<String, MatrixError> {
        let adapter = self
            .providers
            .get(&provider)
            .ok_or_else(|| MatrixError::AdapterNotFound {
                adapter_type: "provider".into(),
                name: provider.to_string(),
            })?;

        let request = self.build_request(prompt, history, attachment, provider);
        debug!(
            provider = %provider,
            model = %request.model,
            turns = request.messages.len(),
            inline = request.inline_data.is_some(),
            "sending completion request"
        );

        let response = tokio::time::timeout(self.timeout, adapter.complete(request))
            .await
            .map_err(|_| MatrixError::Timeout {
                duration: self.timeout,
            })??;
        Ok(response.content)
    }

    /// Sends one turn. Never fails: errors become [`FALLBACK_REPLY`] and an
    /// empty reply becomes [`INCOMPLETE_REPLY`].
    pub async fn complete(
        &self,
        prompt: &str,
        history: &[ProviderMessage],
        attachment: Option<&InlineData>,
        provider: ModelProvider,
    ) -> String {
        match self.try_complete(prompt, history, attachment, provider).await {
            Ok(text) if text.trim().is_empty() => INCOMPLETE_REPLY.to_string(),
            Ok(text) => text,
            Err(e) => {
                warn!(provider = %provider, error = %e, "completion failed, using fallback reply");
                FALLBACK_REPLY.to_string()
            }
        }
    }
}

fn default_system_prompt(agent_name: &str) -> String {
    format!(
        "You are \"{agent_name}\", a highly specialized blockchain forensics AI.\n\
         Your capabilities include: on-chain risk scoring, transaction tracing, and smart contract auditing.\n\
         You speak in a professional, concise, and technical tone.\n\
         If the user provides an Ethereum or Solana address, you simulate a deep analysis.\n\
         Always format addresses in monospace."
    )
}

/// Loads the system prompt following priority: file > inline > default.
pub async fn load_system_prompt(
    agent_name: &str,
    inline_prompt: &Option<String>,
    prompt_file: &Option<String>,
) -> String {
    if let Some(file_path) = prompt_file {
        match tokio::fs::read_to_string(file_path).await {
            Ok(content) => {
                let trimmed = content.trim();
                if !trimmed.is_empty() {
                    info!(path = %file_path, "loaded system prompt from file");
                    return trimmed.to_string();
                }
            }
            Err(e) => {
                warn!(
                    path = %file_path,
                    error = %e,
                    "failed to read system prompt file, falling back"
                );
            }
        }
    }

    if let Some(prompt) = inline_prompt.as_deref().filter(|p| !p.is_empty()) {
        return prompt.to_string();
    }

    default_system_prompt(agent_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history() -> Vec<ProviderMessage> {
        vec![
            ProviderMessage {
                role: Role::User,
                text: "hi".into(),
            },
            ProviderMessage {
                role: Role::Assistant,
                text: "hello".into(),
            },
        ]
    }

    fn png() -> InlineData {
        InlineData {
            mime_type: "image/png".into(),
            data: "AAAA".into(),
        }
    }

    #[test]
    fn request_appends_current_turn() {
        let bridge = LlmBridge::new("sys", "deepseek-chat");
        let req = bridge.build_request("next", &history(), None, ModelProvider::DeepSeek);
        assert_eq!(req.messages.len(), 3);
        assert_eq!(req.messages[2].role, Role::User);
        assert_eq!(req.messages[2].text, "next");
        assert_eq!(req.system_prompt.as_deref(), Some("sys"));
        assert_eq!(req.model, "deepseek-chat");
    }

    #[test]
    fn inline_data_only_for_multimodal() {
        let bridge = LlmBridge::new("sys", "deepseek-chat");
        let text_only = bridge.build_request("look", &[], Some(&png()), ModelProvider::DeepSeek);
        assert!(text_only.inline_data.is_none());

        let multimodal = bridge.build_request("look", &[], Some(&png()), ModelProvider::GeminiPro);
        assert_eq!(multimodal.inline_data, Some(png()));
        assert_eq!(multimodal.model, "gemini-1.5-pro");
    }

    #[test]
    fn temperature_is_carried() {
        let bridge = LlmBridge::new("sys", "m").with_temperature(0.2);
        let req = bridge.build_request("x", &[], None, ModelProvider::GeminiFlash);
        assert_eq!(req.temperature, 0.2);
    }

    #[tokio::test]
    async fn unregistered_provider_yields_fallback() {
        let bridge = LlmBridge::new("sys", "m");
        let err = bridge
            .try_complete("hi", &[], None, ModelProvider::GeminiFlash)
            .await
            .unwrap_err();
        assert!(matches!(err, MatrixError::AdapterNotFound { .. }));

        let reply = bridge
            .complete("hi", &history(), None, ModelProvider::GeminiFlash)
            .await;
        assert_eq!(reply, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn system_prompt_default_names_agent() {
        let prompt = load_system_prompt("Matrix Agent", &None, &None).await;
        assert!(prompt.starts_with("You are \"Matrix Agent\""));
        assert!(prompt.contains("monospace"));
    }

    #[tokio::test]
    async fn system_prompt_inline_overrides_default() {
        let prompt = load_system_prompt("x", &Some("Custom.".into()), &None).await;
        assert_eq!(prompt, "Custom.");
    }

    #[tokio::test]
    async fn system_prompt_file_overrides_inline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prompt.md");
        std::fs::write(&path, "  From file.\n").unwrap();
        let prompt = load_system_prompt(
            "x",
            &Some("Inline.".into()),
            &Some(path.to_string_lossy().into_owned()),
        )
        .await;
        assert_eq!(prompt, "From file.");
    }

    #[tokio::test]
    async fn missing_prompt_file_falls_back_to_inline() {
        let prompt = load_system_prompt(
            "x",
            &Some("Inline.".into()),
            &Some("/nonexistent/matrix/prompt.md".into()),
        )
        .await;
        assert_eq!(prompt, "Inline.");
    }
}
