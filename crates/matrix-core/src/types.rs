// SPDX-FileCopyrightText: 2026 Matrix Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the gate, the chat store, and provider adapters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::report::AnalysisReport;

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Provider,
    Storage,
    Lookup,
}

/// Author of a chat message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Remote LLM backend selectable by the user.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
pub enum ModelProvider {
    /// Hosted chat-completions API (text only).
    #[default]
    #[strum(serialize = "deepseek")]
    #[serde(rename = "deepseek")]
    DeepSeek,
    /// Multimodal API, fast variant.
    #[strum(serialize = "gemini-1.5-flash")]
    #[serde(rename = "gemini-1.5-flash")]
    GeminiFlash,
    /// Multimodal API, large variant.
    #[strum(serialize = "gemini-1.5-pro")]
    #[serde(rename = "gemini-1.5-pro")]
    GeminiPro,
}

impl ModelProvider {
    /// Every selectable provider, in menu order.
    pub const ALL: [ModelProvider; 3] = [
        ModelProvider::DeepSeek,
        ModelProvider::GeminiFlash,
        ModelProvider::GeminiPro,
    ];

    /// Whether the provider accepts inline image data.
    pub fn is_multimodal(&self) -> bool {
        !matches!(self, ModelProvider::DeepSeek)
    }
}

/// Attachment metadata kept on a message for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentPreview {
    pub name: String,
    pub mime_type: String,
    /// `data:` URL of the attachment.
    pub preview: String,
}

/// Base64 payload sent inline to multimodal providers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

/// A single chat message. Immutable once appended to a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub text: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<AttachmentPreview>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisReport>,
}

impl Message {
    /// Builds a user message stamped with a fresh id and the current time.
    pub fn user(text: impl Into<String>, attachment: Option<AttachmentPreview>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role: Role::User,
            text: text.into(),
            created_at: Utc::now(),
            attachment,
            analysis: None,
        }
    }

    /// Builds an assistant reply, optionally carrying an analysis report.
    pub fn assistant(text: impl Into<String>, analysis: Option<AnalysisReport>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role: Role::Assistant,
            text: text.into(),
            created_at: Utc::now(),
            attachment: None,
            analysis,
        }
    }
}

/// One conversation thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: String,
    pub title: String,
    pub last_message: String,
    pub updated_at: DateTime<Utc>,
    pub messages: Vec<Message>,
}

/// A role-tagged text turn sent to a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderMessage {
    pub role: Role,
    pub text: String,
}

/// A completion request addressed to one provider adapter.
///
/// `messages` holds the prior history followed by the current user turn.
/// `inline_data` belongs to the current (last) turn.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    pub model: String,
    pub system_prompt: Option<String>,
    pub messages: Vec<ProviderMessage>,
    pub inline_data: Option<InlineData>,
    pub temperature: f32,
}

/// A completion response from a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    pub id: String,
    pub content: String,
    pub model: String,
}
