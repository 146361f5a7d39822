// SPDX-FileCopyrightText: 2026 Matrix Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Matrix Agent.
//!
//! This crate provides the trait definitions, error type, and domain types
//! shared by the gate, the analysis generator, the chat store, and the
//! provider adapters.

pub mod error;
pub mod report;
pub mod traits;
pub mod types;

pub use error::MatrixError;
pub use report::{AnalysisReport, RiskLevel};
pub use types::{
    AdapterType, AttachmentPreview, ChatSession, HealthStatus, InlineData, Message,
    ModelProvider, ProviderMessage, ProviderRequest, ProviderResponse, Role,
};

pub use traits::{AddressLookup, AnalysisEngine, KeyValueStore, PluginAdapter, ProviderAdapter};

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn matrix_error_variants_render() {
        let config = MatrixError::Config("missing key".into());
        assert_eq!(config.to_string(), "configuration error: missing key");

        let storage = MatrixError::storage(std::io::Error::other("disk full"));
        assert!(storage.to_string().contains("disk full"));

        let timeout = MatrixError::Timeout {
            duration: std::time::Duration::from_secs(30),
        };
        assert!(timeout.to_string().contains("30s"));

        let attachment = MatrixError::Attachment {
            path: "scan.png".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(attachment.to_string().contains("scan.png"));
    }

    #[test]
    fn model_provider_round_trips_through_strings() {
        for provider in ModelProvider::ALL {
            let s = provider.to_string();
            assert_eq!(ModelProvider::from_str(&s).unwrap(), provider);
            let json = serde_json::to_string(&provider).unwrap();
            assert_eq!(json, format!("\"{s}\""));
        }
        assert_eq!(ModelProvider::default(), ModelProvider::DeepSeek);
        assert!(ModelProvider::from_str("gpt-4").is_err());
    }

    #[test]
    fn only_gemini_variants_are_multimodal() {
        assert!(!ModelProvider::DeepSeek.is_multimodal());
        assert!(ModelProvider::GeminiFlash.is_multimodal());
        assert!(ModelProvider::GeminiPro.is_multimodal());
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), "\"assistant\"");
        assert_eq!(Role::User.to_string(), "user");
    }

    #[test]
    fn message_constructors_assign_distinct_ids() {
        let a = Message::user("hi", None);
        let b = Message::assistant("hello", None);
        assert_ne!(a.id, b.id);
        assert_eq!(a.role, Role::User);
        assert_eq!(b.role, Role::Assistant);
        assert!(b.analysis.is_none());
    }

    #[test]
    fn message_without_report_omits_analysis_field() {
        let msg = Message::assistant("hello", None);
        let value = serde_json::to_value(&msg).unwrap();
        assert!(value.get("analysis").is_none());
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn all_traits_are_exported() {
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_provider_adapter<T: ProviderAdapter>() {}
        fn _assert_key_value_store<T: KeyValueStore>() {}
        fn _assert_address_lookup<T: AddressLookup>() {}
        fn _assert_analysis_engine<T: AnalysisEngine>() {}
    }
}
