// SPDX-FileCopyrightText: 2026 Matrix Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Matrix Agent.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use matrix_core::ModelProvider;
use serde::{Deserialize, Serialize};

/// Invite codes accepted when `gate.invite_codes` is not configured.
pub const DEFAULT_INVITE_CODES: [&str; 50] = [
    "MAT-88FC-36B0-2377", "MAT-2341-5E0E-3A07", "MAT-C290-3ED0-942C", "MAT-99F2-BE1B-E7AE",
    "MAT-D422-5AA6-EC2B", "MAT-145B-185C-BE1D", "MAT-17AD-F5B2-66D0", "MAT-B1CA-EB4A-1416",
    "MAT-EA08-1D81-E8EA", "MAT-A32D-A28F-596F", "MAT-4ADA-9B0A-CBD3", "MAT-27F4-A897-F9C1",
    "MAT-5372-89BB-E8BC", "MAT-6821-8CD0-E470", "MAT-AF10-6FF1-2827", "MAT-B073-A00E-599A",
    "MAT-377D-188A-92DC", "MAT-3DB0-1988-6FFA", "MAT-1D34-745C-1DF2", "MAT-5875-2E33-D017",
    "MAT-3F7E-005F-2D05", "MAT-D3F2-A0C8-94B1", "MAT-2994-A884-589D", "MAT-3A4C-FA58-B23D",
    "MAT-9A77-3D37-C267", "MAT-F462-B42E-C611", "MAT-2926-9324-9EA1", "MAT-E1C7-BAFE-73E6",
    "MAT-B8AD-3D50-310E", "MAT-F07F-AC80-4FF4", "MAT-7528-6233-A35F", "MAT-3C04-E6A4-FE3D",
    "MAT-22F8-C4B6-D54B", "MAT-F393-BD99-0963", "MAT-684D-1ECB-A90E", "MAT-46FC-40A7-9A65",
    "MAT-769B-F16E-68E9", "MAT-FDEF-0380-8259", "MAT-85A5-FC39-52A3", "MAT-E0ED-827A-BD2D",
    "MAT-3405-A11E-111C", "MAT-129C-1A22-E7C0", "MAT-E103-485F-128D", "MAT-E542-50C3-2302",
    "MAT-C9A6-BB67-E325", "MAT-B330-AD34-DC82", "MAT-B302-5217-7933", "MAT-C0B5-E5EA-BEBB",
    "MAT-5D7A-4A65-CD8F", "MAT-FCA6-EE60-28EB",
];

/// Top-level Matrix Agent configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MatrixConfig {
    /// Agent identity and behavior settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Chat-completions provider settings.
    #[serde(default)]
    pub deepseek: DeepSeekConfig,

    /// Multimodal provider settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Chat session behavior.
    #[serde(default)]
    pub chat: ChatConfig,

    /// Invite-code gate settings.
    #[serde(default)]
    pub gate: GateConfig,

    /// Disclaimer consent logging.
    #[serde(default)]
    pub consent: ConsentConfig,

    /// Local storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Agent identity and behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the agent.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Inline system prompt string. Overridden by `system_prompt_file` if both set.
    #[serde(default)]
    pub system_prompt: Option<String>,

    /// Path to a markdown file containing the system prompt.
    #[serde(default)]
    pub system_prompt_file: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
            system_prompt: None,
            system_prompt_file: None,
        }
    }
}

fn default_agent_name() -> String {
    "Matrix Agent".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Chat-completions provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DeepSeekConfig {
    /// API key. `None` falls back to the `DEEPSEEK_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the API, without the `/chat/completions` suffix.
    #[serde(default = "default_deepseek_base_url")]
    pub base_url: String,

    /// Model identifier sent with each request.
    #[serde(default = "default_deepseek_model")]
    pub model: String,
}

impl Default for DeepSeekConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_deepseek_base_url(),
            model: default_deepseek_model(),
        }
    }
}

fn default_deepseek_base_url() -> String {
    "https://api.deepseek.com/v1".to_string()
}

fn default_deepseek_model() -> String {
    "deepseek-chat".to_string()
}

/// Multimodal provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// API key. `None` falls back to the `GEMINI_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the API, without the `/models/...` suffix.
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_gemini_base_url(),
        }
    }
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

/// Chat session configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ChatConfig {
    /// Provider used until the user picks another one.
    #[serde(default)]
    pub default_provider: ModelProvider,

    /// Sampling temperature for every provider.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Simulated latency before an analysis report is produced.
    #[serde(default = "default_analysis_delay_ms")]
    pub analysis_delay_ms: u64,

    /// Upper bound for a single provider request.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Characters of the reply kept as the session preview.
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            default_provider: ModelProvider::default(),
            temperature: default_temperature(),
            analysis_delay_ms: default_analysis_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            preview_chars: default_preview_chars(),
        }
    }
}

fn default_temperature() -> f32 {
    0.7
}

fn default_analysis_delay_ms() -> u64 {
    1500
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_preview_chars() -> usize {
    40
}

/// Invite-code gate configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GateConfig {
    /// Accepted codes, in normalized `AAA-BBBB-CCCC-DDDD` form.
    #[serde(default = "default_invite_codes")]
    pub invite_codes: Vec<String>,

    /// Failed submissions allowed before the gate locks.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// How long a lock lasts. `0` keeps it until the process restarts.
    #[serde(default = "default_lockout_secs")]
    pub lockout_secs: u64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            invite_codes: default_invite_codes(),
            max_attempts: default_max_attempts(),
            lockout_secs: default_lockout_secs(),
        }
    }
}

fn default_invite_codes() -> Vec<String> {
    DEFAULT_INVITE_CODES.iter().map(|c| c.to_string()).collect()
}

fn default_max_attempts() -> u32 {
    5
}

fn default_lockout_secs() -> u64 {
    300
}

/// Disclaimer consent logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConsentConfig {
    /// Version of the agreement the user accepts.
    #[serde(default = "default_agreement_version")]
    pub agreement_version: String,

    /// Action tag written into each record.
    #[serde(default = "default_consent_action")]
    pub action: String,

    /// Endpoint returning `{"ip": "..."}`.
    #[serde(default = "default_ip_lookup_url")]
    pub ip_lookup_url: String,

    /// Timeout for the address lookup.
    #[serde(default = "default_lookup_timeout_secs")]
    pub lookup_timeout_secs: u64,
}

impl Default for ConsentConfig {
    fn default() -> Self {
        Self {
            agreement_version: default_agreement_version(),
            action: default_consent_action(),
            ip_lookup_url: default_ip_lookup_url(),
            lookup_timeout_secs: default_lookup_timeout_secs(),
        }
    }
}

fn default_agreement_version() -> String {
    "2026-01-13".to_string()
}

fn default_consent_action() -> String {
    "AGREE_TERMS_V1.0".to_string()
}

fn default_ip_lookup_url() -> String {
    "https://api.ipify.org?format=json".to_string()
}

fn default_lookup_timeout_secs() -> u64 {
    5
}

/// Local storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database holding durable local state.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("matrix").join("matrix.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("matrix.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}
