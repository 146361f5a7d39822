// SPDX-FileCopyrightText: 2026 Matrix Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./matrix.toml` > `~/.config/matrix/matrix.toml` > `/etc/matrix/matrix.toml`
//! with environment variable overrides via `MATRIX_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::MatrixConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/matrix/matrix.toml` (system-wide)
/// 3. `~/.config/matrix/matrix.toml` (user XDG config)
/// 4. `./matrix.toml` (local directory)
/// 5. `MATRIX_*` environment variables
pub fn load_config() -> Result<MatrixConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<MatrixConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MatrixConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<MatrixConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MatrixConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(MatrixConfig::default()))
        .merge(Toml::file("/etc/matrix/matrix.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("matrix/matrix.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("matrix.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` so underscore-containing key
/// names survive: `MATRIX_CHAT_ANALYSIS_DELAY_MS` maps to `chat.analysis_delay_ms`.
fn env_provider() -> Env {
    Env::prefixed("MATRIX_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        map_env_key(key.as_str()).into()
    })
}

/// Maps a prefix-stripped, lowercased env key onto its dotted config path.
fn map_env_key(key: &str) -> String {
    const SECTIONS: [&str; 7] = [
        "agent", "deepseek", "gemini", "chat", "gate", "consent", "storage",
    ];
    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_to_sections() {
        assert_eq!(map_env_key("deepseek_api_key"), "deepseek.api_key");
        assert_eq!(
            map_env_key("chat_analysis_delay_ms"),
            "chat.analysis_delay_ms"
        );
        assert_eq!(map_env_key("gate_lockout_secs"), "gate.lockout_secs");
        assert_eq!(map_env_key("unrelated"), "unrelated");
    }

    #[test]
    fn toml_overrides_defaults() {
        let config = load_config_from_str("[chat]\nanalysis_delay_ms = 0\n").unwrap();
        assert_eq!(config.chat.analysis_delay_ms, 0);
        assert_eq!(config.chat.request_timeout_secs, 60);
    }
}
