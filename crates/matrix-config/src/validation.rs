// SPDX-FileCopyrightText: 2026 Matrix Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as non-empty paths, value ranges, and invite-code shape.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::MatrixConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &MatrixConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    let temperature = config.chat.temperature;
    if !(0.0..=2.0).contains(&temperature) {
        errors.push(ConfigError::Validation {
            message: format!("chat.temperature must be within 0.0..=2.0, got {temperature}"),
        });
    }

    if config.chat.request_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "chat.request_timeout_secs must be at least 1".to_string(),
        });
    }

    if config.gate.max_attempts == 0 {
        errors.push(ConfigError::Validation {
            message: "gate.max_attempts must be at least 1".to_string(),
        });
    }

    if config.gate.invite_codes.is_empty() {
        errors.push(ConfigError::Validation {
            message: "gate.invite_codes must list at least one code".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for (i, code) in config.gate.invite_codes.iter().enumerate() {
        if !is_canonical_code(code) {
            errors.push(ConfigError::Validation {
                message: format!(
                    "gate.invite_codes[{i}] `{code}` is not in AAA-BBBB-CCCC-DDDD form"
                ),
            });
        } else if !seen.insert(code.as_str()) {
            errors.push(ConfigError::Validation {
                message: format!("duplicate invite code `{code}` in gate.invite_codes"),
            });
        }
    }

    if config.consent.agreement_version.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "consent.agreement_version must not be empty".to_string(),
        });
    }

    if !config.consent.ip_lookup_url.starts_with("http://")
        && !config.consent.ip_lookup_url.starts_with("https://")
    {
        errors.push(ConfigError::Validation {
            message: format!(
                "consent.ip_lookup_url `{}` must be an http(s) URL",
                config.consent.ip_lookup_url
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Whether `code` is uppercase alphanumeric grouped 3-4-4-4 with hyphens.
fn is_canonical_code(code: &str) -> bool {
    let groups: Vec<&str> = code.split('-').collect();
    groups.len() == 4
        && groups
            .iter()
            .zip([3usize, 4, 4, 4])
            .all(|(group, len)| {
                group.len() == len
                    && group
                        .chars()
                        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
            })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = MatrixConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = MatrixConfig::default();
        config.storage.database_path = "".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("database_path"))));
    }

    #[test]
    fn out_of_range_temperature_fails_validation() {
        let mut config = MatrixConfig::default();
        config.chat.temperature = 3.5;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("temperature"))));
    }

    #[test]
    fn lowercase_invite_code_fails_validation() {
        let mut config = MatrixConfig::default();
        config.gate.invite_codes = vec!["mat-88fc-36b0-2377".to_string()];
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn duplicate_invite_code_fails_validation() {
        let mut config = MatrixConfig::default();
        config.gate.invite_codes = vec![
            "MAT-88FC-36B0-2377".to_string(),
            "MAT-88FC-36B0-2377".to_string(),
        ];
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("duplicate"))));
    }

    #[test]
    fn collects_every_error() {
        let mut config = MatrixConfig::default();
        config.gate.max_attempts = 0;
        config.consent.agreement_version = " ".to_string();
        config.consent.ip_lookup_url = "ftp://example.com".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn canonical_code_shape() {
        assert!(is_canonical_code("MAT-88FC-36B0-2377"));
        assert!(!is_canonical_code("MAT88FC36B02377"));
        assert!(!is_canonical_code("MATX-88FC-36B0-237"));
        assert!(!is_canonical_code("MAT-88FC-36B0-2377-"));
    }
}
