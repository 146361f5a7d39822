// SPDX-FileCopyrightText: 2026 Matrix Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User preferences and the settings panel state.
//!
//! [`Preferences`] persist in the local store. [`SettingsState`] groups every
//! settings panel; transitions go through [`apply`], which returns a new state
//! or a [`SettingsError`] and never mutates its input.

use std::str::FromStr;

use matrix_core::error::MatrixError;
use matrix_core::traits::KeyValueStore;
use matrix_core::types::ModelProvider;
use matrix_storage::keys;
use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use thiserror::Error;
use tracing::{debug, warn};

/// Interface language.
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
    EnumIter,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Zh,
    Ja,
}

impl Language {
    /// Name of the language in itself.
    pub fn native_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Zh => "中文 (简体)",
            Language::Ja => "日本語",
        }
    }
}

/// Colour scheme selection.
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
    EnumIter,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ThemeMode {
    System,
    Light,
    #[default]
    Dark,
}

/// Whether `theme` renders dark given the host preference.
pub fn is_dark(theme: ThemeMode, system_prefers_dark: bool) -> bool {
    match theme {
        ThemeMode::System => system_prefers_dark,
        ThemeMode::Light => false,
        ThemeMode::Dark => true,
    }
}

/// Persisted preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Preferences {
    pub language: Language,
    pub theme: ThemeMode,
    pub model: ModelProvider,
}

impl Preferences {
    /// Loads preferences; missing or unrecognised values fall back to defaults.
    pub async fn load(store: &dyn KeyValueStore) -> Result<Self, MatrixError> {
        Ok(Self {
            language: read_or_default(store, keys::LANGUAGE).await?,
            theme: read_or_default(store, keys::THEME).await?,
            model: read_or_default(store, keys::MODEL).await?,
        })
    }

    pub async fn save(&self, store: &dyn KeyValueStore) -> Result<(), MatrixError> {
        store.set(keys::LANGUAGE, &self.language.to_string()).await?;
        store.set(keys::THEME, &self.theme.to_string()).await?;
        store.set(keys::MODEL, &self.model.to_string()).await?;
        debug!(
            language = %self.language,
            theme = %self.theme,
            model = %self.model,
            "preferences saved"
        );
        Ok(())
    }
}

async fn read_or_default<T>(store: &dyn KeyValueStore, key: &str) -> Result<T, MatrixError>
where
    T: FromStr + Default,
{
    let Some(raw) = store.get(key).await? else {
        return Ok(T::default());
    };
    match raw.parse() {
        Ok(value) => Ok(value),
        Err(_) => {
            warn!(key, value = %raw, "unrecognised stored preference, using default");
            Ok(T::default())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub plan: String,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: "Operator".into(),
            email: "operator@matrix.eth".into(),
            plan: "PRO".into(),
        }
    }
}

impl UserProfile {
    /// Two-letter avatar initials.
    pub fn initials(&self) -> String {
        self.name.chars().take(2).collect::<String>().to_uppercase()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKeyPanel {
    pub key: String,
    pub visible: bool,
    /// Set by the first regenerate request; the second one regenerates.
    pub confirm_pending: bool,
}

impl Default for ApiKeyPanel {
    fn default() -> Self {
        Self {
            key: "sk-mat-8837-x92-bc4-live".into(),
            visible: false,
            confirm_pending: false,
        }
    }
}

impl ApiKeyPanel {
    /// The key with everything but its prefix and suffix hidden.
    pub fn masked(&self) -> String {
        if self.visible {
            return self.key.clone();
        }
        let prefix: String = self.key.chars().take(7).collect();
        let suffix: String = {
            let tail: Vec<char> = self.key.chars().rev().take(4).collect();
            tail.into_iter().rev().collect()
        };
        format!("{prefix}••••••••{suffix}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityPanel {
    pub two_factor: bool,
}

impl Default for SecurityPanel {
    fn default() -> Self {
        Self { two_factor: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingPanel {
    pub card_last4: String,
}

impl Default for BillingPanel {
    fn default() -> Self {
        Self {
            card_last4: "4242".into(),
        }
    }
}

/// Every settings panel in one value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SettingsState {
    pub preferences: Preferences,
    pub profile: UserProfile,
    pub api_key: ApiKeyPanel,
    pub security: SecurityPanel,
    pub billing: BillingPanel,
}

impl SettingsState {
    pub fn with_preferences(preferences: Preferences) -> Self {
        Self {
            preferences,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsAction {
    SetLanguage(Language),
    SetTheme(ThemeMode),
    SetModel(ModelProvider),
    UpdateProfile { name: String, email: String },
    ToggleKeyVisibility,
    RegenerateKey,
    ToggleTwoFactor,
    UpdateCard { last4: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("Name and Email are required")]
    ProfileIncomplete,
    #[error("Invalid card digits")]
    InvalidCard,
}

/// Applies `action` to `state` using the thread RNG for key regeneration.
pub fn apply(
    state: &SettingsState,
    action: SettingsAction,
) -> Result<SettingsState, SettingsError> {
    apply_with(state, action, &mut rand::thread_rng())
}

/// Applies `action` to `state`, drawing any randomness from `rng`.
///
/// Any action other than [`SettingsAction::RegenerateKey`] disarms a pending
/// regeneration.
pub fn apply_with<R: Rng + ?Sized>(
    state: &SettingsState,
    action: SettingsAction,
    rng: &mut R,
) -> Result<SettingsState, SettingsError> {
    let mut next = state.clone();
    if action != SettingsAction::RegenerateKey {
        next.api_key.confirm_pending = false;
    }

    match action {
        SettingsAction::SetLanguage(language) => next.preferences.language = language,
        SettingsAction::SetTheme(theme) => next.preferences.theme = theme,
        SettingsAction::SetModel(model) => next.preferences.model = model,
        SettingsAction::UpdateProfile { name, email } => {
            if name.trim().is_empty() || email.trim().is_empty() {
                return Err(SettingsError::ProfileIncomplete);
            }
            next.profile.name = name;
            next.profile.email = email;
        }
        SettingsAction::ToggleKeyVisibility => next.api_key.visible = !next.api_key.visible,
        SettingsAction::RegenerateKey => {
            if next.api_key.confirm_pending {
                next.api_key.key = format!(
                    "sk-mat-{}-{}-live",
                    random_segment(rng),
                    random_segment(rng)
                );
                next.api_key.confirm_pending = false;
                next.api_key.visible = true;
            } else {
                next.api_key.confirm_pending = true;
            }
        }
        SettingsAction::ToggleTwoFactor => {
            next.security.two_factor = !next.security.two_factor;
        }
        SettingsAction::UpdateCard { last4 } => {
            if last4.len() != 4 || !last4.bytes().all(|b| b.is_ascii_digit()) {
                return Err(SettingsError::InvalidCard);
            }
            next.billing.card_last4 = last4;
        }
    }
    Ok(next)
}

/// Four lowercase base-36 characters.
fn random_segment<R: Rng + ?Sized>(rng: &mut R) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    (0..4)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}
