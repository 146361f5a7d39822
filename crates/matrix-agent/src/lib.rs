// SPDX-FileCopyrightText: 2026 Matrix Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat application core for Matrix Agent.
//!
//! [`store::ChatStore`] owns sessions and drives each exchange: it detects
//! addresses for the analysis engine and asks the [`bridge::LlmBridge`] for
//! the assistant reply, running both concurrently.

pub mod attachment;
pub mod bridge;
pub mod locale;
pub mod settings;
pub mod store;

pub use attachment::Attachment;
pub use bridge::{FALLBACK_REPLY, INCOMPLETE_REPLY, LlmBridge, load_system_prompt};
pub use locale::{Strings, strings};
pub use settings::{
    Language, Preferences, SettingsAction, SettingsError, SettingsState, ThemeMode, apply, is_dark,
};
pub use store::{ChatStore, SendOutcome, Tool, session_title, tool_prefix};
