// SPDX-FileCopyrightText: 2026 Matrix Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Well-known storage keys.
//!
//! Local keys live in the durable store; session keys live in the
//! process-scoped store and vanish on restart.

/// Interface language preference (`en`, `zh`, `ja`).
pub const LANGUAGE: &str = "matrix_lang";
/// Theme preference (`system`, `light`, `dark`).
pub const THEME: &str = "matrix_theme";
/// Selected model provider.
pub const MODEL: &str = "matrix_model";
/// JSON array of consent records.
pub const CONSENT_LOGS: &str = "consent_logs";
/// `"true"` once the disclaimer was accepted.
pub const CONSENT_FLAG: &str = "user_agreed_terms_v1";
/// RFC 3339 time the disclaimer was accepted.
pub const CONSENT_TIMESTAMP: &str = "consent_timestamp";

/// Accepted invite code (session).
pub const INVITE_CODE: &str = "matrix_invite_code";
/// RFC 3339 login time (session).
pub const LOGIN_TIME: &str = "matrix_login_time";
/// Failed invite attempts so far (session).
pub const GATE_ATTEMPTS: &str = "matrix_gate_attempts";
/// RFC 3339 lock deadline, or `"forever"` (session).
pub const GATE_LOCKED_UNTIL: &str = "matrix_gate_locked_until";
