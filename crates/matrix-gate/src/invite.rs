// SPDX-FileCopyrightText: 2026 Matrix Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Invite-code gate with attempt counting and time-boxed lockout.
//!
//! The allow-list is a configured stand-in for a credential-issuance
//! service. It is not a security boundary.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use thiserror::Error;
use tracing::{info, warn};

use matrix_config::model::GateConfig;
use matrix_core::{KeyValueStore, MatrixError};
use matrix_storage::keys;

/// Length of a normalized code, hyphens included.
pub const CODE_LEN: usize = 18;

/// Alphanumeric characters kept by [`normalize_code`].
const MAX_SYMBOLS: usize = 15;

/// Stored lock deadline meaning "until the process restarts".
const LOCKED_FOREVER: &str = "forever";

/// Rejection reasons for an invite-code submission.
#[derive(Debug, Error)]
pub enum GateError {
    #[error("please enter an invite code")]
    EmptyInput,

    #[error("invite code must look like AAA-BBBB-CCCC-DDDD")]
    FormatError,

    #[error("invalid invite code, {remaining} attempt(s) remaining")]
    InvalidCode { remaining: u32 },

    /// `retry_after` is `None` when the lock lasts until restart.
    #[error("too many failed attempts, please try again later")]
    Locked {
        retry_after: Option<std::time::Duration>,
    },

    #[error("the disclaimer must be accepted first")]
    DisclaimerPending,

    #[error(transparent)]
    Storage(#[from] MatrixError),
}

/// Canonicalize raw keystrokes into `AAA-BBBB-CCCC-DDDD` form.
///
/// Uppercases, drops everything but ASCII letters and digits, keeps at most
/// 15 symbols and inserts hyphens after the 3rd, 7th and 11th. Partial input
/// yields a partial code. Idempotent.
pub fn normalize_code(raw: &str) -> String {
    let symbols: Vec<char> = raw
        .to_uppercase()
        .chars()
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        .take(MAX_SYMBOLS)
        .collect();

    let mut code = String::with_capacity(CODE_LEN);
    for (i, c) in symbols.iter().enumerate() {
        if matches!(i, 3 | 7 | 11) {
            code.push('-');
        }
        code.push(*c);
    }
    code
}

/// Invite-code validation state for one login screen.
///
/// The attempt counter and lock deadline live in the session store, so a
/// fresh gate built in the same process inherits them.
pub struct InviteGate {
    allow_list: HashSet<String>,
    max_attempts: u32,
    lockout: Option<TimeDelta>,
    session: Arc<dyn KeyValueStore>,
    input: String,
    last_error: Option<String>,
}

impl InviteGate {
    pub fn new(config: &GateConfig, session: Arc<dyn KeyValueStore>) -> Self {
        let lockout = if config.lockout_secs == 0 {
            None
        } else {
            i64::try_from(config.lockout_secs)
                .ok()
                .and_then(TimeDelta::try_seconds)
        };
        Self {
            allow_list: config.invite_codes.iter().cloned().collect(),
            max_attempts: config.max_attempts,
            lockout,
            session,
            input: String::new(),
            last_error: None,
        }
    }

    /// Replace the current input with the canonical form of `raw`.
    pub fn set_input(&mut self, raw: &str) -> &str {
        self.input = normalize_code(raw);
        self.last_error = None;
        &self.input
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Message of the most recent rejection, cleared on new input or success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Failed attempts recorded so far.
    pub async fn attempts(&self) -> Result<u32, MatrixError> {
        Ok(self
            .session
            .get(keys::GATE_ATTEMPTS)
            .await?
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(0))
    }

    /// Whether submissions are currently rejected.
    pub async fn is_locked(&self) -> Result<bool, MatrixError> {
        Ok(self.lock_state(Utc::now()).await?.is_some())
    }

    /// Submit the current input.
    pub async fn submit(&mut self) -> Result<String, GateError> {
        self.submit_at(Utc::now()).await
    }

    /// Submit the current input as of `now`.
    pub async fn submit_at(&mut self, now: DateTime<Utc>) -> Result<String, GateError> {
        let result = self.evaluate(now).await;
        self.last_error = result.as_ref().err().map(ToString::to_string);
        result
    }

    async fn evaluate(&self, now: DateTime<Utc>) -> Result<String, GateError> {
        if let Some(retry_after) = self.lock_state(now).await? {
            return Err(GateError::Locked { retry_after });
        }

        let code = self.input.trim();
        if code.is_empty() {
            return Err(GateError::EmptyInput);
        }

        if code.len() != CODE_LEN {
            self.record_failure(now).await?;
            return Err(GateError::FormatError);
        }

        if !self.allow_list.contains(code) {
            let attempts = self.record_failure(now).await?;
            return Err(GateError::InvalidCode {
                remaining: self.max_attempts.saturating_sub(attempts),
            });
        }

        self.session.set(keys::INVITE_CODE, code).await?;
        self.session.set(keys::LOGIN_TIME, &now.to_rfc3339()).await?;
        self.session.remove(keys::GATE_ATTEMPTS).await?;
        info!(code, timestamp = %now.to_rfc3339(), "invite code accepted");
        Ok(code.to_string())
    }

    /// `Some(retry_after)` while locked. An expired lock is cleared along
    /// with the attempt counter.
    async fn lock_state(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Option<Option<std::time::Duration>>, MatrixError> {
        let Some(raw) = self.session.get(keys::GATE_LOCKED_UNTIL).await? else {
            return Ok(None);
        };
        if raw == LOCKED_FOREVER {
            return Ok(Some(None));
        }

        match DateTime::parse_from_rfc3339(&raw) {
            Ok(until) => {
                let until = until.with_timezone(&Utc);
                if until > now {
                    return Ok(Some((until - now).to_std().ok()));
                }
                info!("invite gate lockout expired");
            }
            Err(e) => warn!(error = %e, value = %raw, "discarding unreadable lock deadline"),
        }

        self.session.remove(keys::GATE_LOCKED_UNTIL).await?;
        self.session.remove(keys::GATE_ATTEMPTS).await?;
        Ok(None)
    }

    /// Count one failure, engaging the lock at the limit. Returns the new count.
    async fn record_failure(&self, now: DateTime<Utc>) -> Result<u32, MatrixError> {
        let attempts = self.attempts().await?.saturating_add(1);
        self.session
            .set(keys::GATE_ATTEMPTS, &attempts.to_string())
            .await?;

        if attempts >= self.max_attempts {
            let deadline = self
                .lockout
                .and_then(|lockout| now.checked_add_signed(lockout))
                .map(|until| until.to_rfc3339())
                .unwrap_or_else(|| LOCKED_FOREVER.to_string());
            warn!(attempts, until = %deadline, "invite gate locked");
            self.session.set(keys::GATE_LOCKED_UNTIL, &deadline).await?;
        }
        Ok(attempts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matrix_storage::MemoryStore;
    use proptest::prelude::*;

    const VALID: &str = "MAT-88FC-36B0-2377";

    fn config(lockout_secs: u64) -> GateConfig {
        GateConfig {
            invite_codes: vec![VALID.to_string(), "MAT-2341-5E0E-3A07".to_string()],
            max_attempts: 5,
            lockout_secs,
        }
    }

    fn gate(lockout_secs: u64) -> (InviteGate, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (InviteGate::new(&config(lockout_secs), store.clone()), store)
    }

    #[test]
    fn normalize_groups_and_uppercases() {
        assert_eq!(normalize_code("mat88fc36b02377"), VALID);
        assert_eq!(normalize_code(" mat-88fc 36b0_2377 "), VALID);
        assert_eq!(normalize_code("ma"), "MA");
        assert_eq!(normalize_code("mat8"), "MAT-8");
        assert_eq!(normalize_code("mat88fc36b023779999"), VALID);
        assert_eq!(normalize_code("!!--"), "");
    }

    #[tokio::test]
    async fn accepts_valid_code_and_persists_it() {
        let (mut gate, store) = gate(300);
        gate.set_input("mat-88fc-36b0-2377");
        let code = gate.submit().await.unwrap();
        assert_eq!(code, VALID);
        assert_eq!(gate.last_error(), None);
        assert_eq!(
            store.get(keys::INVITE_CODE).await.unwrap().as_deref(),
            Some(VALID)
        );
        assert!(store.get(keys::LOGIN_TIME).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn empty_input_consumes_no_attempt() {
        let (mut gate, _) = gate(300);
        gate.set_input("   ");
        assert!(matches!(gate.submit().await, Err(GateError::EmptyInput)));
        assert_eq!(gate.attempts().await.unwrap(), 0);
        assert_eq!(gate.last_error(), Some("please enter an invite code"));
    }

    #[tokio::test]
    async fn short_code_is_format_error_and_counts() {
        let (mut gate, _) = gate(300);
        gate.set_input("MAT-88FC");
        assert!(matches!(gate.submit().await, Err(GateError::FormatError)));
        assert_eq!(gate.attempts().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn unknown_code_reports_remaining_attempts() {
        let (mut gate, _) = gate(300);
        gate.set_input("AAA-BBBB-CCCC-DDDD");
        match gate.submit().await {
            Err(GateError::InvalidCode { remaining }) => assert_eq!(remaining, 4),
            other => panic!("expected InvalidCode, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn lockout_takes_precedence_over_valid_code() {
        let (mut gate, _) = gate(300);
        for i in 0..5 {
            gate.set_input(&format!("AAA-BBBB-CCCC-DDD{i}"));
            assert!(gate.submit().await.is_err());
        }
        assert!(gate.is_locked().await.unwrap());

        gate.set_input(VALID);
        match gate.submit().await {
            Err(GateError::Locked { retry_after }) => {
                let secs = retry_after.expect("time-boxed lock").as_secs();
                assert!(secs <= 300 && secs >= 290, "got {secs}");
            }
            other => panic!("expected Locked, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn lockout_expires_and_resets_counter() {
        let (mut gate, _) = gate(300);
        let start = Utc::now();
        for _ in 0..5 {
            gate.set_input("AAA-BBBB-CCCC-DDDD");
            let _ = gate.submit_at(start).await;
        }

        gate.set_input(VALID);
        let during = start + TimeDelta::seconds(299);
        assert!(matches!(
            gate.submit_at(during).await,
            Err(GateError::Locked { .. })
        ));

        let after = start + TimeDelta::seconds(301);
        assert_eq!(gate.submit_at(after).await.unwrap(), VALID);
        assert_eq!(gate.attempts().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn zero_lockout_locks_until_restart() {
        let (mut gate, _) = gate(0);
        let start = Utc::now();
        for _ in 0..5 {
            gate.set_input("AAA-BBBB-CCCC-DDDD");
            let _ = gate.submit_at(start).await;
        }
        gate.set_input(VALID);
        let much_later = start + TimeDelta::days(365);
        assert!(matches!(
            gate.submit_at(much_later).await,
            Err(GateError::Locked { retry_after: None })
        ));
    }

    #[tokio::test]
    async fn new_gate_inherits_session_counter() {
        let store = Arc::new(MemoryStore::new());
        {
            let mut first = InviteGate::new(&config(300), store.clone());
            for _ in 0..3 {
                first.set_input("AAA-BBBB-CCCC-DDDD");
                let _ = first.submit().await;
            }
        }
        let second = InviteGate::new(&config(300), store);
        assert_eq!(second.attempts().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn set_input_clears_last_error() {
        let (mut gate, _) = gate(300);
        gate.set_input("MAT");
        let _ = gate.submit().await;
        assert!(gate.last_error().is_some());
        gate.set_input("MAT-8");
        assert_eq!(gate.last_error(), None);
    }

    proptest! {
        #[test]
        fn normalization_is_idempotent(raw in ".{0,40}") {
            let once = normalize_code(&raw);
            prop_assert_eq!(normalize_code(&once), once.clone());
            prop_assert!(once.len() <= CODE_LEN);
        }

        #[test]
        fn full_input_always_has_canonical_shape(raw in "[a-zA-Z0-9]{15,30}") {
            let code = normalize_code(&raw);
            prop_assert_eq!(code.len(), CODE_LEN);
            let groups: Vec<usize> = code.split('-').map(str::len).collect();
            prop_assert_eq!(groups, vec![3, 4, 4, 4]);
        }
    }
}
