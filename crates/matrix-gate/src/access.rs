// SPDX-FileCopyrightText: 2026 Matrix Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Access flow: disclaimer, then invite code, then the application.

use tracing::{info, warn};

use crate::consent::{ConsentLog, ConsentLogger};
use crate::invite::{GateError, InviteGate};

/// Where the user is in the access sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessStep {
    Disclaimer,
    Login,
    /// Access granted with the accepted invite code.
    App { invite_code: String },
}

/// Drives `Disclaimer -> Login -> App`. Steps never go backwards.
pub struct AccessFlow {
    step: AccessStep,
    consent: ConsentLogger,
    gate: InviteGate,
}

impl AccessFlow {
    pub fn new(consent: ConsentLogger, gate: InviteGate) -> Self {
        Self {
            step: AccessStep::Disclaimer,
            consent,
            gate,
        }
    }

    pub fn step(&self) -> &AccessStep {
        &self.step
    }

    pub fn gate(&self) -> &InviteGate {
        &self.gate
    }

    pub fn consent(&self) -> &ConsentLogger {
        &self.consent
    }

    /// Record consent and advance to the login step.
    ///
    /// Returns `None` when the disclaimer was already accepted.
    pub async fn accept_disclaimer(&mut self) -> Option<ConsentLog> {
        if self.step != AccessStep::Disclaimer {
            return None;
        }
        let log = self.consent.log_consent().await;
        if let Err(e) = self.consent.mark_consented().await {
            warn!(error = %e, "failed to persist consent flag");
        }
        self.step = AccessStep::Login;
        Some(log)
    }

    /// Submit `raw` to the invite gate; on success the flow reaches `App`.
    pub async fn login(&mut self, raw: &str) -> Result<String, GateError> {
        match &self.step {
            AccessStep::Disclaimer => Err(GateError::DisclaimerPending),
            AccessStep::App { invite_code } => Ok(invite_code.clone()),
            AccessStep::Login => {
                self.gate.set_input(raw);
                let code = self.gate.submit().await?;
                info!("access granted");
                self.step = AccessStep::App {
                    invite_code: code.clone(),
                };
                Ok(code)
            }
        }
    }

    /// Whether the application may be built.
    pub fn is_granted(&self) -> bool {
        matches!(self.step, AccessStep::App { .. })
    }
}
