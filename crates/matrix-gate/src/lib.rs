// SPDX-FileCopyrightText: 2026 Matrix Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gated access for Matrix Agent.
//!
//! The [`access::AccessFlow`] walks a user through the disclaimer (recorded
//! by [`consent::ConsentLogger`]) and the invite-code check
//! ([`invite::InviteGate`]) before the chat application is built.

pub mod access;
pub mod consent;
pub mod invite;

pub use access::{AccessFlow, AccessStep};
pub use consent::{
    ConsentLog, ConsentLogger, EnvironmentSignals, HttpAddressLookup, UNKNOWN_ADDRESS, pseudo_id,
    stored_logs,
};
pub use invite::{CODE_LEN, GateError, InviteGate, normalize_code};
