// SPDX-FileCopyrightText: 2026 Matrix Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Matrix Agent integration tests.
//!
//! Provides mock adapters and test harness infrastructure for fast,
//! deterministic tests without external services.
//!
//! # Components
//!
//! - [`MockProvider`] - LLM provider with queued responses that records requests
//! - [`FailingProvider`] - LLM provider that always errors
//! - [`StaticLookup`] - network address lookup with a fixed answer
//! - [`TestHarness`] - chat stack and access gate over temp storage

pub mod harness;
pub mod mock_lookup;
pub mod mock_provider;

pub use harness::{TEST_ADDRESS, TestHarness, test_signals};
pub use mock_lookup::StaticLookup;
pub use mock_provider::{DEFAULT_MOCK_RESPONSE, FailingProvider, MockProvider};
