// SPDX-FileCopyrightText: 2026 Matrix Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! Async adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod analysis;
pub mod lookup;
pub mod provider;
pub mod storage;

pub use adapter::PluginAdapter;
pub use analysis::AnalysisEngine;
pub use lookup::AddressLookup;
pub use provider::ProviderAdapter;
pub use storage::KeyValueStore;
