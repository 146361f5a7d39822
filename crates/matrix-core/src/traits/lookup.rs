// SPDX-FileCopyrightText: 2026 Matrix Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Network address lookup trait used to annotate consent records.

use async_trait::async_trait;

use crate::error::MatrixError;
use crate::traits::adapter::PluginAdapter;

/// Resolves the public network address of this client.
#[async_trait]
pub trait AddressLookup: PluginAdapter {
    /// Returns the address as reported by the lookup service.
    async fn lookup(&self) -> Result<String, MatrixError>;
}
