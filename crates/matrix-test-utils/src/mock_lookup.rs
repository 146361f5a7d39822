// SPDX-FileCopyrightText: 2026 Matrix Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed-answer network address lookup.

use async_trait::async_trait;

use matrix_core::{AdapterType, AddressLookup, HealthStatus, MatrixError, PluginAdapter};

/// Returns a fixed address, or fails every call.
pub struct StaticLookup {
    address: Option<String>,
}

impl StaticLookup {
    pub fn ok(address: impl Into<String>) -> Self {
        Self {
            address: Some(address.into()),
        }
    }

    pub fn failing() -> Self {
        Self { address: None }
    }
}

#[async_trait]
impl PluginAdapter for StaticLookup {
    fn name(&self) -> &str {
        "static-lookup"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Lookup
    }

    async fn health_check(&self) -> Result<HealthStatus, MatrixError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MatrixError> {
        Ok(())
    }
}

#[async_trait]
impl AddressLookup for StaticLookup {
    async fn lookup(&self) -> Result<String, MatrixError> {
        self.address.clone().ok_or_else(|| MatrixError::Provider {
            message: "address lookup unavailable".into(),
            source: None,
        })
    }
}
