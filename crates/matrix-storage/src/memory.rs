// SPDX-FileCopyrightText: 2026 Matrix Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory key/value store scoped to the running process.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use matrix_core::{AdapterType, HealthStatus, KeyValueStore, MatrixError, PluginAdapter};

/// Ephemeral store, the process analogue of browser tab storage.
///
/// Contents vanish when the process exits. Also used as the durable-store
/// stand-in in tests.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PluginAdapter for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, MatrixError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MatrixError> {
        self.entries.write().await.clear();
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn initialize(&self) -> Result<(), MatrixError> {
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, MatrixError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), MatrixError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), MatrixError> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>, MatrixError> {
        Ok(self.entries.read().await.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn basic_crud() {
        let store = MemoryStore::new();
        store.initialize().await.unwrap();
        assert_eq!(store.get("matrix_invite_code").await.unwrap(), None);

        store
            .set("matrix_invite_code", "MAT-88FC-36B0-2377")
            .await
            .unwrap();
        assert_eq!(
            store.get("matrix_invite_code").await.unwrap().as_deref(),
            Some("MAT-88FC-36B0-2377")
        );

        store.remove("matrix_invite_code").await.unwrap();
        assert!(store.keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn shutdown_clears_entries() {
        let store = MemoryStore::new();
        store.set("matrix_login_time", "now").await.unwrap();
        store.shutdown().await.unwrap();
        assert_eq!(store.get("matrix_login_time").await.unwrap(), None);
    }
}
