// SPDX-FileCopyrightText: 2026 Matrix Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key/value store trait modelled on browser local and session storage.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::MatrixError;
use crate::traits::adapter::PluginAdapter;

/// A string-keyed, string-valued store.
///
/// Durable implementations back user preferences and consent logs; ephemeral
/// ones back per-process state such as the accepted invite code.
#[async_trait]
pub trait KeyValueStore: PluginAdapter {
    /// Prepares the backend (migrations, connection). Idempotent.
    async fn initialize(&self) -> Result<(), MatrixError>;

    /// Returns the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, MatrixError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), MatrixError>;

    /// Removes `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), MatrixError>;

    /// Lists all keys in lexical order.
    async fn keys(&self) -> Result<Vec<String>, MatrixError>;
}

/// Reads and deserializes a JSON value.
pub async fn get_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, MatrixError> {
    match store.get(key).await? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Serializes and stores a JSON value.
pub async fn set_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), MatrixError> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw).await
}
