// SPDX-FileCopyrightText: 2026 Matrix Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles the chat stack and the access gate around mock
//! adapters, a temp SQLite local store and an in-memory session store.

use std::sync::Arc;

use matrix_agent::{ChatStore, LlmBridge};
use matrix_analysis::MockAnalysisEngine;
use matrix_config::MatrixConfig;
use matrix_config::model::StorageConfig;
use matrix_core::types::ModelProvider;
use matrix_core::{AddressLookup, KeyValueStore, MatrixError, ProviderAdapter};
use matrix_gate::{AccessFlow, ConsentLogger, EnvironmentSignals, InviteGate};
use matrix_storage::{MemoryStore, SqliteStore};

use crate::mock_lookup::StaticLookup;
use crate::mock_provider::MockProvider;

/// Address reported by the default lookup.
pub const TEST_ADDRESS: &str = "203.0.113.7";

/// Fixed signals so pseudo ids are stable across machines.
pub fn test_signals() -> EnvironmentSignals {
    EnvironmentSignals {
        agent: "matrix-agent/test".into(),
        language: "en-US".into(),
        screen_width: 1920,
        screen_height: 1080,
        timezone_offset_minutes: 0,
    }
}

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    responses: Vec<String>,
    system_prompt: Option<String>,
    analysis_seed: u64,
    lookup: Option<Arc<dyn AddressLookup>>,
    provider: Option<Arc<dyn ProviderAdapter>>,
    config: MatrixConfig,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            responses: Vec::new(),
            system_prompt: None,
            analysis_seed: 42,
            lookup: None,
            provider: None,
            config: MatrixConfig::default(),
        }
    }

    /// Set mock provider responses.
    pub fn with_mock_responses(mut self, responses: Vec<String>) -> Self {
        self.responses = responses;
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_analysis_seed(mut self, seed: u64) -> Self {
        self.analysis_seed = seed;
        self
    }

    pub fn with_lookup(mut self, lookup: Arc<dyn AddressLookup>) -> Self {
        self.lookup = Some(lookup);
        self
    }

    /// Serve every model from `provider` instead of the recording mock.
    pub fn with_provider(mut self, provider: Arc<dyn ProviderAdapter>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Adjust the configuration before the stack is built.
    pub fn with_config(mut self, edit: impl FnOnce(&mut MatrixConfig)) -> Self {
        edit(&mut self.config);
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(self) -> Result<TestHarness, MatrixError> {
        let temp_dir = tempfile::TempDir::new().map_err(MatrixError::storage)?;
        let db_path = temp_dir.path().join("matrix-test.db");

        let mut config = self.config;
        config.storage = StorageConfig {
            database_path: db_path.to_string_lossy().into_owned(),
            wal_mode: true,
        };
        config.chat.analysis_delay_ms = 0;
        if let Some(prompt) = self.system_prompt {
            config.agent.system_prompt = Some(prompt);
        }

        let local = SqliteStore::new(config.storage.clone());
        local.initialize().await?;
        let local: Arc<dyn KeyValueStore> = Arc::new(local);
        let session: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());

        let mock_provider = Arc::new(MockProvider::with_responses(self.responses));
        let provider: Arc<dyn ProviderAdapter> = match self.provider {
            Some(p) => p,
            None => mock_provider.clone() as Arc<dyn ProviderAdapter>,
        };
        let mut bridge = LlmBridge::from_config(&config).await;
        for model in ModelProvider::ALL {
            bridge.register(model, provider.clone());
        }
        let bridge = Arc::new(bridge);

        let chat = ChatStore::new(
            bridge.clone(),
            Arc::new(MockAnalysisEngine::seeded(self.analysis_seed)),
            &config.chat,
        );

        let lookup = self
            .lookup
            .unwrap_or_else(|| Arc::new(StaticLookup::ok(TEST_ADDRESS)) as Arc<dyn AddressLookup>);

        Ok(TestHarness {
            mock_provider,
            bridge,
            chat,
            local,
            session,
            lookup,
            config,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment with mock adapters and temp storage.
pub struct TestHarness {
    /// The recording provider (unused when a custom provider was supplied).
    pub mock_provider: Arc<MockProvider>,
    pub bridge: Arc<LlmBridge>,
    pub chat: ChatStore,
    /// Durable store (temp SQLite, removed on drop).
    pub local: Arc<dyn KeyValueStore>,
    /// Process-scoped store.
    pub session: Arc<dyn KeyValueStore>,
    pub lookup: Arc<dyn AddressLookup>,
    pub config: MatrixConfig,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// A fresh gate over the harness session store.
    pub fn invite_gate(&self) -> InviteGate {
        InviteGate::new(&self.config.gate, self.session.clone())
    }

    pub fn consent_logger(&self) -> ConsentLogger {
        ConsentLogger::new(
            &self.config.consent,
            self.local.clone(),
            self.lookup.clone(),
            test_signals(),
        )
    }

    pub fn access_flow(&self) -> AccessFlow {
        AccessFlow::new(self.consent_logger(), self.invite_gate())
    }
}
