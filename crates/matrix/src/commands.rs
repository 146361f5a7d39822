// SPDX-FileCopyrightText: 2026 Matrix Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot subcommands: `matrix analyze` and `matrix consent`.

use std::io::IsTerminal;
use std::sync::Arc;

use matrix_analysis::{MockAnalysisEngine, first_address};
use matrix_config::model::MatrixConfig;
use matrix_core::{AnalysisEngine, KeyValueStore, MatrixError, PluginAdapter};
use matrix_gate::stored_logs;
use matrix_storage::SqliteStore;
use tracing::warn;

use crate::render;

/// Opens and migrates the durable local store.
pub async fn open_local_store(
    config: &MatrixConfig,
) -> Result<Arc<dyn KeyValueStore>, MatrixError> {
    let store = SqliteStore::new(config.storage.clone());
    store.initialize().await?;
    Ok(Arc::new(store))
}

/// Run the `matrix analyze` command.
///
/// Input that does not look like an address is still analyzed, with a
/// warning.
pub fn run_analyze(input: &str, json: bool) -> Result<(), MatrixError> {
    let input = input.trim();
    let address = match first_address(input) {
        Some(address) => address,
        None => {
            warn!(input, "input is not a recognized address");
            input
        }
    };

    let report = MockAnalysisEngine::new().generate(address);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let use_color = std::io::stdout().is_terminal();
        print!("{}", render::render_report(&report, use_color));
    }
    Ok(())
}

/// Run the `matrix consent` command.
pub async fn run_consent(config: &MatrixConfig, json: bool) -> Result<(), MatrixError> {
    let local = open_local_store(config).await?;
    let logs = stored_logs(local.as_ref()).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&logs)?);
    } else {
        print!("{}", render::render_consent_logs(&logs));
    }
    local.shutdown().await
}
