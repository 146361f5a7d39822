// SPDX-FileCopyrightText: 2026 Matrix Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Disclaimer consent logging.
//!
//! Each acceptance appends a [`ConsentLog`] to the durable store as a local
//! compliance artifact. Logging never fails: a failed address lookup degrades
//! to `"unknown"` and a failed store write is only reported through tracing.
//! Remote delivery of records is not implemented.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Local, Offset, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use matrix_config::model::ConsentConfig;
use matrix_core::traits::storage::{get_json, set_json};
use matrix_core::{
    AdapterType, AddressLookup, HealthStatus, KeyValueStore, MatrixError, PluginAdapter,
};
use matrix_storage::keys;

/// Network address recorded when the lookup fails.
pub const UNKNOWN_ADDRESS: &str = "unknown";

/// One disclaimer acceptance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentLog {
    pub user_id: String,
    pub action: String,
    /// RFC 3339, UTC.
    pub timestamp: String,
    pub ip_address: String,
    pub user_agent: String,
    pub agreement_version: String,
}

/// Client signals hashed into the pseudo-identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentSignals {
    pub agent: String,
    pub language: String,
    pub screen_width: u32,
    pub screen_height: u32,
    /// Minutes to add to local time to get UTC (negative east of Greenwich).
    pub timezone_offset_minutes: i32,
}

impl EnvironmentSignals {
    /// Gather signals from the running process and terminal.
    pub fn detect() -> Self {
        let env_u32 = |name: &str| {
            std::env::var(name)
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(0)
        };
        let language = std::env::var("LC_ALL")
            .or_else(|_| std::env::var("LANG"))
            .map(|lang| lang.split('.').next().unwrap_or_default().replace('_', "-"))
            .unwrap_or_default();
        let east_of_utc_secs = Local::now().offset().fix().local_minus_utc();

        Self {
            agent: default_agent(),
            language,
            screen_width: env_u32("COLUMNS"),
            screen_height: env_u32("LINES"),
            timezone_offset_minutes: -east_of_utc_secs / 60,
        }
    }

    /// `agent|language|width|height|offset`.
    pub fn fingerprint(&self) -> String {
        format!(
            "{}|{}|{}|{}|{}",
            self.agent,
            self.language,
            self.screen_width,
            self.screen_height,
            self.timezone_offset_minutes
        )
    }
}

/// Agent string identifying this client build and platform.
pub fn default_agent() -> String {
    format!(
        "matrix-agent/{} ({}; {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

/// Derive `user_<hex>` from the signals with a 32-bit rolling hash over
/// UTF-16 code units. Not collision resistant.
pub fn pseudo_id(signals: &EnvironmentSignals) -> String {
    let hash = signals
        .fingerprint()
        .encode_utf16()
        .fold(0i32, |h, unit| {
            (h << 5).wrapping_sub(h).wrapping_add(i32::from(unit))
        });
    format!("user_{:x}", i64::from(hash).abs())
}

/// Records disclaimer acceptance into the durable store.
pub struct ConsentLogger {
    local: Arc<dyn KeyValueStore>,
    lookup: Arc<dyn AddressLookup>,
    signals: EnvironmentSignals,
    action: String,
    agreement_version: String,
}

impl ConsentLogger {
    pub fn new(
        config: &ConsentConfig,
        local: Arc<dyn KeyValueStore>,
        lookup: Arc<dyn AddressLookup>,
        signals: EnvironmentSignals,
    ) -> Self {
        Self {
            local,
            lookup,
            signals,
            action: config.action.clone(),
            agreement_version: config.agreement_version.clone(),
        }
    }

    /// Build a consent record and append it to the log.
    pub async fn log_consent(&self) -> ConsentLog {
        let ip_address = match self.lookup.lookup().await {
            Ok(ip) if !ip.trim().is_empty() => ip,
            Ok(_) => UNKNOWN_ADDRESS.to_string(),
            Err(e) => {
                debug!(error = %e, "network address lookup failed");
                UNKNOWN_ADDRESS.to_string()
            }
        };

        let log = ConsentLog {
            user_id: pseudo_id(&self.signals),
            action: self.action.clone(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            ip_address,
            user_agent: self.signals.agent.clone(),
            agreement_version: self.agreement_version.clone(),
        };

        if let Err(e) = self.append(&log).await {
            warn!(error = %e, "failed to persist consent log");
        }

        info!(
            user_id = %log.user_id,
            action = %log.action,
            ip_address = %log.ip_address,
            agreement_version = %log.agreement_version,
            "consent recorded"
        );
        log
    }

    /// Entries are kept as raw JSON so records from other schema versions
    /// survive the rewrite. A value that is not an array is moved to a
    /// backup key before a new array is started.
    async fn append(&self, log: &ConsentLog) -> Result<(), MatrixError> {
        let mut entries = match self.local.get(keys::CONSENT_LOGS).await? {
            None => Vec::new(),
            Some(raw) => match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    let backup = unreadable_key(Utc::now().timestamp_millis());
                    warn!(
                        error = %e,
                        backup = %backup,
                        "consent log is not a JSON array, moving it aside"
                    );
                    self.local.set(&backup, &raw).await?;
                    Vec::new()
                }
            },
        };
        entries.push(serde_json::to_value(log)?);
        set_json(self.local.as_ref(), keys::CONSENT_LOGS, &entries).await
    }

    /// Whether the disclaimer was accepted earlier.
    pub async fn has_consented(&self) -> Result<bool, MatrixError> {
        Ok(self.local.get(keys::CONSENT_FLAG).await?.as_deref() == Some("true"))
    }

    /// Set the consent flag and timestamp.
    pub async fn mark_consented(&self) -> Result<(), MatrixError> {
        self.local.set(keys::CONSENT_FLAG, "true").await?;
        self.local
            .set(
                keys::CONSENT_TIMESTAMP,
                &Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            )
            .await
    }

    /// Every readable record, oldest first.
    pub async fn all_logs(&self) -> Result<Vec<ConsentLog>, MatrixError> {
        stored_logs(self.local.as_ref()).await
    }
}

/// Backup key for a consent log value that could not be parsed.
fn unreadable_key(millis: i64) -> String {
    format!("{}_unreadable_{millis}", keys::CONSENT_LOGS)
}

/// Readable consent records in `store`, oldest first.
///
/// Entries that do not match [`ConsentLog`] are skipped with a warning and
/// left untouched in the store.
pub async fn stored_logs(store: &dyn KeyValueStore) -> Result<Vec<ConsentLog>, MatrixError> {
    let entries: Vec<serde_json::Value> = get_json(store, keys::CONSENT_LOGS)
        .await?
        .unwrap_or_default();
    let total = entries.len();
    let logs: Vec<ConsentLog> = entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect();
    if logs.len() < total {
        warn!(skipped = total - logs.len(), "consent log has unreadable entries");
    }
    Ok(logs)
}

#[derive(Deserialize)]
struct IpResponse {
    ip: Option<String>,
}

/// Public IP lookup over HTTP, expecting `{"ip": "..."}`.
pub struct HttpAddressLookup {
    client: reqwest::Client,
    url: String,
}

impl HttpAddressLookup {
    pub fn new(config: &ConsentConfig) -> Result<Self, MatrixError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.lookup_timeout_secs))
            .user_agent(default_agent())
            .build()
            .map_err(|e| MatrixError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self {
            client,
            url: config.ip_lookup_url.clone(),
        })
    }
}

#[async_trait]
impl PluginAdapter for HttpAddressLookup {
    fn name(&self) -> &str {
        "http-ip-lookup"
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
impl AddressLookup for HttpAddressLookup {
    async fn lookup(&self) -> Result<String, MatrixError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| MatrixError::Provider {
                message: format!("ip lookup failed: {e}"),
                source: Some(Box::new(e)),
            })?;
        let body: IpResponse = response.json().await.map_err(|e| MatrixError::Provider {
            message: format!("ip lookup returned malformed body: {e}"),
            source: Some(Box::new(e)),
        })?;
        Ok(body
            .ip
            .filter(|ip| !ip.is_empty())
            .unwrap_or_else(|| UNKNOWN_ADDRESS.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matrix_storage::MemoryStore;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn signals(agent: &str, language: &str, w: u32, h: u32, tz: i32) -> EnvironmentSignals {
        EnvironmentSignals {
            agent: agent.into(),
            language: language.into(),
            screen_width: w,
            screen_height: h,
            timezone_offset_minutes: tz,
        }
    }

    fn consent_config(url: String) -> ConsentConfig {
        ConsentConfig {
            ip_lookup_url: url,
            lookup_timeout_secs: 2,
            ..ConsentConfig::default()
        }
    }

    #[test]
    fn fingerprint_joins_with_pipes() {
        let s = signals("Mozilla/5.0", "zh-CN", 1440, 900, -480);
        assert_eq!(s.fingerprint(), "Mozilla/5.0|zh-CN|1440|900|-480");
    }

    #[test]
    fn pseudo_id_matches_rolling_hash() {
        assert_eq!(
            pseudo_id(&signals("Mozilla/5.0", "zh-CN", 1440, 900, -480)),
            "user_3607b797"
        );
        assert_eq!(
            pseudo_id(&signals(
                "matrix-agent/0.1.0 (linux; x86_64)",
                "en-US",
                1920,
                1080,
                -480
            )),
            "user_7113c32c"
        );
    }

    #[test]
    fn pseudo_id_is_stable() {
        let s = signals("agent", "ja-JP", 80, 24, 0);
        assert_eq!(pseudo_id(&s), pseudo_id(&s.clone()));
        assert!(pseudo_id(&s).starts_with("user_"));
    }

    #[test]
    fn detected_agent_names_platform() {
        let detected = EnvironmentSignals::detect();
        assert!(detected.agent.starts_with("matrix-agent/"));
        assert!(detected.agent.contains(std::env::consts::OS));
    }

    #[tokio::test]
    async fn http_lookup_parses_ip() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"ip": "203.0.113.7"})),
            )
            .mount(&server)
            .await;

        let lookup = HttpAddressLookup::new(&consent_config(server.uri())).unwrap();
        assert_eq!(lookup.lookup().await.unwrap(), "203.0.113.7");
    }

    #[tokio::test]
    async fn http_lookup_fails_on_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let lookup = HttpAddressLookup::new(&consent_config(server.uri())).unwrap();
        assert!(lookup.lookup().await.is_err());
    }

    #[tokio::test]
    async fn consent_survives_lookup_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let config = consent_config(server.uri());
        let store = Arc::new(MemoryStore::new());
        let logger = ConsentLogger::new(
            &config,
            store.clone(),
            Arc::new(HttpAddressLookup::new(&config).unwrap()),
            signals("agent", "en-US", 80, 24, 0),
        );

        let log = logger.log_consent().await;
        assert_eq!(log.ip_address, UNKNOWN_ADDRESS);
        assert_eq!(log.action, "AGREE_TERMS_V1.0");
        assert_eq!(log.agreement_version, "2026-01-13");
        assert_eq!(logger.all_logs().await.unwrap(), vec![log]);
    }

    #[tokio::test]
    async fn logs_append_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"ip": "198.51.100.2"})),
            )
            .mount(&server)
            .await;

        let config = consent_config(server.uri());
        let logger = ConsentLogger::new(
            &config,
            Arc::new(MemoryStore::new()),
            Arc::new(HttpAddressLookup::new(&config).unwrap()),
            signals("agent", "en-US", 80, 24, 0),
        );

        let first = logger.log_consent().await;
        let second = logger.log_consent().await;
        let logs = logger.all_logs().await.unwrap();
        assert_eq!(logs, vec![first, second]);
        assert!(logs.iter().all(|l| l.ip_address == "198.51.100.2"));
    }

    #[tokio::test]
    async fn consent_flag_round_trip() {
        let config = consent_config("http://127.0.0.1:9".into());
        let store = Arc::new(MemoryStore::new());
        let logger = ConsentLogger::new(
            &config,
            store.clone(),
            Arc::new(HttpAddressLookup::new(&config).unwrap()),
            signals("agent", "en-US", 80, 24, 0),
        );

        assert!(!logger.has_consented().await.unwrap());
        logger.mark_consented().await.unwrap();
        assert!(logger.has_consented().await.unwrap());
        assert!(store.get(keys::CONSENT_TIMESTAMP).await.unwrap().is_some());
    }

    fn offline_logger(store: Arc<dyn KeyValueStore>) -> ConsentLogger {
        let config = consent_config("http://127.0.0.1:9".into());
        ConsentLogger::new(
            &config,
            store,
            Arc::new(HttpAddressLookup::new(&config).unwrap()),
            signals("agent", "en-US", 80, 24, 0),
        )
    }

    #[tokio::test]
    async fn append_keeps_entries_of_another_schema() {
        let store = Arc::new(MemoryStore::new());
        let older = r#"[{"user_id":"user_1","action":"AGREE_TERMS_V0.9","timestamp":"2025-12-01T00:00:00.000Z","ip_address":"1.2.3.4","agreement_version":"2025-12-01"}]"#;
        store.set(keys::CONSENT_LOGS, older).await.unwrap();

        let logger = offline_logger(store.clone());
        let log = logger.log_consent().await;

        let raw = store.get(keys::CONSENT_LOGS).await.unwrap().unwrap();
        let entries: Vec<serde_json::Value> = serde_json::from_str(&raw).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["ip_address"], "1.2.3.4");
        assert!(entries[0].get("user_agent").is_none());
        assert_eq!(entries[1]["user_id"], log.user_id.as_str());

        assert_eq!(logger.all_logs().await.unwrap(), vec![log]);
    }

    #[tokio::test]
    async fn non_array_log_is_moved_aside() {
        let store = Arc::new(MemoryStore::new());
        store.set(keys::CONSENT_LOGS, "{broken").await.unwrap();

        let logger = offline_logger(store.clone());
        let log = logger.log_consent().await;
        assert_eq!(logger.all_logs().await.unwrap(), vec![log]);

        let prefix = format!("{}_unreadable_", keys::CONSENT_LOGS);
        let backups: Vec<String> = store
            .keys()
            .await
            .unwrap()
            .into_iter()
            .filter(|k| k.starts_with(&prefix))
            .collect();
        assert_eq!(backups.len(), 1);
        assert_eq!(
            store.get(&backups[0]).await.unwrap().as_deref(),
            Some("{broken")
        );
    }

    #[tokio::test]
    async fn consent_is_returned_when_store_fails() {
        let store = Arc::new(matrix_storage::SqliteStore::new(
            matrix_config::model::StorageConfig::default(),
        ));
        let logger = offline_logger(store);

        let log = logger.log_consent().await;
        assert_eq!(log.ip_address, UNKNOWN_ADDRESS);
        assert_eq!(log.action, "AGREE_TERMS_V1.0");
        assert!(logger.all_logs().await.is_err());
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn consent_is_emitted_as_info_event() {
        let config = consent_config("http://127.0.0.1:9".into());
        let logger = ConsentLogger::new(
            &config,
            Arc::new(MemoryStore::new()),
            Arc::new(HttpAddressLookup::new(&config).unwrap()),
            signals("agent", "en-US", 80, 24, 0),
        );

        logger.log_consent().await;
        assert!(logs_contain("consent recorded"));
        assert!(logs_contain("AGREE_TERMS_V1.0"));
    }
}
