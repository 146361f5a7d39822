// SPDX-FileCopyrightText: 2026 Matrix Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Forensic analysis report types.
//!
//! A report is produced once per detected address and attached to the
//! assistant message that answers it. Field names serialize in camelCase so
//! exported sessions keep the shape consumers of the web client expect.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Categorical risk level derived from a numeric score.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum RiskLevel {
    #[strum(serialize = "Safe")]
    #[serde(rename = "Safe")]
    Safe,
    #[strum(serialize = "Caution")]
    #[serde(rename = "Caution")]
    Caution,
    #[strum(serialize = "High Risk")]
    #[serde(rename = "High Risk")]
    HighRisk,
    #[strum(serialize = "Critical")]
    #[serde(rename = "Critical")]
    Critical,
}

impl RiskLevel {
    /// Maps a 0-100 score onto the fixed thresholds:
    /// `<= 50` Safe, `<= 75` Caution, `<= 90` High Risk, above that Critical.
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=50 => RiskLevel::Safe,
            51..=75 => RiskLevel::Caution,
            76..=90 => RiskLevel::HighRisk,
            _ => RiskLevel::Critical,
        }
    }
}

/// Severity tag used on graph nodes and key-address rows.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// Kind of entity a graph node stands for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NodeKind {
    Wallet,
    Contract,
    Mixer,
    Exchange,
}

/// A node of the fund-flow graph, positioned on a 0-100 canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub risk: Severity,
    pub x: u8,
    pub y: u8,
}

/// A directed edge between two graph nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
    pub amount: String,
    pub token: String,
}

/// Graph of nodes and directed links.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FlowGraph {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

/// One step of the reconstructed fund flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundsFlowStep {
    pub id: u32,
    pub stage: String,
    pub action: String,
    pub from: String,
    pub to: String,
    pub amount: String,
    pub details: String,
    pub timestamp: String,
}

/// A row of the key-address table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyAddress {
    pub role: String,
    pub address: String,
    pub tag: String,
    pub risk_level: Severity,
    pub note: String,
}

/// Attribution guess for the party behind the activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackerProfile {
    pub identity: String,
    pub location: String,
    pub fingerprints: Vec<String>,
}

/// A recent transaction touching the analyzed address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionSummary {
    pub hash: String,
    pub method: String,
    pub from: String,
    pub to: String,
    pub value: String,
    pub timestamp: String,
}

/// Synthetic forensic summary for one address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub address: String,
    /// Score in `0..=100`.
    pub risk_score: u8,
    pub risk_level: RiskLevel,
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    #[serde(rename = "volume24h")]
    pub volume_24h: String,
    pub executive_summary: String,
    pub attacker_profile: AttackerProfile,
    pub funds_flow: Vec<FundsFlowStep>,
    pub key_addresses: Vec<KeyAddress>,
    #[serde(rename = "graphData")]
    pub graph: FlowGraph,
    pub recent_transactions: Vec<TransactionSummary>,
}
