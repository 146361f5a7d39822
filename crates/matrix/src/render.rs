// SPDX-FileCopyrightText: 2026 Matrix Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plain-text rendering of reports, sessions and consent records.

use std::fmt::Write as _;

use colored::{Color, Colorize};
use matrix_core::types::ChatSession;
use matrix_core::{AnalysisReport, RiskLevel};
use matrix_gate::ConsentLog;

/// Terminal color for a risk level.
fn risk_color(level: RiskLevel) -> Color {
    match level {
        RiskLevel::Safe => Color::Green,
        RiskLevel::Caution => Color::Yellow,
        RiskLevel::HighRisk => Color::Red,
        RiskLevel::Critical => Color::BrightRed,
    }
}

fn paint(text: &str, color: Color, use_color: bool) -> String {
    if use_color {
        text.color(color).bold().to_string()
    } else {
        text.to_string()
    }
}

/// Shorten long addresses to `head...tail`.
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 14 {
        return address.to_string();
    }
    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

/// Multi-line summary of an analysis report.
pub fn render_report(report: &AnalysisReport, use_color: bool) -> String {
    let mut out = String::new();
    let level = format!("{}/100 ({})", report.risk_score, report.risk_level);

    let _ = writeln!(out, "  {}", "-".repeat(40));
    let _ = writeln!(
        out,
        "  Risk:     {}",
        paint(&level, risk_color(report.risk_level), use_color)
    );
    let _ = writeln!(out, "  Address:  {}", report.address);
    if let Some(entity) = &report.entity {
        let _ = writeln!(out, "  Entity:   {entity}");
    }
    if !report.labels.is_empty() {
        let _ = writeln!(out, "  Labels:   {}", report.labels.join(", "));
    }
    let _ = writeln!(out, "  24h vol:  {}", report.volume_24h);
    let _ = writeln!(out);
    let _ = writeln!(out, "  {}", report.executive_summary);

    let profile = &report.attacker_profile;
    let _ = writeln!(out);
    let _ = writeln!(out, "  Attribution: {} ({})", profile.identity, profile.location);
    for fingerprint in &profile.fingerprints {
        let _ = writeln!(out, "    - {fingerprint}");
    }

    if !report.funds_flow.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "  Funds flow:");
        for step in &report.funds_flow {
            let _ = writeln!(
                out,
                "    {}. [{}] {} {} -> {} {}",
                step.id,
                step.stage,
                step.action,
                short_address(&step.from),
                short_address(&step.to),
                step.amount
            );
        }
    }

    if !report.key_addresses.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "  Key addresses:");
        for key in &report.key_addresses {
            let _ = writeln!(
                out,
                "    {:<12} {:<16} {} ({})",
                key.role,
                short_address(&key.address),
                key.tag,
                key.risk_level
            );
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "  Graph: {} nodes, {} links",
        report.graph.nodes.len(),
        report.graph.links.len()
    );

    if !report.recent_transactions.is_empty() {
        let _ = writeln!(out, "  Recent transactions:");
        for tx in &report.recent_transactions {
            let _ = writeln!(
                out,
                "    {} {:<10} {:<14} {}",
                short_address(&tx.hash),
                tx.method,
                tx.value,
                tx.timestamp
            );
        }
    }
    let _ = writeln!(out, "  {}", "-".repeat(40));
    out
}

/// Numbered session list, most recent first.
pub fn render_sessions(sessions: &[ChatSession], active: Option<&str>) -> String {
    let mut out = String::new();
    for (i, session) in sessions.iter().enumerate() {
        let marker = if active == Some(session.id.as_str()) {
            "*"
        } else {
            " "
        };
        let _ = writeln!(
            out,
            "{marker} {:>2}. {}  {}  {}",
            i + 1,
            session.title,
            session.updated_at.format("%Y-%m-%d %H:%M"),
            session.last_message
        );
    }
    out
}

pub fn render_consent_logs(logs: &[ConsentLog]) -> String {
    if logs.is_empty() {
        return "no consent records\n".to_string();
    }
    let mut out = String::new();
    for log in logs {
        let _ = writeln!(
            out,
            "{}  {}  {}  {}  v{}",
            log.timestamp, log.user_id, log.ip_address, log.action, log.agreement_version
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use matrix_analysis::generate_report;
    use matrix_core::types::Message;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn report() -> AnalysisReport {
        let mut rng = StdRng::seed_from_u64(7);
        generate_report(&mut rng, "0x1111111111111111111111111111111111111111")
    }

    #[test]
    fn short_address_keeps_short_values() {
        assert_eq!(short_address("0xabc"), "0xabc");
        assert_eq!(
            short_address("0x1111111111111111111111111111111111112222"),
            "0x111111...2222"
        );
    }

    #[test]
    fn plain_report_has_score_and_graph_counts() {
        let report = report();
        let text = render_report(&report, false);
        assert!(text.contains(&format!("{}/100 ({})", report.risk_score, report.risk_level)));
        assert!(text.contains("Graph: 7 nodes, 6 links"));
        assert!(text.contains(&report.executive_summary));
        assert!(!text.contains('\u{1b}'));
    }

    #[test]
    fn sessions_are_numbered_from_one_with_active_marker() {
        let session = ChatSession {
            id: "abc".into(),
            title: "hello there...".into(),
            last_message: "hi...".into(),
            updated_at: chrono::Utc::now(),
            messages: vec![Message::user("hello there", None)],
        };
        let text = render_sessions(&[session], Some("abc"));
        assert!(text.starts_with("*  1. hello there..."));
    }

    #[test]
    fn empty_consent_list_says_so() {
        assert_eq!(render_consent_logs(&[]), "no consent records\n");
    }

    #[test]
    fn consent_row_carries_version() {
        let log = ConsentLog {
            user_id: "user_1f".into(),
            action: "AGREE_TERMS_V1.0".into(),
            timestamp: "2026-01-13T00:00:00Z".into(),
            ip_address: "unknown".into(),
            user_agent: "matrix-agent/test".into(),
            agreement_version: "2026-01-13".into(),
        };
        let text = render_consent_logs(&[log]);
        assert!(text.contains("user_1f  unknown  AGREE_TERMS_V1.0  v2026-01-13"));
    }
}
