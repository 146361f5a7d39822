// SPDX-FileCopyrightText: 2026 Matrix Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scenario tests: detection feeding the generator.

use matrix_analysis::{Chain, MockAnalysisEngine, detect_chain, first_address};
use matrix_core::{AnalysisEngine, RiskLevel};

#[test]
fn detected_address_feeds_generator() {
    let input = "check 0x1111111111111111111111111111111111111111";
    assert_eq!(detect_chain(input), Some(Chain::Ethereum));

    let address = first_address(input).expect("address detected");
    let engine = MockAnalysisEngine::new();
    let report = engine.generate(address);

    assert_eq!(report.address, address);
    assert_eq!(report.graph.nodes.len(), 7);
    assert_eq!(report.graph.links.len(), 6);
    assert!(report.risk_score < 100);
    assert_eq!(report.risk_level, RiskLevel::from_score(report.risk_score));
}

#[test]
fn generator_accepts_any_input_as_trait_object() {
    let engine: Box<dyn AnalysisEngine> = Box::new(MockAnalysisEngine::seeded(9));
    for address in ["", "x", "not an address at all", "0xTornado..."] {
        let report = engine.generate(address);
        assert_eq!(report.graph.nodes.len(), 7);
        assert_eq!(report.graph.links.len(), 6);
    }
}
