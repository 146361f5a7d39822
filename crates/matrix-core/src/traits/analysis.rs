// SPDX-FileCopyrightText: 2026 Matrix Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Analysis engine trait.

use crate::report::AnalysisReport;

/// Produces a forensic report for an on-chain address.
///
/// The mock generator implements this today; a real analytics backend can
/// replace it without changing the signature or the report shape.
pub trait AnalysisEngine: Send + Sync {
    fn generate(&self, address: &str) -> AnalysisReport;
}
