// SPDX-FileCopyrightText: 2026 Matrix Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Address detection and the synthetic analysis generator.
//!
//! [`detect`] scans chat input for Ethereum-style and Base58 addresses;
//! [`mock`] turns an address into a fixed-shape [`AnalysisReport`](matrix_core::AnalysisReport).

pub mod detect;
pub mod mock;

pub use detect::{Chain, detect_chain, find_addresses, first_address};
pub use mock::{MockAnalysisEngine, generate_report};
