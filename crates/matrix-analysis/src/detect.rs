// SPDX-FileCopyrightText: 2026 Matrix Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Address-pattern detection in free-form user input.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Either address shape, scanned left to right. The hex form wins where both
/// could start at the same position.
static ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"0x[a-fA-F0-9]{40}|[1-9A-HJ-NP-Za-km-z]{32,44}").unwrap()
});

static ETHEREUM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"0x[a-fA-F0-9]{40}").unwrap());

static SOLANA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[1-9A-HJ-NP-Za-km-z]{32,44}\b").unwrap());

/// Chain hint shown while the user types.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum Chain {
    Ethereum,
    Solana,
}

/// All address-like tokens in `text`, in order of appearance.
pub fn find_addresses(text: &str) -> Vec<&str> {
    ADDRESS.find_iter(text).map(|m| m.as_str()).collect()
}

/// The first address-like token in `text`, if any.
pub fn first_address(text: &str) -> Option<&str> {
    ADDRESS.find(text).map(|m| m.as_str())
}

/// Classify the input line. Ethereum takes precedence when both shapes occur.
pub fn detect_chain(text: &str) -> Option<Chain> {
    if ETHEREUM.is_match(text) {
        Some(Chain::Ethereum)
    } else if SOLANA.is_match(text) {
        Some(Chain::Solana)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ETH: &str = "0x1111111111111111111111111111111111111111";
    const SOL: &str = "7EcDhSYGxXyscszYEp35KHN8vvw3svAuLKTzXwCFLtV";

    #[test]
    fn detects_ethereum_address() {
        let text = format!("check {ETH}");
        assert_eq!(detect_chain(&text), Some(Chain::Ethereum));
        assert_eq!(first_address(&text), Some(ETH));
    }

    #[test]
    fn detects_solana_address() {
        let text = format!("trace {SOL} please");
        assert_eq!(detect_chain(&text), Some(Chain::Solana));
        assert_eq!(find_addresses(&text), vec![SOL]);
    }

    #[test]
    fn ethereum_wins_over_solana() {
        let text = format!("{SOL} sent to {ETH}");
        assert_eq!(detect_chain(&text), Some(Chain::Ethereum));
        assert_eq!(find_addresses(&text), vec![SOL, ETH]);
        assert_eq!(first_address(&text), Some(SOL));
    }

    #[test]
    fn plain_text_has_no_address() {
        assert_eq!(detect_chain("hello"), None);
        assert!(find_addresses("hello there, how are you?").is_empty());
        assert_eq!(first_address(""), None);
    }

    #[test]
    fn short_hex_is_not_an_address() {
        assert_eq!(detect_chain("0x1234abcd"), None);
    }

    #[test]
    fn chain_displays_name() {
        assert_eq!(Chain::Ethereum.to_string(), "Ethereum");
        assert_eq!(Chain::Solana.to_string(), "Solana");
    }
}
