//! Read access to an EVM chain.

pub mod rpc;

pub use rpc::JsonRpcBalanceSource;

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;

use crate::error::{AgentError, Result};

/// Decimals of the native currency (ETH).
pub const NATIVE_DECIMALS: u32 = 18;

fn address_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^0x[0-9a-fA-F]{40}$").expect("address pattern is valid"))
}

/// A wallet address: `0x` followed by 40 hexadecimal characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address(String);

impl Address {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if !address_pattern().is_match(trimmed) {
            return Err(AgentError::InvalidArgument(format!(
                "Invalid wallet address: '{trimmed}' (expected 0x followed by 40 hex characters)"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Address {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of native-currency balances.
#[async_trait]
pub trait BalanceSource: Send + Sync {
    /// Balance of `address` in wei at the latest block.
    async fn native_balance(&self, address: &Address) -> Result<u128>;
}

/// Render a wei amount as a decimal ether string, trailing zeros trimmed.
///
/// ```
/// assert_eq!(onchain_agent::chain::format_ether(1_500_000_000_000_000_000), "1.5");
/// assert_eq!(onchain_agent::chain::format_ether(0), "0");
/// ```
pub fn format_ether(wei: u128) -> String {
    format_units(wei, NATIVE_DECIMALS)
}

/// Render an integer amount with `decimals` fractional digits.
pub fn format_units(value: u128, decimals: u32) -> String {
    let base = 10u128.pow(decimals);
    let whole = value / base;
    let fraction = value % base;
    if fraction == 0 {
        return whole.to_string();
    }
    let fraction = format!("{fraction:0width$}", width = decimals as usize);
    format!("{whole}.{}", fraction.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_mixed_case_address() {
        let addr = Address::parse("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045").unwrap();
        assert_eq!(addr.as_str(), "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045");
    }

    #[test]
    fn rejects_malformed_addresses() {
        for raw in [
            "",
            "0x",
            "d8dA6BF26964aF9D7eEd9e03E53415D37aA96045",
            "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA9604",
            "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA960455",
            "0xg8dA6BF26964aF9D7eEd9e03E53415D37aA96045",
            "vitalik.eth",
        ] {
            assert!(Address::parse(raw).is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn formats_whole_and_fractional_ether() {
        assert_eq!(format_ether(0), "0");
        assert_eq!(format_ether(1_000_000_000_000_000_000), "1");
        assert_eq!(format_ether(1), "0.000000000000000001");
        assert_eq!(format_ether(123_456_000_000_000_000_000), "123.456");
    }

    #[test]
    fn formats_other_unit_sizes() {
        assert_eq!(format_units(1_050_000, 6), "1.05");
        assert_eq!(format_units(42, 0), "42");
    }
}
