//! Conversions between human input and ledger values.
//!
//! Amounts are entered and displayed in ether and travel on-chain as wei
//! (a fixed 18-decimal scale). Addresses follow EIP-55: all-lowercase and
//! all-uppercase hex are accepted as-is, mixed case must carry a valid
//! checksum.

use alloy_primitives::{
    utils::{format_ether, parse_ether},
    Address, U256,
};
use std::str::FromStr;

use crate::errors::{DashboardError, Result};

/// Number of decimals between ether and wei
pub const ETHER_DECIMALS: u8 = 18;

/// Parse a decimal ether amount (e.g. "0.05") into wei.
pub fn parse_ether_amount(input: &str) -> Result<U256> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(DashboardError::InvalidInput("amount is empty".to_string()));
    }
    if trimmed.starts_with('-') || trimmed.starts_with('+') {
        return Err(DashboardError::InvalidInput(format!(
            "amount must be an unsigned decimal: {}",
            trimmed
        )));
    }

    if let Some((_, fraction)) = trimmed.split_once('.') {
        if fraction.trim_end_matches('0').len() > ETHER_DECIMALS as usize {
            return Err(DashboardError::InvalidInput(format!(
                "amount has more than {} decimals: {}",
                ETHER_DECIMALS, trimmed
            )));
        }
    }

    parse_ether(trimmed).map_err(|e| {
        DashboardError::InvalidInput(format!("invalid ether amount '{}': {}", trimmed, e))
    })
}

/// Format wei as ether, trimming trailing zeros but keeping one fractional digit.
pub fn format_ether_amount(wei: U256) -> String {
    let full = format_ether(wei);

    match full.split_once('.') {
        Some((whole, fraction)) => {
            let fraction = fraction.trim_end_matches('0');
            if fraction.is_empty() {
                format!("{}.0", whole)
            } else {
                format!("{}.{}", whole, fraction)
            }
        }
        None => format!("{}.0", full),
    }
}

/// Validate the syntax of a hex address.
pub fn parse_address(input: &str) -> Result<Address> {
    let hex_part = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);

    let address = Address::from_str(hex_part).map_err(|e| {
        DashboardError::InvalidInput(format!("not a 20-byte hex address: {} ({})", input, e))
    })?;

    let has_lower = hex_part.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex_part.chars().any(|c| c.is_ascii_uppercase());

    if has_lower && has_upper {
        Address::parse_checksummed(format!("0x{}", hex_part), None).map_err(|_| {
            DashboardError::InvalidInput(format!(
                "address checksum mismatch: {} (expected {})",
                input,
                address.to_checksum(None)
            ))
        })?;
    }

    Ok(address)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wei(ether: u64) -> U256 {
        U256::from(ether) * U256::from(10u64).pow(U256::from(ETHER_DECIMALS))
    }

    #[test]
    fn test_parse_whole_ether() {
        assert_eq!(parse_ether_amount("1").unwrap(), wei(1));
        assert_eq!(parse_ether_amount("25").unwrap(), wei(25));
    }

    #[test]
    fn test_parse_fractional_ether() {
        assert_eq!(
            parse_ether_amount("0.5").unwrap(),
            U256::from(500_000_000_000_000_000u64)
        );
        assert_eq!(parse_ether_amount("0.000000000000000001").unwrap(), U256::from(1));
    }

    #[test]
    fn test_parse_zero_is_allowed_here() {
        // Positivity is a proposal rule, not a parsing rule
        assert_eq!(parse_ether_amount("0").unwrap(), U256::ZERO);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(parse_ether_amount(""), Err(DashboardError::InvalidInput(_))));
        assert!(matches!(parse_ether_amount("   "), Err(DashboardError::InvalidInput(_))));
        assert!(matches!(parse_ether_amount("abc"), Err(DashboardError::InvalidInput(_))));
        assert!(matches!(parse_ether_amount("-1"), Err(DashboardError::InvalidInput(_))));
    }

    #[test]
    fn test_parse_rejects_excess_precision() {
        let result = parse_ether_amount("0.0000000000000000001");
        assert!(matches!(result, Err(DashboardError::InvalidInput(_))));
    }

    #[test]
    fn test_format_ether_amount() {
        assert_eq!(format_ether_amount(wei(1)), "1.0");
        assert_eq!(format_ether_amount(U256::ZERO), "0.0");
        assert_eq!(format_ether_amount(U256::from(50_000_000_000_000_000u64)), "0.05");
        assert_eq!(format_ether_amount(U256::from(1_500_000_000_000_000_000u64)), "1.5");
    }

    #[test]
    fn test_parse_lowercase_address() {
        let addr = parse_address("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap();
        assert_eq!(
            addr.to_checksum(None),
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
        );
    }

    #[test]
    fn test_parse_checksummed_address() {
        assert!(parse_address("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").is_ok());
        assert!(parse_address("0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359").is_ok());
    }

    #[test]
    fn test_parse_address_without_prefix() {
        assert!(parse_address("5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").is_ok());
    }

    #[test]
    fn test_parse_address_bad_checksum() {
        let result = parse_address("0x5AAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
        assert!(matches!(result, Err(DashboardError::InvalidInput(_))));
    }

    #[test]
    fn test_parse_address_bad_length_or_chars() {
        assert!(parse_address("0x1234").is_err());
        assert!(parse_address("").is_err());
        assert!(parse_address("0xzzzeb6053f3e94c9b9a09f33669435e7ef1beaed").is_err());
        assert!(parse_address("not-an-address").is_err());
    }
}
