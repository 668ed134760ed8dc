use alloy_primitives::{Address, U256};
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

use crate::errors::{DashboardError, Result};
use crate::units;

/// A funding proposal as mirrored from the DAO contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposal {
    pub id: u64,
    pub token_address: Address,
    /// Requested amount in wei
    pub eth_amount: U256,
    pub deadline: DateTime<Utc>,
    pub yay_votes: u64,
    pub nay_votes: u64,
    pub executed: bool,
}

/// Ballot choice, encoded on-chain as `0 = Yay`, `1 = Nay`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteChoice {
    Yay,
    Nay,
}

impl VoteChoice {
    pub fn as_u8(self) -> u8 {
        match self {
            VoteChoice::Yay => 0,
            VoteChoice::Nay => 1,
        }
    }
}

impl fmt::Display for VoteChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoteChoice::Yay => write!(f, "Yay"),
            VoteChoice::Nay => write!(f, "Nay"),
        }
    }
}

impl FromStr for VoteChoice {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "yay" | "yes" | "0" => Ok(VoteChoice::Yay),
            "nay" | "no" | "1" => Ok(VoteChoice::Nay),
            other => Err(DashboardError::InvalidInput(format!(
                "unknown vote choice '{}'. Valid options: yay, nay",
                other
            ))),
        }
    }
}

/// Raw create-proposal form input, exactly as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProposalForm {
    pub token_address: String,
    pub eth_amount: String,
}

/// Form input that passed validation and is ready to submit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidProposal {
    pub token: Address,
    /// Amount in wei, always > 0
    pub amount: U256,
}

impl ProposalForm {
    pub fn new(token_address: impl Into<String>, eth_amount: impl Into<String>) -> Self {
        Self {
            token_address: token_address.into(),
            eth_amount: eth_amount.into(),
        }
    }

    /// Check the form without touching the network
    pub fn validate(&self) -> Result<ValidProposal> {
        let token = units::parse_address(&self.token_address)?;
        let amount = units::parse_ether_amount(&self.eth_amount)?;

        if amount.is_zero() {
            return Err(DashboardError::InvalidInput(
                "amount must be greater than zero".to_string(),
            ));
        }

        Ok(ValidProposal { token, amount })
    }
}
