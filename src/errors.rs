use alloy::transports::TransportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Wrong network: wallet is on chain {actual}, expected chain {expected}. Switch networks in your wallet")]
    WrongNetwork { expected: u64, actual: u64 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Transaction {hash} failed: {reason}")]
    TransactionFailed { hash: String, reason: String },

    #[error("Another action is still in progress. Wait for it to confirm")]
    ActionInProgress,

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Wallet not connected. Connect a wallet first")]
    NotConnected,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Wallet not found. Create one with 'dao-dashboard wallet create' or import a key file")]
    WalletNotFound,
}

pub type Result<T> = std::result::Result<T, DashboardError>;

impl From<TransportError> for DashboardError {
    fn from(err: TransportError) -> Self {
        DashboardError::Rpc(err.to_string())
    }
}

impl From<alloy_sol_types::Error> for DashboardError {
    fn from(err: alloy_sol_types::Error) -> Self {
        DashboardError::Rpc(format!("ABI decode failed: {}", err))
    }
}
