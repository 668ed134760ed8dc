//! Provider handle over the ledger's JSON-RPC surface.
//!
//! `Ledger` is the narrow set of calls the dashboard makes through a wallet
//! provider. `ProviderLedger` backs it with an alloy HTTP provider. With a
//! local signer, transactions are filled and signed client-side; without
//! one the node must sign `eth_sendTransaction` itself.

use alloy::network::{EthereumWallet, ReceiptResponse, TransactionBuilder};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::client::RpcClient;
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::http::{reqwest, Http};
use alloy_primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use crate::errors::{DashboardError, Result};

pub type TxHash = B256;

/// Mined transaction outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxReceipt {
    pub hash: TxHash,
    pub block_number: u64,
    pub success: bool,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Ledger: Send + Sync {
    async fn chain_id(&self) -> Result<u64>;

    /// Accounts the wallet exposes, first one is the active account
    async fn request_accounts(&self) -> Result<Vec<Address>>;

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes>;

    async fn get_balance(&self, address: Address) -> Result<U256>;

    /// Submit a transaction for signing and broadcast. Returns without waiting for inclusion.
    async fn send_transaction(&self, from: Address, to: Address, data: Bytes) -> Result<TxHash>;

    /// `None` while the transaction is still pending
    async fn transaction_receipt(&self, hash: TxHash) -> Result<Option<TxReceipt>>;
}

/// alloy provider over HTTP, optionally carrying a local signer
pub struct ProviderLedger {
    provider: DynProvider,
    signer: Option<Address>,
}

impl ProviderLedger {
    pub fn new(url: &str, timeout: Duration, signer: Option<PrivateKeySigner>) -> Result<Self> {
        let url: reqwest::Url = url
            .parse()
            .map_err(|e| DashboardError::Config(format!("invalid RPC URL {}: {}", url, e)))?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DashboardError::Rpc(e.to_string()))?;
        let client = RpcClient::new(Http::with_client(http, url), false);

        let (provider, signer) = match signer {
            Some(signer) => {
                let address = signer.address();
                let provider = ProviderBuilder::new()
                    .wallet(EthereumWallet::from(signer))
                    .on_client(client)
                    .erased();
                (provider, Some(address))
            }
            None => (ProviderBuilder::new().on_client(client).erased(), None),
        };

        Ok(Self { provider, signer })
    }
}

#[async_trait]
impl Ledger for ProviderLedger {
    async fn chain_id(&self) -> Result<u64> {
        Ok(self.provider.get_chain_id().await?)
    }

    /// The local signer when configured, otherwise the node's `eth_accounts`
    async fn request_accounts(&self) -> Result<Vec<Address>> {
        match self.signer {
            Some(address) => Ok(vec![address]),
            None => Ok(self.provider.get_accounts().await?),
        }
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes> {
        let tx = TransactionRequest::default().with_to(to).with_input(data);
        Ok(self.provider.call(tx).await?)
    }

    async fn get_balance(&self, address: Address) -> Result<U256> {
        Ok(self.provider.get_balance(address).await?)
    }

    async fn send_transaction(&self, from: Address, to: Address, data: Bytes) -> Result<TxHash> {
        let tx = TransactionRequest::default()
            .with_from(from)
            .with_to(to)
            .with_input(data);

        let pending = self.provider.send_transaction(tx).await?;
        debug!(tx_hash = %pending.tx_hash(), "Transaction broadcast");
        Ok(*pending.tx_hash())
    }

    async fn transaction_receipt(&self, hash: TxHash) -> Result<Option<TxReceipt>> {
        let receipt = self.provider.get_transaction_receipt(hash).await?;
        Ok(receipt.as_ref().and_then(mined_receipt))
    }
}

/// Receipts without a block number belong to pending transactions on some nodes
fn mined_receipt(receipt: &TransactionReceipt) -> Option<TxReceipt> {
    receipt.block_number.map(|block_number| TxReceipt {
        hash: receipt.transaction_hash,
        block_number,
        success: receipt.status(),
    })
}
