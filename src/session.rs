//! Wallet session and network validation.
//!
//! A session is only valid on the single required chain. The chain id is
//! read again on every `access` call because the wallet may switch networks
//! at any time without telling us; a mismatch invalidates the session.

use alloy::signers::local::PrivateKeySigner;
use alloy_primitives::Address;
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::{info, warn};

use crate::errors::{DashboardError, Result};
use crate::ledger::{Ledger, ProviderLedger};

/// Source of provider handles (the wallet connector widget)
#[async_trait]
pub trait WalletConnector: Send + Sync {
    async fn connect(&self) -> Result<Arc<dyn Ledger>>;
}

/// Connector that opens an HTTP provider at a fixed URL, signing with the
/// local wallet when one is configured
pub struct ProviderConnector {
    url: String,
    request_timeout: Duration,
    signer: Option<PrivateKeySigner>,
}

impl ProviderConnector {
    pub fn new(
        url: impl Into<String>,
        request_timeout: Duration,
        signer: Option<PrivateKeySigner>,
    ) -> Self {
        Self {
            url: url.into(),
            request_timeout,
            signer,
        }
    }
}

#[async_trait]
impl WalletConnector for ProviderConnector {
    async fn connect(&self) -> Result<Arc<dyn Ledger>> {
        let ledger = ProviderLedger::new(&self.url, self.request_timeout, self.signer.clone())?;
        Ok(Arc::new(ledger))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub address: Address,
    pub chain_id: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connecting,
    Connected(Session),
}

/// Read-only access to the ledger
#[derive(Clone)]
pub struct ReadHandle {
    provider: Arc<dyn Ledger>,
}

impl ReadHandle {
    pub fn ledger(&self) -> &dyn Ledger {
        self.provider.as_ref()
    }
}

/// Access that may also submit transactions from `address`
#[derive(Clone)]
pub struct SigningHandle {
    reader: ReadHandle,
    address: Address,
}

impl SigningHandle {
    pub fn reader(&self) -> &ReadHandle {
        &self.reader
    }

    pub fn address(&self) -> Address {
        self.address
    }
}

pub enum Access {
    ReadOnly(ReadHandle),
    Signing(SigningHandle),
}

struct Inner {
    state: SessionState,
    provider: Option<Arc<dyn Ledger>>,
}

pub struct SessionManager {
    connector: Arc<dyn WalletConnector>,
    required_chain_id: u64,
    inner: Mutex<Inner>,
}

impl SessionManager {
    pub fn new(connector: Arc<dyn WalletConnector>, required_chain_id: u64) -> Self {
        Self {
            connector,
            required_chain_id,
            inner: Mutex::new(Inner {
                state: SessionState::Disconnected,
                provider: None,
            }),
        }
    }

    pub fn required_chain_id(&self) -> u64 {
        self.required_chain_id
    }

    pub fn state(&self) -> SessionState {
        self.lock().state
    }

    /// Connected session, if any
    pub fn current(&self) -> Option<Session> {
        match self.state() {
            SessionState::Connected(session) => Some(session),
            _ => None,
        }
    }

    /// Acquire a provider, check the network and pick the active account.
    ///
    /// Any failure leaves the session `Disconnected`. On a wrong network no
    /// call beyond `eth_chainId` is made.
    pub async fn connect(&self) -> Result<Session> {
        self.lock().state = SessionState::Connecting;

        match self.try_connect().await {
            Ok((session, provider)) => {
                let mut inner = self.lock();
                inner.state = SessionState::Connected(session);
                inner.provider = Some(provider);
                info!(address = %session.address, chain_id = session.chain_id, "Wallet connected");
                Ok(session)
            }
            Err(e) => {
                self.reset();
                warn!(error = %e, "Wallet connection failed");
                Err(e)
            }
        }
    }

    async fn try_connect(&self) -> Result<(Session, Arc<dyn Ledger>)> {
        let provider = self.connector.connect().await?;

        let chain_id = provider.chain_id().await?;
        self.check_network(chain_id)?;

        let address = provider
            .request_accounts()
            .await?
            .into_iter()
            .next()
            .ok_or(DashboardError::WalletNotFound)?;

        Ok((Session { address, chain_id }, provider))
    }

    pub fn disconnect(&self) {
        self.reset();
        info!("Wallet disconnected");
    }

    /// Hand out ledger access after re-validating the network.
    pub async fn access(&self, need_signer: bool) -> Result<Access> {
        let (session, provider) = {
            let inner = self.lock();
            match (inner.state, inner.provider.clone()) {
                (SessionState::Connected(session), Some(provider)) => (session, provider),
                _ => return Err(DashboardError::NotConnected),
            }
        };

        let chain_id = provider.chain_id().await?;
        if let Err(e) = self.check_network(chain_id) {
            warn!(
                expected = self.required_chain_id,
                actual = chain_id,
                "Network changed mid-session, invalidating"
            );
            self.reset();
            return Err(e);
        }

        let reader = ReadHandle { provider };
        if need_signer {
            Ok(Access::Signing(SigningHandle {
                reader,
                address: session.address,
            }))
        } else {
            Ok(Access::ReadOnly(reader))
        }
    }

    pub async fn read_access(&self) -> Result<ReadHandle> {
        match self.access(false).await? {
            Access::ReadOnly(reader) => Ok(reader),
            Access::Signing(signer) => Ok(signer.reader),
        }
    }

    pub async fn signing_access(&self) -> Result<SigningHandle> {
        match self.access(true).await? {
            Access::Signing(signer) => Ok(signer),
            Access::ReadOnly(_) => Err(DashboardError::NotConnected),
        }
    }

    fn check_network(&self, chain_id: u64) -> Result<()> {
        if chain_id != self.required_chain_id {
            return Err(DashboardError::WrongNetwork {
                expected: self.required_chain_id,
                actual: chain_id,
            });
        }
        Ok(())
    }

    fn reset(&self) {
        let mut inner = self.lock();
        inner.state = SessionState::Disconnected;
        inner.provider = None;
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("Session lock poisoned - recovering");
                poisoned.into_inner()
            }
        }
    }
}
