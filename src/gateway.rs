//! Typed call surface over the membership NFT and DAO contracts.
//!
//! Every call goes through `SessionManager` first, so the network is checked
//! again before each read and each write. Writes return as soon as the
//! transaction is submitted; `await_confirmation` waits for it to be mined.

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::abi::{DaoProposal, IDao, IMembershipNft};
use crate::errors::{DashboardError, Result};
use crate::ledger::{TxHash, TxReceipt};
use crate::proposal::{Proposal, ProposalForm, VoteChoice};
use crate::session::{ReadHandle, SessionManager, SigningHandle};

/// Deployed contract addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractAddresses {
    pub dao: Address,
    pub membership_nft: Address,
}

/// How `await_confirmation` polls for receipts
#[derive(Debug, Clone, Copy)]
pub struct ConfirmationPolicy {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            timeout: Duration::from_secs(300),
        }
    }
}

/// A submitted, not yet confirmed transaction, bound to the provider that sent it
#[derive(Clone)]
pub struct PendingTransaction {
    pub hash: TxHash,
    reader: ReadHandle,
}

pub struct ContractGateway {
    session: Arc<SessionManager>,
    contracts: ContractAddresses,
    confirmation: ConfirmationPolicy,
}

impl ContractGateway {
    pub fn new(
        session: Arc<SessionManager>,
        contracts: ContractAddresses,
        confirmation: ConfirmationPolicy,
    ) -> Self {
        Self {
            session,
            contracts,
            confirmation,
        }
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    pub fn contracts(&self) -> ContractAddresses {
        self.contracts
    }

    // ---- reads ----

    pub async fn owner(&self) -> Result<Address> {
        let reader = self.session.read_access().await?;
        let ret = self
            .read_call(&reader, self.contracts.dao, IDao::ownerCall {})
            .await?;
        Ok(ret._0)
    }

    pub async fn membership_balance(&self, holder: Address) -> Result<u64> {
        let reader = self.session.read_access().await?;
        let ret = self
            .read_call(
                &reader,
                self.contracts.membership_nft,
                IMembershipNft::balanceOfCall { owner: holder },
            )
            .await?;
        to_u64(ret._0, "membership balance")
    }

    pub async fn proposal_count(&self) -> Result<u64> {
        let reader = self.session.read_access().await?;
        let ret = self
            .read_call(&reader, self.contracts.dao, IDao::numProposalsCall {})
            .await?;
        to_u64(ret._0, "proposal count")
    }

    pub async fn proposals(&self) -> Result<Vec<Proposal>> {
        let reader = self.session.read_access().await?;
        let ret = self
            .read_call(&reader, self.contracts.dao, IDao::getProposalsCall {})
            .await?;
        ret._0.into_iter().map(convert_proposal).collect()
    }

    /// Native balance held by the DAO contract
    pub async fn treasury_balance(&self) -> Result<U256> {
        let reader = self.session.read_access().await?;
        reader.ledger().get_balance(self.contracts.dao).await
    }

    async fn read_call<C: SolCall>(
        &self,
        reader: &ReadHandle,
        to: Address,
        call: C,
    ) -> Result<C::Return> {
        let data = reader
            .ledger()
            .call(to, Bytes::from(call.abi_encode()))
            .await?;
        let ret = C::abi_decode_returns(&data, true)?;
        Ok(ret)
    }

    // ---- writes ----

    pub async fn vote(&self, proposal_id: u64, choice: VoteChoice) -> Result<PendingTransaction> {
        let signer = self.session.signing_access().await?;
        let call = IDao::voteProposalCall {
            index: U256::from(proposal_id),
            choice: choice.as_u8(),
        };
        let pending = self.send(&signer, call).await?;
        info!(proposal_id, %choice, tx_hash = %pending.hash, "Vote submitted");
        Ok(pending)
    }

    pub async fn execute(&self, proposal_id: u64) -> Result<PendingTransaction> {
        let signer = self.session.signing_access().await?;
        let call = IDao::executeProposalCall {
            index: U256::from(proposal_id),
        };
        let pending = self.send(&signer, call).await?;
        info!(proposal_id, tx_hash = %pending.hash, "Execution submitted");
        Ok(pending)
    }

    /// Validates the form before any remote call is made.
    pub async fn create_proposal(&self, form: &ProposalForm) -> Result<PendingTransaction> {
        let valid = form.validate()?;

        let signer = self.session.signing_access().await?;
        let call = IDao::createProposalCall {
            token: valid.token,
            amount: valid.amount,
        };
        let pending = self.send(&signer, call).await?;
        info!(token = %valid.token, amount = %valid.amount, tx_hash = %pending.hash, "Proposal creation submitted");
        Ok(pending)
    }

    async fn send<C: SolCall>(&self, signer: &SigningHandle, call: C) -> Result<PendingTransaction> {
        let hash = signer
            .reader()
            .ledger()
            .send_transaction(signer.address(), self.contracts.dao, Bytes::from(call.abi_encode()))
            .await?;
        Ok(PendingTransaction {
            hash,
            reader: signer.reader().clone(),
        })
    }

    /// Wait until `pending` is mined. Reverted or never-mined transactions fail.
    ///
    /// Polls the provider the transaction went out on without re-checking the
    /// session, so `TransactionFailed` is the only possible error.
    pub async fn await_confirmation(&self, pending: &PendingTransaction) -> Result<TxReceipt> {
        let started = tokio::time::Instant::now();

        loop {
            match pending.reader.ledger().transaction_receipt(pending.hash).await {
                Ok(Some(receipt)) if receipt.success => {
                    info!(tx_hash = %pending.hash, block = receipt.block_number, "Transaction confirmed");
                    return Ok(receipt);
                }
                Ok(Some(receipt)) => {
                    warn!(tx_hash = %pending.hash, block = receipt.block_number, "Transaction reverted");
                    return Err(DashboardError::TransactionFailed {
                        hash: pending.hash.to_string(),
                        reason: format!("reverted in block {}", receipt.block_number),
                    });
                }
                Ok(None) => debug!(tx_hash = %pending.hash, "Transaction pending"),
                Err(e) => warn!(tx_hash = %pending.hash, error = %e, "Receipt lookup failed, retrying"),
            }

            if started.elapsed() >= self.confirmation.timeout {
                return Err(DashboardError::TransactionFailed {
                    hash: pending.hash.to_string(),
                    reason: format!(
                        "not mined within {} seconds",
                        self.confirmation.timeout.as_secs()
                    ),
                });
            }

            tokio::time::sleep(self.confirmation.poll_interval).await;
        }
    }
}

fn to_u64(value: U256, what: &str) -> Result<u64> {
    u64::try_from(value)
        .map_err(|_| DashboardError::Rpc(format!("{} out of range: {}", what, value)))
}

fn convert_proposal(raw: DaoProposal) -> Result<Proposal> {
    let deadline_secs = i64::try_from(to_u64(raw.deadline, "deadline")?)
        .map_err(|_| DashboardError::Rpc(format!("deadline out of range: {}", raw.deadline)))?;
    let deadline = DateTime::<Utc>::from_timestamp(deadline_secs, 0)
        .ok_or_else(|| DashboardError::Rpc(format!("deadline out of range: {}", raw.deadline)))?;

    Ok(Proposal {
        id: to_u64(raw.proposalId, "proposal id")?,
        token_address: raw.tokenAddress,
        eth_amount: raw.ethAmount,
        deadline,
        yay_votes: to_u64(raw.yayVotes, "yay votes")?,
        nay_votes: to_u64(raw.nayVotes, "nay votes")?,
        executed: raw.executed,
    })
}
