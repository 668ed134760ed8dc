//! Serialized submission of state-changing actions.
//!
//! At most one action is in flight per coordinator. The flag is cleared by a
//! drop guard, so it is released on every exit path including a dropped
//! future. Writes are never retried: resubmitting could double-vote or
//! double-spend.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

use crate::errors::{DashboardError, Result};
use crate::gateway::ContractGateway;
use crate::ledger::TxReceipt;
use crate::proposal::{ProposalForm, VoteChoice};
use crate::status::{self, Clock, ProposalStatus, SystemClock};
use crate::store::{ProposalStore, Snapshot};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Vote { proposal_id: u64, choice: VoteChoice },
    Execute { proposal_id: u64 },
    CreateProposal(ProposalForm),
}

impl Action {
    fn name(&self) -> &'static str {
        match self {
            Action::Vote { .. } => "vote",
            Action::Execute { .. } => "execute",
            Action::CreateProposal(_) => "create_proposal",
        }
    }
}

/// Outcome of a mined action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confirmed {
    pub receipt: TxReceipt,
    /// False when the post-confirmation refresh failed and the snapshot is stale
    pub refreshed: bool,
}

struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct TransactionCoordinator {
    gateway: Arc<ContractGateway>,
    store: Arc<ProposalStore>,
    clock: Arc<dyn Clock>,
    in_flight: AtomicBool,
}

impl TransactionCoordinator {
    pub fn new(gateway: Arc<ContractGateway>, store: Arc<ProposalStore>) -> Self {
        Self::with_clock(gateway, store, Arc::new(SystemClock))
    }

    pub fn with_clock(
        gateway: Arc<ContractGateway>,
        store: Arc<ProposalStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            gateway,
            store,
            clock,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Submit `action`, wait for it to be mined, then refresh what it touched.
    pub async fn submit(&self, action: Action) -> Result<Confirmed> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!(action = action.name(), "Rejected: another action is in flight");
            return Err(DashboardError::ActionInProgress);
        }
        let guard = InFlightGuard(&self.in_flight);

        check_permitted(&action, &self.store.snapshot(), self.clock.now())?;

        let pending = match &action {
            Action::Vote {
                proposal_id,
                choice,
            } => self.gateway.vote(*proposal_id, *choice).await?,
            Action::Execute { proposal_id } => self.gateway.execute(*proposal_id).await?,
            Action::CreateProposal(form) => self.gateway.create_proposal(form).await?,
        };

        let receipt = match self.gateway.await_confirmation(&pending).await {
            Ok(receipt) => receipt,
            Err(e) => {
                warn!(action = action.name(), tx_hash = %pending.hash, error = %e, "Action failed, snapshot left untouched");
                return Err(e);
            }
        };
        drop(guard);

        let refresh = match action {
            Action::Vote { .. } | Action::Execute { .. } => self.store.refresh_proposals().await,
            Action::CreateProposal(_) => self.store.refresh_proposals_and_count().await,
        };

        let refreshed = match refresh {
            Ok(_) => true,
            Err(e) => {
                warn!(tx_hash = %receipt.hash, error = %e, "Post-confirmation refresh failed");
                false
            }
        };

        info!(tx_hash = %receipt.hash, block = receipt.block_number, refreshed, "Action confirmed");
        Ok(Confirmed { receipt, refreshed })
    }
}

/// Local gate: voting needs an active proposal, execution a passed one.
fn check_permitted(action: &Action, snapshot: &Snapshot, now: DateTime<Utc>) -> Result<()> {
    let (proposal_id, required) = match action {
        Action::Vote { proposal_id, .. } => (*proposal_id, ProposalStatus::Active),
        Action::Execute { proposal_id } => (*proposal_id, ProposalStatus::Passed),
        Action::CreateProposal(_) => return Ok(()),
    };

    let proposal = snapshot.proposal(proposal_id).ok_or_else(|| {
        DashboardError::InvalidInput(format!(
            "proposal {} is not in the current snapshot. Refresh and try again",
            proposal_id
        ))
    })?;

    let current = status::status(proposal, now);
    if current != required {
        return Err(DashboardError::InvalidInput(format!(
            "cannot {} proposal {}: status is {}",
            action.name(),
            proposal_id,
            current
        )));
    }

    Ok(())
}
