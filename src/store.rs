//! Aggregate snapshot of everything the dashboard shows.
//!
//! The snapshot is immutable once published. Refreshes fetch fresh values,
//! build a new `Snapshot` and swap the `Arc`; a failed fetch publishes
//! nothing, so readers keep the previous (stale but consistent) view.

use alloy_primitives::U256;
use chrono::{DateTime, Utc};
use std::sync::{Arc, RwLock};
use tracing::{info, warn};

use crate::errors::{DashboardError, Result};
use crate::gateway::ContractGateway;
use crate::proposal::Proposal;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Native balance of the DAO contract, in wei
    pub treasury_balance: U256,
    /// Membership NFTs held by the connected address
    pub membership_balance: u64,
    pub proposal_count: u64,
    pub is_owner: bool,
    /// In ledger order
    pub proposals: Vec<Proposal>,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    pub fn proposal(&self, id: u64) -> Option<&Proposal> {
        self.proposals.iter().find(|p| p.id == id)
    }
}

pub struct ProposalStore {
    gateway: Arc<ContractGateway>,
    snapshot: RwLock<Arc<Snapshot>>,
}

impl ProposalStore {
    pub fn new(gateway: Arc<ContractGateway>) -> Self {
        Self {
            gateway,
            snapshot: RwLock::new(Arc::new(Snapshot::default())),
        }
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> Arc<Snapshot> {
        match self.snapshot.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Refetch all five reads and replace the whole snapshot.
    pub async fn refresh(&self) -> Result<Arc<Snapshot>> {
        let address = self
            .gateway
            .session()
            .current()
            .ok_or(DashboardError::NotConnected)?
            .address;

        let fetched = tokio::try_join!(
            self.gateway.owner(),
            self.gateway.membership_balance(address),
            self.gateway.proposal_count(),
            self.gateway.proposals(),
            self.gateway.treasury_balance(),
        );

        let (owner, membership_balance, proposal_count, proposals, treasury_balance) =
            match fetched {
                Ok(values) => values,
                Err(e) => {
                    warn!(error = %e, "Refresh failed, keeping previous snapshot");
                    return Err(e);
                }
            };

        let snapshot = Snapshot {
            treasury_balance,
            membership_balance,
            proposal_count,
            is_owner: owner == address,
            proposals,
            fetched_at: Some(Utc::now()),
        };

        info!(
            proposals = snapshot.proposals.len(),
            proposal_count = snapshot.proposal_count,
            is_owner = snapshot.is_owner,
            "Snapshot refreshed"
        );

        Ok(self.publish(snapshot))
    }

    /// Refetch only the proposal list
    pub async fn refresh_proposals(&self) -> Result<Arc<Snapshot>> {
        let proposals = self.gateway.proposals().await.map_err(|e| {
            warn!(error = %e, "Proposal refresh failed, keeping previous snapshot");
            e
        })?;

        let mut next = (*self.snapshot()).clone();
        next.proposals = proposals;
        next.fetched_at = Some(Utc::now());

        Ok(self.publish(next))
    }

    /// Refetch the proposal list and the proposal count
    pub async fn refresh_proposals_and_count(&self) -> Result<Arc<Snapshot>> {
        let fetched = tokio::try_join!(self.gateway.proposal_count(), self.gateway.proposals());
        let (proposal_count, proposals) = fetched.map_err(|e| {
            warn!(error = %e, "Proposal refresh failed, keeping previous snapshot");
            e
        })?;

        let mut next = (*self.snapshot()).clone();
        next.proposal_count = proposal_count;
        next.proposals = proposals;
        next.fetched_at = Some(Utc::now());

        Ok(self.publish(next))
    }

    fn publish(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let snapshot = Arc::new(snapshot);
        match self.snapshot.write() {
            Ok(mut guard) => *guard = snapshot.clone(),
            Err(poisoned) => *poisoned.into_inner() = snapshot.clone(),
        }
        snapshot
    }
}
