//! Top-level controller the presentation layer talks to.
//!
//! Owns the session, gateway, store and coordinator. Connecting is the only
//! transition that triggers a full refresh, and it triggers exactly one.

use std::sync::Arc;
use tracing::info;

use crate::coordinator::{Action, Confirmed, TransactionCoordinator};
use crate::errors::Result;
use crate::gateway::{ConfirmationPolicy, ContractAddresses, ContractGateway};
use crate::proposal::{Proposal, ProposalForm, VoteChoice};
use crate::session::{Session, SessionManager, SessionState, WalletConnector};
use crate::status::{self, Clock, PermittedAction, ProposalStatus, SystemClock};
use crate::store::{ProposalStore, Snapshot};

/// Which panel the presentation layer shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    None,
    CreateProposal,
    ViewProposals,
}

/// A proposal together with its derived status and available actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalView {
    pub proposal: Proposal,
    pub status: ProposalStatus,
    pub actions: &'static [PermittedAction],
}

pub struct Dashboard {
    session: Arc<SessionManager>,
    store: Arc<ProposalStore>,
    coordinator: TransactionCoordinator,
    clock: Arc<dyn Clock>,
    tab: Tab,
}

impl Dashboard {
    pub fn new(
        connector: Arc<dyn WalletConnector>,
        required_chain_id: u64,
        contracts: ContractAddresses,
        confirmation: ConfirmationPolicy,
    ) -> Self {
        Self::with_clock(
            connector,
            required_chain_id,
            contracts,
            confirmation,
            Arc::new(SystemClock),
        )
    }

    pub fn with_clock(
        connector: Arc<dyn WalletConnector>,
        required_chain_id: u64,
        contracts: ContractAddresses,
        confirmation: ConfirmationPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let session = Arc::new(SessionManager::new(connector, required_chain_id));
        let gateway = Arc::new(ContractGateway::new(
            session.clone(),
            contracts,
            confirmation,
        ));
        let store = Arc::new(ProposalStore::new(gateway.clone()));
        let coordinator =
            TransactionCoordinator::with_clock(gateway, store.clone(), clock.clone());

        Self {
            session,
            store,
            coordinator,
            clock,
            tab: Tab::None,
        }
    }

    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    pub fn current_session(&self) -> Option<Session> {
        self.session.current()
    }

    /// Connect the wallet, then run the single on-connected refresh.
    ///
    /// A refresh failure is returned but the session stays connected.
    pub async fn connect(&self) -> Result<Arc<Snapshot>> {
        let session = self.session.connect().await?;
        self.on_connected(session).await
    }

    async fn on_connected(&self, session: Session) -> Result<Arc<Snapshot>> {
        info!(address = %session.address, "Loading dashboard");
        self.store.refresh().await
    }

    pub fn disconnect(&mut self) {
        self.session.disconnect();
        self.tab = Tab::None;
    }

    pub async fn refresh(&self) -> Result<Arc<Snapshot>> {
        self.store.refresh().await
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.store.snapshot()
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    pub fn is_busy(&self) -> bool {
        self.coordinator.is_in_flight()
    }

    /// Current proposals with statuses derived at this instant
    pub fn proposal_views(&self) -> Vec<ProposalView> {
        let now = self.clock.now();
        self.snapshot()
            .proposals
            .iter()
            .map(|proposal| {
                let status = status::status(proposal, now);
                ProposalView {
                    proposal: proposal.clone(),
                    status,
                    actions: status.permitted_actions(),
                }
            })
            .collect()
    }

    pub async fn submit(&self, action: Action) -> Result<Confirmed> {
        self.coordinator.submit(action).await
    }

    pub async fn vote(&self, proposal_id: u64, choice: VoteChoice) -> Result<Confirmed> {
        self.submit(Action::Vote {
            proposal_id,
            choice,
        })
        .await
    }

    pub async fn execute(&self, proposal_id: u64) -> Result<Confirmed> {
        self.submit(Action::Execute { proposal_id }).await
    }

    pub async fn create_proposal(&self, form: ProposalForm) -> Result<Confirmed> {
        self.submit(Action::CreateProposal(form)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tab_is_none() {
        assert_eq!(Tab::default(), Tab::None);
    }
}
