//! Client-side controller for a DAO governance dashboard.
//!
//! Holds a wallet session, mirrors proposal and balance data from the DAO
//! and membership NFT contracts, derives proposal status and serializes
//! vote / execute / create transactions.

pub mod abi;
pub mod commands;
pub mod config;
pub mod coordinator;
pub mod dashboard;
pub mod errors;
pub mod gateway;
pub mod ledger;
pub mod proposal;
pub mod session;
pub mod status;
pub mod store;
pub mod units;
pub mod wallet;

pub use coordinator::{Action, Confirmed, TransactionCoordinator};
pub use dashboard::{Dashboard, ProposalView, Tab};
pub use errors::{DashboardError, Result};
pub use gateway::{ConfirmationPolicy, ContractAddresses, ContractGateway, PendingTransaction};
pub use ledger::{Ledger, ProviderLedger, TxHash, TxReceipt};
pub use proposal::{Proposal, ProposalForm, ValidProposal, VoteChoice};
pub use session::{ProviderConnector, Session, SessionManager, SessionState, WalletConnector};
pub use status::{status, Clock, FixedClock, PermittedAction, ProposalStatus, SystemClock};
pub use store::{ProposalStore, Snapshot};
