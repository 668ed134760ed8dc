//! Proposal lifecycle derivation.
//!
//! Status is never stored. It is recomputed from the proposal fields and the
//! caller's clock on every query, so `Active` becomes `Passed` or `NotPassed`
//! purely by time passing. The local clock is compared against the on-chain
//! deadline without any skew correction.

use chrono::{DateTime, Utc};
use std::fmt;

use crate::proposal::{Proposal, VoteChoice};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProposalStatus {
    Active,
    Passed,
    NotPassed,
    Executed,
}

/// A state-changing action the dashboard may offer for a proposal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermittedAction {
    Vote(VoteChoice),
    Execute,
}

/// Derive the lifecycle status of `proposal` at `now`.
pub fn status(proposal: &Proposal, now: DateTime<Utc>) -> ProposalStatus {
    if proposal.executed {
        return ProposalStatus::Executed;
    }

    if now < proposal.deadline {
        return ProposalStatus::Active;
    }

    if proposal.yay_votes > proposal.nay_votes {
        ProposalStatus::Passed
    } else {
        ProposalStatus::NotPassed
    }
}

impl ProposalStatus {
    pub fn permitted_actions(self) -> &'static [PermittedAction] {
        match self {
            ProposalStatus::Active => &[
                PermittedAction::Vote(VoteChoice::Yay),
                PermittedAction::Vote(VoteChoice::Nay),
            ],
            ProposalStatus::Passed => &[PermittedAction::Execute],
            ProposalStatus::NotPassed | ProposalStatus::Executed => &[],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProposalStatus::Active => "Active",
            ProposalStatus::Passed => "Passed",
            ProposalStatus::NotPassed => "Not passed",
            ProposalStatus::Executed => "Executed",
        }
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Source of "now" for status derivation
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a single instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
