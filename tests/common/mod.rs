// In-memory DAO ledger shared by the controller integration tests.
// Behaves like the deployed contracts: membership NFT balances, a
// proposal list with deadlines, voting, execution and a treasury.

#![allow(dead_code)]

use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use dao_dashboard::abi::{DaoProposal, IDao, IMembershipNft};
use dao_dashboard::{
    Clock, ConfirmationPolicy, ContractAddresses, Dashboard, DashboardError, Ledger, Result,
    TxHash, TxReceipt, WalletConnector,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const CHAIN_ID: u64 = 5;
pub const VOTING_PERIOD_SECS: i64 = 600;

pub fn dao_address() -> Address {
    Address::repeat_byte(0xda)
}

pub fn nft_address() -> Address {
    Address::repeat_byte(0x4f)
}

pub fn owner() -> Address {
    Address::repeat_byte(0x01)
}

pub fn alice() -> Address {
    Address::repeat_byte(0xa1)
}

pub fn bob() -> Address {
    Address::repeat_byte(0xb0)
}

pub fn token() -> &'static str {
    "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
}

pub fn genesis() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 3, 1, 12, 0, 0).unwrap()
}

pub fn one_ether() -> U256 {
    U256::from(1_000_000_000_000_000_000u64)
}

/// Clock the test can move forward
pub struct ManualClock(Mutex<DateTime<Utc>>);

impl ManualClock {
    pub fn new(at: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self(Mutex::new(at)))
    }

    pub fn advance(&self, by: Duration) {
        *self.0.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

struct ProposalState {
    token: Address,
    amount: U256,
    deadline: i64,
    yay: u64,
    nay: u64,
    executed: bool,
    voters: HashSet<Address>,
}

struct Chain {
    now: i64,
    proposals: Vec<ProposalState>,
    treasury: U256,
    nft_balances: HashMap<Address, u64>,
    receipts: HashMap<TxHash, bool>,
    next_tx: u64,
}

#[derive(Default)]
pub struct Counters {
    pub chain_id: AtomicUsize,
    pub accounts: AtomicUsize,
    pub reads: AtomicUsize,
    pub sends: AtomicUsize,
    pub receipts: AtomicUsize,
}

impl Counters {
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn sends(&self) -> usize {
        self.sends.load(Ordering::SeqCst)
    }

    pub fn remote_calls(&self) -> usize {
        self.chain_id.load(Ordering::SeqCst)
            + self.accounts.load(Ordering::SeqCst)
            + self.reads()
            + self.sends()
            + self.receipts.load(Ordering::SeqCst)
    }
}

pub struct SimulatedDao {
    chain: Mutex<Chain>,
    chain_id: AtomicU64,
    hold_receipts: AtomicBool,
    fail_reads: AtomicBool,
    flaky_after_send: AtomicBool,
    fail_next_chain_id: AtomicBool,
    fail_next_receipt: AtomicBool,
    pub counters: Counters,
}

impl SimulatedDao {
    pub fn new() -> Arc<Self> {
        let mut nft_balances = HashMap::new();
        nft_balances.insert(owner(), 1);
        nft_balances.insert(alice(), 2);
        nft_balances.insert(bob(), 1);

        Arc::new(Self {
            chain: Mutex::new(Chain {
                now: genesis().timestamp(),
                proposals: Vec::new(),
                treasury: one_ether() * U256::from(10u64),
                nft_balances,
                receipts: HashMap::new(),
                next_tx: 1,
            }),
            chain_id: AtomicU64::new(CHAIN_ID),
            hold_receipts: AtomicBool::new(false),
            fail_reads: AtomicBool::new(false),
            flaky_after_send: AtomicBool::new(false),
            fail_next_chain_id: AtomicBool::new(false),
            fail_next_receipt: AtomicBool::new(false),
            counters: Counters::default(),
        })
    }

    pub fn switch_chain(&self, chain_id: u64) {
        self.chain_id.store(chain_id, Ordering::SeqCst);
    }

    pub fn hold_receipts(&self, hold: bool) {
        self.hold_receipts.store(hold, Ordering::SeqCst);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// After the next send, the following chain id and receipt lookups each fail once
    pub fn flaky_after_send(&self) {
        self.flaky_after_send.store(true, Ordering::SeqCst);
    }

    pub fn advance(&self, by: Duration) {
        self.chain.lock().unwrap().now += by.num_seconds();
    }

    /// Seed a proposal directly in contract storage
    pub fn seed_proposal(&self, amount: U256, yay: u64, nay: u64) -> u64 {
        let mut chain = self.chain.lock().unwrap();
        let deadline = chain.now + VOTING_PERIOD_SECS;
        chain.proposals.push(ProposalState {
            token: Address::repeat_byte(0x11),
            amount,
            deadline,
            yay,
            nay,
            executed: false,
            voters: HashSet::new(),
        });
        (chain.proposals.len() - 1) as u64
    }

    pub fn votes(&self, id: u64) -> (u64, u64) {
        let chain = self.chain.lock().unwrap();
        let p = &chain.proposals[id as usize];
        (p.yay, p.nay)
    }

    pub fn treasury(&self) -> U256 {
        self.chain.lock().unwrap().treasury
    }

    fn read(&self, to: Address, data: &[u8]) -> Result<Vec<u8>> {
        let chain = self.chain.lock().unwrap();
        let selector: [u8; 4] = data
            .get(..4)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| DashboardError::Rpc("execution reverted".to_string()))?;

        if to == nft_address() && selector == IMembershipNft::balanceOfCall::SELECTOR {
            let call = IMembershipNft::balanceOfCall::abi_decode(data, true)
                .map_err(|e| DashboardError::Rpc(e.to_string()))?;
            let balance = chain.nft_balances.get(&call.owner).copied().unwrap_or(0);
            return Ok(IMembershipNft::balanceOfCall::abi_encode_returns(&(U256::from(
                balance,
            ),)));
        }

        if to != dao_address() {
            return Err(DashboardError::Rpc("execution reverted".to_string()));
        }

        if selector == IDao::ownerCall::SELECTOR {
            Ok(IDao::ownerCall::abi_encode_returns(&(owner(),)))
        } else if selector == IDao::numProposalsCall::SELECTOR {
            Ok(IDao::numProposalsCall::abi_encode_returns(&(U256::from(
                chain.proposals.len() as u64,
            ),)))
        } else if selector == IDao::getProposalsCall::SELECTOR {
            let list = chain
                .proposals
                .iter()
                .enumerate()
                .map(|(i, p)| DaoProposal {
                    proposalId: U256::from(i as u64),
                    tokenAddress: p.token,
                    ethAmount: p.amount,
                    deadline: U256::from(p.deadline as u64),
                    yayVotes: U256::from(p.yay),
                    nayVotes: U256::from(p.nay),
                    executed: p.executed,
                })
                .collect::<Vec<_>>();
            Ok(IDao::getProposalsCall::abi_encode_returns(&(list,)))
        } else {
            Err(DashboardError::Rpc("execution reverted".to_string()))
        }
    }

    /// Apply a write the way the contract would; false means revert
    fn apply(chain: &mut Chain, from: Address, data: &[u8]) -> bool {
        let is_member = chain.nft_balances.get(&from).copied().unwrap_or(0) > 0;
        if !is_member || data.len() < 4 {
            return false;
        }
        let selector: [u8; 4] = [data[0], data[1], data[2], data[3]];
        let now = chain.now;

        if selector == IDao::voteProposalCall::SELECTOR {
            let Ok(call) = IDao::voteProposalCall::abi_decode(data, true) else {
                return false;
            };
            let Ok(index) = usize::try_from(call.index) else {
                return false;
            };
            let Some(p) = chain.proposals.get_mut(index) else {
                return false;
            };
            if now >= p.deadline || p.executed || !p.voters.insert(from) {
                return false;
            }
            match call.choice {
                0 => p.yay += 1,
                1 => p.nay += 1,
                _ => return false,
            }
            true
        } else if selector == IDao::executeProposalCall::SELECTOR {
            let Ok(call) = IDao::executeProposalCall::abi_decode(data, true) else {
                return false;
            };
            let Ok(index) = usize::try_from(call.index) else {
                return false;
            };
            let treasury = chain.treasury;
            let Some(p) = chain.proposals.get_mut(index) else {
                return false;
            };
            if now < p.deadline || p.executed || p.yay <= p.nay || p.amount > treasury {
                return false;
            }
            p.executed = true;
            let amount = p.amount;
            chain.treasury -= amount;
            true
        } else if selector == IDao::createProposalCall::SELECTOR {
            let Ok(call) = IDao::createProposalCall::abi_decode(data, true) else {
                return false;
            };
            chain.proposals.push(ProposalState {
                token: call.token,
                amount: call.amount,
                deadline: now + VOTING_PERIOD_SECS,
                yay: 0,
                nay: 0,
                executed: false,
                voters: HashSet::new(),
            });
            true
        } else {
            false
        }
    }
}

/// The simulated ledger seen through one wallet account
pub struct WalletView {
    dao: Arc<SimulatedDao>,
    account: Address,
}

#[async_trait]
impl Ledger for WalletView {
    async fn chain_id(&self) -> Result<u64> {
        self.dao.counters.chain_id.fetch_add(1, Ordering::SeqCst);
        if self.dao.fail_next_chain_id.swap(false, Ordering::SeqCst) {
            return Err(DashboardError::Rpc("transient timeout".to_string()));
        }
        Ok(self.dao.chain_id.load(Ordering::SeqCst))
    }

    async fn request_accounts(&self) -> Result<Vec<Address>> {
        self.dao.counters.accounts.fetch_add(1, Ordering::SeqCst);
        Ok(vec![self.account])
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes> {
        self.dao.counters.reads.fetch_add(1, Ordering::SeqCst);
        if self.dao.fail_reads.load(Ordering::SeqCst) {
            return Err(DashboardError::Rpc("connection refused".to_string()));
        }
        self.dao.read(to, &data).map(Bytes::from)
    }

    async fn get_balance(&self, address: Address) -> Result<U256> {
        self.dao.counters.reads.fetch_add(1, Ordering::SeqCst);
        if self.dao.fail_reads.load(Ordering::SeqCst) {
            return Err(DashboardError::Rpc("connection refused".to_string()));
        }
        if address == dao_address() {
            Ok(self.dao.treasury())
        } else {
            Ok(U256::ZERO)
        }
    }

    async fn send_transaction(&self, from: Address, to: Address, data: Bytes) -> Result<TxHash> {
        self.dao.counters.sends.fetch_add(1, Ordering::SeqCst);
        if self.dao.flaky_after_send.swap(false, Ordering::SeqCst) {
            self.dao.fail_next_chain_id.store(true, Ordering::SeqCst);
            self.dao.fail_next_receipt.store(true, Ordering::SeqCst);
        }
        let mut chain = self.dao.chain.lock().unwrap();

        let success = to == dao_address() && SimulatedDao::apply(&mut chain, from, &data);
        let hash = B256::left_padding_from(&chain.next_tx.to_be_bytes());
        chain.next_tx += 1;
        chain.receipts.insert(hash, success);

        Ok(hash)
    }

    async fn transaction_receipt(&self, hash: TxHash) -> Result<Option<TxReceipt>> {
        self.dao.counters.receipts.fetch_add(1, Ordering::SeqCst);
        if self.dao.fail_next_receipt.swap(false, Ordering::SeqCst) {
            return Err(DashboardError::Rpc("transient timeout".to_string()));
        }
        if self.dao.hold_receipts.load(Ordering::SeqCst) {
            return Ok(None);
        }

        let chain = self.dao.chain.lock().unwrap();
        Ok(chain.receipts.get(&hash).map(|success| TxReceipt {
            hash,
            block_number: chain.next_tx,
            success: *success,
        }))
    }
}

/// Connector handing out `WalletView`s for a fixed account
pub struct SimulatedConnector {
    pub dao: Arc<SimulatedDao>,
    pub account: Address,
}

#[async_trait]
impl WalletConnector for SimulatedConnector {
    async fn connect(&self) -> Result<Arc<dyn Ledger>> {
        Ok(Arc::new(WalletView {
            dao: self.dao.clone(),
            account: self.account,
        }))
    }
}

pub fn fast_confirmation() -> ConfirmationPolicy {
    ConfirmationPolicy {
        poll_interval: std::time::Duration::from_millis(2),
        timeout: std::time::Duration::from_secs(5),
    }
}

pub fn contracts() -> ContractAddresses {
    ContractAddresses {
        dao: dao_address(),
        membership_nft: nft_address(),
    }
}

pub fn dashboard_for(
    dao: &Arc<SimulatedDao>,
    account: Address,
    clock: Arc<dyn Clock>,
) -> Dashboard {
    Dashboard::with_clock(
        Arc::new(SimulatedConnector {
            dao: dao.clone(),
            account,
        }),
        CHAIN_ID,
        contracts(),
        fast_confirmation(),
        clock,
    )
}
