use soroban_sdk::{contracttype, Address, Symbol, Val, Vec};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub enum ProposalState {
    Active,
    Canceled,
    Defeated,
    NoQuorum,
    Succeeded,
    Queued,
    Expired,
    Executed,
}

/// Which block a voter's weight is sampled at. `ProposalStart` resists
/// vote buying after a proposal becomes visible; `VoteTime` mirrors the
/// account's live power instead.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub enum SnapshotMode {
    ProposalStart,
    VoteTime,
}

#[derive(Clone, Debug, PartialEq)]
#[contracttype]
pub struct ProposalAction {
    pub target: Address,
    pub func: Symbol,
    pub args: Vec<Val>,
}

#[derive(Clone, Debug, PartialEq)]
#[contracttype]
pub struct Proposal {
    pub id: u64,
    pub proposer: Address,
    pub actions: Vec<ProposalAction>,
    pub start_block: u32,
    pub end_block: u32,
    pub for_votes: i128,
    pub against_votes: i128,
    pub eta: u64,
    pub canceled: bool,
    pub queued: bool,
    pub executed: bool,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct Receipt {
    pub support: bool,
    pub weight: i128,
}

#[derive(Clone, Debug, PartialEq)]
#[contracttype]
pub struct GovernorConfig {
    pub admin: Address,
    pub token: Address,
    pub delay_register: Address,
    pub approval_registry: Address,
    pub voting_period: u32,
    pub voting_delay: u32,
    pub quorum: i128,
    pub snapshot_mode: SnapshotMode,
}
