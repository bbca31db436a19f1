use soroban_sdk::{contracttype, Address, String};

#[derive(Clone)]
#[contracttype]
pub struct TokenMetadata {
    pub decimal: u32,
    pub name: String,
    pub symbol: String,
}

/// Snapshot of a delegate's aggregate voting power as of a ledger sequence.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct Checkpoint {
    pub from_block: u32,
    pub votes: i128,
}

#[contracttype]
pub enum DataKey {
    Admin,
    Metadata,
    TotalSupply,
    Balance(Address),
    Delegate(Address),
    Checkpoints(Address),
}
