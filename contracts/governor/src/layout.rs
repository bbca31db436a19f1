//! Storage layout shared by the persistent proxy and every logic version
//! installed into it. Any change to `DataKey` or to the shape of a stored
//! type must bump `LAYOUT_VERSION`; the upgrade path refuses logic built
//! against a different layout.

use soroban_sdk::{contracttype, Address, Env};

use crate::types::{GovernorConfig, Proposal, Receipt};

pub const LAYOUT_VERSION: u32 = 1;

#[contracttype]
pub enum DataKey {
    Config,
    ProposalCount,
    Proposal(u64),
    Receipt(u64, Address),
}

pub fn has_config(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn get_config(env: &Env) -> Option<GovernorConfig> {
    env.storage().instance().get(&DataKey::Config)
}

pub fn set_config(env: &Env, config: &GovernorConfig) {
    env.storage().instance().set(&DataKey::Config, config);
}

pub fn proposal_count(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::ProposalCount)
        .unwrap_or(0)
}

pub fn set_proposal_count(env: &Env, count: u64) {
    env.storage().instance().set(&DataKey::ProposalCount, &count);
}

pub fn get_proposal(env: &Env, id: u64) -> Option<Proposal> {
    env.storage().persistent().get(&DataKey::Proposal(id))
}

pub fn set_proposal(env: &Env, proposal: &Proposal) {
    env.storage()
        .persistent()
        .set(&DataKey::Proposal(proposal.id), proposal);
}

pub fn get_receipt(env: &Env, id: u64, voter: &Address) -> Option<Receipt> {
    env.storage()
        .persistent()
        .get(&DataKey::Receipt(id, voter.clone()))
}

pub fn set_receipt(env: &Env, id: u64, voter: &Address, receipt: &Receipt) {
    env.storage()
        .persistent()
        .set(&DataKey::Receipt(id, voter.clone()), receipt);
}
