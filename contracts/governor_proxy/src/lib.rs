#![no_std]
#![allow(clippy::too_many_arguments)]

use governor::types::{
    GovernorConfig, Proposal, ProposalAction, ProposalState, Receipt, SnapshotMode,
};
use governor::{layout, Error};
use soroban_sdk::{
    contract, contractimpl, contractmeta, symbol_short, Address, BytesN, Env, Symbol, Val, Vec,
};
use upgradeability::{storage as upgrade_storage, InstalledLogic, UpgradeError};


contractmeta!(
    key = "Description",
    val = "Persistent governance store dispatching to the installed governor logic"
);

/// Owns every piece of mutable governance state and the immutable
/// configuration. The state machine itself lives in the `governor` crate
/// and runs against this contract's storage; `upgrade` swaps that logic in
/// place while the storage, and with it all accumulated proposals, votes
/// and receipts, survives.
#[contract]
pub struct GovernorProxy;

#[contractimpl]
impl GovernorProxy {
    pub fn initialize(
        env: Env,
        admin: Address,
        token: Address,
        delay_register: Address,
        approval_registry: Address,
        voting_period: u32,
        voting_delay: u32,
        quorum: i128,
        snapshot_mode: SnapshotMode,
    ) -> Result<(), Error> {
        governor::init_storage(
            &env,
            GovernorConfig {
                admin: admin.clone(),
                token,
                delay_register,
                approval_registry,
                voting_period,
                voting_delay,
                quorum,
                snapshot_mode,
            },
        )?;
        upgrade_storage::set_admin(&env, &admin);
        upgrade_storage::set_version(&env, governor::INTERFACE_VERSION);
        upgrade_storage::set_layout_version(&env, layout::LAYOUT_VERSION);

        env.events().publish((symbol_short!("init"),), admin);
        Ok(())
    }

    pub fn admin(env: Env) -> Result<Address, Error> {
        Ok(governor::config(&env)?.admin)
    }

    /// Version of the governor logic currently answering calls.
    pub fn implementation(env: Env) -> u32 {
        upgrade_storage::get_version(&env)
    }

    pub fn layout_version(env: Env) -> u32 {
        upgrade_storage::get_layout_version(&env)
    }

    pub fn upgrade_history(env: Env) -> Vec<InstalledLogic> {
        upgrade_storage::get_history(&env)
    }

    /// Replaces the installed logic in place (admin-gated, layout-checked).
    pub fn upgrade(
        env: Env,
        new_wasm_hash: BytesN<32>,
        new_version: u32,
        expected_layout: u32,
        description: Symbol,
    ) -> Result<(), UpgradeError> {
        upgradeability::execute_upgrade(
            &env,
            new_wasm_hash,
            new_version,
            expected_layout,
            description,
        )
    }

    // ----- dispatched operation surface -----

    pub fn create_proposal(
        env: Env,
        proposer: Address,
        targets: Vec<Address>,
        funcs: Vec<Symbol>,
        arg_lists: Vec<Vec<Val>>,
    ) -> Result<u64, Error> {
        governor::create_proposal(&env, proposer, targets, funcs, arg_lists)
    }

    pub fn cast_vote(env: Env, voter: Address, proposal_id: u64, support: bool) -> Result<(), Error> {
        governor::cast_vote(&env, voter, proposal_id, support)
    }

    pub fn queue_proposal(env: Env, proposal_id: u64) -> Result<(), Error> {
        governor::queue_proposal(&env, proposal_id)
    }

    pub fn execute_proposal(env: Env, proposal_id: u64) -> Result<(), Error> {
        governor::execute_proposal(&env, proposal_id)
    }

    pub fn cancel(env: Env, caller: Address, proposal_id: u64) -> Result<(), Error> {
        governor::cancel(&env, caller, proposal_id)
    }

    pub fn proposal_state(env: Env, proposal_id: u64) -> Result<ProposalState, Error> {
        governor::proposal_state(&env, proposal_id)
    }

    pub fn get_proposal(env: Env, proposal_id: u64) -> Result<Proposal, Error> {
        governor::get_proposal(&env, proposal_id)
    }

    pub fn get_actions(env: Env, proposal_id: u64) -> Result<Vec<ProposalAction>, Error> {
        governor::get_actions(&env, proposal_id)
    }

    pub fn get_receipt(env: Env, proposal_id: u64, voter: Address) -> Option<Receipt> {
        governor::get_receipt(&env, proposal_id, &voter)
    }

    pub fn proposal_count(env: Env) -> u64 {
        governor::proposal_count(&env)
    }
}
