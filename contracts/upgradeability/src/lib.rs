#![no_std]

//! Versioned in-place logic replacement. The hosting contract keeps its
//! storage; only the installed code changes. Every upgrade is gated on the
//! admin, a monotonically increasing logic version, and agreement on the
//! storage-layout version the incoming code was compiled against.

use soroban_sdk::{
    contracterror, contracttype, symbol_short, Address, BytesN, Env, Symbol, Vec,
};

pub mod migration;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum UpgradeError {
    NotAuthorized = 100,
    VersionNotNewer = 101,
    LayoutMismatch = 102,
    MigrationFailed = 103,
    ContractFrozen = 104,
    HistoryNotFound = 105,
}

/// One installed-logic record; the full history stays queryable.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct InstalledLogic {
    pub wasm_hash: BytesN<32>,
    pub version: u32,
    pub layout_version: u32,
    pub installed_at: u64,
    pub description: Symbol,
}

pub mod storage {
    use super::*;

    pub const VERSION: Symbol = symbol_short!("LVERSION");
    pub const LAYOUT: Symbol = symbol_short!("LAYOUT");
    pub const ADMIN: Symbol = symbol_short!("UP_ADMIN");
    pub const HISTORY: Symbol = symbol_short!("HISTORY");
    pub const IS_FROZEN: Symbol = symbol_short!("FROZEN");

    pub fn get_version(env: &Env) -> u32 {
        env.storage().instance().get(&VERSION).unwrap_or(0)
    }

    pub fn set_version(env: &Env, version: u32) {
        env.storage().instance().set(&VERSION, &version);
    }

    pub fn get_layout_version(env: &Env) -> u32 {
        env.storage().instance().get(&LAYOUT).unwrap_or(0)
    }

    pub fn set_layout_version(env: &Env, layout: u32) {
        env.storage().instance().set(&LAYOUT, &layout);
    }

    pub fn get_admin(env: &Env) -> Option<Address> {
        env.storage().instance().get(&ADMIN)
    }

    pub fn set_admin(env: &Env, admin: &Address) {
        env.storage().instance().set(&ADMIN, admin);
    }

    pub fn is_frozen(env: &Env) -> bool {
        env.storage().instance().get(&IS_FROZEN).unwrap_or(false)
    }

    pub fn freeze(env: &Env) {
        env.storage().instance().set(&IS_FROZEN, &true);
    }

    pub fn add_history(env: &Env, record: InstalledLogic) {
        let mut list: Vec<InstalledLogic> = env
            .storage()
            .persistent()
            .get(&HISTORY)
            .unwrap_or(Vec::new(env));
        list.push_back(record);
        env.storage().persistent().set(&HISTORY, &list);
    }

    pub fn get_history(env: &Env) -> Vec<InstalledLogic> {
        env.storage()
            .persistent()
            .get(&HISTORY)
            .unwrap_or(Vec::new(env))
    }
}

pub fn authorize_upgrade(env: &Env) -> Result<Address, UpgradeError> {
    if storage::is_frozen(env) {
        return Err(UpgradeError::ContractFrozen);
    }
    let admin = storage::get_admin(env).ok_or(UpgradeError::NotAuthorized)?;
    admin.require_auth();
    Ok(admin)
}

/// Installs new logic code over the current contract's storage.
/// `expected_layout` is the storage-layout version the new code was built
/// for; it must match what this contract is actually holding.
pub fn execute_upgrade(
    env: &Env,
    new_wasm_hash: BytesN<32>,
    new_version: u32,
    expected_layout: u32,
    description: Symbol,
) -> Result<(), UpgradeError> {
    authorize_upgrade(env)?;

    if new_version <= storage::get_version(env) {
        return Err(UpgradeError::VersionNotNewer);
    }
    if expected_layout != storage::get_layout_version(env) {
        return Err(UpgradeError::LayoutMismatch);
    }

    storage::add_history(
        env,
        InstalledLogic {
            wasm_hash: new_wasm_hash.clone(),
            version: new_version,
            layout_version: expected_layout,
            installed_at: env.ledger().timestamp(),
            description,
        },
    );
    storage::set_version(env, new_version);

    env.events()
        .publish((symbol_short!("Upgrade"), new_version), new_wasm_hash.clone());
    env.deployer().update_current_contract_wasm(new_wasm_hash);

    Ok(())
}

/// Reinstalls the previously installed code under a fresh version number.
pub fn rollback(env: &Env) -> Result<(), UpgradeError> {
    authorize_upgrade(env)?;

    let history = storage::get_history(env);
    if history.len() < 2 {
        return Err(UpgradeError::HistoryNotFound);
    }
    let previous = history
        .get(history.len() - 2)
        .ok_or(UpgradeError::HistoryNotFound)?;

    let next_version = storage::get_version(env)
        .checked_add(1)
        .ok_or(UpgradeError::VersionNotNewer)?;
    storage::set_version(env, next_version);

    env.events()
        .publish((symbol_short!("Upgrade"), next_version), previous.wasm_hash.clone());
    env.deployer()
        .update_current_contract_wasm(previous.wasm_hash);

    Ok(())
}
