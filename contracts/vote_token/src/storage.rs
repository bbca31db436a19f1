use soroban_sdk::{Address, Env, Vec};

use crate::types::{Checkpoint, DataKey, TokenMetadata};

pub fn has_admin(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Admin)
}

pub fn set_admin(env: &Env, admin: &Address) {
    env.storage().instance().set(&DataKey::Admin, admin);
}

pub fn get_metadata(env: &Env) -> Option<TokenMetadata> {
    env.storage().instance().get(&DataKey::Metadata)
}

pub fn set_metadata(env: &Env, metadata: &TokenMetadata) {
    env.storage().instance().set(&DataKey::Metadata, metadata);
}

pub fn get_total_supply(env: &Env) -> i128 {
    env.storage().instance().get(&DataKey::TotalSupply).unwrap_or(0)
}

pub fn set_total_supply(env: &Env, supply: i128) {
    env.storage().instance().set(&DataKey::TotalSupply, &supply);
}

pub fn balance(env: &Env, account: &Address) -> i128 {
    env.storage()
        .persistent()
        .get(&DataKey::Balance(account.clone()))
        .unwrap_or(0)
}

pub fn set_balance(env: &Env, account: &Address, amount: i128) {
    env.storage()
        .persistent()
        .set(&DataKey::Balance(account.clone()), &amount);
}

pub fn delegate_of(env: &Env, account: &Address) -> Option<Address> {
    env.storage()
        .persistent()
        .get(&DataKey::Delegate(account.clone()))
}

pub fn set_delegate(env: &Env, account: &Address, delegate: &Address) {
    env.storage()
        .persistent()
        .set(&DataKey::Delegate(account.clone()), delegate);
}

pub fn checkpoints_of(env: &Env, account: &Address) -> Vec<Checkpoint> {
    env.storage()
        .persistent()
        .get(&DataKey::Checkpoints(account.clone()))
        .unwrap_or(Vec::new(env))
}

pub fn set_checkpoints(env: &Env, account: &Address, checkpoints: &Vec<Checkpoint>) {
    env.storage()
        .persistent()
        .set(&DataKey::Checkpoints(account.clone()), checkpoints);
}
