#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, contractmeta, contracttype, symbol_short, Address, Env,
};

contractmeta!(
    key = "Description",
    val = "Weighted principal set for jointly approving governance proposals"
);

#[derive(Clone)]
#[contracttype]
pub struct RegistryConfig {
    pub admin: Address,
    pub threshold: i128,
}

#[contracttype]
pub enum DataKey {
    Config,
    Weight(Address),
    Approved(u64, Address),
    ApprovedWeight(u64),
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 40,
    NotInitialized = 41,
    Unauthorized = 42,
    DuplicateApproval = 43,
    InvalidWeight = 44,
    Overflow = 45,
}

#[contract]
pub struct ApprovalRegistry;

fn get_config(env: &Env) -> Result<RegistryConfig, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(Error::NotInitialized)
}

#[contractimpl]
impl ApprovalRegistry {
    pub fn initialize(env: Env, admin: Address, threshold: i128) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Config) {
            return Err(Error::AlreadyInitialized);
        }
        if threshold <= 0 {
            return Err(Error::InvalidWeight);
        }
        env.storage()
            .instance()
            .set(&DataKey::Config, &RegistryConfig { admin, threshold });
        Ok(())
    }

    /// Registers a principal, or replaces its weight if already present.
    pub fn add_principal(
        env: Env,
        caller: Address,
        identity: Address,
        weight: i128,
    ) -> Result<(), Error> {
        caller.require_auth();
        let cfg = get_config(&env)?;
        if caller != cfg.admin {
            return Err(Error::Unauthorized);
        }
        if weight <= 0 {
            return Err(Error::InvalidWeight);
        }
        env.storage()
            .persistent()
            .set(&DataKey::Weight(identity.clone()), &weight);

        env.events()
            .publish((symbol_short!("PrincAdd"), identity), weight);
        Ok(())
    }

    /// One approval per principal per proposal; cumulative weight only grows.
    pub fn approve(env: Env, principal: Address, proposal_id: u64) -> Result<(), Error> {
        principal.require_auth();
        get_config(&env)?;

        let weight: i128 = env
            .storage()
            .persistent()
            .get(&DataKey::Weight(principal.clone()))
            .ok_or(Error::Unauthorized)?;

        let approved_key = DataKey::Approved(proposal_id, principal.clone());
        if env.storage().persistent().has(&approved_key) {
            return Err(Error::DuplicateApproval);
        }

        let cumulative: i128 = env
            .storage()
            .persistent()
            .get(&DataKey::ApprovedWeight(proposal_id))
            .unwrap_or(0i128)
            .checked_add(weight)
            .ok_or(Error::Overflow)?;

        env.storage().persistent().set(&approved_key, &true);
        env.storage()
            .persistent()
            .set(&DataKey::ApprovedWeight(proposal_id), &cumulative);

        env.events().publish(
            (symbol_short!("Approve"), proposal_id),
            (principal, weight, cumulative),
        );
        Ok(())
    }

    pub fn approved_weight(env: Env, proposal_id: u64) -> i128 {
        env.storage()
            .persistent()
            .get(&DataKey::ApprovedWeight(proposal_id))
            .unwrap_or(0)
    }

    pub fn has_reached_threshold(env: Env, proposal_id: u64) -> Result<bool, Error> {
        let cfg = get_config(&env)?;
        Ok(Self::approved_weight(env, proposal_id) >= cfg.threshold)
    }

    pub fn has_approved(env: Env, proposal_id: u64, principal: Address) -> bool {
        env.storage()
            .persistent()
            .has(&DataKey::Approved(proposal_id, principal))
    }

    pub fn principal_weight(env: Env, identity: Address) -> Option<i128> {
        env.storage().persistent().get(&DataKey::Weight(identity))
    }

    pub fn threshold(env: Env) -> Result<i128, Error> {
        Ok(get_config(&env)?.threshold)
    }
}
