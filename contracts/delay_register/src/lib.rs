#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, contractmeta, contracttype, symbol_short, xdr::ToXdr,
    Address, Bytes, BytesN, Env, Symbol, Val, Vec,
};

#[cfg(test)]
mod test;

contractmeta!(
    key = "Description",
    val = "Delayed-execution register: queued calls run only after a minimum delay"
);

/// Window after eta during which a queued action may still run.
pub const GRACE_PERIOD: u64 = 14 * 24 * 60 * 60;

/// Upper bound on the configurable minimum delay.
pub const MAX_DELAY: u64 = 30 * 24 * 60 * 60;

#[derive(Clone)]
#[contracttype]
pub struct QueuedAction {
    pub target: Address,
    pub func: Symbol,
    pub args: Vec<Val>,
    pub eta: u64,
}

#[contracttype]
pub enum DataKey {
    MinDelay,
    Controller,
    Action(BytesN<32>),
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 60,
    NotInitialized = 61,
    AlreadyBound = 62,
    Unauthorized = 63,
    InsufficientDelay = 64,
    NotSurpassedDelay = 65,
    StaleAction = 66,
    NotQueued = 67,
    SubcallReverted = 68,
    InvalidDelay = 69,
    Overflow = 70,
}

#[contract]
pub struct DelayRegister;

/// Identifier is the digest of the full (target, func, args, eta) tuple, so
/// the same call queued for two different etas is two distinct actions.
fn action_id(env: &Env, target: &Address, func: &Symbol, args: &Vec<Val>, eta: u64) -> BytesN<32> {
    let mut payload = Bytes::new(env);
    payload.append(&target.clone().to_xdr(env));
    payload.append(&func.clone().to_xdr(env));
    payload.append(&args.clone().to_xdr(env));
    payload.append(&eta.to_xdr(env));
    env.crypto().sha256(&payload).into()
}

fn require_controller(env: &Env, caller: &Address) -> Result<(), Error> {
    caller.require_auth();
    let controller: Address = env
        .storage()
        .instance()
        .get(&DataKey::Controller)
        .ok_or(Error::Unauthorized)?;
    if caller != &controller {
        return Err(Error::Unauthorized);
    }
    Ok(())
}

#[contractimpl]
impl DelayRegister {
    pub fn initialize(env: Env, min_delay: u64) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::MinDelay) {
            return Err(Error::AlreadyInitialized);
        }
        if min_delay > MAX_DELAY {
            return Err(Error::InvalidDelay);
        }
        env.storage().instance().set(&DataKey::MinDelay, &min_delay);
        Ok(())
    }

    /// One-time binding of the sole identity allowed to queue and execute.
    pub fn set_controller(env: Env, controller: Address) -> Result<(), Error> {
        if !env.storage().instance().has(&DataKey::MinDelay) {
            return Err(Error::NotInitialized);
        }
        if env.storage().instance().has(&DataKey::Controller) {
            return Err(Error::AlreadyBound);
        }
        env.storage()
            .instance()
            .set(&DataKey::Controller, &controller);

        env.events()
            .publish((symbol_short!("CtrlBound"),), controller);
        Ok(())
    }

    pub fn queue_action(
        env: Env,
        caller: Address,
        target: Address,
        func: Symbol,
        args: Vec<Val>,
        eta: u64,
    ) -> Result<BytesN<32>, Error> {
        require_controller(&env, &caller)?;
        let min_delay: u64 = env
            .storage()
            .instance()
            .get(&DataKey::MinDelay)
            .ok_or(Error::NotInitialized)?;

        let earliest = env
            .ledger()
            .timestamp()
            .checked_add(min_delay)
            .ok_or(Error::Overflow)?;
        if eta < earliest {
            return Err(Error::InsufficientDelay);
        }

        let id = action_id(&env, &target, &func, &args, eta);
        let action = QueuedAction {
            target: target.clone(),
            func,
            args,
            eta,
        };
        env.storage()
            .persistent()
            .set(&DataKey::Action(id.clone()), &action);

        env.events()
            .publish((symbol_short!("ActQueue"), id.clone()), (target, eta));
        Ok(id)
    }

    pub fn execute_action(
        env: Env,
        caller: Address,
        target: Address,
        func: Symbol,
        args: Vec<Val>,
        eta: u64,
    ) -> Result<(), Error> {
        require_controller(&env, &caller)?;

        let id = action_id(&env, &target, &func, &args, eta);
        let key = DataKey::Action(id.clone());
        let action: QueuedAction = env
            .storage()
            .persistent()
            .get(&key)
            .ok_or(Error::NotQueued)?;

        let now = env.ledger().timestamp();
        if now < action.eta {
            return Err(Error::NotSurpassedDelay);
        }
        if now > action.eta.saturating_add(GRACE_PERIOD) {
            return Err(Error::StaleAction);
        }

        // Consume the entry before the external call so a reentrant
        // invocation cannot re-trigger the same action.
        env.storage().persistent().remove(&key);

        let result = env.try_invoke_contract::<Val, soroban_sdk::Error>(
            &action.target,
            &action.func,
            action.args.clone(),
        );
        if result.is_err() {
            return Err(Error::SubcallReverted);
        }

        env.events()
            .publish((symbol_short!("ActExec"), id), (target, eta));
        Ok(())
    }

    pub fn min_delay(env: Env) -> Result<u64, Error> {
        env.storage()
            .instance()
            .get(&DataKey::MinDelay)
            .ok_or(Error::NotInitialized)
    }

    pub fn grace_period(_env: Env) -> u64 {
        GRACE_PERIOD
    }

    pub fn controller(env: Env) -> Option<Address> {
        env.storage().instance().get(&DataKey::Controller)
    }

    pub fn is_queued(env: Env, id: BytesN<32>) -> bool {
        env.storage().persistent().has(&DataKey::Action(id))
    }
}
