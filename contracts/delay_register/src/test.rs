#![allow(clippy::unwrap_used)]

use crate::{DelayRegister, DelayRegisterClient, Error, GRACE_PERIOD, MAX_DELAY};
use soroban_sdk::testutils::{Address as _, Ledger};
use soroban_sdk::{
    contract, contracterror, contractimpl, symbol_short, vec, Address, Env, Symbol, Val, Vec,
};

// Target used to observe executions. `ping` bumps a counter, `boom` fails.
#[contract]
pub struct MockTarget;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum MockError {
    Boom = 1,
}

#[contractimpl]
impl MockTarget {
    pub fn ping(env: Env) {
        let count: u32 = env
            .storage()
            .instance()
            .get(&symbol_short!("count"))
            .unwrap_or(0);
        env.storage()
            .instance()
            .set(&symbol_short!("count"), &(count + 1));
    }

    pub fn count(env: Env) -> u32 {
        env.storage()
            .instance()
            .get(&symbol_short!("count"))
            .unwrap_or(0)
    }

    pub fn boom(_env: Env) -> Result<(), MockError> {
        Err(MockError::Boom)
    }
}

struct Setup {
    env: Env,
    client: DelayRegisterClient<'static>,
    controller: Address,
    target: Address,
}

const MIN_DELAY: u64 = 100;

fn setup() -> Setup {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(1_000_000);

    let contract_id = env.register_contract(None, DelayRegister);
    let client = DelayRegisterClient::new(&env, &contract_id);
    client.initialize(&MIN_DELAY);

    let controller = Address::generate(&env);
    client.set_controller(&controller);

    let target = env.register_contract(None, MockTarget);

    Setup {
        env,
        client,
        controller,
        target,
    }
}

fn no_args(env: &Env) -> Vec<Val> {
    vec![env]
}

#[test]
fn initialize_and_bind_are_one_shot() {
    let s = setup();
    assert_eq!(s.client.try_initialize(&50), Err(Ok(Error::AlreadyInitialized)));

    let other = Address::generate(&s.env);
    assert_eq!(
        s.client.try_set_controller(&other),
        Err(Ok(Error::AlreadyBound))
    );
    assert_eq!(s.client.controller(), Some(s.controller.clone()));
}

#[test]
fn initialize_rejects_excessive_delay() {
    let env = Env::default();
    let contract_id = env.register_contract(None, DelayRegister);
    let client = DelayRegisterClient::new(&env, &contract_id);
    assert_eq!(
        client.try_initialize(&(MAX_DELAY + 1)),
        Err(Ok(Error::InvalidDelay))
    );
    // Binding before initialization has nothing to guard.
    let controller = Address::generate(&env);
    assert_eq!(
        client.try_set_controller(&controller),
        Err(Ok(Error::NotInitialized))
    );
}

#[test]
fn only_controller_queues_and_executes() {
    let s = setup();
    let outsider = Address::generate(&s.env);
    let func = Symbol::new(&s.env, "ping");
    let eta = s.env.ledger().timestamp() + MIN_DELAY;

    let res = s
        .client
        .try_queue_action(&outsider, &s.target, &func, &no_args(&s.env), &eta);
    assert_eq!(res, Err(Ok(Error::Unauthorized)));

    s.client
        .queue_action(&s.controller, &s.target, &func, &no_args(&s.env), &eta);
    let res = s
        .client
        .try_execute_action(&outsider, &s.target, &func, &no_args(&s.env), &eta);
    assert_eq!(res, Err(Ok(Error::Unauthorized)));
}

#[test]
fn queue_requires_minimum_delay() {
    let s = setup();
    let func = Symbol::new(&s.env, "ping");
    let eta = s.env.ledger().timestamp() + MIN_DELAY - 1;

    let res = s
        .client
        .try_queue_action(&s.controller, &s.target, &func, &no_args(&s.env), &eta);
    assert_eq!(res, Err(Ok(Error::InsufficientDelay)));
}

#[test]
fn execute_respects_delay_and_grace_window() {
    let s = setup();
    let func = Symbol::new(&s.env, "ping");
    let eta = s.env.ledger().timestamp() + MIN_DELAY;

    let id = s
        .client
        .queue_action(&s.controller, &s.target, &func, &no_args(&s.env), &eta);
    assert!(s.client.is_queued(&id));

    // Before eta.
    let res = s
        .client
        .try_execute_action(&s.controller, &s.target, &func, &no_args(&s.env), &eta);
    assert_eq!(res, Err(Ok(Error::NotSurpassedDelay)));

    // At eta the call goes through and the action is consumed.
    s.env.ledger().set_timestamp(eta);
    s.client
        .execute_action(&s.controller, &s.target, &func, &no_args(&s.env), &eta);

    let target_client = MockTargetClient::new(&s.env, &s.target);
    assert_eq!(target_client.count(), 1);
    assert!(!s.client.is_queued(&id));

    // Never re-executable.
    let res = s
        .client
        .try_execute_action(&s.controller, &s.target, &func, &no_args(&s.env), &eta);
    assert_eq!(res, Err(Ok(Error::NotQueued)));
}

#[test]
fn stale_actions_are_rejected() {
    let s = setup();
    let func = Symbol::new(&s.env, "ping");
    let eta = s.env.ledger().timestamp() + MIN_DELAY;

    s.client
        .queue_action(&s.controller, &s.target, &func, &no_args(&s.env), &eta);

    s.env.ledger().set_timestamp(eta + GRACE_PERIOD + 1);
    let res = s
        .client
        .try_execute_action(&s.controller, &s.target, &func, &no_args(&s.env), &eta);
    assert_eq!(res, Err(Ok(Error::StaleAction)));
}

#[test]
fn unqueued_action_cannot_execute() {
    let s = setup();
    let func = Symbol::new(&s.env, "ping");
    let eta = s.env.ledger().timestamp() + MIN_DELAY;

    s.env.ledger().set_timestamp(eta);
    let res = s
        .client
        .try_execute_action(&s.controller, &s.target, &func, &no_args(&s.env), &eta);
    assert_eq!(res, Err(Ok(Error::NotQueued)));
}

#[test]
fn failed_subcall_aborts_and_preserves_queue_entry() {
    let s = setup();
    let func = Symbol::new(&s.env, "boom");
    let eta = s.env.ledger().timestamp() + MIN_DELAY;

    let id = s
        .client
        .queue_action(&s.controller, &s.target, &func, &no_args(&s.env), &eta);

    s.env.ledger().set_timestamp(eta);
    let res = s
        .client
        .try_execute_action(&s.controller, &s.target, &func, &no_args(&s.env), &eta);
    assert_eq!(res, Err(Ok(Error::SubcallReverted)));

    // The whole frame rolled back, so the action is still queued.
    assert!(s.client.is_queued(&id));
}

#[test]
fn identifiers_are_per_eta() {
    let s = setup();
    let func = Symbol::new(&s.env, "ping");
    let now = s.env.ledger().timestamp();

    let id_a = s
        .client
        .queue_action(&s.controller, &s.target, &func, &no_args(&s.env), &(now + MIN_DELAY));
    let id_b = s
        .client
        .queue_action(&s.controller, &s.target, &func, &no_args(&s.env), &(now + MIN_DELAY + 1));
    assert_ne!(id_a, id_b);
    assert!(s.client.is_queued(&id_a));
    assert!(s.client.is_queued(&id_b));
}
