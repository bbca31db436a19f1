#![allow(clippy::unwrap_used)]

use crate::contract::{Error, VoteToken, VoteTokenClient};
use soroban_sdk::testutils::{Address as _, Ledger};
use soroban_sdk::{Address, Env, String};

fn setup(env: &Env, supply: i128) -> (VoteTokenClient, Address) {
    env.mock_all_auths();
    env.ledger().set_sequence_number(100);

    let contract_id = env.register_contract(None, VoteToken);
    let client = VoteTokenClient::new(env, &contract_id);

    let admin = Address::generate(env);
    client.initialize(
        &admin,
        &supply,
        &7,
        &String::from_str(env, "Governance Token"),
        &String::from_str(env, "GOV"),
    );
    (client, admin)
}

fn advance_blocks(env: &Env, n: u32) {
    env.ledger().with_mut(|l| l.sequence_number += n);
}

#[test]
fn initialize_is_one_shot() {
    let env = Env::default();
    let (client, admin) = setup(&env, 10_000);

    let res = client.try_initialize(
        &admin,
        &1,
        &7,
        &String::from_str(&env, "Other"),
        &String::from_str(&env, "OTH"),
    );
    assert_eq!(res, Err(Ok(Error::AlreadyInitialized)));
}

#[test]
fn transfer_and_self_delegate() {
    let env = Env::default();
    let (client, admin) = setup(&env, 10_000);

    let v1 = Address::generate(&env);
    let v2 = Address::generate(&env);

    client.transfer(&admin, &v1, &20);
    client.transfer(&admin, &v2, &31);

    assert_eq!(client.balance_of(&admin), 9_949);
    assert_eq!(client.balance_of(&v1), 20);
    assert_eq!(client.balance_of(&v2), 31);

    // No delegation yet, so no voting power anywhere.
    assert_eq!(client.get_current_votes(&v1), 0);

    client.delegate(&v1, &v1);
    client.delegate(&v2, &v2);
    assert_eq!(client.get_current_votes(&v1), 20);
    assert_eq!(client.get_current_votes(&v2), 31);

    // Conservation: balances always sum to the fixed supply.
    let sum = client.balance_of(&admin) + client.balance_of(&v1) + client.balance_of(&v2);
    assert_eq!(sum, client.total_supply());
}

#[test]
fn transfer_rejects_insufficient_balance() {
    let env = Env::default();
    let (client, _admin) = setup(&env, 100);

    let poor = Address::generate(&env);
    let other = Address::generate(&env);
    let res = client.try_transfer(&poor, &other, &1);
    assert_eq!(res, Err(Ok(Error::InsufficientBalance)));
}

#[test]
fn transfer_moves_delegated_power() {
    let env = Env::default();
    let (client, admin) = setup(&env, 1_000);

    let v1 = Address::generate(&env);
    let rep = Address::generate(&env);

    client.transfer(&admin, &v1, &400);
    client.delegate(&v1, &rep);
    assert_eq!(client.get_current_votes(&rep), 400);
    assert_eq!(client.get_current_votes(&v1), 0);

    // Sending tokens away from v1 reduces the representative's power.
    advance_blocks(&env, 1);
    let v2 = Address::generate(&env);
    client.transfer(&v1, &v2, &150);
    assert_eq!(client.get_current_votes(&rep), 250);

    // Redelegating moves the remaining weight in full.
    advance_blocks(&env, 1);
    client.delegate(&v1, &v1);
    assert_eq!(client.get_current_votes(&rep), 0);
    assert_eq!(client.get_current_votes(&v1), 250);
}

#[test]
fn same_block_checkpoints_collapse() {
    let env = Env::default();
    let (client, admin) = setup(&env, 1_000);

    let v1 = Address::generate(&env);
    client.delegate(&v1, &v1);

    // Two transfers within one ledger must leave a single checkpoint
    // holding the final power.
    client.transfer(&admin, &v1, &10);
    client.transfer(&admin, &v1, &5);

    assert_eq!(client.num_checkpoints(&v1), 1);
    let cp = client.checkpoints(&v1, &0);
    assert_eq!(cp.from_block, 100);
    assert_eq!(cp.votes, 15);

    assert_eq!(client.try_checkpoints(&v1, &1), Err(Ok(Error::IndexOutOfBounds)));
}

#[test]
fn prior_votes_walks_checkpoint_history() {
    let env = Env::default();
    let (client, admin) = setup(&env, 1_000);

    let v1 = Address::generate(&env);
    client.delegate(&v1, &v1);

    // seq 100: power 10
    client.transfer(&admin, &v1, &10);
    advance_blocks(&env, 5);
    // seq 105: power 40
    client.transfer(&admin, &v1, &30);
    advance_blocks(&env, 5);
    // seq 110: power 25
    client.transfer(&v1, &admin, &15);
    advance_blocks(&env, 1);

    assert_eq!(client.num_checkpoints(&v1), 3);
    assert_eq!(client.get_prior_votes(&v1, &99), 0);
    assert_eq!(client.get_prior_votes(&v1, &100), 10);
    assert_eq!(client.get_prior_votes(&v1, &104), 10);
    assert_eq!(client.get_prior_votes(&v1, &105), 40);
    assert_eq!(client.get_prior_votes(&v1, &109), 40);
    assert_eq!(client.get_prior_votes(&v1, &110), 25);

    // Current and future blocks are not queryable.
    let res = client.try_get_prior_votes(&v1, &111);
    assert_eq!(res, Err(Ok(Error::FutureBlock)));
    let res = client.try_get_prior_votes(&v1, &200);
    assert_eq!(res, Err(Ok(Error::FutureBlock)));
}

#[test]
fn checkpoint_blocks_strictly_increase() {
    let env = Env::default();
    let (client, admin) = setup(&env, 1_000);

    let v1 = Address::generate(&env);
    client.delegate(&v1, &v1);
    for i in 0..4u32 {
        client.transfer(&admin, &v1, &(i as i128 + 1));
        advance_blocks(&env, 3);
    }

    let n = client.num_checkpoints(&v1);
    assert_eq!(n, 4);
    let mut last_block = 0u32;
    for i in 0..n {
        let cp = client.checkpoints(&v1, &i);
        assert!(cp.from_block > last_block || i == 0);
        last_block = cp.from_block;
    }
}
