//! Typed cross-contract interfaces the state machine is written against.
//! Each is the finite set of operations this logic version relies on; a
//! collaborator only has to keep these entry points stable.

use soroban_sdk::{contractclient, Address, BytesN, Env, Symbol, Val, Vec};

#[contractclient(name = "TokenClient")]
pub trait VotingToken {
    fn get_prior_votes(env: Env, account: Address, block: u32) -> i128;
    fn get_current_votes(env: Env, account: Address) -> i128;
}

#[contractclient(name = "ApprovalsClient")]
pub trait ApprovalSet {
    fn has_reached_threshold(env: Env, proposal_id: u64) -> bool;
}

#[contractclient(name = "DelayClient")]
pub trait DelayedExecution {
    fn queue_action(
        env: Env,
        caller: Address,
        target: Address,
        func: Symbol,
        args: Vec<Val>,
        eta: u64,
    ) -> BytesN<32>;
    fn execute_action(
        env: Env,
        caller: Address,
        target: Address,
        func: Symbol,
        args: Vec<Val>,
        eta: u64,
    );
    fn min_delay(env: Env) -> u64;
    fn grace_period(env: Env) -> u64;
}
