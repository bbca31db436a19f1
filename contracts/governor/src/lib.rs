#![no_std]
#![allow(clippy::too_many_arguments)]

//! Proposal lifecycle state machine. This crate is stateless: every
//! operation runs against the storage of whichever contract invokes it
//! (the persistent proxy), through the layout declared in [`layout`].

pub mod interface;
pub mod layout;
pub mod types;

use soroban_sdk::{contracterror, symbol_short, Address, Env, Symbol, Val, Vec};

use interface::{ApprovalsClient, DelayClient, TokenClient};
use types::{GovernorConfig, Proposal, ProposalAction, ProposalState, Receipt, SnapshotMode};

/// Version of the operation surface this logic implements. Recorded by the
/// proxy at initialization and on every upgrade.
pub const INTERFACE_VERSION: u32 = 1;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    ProposalNotFound = 3,
    EmptyProposal = 4,
    InvalidState = 5,
    AlreadyVoted = 6,
    Unauthorized = 7,
    NotSurpassedDelay = 8,
    Overflow = 9,
}

pub fn init_storage(env: &Env, config: GovernorConfig) -> Result<(), Error> {
    if layout::has_config(env) {
        return Err(Error::AlreadyInitialized);
    }
    layout::set_config(env, &config);
    layout::set_proposal_count(env, 0);
    Ok(())
}

pub fn config(env: &Env) -> Result<GovernorConfig, Error> {
    layout::get_config(env).ok_or(Error::NotInitialized)
}

pub fn create_proposal(
    env: &Env,
    proposer: Address,
    targets: Vec<Address>,
    funcs: Vec<Symbol>,
    arg_lists: Vec<Vec<Val>>,
) -> Result<u64, Error> {
    proposer.require_auth();
    let cfg = config(env)?;

    if targets.is_empty() || targets.len() != funcs.len() || targets.len() != arg_lists.len() {
        return Err(Error::EmptyProposal);
    }

    let id = layout::proposal_count(env)
        .checked_add(1)
        .ok_or(Error::Overflow)?;
    let start_block = env
        .ledger()
        .sequence()
        .checked_add(cfg.voting_delay)
        .ok_or(Error::Overflow)?;
    let end_block = start_block
        .checked_add(cfg.voting_period)
        .ok_or(Error::Overflow)?;

    let mut actions: Vec<ProposalAction> = Vec::new(env);
    for i in 0..targets.len() {
        actions.push_back(ProposalAction {
            target: targets.get_unchecked(i),
            func: funcs.get_unchecked(i),
            args: arg_lists.get_unchecked(i),
        });
    }

    let proposal = Proposal {
        id,
        proposer: proposer.clone(),
        actions: actions.clone(),
        start_block,
        end_block,
        for_votes: 0,
        against_votes: 0,
        eta: 0,
        canceled: false,
        queued: false,
        executed: false,
    };
    layout::set_proposal(env, &proposal);
    layout::set_proposal_count(env, id);

    env.events().publish(
        (symbol_short!("Propose"), id),
        (proposer, actions, start_block, end_block),
    );
    Ok(id)
}

pub fn cast_vote(env: &Env, voter: Address, proposal_id: u64, support: bool) -> Result<(), Error> {
    voter.require_auth();
    let cfg = config(env)?;
    let mut p = layout::get_proposal(env, proposal_id).ok_or(Error::ProposalNotFound)?;

    if resolve_state(env, &cfg, &p)? != ProposalState::Active {
        return Err(Error::InvalidState);
    }
    let seq = env.ledger().sequence();
    if seq < p.start_block || seq > p.end_block {
        return Err(Error::InvalidState);
    }
    if layout::get_receipt(env, proposal_id, &voter).is_some() {
        return Err(Error::AlreadyVoted);
    }

    let token = TokenClient::new(env, &cfg.token);
    let weight: i128 = match cfg.snapshot_mode {
        SnapshotMode::ProposalStart => token.get_prior_votes(&voter, &p.start_block),
        SnapshotMode::VoteTime => token.get_current_votes(&voter),
    };

    if support {
        p.for_votes = p.for_votes.checked_add(weight).ok_or(Error::Overflow)?;
    } else {
        p.against_votes = p.against_votes.checked_add(weight).ok_or(Error::Overflow)?;
    }
    layout::set_receipt(env, proposal_id, &voter, &Receipt { support, weight });
    layout::set_proposal(env, &p);

    env.events().publish(
        (symbol_short!("Vote"), proposal_id),
        (voter, support, weight),
    );
    Ok(())
}

/// Lazily resolved lifecycle state. Tally outcomes (`Defeated`, `NoQuorum`,
/// `Succeeded`) only exist after the voting window closes; a quorum-failed
/// proposal reports `Succeeded` once the approval registry reaches its
/// threshold for it.
fn resolve_state(env: &Env, cfg: &GovernorConfig, p: &Proposal) -> Result<ProposalState, Error> {
    if p.canceled {
        return Ok(ProposalState::Canceled);
    }
    if p.executed {
        return Ok(ProposalState::Executed);
    }
    if p.queued {
        let grace = DelayClient::new(env, &cfg.delay_register).grace_period();
        if env.ledger().timestamp() > p.eta.saturating_add(grace) {
            return Ok(ProposalState::Expired);
        }
        return Ok(ProposalState::Queued);
    }
    if env.ledger().sequence() <= p.end_block {
        return Ok(ProposalState::Active);
    }

    if p.for_votes <= p.against_votes {
        return Ok(ProposalState::Defeated);
    }
    // Quorum counts all votes cast, not only affirmative ones.
    let total = p
        .for_votes
        .checked_add(p.against_votes)
        .ok_or(Error::Overflow)?;
    if total < cfg.quorum {
        let approvals = ApprovalsClient::new(env, &cfg.approval_registry);
        if approvals.has_reached_threshold(&p.id) {
            return Ok(ProposalState::Succeeded);
        }
        return Ok(ProposalState::NoQuorum);
    }
    Ok(ProposalState::Succeeded)
}

pub fn proposal_state(env: &Env, proposal_id: u64) -> Result<ProposalState, Error> {
    let cfg = config(env)?;
    let p = layout::get_proposal(env, proposal_id).ok_or(Error::ProposalNotFound)?;
    resolve_state(env, &cfg, &p)
}

pub fn queue_proposal(env: &Env, proposal_id: u64) -> Result<(), Error> {
    let cfg = config(env)?;
    let mut p = layout::get_proposal(env, proposal_id).ok_or(Error::ProposalNotFound)?;

    if resolve_state(env, &cfg, &p)? != ProposalState::Succeeded {
        return Err(Error::InvalidState);
    }

    let delay = DelayClient::new(env, &cfg.delay_register);
    let eta = env
        .ledger()
        .timestamp()
        .checked_add(delay.min_delay())
        .ok_or(Error::Overflow)?;

    let controller = env.current_contract_address();
    for action in p.actions.iter() {
        delay.queue_action(&controller, &action.target, &action.func, &action.args, &eta);
    }

    p.eta = eta;
    p.queued = true;
    layout::set_proposal(env, &p);

    env.events().publish((symbol_short!("Queue"), proposal_id), eta);
    Ok(())
}

pub fn execute_proposal(env: &Env, proposal_id: u64) -> Result<(), Error> {
    let cfg = config(env)?;
    let mut p = layout::get_proposal(env, proposal_id).ok_or(Error::ProposalNotFound)?;

    if resolve_state(env, &cfg, &p)? != ProposalState::Queued {
        return Err(Error::InvalidState);
    }
    if env.ledger().timestamp() < p.eta {
        return Err(Error::NotSurpassedDelay);
    }

    // Terminal flag goes down before the external calls; a reentrant
    // invocation sees an executed proposal. Any failed action aborts the
    // whole frame, taking this write with it.
    p.executed = true;
    layout::set_proposal(env, &p);

    let delay = DelayClient::new(env, &cfg.delay_register);
    let controller = env.current_contract_address();
    for action in p.actions.iter() {
        delay.execute_action(&controller, &action.target, &action.func, &action.args, &p.eta);
    }

    env.events().publish((symbol_short!("Execute"), proposal_id), ());
    Ok(())
}

pub fn cancel(env: &Env, caller: Address, proposal_id: u64) -> Result<(), Error> {
    caller.require_auth();
    let cfg = config(env)?;
    let mut p = layout::get_proposal(env, proposal_id).ok_or(Error::ProposalNotFound)?;

    if caller != p.proposer && caller != cfg.admin {
        return Err(Error::Unauthorized);
    }
    if p.queued || p.executed || p.canceled {
        return Err(Error::InvalidState);
    }

    p.canceled = true;
    layout::set_proposal(env, &p);

    env.events().publish((symbol_short!("Cancel"), proposal_id), ());
    Ok(())
}

pub fn get_proposal(env: &Env, proposal_id: u64) -> Result<Proposal, Error> {
    layout::get_proposal(env, proposal_id).ok_or(Error::ProposalNotFound)
}

pub fn get_actions(env: &Env, proposal_id: u64) -> Result<Vec<ProposalAction>, Error> {
    Ok(get_proposal(env, proposal_id)?.actions)
}

pub fn get_receipt(env: &Env, proposal_id: u64, voter: &Address) -> Option<Receipt> {
    layout::get_receipt(env, proposal_id, voter)
}

pub fn proposal_count(env: &Env) -> u64 {
    layout::proposal_count(env)
}
