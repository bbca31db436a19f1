use soroban_sdk::{
    contract, contracterror, contractimpl, contractmeta, symbol_short, Address, Env, String,
};

use crate::storage;
use crate::types::{Checkpoint, TokenMetadata};

contractmeta!(
    key = "Description",
    val = "Governance token with delegation and historical voting-power checkpoints"
);

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 20,
    NotInitialized = 21,
    InsufficientBalance = 22,
    FutureBlock = 23,
    InvalidAmount = 24,
    IndexOutOfBounds = 25,
    Overflow = 26,
}

#[contract]
pub struct VoteToken;

fn current_votes(env: &Env, account: &Address) -> i128 {
    let cps = storage::checkpoints_of(env, account);
    match cps.len() {
        0 => 0,
        n => cps.get_unchecked(n - 1).votes,
    }
}

/// Appends a checkpoint at the current sequence, or overwrites the last one
/// if it was written in the same ledger (at most one checkpoint per block).
fn write_checkpoint(env: &Env, delegate: &Address, new_votes: i128) {
    let seq = env.ledger().sequence();
    let mut cps = storage::checkpoints_of(env, delegate);
    let n = cps.len();
    let prev_votes = match n {
        0 => 0,
        _ => cps.get_unchecked(n - 1).votes,
    };

    if n > 0 {
        let mut last = cps.get_unchecked(n - 1);
        if last.from_block == seq {
            last.votes = new_votes;
            cps.set(n - 1, last);
            storage::set_checkpoints(env, delegate, &cps);
            env.events()
                .publish((symbol_short!("DelVotes"), delegate.clone()), (prev_votes, new_votes));
            return;
        }
    }

    cps.push_back(Checkpoint {
        from_block: seq,
        votes: new_votes,
    });
    storage::set_checkpoints(env, delegate, &cps);
    env.events()
        .publish((symbol_short!("DelVotes"), delegate.clone()), (prev_votes, new_votes));
}

/// Moves `amount` of voting power between two (optional) delegates,
/// skipping any side whose power does not change.
fn move_delegates(
    env: &Env,
    from: Option<Address>,
    to: Option<Address>,
    amount: i128,
) -> Result<(), Error> {
    if amount == 0 || from == to {
        return Ok(());
    }
    if let Some(src) = from {
        let prev = current_votes(env, &src);
        let next = prev.checked_sub(amount).ok_or(Error::Overflow)?;
        write_checkpoint(env, &src, next);
    }
    if let Some(dst) = to {
        let prev = current_votes(env, &dst);
        let next = prev.checked_add(amount).ok_or(Error::Overflow)?;
        write_checkpoint(env, &dst, next);
    }
    Ok(())
}

#[contractimpl]
impl VoteToken {
    /// Mints the full fixed supply to `admin`. Callable once.
    pub fn initialize(
        env: Env,
        admin: Address,
        total_supply: i128,
        decimal: u32,
        name: String,
        symbol: String,
    ) -> Result<(), Error> {
        if storage::has_admin(&env) {
            return Err(Error::AlreadyInitialized);
        }
        if total_supply < 0 {
            return Err(Error::InvalidAmount);
        }
        storage::set_admin(&env, &admin);
        storage::set_metadata(
            &env,
            &TokenMetadata {
                decimal,
                name,
                symbol,
            },
        );
        storage::set_total_supply(&env, total_supply);
        storage::set_balance(&env, &admin, total_supply);

        env.events()
            .publish((symbol_short!("init"),), (admin, total_supply));
        Ok(())
    }

    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) -> Result<(), Error> {
        from.require_auth();
        if amount < 0 {
            return Err(Error::InvalidAmount);
        }
        let from_balance = storage::balance(&env, &from);
        if amount > from_balance {
            return Err(Error::InsufficientBalance);
        }
        storage::set_balance(&env, &from, from_balance - amount);
        let to_balance = storage::balance(&env, &to)
            .checked_add(amount)
            .ok_or(Error::Overflow)?;
        storage::set_balance(&env, &to, to_balance);

        move_delegates(
            &env,
            storage::delegate_of(&env, &from),
            storage::delegate_of(&env, &to),
            amount,
        )?;

        env.events()
            .publish((symbol_short!("Transfer"), from, to), amount);
        Ok(())
    }

    pub fn delegate(env: Env, delegator: Address, to: Address) -> Result<(), Error> {
        delegator.require_auth();
        let old = storage::delegate_of(&env, &delegator);
        storage::set_delegate(&env, &delegator, &to);
        let amount = storage::balance(&env, &delegator);
        move_delegates(&env, old.clone(), Some(to.clone()), amount)?;

        env.events()
            .publish((symbol_short!("Delegate"), delegator), (old, to));
        Ok(())
    }

    pub fn get_current_votes(env: Env, account: Address) -> i128 {
        current_votes(&env, &account)
    }

    /// Voting power of `account` as of `block`. The block must be strictly
    /// in the past so a snapshot cannot be moved within the block it is
    /// read in.
    pub fn get_prior_votes(env: Env, account: Address, block: u32) -> Result<i128, Error> {
        if block >= env.ledger().sequence() {
            return Err(Error::FutureBlock);
        }
        let cps = storage::checkpoints_of(&env, &account);
        let n = cps.len();
        if n == 0 {
            return Ok(0);
        }
        if cps.get_unchecked(n - 1).from_block <= block {
            return Ok(cps.get_unchecked(n - 1).votes);
        }
        if cps.get_unchecked(0).from_block > block {
            return Ok(0);
        }

        let mut lower: u32 = 0;
        let mut upper: u32 = n - 1;
        while upper > lower {
            let center = upper - (upper - lower) / 2;
            let cp = cps.get_unchecked(center);
            if cp.from_block == block {
                return Ok(cp.votes);
            }
            if cp.from_block < block {
                lower = center;
            } else {
                upper = center - 1;
            }
        }
        Ok(cps.get_unchecked(lower).votes)
    }

    pub fn checkpoints(env: Env, account: Address, index: u32) -> Result<Checkpoint, Error> {
        storage::checkpoints_of(&env, &account)
            .get(index)
            .ok_or(Error::IndexOutOfBounds)
    }

    pub fn num_checkpoints(env: Env, account: Address) -> u32 {
        storage::checkpoints_of(&env, &account).len()
    }

    pub fn balance_of(env: Env, account: Address) -> i128 {
        storage::balance(&env, &account)
    }

    pub fn delegate_of(env: Env, account: Address) -> Option<Address> {
        storage::delegate_of(&env, &account)
    }

    pub fn total_supply(env: Env) -> i128 {
        storage::get_total_supply(&env)
    }

    pub fn metadata(env: Env) -> Result<TokenMetadata, Error> {
        storage::get_metadata(&env).ok_or(Error::NotInitialized)
    }
}
