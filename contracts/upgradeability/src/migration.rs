use super::UpgradeError;
use soroban_sdk::Env;

/// Hook for newly installed logic to rewrite state written by an older
/// layout before serving traffic.
pub trait Migratable {
    fn migrate(env: &Env, from_layout: u32) -> Result<(), UpgradeError>;
}

pub fn execute_migration<T: Migratable>(env: &Env, from_layout: u32) -> Result<(), UpgradeError> {
    T::migrate(env, from_layout)
}
