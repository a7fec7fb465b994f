#![no_std]

pub mod events;

use common::ttl;
use soroban_sdk::{contract, contractimpl, symbol_short, Address, Env, Symbol, Vec};

// ── Storage key constants ────────────────────────────────────────────────────

const ROOT_ADMIN: Symbol = symbol_short!("ROOT");
const ADMIN_LIST: Symbol = symbol_short!("ADM_LIST");

// Per-admin persistent flag:  (prefix, admin_address)
const ADMIN_FLAG: Symbol = symbol_short!("ADM");

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    PermissionDenied = 3,
    InvalidInput = 4,
}

// ── Contract ─────────────────────────────────────────────────────────────────

/// Permission registry shared by every engine.
///
/// Holds one root admin and a list of delegated admins. Only the root admin
/// may edit the list or hand over the root role.
#[contract]
pub struct AdminPanelContract;

#[contractimpl]
impl AdminPanelContract {
    pub fn initialize(env: Env, root_admin: Address) -> Result<(), ContractError> {
        if env.storage().instance().has(&ROOT_ADMIN) {
            return Err(ContractError::AlreadyInitialized);
        }

        env.storage().instance().set(&ROOT_ADMIN, &root_admin);
        ttl::extend_instance(&env);

        events::publish_initialized(&env, root_admin);

        Ok(())
    }

    // ── Views ───────────────────────────────────────────────────────────────

    /// The root admin always counts as an admin.
    pub fn is_admin(env: Env, account: Address) -> bool {
        let root: Option<Address> = env.storage().instance().get(&ROOT_ADMIN);
        if root.as_ref() == Some(&account) {
            return true;
        }
        env.storage()
            .persistent()
            .get(&(ADMIN_FLAG, account))
            .unwrap_or(false)
    }

    pub fn root_admin(env: Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&ROOT_ADMIN)
            .ok_or(ContractError::NotInitialized)
    }

    /// Delegated admins in the order they were added. The root admin is not
    /// listed unless it was also added explicitly.
    pub fn admin_list(env: Env) -> Vec<Address> {
        env.storage()
            .persistent()
            .get(&ADMIN_LIST)
            .unwrap_or(Vec::new(&env))
    }

    // ── Root-only mutations ─────────────────────────────────────────────────

    /// Adds every address in `add`, then removes every address in `remove`.
    /// An address present in both lists ends up removed.
    pub fn update_admin_list(
        env: Env,
        caller: Address,
        add: Vec<Address>,
        remove: Vec<Address>,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        Self::require_root(&env, &caller)?;

        for admin in add.iter() {
            Self::set_flag(&env, &admin, true);
            Self::track_admin(&env, &admin);
        }
        for admin in remove.iter() {
            Self::set_flag(&env, &admin, false);
            Self::untrack_admin(&env, &admin);
        }

        events::publish_admin_list_updated(&env, caller, add, remove);

        Ok(())
    }

    pub fn set_root_admin(
        env: Env,
        caller: Address,
        new_root: Address,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        Self::require_root(&env, &caller)?;

        if new_root == caller {
            return Err(ContractError::InvalidInput);
        }

        env.storage().instance().set(&ROOT_ADMIN, &new_root);
        ttl::extend_instance(&env);

        events::publish_root_admin_changed(&env, caller, new_root);

        Ok(())
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    fn require_root(env: &Env, caller: &Address) -> Result<(), ContractError> {
        let root: Address = env
            .storage()
            .instance()
            .get(&ROOT_ADMIN)
            .ok_or(ContractError::NotInitialized)?;
        if *caller != root {
            return Err(ContractError::PermissionDenied);
        }
        Ok(())
    }

    fn set_flag(env: &Env, admin: &Address, is_admin: bool) {
        let key = (ADMIN_FLAG, admin.clone());
        if is_admin {
            env.storage().persistent().set(&key, &true);
            ttl::extend_persistent(env, &key);
        } else {
            env.storage().persistent().remove(&key);
        }
    }

    fn track_admin(env: &Env, admin: &Address) {
        let mut admins: Vec<Address> = env
            .storage()
            .persistent()
            .get(&ADMIN_LIST)
            .unwrap_or(Vec::new(env));
        if !admins.contains(admin) {
            admins.push_back(admin.clone());
            env.storage().persistent().set(&ADMIN_LIST, &admins);
            ttl::extend_persistent(env, &ADMIN_LIST);
        }
    }

    fn untrack_admin(env: &Env, admin: &Address) {
        let admins: Vec<Address> = env
            .storage()
            .persistent()
            .get(&ADMIN_LIST)
            .unwrap_or(Vec::new(env));
        if let Some(index) = admins.first_index_of(admin) {
            let mut admins = admins;
            admins.remove(index);
            env.storage().persistent().set(&ADMIN_LIST, &admins);
            ttl::extend_persistent(env, &ADMIN_LIST);
        }
    }
}
