#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env, Vec};

/// Fired once when the panel is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub root_admin: Address,
    pub timestamp: u64,
}

/// Fired when the root admin edits the delegated admin list.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdminListUpdatedEvent {
    pub root_admin: Address,
    pub added: Vec<Address>,
    pub removed: Vec<Address>,
    pub timestamp: u64,
}

/// Fired when the root role changes hands.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RootAdminChangedEvent {
    pub old_root: Address,
    pub new_root: Address,
    pub timestamp: u64,
}

pub fn publish_initialized(env: &Env, root_admin: Address) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            root_admin,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_admin_list_updated(
    env: &Env,
    root_admin: Address,
    added: Vec<Address>,
    removed: Vec<Address>,
) {
    env.events().publish(
        (symbol_short!("ADM_UPD"), root_admin.clone()),
        AdminListUpdatedEvent {
            root_admin,
            added,
            removed,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_root_admin_changed(env: &Env, old_root: Address, new_root: Address) {
    env.events().publish(
        (symbol_short!("ROOT_SET"), new_root.clone()),
        RootAdminChangedEvent {
            old_root,
            new_root,
            timestamp: env.ledger().timestamp(),
        },
    );
}
