#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env};

use crate::CashbackConfig;

// ── Event payloads ──────────────────────────────────────────────────────────

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub config: CashbackConfig,
    pub timestamp: u64,
}

/// Fired when an admin tops up or drains the payout reserve.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LiquidityChangedEvent {
    pub admin: Address,
    pub added: i128,
    pub removed: i128,
    pub new_liquidity: i128,
    pub timestamp: u64,
}

/// Fired when a purchase credits cashback to a user's window.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DistributedEvent {
    pub user: Address,
    pub tier: u32,
    pub purchase_token_value: i128,
    pub credited_usd: i128,
    pub window_start: u64,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClaimedEvent {
    pub user: Address,
    pub usd: i128,
    pub amount: i128,
    pub timestamp: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(env: &Env, config: CashbackConfig) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            config,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_liquidity_changed(
    env: &Env,
    admin: Address,
    added: i128,
    removed: i128,
    new_liquidity: i128,
) {
    env.events().publish(
        (symbol_short!("LIQ_CHG"), admin.clone()),
        LiquidityChangedEvent {
            admin,
            added,
            removed,
            new_liquidity,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_distributed(
    env: &Env,
    user: Address,
    tier: u32,
    purchase_token_value: i128,
    credited_usd: i128,
    window_start: u64,
) {
    env.events().publish(
        (symbol_short!("DISTRIB"), user.clone()),
        DistributedEvent {
            user,
            tier,
            purchase_token_value,
            credited_usd,
            window_start,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_claimed(env: &Env, user: Address, usd: i128, amount: i128) {
    env.events().publish(
        (symbol_short!("CLAIMED"), user.clone()),
        ClaimedEvent {
            user,
            usd,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}
