#![no_std]

pub mod events;
pub mod window;

use common::{admin, math, ttl, PriceOracleClient, StakingTierClient, TIER_COUNT};
use soroban_sdk::{
    contract, contractimpl, contracttype, symbol_short, token, Address, Env, Symbol, Vec,
};

// ── Storage key constants ────────────────────────────────────────────────────

const CONFIG: Symbol = symbol_short!("CONFIG");
const LIQUIDITY: Symbol = symbol_short!("LIQUIDITY");
const PENDING_USD: Symbol = symbol_short!("PEND_USD");

// Per-user persistent storage uses tuple keys:  (prefix, user_address)
const WINDOWS: Symbol = symbol_short!("WINDOWS");

/// Unpaid windows a single user may hold before distributions to them stop
/// opening new ones.
pub const MAX_WINDOWS: u32 = 64;

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    PermissionDenied = 3,
    InvalidInput = 4,
    InsufficientReserve = 10,
    WindowLimitReached = 11,
}

// ── Public-facing types ──────────────────────────────────────────────────────

/// Cashback bracket of one staking tier.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CashbackTier {
    /// Share of the purchase's USD value credited, in basis points.
    pub share_bps: u32,
    /// Most USD a single window may accrue.
    pub usd_limit: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CashbackDurations {
    pub distribute_duration: u64,
    pub claim_duration: u64,
}

/// One accrual period of a user.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CashbackWindow {
    pub window_start: u64,
    pub accrued_usd: i128,
    /// Sealed: no further distributions land in this window.
    pub matured: bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CashbackConfig {
    pub admin_panel: Address,
    pub oracle: Address,
    pub token: Address,
    pub staking: Address,
    /// Five entries, index = staking tier.
    pub tiers: Vec<CashbackTier>,
    pub durations: CashbackDurations,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct CashbackContract;

#[contractimpl]
impl CashbackContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the contract.
    ///
    /// * `staking` – tier source; a tier only counts once it is turned on.
    /// * `tiers`   – one bracket per staking tier, tier 0 first.
    pub fn initialize(
        env: Env,
        admin_panel: Address,
        oracle: Address,
        token: Address,
        staking: Address,
        tiers: Vec<CashbackTier>,
        durations: CashbackDurations,
    ) -> Result<(), ContractError> {
        if env.storage().instance().has(&CONFIG) {
            return Err(ContractError::AlreadyInitialized);
        }
        if tiers.len() != TIER_COUNT || durations.distribute_duration == 0 {
            return Err(ContractError::InvalidInput);
        }
        for tier in tiers.iter() {
            if tier.share_bps as i128 > math::BPS_DENOMINATOR || tier.usd_limit < 0 {
                return Err(ContractError::InvalidInput);
            }
        }

        let config = CashbackConfig {
            admin_panel,
            oracle,
            token,
            staking,
            tiers,
            durations,
        };
        env.storage().instance().set(&CONFIG, &config);
        ttl::extend_instance(&env);

        events::publish_initialized(&env, config);

        Ok(())
    }

    // ── Liquidity reserve ───────────────────────────────────────────────────

    /// Move `amount` tokens from the admin into the payout reserve.
    pub fn increase_liqudity(
        env: Env,
        caller: Address,
        amount: i128,
    ) -> Result<i128, ContractError> {
        let config = Self::load_config(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &config, &caller)?;
        if amount <= 0 {
            return Err(ContractError::InvalidInput);
        }

        let liquidity = Self::liqudity(env.clone())
            .checked_add(amount)
            .ok_or(ContractError::InvalidInput)?;
        token::Client::new(&env, &config.token).transfer(
            &caller,
            &env.current_contract_address(),
            &amount,
        );
        env.storage().instance().set(&LIQUIDITY, &liquidity);
        ttl::extend_instance(&env);

        events::publish_liquidity_changed(&env, caller, amount, 0, liquidity);

        Ok(liquidity)
    }

    /// Return `amount` tokens from the reserve to the admin.
    ///
    /// The reserve may not drop below what the unpaid windows are worth at
    /// the current oracle ratio.
    pub fn decrease_liqudity(
        env: Env,
        caller: Address,
        amount: i128,
    ) -> Result<i128, ContractError> {
        let config = Self::load_config(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &config, &caller)?;
        if amount <= 0 {
            return Err(ContractError::InvalidInput);
        }

        let liquidity = Self::liqudity(env.clone());
        if amount > liquidity {
            return Err(ContractError::InsufficientReserve);
        }
        let remaining = liquidity - amount;
        if remaining < Self::liability(&env, &config) {
            return Err(ContractError::InsufficientReserve);
        }

        env.storage().instance().set(&LIQUIDITY, &remaining);
        ttl::extend_instance(&env);
        token::Client::new(&env, &config.token).transfer(
            &env.current_contract_address(),
            &caller,
            &amount,
        );

        events::publish_liquidity_changed(&env, caller, 0, amount, remaining);

        Ok(remaining)
    }

    pub fn liqudity(env: Env) -> i128 {
        env.storage().instance().get(&LIQUIDITY).unwrap_or(0)
    }

    // ── Distribution ────────────────────────────────────────────────────────

    /// Credit cashback for a purchase worth `purchase_token_value` tokens.
    ///
    /// The user's share and per-window cap come from their turned-on staking
    /// tier. Returns the USD actually credited, which is below the raw share
    /// once the window is saturated. No tokens move.
    pub fn distribute(
        env: Env,
        caller: Address,
        user: Address,
        purchase_token_value: i128,
    ) -> Result<i128, ContractError> {
        let config = Self::load_config(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &config, &caller)?;
        if purchase_token_value < 0 {
            return Err(ContractError::InvalidInput);
        }
        let now = env.ledger().timestamp();

        let tier = StakingTierClient::new(&env, &config.staking)
            .user_tier(&user, &now)
            .effective_tier();
        let bracket = config.tiers.get(tier).ok_or(ContractError::InvalidInput)?;

        let usd = PriceOracleClient::new(&env, &config.oracle).usd_amount(&purchase_token_value);
        let raw = math::bps_of(usd, bracket.share_bps).ok_or(ContractError::InvalidInput)?;

        let mut windows = Self::load_windows(&env, &user);
        let sealed = window::seal_expired(&mut windows, now, &config.durations);

        let (current, is_new) = match window::open_window(&windows) {
            Some(open) => (open, false),
            None => (
                CashbackWindow {
                    window_start: now,
                    accrued_usd: 0,
                    matured: false,
                },
                true,
            ),
        };
        let accrued = window::accrue(current.accrued_usd, raw, bracket.usd_limit);
        let credited = accrued - current.accrued_usd;

        if credited > 0 {
            let updated = CashbackWindow {
                accrued_usd: accrued,
                ..current
            };
            if is_new {
                if windows.len() >= MAX_WINDOWS {
                    return Err(ContractError::WindowLimitReached);
                }
                windows.push_back(updated.clone());
            } else {
                windows.set(windows.len() - 1, updated.clone());
            }

            let pending = Self::pending_usd(env.clone())
                .checked_add(credited)
                .ok_or(ContractError::InvalidInput)?;
            let owed = PriceOracleClient::new(&env, &config.oracle).token_amount(&pending);
            if owed > Self::liqudity(env.clone()) {
                return Err(ContractError::InsufficientReserve);
            }
            env.storage().instance().set(&PENDING_USD, &pending);
            ttl::extend_instance(&env);
            Self::save_windows(&env, &user, &windows);

            events::publish_distributed(
                &env,
                user,
                tier,
                purchase_token_value,
                credited,
                updated.window_start,
            );
        } else if sealed {
            Self::save_windows(&env, &user, &windows);
        }

        Ok(credited)
    }

    // ── Claiming ────────────────────────────────────────────────────────────

    /// Token value of every window of `user` claimable at `at_time`, at the
    /// current oracle ratio.
    pub fn amount_for_claim(
        env: Env,
        user: Address,
        at_time: u64,
    ) -> Result<i128, ContractError> {
        let config = Self::load_config(&env)?;
        let windows = Self::load_windows(&env, &user);
        let (usd, _) = window::claimable_prefix(&windows, at_time, &config.durations);
        if usd == 0 {
            return Ok(0);
        }
        Ok(PriceOracleClient::new(&env, &config.oracle).token_amount(&usd))
    }

    /// Pay `user` every claimable window from the reserve.
    ///
    /// Anyone may trigger the payout; funds only ever go to `user`. Paid
    /// windows are dropped. Returns the tokens paid, `0` when nothing is
    /// claimable.
    pub fn claim(env: Env, user: Address) -> Result<i128, ContractError> {
        let config = Self::load_config(&env)?;
        let now = env.ledger().timestamp();

        let windows = Self::load_windows(&env, &user);
        let (usd, count) = window::claimable_prefix(&windows, now, &config.durations);
        if count == 0 {
            return Ok(0);
        }

        let payout = if usd > 0 {
            PriceOracleClient::new(&env, &config.oracle).token_amount(&usd)
        } else {
            0
        };
        let liquidity = Self::liqudity(env.clone());
        if payout > liquidity {
            return Err(ContractError::InsufficientReserve);
        }

        Self::save_windows(&env, &user, &windows.slice(count..));
        let pending = Self::pending_usd(env.clone()).saturating_sub(usd).max(0);
        env.storage().instance().set(&PENDING_USD, &pending);
        env.storage()
            .instance()
            .set(&LIQUIDITY, &(liquidity - payout));
        ttl::extend_instance(&env);

        if payout > 0 {
            token::Client::new(&env, &config.token).transfer(
                &env.current_contract_address(),
                &user,
                &payout,
            );
        }

        events::publish_claimed(&env, user, usd, payout);

        Ok(payout)
    }

    // ── View functions ───────────────────────────────────────────────────────

    /// Unpaid windows of `user`, oldest first.
    pub fn user_windows(env: Env, user: Address) -> Vec<CashbackWindow> {
        Self::load_windows(&env, &user)
    }

    pub fn tier_table(env: Env) -> Result<Vec<CashbackTier>, ContractError> {
        Ok(Self::load_config(&env)?.tiers)
    }

    pub fn durations(env: Env) -> Result<CashbackDurations, ContractError> {
        Ok(Self::load_config(&env)?.durations)
    }

    /// USD accrued across all users and not yet paid.
    pub fn pending_usd(env: Env) -> i128 {
        env.storage().instance().get(&PENDING_USD).unwrap_or(0)
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    fn load_config(env: &Env) -> Result<CashbackConfig, ContractError> {
        env.storage()
            .instance()
            .get(&CONFIG)
            .ok_or(ContractError::NotInitialized)
    }

    fn require_admin(
        env: &Env,
        config: &CashbackConfig,
        caller: &Address,
    ) -> Result<(), ContractError> {
        if !admin::is_admin(env, &config.admin_panel, caller) {
            return Err(ContractError::PermissionDenied);
        }
        Ok(())
    }

    /// Tokens the reserve must hold for every unpaid window.
    fn liability(env: &Env, config: &CashbackConfig) -> i128 {
        let pending = Self::pending_usd(env.clone());
        if pending == 0 {
            return 0;
        }
        PriceOracleClient::new(env, &config.oracle).token_amount(&pending)
    }

    fn load_windows(env: &Env, user: &Address) -> Vec<CashbackWindow> {
        env.storage()
            .persistent()
            .get(&(WINDOWS, user.clone()))
            .unwrap_or(Vec::new(env))
    }

    fn save_windows(env: &Env, user: &Address, windows: &Vec<CashbackWindow>) {
        let key = (WINDOWS, user.clone());
        if windows.is_empty() {
            env.storage().persistent().remove(&key);
            return;
        }
        env.storage().persistent().set(&key, windows);
        ttl::extend_persistent(env, &key);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
