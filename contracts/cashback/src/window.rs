//! Fixed-window accrual for one user's cashback.
//!
//! A window accrues USD from `window_start` until `distribute_duration` has
//! elapsed, at which point the next distribution seals it. Sealed or not,
//! a window becomes claimable once `claim_duration` more has passed.

use soroban_sdk::Vec;

use crate::{CashbackDurations, CashbackWindow};

/// Seal the newest window if its accrual period is over at `now`.
///
/// The boundary instant belongs to the next window. Returns `true` when a
/// window was sealed.
pub fn seal_expired(
    windows: &mut Vec<CashbackWindow>,
    now: u64,
    durations: &CashbackDurations,
) -> bool {
    let Some(mut last) = windows.last() else {
        return false;
    };
    if last.matured {
        return false;
    }
    let window_end = last.window_start.saturating_add(durations.distribute_duration);
    if now < window_end {
        return false;
    }
    last.matured = true;
    windows.set(windows.len() - 1, last);
    true
}

/// The newest window when it is still accruing.
pub fn open_window(windows: &Vec<CashbackWindow>) -> Option<CashbackWindow> {
    windows.last().filter(|w| !w.matured)
}

/// New accrued total after crediting `raw` against `usd_limit`.
///
/// Overflow past the cap is dropped, and a total already above the cap
/// (the user's tier went down) is kept rather than clawed back.
pub fn accrue(accrued: i128, raw: i128, usd_limit: i128) -> i128 {
    let capped = accrued.saturating_add(raw).min(usd_limit);
    accrued.max(capped)
}

/// Whether `window` may be paid out at `at_time`.
pub fn is_claimable(window: &CashbackWindow, at_time: u64, durations: &CashbackDurations) -> bool {
    window
        .window_start
        .saturating_add(durations.distribute_duration)
        .saturating_add(durations.claim_duration)
        <= at_time
}

/// Sum of every claimable window's USD and the count of leading windows
/// it covers. Windows are in start order, so the claimable ones are a
/// prefix.
pub fn claimable_prefix(
    windows: &Vec<CashbackWindow>,
    at_time: u64,
    durations: &CashbackDurations,
) -> (i128, u32) {
    let mut usd: i128 = 0;
    let mut count: u32 = 0;
    for window in windows.iter() {
        if !is_claimable(&window, at_time, durations) {
            break;
        }
        usd = usd.saturating_add(window.accrued_usd);
        count += 1;
    }
    (usd, count)
}
