//! Reward curve
//!
//! Cumulative XP needed to leave a level grows as an arithmetic series with
//! base 200 and per-level increment 20:
//!
//! ```text
//! threshold(L) = (L / 2) * (2 * 200 + (L - 1) * 20)
//! ```
//!
//! so threshold(1) = 200, threshold(2) = 420, threshold(3) = 660. A user at
//! level L with `xp >= threshold(L)` advances until `xp < threshold(L)`.

/// XP needed to leave level 1
pub const BASE_XP: u64 = 200;

/// Extra XP each further level costs
pub const LEVEL_INCREMENT: u64 = 20;

/// Cumulative XP at which `level` is left.
///
/// `threshold(0)` is 0. `L * (L - 1)` is always even, so the series sums
/// exactly in integers.
#[inline]
#[must_use]
pub fn xp_threshold_for_level(level: u32) -> u64 {
    if level == 0 {
        return 0;
    }
    let l = u64::from(level);
    l * BASE_XP + l * (l - 1) / 2 * LEVEL_INCREMENT
}

/// Add `amount` XP and recompute the level.
///
/// Level never decreases; a stored level of 0 is treated as 1.
#[must_use]
pub fn apply_xp(amount: u64, level: u32, xp: u64) -> (u32, u64) {
    let new_xp = xp.saturating_add(amount);
    let mut new_level = level.max(1);
    while new_xp >= xp_threshold_for_level(new_level) {
        new_level += 1;
    }
    (new_level, new_xp)
}

/// Fraction of the current level completed, in `[0, 1]`.
#[must_use]
pub fn level_progress(level: u32, xp: u64) -> f64 {
    let level = level.max(1);
    let start = xp_threshold_for_level(level - 1);
    let end = xp_threshold_for_level(level);
    if end <= start {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let fraction = xp.saturating_sub(start) as f64 / (end - start) as f64;
    fraction.clamp(0.0, 1.0)
}
