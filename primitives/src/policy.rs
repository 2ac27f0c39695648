//! Protocol parameters, mirroring `nimiq-primitives::policy` and the
//! `NIPOPOW_M` / `NIPOPOW_K` constants defined directly on `Blockchain` in
//! similar light-client designs.

use crate::target::Target;

/// Dense-suffix length: both proof producers and consumers must agree.
pub const K: u32 = 120;

/// Minimum superblock count for the scoring rule.
pub const M: u32 = 240;

/// Number of blocks over which difficulty is retargeted.
pub const DIFFICULTY_BLOCK_WINDOW: u32 = 20;

/// Target block interval, in seconds.
pub const BLOCK_TIME: u32 = 60;

/// Clamp applied to the retarget adjustment factor.
pub const DIFFICULTY_MAX_ADJUSTMENT_FACTOR: f64 = 2.0;

/// Maximum target (minimum difficulty), i.e. the genesis target. Any hash
/// satisfies it, the way a freshly-bootstrapped chain's easiest difficulty
/// should - difficulty only ratchets up from here via retargeting.
pub fn genesis_target() -> Target {
    Target::MAX
}
