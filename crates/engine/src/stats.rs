//! Derived stat formulas at the fixed battle level.
//!
//! Every duel runs at level 100 with a fixed individual value and no effort
//! values, so derivation collapses to two integer expressions. Stat stages
//! are tracked on the battler but do not feed these formulas.
use bd_core::BaseStat;
use bd_core::Hp;
use bd_core::IV;
use bd_core::LEVEL;
use bd_core::StatValue;

/// Maximum hit points from a base HP stat.
pub fn max_hp(base: BaseStat) -> Hp {
    (((2 * base + IV + 31) * LEVEL) / 100 + 10) as Hp
}

/// Any non-HP stat from its base value.
pub fn stat(base: BaseStat) -> StatValue {
    ((2 * base + IV + 31) * LEVEL) / 100 + 5
}
