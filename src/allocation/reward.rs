//! Reward law shared by both allocators
//!
//! A site pays out in proportion to how much of its guard is engaged:
//!
//! ```text
//! reward = min(gold * adventurers / guardians, gold)      guardians > 0
//! reward = gold                                           guardians == 0, adventurers > 0
//! reward = 0                                              adventurers == 0
//! ```

use rust_decimal::Decimal;

use crate::common::errors::{PlannerError, Result};

/// Gold captured by sending `adventurers` against a site
///
/// Never overflows: a partial capture is strictly below `gold`, and when
/// `gold * adventurers` does not fit, the ratio is taken first instead.
pub fn capture(gold: Decimal, guardians: u32, adventurers: u32) -> Decimal {
    if adventurers == 0 {
        return Decimal::ZERO;
    }
    if adventurers >= guardians {
        return gold;
    }
    let adventurers = Decimal::from(adventurers);
    let guardians = Decimal::from(guardians);
    let proportional = match gold.checked_mul(adventurers) {
        Some(product) => product / guardians,
        None => gold / guardians * adventurers,
    };
    proportional.min(gold)
}

/// Sum of gold amounts, failing instead of panicking when it overflows
pub fn checked_total<I>(what: &'static str, amounts: I) -> Result<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |total, amount| total.checked_add(amount))
        .ok_or(PlannerError::Overflow(what))
}
