//! Contracts for the external services the engine drives.
//!
//! The engine treats every implementation as a black box. Item-id allocation
//! in particular belongs entirely to the [`MintingService`]: ids are unique
//! and non-decreasing, but the engine never assumes two consecutive calls
//! return consecutive ids.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::{Address, ItemId, Result};

/// Read-only wall clock.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// System clock backed by [`Utc::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// The item ledger: mint, burn and ownership transfer.
pub trait MintingService {
    /// Mint the next regular item to the engine's custody.
    fn mint_next(&mut self) -> Result<ItemId>;

    /// Mint the one-of-one at `index` of the rare pool.
    fn mint_one_of_one(&mut self, index: u32) -> Result<ItemId>;

    /// Destroy an unsold item.
    fn burn(&mut self, item: ItemId) -> Result<()>;

    /// Hand a sold item to its winner.
    fn transfer(&mut self, item: ItemId, to: Address) -> Result<()>;

    /// How many more items the ledger is willing to mint.
    fn remaining_capacity(&self) -> u64;
}

/// Result of a bounded-effort push payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PushOutcome {
    Delivered,
    /// The recipient refused, ran out of effort budget, or is unreachable.
    Failed,
}

/// Two-phase value transfer: a capped push attempt, then a fallback credit.
///
/// Neither method may fail in a way the engine has to propagate. A failed
/// push is reported as [`PushOutcome::Failed`], never as an error.
pub trait PaymentRail {
    /// Try to deliver `amount` to `recipient` spending at most `effort_budget`.
    fn attempt(&mut self, recipient: Address, amount: Decimal, effort_budget: u64) -> PushOutcome;

    /// Credit `amount` to `recipient` in the wrapped fallback asset.
    fn credit_fallback(&mut self, recipient: Address, amount: Decimal);
}

/// The wrapped fallback asset that receives redirected payments.
pub trait WrappedAsset {
    fn credit_balance(&mut self, holder: Address, amount: Decimal);

    /// Balance the holder can redeem out of band.
    fn redeemable_balance_of(&self, holder: Address) -> Decimal;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_moves_forward() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
