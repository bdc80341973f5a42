//! # AuctionSlot: one open, time-boxed auction
//!
//! ## State Machine
//!
//! ```text
//!   ┌─────────┐  now >= end_time  ┌─────────┐  settlement  ┌─────────┐
//!   │ RUNNING ├──────────────────▶│ EXPIRED ├─────────────▶│ SETTLED │
//!   └────┬────┘                   └─────────┘              └─────────┘
//!        │ bid inside time buffer
//!        └──▶ end_time = now + time_buffer (stays RUNNING)
//! ```
//!
//! Expiry is never scheduled; it is observed lazily by comparing the clock
//! against `end_time`. `settled` only ever moves from `false` to `true`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Address, AuctionError, BatchId, ItemId, Result, SlotId};

/// Observable phase of a slot at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotPhase {
    /// Accepting bids.
    Running,
    /// Past `end_time`, waiting for settlement.
    Expired,
    /// Item transferred or burned. Terminal.
    Settled,
}

impl std::fmt::Display for SlotPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Running => write!(f, "RUNNING"),
            Self::Expired => write!(f, "EXPIRED"),
            Self::Settled => write!(f, "SETTLED"),
        }
    }
}

/// One auction inside a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionSlot {
    /// Position inside the batch (1-based).
    pub id: SlotId,
    /// The batch this slot was created in.
    pub batch: BatchId,
    /// The item being sold.
    pub item_id: ItemId,
    pub start_time: DateTime<Utc>,
    /// Moves forward when a late bid lands inside the time buffer.
    pub end_time: DateTime<Utc>,
    /// Zero means no bid.
    pub high_bid: Decimal,
    pub high_bidder: Option<Address>,
    pub settled: bool,
    /// Only whitelisted addresses may bid. Fixed at creation, except that
    /// an administrative stop can clear it.
    pub is_whitelist_day: bool,
    pub is_one_of_one: bool,
}

impl AuctionSlot {
    /// Create a fresh slot starting at `start_time`.
    ///
    /// # Errors
    /// Returns [`AuctionError::InvalidConfig`] if `end_time` would not be
    /// strictly after `start_time`.
    pub fn open(
        id: SlotId,
        batch: BatchId,
        item_id: ItemId,
        start_time: DateTime<Utc>,
        duration: chrono::Duration,
        is_whitelist_day: bool,
        is_one_of_one: bool,
    ) -> Result<Self> {
        let end_time = start_time
            .checked_add_signed(duration)
            .filter(|end| *end > start_time)
            .ok_or_else(|| {
                AuctionError::InvalidConfig(format!(
                    "duration {duration} does not produce a valid end time"
                ))
            })?;
        Ok(Self {
            id,
            batch,
            item_id,
            start_time,
            end_time,
            high_bid: Decimal::ZERO,
            high_bidder: None,
            settled: false,
            is_whitelist_day,
            is_one_of_one,
        })
    }

    /// Phase of this slot at `now`.
    #[must_use]
    pub fn phase(&self, now: DateTime<Utc>) -> SlotPhase {
        if self.settled {
            SlotPhase::Settled
        } else if now >= self.end_time {
            SlotPhase::Expired
        } else {
            SlotPhase::Running
        }
    }

    /// Returns `true` if at least one bid has been accepted.
    #[must_use]
    pub fn has_bid(&self) -> bool {
        self.high_bidder.is_some()
    }

    /// Mark this slot settled.
    ///
    /// # Errors
    /// Returns [`AuctionError::AlreadySettled`] on a second call.
    pub fn mark_settled(&mut self) -> Result<()> {
        if self.settled {
            return Err(AuctionError::AlreadySettled(self.id));
        }
        self.settled = true;
        Ok(())
    }
}

/// Dummy slot for testing. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl AuctionSlot {
    /// A running, bid-free slot that started at the UNIX epoch and lasts a day.
    pub fn dummy(id: u32, item: u64) -> Self {
        Self::open(
            SlotId(id),
            BatchId(1),
            ItemId(item),
            DateTime::<Utc>::UNIX_EPOCH,
            chrono::Duration::days(1),
            false,
            false,
        )
        .unwrap_or_else(|e| unreachable!("one-day dummy slot is always valid: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn t(secs: i64) -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(secs)
    }

    #[test]
    fn open_sets_end_time() {
        let slot = AuctionSlot::open(
            SlotId(1),
            BatchId(1),
            ItemId(5),
            t(100),
            Duration::seconds(60),
            true,
            false,
        )
        .unwrap();
        assert_eq!(slot.end_time, t(160));
        assert!(slot.is_whitelist_day);
        assert!(!slot.has_bid());
        assert_eq!(slot.high_bid, Decimal::ZERO);
    }

    #[test]
    fn zero_duration_rejected() {
        let err = AuctionSlot::open(
            SlotId(1),
            BatchId(1),
            ItemId(5),
            t(100),
            Duration::zero(),
            false,
            false,
        )
        .unwrap_err();
        assert!(matches!(err, AuctionError::InvalidConfig(_)));
    }

    #[test]
    fn phase_follows_clock() {
        let mut slot = AuctionSlot::dummy(1, 1);
        assert_eq!(slot.phase(t(0)), SlotPhase::Running);
        assert_eq!(slot.phase(t(86_399)), SlotPhase::Running);
        assert_eq!(slot.phase(t(86_400)), SlotPhase::Expired);
        slot.mark_settled().unwrap();
        assert_eq!(slot.phase(t(86_400)), SlotPhase::Settled);
        assert_eq!(slot.phase(t(0)), SlotPhase::Settled);
    }

    #[test]
    fn settle_is_one_way() {
        let mut slot = AuctionSlot::dummy(2, 1);
        slot.mark_settled().unwrap();
        let err = slot.mark_settled().unwrap_err();
        assert!(matches!(err, AuctionError::AlreadySettled(SlotId(2))));
    }

    #[test]
    fn phase_display() {
        assert_eq!(SlotPhase::Running.to_string(), "RUNNING");
        assert_eq!(SlotPhase::Expired.to_string(), "EXPIRED");
        assert_eq!(SlotPhase::Settled.to_string(), "SETTLED");
    }
}
