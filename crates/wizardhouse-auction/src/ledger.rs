//! Bid ledger: validates bids and records the high bid of a slot.
//!
//! ## Acceptance rules
//!
//! - the slot is unsettled and `now < end_time`
//! - a whitelist-tagged slot only accepts listed bidders
//! - every bid is at least the reserve price
//! - once a slot has a bid, the next one must be **strictly greater** than
//!   `high_bid × (1 + min_increment_bps / 10_000)`
//!
//! A bid landing with less than `time_buffer` left pushes `end_time` to
//! `now + time_buffer`.
//!
//! Validation runs to completion before anything is written, so a rejected
//! bid leaves the slot untouched. The displaced bidder is reported back to
//! the caller, who owns the payout.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use tracing::debug;
use wizardhouse_types::{
    Address, AuctionConfig, AuctionError, AuctionSlot, ItemId, Result, SlotId, SlotPhase,
    constants::BPS_DENOMINATOR,
};

use crate::whitelist::WhitelistGate;

/// Bidding terms in force for a batch. Captured when the batch is created,
/// so configuration changes never reach slots that are already open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BidTerms {
    pub reserve_price: Decimal,
    pub min_increment_bps: u32,
    pub time_buffer: Duration,
}

impl BidTerms {
    #[must_use]
    pub fn from_config(config: &AuctionConfig) -> Self {
        Self {
            reserve_price: config.reserve_price,
            min_increment_bps: config.min_increment_bps,
            time_buffer: config.time_buffer(),
        }
    }

    /// The amount a follow-up bid must strictly exceed.
    ///
    /// Saturates at [`Decimal::MAX`], which no bid can beat.
    #[must_use]
    pub fn increment_threshold(&self, high_bid: Decimal) -> Decimal {
        let factor = Decimal::from(BPS_DENOMINATOR) + Decimal::from(self.min_increment_bps);
        high_bid
            .checked_mul(factor)
            .and_then(|scaled| scaled.checked_div(Decimal::from(BPS_DENOMINATOR)))
            .unwrap_or(Decimal::MAX)
    }
}

/// A bid the ledger has applied to a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedBid {
    pub slot_id: SlotId,
    pub item_id: ItemId,
    pub bidder: Address,
    pub amount: Decimal,
    /// The bidder and amount that were outbid, owed a refund.
    pub displaced: Option<(Address, Decimal)>,
    pub extended: bool,
    pub end_time: DateTime<Utc>,
}

/// Validates and applies bids against the current [`BidTerms`].
#[derive(Debug, Clone)]
pub struct BidLedger {
    terms: BidTerms,
    /// Total value ever accepted as a bid.
    paid_in: Decimal,
    accepted: u64,
}

impl BidLedger {
    #[must_use]
    pub fn new(terms: BidTerms) -> Self {
        Self {
            terms,
            paid_in: Decimal::ZERO,
            accepted: 0,
        }
    }

    #[must_use]
    pub fn terms(&self) -> &BidTerms {
        &self.terms
    }

    /// Install the terms for a newly created batch.
    pub fn set_terms(&mut self, terms: BidTerms) {
        self.terms = terms;
    }

    #[must_use]
    pub fn paid_in(&self) -> Decimal {
        self.paid_in
    }

    #[must_use]
    pub fn accepted_count(&self) -> u64 {
        self.accepted
    }

    /// Check a bid without touching the slot.
    ///
    /// # Errors
    /// `InvalidAmount`, `InvalidAddress`, `AuctionInactive`,
    /// `NotWhitelisted`, `BelowReserve` or `BelowMinIncrement`, checked in
    /// that order.
    pub fn check(
        &self,
        slot: &AuctionSlot,
        gate: &WhitelistGate,
        bidder: &Address,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if amount <= Decimal::ZERO || !amount.fract().is_zero() {
            return Err(AuctionError::InvalidAmount(amount));
        }
        if bidder.is_zero() {
            return Err(AuctionError::InvalidAddress {
                input: bidder.to_string(),
                reason: "the zero address cannot bid".into(),
            });
        }
        let inactive = match slot.phase(now) {
            SlotPhase::Running => None,
            SlotPhase::Expired => Some("Auction expired"),
            SlotPhase::Settled => Some("Auction settled"),
        };
        if let Some(reason) = inactive {
            return Err(AuctionError::AuctionInactive {
                slot_id: slot.id,
                reason: reason.into(),
            });
        }
        gate.authorize(slot, bidder)?;
        if amount < self.terms.reserve_price {
            return Err(AuctionError::BelowReserve {
                amount,
                reserve: self.terms.reserve_price,
            });
        }
        if slot.has_bid() {
            let threshold = self.terms.increment_threshold(slot.high_bid);
            if amount <= threshold {
                return Err(AuctionError::BelowMinIncrement { amount, threshold });
            }
        }
        Ok(())
    }

    /// The new end time if a bid at `now` lands inside the time buffer.
    fn extended_end(
        &self,
        slot: &AuctionSlot,
        now: DateTime<Utc>,
    ) -> Result<Option<DateTime<Utc>>> {
        if slot.end_time - now >= self.terms.time_buffer {
            return Ok(None);
        }
        now.checked_add_signed(self.terms.time_buffer)
            .map(Some)
            .ok_or_else(|| {
                AuctionError::InvalidConfig(format!(
                    "time buffer {} pushes {} past the last representable time",
                    self.terms.time_buffer, slot.id
                ))
            })
    }

    /// Validate and apply a bid.
    ///
    /// # Errors
    /// See [`BidLedger::check`], plus `InvalidConfig` if the extension
    /// would overflow the calendar. The slot is unchanged on error.
    pub fn place(
        &mut self,
        slot: &mut AuctionSlot,
        gate: &WhitelistGate,
        bidder: Address,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<AcceptedBid> {
        self.check(slot, gate, &bidder, amount, now)?;
        let extended_end = self.extended_end(slot, now)?;

        let displaced = slot.high_bidder.map(|prev| (prev, slot.high_bid));
        slot.high_bid = amount;
        slot.high_bidder = Some(bidder);

        let extended = extended_end.is_some();
        if let Some(end_time) = extended_end {
            slot.end_time = end_time;
        }

        self.paid_in += amount;
        self.accepted += 1;

        debug!(
            slot = %slot.id,
            item = %slot.item_id,
            bidder = %bidder.short(),
            amount = %amount,
            extended,
            "bid accepted"
        );

        Ok(AcceptedBid {
            slot_id: slot.id,
            item_id: slot.item_id,
            bidder,
            amount,
            displaced,
            extended,
            end_time: slot.end_time,
        })
    }
}
