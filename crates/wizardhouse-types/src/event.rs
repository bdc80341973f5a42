//! Signals emitted by the auction house for indexers and tests.
//!
//! Field sets are stable. Consumers key off arrival order, so the engine
//! emits every `Settled` of a rollover before the first `BatchCreated`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Address, BatchId, ItemId, SlotId};

/// Why the engine is paused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PauseReason {
    /// The owner paused the house.
    Administrative,
    /// The supply cap was reached during rollover.
    SupplyExhausted,
}

impl std::fmt::Display for PauseReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Administrative => write!(f, "ADMINISTRATIVE"),
            Self::SupplyExhausted => write!(f, "SUPPLY_EXHAUSTED"),
        }
    }
}

/// Why a payment is being made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoutKind {
    /// Returning a displaced bid.
    Refund,
    /// Settlement proceeds to the creators or treasury account.
    Proceeds,
}

impl std::fmt::Display for PayoutKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Refund => write!(f, "REFUND"),
            Self::Proceeds => write!(f, "PROCEEDS"),
        }
    }
}

/// Every observable signal the engine produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AuctionEvent {
    BatchCreated {
        batch: BatchId,
        slot_id: SlotId,
        item_id: ItemId,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        is_whitelist_day: bool,
        is_one_of_one: bool,
    },
    BidAccepted {
        slot_id: SlotId,
        item_id: ItemId,
        bidder: Address,
        amount: Decimal,
        extended: bool,
    },
    AuctionExtended {
        slot_id: SlotId,
        item_id: ItemId,
        end_time: DateTime<Utc>,
    },
    Settled {
        slot_id: SlotId,
        item_id: ItemId,
        /// `None` when the item was burned.
        winner: Option<Address>,
        /// Zero when the item was burned.
        amount: Decimal,
    },
    CapReached {
        cap: u64,
        last_item_id: Option<ItemId>,
    },
    /// A push payment failed and the amount was credited in the wrapped asset.
    PaymentRedirected {
        recipient: Address,
        amount: Decimal,
        kind: PayoutKind,
    },
    Paused {
        reason: PauseReason,
    },
    Unpaused,
    TimeBufferUpdated {
        time_buffer_secs: u64,
    },
    ReservePriceUpdated {
        reserve_price: Decimal,
    },
    MinIncrementUpdated {
        min_increment_bps: u32,
    },
    DurationUpdated {
        duration_secs: u64,
    },
    AuctionCountUpdated {
        auction_count: u32,
    },
    WizardCapUpdated {
        wizard_cap: u64,
    },
    OwnershipTransferred {
        previous: Address,
        new_owner: Address,
    },
}

impl AuctionEvent {
    /// Short upper-case tag, used in logs and when counting events.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::BatchCreated { .. } => "BATCH_CREATED",
            Self::BidAccepted { .. } => "BID_ACCEPTED",
            Self::AuctionExtended { .. } => "AUCTION_EXTENDED",
            Self::Settled { .. } => "SETTLED",
            Self::CapReached { .. } => "CAP_REACHED",
            Self::PaymentRedirected { .. } => "PAYMENT_REDIRECTED",
            Self::Paused { .. } => "PAUSED",
            Self::Unpaused => "UNPAUSED",
            Self::TimeBufferUpdated { .. } => "TIME_BUFFER_UPDATED",
            Self::ReservePriceUpdated { .. } => "RESERVE_PRICE_UPDATED",
            Self::MinIncrementUpdated { .. } => "MIN_INCREMENT_UPDATED",
            Self::DurationUpdated { .. } => "DURATION_UPDATED",
            Self::AuctionCountUpdated { .. } => "AUCTION_COUNT_UPDATED",
            Self::WizardCapUpdated { .. } => "WIZARD_CAP_UPDATED",
            Self::OwnershipTransferred { .. } => "OWNERSHIP_TRANSFERRED",
        }
    }
}

impl std::fmt::Display for AuctionEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_tags() {
        let ev = AuctionEvent::CapReached {
            cap: 8,
            last_item_id: Some(ItemId(7)),
        };
        assert_eq!(ev.kind(), "CAP_REACHED");
        assert_eq!(ev.to_string(), "CAP_REACHED");
        assert_eq!(AuctionEvent::Unpaused.kind(), "UNPAUSED");
    }

    #[test]
    fn settled_serializes_with_tag() {
        let ev = AuctionEvent::Settled {
            slot_id: SlotId(1),
            item_id: ItemId(3),
            winner: None,
            amount: Decimal::ZERO,
        };
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["event"], "settled");
        assert!(json["winner"].is_null());
        let back: AuctionEvent = serde_json::from_value(json).unwrap();
        assert_eq!(ev, back);
    }

    #[test]
    fn bid_accepted_carries_address_as_hex() {
        let ev = AuctionEvent::BidAccepted {
            slot_id: SlotId(2),
            item_id: ItemId(9),
            bidder: Address([0xab; 20]),
            amount: Decimal::from(70),
            extended: true,
        };
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["bidder"], format!("0x{}", "ab".repeat(20)));
        assert_eq!(json["extended"], true);
    }

    #[test]
    fn redirected_payment_names_its_kind() {
        let ev = AuctionEvent::PaymentRedirected {
            recipient: Address([0x01; 20]),
            amount: Decimal::from(5),
            kind: PayoutKind::Proceeds,
        };
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["event"], "payment_redirected");
        assert_eq!(json["kind"], "proceeds");
        assert_eq!(ev.kind(), "PAYMENT_REDIRECTED");
    }

    #[test]
    fn pause_reason_display() {
        assert_eq!(PauseReason::Administrative.to_string(), "ADMINISTRATIVE");
        assert_eq!(PauseReason::SupplyExhausted.to_string(), "SUPPLY_EXHAUSTED");
    }
}
