//! Supply governor: keeps every auctioned item id under the cap.
//!
//! Two limits apply at once: the configured `wizard_cap` (no auctioned item
//! id may exceed `cap - 1`) and whatever the minting service itself still
//! allows. The [`AuctionEvent::CapReached`] signal fires once per
//! exhaustion.
//!
//! Exhaustion is acted on at the next settlement, not in the call that
//! mints the last admissible id. The batch holding that id stays open for
//! bidding; the rollover that settles it finds no headroom, emits
//! `CapReached` and pauses instead of opening another batch.

use tracing::warn;
use wizardhouse_types::{AuctionEvent, ItemId, MintingService};

/// Whether a freshly minted item may be auctioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MintAdmission {
    Accepted,
    /// The id is at or above the cap; the item must be burned.
    OverCap,
}

/// Minted-count against the cap.
#[derive(Debug, Clone)]
pub struct SupplyGovernor {
    cap: u64,
    /// Highest item id admitted for auction.
    last_item_id: Option<ItemId>,
    /// Set once `CapReached` has fired; cleared when the cap moves.
    cap_signalled: bool,
}

impl SupplyGovernor {
    #[must_use]
    pub fn new(cap: u64) -> Self {
        Self {
            cap,
            last_item_id: None,
            cap_signalled: false,
        }
    }

    #[must_use]
    pub fn cap(&self) -> u64 {
        self.cap
    }

    #[must_use]
    pub fn last_item_id(&self) -> Option<ItemId> {
        self.last_item_id
    }

    /// Move the cap. Re-arms the `CapReached` signal.
    pub fn set_cap(&mut self, cap: u64) {
        self.cap = cap;
        self.cap_signalled = false;
    }

    /// Ids still available under the cap, ignoring the minting service.
    #[must_use]
    pub fn headroom(&self) -> u64 {
        let used = self.last_item_id.map_or(0, |id| id.0.saturating_add(1));
        self.cap.saturating_sub(used)
    }

    /// Items that can still be auctioned right now.
    #[must_use]
    pub fn capacity<M: MintingService>(&self, minter: &M) -> u64 {
        self.headroom().min(minter.remaining_capacity())
    }

    #[must_use]
    pub fn has_capacity<M: MintingService>(&self, minter: &M) -> bool {
        self.capacity(minter) > 0
    }

    /// Check a minted id against the cap and record it when admitted.
    pub fn admit(&mut self, item: ItemId) -> MintAdmission {
        if item.0 >= self.cap {
            warn!(item = %item, cap = self.cap, "minted id above cap");
            return MintAdmission::OverCap;
        }
        if self.last_item_id.is_none_or(|last| item > last) {
            self.last_item_id = Some(item);
        }
        MintAdmission::Accepted
    }

    /// The `CapReached` signal, the first time it is asked for after each
    /// exhaustion.
    pub fn signal_cap_reached(&mut self) -> Option<AuctionEvent> {
        if self.cap_signalled {
            return None;
        }
        self.cap_signalled = true;
        Some(AuctionEvent::CapReached {
            cap: self.cap,
            last_item_id: self.last_item_id,
        })
    }
}
