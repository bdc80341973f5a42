//! Whitelist gate: a one-shot allow-list for whitelist-tagged batches.
//!
//! The owner loads a list before a batch is created; the batch is tagged
//! when the list is non-empty, and the settlement engine clears the list
//! once that batch settles. Membership is an O(1) set lookup; the ordered
//! vector keeps the first-seen order for indexed reads.

use std::collections::HashSet;

use wizardhouse_types::{Address, AuctionError, AuctionSlot, Result, constants::MAX_WHITELIST_SIZE};

/// Insertion-ordered, duplicate-free set of addresses.
#[derive(Debug, Clone, Default)]
pub struct WhitelistGate {
    ordered: Vec<Address>,
    members: HashSet<Address>,
}

impl WhitelistGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole list. Duplicates collapse to their first occurrence.
    /// Returns the resulting size.
    ///
    /// # Errors
    /// `InvalidConfig` if the list contains the zero address or has more
    /// than [`MAX_WHITELIST_SIZE`] unique entries. The gate is unchanged on
    /// error.
    pub fn replace(&mut self, addresses: &[Address]) -> Result<usize> {
        let mut ordered = Vec::with_capacity(addresses.len());
        let mut members = HashSet::with_capacity(addresses.len());
        for &address in addresses {
            if address.is_zero() {
                return Err(AuctionError::InvalidConfig(
                    "whitelist may not contain the zero address".into(),
                ));
            }
            if members.insert(address) {
                ordered.push(address);
            }
        }
        if ordered.len() > MAX_WHITELIST_SIZE {
            return Err(AuctionError::InvalidConfig(format!(
                "whitelist has {} entries, maximum is {MAX_WHITELIST_SIZE}",
                ordered.len()
            )));
        }
        self.ordered = ordered;
        self.members = members;
        Ok(self.ordered.len())
    }

    pub fn clear(&mut self) {
        self.ordered.clear();
        self.members.clear();
    }

    #[must_use]
    pub fn contains(&self, address: &Address) -> bool {
        self.members.contains(address)
    }

    #[must_use]
    pub fn address_at(&self, index: usize) -> Option<Address> {
        self.ordered.get(index).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Check that `bidder` may bid on `slot`.
    ///
    /// # Errors
    /// `NotWhitelisted` if the slot is whitelist-tagged and the bidder is not
    /// on the list.
    pub fn authorize(&self, slot: &AuctionSlot, bidder: &Address) -> Result<()> {
        if slot.is_whitelist_day && !self.contains(bidder) {
            return Err(AuctionError::NotWhitelisted { bidder: *bidder });
        }
        Ok(())
    }
}
