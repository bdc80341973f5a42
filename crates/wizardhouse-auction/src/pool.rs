//! Slot pool: the open slots of the current batch, indexed by slot id.
//!
//! Slot ids are 1-based and contiguous inside a batch. A new batch replaces
//! the previous one wholesale; there is never a mix of slots from two
//! batches.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use wizardhouse_types::{AuctionError, AuctionSlot, BatchId, Result, SlotId};

/// Indexed collection of the concurrently open auctions.
#[derive(Debug, Clone, Default)]
pub struct SlotPool {
    /// Batch the slots belong to. `None` before the first batch.
    batch: Option<BatchId>,
    /// `slots[i]` has id `i + 1`.
    slots: Vec<AuctionSlot>,
}

impl SlotPool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn current_batch(&self) -> Option<BatchId> {
        self.batch
    }

    /// Id the next installed batch should carry.
    #[must_use]
    pub fn next_batch_id(&self) -> BatchId {
        self.batch.unwrap_or_default().next()
    }

    /// Replace the current batch.
    ///
    /// # Errors
    /// `Internal` if `slots` is empty, ids are not `1..=n` in order, or a
    /// slot claims another batch.
    pub fn install(&mut self, batch: BatchId, slots: Vec<AuctionSlot>) -> Result<()> {
        if slots.is_empty() {
            return Err(AuctionError::Internal("refusing to install an empty batch".into()));
        }
        for (i, slot) in slots.iter().enumerate() {
            let expected = u32::try_from(i + 1)
                .map_err(|_| AuctionError::Internal("batch too large".into()))?;
            if slot.id != SlotId(expected) || slot.batch != batch {
                return Err(AuctionError::Internal(format!(
                    "slot {} of {} installed at position {expected} of {batch}",
                    slot.id, slot.batch
                )));
            }
        }
        self.batch = Some(batch);
        self.slots = slots;
        Ok(())
    }

    fn index(&self, slot_id: SlotId) -> Option<usize> {
        let idx = usize::try_from(slot_id.0).ok()?.checked_sub(1)?;
        (idx < self.slots.len()).then_some(idx)
    }

    /// # Errors
    /// `AuctionInactive` if no slot with this id exists.
    pub fn get(&self, slot_id: SlotId) -> Result<&AuctionSlot> {
        self.index(slot_id)
            .map(|i| &self.slots[i])
            .ok_or_else(|| missing(slot_id))
    }

    /// # Errors
    /// `AuctionInactive` if no slot with this id exists.
    pub fn get_mut(&mut self, slot_id: SlotId) -> Result<&mut AuctionSlot> {
        match self.index(slot_id) {
            Some(i) => Ok(&mut self.slots[i]),
            None => Err(missing(slot_id)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &AuctionSlot> {
        self.slots.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// `true` when there is no batch or every slot in it is settled.
    #[must_use]
    pub fn all_settled(&self) -> bool {
        self.slots.iter().all(|s| s.settled)
    }

    /// `true` if any slot of the current batch was created whitelist-tagged
    /// and has not been untagged since.
    #[must_use]
    pub fn is_whitelist_batch(&self) -> bool {
        self.slots.iter().any(|s| s.is_whitelist_day)
    }

    /// # Errors
    /// `AuctionsNotComplete` if an unsettled slot is still running at `now`.
    pub fn ensure_all_expired(&self, now: DateTime<Utc>) -> Result<()> {
        let open = self
            .slots
            .iter()
            .filter(|s| !s.settled && now < s.end_time)
            .count();
        if open > 0 {
            return Err(AuctionError::AuctionsNotComplete { open });
        }
        Ok(())
    }

    /// Untag every slot. Returns how many were tagged.
    pub fn clear_whitelist_day(&mut self) -> usize {
        let mut cleared = 0;
        for slot in self.slots.iter_mut().filter(|s| s.is_whitelist_day) {
            slot.is_whitelist_day = false;
            cleared += 1;
        }
        cleared
    }

    /// Value held for high bidders of slots that have not settled.
    #[must_use]
    pub fn escrowed(&self) -> Decimal {
        self.slots
            .iter()
            .filter(|s| !s.settled)
            .map(|s| s.high_bid)
            .sum()
    }
}

fn missing(slot_id: SlotId) -> AuctionError {
    AuctionError::AuctionInactive {
        slot_id,
        reason: "Wizard not up for auction".into(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use wizardhouse_types::{ItemId, testing::addr};

    use super::*;

    fn batch_of(batch: BatchId, n: u32) -> Vec<AuctionSlot> {
        (1..=n)
            .map(|i| {
                let mut slot = AuctionSlot::dummy(i, u64::from(i) + 10);
                slot.batch = batch;
                slot
            })
            .collect()
    }

    #[test]
    fn empty_pool_reports_settled_and_first_batch_id() {
        let pool = SlotPool::new();
        assert!(pool.is_empty());
        assert!(pool.all_settled());
        assert_eq!(pool.current_batch(), None);
        assert_eq!(pool.next_batch_id(), BatchId(1));
    }

    #[test]
    fn install_and_lookup() {
        let mut pool = SlotPool::new();
        pool.install(BatchId(1), batch_of(BatchId(1), 3)).unwrap();
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.get(SlotId(2)).unwrap().item_id, ItemId(12));
        assert_eq!(pool.next_batch_id(), BatchId(2));
        assert!(pool.get(SlotId(0)).is_err());
        let err = pool.get(SlotId(4)).unwrap_err();
        assert!(matches!(err, AuctionError::AuctionInactive { .. }));
    }

    #[test]
    fn install_rejects_bad_layout() {
        let mut pool = SlotPool::new();
        assert!(pool.install(BatchId(1), Vec::new()).is_err());

        let mut slots = batch_of(BatchId(1), 2);
        slots.swap(0, 1);
        assert!(pool.install(BatchId(1), slots).is_err());

        let slots = batch_of(BatchId(1), 2);
        assert!(pool.install(BatchId(2), slots).is_err());
        assert!(pool.is_empty());
    }

    #[test]
    fn expiry_check_counts_running_slots() {
        let mut pool = SlotPool::new();
        let mut slots = batch_of(BatchId(1), 2);
        slots[1].end_time += Duration::seconds(100);
        pool.install(BatchId(1), slots).unwrap();

        let day = DateTime::<Utc>::UNIX_EPOCH + Duration::days(1);
        let err = pool.ensure_all_expired(day).unwrap_err();
        assert!(matches!(err, AuctionError::AuctionsNotComplete { open: 1 }));
        assert!(pool.ensure_all_expired(day + Duration::seconds(100)).is_ok());

        // settled slots never block
        pool.get_mut(SlotId(2)).unwrap().settled = true;
        assert!(pool.ensure_all_expired(day).is_ok());
    }

    #[test]
    fn escrow_sums_unsettled_high_bids() {
        let mut pool = SlotPool::new();
        let mut slots = batch_of(BatchId(1), 3);
        for (i, slot) in (1..).zip(&mut slots) {
            slot.high_bid = Decimal::from(100 * i);
            slot.high_bidder = Some(addr(1));
        }
        pool.install(BatchId(1), slots).unwrap();
        assert_eq!(pool.escrowed(), Decimal::from(600));
        pool.get_mut(SlotId(3)).unwrap().settled = true;
        assert_eq!(pool.escrowed(), Decimal::from(300));
        assert!(!pool.all_settled());
    }

    #[test]
    fn whitelist_flags_clear() {
        let mut pool = SlotPool::new();
        let mut slots = batch_of(BatchId(1), 2);
        for slot in &mut slots {
            slot.is_whitelist_day = true;
        }
        pool.install(BatchId(1), slots).unwrap();
        assert!(pool.is_whitelist_batch());
        assert_eq!(pool.clear_whitelist_day(), 2);
        assert!(!pool.is_whitelist_batch());
        assert_eq!(pool.clear_whitelist_day(), 0);
    }
}
