//! One-of-one allocator: hands out entries of the rare pool, one per batch.
//!
//! The cursor walks the pool and wraps. Each call scans at most one full
//! lap for an unminted entry; a lap that finds nothing flips the allocator
//! to exhausted for good, after which every call returns `None` without
//! scanning. [`OneOfOneAllocator::scan_steps`] counts every entry examined.

use wizardhouse_types::{AuctionError, Result};

#[derive(Debug, Clone)]
pub struct OneOfOneAllocator {
    /// `minted[i]` is set once entry `i` has been auctioned.
    minted: Vec<bool>,
    cursor: u32,
    enabled: bool,
    exhausted: bool,
    scan_steps: u64,
}

impl OneOfOneAllocator {
    #[must_use]
    pub fn new(pool_size: u32, enabled: bool) -> Self {
        Self {
            minted: vec![false; pool_size as usize],
            cursor: 0,
            enabled,
            exhausted: false,
            scan_steps: 0,
        }
    }

    #[must_use]
    pub fn pool_size(&self) -> u32 {
        u32::try_from(self.minted.len()).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    #[must_use]
    pub fn scan_steps(&self) -> u64 {
        self.scan_steps
    }

    /// Entries not yet handed out.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.minted.iter().filter(|m| !**m).count()
    }

    /// Toggle participation. The cursor is left where it is.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Jump the cursor to `index`.
    ///
    /// # Errors
    /// `OneOfOneOutOfRange` if `index` is outside the pool.
    pub fn set_cursor(&mut self, index: u32) -> Result<()> {
        let pool_size = self.pool_size();
        if index >= pool_size {
            return Err(AuctionError::OneOfOneOutOfRange { index, pool_size });
        }
        self.cursor = index;
        Ok(())
    }

    /// Claim the next unminted entry, or `None` when disabled or exhausted.
    pub fn next(&mut self) -> Option<u32> {
        if !self.enabled || self.exhausted {
            return None;
        }
        let size = self.pool_size();
        for offset in 0..size {
            self.scan_steps += 1;
            // cursor < size, so this wraps without overflowing
            let index = if offset < size - self.cursor {
                self.cursor + offset
            } else {
                offset - (size - self.cursor)
            };
            if !self.minted[index as usize] {
                self.minted[index as usize] = true;
                self.cursor = (index + 1) % size;
                return Some(index);
            }
        }
        self.exhausted = true;
        None
    }

    /// Return a claimed entry whose mint did not go through. The cursor goes
    /// back to it so it is offered again first.
    pub fn release(&mut self, index: u32) {
        if let Some(slot) = self.minted.get_mut(index as usize) {
            *slot = false;
            self.cursor = index;
            self.exhausted = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hands_out_each_entry_once() {
        let mut alloc = OneOfOneAllocator::new(3, true);
        assert_eq!(alloc.next(), Some(0));
        assert_eq!(alloc.next(), Some(1));
        assert_eq!(alloc.next(), Some(2));
        assert_eq!(alloc.remaining(), 0);
        assert_eq!(alloc.next(), None);
        assert!(alloc.is_exhausted());
    }

    #[test]
    fn exhaustion_stops_scanning() {
        let mut alloc = OneOfOneAllocator::new(2, true);
        alloc.next();
        alloc.next();
        assert_eq!(alloc.next(), None);
        let steps = alloc.scan_steps();
        for _ in 0..50 {
            assert_eq!(alloc.next(), None);
        }
        assert_eq!(alloc.scan_steps(), steps);
    }

    #[test]
    fn cursor_override_wraps_past_minted() {
        let mut alloc = OneOfOneAllocator::new(4, true);
        alloc.set_cursor(3).unwrap();
        assert_eq!(alloc.next(), Some(3));
        assert_eq!(alloc.cursor(), 0);
        alloc.set_cursor(3).unwrap();
        // 3 is taken, wraps to 0
        assert_eq!(alloc.next(), Some(0));
    }

    #[test]
    fn scan_wraps_from_every_cursor() {
        for start in 0..5 {
            let mut alloc = OneOfOneAllocator::new(5, true);
            alloc.set_cursor(start).unwrap();
            let order: Vec<u32> = std::iter::from_fn(|| alloc.next()).collect();
            let expected: Vec<u32> = (0..5).map(|i| (start + i) % 5).collect();
            assert_eq!(order, expected, "start {start}");
            assert!(alloc.is_exhausted());
        }
    }

    #[test]
    fn cursor_out_of_range() {
        let mut alloc = OneOfOneAllocator::new(2, true);
        let err = alloc.set_cursor(2).unwrap_err();
        assert!(matches!(
            err,
            AuctionError::OneOfOneOutOfRange { index: 2, pool_size: 2 }
        ));
        assert_eq!(alloc.cursor(), 0);
    }

    #[test]
    fn disabled_allocator_keeps_cursor_and_does_not_scan() {
        let mut alloc = OneOfOneAllocator::new(2, false);
        assert_eq!(alloc.next(), None);
        assert_eq!(alloc.scan_steps(), 0);
        assert!(!alloc.is_exhausted());
        alloc.set_enabled(true);
        assert_eq!(alloc.next(), Some(0));
    }

    #[test]
    fn released_entry_is_offered_again() {
        let mut alloc = OneOfOneAllocator::new(2, true);
        assert_eq!(alloc.next(), Some(0));
        alloc.release(0);
        assert_eq!(alloc.remaining(), 2);
        assert_eq!(alloc.next(), Some(0));
    }

    #[test]
    fn empty_pool_is_exhausted_on_first_use() {
        let mut alloc = OneOfOneAllocator::new(0, true);
        assert_eq!(alloc.next(), None);
        assert!(alloc.is_exhausted());
        assert!(alloc.set_cursor(0).is_err());
    }
}
