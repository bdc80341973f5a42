//! Value conservation invariant checker.
//!
//! Checked after every bid and every settlement:
//! ```text
//! Σ(bids accepted) − Σ(refunds) − Σ(proceeds) == Σ(high bids of unsettled slots)
//! ```
//!
//! Every accepted bid is either still escrowed as a high bid, was returned
//! to the bidder it displaced, or was paid out as proceeds. Burned items
//! carry no value. A mismatch means the engine lost or minted money.

use rust_decimal::Decimal;
use wizardhouse_auction::{BidLedger, PayoutDispatcher, SlotPool};
use wizardhouse_types::{AuctionError, Result};

/// Running value totals at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueSnapshot {
    pub paid_in: Decimal,
    pub refunded: Decimal,
    pub proceeds: Decimal,
    pub escrowed: Decimal,
}

impl ValueSnapshot {
    #[must_use]
    pub fn capture(ledger: &BidLedger, payouts: &PayoutDispatcher, pool: &SlotPool) -> Self {
        Self {
            paid_in: ledger.paid_in(),
            refunded: payouts.refunded(),
            proceeds: payouts.proceeds(),
            escrowed: pool.escrowed(),
        }
    }

    /// Escrow implied by the inflow and outflow totals.
    #[must_use]
    pub fn expected_escrow(&self) -> Decimal {
        self.paid_in - self.refunded - self.proceeds
    }

    /// # Errors
    /// `Internal` if the escrow held does not match the totals.
    pub fn verify(&self) -> Result<()> {
        let expected = self.expected_escrow();
        if self.escrowed != expected {
            return Err(AuctionError::Internal(format!(
                "value not conserved: escrowed {} != expected {expected} \
                 (paid_in={}, refunded={}, proceeds={})",
                self.escrowed, self.paid_in, self.refunded, self.proceeds
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(paid_in: i64, refunded: i64, proceeds: i64, escrowed: i64) -> ValueSnapshot {
        ValueSnapshot {
            paid_in: Decimal::from(paid_in),
            refunded: Decimal::from(refunded),
            proceeds: Decimal::from(proceeds),
            escrowed: Decimal::from(escrowed),
        }
    }

    #[test]
    fn empty_is_balanced() {
        assert!(snap(0, 0, 0, 0).verify().is_ok());
    }

    #[test]
    fn outbid_then_settled_balances() {
        // 100 then 110 on one slot, settled for 110
        assert!(snap(210, 100, 0, 110).verify().is_ok());
        assert!(snap(210, 100, 110, 0).verify().is_ok());
    }

    #[test]
    fn leak_is_detected() {
        let err = snap(210, 100, 0, 100).verify().unwrap_err();
        assert!(matches!(err, AuctionError::Internal(_)));
    }

    #[test]
    fn capture_reads_components() {
        let ledger = BidLedger::new(wizardhouse_auction::BidTerms::from_config(
            &wizardhouse_types::AuctionConfig::default(),
        ));
        let snapshot = ValueSnapshot::capture(&ledger, &PayoutDispatcher::default(), &SlotPool::new());
        assert_eq!(snapshot, snap(0, 0, 0, 0));
    }
}
