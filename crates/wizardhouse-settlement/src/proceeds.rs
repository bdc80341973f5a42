//! Proceeds split between the creators and treasury accounts.

use rust_decimal::Decimal;
use wizardhouse_types::{AuctionError, Result, constants::BPS_DENOMINATOR};

/// Creators get `creators_fee_bps` of the winning bid, rounded down to whole
/// units; the treasury gets the rest, so the two shares always sum to the
/// bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProceedsSplit {
    creators_fee_bps: u32,
}

/// One settled sale's shares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shares {
    pub creators: Decimal,
    pub treasury: Decimal,
}

impl ProceedsSplit {
    #[must_use]
    pub fn new(creators_fee_bps: u32) -> Self {
        Self { creators_fee_bps }
    }

    #[must_use]
    pub fn creators_fee_bps(&self) -> u32 {
        self.creators_fee_bps
    }

    /// # Errors
    /// `Internal` if the fee computation overflows.
    pub fn split(&self, amount: Decimal) -> Result<Shares> {
        let creators = amount
            .checked_mul(Decimal::from(self.creators_fee_bps))
            .and_then(|scaled| scaled.checked_div(Decimal::from(BPS_DENOMINATOR)))
            .map(|fee| fee.floor())
            .ok_or_else(|| {
                AuctionError::Internal(format!("creators fee on {amount} overflowed"))
            })?;
        Ok(Shares {
            creators,
            treasury: amount - creators,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_percent_split() {
        let split = ProceedsSplit::new(1_000);
        let shares = split.split(Decimal::from(70_000)).unwrap();
        assert_eq!(shares.creators, Decimal::from(7_000));
        assert_eq!(shares.treasury, Decimal::from(63_000));
    }

    #[test]
    fn fee_rounds_down_and_shares_sum() {
        let split = ProceedsSplit::new(1_000);
        let shares = split.split(Decimal::from(1_009)).unwrap();
        assert_eq!(shares.creators, Decimal::from(100));
        assert_eq!(shares.treasury, Decimal::from(909));
        assert_eq!(shares.creators + shares.treasury, Decimal::from(1_009));
    }

    #[test]
    fn zero_and_full_fee() {
        let none = ProceedsSplit::new(0).split(Decimal::from(50)).unwrap();
        assert_eq!(none.creators, Decimal::ZERO);
        assert_eq!(none.treasury, Decimal::from(50));
        let all = ProceedsSplit::new(10_000).split(Decimal::from(50)).unwrap();
        assert_eq!(all.creators, Decimal::from(50));
        assert_eq!(all.treasury, Decimal::ZERO);
    }
}
