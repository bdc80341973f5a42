//! Payout dispatcher: push first, wrap on failure.
//!
//! Every outgoing payment (bid refunds, creators fee, treasury share) goes
//! through [`PayoutDispatcher::pay`]. The push attempt gets a fixed effort
//! budget so a hostile recipient cannot stall the caller; when it fails the
//! same amount is credited in the wrapped fallback asset. A payout never
//! fails from the caller's point of view.

use rust_decimal::Decimal;
use tracing::warn;
use wizardhouse_types::{
    Address, AuctionEvent, PaymentRail, PayoutKind, PushOutcome,
    constants::REFUND_EFFORT_BUDGET,
};

/// How the value reached the recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayoutRoute {
    Pushed,
    /// Credited in the wrapped asset after the push failed.
    Wrapped,
    /// Zero amount, nothing moved.
    Skipped,
}

/// A completed payout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Payout {
    pub recipient: Address,
    pub amount: Decimal,
    pub kind: PayoutKind,
    pub route: PayoutRoute,
}

impl Payout {
    /// The signal to emit for a redirected payout, if any.
    #[must_use]
    pub fn redirect_event(&self) -> Option<AuctionEvent> {
        (self.route == PayoutRoute::Wrapped).then_some(AuctionEvent::PaymentRedirected {
            recipient: self.recipient,
            amount: self.amount,
            kind: self.kind,
        })
    }
}

/// Routes payouts and keeps running totals for conservation checks.
#[derive(Debug, Clone)]
pub struct PayoutDispatcher {
    effort_budget: u64,
    refunded: Decimal,
    proceeds: Decimal,
    wrapped: Decimal,
}

impl Default for PayoutDispatcher {
    fn default() -> Self {
        Self::new(REFUND_EFFORT_BUDGET)
    }
}

impl PayoutDispatcher {
    #[must_use]
    pub fn new(effort_budget: u64) -> Self {
        Self {
            effort_budget,
            refunded: Decimal::ZERO,
            proceeds: Decimal::ZERO,
            wrapped: Decimal::ZERO,
        }
    }

    #[must_use]
    pub fn effort_budget(&self) -> u64 {
        self.effort_budget
    }

    /// Total returned to displaced bidders.
    #[must_use]
    pub fn refunded(&self) -> Decimal {
        self.refunded
    }

    /// Total paid out as settlement proceeds.
    #[must_use]
    pub fn proceeds(&self) -> Decimal {
        self.proceeds
    }

    /// Portion of all payouts that went through the wrapped fallback.
    #[must_use]
    pub fn wrapped(&self) -> Decimal {
        self.wrapped
    }

    /// Deliver `amount` to `recipient`.
    pub fn pay<P: PaymentRail>(
        &mut self,
        rail: &mut P,
        recipient: Address,
        amount: Decimal,
        kind: PayoutKind,
    ) -> Payout {
        if amount.is_zero() {
            return Payout {
                recipient,
                amount,
                kind,
                route: PayoutRoute::Skipped,
            };
        }

        let route = match rail.attempt(recipient, amount, self.effort_budget) {
            PushOutcome::Delivered => PayoutRoute::Pushed,
            PushOutcome::Failed => {
                rail.credit_fallback(recipient, amount);
                self.wrapped += amount;
                warn!(
                    recipient = %recipient.short(),
                    amount = %amount,
                    kind = %kind,
                    "push payment failed, credited wrapped asset"
                );
                PayoutRoute::Wrapped
            }
        };

        match kind {
            PayoutKind::Refund => self.refunded += amount,
            PayoutKind::Proceeds => self.proceeds += amount,
        }

        Payout {
            recipient,
            amount,
            kind,
            route,
        }
    }
}

#[cfg(test)]
mod tests {
    use wizardhouse_types::{
        WrappedAsset,
        testing::{InMemoryPayments, addr},
    };

    use super::*;

    #[test]
    fn plain_recipient_is_pushed() {
        let mut rail = InMemoryPayments::new();
        let mut dispatcher = PayoutDispatcher::default();
        let payout = dispatcher.pay(&mut rail, addr(1), Decimal::from(70), PayoutKind::Refund);
        assert_eq!(payout.route, PayoutRoute::Pushed);
        assert!(payout.redirect_event().is_none());
        assert_eq!(rail.native_balance(addr(1)), Decimal::from(70));
        assert_eq!(dispatcher.refunded(), Decimal::from(70));
        assert_eq!(dispatcher.wrapped(), Decimal::ZERO);
    }

    #[test]
    fn hostile_recipient_gets_wrapped_credit() {
        let mut rail = InMemoryPayments::new();
        rail.make_hostile(addr(6));
        let mut dispatcher = PayoutDispatcher::default();
        let payout = dispatcher.pay(&mut rail, addr(6), Decimal::from(70), PayoutKind::Refund);
        assert_eq!(payout.route, PayoutRoute::Wrapped);
        assert_eq!(rail.native_balance(addr(6)), Decimal::ZERO);
        assert_eq!(rail.redeemable_balance_of(addr(6)), Decimal::from(70));
        assert_eq!(
            payout.redirect_event(),
            Some(AuctionEvent::PaymentRedirected {
                recipient: addr(6),
                amount: Decimal::from(70),
                kind: PayoutKind::Refund,
            })
        );
        assert_eq!(dispatcher.refunded(), Decimal::from(70));
        assert_eq!(dispatcher.wrapped(), Decimal::from(70));
    }

    #[test]
    fn zero_amount_skips_rail() {
        let mut rail = InMemoryPayments::new();
        let mut dispatcher = PayoutDispatcher::default();
        let payout = dispatcher.pay(&mut rail, addr(1), Decimal::ZERO, PayoutKind::Proceeds);
        assert_eq!(payout.route, PayoutRoute::Skipped);
        assert_eq!(rail.attempts(), 0);
    }

    #[test]
    fn budget_bounds_the_push() {
        let mut rail = InMemoryPayments::new();
        let mut dispatcher = PayoutDispatcher::new(100);
        // a plain transfer needs more than 100
        let payout = dispatcher.pay(&mut rail, addr(1), Decimal::from(5), PayoutKind::Proceeds);
        assert_eq!(payout.route, PayoutRoute::Wrapped);
        assert_eq!(
            payout.redirect_event(),
            Some(AuctionEvent::PaymentRedirected {
                recipient: addr(1),
                amount: Decimal::from(5),
                kind: PayoutKind::Proceeds,
            })
        );
        assert_eq!(dispatcher.proceeds(), Decimal::from(5));
        assert_eq!(dispatcher.effort_budget(), 100);
    }
}
