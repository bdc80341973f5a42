//! # wizardhouse-auction
//!
//! **Auction plane**: everything that happens between a batch opening and
//! its slots expiring.
//!
//! ## Components
//!
//! 1. **SlotPool**: the concurrently open slots of the current batch
//! 2. **WhitelistGate**: insertion-ordered allow-list for whitelist batches
//! 3. **BidLedger**: reserve and minimum-increment checks, high-bid
//!    replacement, anti-sniping extension
//! 4. **PayoutDispatcher**: bounded-effort push payment with a wrapped-asset
//!    fallback, used for refunds and proceeds alike
//!
//! ## Bid Flow
//!
//! ```text
//! SlotPool.get_mut() → BidLedger.place() (WhitelistGate.authorize())
//!     → PayoutDispatcher.pay(displaced bidder)
//! ```
//!
//! Nothing here reads a clock or emits events on its own; the settlement
//! crate drives these pieces and turns their outcomes into signals.

pub mod ledger;
pub mod pool;
pub mod refund;
pub mod whitelist;

pub use ledger::{AcceptedBid, BidLedger, BidTerms};
pub use pool::SlotPool;
pub use refund::{Payout, PayoutDispatcher, PayoutRoute};
pub use whitelist::WhitelistGate;
