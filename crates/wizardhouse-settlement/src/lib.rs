//! # wizardhouse-settlement
//!
//! **Finality plane**: settlement, rollover, supply cap enforcement,
//! proceeds distribution, and the verifiable event journal.
//!
//! ## Architecture
//!
//! [`AuctionHouse`] owns the whole engine state and drives the auction plane
//! (`wizardhouse-auction`) together with three collaborators: a clock, a
//! minting service and a payment rail. On each rollover it:
//! 1. Settles every expired slot (transfer + [`ProceedsSplit`], or burn)
//! 2. Asks the [`SupplyGovernor`] whether any capacity remains
//! 3. Opens the next batch, tagging slot 1 via the [`OneOfOneAllocator`]
//! 4. Checks [`ValueSnapshot`] conservation
//! 5. Appends the emitted events to the [`EventJournal`] hash chain
//!
//! Every transition is serialized on `&mut self`; there are no threads,
//! timers or blocking calls. Expiry is discovered by reading the clock.

pub mod conservation;
pub mod engine;
pub mod journal;
pub mod one_of_one;
pub mod proceeds;
pub mod supply;

pub use conservation::ValueSnapshot;
pub use engine::{AdminCommand, AuctionHouse, PauseState, RolloverReport};
pub use journal::EventJournal;
pub use one_of_one::OneOfOneAllocator;
pub use proceeds::{ProceedsSplit, Shares};
pub use supply::{MintAdmission, SupplyGovernor};
