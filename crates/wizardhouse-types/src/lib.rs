//! # wizardhouse-types
//!
//! Shared types, errors, and configuration for the **Wizardhouse** auction
//! engine.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`Address`], [`ItemId`], [`SlotId`], [`BatchId`]
//! - **Slot model**: [`AuctionSlot`], [`SlotPhase`]
//! - **Signals**: [`AuctionEvent`], [`PauseReason`]
//! - **Configuration**: [`AuctionConfig`], [`AccountsConfig`], [`HouseConfig`]
//! - **Errors**: [`AuctionError`] with `WH_ERR_` prefix codes
//! - **Collaborators**: [`Clock`], [`MintingService`], [`PaymentRail`], [`WrappedAsset`]
//! - **Constants**: system-wide limits and defaults
//!
//! With the `test-helpers` feature, [`testing`] adds in-memory doubles for
//! every collaborator.

pub mod collaborators;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod ids;
pub mod slot;
#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;

// Re-export all primary types at crate root for ergonomic imports:
//   use wizardhouse_types::{AuctionSlot, AuctionEvent, SlotId, ...};

pub use collaborators::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use slot::*;

// Constants are accessed via `wizardhouse_types::constants::FOO`
// (not re-exported to avoid name collisions).
