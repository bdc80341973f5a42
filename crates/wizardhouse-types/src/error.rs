//! Error types for the Wizardhouse auction engine.
//!
//! All errors use the `WH_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Bid validation errors
//! - 2xx: Sequencing errors
//! - 3xx: Capacity errors
//! - 4xx: Administration errors
//! - 5xx: Collaborator errors
//! - 9xx: General / internal errors
//!
//! Payment failures have no variant: a failed push payment is always
//! redirected to the wrapped fallback asset and never reaches the caller.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{Address, ItemId, SlotId};

/// Central error enum for all Wizardhouse operations.
#[derive(Debug, Error)]
pub enum AuctionError {
    // =================================================================
    // Bid Validation Errors (1xx)
    // =================================================================
    /// The slot does not exist, is already settled, or has expired.
    #[error("WH_ERR_100: Auction inactive for {slot_id}: {reason}")]
    AuctionInactive { slot_id: SlotId, reason: String },

    /// The bidder is not on the whitelist of a whitelist-day slot.
    #[error("WH_ERR_101: Bidder {bidder} is not on whitelist")]
    NotWhitelisted { bidder: Address },

    /// First bid below the reserve price.
    #[error("WH_ERR_102: Bid {amount} below reserve price {reserve}")]
    BelowReserve { amount: Decimal, reserve: Decimal },

    /// Follow-up bid does not beat the high bid by the minimum increment.
    #[error("WH_ERR_103: Bid {amount} must exceed {threshold} (minimum increment)")]
    BelowMinIncrement { amount: Decimal, threshold: Decimal },

    /// The amount is zero, negative, or not a whole number of units.
    #[error("WH_ERR_104: Invalid amount: {0}")]
    InvalidAmount(Decimal),

    /// The slot is selling a different item than the bidder targeted.
    #[error("WH_ERR_105: {item_id} is not up for auction in {slot_id}")]
    ItemNotUpForAuction { slot_id: SlotId, item_id: ItemId },

    /// The address could not be parsed or is not allowed here.
    #[error("WH_ERR_106: Invalid address {input}: {reason}")]
    InvalidAddress { input: String, reason: String },

    // =================================================================
    // Sequencing Errors (2xx)
    // =================================================================
    /// Settlement attempted while at least one slot is still running.
    #[error("WH_ERR_200: All auctions have not completed ({open} still open)")]
    AuctionsNotComplete { open: usize },

    /// The engine is paused.
    #[error("WH_ERR_201: Auction house is paused")]
    EnginePaused,

    /// The operation requires the engine to be paused.
    #[error("WH_ERR_202: Auction house is not paused")]
    NotPaused,

    /// The slot has already been settled.
    #[error("WH_ERR_203: {0} already settled")]
    AlreadySettled(SlotId),

    // =================================================================
    // Capacity Errors (3xx)
    // =================================================================
    /// No supply capacity remains under the current cap.
    #[error("WH_ERR_300: All wizards have been auctioned (cap {cap})")]
    AllSold { cap: u64 },

    // =================================================================
    // Administration Errors (4xx)
    // =================================================================
    /// The caller is not the privileged owner.
    #[error("WH_ERR_400: Caller {caller} is not the owner")]
    Unauthorized { caller: Address },

    /// A configuration value is out of range.
    #[error("WH_ERR_401: Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The requested one-of-one index does not exist in the pool.
    #[error("WH_ERR_402: One-of-one {index} does not exist (pool size {pool_size})")]
    OneOfOneOutOfRange { index: u32, pool_size: u32 },

    // =================================================================
    // Collaborator Errors (5xx)
    // =================================================================
    /// The minting collaborator rejected a request.
    #[error("WH_ERR_500: Minting service error: {reason}")]
    Minting { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Value conservation or another internal invariant broke.
    #[error("WH_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("WH_ERR_901: Serialization error: {0}")]
    Serialization(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, AuctionError>;

impl From<serde_json::Error> for AuctionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
