//! System-wide constants for the Wizardhouse auction engine.

/// Denominator for all basis-point quantities (100% = 10 000 bps).
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Default anti-sniping window in seconds (15 minutes).
pub const DEFAULT_TIME_BUFFER_SECS: u64 = 15 * 60;

/// Default reserve price in the smallest currency unit (0.07 of a whole unit
/// with 18 decimals).
pub const DEFAULT_RESERVE_PRICE: i64 = 70_000_000_000_000_000;

/// Default minimum raise over the current high bid, in basis points (5%).
pub const DEFAULT_MIN_INCREMENT_BPS: u32 = 500;

/// Default auction duration in seconds (24 hours).
pub const DEFAULT_DURATION_SECS: u64 = 60 * 60 * 24;

/// Default number of concurrently open slots per batch.
pub const DEFAULT_AUCTION_COUNT: u32 = 3;

/// Default maximum number of mintable items.
pub const DEFAULT_WIZARD_CAP: u64 = 1_000;

/// Default size of the one-of-one pool.
pub const DEFAULT_ONE_OF_ONE_POOL_SIZE: u32 = 2;

/// Default share of proceeds routed to the creators account (10%).
pub const DEFAULT_CREATORS_FEE_BPS: u32 = 1_000;

/// Upper bound on concurrently open slots.
pub const MAX_AUCTION_COUNT: u32 = 100;

/// Upper bound on auction length in seconds (one year).
pub const MAX_DURATION_SECS: u64 = 60 * 60 * 24 * 365;

/// Upper bound on the anti-sniping window in seconds.
pub const MAX_TIME_BUFFER_SECS: u64 = MAX_DURATION_SECS;

/// Upper bound on the number of one-of-one pool entries.
pub const MAX_ONE_OF_ONE_POOL_SIZE: u32 = 10_000;

/// Upper bound on whitelist size loaded in a single command.
pub const MAX_WHITELIST_SIZE: usize = 10_000;

/// Effort budget granted to a push payment. Enough for a plain credit,
/// not enough for recipient-controlled logic.
pub const REFUND_EFFORT_BUDGET: u64 = 30_000;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "Wizardhouse";
