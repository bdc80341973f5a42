//! Configuration types for the auction house.
//!
//! [`AuctionConfig`] is the single owner-controlled configuration object.
//! Changes made through administrative commands are read at the next batch
//! creation; slots that are already open keep the timing they were created
//! with.

use chrono::Duration;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Address, AuctionError, Result, constants};

/// Live auction parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuctionConfig {
    /// Anti-sniping window in seconds.
    pub time_buffer_secs: u64,
    /// Minimum first bid, in the smallest currency unit.
    pub reserve_price: Decimal,
    /// Minimum raise over the current high bid, in basis points.
    pub min_increment_bps: u32,
    /// Length of each auction in seconds.
    pub duration_secs: u64,
    /// Number of slots opened per batch.
    pub auction_count: u32,
    /// Maximum number of items that may ever be minted.
    pub wizard_cap: u64,
    /// Whether batches reserve a slot for a one-of-one item.
    pub one_of_one_enabled: bool,
    /// Number of entries in the one-of-one pool.
    pub one_of_one_pool_size: u32,
    /// Share of proceeds paid to the creators account, in basis points.
    pub creators_fee_bps: u32,
}

impl Default for AuctionConfig {
    fn default() -> Self {
        Self {
            time_buffer_secs: constants::DEFAULT_TIME_BUFFER_SECS,
            reserve_price: Decimal::from(constants::DEFAULT_RESERVE_PRICE),
            min_increment_bps: constants::DEFAULT_MIN_INCREMENT_BPS,
            duration_secs: constants::DEFAULT_DURATION_SECS,
            auction_count: constants::DEFAULT_AUCTION_COUNT,
            wizard_cap: constants::DEFAULT_WIZARD_CAP,
            one_of_one_enabled: true,
            one_of_one_pool_size: constants::DEFAULT_ONE_OF_ONE_POOL_SIZE,
            creators_fee_bps: constants::DEFAULT_CREATORS_FEE_BPS,
        }
    }
}

impl AuctionConfig {
    /// Auction length as a chrono duration.
    #[must_use]
    pub fn duration(&self) -> Duration {
        secs_to_duration(self.duration_secs)
    }

    /// Anti-sniping window as a chrono duration.
    #[must_use]
    pub fn time_buffer(&self) -> Duration {
        secs_to_duration(self.time_buffer_secs)
    }

    /// Check every field against its allowed range.
    ///
    /// # Errors
    /// Returns [`AuctionError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        if self.auction_count == 0 || self.auction_count > constants::MAX_AUCTION_COUNT {
            return Err(AuctionError::InvalidConfig(format!(
                "auction_count must be in 1..={}, got {}",
                constants::MAX_AUCTION_COUNT,
                self.auction_count
            )));
        }
        if self.duration_secs == 0 || self.duration_secs > constants::MAX_DURATION_SECS {
            return Err(AuctionError::InvalidConfig(format!(
                "duration_secs must be in 1..={}, got {}",
                constants::MAX_DURATION_SECS,
                self.duration_secs
            )));
        }
        if self.time_buffer_secs > constants::MAX_TIME_BUFFER_SECS {
            return Err(AuctionError::InvalidConfig(format!(
                "time_buffer_secs must be <= {}, got {}",
                constants::MAX_TIME_BUFFER_SECS,
                self.time_buffer_secs
            )));
        }
        if self.one_of_one_pool_size > constants::MAX_ONE_OF_ONE_POOL_SIZE {
            return Err(AuctionError::InvalidConfig(format!(
                "one_of_one_pool_size must be <= {}, got {}",
                constants::MAX_ONE_OF_ONE_POOL_SIZE,
                self.one_of_one_pool_size
            )));
        }
        if self.reserve_price.is_sign_negative() || !self.reserve_price.fract().is_zero() {
            return Err(AuctionError::InvalidConfig(format!(
                "reserve_price must be a non-negative whole amount, got {}",
                self.reserve_price
            )));
        }
        if self.creators_fee_bps > constants::BPS_DENOMINATOR {
            return Err(AuctionError::InvalidConfig(format!(
                "creators_fee_bps must be <= {}, got {}",
                constants::BPS_DENOMINATOR,
                self.creators_fee_bps
            )));
        }
        Ok(())
    }
}

/// Well-known accounts the engine pays or answers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountsConfig {
    /// The single privileged actor allowed to run administrative commands.
    pub owner: Address,
    /// Receives the creators fee on every sale.
    pub creators: Address,
    /// Receives the remainder of every sale.
    pub treasury: Address,
}

impl AccountsConfig {
    /// # Errors
    /// Returns [`AuctionError::InvalidConfig`] if any account is the zero address.
    pub fn validate(&self) -> Result<()> {
        for (name, addr) in [
            ("owner", self.owner),
            ("creators", self.creators),
            ("treasury", self.treasury),
        ] {
            if addr.is_zero() {
                return Err(AuctionError::InvalidConfig(format!(
                    "{name} account must not be the zero address"
                )));
            }
        }
        Ok(())
    }
}

/// Everything needed to construct an auction house.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseConfig {
    pub accounts: AccountsConfig,
    #[serde(default)]
    pub auction: AuctionConfig,
}

impl HouseConfig {
    /// Parse and validate a JSON document.
    ///
    /// # Errors
    /// `Serialization` for malformed JSON, `InvalidConfig` for bad values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// # Errors
    /// Returns [`AuctionError::InvalidConfig`] on the first invalid field.
    pub fn validate(&self) -> Result<()> {
        self.accounts.validate()?;
        self.auction.validate()
    }
}

fn secs_to_duration(secs: u64) -> Duration {
    i64::try_from(secs)
        .ok()
        .and_then(Duration::try_seconds)
        .unwrap_or(Duration::MAX)
}
