//! The auction house: bid intake, rollover settlement, and administration.
//!
//! ## Rollover
//!
//! ```text
//! settle_current_and_create_new_auction()
//!   1. refuse while paused, while any slot is still running, or when the
//!      next batch's end time would fall off the calendar
//!   2. settle every open slot in slot order (transfer + proceeds, or burn)
//!   3. clear the whitelist if the settled batch was whitelist-tagged
//!   4. no capacity left → CapReached + pause, stop
//!   5. open `auction_count` slots (fewer if capacity runs out part-way)
//! ```
//!
//! ## Atomicity
//!
//! Every transition runs against a staged copy of the engine state and
//! buffers its events. Validation happens before the first mutation, so a
//! rejected call commits nothing. Once a collaborator has been driven
//! (an item transferred, a payment pushed) the staged state is committed
//! even if a later step fails, so a retry resumes instead of repeating
//! work. Value conservation is verified before every commit.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use wizardhouse_auction::{
    AcceptedBid, BidLedger, BidTerms, PayoutDispatcher, SlotPool, WhitelistGate,
};
use wizardhouse_types::{
    AccountsConfig, Address, AuctionConfig, AuctionError, AuctionEvent, AuctionSlot, BatchId,
    Clock, HouseConfig, ItemId, MintingService, PauseReason, PaymentRail, PayoutKind, Result,
    SlotId, SlotPhase, constants,
};

use crate::{
    conservation::ValueSnapshot,
    journal::EventJournal,
    one_of_one::OneOfOneAllocator,
    proceeds::ProceedsSplit,
    supply::{MintAdmission, SupplyGovernor},
};

/// Whether the house accepts bids and rolls batches over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PauseState {
    Running,
    Paused(PauseReason),
}

impl std::fmt::Display for PauseState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Running => write!(f, "RUNNING"),
            Self::Paused(reason) => write!(f, "PAUSED({reason})"),
        }
    }
}

/// Owner-only operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCommand {
    Pause,
    /// Resume, creating a batch if none is open.
    Unpause,
    SetTimeBuffer(u64),
    SetReservePrice(Decimal),
    SetMinIncrementBps(u32),
    SetDuration(u64),
    SetAuctionCount(u32),
    SetWizardCap(u64),
    /// Jump the one-of-one cursor.
    SetOneOfOneId(u32),
    /// Toggle one-of-one slots for future batches.
    SetAuctionOneOfOne(bool),
    /// Replace the whitelist that will tag the next batch.
    SetWhitelistAddresses(Vec<Address>),
    /// Clear the whitelist and untag every open slot now.
    StopWhitelistDay,
    TransferOwnership(Address),
}

impl AdminCommand {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pause => "PAUSE",
            Self::Unpause => "UNPAUSE",
            Self::SetTimeBuffer(_) => "SET_TIME_BUFFER",
            Self::SetReservePrice(_) => "SET_RESERVE_PRICE",
            Self::SetMinIncrementBps(_) => "SET_MIN_INCREMENT_BPS",
            Self::SetDuration(_) => "SET_DURATION",
            Self::SetAuctionCount(_) => "SET_AUCTION_COUNT",
            Self::SetWizardCap(_) => "SET_WIZARD_CAP",
            Self::SetOneOfOneId(_) => "SET_ONE_OF_ONE_ID",
            Self::SetAuctionOneOfOne(_) => "SET_AUCTION_ONE_OF_ONE",
            Self::SetWhitelistAddresses(_) => "SET_WHITELIST_ADDRESSES",
            Self::StopWhitelistDay => "STOP_WHITELIST_DAY",
            Self::TransferOwnership(_) => "TRANSFER_OWNERSHIP",
        }
    }
}

/// What a rollover did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RolloverReport {
    pub settled: Vec<SlotId>,
    pub created: Vec<SlotId>,
    /// The batch the created slots belong to.
    pub batch: Option<BatchId>,
    /// Supply ran out and the house paused instead of rolling over.
    pub paused: bool,
}

// ---------------------------------------------------------------------------
// Engine state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct HouseState {
    config: AuctionConfig,
    accounts: AccountsConfig,
    pause: PauseState,
    pool: SlotPool,
    whitelist: WhitelistGate,
    ledger: BidLedger,
    payouts: PayoutDispatcher,
    supply: SupplyGovernor,
    one_of_one: OneOfOneAllocator,
    proceeds: ProceedsSplit,
}

impl HouseState {
    fn new(config: HouseConfig) -> Self {
        let HouseConfig { accounts, auction } = config;
        Self {
            pause: PauseState::Paused(PauseReason::Administrative),
            pool: SlotPool::new(),
            whitelist: WhitelistGate::new(),
            ledger: BidLedger::new(BidTerms::from_config(&auction)),
            payouts: PayoutDispatcher::default(),
            supply: SupplyGovernor::new(auction.wizard_cap),
            one_of_one: OneOfOneAllocator::new(
                auction.one_of_one_pool_size,
                auction.one_of_one_enabled,
            ),
            proceeds: ProceedsSplit::new(auction.creators_fee_bps),
            config: auction,
            accounts,
        }
    }

    fn ensure_running(&self) -> Result<()> {
        match self.pause {
            PauseState::Running => Ok(()),
            PauseState::Paused(_) => Err(AuctionError::EnginePaused),
        }
    }

    /// Apply a bid and refund whoever it displaced.
    fn bid<P: PaymentRail>(
        &mut self,
        rail: &mut P,
        slot_id: SlotId,
        bidder: Address,
        amount: Decimal,
        now: DateTime<Utc>,
        events: &mut Vec<AuctionEvent>,
    ) -> Result<AcceptedBid> {
        let slot = self.pool.get_mut(slot_id)?;
        let accepted = self.ledger.place(slot, &self.whitelist, bidder, amount, now)?;

        if let Some((previous, refund)) = accepted.displaced {
            let payout = self.payouts.pay(rail, previous, refund, PayoutKind::Refund);
            events.extend(payout.redirect_event());
        }

        events.push(AuctionEvent::BidAccepted {
            slot_id,
            item_id: accepted.item_id,
            bidder,
            amount,
            extended: accepted.extended,
        });
        if accepted.extended {
            events.push(AuctionEvent::AuctionExtended {
                slot_id,
                item_id: accepted.item_id,
                end_time: accepted.end_time,
            });
        }
        Ok(accepted)
    }

    /// Transfer-or-burn one expired slot and pay out its proceeds.
    fn settle_slot<M: MintingService, P: PaymentRail>(
        &mut self,
        minter: &mut M,
        rail: &mut P,
        slot_id: SlotId,
        events: &mut Vec<AuctionEvent>,
    ) -> Result<()> {
        let slot = self.pool.get(slot_id)?;
        if slot.settled {
            return Err(AuctionError::AlreadySettled(slot_id));
        }
        let item_id = slot.item_id;
        let amount = slot.high_bid;
        let winner = slot.high_bidder;

        match winner {
            Some(winner) => {
                let shares = self.proceeds.split(amount)?;
                minter.transfer(item_id, winner)?;
                for (recipient, share) in [
                    (self.accounts.creators, shares.creators),
                    (self.accounts.treasury, shares.treasury),
                ] {
                    let payout = self.payouts.pay(rail, recipient, share, PayoutKind::Proceeds);
                    events.extend(payout.redirect_event());
                }
            }
            None => minter.burn(item_id)?,
        }

        self.pool.get_mut(slot_id)?.mark_settled()?;
        events.push(AuctionEvent::Settled {
            slot_id,
            item_id,
            winner,
            amount,
        });
        info!(
            slot = %slot_id,
            item = %item_id,
            winner = %winner.map_or_else(|| "burned".to_string(), |w| w.short()),
            amount = %amount,
            "auction settled"
        );
        Ok(())
    }

    /// Forget the whitelist once every slot of a whitelist batch has settled.
    fn close_out_whitelist(&mut self) {
        if self.pool.all_settled() && self.pool.is_whitelist_batch() && !self.whitelist.is_empty()
        {
            let cleared = self.whitelist.len();
            self.whitelist.clear();
            info!(cleared, "whitelist cleared after whitelist batch");
        }
    }

    fn enter_exhausted(&mut self, events: &mut Vec<AuctionEvent>) {
        events.extend(self.supply.signal_cap_reached());
        self.pause = PauseState::Paused(PauseReason::SupplyExhausted);
        events.push(AuctionEvent::Paused {
            reason: PauseReason::SupplyExhausted,
        });
        info!(
            cap = self.supply.cap(),
            last_item = ?self.supply.last_item_id(),
            "supply exhausted, auction house paused"
        );
    }

    /// Mint one item for `slot_id`, burning it if it lands above the cap.
    /// Returns the item and whether it is a one-of-one, or `None` if the
    /// item had to be burned.
    fn mint_for_slot<M: MintingService>(
        &mut self,
        minter: &mut M,
        slot_id: SlotId,
    ) -> Result<Option<(ItemId, bool)>> {
        let one_of_one = if slot_id == SlotId::FIRST {
            self.one_of_one.next()
        } else {
            None
        };
        let minted = match one_of_one {
            Some(index) => minter.mint_one_of_one(index),
            None => minter.mint_next(),
        };
        let item = match minted {
            Ok(item) => item,
            Err(e) => {
                if let Some(index) = one_of_one {
                    self.one_of_one.release(index);
                }
                return Err(e);
            }
        };
        match self.supply.admit(item) {
            MintAdmission::Accepted => Ok(Some((item, one_of_one.is_some()))),
            MintAdmission::OverCap => {
                minter.burn(item)?;
                Ok(None)
            }
        }
    }

    /// End time shared by every slot of a batch opened at `now`.
    ///
    /// Checked before anything is settled or minted, so a duration the
    /// calendar cannot hold never costs an item.
    fn batch_end_time(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
        let duration = self.config.duration();
        now.checked_add_signed(duration)
            .filter(|end| *end > now)
            .ok_or_else(|| {
                AuctionError::InvalidConfig(format!(
                    "duration {duration} does not produce a valid end time"
                ))
            })
    }

    /// Open a new batch of up to `auction_count` slots.
    ///
    /// Stops early when capacity runs out. On a minting failure the slots
    /// created so far are still installed and the error is returned.
    fn create_batch<M: MintingService>(
        &mut self,
        minter: &mut M,
        now: DateTime<Utc>,
        events: &mut Vec<AuctionEvent>,
    ) -> Result<Vec<SlotId>> {
        self.batch_end_time(now)?;
        let batch = self.pool.next_batch_id();
        let is_whitelist_day = !self.whitelist.is_empty();
        let duration = self.config.duration();
        let mut slots = Vec::new();
        let mut failure = None;

        for n in 1..=self.config.auction_count {
            let slot_id = SlotId(n);
            if !self.supply.has_capacity(minter) {
                warn!(
                    batch = %batch,
                    requested = self.config.auction_count,
                    created = slots.len(),
                    "supply ran out mid-batch, batch truncated"
                );
                break;
            }
            let (item_id, is_one_of_one) = match self.mint_for_slot(minter, slot_id) {
                Ok(Some(minted)) => minted,
                Ok(None) => break,
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            };
            let slot = AuctionSlot::open(
                slot_id,
                batch,
                item_id,
                now,
                duration,
                is_whitelist_day,
                is_one_of_one,
            )?;
            events.push(AuctionEvent::BatchCreated {
                batch,
                slot_id,
                item_id,
                start_time: slot.start_time,
                end_time: slot.end_time,
                is_whitelist_day,
                is_one_of_one,
            });
            info!(
                batch = %batch,
                slot = %slot_id,
                item = %item_id,
                whitelist = is_whitelist_day,
                one_of_one = is_one_of_one,
                "auction created"
            );
            slots.push(slot);
        }

        let created: Vec<SlotId> = slots.iter().map(|s| s.id).collect();
        if !slots.is_empty() {
            self.pool.install(batch, slots)?;
            self.ledger.set_terms(BidTerms::from_config(&self.config));
        }
        match failure {
            Some(e) => Err(e),
            None => Ok(created),
        }
    }

    fn rollover<M: MintingService, P: PaymentRail>(
        &mut self,
        minter: &mut M,
        rail: &mut P,
        now: DateTime<Utc>,
        events: &mut Vec<AuctionEvent>,
    ) -> Result<RolloverReport> {
        let mut report = RolloverReport::default();
        self.batch_end_time(now)?;

        let open: Vec<SlotId> = self
            .pool
            .iter()
            .filter(|s| !s.settled)
            .map(|s| s.id)
            .collect();
        for slot_id in open {
            self.settle_slot(minter, rail, slot_id, events)?;
            report.settled.push(slot_id);
        }
        if !report.settled.is_empty() {
            self.close_out_whitelist();
        }

        if !self.supply.has_capacity(minter) {
            self.enter_exhausted(events);
            report.paused = true;
            return Ok(report);
        }

        report.created = self.create_batch(minter, now, events)?;
        if report.created.is_empty() {
            self.enter_exhausted(events);
            report.paused = true;
        } else {
            report.batch = self.pool.current_batch();
        }
        Ok(report)
    }

    fn unpause<M: MintingService>(
        &mut self,
        minter: &mut M,
        now: DateTime<Utc>,
        events: &mut Vec<AuctionEvent>,
    ) -> Result<()> {
        if self.pause == PauseState::Running {
            return Err(AuctionError::NotPaused);
        }
        if !self.supply.has_capacity(minter) {
            return Err(AuctionError::AllSold {
                cap: self.supply.cap(),
            });
        }
        if self.pool.all_settled() {
            self.batch_end_time(now)?;
        }
        self.pause = PauseState::Running;
        events.push(AuctionEvent::Unpaused);
        info!("auction house unpaused");

        if self.pool.all_settled() && self.create_batch(minter, now, events)?.is_empty() {
            self.enter_exhausted(events);
        }
        Ok(())
    }

    /// Validate a config change on a copy and install it.
    fn update_config(&mut self, change: impl FnOnce(&mut AuctionConfig)) -> Result<()> {
        let mut next = self.config.clone();
        change(&mut next);
        next.validate()?;
        self.config = next;
        Ok(())
    }

    fn administer<M: MintingService>(
        &mut self,
        minter: &mut M,
        command: AdminCommand,
        now: DateTime<Utc>,
        events: &mut Vec<AuctionEvent>,
    ) -> Result<()> {
        match command {
            AdminCommand::Pause => {
                self.ensure_running()?;
                self.pause = PauseState::Paused(PauseReason::Administrative);
                events.push(AuctionEvent::Paused {
                    reason: PauseReason::Administrative,
                });
                info!("auction house paused");
            }
            AdminCommand::Unpause => self.unpause(minter, now, events)?,
            AdminCommand::SetTimeBuffer(time_buffer_secs) => {
                self.update_config(|c| c.time_buffer_secs = time_buffer_secs)?;
                events.push(AuctionEvent::TimeBufferUpdated { time_buffer_secs });
            }
            AdminCommand::SetReservePrice(reserve_price) => {
                self.update_config(|c| c.reserve_price = reserve_price)?;
                events.push(AuctionEvent::ReservePriceUpdated { reserve_price });
            }
            AdminCommand::SetMinIncrementBps(min_increment_bps) => {
                self.update_config(|c| c.min_increment_bps = min_increment_bps)?;
                events.push(AuctionEvent::MinIncrementUpdated { min_increment_bps });
            }
            AdminCommand::SetDuration(duration_secs) => {
                self.update_config(|c| c.duration_secs = duration_secs)?;
                events.push(AuctionEvent::DurationUpdated { duration_secs });
            }
            AdminCommand::SetAuctionCount(auction_count) => {
                self.update_config(|c| c.auction_count = auction_count)?;
                events.push(AuctionEvent::AuctionCountUpdated { auction_count });
            }
            AdminCommand::SetWizardCap(wizard_cap) => {
                self.update_config(|c| c.wizard_cap = wizard_cap)?;
                self.supply.set_cap(wizard_cap);
                events.push(AuctionEvent::WizardCapUpdated { wizard_cap });
            }
            AdminCommand::SetOneOfOneId(index) => {
                self.one_of_one.set_cursor(index)?;
                info!(index, "one-of-one cursor moved");
            }
            AdminCommand::SetAuctionOneOfOne(enabled) => {
                self.update_config(|c| c.one_of_one_enabled = enabled)?;
                self.one_of_one.set_enabled(enabled);
                info!(enabled, "one-of-one auctions toggled");
            }
            AdminCommand::SetWhitelistAddresses(addresses) => {
                let size = self.whitelist.replace(&addresses)?;
                info!(size, "whitelist loaded");
            }
            AdminCommand::StopWhitelistDay => {
                self.whitelist.clear();
                let untagged = self.pool.clear_whitelist_day();
                info!(untagged, "whitelist day stopped");
            }
            AdminCommand::TransferOwnership(new_owner) => {
                if new_owner.is_zero() {
                    return Err(AuctionError::InvalidAddress {
                        input: new_owner.to_string(),
                        reason: "owner cannot be the zero address".into(),
                    });
                }
                let previous = self.accounts.owner;
                self.accounts.owner = new_owner;
                events.push(AuctionEvent::OwnershipTransferred {
                    previous,
                    new_owner,
                });
                info!(previous = %previous.short(), new_owner = %new_owner.short(), "ownership transferred");
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// AuctionHouse
// ---------------------------------------------------------------------------

/// Parallel rolling-batch auction engine.
///
/// Starts paused; the owner's first [`AdminCommand::Unpause`] opens the
/// first batch.
pub struct AuctionHouse<C, M, P> {
    clock: C,
    minter: M,
    rail: P,
    state: HouseState,
    journal: EventJournal,
}

impl<C: Clock, M: MintingService, P: PaymentRail> AuctionHouse<C, M, P> {
    /// # Errors
    /// `InvalidConfig` if the configuration does not validate.
    pub fn new(config: HouseConfig, clock: C, minter: M, rail: P) -> Result<Self> {
        config.validate()?;
        info!(
            engine = constants::ENGINE_NAME,
            version = constants::VERSION,
            owner = %config.accounts.owner.short(),
            auction_count = config.auction.auction_count,
            wizard_cap = config.auction.wizard_cap,
            "auction house initialised"
        );
        Ok(Self {
            clock,
            minter,
            rail,
            state: HouseState::new(config),
            journal: EventJournal::new(),
        })
    }

    fn commit(&mut self, staged: HouseState, events: Vec<AuctionEvent>) -> Result<()> {
        ValueSnapshot::capture(&staged.ledger, &staged.payouts, &staged.pool).verify()?;
        self.journal.append_all(events)?;
        self.state = staged;
        Ok(())
    }

    // ----- Bidding --------------------------------------------------------

    /// Bid `amount` on whatever slot `slot_id` currently sells.
    ///
    /// # Errors
    /// `EnginePaused`, then anything [`BidLedger::check`] rejects. Nothing
    /// changes on error.
    pub fn place_bid(
        &mut self,
        slot_id: SlotId,
        amount: Decimal,
        bidder: Address,
    ) -> Result<AcceptedBid> {
        self.state.ensure_running()?;
        let now = self.clock.now();
        let mut staged = self.state.clone();
        let mut events = Vec::new();
        let accepted = staged.bid(&mut self.rail, slot_id, bidder, amount, now, &mut events)?;
        self.commit(staged, events)?;
        Ok(accepted)
    }

    /// Like [`AuctionHouse::place_bid`], but only if the slot still sells
    /// `item_id`.
    ///
    /// # Errors
    /// `ItemNotUpForAuction` if the slot has rolled over to another item.
    pub fn place_bid_on_item(
        &mut self,
        slot_id: SlotId,
        item_id: ItemId,
        amount: Decimal,
        bidder: Address,
    ) -> Result<AcceptedBid> {
        if self.state.pool.get(slot_id)?.item_id != item_id {
            return Err(AuctionError::ItemNotUpForAuction { slot_id, item_id });
        }
        self.place_bid(slot_id, amount, bidder)
    }

    // ----- Settlement -----------------------------------------------------

    /// Settle every open slot and open the next batch.
    ///
    /// # Errors
    /// `EnginePaused`, `AuctionsNotComplete`, or a collaborator failure.
    pub fn settle_current_and_create_new_auction(&mut self) -> Result<RolloverReport> {
        self.state.ensure_running()?;
        let now = self.clock.now();
        self.state.pool.ensure_all_expired(now)?;

        let mut staged = self.state.clone();
        let mut events = Vec::new();
        let outcome = staged.rollover(&mut self.minter, &mut self.rail, now, &mut events);
        self.commit(staged, events)?;
        outcome
    }

    /// Settle a single expired slot without rolling over. Only while paused.
    ///
    /// # Errors
    /// `NotPaused`, `AlreadySettled`, `AuctionsNotComplete` if the slot is
    /// still running, or a collaborator failure.
    pub fn settle_auction(&mut self, slot_id: SlotId) -> Result<()> {
        if self.state.pause == PauseState::Running {
            return Err(AuctionError::NotPaused);
        }
        let now = self.clock.now();
        match self.state.pool.get(slot_id)?.phase(now) {
            SlotPhase::Settled => return Err(AuctionError::AlreadySettled(slot_id)),
            SlotPhase::Running => return Err(AuctionError::AuctionsNotComplete { open: 1 }),
            SlotPhase::Expired => {}
        }

        let mut staged = self.state.clone();
        let mut events = Vec::new();
        let outcome = staged.settle_slot(&mut self.minter, &mut self.rail, slot_id, &mut events);
        if outcome.is_ok() {
            staged.close_out_whitelist();
        }
        self.commit(staged, events)?;
        outcome
    }

    // ----- Administration -------------------------------------------------

    /// Run an owner-only command.
    ///
    /// # Errors
    /// `Unauthorized` for any caller but the owner, otherwise the command's
    /// own validation error.
    pub fn administer(&mut self, caller: Address, command: AdminCommand) -> Result<()> {
        if caller != self.state.accounts.owner {
            warn!(caller = %caller.short(), command = command.name(), "unauthorized admin call");
            return Err(AuctionError::Unauthorized { caller });
        }
        let now = self.clock.now();
        let mut staged = self.state.clone();
        let mut events = Vec::new();
        let outcome = staged.administer(&mut self.minter, command, now, &mut events);
        self.commit(staged, events)?;
        outcome
    }

    // ----- Queries --------------------------------------------------------

    #[must_use]
    pub fn config(&self) -> &AuctionConfig {
        &self.state.config
    }

    #[must_use]
    pub fn accounts(&self) -> &AccountsConfig {
        &self.state.accounts
    }

    #[must_use]
    pub fn owner(&self) -> Address {
        self.state.accounts.owner
    }

    #[must_use]
    pub fn pause_state(&self) -> PauseState {
        self.state.pause
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.state.pause != PauseState::Running
    }

    /// # Errors
    /// `AuctionInactive` if no such slot exists.
    pub fn slot(&self, slot_id: SlotId) -> Result<&AuctionSlot> {
        self.state.pool.get(slot_id)
    }

    pub fn slots(&self) -> impl Iterator<Item = &AuctionSlot> {
        self.state.pool.iter()
    }

    #[must_use]
    pub fn current_batch(&self) -> Option<BatchId> {
        self.state.pool.current_batch()
    }

    /// Terms bids on the open batch are judged by.
    #[must_use]
    pub fn bid_terms(&self) -> &BidTerms {
        self.state.ledger.terms()
    }

    #[must_use]
    pub fn whitelist(&self) -> &WhitelistGate {
        &self.state.whitelist
    }

    #[must_use]
    pub fn one_of_one(&self) -> &OneOfOneAllocator {
        &self.state.one_of_one
    }

    #[must_use]
    pub fn supply(&self) -> &SupplyGovernor {
        &self.state.supply
    }

    #[must_use]
    pub fn value_snapshot(&self) -> ValueSnapshot {
        ValueSnapshot::capture(&self.state.ledger, &self.state.payouts, &self.state.pool)
    }

    #[must_use]
    pub fn journal(&self) -> &EventJournal {
        &self.journal
    }

    /// Hand all undelivered events to the caller, oldest first.
    pub fn drain_events(&mut self) -> Vec<AuctionEvent> {
        self.journal.drain()
    }

    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    #[must_use]
    pub fn minter(&self) -> &M {
        &self.minter
    }

    #[must_use]
    pub fn rail(&self) -> &P {
        &self.rail
    }
}

#[cfg(test)]
mod tests {
    use wizardhouse_types::testing::{InMemoryMinter, InMemoryPayments, ManualClock, addr};

    use super::*;

    const OWNER: u8 = 0xAA;

    fn house() -> AuctionHouse<ManualClock, InMemoryMinter, InMemoryPayments> {
        let config = HouseConfig {
            accounts: AccountsConfig {
                owner: addr(OWNER),
                creators: addr(0xC0),
                treasury: addr(0x7E),
            },
            auction: AuctionConfig {
                reserve_price: Decimal::from(100),
                one_of_one_enabled: false,
                ..AuctionConfig::default()
            },
        };
        AuctionHouse::new(
            config,
            ManualClock::at(1_000),
            InMemoryMinter::new(addr(0x11), addr(0xC0), 100),
            InMemoryPayments::new(),
        )
        .unwrap()
    }

    #[test]
    fn starts_paused_without_a_batch() {
        let h = house();
        assert_eq!(
            h.pause_state(),
            PauseState::Paused(PauseReason::Administrative)
        );
        assert_eq!(h.current_batch(), None);
        assert!(h.journal().events().is_empty());
    }

    #[test]
    fn invalid_config_is_refused() {
        let mut config = HouseConfig {
            accounts: AccountsConfig {
                owner: addr(1),
                creators: addr(2),
                treasury: addr(3),
            },
            auction: AuctionConfig::default(),
        };
        config.auction.auction_count = 0;
        let result = AuctionHouse::new(
            config,
            ManualClock::at(0),
            InMemoryMinter::new(addr(1), addr(2), 10),
            InMemoryPayments::new(),
        );
        assert!(matches!(result, Err(AuctionError::InvalidConfig(_))));
    }

    #[test]
    fn first_unpause_opens_a_batch() {
        let mut h = house();
        h.administer(addr(OWNER), AdminCommand::Unpause).unwrap();
        assert_eq!(h.pause_state(), PauseState::Running);
        assert_eq!(h.current_batch(), Some(BatchId(1)));
        assert_eq!(h.slots().count(), 3);
        let kinds: Vec<_> = h.journal().events().iter().map(AuctionEvent::kind).collect();
        assert_eq!(
            kinds,
            ["UNPAUSED", "BATCH_CREATED", "BATCH_CREATED", "BATCH_CREATED"]
        );
    }

    #[test]
    fn non_owner_cannot_administer() {
        let mut h = house();
        let err = h
            .administer(addr(5), AdminCommand::SetAuctionCount(1))
            .unwrap_err();
        assert!(matches!(err, AuctionError::Unauthorized { .. }));
        assert_eq!(h.config().auction_count, 3);
    }

    #[test]
    fn rejected_admin_change_leaves_config() {
        let mut h = house();
        let err = h
            .administer(addr(OWNER), AdminCommand::SetAuctionCount(0))
            .unwrap_err();
        assert!(matches!(err, AuctionError::InvalidConfig(_)));
        assert_eq!(h.config().auction_count, 3);
        assert!(h.journal().events().is_empty());
    }

    #[test]
    fn out_of_range_timing_is_refused() {
        let mut h = house();
        let before = h.config().clone();
        let head = h.journal().head_digest();
        for command in [
            AdminCommand::SetTimeBuffer(u64::MAX),
            AdminCommand::SetDuration(100_000_000_000_000),
            AdminCommand::SetDuration(u64::MAX),
        ] {
            let err = h.administer(addr(OWNER), command).unwrap_err();
            assert!(matches!(err, AuctionError::InvalidConfig(_)));
        }
        assert_eq!(h.config(), &before);
        assert_eq!(h.journal().head_digest(), head);
        assert!(h.journal().events().is_empty());

        // a late bid still extends by the configured buffer
        h.administer(addr(OWNER), AdminCommand::Unpause).unwrap();
        let end = h.slot(SlotId(1)).unwrap().end_time;
        h.clock().set(end.timestamp() - 10);
        let bid = h.place_bid(SlotId(1), Decimal::from(100), addr(1)).unwrap();
        assert!(bid.extended);
        assert_eq!(bid.end_time, end + chrono::Duration::seconds(890));
    }

    #[test]
    fn unpause_at_calendar_end_mints_nothing() {
        let mut h = house();
        h.clock().set(DateTime::<Utc>::MAX_UTC.timestamp() - 10);
        let err = h
            .administer(addr(OWNER), AdminCommand::Unpause)
            .unwrap_err();
        assert!(matches!(err, AuctionError::InvalidConfig(_)));
        assert!(h.is_paused());
        assert_eq!(h.current_batch(), None);
        assert_eq!(h.minter().ids_consumed(), 0);
        assert!(h.journal().events().is_empty());
    }

    #[test]
    fn bids_refused_while_paused() {
        let mut h = house();
        let err = h
            .place_bid(SlotId(1), Decimal::from(100), addr(1))
            .unwrap_err();
        assert!(matches!(err, AuctionError::EnginePaused));
    }

    #[test]
    fn pause_twice_is_an_error() {
        let mut h = house();
        let err = h.administer(addr(OWNER), AdminCommand::Pause).unwrap_err();
        assert!(matches!(err, AuctionError::EnginePaused));
        let err = {
            h.administer(addr(OWNER), AdminCommand::Unpause).unwrap();
            h.administer(addr(OWNER), AdminCommand::Unpause).unwrap_err()
        };
        assert!(matches!(err, AuctionError::NotPaused));
    }

    #[test]
    fn ownership_transfer_moves_admin_rights() {
        let mut h = house();
        h.administer(addr(OWNER), AdminCommand::TransferOwnership(addr(0xBB)))
            .unwrap();
        assert_eq!(h.owner(), addr(0xBB));
        assert!(h
            .administer(addr(OWNER), AdminCommand::SetDuration(60))
            .is_err());
        h.administer(addr(0xBB), AdminCommand::SetDuration(60))
            .unwrap();
        assert_eq!(h.config().duration_secs, 60);

        let err = h
            .administer(addr(0xBB), AdminCommand::TransferOwnership(Address::ZERO))
            .unwrap_err();
        assert!(matches!(err, AuctionError::InvalidAddress { .. }));
    }

    #[test]
    fn pause_state_display() {
        assert_eq!(PauseState::Running.to_string(), "RUNNING");
        assert_eq!(
            PauseState::Paused(PauseReason::SupplyExhausted).to_string(),
            "PAUSED(SUPPLY_EXHAUSTED)"
        );
    }
}
