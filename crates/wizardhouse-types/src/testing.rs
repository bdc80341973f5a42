//! In-memory collaborators for tests. **Never use in production.**
//!
//! Every double is a cheap handle over shared state, so a test can hand one
//! clone to the engine and keep another to inspect what happened.

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicI64, Ordering},
    },
};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::{
    Address, AuctionError, ItemId, Result,
    collaborators::{Clock, MintingService, PaymentRail, PushOutcome, WrappedAsset},
};

/// Effort a plain account needs to accept a push payment.
pub const PLAIN_TRANSFER_COST: u64 = 2_300;

/// Effort a hostile contract burns before giving up.
pub const HOSTILE_TRANSFER_COST: u64 = 1_000_000;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Deterministic address for test actors: `0x<n><n>...`.
#[must_use]
pub fn addr(n: u8) -> Address {
    Address([n; 20])
}

// ---------------------------------------------------------------------------
// ManualClock
// ---------------------------------------------------------------------------

/// Clock that only moves when the test says so. Seconds since the UNIX epoch.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    secs: Arc<AtomicI64>,
}

impl ManualClock {
    #[must_use]
    pub fn at(secs: i64) -> Self {
        Self {
            secs: Arc::new(AtomicI64::new(secs)),
        }
    }

    pub fn set(&self, secs: i64) {
        self.secs.store(secs, Ordering::SeqCst);
    }

    pub fn advance(&self, secs: i64) {
        self.secs.fetch_add(secs, Ordering::SeqCst);
    }

    #[must_use]
    pub fn secs(&self) -> i64 {
        self.secs.load(Ordering::SeqCst)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.secs(), 0).unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

// ---------------------------------------------------------------------------
// InMemoryMinter
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct MinterState {
    next_id: u64,
    supply: u64,
    custody: Address,
    creators: Address,
    reward_every: Option<u64>,
    reward_max: u64,
    rewards_given: u64,
    one_of_one_pool: u32,
    one_of_ones_minted: Vec<u32>,
    owners: HashMap<ItemId, Address>,
    burned: Vec<ItemId>,
    fail_next: Option<String>,
}

impl MinterState {
    fn reward_due(&self, id: u64, rewards_given: u64) -> bool {
        self.reward_every
            .is_some_and(|every| every > 0 && id % every == 0 && rewards_given < self.reward_max)
    }

    fn mintable_from(&self, mut id: u64, mut rewards: u64) -> u64 {
        let mut count = 0;
        while id < self.supply {
            if self.reward_due(id, rewards) {
                rewards += 1;
            } else {
                count += 1;
            }
            id += 1;
        }
        count
    }

    fn take_failure(&mut self) -> Result<()> {
        match self.fail_next.take() {
            Some(reason) => Err(AuctionError::Minting { reason }),
            None => Ok(()),
        }
    }
}

/// Item ledger with a creators reward policy: whenever the next id is a
/// multiple of `reward_every`, that id goes to the creators account first
/// (up to `reward_max` rewards). One-of-one mints skip the reward.
#[derive(Debug, Clone)]
pub struct InMemoryMinter {
    inner: Arc<Mutex<MinterState>>,
}

impl InMemoryMinter {
    /// Ledger with no reward policy and the given supply.
    #[must_use]
    pub fn new(custody: Address, creators: Address, supply: u64) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MinterState {
                next_id: 0,
                supply,
                custody,
                creators,
                reward_every: None,
                reward_max: 0,
                rewards_given: 0,
                one_of_one_pool: 0,
                one_of_ones_minted: Vec::new(),
                owners: HashMap::new(),
                burned: Vec::new(),
                fail_next: None,
            })),
        }
    }

    /// Give the creators account every `every`-th id, at most `max` times.
    #[must_use]
    pub fn with_reward_policy(self, every: u64, max: u64) -> Self {
        {
            let mut st = lock(&self.inner);
            st.reward_every = Some(every);
            st.reward_max = max;
        }
        self
    }

    #[must_use]
    pub fn with_one_of_one_pool(self, size: u32) -> Self {
        lock(&self.inner).one_of_one_pool = size;
        self
    }

    pub fn set_supply(&self, supply: u64) {
        lock(&self.inner).supply = supply;
    }

    /// Make the next mint/burn/transfer fail with `reason`.
    pub fn fail_next(&self, reason: &str) {
        lock(&self.inner).fail_next = Some(reason.to_string());
    }

    #[must_use]
    pub fn owner_of(&self, item: ItemId) -> Option<Address> {
        lock(&self.inner).owners.get(&item).copied()
    }

    #[must_use]
    pub fn burned(&self) -> Vec<ItemId> {
        lock(&self.inner).burned.clone()
    }

    #[must_use]
    pub fn one_of_ones_minted(&self) -> Vec<u32> {
        lock(&self.inner).one_of_ones_minted.clone()
    }

    /// Number of ids consumed so far (rewards included).
    #[must_use]
    pub fn ids_consumed(&self) -> u64 {
        lock(&self.inner).next_id
    }
}

impl MintingService for InMemoryMinter {
    fn mint_next(&mut self) -> Result<ItemId> {
        let mut st = lock(&self.inner);
        st.take_failure()?;
        if st.mintable_from(st.next_id, st.rewards_given) == 0 {
            return Err(AuctionError::Minting {
                reason: "All wizards have been minted".into(),
            });
        }
        if st.reward_due(st.next_id, st.rewards_given) {
            let reward = ItemId(st.next_id);
            let creators = st.creators;
            st.owners.insert(reward, creators);
            st.rewards_given += 1;
            st.next_id += 1;
        }
        let id = ItemId(st.next_id);
        let custody = st.custody;
        st.owners.insert(id, custody);
        st.next_id += 1;
        Ok(id)
    }

    fn mint_one_of_one(&mut self, index: u32) -> Result<ItemId> {
        let mut st = lock(&self.inner);
        st.take_failure()?;
        if index >= st.one_of_one_pool {
            return Err(AuctionError::OneOfOneOutOfRange {
                index,
                pool_size: st.one_of_one_pool,
            });
        }
        if st.next_id >= st.supply {
            return Err(AuctionError::Minting {
                reason: "All wizards have been minted".into(),
            });
        }
        let id = ItemId(st.next_id);
        let custody = st.custody;
        st.owners.insert(id, custody);
        st.one_of_ones_minted.push(index);
        st.next_id += 1;
        Ok(id)
    }

    fn burn(&mut self, item: ItemId) -> Result<()> {
        let mut st = lock(&self.inner);
        st.take_failure()?;
        if st.owners.get(&item) != Some(&st.custody) {
            return Err(AuctionError::Minting {
                reason: format!("{item} is not held by the auction house"),
            });
        }
        st.owners.remove(&item);
        st.burned.push(item);
        Ok(())
    }

    fn transfer(&mut self, item: ItemId, to: Address) -> Result<()> {
        let mut st = lock(&self.inner);
        st.take_failure()?;
        if st.owners.get(&item) != Some(&st.custody) {
            return Err(AuctionError::Minting {
                reason: format!("{item} is not held by the auction house"),
            });
        }
        st.owners.insert(item, to);
        Ok(())
    }

    fn remaining_capacity(&self) -> u64 {
        let st = lock(&self.inner);
        st.mintable_from(st.next_id, st.rewards_given)
    }
}

// ---------------------------------------------------------------------------
// InMemoryPayments
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct PaymentsState {
    native: HashMap<Address, Decimal>,
    wrapped: HashMap<Address, Decimal>,
    push_costs: HashMap<Address, u64>,
    attempts: u64,
    failures: u64,
}

/// Native-currency rail plus wrapped fallback asset.
///
/// A push succeeds when the recipient's transfer cost fits in the effort
/// budget. Plain accounts cost [`PLAIN_TRANSFER_COST`]; accounts marked
/// hostile cost [`HOSTILE_TRANSFER_COST`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryPayments {
    inner: Arc<Mutex<PaymentsState>>,
}

impl InMemoryPayments {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn make_hostile(&self, who: Address) {
        lock(&self.inner)
            .push_costs
            .insert(who, HOSTILE_TRANSFER_COST);
    }

    #[must_use]
    pub fn native_balance(&self, who: Address) -> Decimal {
        lock(&self.inner)
            .native
            .get(&who)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Native plus wrapped: everything `who` has been paid by either route.
    #[must_use]
    pub fn total_received(&self, who: Address) -> Decimal {
        self.native_balance(who) + self.redeemable_balance_of(who)
    }

    #[must_use]
    pub fn attempts(&self) -> u64 {
        lock(&self.inner).attempts
    }

    #[must_use]
    pub fn failures(&self) -> u64 {
        lock(&self.inner).failures
    }
}

impl PaymentRail for InMemoryPayments {
    fn attempt(&mut self, recipient: Address, amount: Decimal, effort_budget: u64) -> PushOutcome {
        let mut st = lock(&self.inner);
        st.attempts += 1;
        let cost = st
            .push_costs
            .get(&recipient)
            .copied()
            .unwrap_or(PLAIN_TRANSFER_COST);
        if cost > effort_budget {
            st.failures += 1;
            return PushOutcome::Failed;
        }
        *st.native.entry(recipient).or_insert(Decimal::ZERO) += amount;
        PushOutcome::Delivered
    }

    fn credit_fallback(&mut self, recipient: Address, amount: Decimal) {
        self.credit_balance(recipient, amount);
    }
}

impl WrappedAsset for InMemoryPayments {
    fn credit_balance(&mut self, holder: Address, amount: Decimal) {
        *lock(&self.inner)
            .wrapped
            .entry(holder)
            .or_insert(Decimal::ZERO) += amount;
    }

    fn redeemable_balance_of(&self, holder: Address) -> Decimal {
        lock(&self.inner)
            .wrapped
            .get(&holder)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}
