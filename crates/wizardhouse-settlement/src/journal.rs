//! Event journal with a running SHA-256 hash chain.
//!
//! Every committed event extends the chain:
//! ```text
//! head[n] = SHA256("wizardhouse:journal:v1:" || head[n-1] || n || json(event[n]))
//! ```
//! with `head[-1]` all zeros. An indexer that recomputes the chain over the
//! events it received gets the same head only if it saw the same sequence.
//! Draining hands events to consumers without resetting the chain.

use sha2::{Digest, Sha256};
use wizardhouse_types::{AuctionEvent, Result};

const DOMAIN: &[u8] = b"wizardhouse:journal:v1:";

fn link(prev: &[u8; 32], sequence: u64, payload: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(DOMAIN);
    hasher.update(prev);
    hasher.update(sequence.to_le_bytes());
    hasher.update(payload);
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    out
}

/// Ordered, append-only record of committed events.
#[derive(Debug, Clone, Default)]
pub struct EventJournal {
    /// Events not yet drained.
    pending: Vec<AuctionEvent>,
    head: [u8; 32],
    /// Total events ever appended.
    sequence: u64,
}

impl EventJournal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a group of events. Either all are appended or none are.
    ///
    /// # Errors
    /// `Serialization` if an event cannot be encoded.
    pub fn append_all(&mut self, events: Vec<AuctionEvent>) -> Result<()> {
        let payloads = events
            .iter()
            .map(serde_json::to_vec)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        for payload in &payloads {
            self.head = link(&self.head, self.sequence, payload);
            self.sequence += 1;
        }
        self.pending.extend(events);
        Ok(())
    }

    /// Events appended since the last drain, oldest first.
    #[must_use]
    pub fn events(&self) -> &[AuctionEvent] {
        &self.pending
    }

    pub fn drain(&mut self) -> Vec<AuctionEvent> {
        std::mem::take(&mut self.pending)
    }

    #[must_use]
    pub fn head_digest(&self) -> [u8; 32] {
        self.head
    }

    #[must_use]
    pub fn head_hex(&self) -> String {
        hex::encode(self.head)
    }

    #[must_use]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// Recompute the chain head over a full event sequence.
///
/// # Errors
/// `Serialization` if an event cannot be encoded.
pub fn chain_digest(events: &[AuctionEvent]) -> Result<[u8; 32]> {
    let mut head = [0u8; 32];
    for (sequence, event) in (0u64..).zip(events) {
        head = link(&head, sequence, &serde_json::to_vec(event)?);
    }
    Ok(head)
}

/// Check that `events` reproduce `expected`.
///
/// # Errors
/// `Serialization` if an event cannot be encoded.
pub fn verify_chain(events: &[AuctionEvent], expected: &[u8; 32]) -> Result<bool> {
    Ok(chain_digest(events)? == *expected)
}
