//! # Ledger State Addressing
//!
//! A ledger state is an immutable fact produced by one transaction and
//! consumed by at most one later transaction. `StateRef` locates a produced
//! state in ledger history (transaction identifier + output index), and
//! `StateAndRef` pairs a state with its location — the unit a transaction
//! consumes.

use serde::{Deserialize, Serialize};

use regnet_core::{ContentDigest, Party};

/// Capability of any value tracked as ledger state.
///
/// `participants()` names the parties obligated to store and be notified of
/// the state. For registration records this is exactly the member.
pub trait LedgerState {
    /// The parties with a visibility obligation for this state.
    fn participants(&self) -> Vec<Party>;
}

/// Reference to a specific produced state in ledger history.
///
/// Two states with identical field values at different refs are distinct
/// ledger states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateRef {
    /// Identifier of the transaction that produced the state.
    pub txid: ContentDigest,
    /// Index of the state among the transaction's produced outputs.
    pub index: u32,
}

impl StateRef {
    /// Create a new state reference.
    pub fn new(txid: ContentDigest, index: u32) -> Self {
        Self { txid, index }
    }
}

impl std::fmt::Display for StateRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.txid, self.index)
    }
}

/// A ledger state together with the reference under which it was produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateAndRef<S: LedgerState> {
    /// Where the state sits in ledger history.
    pub state_ref: StateRef,
    /// The state value itself.
    pub state: S,
}

impl<S: LedgerState> StateAndRef<S> {
    /// Pair a state with its reference.
    pub fn new(state_ref: StateRef, state: S) -> Self {
        Self { state_ref, state }
    }
}
