//! # Vault — Versioned Registration State Store
//!
//! An in-memory arena of state versions indexed by the stable logical
//! identifier of a registration: its member. The vault holds at most one
//! current (unconsumed) record per member and a set of spent refs, so a
//! transaction that re-consumes an already-consumed state is detected here —
//! the contract alone cannot see it, since it verifies one transaction in
//! isolation.
//!
//! `apply()` is the commit path: signature check, contract verification,
//! linkage checks, then the consume-old/produce-new swap. A rejected
//! transaction leaves the vault untouched.
//!
//! The vault stands in for the external storage/query collaborator in tests
//! and embeddings. Ordering between concurrent proposers remains the
//! consensus service's job; a single vault instance applies transactions in
//! the order it is handed them.

use std::collections::{HashMap, HashSet};

use thiserror::Error;
use tracing::{debug, info};

use regnet_core::{CanonicalizationError, ContentDigest, Party};

use crate::contract::{self, VerificationError};
use crate::record::RegistrationRecord;
use crate::state::{StateAndRef, StateRef};
use crate::transaction::{RegistrationCommand, SignatureError, SignedTransaction};

/// Failure to apply a signed transaction to the vault.
#[derive(Error, Debug)]
pub enum VaultError {
    /// The signature set did not validate.
    #[error("signature check failed: {0}")]
    Signature(#[from] SignatureError),

    /// The contract rejected the transition.
    #[error("contract rejected transaction: {0}")]
    Rejected(#[from] VerificationError),

    /// The transaction identifier could not be computed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// A consumed ref does not name a current ledger state.
    #[error("consumed state {0} is not a current ledger state")]
    UnknownInput(StateRef),

    /// The declared input record differs from the record actually stored
    /// at the consumed ref.
    #[error("consumed state {0} does not match the record stored at that ref")]
    InputMismatch(StateRef),

    /// A consumed ref was already consumed by an earlier transaction.
    #[error("consumed state {0} has already been consumed")]
    StateAlreadyConsumed(StateRef),

    /// A `Register` for a member who already has a current record.
    #[error("member {0} already has a current registration record")]
    MemberAlreadyRegistered(Party),
}

/// Outcome of a committed transaction.
#[derive(Debug, Clone)]
pub struct AppliedTransaction {
    /// Identifier of the committed transaction.
    pub txid: ContentDigest,
    /// The command that was applied.
    pub command: RegistrationCommand,
    /// Produced states with their assigned refs.
    pub produced: Vec<StateAndRef<RegistrationRecord>>,
}

/// In-memory store of current registration records and spent state refs.
#[derive(Debug, Default)]
pub struct Vault {
    current: HashMap<Party, StateAndRef<RegistrationRecord>>,
    spent: HashSet<StateRef>,
}

impl Vault {
    /// Create an empty vault.
    pub fn new() -> Self {
        Self::default()
    }

    /// Verify and commit a signed transaction.
    ///
    /// On success the consumed states are marked spent and the produced
    /// records become current under `StateRef { txid, index }`. On any error
    /// the vault is unchanged.
    pub fn apply(&mut self, stx: &SignedTransaction) -> Result<AppliedTransaction, VaultError> {
        stx.verify_signatures()?;
        contract::verify(&stx.transaction)?;

        let txid = stx.transaction.txid()?;
        // verify() guarantees exactly one command.
        let command = *stx
            .transaction
            .commands
            .first()
            .ok_or(VerificationError::MalformedCommand { found: 0 })?;

        // Linkage checks before any mutation. The contract already compared
        // the declared input against the produced output, so the declared
        // input must be exactly the record stored at the consumed ref — a
        // proposer cannot smuggle a field change past the contract by lying
        // about what it is consuming.
        for input in &stx.transaction.consumed {
            if self.spent.contains(&input.state_ref) {
                return Err(VaultError::StateAlreadyConsumed(input.state_ref));
            }
            match self.current.get(&input.state.member()) {
                Some(held) if held.state_ref == input.state_ref => {
                    if held.state != input.state {
                        return Err(VaultError::InputMismatch(input.state_ref));
                    }
                }
                _ => return Err(VaultError::UnknownInput(input.state_ref)),
            }
        }
        if command == RegistrationCommand::Register {
            let member = stx.transaction.produced[0].member();
            if self.current.contains_key(&member) {
                return Err(VaultError::MemberAlreadyRegistered(member));
            }
        }

        // Commit: consume-old, produce-new.
        for input in &stx.transaction.consumed {
            self.spent.insert(input.state_ref);
            self.current.remove(&input.state.member());
            debug!(state_ref = %input.state_ref, "consumed registration state");
        }
        let mut produced = Vec::with_capacity(stx.transaction.produced.len());
        for (index, record) in stx.transaction.produced.iter().enumerate() {
            let state_ref = StateRef::new(txid, index as u32);
            let held = StateAndRef::new(state_ref, record.clone());
            self.current.insert(record.member(), held.clone());
            debug!(state_ref = %state_ref, member = %record.member(), "produced registration state");
            produced.push(held);
        }

        info!(%txid, command = %command, "applied registration transaction");
        Ok(AppliedTransaction {
            txid,
            command,
            produced,
        })
    }

    /// The current (unconsumed) registration record for a member, if any.
    pub fn current_record(&self, member: &Party) -> Option<&StateAndRef<RegistrationRecord>> {
        self.current.get(member)
    }

    /// Whether a state ref has been consumed.
    pub fn is_consumed(&self, state_ref: &StateRef) -> bool {
        self.spent.contains(state_ref)
    }

    /// Members with a current registration record.
    pub fn registered_members(&self) -> impl Iterator<Item = &Party> {
        self.current.keys()
    }
}
