//! # regnet-ledger — Member Registration State and Transition Core
//!
//! Models participation records in a permissioned distributed ledger
//! network. Each [`RegistrationRecord`] asserts that a named member is
//! registered, with endpoint addresses for off-ledger messaging and
//! document-exchange transports carried as opaque strings.
//!
//! ## Model
//!
//! Registration facts follow copy-on-write versioning: a record is immutable
//! once created, and every change is a transaction that consumes the prior
//! version and produces the next one. The [`contract`] module is the pure
//! verification function that decides which transitions are legal:
//!
//! | Command           | consumed | produced | required signer           |
//! |-------------------|----------|----------|---------------------------|
//! | `Register`        | 0        | 1        | produced record's member  |
//! | `UpdateEndpoints` | 1        | 1        | the member (unchanged)    |
//! | `Revoke`          | 1        | 0        | consumed record's member  |
//!
//! The `member` is the versioning key: it never changes across versions of
//! one logical registration. Changing it is modeled as Revoke + Register.
//!
//! ## Modules
//!
//! - **`state`**: the `LedgerState` trait, `StateRef`, and `StateAndRef` —
//!   how a state is addressed in ledger history.
//! - **`record`**: the `RegistrationRecord` value itself.
//! - **`transaction`**: commands, `LedgerTransaction`, and the
//!   Ed25519-signed `SignedTransaction` envelope.
//! - **`contract`**: `verify()`, the deterministic accept/reject function.
//! - **`vault`**: an in-memory versioned state store keyed by member, with
//!   intra-ledger double-spend detection.
//!
//! Consensus-level ordering (which of two transactions consuming the same
//! state wins across the network) is external to this crate; the contract
//! sees only the transaction it is given.

pub mod contract;
pub mod record;
pub mod state;
pub mod transaction;
pub mod vault;

pub use contract::{verify, VerificationError};
pub use record::RegistrationRecord;
pub use state::{LedgerState, StateAndRef, StateRef};
pub use transaction::{
    LedgerTransaction, RegistrationCommand, SignatureError, SignedTransaction,
    TransactionSignature,
};
pub use vault::{AppliedTransaction, Vault, VaultError};
