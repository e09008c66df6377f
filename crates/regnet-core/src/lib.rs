//! # regnet-core — Foundational Types for the Regnet Ledger Core
//!
//! This crate is the bedrock of the Regnet workspace. It defines the
//! type-system primitives shared by the crypto and ledger crates. Every
//! other crate in the workspace depends on `regnet-core`; it depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identities.** `Party` and `InstanceId` — no
//!    bare strings or byte arrays for identifiers.
//!
//! 2. **`CanonicalBytes` newtype.** ALL digest computation and signing input
//!    flows through `CanonicalBytes::new()`. No raw `serde_json::to_vec()`
//!    for digests, ever. Two nodes that disagree on byte order would compute
//!    different transaction identifiers for the same transaction.
//!
//! 3. **`sha256_digest()` accepts only `&CanonicalBytes`.** Compile-time
//!    enforcement that every digest path flows through canonicalization.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `regnet-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod identity;

// Re-export primary types for ergonomic imports.
pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, sha256_hex, ContentDigest};
pub use error::{CanonicalizationError, CryptoError};
pub use identity::{InstanceId, Party};
