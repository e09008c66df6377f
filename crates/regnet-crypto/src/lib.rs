//! # regnet-crypto — Ed25519 Signing for the Regnet Ledger Core
//!
//! Key pairs, signatures, and verification for transaction signing. The
//! `Party` identity defined in `regnet-core` *is* the Ed25519 verifying key;
//! this crate provides the operations over it.
//!
//! ## Security Invariant
//!
//! Signing input MUST be `&CanonicalBytes` — you cannot sign raw bytes. This
//! enforces that all signed data has been canonicalized, so every node
//! verifies signatures over the same byte sequence. Private keys are never
//! serialized or logged.

pub mod ed25519;

pub use ed25519::{verify, Ed25519KeyPair, Ed25519Signature};
