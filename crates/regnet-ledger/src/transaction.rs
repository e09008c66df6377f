//! # Transactions and Commands
//!
//! A transaction proposes a transition: zero-or-more consumed prior records,
//! zero-or-more produced new records, a declared command, and the signer set
//! that vouches for it. The transaction identifier is the SHA-256 digest of
//! the transaction's canonical bytes, so every node derives the same id and
//! the same `StateRef`s for its outputs.
//!
//! `SignedTransaction` wraps a transaction with per-signer Ed25519
//! signatures over those same canonical bytes. Contract verification
//! ([`crate::contract::verify`]) operates on the declared signer set;
//! [`SignedTransaction::verify_signatures()`] is what makes the declaration
//! trustworthy.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use regnet_core::{
    sha256_digest, CanonicalBytes, CanonicalizationError, ContentDigest, CryptoError, Party,
};
use regnet_crypto::{Ed25519KeyPair, Ed25519Signature};

use crate::record::RegistrationRecord;
use crate::state::StateAndRef;

/// Declared intent of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegistrationCommand {
    /// Create a registration: no consumed input, one produced record.
    Register,
    /// Replace the destination addresses of a current registration: one
    /// consumed input, one produced record, same member and instance id.
    UpdateEndpoints,
    /// Remove a registration: one consumed input, nothing produced.
    Revoke,
}

impl RegistrationCommand {
    /// Canonical command name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Register => "REGISTER",
            Self::UpdateEndpoints => "UPDATE_ENDPOINTS",
            Self::Revoke => "REVOKE",
        }
    }

    /// Required (consumed, produced) record counts for this command.
    pub fn required_arity(&self) -> (usize, usize) {
        match self {
            Self::Register => (0, 1),
            Self::UpdateEndpoints => (1, 1),
            Self::Revoke => (1, 0),
        }
    }
}

impl std::fmt::Display for RegistrationCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A proposed state transition over registration records.
///
/// Immutable once built; re-verifying the same transaction always yields the
/// same outcome. A well-formed transaction carries exactly one command — the
/// contract rejects anything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerTransaction {
    /// Prior records this transaction consumes.
    pub consumed: Vec<StateAndRef<RegistrationRecord>>,
    /// New records this transaction produces.
    pub produced: Vec<RegistrationRecord>,
    /// Declared intent. Exactly one entry in a well-formed transaction.
    pub commands: Vec<RegistrationCommand>,
    /// The cryptographic signer set declared for this transaction.
    pub signers: BTreeSet<Party>,
}

impl LedgerTransaction {
    /// Fully general constructor, including malformed shapes. Prefer the
    /// per-command constructors for well-formed transactions.
    pub fn new(
        consumed: Vec<StateAndRef<RegistrationRecord>>,
        produced: Vec<RegistrationRecord>,
        commands: Vec<RegistrationCommand>,
        signers: BTreeSet<Party>,
    ) -> Self {
        Self {
            consumed,
            produced,
            commands,
            signers,
        }
    }

    /// A `Register` transaction producing `record`, signed by its member.
    pub fn register(record: RegistrationRecord) -> Self {
        let signers = BTreeSet::from([record.member()]);
        Self::new(vec![], vec![record], vec![RegistrationCommand::Register], signers)
    }

    /// An `UpdateEndpoints` transaction consuming `consumed` and producing
    /// `produced`, signed by the member.
    pub fn update_endpoints(
        consumed: StateAndRef<RegistrationRecord>,
        produced: RegistrationRecord,
    ) -> Self {
        let signers = BTreeSet::from([produced.member()]);
        Self::new(
            vec![consumed],
            vec![produced],
            vec![RegistrationCommand::UpdateEndpoints],
            signers,
        )
    }

    /// A `Revoke` transaction consuming `consumed`, signed by its member.
    pub fn revoke(consumed: StateAndRef<RegistrationRecord>) -> Self {
        let signers = BTreeSet::from([consumed.state.member()]);
        Self::new(vec![consumed], vec![], vec![RegistrationCommand::Revoke], signers)
    }

    /// Canonical bytes of this transaction — the digest and signing input.
    pub fn canonical_bytes(&self) -> Result<CanonicalBytes, CanonicalizationError> {
        CanonicalBytes::new(self)
    }

    /// The transaction identifier: SHA-256 over the canonical bytes.
    pub fn txid(&self) -> Result<ContentDigest, CanonicalizationError> {
        Ok(sha256_digest(&self.canonical_bytes()?))
    }
}

/// One signer's Ed25519 signature over a transaction's canonical bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSignature {
    /// Who signed.
    pub signer: Party,
    /// The signature over the transaction's canonical bytes.
    pub signature: Ed25519Signature,
}

/// Failure to validate a signed transaction's signature set.
#[derive(Error, Debug)]
pub enum SignatureError {
    /// The transaction could not be canonicalized for signature checking.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// A declared signer has no attached signature.
    #[error("declared signer {signer} has no attached signature")]
    UnsignedSigner {
        /// The declared but unsigned party.
        signer: Party,
    },

    /// An attached signature failed cryptographic verification.
    #[error("signature from {signer} is invalid: {source}")]
    InvalidSignature {
        /// The party whose signature failed.
        signer: Party,
        /// The underlying verification failure.
        source: CryptoError,
    },
}

/// A transaction plus the signatures collected for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    /// The underlying transaction.
    pub transaction: LedgerTransaction,
    /// Collected signatures, one per signer.
    pub signatures: Vec<TransactionSignature>,
}

impl SignedTransaction {
    /// Wrap a transaction with no signatures yet.
    pub fn new(transaction: LedgerTransaction) -> Self {
        Self {
            transaction,
            signatures: Vec::new(),
        }
    }

    /// Attach `keypair`'s signature over the transaction's canonical bytes.
    pub fn sign_with(mut self, keypair: &Ed25519KeyPair) -> Result<Self, CanonicalizationError> {
        let payload = self.transaction.canonical_bytes()?;
        self.signatures.push(TransactionSignature {
            signer: keypair.party(),
            signature: keypair.sign(&payload),
        });
        Ok(self)
    }

    /// Check that every declared signer has a valid attached signature.
    ///
    /// Extra signatures from undeclared parties are also verified: a signed
    /// transaction with any invalid signature is rejected outright.
    pub fn verify_signatures(&self) -> Result<(), SignatureError> {
        let payload = self.transaction.canonical_bytes()?;

        for sig in &self.signatures {
            regnet_crypto::verify(&payload, &sig.signature, &sig.signer).map_err(|source| {
                SignatureError::InvalidSignature {
                    signer: sig.signer,
                    source,
                }
            })?;
        }

        for declared in &self.transaction.signers {
            if !self.signatures.iter().any(|s| s.signer == *declared) {
                return Err(SignatureError::UnsignedSigner { signer: *declared });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regnet_core::InstanceId;
    use crate::state::StateRef;

    fn keypair() -> Ed25519KeyPair {
        Ed25519KeyPair::from_seed(&[1; 32])
    }

    fn record(member: Party) -> RegistrationRecord {
        RegistrationRecord::new(member, "Alice Corp", InstanceId::new("I1"), "", "")
    }

    #[test]
    fn test_register_constructor_declares_member_signer() {
        let kp = keypair();
        let tx = LedgerTransaction::register(record(kp.party()));
        assert_eq!(tx.commands, vec![RegistrationCommand::Register]);
        assert!(tx.consumed.is_empty());
        assert_eq!(tx.produced.len(), 1);
        assert!(tx.signers.contains(&kp.party()));
    }

    #[test]
    fn test_txid_is_deterministic() {
        let kp = keypair();
        let tx = LedgerTransaction::register(record(kp.party()));
        assert_eq!(tx.txid().unwrap(), tx.txid().unwrap());
        assert_eq!(tx.txid().unwrap(), tx.clone().txid().unwrap());
    }

    #[test]
    fn test_txid_differs_across_transactions() {
        let kp = keypair();
        let reg = LedgerTransaction::register(record(kp.party()));
        let rec_ref = StateAndRef::new(
            StateRef::new(reg.txid().unwrap(), 0),
            record(kp.party()),
        );
        let rev = LedgerTransaction::revoke(rec_ref);
        assert_ne!(reg.txid().unwrap(), rev.txid().unwrap());
    }

    #[test]
    fn test_sign_and_verify_signatures() {
        let kp = keypair();
        let stx = SignedTransaction::new(LedgerTransaction::register(record(kp.party())))
            .sign_with(&kp)
            .unwrap();
        stx.verify_signatures().expect("member signature should verify");
    }

    #[test]
    fn test_unsigned_declared_signer_rejected() {
        let kp = keypair();
        let stx = SignedTransaction::new(LedgerTransaction::register(record(kp.party())));
        match stx.verify_signatures() {
            Err(SignatureError::UnsignedSigner { signer }) => assert_eq!(signer, kp.party()),
            other => panic!("expected UnsignedSigner, got {other:?}"),
        }
    }

    #[test]
    fn test_signature_by_wrong_key_rejected() {
        let kp = keypair();
        let intruder = Ed25519KeyPair::from_seed(&[2; 32]);
        let mut stx = SignedTransaction::new(LedgerTransaction::register(record(kp.party())))
            .sign_with(&kp)
            .unwrap();
        // Claim the member signed, but attach the intruder's signature bytes.
        let payload = stx.transaction.canonical_bytes().unwrap();
        stx.signatures[0] = TransactionSignature {
            signer: kp.party(),
            signature: intruder.sign(&payload),
        };
        assert!(matches!(
            stx.verify_signatures(),
            Err(SignatureError::InvalidSignature { .. })
        ));
    }

    #[test]
    fn test_tampered_transaction_invalidates_signature() {
        let kp = keypair();
        let mut stx = SignedTransaction::new(LedgerTransaction::register(record(kp.party())))
            .sign_with(&kp)
            .unwrap();
        stx.transaction.produced[0] =
            record(kp.party()).with_destinations("addr://tampered", "");
        assert!(stx.verify_signatures().is_err());
    }

    #[test]
    fn test_command_serde_screaming_snake_case() {
        let json = serde_json::to_string(&RegistrationCommand::UpdateEndpoints).unwrap();
        assert_eq!(json, "\"UPDATE_ENDPOINTS\"");
        let back: RegistrationCommand = serde_json::from_str(&json).unwrap();
        assert_eq!(back, RegistrationCommand::UpdateEndpoints);
    }

    #[test]
    fn test_command_arity_table() {
        assert_eq!(RegistrationCommand::Register.required_arity(), (0, 1));
        assert_eq!(RegistrationCommand::UpdateEndpoints.required_arity(), (1, 1));
        assert_eq!(RegistrationCommand::Revoke.required_arity(), (1, 0));
    }
}
