//! # Registration Contract
//!
//! Pure, side-effect-free verification of one proposed transaction's
//! legality. Invoked synchronously during transaction validation; a total
//! function of the transaction's contents, so concurrent validation of
//! independent transactions needs no locking and re-verification always
//! yields the same outcome.
//!
//! Every rejection is terminal and non-retryable: the proposer must rebuild
//! a corrected transaction. The contract never mutates ledger state —
//! consensus finality does.
//!
//! ## Rules
//!
//! 1. Exactly one command, else [`VerificationError::MalformedCommand`].
//! 2. Consumed/produced counts match the command's arity, else
//!    [`VerificationError::ArityViolation`].
//! 3. Field rules per command, else
//!    [`VerificationError::InvalidFieldTransition`]:
//!    - `Register`: `name` and `instance_id` non-empty.
//!    - `UpdateEndpoints`: `member`, `instance_id`, and `name` unchanged —
//!      only the destination fields may vary. Rotating `instance_id` is
//!      modeled as Revoke + Register, never as an update.
//!    - `Revoke`: none.
//! 4. The declared signer set must contain the member, else
//!    [`VerificationError::MissingSignature`].
//!
//! Checks run in exactly this order, so a transaction violating several
//! rules rejects deterministically with the first one.

use thiserror::Error;

use regnet_core::Party;

use crate::transaction::{LedgerTransaction, RegistrationCommand};

/// Deterministic verification failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    /// No command, or more than one, was declared.
    #[error("transaction must declare exactly one command, found {found}")]
    MalformedCommand {
        /// Number of commands declared.
        found: usize,
    },

    /// Wrong count of consumed or produced records for the command.
    #[error(
        "{command} requires {expected_consumed} consumed and {expected_produced} produced \
         records, found {consumed} and {produced}"
    )]
    ArityViolation {
        /// The declared command.
        command: RegistrationCommand,
        /// Consumed records the command requires.
        expected_consumed: usize,
        /// Produced records the command requires.
        expected_produced: usize,
        /// Consumed records found.
        consumed: usize,
        /// Produced records found.
        produced: usize,
    },

    /// A field changed that the command does not permit, or a required
    /// field is empty.
    #[error("invalid field transition under {command}: {detail}")]
    InvalidFieldTransition {
        /// The declared command.
        command: RegistrationCommand,
        /// Which rule was violated.
        detail: String,
    },

    /// The member whose record is created, updated, or revoked is missing
    /// from the signer set.
    #[error("required signer {member} is missing from the transaction signer set")]
    MissingSignature {
        /// The required but absent signer.
        member: Party,
    },
}

/// Verify a proposed transaction against the registration rules.
///
/// Accepts (`Ok(())`) or rejects with the first violated rule. Performs no
/// I/O and cannot fail transiently.
pub fn verify(tx: &LedgerTransaction) -> Result<(), VerificationError> {
    let command = match tx.commands.as_slice() {
        [command] => *command,
        other => {
            return Err(VerificationError::MalformedCommand { found: other.len() });
        }
    };

    let (expected_consumed, expected_produced) = command.required_arity();
    if tx.consumed.len() != expected_consumed || tx.produced.len() != expected_produced {
        return Err(VerificationError::ArityViolation {
            command,
            expected_consumed,
            expected_produced,
            consumed: tx.consumed.len(),
            produced: tx.produced.len(),
        });
    }

    let member = match command {
        RegistrationCommand::Register => {
            let output = &tx.produced[0];
            if output.name().is_empty() {
                return Err(field_violation(command, "name must be non-empty"));
            }
            if output.instance_id().is_empty() {
                return Err(field_violation(command, "instance_id must be non-empty"));
            }
            output.member()
        }
        RegistrationCommand::UpdateEndpoints => {
            let input = &tx.consumed[0].state;
            let output = &tx.produced[0];
            if input.member() != output.member() {
                return Err(field_violation(command, "member must not change"));
            }
            if input.instance_id() != output.instance_id() {
                return Err(field_violation(command, "instance_id must not change"));
            }
            if input.name() != output.name() {
                return Err(field_violation(command, "name must not change"));
            }
            input.member()
        }
        RegistrationCommand::Revoke => tx.consumed[0].state.member(),
    };

    if !tx.signers.contains(&member) {
        return Err(VerificationError::MissingSignature { member });
    }

    Ok(())
}

fn field_violation(command: RegistrationCommand, detail: &str) -> VerificationError {
    VerificationError::InvalidFieldTransition {
        command,
        detail: detail.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    use regnet_core::{ContentDigest, InstanceId};

    use crate::record::RegistrationRecord;
    use crate::state::{StateAndRef, StateRef};

    fn alice() -> Party {
        Party::from_bytes([0xA1; 32])
    }

    fn bob() -> Party {
        Party::from_bytes([0xB2; 32])
    }

    fn record(member: Party) -> RegistrationRecord {
        RegistrationRecord::new(member, "Alice Corp", InstanceId::new("I1"), "", "")
    }

    fn at_ref(record: RegistrationRecord) -> StateAndRef<RegistrationRecord> {
        StateAndRef::new(StateRef::new(ContentDigest::from_bytes([9; 32]), 0), record)
    }

    // ── Register ─────────────────────────────────────────────────────

    #[test]
    fn test_valid_register_accepts() {
        let tx = LedgerTransaction::register(record(alice()));
        assert_eq!(verify(&tx), Ok(()));
    }

    #[test]
    fn test_register_without_member_signature_rejects() {
        let mut tx = LedgerTransaction::register(record(alice()));
        tx.signers = BTreeSet::from([bob()]);
        assert_eq!(
            verify(&tx),
            Err(VerificationError::MissingSignature { member: alice() })
        );
    }

    #[test]
    fn test_register_with_empty_name_rejects() {
        let bad = RegistrationRecord::new(alice(), "", InstanceId::new("I1"), "", "");
        let tx = LedgerTransaction::register(bad);
        assert!(matches!(
            verify(&tx),
            Err(VerificationError::InvalidFieldTransition { .. })
        ));
    }

    #[test]
    fn test_register_with_empty_instance_id_rejects() {
        let bad = RegistrationRecord::new(alice(), "Alice Corp", InstanceId::new(""), "", "");
        let tx = LedgerTransaction::register(bad);
        assert!(matches!(
            verify(&tx),
            Err(VerificationError::InvalidFieldTransition { .. })
        ));
    }

    #[test]
    fn test_register_with_consumed_input_rejects_arity() {
        let mut tx = LedgerTransaction::register(record(alice()));
        tx.consumed.push(at_ref(record(alice())));
        assert!(matches!(
            verify(&tx),
            Err(VerificationError::ArityViolation {
                command: RegistrationCommand::Register,
                ..
            })
        ));
    }

    // ── UpdateEndpoints ──────────────────────────────────────────────

    #[test]
    fn test_update_changing_only_destinations_accepts() {
        let prior = record(alice());
        let next = prior.with_destinations("addr://1", "doc://2");
        let tx = LedgerTransaction::update_endpoints(at_ref(prior), next);
        assert_eq!(verify(&tx), Ok(()));
    }

    #[test]
    fn test_update_changing_member_rejects() {
        let prior = record(alice());
        let next = record(bob());
        let mut tx = LedgerTransaction::update_endpoints(at_ref(prior), next);
        // Both parties sign; the field rule must still reject.
        tx.signers = BTreeSet::from([alice(), bob()]);
        assert_eq!(
            verify(&tx),
            Err(VerificationError::InvalidFieldTransition {
                command: RegistrationCommand::UpdateEndpoints,
                detail: "member must not change".to_string(),
            })
        );
    }

    #[test]
    fn test_update_rotating_instance_id_rejects() {
        let prior = record(alice());
        let next =
            RegistrationRecord::new(alice(), "Alice Corp", InstanceId::new("I2"), "", "");
        let tx = LedgerTransaction::update_endpoints(at_ref(prior), next);
        assert_eq!(
            verify(&tx),
            Err(VerificationError::InvalidFieldTransition {
                command: RegistrationCommand::UpdateEndpoints,
                detail: "instance_id must not change".to_string(),
            })
        );
    }

    #[test]
    fn test_update_changing_name_rejects() {
        let prior = record(alice());
        let next =
            RegistrationRecord::new(alice(), "Alice Corp Ltd", InstanceId::new("I1"), "", "");
        let tx = LedgerTransaction::update_endpoints(at_ref(prior), next);
        assert_eq!(
            verify(&tx),
            Err(VerificationError::InvalidFieldTransition {
                command: RegistrationCommand::UpdateEndpoints,
                detail: "name must not change".to_string(),
            })
        );
    }

    #[test]
    fn test_update_without_member_signature_rejects() {
        let prior = record(alice());
        let next = prior.with_destinations("addr://1", "");
        let mut tx = LedgerTransaction::update_endpoints(at_ref(prior), next);
        tx.signers.clear();
        assert_eq!(
            verify(&tx),
            Err(VerificationError::MissingSignature { member: alice() })
        );
    }

    // ── Revoke ───────────────────────────────────────────────────────

    #[test]
    fn test_valid_revoke_accepts() {
        let tx = LedgerTransaction::revoke(at_ref(record(alice())));
        assert_eq!(verify(&tx), Ok(()));
    }

    #[test]
    fn test_revoke_with_produced_output_rejects_arity() {
        let mut tx = LedgerTransaction::revoke(at_ref(record(alice())));
        tx.produced.push(record(alice()));
        assert!(matches!(
            verify(&tx),
            Err(VerificationError::ArityViolation {
                command: RegistrationCommand::Revoke,
                ..
            })
        ));
    }

    #[test]
    fn test_revoke_signed_by_someone_else_rejects() {
        let mut tx = LedgerTransaction::revoke(at_ref(record(alice())));
        tx.signers = BTreeSet::from([bob()]);
        assert_eq!(
            verify(&tx),
            Err(VerificationError::MissingSignature { member: alice() })
        );
    }

    // ── Command declaration ──────────────────────────────────────────

    #[test]
    fn test_no_command_rejects() {
        let mut tx = LedgerTransaction::register(record(alice()));
        tx.commands.clear();
        assert_eq!(
            verify(&tx),
            Err(VerificationError::MalformedCommand { found: 0 })
        );
    }

    #[test]
    fn test_ambiguous_commands_reject() {
        let mut tx = LedgerTransaction::register(record(alice()));
        tx.commands.push(RegistrationCommand::Revoke);
        assert_eq!(
            verify(&tx),
            Err(VerificationError::MalformedCommand { found: 2 })
        );
    }

    #[test]
    fn test_command_check_precedes_arity_check() {
        // Wrong on both counts: no command and wrong arity for anything.
        let tx = LedgerTransaction::new(vec![], vec![], vec![], BTreeSet::new());
        assert_eq!(
            verify(&tx),
            Err(VerificationError::MalformedCommand { found: 0 })
        );
    }

    // ── Purity ───────────────────────────────────────────────────────

    #[test]
    fn test_reverification_is_idempotent() {
        let tx = LedgerTransaction::register(record(alice()));
        let first = verify(&tx);
        for _ in 0..10 {
            assert_eq!(verify(&tx), first);
        }
    }
}
