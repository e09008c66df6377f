//! # Registration Record
//!
//! The immutable fact that a named network member is registered, carrying
//! the endpoint addresses used by the off-ledger messaging and
//! document-exchange transports. The ledger never interprets, validates the
//! format of, or dials these addresses.
//!
//! A record has no mutation API. "Updating" a registration means producing a
//! new version with [`RegistrationRecord::with_destinations()`] in a
//! transaction that consumes the old one.

use serde::{Deserialize, Serialize};

use regnet_core::{InstanceId, Party};

use crate::state::LedgerState;

/// One member's registration fact at one point in ledger history.
///
/// The `member` is the versioning key: all versions of the same logical
/// registration share it, and the contract rejects any transition that would
/// change it. Field equality (`PartialEq`) compares values; ledger identity
/// is positional via `StateRef`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRecord {
    member: Party,
    name: String,
    instance_id: InstanceId,
    app2app_destination: String,
    doc_exchange_destination: String,
}

impl RegistrationRecord {
    /// Create a fully-formed registration record.
    ///
    /// Emptiness rules (`name` and `instance_id` non-empty) are enforced by
    /// the registration contract at transition time, not here: a proposer
    /// may construct an invalid candidate, but it can never be committed.
    pub fn new(
        member: Party,
        name: impl Into<String>,
        instance_id: InstanceId,
        app2app_destination: impl Into<String>,
        doc_exchange_destination: impl Into<String>,
    ) -> Self {
        Self {
            member,
            name: name.into(),
            instance_id,
            app2app_destination: app2app_destination.into(),
            doc_exchange_destination: doc_exchange_destination.into(),
        }
    }

    /// The registered member's identity.
    pub fn member(&self) -> Party {
        self.member
    }

    /// Human-readable display name for the member.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Opaque identifier correlating this registration to an application
    /// instance.
    pub fn instance_id(&self) -> &InstanceId {
        &self.instance_id
    }

    /// Opaque address for the direct messaging transport. Empty if not yet
    /// provisioned.
    pub fn app2app_destination(&self) -> &str {
        &self.app2app_destination
    }

    /// Opaque address for the document-exchange transport. Empty if not yet
    /// provisioned.
    pub fn doc_exchange_destination(&self) -> &str {
        &self.doc_exchange_destination
    }

    /// Produce the next version of this registration with new destination
    /// addresses. Member, name, and instance id carry over unchanged — the
    /// only fields an `UpdateEndpoints` transition may vary.
    pub fn with_destinations(
        &self,
        app2app_destination: impl Into<String>,
        doc_exchange_destination: impl Into<String>,
    ) -> Self {
        Self {
            member: self.member,
            name: self.name.clone(),
            instance_id: self.instance_id.clone(),
            app2app_destination: app2app_destination.into(),
            doc_exchange_destination: doc_exchange_destination.into(),
        }
    }
}

impl LedgerState for RegistrationRecord {
    /// Exactly one participant: the member. Anyone else has no visibility
    /// obligation for this record.
    fn participants(&self) -> Vec<Party> {
        vec![self.member]
    }
}

impl std::fmt::Display for RegistrationRecord {
    /// Canonical audit-log rendering: all five fields in fixed order.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "RegistrationRecord(member={}, name={}, instance_id={}, app2app_destination={}, doc_exchange_destination={})",
            self.member,
            self.name,
            self.instance_id,
            self.app2app_destination,
            self.doc_exchange_destination
        )
    }
}
