//! Create and remove records through a [`Backend`], with conflict checking.
//!
//! The [`Provisioner`] is the only place that mutates backend state. Every
//! change runs the same sequence: resolve the containing zone, apply the
//! record change, rectify the zone. Creates are additionally gated by a
//! three-way conflict check so they are idempotent and collision-safe.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use log::{debug, info};
use thiserror::Error;

use crate::{
    backend::{Backend, BackendError, RecordType},
    reverse::reverse_name,
};

/// How a candidate record relates to what the backend already holds for its
/// name and type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConflictClass {
    /// No record with this name/type exists, safe to create
    Absent,
    /// A record with this exact name/type/value already exists
    Duplicate,
    /// A record with this name/type exists with a different value
    Conflict,
}

/// Result of a successful create call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CreateOutcome {
    /// The record was created and its zone rectified
    Created,
    /// An identical record already existed; nothing was changed
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProvisionError {
    /// A record of this name/type already exists with a different value.
    /// Nothing was changed; remove the old record or pick a different value.
    #[error("a {rtype} record for {name} already exists with a different value")]
    Collision { name: String, rtype: RecordType },
    #[error("invalid address: {0}")]
    InvalidAddress(#[from] std::net::AddrParseError),
    /// No configured zone contains the record name
    #[error("no authoritative zone found for {0}")]
    ZoneNotFound(String),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Stateless orchestrator for record changes against a single [`Backend`].
///
/// Every operation reasons from a fresh backend query, so provisioners can be
/// created and dropped per request. Note that the conflict check and the
/// subsequent create are separate backend calls: concurrent writers racing on
/// the same name must be serialized by the caller.
pub struct Provisioner<'a> {
    backend: &'a dyn Backend,
}

impl<'a> Provisioner<'a> {
    pub fn new(backend: &'a dyn Backend) -> Provisioner<'a> {
        Provisioner { backend }
    }

    /// Create an A record for `fqdn`, unless an identical one already exists.
    ///
    /// Fails with [`ProvisionError::Collision`] if `fqdn` already has an A
    /// record with a different address; nothing is changed in that case.
    pub fn create_a_record(
        &self,
        fqdn: &str,
        address: &str,
    ) -> Result<CreateOutcome, ProvisionError> {
        let addr: Ipv4Addr = address.parse()?;
        self.create_checked(fqdn, &addr.to_string(), RecordType::A)
    }

    /// Create an AAAA record for `fqdn`, unless an identical one already
    /// exists. Same collision semantics as [`Provisioner::create_a_record`].
    pub fn create_aaaa_record(
        &self,
        fqdn: &str,
        address: &str,
    ) -> Result<CreateOutcome, ProvisionError> {
        let addr: Ipv6Addr = address.parse()?;
        self.create_checked(fqdn, &addr.to_string(), RecordType::Aaaa)
    }

    /// Create a PTR record mapping `address` back to `fqdn`. The record name
    /// is the derived `in-addr.arpa`/`ip6.arpa` node name; the containing
    /// reverse zone is resolved by the backend like any other zone.
    pub fn create_ptr_record(
        &self,
        fqdn: &str,
        address: &str,
    ) -> Result<CreateOutcome, ProvisionError> {
        let addr: IpAddr = address.parse()?;
        self.create_checked(&reverse_name(addr), fqdn, RecordType::Ptr)
    }

    /// Remove the A record(s) at `fqdn`. Unconditional; removing a name that
    /// holds no records is a backend-level no-op.
    pub fn remove_a_record(&self, fqdn: &str) -> Result<(), ProvisionError> {
        self.do_remove(fqdn, RecordType::A)
    }

    /// Remove the AAAA record(s) at `fqdn`.
    pub fn remove_aaaa_record(&self, fqdn: &str) -> Result<(), ProvisionError> {
        self.do_remove(fqdn, RecordType::Aaaa)
    }

    /// Remove the PTR record for `address`.
    pub fn remove_ptr_record(&self, address: &str) -> Result<(), ProvisionError> {
        let addr: IpAddr = address.parse()?;
        self.do_remove(&reverse_name(addr), RecordType::Ptr)
    }

    /// Classify a candidate A record against existing backend state.
    pub fn a_record_conflicts(
        &self,
        name: &str,
        address: &str,
    ) -> Result<ConflictClass, ProvisionError> {
        let addr: Ipv4Addr = address.parse()?;
        self.classify(name, &addr.to_string(), RecordType::A)
    }

    /// Classify a candidate AAAA record against existing backend state.
    pub fn aaaa_record_conflicts(
        &self,
        name: &str,
        address: &str,
    ) -> Result<ConflictClass, ProvisionError> {
        let addr: Ipv6Addr = address.parse()?;
        self.classify(name, &addr.to_string(), RecordType::Aaaa)
    }

    /// Classify a candidate PTR record against existing backend state.
    /// `name` is the reverse node name, `value` the target FQDN.
    pub fn ptr_record_conflicts(
        &self,
        name: &str,
        value: &str,
    ) -> Result<ConflictClass, ProvisionError> {
        self.classify(name, value, RecordType::Ptr)
    }

    // Read-only: one record lookup, no mutation.
    fn classify(
        &self,
        name: &str,
        value: &str,
        rtype: RecordType,
    ) -> Result<ConflictClass, ProvisionError> {
        let existing = self.backend.lookup_records(name, rtype)?;
        debug!("Existing {} records at {}: {:?}", rtype, name, existing);
        if existing.is_empty() {
            Ok(ConflictClass::Absent)
        } else if existing.iter().any(|content| content == value) {
            Ok(ConflictClass::Duplicate)
        } else {
            Ok(ConflictClass::Conflict)
        }
    }

    fn create_checked(
        &self,
        name: &str,
        value: &str,
        rtype: RecordType,
    ) -> Result<CreateOutcome, ProvisionError> {
        match self.classify(name, value, rtype)? {
            ConflictClass::Conflict => Err(ProvisionError::Collision {
                name: name.to_string(),
                rtype,
            }),
            ConflictClass::Duplicate => {
                info!("{} record {} -> {} already exists, nothing to do", rtype, name, value);
                Ok(CreateOutcome::Unchanged)
            }
            ConflictClass::Absent => {
                self.do_create(name, value, rtype)?;
                Ok(CreateOutcome::Created)
            }
        }
    }

    /// Create a record of any type, without a conflict check: resolve the
    /// containing zone, create the record, rectify the zone.
    ///
    /// If rectification fails after the record was written, the error is
    /// surfaced and the zone is left unrectified; re-running the operation is
    /// safe.
    pub fn do_create(
        &self,
        name: &str,
        value: &str,
        rtype: RecordType,
    ) -> Result<(), ProvisionError> {
        let zone = self
            .backend
            .get_zone(name)?
            .ok_or_else(|| ProvisionError::ZoneNotFound(name.to_string()))?;
        debug!("Zone for {} is {} (id {})", name, zone.name, zone.id);
        self.backend.create_record(&zone.id, name, rtype, value)?;
        self.backend.rectify_zone(&zone.name)?;
        info!("Created {} record {} -> {} in zone {}", rtype, name, value, zone.name);
        Ok(())
    }

    /// Remove all records of a type at a name, without a conflict check:
    /// resolve the containing zone, delete, rectify. Same partial-failure
    /// semantics as [`Provisioner::do_create`].
    pub fn do_remove(&self, name: &str, rtype: RecordType) -> Result<(), ProvisionError> {
        let zone = self
            .backend
            .get_zone(name)?
            .ok_or_else(|| ProvisionError::ZoneNotFound(name.to_string()))?;
        debug!("Zone for {} is {} (id {})", name, zone.name, zone.id);
        self.backend.delete_record(&zone.id, name, rtype)?;
        self.backend.rectify_zone(&zone.name)?;
        info!("Removed {} record(s) at {} from zone {}", rtype, name, zone.name);
        Ok(())
    }
}
