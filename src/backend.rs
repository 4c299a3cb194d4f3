//! Access to the authoritative DNS server holding the managed zones.
//!
//! All record operations in this crate go through the [`Backend`] trait.
//! [`ApiBackend`] implements it on top of the PowerDNS HTTP API.

mod api;

#[cfg(test)]
use mockall::automock;

// Re-exports for convenience
pub use self::api::{ApiBackend, ApiBackendConfig, DEFAULT_RECORD_TTL};

use std::fmt::Display;

use thiserror::Error;

/// The record types this crate manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    A,
    Aaaa,
    Ptr,
}
impl Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                RecordType::A => "A",
                RecordType::Aaaa => "AAAA",
                RecordType::Ptr => "PTR",
            }
        )
    }
}

/// An authoritative zone as known to the backend. The `id` is an opaque
/// backend identifier and is only ever passed back into [`Backend`] calls.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Zone {
    pub id: String,
    pub name: String,
}

/// A backend is any authoritative DNS server API that can look up zones and
/// mutate records, such as PowerDNS.
///
/// All calls are synchronous and blocking; the backend performs no retries
/// of its own and surfaces every failure to the caller.
#[cfg_attr(test, automock)]
pub trait Backend {
    /// Look up the zone containing `name`. Zone boundaries are determined by
    /// longest-suffix match over the zones the backend serves; `Ok(None)`
    /// means no configured zone contains the name.
    fn get_zone(&self, name: &str) -> Result<Option<Zone>, BackendError>;

    /// Create a record in the given zone. Does not rectify.
    fn create_record(
        &self,
        zone_id: &str,
        name: &str,
        rtype: RecordType,
        content: &str,
    ) -> Result<(), BackendError>;

    /// Delete all records of `rtype` at `name` in the given zone. Deleting a
    /// name that holds no records is a no-op at the server. Does not rectify.
    fn delete_record(&self, zone_id: &str, name: &str, rtype: RecordType)
        -> Result<(), BackendError>;

    /// Run the server's rectification pass over a zone. Must be called after
    /// every mutation so ordering metadata (NSEC chains etc.) stays valid.
    fn rectify_zone(&self, zone_name: &str) -> Result<(), BackendError>;

    /// Return the contents of all records of `rtype` at exactly `name`.
    /// Read-only; used for conflict classification before a create.
    fn lookup_records(&self, name: &str, rtype: RecordType) -> Result<Vec<String>, BackendError>;
}

/// Generic error returned by a backend action
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum BackendError {
    /// The request never produced a usable response (connection refused,
    /// timeout, malformed body, ...)
    #[error("backend request failed: {0}")]
    Http(String),
    /// The server answered with a non-success status
    #[error("backend returned status {status}: {body}")]
    Api { status: u16, body: String },
}
