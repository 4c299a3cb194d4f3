//! Main crate for the `powerdns_record_helper` application.
//!
//! Manages authoritative A, AAAA and PTR records against a PowerDNS server,
//! with idempotent creates, collision detection and automatic zone
//! rectification after every mutation.
//!
//! The following modules might be of interest if you want to add new functionality:
//! - [`backend`]s talk to the authoritative DNS server; [`backend::ApiBackend`] speaks the PowerDNS HTTP API
//! - [`reverse`] derives the `in-addr.arpa`/`ip6.arpa` node name for an address
//! - [`provision`] holds the [`provision::Provisioner`], which sequences conflict checks, record changes and rectification

#![allow(clippy::uninlined_format_args)]

pub mod backend;
pub mod provision;
pub mod reverse;
