//! Derives the reverse-DNS node name for an address.
//!
//! The derived name is only used as the *record* name for PTR lookups and
//! mutations; which zone actually contains it is decided by the backend's
//! longest-suffix match, so no knowledge of zone boundaries is needed here.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Returns the canonical reverse-zone node name for an address.
///
/// IPv4 addresses map into `in-addr.arpa`, IPv6 addresses into `ip6.arpa`:
///
/// ```
/// use powerdns_record_helper::reverse::reverse_name;
///
/// assert_eq!(reverse_name("10.1.1.1".parse().unwrap()), "1.1.1.10.in-addr.arpa");
/// ```
pub fn reverse_name(addr: IpAddr) -> String {
    match addr {
        IpAddr::V4(v4) => reverse_name_v4(&v4),
        IpAddr::V6(v6) => reverse_name_v6(&v6),
    }
}

// Octets in reverse order, e.g. 10.1.1.1 -> 1.1.1.10.in-addr.arpa
fn reverse_name_v4(addr: &Ipv4Addr) -> String {
    let mut octets = addr.octets();
    octets.reverse();
    format!(
        "{}.in-addr.arpa",
        octets.map(|o| o.to_string()).join(".")
    )
}

// The address is expanded to all 32 nibbles (no `::` compression), which are
// then emitted in reverse order as individual labels.
fn reverse_name_v6(addr: &Ipv6Addr) -> String {
    let mut labels: Vec<String> = Vec::with_capacity(33);
    for byte in addr.octets().iter().rev() {
        labels.push(format!("{:x}", byte & 0x0f));
        labels.push(format!("{:x}", byte >> 4));
    }
    labels.push("ip6.arpa".to_string());
    labels.join(".")
}
