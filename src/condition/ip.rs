//! Network-origin conditions
//!
//! Three entry grammars: a single address (`10.0.0.1`), a CIDR block
//! (`10.0.0.0/24`), or an inclusive range (`10.0.0.1-10.0.0.9`). Both IPv4
//! and IPv6 are accepted; a rule only ever matches an address of its own
//! family.

use crate::error::{AclError, Result};
use std::net::IpAddr;

/// A parsed IP condition entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IpRule {
    Single(IpAddr),
    Cidr { network: IpAddr, prefix: u8 },
    Range { start: IpAddr, end: IpAddr },
}

impl IpRule {
    /// Parse one entry. Ranges must be ordered (`start <= end`, compared as
    /// unsigned address bytes) and CIDR prefixes must be 0-128.
    pub fn parse(raw: &str) -> Result<Self> {
        if let Ok(addr) = raw.parse::<IpAddr>() {
            return Ok(IpRule::Single(addr));
        }

        if let Some((addr, len)) = raw.split_once('/') {
            let network: IpAddr = addr
                .parse()
                .map_err(|_| AclError::InvalidIp(raw.to_string()))?;
            let prefix: u8 = len
                .parse()
                .map_err(|_| AclError::InvalidIp(raw.to_string()))?;
            if prefix > 128 {
                return Err(AclError::InvalidIp(raw.to_string()));
            }
            return Ok(IpRule::Cidr { network, prefix });
        }

        if let Some((start, end)) = raw.split_once('-') {
            let start: IpAddr = start
                .trim()
                .parse()
                .map_err(|_| AclError::InvalidIp(raw.to_string()))?;
            let end: IpAddr = end
                .trim()
                .parse()
                .map_err(|_| AclError::InvalidIp(raw.to_string()))?;
            if same_family(&start, &end) && addr_key(&start) <= addr_key(&end) {
                return Ok(IpRule::Range { start, end });
            }
            return Err(AclError::InvalidIp(raw.to_string()));
        }

        Err(AclError::InvalidIp(raw.to_string()))
    }

    /// Whether the given address falls under this rule.
    pub fn contains(&self, ip: &IpAddr) -> bool {
        match self {
            IpRule::Single(addr) => addr == ip,
            IpRule::Cidr { network, prefix } => cidr_contains(network, *prefix, ip),
            IpRule::Range { start, end } => {
                same_family(start, ip)
                    && addr_key(start) <= addr_key(ip)
                    && addr_key(ip) <= addr_key(end)
            }
        }
    }
}

fn same_family(a: &IpAddr, b: &IpAddr) -> bool {
    a.is_ipv4() == b.is_ipv4()
}

/// Unsigned ordering key within one address family.
fn addr_key(ip: &IpAddr) -> u128 {
    match ip {
        IpAddr::V4(v4) => u32::from(*v4) as u128,
        IpAddr::V6(v6) => u128::from(*v6),
    }
}

fn cidr_contains(network: &IpAddr, prefix: u8, ip: &IpAddr) -> bool {
    match (network, ip) {
        (IpAddr::V4(net), IpAddr::V4(ip)) => {
            // Prefixes beyond the address width cannot match anything.
            if prefix > 32 {
                return false;
            }
            let mask = if prefix == 0 {
                0
            } else {
                u32::MAX << (32 - prefix)
            };
            (u32::from(*ip) & mask) == (u32::from(*net) & mask)
        }
        (IpAddr::V6(net), IpAddr::V6(ip)) => {
            let mask = if prefix == 0 {
                0
            } else {
                u128::MAX << (128 - prefix)
            };
            (u128::from(*ip) & mask) == (u128::from(*net) & mask)
        }
        _ => false,
    }
}

/// True iff `entries` is empty (no restriction) or the source address
/// matches at least one entry. An unparsable source address never matches.
pub fn ip_allowed(entries: &[String], source_ip: &str) -> bool {
    if entries.is_empty() {
        return true;
    }
    let Ok(ip) = source_ip.parse::<IpAddr>() else {
        return false;
    };
    entries
        .iter()
        .filter_map(|e| IpRule::parse(e).ok())
        .any(|rule| rule.contains(&ip))
}
