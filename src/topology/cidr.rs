//! IPv4 CIDR value object.
//!
//! Subnet, VPC and cluster ranges are all IPv4. The type is only used to
//! validate input and to keep allocated cluster ranges clear of the ranges
//! the topology already uses; rendered output always carries the original
//! string. Firewall source ranges may also be IPv6, see [`check_source_range`].

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/// An IPv4 network in CIDR notation, e.g. `10.0.1.0/24`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv4Cidr {
    address: Ipv4Addr,
    prefix: u8,
}

impl Ipv4Cidr {
    /// Create a CIDR from an address and prefix length.
    pub fn new(address: Ipv4Addr, prefix: u8) -> Option<Self> {
        (prefix <= 32).then_some(Self { address, prefix })
    }

    /// The address as written.
    pub fn address(&self) -> Ipv4Addr {
        self.address
    }

    /// Prefix length.
    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    fn mask(&self) -> u32 {
        if self.prefix == 0 {
            0
        } else {
            u32::MAX << (32 - u32::from(self.prefix))
        }
    }

    /// First address of the network.
    pub fn network(&self) -> u32 {
        u32::from(self.address) & self.mask()
    }

    /// Last address of the network.
    pub fn broadcast(&self) -> u32 {
        self.network() | !self.mask()
    }

    /// Whether two networks share at least one address.
    pub fn overlaps(&self, other: &Ipv4Cidr) -> bool {
        self.network() <= other.broadcast() && other.network() <= self.broadcast()
    }

    /// Whether `other` lies entirely inside this network.
    pub fn contains(&self, other: &Ipv4Cidr) -> bool {
        self.network() <= other.network() && other.broadcast() <= self.broadcast()
    }
}

impl FromStr for Ipv4Cidr {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr, prefix) = s
            .split_once('/')
            .ok_or_else(|| format!("'{}' is missing a prefix length", s))?;

        let address = Ipv4Addr::from_str(addr)
            .map_err(|_| format!("'{}' is not a valid IPv4 address", addr))?;

        let prefix = prefix
            .parse::<u8>()
            .ok()
            .filter(|p| *p <= 32)
            .ok_or_else(|| format!("'{}' is not a valid prefix length (0-32)", prefix))?;

        Ok(Self { address, prefix })
    }
}

/// Check a firewall source range, which may be an IPv4 or an IPv6 CIDR.
pub fn check_source_range(s: &str) -> Result<(), String> {
    let Some((addr, prefix)) = s.split_once('/').filter(|(addr, _)| addr.contains(':')) else {
        return s.parse::<Ipv4Cidr>().map(drop);
    };

    Ipv6Addr::from_str(addr).map_err(|_| format!("'{}' is not a valid IPv6 address", addr))?;
    prefix
        .parse::<u8>()
        .ok()
        .filter(|p| *p <= 128)
        .map(drop)
        .ok_or_else(|| format!("'{}' is not a valid prefix length (0-128)", prefix))
}

impl fmt::Display for Ipv4Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.prefix)
    }
}
