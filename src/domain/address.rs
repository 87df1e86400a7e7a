//! IPv4 addressing helpers
//!
//! Parses the address, netmask and VLAN notations found in Mist payloads and
//! hand-written CSV files into canonical values, so that comparisons never
//! depend on formatting.

use crate::error::DomainError;

use ipnetwork::Ipv4Network;
use serde::{Serialize, Serializer};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// Management interface address with an optional prefix length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interface {
    ip: Ipv4Addr,
    prefix: Option<u8>,
}

impl Interface {
    /// Create an interface address
    pub fn new(ip: Ipv4Addr, prefix: Option<u8>) -> Result<Self, DomainError> {
        if let Some(p) = prefix {
            if p > 32 {
                return Err(DomainError::InvalidNetmask(format!("/{}", p)));
            }
        }
        Ok(Self { ip, prefix })
    }

    /// Parse an address and an optional separate netmask
    ///
    /// A prefix embedded in `address` takes precedence over `netmask`.
    pub fn parse(address: &str, netmask: Option<&str>) -> Result<Self, DomainError> {
        let iface: Interface = address.parse()?;
        if iface.prefix.is_some() {
            return Ok(iface);
        }

        match netmask.map(str::trim).filter(|m| !m.is_empty()) {
            Some(mask) => Self::new(iface.ip, Some(parse_prefix(mask)?)),
            None => Ok(iface),
        }
    }

    /// Host address
    pub fn ip(&self) -> Ipv4Addr {
        self.ip
    }

    /// Prefix length, if known
    pub fn prefix(&self) -> Option<u8> {
        self.prefix
    }

    /// Network this address belongs to, if the prefix is known
    pub fn network(&self) -> Option<Ipv4Network> {
        self.prefix.and_then(|p| Ipv4Network::new(self.ip, p).ok())
    }
}

impl FromStr for Interface {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || DomainError::InvalidAddress(s.to_string());

        match s.split_once('/') {
            Some((ip, prefix)) => {
                let ip = ip.trim().parse::<Ipv4Addr>().map_err(|_| invalid())?;
                let prefix = prefix.trim().parse::<u8>().map_err(|_| invalid())?;
                Self::new(ip, Some(prefix)).map_err(|_| invalid())
            }
            None => {
                let ip = s.parse::<Ipv4Addr>().map_err(|_| invalid())?;
                Ok(Self { ip, prefix: None })
            }
        }
    }
}

impl fmt::Display for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.prefix {
            Some(p) => write!(f, "{}/{}", self.ip, p),
            None => write!(f, "{}", self.ip),
        }
    }
}

impl Serialize for Interface {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parse a netmask as a prefix length
///
/// Accepts `255.255.255.0`, `/24` and `24`.
pub fn parse_prefix(mask: &str) -> Result<u8, DomainError> {
    let mask = mask.trim();
    let invalid = || DomainError::InvalidNetmask(mask.to_string());

    if mask.contains('.') {
        let dotted = mask.parse::<Ipv4Addr>().map_err(|_| invalid())?;
        return ipnetwork::ipv4_mask_to_prefix(dotted).map_err(|_| invalid());
    }

    let prefix = mask
        .trim_start_matches('/')
        .parse::<u8>()
        .map_err(|_| invalid())?;
    if prefix > 32 {
        return Err(invalid());
    }
    Ok(prefix)
}

/// Parse an IPv4 gateway address
pub fn parse_gateway(gateway: &str) -> Result<Ipv4Addr, DomainError> {
    gateway
        .trim()
        .parse()
        .map_err(|_| DomainError::InvalidAddress(gateway.trim().to_string()))
}

/// Parse a VLAN ID (1-4094)
///
/// Accepts `10`, `vlan10` and `VLAN 10`.
pub fn parse_vlan(vlan: &str) -> Result<u16, DomainError> {
    let trimmed = vlan.trim();
    let digits = match trimmed.get(..4) {
        Some(prefix) if prefix.eq_ignore_ascii_case("vlan") => trimmed[4..].trim(),
        _ => trimmed,
    };

    match digits.parse::<u16>() {
        Ok(id) if (1..=4094).contains(&id) => Ok(id),
        _ => Err(DomainError::InvalidVlan(trimmed.to_string())),
    }
}
