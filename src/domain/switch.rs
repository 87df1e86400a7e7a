//! Switch identity and record types
//!
//! A [`SwitchRecord`] is one switch's management addressing as seen by one
//! source. Records are keyed by a normalized [`SwitchId`] and collected in a
//! [`RecordSet`].

use crate::domain::address::Interface;
use crate::error::DomainError;

use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;
use std::net::Ipv4Addr;

/// Which field identifies a switch across sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierKind {
    /// Hardware MAC address
    #[default]
    Mac,
    /// Switch hostname
    Name,
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mac => write!(f, "mac"),
            Self::Name => write!(f, "name"),
        }
    }
}

/// Normalized switch identifier
///
/// MACs are stored as 12 lowercase hex digits without separators, names are
/// trimmed and lowercased. Two identifiers that refer to the same switch in
/// different notations compare equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SwitchId(String);

impl SwitchId {
    /// Normalize a raw identifier of the given kind
    pub fn parse(raw: &str, kind: IdentifierKind) -> Result<Self, DomainError> {
        match kind {
            IdentifierKind::Mac => normalize_mac(raw)
                .map(Self)
                .ok_or_else(|| DomainError::InvalidIdentifier(raw.to_string())),
            IdentifierKind::Name => {
                let name = raw.trim();
                if name.is_empty() {
                    return Err(DomainError::InvalidIdentifier(raw.to_string()));
                }
                Ok(Self(name.to_lowercase()))
            }
        }
    }

    /// Get the normalized identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SwitchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalize a MAC address to 12 lowercase hex digits
///
/// Accepts colon, dash and dot separated forms as well as the bare form Mist
/// uses. Returns `None` for anything that is not exactly six octets.
pub fn normalize_mac(raw: &str) -> Option<String> {
    let hex: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, ':' | '-' | '.'))
        .collect();

    if hex.len() == 12 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Some(hex.to_ascii_lowercase())
    } else {
        None
    }
}

/// Format a normalized MAC as `AA:BB:CC:DD:EE:FF`
pub fn format_mac(mac: &str) -> String {
    mac.as_bytes()
        .chunks(2)
        .map(|pair| String::from_utf8_lossy(pair).to_ascii_uppercase())
        .collect::<Vec<_>>()
        .join(":")
}

/// Where a record was loaded from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Mist cloud configuration
    Managed,
    /// Existing network (CSV or the switch's reported state)
    Baseline,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Managed => write!(f, "managed"),
            Self::Baseline => write!(f, "baseline"),
        }
    }
}

/// One switch's management addressing from one source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwitchRecord {
    /// Normalized identifier
    pub id: SwitchId,
    /// Display name
    pub name: String,
    /// Site name
    pub site: Option<String>,
    /// Normalized MAC (12 hex digits)
    pub mac: Option<String>,
    /// Management interface address
    pub address: Option<Interface>,
    /// Default gateway
    pub gateway: Option<Ipv4Addr>,
    /// Management VLAN
    pub vlan: Option<u16>,
    /// Mist management network name
    pub network: Option<String>,
    /// Address is assigned by DHCP
    pub dynamic: bool,
    /// Record origin
    pub source: Source,
}

impl SwitchRecord {
    /// Create a record with no addressing
    pub fn new(id: SwitchId, name: impl Into<String>, source: Source) -> Self {
        Self {
            id,
            name: name.into(),
            site: None,
            mac: None,
            address: None,
            gateway: None,
            vlan: None,
            network: None,
            dynamic: false,
            source,
        }
    }

    /// Set the site name
    pub fn with_site(mut self, site: impl Into<String>) -> Self {
        self.site = Some(site.into());
        self
    }

    /// Set the MAC address
    pub fn with_mac(mut self, mac: impl Into<String>) -> Self {
        self.mac = Some(mac.into());
        self
    }

    /// Set the management address
    pub fn with_address(mut self, address: Interface) -> Self {
        self.address = Some(address);
        self
    }

    /// Set the default gateway
    pub fn with_gateway(mut self, gateway: Ipv4Addr) -> Self {
        self.gateway = Some(gateway);
        self
    }

    /// Set the management VLAN
    pub fn with_vlan(mut self, vlan: u16) -> Self {
        self.vlan = Some(vlan);
        self
    }

    /// Set the Mist management network name
    pub fn with_network(mut self, network: impl Into<String>) -> Self {
        self.network = Some(network.into());
        self
    }

    /// Mark the address as DHCP-assigned
    pub fn with_dynamic(mut self, dynamic: bool) -> Self {
        self.dynamic = dynamic;
        self
    }

    /// MAC in `AA:BB:CC:DD:EE:FF` form, if known
    pub fn mac_display(&self) -> Option<String> {
        self.mac.as_deref().map(format_mac)
    }
}

/// Records from one source, keyed and ordered by identifier
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSet {
    records: BTreeMap<SwitchId, SwitchRecord>,
}

impl RecordSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, returning the one it replaced
    ///
    /// The last record inserted for an identifier wins.
    pub fn insert(&mut self, record: SwitchRecord) -> Option<SwitchRecord> {
        self.records.insert(record.id.clone(), record)
    }

    /// Look up a record by identifier
    pub fn get(&self, id: &SwitchId) -> Option<&SwitchRecord> {
        self.records.get(id)
    }

    /// Check whether an identifier is present
    pub fn contains(&self, id: &SwitchId) -> bool {
        self.records.contains_key(id)
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Identifiers in order
    pub fn ids(&self) -> impl Iterator<Item = &SwitchId> {
        self.records.keys()
    }

    /// Records in identifier order
    pub fn iter(&self) -> btree_map::Values<'_, SwitchId, SwitchRecord> {
        self.records.values()
    }
}

impl FromIterator<SwitchRecord> for RecordSet {
    fn from_iter<I: IntoIterator<Item = SwitchRecord>>(iter: I) -> Self {
        let mut set = Self::new();
        for record in iter {
            set.insert(record);
        }
        set
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a SwitchRecord;
    type IntoIter = btree_map::Values<'a, SwitchId, SwitchRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
