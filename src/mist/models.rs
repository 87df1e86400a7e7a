//! Mist API payload types
//!
//! Only the fields this tool reads are modelled; everything else in the
//! responses is ignored.

use crate::domain::parse_vlan;

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Treat an explicit `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Organization site (`/api/v1/orgs/{org_id}/sites`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub networktemplate_id: Option<String>,
}

/// Switch network template (`/api/v1/orgs/{org_id}/networktemplates`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkTemplate {
    pub id: String,
    #[serde(default)]
    pub networks: BTreeMap<String, TemplateNetwork>,
}

impl NetworkTemplate {
    /// VLAN of a named network in this template
    pub fn vlan_for(&self, network: &str) -> Option<u16> {
        self.networks.get(network).and_then(TemplateNetwork::vlan)
    }
}

/// Network definition inside a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateNetwork {
    /// Number, numeric string, or an unresolved `{{variable}}`
    #[serde(default)]
    pub vlan_id: Option<serde_json::Value>,
}

impl TemplateNetwork {
    /// Numeric VLAN, if the template defines a usable one
    pub fn vlan(&self) -> Option<u16> {
        match self.vlan_id.as_ref()? {
            serde_json::Value::Number(n) => n
                .as_u64()
                .and_then(|v| u16::try_from(v).ok())
                .filter(|v| (1..=4094).contains(v)),
            serde_json::Value::String(s) => parse_vlan(s).ok(),
            _ => None,
        }
    }
}

/// Switch entry from `/api/v1/sites/{site_id}/stats/devices?type=switch`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchStats {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub mac: Option<String>,
    /// Management addressing pushed by Mist
    #[serde(default)]
    pub ip_config: Option<IpConfig>,
    /// Addressing the switch reports it is using
    #[serde(default)]
    pub ip_stat: Option<IpStat>,
}

/// Configured management addressing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IpConfig {
    /// `static` or `dhcp`
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub netmask: Option<String>,
    #[serde(default)]
    pub gateway: Option<String>,
    /// Management network name (`default` or a template network)
    #[serde(default)]
    pub network: Option<String>,
}

impl IpConfig {
    /// Check whether the address is DHCP-assigned
    pub fn is_dhcp(&self) -> bool {
        self.kind
            .as_deref()
            .is_some_and(|k| k.eq_ignore_ascii_case("dhcp"))
    }
}

/// Reported management addressing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IpStat {
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub netmask: Option<String>,
    #[serde(default)]
    pub gateway: Option<String>,
    /// Interface name (`vlan10`) to address
    #[serde(default, deserialize_with = "null_as_default")]
    pub ips: BTreeMap<String, String>,
}

impl IpStat {
    /// VLAN whose interface carries the reported management address
    pub fn vlan(&self) -> Option<u16> {
        let ip = self.ip.as_deref()?.trim();
        self.ips
            .iter()
            .find(|(_, addr)| host_part(addr) == ip)
            .and_then(|(iface, _)| parse_vlan(iface).ok())
    }
}

/// Decode device stats one entry at a time
///
/// An entry that does not fit [`SwitchStats`] is logged and skipped so one
/// odd device cannot abort the whole run.
pub fn parse_switch_stats(entries: Vec<serde_json::Value>) -> Vec<SwitchStats> {
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let label = entry
                .get("mac")
                .or_else(|| entry.get("id"))
                .and_then(serde_json::Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("#{}", index));
            match serde_json::from_value::<SwitchStats>(entry) {
                Ok(stats) => Some(stats),
                Err(e) => {
                    log::warn!("Skipping device {}: unexpected stats payload: {}", label, e);
                    None
                }
            }
        })
        .collect()
}

fn host_part(addr: &str) -> &str {
    addr.split('/').next().unwrap_or(addr).trim()
}
