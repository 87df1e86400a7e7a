//! Mock implementations for testing
//!
//! Provides a mock Mist organization for unit testing without network access.

use crate::error::ApiError;
use crate::mist::{MistApi, NetworkTemplate, Site, SwitchStats};

use serde_json::json;
use std::collections::HashMap;
use std::sync::Mutex;

/// Mock Mist organization for testing
#[derive(Debug, Default)]
pub struct MockMistApi {
    org_id: String,
    sites: Vec<Site>,
    templates: Vec<NetworkTemplate>,
    switches: HashMap<String, Vec<SwitchStats>>,
    unauthorized: bool,
    stats_calls: Mutex<Vec<String>>,
}

impl MockMistApi {
    /// Create an empty organization
    pub fn new(org_id: impl Into<String>) -> Self {
        Self {
            org_id: org_id.into(),
            ..Self::default()
        }
    }

    /// Builder: add a site, optionally bound to a network template
    pub fn with_site(mut self, id: &str, name: &str, template_id: Option<&str>) -> Self {
        self.sites.push(Site {
            id: id.to_string(),
            name: name.to_string(),
            networktemplate_id: template_id.map(str::to_string),
        });
        self
    }

    /// Builder: add a network template from `(network name, vlan)` pairs
    pub fn with_template(mut self, id: &str, networks: &[(&str, u16)]) -> Self {
        let networks: serde_json::Map<String, serde_json::Value> = networks
            .iter()
            .map(|(name, vlan)| (name.to_string(), json!({ "vlan_id": vlan })))
            .collect();
        let template = serde_json::from_value(json!({ "id": id, "networks": networks }))
            .expect("valid template fixture");
        self.templates.push(template);
        self
    }

    /// Builder: add a raw switch stats payload to a site
    pub fn with_switch(mut self, site_id: &str, stats: serde_json::Value) -> Self {
        let stats = serde_json::from_value(stats).expect("valid switch stats fixture");
        self.switches
            .entry(site_id.to_string())
            .or_default()
            .push(stats);
        self
    }

    /// Builder: reject every call as unauthorized
    pub fn unauthorized(mut self) -> Self {
        self.unauthorized = true;
        self
    }

    /// Site IDs whose switch stats were requested, in order
    pub fn stats_calls(&self) -> Vec<String> {
        self.stats_calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    fn check_auth(&self, endpoint: &str) -> Result<(), ApiError> {
        if self.unauthorized {
            return Err(ApiError::Unauthorized(endpoint.to_string()));
        }
        Ok(())
    }
}

impl MistApi for MockMistApi {
    fn org_id(&self) -> &str {
        &self.org_id
    }

    fn sites(&self) -> Result<Vec<Site>, ApiError> {
        self.check_auth("sites")?;
        Ok(self.sites.clone())
    }

    fn network_templates(&self) -> Result<Vec<NetworkTemplate>, ApiError> {
        self.check_auth("networktemplates")?;
        Ok(self.templates.clone())
    }

    fn switch_stats(&self, site_id: &str) -> Result<Vec<SwitchStats>, ApiError> {
        self.check_auth("stats/devices")?;
        if let Ok(mut calls) = self.stats_calls.lock() {
            calls.push(site_id.to_string());
        }
        Ok(self.switches.get(site_id).cloned().unwrap_or_default())
    }
}

/// Build a static switch stats payload
pub fn static_switch(
    mac: &str,
    name: &str,
    configured: (&str, &str, &str),
    network: &str,
    reported: (&str, &str, &str),
    reported_vlan: u16,
) -> serde_json::Value {
    let (ip, netmask, gateway) = configured;
    let (stat_ip, stat_mask, stat_gw) = reported;
    let vlan_iface = format!("vlan{}", reported_vlan);
    json!({
        "id": format!("00000000-0000-0000-1000-{}", mac),
        "mac": mac,
        "name": name,
        "ip_config": {
            "type": "static",
            "ip": ip,
            "netmask": netmask,
            "gateway": gateway,
            "network": network
        },
        "ip_stat": {
            "ip": stat_ip,
            "netmask": stat_mask,
            "gateway": stat_gw,
            "ips": { vlan_iface: stat_ip }
        }
    })
}

/// Two-site organization used across tests
///
/// * `hq` (template `nt-hq`, `mgmt` = VLAN 10): `hq-sw1` consistent,
///   `hq-sw2` reports a different address than configured.
/// * `branch` (no template): `5c5b35000003` has no name and uses the
///   `default` network.
pub fn fixture_org() -> MockMistApi {
    MockMistApi::new("org-1")
        .with_template("nt-hq", &[("mgmt", 10)])
        .with_site("site-hq", "hq", Some("nt-hq"))
        .with_site("site-branch", "branch", None)
        .with_switch(
            "site-hq",
            static_switch(
                "5c5b35000001",
                "hq-sw1",
                ("10.0.10.11", "255.255.255.0", "10.0.10.1"),
                "mgmt",
                ("10.0.10.11", "255.255.255.0", "10.0.10.1"),
                10,
            ),
        )
        .with_switch(
            "site-hq",
            static_switch(
                "5c5b35000002",
                "hq-sw2",
                ("10.0.10.12", "255.255.255.0", "10.0.10.1"),
                "mgmt",
                ("10.0.10.99", "255.255.255.0", "10.0.10.1"),
                10,
            ),
        )
        .with_switch(
            "site-branch",
            static_switch(
                "5c5b35000003",
                "",
                ("192.168.1.2", "255.255.255.0", "192.168.1.1"),
                "default",
                ("192.168.1.2", "255.255.255.0", "192.168.1.1"),
                1,
            ),
        )
}
