//! Mist inventory loader
//!
//! Pulls sites, network templates and switch stats from the Mist API and
//! turns each switch into two records: the addressing Mist is configured to
//! push, and the addressing the switch reports it is using.

use crate::domain::{
    format_mac, normalize_mac, parse_gateway, IdentifierKind, Interface, RecordSet, Source,
    SwitchId, SwitchRecord,
};
use crate::error::ApiError;
use crate::mist::{IpConfig, IpStat, MistApi, NetworkTemplate, Site, SwitchStats};

use std::collections::BTreeSet;

/// Management network name Mist maps to VLAN 1
const DEFAULT_NETWORK: &str = "default";

/// One switch as seen by Mist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedSwitch {
    /// Addressing from `ip_config`
    pub configured: SwitchRecord,
    /// Addressing from `ip_stat`
    pub reported: SwitchRecord,
}

/// Sites and switches loaded from one organization
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    pub sites: Vec<Site>,
    pub switches: Vec<ManagedSwitch>,
}

impl Inventory {
    /// Configured addressing keyed by identifier
    pub fn managed(&self) -> RecordSet {
        collect_unique(self.switches.iter().map(|s| s.configured.clone()))
    }

    /// Reported addressing keyed by identifier
    pub fn live(&self) -> RecordSet {
        collect_unique(self.switches.iter().map(|s| s.reported.clone()))
    }

    /// Keep only the given switches
    pub fn retain_ids(&mut self, ids: &BTreeSet<SwitchId>) {
        self.switches.retain(|s| ids.contains(&s.configured.id));
    }
}

fn collect_unique<I: IntoIterator<Item = SwitchRecord>>(records: I) -> RecordSet {
    let mut set = RecordSet::new();
    for record in records {
        let name = record.name.clone();
        if let Some(previous) = set.insert(record) {
            log::warn!(
                "Duplicate identifier '{}' in Mist inventory: '{}' replaces '{}'",
                previous.id,
                name,
                previous.name
            );
        }
    }
    set
}

/// Service that loads an [`Inventory`] from a Mist organization
pub struct InventoryService<'a, A: MistApi> {
    api: &'a A,
    key: IdentifierKind,
}

impl<'a, A: MistApi> InventoryService<'a, A> {
    /// Create a new inventory service
    pub fn new(api: &'a A, key: IdentifierKind) -> Self {
        Self { api, key }
    }

    /// Load sites and switches
    ///
    /// With a site filter, only sites whose name is in the filter are loaded.
    pub fn load(&self, site_filter: Option<&BTreeSet<String>>) -> Result<Inventory, ApiError> {
        log::debug!("Loading sites for org {}...", self.api.org_id());
        let mut sites = self.api.sites()?;

        if let Some(filter) = site_filter.filter(|f| !f.is_empty()) {
            sites.retain(|s| filter.contains(&s.name));
            for name in filter {
                if !sites.iter().any(|s| &s.name == name) {
                    log::warn!("Site '{}' not found in organization", name);
                }
            }
        }
        log::debug!("Loaded {} sites.", sites.len());

        log::debug!("Loading network templates...");
        let templates = self.api.network_templates()?;
        log::debug!("Loaded {} network templates.", templates.len());

        let mut switches = Vec::new();
        for site in &sites {
            let template = site_template(site, &templates);
            for stats in self.api.switch_stats(&site.id)? {
                if let Some(switch) = self.build_switch(site, template, &stats) {
                    switches.push(switch);
                }
            }
        }
        log::info!(
            "Loaded {} switches across {} sites",
            switches.len(),
            sites.len()
        );

        Ok(Inventory { sites, switches })
    }

    fn build_switch(
        &self,
        site: &Site,
        template: Option<&NetworkTemplate>,
        stats: &SwitchStats,
    ) -> Option<ManagedSwitch> {
        let Some(mac) = stats.mac.as_deref().and_then(normalize_mac) else {
            log::warn!(
                "Skipping device '{}' at site '{}': no usable MAC",
                stats.id,
                site.name
            );
            return None;
        };

        let name = stats
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format_mac(&mac));

        let raw_id = match self.key {
            IdentifierKind::Mac => mac.as_str(),
            IdentifierKind::Name => name.as_str(),
        };
        let id = match SwitchId::parse(raw_id, self.key) {
            Ok(id) => id,
            Err(e) => {
                log::warn!("Skipping switch {}: {}", name, e);
                return None;
            }
        };

        let base = |source| {
            SwitchRecord::new(id.clone(), name.clone(), source)
                .with_site(site.name.clone())
                .with_mac(mac.clone())
        };

        let configured = configured_record(
            base(Source::Managed),
            stats.ip_config.as_ref(),
            template,
        );
        let reported = reported_record(base(Source::Baseline), stats.ip_stat.as_ref());

        Some(ManagedSwitch {
            configured,
            reported,
        })
    }
}

fn site_template<'t>(site: &Site, templates: &'t [NetworkTemplate]) -> Option<&'t NetworkTemplate> {
    let template_id = site.networktemplate_id.as_deref()?;
    let template = templates.iter().find(|t| t.id == template_id);
    if template.is_none() {
        log::warn!(
            "Site '{}' references unknown network template {}",
            site.name,
            template_id
        );
    }
    template
}

fn configured_record(
    mut record: SwitchRecord,
    config: Option<&IpConfig>,
    template: Option<&NetworkTemplate>,
) -> SwitchRecord {
    let Some(config) = config else {
        log::warn!("{} has no management IP configuration", record.name);
        return record;
    };

    record = record.with_dynamic(config.is_dhcp());

    if let Some(ip) = config.ip.as_deref().filter(|ip| !ip.trim().is_empty()) {
        match Interface::parse(ip, config.netmask.as_deref()) {
            Ok(address) => record = record.with_address(address),
            Err(e) => log::warn!("{}: configured address ignored: {}", record.name, e),
        }
    }
    if let Some(gateway) = config.gateway.as_deref().filter(|g| !g.trim().is_empty()) {
        match parse_gateway(gateway) {
            Ok(gateway) => record = record.with_gateway(gateway),
            Err(e) => log::warn!("{}: configured gateway ignored: {}", record.name, e),
        }
    }

    let network = config.network.as_deref().map(str::trim).unwrap_or_default();
    let vlan = if network == DEFAULT_NETWORK {
        Some(1)
    } else if network.is_empty() {
        None
    } else {
        template.and_then(|t| t.vlan_for(network))
    };

    match vlan {
        Some(vlan) => {
            log::debug!(
                "Matched {} management network '{}' to VLAN {}",
                record.name,
                network,
                vlan
            );
            record = record.with_vlan(vlan);
        }
        None => log::error!(
            "Did not match {} management network '{}' to a VLAN",
            record.name,
            network
        ),
    }

    if !network.is_empty() {
        record = record.with_network(network);
    }
    record
}

fn reported_record(mut record: SwitchRecord, stat: Option<&IpStat>) -> SwitchRecord {
    let Some(stat) = stat else {
        log::debug!("{} reports no IP state", record.name);
        return record;
    };

    if let Some(ip) = stat.ip.as_deref().filter(|ip| !ip.trim().is_empty()) {
        match Interface::parse(ip, stat.netmask.as_deref()) {
            Ok(address) => record = record.with_address(address),
            Err(e) => log::debug!("{}: reported address ignored: {}", record.name, e),
        }
    }
    if let Some(gateway) = stat.gateway.as_deref().and_then(|g| parse_gateway(g).ok()) {
        record = record.with_gateway(gateway);
    }
    if let Some(vlan) = stat.vlan() {
        record = record.with_vlan(vlan);
    }
    record
}
