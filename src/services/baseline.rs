//! CSV baseline loader
//!
//! Reads the existing (unmanaged) switch addressing from a CSV file. Rows that
//! cannot be used are skipped with a warning; only a missing or unreadable
//! file or an unusable header aborts the load.

use crate::domain::{
    format_mac, normalize_mac, parse_gateway, parse_vlan, IdentifierKind, Interface, RecordSet,
    Source, SwitchId, SwitchRecord,
};
use crate::error::InputError;

use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

const MAC_COLUMNS: &[&str] = &["mac_address", "mac"];
const NAME_COLUMNS: &[&str] = &["name", "switch_name", "hostname"];

/// One CSV row before validation
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BaselineRow {
    #[serde(alias = "mac")]
    mac_address: Option<String>,
    #[serde(alias = "switch_name", alias = "hostname")]
    name: Option<String>,
    #[serde(alias = "site")]
    site_name: Option<String>,
    #[serde(alias = "ip_address", alias = "address")]
    ip: Option<String>,
    #[serde(alias = "subnet", alias = "mask")]
    netmask: Option<String>,
    gateway: Option<String>,
    #[serde(alias = "vlan_id")]
    vlan: Option<String>,
}

/// Result of loading a baseline file
#[derive(Debug, Clone, Default)]
pub struct Baseline {
    /// Accepted records, last row wins per identifier
    pub records: RecordSet,
    /// Site names referenced by accepted rows
    pub sites: BTreeSet<String>,
    /// Rows skipped as malformed
    pub skipped: usize,
    /// Rows that replaced an earlier row with the same identifier
    pub duplicates: usize,
}

impl Baseline {
    /// Sites to limit the Mist inventory to
    ///
    /// `None` when any accepted record has no site, since its switch could be
    /// at any site in the organization.
    pub fn site_filter(&self) -> Option<&BTreeSet<String>> {
        if self.sites.is_empty() {
            return None;
        }
        if let Some(record) = self.records.iter().find(|r| r.site.is_none()) {
            log::warn!(
                "Switch '{}' has no site name, loading every site",
                record.name
            );
            return None;
        }
        Some(&self.sites)
    }
}

/// Loader for baseline CSV files
#[derive(Debug, Clone, Copy)]
pub struct BaselineLoader {
    key: IdentifierKind,
    require_address: bool,
}

impl BaselineLoader {
    /// Create a loader keyed on the given identifier kind
    pub fn new(key: IdentifierKind) -> Self {
        Self {
            key,
            require_address: true,
        }
    }

    /// Whether rows without an `ip` are malformed (default: yes)
    pub fn require_address(mut self, required: bool) -> Self {
        self.require_address = required;
        self
    }

    /// Load a baseline from a file path
    pub fn load_path<P: AsRef<Path>>(&self, path: P) -> Result<Baseline, InputError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => InputError::NotFound(path.display().to_string()),
            _ => InputError::Unreadable {
                path: path.display().to_string(),
                source: e,
            },
        })?;

        log::debug!("Loading baseline from {}", path.display());
        self.load_reader(file)
    }

    /// Load a baseline from any reader
    pub fn load_reader<R: Read>(&self, reader: R) -> Result<Baseline, InputError> {
        let mut csv = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv.headers()?.clone();
        let id_columns = match self.key {
            IdentifierKind::Mac => MAC_COLUMNS,
            IdentifierKind::Name => NAME_COLUMNS,
        };
        if !headers
            .iter()
            .any(|h| id_columns.iter().any(|c| h.eq_ignore_ascii_case(c)))
        {
            return Err(InputError::Csv(format!(
                "no identifier column (expected one of: {})",
                id_columns.join(", ")
            )));
        }
        let headers: csv::StringRecord = headers.iter().map(str::to_ascii_lowercase).collect();

        let mut baseline = Baseline::default();

        for result in csv.records() {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    let line = e.position().map_or(0, |p| p.line());
                    log::warn!("{}", InputError::MalformedRow { line, reason: e.to_string() });
                    baseline.skipped += 1;
                    continue;
                }
            };
            let line = record.position().map_or(0, |p| p.line());

            let parsed = record
                .deserialize::<BaselineRow>(Some(&headers))
                .map_err(|e| e.to_string())
                .and_then(|row| self.build_record(&row).map(|rec| (rec, row.site_name)));

            match parsed {
                Ok((switch, site)) => {
                    if let Some(site) = site.filter(|s| !s.is_empty()) {
                        baseline.sites.insert(site);
                    }
                    let id = switch.id.clone();
                    if baseline.records.insert(switch).is_some() {
                        log::warn!(
                            "Duplicate identifier '{}' at line {}, replacing earlier row",
                            id,
                            line
                        );
                        baseline.duplicates += 1;
                    }
                }
                Err(reason) => {
                    log::warn!("{}", InputError::MalformedRow { line, reason });
                    baseline.skipped += 1;
                }
            }
        }

        log::info!(
            "Loaded {} baseline switches ({} skipped, {} duplicates)",
            baseline.records.len(),
            baseline.skipped,
            baseline.duplicates
        );
        Ok(baseline)
    }

    fn build_record(&self, row: &BaselineRow) -> Result<SwitchRecord, String> {
        let mac_raw = non_empty(&row.mac_address);
        let name_raw = non_empty(&row.name);

        let raw_id = match self.key {
            IdentifierKind::Mac => mac_raw.ok_or("missing 'mac_address'")?,
            IdentifierKind::Name => name_raw.ok_or("missing 'name'")?,
        };
        let id = SwitchId::parse(raw_id, self.key).map_err(|e| e.to_string())?;

        let mac = mac_raw.and_then(normalize_mac);
        let name = name_raw
            .map(str::to_string)
            .or_else(|| mac.as_deref().map(format_mac))
            .unwrap_or_else(|| raw_id.to_string());

        let mut switch = SwitchRecord::new(id, name, Source::Baseline);
        if let Some(site) = non_empty(&row.site_name) {
            switch = switch.with_site(site);
        }
        if let Some(mac) = mac {
            switch = switch.with_mac(mac);
        }

        match non_empty(&row.ip) {
            Some(ip) => {
                let address =
                    Interface::parse(ip, non_empty(&row.netmask)).map_err(|e| e.to_string())?;
                switch = switch.with_address(address);
            }
            None if self.require_address => return Err("missing 'ip'".to_string()),
            None => {}
        }

        if let Some(gateway) = non_empty(&row.gateway) {
            switch = switch.with_gateway(parse_gateway(gateway).map_err(|e| e.to_string())?);
        }
        if let Some(vlan) = non_empty(&row.vlan) {
            switch = switch.with_vlan(parse_vlan(vlan).map_err(|e| e.to_string())?);
        }

        Ok(switch)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn load(csv: &str, key: IdentifierKind) -> Baseline {
        BaselineLoader::new(key).load_reader(csv.as_bytes()).unwrap()
    }

    fn mac_id(mac: &str) -> SwitchId {
        SwitchId::parse(mac, IdentifierKind::Mac).unwrap()
    }

    #[test]
    fn test_load_full_rows() {
        let baseline = load(
            "mac_address,name,site_name,ip,netmask,gateway,vlan\n\
             5C:5B:35:00:00:01,hq-sw1,hq,10.0.10.11,255.255.255.0,10.0.10.1,10\n\
             5c5b35000002,hq-sw2,hq,10.0.10.12/24,,10.0.10.1,vlan10\n",
            IdentifierKind::Mac,
        );

        assert_eq!(baseline.records.len(), 2);
        assert_eq!(baseline.skipped, 0);
        assert_eq!(baseline.sites.iter().collect::<Vec<_>>(), vec!["hq"]);

        let sw1 = baseline.records.get(&mac_id("5c5b35000001")).unwrap();
        assert_eq!(sw1.name, "hq-sw1");
        assert_eq!(sw1.address.unwrap().to_string(), "10.0.10.11/24");
        assert_eq!(sw1.vlan, Some(10));
        assert_eq!(sw1.source, Source::Baseline);

        let sw2 = baseline.records.get(&mac_id("5c5b35000002")).unwrap();
        assert_eq!(sw2.address.unwrap().prefix(), Some(24));
    }

    #[test]
    fn test_malformed_rows_skipped() {
        let baseline = load(
            "mac_address,ip\n\
             5c5b35000001,10.0.0.1\n\
             ,10.0.0.2\n\
             5c5b35000003,\n\
             not-a-mac,10.0.0.4\n\
             5c5b35000005,10.0.0.500\n\
             5c5b35000006,10.0.0.6,extra\n\
             5c5b35000007,10.0.0.7\n",
            IdentifierKind::Mac,
        );

        assert_eq!(baseline.records.len(), 2);
        assert_eq!(baseline.skipped, 5);
        assert!(baseline.records.contains(&mac_id("5c5b35000001")));
        assert!(baseline.records.contains(&mac_id("5c5b35000007")));
    }

    #[test]
    fn test_duplicate_identifier_last_row_wins() {
        let baseline = load(
            "mac_address,ip\n\
             5c5b35000001,10.0.0.1\n\
             5C:5B:35:00:00:01,10.0.0.2\n",
            IdentifierKind::Mac,
        );

        assert_eq!(baseline.records.len(), 1);
        assert_eq!(baseline.duplicates, 1);
        let sw = baseline.records.get(&mac_id("5c5b35000001")).unwrap();
        assert_eq!(sw.address.unwrap().to_string(), "10.0.0.2");
    }

    #[test]
    fn test_selection_without_addresses() {
        let baseline = BaselineLoader::new(IdentifierKind::Mac)
            .require_address(false)
            .load_reader("mac_address,site_name\n5c5b35000001,hq\n5c5b35000002,branch\n".as_bytes())
            .unwrap();

        assert_eq!(baseline.records.len(), 2);
        assert_eq!(baseline.sites.len(), 2);
        assert!(baseline.records.iter().all(|r| r.address.is_none()));
    }

    #[test]
    fn test_site_filter() {
        let sited = load(
            "mac_address,site_name,ip\n5c5b35000001,hq,10.0.0.1\n5c5b35000002,branch,10.0.0.2\n",
            IdentifierKind::Mac,
        );
        let sites: Vec<&str> = sited.site_filter().unwrap().iter().map(String::as_str).collect();
        assert_eq!(sites, vec!["branch", "hq"]);

        let partial = load(
            "mac_address,site_name,ip\n5c5b35000001,hq,10.0.0.1\n5c5b35000002,,10.0.0.2\n",
            IdentifierKind::Mac,
        );
        assert!(partial.site_filter().is_none());

        let unsited = load("mac_address,ip\n5c5b35000001,10.0.0.1\n", IdentifierKind::Mac);
        assert!(unsited.site_filter().is_none());
    }

    #[test]
    fn test_name_key_and_aliases() {
        let baseline = load(
            "Hostname,Site,IP_Address,Subnet,VLAN_ID\n\
             IDF1-SW1,hq,10.1.0.2,/23,30\n",
            IdentifierKind::Name,
        );

        let sw = baseline
            .records
            .get(&SwitchId::parse("idf1-sw1", IdentifierKind::Name).unwrap())
            .unwrap();
        assert_eq!(sw.name, "IDF1-SW1");
        assert_eq!(sw.site.as_deref(), Some("hq"));
        assert_eq!(sw.address.unwrap().prefix(), Some(23));
        assert_eq!(sw.vlan, Some(30));
    }

    #[test]
    fn test_missing_identifier_column() {
        let result = BaselineLoader::new(IdentifierKind::Name)
            .load_reader("mac_address,ip\n5c5b35000001,10.0.0.1\n".as_bytes());
        assert!(matches!(result, Err(InputError::Csv(_))));
    }

    #[test]
    fn test_empty_file_with_header() {
        let baseline = load("mac_address,ip\n", IdentifierKind::Mac);
        assert!(baseline.records.is_empty());
    }

    #[test]
    fn test_load_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "mac_address,ip").unwrap();
        writeln!(file, "5c5b35000001,10.0.0.1/24").unwrap();

        let baseline = BaselineLoader::new(IdentifierKind::Mac)
            .load_path(file.path())
            .unwrap();
        assert_eq!(baseline.records.len(), 1);
    }

    #[test]
    fn test_load_missing_path() {
        let result = BaselineLoader::new(IdentifierKind::Mac).load_path("/nonexistent/switches.csv");
        assert!(matches!(result, Err(InputError::NotFound(_))));
    }

    #[test]
    fn test_load_unreadable_path() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let result = BaselineLoader::new(IdentifierKind::Mac)
            .load_path(file.path().join("switches.csv"));
        assert!(
            matches!(result, Err(InputError::Unreadable { .. })),
            "got {:?}",
            result
        );
    }
}
