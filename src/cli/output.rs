//! Output formatting utilities
//!
//! Provides table, JSON and compact output for CLI commands.

use crate::cli::args::OutputFormat;
use crate::domain::{ComparisonResult, Summary, SwitchRecord};
use serde::Serialize;
use std::io::{self, Write};

/// Format and print output based on the selected format
pub fn print_output<T: Serialize + TableDisplay>(data: &T, format: OutputFormat) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_output(&mut handle, data, format)
}

/// Format output into any writer
pub fn write_output<W, T>(writer: &mut W, data: &T, format: OutputFormat) -> io::Result<()>
where
    W: Write,
    T: Serialize + TableDisplay,
{
    match format {
        OutputFormat::Table => {
            writeln!(writer, "{}", data.to_table())?;
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(data)?;
            writeln!(writer, "{}", json)?;
        }
        OutputFormat::Compact => {
            writeln!(writer, "{}", data.to_compact())?;
        }
    }

    Ok(())
}

/// Trait for types that can be displayed as a table
pub trait TableDisplay {
    /// Format as a table string
    fn to_table(&self) -> String;

    /// Format as a compact single line
    fn to_compact(&self) -> String {
        self.to_table().replace('\n', " | ")
    }
}

fn or_dash(value: Option<String>) -> String {
    value.unwrap_or_else(|| "-".to_string())
}

fn address_cell(record: Option<&SwitchRecord>) -> String {
    match record {
        None => "-".to_string(),
        Some(r) => match r.address {
            Some(address) => address.to_string(),
            None if r.dynamic => "dhcp".to_string(),
            None => "-".to_string(),
        },
    }
}

fn vlan_cell(result: &ComparisonResult) -> String {
    let m = result.managed.as_ref().and_then(|r| r.vlan);
    let b = result.baseline.as_ref().and_then(|r| r.vlan);
    match (m, b) {
        (Some(m), Some(b)) if m != b => format!("{} / {}", m, b),
        (Some(v), _) | (None, Some(v)) => v.to_string(),
        (None, None) => "-".to_string(),
    }
}

/// Results of a reconcile or check run
#[derive(Debug, Clone, Serialize)]
pub struct ReconcileReport {
    /// What the managed configuration was compared against
    pub baseline: String,
    pub summary: Summary,
    pub results: Vec<ComparisonResult>,
}

impl ReconcileReport {
    /// Build a report, counting statuses
    pub fn new(baseline: impl Into<String>, results: Vec<ComparisonResult>) -> Self {
        Self {
            baseline: baseline.into(),
            summary: Summary::from_results(&results),
            results,
        }
    }
}

impl TableDisplay for ReconcileReport {
    fn to_table(&self) -> String {
        let mut output = format!(
            "{:<24} {:<18} {:<14} {:<18} {:<18} {:<8} {:<14} {}\n",
            "Name", "Identifier", "Site", "Managed", "Baseline", "VLAN", "Result", "Additional Info"
        );

        for r in &self.results {
            output.push_str(&format!(
                "{:<24.23} {:<18} {:<14.13} {:<18} {:<18} {:<8} {:<14} {}\n",
                r.name(),
                r.id.as_str(),
                r.site().unwrap_or("-"),
                address_cell(r.managed.as_ref()),
                address_cell(r.baseline.as_ref()),
                vlan_cell(r),
                r.status.to_string(),
                r.details()
            ));
        }

        let s = &self.summary;
        output.push_str(&format!(
            "\n{} switches compared against {}: {} match, {} mismatch, {} Mist only, {} {} only",
            s.total, self.baseline, s.matched, s.mismatched, s.managed_only, s.baseline_only, self.baseline
        ));

        output
    }

    fn to_compact(&self) -> String {
        self.results
            .iter()
            .map(|r| format!("{}:{}", r.name(), r.status))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Managed switch entry for display
#[derive(Debug, Clone, Serialize)]
pub struct SwitchListEntry {
    pub name: String,
    pub mac: Option<String>,
    pub site: Option<String>,
    pub address: Option<String>,
    pub gateway: Option<String>,
    pub network: Option<String>,
    pub vlan: Option<u16>,
    pub dynamic: bool,
}

impl From<&SwitchRecord> for SwitchListEntry {
    fn from(record: &SwitchRecord) -> Self {
        Self {
            name: record.name.clone(),
            mac: record.mac_display(),
            site: record.site.clone(),
            address: record.address.map(|a| a.to_string()),
            gateway: record.gateway.map(|g| g.to_string()),
            network: record.network.clone(),
            vlan: record.vlan,
            dynamic: record.dynamic,
        }
    }
}

impl TableDisplay for SwitchListEntry {
    fn to_table(&self) -> String {
        let address = if self.dynamic {
            "dhcp".to_string()
        } else {
            or_dash(self.address.clone())
        };
        format!(
            "{:<24.23} {:<18} {:<14.13} {:<18} {:<16} {:<12.11} {}",
            self.name,
            or_dash(self.mac.clone()),
            or_dash(self.site.clone()),
            address,
            or_dash(self.gateway.clone()),
            or_dash(self.network.clone()),
            or_dash(self.vlan.map(|v| v.to_string()))
        )
    }

    fn to_compact(&self) -> String {
        format!("{}:{}", self.name, or_dash(self.address.clone()))
    }
}

/// Managed switch list for display
#[derive(Debug, Clone, Serialize)]
pub struct SwitchList {
    pub org_id: String,
    pub sites: usize,
    pub switches: Vec<SwitchListEntry>,
}

impl TableDisplay for SwitchList {
    fn to_table(&self) -> String {
        let mut output = format!("Organization: {}\n", self.org_id);
        output.push_str(&format!(
            "Switches Found: {} ({} sites)\n\n",
            self.switches.len(),
            self.sites
        ));
        output.push_str(&format!(
            "{:<24} {:<18} {:<14} {:<18} {:<16} {:<12} {}\n",
            "Name", "MAC", "Site", "Address", "Gateway", "Network", "VLAN"
        ));

        for switch in &self.switches {
            output.push_str(&switch.to_table());
            output.push('\n');
        }

        output
    }

    fn to_compact(&self) -> String {
        self.switches
            .iter()
            .map(|s| s.to_compact())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
