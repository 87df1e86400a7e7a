//! CSV export of reconciliation results
//!
//! Writes one row per identifier in identifier order. The header is always
//! written, even when there are no results.

use crate::domain::ComparisonResult;
use crate::error::InputError;

use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Row written to the export file
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    identifier: &'a str,
    name: &'a str,
    site: &'a str,
    managed_ip: String,
    baseline_ip: String,
    managed_gateway: String,
    baseline_gateway: String,
    managed_vlan: String,
    baseline_vlan: String,
    status: String,
    details: String,
}

impl<'a> From<&'a ComparisonResult> for ExportRow<'a> {
    fn from(result: &'a ComparisonResult) -> Self {
        let m = result.managed.as_ref();
        let b = result.baseline.as_ref();
        let text = |v: Option<String>| v.unwrap_or_default();

        Self {
            identifier: result.id.as_str(),
            name: result.name(),
            site: result.site().unwrap_or_default(),
            managed_ip: text(m.and_then(|r| r.address).map(|a| a.to_string())),
            baseline_ip: text(b.and_then(|r| r.address).map(|a| a.to_string())),
            managed_gateway: text(m.and_then(|r| r.gateway).map(|g| g.to_string())),
            baseline_gateway: text(b.and_then(|r| r.gateway).map(|g| g.to_string())),
            managed_vlan: text(m.and_then(|r| r.vlan).map(|v| v.to_string())),
            baseline_vlan: text(b.and_then(|r| r.vlan).map(|v| v.to_string())),
            status: result.status.to_string(),
            details: result.details(),
        }
    }
}

const HEADER: [&str; 11] = [
    "identifier",
    "name",
    "site",
    "managed_ip",
    "baseline_ip",
    "managed_gateway",
    "baseline_gateway",
    "managed_vlan",
    "baseline_vlan",
    "status",
    "details",
];

/// Write results to a CSV file, overwriting it
pub fn export_csv<'a, P, I>(path: P, results: I) -> Result<usize, InputError>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = &'a ComparisonResult>,
{
    let path = path.as_ref();
    let file = File::create(path)
        .map_err(|e| InputError::Csv(format!("cannot create {}: {}", path.display(), e)))?;

    let written = write_csv(BufWriter::new(file), results)?;
    log::info!("Exported {} switches to {}", written, path.display());
    Ok(written)
}

/// Write results as CSV to any writer
pub fn write_csv<'a, W, I>(writer: W, results: I) -> Result<usize, InputError>
where
    W: Write,
    I: IntoIterator<Item = &'a ComparisonResult>,
{
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    csv.write_record(HEADER)?;

    let mut written = 0;
    for result in results {
        csv.serialize(ExportRow::from(result))?;
        written += 1;
    }

    csv.flush()
        .map_err(|e| InputError::Csv(format!("CSV flush error: {}", e)))?;
    Ok(written)
}
