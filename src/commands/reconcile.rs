//! Reconcile command implementation
//!
//! Compares the addressing Mist is configured to push against a CSV of the
//! addressing switches use today.

use crate::cli::args::OutputFormat;
use crate::cli::output::ReconcileReport;
use crate::commands::{connect, emit_report, org_label};
use crate::config::Config;
use crate::error::Result;
use crate::mist::MistApi;
use crate::services::{reconcile, BaselineLoader, InventoryService};

/// Execute the reconcile command
pub fn run_reconcile(config: &Config, format: OutputFormat) -> Result<()> {
    let client = connect(config)?;
    let report = reconcile_with(&client, config)?;
    emit_report(&report, config, format)
}

/// Reconcile the organization behind `api` against the configured CSV
pub fn reconcile_with<A: MistApi>(api: &A, config: &Config) -> Result<ReconcileReport> {
    let key = config.input.key;
    let baseline = BaselineLoader::new(key).load_path(&config.input.path)?;

    log::info!(
        "Checking {} against {}",
        org_label(api),
        config.input.path.display()
    );
    let inventory = InventoryService::new(api, key).load(baseline.site_filter())?;

    let results = reconcile(&inventory.managed(), &baseline.records);
    Ok(ReconcileReport::new("CSV", results.into_values().collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ComparisonStatus, IdentifierKind};
    use crate::error::{AppError, InputError};
    use crate::mock::fixture_org;
    use std::io::Write;

    fn config_for(csv: &str, key: IdentifierKind) -> (tempfile::NamedTempFile, Config) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", csv).unwrap();
        let mut config = Config::default();
        config.input.path = file.path().to_path_buf();
        config.input.key = key;
        (file, config)
    }

    fn statuses(report: &ReconcileReport) -> Vec<(String, ComparisonStatus)> {
        report
            .results
            .iter()
            .map(|r| (r.name().to_string(), r.status))
            .collect()
    }

    #[test]
    fn test_reconcile_against_csv() {
        let (_file, config) = config_for(
            "mac_address,site_name,ip,netmask,vlan\n\
             5c5b35000001,hq,10.0.10.11,255.255.255.0,10\n\
             5c5b35000002,hq,10.0.10.50,255.255.255.0,10\n\
             5c5b35000009,hq,10.0.10.90,255.255.255.0,10\n",
            IdentifierKind::Mac,
        );

        let report = reconcile_with(&fixture_org(), &config).unwrap();
        assert_eq!(
            statuses(&report),
            vec![
                ("hq-sw1".to_string(), ComparisonStatus::Match),
                ("hq-sw2".to_string(), ComparisonStatus::Mismatch),
                ("5C:5B:35:00:00:09".to_string(), ComparisonStatus::BaselineOnly),
            ]
        );
        assert_eq!(report.summary.total, 3);
    }

    #[test]
    fn test_sites_from_csv_limit_inventory() {
        let (_file, config) = config_for(
            "mac_address,site_name,ip\n5c5b35000003,branch,192.168.1.2/24\n",
            IdentifierKind::Mac,
        );
        let api = fixture_org();

        let report = reconcile_with(&api, &config).unwrap();
        assert_eq!(api.stats_calls(), vec!["site-branch"]);
        assert_eq!(report.summary.matched, 1);
        assert_eq!(report.results[0].name(), "5C:5B:35:00:00:03");
    }

    #[test]
    fn test_without_sites_loads_whole_org() {
        let (_file, config) = config_for("name,ip\nhq-sw1,10.0.10.11\n", IdentifierKind::Name);

        let report = reconcile_with(&fixture_org(), &config).unwrap();
        assert_eq!(report.summary.matched, 1);
        assert_eq!(report.summary.managed_only, 2);
    }

    #[test]
    fn test_partial_sites_load_whole_org() {
        let (_file, config) = config_for(
            "mac_address,site_name,ip\n\
             5c5b35000001,hq,10.0.10.11/24\n\
             5c5b35000003,,192.168.1.2/24\n",
            IdentifierKind::Mac,
        );
        let api = fixture_org();

        let report = reconcile_with(&api, &config).unwrap();
        assert_eq!(api.stats_calls(), vec!["site-hq", "site-branch"]);
        assert!(report
            .results
            .iter()
            .all(|r| r.status != ComparisonStatus::BaselineOnly));
        let branch = report
            .results
            .iter()
            .find(|r| r.name() == "5C:5B:35:00:00:03")
            .unwrap();
        assert_eq!(branch.status, ComparisonStatus::Match);
    }

    #[test]
    fn test_missing_csv_is_fatal() {
        let mut config = Config::default();
        config.input.path = "/nonexistent/switches.csv".into();

        let result = reconcile_with(&fixture_org(), &config);
        assert!(matches!(result, Err(AppError::Input(InputError::NotFound(_)))));
    }

    #[test]
    fn test_api_failure_is_fatal() {
        let (_file, config) = config_for("mac_address,ip\n5c5b35000001,10.0.10.11\n", IdentifierKind::Mac);

        let result = reconcile_with(&fixture_org().unauthorized(), &config);
        assert!(matches!(result, Err(AppError::Api(_))));
    }
}
