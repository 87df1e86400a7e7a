//! Check command implementation
//!
//! Compares the addressing Mist is configured to push against the addressing
//! each switch reports. A CSV, when given, only selects which switches and
//! sites are checked.

use crate::cli::args::{CheckArgs, OutputFormat};
use crate::cli::output::ReconcileReport;
use crate::commands::{connect, emit_report, org_label};
use crate::config::Config;
use crate::error::{InputError, Result};
use crate::mist::MistApi;
use crate::services::{reconcile, Baseline, BaselineLoader, InventoryService};

use std::collections::BTreeSet;
use std::path::PathBuf;

/// Which switches the check command covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckSelection {
    /// Every switch in the organization
    All,
    /// Switches listed in a CSV
    Csv {
        path: PathBuf,
        /// Path was given on the command line, so it must exist
        explicit: bool,
    },
}

impl CheckSelection {
    /// Selection from command arguments and the merged configuration
    pub fn from_args(args: &CheckArgs, config: &Config) -> Self {
        if args.all {
            Self::All
        } else {
            Self::Csv {
                path: config.input.path.clone(),
                explicit: args.input.is_some(),
            }
        }
    }
}

/// Execute the check command
pub fn run_check(args: &CheckArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let selection = CheckSelection::from_args(args, config);
    let client = connect(config)?;
    let report = check_with(&client, config, &selection)?;
    emit_report(&report, config, format)
}

/// Check the organization behind `api` against the switches' reported state
pub fn check_with<A: MistApi>(
    api: &A,
    config: &Config,
    selection: &CheckSelection,
) -> Result<ReconcileReport> {
    let key = config.input.key;
    let selected = load_selection(config, selection)?;

    log::info!("Checking {} against reported switch state", org_label(api));
    let service = InventoryService::new(api, key);
    let mut inventory = match &selected {
        Some(baseline) => service.load(baseline.site_filter())?,
        None => service.load(None)?,
    };

    if let Some(baseline) = &selected {
        let ids: BTreeSet<_> = baseline.records.ids().cloned().collect();
        for id in &ids {
            if !inventory.switches.iter().any(|s| &s.configured.id == id) {
                log::warn!("Switch '{}' from CSV not found in Mist", id);
            }
        }
        inventory.retain_ids(&ids);
    }

    let results = reconcile(&inventory.managed(), &inventory.live());
    Ok(ReconcileReport::new("reported", results.into_values().collect()))
}

fn load_selection(config: &Config, selection: &CheckSelection) -> Result<Option<Baseline>> {
    let CheckSelection::Csv { path, explicit } = selection else {
        return Ok(None);
    };

    let loader = BaselineLoader::new(config.input.key).require_address(false);
    match loader.load_path(path) {
        Ok(baseline) if baseline.records.is_empty() => {
            log::warn!("{} selects no switches, checking all", path.display());
            Ok(None)
        }
        Ok(baseline) => Ok(Some(baseline)),
        Err(InputError::NotFound(_)) if !explicit => {
            log::warn!("{} not found, checking all switches", path.display());
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ComparisonStatus, Field};
    use crate::error::AppError;
    use crate::mock::fixture_org;
    use std::io::Write;

    fn csv_selection(csv: &str) -> (tempfile::NamedTempFile, Config, CheckSelection) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", csv).unwrap();
        let mut config = Config::default();
        config.input.path = file.path().to_path_buf();
        let selection = CheckSelection::Csv {
            path: file.path().to_path_buf(),
            explicit: true,
        };
        (file, config, selection)
    }

    #[test]
    fn test_check_all() {
        let report = check_with(&fixture_org(), &Config::default(), &CheckSelection::All).unwrap();

        assert_eq!(report.summary.total, 3);
        assert_eq!(report.summary.matched, 2);
        assert_eq!(report.summary.mismatched, 1);

        let sw2 = report
            .results
            .iter()
            .find(|r| r.name() == "hq-sw2")
            .unwrap();
        assert_eq!(sw2.status, ComparisonStatus::Mismatch);
        assert_eq!(sw2.differences, vec![Field::Address]);
    }

    #[test]
    fn test_check_csv_selection() {
        let (_file, config, selection) =
            csv_selection("mac_address,site_name\n5c5b35000002,hq\n5c5b350000ff,hq\n");
        let api = fixture_org();

        let report = check_with(&api, &config, &selection).unwrap();
        assert_eq!(api.stats_calls(), vec!["site-hq"]);
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].name(), "hq-sw2");
    }

    #[test]
    fn test_missing_default_csv_checks_all() {
        let config = Config::default();
        let selection = CheckSelection::Csv {
            path: "/nonexistent/switches.csv".into(),
            explicit: false,
        };

        let report = check_with(&fixture_org(), &config, &selection).unwrap();
        assert_eq!(report.summary.total, 3);
    }

    #[test]
    fn test_unreadable_default_csv_is_fatal() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let selection = CheckSelection::Csv {
            path: file.path().join("switches.csv"),
            explicit: false,
        };

        let result = check_with(&fixture_org(), &Config::default(), &selection);
        assert!(
            matches!(result, Err(AppError::Input(InputError::Unreadable { .. }))),
            "got {:?}",
            result.map(|r| r.summary.total)
        );
    }

    #[test]
    fn test_missing_explicit_csv_is_fatal() {
        let selection = CheckSelection::Csv {
            path: "/nonexistent/switches.csv".into(),
            explicit: true,
        };

        let result = check_with(&fixture_org(), &Config::default(), &selection);
        assert!(matches!(result, Err(AppError::Input(InputError::NotFound(_)))));
    }

    #[test]
    fn test_selection_from_args() {
        let mut args = CheckArgs {
            input: None,
            all: true,
            export: Default::default(),
        };
        let config = Config::default();
        assert_eq!(CheckSelection::from_args(&args, &config), CheckSelection::All);

        args.all = false;
        assert_eq!(
            CheckSelection::from_args(&args, &config),
            CheckSelection::Csv {
                path: "./switches.csv".into(),
                explicit: false
            }
        );
    }
}
