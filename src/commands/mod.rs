//! Command handlers
//!
//! Each command handler orchestrates the execution of a CLI command. The
//! `*_with` variants take any [`MistApi`] so they can run against a mock.

pub mod check;
pub mod list;
pub mod reconcile;

pub use check::{check_with, run_check, CheckSelection};
pub use list::{list_with, run_list};
pub use reconcile::{reconcile_with, run_reconcile};

use crate::cli::args::OutputFormat;
use crate::cli::output::{print_output, ReconcileReport};
use crate::config::Config;
use crate::error::Result;
use crate::mist::{MistApi, MistClient};
use crate::services::export_csv;

/// Create a Mist client from the merged configuration
pub fn connect(config: &Config) -> Result<MistClient> {
    let org_id = config.mist.require_org_id()?;
    let token = config.mist.require_token()?;

    let client = MistClient::new(&config.mist.host, org_id, token, config.mist.timeout())?;
    log::debug!("Using Mist API at {}", client.base_url());
    Ok(client)
}

/// Export and print a finished report
fn emit_report(report: &ReconcileReport, config: &Config, format: OutputFormat) -> Result<()> {
    if config.output.export {
        export_csv(&config.output.path, &report.results)?;
    }

    if !config.output.hide_table {
        print_output(report, format)?;
    }

    let summary = &report.summary;
    if summary.all_matched() {
        log::info!("All {} switches match", summary.total);
    } else {
        log::warn!(
            "{} of {} switches do not match",
            summary.total - summary.matched,
            summary.total
        );
    }
    Ok(())
}

fn org_label<A: MistApi>(api: &A) -> String {
    format!("org {}", api.org_id())
}
