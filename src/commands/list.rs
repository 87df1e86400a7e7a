//! List command implementation
//!
//! Lists every switch Mist manages with its configured management address.

use crate::cli::args::OutputFormat;
use crate::cli::output::{print_output, SwitchList, SwitchListEntry};
use crate::commands::connect;
use crate::config::Config;
use crate::error::Result;
use crate::mist::MistApi;
use crate::services::InventoryService;

/// Execute the list command
pub fn run_list(config: &Config, format: OutputFormat) -> Result<()> {
    let client = connect(config)?;
    let list = list_with(&client, config)?;

    print_output(&list, format)?;

    Ok(())
}

/// Collect the managed inventory of the organization behind `api`
pub fn list_with<A: MistApi>(api: &A, config: &Config) -> Result<SwitchList> {
    let inventory = InventoryService::new(api, config.input.key).load(None)?;

    let switches = inventory
        .managed()
        .iter()
        .map(SwitchListEntry::from)
        .collect();

    Ok(SwitchList {
        org_id: api.org_id().to_string(),
        sites: inventory.sites.len(),
        switches,
    })
}
