//! Service layer for switch address checks
//!
//! Services load switch records from Mist and from baseline files, reconcile
//! them, and export the results.

pub mod baseline;
pub mod export;
pub mod inventory;
pub mod reconciler;

pub use baseline::{Baseline, BaselineLoader};
pub use export::{export_csv, write_csv};
pub use inventory::{Inventory, InventoryService, ManagedSwitch};
pub use reconciler::{advisories, compare_records, reconcile};
