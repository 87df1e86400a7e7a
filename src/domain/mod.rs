//! Domain models for switch-ip-check
//!
//! This module contains all domain types with validation.
//! Types are validated on construction (fail-fast pattern).

pub mod address;
pub mod comparison;
pub mod switch;

pub use address::{parse_gateway, parse_prefix, parse_vlan, Interface};
pub use comparison::{Advisory, ComparisonResult, ComparisonStatus, Field, Summary};
pub use switch::{
    format_mac, normalize_mac, IdentifierKind, RecordSet, Source, SwitchId, SwitchRecord,
};
