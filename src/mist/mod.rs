//! Mist API abstraction layer
//!
//! Provides trait-based abstractions over the Mist REST API for testability.

pub mod client;
pub mod models;
pub mod traits;

pub use client::MistClient;
pub use models::{IpConfig, IpStat, NetworkTemplate, Site, SwitchStats, TemplateNetwork};
pub use traits::MistApi;
