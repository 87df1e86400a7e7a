//! Trait definitions for Mist API access
//!
//! These traits abstract over the HTTP client to enable testing with mocks.

use crate::error::ApiError;
use crate::mist::models::{NetworkTemplate, Site, SwitchStats};

/// Read-only view of one Mist organization
///
/// Implemented by [`MistClient`](crate::mist::MistClient) for the real cloud
/// and by a mock in tests.
pub trait MistApi: Send + Sync {
    /// Organization this API is scoped to
    fn org_id(&self) -> &str;

    /// Get all sites in the organization
    fn sites(&self) -> Result<Vec<Site>, ApiError>;

    /// Get all switch network templates in the organization
    fn network_templates(&self) -> Result<Vec<NetworkTemplate>, ApiError>;

    /// Get stats and active IP configuration of every switch at a site
    fn switch_stats(&self, site_id: &str) -> Result<Vec<SwitchStats>, ApiError>;
}
