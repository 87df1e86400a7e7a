//! Reconciliation result types
//!
//! Provides the per-switch [`ComparisonResult`] and the run [`Summary`].

use crate::domain::switch::{SwitchId, SwitchRecord};

use serde::Serialize;
use std::fmt;

/// Classification of one identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComparisonStatus {
    /// Present on both sides with equal addressing
    Match,
    /// Present on both sides, addressing differs
    Mismatch,
    /// Only the managed side knows this switch
    ManagedOnly,
    /// Only the baseline knows this switch
    BaselineOnly,
}

impl fmt::Display for ComparisonStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Match => write!(f, "MATCH"),
            Self::Mismatch => write!(f, "MISMATCH"),
            Self::ManagedOnly => write!(f, "MANAGED_ONLY"),
            Self::BaselineOnly => write!(f, "BASELINE_ONLY"),
        }
    }
}

/// An addressing field that differs between the two sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Address,
    Prefix,
    Gateway,
    Vlan,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address => write!(f, "IP"),
            Self::Prefix => write!(f, "Netmask"),
            Self::Gateway => write!(f, "Gateway"),
            Self::Vlan => write!(f, "VLAN"),
        }
    }
}

/// Observation about the managed configuration that does not affect status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Advisory {
    /// Static gateway is not inside the configured subnet
    GatewayOutsideSubnet,
    /// Management address comes from DHCP
    DynamicAddress,
    /// Management network could not be mapped to a VLAN
    UnresolvedVlan,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GatewayOutsideSubnet => write!(f, "Gateway outside management subnet"),
            Self::DynamicAddress => write!(f, "Management address is dynamic"),
            Self::UnresolvedVlan => write!(f, "Management network VLAN unresolved"),
        }
    }
}

/// Comparison of one identifier across both sources
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonResult {
    pub id: SwitchId,
    pub managed: Option<SwitchRecord>,
    pub baseline: Option<SwitchRecord>,
    pub status: ComparisonStatus,
    pub differences: Vec<Field>,
    pub advisories: Vec<Advisory>,
}

impl ComparisonResult {
    /// Display name, preferring the managed side
    pub fn name(&self) -> &str {
        self.managed
            .as_ref()
            .or(self.baseline.as_ref())
            .map(|r| r.name.as_str())
            .unwrap_or_else(|| self.id.as_str())
    }

    /// Site name, preferring the managed side
    pub fn site(&self) -> Option<&str> {
        self.managed
            .as_ref()
            .and_then(|r| r.site.as_deref())
            .or_else(|| self.baseline.as_ref().and_then(|r| r.site.as_deref()))
    }

    /// Human-readable explanation of the status
    pub fn details(&self) -> String {
        let mut parts = Vec::new();

        match self.status {
            ComparisonStatus::Match => {}
            ComparisonStatus::Mismatch => {
                let fields: Vec<String> = self.differences.iter().map(|f| f.to_string()).collect();
                parts.push(format!("Management interface {} mis-match", fields.join("/")));
            }
            ComparisonStatus::ManagedOnly => parts.push("Not present in baseline".to_string()),
            ComparisonStatus::BaselineOnly => parts.push("Not present in Mist".to_string()),
        }

        if self.differences.contains(&Field::Vlan) {
            if let (Some(m), Some(b)) = (
                self.managed.as_ref().and_then(|r| r.vlan),
                self.baseline.as_ref().and_then(|r| r.vlan),
            ) {
                parts.push(format!("configured as VLAN {} but baseline uses VLAN {}", m, b));
            }
        }

        parts.extend(self.advisories.iter().map(|a| a.to_string()));

        if parts.is_empty() {
            "None".to_string()
        } else {
            parts.join("; ")
        }
    }
}

/// Per-status counts for a reconciliation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub matched: usize,
    pub mismatched: usize,
    pub managed_only: usize,
    pub baseline_only: usize,
}

impl Summary {
    /// Count statuses across a set of results
    pub fn from_results<'a, I>(results: I) -> Self
    where
        I: IntoIterator<Item = &'a ComparisonResult>,
    {
        let mut summary = Self::default();
        for result in results {
            summary.total += 1;
            match result.status {
                ComparisonStatus::Match => summary.matched += 1,
                ComparisonStatus::Mismatch => summary.mismatched += 1,
                ComparisonStatus::ManagedOnly => summary.managed_only += 1,
                ComparisonStatus::BaselineOnly => summary.baseline_only += 1,
            }
        }
        summary
    }

    /// Check whether every identifier matched
    pub fn all_matched(&self) -> bool {
        self.matched == self.total
    }
}
