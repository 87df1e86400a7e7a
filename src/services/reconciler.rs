//! Reconciliation of managed and baseline switch records
//!
//! [`reconcile`] is a pure function: it never logs, never touches the
//! network, and returns the same result for the same inputs.

use crate::domain::{
    Advisory, ComparisonResult, ComparisonStatus, Field, RecordSet, SwitchId, SwitchRecord,
};

use std::collections::{BTreeMap, BTreeSet};

/// Compare two record sets by identifier
///
/// The result holds exactly one entry for every identifier present in either
/// input, ordered by identifier.
pub fn reconcile(
    managed: &RecordSet,
    baseline: &RecordSet,
) -> BTreeMap<SwitchId, ComparisonResult> {
    let ids: BTreeSet<&SwitchId> = managed.ids().chain(baseline.ids()).collect();

    ids.into_iter()
        .map(|id| {
            let m = managed.get(id);
            let b = baseline.get(id);

            let (status, differences) = match (m, b) {
                (Some(m), Some(b)) => {
                    let differences = compare_records(m, b);
                    let status = if differences.is_empty() {
                        ComparisonStatus::Match
                    } else {
                        ComparisonStatus::Mismatch
                    };
                    (status, differences)
                }
                (Some(_), None) => (ComparisonStatus::ManagedOnly, Vec::new()),
                // The id came from one of the two sets
                (None, _) => (ComparisonStatus::BaselineOnly, Vec::new()),
            };

            let result = ComparisonResult {
                id: id.clone(),
                managed: m.cloned(),
                baseline: b.cloned(),
                status,
                differences,
                advisories: m.map(advisories).unwrap_or_default(),
            };
            (id.clone(), result)
        })
        .collect()
}

/// Fields whose values differ between two records of the same switch
///
/// Address presence always counts. Prefix, gateway and VLAN are only compared
/// when both sides carry a value.
pub fn compare_records(managed: &SwitchRecord, baseline: &SwitchRecord) -> Vec<Field> {
    let mut differences = Vec::new();

    match (managed.address, baseline.address) {
        (Some(m), Some(b)) => {
            if m.ip() != b.ip() {
                differences.push(Field::Address);
            }
            if let (Some(mp), Some(bp)) = (m.prefix(), b.prefix()) {
                if mp != bp {
                    differences.push(Field::Prefix);
                }
            }
        }
        (None, None) => {}
        _ => differences.push(Field::Address),
    }

    if let (Some(m), Some(b)) = (managed.gateway, baseline.gateway) {
        if m != b {
            differences.push(Field::Gateway);
        }
    }

    if let (Some(m), Some(b)) = (managed.vlan, baseline.vlan) {
        if m != b {
            differences.push(Field::Vlan);
        }
    }

    differences
}

/// Problems in a managed configuration that hold regardless of the baseline
pub fn advisories(managed: &SwitchRecord) -> Vec<Advisory> {
    let mut found = Vec::new();

    if managed.dynamic {
        found.push(Advisory::DynamicAddress);
    } else if let (Some(network), Some(gateway)) =
        (managed.address.and_then(|a| a.network()), managed.gateway)
    {
        if !network.contains(gateway) {
            found.push(Advisory::GatewayOutsideSubnet);
        }
    }

    if managed.vlan.is_none() {
        found.push(Advisory::UnresolvedVlan);
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{IdentifierKind, Interface, Source};
    use std::net::Ipv4Addr;

    fn id(name: &str) -> SwitchId {
        SwitchId::parse(name, IdentifierKind::Name).unwrap()
    }

    fn record(name: &str, address: &str, source: Source) -> SwitchRecord {
        SwitchRecord::new(id(name), name, source)
            .with_address(address.parse::<Interface>().unwrap())
            .with_vlan(10)
    }

    fn managed(entries: &[(&str, &str)]) -> RecordSet {
        entries
            .iter()
            .map(|(n, a)| record(n, a, Source::Managed))
            .collect()
    }

    fn baseline(entries: &[(&str, &str)]) -> RecordSet {
        entries
            .iter()
            .map(|(n, a)| record(n, a, Source::Baseline))
            .collect()
    }

    fn statuses(results: &BTreeMap<SwitchId, ComparisonResult>) -> Vec<(String, ComparisonStatus)> {
        results
            .values()
            .map(|r| (r.id.to_string(), r.status))
            .collect()
    }

    #[test]
    fn test_address_mismatch() {
        let results = reconcile(
            &managed(&[("sw1", "10.0.0.1/24")]),
            &baseline(&[("sw1", "10.0.0.2/24")]),
        );

        assert_eq!(
            statuses(&results),
            vec![("sw1".to_string(), ComparisonStatus::Mismatch)]
        );
        assert_eq!(results[&id("sw1")].differences, vec![Field::Address]);
    }

    #[test]
    fn test_managed_only() {
        let results = reconcile(&managed(&[("sw1", "10.0.0.1/24")]), &RecordSet::new());
        assert_eq!(
            statuses(&results),
            vec![("sw1".to_string(), ComparisonStatus::ManagedOnly)]
        );
        assert!(results[&id("sw1")].baseline.is_none());
    }

    #[test]
    fn test_baseline_only() {
        let results = reconcile(&RecordSet::new(), &baseline(&[("sw2", "10.0.0.5/24")]));
        assert_eq!(
            statuses(&results),
            vec![("sw2".to_string(), ComparisonStatus::BaselineOnly)]
        );
        assert!(results[&id("sw2")].advisories.is_empty());
    }

    #[test]
    fn test_identical_records_match() {
        let entries = [("sw1", "10.0.0.1/24"), ("sw2", "10.0.0.2/24")];
        let results = reconcile(&managed(&entries), &baseline(&entries));

        assert!(results
            .values()
            .all(|r| r.status == ComparisonStatus::Match && r.differences.is_empty()));
    }

    #[test]
    fn test_disjoint_sets_are_one_sided() {
        let m = managed(&[("a1", "10.0.0.1/24"), ("a2", "10.0.0.2/24")]);
        let b = baseline(&[("b1", "10.0.1.1/24"), ("b2", "10.0.1.2/24"), ("b3", "10.0.1.3/24")]);
        let results = reconcile(&m, &b);

        assert_eq!(results.len(), 5);
        for r in results.values() {
            let expected = if m.contains(&r.id) {
                ComparisonStatus::ManagedOnly
            } else {
                ComparisonStatus::BaselineOnly
            };
            assert_eq!(r.status, expected, "{}", r.id);
        }
    }

    #[test]
    fn test_union_covers_every_identifier_once() {
        let m = managed(&[("sw1", "10.0.0.1/24"), ("sw2", "10.0.0.2/24")]);
        let b = baseline(&[("sw2", "10.0.0.2/24"), ("sw3", "10.0.0.3/24")]);
        let results = reconcile(&m, &b);

        let ids: Vec<&str> = results.keys().map(SwitchId::as_str).collect();
        assert_eq!(ids, vec!["sw1", "sw2", "sw3"]);
    }

    #[test]
    fn test_idempotent() {
        let m = managed(&[("sw1", "10.0.0.1/24"), ("sw2", "10.0.0.2/24")]);
        let b = baseline(&[("sw2", "10.0.0.9/24"), ("sw3", "10.0.0.3/24")]);

        assert_eq!(reconcile(&m, &b), reconcile(&m, &b));
    }

    #[test]
    fn test_empty_inputs() {
        assert!(reconcile(&RecordSet::new(), &RecordSet::new()).is_empty());
    }

    #[test]
    fn test_netmask_notation_is_normalized() {
        let m = SwitchRecord::new(id("sw1"), "sw1", Source::Managed)
            .with_address(Interface::parse("10.0.0.1", Some("255.255.255.0")).unwrap());
        let b = SwitchRecord::new(id("sw1"), "SW1", Source::Baseline)
            .with_address(Interface::parse("10.0.0.1/24", None).unwrap());

        assert!(compare_records(&m, &b).is_empty());
    }

    #[test]
    fn test_prefix_skipped_when_one_side_unknown() {
        let m = record("sw1", "10.0.0.1/24", Source::Managed);
        let b = record("sw1", "10.0.0.1", Source::Baseline);
        assert!(compare_records(&m, &b).is_empty());

        let b = record("sw1", "10.0.0.1/25", Source::Baseline);
        assert_eq!(compare_records(&m, &b), vec![Field::Prefix]);
    }

    #[test]
    fn test_missing_address_is_a_difference() {
        let m = record("sw1", "10.0.0.1/24", Source::Managed);
        let b = SwitchRecord::new(id("sw1"), "sw1", Source::Baseline);
        assert_eq!(compare_records(&m, &b), vec![Field::Address]);
    }

    #[test]
    fn test_gateway_and_vlan_differences() {
        let m = record("sw1", "10.0.0.1/24", Source::Managed)
            .with_gateway(Ipv4Addr::new(10, 0, 0, 254));
        let b = record("sw1", "10.0.0.1/24", Source::Baseline)
            .with_gateway(Ipv4Addr::new(10, 0, 0, 1))
            .with_vlan(20);

        assert_eq!(compare_records(&m, &b), vec![Field::Gateway, Field::Vlan]);
    }

    #[test]
    fn test_advisories() {
        let off_subnet = record("sw1", "10.0.0.1/24", Source::Managed)
            .with_gateway(Ipv4Addr::new(10, 0, 1, 1));
        assert_eq!(advisories(&off_subnet), vec![Advisory::GatewayOutsideSubnet]);

        let dhcp = SwitchRecord::new(id("sw2"), "sw2", Source::Managed).with_dynamic(true);
        assert_eq!(
            advisories(&dhcp),
            vec![Advisory::DynamicAddress, Advisory::UnresolvedVlan]
        );

        let healthy = record("sw3", "10.0.0.3/24", Source::Managed)
            .with_gateway(Ipv4Addr::new(10, 0, 0, 1));
        assert!(advisories(&healthy).is_empty());
    }

    #[test]
    fn test_advisories_do_not_change_status() {
        let m: RecordSet = [record("sw1", "10.0.0.1/24", Source::Managed)
            .with_gateway(Ipv4Addr::new(192, 168, 0, 1))]
        .into_iter()
        .collect();
        let b: RecordSet = [record("sw1", "10.0.0.1/24", Source::Baseline)
            .with_gateway(Ipv4Addr::new(192, 168, 0, 1))]
        .into_iter()
        .collect();

        let result = &reconcile(&m, &b)[&id("sw1")];
        assert_eq!(result.status, ComparisonStatus::Match);
        assert_eq!(result.advisories, vec![Advisory::GatewayOutsideSubnet]);
    }
}
