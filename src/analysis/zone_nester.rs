use itertools::Itertools;

use crate::config::DEBUG_FLAGS;
use crate::models::{NestedZones, Zone};

/// Keeps the `children` that fit inside at least one of `parents`.
///
/// Parents are searched in order and the first container found is enough.
/// Exact duplicates (same anchor, top, bottom and touch count) are dropped, first occurrence wins.
pub fn nest_within(children: &[Zone], parents: &[Zone]) -> Vec<Zone> {
    children
        .iter()
        .filter(|child| {
            let contained = parents.iter().any(|parent| child.is_within(parent));
            if !contained && DEBUG_FLAGS.print_unnested_zones {
                log::info!(
                    "Zone {:.6}..{:.6} has no containing parent zone",
                    child.bottom,
                    child.top
                );
            }
            contained
        })
        .copied()
        .unique_by(Zone::dedup_key)
        .collect()
}

/// Builds the High -> Intermediate -> Low chain.
///
/// High zones are taken as-is. Intermediate zones must sit inside a High zone, and Low
/// zones inside an *accepted* Intermediate zone. A Low zone that only fits a High zone is dropped.
pub fn nest_zones(high: &[Zone], intermediate: &[Zone], low: &[Zone]) -> NestedZones {
    let nested_intermediate = nest_within(intermediate, high);
    let nested_low = nest_within(low, &nested_intermediate);

    log::debug!(
        "Nested zones: {} high, {}/{} intermediate, {}/{} low",
        high.len(),
        nested_intermediate.len(),
        intermediate.len(),
        nested_low.len(),
        low.len()
    );

    NestedZones {
        high: high.to_vec(),
        intermediate: nested_intermediate,
        low: nested_low,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn at(hours: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 4, 1, 0, 0, 0).unwrap() + Duration::hours(hours)
    }

    fn zone(hours: i64, bottom: f64, top: f64) -> Zone {
        Zone {
            anchor_time: at(hours),
            top,
            bottom,
            touch_count: 1,
        }
    }

    fn assert_all_contained(children: &[Zone], parents: &[Zone]) {
        for child in children {
            assert!(
                parents.iter().any(|p| child.is_within(p)),
                "{:?} is not inside any parent",
                child
            );
        }
    }

    #[test]
    fn high_zones_pass_through_unchanged() {
        let high = vec![zone(0, 10.0, 20.0), zone(24, 50.0, 60.0)];
        let nested = nest_zones(&high, &[], &[]);
        assert_eq!(nested.high, high);
        assert!(nested.intermediate.is_empty());
        assert!(nested.low.is_empty());
    }

    #[test]
    fn keeps_only_contained_children_in_order() {
        let high = vec![zone(0, 10.0, 20.0), zone(24, 50.0, 60.0)];
        let intermediate = vec![
            zone(30, 52.0, 58.0), // inside the second
            zone(31, 19.0, 21.0), // straddles the first
            zone(32, 10.0, 20.0), // identical bounds count as inside
            zone(33, 30.0, 40.0), // between both
        ];

        let nested = nest_within(&intermediate, &high);

        assert_eq!(nested, vec![intermediate[0], intermediate[2]]);
        assert_all_contained(&nested, &high);
    }

    #[test]
    fn overlapping_parents_accept_child_once() {
        let high = vec![zone(0, 10.0, 30.0), zone(1, 15.0, 25.0)];
        let intermediate = vec![zone(5, 16.0, 24.0)];
        assert_eq!(nest_within(&intermediate, &high), intermediate);
    }

    #[test]
    fn exact_duplicates_are_removed() {
        let high = vec![zone(0, 10.0, 20.0)];
        let dup = zone(5, 12.0, 14.0);
        let same_range_other_anchor = zone(6, 12.0, 14.0);
        let mut other_touches = dup;
        other_touches.touch_count = 3;
        let intermediate = vec![dup, same_range_other_anchor, dup, other_touches];

        let nested = nest_within(&intermediate, &high);

        assert_eq!(nested, vec![dup, same_range_other_anchor, other_touches]);
    }

    #[test]
    fn low_zones_need_an_accepted_intermediate_parent() {
        let high = vec![zone(0, 10.0, 20.0)];
        let intermediate = vec![
            zone(4, 11.0, 15.0),  // accepted
            zone(5, 100.0, 110.0), // rejected, not inside any high zone
        ];
        let low = vec![
            zone(6, 12.0, 14.0),   // inside accepted intermediate
            zone(7, 16.0, 18.0),   // inside high only: dropped
            zone(8, 101.0, 102.0), // inside rejected intermediate: dropped
        ];

        let nested = nest_zones(&high, &intermediate, &low);

        assert_eq!(nested.intermediate, vec![intermediate[0]]);
        assert_eq!(nested.low, vec![low[0]]);
        assert_all_contained(&nested.intermediate, &nested.high);
        assert_all_contained(&nested.low, &nested.intermediate);
    }

    #[test]
    fn disjoint_intermediate_empties_the_chain() {
        let high = vec![zone(0, 10.0, 20.0), zone(24, 30.0, 40.0)];
        let intermediate = vec![zone(4, 21.0, 29.0), zone(5, 41.0, 45.0), zone(6, 1.0, 9.0)];
        let low = vec![zone(6, 22.0, 23.0), zone(7, 12.0, 13.0), zone(8, 0.0, 1000.0)];

        let nested = nest_zones(&high, &intermediate, &low);

        assert_eq!(nested.high, high);
        assert!(nested.intermediate.is_empty());
        assert!(nested.low.is_empty());
    }

    #[test]
    fn nesting_is_deterministic() {
        let high = vec![zone(0, 10.0, 20.0)];
        let intermediate = vec![zone(4, 11.0, 15.0), zone(5, 12.0, 19.0)];
        let low = vec![zone(6, 12.0, 14.0), zone(7, 13.0, 18.0)];
        assert_eq!(
            nest_zones(&high, &intermediate, &low),
            nest_zones(&high, &intermediate, &low)
        );
    }
}
