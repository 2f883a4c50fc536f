use crate::domain::TimeframeRole;
use crate::models::{Level, NestedZones, Zone};

/// Top then bottom of every zone, tagged with `role`.
pub fn zone_levels(zones: &[Zone], role: TimeframeRole) -> impl Iterator<Item = Level> + '_ {
    zones.iter().flat_map(move |zone| {
        [
            Level {
                price: zone.top,
                role,
            },
            Level {
                price: zone.bottom,
                role,
            },
        ]
    })
}

/// Flattens nested zones into overlay levels, High then Intermediate then Low.
/// Always `2 * nested.total()` long. Repeated prices are kept.
pub fn project_levels(nested: &NestedZones) -> Vec<Level> {
    let levels: Vec<Level> = zone_levels(&nested.high, TimeframeRole::High)
        .chain(zone_levels(&nested.intermediate, TimeframeRole::Intermediate))
        .chain(zone_levels(&nested.low, TimeframeRole::Low))
        .collect();
    debug_assert_eq!(levels.len(), 2 * nested.total());
    levels
}
