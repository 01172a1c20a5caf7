//! Result aggregation for one strategy run.

use crate::filler::FillOutcome;
use crate::model::{Solution, UnitItem, UnpackedEntry};
use crate::strategy::Strategy;

/// Groups leftover units per SKU, in order of first appearance.
pub fn aggregate_unpacked(units: &[UnitItem]) -> Vec<UnpackedEntry> {
    let mut entries: Vec<UnpackedEntry> = Vec::new();
    for unit in units {
        match entries.iter_mut().find(|e| e.cargo_id == unit.cargo_id) {
            Some(entry) => entry.quantity += 1,
            None => entries.push(UnpackedEntry {
                cargo_id: unit.cargo_id.clone(),
                quantity: 1,
            }),
        }
    }
    entries
}

fn ratio(used: f64, capacity: f64) -> f64 {
    if capacity > 0.0 { used / capacity } else { 0.0 }
}

/// Builds the `Solution` of `strategy` from its filler outcome.
///
/// Volume utilisation is occupied volume over the capacity of all opened
/// containers; weight utilisation is loaded weight over their combined
/// weight limits. Both are 0 when no container was opened.
pub fn build_solution(strategy: Strategy, outcome: FillOutcome) -> Solution {
    let FillOutcome {
        containers,
        remaining,
        total_cost,
        ..
    } = outcome;

    let capacity: f64 = containers.iter().map(|c| c.total_volume).sum();
    let used_volume: f64 = containers.iter().map(|c| c.utilization_volume).sum();
    let weight_limit: f64 = containers.iter().map(|c| c.container_type.max_weight).sum();
    let loaded_weight: f64 = containers.iter().map(|c| c.total_weight).sum();

    Solution {
        id: strategy.id().to_string(),
        name: strategy.name().to_string(),
        description: strategy.description().to_string(),
        total_cost,
        total_volume_util: ratio(used_volume, capacity),
        total_weight_util: ratio(loaded_weight, weight_limit),
        unpacked_items: aggregate_unpacked(&remaining),
        containers,
    }
}
