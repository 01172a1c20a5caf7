//! Multi-container outer loop for one strategy.
//!
//! Repeatedly opens a container of the strategy's top-ranked type, packs it
//! from the remaining queue and removes the placed units, until the queue is
//! empty, a fresh container accepts nothing, or the container cap is hit.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::model::{ContainerType, PackedContainer, UnitItem};
use crate::optimizer::{PackingConfig, PlanEvent};
use crate::placement::pack_single_container;
use crate::strategy::Strategy;

/// Why the outer loop stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FillStop {
    /// Every unit was placed.
    QueueExhausted,
    /// A fresh container of the top-ranked type accepted no unit.
    Stalled,
    /// The container cap was reached with units still queued.
    IterationCap,
}

/// Result of filling containers for one strategy.
#[derive(Clone, Debug)]
pub struct FillOutcome {
    pub containers: Vec<PackedContainer>,
    pub remaining: Vec<UnitItem>,
    pub total_cost: f64,
    pub stop: FillStop,
}

/// Formats the per-solution container number.
pub fn container_label(index: usize) -> String {
    format!("CN-{:04}", index)
}

/// Removes placed units from the queue, matching by SKU id.
///
/// For every SKU the first `n` queued units are consumed, where `n` is the
/// number of placed units of that SKU. The relative order of the rest is
/// preserved.
pub fn remove_placed(queue: Vec<UnitItem>, packed: &PackedContainer) -> Vec<UnitItem> {
    let mut to_consume: HashMap<&str, usize> = HashMap::new();
    for item in &packed.items {
        *to_consume.entry(item.cargo_id.as_str()).or_insert(0) += 1;
    }

    queue
        .into_iter()
        .filter(|unit| match to_consume.get_mut(unit.cargo_id.as_str()) {
            Some(left) if *left > 0 => {
                *left -= 1;
                false
            }
            _ => true,
        })
        .collect()
}

/// Fills containers from `units` using the first entry of `ranked`.
///
/// `ranked` must be the strategy's enabled container types in preference
/// order; only the top-ranked type is ever opened.
pub fn fill_containers(
    units: Vec<UnitItem>,
    ranked: &[ContainerType],
    strategy: Strategy,
    config: &PackingConfig,
    on_event: &mut impl FnMut(&PlanEvent),
) -> FillOutcome {
    let mut containers: Vec<PackedContainer> = Vec::new();
    let mut remaining = units;
    let mut total_cost = 0.0;

    let Some(target) = ranked.first() else {
        return FillOutcome {
            containers,
            remaining,
            total_cost,
            stop: FillStop::Stalled,
        };
    };

    let stop = loop {
        if remaining.is_empty() {
            break FillStop::QueueExhausted;
        }
        if containers.len() >= config.max_containers {
            warn!(
                %strategy,
                cap = config.max_containers,
                remaining = remaining.len(),
                "Container cap reached, leaving units unpacked"
            );
            break FillStop::IterationCap;
        }

        let mut packed = pack_single_container(target, &remaining, config);
        if packed.items.is_empty() {
            debug!(
                %strategy,
                container_type = %target.id,
                remaining = remaining.len(),
                "Fresh container accepted no unit"
            );
            break FillStop::Stalled;
        }

        packed.container_id = container_label(containers.len() + 1);
        total_cost += target.cost;
        debug!(
            %strategy,
            container_id = %packed.container_id,
            items = packed.item_count(),
            weight = packed.total_weight,
            "Container packed"
        );

        on_event(&PlanEvent::ContainerPacked {
            strategy,
            container_id: packed.container_id.clone(),
            container_type_id: target.id.clone(),
            items: packed.item_count(),
            total_weight: packed.total_weight,
            utilization_volume: packed.utilization_volume,
        });
        for item in &packed.items {
            on_event(&PlanEvent::ItemPlaced {
                strategy,
                container_id: packed.container_id.clone(),
                cargo_id: item.cargo_id.clone(),
                pos: (item.x, item.y, item.z),
                dims: (item.length, item.width, item.height),
                rotated: item.rotated,
            });
        }

        remaining = remove_placed(remaining, &packed);
        containers.push(packed);
    };

    FillOutcome {
        containers,
        remaining,
        total_cost,
        stop,
    }
}
