//! Container ranking strategies.
//!
//! Both strategies pack the same unit sequence; they differ only in which
//! container type they open.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::model::ContainerType;

/// Planning strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Strategy {
    /// Cheapest capacity first: ascending cost per volume.
    CostSaver,
    /// Fewest containers: descending volume.
    OperationEfficiency,
}

impl Strategy {
    /// All strategies, in the order their solutions are reported.
    pub const ALL: [Strategy; 2] = [Strategy::CostSaver, Strategy::OperationEfficiency];

    /// Stable solution id.
    pub fn id(self) -> &'static str {
        match self {
            Strategy::CostSaver => "COST_SAVER",
            Strategy::OperationEfficiency => "OPERATION_EFFICIENCY",
        }
    }

    /// Display name of the resulting plan.
    pub fn name(self) -> &'static str {
        match self {
            Strategy::CostSaver => "Plan 1: minimal total cost (recommended)",
            Strategy::OperationEfficiency => "Plan 2: operational efficiency",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Strategy::CostSaver => {
                "Prefers the container type with the best cost per volume, even if more containers are needed."
            }
            Strategy::OperationEfficiency => {
                "Prefers the largest container type to reduce the number of containers to handle."
            }
        }
    }

    /// Returns the enabled container types in this strategy's preference order.
    ///
    /// The sort is stable: equally ranked types keep their catalog order.
    pub fn rank_containers(self, containers: &[ContainerType]) -> Vec<ContainerType> {
        let mut ranked: Vec<ContainerType> =
            containers.iter().filter(|c| c.enabled).cloned().collect();
        match self {
            Strategy::CostSaver => ranked.sort_by(|a, b| {
                a.cost_per_volume()
                    .partial_cmp(&b.cost_per_volume())
                    .unwrap_or(Ordering::Equal)
            }),
            Strategy::OperationEfficiency => ranked.sort_by(|a, b| {
                b.volume()
                    .partial_cmp(&a.volume())
                    .unwrap_or(Ordering::Equal)
            }),
        }
        ranked
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}
