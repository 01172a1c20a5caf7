//! Planning entry points.
//!
//! Validates the catalogs, builds the global loading sequence once and runs
//! every strategy on its own copy of it:
//! - cargo + container catalogs → expanded and sorted unit sequence
//! - per strategy: container ranking → container filler → placement engine
//! - per strategy: result aggregation into a `Solution`

use std::collections::HashSet;

use serde::Serialize;
use tracing::{info, warn};

use crate::aggregate::build_solution;
use crate::error::{PlanError, Result};
use crate::filler::{FillStop, fill_containers};
use crate::model::{CargoItem, ContainerType, Solution};
use crate::sequence::build_sequence;
use crate::strategy::Strategy;
use crate::types::{EPSILON_GENERAL, EPSILON_HEIGHT};

/// Configuration for the placement heuristic.
///
/// Holds all tolerances and limits that steer the packing behaviour.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PackingConfig {
    /// Minimum share of the footprint that must rest on items below (0.0 to 1.0)
    pub support_ratio: f64,
    /// Tolerance for matching top faces against bottom faces
    pub height_epsilon: f64,
    /// General numerical tolerance
    pub general_epsilon: f64,
    /// Maximum number of containers opened per strategy
    pub max_containers: usize,
}

impl PackingConfig {
    pub const DEFAULT_SUPPORT_RATIO: f64 = 0.6;
    pub const DEFAULT_HEIGHT_EPSILON: f64 = EPSILON_HEIGHT;
    pub const DEFAULT_GENERAL_EPSILON: f64 = EPSILON_GENERAL;
    pub const DEFAULT_MAX_CONTAINERS: usize = 50;

    /// Creates a builder for a custom configuration.
    pub fn builder() -> PackingConfigBuilder {
        PackingConfigBuilder::default()
    }
}

impl Default for PackingConfig {
    fn default() -> Self {
        Self {
            support_ratio: Self::DEFAULT_SUPPORT_RATIO,
            height_epsilon: Self::DEFAULT_HEIGHT_EPSILON,
            general_epsilon: Self::DEFAULT_GENERAL_EPSILON,
            max_containers: Self::DEFAULT_MAX_CONTAINERS,
        }
    }
}

/// Builder for `PackingConfig`.
#[derive(Clone, Debug, Default)]
pub struct PackingConfigBuilder {
    config: PackingConfig,
}

impl PackingConfigBuilder {
    /// Sets the minimum support ratio.
    pub fn support_ratio(mut self, ratio: f64) -> Self {
        self.config.support_ratio = ratio;
        self
    }

    /// Sets the height tolerance.
    pub fn height_epsilon(mut self, epsilon: f64) -> Self {
        self.config.height_epsilon = epsilon;
        self
    }

    /// Sets the general tolerance.
    pub fn general_epsilon(mut self, epsilon: f64) -> Self {
        self.config.general_epsilon = epsilon;
        self
    }

    /// Sets the container cap per strategy.
    pub fn max_containers(mut self, cap: usize) -> Self {
        self.config.max_containers = cap;
        self
    }

    /// Builds the final configuration.
    pub fn build(self) -> PackingConfig {
        self.config
    }
}

/// Events emitted while planning, for live progress reporting.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type")]
pub enum PlanEvent {
    /// A strategy starts packing.
    StrategyStarted {
        strategy: Strategy,
        container_type_id: String,
        units: usize,
    },
    /// A container was packed and kept.
    ContainerPacked {
        strategy: Strategy,
        container_id: String,
        container_type_id: String,
        items: usize,
        total_weight: f64,
        utilization_volume: f64,
    },
    /// A unit was placed in a kept container.
    ItemPlaced {
        strategy: Strategy,
        container_id: String,
        cargo_id: String,
        pos: (f64, f64, f64),
        dims: (f64, f64, f64),
        rotated: bool,
    },
    /// A strategy finished.
    StrategyFinished {
        strategy: Strategy,
        containers: usize,
        unpacked_units: usize,
        stop: FillStop,
    },
}

/// Checks catalog preconditions before any computation.
pub fn validate_inputs(cargo: &[CargoItem], containers: &[ContainerType]) -> Result<()> {
    if cargo.is_empty() {
        return Err(PlanError::EmptyCargo);
    }

    let mut seen = HashSet::new();
    for item in cargo {
        item.validate().map_err(|source| PlanError::InvalidCargo {
            id: item.id.clone(),
            source,
        })?;
        if !seen.insert(item.id.as_str()) {
            return Err(PlanError::DuplicateCargoId(item.id.clone()));
        }
    }

    let mut any_enabled = false;
    for container in containers.iter().filter(|c| c.enabled) {
        container
            .validate()
            .map_err(|source| PlanError::InvalidContainer {
                id: container.id.clone(),
                source,
            })?;
        any_enabled = true;
    }
    if !any_enabled {
        return Err(PlanError::NoEnabledContainers);
    }

    Ok(())
}

/// Plans the load with the default configuration.
///
/// Returns one `Solution` per strategy, `COST_SAVER` first.
///
/// # Examples
/// ```
/// use load_planner::catalog::{default_cargo, default_containers};
/// use load_planner::optimizer::generate_solutions;
///
/// let solutions = generate_solutions(&default_cargo(), &default_containers()).unwrap();
/// assert_eq!(solutions.len(), 2);
/// assert_eq!(solutions[0].id, "COST_SAVER");
/// ```
pub fn generate_solutions(
    cargo: &[CargoItem],
    containers: &[ContainerType],
) -> Result<Vec<Solution>> {
    generate_solutions_with_config(cargo, containers, PackingConfig::default())
}

/// Plans the load with a custom configuration.
pub fn generate_solutions_with_config(
    cargo: &[CargoItem],
    containers: &[ContainerType],
    config: PackingConfig,
) -> Result<Vec<Solution>> {
    generate_solutions_with_progress(cargo, containers, config, |_| {})
}

/// Plans the load and reports progress through `on_event`.
///
/// Precondition failures are returned before any event is emitted. After
/// that, planning always completes; units that could not be loaded are listed
/// in each solution's unpacked items.
pub fn generate_solutions_with_progress(
    cargo: &[CargoItem],
    containers: &[ContainerType],
    config: PackingConfig,
    mut on_event: impl FnMut(&PlanEvent),
) -> Result<Vec<Solution>> {
    validate_inputs(cargo, containers)?;

    let sequence = build_sequence(cargo);
    info!(
        skus = cargo.len(),
        units = sequence.len(),
        "Planning load"
    );

    let mut solutions = Vec::with_capacity(Strategy::ALL.len());
    for strategy in Strategy::ALL {
        let ranked = strategy.rank_containers(containers);
        let Some(top) = ranked.first() else {
            return Err(PlanError::NoEnabledContainers);
        };
        on_event(&PlanEvent::StrategyStarted {
            strategy,
            container_type_id: top.id.clone(),
            units: sequence.len(),
        });

        let outcome = fill_containers(sequence.clone(), &ranked, strategy, &config, &mut on_event);
        let stop = outcome.stop;
        let solution = build_solution(strategy, outcome);

        on_event(&PlanEvent::StrategyFinished {
            strategy,
            containers: solution.container_count(),
            unpacked_units: solution
                .unpacked_items
                .iter()
                .map(|e| e.quantity as usize)
                .sum(),
            stop,
        });

        if solution.is_complete() {
            info!(
                %strategy,
                containers = solution.container_count(),
                total_cost = solution.total_cost,
                "Strategy finished"
            );
        } else {
            warn!(
                %strategy,
                containers = solution.container_count(),
                unpacked_skus = solution.unpacked_items.len(),
                ?stop,
                "Strategy finished with unpacked cargo"
            );
        }
        solutions.push(solution);
    }

    Ok(solutions)
}
