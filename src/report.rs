//! Compact solution digests for downstream report generators.
//!
//! A narrative generator only needs the headline numbers of each plan: cost,
//! which containers are used, how full they are and what was left behind.

use std::fmt;

use serde::Serialize;
use utoipa::ToSchema;

use crate::model::{Solution, UnpackedEntry};

/// Number of containers of one type used by a solution.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContainerUsage {
    pub container_type_id: String,
    pub name: String,
    pub count: usize,
}

/// Headline figures of one solution.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SolutionSummary {
    pub id: String,
    pub name: String,
    pub total_cost: f64,
    pub container_count: usize,
    pub composition: Vec<ContainerUsage>,
    pub volume_utilization: f64,
    pub weight_utilization: f64,
    pub unpacked_items: Vec<UnpackedEntry>,
}

impl SolutionSummary {
    /// Summarises a solution; composition is listed in order of first use.
    pub fn from_solution(solution: &Solution) -> Self {
        let mut composition: Vec<ContainerUsage> = Vec::new();
        for packed in &solution.containers {
            let container_type = &packed.container_type;
            match composition
                .iter_mut()
                .find(|usage| usage.container_type_id == container_type.id)
            {
                Some(usage) => usage.count += 1,
                None => composition.push(ContainerUsage {
                    container_type_id: container_type.id.clone(),
                    name: container_type.name.clone(),
                    count: 1,
                }),
            }
        }

        Self {
            id: solution.id.clone(),
            name: solution.name.clone(),
            total_cost: solution.total_cost,
            container_count: solution.container_count(),
            composition,
            volume_utilization: solution.total_volume_util,
            weight_utilization: solution.total_weight_util,
            unpacked_items: solution.unpacked_items.clone(),
        }
    }
}

impl fmt::Display for SolutionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} (ID: {})", self.name, self.id)?;
        writeln!(f, "- Total cost: {:.2}", self.total_cost)?;

        let composition = self
            .composition
            .iter()
            .map(|usage| format!("{} x{}", usage.name, usage.count))
            .collect::<Vec<_>>()
            .join(", ");
        if composition.is_empty() {
            writeln!(f, "- Containers: 0")?;
        } else {
            writeln!(f, "- Containers: {} ({})", self.container_count, composition)?;
        }

        writeln!(
            f,
            "- Volume utilization: {:.1}%",
            self.volume_utilization * 100.0
        )?;
        writeln!(
            f,
            "- Weight utilization: {:.1}%",
            self.weight_utilization * 100.0
        )?;

        if self.unpacked_items.is_empty() {
            write!(f, "- Unpacked cargo: none")
        } else {
            let unpacked = self
                .unpacked_items
                .iter()
                .map(|entry| format!("{}x{}", entry.cargo_id, entry.quantity))
                .collect::<Vec<_>>()
                .join(", ");
            write!(f, "- Unpacked cargo: {}", unpacked)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContainerType, PackedContainer};

    fn container_type(id: &str) -> ContainerType {
        ContainerType {
            id: id.to_string(),
            name: format!("{} box", id),
            length: 100.0,
            width: 100.0,
            height: 100.0,
            max_weight: 1000.0,
            cost: 10.0,
            enabled: true,
        }
    }

    fn solution(containers: Vec<PackedContainer>, unpacked: Vec<UnpackedEntry>) -> Solution {
        Solution {
            id: "COST_SAVER".to_string(),
            name: "Plan 1".to_string(),
            description: String::new(),
            containers,
            total_cost: 30.0,
            total_volume_util: 0.5,
            total_weight_util: 0.25,
            unpacked_items: unpacked,
        }
    }

    #[test]
    fn composition_counts_types_in_first_use_order() {
        let containers = vec![
            PackedContainer::empty(&container_type("B")),
            PackedContainer::empty(&container_type("A")),
            PackedContainer::empty(&container_type("B")),
        ];
        let summary = SolutionSummary::from_solution(&solution(containers, Vec::new()));

        assert_eq!(summary.container_count, 3);
        let counts: Vec<(&str, usize)> = summary
            .composition
            .iter()
            .map(|u| (u.container_type_id.as_str(), u.count))
            .collect();
        assert_eq!(counts, vec![("B", 2), ("A", 1)]);
    }

    #[test]
    fn display_lists_headline_figures() {
        let summary = SolutionSummary::from_solution(&solution(
            vec![PackedContainer::empty(&container_type("A"))],
            vec![UnpackedEntry {
                cargo_id: "SKU-9".to_string(),
                quantity: 2,
            }],
        ));
        let text = summary.to_string();

        assert!(text.starts_with("Plan 1 (ID: COST_SAVER)"));
        assert!(text.contains("- Total cost: 30.00"));
        assert!(text.contains("- Containers: 1 (A box x1)"));
        assert!(text.contains("- Volume utilization: 50.0%"));
        assert!(text.contains("- Unpacked cargo: SKU-9x2"));
    }

    #[test]
    fn display_reports_complete_plans() {
        let summary = SolutionSummary::from_solution(&solution(Vec::new(), Vec::new()));
        let text = summary.to_string();
        assert!(text.contains("- Containers: 0"));
        assert!(text.ends_with("- Unpacked cargo: none"));
    }
}
