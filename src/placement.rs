//! Anchor-point placement engine for a single container.
//!
//! Units are tried strictly in queue order. Each unit is placed at the first
//! anchor (sorted by x, then y, then z) where one of its floor-plane
//! orientations fits inside the container, does not overlap anything already
//! placed and is sufficiently supported from below. Units that fit nowhere
//! are skipped; they never abort the container.
//!
//! Every placement emits three new anchors at the far corners of the placed
//! box along each axis. The anchor set is pruned after each placement.

use std::cmp::Ordering;

use tracing::trace;

use crate::geometry::{overlaps_any, point_inside_any, support_ratio};
use crate::model::{ContainerType, PackedContainer, PlacedItem, UnitItem};
use crate::optimizer::PackingConfig;
use crate::types::{BoundingBox, Dimensional, Vec3};

/// An accepted position for one unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub origin: Vec3,
    pub length: f64,
    pub width: f64,
    pub rotated: bool,
    /// `x·10000 + y·100 + z`, lower is deeper and lower in the container.
    pub score: f64,
}

impl Placement {
    fn score_for(origin: &Vec3) -> f64 {
        origin.x * 10_000.0 + origin.y * 100.0 + origin.z
    }
}

/// Candidate placement origins for the container being packed.
#[derive(Clone, Debug)]
pub struct AnchorSet {
    points: Vec<Vec3>,
}

impl AnchorSet {
    /// Creates the initial anchor set containing only the origin.
    pub fn new() -> Self {
        Self {
            points: vec![Vec3::zero()],
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Current anchors in visiting order.
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Sorts anchors by ascending x, then y, then z.
    pub fn sort(&mut self) {
        self.points.sort_by(compare_anchors);
    }

    /// Removes the anchor consumed by a placement and adds the three anchors
    /// spawned by the placed box.
    pub fn record_placement(&mut self, placed: &PlacedItem, epsilon: f64) {
        let origin = Vec3::new(placed.x, placed.y, placed.z);
        self.points.retain(|p| !p.approx_eq(&origin, epsilon));
        self.points.extend([
            Vec3::new(placed.x + placed.length, placed.y, placed.z),
            Vec3::new(placed.x, placed.y + placed.height, placed.z),
            Vec3::new(placed.x, placed.y, placed.z + placed.width),
        ]);
    }

    /// Drops anchors outside the container or strictly inside a placed box and
    /// merges anchors that coincide within `epsilon`.
    pub fn prune(&mut self, bounds: &Vec3, placed: &[PlacedItem], epsilon: f64) {
        self.points.retain(|p| {
            p.x < bounds.x - epsilon
                && p.y < bounds.y - epsilon
                && p.z < bounds.z - epsilon
                && !point_inside_any(p, placed, epsilon)
        });

        let mut unique: Vec<Vec3> = Vec::with_capacity(self.points.len());
        for point in self.points.drain(..) {
            if !unique.iter().any(|u| u.approx_eq(&point, epsilon)) {
                unique.push(point);
            }
        }
        self.points = unique;
    }
}

impl Default for AnchorSet {
    fn default() -> Self {
        Self::new()
    }
}

fn compare_anchors(a: &Vec3, b: &Vec3) -> Ordering {
    a.x.partial_cmp(&b.x)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.y.partial_cmp(&b.y).unwrap_or(Ordering::Equal))
        .then_with(|| a.z.partial_cmp(&b.z).unwrap_or(Ordering::Equal))
}

/// Checks whether a box of the given orientation can go at `anchor`.
///
/// Rejects boxes leaving the container, overlapping a placed item, or
/// floating with less than `support_ratio` of their footprint supported.
fn accepts(
    anchor: &Vec3,
    dims: Vec3,
    bounds: &Vec3,
    placed: &[PlacedItem],
    config: &PackingConfig,
) -> bool {
    let candidate = BoundingBox::from_position_and_dims(*anchor, dims);
    if !candidate.within_bounds(bounds, config.general_epsilon) {
        return false;
    }
    if overlaps_any(&candidate, placed, config.general_epsilon) {
        return false;
    }
    support_ratio(&candidate, placed, config.height_epsilon)
        >= config.support_ratio - config.general_epsilon
}

/// Finds the first anchor with an accepting orientation for `unit`.
///
/// Anchors must already be sorted. At one anchor the native orientation is
/// preferred over the rotated one.
pub fn find_placement(
    unit: &UnitItem,
    anchors: &AnchorSet,
    bounds: &Vec3,
    placed: &[PlacedItem],
    config: &PackingConfig,
) -> Option<Placement> {
    anchors.points().iter().find_map(|anchor| {
        unit.orientations()
            .find(|&(length, width, _)| {
                accepts(
                    anchor,
                    Vec3::new(length, unit.height, width),
                    bounds,
                    placed,
                    config,
                )
            })
            .map(|(length, width, rotated)| Placement {
                origin: *anchor,
                length,
                width,
                rotated,
                score: Placement::score_for(anchor),
            })
    })
}

/// Packs one fresh container of `container_type` from `units` in order.
///
/// Units exceeding the remaining weight budget or without any accepted
/// position are left out. The result is deterministic for a given unit
/// sequence and container type.
pub fn pack_single_container(
    container_type: &ContainerType,
    units: &[UnitItem],
    config: &PackingConfig,
) -> PackedContainer {
    let bounds = container_type.dimensions();
    let mut container = PackedContainer::empty(container_type);
    let mut anchors = AnchorSet::new();

    for unit in units {
        if container.total_weight + unit.weight > container_type.max_weight {
            continue;
        }
        if anchors.is_empty() {
            break;
        }

        anchors.sort();
        let Some(placement) = find_placement(unit, &anchors, &bounds, &container.items, config)
        else {
            continue;
        };

        trace!(
            cargo_id = %unit.cargo_id,
            x = placement.origin.x,
            y = placement.origin.y,
            z = placement.origin.z,
            rotated = placement.rotated,
            score = placement.score,
            "unit placed"
        );

        let placed = PlacedItem {
            cargo_id: unit.cargo_id.clone(),
            x: placement.origin.x,
            y: placement.origin.y,
            z: placement.origin.z,
            length: placement.length,
            width: placement.width,
            height: unit.height,
            rotated: placement.rotated,
            color: unit.color.clone(),
        };
        anchors.record_placement(&placed, config.general_epsilon);
        container.push(placed, unit.weight);
        anchors.prune(&bounds, &container.items, config.general_epsilon);
    }

    container
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{intersects, supported_area};
    use crate::model::Priority;

    fn unit(id: &str, dims: (f64, f64, f64), weight: f64, can_rotate: bool) -> UnitItem {
        UnitItem {
            cargo_id: id.to_string(),
            length: dims.0,
            width: dims.1,
            height: dims.2,
            weight,
            can_rotate,
            priority: Priority::Low,
            color: "#ffffff".to_string(),
        }
    }

    fn container(dims: (f64, f64, f64), max_weight: f64) -> ContainerType {
        ContainerType {
            id: "BOX".to_string(),
            name: "Box".to_string(),
            length: dims.0,
            width: dims.1,
            height: dims.2,
            max_weight,
            cost: 100.0,
            enabled: true,
        }
    }

    fn assert_valid_layout(packed: &PackedContainer, config: &PackingConfig) {
        let bounds = packed.container_type.dimensions();
        for (i, a) in packed.items.iter().enumerate() {
            assert!(
                a.bounding_box().within_bounds(&bounds, config.general_epsilon),
                "item {} at ({}, {}, {}) leaves the container",
                a.cargo_id,
                a.x,
                a.y,
                a.z
            );
            for b in &packed.items[i + 1..] {
                assert!(
                    !intersects(a, b, config.general_epsilon),
                    "items at ({}, {}, {}) and ({}, {}, {}) overlap",
                    a.x,
                    a.y,
                    a.z,
                    b.x,
                    b.y,
                    b.z
                );
            }
            if a.y > config.height_epsilon {
                let supported = supported_area(&a.bounding_box(), &packed.items, config.height_epsilon);
                let footprint = a.length * a.width;
                assert!(
                    supported / footprint >= config.support_ratio - config.general_epsilon,
                    "item at ({}, {}, {}) is only {:.2} supported",
                    a.x,
                    a.y,
                    a.z,
                    supported / footprint
                );
            }
        }
        assert!(packed.total_weight <= packed.container_type.max_weight);
    }

    #[test]
    fn single_unit_goes_to_origin() {
        let config = PackingConfig::default();
        let packed = pack_single_container(
            &container((200.0, 200.0, 200.0), 1000.0),
            &[unit("A", (100.0, 100.0, 100.0), 10.0, false)],
            &config,
        );

        assert_eq!(packed.items.len(), 1);
        let item = &packed.items[0];
        assert_eq!((item.x, item.y, item.z), (0.0, 0.0, 0.0));
        assert!((packed.utilization_volume - 1_000_000.0).abs() < 1e-6);
        assert!((packed.total_volume - 8_000_000.0).abs() < 1e-6);
    }

    #[test]
    fn oversized_unit_is_not_placed() {
        let config = PackingConfig::default();
        let packed = pack_single_container(
            &container((50.0, 200.0, 200.0), 1000.0),
            &[unit("A", (100.0, 100.0, 100.0), 10.0, true)],
            &config,
        );
        assert!(packed.items.is_empty());
        assert_eq!(packed.total_weight, 0.0);
    }

    #[test]
    fn fills_along_length_first() {
        let config = PackingConfig::default();
        let units: Vec<_> = (0..3)
            .map(|_| unit("A", (10.0, 10.0, 10.0), 1.0, false))
            .collect();
        let packed = pack_single_container(&container((30.0, 10.0, 10.0), 100.0), &units, &config);

        let xs: Vec<f64> = packed.items.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 10.0, 20.0]);
        assert!(packed.items.iter().all(|p| p.y == 0.0 && p.z == 0.0));
    }

    #[test]
    fn stacks_when_length_is_full() {
        let config = PackingConfig::default();
        let units: Vec<_> = (0..2)
            .map(|_| unit("A", (10.0, 10.0, 10.0), 1.0, false))
            .collect();
        let packed = pack_single_container(&container((10.0, 10.0, 20.0), 100.0), &units, &config);

        assert_eq!(packed.items.len(), 2);
        assert_eq!(
            (packed.items[1].x, packed.items[1].y, packed.items[1].z),
            (0.0, 10.0, 0.0)
        );
        assert_valid_layout(&packed, &config);
    }

    #[test]
    fn rotation_is_tried_when_native_does_not_fit() {
        let config = PackingConfig::default();
        let packed = pack_single_container(
            &container((40.0, 60.0, 30.0), 100.0),
            &[unit("A", (60.0, 40.0, 30.0), 1.0, true)],
            &config,
        );

        assert_eq!(packed.items.len(), 1);
        let item = &packed.items[0];
        assert!(item.rotated);
        assert_eq!((item.length, item.width, item.height), (40.0, 60.0, 30.0));
    }

    #[test]
    fn fixed_orientation_is_respected() {
        let config = PackingConfig::default();
        let packed = pack_single_container(
            &container((40.0, 60.0, 30.0), 100.0),
            &[unit("A", (60.0, 40.0, 30.0), 1.0, false)],
            &config,
        );
        assert!(packed.items.is_empty());
    }

    #[test]
    fn weight_budget_skips_unit_but_continues() {
        let config = PackingConfig::default();
        let units = vec![
            unit("HEAVY", (10.0, 10.0, 10.0), 80.0, false),
            unit("HEAVY", (10.0, 10.0, 10.0), 80.0, false),
            unit("LIGHT", (10.0, 10.0, 10.0), 10.0, false),
        ];
        let packed = pack_single_container(&container((100.0, 100.0, 100.0), 100.0), &units, &config);

        let ids: Vec<&str> = packed.items.iter().map(|p| p.cargo_id.as_str()).collect();
        assert_eq!(ids, vec!["HEAVY", "LIGHT"]);
        assert!((packed.total_weight - 90.0).abs() < 1e-9);
        assert_valid_layout(&packed, &config);
    }

    #[test]
    fn weight_limit_is_not_stretched_by_tolerance() {
        let config = PackingConfig::default();
        let units = vec![
            unit("A", (10.0, 10.0, 10.0), 500.000_000_4, false),
            unit("A", (10.0, 10.0, 10.0), 500.000_000_4, false),
        ];
        let packed = pack_single_container(&container((100.0, 100.0, 100.0), 1000.0), &units, &config);

        assert_eq!(packed.items.len(), 1);
        assert!(packed.total_weight <= 1000.0);
    }

    #[test]
    fn rotated_fit_at_earlier_anchor_wins_over_later_native_fit() {
        let config = PackingConfig::default();
        // After FIXED the anchors are (0, 0, 20) and (60, 0, 0). Only the
        // rotated 30 x 20 footprint fits at the first one; the native 40 x 30
        // footprint would fit at the second.
        let units = vec![
            unit("FIXED", (60.0, 20.0, 10.0), 1.0, false),
            unit("TURN", (40.0, 30.0, 10.0), 1.0, true),
        ];
        let packed = pack_single_container(&container((100.0, 40.0, 10.0), 100.0), &units, &config);

        assert_eq!(packed.items.len(), 2);
        let turned = &packed.items[1];
        assert_eq!((turned.x, turned.y, turned.z), (0.0, 0.0, 20.0));
        assert!(turned.rotated);
        assert_eq!((turned.length, turned.width), (30.0, 20.0));
        assert_valid_layout(&packed, &config);
    }

    #[test]
    fn overhanging_unit_is_rejected() {
        let config = PackingConfig::default();
        // The raised anchor on top of BASE is visited first but would leave the
        // long unit resting on about 11% of its footprint.
        let units = vec![
            unit("BASE", (10.0, 10.0, 10.0), 5.0, false),
            unit("LONG", (90.0, 10.0, 10.0), 5.0, false),
        ];
        let packed = pack_single_container(&container((100.0, 10.0, 20.0), 100.0), &units, &config);

        assert_eq!(packed.items.len(), 2);
        let long = &packed.items[1];
        assert_eq!((long.x, long.y, long.z), (10.0, 0.0, 0.0));
        assert_valid_layout(&packed, &config);
    }

    #[test]
    fn supported_stack_is_accepted() {
        let config = PackingConfig::default();
        // 80 x 10 on top of a 100 x 10 base: fully supported.
        let units = vec![
            unit("BASE", (100.0, 10.0, 10.0), 5.0, false),
            unit("TOP", (80.0, 10.0, 10.0), 5.0, false),
        ];
        let packed = pack_single_container(&container((100.0, 10.0, 20.0), 100.0), &units, &config);

        assert_eq!(packed.items.len(), 2);
        let top = &packed.items[1];
        assert_eq!((top.x, top.y, top.z), (0.0, 10.0, 0.0));
        assert_valid_layout(&packed, &config);
    }

    #[test]
    fn unfit_unit_does_not_block_followers() {
        let config = PackingConfig::default();
        let units = vec![
            unit("SMALL", (50.0, 50.0, 50.0), 1.0, false),
            unit("TOO_BIG", (100.0, 100.0, 100.0), 1.0, false),
            unit("SMALL", (50.0, 50.0, 50.0), 1.0, false),
        ];
        let packed = pack_single_container(&container((100.0, 50.0, 50.0), 100.0), &units, &config);
        let ids: Vec<&str> = packed.items.iter().map(|p| p.cargo_id.as_str()).collect();
        assert_eq!(ids, vec!["SMALL", "SMALL"]);
    }

    #[test]
    fn mixed_load_respects_all_constraints() {
        let config = PackingConfig::default();
        let mut units = Vec::new();
        for _ in 0..40 {
            units.push(unit("A", (50.0, 40.0, 30.0), 10.0, true));
        }
        for _ in 0..12 {
            units.push(unit("B", (120.0, 30.0, 30.0), 15.0, true));
        }
        for _ in 0..6 {
            units.push(unit("C", (40.0, 40.0, 40.0), 8.0, true));
        }
        let packed = pack_single_container(&container((300.0, 120.0, 120.0), 800.0), &units, &config);

        assert!(!packed.items.is_empty());
        assert_valid_layout(&packed, &config);
    }

    #[test]
    fn packing_is_deterministic() {
        let config = PackingConfig::default();
        let units: Vec<_> = (0..25)
            .map(|i| unit("A", (30.0 + (i % 3) as f64 * 10.0, 20.0, 25.0), 2.0, i % 2 == 0))
            .collect();
        let target = container((200.0, 100.0, 100.0), 1000.0);

        let first = pack_single_container(&target, &units, &config);
        let second = pack_single_container(&target, &units, &config);
        assert_eq!(first, second);
    }

    #[test]
    fn anchors_are_pruned_and_deduplicated() {
        let mut anchors = AnchorSet::new();
        let placed = PlacedItem {
            cargo_id: "A".to_string(),
            x: 0.0,
            y: 0.0,
            z: 0.0,
            length: 10.0,
            width: 10.0,
            height: 10.0,
            rotated: false,
            color: "#000".to_string(),
        };
        anchors.record_placement(&placed, 1e-6);
        assert_eq!(anchors.len(), 3);

        // a duplicate of an existing anchor and one outside the container
        anchors.points.push(Vec3::new(10.0, 0.0, 0.0));
        anchors.points.push(Vec3::new(0.0, 0.0, 20.0));
        anchors.prune(&Vec3::new(20.0, 20.0, 20.0), &[placed], 1e-6);

        anchors.sort();
        assert_eq!(
            anchors.points(),
            &[
                Vec3::new(0.0, 0.0, 10.0),
                Vec3::new(0.0, 10.0, 0.0),
                Vec3::new(10.0, 0.0, 0.0),
            ]
        );
    }

    #[test]
    fn anchor_order_is_x_then_y_then_z() {
        let mut anchors = AnchorSet {
            points: vec![
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(0.0, 0.0, 1.0),
                Vec3::new(0.0, 1.0, 1.0),
            ],
        };
        anchors.sort();
        assert_eq!(
            anchors.points(),
            &[
                Vec3::new(0.0, 0.0, 1.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 1.0),
                Vec3::new(1.0, 0.0, 0.0),
            ]
        );
    }

    #[test]
    fn placement_score_weights_axes() {
        assert_eq!(Placement::score_for(&Vec3::new(1.0, 2.0, 3.0)), 10_203.0);
    }
}
