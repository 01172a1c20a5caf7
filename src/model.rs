//! Data models for container load planning.
//!
//! This module defines the catalog inputs and the planning outputs:
//! - `CargoItem`: a SKU with dimensions, weight, quantity and handling flags
//! - `ContainerType`: an immutable catalog entry for one container size
//! - `UnitItem`: one expanded unit instance of a `CargoItem`
//! - `PlacedItem`: a unit with its origin inside a container
//! - `PackedContainer`: one opened container with its placements
//! - `Solution`: the result of one planning strategy
//!
//! Catalog structs implement the traits from the `types` module.

use serde::{Deserialize, Serialize};
#[allow(unused_imports)]
use serde_json::json;
use thiserror::Error;
use utoipa::ToSchema;

use crate::types::{BoundingBox, Dimensional, Positioned, Vec3, validation};

/// Validation error for catalog data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),
    #[error("Invalid weight: {0}")]
    InvalidWeight(String),
    #[error("Invalid cost: {0}")]
    InvalidCost(String),
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),
}

/// Loading priority of a SKU.
///
/// Low-priority cargo is loaded first and ends up deepest inside the
/// container; high-priority cargo ends up nearest the door.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Sort rank: Low = 1, Medium = 2, High = 3.
    pub const fn rank(self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
        }
    }
}

/// Packaging form of a SKU. Informational only; placement ignores it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum CargoType {
    #[default]
    Carton,
    Pallet,
    Drum,
    Crate,
    Irregular,
}

fn default_color() -> String {
    "#94a3b8".to_string()
}

/// A cargo SKU as entered in the cargo catalog.
///
/// Dimensions are in cm, weight in kg. The item is expanded into
/// `quantity` independent units before packing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "id": "SKU-001",
    "name": "Standard carton",
    "length": 50.0,
    "width": 40.0,
    "height": 30.0,
    "weight": 10.0,
    "quantity": 80,
    "canRotate": true,
    "type": "Carton",
    "priority": "Low",
    "color": "#60a5fa"
}))]
pub struct CargoItem {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub weight: f64,
    pub quantity: u32,
    #[serde(default)]
    pub can_rotate: bool,
    #[serde(default, rename = "type")]
    pub cargo_type: CargoType,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default = "default_color")]
    pub color: String,
}

impl CargoItem {
    /// Upper bound for the unit count of one SKU.
    pub const MAX_QUANTITY: u32 = 100_000;

    /// Validates dimensions, weight, quantity and identifier.
    ///
    /// # Examples
    /// ```
    /// use load_planner::model::{CargoItem, CargoType, Priority};
    ///
    /// let item = CargoItem {
    ///     id: "SKU-1".to_string(),
    ///     name: "Carton".to_string(),
    ///     length: 50.0,
    ///     width: 40.0,
    ///     height: -1.0,
    ///     weight: 10.0,
    ///     quantity: 2,
    ///     can_rotate: true,
    ///     cargo_type: CargoType::Carton,
    ///     priority: Priority::Low,
    ///     color: "#60a5fa".to_string(),
    /// };
    /// assert!(item.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::InvalidIdentifier(
                "Cargo id must not be empty".to_string(),
            ));
        }
        validation::validate_dimensions_3d((self.length, self.width, self.height))
            .map_err(ValidationError::InvalidDimension)?;
        validation::validate_non_negative(self.weight, "Weight")
            .map_err(ValidationError::InvalidWeight)?;
        if self.quantity > Self::MAX_QUANTITY {
            return Err(ValidationError::InvalidQuantity(format!(
                "Quantity must not exceed {}, got: {}",
                Self::MAX_QUANTITY,
                self.quantity
            )));
        }
        Ok(())
    }
}

/// A container size from the container catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "id": "20GP",
    "name": "20GP standard",
    "length": 589.0,
    "width": 235.0,
    "height": 239.0,
    "maxWeight": 28000.0,
    "cost": 3000.0,
    "enabled": true
}))]
pub struct ContainerType {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub max_weight: f64,
    pub cost: f64,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl ContainerType {
    /// Validates dimensions, weight limit and cost.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::InvalidIdentifier(
                "Container id must not be empty".to_string(),
            ));
        }
        validation::validate_dimension(self.length, "Container length")
            .map_err(ValidationError::InvalidDimension)?;
        validation::validate_dimension(self.width, "Container width")
            .map_err(ValidationError::InvalidDimension)?;
        validation::validate_dimension(self.height, "Container height")
            .map_err(ValidationError::InvalidDimension)?;
        validation::validate_dimension(self.max_weight, "Max weight")
            .map_err(ValidationError::InvalidWeight)?;
        validation::validate_non_negative(self.cost, "Cost").map_err(ValidationError::InvalidCost)?;
        Ok(())
    }

    /// Inner volume in cm³.
    pub fn volume(&self) -> f64 {
        self.length * self.width * self.height
    }

    /// Cost per cm³ of capacity.
    pub fn cost_per_volume(&self) -> f64 {
        let volume = self.volume();
        if volume <= 0.0 {
            return f64::INFINITY;
        }
        self.cost / volume
    }
}

impl Dimensional for ContainerType {
    fn dimensions(&self) -> Vec3 {
        Vec3::new(self.length, self.height, self.width)
    }
}

/// One unit instance expanded from a `CargoItem`.
///
/// Units keep the source SKU id so placements and leftovers can be
/// aggregated per SKU.
#[derive(Clone, Debug, PartialEq)]
pub struct UnitItem {
    pub cargo_id: String,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub weight: f64,
    pub can_rotate: bool,
    pub priority: Priority,
    pub color: String,
}

impl UnitItem {
    /// Creates one unit from its SKU.
    pub fn from_cargo(item: &CargoItem) -> Self {
        Self {
            cargo_id: item.id.clone(),
            length: item.length,
            width: item.width,
            height: item.height,
            weight: item.weight,
            can_rotate: item.can_rotate,
            priority: item.priority,
            color: item.color.clone(),
        }
    }

    /// Floor-plane orientations as `(length, width, rotated)`.
    ///
    /// The native orientation comes first; the L/W-swapped orientation is
    /// only offered for rotatable units. Height never changes.
    pub fn orientations(&self) -> impl Iterator<Item = (f64, f64, bool)> {
        let native = std::iter::once((self.length, self.width, false));
        let swapped = self
            .can_rotate
            .then_some((self.width, self.length, true))
            .into_iter();
        native.chain(swapped)
    }
}

impl Dimensional for UnitItem {
    fn dimensions(&self) -> Vec3 {
        Vec3::new(self.length, self.height, self.width)
    }
}

/// A unit placed inside a container.
///
/// `x` runs along the container length, `y` is vertical and `z` runs along
/// the container width. `length`/`width`/`height` are post-rotation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlacedItem {
    pub cargo_id: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub rotated: bool,
    pub color: String,
}

impl PlacedItem {
    /// Axis-aligned box occupied by this item.
    #[inline]
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_position_and_dims(self.position(), self.dimensions())
    }

    /// Height of the top face.
    #[inline]
    pub fn top_y(&self) -> f64 {
        self.y + self.height
    }
}

impl Positioned for PlacedItem {
    fn position(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

impl Dimensional for PlacedItem {
    fn dimensions(&self) -> Vec3 {
        Vec3::new(self.length, self.height, self.width)
    }
}

/// One opened container with its placed items.
///
/// `total_volume` is the container capacity, `utilization_volume` the
/// occupied volume and `utilization_weight` the loaded weight; all absolute.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PackedContainer {
    pub container_id: String,
    pub container_type: ContainerType,
    pub items: Vec<PlacedItem>,
    pub total_weight: f64,
    pub total_volume: f64,
    pub utilization_volume: f64,
    pub utilization_weight: f64,
}

impl PackedContainer {
    /// Creates an empty container instance of the given type.
    pub fn empty(container_type: &ContainerType) -> Self {
        Self {
            container_id: String::new(),
            container_type: container_type.clone(),
            items: Vec::new(),
            total_weight: 0.0,
            total_volume: container_type.volume(),
            utilization_volume: 0.0,
            utilization_weight: 0.0,
        }
    }

    /// Records a placement and updates the running totals.
    pub fn push(&mut self, item: PlacedItem, weight: f64) {
        self.utilization_volume += item.volume();
        self.total_weight += weight;
        self.utilization_weight = self.total_weight;
        self.items.push(item);
    }

    /// Number of placed units.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Occupied volume as a fraction of capacity.
    pub fn volume_fill_ratio(&self) -> f64 {
        if self.total_volume <= 0.0 {
            return 0.0;
        }
        self.utilization_volume / self.total_volume
    }

    /// Loaded weight as a fraction of the weight limit.
    pub fn weight_fill_ratio(&self) -> f64 {
        if self.container_type.max_weight <= 0.0 {
            return 0.0;
        }
        self.total_weight / self.container_type.max_weight
    }
}

/// Units of one SKU that could not be loaded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnpackedEntry {
    pub cargo_id: String,
    pub quantity: u32,
}

/// Load plan produced by one strategy.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Solution {
    pub id: String,
    pub name: String,
    pub description: String,
    pub containers: Vec<PackedContainer>,
    pub total_cost: f64,
    pub total_volume_util: f64,
    pub total_weight_util: f64,
    pub unpacked_items: Vec<UnpackedEntry>,
}

impl Solution {
    /// Number of opened containers.
    pub fn container_count(&self) -> usize {
        self.containers.len()
    }

    /// Indicates whether every unit was loaded.
    pub fn is_complete(&self) -> bool {
        self.unpacked_items.is_empty()
    }

    /// Total number of placed units across all containers.
    pub fn placed_units(&self) -> usize {
        self.containers.iter().map(PackedContainer::item_count).sum()
    }

    /// Placed units of one SKU across all containers.
    pub fn placed_units_of(&self, cargo_id: &str) -> usize {
        self.containers
            .iter()
            .flat_map(|c| c.items.iter())
            .filter(|p| p.cargo_id == cargo_id)
            .count()
    }

    /// Unpacked units of one SKU.
    pub fn unpacked_units_of(&self, cargo_id: &str) -> u32 {
        self.unpacked_items
            .iter()
            .filter(|entry| entry.cargo_id == cargo_id)
            .map(|entry| entry.quantity)
            .sum()
    }
}
