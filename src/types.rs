//! Common types and traits for 3D container geometry.
//!
//! Axis convention used throughout the crate:
//! - `x` runs along the container length (from the back wall towards the door)
//! - `y` is vertical (floor at `y = 0`)
//! - `z` runs along the container width
//!
//! The horizontal footprint of a box is therefore its `(x, z)` rectangle.

use std::ops::{Add, Sub};

use crate::geometry::overlap_1d;

/// Global numerical tolerance for floating-point comparisons.
///
/// Used for bounds checks, overlap tests and anchor deduplication.
pub const EPSILON_GENERAL: f64 = 1e-6;

/// Tolerance for matching a top face against a bottom face.
///
/// Slightly larger tolerance for height matching during stacking.
pub const EPSILON_HEIGHT: f64 = 1e-3;

/// Represents a 3D vector or point in container space.
///
/// # Examples
/// ```
/// use load_planner::types::Vec3;
///
/// let origin = Vec3::new(100.0, 0.0, 40.0);
/// let dims = Vec3::new(50.0, 30.0, 40.0);
/// let far_corner = origin + dims;
/// assert_eq!(far_corner, Vec3::new(150.0, 30.0, 80.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    /// Creates a new 3D vector.
    ///
    /// # Parameters
    /// * `x` - X component (length axis)
    /// * `y` - Y component (vertical axis)
    /// * `z` - Z component (width axis)
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Creates a zero vector (origin).
    #[inline]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Calculates the volume (product of all components).
    #[inline]
    pub fn volume(&self) -> f64 {
        self.x * self.y * self.z
    }

    /// Calculates the footprint area (X × Z product).
    #[inline]
    pub fn footprint_area(&self) -> f64 {
        self.x * self.z
    }

    /// Checks if the vector fits within another vector (component-wise <=).
    #[inline]
    pub fn fits_within(&self, container: &Self, tolerance: f64) -> bool {
        self.x <= container.x + tolerance
            && self.y <= container.y + tolerance
            && self.z <= container.z + tolerance
    }

    /// Component-wise equality within a tolerance.
    #[inline]
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance
            && (self.y - other.y).abs() <= tolerance
            && (self.z - other.z).abs() <= tolerance
    }
}

impl Add for Vec3 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// Trait for objects with 3D extent.
///
/// Dimensions are returned in container axes: `x` = length, `y` = height,
/// `z` = width.
pub trait Dimensional {
    /// Returns the dimensions of the object.
    fn dimensions(&self) -> Vec3;

    /// Calculates the volume.
    fn volume(&self) -> f64 {
        self.dimensions().volume()
    }

    /// Calculates the footprint area.
    fn footprint_area(&self) -> f64 {
        self.dimensions().footprint_area()
    }
}

/// Trait for objects with a position in 3D space.
pub trait Positioned {
    /// Returns the origin (lowest corner on every axis).
    fn position(&self) -> Vec3;
}

/// Represents an Axis-Aligned Bounding Box (AABB).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner (position)
    pub min: Vec3,
    /// Maximum corner (position + dimensions)
    pub max: Vec3,
}

impl BoundingBox {
    /// Creates a bounding box from position and dimensions.
    #[inline]
    pub fn from_position_and_dims(position: Vec3, dims: Vec3) -> Self {
        Self {
            min: position,
            max: position + dims,
        }
    }

    /// Checks if two bounding boxes strictly intersect.
    ///
    /// Boxes that only share a face, edge or corner do not intersect. Contact
    /// within `tolerance` counts as touching.
    #[inline]
    pub fn intersects(&self, other: &Self, tolerance: f64) -> bool {
        !(self.max.x <= other.min.x + tolerance
            || other.max.x <= self.min.x + tolerance
            || self.max.y <= other.min.y + tolerance
            || other.max.y <= self.min.y + tolerance
            || self.max.z <= other.min.z + tolerance
            || other.max.z <= self.min.z + tolerance)
    }

    /// Calculates the overlap area of the two footprints (XZ plane).
    #[inline]
    pub fn overlap_area_xz(&self, other: &Self) -> f64 {
        let overlap_x = overlap_1d(self.min.x, self.max.x, other.min.x, other.max.x);
        let overlap_z = overlap_1d(self.min.z, self.max.z, other.min.z, other.max.z);
        overlap_x * overlap_z
    }

    /// Checks if a point lies strictly inside the box on every axis.
    ///
    /// Points on a face, edge or corner are not inside.
    #[inline]
    pub fn contains_point_strictly(&self, point: &Vec3, tolerance: f64) -> bool {
        point.x > self.min.x + tolerance
            && point.x < self.max.x - tolerance
            && point.y > self.min.y + tolerance
            && point.y < self.max.y - tolerance
            && point.z > self.min.z + tolerance
            && point.z < self.max.z - tolerance
    }

    /// Checks if this box lies inside `[0, bounds]` on every axis.
    #[inline]
    pub fn within_bounds(&self, bounds: &Vec3, tolerance: f64) -> bool {
        self.min.x >= -tolerance
            && self.min.y >= -tolerance
            && self.min.z >= -tolerance
            && self.max.fits_within(bounds, tolerance)
    }

    /// Returns the dimensions (length, height, width).
    #[inline]
    pub fn dimensions(&self) -> Vec3 {
        self.max - self.min
    }
}

/// Validation helpers shared by cargo and container catalog entries.
pub mod validation {

    /// Validates a strictly positive, finite dimension.
    ///
    /// # Returns
    /// `Ok(())` for valid values, otherwise error text
    pub fn validate_dimension(value: f64, name: &str) -> Result<(), String> {
        if value.is_nan() {
            return Err(format!("{} must not be NaN", name));
        }
        if value.is_infinite() {
            return Err(format!("{} must not be infinite", name));
        }
        if value <= 0.0 {
            return Err(format!("{} must be positive, got: {}", name, value));
        }
        Ok(())
    }

    /// Validates a finite value that may be zero but not negative.
    ///
    /// Used for item weights and container costs.
    pub fn validate_non_negative(value: f64, name: &str) -> Result<(), String> {
        if value.is_nan() {
            return Err(format!("{} must not be NaN", name));
        }
        if value.is_infinite() {
            return Err(format!("{} must not be infinite", name));
        }
        if value < 0.0 {
            return Err(format!("{} must not be negative, got: {}", name, value));
        }
        Ok(())
    }

    /// Validates all three dimensions of a box given as (length, width, height).
    pub fn validate_dimensions_3d(dims: (f64, f64, f64)) -> Result<(), String> {
        validate_dimension(dims.0, "Length")?;
        validate_dimension(dims.1, "Width")?;
        validate_dimension(dims.2, "Height")?;
        Ok(())
    }
}
