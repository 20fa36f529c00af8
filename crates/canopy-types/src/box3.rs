//! Axis-aligned bounding boxes.

use serde::{Deserialize, Serialize};

use crate::matrix::Matrix4;

/// A 3-component vector of `f64`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Component-wise minimum.
    pub fn min(self, other: Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y), self.z.min(other.z))
    }

    /// Component-wise maximum.
    pub fn max(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y), self.z.max(other.z))
    }
}

/// An axis-aligned bounding box.
///
/// The empty box is represented by the `min > max` sentinel (`+inf` / `-inf`
/// corners), so extending an empty box by a point yields the point box.
/// Two empty boxes compare equal.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Box3 {
    pub min: Vec3,
    pub max: Vec3,
}

impl Box3 {
    /// The empty box.
    pub fn empty() -> Self {
        Self {
            min: Vec3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Vec3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Returns `true` if the box contains no points.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Grow the box to contain `point`.
    pub fn extend_by_point(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Grow the box to contain `other`. Extending by an empty box is a no-op.
    pub fn extend_by(&mut self, other: &Self) {
        if other.is_empty() {
            return;
        }
        self.extend_by_point(other.min);
        self.extend_by_point(other.max);
    }

    /// The eight corner points. Meaningless for an empty box.
    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ]
    }

    /// The axis-aligned box containing this box under `transform`.
    ///
    /// An empty box stays empty.
    pub fn transformed(&self, transform: &Matrix4) -> Self {
        if self.is_empty() {
            return Self::empty();
        }
        let mut out = Self::empty();
        for corner in self.corners() {
            out.extend_by_point(transform.transform_point(corner));
        }
        out
    }

    /// Flatten to `[min.x, min.y, min.z, max.x, max.y, max.z]` for storage.
    pub fn to_array(&self) -> [f64; 6] {
        [
            self.min.x, self.min.y, self.min.z, self.max.x, self.max.y, self.max.z,
        ]
    }

    /// Rebuild from the storage layout produced by [`to_array`](Self::to_array).
    pub fn from_array(values: [f64; 6]) -> Self {
        Self {
            min: Vec3::new(values[0], values[1], values[2]),
            max: Vec3::new(values[3], values[4], values[5]),
        }
    }
}

impl Default for Box3 {
    fn default() -> Self {
        Self::empty()
    }
}
