//! Renderable shapes.
//!
//! The cache never interprets a shape beyond asking for its bound; the
//! concrete kinds here exist so the cache has real geometry to persist and
//! round-trip. All bounds are in the shape's own local space.

use serde::{Deserialize, Serialize};

use crate::box3::{Box3, Vec3};

/// A renderable shape with a well-defined local-space bound.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// An axis-aligned box, its own bound.
    Box(Box3),
    /// A sphere given by center and radius.
    Sphere { center: Vec3, radius: f64 },
    /// A cloud of points; the bound is the tightest box containing them all.
    Points(Vec<Vec3>),
}

impl Shape {
    /// The shape's bounding box in its own local space.
    ///
    /// An empty point cloud has an empty bound.
    pub fn bound(&self) -> Box3 {
        match self {
            Self::Box(b) => *b,
            Self::Sphere { center, radius } => {
                let r = Vec3::new(*radius, *radius, *radius);
                Box3::new(
                    Vec3::new(center.x - r.x, center.y - r.y, center.z - r.z),
                    Vec3::new(center.x + r.x, center.y + r.y, center.z + r.z),
                )
            }
            Self::Points(points) => {
                let mut b = Box3::empty();
                for p in points {
                    b.extend_by_point(*p);
                }
                b
            }
        }
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Box(_) => write!(f, "box"),
            Self::Sphere { .. } => write!(f, "sphere"),
            Self::Points(_) => write!(f, "points"),
        }
    }
}
