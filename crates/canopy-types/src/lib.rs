//! Foundation types for the canopy hierarchical cache.
//!
//! This crate provides the identity and geometry types used throughout the
//! canopy workspace. Every other canopy crate depends on `canopy-types`.
//!
//! # Key Types
//!
//! - [`ObjectHandle`] — Absolute, slash-separated identity of a node in the
//!   cached tree (`/`, `/a/b/c`)
//! - [`Box3`] — Axis-aligned bounding box with explicit empty-box semantics
//! - [`Matrix4`] — 4×4 affine transform (column-vector convention)
//! - [`Shape`] — Renderable geometry kinds, each with a well-defined local
//!   bound
//! - [`AttributeValue`] — Self-describing attribute payloads

pub mod attribute;
pub mod box3;
pub mod error;
pub mod handle;
pub mod matrix;
pub mod shape;

pub use attribute::AttributeValue;
pub use box3::{Box3, Vec3};
pub use error::HandleError;
pub use handle::ObjectHandle;
pub use matrix::Matrix4;
pub use shape::Shape;
