//! Geometry model and well-known text exchange.
//!
//! This module provides the coordinate and geometry types the editing
//! engine mutates in place, plus the WKT reader/writer used to exchange
//! geometries with the remote feature store.
//!
//! # Modules
//!
//! - `coords`: coordinate values and per-layer coordinate layouts
//! - `types`: the geometry enum and its planar predicates
//! - `wkt`: well-known text parsing and rendering

pub mod coords;
pub mod types;
pub mod wkt;

pub use coords::{Coord, CoordLayout};
pub use types::{Geometry, GeometryKind, Ring};
