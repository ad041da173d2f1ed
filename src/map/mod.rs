//! The host map engine surface: features, sources, layers, interactions.
//!
//! The rendering engine is an external collaborator. This module defines
//! the narrow slice the editor consumes: a feature collection with
//! revision counting, vector layers with opacity, pointer-driven
//! interaction objects with activate/deactivate semantics, and the
//! [`MapHost`] trait for layer mounting and pixel conversion.
//!
//! [`MapHost`]: host::MapHost

pub mod feature;
pub mod host;
pub mod interaction;
pub mod layer;
pub mod source;

pub use feature::{AttrMap, Feature, FeatureKey};
pub use host::MapHost;
pub use interaction::{DrawTarget, Interaction, InteractionEvent};
pub use layer::{SharedLayer, VectorLayer};
pub use source::{new_shared_source, FeatureSource, SharedSource};
