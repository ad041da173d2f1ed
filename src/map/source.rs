//! The feature collection interactions read and mutate.
//!
//! A `FeatureSource` stands in for the map engine's feature collection:
//! it owns the buffered features, bumps each feature's revision counter on
//! every geometry write, and answers planar hit tests. Sessions may share
//! one physical source (interaction continuity across layers), which is
//! why removal can be scoped to a single `layer_id`.

use super::feature::{AttrMap, Feature, FeatureKey};
use crate::geometry::{Coord, Geometry};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;

/// Reference-shared feature collection.
///
/// The engine is single-threaded; collections are shared by handle, not
/// copied, exactly as the host map engine shares them.
pub type SharedSource = Rc<RefCell<FeatureSource>>;

/// Creates a fresh shared feature collection.
pub fn new_shared_source() -> SharedSource {
    Rc::new(RefCell::new(FeatureSource::new()))
}

/// An ordered collection of editable features.
///
/// Insertion order is preserved; hit tests walk it in reverse so the most
/// recently added feature wins, matching the draw order on screen.
#[derive(Debug, Default)]
pub struct FeatureSource {
    features: IndexMap<FeatureKey, Feature>,
    next_key: u64,
    highlighted: Option<FeatureKey>,
}

impl FeatureSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a feature and returns its stable handle.
    pub fn insert(&mut self, feature: Feature) -> FeatureKey {
        let key = FeatureKey(self.next_key);
        self.next_key += 1;
        self.features.insert(key, feature);
        key
    }

    /// Physically removes a feature (cancelled creations only; committed
    /// deletions use the soft flag instead).
    pub fn remove(&mut self, key: FeatureKey) -> Option<Feature> {
        if self.highlighted == Some(key) {
            self.highlighted = None;
        }
        self.features.shift_remove(&key)
    }

    pub fn feature(&self, key: FeatureKey) -> Option<&Feature> {
        self.features.get(&key)
    }

    pub fn contains(&self, key: FeatureKey) -> bool {
        self.features.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Iterates all features in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (FeatureKey, &Feature)> {
        self.features.iter().map(|(k, f)| (*k, f))
    }

    /// Keys of the features owned by one layer.
    pub fn layer_keys(&self, layer_id: i64) -> Vec<FeatureKey> {
        self.features
            .iter()
            .filter(|(_, f)| f.layer_id == layer_id)
            .map(|(k, _)| *k)
            .collect()
    }

    /// Replaces a feature's geometry, bumping its revision.
    pub fn set_geometry(&mut self, key: FeatureKey, geometry: Geometry) -> bool {
        match self.features.get_mut(&key) {
            Some(f) => {
                f.geometry = geometry;
                f.revision += 1;
                true
            }
            None => false,
        }
    }

    /// Mutates a feature's geometry in place, bumping its revision.
    ///
    /// The revision bump belongs to the engine, not the caller: every
    /// write counts, including undo restores.
    pub fn update_geometry<F: FnOnce(&mut Geometry)>(&mut self, key: FeatureKey, f: F) -> bool {
        match self.features.get_mut(&key) {
            Some(feature) => {
                f(&mut feature.geometry);
                feature.revision += 1;
                true
            }
            None => false,
        }
    }

    /// Sets or clears the soft-delete flag.
    pub fn set_deleted(&mut self, key: FeatureKey, deleted: bool) -> bool {
        match self.features.get_mut(&key) {
            Some(f) => {
                f.deleted = deleted;
                true
            }
            None => false,
        }
    }

    /// Replaces a feature's cached attribute payload.
    pub fn set_attribution(&mut self, key: FeatureKey, attribution: Option<AttrMap>) -> bool {
        match self.features.get_mut(&key) {
            Some(f) => {
                f.attribution = attribution;
                true
            }
            None => false,
        }
    }

    /// The currently hover-highlighted feature, if any.
    pub fn highlighted(&self) -> Option<FeatureKey> {
        self.highlighted
    }

    pub fn set_highlighted(&mut self, key: Option<FeatureKey>) {
        self.highlighted = key;
    }

    /// Topmost live feature within `tolerance` map units of the coordinate.
    ///
    /// Soft-deleted features are invisible to hit tests. `layer_id` scopes
    /// the test to one session's features in a shared collection.
    pub fn hit_test(
        &self,
        coord: &Coord,
        tolerance: f64,
        layer_id: Option<i64>,
    ) -> Option<FeatureKey> {
        self.features
            .iter()
            .rev()
            .filter(|(_, f)| !f.deleted)
            .filter(|(_, f)| layer_id.map_or(true, |id| f.layer_id == id))
            .find(|(_, f)| f.geometry.distance_to(coord) <= tolerance)
            .map(|(k, _)| *k)
    }

    /// Strips only the features tagged with one layer id.
    ///
    /// Used on session teardown in shared-collection mode, where clearing
    /// outright would destroy other sessions' buffers.
    pub fn remove_layer_features(&mut self, layer_id: i64) -> usize {
        let before = self.features.len();
        if let Some(h) = self.highlighted {
            if self.features.get(&h).map(|f| f.layer_id) == Some(layer_id) {
                self.highlighted = None;
            }
        }
        self.features.retain(|_, f| f.layer_id != layer_id);
        before - self.features.len()
    }

    /// Removes every feature.
    pub fn clear(&mut self) {
        self.features.clear();
        self.highlighted = None;
    }
}
