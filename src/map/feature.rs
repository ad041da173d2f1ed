//! Editable features and their collection handles.

use crate::geometry::Geometry;

/// Attribute payload of a feature, as the remote store serves it.
pub type AttrMap = serde_json::Map<String, serde_json::Value>;

/// Stable handle to a feature inside a [`FeatureSource`].
///
/// Keys are never reused within a source, so a handle held by an undo
/// closure stays valid (or dangling-but-harmless) for the whole session.
///
/// [`FeatureSource`]: super::source::FeatureSource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureKey(pub(crate) u64);

/// A vector feature buffered for editing.
///
/// # Field semantics
///
/// - `id` is `None` for locally created, never-saved features; such a
///   feature is always a "create" at sync time and is hard-removed from
///   the collection if its creation is cancelled.
/// - `deleted` is a soft flag: the feature stays in the collection until
///   session teardown so its undo closure can flip it back.
/// - `revision` starts at 1 and is bumped by the source on every geometry
///   write; `revision > 1` together with a present `id` means "modified".
#[derive(Debug, Clone)]
pub struct Feature {
    pub id: Option<i64>,
    pub layer_id: i64,
    pub geometry: Geometry,
    pub deleted: bool,
    pub attribution: Option<AttrMap>,
    pub revision: u64,
}

impl Feature {
    /// Creates an unsaved feature owned by the given layer.
    pub fn new(layer_id: i64, geometry: Geometry) -> Self {
        Self {
            id: None,
            layer_id,
            geometry,
            deleted: false,
            attribution: None,
            revision: 1,
        }
    }

    /// Creates a feature loaded from the remote store.
    pub fn persisted(id: i64, layer_id: i64, geometry: Geometry) -> Self {
        Self {
            id: Some(id),
            ..Self::new(layer_id, geometry)
        }
    }

    /// True if this feature has geometry changes to push (saved feature
    /// whose geometry was written after load).
    pub fn is_modified(&self) -> bool {
        self.id.is_some() && self.revision > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Coord;

    #[test]
    fn test_new_feature_starts_at_revision_one() {
        let f = Feature::new(7, Geometry::Point(Coord::xy(0.0, 0.0)));
        assert_eq!(f.revision, 1);
        assert_eq!(f.id, None);
        assert!(!f.deleted);
        assert!(!f.is_modified());
    }

    #[test]
    fn test_persisted_feature_not_modified_until_bumped() {
        let mut f = Feature::persisted(12, 7, Geometry::Point(Coord::xy(0.0, 0.0)));
        assert!(!f.is_modified());
        f.revision += 1;
        assert!(f.is_modified());
    }
}
