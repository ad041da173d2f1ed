//! Remote feature store surface.
//!
//! The HTTP API itself belongs to the embedding application; this module
//! defines the exchange types and the [`FeatureApi`] trait the engine
//! calls through. Geometries cross the boundary as WKT text.

use crate::geometry::wkt::parse_geometry_type;
use crate::geometry::{CoordLayout, GeometryKind};
use crate::map::feature::AttrMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Geometry kind and coordinate layout of a feature layer.
///
/// Loaded once from the resource's metadata and immutable for the life
/// of an edit session.
///
/// # Examples
///
/// ```
/// use mapquill::api::client::GeomConfig;
/// use mapquill::geometry::{CoordLayout, GeometryKind};
///
/// let config = GeomConfig::parse("MULTIPOLYGONZ").unwrap();
/// assert_eq!(config.kind, GeometryKind::MultiPolygon);
/// assert_eq!(config.layout, CoordLayout::Xyz);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeomConfig {
    pub kind: GeometryKind,
    pub layout: CoordLayout,
}

impl GeomConfig {
    /// Parses a metadata geometry-type string like `POINT`, `LINESTRINGZ`
    /// or `MULTIPOLYGONZM`.
    pub fn parse(type_string: &str) -> Option<Self> {
        let (kind, layout) = parse_geometry_type(type_string)?;
        Some(Self { kind, layout })
    }
}

impl fmt::Display for GeomConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.wkt_name(), self.layout.wkt_tag())
    }
}

/// One feature from the geometry-only listing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureItem {
    pub id: i64,
    /// WKT geometry text.
    pub geom: String,
}

/// One feature in a patch or delete request body.
///
/// Derived fresh at each synchronization, never stored. `id` is omitted
/// from the serialized form for creations; attribute fields are flattened
/// beside `geom` as the store expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureToSave {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub geom: String,
    #[serde(flatten)]
    pub fields: AttrMap,
}

/// The remote feature and resource API, as the engine consumes it.
///
/// Implementations wrap the host application's HTTP client. Every method
/// is a suspension point in the original event loop; results are errors
/// or data, and cancellation is handled by the caller discarding stale
/// results (see the session's load tickets).
pub trait FeatureApi {
    /// Fetches a resource's geometry-type metadata.
    ///
    /// Fails when the resource is not a feature layer or the request
    /// itself fails; the coordinator then aborts session creation.
    fn layer_metadata(&self, resource_id: i64) -> anyhow::Result<GeomConfig>;

    /// Fetches existing features with a geometry-only payload (no
    /// fields, no extensions).
    fn fetch_features(&self, resource_id: i64) -> anyhow::Result<Vec<FeatureItem>>;

    /// Fetches one feature's attribute payload, used to pre-fill the
    /// attribute-entry form on first edit.
    fn fetch_item(&self, resource_id: i64, feature_id: i64) -> anyhow::Result<AttrMap>;

    /// Creates and updates features in one batch.
    fn patch_features(&self, resource_id: i64, features: &[FeatureToSave]) -> anyhow::Result<()>;

    /// Removes features in one batch.
    fn delete_features(&self, resource_id: i64, features: &[FeatureToSave]) -> anyhow::Result<()>;
}

/// Outbound notifications after a successful synchronization.
pub trait Notifier {
    /// Tells any open attribute-table view for the resource to re-fetch.
    fn feature_table_refresh(&self, resource_id: i64);
}
