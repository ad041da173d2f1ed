//! Coordinates and coordinate layouts.
//!
//! The remote feature store describes each layer's geometry type with an
//! optional dimension suffix (`Z`, `M`, or `ZM`). Every coordinate in a
//! session carries the same layout, decided once when the layer's metadata
//! is loaded.

use std::fmt;

/// Coordinate layout of a feature layer.
///
/// Decided once per layer from its geometry-type metadata and immutable for
/// the life of an edit session.
///
/// # Examples
///
/// ```
/// use mapquill::geometry::coords::CoordLayout;
///
/// assert_eq!(CoordLayout::from_suffix(""), Some(CoordLayout::Xy));
/// assert_eq!(CoordLayout::from_suffix("ZM"), Some(CoordLayout::Xyzm));
/// assert_eq!(CoordLayout::Xyz.dimensions(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordLayout {
    /// Plain 2D coordinates.
    Xy,
    /// 2D coordinates with a measure value.
    Xym,
    /// 3D coordinates.
    Xyz,
    /// 3D coordinates with a measure value.
    Xyzm,
}

impl CoordLayout {
    /// Parses a layout from the dimension suffix of a geometry-type string.
    ///
    /// Returns `None` for unrecognized suffixes.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "" => Some(CoordLayout::Xy),
            "M" => Some(CoordLayout::Xym),
            "Z" => Some(CoordLayout::Xyz),
            "ZM" => Some(CoordLayout::Xyzm),
            _ => None,
        }
    }

    /// Returns the number of values per coordinate (2, 3, or 4).
    pub fn dimensions(&self) -> usize {
        match self {
            CoordLayout::Xy => 2,
            CoordLayout::Xym | CoordLayout::Xyz => 3,
            CoordLayout::Xyzm => 4,
        }
    }

    /// Returns true if coordinates in this layout carry a Z value.
    pub fn has_z(&self) -> bool {
        matches!(self, CoordLayout::Xyz | CoordLayout::Xyzm)
    }

    /// Returns true if coordinates in this layout carry an M value.
    pub fn has_m(&self) -> bool {
        matches!(self, CoordLayout::Xym | CoordLayout::Xyzm)
    }

    /// Returns the WKT dimension tag for this layout (`"Z"`, `"M"`, `"ZM"`,
    /// or the empty string for plain 2D).
    pub fn wkt_tag(&self) -> &'static str {
        match self {
            CoordLayout::Xy => "",
            CoordLayout::Xym => "M",
            CoordLayout::Xyz => "Z",
            CoordLayout::Xyzm => "ZM",
        }
    }
}

impl Default for CoordLayout {
    fn default() -> Self {
        CoordLayout::Xy
    }
}

impl fmt::Display for CoordLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordLayout::Xy => write!(f, "XY"),
            CoordLayout::Xym => write!(f, "XYM"),
            CoordLayout::Xyz => write!(f, "XYZ"),
            CoordLayout::Xyzm => write!(f, "XYZM"),
        }
    }
}

/// A single coordinate.
///
/// `z` and `m` are populated according to the owning layer's [`CoordLayout`];
/// a plain 2D layer leaves both `None`.
///
/// # Examples
///
/// ```
/// use mapquill::geometry::coords::Coord;
///
/// let a = Coord::xy(10.0, 20.0);
/// let b = a.translated(5.0, -5.0);
/// assert_eq!(b.x, 15.0);
/// assert_eq!(b.y, 15.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
    pub m: Option<f64>,
}

impl Coord {
    /// Creates a plain 2D coordinate.
    pub fn xy(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: None,
            m: None,
        }
    }

    /// Creates a 3D coordinate.
    pub fn xyz(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z: Some(z),
            m: None,
        }
    }

    /// Returns a copy shifted by the given planar delta.
    ///
    /// Z and M values are carried through unchanged; translation is a
    /// planar operation.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z,
            m: self.m,
        }
    }

    /// Squared planar distance to another coordinate.
    pub fn distance_sq(&self, other: &Coord) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}
