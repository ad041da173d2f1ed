//! Geometry model for editable vector features.
//!
//! Geometries are plain owned values; the map engine's feature collection
//! holds one per feature and mutates it in place as interactions run. Undo
//! snapshots must therefore `clone()` before capture — a snapshot taken by
//! reference would mutate along with the live object.
//!
//! A [`Ring`] is a closed coordinate loop: the first coordinate equals the
//! last. The first ring of a polygon is its outer boundary; every
//! subsequent ring is a hole.

use super::coords::Coord;
use std::fmt;

/// A closed coordinate loop (first coordinate == last).
pub type Ring = Vec<Coord>;

/// The closed set of geometry kinds the remote feature store serves.
///
/// # Examples
///
/// ```
/// use mapquill::geometry::types::GeometryKind;
///
/// assert_eq!(GeometryKind::parse("POLYGON"), Some(GeometryKind::Polygon));
/// assert!(GeometryKind::MultiPolygon.is_areal());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
}

impl GeometryKind {
    /// Parses a bare kind name (no dimension suffix).
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "POINT" => Some(GeometryKind::Point),
            "LINESTRING" => Some(GeometryKind::LineString),
            "POLYGON" => Some(GeometryKind::Polygon),
            "MULTIPOINT" => Some(GeometryKind::MultiPoint),
            "MULTILINESTRING" => Some(GeometryKind::MultiLineString),
            "MULTIPOLYGON" => Some(GeometryKind::MultiPolygon),
            _ => None,
        }
    }

    /// Returns the WKT keyword for this kind.
    pub fn wkt_name(&self) -> &'static str {
        match self {
            GeometryKind::Point => "POINT",
            GeometryKind::LineString => "LINESTRING",
            GeometryKind::Polygon => "POLYGON",
            GeometryKind::MultiPoint => "MULTIPOINT",
            GeometryKind::MultiLineString => "MULTILINESTRING",
            GeometryKind::MultiPolygon => "MULTIPOLYGON",
        }
    }

    /// True for polygonal kinds (the only ones that can host holes).
    pub fn is_areal(&self) -> bool {
        matches!(self, GeometryKind::Polygon | GeometryKind::MultiPolygon)
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.wkt_name())
    }
}

/// A vector geometry.
///
/// Cloning is a deep copy; every undo snapshot relies on that.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Coord),
    LineString(Vec<Coord>),
    Polygon(Vec<Ring>),
    MultiPoint(Vec<Coord>),
    MultiLineString(Vec<Vec<Coord>>),
    MultiPolygon(Vec<Vec<Ring>>),
}

impl Geometry {
    /// Returns the kind of this geometry.
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point(_) => GeometryKind::Point,
            Geometry::LineString(_) => GeometryKind::LineString,
            Geometry::Polygon(_) => GeometryKind::Polygon,
            Geometry::MultiPoint(_) => GeometryKind::MultiPoint,
            Geometry::MultiLineString(_) => GeometryKind::MultiLineString,
            Geometry::MultiPolygon(_) => GeometryKind::MultiPolygon,
        }
    }

    /// Shifts every coordinate by the given planar delta.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.map_coords(|c| c.translated(dx, dy));
    }

    /// Applies `f` to every coordinate in place.
    pub fn map_coords<F: Fn(&Coord) -> Coord>(&mut self, f: F) {
        match self {
            Geometry::Point(c) => *c = f(c),
            Geometry::LineString(cs) | Geometry::MultiPoint(cs) => {
                for c in cs.iter_mut() {
                    *c = f(c);
                }
            }
            Geometry::Polygon(rings) | Geometry::MultiLineString(rings) => {
                for ring in rings.iter_mut() {
                    for c in ring.iter_mut() {
                        *c = f(c);
                    }
                }
            }
            Geometry::MultiPolygon(polys) => {
                for rings in polys.iter_mut() {
                    for ring in rings.iter_mut() {
                        for c in ring.iter_mut() {
                            *c = f(c);
                        }
                    }
                }
            }
        }
    }

    /// Flattened list of every coordinate, in ring/part order.
    pub fn vertices(&self) -> Vec<Coord> {
        let mut out = Vec::new();
        match self {
            Geometry::Point(c) => out.push(*c),
            Geometry::LineString(cs) | Geometry::MultiPoint(cs) => out.extend(cs.iter().copied()),
            Geometry::Polygon(rings) | Geometry::MultiLineString(rings) => {
                for ring in rings {
                    out.extend(ring.iter().copied());
                }
            }
            Geometry::MultiPolygon(polys) => {
                for rings in polys {
                    for ring in rings {
                        out.extend(ring.iter().copied());
                    }
                }
            }
        }
        out
    }

    /// Replaces the vertex at a flattened index (same order as
    /// [`Geometry::vertices`]).
    ///
    /// When the vertex is the shared first/last coordinate of a ring, both
    /// copies are updated so the ring stays closed.
    pub fn set_vertex(&mut self, index: usize, coord: Coord) -> bool {
        fn set_in_line(cs: &mut [Coord], index: usize, coord: Coord) -> bool {
            if let Some(c) = cs.get_mut(index) {
                *c = coord;
                true
            } else {
                false
            }
        }

        fn set_in_ring(ring: &mut [Coord], index: usize, coord: Coord) -> bool {
            let len = ring.len();
            if index >= len {
                return false;
            }
            ring[index] = coord;
            // Keep the loop closed
            if index == 0 && len > 1 {
                ring[len - 1] = coord;
            } else if index == len - 1 && len > 1 {
                ring[0] = coord;
            }
            true
        }

        let mut offset = index;
        match self {
            Geometry::Point(c) => {
                if offset == 0 {
                    *c = coord;
                    return true;
                }
                false
            }
            Geometry::LineString(cs) | Geometry::MultiPoint(cs) => set_in_line(cs, offset, coord),
            Geometry::Polygon(rings) => {
                for ring in rings.iter_mut() {
                    if offset < ring.len() {
                        return set_in_ring(ring, offset, coord);
                    }
                    offset -= ring.len();
                }
                false
            }
            Geometry::MultiLineString(lines) => {
                for line in lines.iter_mut() {
                    if offset < line.len() {
                        return set_in_line(line, offset, coord);
                    }
                    offset -= line.len();
                }
                false
            }
            Geometry::MultiPolygon(polys) => {
                for rings in polys.iter_mut() {
                    for ring in rings.iter_mut() {
                        if offset < ring.len() {
                            return set_in_ring(ring, offset, coord);
                        }
                        offset -= ring.len();
                    }
                }
                false
            }
        }
    }

    /// True if the coordinate lies inside this geometry's area.
    ///
    /// Polygons are hole-aware: a point inside an interior ring is outside
    /// the polygon. Non-areal geometries always return false.
    pub fn contains(&self, coord: &Coord) -> bool {
        match self {
            Geometry::Polygon(rings) => polygon_contains(rings, coord),
            Geometry::MultiPolygon(polys) => polys.iter().any(|rings| polygon_contains(rings, coord)),
            _ => false,
        }
    }

    /// Planar distance from the coordinate to the nearest point of this
    /// geometry. Zero when the coordinate is inside an areal geometry.
    pub fn distance_to(&self, coord: &Coord) -> f64 {
        if self.contains(coord) {
            return 0.0;
        }
        let mut best = f64::INFINITY;
        let mut consider_segments = |cs: &[Coord], closed: bool| {
            if cs.len() == 1 {
                best = best.min(cs[0].distance_sq(coord).sqrt());
                return;
            }
            let last = if closed { cs.len() } else { cs.len().saturating_sub(1) };
            for i in 0..last {
                let a = &cs[i];
                let b = &cs[(i + 1) % cs.len()];
                best = best.min(segment_distance(a, b, coord));
            }
        };
        match self {
            Geometry::Point(c) => best = c.distance_sq(coord).sqrt(),
            Geometry::MultiPoint(cs) => {
                for c in cs {
                    best = best.min(c.distance_sq(coord).sqrt());
                }
            }
            Geometry::LineString(cs) => consider_segments(cs, false),
            Geometry::MultiLineString(lines) => {
                for line in lines {
                    consider_segments(line, false);
                }
            }
            Geometry::Polygon(rings) => {
                for ring in rings {
                    consider_segments(ring, true);
                }
            }
            Geometry::MultiPolygon(polys) => {
                for rings in polys {
                    for ring in rings {
                        consider_segments(ring, true);
                    }
                }
            }
        }
        best
    }

    /// Appends an interior ring to a polygon.
    ///
    /// Only valid on `Polygon`; callers targeting a `MultiPolygon` must
    /// pick the member first (see the hole-cut mode).
    pub fn push_interior_ring(&mut self, ring: Ring) -> bool {
        match self {
            Geometry::Polygon(rings) => {
                rings.push(ring);
                true
            }
            _ => false,
        }
    }
}

/// Ray-cast point-in-ring test.
///
/// A point exactly on an edge may land on either side; edit tolerances are
/// handled at the hit-testing layer, not here.
pub fn ring_contains(ring: &[Coord], coord: &Coord) -> bool {
    let mut inside = false;
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = (ring[i].x, ring[i].y);
        let (xj, yj) = (ring[j].x, ring[j].y);
        if ((yi > coord.y) != (yj > coord.y))
            && (coord.x < (xj - xi) * (coord.y - yi) / (yj - yi) + xi)
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Hole-aware polygon containment: inside the outer ring and outside every
/// interior ring.
pub fn polygon_contains(rings: &[Ring], coord: &Coord) -> bool {
    match rings.split_first() {
        Some((outer, holes)) => {
            ring_contains(outer, coord) && !holes.iter().any(|h| ring_contains(h, coord))
        }
        None => false,
    }
}

/// Ensures a coordinate loop is closed, appending the first coordinate if
/// needed.
pub fn close_ring(mut coords: Vec<Coord>) -> Ring {
    if let (Some(first), Some(last)) = (coords.first().copied(), coords.last()) {
        if first != *last {
            coords.push(first);
        }
    }
    coords
}

fn segment_distance(a: &Coord, b: &Coord, p: &Coord) -> f64 {
    let len_sq = a.distance_sq(b);
    if len_sq == 0.0 {
        return a.distance_sq(p).sqrt();
    }
    let t = ((p.x - a.x) * (b.x - a.x) + (p.y - a.y) * (b.y - a.y)) / len_sq;
    let t = t.clamp(0.0, 1.0);
    let proj = Coord::xy(a.x + t * (b.x - a.x), a.y + t * (b.y - a.y));
    proj.distance_sq(p).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Ring {
        vec![
            Coord::xy(x0, y0),
            Coord::xy(x1, y0),
            Coord::xy(x1, y1),
            Coord::xy(x0, y1),
            Coord::xy(x0, y0),
        ]
    }

    #[test]
    fn test_ring_contains_inside_and_outside() {
        let ring = square(0.0, 0.0, 10.0, 10.0);
        assert!(ring_contains(&ring, &Coord::xy(5.0, 5.0)));
        assert!(!ring_contains(&ring, &Coord::xy(15.0, 5.0)));
        assert!(!ring_contains(&ring, &Coord::xy(-1.0, -1.0)));
    }

    #[test]
    fn test_polygon_contains_respects_holes() {
        let rings = vec![square(0.0, 0.0, 10.0, 10.0), square(4.0, 4.0, 6.0, 6.0)];
        assert!(polygon_contains(&rings, &Coord::xy(2.0, 2.0)));
        // Inside the hole is outside the polygon
        assert!(!polygon_contains(&rings, &Coord::xy(5.0, 5.0)));
    }

    #[test]
    fn test_multipolygon_contains() {
        let geom = Geometry::MultiPolygon(vec![
            vec![square(0.0, 0.0, 10.0, 10.0)],
            vec![square(20.0, 0.0, 30.0, 10.0)],
        ]);
        assert!(geom.contains(&Coord::xy(25.0, 5.0)));
        assert!(geom.contains(&Coord::xy(5.0, 5.0)));
        assert!(!geom.contains(&Coord::xy(15.0, 5.0)));
    }

    #[test]
    fn test_translate_polygon() {
        let mut geom = Geometry::Polygon(vec![square(0.0, 0.0, 10.0, 10.0)]);
        geom.translate(5.0, 5.0);
        assert!(geom.contains(&Coord::xy(14.0, 14.0)));
        assert!(!geom.contains(&Coord::xy(1.0, 1.0)));
    }

    #[test]
    fn test_set_vertex_keeps_ring_closed() {
        let mut geom = Geometry::Polygon(vec![square(0.0, 0.0, 10.0, 10.0)]);
        assert!(geom.set_vertex(0, Coord::xy(-5.0, -5.0)));
        if let Geometry::Polygon(rings) = &geom {
            assert_eq!(rings[0][0], Coord::xy(-5.0, -5.0));
            assert_eq!(rings[0][4], Coord::xy(-5.0, -5.0));
        } else {
            panic!("expected polygon");
        }
    }

    #[test]
    fn test_set_vertex_out_of_range() {
        let mut geom = Geometry::Point(Coord::xy(1.0, 1.0));
        assert!(!geom.set_vertex(1, Coord::xy(2.0, 2.0)));
    }

    #[test]
    fn test_distance_to_linestring() {
        let geom = Geometry::LineString(vec![Coord::xy(0.0, 0.0), Coord::xy(10.0, 0.0)]);
        assert_eq!(geom.distance_to(&Coord::xy(5.0, 3.0)), 3.0);
        assert_eq!(geom.distance_to(&Coord::xy(12.0, 0.0)), 2.0);
    }

    #[test]
    fn test_close_ring_appends_first_coord() {
        let open = vec![Coord::xy(0.0, 0.0), Coord::xy(1.0, 0.0), Coord::xy(1.0, 1.0)];
        let closed = close_ring(open);
        assert_eq!(closed.len(), 4);
        assert_eq!(closed[0], closed[3]);
    }

    #[test]
    fn test_push_interior_ring() {
        let mut geom = Geometry::Polygon(vec![square(0.0, 0.0, 10.0, 10.0)]);
        assert!(geom.push_interior_ring(square(2.0, 2.0, 4.0, 4.0)));
        if let Geometry::Polygon(rings) = &geom {
            assert_eq!(rings.len(), 2);
        }
        let mut point = Geometry::Point(Coord::xy(0.0, 0.0));
        assert!(!point.push_interior_ring(square(0.0, 0.0, 1.0, 1.0)));
    }
}
