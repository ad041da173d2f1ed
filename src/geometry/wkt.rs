//! Well-known text reading and writing.
//!
//! WKT is the textual exchange format the remote feature store speaks:
//! feature listings arrive as WKT strings and patch/delete bodies carry
//! WKT back. The parser is a small recursive-descent scanner; the writer
//! renders coordinates with the shortest representation that round-trips.

use super::coords::{Coord, CoordLayout};
use super::types::{Geometry, GeometryKind, Ring};
use std::fmt;

/// Errors that can occur while parsing WKT.
#[derive(Debug, Clone, PartialEq)]
pub enum WktError {
    /// Unexpected character at a specific position.
    UnexpectedToken {
        position: usize,
        found: String,
        expected: String,
    },
    /// Input ended while more was expected.
    UnexpectedEnd { expected: String },
    /// Structurally invalid geometry (unknown kind, wrong arity, ...).
    InvalidGeometry { message: String },
}

impl fmt::Display for WktError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WktError::UnexpectedToken {
                position,
                found,
                expected,
            } => write!(
                f,
                "Unexpected token '{}' at position {}, expected {}",
                found, position, expected
            ),
            WktError::UnexpectedEnd { expected } => {
                write!(f, "Unexpected end of input, expected {}", expected)
            }
            WktError::InvalidGeometry { message } => {
                write!(f, "Invalid WKT geometry: {}", message)
            }
        }
    }
}

impl std::error::Error for WktError {}

/// Parses a WKT string into a geometry and its coordinate layout.
///
/// The layout comes from the dimension tag (`Z`, `M`, `ZM`) when present;
/// untagged input with three values per coordinate is read as XYZ, which is
/// how the remote store serializes 3D layers.
///
/// # Examples
///
/// ```
/// use mapquill::geometry::wkt::parse_wkt;
/// use mapquill::geometry::coords::CoordLayout;
///
/// let (geom, layout) = parse_wkt("POINT (30 10)").unwrap();
/// assert_eq!(layout, CoordLayout::Xy);
/// assert_eq!(geom.vertices().len(), 1);
/// ```
pub fn parse_wkt(input: &str) -> Result<(Geometry, CoordLayout), WktError> {
    let mut parser = WktParser::new(input);
    let result = parser.parse_geometry()?;
    parser.skip_whitespace();
    if !parser.is_eof() {
        return Err(WktError::UnexpectedToken {
            position: parser.position,
            found: parser.peek().map(|c| c.to_string()).unwrap_or_default(),
            expected: "end of input".to_string(),
        });
    }
    Ok(result)
}

/// Renders a geometry as WKT with the given coordinate layout.
pub fn write_wkt(geometry: &Geometry, layout: CoordLayout) -> String {
    let tag = layout.wkt_tag();
    let prefix = if tag.is_empty() {
        geometry.kind().wkt_name().to_string()
    } else {
        format!("{} {}", geometry.kind().wkt_name(), tag)
    };
    let body = match geometry {
        Geometry::Point(c) => format!("({})", write_coord(c, layout)),
        Geometry::LineString(cs) => write_coord_seq(cs, layout),
        Geometry::Polygon(rings) => write_ring_seq(rings, layout),
        Geometry::MultiPoint(cs) => write_coord_seq(cs, layout),
        Geometry::MultiLineString(lines) => {
            let parts: Vec<String> = lines.iter().map(|l| write_coord_seq(l, layout)).collect();
            format!("({})", parts.join(", "))
        }
        Geometry::MultiPolygon(polys) => {
            let parts: Vec<String> = polys.iter().map(|p| write_ring_seq(p, layout)).collect();
            format!("({})", parts.join(", "))
        }
    };
    format!("{} {}", prefix, body)
}

fn write_coord(c: &Coord, layout: CoordLayout) -> String {
    let mut out = format!("{} {}", fmt_num(c.x), fmt_num(c.y));
    if layout.has_z() {
        out.push(' ');
        out.push_str(&fmt_num(c.z.unwrap_or(0.0)));
    }
    if layout.has_m() {
        out.push(' ');
        out.push_str(&fmt_num(c.m.unwrap_or(0.0)));
    }
    out
}

fn write_coord_seq(coords: &[Coord], layout: CoordLayout) -> String {
    let parts: Vec<String> = coords.iter().map(|c| write_coord(c, layout)).collect();
    format!("({})", parts.join(", "))
}

fn write_ring_seq(rings: &[Ring], layout: CoordLayout) -> String {
    let parts: Vec<String> = rings.iter().map(|r| write_coord_seq(r, layout)).collect();
    format!("({})", parts.join(", "))
}

/// Formats a number without a trailing `.0` for integral values.
fn fmt_num(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}

/// Recursive-descent WKT parser.
struct WktParser {
    input: String,
    position: usize,
}

impl WktParser {
    fn new(input: &str) -> Self {
        Self {
            input: input.to_string(),
            position: 0,
        }
    }

    fn parse_geometry(&mut self) -> Result<(Geometry, CoordLayout), WktError> {
        self.skip_whitespace();
        let keyword = self.parse_keyword()?;
        let (kind_name, mut layout) = split_dimension_tag(&keyword).ok_or_else(|| {
            WktError::InvalidGeometry {
                message: format!("unknown geometry type '{}'", keyword),
            }
        })?;
        let kind = GeometryKind::parse(kind_name).ok_or_else(|| WktError::InvalidGeometry {
            message: format!("unknown geometry type '{}'", keyword),
        })?;

        // A separate dimension word may follow: "POINT Z (...)"
        self.skip_whitespace();
        if layout == CoordLayout::Xy {
            if let Some(tag) = self.try_parse_dimension_word() {
                layout = tag;
            }
        }

        let mut explicit = layout != CoordLayout::Xy;
        let geometry = match kind {
            GeometryKind::Point => {
                let coords = self.parse_coord_list(&mut layout, &mut explicit)?;
                if coords.len() != 1 {
                    return Err(WktError::InvalidGeometry {
                        message: format!("POINT must have exactly one coordinate, got {}", coords.len()),
                    });
                }
                Geometry::Point(coords[0])
            }
            GeometryKind::LineString => {
                Geometry::LineString(self.parse_coord_list(&mut layout, &mut explicit)?)
            }
            GeometryKind::MultiPoint => {
                Geometry::MultiPoint(self.parse_coord_list(&mut layout, &mut explicit)?)
            }
            GeometryKind::Polygon => {
                Geometry::Polygon(self.parse_ring_list(&mut layout, &mut explicit)?)
            }
            GeometryKind::MultiLineString => {
                Geometry::MultiLineString(self.parse_ring_list(&mut layout, &mut explicit)?)
            }
            GeometryKind::MultiPolygon => {
                self.expect('(')?;
                let mut polys = Vec::new();
                loop {
                    polys.push(self.parse_ring_list(&mut layout, &mut explicit)?);
                    self.skip_whitespace();
                    match self.peek() {
                        Some(',') => {
                            self.next();
                        }
                        _ => break,
                    }
                }
                self.expect(')')?;
                Geometry::MultiPolygon(polys)
            }
        };
        Ok((geometry, layout))
    }

    /// Parses a parenthesized list of coordinates.
    fn parse_coord_list(
        &mut self,
        layout: &mut CoordLayout,
        explicit: &mut bool,
    ) -> Result<Vec<Coord>, WktError> {
        self.expect('(')?;
        let mut coords = Vec::new();
        loop {
            self.skip_whitespace();
            // MULTIPOINT allows nested parens around each coordinate
            let nested = self.peek() == Some('(');
            if nested {
                self.next();
            }
            coords.push(self.parse_coord(layout, explicit)?);
            if nested {
                self.expect(')')?;
            }
            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.next();
                }
                _ => break,
            }
        }
        self.expect(')')?;
        Ok(coords)
    }

    fn parse_ring_list(
        &mut self,
        layout: &mut CoordLayout,
        explicit: &mut bool,
    ) -> Result<Vec<Ring>, WktError> {
        self.expect('(')?;
        let mut rings = Vec::new();
        loop {
            rings.push(self.parse_coord_list(layout, explicit)?);
            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.next();
                }
                _ => break,
            }
        }
        self.expect(')')?;
        Ok(rings)
    }

    /// Parses one whitespace-separated coordinate tuple.
    ///
    /// Without an explicit dimension tag, a third value promotes the whole
    /// geometry's layout to XYZ.
    fn parse_coord(
        &mut self,
        layout: &mut CoordLayout,
        explicit: &mut bool,
    ) -> Result<Coord, WktError> {
        let x = self.parse_number()?;
        let y = self.parse_number()?;
        let mut extras = Vec::new();
        while extras.len() < 2 {
            self.skip_whitespace();
            match self.peek() {
                Some(c) if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => {
                    extras.push(self.parse_number()?);
                }
                _ => break,
            }
        }
        if !*explicit {
            *layout = match extras.len() {
                0 => CoordLayout::Xy,
                1 => CoordLayout::Xyz,
                _ => CoordLayout::Xyzm,
            };
            *explicit = true;
        }
        let expected_extras = layout.dimensions() - 2;
        if extras.len() != expected_extras {
            return Err(WktError::InvalidGeometry {
                message: format!(
                    "coordinate has {} values but layout {} expects {}",
                    2 + extras.len(),
                    layout,
                    layout.dimensions()
                ),
            });
        }
        let mut z = None;
        let mut m = None;
        let mut it = extras.into_iter();
        if layout.has_z() {
            z = it.next();
        }
        if layout.has_m() {
            m = it.next();
        }
        Ok(Coord { x, y, z, m })
    }

    fn parse_number(&mut self) -> Result<f64, WktError> {
        self.skip_whitespace();
        let start = self.position;
        let mut text = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() || ch == '-' || ch == '+' || ch == '.' || ch == 'e' || ch == 'E' {
                text.push(ch);
                self.next();
            } else {
                break;
            }
        }
        if text.is_empty() {
            return match self.peek() {
                Some(ch) => Err(WktError::UnexpectedToken {
                    position: start,
                    found: ch.to_string(),
                    expected: "number".to_string(),
                }),
                None => Err(WktError::UnexpectedEnd {
                    expected: "number".to_string(),
                }),
            };
        }
        text.parse::<f64>().map_err(|_| WktError::InvalidGeometry {
            message: format!("invalid number '{}'", text),
        })
    }

    fn parse_keyword(&mut self) -> Result<String, WktError> {
        self.skip_whitespace();
        let mut word = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphabetic() {
                word.push(ch.to_ascii_uppercase());
                self.next();
            } else {
                break;
            }
        }
        if word.is_empty() {
            Err(WktError::UnexpectedEnd {
                expected: "geometry keyword".to_string(),
            })
        } else {
            Ok(word)
        }
    }

    /// Consumes a standalone `Z`/`M`/`ZM` word if one is next.
    fn try_parse_dimension_word(&mut self) -> Option<CoordLayout> {
        let saved = self.position;
        let mut word = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphabetic() {
                word.push(ch.to_ascii_uppercase());
                self.next();
            } else {
                break;
            }
        }
        match CoordLayout::from_suffix(&word) {
            Some(layout) if !word.is_empty() => Some(layout),
            _ => {
                self.position = saved;
                None
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn next(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.next();
            } else {
                break;
            }
        }
    }

    fn is_eof(&self) -> bool {
        self.position >= self.input.len()
    }

    fn expect(&mut self, expected: char) -> Result<(), WktError> {
        self.skip_whitespace();
        let pos = self.position;
        match self.next() {
            Some(ch) if ch == expected => Ok(()),
            Some(ch) => Err(WktError::UnexpectedToken {
                position: pos,
                found: ch.to_string(),
                expected: format!("'{}'", expected),
            }),
            None => Err(WktError::UnexpectedEnd {
                expected: format!("'{}'", expected),
            }),
        }
    }
}

/// Splits a metadata geometry-type string like `MULTIPOLYGONZ` into its
/// kind and coordinate layout.
pub fn parse_geometry_type(type_string: &str) -> Option<(GeometryKind, CoordLayout)> {
    let upper = type_string.trim().to_ascii_uppercase();
    let (name, layout) = split_dimension_tag(&upper)?;
    GeometryKind::parse(name).map(|kind| (kind, layout))
}

/// Splits a combined keyword like `POINTZ` into kind name and layout.
fn split_dimension_tag(keyword: &str) -> Option<(&str, CoordLayout)> {
    for suffix in ["ZM", "Z", "M", ""] {
        if let Some(name) = keyword.strip_suffix(suffix) {
            if GeometryKind::parse(name).is_some() {
                return CoordLayout::from_suffix(suffix).map(|layout| (name, layout));
            }
        }
    }
    None
}
