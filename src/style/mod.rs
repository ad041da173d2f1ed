//! Deterministic per-layer styling.
//!
//! Every editable layer gets a stable color triple derived from its layer
//! id alone, so reopening a session (or another client looking at the same
//! layer) always shows the same colors. Hues step around the color wheel by
//! the golden angle, which keeps neighboring layer ids visually distinct.

/// An RGBA color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Returns the same color with a different alpha.
    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// CSS-style `rgba(...)` string, handy for host map styling.
    pub fn to_css(&self) -> String {
        format!(
            "rgba({},{},{},{:.2})",
            self.r,
            self.g,
            self.b,
            self.a as f64 / 255.0
        )
    }
}

/// The color triple applied to one layer's features.
///
/// # Examples
///
/// ```
/// use mapquill::style::LayerStyle;
///
/// let a = LayerStyle::for_layer(42);
/// let b = LayerStyle::for_layer(42);
/// assert_eq!(a.stroke, b.stroke); // stable across calls
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerStyle {
    /// Outline color for strokes and vertex handles.
    pub stroke: Rgba,
    /// Interior fill for areal features.
    pub fill: Rgba,
    /// Interior fill while the feature is hover-highlighted or selected.
    pub fill_selected: Rgba,
}

/// Golden angle in degrees; successive layer ids land far apart on the
/// color wheel.
const HUE_STEP: f64 = 137.508;

const STROKE_ALPHA: u8 = 255;
const FILL_ALPHA: u8 = 77;
const SELECTED_ALPHA: u8 = 128;

impl LayerStyle {
    /// Derives the stable style triple for a layer id.
    ///
    /// The mapping is pure: the same id always yields the same colors.
    pub fn for_layer(layer_id: i64) -> Self {
        let hue = (layer_id.rem_euclid(360) as f64 * HUE_STEP) % 360.0;
        let stroke = hsl_to_rgba(hue, 0.75, 0.42, STROKE_ALPHA);
        let fill = hsl_to_rgba(hue, 0.75, 0.55, FILL_ALPHA);
        let fill_selected = hsl_to_rgba(hue, 0.85, 0.62, SELECTED_ALPHA);
        Self {
            stroke,
            fill,
            fill_selected,
        }
    }

    /// Style for in-progress sketches (draw previews, scratch hole rings).
    ///
    /// Fixed and layer-independent so a half-drawn shape is recognizable
    /// regardless of which layer it will land on.
    pub fn sketch() -> Self {
        Self {
            stroke: Rgba::new(0x33, 0x99, 0xcc, 255),
            fill: Rgba::new(0x33, 0x99, 0xcc, FILL_ALPHA),
            fill_selected: Rgba::new(0x33, 0x99, 0xcc, SELECTED_ALPHA),
        }
    }
}

/// HSL to RGBA conversion (hue in degrees, s/l in 0..=1).
fn hsl_to_rgba(h: f64, s: f64, l: f64, a: u8) -> Rgba {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = h / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r1, g1, b1) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    Rgba::new(
        ((r1 + m) * 255.0).round() as u8,
        ((g1 + m) * 255.0).round() as u8,
        ((b1 + m) * 255.0).round() as u8,
        a,
    )
}
