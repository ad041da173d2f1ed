//! The surface the host map engine exposes to the editor.

use super::layer::SharedLayer;
use crate::geometry::Coord;

/// What the editing engine needs from the embedding map application.
///
/// The rendering engine itself is an external collaborator; this trait is
/// the entire contract. Pixel conversions exist because edit tolerances
/// (vertex grabs, corner handles, snapping) are specified in screen pixels
/// while geometry lives in map units.
pub trait MapHost {
    /// Mounts a session's vector layer on the map.
    fn add_layer(&self, layer: &SharedLayer);

    /// Removes a session's vector layer from the map.
    fn remove_layer(&self, resource_id: i64);

    /// Asks the map to re-fetch and re-render a layer after a successful
    /// synchronization.
    fn reload_layer(&self, resource_id: i64);

    fn coord_to_pixel(&self, coord: &Coord) -> (f64, f64);

    fn pixel_to_coord(&self, pixel: (f64, f64)) -> Coord;

    /// Map units covered by one screen pixel at the given location.
    ///
    /// Derived from the two conversions; hosts with a constant resolution
    /// can override with a cheaper implementation.
    fn map_units_per_pixel(&self, at: &Coord) -> f64 {
        let p = self.coord_to_pixel(at);
        let shifted = self.pixel_to_coord((p.0 + 1.0, p.1));
        let d = (shifted.x - at.x).abs();
        if d > 0.0 {
            d
        } else {
            1.0
        }
    }
}
