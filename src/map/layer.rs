//! Vector layer presentation state.

use crate::style::LayerStyle;
use std::cell::RefCell;
use std::rc::Rc;

/// Shared handle to a layer, held by the session and the map host.
pub type SharedLayer = Rc<RefCell<VectorLayer>>;

/// Presentation state of one editable layer on the host map.
///
/// The session dims the layer (reduced opacity) whenever it is not the
/// currently enabled one, or has no active edit mode.
#[derive(Debug, Clone)]
pub struct VectorLayer {
    resource_id: i64,
    style: LayerStyle,
    opacity: f64,
    visible: bool,
}

impl VectorLayer {
    /// Creates a layer for a resource with its deterministic style.
    pub fn new(resource_id: i64) -> Self {
        Self {
            resource_id,
            style: LayerStyle::for_layer(resource_id),
            opacity: 1.0,
            visible: true,
        }
    }

    pub fn resource_id(&self) -> i64 {
        self.resource_id
    }

    pub fn style(&self) -> &LayerStyle {
        &self.style
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Sets the layer opacity, clamped to `0.0..=1.0`.
    pub fn set_opacity(&mut self, opacity: f64) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}
