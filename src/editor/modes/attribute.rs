//! Attribute mode: edit feature fields through the host's form.

use super::{EditMode, ModeKey};
use crate::editor::context::{EditContext, FormOutcome};
use crate::map::feature::{AttrMap, FeatureKey};
use crate::map::interaction::{Interaction, InteractionEvent};
use log::warn;

/// Registry key of the click-select interaction.
pub const ATTRIBUTE_CLICK: &str = "attribute-click";
/// Registry key of the companion hover highlight.
pub const ATTRIBUTE_HOVER: &str = "attribute-hover";

/// Click a feature, edit its fields.
///
/// Attributes are fetched lazily: a persisted feature clicked for the
/// first time pulls its fields from the remote store and caches them on
/// the feature, so later clicks (and the final synchronization) reuse
/// the cache. Submitted fields are merged over the cached map, and the
/// pre-edit map is captured for undo.
pub struct AttributeMode;

impl AttributeMode {
    /// Returns the form prefill, fetching and caching remote fields on
    /// first touch of a persisted feature. A failed fetch warns and
    /// yields `None` to signal the edit should be abandoned.
    fn prefill(&self, ctx: &EditContext, key: FeatureKey) -> Option<Option<AttrMap>> {
        let (id, cached) = {
            let source = ctx.source.borrow();
            let feature = source.feature(key)?;
            (feature.id, feature.attribution.clone())
        };
        if let Some(cached) = cached {
            return Some(Some(cached));
        }
        let Some(id) = id else {
            // Fresh feature without a submitted form yet
            return Some(None);
        };
        match ctx.api.fetch_item(ctx.layer_id, id) {
            Ok(fields) => {
                ctx.source
                    .borrow_mut()
                    .set_attribution(key, Some(fields.clone()));
                Some(Some(fields))
            }
            Err(err) => {
                warn!("attribute fetch failed for feature {}: {:#}", id, err);
                ctx.messages.error("Could not load feature attributes");
                None
            }
        }
    }
}

impl EditMode for AttributeMode {
    fn key(&self) -> ModeKey {
        ModeKey::Attribute
    }

    fn attach(&self, ctx: &EditContext) {
        let mut registry = ctx.registry.borrow_mut();
        {
            let source = ctx.source.clone();
            let host = ctx.host.clone();
            let layer_id = ctx.layer_id;
            let tolerance = ctx.config.hit_tolerance_px;
            registry.get(ATTRIBUTE_HOVER, move || {
                Interaction::hover(source, Some(layer_id), host, tolerance)
            });
        }
        {
            let source = ctx.source.clone();
            let host = ctx.host.clone();
            let layer_id = ctx.layer_id;
            let tolerance = ctx.config.hit_tolerance_px;
            registry.get(ATTRIBUTE_CLICK, move || {
                Interaction::select(source, Some(layer_id), host, tolerance)
            });
        }
    }

    fn activate(&self, ctx: &EditContext) {
        let registry = ctx.registry.borrow();
        registry.set_active(ATTRIBUTE_HOVER, true);
        registry.set_active(ATTRIBUTE_CLICK, true);
    }

    fn deactivate(&self, ctx: &EditContext) {
        let registry = ctx.registry.borrow();
        registry.set_active(ATTRIBUTE_CLICK, false);
        registry.set_active(ATTRIBUTE_HOVER, false);
    }

    fn handle(&self, ctx: &EditContext, interaction: &str, event: &InteractionEvent) {
        if interaction != ATTRIBUTE_CLICK {
            return;
        }
        let InteractionEvent::Clicked { key: Some(key), .. } = event else {
            return;
        };
        let key = *key;
        let Some(prefill) = self.prefill(ctx, key) else {
            return;
        };

        match ctx.dialogs.feature_form(ctx.layer_id, prefill.as_ref()) {
            FormOutcome::Submitted(fields) => {
                let previous = ctx
                    .source
                    .borrow()
                    .feature(key)
                    .and_then(|f| f.attribution.clone());
                let mut merged = previous.clone().unwrap_or_default();
                for (name, value) in fields {
                    merged.insert(name, value);
                }
                ctx.source.borrow_mut().set_attribution(key, Some(merged));
                let source = ctx.source.clone();
                ctx.add_undo(move || {
                    source.borrow_mut().set_attribution(key, previous);
                });
            }
            FormOutcome::Cancelled | FormOutcome::Unavailable => {}
        }
    }
}
