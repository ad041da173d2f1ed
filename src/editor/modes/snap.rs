//! Vertex snapping, attached alongside whichever mode is active.

use crate::editor::context::EditContext;
use crate::map::interaction::Interaction;

/// Registry key of the snap interaction.
pub const SNAP: &str = "snap";

/// Registers the snap interaction. Snapping is orthogonal to the mode
/// state machine, so the session owns its on/off toggle rather than any
/// single mode.
pub fn attach(ctx: &EditContext) {
    ctx.registry.borrow_mut().get(SNAP, Interaction::snap);
}

/// Turns vertex snapping on or off.
pub fn set_enabled(ctx: &EditContext, enabled: bool) {
    ctx.registry.borrow().set_active(SNAP, enabled);
}
