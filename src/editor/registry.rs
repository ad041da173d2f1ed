//! Construct-once cache of interaction objects.

use crate::map::interaction::Interaction;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;

/// Per-session cache of interactions keyed by a logical name.
///
/// An interaction is constructed the first time its key is requested and
/// then only ever toggled, never rebuilt: rebuilding a live interaction
/// against the same feature collection mid-edit introduces rendering and
/// event-ordering glitches on the host engine. Entries are disposed
/// exhaustively at session teardown so no event listeners leak.
///
/// Insertion order is preserved; the session routes pointer events
/// through entries in that order, which gives modes a deterministic way
/// to sequence their interactions (e.g. a hover probe registered before
/// a draw).
#[derive(Default)]
pub struct InteractionRegistry {
    entries: IndexMap<String, Rc<RefCell<Interaction>>>,
}

impl InteractionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the interaction for `key`, constructing it via `factory`
    /// only on first request.
    pub fn get<F: FnOnce() -> Interaction>(
        &mut self,
        key: &str,
        factory: F,
    ) -> Rc<RefCell<Interaction>> {
        if let Some(existing) = self.entries.get(key) {
            return existing.clone();
        }
        let interaction = Rc::new(RefCell::new(factory()));
        self.entries.insert(key.to_string(), interaction.clone());
        interaction
    }

    /// Looks up an existing interaction without constructing.
    pub fn lookup(&self, key: &str) -> Option<Rc<RefCell<Interaction>>> {
        self.entries.get(key).cloned()
    }

    /// Toggles an interaction's active flag. The only way liveness
    /// changes between construction and disposal.
    pub fn set_active(&self, key: &str, active: bool) -> bool {
        match self.entries.get(key) {
            Some(interaction) => {
                interaction.borrow_mut().set_active(active);
                true
            }
            None => false,
        }
    }

    pub fn is_active(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .map(|i| i.borrow().is_active())
            .unwrap_or(false)
    }

    /// Handles to every entry, in insertion order. The session clones
    /// this list before driving pointer events so no registry borrow is
    /// held while interactions run.
    pub fn handles(&self) -> Vec<(String, Rc<RefCell<Interaction>>)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Deactivates every entry (mode switch with nothing selected,
    /// session disabled).
    pub fn deactivate_all(&self) {
        for interaction in self.entries.values() {
            interaction.borrow_mut().set_active(false);
        }
    }

    /// Disposes every entry. Called exactly once at session teardown;
    /// must be exhaustive to avoid leaking listeners on the host engine.
    pub fn dispose_all(&mut self) {
        for interaction in self.entries.values() {
            interaction.borrow_mut().dispose();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::interaction::DrawTarget;

    #[test]
    fn test_get_constructs_once() {
        let mut registry = InteractionRegistry::new();
        let first = registry.get("draw", || Interaction::draw(DrawTarget::Point, None));
        let second = registry.get("draw", || panic!("factory must not run twice"));
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_set_active_toggles_without_rebuilding() {
        let mut registry = InteractionRegistry::new();
        let handle = registry.get("draw", || Interaction::draw(DrawTarget::Point, None));
        assert!(registry.set_active("draw", true));
        assert!(handle.borrow().is_active());
        assert!(registry.set_active("draw", false));
        assert!(!handle.borrow().is_active());
        assert!(!registry.set_active("missing", true));
    }

    #[test]
    fn test_dispose_all_is_exhaustive() {
        let mut registry = InteractionRegistry::new();
        let a = registry.get("a", || Interaction::draw(DrawTarget::Point, None));
        let b = registry.get("b", || Interaction::draw(DrawTarget::Line, None));
        registry.dispose_all();
        assert!(a.borrow().is_disposed());
        assert!(b.borrow().is_disposed());
    }

    #[test]
    fn test_handles_preserve_insertion_order() {
        let mut registry = InteractionRegistry::new();
        registry.get("hover", || Interaction::draw(DrawTarget::Line, None));
        registry.get("draw", || Interaction::draw(DrawTarget::Point, None));
        let keys: Vec<String> = registry.handles().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["hover".to_string(), "draw".to_string()]);
    }
}
