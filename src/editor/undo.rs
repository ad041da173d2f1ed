//! The session undo stack.
//!
//! Undo is a list of one-shot reversal closures, not a snapshot tree:
//! every committed operation pushes a closure that knows how to reverse
//! exactly that operation against the live feature collection. Closures
//! capture *clones* of any geometry they restore — geometries are shared
//! by reference and mutate in place, so a snapshot taken by reference
//! would drift along with the live object.

/// A one-shot reversal closure.
///
/// The closure is consumed on first invocation; calling [`invoke`] again
/// is a no-op. This guards against double-pop bugs ever reversing an
/// operation twice.
///
/// [`invoke`]: UndoEntry::invoke
pub struct UndoEntry {
    action: Option<Box<dyn FnOnce()>>,
}

impl UndoEntry {
    pub fn new<F: FnOnce() + 'static>(action: F) -> Self {
        Self {
            action: Some(Box::new(action)),
        }
    }

    /// Runs the reversal. Returns true the first time, false after.
    pub fn invoke(&mut self) -> bool {
        match self.action.take() {
            Some(action) => {
                action();
                true
            }
            None => false,
        }
    }

    /// True if the reversal has not run yet.
    pub fn is_pending(&self) -> bool {
        self.action.is_some()
    }
}

impl std::fmt::Debug for UndoEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UndoEntry")
            .field("pending", &self.is_pending())
            .finish()
    }
}

/// Ordered reversal closures for one edit session.
///
/// Append-only except for pop-on-undo. A non-empty stack is what makes a
/// session dirty.
///
/// # Examples
///
/// ```
/// use mapquill::editor::undo::UndoStack;
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let mut stack = UndoStack::new();
/// let flag = Rc::new(Cell::new(false));
/// let captured = flag.clone();
/// stack.push(move || captured.set(true));
///
/// assert!(stack.dirty());
/// assert!(stack.undo_last());
/// assert!(flag.get());
/// assert!(!stack.undo_last()); // empty stack is a no-op
/// ```
#[derive(Debug, Default)]
pub struct UndoStack {
    entries: Vec<UndoEntry>,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a reversal closure for the operation just committed.
    pub fn push<F: FnOnce() + 'static>(&mut self, action: F) {
        self.entries.push(UndoEntry::new(action));
    }

    /// Pops and runs the most recent reversal. No-op on an empty stack.
    pub fn undo_last(&mut self) -> bool {
        match self.entries.pop() {
            Some(mut entry) => entry.invoke(),
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when there is anything to undo — the session's dirty flag.
    pub fn dirty(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Drops all pending reversals without running them (session discard).
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
