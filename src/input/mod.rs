//! Formula entry widgets
//!
//! [`FormulaInputManager`] owns the list of sequent entries shown on the
//! solve side of the page. Each widget gets an [`EntryId`] from a counter
//! that never goes backwards, so ids stay valid handles across removals and
//! reorders. Ordinals, on the other hand, are only assigned by
//! [`FormulaInputManager::collect`], from the order the widgets are shown in.

use crate::typeset::{Node, Typesetter};
use rustc_hash::FxHashMap;
use std::fmt;
use tracing::debug;

/// Message shown when an entry cannot be typeset
pub const PREVIEW_REJECTED: &str =
    "Error rendering your formula input. It will not be submitted. Check your input.";

/// Opaque handle to an entry widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f{}", self.0)
    }
}

/// Which side of a sequent entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// A collected entry, ready to be turned into a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaEntry {
    pub ordinal: usize,
    pub left: String,
    pub right: String,
}

/// One visible entry row: the raw sources and their last preview
#[derive(Debug, Clone, Default)]
pub struct EntryWidget {
    pub left: String,
    pub right: String,
    pub left_preview: Node,
    pub right_preview: Node,
}

impl EntryWidget {
    pub fn text(&self, side: Side) -> &str {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn preview(&self, side: Side) -> &Node {
        match side {
            Side::Left => &self.left_preview,
            Side::Right => &self.right_preview,
        }
    }
}

/// Result of previewing an entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    /// Both sides produced visible output
    Rendered,
    /// At least one side produced nothing; the entry stays in the list
    Rejected(String),
    /// No entry with that id
    Missing,
}

#[derive(Debug, Default)]
pub struct FormulaInputManager {
    order: Vec<EntryId>,
    widgets: FxHashMap<EntryId, EntryWidget>,
    next_id: u64,
}

impl FormulaInputManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new empty entry and return its handle
    pub fn add_entry(&mut self) -> EntryId {
        self.next_id += 1;
        let id = EntryId(self.next_id);
        self.order.push(id);
        self.widgets.insert(id, EntryWidget::default());
        debug!(%id, "entry added");
        id
    }

    /// Remove an entry. Removing an absent entry does nothing.
    pub fn remove_entry(&mut self, id: EntryId) {
        if self.widgets.remove(&id).is_some() {
            self.order.retain(|other| *other != id);
            debug!(%id, "entry removed");
        }
    }

    /// Drop every entry. Ids handed out before stay retired.
    pub fn reset(&mut self) {
        self.order.clear();
        self.widgets.clear();
    }

    pub fn entry(&self, id: EntryId) -> Option<&EntryWidget> {
        self.widgets.get(&id)
    }

    /// Ids in visible order
    pub fn ids(&self) -> &[EntryId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn set_text(&mut self, id: EntryId, side: Side, text: impl Into<String>) -> bool {
        match self.widgets.get_mut(&id) {
            Some(widget) => {
                match side {
                    Side::Left => widget.left = text.into(),
                    Side::Right => widget.right = text.into(),
                }
                true
            }
            None => false,
        }
    }

    /// Mutable access to one side's source, for in-place editing
    pub fn text_mut(&mut self, id: EntryId, side: Side) -> Option<&mut String> {
        let widget = self.widgets.get_mut(&id)?;
        Some(match side {
            Side::Left => &mut widget.left,
            Side::Right => &mut widget.right,
        })
    }

    /// Move an entry one place towards the top. Returns whether it moved.
    pub fn move_up(&mut self, id: EntryId) -> bool {
        match self.position(id) {
            Some(index) if index > 0 => {
                self.order.swap(index, index - 1);
                true
            }
            _ => false,
        }
    }

    /// Move an entry one place towards the bottom. Returns whether it moved.
    pub fn move_down(&mut self, id: EntryId) -> bool {
        match self.position(id) {
            Some(index) if index + 1 < self.order.len() => {
                self.order.swap(index, index + 1);
                true
            }
            _ => false,
        }
    }

    pub fn position(&self, id: EntryId) -> Option<usize> {
        self.order.iter().position(|other| *other == id)
    }

    /// Typeset both sides of an entry into its preview nodes.
    ///
    /// A side that fails to typeset, or typesets a non-blank source to
    /// nothing, rejects the entry; so does an entry with both sides blank.
    /// Rejection only reports; the entry is kept.
    pub fn preview_entry<T: Typesetter>(&mut self, id: EntryId, typesetter: &T) -> Preview {
        let widget = match self.widgets.get_mut(&id) {
            Some(widget) => widget,
            None => return Preview::Missing,
        };

        let left_ok = preview_side(typesetter, &widget.left, &mut widget.left_preview);
        let right_ok = preview_side(typesetter, &widget.right, &mut widget.right_preview);
        let visible = !widget.left_preview.is_empty() || !widget.right_preview.is_empty();

        if left_ok && right_ok && visible {
            Preview::Rendered
        } else {
            debug!(%id, left_ok, right_ok, "entry preview rejected");
            Preview::Rejected(PREVIEW_REJECTED.to_string())
        }
    }

    /// Snapshot all entries in visible order, numbering them from 0
    pub fn collect(&self) -> Vec<FormulaEntry> {
        self.order
            .iter()
            .filter_map(|id| self.widgets.get(id))
            .enumerate()
            .map(|(ordinal, widget)| FormulaEntry {
                ordinal,
                left: widget.left.clone(),
                right: widget.right.clone(),
            })
            .collect()
    }
}

/// A blank side of a sequent is allowed to stay empty
fn preview_side<T: Typesetter>(typesetter: &T, source: &str, target: &mut Node) -> bool {
    if source.trim().is_empty() {
        target.clear();
        return true;
    }
    preview_into(typesetter, source, target)
}

/// Typeset `source` into `target`, reporting whether anything became visible
pub(crate) fn preview_into<T: Typesetter>(typesetter: &T, source: &str, target: &mut Node) -> bool {
    match typesetter.typeset(source, target) {
        Ok(()) => target.child_count() > 0,
        Err(e) => {
            debug!(error = %e, "preview typesetting failed");
            target.clear();
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typeset::TexTypesetter;

    fn filled(manager: &mut FormulaInputManager, left: &str, right: &str) -> EntryId {
        let id = manager.add_entry();
        manager.set_text(id, Side::Left, left);
        manager.set_text(id, Side::Right, right);
        id
    }

    #[test]
    fn test_collect_after_removal_renumbers() {
        let mut manager = FormulaInputManager::new();
        filled(&mut manager, "a", "b");
        let second = filled(&mut manager, "c", "d");
        filled(&mut manager, "e", "f");
        manager.remove_entry(second);

        let entries = manager.collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].ordinal, 0);
        assert_eq!(entries[0].left, "a");
        assert_eq!(entries[1].ordinal, 1);
        assert_eq!(entries[1].left, "e");
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut manager = FormulaInputManager::new();
        let id = manager.add_entry();
        manager.remove_entry(id);
        manager.remove_entry(id);
        assert!(manager.is_empty());
        assert!(!manager.set_text(id, Side::Left, "x"));
    }

    #[test]
    fn test_ids_are_never_reused() {
        let mut manager = FormulaInputManager::new();
        let first = manager.add_entry();
        manager.remove_entry(first);
        manager.reset();
        let second = manager.add_entry();
        assert_ne!(first, second);
        assert_eq!(second.to_string(), "f2");
    }

    #[test]
    fn test_move_entries() {
        let mut manager = FormulaInputManager::new();
        let a = filled(&mut manager, "a", "");
        let b = filled(&mut manager, "b", "");

        assert!(!manager.move_up(a));
        assert!(manager.move_up(b));
        assert_eq!(manager.ids(), &[b, a]);
        assert!(!manager.move_down(a));
        assert!(manager.move_down(b));
        assert_eq!(manager.position(b), Some(1));
        assert_eq!(manager.collect()[0].left, "a");
    }

    #[test]
    fn test_preview_renders_and_rejects() {
        let mut manager = FormulaInputManager::new();
        let good = filled(&mut manager, r"\Box a", "");
        let bad = filled(&mut manager, r"\nosuchsymbol", "b");
        let blank = filled(&mut manager, "  ", "");

        assert_eq!(manager.preview_entry(good, &TexTypesetter), Preview::Rendered);
        assert_eq!(
            manager.entry(good).map(|w| w.preview(Side::Left).text()),
            Some("□a".to_string())
        );
        assert_eq!(
            manager.preview_entry(bad, &TexTypesetter),
            Preview::Rejected(PREVIEW_REJECTED.to_string())
        );
        assert!(manager.entry(bad).map(|w| w.preview(Side::Left).is_empty()).unwrap_or(false));
        assert!(matches!(
            manager.preview_entry(blank, &TexTypesetter),
            Preview::Rejected(_)
        ));

        // Rejected entries are kept
        assert_eq!(manager.len(), 3);
        manager.remove_entry(good);
        assert_eq!(manager.preview_entry(good, &TexTypesetter), Preview::Missing);
    }
}
