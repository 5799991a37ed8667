//! The contract between brewing models and the views that show them.
//!
//! A view pulls cells through [`ItemModel`] and learns when to pull again from
//! the model's [`ModelSignals`]. Nothing here knows about records.

use brewview_core::Signal;

use super::index::ModelIndex;
use super::role::{CheckState, ItemData, ItemRole};

/// What a view may do with a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ItemFlags {
    /// The cell can be selected.
    pub selectable: bool,
    /// The cell accepts text edits.
    pub editable: bool,
    /// The cell shows a checkbox.
    pub checkable: bool,
    /// The cell is live. A stale or out-of-range index is not.
    pub enabled: bool,
}

impl ItemFlags {
    /// A live, selectable, read-only cell.
    pub fn new() -> Self {
        Self {
            selectable: true,
            enabled: true,
            ..Default::default()
        }
    }

    /// A cell that does not exist.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// A cell that accepts text edits.
    pub fn editable() -> Self {
        Self {
            editable: true,
            ..Self::new()
        }
    }

    /// A boolean cell toggled through its check state.
    pub fn checkable() -> Self {
        Self {
            checkable: true,
            ..Self::new()
        }
    }
}

/// Row/column/role access to a model.
///
/// Bad positions never panic. They yield `ItemData::None`, an invalid
/// [`ModelIndex`], or `false`.
pub trait ItemModel: Send + Sync {
    /// Rows under `parent`; the invalid index is the top level.
    fn row_count(&self, parent: &ModelIndex) -> usize;

    /// Columns of the rows under `parent`.
    fn column_count(&self, parent: &ModelIndex) -> usize;

    /// The cell at `index` rendered for `role`.
    fn data(&self, index: &ModelIndex, role: ItemRole) -> ItemData;

    /// The index of a cell, or an invalid index when out of range.
    fn index(&self, row: usize, column: usize, parent: &ModelIndex) -> ModelIndex;

    /// The index of the row containing `index`.
    fn parent(&self, index: &ModelIndex) -> ModelIndex;

    /// The model's change notifications.
    fn signals(&self) -> &ModelSignals;

    /// Writes an edit back to the underlying record.
    ///
    /// Read-only models keep the default, which refuses every edit.
    fn set_data(&self, _index: &ModelIndex, _value: ItemData, _role: ItemRole) -> bool {
        false
    }

    /// What a view may do with the cell at `index`.
    fn flags(&self, _index: &ModelIndex) -> ItemFlags {
        ItemFlags::new()
    }

    /// Header text. `section` is a column for horizontal headers and a row
    /// for vertical ones.
    fn header_data(&self, _section: usize, _orientation: Orientation, _role: ItemRole) -> ItemData {
        ItemData::None
    }

    /// Shorthand for the display text of a cell.
    fn display_text(&self, index: &ModelIndex) -> Option<String> {
        self.data(index, ItemRole::Display).into_string()
    }

    /// Shorthand for the check state of a boolean cell.
    fn check_state(&self, index: &ModelIndex) -> Option<CheckState> {
        self.data(index, ItemRole::CheckState).as_check_state()
    }

    /// Shorthand for toggling a boolean cell.
    fn set_check_state(&self, index: &ModelIndex, state: CheckState) -> bool {
        self.set_data(index, ItemData::CheckState(state), ItemRole::CheckState)
    }
}

/// Which header a section belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Column titles.
    Horizontal,
    /// Row labels.
    Vertical,
}

/// Everything a model tells its views.
///
/// Structural changes come in before/after pairs so a view can drop cached
/// rows before they vanish. `model_reset` is the blunt instrument: after it a
/// view must re-read row count, column count and every cell. Observed tables
/// send it on every record change.
pub struct ModelSignals {
    /// `(parent, first, last)` before rows appear.
    pub rows_about_to_be_inserted: Signal<(ModelIndex, usize, usize)>,
    /// `(parent, first, last)` after rows appeared.
    pub rows_inserted: Signal<(ModelIndex, usize, usize)>,
    /// `(parent, first, last)` before rows go away.
    pub rows_about_to_be_removed: Signal<(ModelIndex, usize, usize)>,
    /// `(parent, first, last)` after rows went away.
    pub rows_removed: Signal<(ModelIndex, usize, usize)>,
    /// `(top_left, bottom_right, roles)` when cells re-render in place.
    pub data_changed: Signal<(ModelIndex, ModelIndex, Vec<ItemRole>)>,
    /// `(orientation, first, last)` when header text changes.
    pub header_data_changed: Signal<(Orientation, usize, usize)>,
    /// Before rows are reordered.
    pub layout_about_to_change: Signal<()>,
    /// After rows were reordered.
    pub layout_changed: Signal<()>,
    /// Before everything is invalidated.
    pub model_about_to_reset: Signal<()>,
    /// After everything was invalidated.
    pub model_reset: Signal<()>,
}

impl Default for ModelSignals {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelSignals {
    /// Signals with no listeners.
    pub fn new() -> Self {
        Self {
            rows_about_to_be_inserted: Signal::new(),
            rows_inserted: Signal::new(),
            rows_about_to_be_removed: Signal::new(),
            rows_removed: Signal::new(),
            data_changed: Signal::new(),
            header_data_changed: Signal::new(),
            layout_about_to_change: Signal::new(),
            layout_changed: Signal::new(),
            model_about_to_reset: Signal::new(),
            model_reset: Signal::new(),
        }
    }

    /// Runs `insert` between the two row-insertion signals.
    pub fn emit_rows_inserted<F, R>(
        &self,
        parent: ModelIndex,
        first: usize,
        last: usize,
        insert: F,
    ) -> R
    where
        F: FnOnce() -> R,
    {
        self.rows_about_to_be_inserted.emit((parent.clone(), first, last));
        let result = insert();
        self.rows_inserted.emit((parent, first, last));
        result
    }

    /// Runs `remove` between the two row-removal signals.
    pub fn emit_rows_removed<F, R>(
        &self,
        parent: ModelIndex,
        first: usize,
        last: usize,
        remove: F,
    ) -> R
    where
        F: FnOnce() -> R,
    {
        self.rows_about_to_be_removed.emit((parent.clone(), first, last));
        let result = remove();
        self.rows_removed.emit((parent, first, last));
        result
    }

    /// Announces that the cells from `left` to `right` re-render for `roles`.
    pub fn emit_data_changed(&self, left: ModelIndex, right: ModelIndex, roles: Vec<ItemRole>) {
        if left.is_valid() {
            self.data_changed.emit((left, right, roles));
        }
    }

    /// Runs `reset` between the two reset signals.
    pub fn emit_reset<F, R>(&self, reset: F) -> R
    where
        F: FnOnce() -> R,
    {
        self.model_about_to_reset.emit(());
        let result = reset();
        self.model_reset.emit(());
        result
    }

    /// Runs `reorder` between the two layout signals.
    pub fn emit_layout_changed<F, R>(&self, reorder: F) -> R
    where
        F: FnOnce() -> R,
    {
        self.layout_about_to_change.emit(());
        let result = reorder();
        self.layout_changed.emit(());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn log_pair(signals: &ModelSignals) -> Arc<Mutex<Vec<&'static str>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let l = log.clone();
        signals.model_about_to_reset.connect(move |_| l.lock().push("about to reset"));
        let l = log.clone();
        signals.model_reset.connect(move |_| l.lock().push("reset"));
        let l = log.clone();
        signals.rows_about_to_be_removed.connect(move |_| l.lock().push("about to remove"));
        let l = log.clone();
        signals.rows_removed.connect(move |_| l.lock().push("removed"));
        log
    }

    #[test]
    fn test_flags_for_table_cells() {
        let amount = ItemFlags::editable();
        assert!(amount.enabled && amount.selectable && amount.editable);
        assert!(!amount.checkable);

        let mashed = ItemFlags::checkable();
        assert!(mashed.checkable && !mashed.editable);

        assert_eq!(ItemFlags::disabled(), ItemFlags::default());
    }

    #[test]
    fn test_reset_wraps_the_mutation() {
        let signals = ModelSignals::new();
        let log = log_pair(&signals);

        let seen_inside = signals.emit_reset(|| log.lock().clone());
        assert_eq!(seen_inside, vec!["about to reset"]);
        assert_eq!(*log.lock(), vec!["about to reset", "reset"]);
    }

    #[test]
    fn test_removal_reports_range() {
        let signals = ModelSignals::new();
        let log = log_pair(&signals);
        let range = Arc::new(Mutex::new(None));
        let r = range.clone();
        signals.rows_removed.connect(move |(parent, first, last)| {
            *r.lock() = Some((parent.is_valid(), *first, *last));
        });

        let removed = signals.emit_rows_removed(ModelIndex::invalid(), 1, 3, || 3);
        assert_eq!(removed, 3);
        assert_eq!(*range.lock(), Some((false, 1, 3)));
        assert_eq!(*log.lock(), vec!["about to remove", "removed"]);
    }

    #[test]
    fn test_data_changed_skips_invalid_cells() {
        let signals = ModelSignals::new();
        let count = Arc::new(Mutex::new(0));
        let c = count.clone();
        signals.data_changed.connect(move |_| *c.lock() += 1);

        signals.emit_data_changed(
            ModelIndex::invalid(),
            ModelIndex::invalid(),
            vec![ItemRole::Display],
        );
        let cell = ModelIndex::new(0, 2, ModelIndex::invalid());
        signals.emit_data_changed(cell.clone(), cell, vec![ItemRole::Display]);
        assert_eq!(*count.lock(), 1);
    }
}
