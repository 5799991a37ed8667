//! Tables that stay in sync with the records they list.
//!
//! An [`ObservedTableModel`] holds an ordered set of shared records of one
//! kind. It subscribes to each member's change channel, so editing a record
//! anywhere in the application updates the table's aggregate (for example the
//! total grain bill in kilograms) and tells views to re-pull everything.
//!
//! What the columns are, how they render and how edits are applied is
//! supplied by a [`TableColumns`] implementation; see
//! [`FermentableColumns`](super::FermentableColumns) and
//! [`HopColumns`](super::HopColumns).
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use brewview::domain::Fermentable;
//! use brewview::model::FermentableTableModel;
//!
//! let table = FermentableTableModel::new();
//! let pale = Arc::new(Fermentable::new("Pale").with_amount_kg(2.0));
//! let crystal = Arc::new(Fermentable::new("Crystal").with_amount_kg(3.0));
//! table.add(&pale);
//! table.add(&crystal);
//! assert_eq!(table.total(), 5.0);
//!
//! pale.set_amount_kg(4.0);
//! assert_eq!(table.total(), 7.0);
//! ```

use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use brewview_core::logging::{span_names, targets};
use brewview_core::{
    ConnectionId, Diagnostic, DiagnosticKind, Diagnostics, default_diagnostics,
};
use parking_lot::Mutex;

use super::index::ModelIndex;
use super::role::{ItemData, ItemRole};
use super::traits::{ItemFlags, ItemModel, ModelSignals, Orientation};
use crate::config::ViewConfig;
use crate::domain::{Element, ElementChange};
use crate::units::{DisplayFormatter, UnitFormatter};

/// Describes the columns of one kind of table.
pub trait TableColumns: Send + Sync + 'static {
    /// The record type listed, one per row.
    type Element: Element;

    /// Name used when reporting diagnostics.
    const SOURCE: &'static str;

    /// Column titles; their count is the table's column count.
    const TITLES: &'static [&'static str];

    /// A member's contribution to the aggregate.
    fn aggregate_of(element: &Self::Element) -> f64;

    /// Returns `true` for boolean columns surfaced as checkboxes.
    fn is_checkable(column: usize) -> bool;

    /// Renders one cell. `column` is always in range.
    fn cell(
        element: &Self::Element,
        column: usize,
        role: ItemRole,
        formatter: &dyn UnitFormatter,
    ) -> ItemData;

    /// Converts and applies an edit. `column` is always in range.
    ///
    /// Returns `false` without touching the record if `value` cannot be
    /// converted to the field's shape.
    fn set_cell(
        element: &Self::Element,
        column: usize,
        value: &ItemData,
        formatter: &dyn UnitFormatter,
    ) -> bool;
}

struct Member<T> {
    element: Arc<T>,
    connection: ConnectionId,
}

struct TableState<T> {
    members: Vec<Member<T>>,
    total: f64,
}

impl<T> TableState<T> {
    fn position_of(&self, element: &Arc<T>) -> Option<usize> {
        self.members
            .iter()
            .position(|m| Arc::ptr_eq(&m.element, element))
    }
}

/// A table over shared records, kept in sync through their change channels.
pub struct ObservedTableModel<C: TableColumns> {
    state: Mutex<TableState<C::Element>>,
    display_percentages: AtomicBool,
    formatter: Arc<dyn UnitFormatter>,
    diagnostics: Arc<dyn Diagnostics>,
    signals: ModelSignals,
    self_ref: Weak<Self>,
    _columns: PhantomData<fn() -> C>,
}

impl<C: TableColumns> ObservedTableModel<C> {
    /// Creates an empty table with the default formatter and diagnostics.
    pub fn new() -> Arc<Self> {
        Self::with_parts(
            Arc::new(DisplayFormatter::default()),
            default_diagnostics(),
            false,
        )
    }

    /// Creates an empty table following `config`.
    pub fn from_config(config: &ViewConfig, diagnostics: Arc<dyn Diagnostics>) -> Arc<Self> {
        Self::with_parts(
            Arc::new(config.formatter()),
            diagnostics,
            config.display_percentages,
        )
    }

    /// Creates an empty table from explicit collaborators.
    pub fn with_parts(
        formatter: Arc<dyn UnitFormatter>,
        diagnostics: Arc<dyn Diagnostics>,
        display_percentages: bool,
    ) -> Arc<Self> {
        Arc::new_cyclic(|self_ref| Self {
            state: Mutex::new(TableState {
                members: Vec::new(),
                total: 0.0,
            }),
            display_percentages: AtomicBool::new(display_percentages),
            formatter,
            diagnostics,
            signals: ModelSignals::new(),
            self_ref: self_ref.clone(),
            _columns: PhantomData,
        })
    }

    fn report(&self, kind: DiagnosticKind, detail: String) {
        self.diagnostics
            .report(Diagnostic::new(C::SOURCE, kind, detail));
    }

    fn recompute(state: &mut TableState<C::Element>) {
        let _span = tracing::trace_span!(
            target: targets::TABLE,
            span_names::RECOMPUTE,
            members = state.members.len()
        )
        .entered();
        state.total = state
            .members
            .iter()
            .map(|m| C::aggregate_of(&m.element))
            .sum();
    }

    // ========================================================================
    // Membership
    // ========================================================================

    /// Adds a record, subscribing to its changes.
    ///
    /// Adding a record that is already a member does nothing.
    pub fn add(&self, element: &Arc<C::Element>) {
        if self.contains(element) {
            return;
        }

        let model = self.self_ref.clone();
        let watched = Arc::downgrade(element);
        let connection = element.changed().connect(move |change: &ElementChange| {
            if let (Some(model), Some(element)) = (model.upgrade(), watched.upgrade()) {
                model.notify(&element, change);
            }
        });

        let mut added = false;
        self.signals.emit_reset(|| {
            let mut state = self.state.lock();
            if state.position_of(element).is_none() {
                state.members.push(Member {
                    element: element.clone(),
                    connection,
                });
                Self::recompute(&mut state);
                added = true;
            }
        });

        if !added {
            element.changed().disconnect(connection);
        }
        tracing::debug!(
            target: targets::TABLE,
            source = C::SOURCE,
            name = %element.name(),
            added,
            "add"
        );
    }

    /// Removes a record and unsubscribes from it.
    ///
    /// Returns `false` if the record was not a member.
    pub fn remove(&self, element: &Arc<C::Element>) -> bool {
        if !self.contains(element) {
            return false;
        }

        let removed = self.signals.emit_reset(|| {
            let mut state = self.state.lock();
            let position = state.position_of(element)?;
            let member = state.members.remove(position);
            Self::recompute(&mut state);
            Some(member)
        });

        match removed {
            Some(member) => {
                member.element.changed().disconnect(member.connection);
                tracing::debug!(
                    target: targets::TABLE,
                    source = C::SOURCE,
                    name = %element.name(),
                    "remove"
                );
                true
            }
            None => false,
        }
    }

    /// Removes every record and resets the aggregate to zero.
    pub fn remove_all(&self) {
        let members = self.signals.emit_reset(|| {
            let mut state = self.state.lock();
            state.total = 0.0;
            std::mem::take(&mut state.members)
        });
        for member in &members {
            member.element.changed().disconnect(member.connection);
        }
        tracing::debug!(
            target: targets::TABLE,
            source = C::SOURCE,
            count = members.len(),
            "remove all"
        );
    }

    /// Handles a change reported by `element`.
    ///
    /// Recomputes the aggregate over all members and invalidates the view.
    /// A notification from a record that is not a member is ignored and
    /// returns `false`.
    pub fn notify(&self, element: &Arc<C::Element>, change: &ElementChange) -> bool {
        if !self.contains(element) {
            tracing::trace!(
                target: targets::TABLE,
                property = change.property,
                "ignored foreign change"
            );
            return false;
        }
        self.signals.emit_reset(|| {
            Self::recompute(&mut self.state.lock());
        });
        true
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Returns `true` if `element` is a member.
    pub fn contains(&self, element: &Arc<C::Element>) -> bool {
        self.state.lock().position_of(element).is_some()
    }

    /// The row of `element`, if it is a member.
    pub fn row_of(&self, element: &Arc<C::Element>) -> Option<usize> {
        self.state.lock().position_of(element)
    }

    /// Number of members.
    pub fn row_count(&self) -> usize {
        self.state.lock().members.len()
    }

    /// Returns `true` if the table has no members.
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        C::TITLES.len()
    }

    /// The aggregate over all members.
    pub fn total(&self) -> f64 {
        self.state.lock().total
    }

    /// The member at `row`.
    pub fn member(&self, row: usize) -> Option<Arc<C::Element>> {
        self.state
            .lock()
            .members
            .get(row)
            .map(|m| m.element.clone())
    }

    /// A snapshot of the members in row order.
    pub fn members(&self) -> Vec<Arc<C::Element>> {
        self.state
            .lock()
            .members
            .iter()
            .map(|m| m.element.clone())
            .collect()
    }

    /// Whether row headers show each member's share of the aggregate.
    pub fn display_percentages(&self) -> bool {
        self.display_percentages.load(Ordering::Relaxed)
    }

    /// Turns share-of-aggregate row headers on or off.
    pub fn set_display_percentages(&self, enabled: bool) {
        if self.display_percentages.swap(enabled, Ordering::Relaxed) == enabled {
            return;
        }
        let rows = self.row_count();
        if rows > 0 {
            self.signals
                .header_data_changed
                .emit((Orientation::Vertical, 0, rows - 1));
        }
    }

    /// Moves the member at `from` so it ends up at row `to`.
    ///
    /// Returns `false` if either row is out of range.
    pub fn move_row(&self, from: usize, to: usize) -> bool {
        let rows = self.row_count();
        if from >= rows || to >= rows {
            return false;
        }
        if from == to {
            return true;
        }
        self.signals.emit_layout_changed(|| {
            let mut state = self.state.lock();
            if from < state.members.len() && to < state.members.len() {
                let member = state.members.remove(from);
                state.members.insert(to, member);
            }
        });
        true
    }

    // ========================================================================
    // Cells
    // ========================================================================

    fn checked_member(&self, row: usize, column: usize) -> Option<Arc<C::Element>> {
        let member = self.member(row);
        if member.is_none() {
            self.report(
                DiagnosticKind::BadRow,
                format!("row {row} of {}", self.row_count()),
            );
            return None;
        }
        if column >= C::TITLES.len() {
            self.report(
                DiagnosticKind::BadColumn,
                format!("column {column} of {}", C::TITLES.len()),
            );
            return None;
        }
        member
    }

    /// Renders one cell.
    ///
    /// Returns `ItemData::None` and reports a diagnostic for a bad row or column.
    pub fn cell_value(&self, row: usize, column: usize, role: ItemRole) -> ItemData {
        match self.checked_member(row, column) {
            Some(element) => C::cell(&element, column, role, self.formatter.as_ref()),
            None => ItemData::None,
        }
    }

    /// Applies an edit to one cell.
    ///
    /// Boolean columns accept `CheckState` and `Edit`; other columns accept
    /// `Edit` and `Display`. Returns `false` and leaves the record untouched
    /// if the row, column, role or value is not acceptable.
    pub fn set_cell_value(
        &self,
        row: usize,
        column: usize,
        value: ItemData,
        role: ItemRole,
    ) -> bool {
        let Some(element) = self.checked_member(row, column) else {
            return false;
        };

        let role_ok = if C::is_checkable(column) {
            matches!(role, ItemRole::CheckState | ItemRole::Edit)
        } else {
            matches!(role, ItemRole::Edit | ItemRole::Display)
        };
        if !role_ok {
            return false;
        }

        let applied = C::set_cell(&element, column, &value, self.formatter.as_ref());
        if !applied {
            self.report(
                DiagnosticKind::Rejected,
                format!("column {column} value {value:?}"),
            );
        }
        applied
    }

    /// The share-of-aggregate header for `row`, when enabled.
    fn row_header(&self, row: usize) -> ItemData {
        if !self.display_percentages() {
            return ItemData::None;
        }
        let state = self.state.lock();
        let Some(member) = state.members.get(row) else {
            return ItemData::None;
        };
        if state.total == 0.0 {
            return ItemData::None;
        }
        let share = 100.0 * C::aggregate_of(&member.element) / state.total;
        ItemData::from(format!("{share:.0}%"))
    }
}

impl<C: TableColumns> Drop for ObservedTableModel<C> {
    fn drop(&mut self) {
        for member in self.state.get_mut().members.drain(..) {
            member.element.changed().disconnect(member.connection);
        }
    }
}

impl<C: TableColumns> std::fmt::Debug for ObservedTableModel<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ObservedTableModel")
            .field("source", &C::SOURCE)
            .field("rows", &state.members.len())
            .field("total", &state.total)
            .finish()
    }
}

impl<C: TableColumns> ItemModel for ObservedTableModel<C> {
    fn row_count(&self, parent: &ModelIndex) -> usize {
        if parent.is_valid() {
            0
        } else {
            ObservedTableModel::row_count(self)
        }
    }

    fn column_count(&self, parent: &ModelIndex) -> usize {
        if parent.is_valid() {
            0
        } else {
            C::TITLES.len()
        }
    }

    fn data(&self, index: &ModelIndex, role: ItemRole) -> ItemData {
        if !index.is_valid() {
            return ItemData::None;
        }
        self.cell_value(index.row(), index.column(), role)
    }

    fn index(&self, row: usize, column: usize, parent: &ModelIndex) -> ModelIndex {
        if parent.is_valid()
            || row >= ObservedTableModel::row_count(self)
            || column >= C::TITLES.len()
        {
            return ModelIndex::invalid();
        }
        ModelIndex::new(row, column, ModelIndex::invalid())
    }

    fn parent(&self, _index: &ModelIndex) -> ModelIndex {
        ModelIndex::invalid()
    }

    fn signals(&self) -> &ModelSignals {
        &self.signals
    }

    fn set_data(&self, index: &ModelIndex, value: ItemData, role: ItemRole) -> bool {
        index.is_valid() && self.set_cell_value(index.row(), index.column(), value, role)
    }

    fn flags(&self, index: &ModelIndex) -> ItemFlags {
        if !index.is_valid()
            || index.row() >= ObservedTableModel::row_count(self)
            || index.column() >= C::TITLES.len()
        {
            return ItemFlags::disabled();
        }
        if C::is_checkable(index.column()) {
            ItemFlags::checkable()
        } else {
            ItemFlags::editable()
        }
    }

    fn header_data(&self, section: usize, orientation: Orientation, role: ItemRole) -> ItemData {
        if role != ItemRole::Display {
            return ItemData::None;
        }
        match orientation {
            Orientation::Horizontal => match C::TITLES.get(section) {
                Some(title) => ItemData::from(*title),
                None => {
                    self.report(
                        DiagnosticKind::BadColumn,
                        format!("header {section} of {}", C::TITLES.len()),
                    );
                    ItemData::None
                }
            },
            Orientation::Vertical => self.row_header(section),
        }
    }
}

static_assertions::assert_impl_all!(super::columns::FermentableTableModel: Send, Sync);
