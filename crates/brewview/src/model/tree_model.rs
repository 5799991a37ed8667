//! Item model over a [`BrowserTree`].
//!
//! `BrewTreeModel` presents one browser tree (the recipe browser, the hop
//! browser, ...) to views. The tree's root is the invisible parent of the
//! top-level rows; every other node maps to a [`ModelIndex`] whose internal
//! id is the node's [`NodeId`].
//!
//! Structural edits go through [`insert_rows`](BrewTreeModel::insert_rows)
//! and [`remove_rows`](BrewTreeModel::remove_rows), which wrap the tree
//! operation in the `rows_about_to_be_*` / `rows_*` signal pair. A node can be
//! [observed](BrewTreeModel::observe) so that changes to its record re-render
//! the row.

use std::fmt::Write;
use std::sync::{Arc, Weak};

use brewview_core::logging::targets;
use brewview_core::{ConnectionId, Diagnostics, default_diagnostics};
use parking_lot::{Mutex, RwLock};
use slotmap::{Key, KeyData};

use super::index::ModelIndex;
use super::role::{ItemData, ItemRole};
use super::traits::{ItemFlags, ItemModel, ModelSignals, Orientation};
use super::tree::{BrowserTree, NodeId, TreeItem, TreeItemKind};
use crate::config::ViewConfig;

/// Column titles for each kind of browser.
pub fn column_titles(kind: TreeItemKind) -> &'static [&'static str] {
    match kind {
        TreeItemKind::Recipe => &["Name", "Brew Date", "Style"],
        TreeItemKind::Equipment => &["Name", "Boil Time"],
        TreeItemKind::Fermentable => &["Name", "Type", "Color"],
        TreeItemKind::Hop => &["Name", "Form", "Use"],
        TreeItemKind::Misc => &["Name", "Type", "Use"],
        TreeItemKind::Yeast => &["Name", "Type", "Form"],
        TreeItemKind::Style => &["Name", "Category", "Number", "Letter", "Guide"],
        TreeItemKind::BrewNote => &["Brew Date"],
        TreeItemKind::Folder => &["Name", "Path", "Full Path"],
    }
}

struct Observer {
    node: NodeId,
    item: TreeItem,
    connection: ConnectionId,
}

impl Observer {
    fn disconnect(&self) {
        if let Some(signal) = self.item.changed() {
            signal.disconnect(self.connection);
        }
    }
}

/// A tree model for one browser.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use brewview::domain::Yeast;
/// use brewview::model::{BrewTreeModel, ItemModel, ItemRole, ModelIndex, TreeItem, TreeItemKind};
///
/// let model = BrewTreeModel::new(TreeItemKind::Yeast);
/// let yeast = Arc::new(Yeast::new("US-05"));
/// model.append_item(&ModelIndex::invalid(), TreeItem::Yeast(Some(yeast)));
///
/// let index = model.index(0, 0, &ModelIndex::invalid());
/// assert_eq!(model.data(&index, ItemRole::Display).as_string(), Some("US-05"));
/// ```
pub struct BrewTreeModel {
    kind: TreeItemKind,
    tree: RwLock<BrowserTree>,
    observers: Mutex<Vec<Observer>>,
    signals: ModelSignals,
    date_format: String,
}

impl BrewTreeModel {
    /// Creates an empty browser of `kind`.
    pub fn new(kind: TreeItemKind) -> Arc<Self> {
        Self::with_diagnostics(kind, default_diagnostics())
    }

    /// Creates an empty browser reporting misuse to `diagnostics`.
    pub fn with_diagnostics(kind: TreeItemKind, diagnostics: Arc<dyn Diagnostics>) -> Arc<Self> {
        Self::from_config(kind, &ViewConfig::default(), diagnostics)
    }

    /// Creates an empty browser printing dates with the configured format.
    pub fn from_config(
        kind: TreeItemKind,
        config: &ViewConfig,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Arc<Self> {
        Arc::new(Self {
            kind,
            tree: RwLock::new(BrowserTree::with_diagnostics(kind, diagnostics)),
            observers: Mutex::new(Vec::new()),
            signals: ModelSignals::new(),
            date_format: config.date_format.clone(),
        })
    }

    /// Dates become text for display; everything else passes through.
    ///
    /// A format chrono cannot apply falls back to ISO 8601.
    fn display_value(&self, value: ItemData) -> ItemData {
        let mut text = String::new();
        let (written, iso) = match value {
            ItemData::Date(date) => (
                write!(text, "{}", date.format(&self.date_format)),
                date.to_string(),
            ),
            ItemData::DateTime(at) => (
                write!(text, "{}", at.format(&self.date_format)),
                at.to_string(),
            ),
            other => return other,
        };
        ItemData::from(if written.is_ok() { text } else { iso })
    }

    /// The kind of record this browser lists.
    pub fn kind(&self) -> TreeItemKind {
        self.kind
    }

    /// Runs `f` with read access to the underlying tree.
    pub fn with_tree<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&BrowserTree) -> R,
    {
        f(&self.tree.read())
    }

    /// The node an index refers to; the root for an invalid index.
    ///
    /// Returns `None` if the index refers to a node that no longer exists.
    pub fn node_for(&self, index: &ModelIndex) -> Option<NodeId> {
        let tree = self.tree.read();
        Self::resolve(&tree, index)
    }

    fn resolve(tree: &BrowserTree, index: &ModelIndex) -> Option<NodeId> {
        if !index.is_valid() {
            return Some(tree.root());
        }
        let id = NodeId::from(KeyData::from_ffi(index.internal_id()));
        tree.contains(id).then_some(id)
    }

    /// The index of a node at `column`; invalid for the root or a stale id.
    pub fn index_for(&self, id: NodeId, column: usize) -> ModelIndex {
        let tree = self.tree.read();
        Self::build_index(&tree, id, column)
    }

    fn build_index(tree: &BrowserTree, id: NodeId, column: usize) -> ModelIndex {
        let Some(parent) = tree.parent(id) else {
            return ModelIndex::invalid();
        };
        let Some(row) = tree.child_number(id) else {
            return ModelIndex::invalid();
        };
        let parent_index = Self::build_index(tree, parent, 0);
        ModelIndex::with_internal_id(row, column, parent_index, id.data().as_ffi())
    }

    /// A copy of the payload at `index`.
    pub fn item(&self, index: &ModelIndex) -> Option<TreeItem> {
        let tree = self.tree.read();
        let id = Self::resolve(&tree, index)?;
        tree.item(id).cloned()
    }

    /// Inserts `count` placeholder rows of this browser's kind under `parent`.
    ///
    /// Returns `false` without emitting anything if `row` is negative or
    /// past the end, `count` is zero, or `parent` is stale.
    pub fn insert_rows(&self, row: isize, count: usize, parent: &ModelIndex) -> bool {
        let (parent_id, first, last) = {
            let tree = self.tree.read();
            let Some(parent_id) = Self::resolve(&tree, parent) else {
                return false;
            };
            let Ok(first) = usize::try_from(row) else {
                return false;
            };
            if count == 0 || first > tree.child_count(parent_id) {
                return false;
            }
            let Some(last) = first.checked_add(count - 1) else {
                return false;
            };
            (parent_id, first, last)
        };

        self.signals
            .emit_rows_inserted(parent.clone(), first, last, || {
                self.tree
                    .write()
                    .insert_children(parent_id, row, count, self.kind)
            })
    }

    /// Removes `count` rows starting at `row` under `parent`, with their subtrees.
    ///
    /// Observers of removed nodes are disconnected.
    pub fn remove_rows(&self, row: isize, count: usize, parent: &ModelIndex) -> bool {
        let (first, end, removed) = {
            let tree = self.tree.read();
            let Some(parent_id) = Self::resolve(&tree, parent) else {
                return false;
            };
            let Ok(first) = usize::try_from(row) else {
                return false;
            };
            let Some(end) = first.checked_add(count) else {
                return false;
            };
            if count == 0 || end > tree.child_count(parent_id) {
                return false;
            }
            let removed: Vec<NodeId> = tree.children(parent_id)[first..end]
                .iter()
                .flat_map(|&c| tree.descendants(c))
                .collect();
            (first, end, removed)
        };

        self.drop_observers(|node| removed.contains(&node));

        self.signals
            .emit_rows_removed(parent.clone(), first, end - 1, || {
                let mut tree = self.tree.write();
                let parent_id = Self::resolve(&tree, parent);
                parent_id.is_some_and(|p| tree.remove_children(p, row, count))
            })
    }

    /// Appends a row under `parent` carrying `item`.
    ///
    /// Returns the new node, or `None` if `parent` is stale.
    pub fn append_item(&self, parent: &ModelIndex, item: TreeItem) -> Option<NodeId> {
        let (parent_id, row) = {
            let tree = self.tree.read();
            let parent_id = Self::resolve(&tree, parent)?;
            (parent_id, tree.child_count(parent_id))
        };
        let position = isize::try_from(row).ok()?;

        self.signals.emit_rows_inserted(parent.clone(), row, row, || {
            let mut tree = self.tree.write();
            if !tree.insert_children(parent_id, position, 1, item.kind()) {
                return None;
            }
            let node = tree.child(parent_id, row)?;
            tree.set_item(node, item);
            Some(node)
        })
    }

    /// Replaces the payload at `index` and re-renders the row.
    pub fn set_item(&self, index: &ModelIndex, item: TreeItem) -> bool {
        let Some(id) = self.node_for(index).filter(|_| index.is_valid()) else {
            return false;
        };
        self.drop_observers(|node| node == id);
        if !self.tree.write().set_item(id, item) {
            return false;
        }
        self.emit_node_changed(id);
        true
    }

    /// Searches the whole browser for a node equal to `item`.
    pub fn find_item(&self, item: &TreeItem) -> ModelIndex {
        let tree = self.tree.read();
        tree.descendants(tree.root())
            .into_iter()
            .skip(1)
            .find(|&id| tree.item(id).is_some_and(|i| i == item))
            .map(|id| Self::build_index(&tree, id, 0))
            .unwrap_or_else(ModelIndex::invalid)
    }

    /// Re-renders `id` whenever its record changes.
    ///
    /// Returns `false` for a stale id or a placeholder.
    pub fn observe(self: &Arc<Self>, id: NodeId) -> bool {
        let Some(item) = self.tree.read().item(id).cloned() else {
            return false;
        };
        let Some(signal) = item.changed() else {
            return false;
        };

        let weak: Weak<Self> = Arc::downgrade(self);
        let connection = signal.connect(move |change| {
            if let Some(model) = weak.upgrade() {
                tracing::trace!(
                    target: targets::TREE,
                    property = change.property,
                    "record changed"
                );
                model.emit_node_changed(id);
            }
        });

        self.drop_observers(|node| node == id);
        self.observers.lock().push(Observer {
            node: id,
            item,
            connection,
        });
        true
    }

    /// Stops observing `id`.
    pub fn unobserve(&self, id: NodeId) {
        self.drop_observers(|node| node == id);
    }

    /// Number of observed nodes.
    pub fn observed_count(&self) -> usize {
        self.observers.lock().len()
    }

    fn drop_observers(&self, mut pred: impl FnMut(NodeId) -> bool) {
        let dropped = {
            let mut observers = self.observers.lock();
            let (dropped, kept): (Vec<Observer>, Vec<Observer>) =
                observers.drain(..).partition(|o| pred(o.node));
            *observers = kept;
            dropped
        };
        for observer in dropped {
            observer.disconnect();
        }
    }

    fn emit_node_changed(&self, id: NodeId) {
        let (left, right) = {
            let tree = self.tree.read();
            let last = tree.column_count(id).saturating_sub(1);
            let left = Self::build_index(&tree, id, 0);
            let right = left.sibling_at_column(last);
            (left, right)
        };
        self.signals
            .emit_data_changed(left, right, vec![ItemRole::Display]);
    }
}

impl Drop for BrewTreeModel {
    fn drop(&mut self) {
        for observer in self.observers.get_mut().drain(..) {
            observer.disconnect();
        }
    }
}

impl std::fmt::Debug for BrewTreeModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrewTreeModel")
            .field("kind", &self.kind)
            .field("tree", &*self.tree.read())
            .finish()
    }
}

impl ItemModel for BrewTreeModel {
    fn row_count(&self, parent: &ModelIndex) -> usize {
        let tree = self.tree.read();
        Self::resolve(&tree, parent)
            .map(|id| tree.child_count(id))
            .unwrap_or(0)
    }

    fn column_count(&self, _parent: &ModelIndex) -> usize {
        self.kind.column_count()
    }

    fn data(&self, index: &ModelIndex, role: ItemRole) -> ItemData {
        if !index.is_valid() {
            return ItemData::None;
        }
        let tree = self.tree.read();
        let Some(id) = Self::resolve(&tree, index) else {
            return ItemData::None;
        };
        match role {
            ItemRole::Display => self.display_value(tree.data(id, index.column())),
            ItemRole::Edit => tree.data(id, index.column()),
            ItemRole::ToolTip => tree
                .item(id)
                .map(|item| ItemData::from(item.kind().name()))
                .unwrap_or_default(),
            _ => ItemData::None,
        }
    }

    fn index(&self, row: usize, column: usize, parent: &ModelIndex) -> ModelIndex {
        if column >= self.kind.column_count() {
            return ModelIndex::invalid();
        }
        let tree = self.tree.read();
        let Some(parent_id) = Self::resolve(&tree, parent) else {
            return ModelIndex::invalid();
        };
        match tree.child(parent_id, row) {
            Some(child) => {
                ModelIndex::with_internal_id(row, column, parent.clone(), child.data().as_ffi())
            }
            None => ModelIndex::invalid(),
        }
    }

    fn parent(&self, index: &ModelIndex) -> ModelIndex {
        if !index.is_valid() {
            return ModelIndex::invalid();
        }
        let tree = self.tree.read();
        Self::resolve(&tree, index)
            .and_then(|id| tree.parent(id))
            .map(|parent| Self::build_index(&tree, parent, 0))
            .unwrap_or_else(ModelIndex::invalid)
    }

    fn signals(&self) -> &ModelSignals {
        &self.signals
    }

    fn flags(&self, index: &ModelIndex) -> ItemFlags {
        if self.node_for(index).is_some() && index.is_valid() {
            ItemFlags::new()
        } else {
            ItemFlags::disabled()
        }
    }

    fn header_data(&self, section: usize, orientation: Orientation, role: ItemRole) -> ItemData {
        if orientation != Orientation::Horizontal || role != ItemRole::Display {
            return ItemData::None;
        }
        column_titles(self.kind)
            .get(section)
            .map(|title| ItemData::from(*title))
            .unwrap_or_default()
    }
}

static_assertions::assert_impl_all!(BrewTreeModel: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Element, Folder, Hop, HopForm};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn root() -> ModelIndex {
        ModelIndex::invalid()
    }

    #[test]
    fn test_insert_and_remove_rows_emit_signals() {
        let model = BrewTreeModel::new(TreeItemKind::Hop);
        let events = Arc::new(Mutex::new(Vec::new()));

        let ev = events.clone();
        model.signals().rows_inserted.connect(move |(_, first, last)| {
            ev.lock().push(("inserted", *first, *last));
        });
        let ev = events.clone();
        model.signals().rows_removed.connect(move |(_, first, last)| {
            ev.lock().push(("removed", *first, *last));
        });

        assert!(!model.insert_rows(-1, 3, &root()));
        assert!(!model.insert_rows(1, 1, &root()));
        assert!(model.insert_rows(0, 3, &root()));
        assert_eq!(model.row_count(&root()), 3);

        assert!(!model.remove_rows(2, 2, &root()));
        assert!(model.remove_rows(1, 2, &root()));
        assert_eq!(model.row_count(&root()), 1);

        assert_eq!(
            events.lock().as_slice(),
            &[("inserted", 0, 2), ("removed", 1, 2)]
        );
    }

    #[test]
    fn test_oversized_row_ranges_are_refused() {
        let model = BrewTreeModel::new(TreeItemKind::Hop);
        assert!(model.insert_rows(0, 2, &root()));

        let events = Arc::new(AtomicUsize::new(0));
        let ev = events.clone();
        model.signals().rows_about_to_be_removed.connect(move |_| {
            ev.fetch_add(1, Ordering::SeqCst);
        });
        let ev = events.clone();
        model.signals().rows_about_to_be_inserted.connect(move |_| {
            ev.fetch_add(1, Ordering::SeqCst);
        });

        assert!(!model.remove_rows(1, usize::MAX, &root()));
        assert!(!model.remove_rows(0, usize::MAX, &root()));
        assert!(!model.insert_rows(1, usize::MAX, &root()));
        assert!(!model.insert_rows(2, usize::MAX, &root()));
        assert_eq!(model.row_count(&root()), 2);
        assert_eq!(events.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_index_parent_round_trip() {
        let model = BrewTreeModel::new(TreeItemKind::Folder);
        let folder = Arc::new(Folder::new("Ales", "/"));
        let node = model
            .append_item(&root(), TreeItem::Folder(Some(folder)))
            .unwrap();

        let folder_index = model.index_for(node, 0);
        assert_eq!(folder_index.row(), 0);
        assert!(model.insert_rows(0, 2, &folder_index));

        let child = model.index(1, 0, &folder_index);
        assert!(child.is_valid());
        let parent = model.parent(&child);
        assert_eq!(parent.internal_id(), folder_index.internal_id());
        assert!(!model.parent(&folder_index).is_valid());

        assert_eq!(model.data(&child, ItemRole::Display).as_string(), Some("Folder"));
        assert_eq!(model.data(&folder_index, ItemRole::Display).as_string(), Some("Ales"));
        assert!(!model.index(0, 3, &root()).is_valid());
    }

    #[test]
    fn test_stale_index_yields_nothing() {
        let model = BrewTreeModel::new(TreeItemKind::Hop);
        model.insert_rows(0, 1, &root());
        let index = model.index(0, 0, &root());
        assert!(model.remove_rows(0, 1, &root()));

        assert!(model.node_for(&index).is_none());
        assert!(model.data(&index, ItemRole::Display).is_none());
        assert!(model.item(&index).is_none());
        assert_eq!(model.row_count(&index), 0);
        assert!(!model.flags(&index).enabled);
    }

    #[test]
    fn test_observe_rerenders_row() {
        let model = BrewTreeModel::new(TreeItemKind::Hop);
        let hop = Arc::new(Hop::new("Saaz"));
        let node = model
            .append_item(&root(), TreeItem::Hop(Some(hop.clone())))
            .unwrap();
        assert!(model.observe(node));

        let changed = Arc::new(AtomicUsize::new(0));
        let c = changed.clone();
        model.signals().data_changed.connect(move |(left, right, _)| {
            assert_eq!(left.column(), 0);
            assert_eq!(right.column(), 2);
            c.fetch_add(1, Ordering::SeqCst);
        });

        hop.set_form(HopForm::Leaf);
        assert_eq!(changed.load(Ordering::SeqCst), 1);
        let index = model.index(0, 1, &root());
        assert_eq!(model.data(&index, ItemRole::Display).as_string(), Some("Leaf"));

        assert!(model.remove_rows(0, 1, &root()));
        assert_eq!(model.observed_count(), 0);
        assert_eq!(hop.changed().connection_count(), 0);
        hop.set_form(HopForm::Plug);
        assert_eq!(changed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_disconnects_observers() {
        let hop = Arc::new(Hop::new("Hallertau"));
        {
            let model = BrewTreeModel::new(TreeItemKind::Hop);
            let node = model
                .append_item(&root(), TreeItem::Hop(Some(hop.clone())))
                .unwrap();
            model.observe(node);
            assert_eq!(hop.changed().connection_count(), 1);
        }
        assert_eq!(hop.changed().connection_count(), 0);
    }

    #[test]
    fn test_headers_and_tooltips() {
        let model = BrewTreeModel::new(TreeItemKind::Style);
        assert_eq!(model.column_count(&root()), 5);
        assert_eq!(
            model.header_data(3, Orientation::Horizontal, ItemRole::Display).as_string(),
            Some("Letter")
        );
        assert!(model.header_data(5, Orientation::Horizontal, ItemRole::Display).is_none());

        model.insert_rows(0, 1, &root());
        let index = model.index(0, 0, &root());
        assert_eq!(model.data(&index, ItemRole::ToolTip).as_string(), Some("Style"));
    }

    #[test]
    fn test_find_item() {
        let model = BrewTreeModel::new(TreeItemKind::Hop);
        model.append_item(&root(), TreeItem::Hop(Some(Arc::new(Hop::new("Magnum")))));
        model.append_item(&root(), TreeItem::Hop(Some(Arc::new(Hop::new("Nugget")))));

        let found = model.find_item(&TreeItem::Hop(Some(Arc::new(Hop::new("Nugget")))));
        assert_eq!(found.row(), 1);
        let missing = model.find_item(&TreeItem::Hop(Some(Arc::new(Hop::new("Galena")))));
        assert!(!missing.is_valid());
    }

    #[test]
    fn test_dates_follow_configured_format() {
        use crate::domain::Recipe;
        use chrono::NaiveDate;

        let config = ViewConfig {
            date_format: "%d.%m.%Y".to_string(),
            ..ViewConfig::default()
        };
        let model =
            BrewTreeModel::from_config(TreeItemKind::Recipe, &config, default_diagnostics());
        let brewed = NaiveDate::from_ymd_opt(2023, 11, 4).unwrap();
        model.append_item(&root(), TreeItem::Recipe(Some(Arc::new(Recipe::new("Dunkel", brewed)))));

        let date = model.index(0, 1, &root());
        assert_eq!(model.display_text(&date).as_deref(), Some("04.11.2023"));
        assert_eq!(model.data(&date, ItemRole::Edit), ItemData::Date(brewed));
    }
}
