//! The heterogeneous browser tree.
//!
//! Every node of the recipe browser carries a [`TreeItem`]: one variant per
//! kind of brewing record, each holding an optional shared reference to a
//! record of exactly that kind. A node without a record is a placeholder
//! (a category header such as "Hops") and renders its kind's label in
//! column 0.
//!
//! Nodes live in a [`BrowserTree`] arena and are addressed by [`NodeId`].
//! Ids are generation checked: once a subtree is removed, every id into it
//! is stale and all accessors return `None`, `0` or `ItemData::None`.
//!
//! ```
//! use std::sync::Arc;
//! use brewview::domain::Hop;
//! use brewview::model::{BrowserTree, TreeItem, TreeItemKind};
//!
//! let mut tree = BrowserTree::new(TreeItemKind::Hop);
//! let root = tree.root();
//! assert!(tree.insert_children(root, 0, 1, TreeItemKind::Hop));
//!
//! let node = tree.child(root, 0).unwrap();
//! tree.set_item(node, TreeItem::Hop(Some(Arc::new(Hop::new("Cascade")))));
//! assert_eq!(tree.data(node, 0).as_string(), Some("Cascade"));
//! ```

use std::sync::Arc;

use brewview_core::logging::targets;
use brewview_core::{Diagnostic, DiagnosticKind, Diagnostics, Signal, default_diagnostics};
use slotmap::SlotMap;

use super::role::ItemData;
use crate::domain::{
    BrewNote, Element, ElementChange, Equipment, Fermentable, Folder, Hop, Misc, Recipe, Style,
    Yeast,
};

slotmap::new_key_type! {
    /// Generation-checked handle to a node in a [`BrowserTree`].
    pub struct NodeId;
}

/// The kind of record a tree node carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TreeItemKind {
    /// Recipes.
    Recipe,
    /// Equipment profiles.
    Equipment,
    /// Fermentables.
    Fermentable,
    /// Hops.
    Hop,
    /// Miscellaneous additions.
    Misc,
    /// Yeasts.
    Yeast,
    /// Styles.
    Style,
    /// Brew notes.
    BrewNote,
    /// Folders.
    Folder,
}

impl TreeItemKind {
    /// Every kind, in discriminant order.
    pub const ALL: [TreeItemKind; 9] = [
        TreeItemKind::Recipe,
        TreeItemKind::Equipment,
        TreeItemKind::Fermentable,
        TreeItemKind::Hop,
        TreeItemKind::Misc,
        TreeItemKind::Yeast,
        TreeItemKind::Style,
        TreeItemKind::BrewNote,
        TreeItemKind::Folder,
    ];

    /// The raw discriminant.
    pub fn value(&self) -> i32 {
        match self {
            TreeItemKind::Recipe => 0,
            TreeItemKind::Equipment => 1,
            TreeItemKind::Fermentable => 2,
            TreeItemKind::Hop => 3,
            TreeItemKind::Misc => 4,
            TreeItemKind::Yeast => 5,
            TreeItemKind::Style => 6,
            TreeItemKind::BrewNote => 7,
            TreeItemKind::Folder => 8,
        }
    }

    /// Looks a kind up by raw discriminant.
    pub fn from_value(value: i32) -> Option<Self> {
        usize::try_from(value)
            .ok()
            .and_then(|i| Self::ALL.get(i))
            .copied()
    }

    /// Number of columns a node of this kind renders.
    pub fn column_count(&self) -> usize {
        match self {
            TreeItemKind::Recipe => 3,
            TreeItemKind::Equipment => 2,
            TreeItemKind::Fermentable => 3,
            TreeItemKind::Hop => 3,
            TreeItemKind::Misc => 3,
            TreeItemKind::Yeast => 3,
            TreeItemKind::Style => 5,
            TreeItemKind::BrewNote => 1,
            TreeItemKind::Folder => 3,
        }
    }

    /// Column count for a raw discriminant.
    ///
    /// An unknown discriminant is reported as [`DiagnosticKind::UnknownKind`]
    /// and yields 0.
    pub fn column_count_for_value(value: i32, diagnostics: &dyn Diagnostics) -> usize {
        match Self::from_value(value) {
            Some(kind) => kind.column_count(),
            None => {
                diagnostics.report(Diagnostic::new(
                    "TreeItemKind::column_count",
                    DiagnosticKind::UnknownKind,
                    format!("discriminant {value}"),
                ));
                0
            }
        }
    }

    /// The category label a placeholder of this kind shows.
    pub fn label(&self) -> &'static str {
        match self {
            TreeItemKind::Recipe => "Recipes",
            TreeItemKind::Equipment => "Equipment",
            TreeItemKind::Fermentable => "Fermentables",
            TreeItemKind::Hop => "Hops",
            TreeItemKind::Misc => "Miscellaneous",
            TreeItemKind::Yeast => "Yeast",
            TreeItemKind::Style => "Style",
            TreeItemKind::BrewNote => "Brew Notes",
            TreeItemKind::Folder => "Folder",
        }
    }

    /// The kind's type name.
    pub fn name(&self) -> &'static str {
        match self {
            TreeItemKind::Recipe => "Recipe",
            TreeItemKind::Equipment => "Equipment",
            TreeItemKind::Fermentable => "Fermentable",
            TreeItemKind::Hop => "Hop",
            TreeItemKind::Misc => "Misc",
            TreeItemKind::Yeast => "Yeast",
            TreeItemKind::Style => "Style",
            TreeItemKind::BrewNote => "BrewNote",
            TreeItemKind::Folder => "Folder",
        }
    }
}

/// The payload of a tree node.
///
/// `None` inside a variant marks a placeholder of that kind.
#[derive(Debug, Clone)]
pub enum TreeItem {
    /// A recipe.
    Recipe(Option<Arc<Recipe>>),
    /// An equipment profile.
    Equipment(Option<Arc<Equipment>>),
    /// A fermentable.
    Fermentable(Option<Arc<Fermentable>>),
    /// A hop.
    Hop(Option<Arc<Hop>>),
    /// A miscellaneous addition.
    Misc(Option<Arc<Misc>>),
    /// A yeast.
    Yeast(Option<Arc<Yeast>>),
    /// A style.
    Style(Option<Arc<Style>>),
    /// A brew note.
    BrewNote(Option<Arc<BrewNote>>),
    /// A folder.
    Folder(Option<Arc<Folder>>),
}

macro_rules! typed_accessors {
    ($($(#[$meta:meta])* $fn:ident => $variant:ident: $ty:ty;)*) => {
        $(
            $(#[$meta])*
            pub fn $fn(&self) -> Option<&Arc<$ty>> {
                match self {
                    TreeItem::$variant(item) => item.as_ref(),
                    _ => None,
                }
            }
        )*
    };
}

macro_rules! with_element {
    ($item:expr, $e:ident => $body:expr) => {
        match $item {
            TreeItem::Recipe(Some($e)) => Some($body),
            TreeItem::Equipment(Some($e)) => Some($body),
            TreeItem::Fermentable(Some($e)) => Some($body),
            TreeItem::Hop(Some($e)) => Some($body),
            TreeItem::Misc(Some($e)) => Some($body),
            TreeItem::Yeast(Some($e)) => Some($body),
            TreeItem::Style(Some($e)) => Some($body),
            TreeItem::BrewNote(Some($e)) => Some($body),
            TreeItem::Folder(Some($e)) => Some($body),
            _ => None,
        }
    };
}

impl TreeItem {
    /// A placeholder of the given kind.
    pub fn placeholder(kind: TreeItemKind) -> Self {
        match kind {
            TreeItemKind::Recipe => TreeItem::Recipe(None),
            TreeItemKind::Equipment => TreeItem::Equipment(None),
            TreeItemKind::Fermentable => TreeItem::Fermentable(None),
            TreeItemKind::Hop => TreeItem::Hop(None),
            TreeItemKind::Misc => TreeItem::Misc(None),
            TreeItemKind::Yeast => TreeItem::Yeast(None),
            TreeItemKind::Style => TreeItem::Style(None),
            TreeItemKind::BrewNote => TreeItem::BrewNote(None),
            TreeItemKind::Folder => TreeItem::Folder(None),
        }
    }

    /// The item's kind.
    pub fn kind(&self) -> TreeItemKind {
        match self {
            TreeItem::Recipe(_) => TreeItemKind::Recipe,
            TreeItem::Equipment(_) => TreeItemKind::Equipment,
            TreeItem::Fermentable(_) => TreeItemKind::Fermentable,
            TreeItem::Hop(_) => TreeItemKind::Hop,
            TreeItem::Misc(_) => TreeItemKind::Misc,
            TreeItem::Yeast(_) => TreeItemKind::Yeast,
            TreeItem::Style(_) => TreeItemKind::Style,
            TreeItem::BrewNote(_) => TreeItemKind::BrewNote,
            TreeItem::Folder(_) => TreeItemKind::Folder,
        }
    }

    /// Returns `true` if a record is attached.
    pub fn has_object(&self) -> bool {
        with_element!(self, _e => ()).is_some()
    }

    /// Number of columns this item renders.
    pub fn column_count(&self) -> usize {
        self.kind().column_count()
    }

    /// The attached record's change channel.
    pub fn changed(&self) -> Option<&Signal<ElementChange>> {
        with_element!(self, e => e.changed())
    }

    /// The attached record's key.
    pub fn key(&self) -> Option<i64> {
        with_element!(self, e => e.key())
    }

    typed_accessors! {
        /// The attached recipe.
        as_recipe => Recipe: Recipe;
        /// The attached equipment profile.
        as_equipment => Equipment: Equipment;
        /// The attached fermentable.
        as_fermentable => Fermentable: Fermentable;
        /// The attached hop.
        as_hop => Hop: Hop;
        /// The attached miscellaneous addition.
        as_misc => Misc: Misc;
        /// The attached yeast.
        as_yeast => Yeast: Yeast;
        /// The attached style.
        as_style => Style: Style;
        /// The attached brew note.
        as_brew_note => BrewNote: BrewNote;
        /// The attached folder.
        as_folder => Folder: Folder;
    }

    /// Renders one column, reporting unknown columns to the tracing sink.
    pub fn column_value(&self, column: usize) -> ItemData {
        self.column_value_with(column, &brewview_core::TracingDiagnostics)
    }

    /// Renders one column, reporting unknown columns to `diagnostics`.
    ///
    /// A placeholder renders its kind's label at column 0 and nothing elsewhere.
    pub fn column_value_with(&self, column: usize, diagnostics: &dyn Diagnostics) -> ItemData {
        let value = match self {
            TreeItem::Recipe(Some(r)) => data_recipe(r, column),
            TreeItem::Equipment(Some(e)) => data_equipment(e, column),
            TreeItem::Fermentable(Some(f)) => data_fermentable(f, column),
            TreeItem::Hop(Some(h)) => data_hop(h, column),
            TreeItem::Misc(Some(m)) => data_misc(m, column),
            TreeItem::Yeast(Some(y)) => data_yeast(y, column),
            TreeItem::Style(Some(s)) => data_style(s, column),
            TreeItem::BrewNote(Some(n)) => data_brew_note(n, column),
            TreeItem::Folder(Some(f)) => data_folder(f, column),
            placeholder => {
                return if column == 0 {
                    ItemData::from(placeholder.kind().label())
                } else {
                    ItemData::None
                };
            }
        };

        value.unwrap_or_else(|| {
            diagnostics.report(Diagnostic::new(
                "TreeItem::column_value",
                DiagnosticKind::BadColumn,
                format!("{} column {column}", self.kind().name()),
            ));
            ItemData::None
        })
    }
}

impl PartialEq for TreeItem {
    /// Items are equal when they have the same kind and the same column-0 value.
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind() && self.column_value(0) == other.column_value(0)
    }
}

fn data_recipe(recipe: &Recipe, column: usize) -> Option<ItemData> {
    match column {
        0 => Some(ItemData::from(recipe.name())),
        1 => Some(ItemData::from(recipe.date())),
        2 => Some(ItemData::from(recipe.style().map(|s| s.name()))),
        _ => None,
    }
}

fn data_equipment(equipment: &Equipment, column: usize) -> Option<ItemData> {
    match column {
        0 => Some(ItemData::from(equipment.name())),
        1 => Some(ItemData::from(equipment.boil_time_min())),
        _ => None,
    }
}

fn data_fermentable(fermentable: &Fermentable, column: usize) -> Option<ItemData> {
    match column {
        0 => Some(ItemData::from(fermentable.name())),
        1 => Some(ItemData::from(fermentable.fermentable_type())),
        2 => Some(ItemData::from(fermentable.color_srm())),
        _ => None,
    }
}

fn data_hop(hop: &Hop, column: usize) -> Option<ItemData> {
    match column {
        0 => Some(ItemData::from(hop.name())),
        1 => Some(ItemData::from(hop.form())),
        2 => Some(ItemData::from(hop.hop_use())),
        _ => None,
    }
}

fn data_misc(misc: &Misc, column: usize) -> Option<ItemData> {
    match column {
        0 => Some(ItemData::from(misc.name())),
        1 => Some(ItemData::from(misc.misc_type())),
        2 => Some(ItemData::from(misc.misc_use())),
        _ => None,
    }
}

fn data_yeast(yeast: &Yeast, column: usize) -> Option<ItemData> {
    match column {
        0 => Some(ItemData::from(yeast.name())),
        1 => Some(ItemData::from(yeast.yeast_type())),
        2 => Some(ItemData::from(yeast.form())),
        _ => None,
    }
}

fn data_style(style: &Style, column: usize) -> Option<ItemData> {
    match column {
        0 => Some(ItemData::from(style.name())),
        1 => Some(ItemData::from(style.category())),
        2 => Some(ItemData::from(style.category_number())),
        3 => Some(ItemData::from(style.style_letter())),
        4 => Some(ItemData::from(style.style_guide())),
        _ => None,
    }
}

fn data_brew_note(note: &BrewNote, column: usize) -> Option<ItemData> {
    match column {
        0 => Some(ItemData::from(note.brew_date_short())),
        _ => None,
    }
}

fn data_folder(folder: &Folder, column: usize) -> Option<ItemData> {
    match column {
        0 => Some(ItemData::from(folder.name())),
        1 => Some(ItemData::from(folder.path())),
        2 => Some(ItemData::from(folder.full_path())),
        _ => None,
    }
}

/// A node in the arena.
#[derive(Debug)]
struct TreeNode {
    item: TreeItem,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl TreeNode {
    fn new(item: TreeItem, parent: Option<NodeId>) -> Self {
        Self {
            item,
            children: Vec::new(),
            parent,
        }
    }
}

/// Arena of browser nodes under a single root.
pub struct BrowserTree {
    nodes: SlotMap<NodeId, TreeNode>,
    root: NodeId,
    diagnostics: Arc<dyn Diagnostics>,
}

impl std::fmt::Debug for BrowserTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrowserTree")
            .field("root", &self.root)
            .field("node_count", &self.nodes.len())
            .finish()
    }
}

impl BrowserTree {
    /// Creates a tree whose root is a placeholder of `root_kind`.
    pub fn new(root_kind: TreeItemKind) -> Self {
        Self::with_diagnostics(root_kind, default_diagnostics())
    }

    /// Creates a tree reporting misuse to `diagnostics`.
    pub fn with_diagnostics(root_kind: TreeItemKind, diagnostics: Arc<dyn Diagnostics>) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(TreeNode::new(TreeItem::placeholder(root_kind), None));
        Self {
            nodes,
            root,
            diagnostics,
        }
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The injected diagnostics sink.
    pub fn diagnostics(&self) -> &Arc<dyn Diagnostics> {
        &self.diagnostics
    }

    /// Total number of live nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if only the root exists.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Returns `true` if `id` names a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// The node's payload.
    pub fn item(&self, id: NodeId) -> Option<&TreeItem> {
        self.nodes.get(id).map(|n| &n.item)
    }

    /// The child at `index`, or `None` if out of range.
    pub fn child(&self, parent: NodeId, index: usize) -> Option<NodeId> {
        self.nodes.get(parent)?.children.get(index).copied()
    }

    /// The node's children in order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Number of children; 0 for a stale id.
    pub fn child_count(&self, id: NodeId) -> usize {
        self.children(id).len()
    }

    /// The node's parent; `None` for the root or a stale id.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id)?.parent
    }

    /// The node's row within its parent; 0 for the root.
    pub fn child_number(&self, id: NodeId) -> Option<usize> {
        let node = self.nodes.get(id)?;
        match node.parent {
            Some(parent) => self.children(parent).iter().position(|&c| c == id),
            None => Some(0),
        }
    }

    /// Inserts `count` placeholders of `kind` before `position`.
    ///
    /// Returns `false` without changing anything if the parent is stale or
    /// `position` is outside `0..=child_count`.
    pub fn insert_children(
        &mut self,
        parent: NodeId,
        position: isize,
        count: usize,
        kind: TreeItemKind,
    ) -> bool {
        let Some(len) = self.nodes.get(parent).map(|n| n.children.len()) else {
            return false;
        };
        let Ok(position) = usize::try_from(position) else {
            return false;
        };
        if position > len {
            return false;
        }

        let new_ids: Vec<NodeId> = (0..count)
            .map(|_| {
                self.nodes
                    .insert(TreeNode::new(TreeItem::placeholder(kind), Some(parent)))
            })
            .collect();
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.splice(position..position, new_ids);
        }
        tracing::trace!(
            target: targets::TREE,
            position,
            count,
            kind = kind.name(),
            "inserted children"
        );
        true
    }

    /// Removes `count` children starting at `position`, with their subtrees.
    ///
    /// Returns `false` without changing anything if the parent is stale or
    /// the range is not within the children. Records referenced by removed
    /// nodes are released, not destroyed.
    pub fn remove_children(&mut self, parent: NodeId, position: isize, count: usize) -> bool {
        let Some(len) = self.nodes.get(parent).map(|n| n.children.len()) else {
            return false;
        };
        let Ok(position) = usize::try_from(position) else {
            return false;
        };
        let Some(end) = position.checked_add(count) else {
            return false;
        };
        if end > len {
            return false;
        }

        let removed: Vec<NodeId> = match self.nodes.get_mut(parent) {
            Some(node) => node.children.drain(position..end).collect(),
            None => return false,
        };
        for id in removed {
            self.remove_subtree(id);
        }
        tracing::trace!(target: targets::TREE, position, count, "removed children");
        true
    }

    fn remove_subtree(&mut self, id: NodeId) {
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(node) = self.nodes.remove(next) {
                pending.extend(node.children);
            }
        }
    }

    /// Attaches a payload, replacing the previous one.
    ///
    /// Returns `false` for a stale id.
    pub fn set_item(&mut self, id: NodeId, item: TreeItem) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.item = item;
                true
            }
            None => false,
        }
    }

    /// Detaches the record, leaving a placeholder of the same kind.
    pub fn clear_item(&mut self, id: NodeId) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.item = TreeItem::placeholder(node.item.kind());
                true
            }
            None => false,
        }
    }

    /// Renders one column of a node; `ItemData::None` for a stale id.
    pub fn data(&self, id: NodeId, column: usize) -> ItemData {
        match self.nodes.get(id) {
            Some(node) => node.item.column_value_with(column, self.diagnostics.as_ref()),
            None => ItemData::None,
        }
    }

    /// Column count of a node; 0 for a stale id.
    pub fn column_count(&self, id: NodeId) -> usize {
        self.item(id).map(TreeItem::column_count).unwrap_or(0)
    }

    /// The first child whose payload equals `item`.
    pub fn find_child(&self, parent: NodeId, item: &TreeItem) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&c| self.item(c).is_some_and(|i| i == item))
    }

    /// Every live node in depth-first order, starting at `id`.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.contains(id) {
            return out;
        }
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            out.push(next);
            pending.extend(self.children(next).iter().rev().copied());
        }
        out
    }
}
