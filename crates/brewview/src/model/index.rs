//! Model index for addressing cells in table and tree models.
//!
//! A `ModelIndex` names one cell by row, column and parent. Tree models also
//! store the node handle of the addressed item in the index's internal ID so
//! lookups do not need to walk from the root.

use std::hash::{Hash, Hasher};

/// Represents a position within an `ItemModel`.
///
/// # Index Validity
///
/// Indices should be used immediately and not stored long-term. After rows are
/// inserted, removed or moved, an old index may address a different item. Tree
/// indices carry a generation-checked node handle, so a stale tree index
/// resolves to nothing rather than to the wrong node.
///
/// # Example
///
/// ```
/// use brewview::model::ModelIndex;
///
/// let root = ModelIndex::invalid();
/// let cell = ModelIndex::new(2, 1, root);
/// assert_eq!((cell.row(), cell.column()), (2, 1));
/// ```
#[derive(Clone)]
pub struct ModelIndex {
    row: usize,
    column: usize,
    parent: Option<Box<ModelIndex>>,
    internal_id: u64,
    valid: bool,
}

impl Default for ModelIndex {
    fn default() -> Self {
        Self::invalid()
    }
}

impl ModelIndex {
    /// Creates an invalid (null) model index.
    ///
    /// An invalid index stands for the root of a model when used as a parent,
    /// and for "no such item" when returned from a lookup.
    #[inline]
    pub const fn invalid() -> Self {
        Self {
            row: 0,
            column: 0,
            parent: None,
            internal_id: 0,
            valid: false,
        }
    }

    /// Creates a new valid model index with no internal ID.
    #[inline]
    pub fn new(row: usize, column: usize, parent: ModelIndex) -> Self {
        Self::with_internal_id(row, column, parent, 0)
    }

    /// Creates a new valid model index carrying a model-specific ID.
    #[inline]
    pub fn with_internal_id(
        row: usize,
        column: usize,
        parent: ModelIndex,
        internal_id: u64,
    ) -> Self {
        Self {
            row,
            column,
            parent: if parent.is_valid() {
                Some(Box::new(parent))
            } else {
                None
            },
            internal_id,
            valid: true,
        }
    }

    /// Returns `true` if this is a valid index.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Returns the row of this index within its parent (0 when invalid).
    #[inline]
    pub fn row(&self) -> usize {
        self.row
    }

    /// Returns the column of this index (0 when invalid).
    #[inline]
    pub fn column(&self) -> usize {
        self.column
    }

    /// Returns the parent index, or an invalid index for top-level items.
    #[inline]
    pub fn parent(&self) -> ModelIndex {
        match &self.parent {
            Some(parent) => (**parent).clone(),
            None => ModelIndex::invalid(),
        }
    }

    /// Returns the internal ID associated with this index.
    #[inline]
    pub fn internal_id(&self) -> u64 {
        self.internal_id
    }

    /// Creates an index for another cell of the same item.
    ///
    /// Returns an invalid index if this index is invalid.
    #[inline]
    pub fn sibling_at_column(&self, column: usize) -> ModelIndex {
        if !self.is_valid() {
            return ModelIndex::invalid();
        }
        ModelIndex::with_internal_id(self.row, column, self.parent(), self.internal_id)
    }

    /// Returns the depth of this index in the hierarchy (0 for top level).
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.parent.as_deref();
        while let Some(parent) = current {
            depth += 1;
            current = parent.parent.as_deref();
        }
        depth
    }
}

impl std::fmt::Debug for ModelIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            f.debug_struct("ModelIndex")
                .field("row", &self.row)
                .field("column", &self.column)
                .field("depth", &self.depth())
                .field("internal_id", &self.internal_id)
                .finish()
        } else {
            write!(f, "ModelIndex(invalid)")
        }
    }
}

impl PartialEq for ModelIndex {
    fn eq(&self, other: &Self) -> bool {
        match (self.is_valid(), other.is_valid()) {
            (false, false) => true,
            (true, true) => {
                self.row == other.row
                    && self.column == other.column
                    && self.internal_id == other.internal_id
                    && self.parent == other.parent
            }
            _ => false,
        }
    }
}

impl Eq for ModelIndex {}

impl Hash for ModelIndex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.valid.hash(state);
        if self.valid {
            self.row.hash(state);
            self.column.hash(state);
            self.internal_id.hash(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_is_invalid() {
        let root = ModelIndex::invalid();
        assert!(!root.is_valid());
        assert_eq!(root, ModelIndex::default());
        assert_eq!(format!("{root:?}"), "ModelIndex(invalid)");
    }

    #[test]
    fn test_recipe_inside_folder() {
        let folder = ModelIndex::with_internal_id(0, 0, ModelIndex::invalid(), 7);
        let recipe = ModelIndex::with_internal_id(2, 1, folder.clone(), 9);

        assert_eq!(recipe.parent(), folder);
        assert!(!folder.parent().is_valid());
        assert_eq!(recipe.depth(), 1);
        assert_eq!(folder.depth(), 0);
    }

    #[test]
    fn test_sibling_addresses_same_node() {
        let name = ModelIndex::with_internal_id(3, 0, ModelIndex::invalid(), 11);
        let style = name.sibling_at_column(2);

        assert_eq!((style.row(), style.column()), (3, 2));
        assert_eq!(style.internal_id(), 11);
        assert!(!ModelIndex::invalid().sibling_at_column(1).is_valid());
    }

    #[test]
    fn test_node_handle_takes_part_in_equality() {
        let a = ModelIndex::with_internal_id(1, 0, ModelIndex::invalid(), 4);
        let b = ModelIndex::with_internal_id(1, 0, ModelIndex::invalid(), 4);
        let reused_row = ModelIndex::with_internal_id(1, 0, ModelIndex::invalid(), 5);

        assert_eq!(a, b);
        assert_ne!(a, reused_row);
        assert_ne!(a, ModelIndex::invalid());
    }
}
