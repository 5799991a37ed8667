//! Model/View adapters for brewing records.
//!
//! Views never touch records directly. They ask a model for a cell by
//! `ModelIndex` and `ItemRole`, get an `ItemData` back, and listen to the
//! model's `ModelSignals` to learn when to ask again.
//!
//! # Core Types
//!
//! - `ModelIndex`: Identifies an item's position in a model
//! - `ItemRole`: Selects the render mode (display text, raw value, check state)
//! - `ItemData`: Type-erased container for one cell value
//! - `ItemModel`: The trait that models implement
//! - `ModelSignals`: Signals for change notifications
//!
//! # Model Implementations
//!
//! - `BrowserTree` / `BrewTreeModel`: The heterogeneous recipe browser tree
//! - `ObservedTableModel`: Tables synchronized with their records' change
//!   channels (`FermentableTableModel`, `HopTableModel`)
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use brewview::domain::Hop;
//! use brewview::model::{HopTableModel, ItemModel, ItemRole, ModelIndex};
//!
//! let table = HopTableModel::new();
//! table.signals().model_reset.connect(|_| println!("re-pull everything"));
//!
//! table.add(&Arc::new(Hop::new("Cascade").with_amount_kg(0.028)));
//! let name = table.index(0, 0, &ModelIndex::invalid());
//! assert_eq!(table.data(&name, ItemRole::Display).as_string(), Some("Cascade"));
//! ```

mod columns;
mod index;
mod role;
mod table_model;
mod traits;
mod tree;
mod tree_model;

pub use columns::{FermentableColumns, FermentableTableModel, HopColumns, HopTableModel};
pub use index::ModelIndex;
pub use role::{CheckState, ItemData, ItemRole};
pub use table_model::{ObservedTableModel, TableColumns};
pub use traits::{ItemFlags, ItemModel, ModelSignals, Orientation};
pub use tree::{BrowserTree, NodeId, TreeItem, TreeItemKind};
pub use tree_model::{BrewTreeModel, column_titles};
