//! brewview - view adapters for brewing records.
//!
//! This crate turns brewing records (recipes, ingredients, equipment, ...)
//! into the row/column/role shape generic views consume, and keeps those
//! views current as the records change.
//!
//! - [`domain`]: the records, each with a change channel
//! - [`model`]: the browser tree and the observed ingredient tables
//! - [`editor`]: a headless mash editor
//! - [`units`] and [`config`]: how amounts are shown and parsed
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use brewview::domain::Fermentable;
//! use brewview::model::FermentableTableModel;
//!
//! let table = FermentableTableModel::new();
//! let pale = Arc::new(Fermentable::new("Pale Malt").with_amount_kg(2.0));
//! let crystal = Arc::new(Fermentable::new("Crystal 60").with_amount_kg(3.0));
//! table.add(&pale);
//! table.add(&crystal);
//! assert_eq!(table.total(), 5.0);
//!
//! pale.set_amount_kg(4.0);
//! assert_eq!(table.total(), 7.0);
//! ```

pub mod config;
pub mod domain;
pub mod editor;
mod error;
pub mod model;
pub mod units;

pub use brewview_core::{
    Diagnostic, DiagnosticKind, Diagnostics, RecordingDiagnostics, Signal, default_diagnostics,
};
pub use config::ViewConfig;
pub use error::{Error, Result};
