//! Core notification systems for brewview.
//!
//! This crate provides the pieces every model and domain record is built on:
//!
//! - **Signal/Slot System**: Type-safe, synchronous change channels
//! - **Property System**: Field cells that report whether a write changed them
//! - **Diagnostics**: An injectable sink for non-fatal misuse reports
//! - **Logging**: `tracing` target names for filtering
//!
//! # Example
//!
//! ```
//! use brewview_core::{Property, Signal};
//!
//! struct Hop {
//!     alpha: Property<f64>,
//!     changed: Signal<f64>,
//! }
//!
//! let hop = Hop { alpha: Property::new(5.5), changed: Signal::new() };
//! hop.changed.connect(|alpha| println!("alpha now {alpha}"));
//!
//! if hop.alpha.set(6.0) {
//!     hop.changed.emit(6.0);
//! }
//! ```

mod diagnostics;
pub mod logging;
pub mod property;
pub mod signal;

pub use diagnostics::{
    Diagnostic, DiagnosticKind, Diagnostics, RecordingDiagnostics, TracingDiagnostics,
    default_diagnostics,
};
pub use property::Property;
pub use signal::{ConnectionId, Signal};
