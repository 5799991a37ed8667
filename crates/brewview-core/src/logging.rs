//! Logging facilities for brewview.
//!
//! brewview uses the `tracing` crate for instrumentation. To see logs, install
//! a subscriber in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("brewview=debug,brewview_core::signal=trace")
//!     .init();
//! ```
//!
//! Conditions that indicate a programming error in a caller (bad column, bad
//! row, unknown discriminant) are not logged directly by the models. They go
//! through an injected [`Diagnostics`](crate::Diagnostics) sink, whose default
//! implementation forwards to `tracing` under the targets below.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Signal/slot system target.
    pub const SIGNAL: &str = "brewview_core::signal";
    /// Diagnostics forwarded by [`TracingDiagnostics`](crate::TracingDiagnostics).
    pub const DIAGNOSTICS: &str = "brewview_core::diagnostics";
    /// Browser tree target.
    pub const TREE: &str = "brewview::tree";
    /// Table model target.
    pub const TABLE: &str = "brewview::table";
    /// Editor target.
    pub const EDITOR: &str = "brewview::editor";
    /// Configuration target.
    pub const CONFIG: &str = "brewview::config";
}

/// Span names used throughout brewview for tracing.
pub mod span_names {
    /// Signal emission span.
    pub const SIGNAL: &str = "brewview::signal";
    /// Table aggregate recomputation span.
    pub const RECOMPUTE: &str = "brewview::table::recompute";
}
