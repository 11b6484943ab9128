//! Provider runtime
//!
//! This module connects the resource implementations in [`crate::services`]
//! to the plugin host.
//!
//! # Module Structure
//!
//! - [`lifecycle`] - `Resource` / `DataSource` traits and shared CRUD helpers
//! - [`registry`] - Explicit registry of every supported type
//! - [`dispatch`] - `Provider`, the entry point for each host request
//! - [`timeouts`] - Per-operation time budgets

pub mod dispatch;
pub mod lifecycle;
pub mod registry;
pub mod timeouts;

pub use dispatch::{InstanceState, PlanAction, Provider};
pub use lifecycle::{
    conflict_as_exists, ensure_absent, found_or_gone, tolerate_not_found, DataSource,
    OperationFuture, Resource, ResourceMeta,
};
pub use registry::Registry;
pub use timeouts::{Operation, Timeouts};
