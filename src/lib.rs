//! Azure Resource Manager provider
//!
//! Resource adapters that map declarative attribute maps onto ARM REST calls
//! for Azure VMware Solution, Portal, Cognitive Search and Stream Analytics.
//!
//! # Module Structure
//!
//! - [`azure`] - ARM client, HTTP transport and long-running-operation poller
//! - [`resourceid`] - Typed resource IDs
//! - [`schema`] - Attribute schemas and per-instance state
//! - [`provider`] - Resource contracts, registry, timeouts and the dispatcher
//! - [`services`] - One module per Azure service
//! - [`config`] - Provider configuration

pub mod azure;
pub mod config;
pub mod error;
pub mod provider;
pub mod resourceid;
pub mod schema;
pub mod services;

pub use error::{Error, Result};

/// Version injected at compile time via AZURERM_PROVIDER_VERSION (set by CI),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("AZURERM_PROVIDER_VERSION") {
    Some(v) => v,
    None => "dev",
};
