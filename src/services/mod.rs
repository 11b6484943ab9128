//! Azure service adapters
//!
//! Each service module owns its typed IDs, its API models and clients, and
//! the resources and data sources built on them, and exposes a `register`
//! function that adds them to a [`Registry`].

pub mod common;
pub mod portal;
pub mod search;
pub mod streamanalytics;
pub mod vmware;

use crate::provider::Registry;

/// Register every resource and data source this provider ships.
pub fn register_all(registry: &mut Registry) {
    vmware::register(registry);
    portal::register(registry);
    search::register(registry);
    streamanalytics::register(registry);
}
