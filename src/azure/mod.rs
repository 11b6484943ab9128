//! Azure Resource Manager interaction module
//!
//! This module provides the core functionality for talking to the ARM REST
//! API: an HTTP transport, a client that turns resource IDs into request
//! URLs, and a poller for long-running operations.
//!
//! # Module Structure
//!
//! - [`client`] - Main ARM client for making API requests
//! - [`http`] - HTTP utilities for REST API calls
//! - [`poller`] - Long-running operation polling with an injectable clock
//!
//! # Example
//!
//! ```ignore
//! use azurerm_provider::azure::client::ArmClient;
//!
//! async fn example(client: &ArmClient) -> azurerm_provider::Result<()> {
//!     let body: serde_json::Value = client
//!         .get_json("/subscriptions/xxx/resourceGroups/rg", "2021-04-01")
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod http;
pub mod poller;

pub use client::{AccessToken, ArmClient};
pub use http::ArmResponse;
pub use poller::{Clock, Deadline, OperationState, PollTarget, Poller, SystemClock};
