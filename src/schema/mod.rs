//! Attribute schemas and per-instance state
//!
//! - [`attribute`] - Schema model, boundary validation, defaults, replacement detection
//! - [`data`] - [`ResourceData`], the state object every operation works on
//! - [`validate`] - Reusable attribute validators

pub mod attribute;
pub mod data;
pub mod validate;

pub use attribute::{Attribute, Element, Schema, ValueType, TIMEOUTS_KEY};
pub use data::ResourceData;
pub use validate::Validation;
