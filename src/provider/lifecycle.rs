//! Resource and data source contracts
//!
//! Every resource type implements [`Resource`]; every data source implements
//! [`DataSource`]. Operations receive a [`ResourceMeta`] holding the client,
//! the per-instance state and the deadline for the operation, and return a
//! boxed future so that implementations can be stored as trait objects in
//! the [`Registry`](super::Registry).

use super::timeouts::Timeouts;
use crate::azure::{ArmClient, Deadline};
use crate::error::{Error, Result, ResultExt};
use crate::schema::{ResourceData, Schema};
use futures::future::BoxFuture;
use std::fmt;

/// Future returned by every lifecycle operation.
pub type OperationFuture<'a> = BoxFuture<'a, Result<()>>;

/// Everything one operation works with.
pub struct ResourceMeta<'a> {
    pub client: &'a ArmClient,
    pub data: &'a mut ResourceData,
    pub deadline: Deadline,
}

/// A managed resource type.
pub trait Resource: Send + Sync {
    /// Type name as used in configuration, e.g. `azurerm_search_service`.
    fn resource_type(&self) -> &'static str;

    fn schema(&self) -> Schema;

    fn timeouts(&self) -> Timeouts {
        Timeouts::default()
    }

    /// Check that `id` is a canonical ID of this resource type.
    fn validate_id(&self, id: &str) -> Result<()>;

    fn create<'a>(&'a self, meta: ResourceMeta<'a>) -> OperationFuture<'a>;

    /// Refresh state from the remote object; clears the ID when it is gone.
    fn read<'a>(&'a self, meta: ResourceMeta<'a>) -> OperationFuture<'a>;

    fn update<'a>(&'a self, meta: ResourceMeta<'a>) -> OperationFuture<'a> {
        let _ = meta;
        let err = Error::UpdateNotSupported(self.resource_type().to_string());
        Box::pin(futures::future::ready(Err(err)))
    }

    fn delete<'a>(&'a self, meta: ResourceMeta<'a>) -> OperationFuture<'a>;
}

/// A read-only lookup of an existing remote object.
pub trait DataSource: Send + Sync {
    fn data_source_type(&self) -> &'static str;

    fn schema(&self) -> Schema;

    fn timeouts(&self) -> Timeouts {
        Timeouts::read_only(5)
    }

    fn read<'a>(&'a self, meta: ResourceMeta<'a>) -> OperationFuture<'a>;
}

// ============================================================================
// Helpers shared by the service implementations
// ============================================================================

/// Import-prevention: turn the result of an existence check into an error
/// when the object is already there.
///
/// A 404 is the expected outcome; anything else is reported with context.
pub fn ensure_absent<T>(
    resource_type: &str,
    id: &str,
    description: &impl fmt::Display,
    existing: Result<T>,
) -> Result<()> {
    match existing {
        Ok(_) => Err(Error::already_exists(resource_type, id)),
        Err(e) if e.is_not_found() => Ok(()),
        Err(e) => Err(e).with_context(|| format!("checking for presence of existing {}", description)),
    }
}

/// Map the conflict answer of a conditional create to the import error.
pub fn conflict_as_exists<T>(resource_type: &str, id: &str, result: Result<T>) -> Result<T> {
    match result {
        Err(e) if e.is_conflict() => Err(Error::already_exists(resource_type, id)),
        other => other,
    }
}

/// Treat a 404 as "nothing there", e.g. for a delete of an object that is
/// already gone.
pub fn tolerate_not_found<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Result of a read: `Some` when found, `None` after dropping a vanished
/// object from state.
pub fn found_or_gone<T>(
    data: &mut ResourceData,
    description: &impl fmt::Display,
    result: Result<T>,
) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => {
            tracing::warn!("{} was not found - removing from state", description);
            data.clear_id();
            Ok(None)
        },
        Err(e) => Err(e).with_context(|| format!("retrieving {}", description)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn not_found() -> Error {
        Error::Api {
            method: "GET".to_string(),
            url: "https://management.azure.com/x".to_string(),
            status: 404,
            code: "ResourceNotFound".to_string(),
            message: "gone".to_string(),
        }
    }

    fn server_error() -> Error {
        Error::Api {
            method: "GET".to_string(),
            url: "https://management.azure.com/x".to_string(),
            status: 500,
            code: "InternalServerError".to_string(),
            message: "boom".to_string(),
        }
    }

    #[test]
    fn test_ensure_absent_accepts_not_found() {
        assert!(ensure_absent::<()>("azurerm_x", "/x", &"X", Err(not_found())).is_ok());
    }

    #[test]
    fn test_ensure_absent_rejects_existing() {
        let err = ensure_absent("azurerm_x", "/x", &"X", Ok(())).unwrap_err();
        assert!(matches!(err, Error::AlreadyExists { .. }));
        assert!(err.to_string().contains("needs to be imported into the State"));
    }

    #[test]
    fn test_ensure_absent_propagates_other_errors() {
        let err = ensure_absent::<()>("azurerm_x", "/x", &"X", Err(server_error())).unwrap_err();
        assert!(err.to_string().starts_with("checking for presence of existing X"));
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn test_conflict_as_exists() {
        let conflict = Error::Api {
            method: "PUT".to_string(),
            url: "u".to_string(),
            status: 412,
            code: "PreconditionFailed".to_string(),
            message: String::new(),
        };
        let err = conflict_as_exists::<()>("azurerm_x", "/x", Err(conflict)).unwrap_err();
        assert!(matches!(err, Error::AlreadyExists { .. }));
        assert!(conflict_as_exists("azurerm_x", "/x", Ok(1)).is_ok());
    }

    #[test]
    fn test_tolerate_not_found() {
        assert_eq!(tolerate_not_found::<u8>(Err(not_found())).unwrap(), None);
        assert_eq!(tolerate_not_found(Ok(1)).unwrap(), Some(1));
        assert!(tolerate_not_found::<u8>(Err(server_error())).is_err());
    }

    #[test]
    fn test_found_or_gone_clears_id() {
        let mut data = ResourceData::existing("azurerm_x", "/x", Default::default());
        let found = found_or_gone::<()>(&mut data, &"X", Err(not_found())).unwrap();
        assert!(found.is_none());
        assert_eq!(data.id(), None);

        let mut data = ResourceData::existing("azurerm_x", "/x", Default::default());
        assert!(found_or_gone::<()>(&mut data, &"X", Err(server_error())).is_err());
        assert_eq!(data.id(), Some("/x"));
    }
}
