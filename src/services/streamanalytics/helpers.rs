use crate::error::Error;
use crate::schema::{Attribute, Schema, Validation};
use crate::services::common::{name_schema, resource_group_name_schema};
use std::fmt::Display;

/// Attributes locating an input, output or function under its job.
pub fn job_child_schema() -> Schema {
    Schema::new()
        .attr("name", name_schema())
        .attr("stream_analytics_job_name", name_schema())
        .attr("resource_group_name", resource_group_name_schema())
}

fn not_empty() -> Attribute {
    Attribute::string()
        .required()
        .validate_with(Validation::StringNotEmpty)
}

pub fn with_blob_attributes(schema: Schema) -> Schema {
    schema
        .attr("storage_account_name", not_empty())
        .attr("storage_account_key", not_empty().sensitive())
        .attr("storage_container_name", not_empty())
        .attr("path_pattern", Attribute::string().required())
        .attr("date_format", not_empty())
        .attr("time_format", not_empty())
}

pub fn with_event_hub_attributes(schema: Schema) -> Schema {
    schema
        .attr("eventhub_name", not_empty())
        .attr("servicebus_namespace", not_empty())
        .attr("shared_access_policy_key", not_empty().sensitive())
        .attr("shared_access_policy_name", not_empty())
}

/// The remote object exists but is backed by a different data source type.
pub fn unexpected_kind(id: &impl Display, kind: &str) -> Error {
    Error::Deserialization {
        message: format!("{} is not {}", id, kind),
        body: String::new(),
    }
}

/// Empty strings stay unset in request bodies.
pub fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
