//! Attributes and conversions shared by every service
//!
//! Location, resource group, tags and system-assigned identity look the same
//! on every ARM resource, so their schema fragments and expand/flatten
//! functions live here.

use crate::schema::{Attribute, Schema, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Tag map as stored in state and sent to ARM.
pub type Tags = BTreeMap<String, String>;

const MAX_TAGS: usize = 50;
const MAX_TAG_KEY_LEN: usize = 512;
const MAX_TAG_VALUE_LEN: usize = 256;

/// Arguments of a data source that looks an object up by name.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NameLookup {
    pub name: String,
    pub resource_group_name: String,
}

pub fn name_lookup_schema() -> Schema {
    Schema::new()
        .attr(
            "name",
            Attribute::string()
                .required()
                .validate_with(Validation::String(validate_name_segment)),
        )
        .attr("resource_group_name", resource_group_name_schema())
}

// ============================================================================
// Names
// ============================================================================

/// Name of the resource or of a parent it lives under.
pub fn name_schema() -> Attribute {
    Attribute::string()
        .required()
        .force_new()
        .validate_with(Validation::String(validate_name_segment))
}

/// A name becomes one segment of the resource ID, so it cannot be blank or contain `/`.
pub fn validate_name_segment(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("must not be empty".to_string());
    }
    if name.contains('/') {
        return Err(format!("{:?} must not contain '/'", name));
    }
    Ok(())
}

// ============================================================================
// Location
// ============================================================================

/// `West Europe` and `westeurope` name the same region; ARM returns the latter.
pub fn normalize_location(location: &str) -> String {
    location.replace(' ', "").to_lowercase()
}

pub fn location_schema() -> Attribute {
    Attribute::string()
        .required()
        .force_new()
        .validate_with(Validation::StringNotEmpty)
        .state_func(normalize_location)
}

pub fn location_computed() -> Attribute {
    Attribute::string().computed()
}

// ============================================================================
// Resource group
// ============================================================================

pub fn resource_group_name_schema() -> Attribute {
    Attribute::string()
        .required()
        .force_new()
        .validate_with(Validation::String(validate_resource_group_name))
}

/// Up to 90 characters of letters, digits, `-`, `_`, `.`, `(` and `)`, not ending with `.`.
pub fn validate_resource_group_name(name: &str) -> Result<(), String> {
    if name.is_empty() || name.chars().count() > 90 {
        return Err("resource group names must be between 1 and 90 characters".to_string());
    }
    if name.ends_with('.') {
        return Err("resource group names cannot end with a period".to_string());
    }
    if !name
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '(' | ')'))
    {
        return Err(format!(
            "resource group name {:?} may only contain alphanumerics, underscores, parentheses, hyphens and periods",
            name
        ));
    }
    Ok(())
}

// ============================================================================
// Tags
// ============================================================================

pub fn tags_schema() -> Attribute {
    Attribute::map()
        .optional()
        .validate_with(Validation::Map(validate_tags))
}

pub fn tags_computed() -> Attribute {
    Attribute::map().computed()
}

pub fn validate_tags(tags: &Map<String, Value>) -> Result<(), String> {
    if tags.len() > MAX_TAGS {
        return Err(format!("a maximum of {} tags can be applied to each resource", MAX_TAGS));
    }
    for (key, value) in tags {
        if key.chars().count() > MAX_TAG_KEY_LEN {
            return Err(format!("the maximum length for a tag key is {} characters: {:?}", MAX_TAG_KEY_LEN, key));
        }
        let len = value.as_str().map_or(0, |v| v.chars().count());
        if len > MAX_TAG_VALUE_LEN {
            return Err(format!(
                "the maximum length for a tag value is {} characters: the value for {:?} is {} characters",
                MAX_TAG_VALUE_LEN, key, len
            ));
        }
    }
    Ok(())
}

pub fn expand_tags(tags: &Tags) -> Tags {
    tags.clone()
}

pub fn flatten_tags(tags: Option<&Tags>) -> Tags {
    tags.cloned().unwrap_or_default()
}

// ============================================================================
// System-assigned identity
// ============================================================================

pub const IDENTITY_SYSTEM_ASSIGNED: &str = "SystemAssigned";

/// `identity` block as it appears in state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityModel {
    #[serde(rename = "type")]
    pub identity_type: String,
    pub principal_id: String,
    pub tenant_id: String,
}

/// Managed identity as ARM returns it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemIdentity {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub identity_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
}

pub fn identity_schema() -> Attribute {
    Attribute::block(
        Schema::new()
            .attr(
                "type",
                Attribute::string()
                    .required()
                    .validate_with(Validation::StringInSlice(&[IDENTITY_SYSTEM_ASSIGNED])),
            )
            .attr("principal_id", Attribute::string().computed())
            .attr("tenant_id", Attribute::string().computed()),
    )
    .optional()
    .max_items(1)
}

pub fn identity_computed() -> Attribute {
    Attribute::block(
        Schema::new()
            .attr("type", Attribute::string().computed())
            .attr("principal_id", Attribute::string().computed())
            .attr("tenant_id", Attribute::string().computed()),
    )
    .computed()
}

/// An absent or empty block means "no identity", not an empty identity object.
pub fn expand_identity(input: &[IdentityModel]) -> Option<SystemIdentity> {
    let identity = input.first()?;
    Some(SystemIdentity {
        identity_type: Some(identity.identity_type.clone()),
        principal_id: None,
        tenant_id: None,
    })
}

pub fn flatten_identity(input: Option<&SystemIdentity>) -> Vec<IdentityModel> {
    let Some(identity) = input else {
        return Vec::new();
    };
    let identity_type = identity.identity_type.clone().unwrap_or_default();
    if identity_type.is_empty() || identity_type.eq_ignore_ascii_case("None") {
        return Vec::new();
    }
    vec![IdentityModel {
        identity_type,
        principal_id: identity.principal_id.clone().unwrap_or_default(),
        tenant_id: identity.tenant_id.clone().unwrap_or_default(),
    }]
}
