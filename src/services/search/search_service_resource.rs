//! `azurerm_search_service`

use super::ids::SearchServiceId;
use super::sdk::{IpRule, NetworkRuleSet, SearchService, SearchServiceProperties, ServicesClient, Sku};
use crate::azure::ArmClient;
use crate::error::{Error, Result, ResultExt};
use crate::provider::{
    ensure_absent, found_or_gone, tolerate_not_found, OperationFuture, Resource, ResourceMeta,
};
use crate::resourceid::ResourceId;
use crate::schema::{Attribute, ResourceData, Schema, Validation};
use crate::services::common::{
    expand_identity, expand_tags, flatten_identity, flatten_tags, identity_schema,
    location_schema, normalize_location, resource_group_name_schema, tags_schema, IdentityModel,
    Tags,
};
use serde::{Deserialize, Serialize};

const RESOURCE_TYPE: &str = "azurerm_search_service";

pub const SKUS: &[&str] = &[
    "free",
    "basic",
    "standard",
    "standard2",
    "standard3",
    "storage_optimized_l1",
    "storage_optimized_l2",
];

pub const PARTITION_COUNTS: &[i64] = &[1, 2, 3, 4, 6, 12];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchServiceModel {
    pub name: String,
    pub resource_group_name: String,
    pub location: String,
    pub sku: String,
    pub replica_count: i64,
    pub partition_count: i64,
    pub public_network_access_enabled: bool,
    pub allowed_ips: Vec<String>,
    pub identity: Vec<IdentityModel>,
    pub tags: Tags,

    pub primary_key: String,
    pub secondary_key: String,
    pub query_keys: Vec<QueryKeyModel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryKeyModel {
    pub name: String,
    pub key: String,
}

pub struct SearchServiceResource;

impl Resource for SearchServiceResource {
    fn resource_type(&self) -> &'static str {
        RESOURCE_TYPE
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr(
                "name",
                Attribute::string()
                    .required()
                    .force_new()
                    .validate_with(Validation::String(validate_search_service_name)),
            )
            .attr("resource_group_name", resource_group_name_schema())
            .attr("location", location_schema())
            .attr(
                "sku",
                Attribute::string()
                    .required()
                    .force_new()
                    .validate_with(Validation::StringInSlice(SKUS)),
            )
            .attr(
                "replica_count",
                Attribute::int()
                    .optional()
                    .default_value(1)
                    .validate_with(Validation::IntBetween(1, 12)),
            )
            .attr(
                "partition_count",
                Attribute::int()
                    .optional()
                    .default_value(1)
                    .validate_with(Validation::IntInSlice(PARTITION_COUNTS)),
            )
            .attr(
                "public_network_access_enabled",
                Attribute::bool().optional().default_value(true),
            )
            .attr(
                "allowed_ips",
                Attribute::set_of_strings()
                    .optional()
                    .validate_with(Validation::IpOrCidr),
            )
            .attr("identity", identity_schema())
            .attr("tags", tags_schema())
            .attr("primary_key", Attribute::string().computed().sensitive())
            .attr("secondary_key", Attribute::string().computed().sensitive())
            .attr("query_keys", query_keys_schema())
    }

    fn validate_id(&self, id: &str) -> Result<()> {
        SearchServiceId::parse(id)?;
        Ok(())
    }

    fn create<'a>(&'a self, meta: ResourceMeta<'a>) -> OperationFuture<'a> {
        Box::pin(async move {
            let ResourceMeta {
                client,
                data,
                deadline,
            } = meta;
            let model: SearchServiceModel = data.decode()?;
            validate_sku_constraints(&model)?;

            let id = SearchServiceId::new(client.subscription_id(), &model.resource_group_name, &model.name);
            let sdk = ServicesClient::new(client);

            ensure_absent(RESOURCE_TYPE, &id.id(), &id, sdk.get(&id).await)?;

            sdk.create_or_update_then_poll(&id, &expand_search_service(&model), &deadline)
                .await
                .with_context(|| format!("creating {}", id))?;

            data.set_id(id.id());
            read_into(client, data).await
        })
    }

    fn read<'a>(&'a self, meta: ResourceMeta<'a>) -> OperationFuture<'a> {
        Box::pin(read_into(meta.client, meta.data))
    }

    fn update<'a>(&'a self, meta: ResourceMeta<'a>) -> OperationFuture<'a> {
        Box::pin(async move {
            let ResourceMeta {
                client,
                data,
                deadline,
            } = meta;
            let id = SearchServiceId::parse(data.require_id()?)?;
            let model: SearchServiceModel = data.decode()?;
            validate_sku_constraints(&model)?;

            ServicesClient::new(client)
                .create_or_update_then_poll(&id, &expand_search_service(&model), &deadline)
                .await
                .with_context(|| format!("updating {}", id))?;

            read_into(client, data).await
        })
    }

    fn delete<'a>(&'a self, meta: ResourceMeta<'a>) -> OperationFuture<'a> {
        Box::pin(async move {
            let id = SearchServiceId::parse(meta.data.require_id()?)?;
            tolerate_not_found(ServicesClient::new(meta.client).delete(&id, &meta.deadline).await)
                .with_context(|| format!("deleting {}", id))?;
            Ok(())
        })
    }
}

pub(super) fn query_keys_schema() -> Attribute {
    Attribute::block(
        Schema::new()
            .attr("name", Attribute::string().computed())
            .attr("key", Attribute::string().computed().sensitive()),
    )
    .computed()
}

async fn read_into(client: &ArmClient, data: &mut ResourceData) -> Result<()> {
    let id = SearchServiceId::parse(data.require_id()?)?;
    let result = ServicesClient::new(client).get(&id).await;
    let Some(service) = found_or_gone(data, &id, result)? else {
        return Ok(());
    };

    let mut model = flatten_search_service(&id, &service);
    fill_keys(client, &id, &mut model).await?;
    data.apply(&model)
}

/// Admin and query keys come from separate POST actions.
pub(super) async fn fill_keys(
    client: &ArmClient,
    id: &SearchServiceId,
    model: &mut SearchServiceModel,
) -> Result<()> {
    let sdk = ServicesClient::new(client);

    let admin = sdk
        .list_admin_keys(id)
        .await
        .with_context(|| format!("retrieving Admin Keys for {}", id))?;
    model.primary_key = admin.primary_key.unwrap_or_default();
    model.secondary_key = admin.secondary_key.unwrap_or_default();

    let query = sdk
        .list_query_keys(id)
        .await
        .with_context(|| format!("retrieving Query Keys for {}", id))?;
    model.query_keys = query
        .value
        .unwrap_or_default()
        .into_iter()
        .map(|k| QueryKeyModel {
            name: k.name.unwrap_or_default(),
            key: k.key.unwrap_or_default(),
        })
        .collect();
    Ok(())
}

/// Lower case letters, digits or dashes, 2 to 60 characters, no leading,
/// trailing or consecutive dashes.
pub fn validate_search_service_name(name: &str) -> Result<(), String> {
    let valid_chars = name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if name.len() < 2 || name.len() > 60 || !valid_chars {
        return Err(format!(
            "{:?} must be 2 to 60 characters of lowercase letters, digits or dashes",
            name
        ));
    }
    if name.starts_with('-') || name.ends_with('-') || name.contains("--") {
        return Err(format!(
            "{:?} cannot start or end with a dash or contain consecutive dashes",
            name
        ));
    }
    Ok(())
}

/// Limits that depend on the SKU, checked before any request is made.
pub fn validate_sku_constraints(model: &SearchServiceModel) -> Result<()> {
    let mut messages = Vec::new();
    match model.sku.as_str() {
        "free" => {
            if model.replica_count > 1 {
                messages.push(format!(
                    "replica_count: the free SKU supports a single replica, got {}",
                    model.replica_count
                ));
            }
            if model.partition_count > 1 {
                messages.push(format!(
                    "partition_count: the free SKU supports a single partition, got {}",
                    model.partition_count
                ));
            }
        },
        "basic" => {
            if model.replica_count > 3 {
                messages.push(format!(
                    "replica_count: the basic SKU supports at most 3 replicas, got {}",
                    model.replica_count
                ));
            }
            if model.partition_count > 1 {
                messages.push(format!(
                    "partition_count: the basic SKU supports a single partition, got {}",
                    model.partition_count
                ));
            }
        },
        _ => {},
    }
    if messages.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation {
            target: RESOURCE_TYPE.to_string(),
            messages,
        })
    }
}

// ============================================================================
// Expand / flatten
// ============================================================================

pub fn expand_search_service(model: &SearchServiceModel) -> SearchService {
    let public_network_access = if model.public_network_access_enabled {
        "enabled"
    } else {
        "disabled"
    };
    SearchService {
        location: Some(normalize_location(&model.location)),
        tags: Some(expand_tags(&model.tags)),
        sku: Some(Sku {
            name: model.sku.clone(),
        }),
        identity: expand_identity(&model.identity),
        properties: Some(SearchServiceProperties {
            replica_count: Some(model.replica_count),
            partition_count: Some(model.partition_count),
            hosting_mode: Some("default".to_string()),
            public_network_access: Some(public_network_access.to_string()),
            network_rule_set: expand_allowed_ips(&model.allowed_ips),
            ..SearchServiceProperties::default()
        }),
        ..SearchService::default()
    }
}

/// No addresses means no rule set at all.
pub fn expand_allowed_ips(input: &[String]) -> Option<NetworkRuleSet> {
    if input.is_empty() {
        return None;
    }
    Some(NetworkRuleSet {
        ip_rules: Some(
            input
                .iter()
                .map(|ip| IpRule {
                    value: Some(ip.clone()),
                })
                .collect(),
        ),
    })
}

pub fn flatten_allowed_ips(input: Option<&NetworkRuleSet>) -> Vec<String> {
    input
        .and_then(|rules| rules.ip_rules.as_ref())
        .map(|rules| rules.iter().filter_map(|r| r.value.clone()).collect())
        .unwrap_or_default()
}

pub fn flatten_search_service(id: &SearchServiceId, service: &SearchService) -> SearchServiceModel {
    let mut model = SearchServiceModel {
        name: id.name.clone(),
        resource_group_name: id.resource_group.clone(),
        location: service.location.as_deref().map(normalize_location).unwrap_or_default(),
        sku: service.sku.as_ref().map(|s| s.name.clone()).unwrap_or_default(),
        identity: flatten_identity(service.identity.as_ref()),
        tags: flatten_tags(service.tags.as_ref()),
        public_network_access_enabled: true,
        ..SearchServiceModel::default()
    };
    if let Some(props) = &service.properties {
        model.replica_count = props.replica_count.unwrap_or_default();
        model.partition_count = props.partition_count.unwrap_or_default();
        model.public_network_access_enabled = props
            .public_network_access
            .as_deref()
            .map_or(true, |v| !v.eq_ignore_ascii_case("disabled"));
        model.allowed_ips = flatten_allowed_ips(props.network_rule_set.as_ref());
    }
    model
}
