//! `azurerm_vmware_private_cloud`

use super::ids::PrivateCloudId;
use super::sdk::{
    Circuit, ManagementCluster, PrivateCloud, PrivateCloudProperties, PrivateCloudUpdate,
    PrivateCloudUpdateProperties, PrivateCloudsClient, Sku,
};
use crate::azure::ArmClient;
use crate::error::{Result, ResultExt};
use crate::provider::{
    ensure_absent, found_or_gone, tolerate_not_found, OperationFuture, Resource, ResourceMeta,
    Timeouts,
};
use crate::resourceid::ResourceId;
use crate::schema::{Attribute, ResourceData, Schema, Validation};
use crate::services::common::{
    expand_tags, flatten_tags, location_schema, name_schema, normalize_location,
    resource_group_name_schema, tags_schema, Tags,
};
use serde::{Deserialize, Serialize};

pub const RESOURCE_TYPE: &str = "azurerm_vmware_private_cloud";

pub const SKU_NAMES: &[&str] = &["av20", "av36", "av36t"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PrivateCloudModel {
    pub name: String,
    pub resource_group_name: String,
    pub location: String,
    pub sku_name: String,
    pub management_cluster: Vec<ManagementClusterModel>,
    pub network_subnet_cidr: String,
    pub internet_connection_enabled: bool,
    // Write-only: never returned by the service, so state keeps the configured value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nsxt_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vcenter_password: Option<String>,
    pub tags: Tags,

    pub circuit: Vec<CircuitModel>,
    pub hcx_cloud_manager_endpoint: String,
    pub nsxt_manager_endpoint: String,
    pub vcsa_endpoint: String,
    pub management_subnet_cidr: String,
    pub provisioning_subnet_cidr: String,
    pub vmotion_subnet_cidr: String,
    pub nsxt_certificate_thumbprint: String,
    pub vcenter_certificate_thumbprint: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagementClusterModel {
    pub cluster_size: i64,
    pub cluster_id: i64,
    pub hosts: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircuitModel {
    pub express_route_id: String,
    pub express_route_private_peering_id: String,
    pub primary_subnet_cidr: String,
    pub secondary_subnet_cidr: String,
}

pub struct PrivateCloudResource;

impl Resource for PrivateCloudResource {
    fn resource_type(&self) -> &'static str {
        RESOURCE_TYPE
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr("name", name_schema())
            .attr("resource_group_name", resource_group_name_schema())
            .attr("location", location_schema())
            .attr(
                "sku_name",
                Attribute::string()
                    .required()
                    .force_new()
                    .validate_with(Validation::StringInSlice(SKU_NAMES)),
            )
            .attr(
                "management_cluster",
                Attribute::block(
                    Schema::new()
                        .attr(
                            "cluster_size",
                            Attribute::int()
                                .required()
                                .validate_with(Validation::IntBetween(3, 16)),
                        )
                        .attr("cluster_id", Attribute::int().computed())
                        .attr("hosts", Attribute::list_of_strings().computed()),
                )
                .required()
                .min_items(1)
                .max_items(1),
            )
            .attr(
                "network_subnet_cidr",
                Attribute::string()
                    .required()
                    .force_new()
                    .validate_with(Validation::Cidr),
            )
            .attr(
                "internet_connection_enabled",
                Attribute::bool().optional().default_value(false),
            )
            .attr("nsxt_password", password_schema())
            .attr("vcenter_password", password_schema())
            .attr("tags", tags_schema())
            .attr("circuit", circuit_schema())
            .attr("hcx_cloud_manager_endpoint", Attribute::string().computed())
            .attr("nsxt_manager_endpoint", Attribute::string().computed())
            .attr("vcsa_endpoint", Attribute::string().computed())
            .attr("management_subnet_cidr", Attribute::string().computed())
            .attr("provisioning_subnet_cidr", Attribute::string().computed())
            .attr("vmotion_subnet_cidr", Attribute::string().computed())
            .attr("nsxt_certificate_thumbprint", Attribute::string().computed())
            .attr("vcenter_certificate_thumbprint", Attribute::string().computed())
    }

    fn timeouts(&self) -> Timeouts {
        Timeouts::minutes(600, 5, 600, 600)
    }

    fn validate_id(&self, id: &str) -> Result<()> {
        PrivateCloudId::parse(id)?;
        Ok(())
    }

    fn create<'a>(&'a self, meta: ResourceMeta<'a>) -> OperationFuture<'a> {
        Box::pin(create(meta))
    }

    fn read<'a>(&'a self, meta: ResourceMeta<'a>) -> OperationFuture<'a> {
        Box::pin(async move { read_into(meta.client, meta.data).await })
    }

    fn update<'a>(&'a self, meta: ResourceMeta<'a>) -> OperationFuture<'a> {
        Box::pin(update(meta))
    }

    fn delete<'a>(&'a self, meta: ResourceMeta<'a>) -> OperationFuture<'a> {
        Box::pin(delete(meta))
    }
}

fn password_schema() -> Attribute {
    Attribute::string()
        .optional()
        .sensitive()
        .force_new()
        .validate_with(Validation::StringNotEmpty)
}

pub(super) fn circuit_schema() -> Attribute {
    Attribute::block(
        Schema::new()
            .attr("express_route_id", Attribute::string().computed())
            .attr("express_route_private_peering_id", Attribute::string().computed())
            .attr("primary_subnet_cidr", Attribute::string().computed())
            .attr("secondary_subnet_cidr", Attribute::string().computed()),
    )
    .computed()
}

async fn create(meta: ResourceMeta<'_>) -> Result<()> {
    let ResourceMeta {
        client,
        data,
        deadline,
    } = meta;
    let model: PrivateCloudModel = data.decode()?;
    let id = PrivateCloudId::new(client.subscription_id(), &model.resource_group_name, &model.name);
    let sdk = PrivateCloudsClient::new(client);

    ensure_absent(RESOURCE_TYPE, &id.id(), &id, sdk.get(&id).await)?;

    let parameters = PrivateCloud {
        location: Some(normalize_location(&model.location)),
        sku: Some(Sku {
            name: model.sku_name.clone(),
        }),
        tags: Some(expand_tags(&model.tags)),
        properties: Some(PrivateCloudProperties {
            management_cluster: expand_management_cluster(&model.management_cluster),
            network_block: Some(model.network_subnet_cidr.clone()),
            internet: Some(internet_connection(model.internet_connection_enabled).to_string()),
            nsxt_password: model.nsxt_password.clone(),
            vcenter_password: model.vcenter_password.clone(),
            ..PrivateCloudProperties::default()
        }),
        ..PrivateCloud::default()
    };

    tracing::info!("creating {}", id);
    sdk.create_or_update_then_poll(&id, &parameters, &deadline)
        .await
        .with_context(|| format!("creating {}", id))?;

    data.set_id(id.id());
    read_into(client, data).await
}

async fn read_into(client: &ArmClient, data: &mut ResourceData) -> Result<()> {
    let id = PrivateCloudId::parse(data.require_id()?)?;
    let sdk = PrivateCloudsClient::new(client);

    let Some(cloud) = found_or_gone(data, &id, sdk.get(&id).await)? else {
        return Ok(());
    };
    data.apply(&flatten_private_cloud(&id, &cloud))
}

async fn update(meta: ResourceMeta<'_>) -> Result<()> {
    let ResourceMeta {
        client,
        data,
        deadline,
    } = meta;
    let id = PrivateCloudId::parse(data.require_id()?)?;
    let model: PrivateCloudModel = data.decode()?;
    let sdk = PrivateCloudsClient::new(client);

    let mut properties = PrivateCloudUpdateProperties::default();
    if data.has_change("management_cluster") {
        properties.management_cluster = expand_management_cluster(&model.management_cluster);
    }
    if data.has_change("internet_connection_enabled") {
        properties.internet = Some(internet_connection(model.internet_connection_enabled).to_string());
    }
    let parameters = PrivateCloudUpdate {
        tags: data.has_change("tags").then(|| expand_tags(&model.tags)),
        properties: Some(properties),
    };

    sdk.update_then_poll(&id, &parameters, &deadline)
        .await
        .with_context(|| format!("updating {}", id))?;

    read_into(client, data).await
}

async fn delete(meta: ResourceMeta<'_>) -> Result<()> {
    let ResourceMeta {
        client,
        data,
        deadline,
    } = meta;
    let id = PrivateCloudId::parse(data.require_id()?)?;

    tolerate_not_found(
        PrivateCloudsClient::new(client)
            .delete_then_poll(&id, &deadline)
            .await,
    )
    .with_context(|| format!("deleting {}", id))?;
    Ok(())
}

fn internet_connection(enabled: bool) -> &'static str {
    if enabled {
        "Enabled"
    } else {
        "Disabled"
    }
}

// ============================================================================
// Expand / flatten
// ============================================================================

pub fn expand_management_cluster(input: &[ManagementClusterModel]) -> Option<ManagementCluster> {
    let cluster = input.first()?;
    Some(ManagementCluster {
        cluster_size: Some(cluster.cluster_size),
        cluster_id: None,
        hosts: None,
    })
}

pub fn flatten_management_cluster(input: Option<&ManagementCluster>) -> Vec<ManagementClusterModel> {
    let Some(cluster) = input else {
        return Vec::new();
    };
    vec![ManagementClusterModel {
        cluster_size: cluster.cluster_size.unwrap_or_default(),
        cluster_id: cluster.cluster_id.unwrap_or_default(),
        hosts: cluster.hosts.clone().unwrap_or_default(),
    }]
}

pub fn flatten_circuit(input: Option<&Circuit>) -> Vec<CircuitModel> {
    let Some(circuit) = input else {
        return Vec::new();
    };
    vec![CircuitModel {
        express_route_id: circuit.express_route_id.clone().unwrap_or_default(),
        express_route_private_peering_id: circuit
            .express_route_private_peering_id
            .clone()
            .unwrap_or_default(),
        primary_subnet_cidr: circuit.primary_subnet.clone().unwrap_or_default(),
        secondary_subnet_cidr: circuit.secondary_subnet.clone().unwrap_or_default(),
    }]
}

/// State for a private cloud as returned by the service. Passwords stay unset.
pub fn flatten_private_cloud(id: &PrivateCloudId, cloud: &PrivateCloud) -> PrivateCloudModel {
    let mut model = PrivateCloudModel {
        name: id.name.clone(),
        resource_group_name: id.resource_group.clone(),
        location: cloud.location.as_deref().map(normalize_location).unwrap_or_default(),
        sku_name: cloud.sku.as_ref().map(|s| s.name.clone()).unwrap_or_default(),
        tags: flatten_tags(cloud.tags.as_ref()),
        ..PrivateCloudModel::default()
    };

    if let Some(props) = &cloud.properties {
        model.management_cluster = flatten_management_cluster(props.management_cluster.as_ref());
        model.network_subnet_cidr = props.network_block.clone().unwrap_or_default();
        model.internet_connection_enabled = props
            .internet
            .as_deref()
            .map_or(false, |v| v.eq_ignore_ascii_case("Enabled"));
        model.circuit = flatten_circuit(props.circuit.as_ref());
        if let Some(endpoints) = &props.endpoints {
            model.hcx_cloud_manager_endpoint = endpoints.hcx_cloud_manager.clone().unwrap_or_default();
            model.nsxt_manager_endpoint = endpoints.nsxt_manager.clone().unwrap_or_default();
            model.vcsa_endpoint = endpoints.vcsa.clone().unwrap_or_default();
        }
        model.management_subnet_cidr = props.management_network.clone().unwrap_or_default();
        model.provisioning_subnet_cidr = props.provisioning_network.clone().unwrap_or_default();
        model.vmotion_subnet_cidr = props.vmotion_network.clone().unwrap_or_default();
        model.nsxt_certificate_thumbprint =
            props.nsxt_certificate_thumbprint.clone().unwrap_or_default();
        model.vcenter_certificate_thumbprint =
            props.vcenter_certificate_thumbprint.clone().unwrap_or_default();
    }

    model
}
