//! `azurerm_vmware_cluster`

use super::ids::{ClusterId, PrivateCloudId};
use super::private_cloud_resource::SKU_NAMES;
use super::sdk::{Cluster, ClusterProperties, ClusterUpdate, ClusterUpdateProperties, ClustersClient, Sku};
use crate::azure::ArmClient;
use crate::error::{Result, ResultExt};
use crate::provider::{
    ensure_absent, found_or_gone, tolerate_not_found, OperationFuture, Resource, ResourceMeta,
    Timeouts,
};
use crate::resourceid::{validate_resource_id, ResourceId};
use crate::schema::{Attribute, ResourceData, Schema, Validation};
use crate::services::common::name_schema;
use serde::{Deserialize, Serialize};

const RESOURCE_TYPE: &str = "azurerm_vmware_cluster";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterModel {
    pub name: String,
    pub vmware_cloud_id: String,
    pub cluster_node_count: i64,
    pub sku_name: String,
    pub cluster_number: i64,
    pub hosts: Vec<String>,
}

pub struct ClusterResource;

impl Resource for ClusterResource {
    fn resource_type(&self) -> &'static str {
        RESOURCE_TYPE
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr("name", name_schema())
            .attr(
                "vmware_cloud_id",
                Attribute::string()
                    .required()
                    .force_new()
                    .validate_with(Validation::String(validate_resource_id::<PrivateCloudId>)),
            )
            .attr(
                "cluster_node_count",
                Attribute::int()
                    .required()
                    .validate_with(Validation::IntBetween(3, 16)),
            )
            .attr(
                "sku_name",
                Attribute::string()
                    .required()
                    .force_new()
                    .validate_with(Validation::StringInSlice(SKU_NAMES)),
            )
            .attr("cluster_number", Attribute::int().computed())
            .attr("hosts", Attribute::list_of_strings().computed())
    }

    fn timeouts(&self) -> Timeouts {
        Timeouts::minutes(300, 5, 300, 300)
    }

    fn validate_id(&self, id: &str) -> Result<()> {
        ClusterId::parse(id)?;
        Ok(())
    }

    fn create<'a>(&'a self, meta: ResourceMeta<'a>) -> OperationFuture<'a> {
        Box::pin(async move {
            let ResourceMeta {
                client,
                data,
                deadline,
            } = meta;
            let model: ClusterModel = data.decode()?;
            let private_cloud = PrivateCloudId::parse(&model.vmware_cloud_id)?;
            let id = ClusterId::new(&private_cloud, &model.name);
            let sdk = ClustersClient::new(client);

            ensure_absent(RESOURCE_TYPE, &id.id(), &id, sdk.get(&id).await)?;

            let parameters = Cluster {
                sku: Some(Sku {
                    name: model.sku_name.clone(),
                }),
                properties: Some(ClusterProperties {
                    cluster_size: Some(model.cluster_node_count),
                    ..ClusterProperties::default()
                }),
                ..Cluster::default()
            };
            sdk.create_or_update_then_poll(&id, &parameters, &deadline)
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
            let id = ClusterId::parse(data.require_id()?)?;
            let model: ClusterModel = data.decode()?;

            if data.has_change("cluster_node_count") {
                let parameters = ClusterUpdate {
                    properties: Some(ClusterUpdateProperties {
                        cluster_size: Some(model.cluster_node_count),
                    }),
                };
                ClustersClient::new(client)
                    .update_then_poll(&id, &parameters, &deadline)
                    .await
                    .with_context(|| format!("updating {}", id))?;
            }

            read_into(client, data).await
        })
    }

    fn delete<'a>(&'a self, meta: ResourceMeta<'a>) -> OperationFuture<'a> {
        Box::pin(async move {
            let id = ClusterId::parse(meta.data.require_id()?)?;
            tolerate_not_found(
                ClustersClient::new(meta.client)
                    .delete_then_poll(&id, &meta.deadline)
                    .await,
            )
            .with_context(|| format!("deleting {}", id))?;
            Ok(())
        })
    }
}

async fn read_into(client: &ArmClient, data: &mut ResourceData) -> Result<()> {
    let id = ClusterId::parse(data.require_id()?)?;
    let Some(cluster) = found_or_gone(data, &id, ClustersClient::new(client).get(&id).await)? else {
        return Ok(());
    };
    data.apply(&flatten_cluster(&id, &cluster))
}

pub fn flatten_cluster(id: &ClusterId, cluster: &Cluster) -> ClusterModel {
    let mut model = ClusterModel {
        name: id.name.clone(),
        vmware_cloud_id: id.private_cloud_id().id(),
        sku_name: cluster.sku.as_ref().map(|s| s.name.clone()).unwrap_or_default(),
        ..ClusterModel::default()
    };
    if let Some(props) = &cluster.properties {
        model.cluster_node_count = props.cluster_size.unwrap_or_default();
        model.cluster_number = props.cluster_id.unwrap_or_default();
        model.hosts = props.hosts.clone().unwrap_or_default();
    }
    model
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_vmware_cloud_id_must_be_a_private_cloud() {
        let schema = ClusterResource.schema();
        let config = json!({
            "name": "c1",
            "vmware_cloud_id": "/subscriptions/s/resourceGroups/rg/providers/Microsoft.AVS/privateclouds/pc",
            "cluster_node_count": 3,
            "sku_name": "av36"
        });
        let errors = schema.validate(config.as_object().unwrap()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("vmware_cloud_id: parsing Private Cloud ID"));
    }

    #[test]
    fn test_flatten_cluster() {
        let id = ClusterId::parse(
            "/subscriptions/s/resourceGroups/rg/providers/Microsoft.AVS/privateClouds/pc/clusters/c1",
        )
        .unwrap();
        let cluster: Cluster = serde_json::from_value(json!({
            "sku": {"name": "av36"},
            "properties": {"clusterSize": 4, "clusterId": 2, "hosts": ["a", "b", "c", "d"]}
        }))
        .unwrap();
        let model = flatten_cluster(&id, &cluster);
        assert_eq!(model.cluster_node_count, 4);
        assert_eq!(model.cluster_number, 2);
        assert_eq!(model.hosts.len(), 4);
        assert_eq!(
            model.vmware_cloud_id,
            "/subscriptions/s/resourceGroups/rg/providers/Microsoft.AVS/privateClouds/pc"
        );

        let empty = flatten_cluster(&id, &Cluster::default());
        assert!(empty.hosts.is_empty());
        assert_eq!(empty.sku_name, "");
    }
}
