//! `azurerm_vmware_private_cloud` data source

use super::ids::PrivateCloudId;
use super::private_cloud_resource::{circuit_schema, flatten_private_cloud};
use super::sdk::PrivateCloudsClient;
use crate::error::{Result, ResultExt};
use crate::provider::{DataSource, OperationFuture, ResourceMeta};
use crate::resourceid::ResourceId;
use crate::schema::{Attribute, Schema};
use crate::services::common::{location_computed, name_lookup_schema, tags_computed, NameLookup};

pub struct PrivateCloudDataSource;

impl DataSource for PrivateCloudDataSource {
    fn data_source_type(&self) -> &'static str {
        "azurerm_vmware_private_cloud"
    }

    fn schema(&self) -> Schema {
        name_lookup_schema()
            .attr("location", location_computed())
            .attr("sku_name", Attribute::string().computed())
            .attr(
                "management_cluster",
                Attribute::block(
                    Schema::new()
                        .attr("cluster_size", Attribute::int().computed())
                        .attr("cluster_id", Attribute::int().computed())
                        .attr("hosts", Attribute::list_of_strings().computed()),
                )
                .computed(),
            )
            .attr("network_subnet_cidr", Attribute::string().computed())
            .attr("internet_connection_enabled", Attribute::bool().computed())
            .attr("circuit", circuit_schema())
            .attr("hcx_cloud_manager_endpoint", Attribute::string().computed())
            .attr("nsxt_manager_endpoint", Attribute::string().computed())
            .attr("vcsa_endpoint", Attribute::string().computed())
            .attr("management_subnet_cidr", Attribute::string().computed())
            .attr("provisioning_subnet_cidr", Attribute::string().computed())
            .attr("vmotion_subnet_cidr", Attribute::string().computed())
            .attr("nsxt_certificate_thumbprint", Attribute::string().computed())
            .attr("vcenter_certificate_thumbprint", Attribute::string().computed())
            .attr("tags", tags_computed())
    }

    fn read<'a>(&'a self, meta: ResourceMeta<'a>) -> OperationFuture<'a> {
        Box::pin(async move {
            let ResourceMeta { client, data, .. } = meta;
            let lookup: NameLookup = data.decode()?;
            let id = PrivateCloudId::new(client.subscription_id(), &lookup.resource_group_name, &lookup.name);

            let cloud = PrivateCloudsClient::new(client)
                .get(&id)
                .await
                .with_context(|| format!("retrieving {}", id))?;

            data.set_id(id.id());
            data.apply(&flatten_private_cloud(&id, &cloud))
        })
    }
}
