//! `azurerm_search_service` data source

use super::ids::SearchServiceId;
use super::sdk::ServicesClient;
use super::search_service_resource::{fill_keys, flatten_search_service, query_keys_schema};
use crate::error::{Result, ResultExt};
use crate::provider::{DataSource, OperationFuture, ResourceMeta};
use crate::resourceid::ResourceId;
use crate::schema::{Attribute, Schema};
use crate::services::common::{
    identity_computed, location_computed, name_lookup_schema, tags_computed, NameLookup,
};

pub struct SearchServiceDataSource;

impl DataSource for SearchServiceDataSource {
    fn data_source_type(&self) -> &'static str {
        "azurerm_search_service"
    }

    fn schema(&self) -> Schema {
        name_lookup_schema()
            .attr("location", location_computed())
            .attr("sku", Attribute::string().computed())
            .attr("replica_count", Attribute::int().computed())
            .attr("partition_count", Attribute::int().computed())
            .attr("public_network_access_enabled", Attribute::bool().computed())
            .attr("allowed_ips", Attribute::set_of_strings().computed())
            .attr("identity", identity_computed())
            .attr("tags", tags_computed())
            .attr("primary_key", Attribute::string().computed().sensitive())
            .attr("secondary_key", Attribute::string().computed().sensitive())
            .attr("query_keys", query_keys_schema())
    }

    fn read<'a>(&'a self, meta: ResourceMeta<'a>) -> OperationFuture<'a> {
        Box::pin(async move {
            let ResourceMeta { client, data, .. } = meta;
            let lookup: NameLookup = data.decode()?;
            let id = SearchServiceId::new(client.subscription_id(), &lookup.resource_group_name, &lookup.name);

            let service = ServicesClient::new(client)
                .get(&id)
                .await
                .with_context(|| format!("retrieving {}", id))?;

            let mut model = flatten_search_service(&id, &service);
            fill_keys(client, &id, &mut model).await?;

            data.set_id(id.id());
            data.apply(&model)
        })
    }
}
