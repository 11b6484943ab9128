//! `azurerm_portal_dashboard` data source

use super::dashboard_resource::flatten_dashboard;
use super::ids::DashboardId;
use super::sdk::DashboardsClient;
use crate::error::{Result, ResultExt};
use crate::provider::{DataSource, OperationFuture, ResourceMeta};
use crate::resourceid::ResourceId;
use crate::schema::{Attribute, Schema};
use crate::services::common::{location_computed, name_lookup_schema, tags_computed, NameLookup};

pub struct DashboardDataSource;

impl DataSource for DashboardDataSource {
    fn data_source_type(&self) -> &'static str {
        "azurerm_portal_dashboard"
    }

    fn schema(&self) -> Schema {
        name_lookup_schema()
            .attr("location", location_computed())
            .attr("dashboard_properties", Attribute::string().computed())
            .attr("tags", tags_computed())
    }

    fn read<'a>(&'a self, meta: ResourceMeta<'a>) -> OperationFuture<'a> {
        Box::pin(read(meta))
    }
}

async fn read(meta: ResourceMeta<'_>) -> Result<()> {
    let ResourceMeta { client, data, .. } = meta;
    let lookup: NameLookup = data.decode()?;
    let id = DashboardId::new(client.subscription_id(), &lookup.resource_group_name, &lookup.name);

    let dashboard = DashboardsClient::new(client)
        .get(&id)
        .await
        .with_context(|| format!("retrieving {}", id))?;

    data.set_id(id.id());
    data.apply(&flatten_dashboard(&id, &dashboard))
}
