//! `azurerm_stream_analytics_job` data source

use super::ids::StreamingJobId;
use super::job_resource::flatten_streaming_job;
use super::sdk::StreamingJobsClient;
use crate::error::ResultExt;
use crate::provider::{DataSource, OperationFuture, ResourceMeta};
use crate::resourceid::ResourceId;
use crate::schema::{Attribute, Schema};
use crate::services::common::{
    identity_computed, location_computed, name_lookup_schema, tags_computed, NameLookup,
};

pub struct StreamingJobDataSource;

impl DataSource for StreamingJobDataSource {
    fn data_source_type(&self) -> &'static str {
        "azurerm_stream_analytics_job"
    }

    fn schema(&self) -> Schema {
        name_lookup_schema()
            .attr("location", location_computed())
            .attr("compatibility_level", Attribute::string().computed())
            .attr("data_locale", Attribute::string().computed())
            .attr("events_late_arrival_max_delay_in_seconds", Attribute::int().computed())
            .attr("events_out_of_order_max_delay_in_seconds", Attribute::int().computed())
            .attr("events_out_of_order_policy", Attribute::string().computed())
            .attr("output_error_policy", Attribute::string().computed())
            .attr("streaming_units", Attribute::int().computed())
            .attr("transformation_query", Attribute::string().computed())
            .attr("identity", identity_computed())
            .attr("tags", tags_computed())
            .attr("job_id", Attribute::string().computed())
    }

    fn read<'a>(&'a self, meta: ResourceMeta<'a>) -> OperationFuture<'a> {
        Box::pin(async move {
            let ResourceMeta { client, data, .. } = meta;
            let lookup: NameLookup = data.decode()?;
            let id = StreamingJobId::new(client.subscription_id(), &lookup.resource_group_name, &lookup.name);

            let job = StreamingJobsClient::new(client)
                .get(&id)
                .await
                .with_context(|| format!("retrieving {}", id))?;

            data.set_id(id.id());
            data.apply(&flatten_streaming_job(&id, &job))
        })
    }
}
