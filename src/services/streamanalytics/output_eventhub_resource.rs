//! `azurerm_stream_analytics_output_eventhub`

use super::helpers::{job_child_schema, non_empty, unexpected_kind, with_event_hub_attributes};
use super::ids::{OutputId, StreamingJobId};
use super::sdk::{EventHubDataSourceProperties, Output, OutputProperties, OutputsClient, StreamDataSource};
use super::serialization::{expand_serialization, flatten_serialization, serialization_schema, SerializationModel};
use crate::azure::ArmClient;
use crate::error::{Result, ResultExt};
use crate::provider::{
    ensure_absent, found_or_gone, tolerate_not_found, OperationFuture, Resource, ResourceMeta,
};
use crate::resourceid::ResourceId;
use crate::schema::{Attribute, ResourceData, Schema};
use serde::{Deserialize, Serialize};

const RESOURCE_TYPE: &str = "azurerm_stream_analytics_output_eventhub";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputEventHubModel {
    pub name: String,
    pub stream_analytics_job_name: String,
    pub resource_group_name: String,
    pub eventhub_name: String,
    pub servicebus_namespace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_access_policy_key: Option<String>,
    pub shared_access_policy_name: String,
    pub partition_key: String,
    pub serialization: Vec<SerializationModel>,
}

pub struct OutputEventHubResource;

impl Resource for OutputEventHubResource {
    fn resource_type(&self) -> &'static str {
        RESOURCE_TYPE
    }

    fn schema(&self) -> Schema {
        with_event_hub_attributes(job_child_schema())
            .attr("partition_key", Attribute::string().optional())
            .attr("serialization", serialization_schema(true))
    }

    fn validate_id(&self, id: &str) -> Result<()> {
        OutputId::parse(id)?;
        Ok(())
    }

    fn create<'a>(&'a self, meta: ResourceMeta<'a>) -> OperationFuture<'a> {
        Box::pin(async move {
            let ResourceMeta { client, data, .. } = meta;
            let model: OutputEventHubModel = data.decode()?;
            let output = expand_output_eventhub(&model)?;

            let job = StreamingJobId::new(
                client.subscription_id(),
                &model.resource_group_name,
                &model.stream_analytics_job_name,
            );
            let id = OutputId::new(&job, &model.name);
            let sdk = OutputsClient::new(client);

            ensure_absent(RESOURCE_TYPE, &id.id(), &id, sdk.get(&id).await)?;

            sdk.create_or_replace(&id, &output)
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
            let ResourceMeta { client, data, .. } = meta;
            let id = OutputId::parse(data.require_id()?)?;
            let model: OutputEventHubModel = data.decode()?;
            let output = expand_output_eventhub(&model)?;

            OutputsClient::new(client)
                .update(&id, &output)
                .await
                .with_context(|| format!("updating {}", id))?;

            read_into(client, data).await
        })
    }

    fn delete<'a>(&'a self, meta: ResourceMeta<'a>) -> OperationFuture<'a> {
        Box::pin(async move {
            let id = OutputId::parse(meta.data.require_id()?)?;
            tolerate_not_found(OutputsClient::new(meta.client).delete(&id).await)
                .with_context(|| format!("deleting {}", id))?;
            Ok(())
        })
    }
}

async fn read_into(client: &ArmClient, data: &mut ResourceData) -> Result<()> {
    let id = OutputId::parse(data.require_id()?)?;
    let Some(output) = found_or_gone(data, &id, OutputsClient::new(client).get(&id).await)? else {
        return Ok(());
    };
    data.apply(&flatten_output_eventhub(&id, &output)?)
}

pub fn expand_output_eventhub(model: &OutputEventHubModel) -> Result<Output> {
    Ok(Output {
        name: Some(model.name.clone()),
        properties: Some(OutputProperties {
            datasource: Some(StreamDataSource::EventHub {
                properties: Some(EventHubDataSourceProperties {
                    service_bus_namespace: Some(model.servicebus_namespace.clone()),
                    shared_access_policy_name: Some(model.shared_access_policy_name.clone()),
                    shared_access_policy_key: model.shared_access_policy_key.clone(),
                    event_hub_name: Some(model.eventhub_name.clone()),
                    consumer_group_name: None,
                    partition_key: non_empty(&model.partition_key),
                }),
            }),
            serialization: Some(expand_serialization(RESOURCE_TYPE, &model.serialization)?),
        }),
        ..Output::default()
    })
}

pub fn flatten_output_eventhub(id: &OutputId, output: &Output) -> Result<OutputEventHubModel> {
    let mut model = OutputEventHubModel {
        name: id.name.clone(),
        stream_analytics_job_name: id.streaming_job_name.clone(),
        resource_group_name: id.resource_group.clone(),
        ..OutputEventHubModel::default()
    };
    let Some(props) = &output.properties else {
        return Ok(model);
    };

    match &props.datasource {
        Some(StreamDataSource::EventHub { properties }) => {
            let hub = properties.clone().unwrap_or_default();
            model.servicebus_namespace = hub.service_bus_namespace.unwrap_or_default();
            model.shared_access_policy_name = hub.shared_access_policy_name.unwrap_or_default();
            model.eventhub_name = hub.event_hub_name.unwrap_or_default();
            model.partition_key = hub.partition_key.unwrap_or_default();
        },
        None => {},
        Some(_) => return Err(unexpected_kind(id, "an EventHub Output")),
    }
    model.serialization = flatten_serialization(id, props.serialization.as_ref())?;
    Ok(model)
}
