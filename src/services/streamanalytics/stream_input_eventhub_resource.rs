//! `azurerm_stream_analytics_stream_input_eventhub`

use super::helpers::{job_child_schema, non_empty, unexpected_kind, with_event_hub_attributes};
use super::ids::{StreamInputId, StreamingJobId};
use super::sdk::{EventHubDataSourceProperties, Input, InputProperties, InputsClient, StreamDataSource};
use super::serialization::{expand_serialization, flatten_serialization, serialization_schema, SerializationModel};
use crate::azure::ArmClient;
use crate::error::{Result, ResultExt};
use crate::provider::{
    ensure_absent, found_or_gone, tolerate_not_found, OperationFuture, Resource, ResourceMeta,
};
use crate::resourceid::ResourceId;
use crate::schema::{Attribute, ResourceData, Schema};
use serde::{Deserialize, Serialize};

const RESOURCE_TYPE: &str = "azurerm_stream_analytics_stream_input_eventhub";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamInputEventHubModel {
    pub name: String,
    pub stream_analytics_job_name: String,
    pub resource_group_name: String,
    pub eventhub_consumer_group_name: String,
    pub eventhub_name: String,
    pub servicebus_namespace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_access_policy_key: Option<String>,
    pub shared_access_policy_name: String,
    pub serialization: Vec<SerializationModel>,
}

pub struct StreamInputEventHubResource;

impl Resource for StreamInputEventHubResource {
    fn resource_type(&self) -> &'static str {
        RESOURCE_TYPE
    }

    fn schema(&self) -> Schema {
        with_event_hub_attributes(job_child_schema())
            .attr("eventhub_consumer_group_name", Attribute::string().optional())
            .attr("serialization", serialization_schema(false))
    }

    fn validate_id(&self, id: &str) -> Result<()> {
        StreamInputId::parse(id)?;
        Ok(())
    }

    fn create<'a>(&'a self, meta: ResourceMeta<'a>) -> OperationFuture<'a> {
        Box::pin(async move {
            let ResourceMeta { client, data, .. } = meta;
            let model: StreamInputEventHubModel = data.decode()?;
            let input = expand_stream_input_eventhub(&model)?;

            let job = StreamingJobId::new(
                client.subscription_id(),
                &model.resource_group_name,
                &model.stream_analytics_job_name,
            );
            let id = StreamInputId::new(&job, &model.name);
            let sdk = InputsClient::new(client);

            ensure_absent(RESOURCE_TYPE, &id.id(), &id, sdk.get(&id).await)?;

            sdk.create_or_replace(&id, &input)
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
            let id = StreamInputId::parse(data.require_id()?)?;
            let model: StreamInputEventHubModel = data.decode()?;
            let input = expand_stream_input_eventhub(&model)?;

            InputsClient::new(client)
                .update(&id, &input)
                .await
                .with_context(|| format!("updating {}", id))?;

            read_into(client, data).await
        })
    }

    fn delete<'a>(&'a self, meta: ResourceMeta<'a>) -> OperationFuture<'a> {
        Box::pin(async move {
            let id = StreamInputId::parse(meta.data.require_id()?)?;
            tolerate_not_found(InputsClient::new(meta.client).delete(&id).await)
                .with_context(|| format!("deleting {}", id))?;
            Ok(())
        })
    }
}

async fn read_into(client: &ArmClient, data: &mut ResourceData) -> Result<()> {
    let id = StreamInputId::parse(data.require_id()?)?;
    let Some(input) = found_or_gone(data, &id, InputsClient::new(client).get(&id).await)? else {
        return Ok(());
    };
    data.apply(&flatten_stream_input_eventhub(&id, &input)?)
}

pub fn expand_stream_input_eventhub(model: &StreamInputEventHubModel) -> Result<Input> {
    Ok(Input {
        name: Some(model.name.clone()),
        properties: Some(InputProperties {
            input_type: Some("Stream".to_string()),
            datasource: Some(StreamDataSource::EventHub {
                properties: Some(EventHubDataSourceProperties {
                    service_bus_namespace: Some(model.servicebus_namespace.clone()),
                    shared_access_policy_name: Some(model.shared_access_policy_name.clone()),
                    shared_access_policy_key: model.shared_access_policy_key.clone(),
                    event_hub_name: Some(model.eventhub_name.clone()),
                    consumer_group_name: non_empty(&model.eventhub_consumer_group_name),
                    partition_key: None,
                }),
            }),
            serialization: Some(expand_serialization(RESOURCE_TYPE, &model.serialization)?),
        }),
        ..Input::default()
    })
}

pub fn flatten_stream_input_eventhub(id: &StreamInputId, input: &Input) -> Result<StreamInputEventHubModel> {
    let mut model = StreamInputEventHubModel {
        name: id.name.clone(),
        stream_analytics_job_name: id.streaming_job_name.clone(),
        resource_group_name: id.resource_group.clone(),
        ..StreamInputEventHubModel::default()
    };
    let Some(props) = &input.properties else {
        return Ok(model);
    };

    match &props.datasource {
        Some(StreamDataSource::EventHub { properties }) => {
            let hub = properties.clone().unwrap_or_default();
            model.servicebus_namespace = hub.service_bus_namespace.unwrap_or_default();
            model.shared_access_policy_name = hub.shared_access_policy_name.unwrap_or_default();
            model.eventhub_name = hub.event_hub_name.unwrap_or_default();
            model.eventhub_consumer_group_name = hub.consumer_group_name.unwrap_or_default();
        },
        None => {},
        Some(_) => return Err(unexpected_kind(id, "an EventHub Stream Input")),
    }
    model.serialization = flatten_serialization(id, props.serialization.as_ref())?;
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_expand_omits_empty_consumer_group() {
        let model = StreamInputEventHubModel {
            name: "input1".to_string(),
            eventhub_name: "hub".to_string(),
            servicebus_namespace: "ns".to_string(),
            shared_access_policy_name: "RootManageSharedAccessKey".to_string(),
            shared_access_policy_key: Some("key".to_string()),
            serialization: vec![SerializationModel {
                serialization_type: "Avro".to_string(),
                ..SerializationModel::default()
            }],
            ..StreamInputEventHubModel::default()
        };
        let body = serde_json::to_value(expand_stream_input_eventhub(&model).unwrap()).unwrap();
        let source = &body["properties"]["datasource"];
        assert_eq!(source["type"], json!("Microsoft.ServiceBus/EventHub"));
        assert!(source["properties"].get("consumerGroupName").is_none());
        assert_eq!(source["properties"]["sharedAccessPolicyKey"], json!("key"));
    }

    #[test]
    fn test_flatten_stream_input_eventhub() {
        let id = StreamInputId::new(&StreamingJobId::new("s", "rg1", "job1"), "input1");
        let input: Input = serde_json::from_value(json!({
            "properties": {
                "type": "Stream",
                "datasource": {
                    "type": "Microsoft.ServiceBus/EventHub",
                    "properties": {
                        "serviceBusNamespace": "ns",
                        "sharedAccessPolicyName": "policy",
                        "eventHubName": "hub",
                        "consumerGroupName": "cg"
                    }
                }
            }
        }))
        .unwrap();
        let model = flatten_stream_input_eventhub(&id, &input).unwrap();
        assert_eq!(model.eventhub_consumer_group_name, "cg");
        assert_eq!(model.shared_access_policy_key, None);
        assert!(model.serialization.is_empty());

        let blob: Input = serde_json::from_value(json!({
            "properties": {"datasource": {"type": "Microsoft.Storage/Blob"}}
        }))
        .unwrap();
        assert!(flatten_stream_input_eventhub(&id, &blob).is_err());
    }
}
