//! `azurerm_stream_analytics_stream_input_blob`

use super::helpers::{job_child_schema, non_empty, unexpected_kind, with_blob_attributes};
use super::ids::{StreamInputId, StreamingJobId};
use super::sdk::{BlobDataSourceProperties, Input, InputProperties, InputsClient, StorageAccount, StreamDataSource};
use super::serialization::{expand_serialization, flatten_serialization, serialization_schema, SerializationModel};
use crate::azure::ArmClient;
use crate::error::{Result, ResultExt};
use crate::provider::{
    ensure_absent, found_or_gone, tolerate_not_found, OperationFuture, Resource, ResourceMeta,
};
use crate::resourceid::ResourceId;
use crate::schema::{ResourceData, Schema};
use serde::{Deserialize, Serialize};

const RESOURCE_TYPE: &str = "azurerm_stream_analytics_stream_input_blob";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamInputBlobModel {
    pub name: String,
    pub stream_analytics_job_name: String,
    pub resource_group_name: String,
    pub storage_account_name: String,
    /// Not returned by the API; kept from configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_account_key: Option<String>,
    pub storage_container_name: String,
    pub path_pattern: String,
    pub date_format: String,
    pub time_format: String,
    pub serialization: Vec<SerializationModel>,
}

pub struct StreamInputBlobResource;

impl Resource for StreamInputBlobResource {
    fn resource_type(&self) -> &'static str {
        RESOURCE_TYPE
    }

    fn schema(&self) -> Schema {
        with_blob_attributes(job_child_schema()).attr("serialization", serialization_schema(false))
    }

    fn validate_id(&self, id: &str) -> Result<()> {
        StreamInputId::parse(id)?;
        Ok(())
    }

    fn create<'a>(&'a self, meta: ResourceMeta<'a>) -> OperationFuture<'a> {
        Box::pin(async move {
            let ResourceMeta { client, data, .. } = meta;
            let model: StreamInputBlobModel = data.decode()?;
            let input = expand_stream_input_blob(&model)?;

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
            let model: StreamInputBlobModel = data.decode()?;
            let input = expand_stream_input_blob(&model)?;

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
    data.apply(&flatten_stream_input_blob(&id, &input)?)
}

pub fn expand_stream_input_blob(model: &StreamInputBlobModel) -> Result<Input> {
    Ok(Input {
        name: Some(model.name.clone()),
        properties: Some(InputProperties {
            input_type: Some("Stream".to_string()),
            datasource: Some(StreamDataSource::Blob {
                properties: Some(BlobDataSourceProperties {
                    storage_accounts: Some(vec![StorageAccount {
                        account_name: Some(model.storage_account_name.clone()),
                        account_key: model.storage_account_key.clone(),
                    }]),
                    container: Some(model.storage_container_name.clone()),
                    path_pattern: Some(model.path_pattern.clone()),
                    date_format: non_empty(&model.date_format),
                    time_format: non_empty(&model.time_format),
                }),
            }),
            serialization: Some(expand_serialization(RESOURCE_TYPE, &model.serialization)?),
        }),
        ..Input::default()
    })
}

pub fn flatten_stream_input_blob(id: &StreamInputId, input: &Input) -> Result<StreamInputBlobModel> {
    let mut model = StreamInputBlobModel {
        name: id.name.clone(),
        stream_analytics_job_name: id.streaming_job_name.clone(),
        resource_group_name: id.resource_group.clone(),
        ..StreamInputBlobModel::default()
    };
    let Some(props) = &input.properties else {
        return Ok(model);
    };

    match &props.datasource {
        Some(StreamDataSource::Blob { properties }) => {
            let blob = properties.clone().unwrap_or_default();
            model.storage_account_name = blob
                .storage_accounts
                .as_ref()
                .and_then(|accounts| accounts.first())
                .and_then(|account| account.account_name.clone())
                .unwrap_or_default();
            model.storage_container_name = blob.container.unwrap_or_default();
            model.path_pattern = blob.path_pattern.unwrap_or_default();
            model.date_format = blob.date_format.unwrap_or_default();
            model.time_format = blob.time_format.unwrap_or_default();
        },
        None => {},
        Some(_) => return Err(unexpected_kind(id, "a Blob Stream Input")),
    }
    model.serialization = flatten_serialization(id, props.serialization.as_ref())?;
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde_json::json;

    fn model() -> StreamInputBlobModel {
        StreamInputBlobModel {
            name: "input1".to_string(),
            stream_analytics_job_name: "job1".to_string(),
            resource_group_name: "rg1".to_string(),
            storage_account_name: "acct".to_string(),
            storage_account_key: Some("secret".to_string()),
            storage_container_name: "events".to_string(),
            path_pattern: "some-pattern".to_string(),
            date_format: "yyyy/MM/dd".to_string(),
            time_format: "HH".to_string(),
            serialization: vec![SerializationModel {
                serialization_type: "Json".to_string(),
                encoding: Some("UTF8".to_string()),
                ..SerializationModel::default()
            }],
        }
    }

    #[test]
    fn test_expand_stream_input_blob() {
        let body = serde_json::to_value(expand_stream_input_blob(&model()).unwrap()).unwrap();
        assert_eq!(body["properties"]["type"], json!("Stream"));
        assert_eq!(body["properties"]["datasource"]["type"], json!("Microsoft.Storage/Blob"));
        assert_eq!(
            body["properties"]["datasource"]["properties"]["storageAccounts"],
            json!([{"accountName": "acct", "accountKey": "secret"}])
        );
        assert_eq!(body["properties"]["serialization"]["type"], json!("Json"));
    }

    #[test]
    fn test_invalid_serialization_fails_before_any_call() {
        let mut bad = model();
        bad.serialization[0].serialization_type = "Csv".to_string();
        assert!(matches!(
            expand_stream_input_blob(&bad).unwrap_err(),
            Error::Validation { .. }
        ));
    }

    #[test]
    fn test_flatten_keeps_key_out_of_state() {
        let id = StreamInputId::new(&StreamingJobId::new("s", "rg1", "job1"), "input1");
        let input: Input = serde_json::from_value(json!({
            "properties": {
                "type": "Stream",
                "datasource": {
                    "type": "Microsoft.Storage/Blob",
                    "properties": {
                        "storageAccounts": [{"accountName": "acct"}],
                        "container": "events",
                        "pathPattern": "p",
                        "dateFormat": "yyyy/MM/dd",
                        "timeFormat": "HH"
                    }
                },
                "serialization": {"type": "Avro", "properties": {}}
            }
        }))
        .unwrap();
        let flattened = flatten_stream_input_blob(&id, &input).unwrap();
        assert_eq!(flattened.storage_account_name, "acct");
        assert_eq!(flattened.storage_account_key, None);
        assert_eq!(flattened.serialization[0].serialization_type, "Avro");

        let state = serde_json::to_value(&flattened).unwrap();
        assert!(state.get("storage_account_key").is_none());
    }

    #[test]
    fn test_flatten_rejects_other_data_sources() {
        let id = StreamInputId::new(&StreamingJobId::new("s", "rg1", "job1"), "input1");
        let input: Input = serde_json::from_value(json!({
            "properties": {"datasource": {"type": "Microsoft.ServiceBus/EventHub"}}
        }))
        .unwrap();
        assert!(flatten_stream_input_blob(&id, &input).is_err());

        let empty = flatten_stream_input_blob(&id, &Input::default()).unwrap();
        assert!(empty.serialization.is_empty());
    }
}
