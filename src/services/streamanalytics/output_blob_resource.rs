//! `azurerm_stream_analytics_output_blob`

use super::helpers::{job_child_schema, non_empty, unexpected_kind, with_blob_attributes};
use super::ids::{OutputId, StreamingJobId};
use super::sdk::{BlobDataSourceProperties, Output, OutputProperties, OutputsClient, StorageAccount, StreamDataSource};
use super::serialization::{expand_serialization, flatten_serialization, serialization_schema, SerializationModel};
use crate::azure::ArmClient;
use crate::error::{Result, ResultExt};
use crate::provider::{
    ensure_absent, found_or_gone, tolerate_not_found, OperationFuture, Resource, ResourceMeta,
};
use crate::resourceid::ResourceId;
use crate::schema::{ResourceData, Schema};
use serde::{Deserialize, Serialize};

const RESOURCE_TYPE: &str = "azurerm_stream_analytics_output_blob";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputBlobModel {
    pub name: String,
    pub stream_analytics_job_name: String,
    pub resource_group_name: String,
    pub storage_account_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_account_key: Option<String>,
    pub storage_container_name: String,
    pub path_pattern: String,
    pub date_format: String,
    pub time_format: String,
    pub serialization: Vec<SerializationModel>,
}

pub struct OutputBlobResource;

impl Resource for OutputBlobResource {
    fn resource_type(&self) -> &'static str {
        RESOURCE_TYPE
    }

    fn schema(&self) -> Schema {
        with_blob_attributes(job_child_schema()).attr("serialization", serialization_schema(true))
    }

    fn validate_id(&self, id: &str) -> Result<()> {
        OutputId::parse(id)?;
        Ok(())
    }

    fn create<'a>(&'a self, meta: ResourceMeta<'a>) -> OperationFuture<'a> {
        Box::pin(async move {
            let ResourceMeta { client, data, .. } = meta;
            let model: OutputBlobModel = data.decode()?;
            let output = expand_output_blob(&model)?;

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
            let model: OutputBlobModel = data.decode()?;
            let output = expand_output_blob(&model)?;

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
    data.apply(&flatten_output_blob(&id, &output)?)
}

pub fn expand_output_blob(model: &OutputBlobModel) -> Result<Output> {
    Ok(Output {
        name: Some(model.name.clone()),
        properties: Some(OutputProperties {
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
        ..Output::default()
    })
}

pub fn flatten_output_blob(id: &OutputId, output: &Output) -> Result<OutputBlobModel> {
    let mut model = OutputBlobModel {
        name: id.name.clone(),
        stream_analytics_job_name: id.streaming_job_name.clone(),
        resource_group_name: id.resource_group.clone(),
        ..OutputBlobModel::default()
    };
    let Some(props) = &output.properties else {
        return Ok(model);
    };

    match &props.datasource {
        Some(StreamDataSource::Blob { properties }) => {
            let blob = properties.clone().unwrap_or_default();
            model.storage_account_name = blob
                .storage_accounts
                .unwrap_or_default()
                .into_iter()
                .next()
                .and_then(|account| account.account_name)
                .unwrap_or_default();
            model.storage_container_name = blob.container.unwrap_or_default();
            model.path_pattern = blob.path_pattern.unwrap_or_default();
            model.date_format = blob.date_format.unwrap_or_default();
            model.time_format = blob.time_format.unwrap_or_default();
        },
        None => {},
        Some(_) => return Err(unexpected_kind(id, "a Blob Output")),
    }
    model.serialization = flatten_serialization(id, props.serialization.as_ref())?;
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_output_accepts_format() {
        let model = OutputBlobModel {
            name: "out".to_string(),
            storage_account_name: "acct".to_string(),
            storage_account_key: Some("k".to_string()),
            storage_container_name: "c".to_string(),
            path_pattern: "p".to_string(),
            date_format: "yyyy-MM-dd".to_string(),
            time_format: "HH".to_string(),
            serialization: vec![SerializationModel {
                serialization_type: "Json".to_string(),
                encoding: Some("UTF8".to_string()),
                format: Some("Array".to_string()),
                ..SerializationModel::default()
            }],
            ..OutputBlobModel::default()
        };
        let body = serde_json::to_value(expand_output_blob(&model).unwrap()).unwrap();
        assert_eq!(
            body["properties"]["serialization"],
            json!({"type": "Json", "properties": {"encoding": "UTF8", "format": "Array"}})
        );
        assert!(body["properties"].get("type").is_none());
    }

    #[test]
    fn test_schema_offers_format() {
        let schema = OutputBlobResource.schema();
        let config = json!({
            "name": "out",
            "stream_analytics_job_name": "job1",
            "resource_group_name": "rg1",
            "storage_account_name": "acct",
            "storage_account_key": "k",
            "storage_container_name": "c",
            "path_pattern": "p",
            "date_format": "yyyy-MM-dd",
            "time_format": "HH",
            "serialization": [{"type": "Json", "encoding": "UTF8", "format": "LineSeparated"}]
        });
        assert!(schema.validate(config.as_object().unwrap()).is_ok());
    }

    #[test]
    fn test_flatten_output_blob_without_accounts() {
        let id = OutputId::new(&StreamingJobId::new("s", "rg1", "job1"), "out");
        let output: Output = serde_json::from_value(json!({
            "properties": {"datasource": {"type": "Microsoft.Storage/Blob", "properties": {}}}
        }))
        .unwrap();
        let model = flatten_output_blob(&id, &output).unwrap();
        assert_eq!(model.storage_account_name, "");
        assert!(model.serialization.is_empty());
    }
}
