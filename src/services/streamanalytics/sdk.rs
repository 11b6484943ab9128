//! Microsoft.StreamAnalytics API models and clients
//!
//! Streaming jobs use the 2020-03-01-preview API (managed identity support);
//! inputs, outputs and functions stay on 2016-03-01.

use super::ids::{FunctionId, OutputId, StreamInputId, StreamingJobId};
use crate::azure::{ArmClient, Deadline};
use crate::error::Result;
use crate::resourceid::ResourceId;
use crate::services::common::{SystemIdentity, Tags};
use serde::{Deserialize, Serialize};

pub const JOBS_API_VERSION: &str = "2020-03-01-preview";
pub const API_VERSION: &str = "2016-03-01";

/// The job transformation is always called `main`.
pub const TRANSFORMATION_NAME: &str = "main";

// ============================================================================
// Streaming jobs
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamingJob {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Tags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<SystemIdentity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<StreamingJobProperties>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobSku {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamingJobProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<JobSku>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events_out_of_order_policy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_error_policy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events_out_of_order_max_delay_in_seconds: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events_late_arrival_max_delay_in_seconds: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_locale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compatibility_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transformation: Option<Transformation>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transformation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<TransformationProperties>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformationProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub streaming_units: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

// ============================================================================
// Data sources and serialization
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageAccount {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,
    /// Write-only; never returned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_key: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobDataSourceProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_accounts: Option<Vec<StorageAccount>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_format: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventHubDataSourceProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_bus_namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_access_policy_name: Option<String>,
    /// Write-only; never returned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_access_policy_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_hub_name: Option<String>,
    /// Inputs only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer_group_name: Option<String>,
    /// Outputs only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition_key: Option<String>,
}

/// Where an input reads from or an output writes to, keyed by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StreamDataSource {
    #[serde(rename = "Microsoft.Storage/Blob")]
    Blob {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        properties: Option<BlobDataSourceProperties>,
    },
    #[serde(rename = "Microsoft.ServiceBus/EventHub")]
    EventHub {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        properties: Option<EventHubDataSourceProperties>,
    },
    /// Any data source type this provider does not manage.
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AvroProperties {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_delimiter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JsonProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    /// `LineSeparated` or `Array`; outputs only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Serialization {
    Avro {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        properties: Option<AvroProperties>,
    },
    Csv {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        properties: Option<CsvProperties>,
    },
    Json {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        properties: Option<JsonProperties>,
    },
    #[serde(other)]
    Unsupported,
}

// ============================================================================
// Inputs and outputs
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Input {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<InputProperties>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputProperties {
    /// `Stream` for every input managed here.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datasource: Option<StreamDataSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serialization: Option<Serialization>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Output {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<OutputProperties>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datasource: Option<StreamDataSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serialization: Option<Serialization>,
}

// ============================================================================
// Functions
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Function {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<FunctionProperties>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FunctionProperties {
    /// `Scalar` for user-defined functions.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub function_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<ScalarFunctionProperties>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScalarFunctionProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs: Option<Vec<FunctionInput>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<FunctionOutput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binding: Option<FunctionBinding>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_configuration_parameter: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JavaScriptBindingProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FunctionBinding {
    #[serde(rename = "Microsoft.StreamAnalytics/JavascriptUdf")]
    JavaScript {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        properties: Option<JavaScriptBindingProperties>,
    },
    #[serde(other)]
    Unsupported,
}

// ============================================================================
// Clients
// ============================================================================

pub struct StreamingJobsClient<'a> {
    client: &'a ArmClient,
}

impl<'a> StreamingJobsClient<'a> {
    pub fn new(client: &'a ArmClient) -> Self {
        Self { client }
    }

    /// GET the job with its transformation expanded.
    pub async fn get(&self, id: &StreamingJobId) -> Result<StreamingJob> {
        self.client
            .get_json_with_query(&id.id(), JOBS_API_VERSION, &[("$expand", "transformation")])
            .await
    }

    pub async fn create_or_replace_then_poll(
        &self,
        id: &StreamingJobId,
        job: &StreamingJob,
        deadline: &Deadline,
    ) -> Result<()> {
        self.client
            .put_then_poll(&id.id(), JOBS_API_VERSION, job, deadline)
            .await
    }

    pub async fn update(&self, id: &StreamingJobId, job: &StreamingJob, deadline: &Deadline) -> Result<()> {
        self.client
            .patch_then_poll(&id.id(), JOBS_API_VERSION, job, deadline)
            .await
    }

    pub async fn delete_then_poll(&self, id: &StreamingJobId, deadline: &Deadline) -> Result<()> {
        self.client
            .delete_then_poll(&id.id(), JOBS_API_VERSION, deadline)
            .await
    }

    /// PATCH the `main` transformation of a job.
    pub async fn update_transformation(
        &self,
        id: &StreamingJobId,
        transformation: &Transformation,
    ) -> Result<()> {
        let path = format!("{}/transformations/{}", id.id(), TRANSFORMATION_NAME);
        self.client.patch(&path, API_VERSION, transformation).await?;
        Ok(())
    }
}

pub struct InputsClient<'a> {
    client: &'a ArmClient,
}

impl<'a> InputsClient<'a> {
    pub fn new(client: &'a ArmClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, id: &StreamInputId) -> Result<Input> {
        self.client.get_json(&id.id(), API_VERSION).await
    }

    pub async fn create_or_replace(&self, id: &StreamInputId, input: &Input) -> Result<()> {
        self.client.put(&id.id(), API_VERSION, input).await?;
        Ok(())
    }

    pub async fn update(&self, id: &StreamInputId, input: &Input) -> Result<()> {
        self.client.patch(&id.id(), API_VERSION, input).await?;
        Ok(())
    }

    pub async fn delete(&self, id: &StreamInputId) -> Result<()> {
        self.client.delete(&id.id(), API_VERSION).await?;
        Ok(())
    }
}

pub struct OutputsClient<'a> {
    client: &'a ArmClient,
}

impl<'a> OutputsClient<'a> {
    pub fn new(client: &'a ArmClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, id: &OutputId) -> Result<Output> {
        self.client.get_json(&id.id(), API_VERSION).await
    }

    pub async fn create_or_replace(&self, id: &OutputId, output: &Output) -> Result<()> {
        self.client.put(&id.id(), API_VERSION, output).await?;
        Ok(())
    }

    pub async fn update(&self, id: &OutputId, output: &Output) -> Result<()> {
        self.client.patch(&id.id(), API_VERSION, output).await?;
        Ok(())
    }

    pub async fn delete(&self, id: &OutputId) -> Result<()> {
        self.client.delete(&id.id(), API_VERSION).await?;
        Ok(())
    }
}

pub struct FunctionsClient<'a> {
    client: &'a ArmClient,
}

impl<'a> FunctionsClient<'a> {
    pub fn new(client: &'a ArmClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, id: &FunctionId) -> Result<Function> {
        self.client.get_json(&id.id(), API_VERSION).await
    }

    pub async fn create_or_replace(&self, id: &FunctionId, function: &Function) -> Result<()> {
        self.client.put(&id.id(), API_VERSION, function).await?;
        Ok(())
    }

    pub async fn update(&self, id: &FunctionId, function: &Function) -> Result<()> {
        self.client.patch(&id.id(), API_VERSION, function).await?;
        Ok(())
    }

    pub async fn delete(&self, id: &FunctionId) -> Result<()> {
        self.client.delete(&id.id(), API_VERSION).await?;
        Ok(())
    }
}
