//! Azure Stream Analytics (Microsoft.StreamAnalytics)
//!
//! - [`ids`] - Streaming job, input, output and function IDs
//! - [`sdk`] - API models and clients
//! - [`serialization`] - The serialization block shared by inputs and outputs
//! - Resources: job, blob and Event Hub stream inputs, blob and Event Hub
//!   outputs, JavaScript UDF
//! - Data sources: job

mod helpers;

pub mod function_javascript_udf_resource;
pub mod ids;
pub mod job_data_source;
pub mod job_resource;
pub mod output_blob_resource;
pub mod output_eventhub_resource;
pub mod sdk;
pub mod serialization;
pub mod stream_input_blob_resource;
pub mod stream_input_eventhub_resource;

use crate::provider::Registry;

pub fn register(registry: &mut Registry) {
    registry.register_resource(job_resource::StreamingJobResource);
    registry.register_resource(stream_input_blob_resource::StreamInputBlobResource);
    registry.register_resource(stream_input_eventhub_resource::StreamInputEventHubResource);
    registry.register_resource(output_blob_resource::OutputBlobResource);
    registry.register_resource(output_eventhub_resource::OutputEventHubResource);
    registry.register_resource(function_javascript_udf_resource::JavaScriptFunctionResource);
    registry.register_data_source(job_data_source::StreamingJobDataSource);
}
