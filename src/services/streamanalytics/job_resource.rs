//! `azurerm_stream_analytics_job`
//!
//! The job and its `main` transformation are created in a single PUT. On
//! update they are separate objects: job settings are PATCHed on the job,
//! the query and streaming units on the transformation.

use super::ids::StreamingJobId;
use super::sdk::{
    JobSku, StreamingJob, StreamingJobProperties, StreamingJobsClient, Transformation,
    TransformationProperties, TRANSFORMATION_NAME,
};
use crate::azure::ArmClient;
use crate::error::{Result, ResultExt};
use crate::provider::{
    ensure_absent, found_or_gone, tolerate_not_found, OperationFuture, Resource, ResourceMeta,
};
use crate::resourceid::ResourceId;
use crate::schema::{Attribute, ResourceData, Schema, Validation};
use crate::services::common::{
    expand_identity, expand_tags, flatten_identity, flatten_tags, identity_schema,
    location_schema, name_schema, normalize_location, resource_group_name_schema, tags_schema,
    IdentityModel, Tags,
};
use serde::{Deserialize, Serialize};

const RESOURCE_TYPE: &str = "azurerm_stream_analytics_job";

pub const COMPATIBILITY_LEVELS: &[&str] = &["1.0", "1.1", "1.2"];
pub const OUT_OF_ORDER_POLICIES: &[&str] = &["Adjust", "Drop"];
pub const OUTPUT_ERROR_POLICIES: &[&str] = &["Drop", "Stop"];

/// Job attributes that live on the job object rather than the transformation.
const JOB_ATTRIBUTES: &[&str] = &[
    "compatibility_level",
    "data_locale",
    "events_late_arrival_max_delay_in_seconds",
    "events_out_of_order_max_delay_in_seconds",
    "events_out_of_order_policy",
    "output_error_policy",
    "identity",
    "tags",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingJobModel {
    pub name: String,
    pub resource_group_name: String,
    pub location: String,
    pub compatibility_level: String,
    pub data_locale: String,
    pub events_late_arrival_max_delay_in_seconds: i64,
    pub events_out_of_order_max_delay_in_seconds: i64,
    pub events_out_of_order_policy: String,
    pub output_error_policy: String,
    pub streaming_units: i64,
    pub transformation_query: String,
    pub identity: Vec<IdentityModel>,
    pub tags: Tags,

    pub job_id: String,
}

pub struct StreamingJobResource;

impl Resource for StreamingJobResource {
    fn resource_type(&self) -> &'static str {
        RESOURCE_TYPE
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr("name", name_schema())
            .attr("resource_group_name", resource_group_name_schema())
            .attr("location", location_schema())
            .attr(
                "compatibility_level",
                Attribute::string()
                    .optional()
                    .computed()
                    .validate_with(Validation::StringInSlice(COMPATIBILITY_LEVELS)),
            )
            .attr("data_locale", Attribute::string().optional().computed())
            .attr(
                "events_late_arrival_max_delay_in_seconds",
                Attribute::int()
                    .optional()
                    .default_value(5)
                    .validate_with(Validation::IntBetween(-1, 1_814_399)),
            )
            .attr(
                "events_out_of_order_max_delay_in_seconds",
                Attribute::int()
                    .optional()
                    .default_value(0)
                    .validate_with(Validation::IntBetween(0, 599)),
            )
            .attr(
                "events_out_of_order_policy",
                Attribute::string()
                    .optional()
                    .default_value("Adjust")
                    .validate_with(Validation::StringInSlice(OUT_OF_ORDER_POLICIES)),
            )
            .attr(
                "output_error_policy",
                Attribute::string()
                    .optional()
                    .default_value("Drop")
                    .validate_with(Validation::StringInSlice(OUTPUT_ERROR_POLICIES)),
            )
            .attr(
                "streaming_units",
                Attribute::int()
                    .required()
                    .validate_with(Validation::Int(validate_streaming_units)),
            )
            .attr(
                "transformation_query",
                Attribute::string()
                    .required()
                    .validate_with(Validation::StringNotEmpty),
            )
            .attr("identity", identity_schema())
            .attr("tags", tags_schema())
            .attr("job_id", Attribute::string().computed())
    }

    fn validate_id(&self, id: &str) -> Result<()> {
        StreamingJobId::parse(id)?;
        Ok(())
    }

    fn create<'a>(&'a self, meta: ResourceMeta<'a>) -> OperationFuture<'a> {
        Box::pin(async move {
            let ResourceMeta {
                client,
                data,
                deadline,
            } = meta;
            let model: StreamingJobModel = data.decode()?;
            let id = StreamingJobId::new(client.subscription_id(), &model.resource_group_name, &model.name);
            let sdk = StreamingJobsClient::new(client);

            ensure_absent(RESOURCE_TYPE, &id.id(), &id, sdk.get(&id).await)?;

            let mut job = expand_streaming_job(&model);
            job.location = Some(normalize_location(&model.location));
            if let Some(props) = job.properties.as_mut() {
                props.transformation = Some(expand_transformation(&model));
            }

            sdk.create_or_replace_then_poll(&id, &job, &deadline)
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
            let ResourceMeta {
                client,
                data,
                deadline,
            } = meta;
            let id = StreamingJobId::parse(data.require_id()?)?;
            let model: StreamingJobModel = data.decode()?;
            let sdk = StreamingJobsClient::new(client);

            if data.has_changes(JOB_ATTRIBUTES) {
                sdk.update(&id, &expand_streaming_job(&model), &deadline)
                    .await
                    .with_context(|| format!("updating {}", id))?;
            }

            if data.has_changes(&["streaming_units", "transformation_query"]) {
                sdk.update_transformation(&id, &expand_transformation(&model))
                    .await
                    .with_context(|| format!("updating the transformation of {}", id))?;
            }

            read_into(client, data).await
        })
    }

    fn delete<'a>(&'a self, meta: ResourceMeta<'a>) -> OperationFuture<'a> {
        Box::pin(async move {
            let id = StreamingJobId::parse(meta.data.require_id()?)?;
            tolerate_not_found(
                StreamingJobsClient::new(meta.client)
                    .delete_then_poll(&id, &meta.deadline)
                    .await,
            )
            .with_context(|| format!("deleting {}", id))?;
            Ok(())
        })
    }
}

async fn read_into(client: &ArmClient, data: &mut ResourceData) -> Result<()> {
    let id = StreamingJobId::parse(data.require_id()?)?;
    let result = StreamingJobsClient::new(client).get(&id).await;
    let Some(job) = found_or_gone(data, &id, result)? else {
        return Ok(());
    };
    data.apply(&flatten_streaming_job(&id, &job))
}

/// 1, 3, or a multiple of 6 up to 120.
pub fn validate_streaming_units(units: i64) -> std::result::Result<(), String> {
    let valid = units == 1 || units == 3 || (units % 6 == 0 && (6..=120).contains(&units));
    if valid {
        Ok(())
    } else {
        Err(format!(
            "expected 1, 3 or a multiple of 6 between 6 and 120, got {}",
            units
        ))
    }
}

// ============================================================================
// Expand / flatten
// ============================================================================

/// Job settings without the transformation.
pub fn expand_streaming_job(model: &StreamingJobModel) -> StreamingJob {
    let optional = |s: &str| (!s.is_empty()).then(|| s.to_string());
    StreamingJob {
        tags: Some(expand_tags(&model.tags)),
        identity: expand_identity(&model.identity),
        properties: Some(StreamingJobProperties {
            sku: Some(JobSku {
                name: Some("Standard".to_string()),
            }),
            compatibility_level: optional(&model.compatibility_level),
            data_locale: optional(&model.data_locale),
            events_late_arrival_max_delay_in_seconds: Some(model.events_late_arrival_max_delay_in_seconds),
            events_out_of_order_max_delay_in_seconds: Some(model.events_out_of_order_max_delay_in_seconds),
            events_out_of_order_policy: Some(model.events_out_of_order_policy.clone()),
            output_error_policy: Some(model.output_error_policy.clone()),
            ..StreamingJobProperties::default()
        }),
        ..StreamingJob::default()
    }
}

pub fn expand_transformation(model: &StreamingJobModel) -> Transformation {
    Transformation {
        name: Some(TRANSFORMATION_NAME.to_string()),
        properties: Some(TransformationProperties {
            streaming_units: Some(model.streaming_units),
            query: Some(model.transformation_query.clone()),
        }),
        ..Transformation::default()
    }
}

pub fn flatten_streaming_job(id: &StreamingJobId, job: &StreamingJob) -> StreamingJobModel {
    let mut model = StreamingJobModel {
        name: id.name.clone(),
        resource_group_name: id.resource_group.clone(),
        location: job.location.as_deref().map(normalize_location).unwrap_or_default(),
        identity: flatten_identity(job.identity.as_ref()),
        tags: flatten_tags(job.tags.as_ref()),
        ..StreamingJobModel::default()
    };
    let Some(props) = &job.properties else {
        return model;
    };

    model.job_id = props.job_id.clone().unwrap_or_default();
    model.compatibility_level = props.compatibility_level.clone().unwrap_or_default();
    model.data_locale = props.data_locale.clone().unwrap_or_default();
    model.events_late_arrival_max_delay_in_seconds =
        props.events_late_arrival_max_delay_in_seconds.unwrap_or_default();
    model.events_out_of_order_max_delay_in_seconds =
        props.events_out_of_order_max_delay_in_seconds.unwrap_or_default();
    model.events_out_of_order_policy = props.events_out_of_order_policy.clone().unwrap_or_default();
    model.output_error_policy = props.output_error_policy.clone().unwrap_or_default();

    if let Some(transformation) = props.transformation.as_ref().and_then(|t| t.properties.as_ref()) {
        model.streaming_units = transformation.streaming_units.unwrap_or_default();
        model.transformation_query = transformation.query.clone().unwrap_or_default();
    }
    model
}
