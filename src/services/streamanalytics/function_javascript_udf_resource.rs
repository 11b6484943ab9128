//! `azurerm_stream_analytics_function_javascript_udf`

use super::helpers::{job_child_schema, unexpected_kind};
use super::ids::{FunctionId, StreamingJobId};
use super::sdk::{
    Function, FunctionBinding, FunctionInput, FunctionOutput, FunctionProperties, FunctionsClient,
    JavaScriptBindingProperties, ScalarFunctionProperties,
};
use crate::azure::ArmClient;
use crate::error::{Result, ResultExt};
use crate::provider::{
    ensure_absent, found_or_gone, tolerate_not_found, OperationFuture, Resource, ResourceMeta,
};
use crate::resourceid::ResourceId;
use crate::schema::{Attribute, ResourceData, Schema, Validation};
use serde::{Deserialize, Serialize};

const RESOURCE_TYPE: &str = "azurerm_stream_analytics_function_javascript_udf";

pub const DATA_TYPES: &[&str] = &[
    "any",
    "array",
    "bigint",
    "datetime",
    "float",
    "nvarchar(max)",
    "record",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JavaScriptFunctionModel {
    pub name: String,
    pub stream_analytics_job_name: String,
    pub resource_group_name: String,
    pub input: Vec<FunctionTypeModel>,
    pub output: Vec<FunctionTypeModel>,
    pub script: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FunctionTypeModel {
    #[serde(rename = "type")]
    pub data_type: String,
}

pub struct JavaScriptFunctionResource;

fn type_block() -> Schema {
    Schema::new().attr(
        "type",
        Attribute::string()
            .required()
            .validate_with(Validation::StringInSlice(DATA_TYPES)),
    )
}

impl Resource for JavaScriptFunctionResource {
    fn resource_type(&self) -> &'static str {
        RESOURCE_TYPE
    }

    fn schema(&self) -> Schema {
        job_child_schema()
            .attr("input", Attribute::block(type_block()).required().min_items(1))
            .attr(
                "output",
                Attribute::block(type_block()).required().min_items(1).max_items(1),
            )
            .attr(
                "script",
                Attribute::string()
                    .required()
                    .validate_with(Validation::StringNotEmpty),
            )
    }

    fn validate_id(&self, id: &str) -> Result<()> {
        FunctionId::parse(id)?;
        Ok(())
    }

    fn create<'a>(&'a self, meta: ResourceMeta<'a>) -> OperationFuture<'a> {
        Box::pin(async move {
            let ResourceMeta { client, data, .. } = meta;
            let model: JavaScriptFunctionModel = data.decode()?;
            let job = StreamingJobId::new(
                client.subscription_id(),
                &model.resource_group_name,
                &model.stream_analytics_job_name,
            );
            let id = FunctionId::new(&job, &model.name);
            let sdk = FunctionsClient::new(client);

            ensure_absent(RESOURCE_TYPE, &id.id(), &id, sdk.get(&id).await)?;

            sdk.create_or_replace(&id, &expand_javascript_function(&model))
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
            let id = FunctionId::parse(data.require_id()?)?;
            let model: JavaScriptFunctionModel = data.decode()?;

            FunctionsClient::new(client)
                .update(&id, &expand_javascript_function(&model))
                .await
                .with_context(|| format!("updating {}", id))?;

            read_into(client, data).await
        })
    }

    fn delete<'a>(&'a self, meta: ResourceMeta<'a>) -> OperationFuture<'a> {
        Box::pin(async move {
            let id = FunctionId::parse(meta.data.require_id()?)?;
            tolerate_not_found(FunctionsClient::new(meta.client).delete(&id).await)
                .with_context(|| format!("deleting {}", id))?;
            Ok(())
        })
    }
}

async fn read_into(client: &ArmClient, data: &mut ResourceData) -> Result<()> {
    let id = FunctionId::parse(data.require_id()?)?;
    let Some(function) = found_or_gone(data, &id, FunctionsClient::new(client).get(&id).await)? else {
        return Ok(());
    };
    data.apply(&flatten_javascript_function(&id, &function)?)
}

pub fn expand_javascript_function(model: &JavaScriptFunctionModel) -> Function {
    let inputs = model
        .input
        .iter()
        .map(|i| FunctionInput {
            data_type: Some(i.data_type.clone()),
            is_configuration_parameter: None,
        })
        .collect();
    let output = model.output.first().map(|o| FunctionOutput {
        data_type: Some(o.data_type.clone()),
    });

    Function {
        name: Some(model.name.clone()),
        properties: Some(FunctionProperties {
            function_type: Some("Scalar".to_string()),
            properties: Some(ScalarFunctionProperties {
                inputs: Some(inputs),
                output,
                binding: Some(FunctionBinding::JavaScript {
                    properties: Some(JavaScriptBindingProperties {
                        script: Some(model.script.clone()),
                    }),
                }),
            }),
        }),
        ..Function::default()
    }
}

pub fn flatten_javascript_function(id: &FunctionId, function: &Function) -> Result<JavaScriptFunctionModel> {
    let mut model = JavaScriptFunctionModel {
        name: id.name.clone(),
        stream_analytics_job_name: id.streaming_job_name.clone(),
        resource_group_name: id.resource_group.clone(),
        ..JavaScriptFunctionModel::default()
    };
    let Some(scalar) = function.properties.as_ref().and_then(|p| p.properties.as_ref()) else {
        return Ok(model);
    };

    match &scalar.binding {
        Some(FunctionBinding::JavaScript { properties }) => {
            model.script = properties
                .as_ref()
                .and_then(|p| p.script.clone())
                .unwrap_or_default();
        },
        None => {},
        Some(FunctionBinding::Unsupported) => {
            return Err(unexpected_kind(id, "a JavaScript UDF"));
        },
    }

    model.input = scalar
        .inputs
        .iter()
        .flatten()
        .map(|i| FunctionTypeModel {
            data_type: i.data_type.clone().unwrap_or_default(),
        })
        .collect();
    model.output = scalar
        .output
        .iter()
        .map(|o| FunctionTypeModel {
            data_type: o.data_type.clone().unwrap_or_default(),
        })
        .collect();
    Ok(model)
}
