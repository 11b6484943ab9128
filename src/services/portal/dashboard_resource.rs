//! `azurerm_portal_dashboard`
//!
//! `dashboard_properties` is a JSON document holding lenses and metadata.
//! It is validated before any request and kept in state in its canonical
//! serialisation so that whitespace or key order never shows up as drift.

use super::ids::DashboardId;
use super::sdk::{Dashboard, DashboardsClient};
use crate::azure::ArmClient;
use crate::error::{Error, Result, ResultExt};
use crate::provider::{
    ensure_absent, found_or_gone, tolerate_not_found, OperationFuture, Resource, ResourceMeta,
};
use crate::resourceid::ResourceId;
use crate::schema::{Attribute, ResourceData, Schema, Validation};
use crate::services::common::{
    expand_tags, flatten_tags, location_schema, normalize_location, resource_group_name_schema,
    tags_schema, Tags,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const RESOURCE_TYPE: &str = "azurerm_portal_dashboard";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardModel {
    pub name: String,
    pub resource_group_name: String,
    pub location: String,
    pub dashboard_properties: String,
    pub tags: Tags,
}

pub struct DashboardResource;

impl Resource for DashboardResource {
    fn resource_type(&self) -> &'static str {
        RESOURCE_TYPE
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr(
                "name",
                Attribute::string()
                    .required()
                    .force_new()
                    .validate_with(Validation::String(validate_dashboard_name)),
            )
            .attr("resource_group_name", resource_group_name_schema())
            .attr("location", location_schema())
            .attr(
                "dashboard_properties",
                Attribute::string()
                    .optional()
                    .computed()
                    .validate_with(Validation::Json)
                    .state_func(normalize_json),
            )
            .attr("tags", tags_schema())
    }

    fn validate_id(&self, id: &str) -> Result<()> {
        DashboardId::parse(id)?;
        Ok(())
    }

    fn create<'a>(&'a self, meta: ResourceMeta<'a>) -> OperationFuture<'a> {
        Box::pin(async move {
            let ResourceMeta {
                client,
                data,
                deadline,
            } = meta;
            let model: DashboardModel = data.decode()?;
            let id = DashboardId::new(client.subscription_id(), &model.resource_group_name, &model.name);
            let sdk = DashboardsClient::new(client);

            ensure_absent(RESOURCE_TYPE, &id.id(), &id, sdk.get(&id).await)?;

            let parameters = expand_dashboard(&model)?;
            sdk.create_or_update(&id, &parameters, &deadline)
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
            let id = DashboardId::parse(data.require_id()?)?;
            let model: DashboardModel = data.decode()?;

            // The whole document is replaced; there is no partial update.
            let parameters = expand_dashboard(&model)?;
            DashboardsClient::new(client)
                .create_or_update(&id, &parameters, &deadline)
                .await
                .with_context(|| format!("updating {}", id))?;

            read_into(client, data).await
        })
    }

    fn delete<'a>(&'a self, meta: ResourceMeta<'a>) -> OperationFuture<'a> {
        Box::pin(async move {
            let id = DashboardId::parse(meta.data.require_id()?)?;
            tolerate_not_found(DashboardsClient::new(meta.client).delete(&id, &meta.deadline).await)
                .with_context(|| format!("deleting {}", id))?;
            Ok(())
        })
    }
}

async fn read_into(client: &ArmClient, data: &mut ResourceData) -> Result<()> {
    let id = DashboardId::parse(data.require_id()?)?;
    let result = DashboardsClient::new(client).get(&id).await;
    let Some(dashboard) = found_or_gone(data, &id, result)? else {
        return Ok(());
    };
    data.apply(&flatten_dashboard(&id, &dashboard))
}

/// Names are 1 to 64 characters of letters, digits and hyphens.
pub fn validate_dashboard_name(name: &str) -> Result<(), String> {
    if name.is_empty() || name.len() > 64 {
        return Err(format!("{:?} must be between 1 and 64 characters in length", name));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(format!("{:?} may only contain alphanumeric characters and hyphens", name));
    }
    Ok(())
}

/// Canonical serialisation; input that is not JSON is returned unchanged.
pub fn normalize_json(input: &str) -> String {
    match serde_json::from_str::<Value>(input) {
        Ok(value) => value.to_string(),
        Err(_) => input.to_string(),
    }
}

pub fn expand_dashboard(model: &DashboardModel) -> Result<Dashboard> {
    let properties = if model.dashboard_properties.trim().is_empty() {
        None
    } else {
        let value = serde_json::from_str::<Value>(&model.dashboard_properties).map_err(|e| {
            Error::validation(
                "dashboard_properties",
                format!("parsing JSON: {}", e),
            )
        })?;
        Some(value)
    };

    Ok(Dashboard {
        location: Some(normalize_location(&model.location)),
        tags: Some(expand_tags(&model.tags)),
        properties,
        ..Dashboard::default()
    })
}

pub fn flatten_dashboard(id: &DashboardId, dashboard: &Dashboard) -> DashboardModel {
    DashboardModel {
        name: id.name.clone(),
        resource_group_name: id.resource_group.clone(),
        location: dashboard
            .location
            .as_deref()
            .map(normalize_location)
            .unwrap_or_default(),
        dashboard_properties: dashboard
            .properties
            .as_ref()
            .map(|p| p.to_string())
            .unwrap_or_default(),
        tags: flatten_tags(dashboard.tags.as_ref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dashboard_name_validation() {
        assert!(validate_dashboard_name("my-dashboard-1").is_ok());
        assert!(validate_dashboard_name(&"a".repeat(64)).is_ok());
        assert!(validate_dashboard_name(&"a".repeat(65)).is_err());
        assert!(validate_dashboard_name("my_dashboard").is_err());
        assert!(validate_dashboard_name("").is_err());
    }

    #[test]
    fn test_invalid_properties_fail_schema_validation() {
        let config = json!({
            "name": "dash1",
            "resource_group_name": "rg1",
            "location": "westeurope",
            "dashboard_properties": "{\"lenses\": "
        });
        let errors = DashboardResource
            .schema()
            .validate(config.as_object().unwrap())
            .unwrap_err();
        assert!(errors[0].starts_with("dashboard_properties: invalid JSON"));
    }

    #[test]
    fn test_normalize_json_is_stable() {
        let a = normalize_json("{ \"metadata\": {}, \"lenses\": {\"0\": {\"order\": 0}} }");
        let b = normalize_json("{\"lenses\":{\"0\":{\"order\":0}},\"metadata\":{}}");
        assert_eq!(a, b);
        assert_eq!(normalize_json("not json"), "not json");
    }

    #[test]
    fn test_expand_empty_properties_is_none() {
        let model = DashboardModel {
            name: "d".to_string(),
            location: "West Europe".to_string(),
            ..DashboardModel::default()
        };
        let expanded = expand_dashboard(&model).unwrap();
        assert!(expanded.properties.is_none());
        assert_eq!(expanded.location.as_deref(), Some("westeurope"));
    }

    #[test]
    fn test_flatten_dashboard() {
        let id = DashboardId::new("s", "rg1", "dash1");
        let dashboard = Dashboard {
            properties: Some(json!({"lenses": {}})),
            ..Dashboard::default()
        };
        let model = flatten_dashboard(&id, &dashboard);
        assert_eq!(model.dashboard_properties, "{\"lenses\":{}}");
        assert!(model.tags.is_empty());

        let empty = flatten_dashboard(&id, &Dashboard::default());
        assert_eq!(empty.dashboard_properties, "");
    }
}
