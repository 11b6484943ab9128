//! `azurerm_portal_tenant_configuration`
//!
//! A singleton at tenant scope. Creation skips the existence check: the PUT
//! carries `If-None-Match: *` and a conflict answer becomes the usual import
//! error.

use super::ids::TenantConfigurationId;
use super::sdk::{Configuration, ConfigurationProperties, TenantConfigurationsClient};
use crate::azure::ArmClient;
use crate::error::{Result, ResultExt};
use crate::provider::{
    conflict_as_exists, found_or_gone, tolerate_not_found, OperationFuture, Resource, ResourceMeta,
};
use crate::resourceid::ResourceId;
use crate::schema::{Attribute, ResourceData, Schema};
use serde::{Deserialize, Serialize};

const RESOURCE_TYPE: &str = "azurerm_portal_tenant_configuration";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TenantConfigurationModel {
    pub private_markdown_storage_enforced: bool,
}

pub struct TenantConfigurationResource;

impl Resource for TenantConfigurationResource {
    fn resource_type(&self) -> &'static str {
        RESOURCE_TYPE
    }

    fn schema(&self) -> Schema {
        Schema::new().attr(
            "private_markdown_storage_enforced",
            Attribute::bool().required(),
        )
    }

    fn validate_id(&self, id: &str) -> Result<()> {
        TenantConfigurationId::parse(id)?;
        Ok(())
    }

    fn create<'a>(&'a self, meta: ResourceMeta<'a>) -> OperationFuture<'a> {
        Box::pin(async move {
            let ResourceMeta {
                client,
                data,
                deadline,
            } = meta;
            let model: TenantConfigurationModel = data.decode()?;
            let id = TenantConfigurationId::default();

            let result = TenantConfigurationsClient::new(client)
                .create(&id, &expand_configuration(&model), &deadline)
                .await
                .with_context(|| format!("creating {}", id));
            conflict_as_exists(RESOURCE_TYPE, &id.id(), result)?;

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
            let id = TenantConfigurationId::parse(data.require_id()?)?;
            let model: TenantConfigurationModel = data.decode()?;

            TenantConfigurationsClient::new(client)
                .create_or_update(&id, &expand_configuration(&model), &deadline)
                .await
                .with_context(|| format!("updating {}", id))?;

            read_into(client, data).await
        })
    }

    fn delete<'a>(&'a self, meta: ResourceMeta<'a>) -> OperationFuture<'a> {
        Box::pin(async move {
            let id = TenantConfigurationId::parse(meta.data.require_id()?)?;
            tolerate_not_found(
                TenantConfigurationsClient::new(meta.client)
                    .delete(&id, &meta.deadline)
                    .await,
            )
            .with_context(|| format!("deleting {}", id))?;
            Ok(())
        })
    }
}

async fn read_into(client: &ArmClient, data: &mut ResourceData) -> Result<()> {
    let id = TenantConfigurationId::parse(data.require_id()?)?;
    let result = TenantConfigurationsClient::new(client).get(&id).await;
    let Some(configuration) = found_or_gone(data, &id, result)? else {
        return Ok(());
    };
    data.apply(&flatten_configuration(&configuration))
}

fn expand_configuration(model: &TenantConfigurationModel) -> Configuration {
    Configuration {
        id: None,
        properties: Some(ConfigurationProperties {
            enforce_private_markdown_storage: Some(model.private_markdown_storage_enforced),
        }),
    }
}

fn flatten_configuration(configuration: &Configuration) -> TenantConfigurationModel {
    TenantConfigurationModel {
        private_markdown_storage_enforced: configuration
            .properties
            .as_ref()
            .and_then(|p| p.enforce_private_markdown_storage)
            .unwrap_or(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_expand_configuration_body() {
        let body = expand_configuration(&TenantConfigurationModel {
            private_markdown_storage_enforced: true,
        });
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"properties": {"enforcePrivateMarkdownStorage": true}})
        );
    }

    #[test]
    fn test_flatten_configuration_without_properties() {
        assert!(!flatten_configuration(&Configuration::default()).private_markdown_storage_enforced);
    }
}
