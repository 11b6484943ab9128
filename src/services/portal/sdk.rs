//! Microsoft.Portal API models and clients

use super::ids::{DashboardId, TenantConfigurationId};
use crate::azure::{ArmClient, Deadline};
use crate::error::Result;
use crate::resourceid::ResourceId;
use crate::services::common::Tags;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DASHBOARD_API_VERSION: &str = "2019-01-01-preview";
pub const TENANT_CONFIGURATION_API_VERSION: &str = "2020-09-01-preview";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dashboard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Tags>,
    /// Lenses and metadata; passed through as an opaque document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<ConfigurationProperties>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enforce_private_markdown_storage: Option<bool>,
}

pub struct DashboardsClient<'a> {
    client: &'a ArmClient,
}

impl<'a> DashboardsClient<'a> {
    pub fn new(client: &'a ArmClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, id: &DashboardId) -> Result<Dashboard> {
        self.client.get_json(&id.id(), DASHBOARD_API_VERSION).await
    }

    pub async fn create_or_update(
        &self,
        id: &DashboardId,
        parameters: &Dashboard,
        deadline: &Deadline,
    ) -> Result<()> {
        self.client
            .put_then_poll(&id.id(), DASHBOARD_API_VERSION, parameters, deadline)
            .await
    }

    pub async fn delete(&self, id: &DashboardId, deadline: &Deadline) -> Result<()> {
        self.client
            .delete_then_poll(&id.id(), DASHBOARD_API_VERSION, deadline)
            .await
    }
}

pub struct TenantConfigurationsClient<'a> {
    client: &'a ArmClient,
}

impl<'a> TenantConfigurationsClient<'a> {
    pub fn new(client: &'a ArmClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, id: &TenantConfigurationId) -> Result<Configuration> {
        self.client
            .get_json(&id.id(), TENANT_CONFIGURATION_API_VERSION)
            .await
    }

    /// Create only; the service answers 409 or 412 when the configuration exists.
    pub async fn create(
        &self,
        id: &TenantConfigurationId,
        parameters: &Configuration,
        deadline: &Deadline,
    ) -> Result<()> {
        let path = id.id();
        let response = self
            .client
            .put_if_none_match(&path, TENANT_CONFIGURATION_API_VERSION, parameters)
            .await?;
        self.client
            .wait_for_completion(
                Method::PUT,
                &path,
                TENANT_CONFIGURATION_API_VERSION,
                &response,
                deadline,
            )
            .await
    }

    pub async fn create_or_update(
        &self,
        id: &TenantConfigurationId,
        parameters: &Configuration,
        deadline: &Deadline,
    ) -> Result<()> {
        self.client
            .put_then_poll(&id.id(), TENANT_CONFIGURATION_API_VERSION, parameters, deadline)
            .await
    }

    pub async fn delete(&self, id: &TenantConfigurationId, deadline: &Deadline) -> Result<()> {
        self.client
            .delete_then_poll(&id.id(), TENANT_CONFIGURATION_API_VERSION, deadline)
            .await
    }
}
