//! Microsoft.Search API models and clients (api-version 2020-03-13)

use super::ids::SearchServiceId;
use crate::azure::client::decode;
use crate::azure::{ArmClient, Deadline};
use crate::error::Result;
use crate::resourceid::ResourceId;
use crate::services::common::{SystemIdentity, Tags};
use serde::{Deserialize, Serialize};

pub const API_VERSION: &str = "2020-03-13";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sku {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchService {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Tags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<Sku>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<SystemIdentity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<SearchServiceProperties>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchServiceProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replica_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition_count: Option<i64>,
    /// `default` or `highDensity`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosting_mode: Option<String>,
    /// `enabled` or `disabled`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_network_access: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_rule_set: Option<NetworkRuleSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkRuleSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_rules: Option<Vec<IpRule>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IpRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminKeyResult {
    #[serde(default)]
    pub primary_key: Option<String>,
    #[serde(default)]
    pub secondary_key: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQueryKeysResult {
    #[serde(default)]
    pub value: Option<Vec<QueryKey>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryKey {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
}

pub struct ServicesClient<'a> {
    client: &'a ArmClient,
}

impl<'a> ServicesClient<'a> {
    pub fn new(client: &'a ArmClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, id: &SearchServiceId) -> Result<SearchService> {
        self.client.get_json(&id.id(), API_VERSION).await
    }

    pub async fn create_or_update_then_poll(
        &self,
        id: &SearchServiceId,
        parameters: &SearchService,
        deadline: &Deadline,
    ) -> Result<()> {
        self.client
            .put_then_poll(&id.id(), API_VERSION, parameters, deadline)
            .await
    }

    pub async fn delete(&self, id: &SearchServiceId, deadline: &Deadline) -> Result<()> {
        self.client.delete_then_poll(&id.id(), API_VERSION, deadline).await
    }

    pub async fn list_admin_keys(&self, id: &SearchServiceId) -> Result<AdminKeyResult> {
        let path = format!("{}/listAdminKeys", id.id());
        let response = self.client.post(&path, API_VERSION, None).await?;
        decode(&path, response.body)
    }

    pub async fn list_query_keys(&self, id: &SearchServiceId) -> Result<ListQueryKeysResult> {
        let path = format!("{}/listQueryKeys", id.id());
        let response = self.client.post(&path, API_VERSION, None).await?;
        decode(&path, response.body)
    }
}
