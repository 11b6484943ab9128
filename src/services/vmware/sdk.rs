//! Microsoft.AVS API models and clients (api-version 2020-03-20)

use super::ids::{AuthorizationId, ClusterId, PrivateCloudId};
use crate::azure::{ArmClient, Deadline};
use crate::error::Result;
use crate::resourceid::ResourceId;
use crate::services::common::Tags;
use serde::{Deserialize, Serialize};

pub const API_VERSION: &str = "2020-03-20";

// ============================================================================
// Models
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sku {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateCloud {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Tags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<Sku>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<PrivateCloudProperties>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateCloudProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub management_cluster: Option<ManagementCluster>,
    /// `Enabled` or `Disabled`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_block: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circuit: Option<Circuit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoints: Option<Endpoints>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub management_network: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_network: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vmotion_network: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vcenter_password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nsxt_password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vcenter_certificate_thumbprint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nsxt_certificate_thumbprint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagementCluster {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_size: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosts: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Circuit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_subnet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_subnet: Option<String>,
    #[serde(rename = "expressRouteID", default, skip_serializing_if = "Option::is_none")]
    pub express_route_id: Option<String>,
    #[serde(rename = "expressRoutePrivatePeeringID", default, skip_serializing_if = "Option::is_none")]
    pub express_route_private_peering_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nsxt_manager: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vcsa: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hcx_cloud_manager: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateCloudUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Tags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<PrivateCloudUpdateProperties>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateCloudUpdateProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub management_cluster: Option<ManagementCluster>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internet: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<Sku>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<ClusterProperties>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_size: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosts: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<ClusterUpdateProperties>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterUpdateProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_size: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpressRouteAuthorization {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<ExpressRouteAuthorizationProperties>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpressRouteAuthorizationProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub express_route_authorization_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub express_route_authorization_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
}

// ============================================================================
// Clients
// ============================================================================

pub struct PrivateCloudsClient<'a> {
    client: &'a ArmClient,
}

impl<'a> PrivateCloudsClient<'a> {
    pub fn new(client: &'a ArmClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, id: &PrivateCloudId) -> Result<PrivateCloud> {
        self.client.get_json(&id.id(), API_VERSION).await
    }

    pub async fn create_or_update_then_poll(
        &self,
        id: &PrivateCloudId,
        parameters: &PrivateCloud,
        deadline: &Deadline,
    ) -> Result<()> {
        self.client
            .put_then_poll(&id.id(), API_VERSION, parameters, deadline)
            .await
    }

    pub async fn update_then_poll(
        &self,
        id: &PrivateCloudId,
        parameters: &PrivateCloudUpdate,
        deadline: &Deadline,
    ) -> Result<()> {
        self.client
            .patch_then_poll(&id.id(), API_VERSION, parameters, deadline)
            .await
    }

    pub async fn delete_then_poll(&self, id: &PrivateCloudId, deadline: &Deadline) -> Result<()> {
        self.client.delete_then_poll(&id.id(), API_VERSION, deadline).await
    }
}

pub struct ClustersClient<'a> {
    client: &'a ArmClient,
}

impl<'a> ClustersClient<'a> {
    pub fn new(client: &'a ArmClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, id: &ClusterId) -> Result<Cluster> {
        self.client.get_json(&id.id(), API_VERSION).await
    }

    pub async fn create_or_update_then_poll(
        &self,
        id: &ClusterId,
        parameters: &Cluster,
        deadline: &Deadline,
    ) -> Result<()> {
        self.client
            .put_then_poll(&id.id(), API_VERSION, parameters, deadline)
            .await
    }

    pub async fn update_then_poll(
        &self,
        id: &ClusterId,
        parameters: &ClusterUpdate,
        deadline: &Deadline,
    ) -> Result<()> {
        self.client
            .patch_then_poll(&id.id(), API_VERSION, parameters, deadline)
            .await
    }

    pub async fn delete_then_poll(&self, id: &ClusterId, deadline: &Deadline) -> Result<()> {
        self.client.delete_then_poll(&id.id(), API_VERSION, deadline).await
    }
}

pub struct AuthorizationsClient<'a> {
    client: &'a ArmClient,
}

impl<'a> AuthorizationsClient<'a> {
    pub fn new(client: &'a ArmClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, id: &AuthorizationId) -> Result<ExpressRouteAuthorization> {
        self.client.get_json(&id.id(), API_VERSION).await
    }

    pub async fn create_or_update_then_poll(
        &self,
        id: &AuthorizationId,
        deadline: &Deadline,
    ) -> Result<()> {
        self.client
            .put_then_poll(&id.id(), API_VERSION, &ExpressRouteAuthorization::default(), deadline)
            .await
    }

    pub async fn delete_then_poll(&self, id: &AuthorizationId, deadline: &Deadline) -> Result<()> {
        self.client.delete_then_poll(&id.id(), API_VERSION, deadline).await
    }
}
