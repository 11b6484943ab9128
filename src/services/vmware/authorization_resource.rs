//! `azurerm_vmware_express_route_authorization`

use super::ids::{AuthorizationId, PrivateCloudId};
use super::sdk::{AuthorizationsClient, ExpressRouteAuthorization};
use crate::azure::ArmClient;
use crate::error::{Result, ResultExt};
use crate::provider::{
    ensure_absent, found_or_gone, tolerate_not_found, OperationFuture, Resource, ResourceMeta,
};
use crate::resourceid::{validate_resource_id, ResourceId};
use crate::schema::{Attribute, ResourceData, Schema, Validation};
use crate::services::common::name_schema;
use serde::{Deserialize, Serialize};

const RESOURCE_TYPE: &str = "azurerm_vmware_express_route_authorization";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorizationModel {
    pub name: String,
    pub private_cloud_id: String,
    pub express_route_authorization_id: String,
    pub express_route_authorization_key: String,
}

pub struct ExpressRouteAuthorizationResource;

impl Resource for ExpressRouteAuthorizationResource {
    fn resource_type(&self) -> &'static str {
        RESOURCE_TYPE
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr("name", name_schema())
            .attr(
                "private_cloud_id",
                Attribute::string()
                    .required()
                    .force_new()
                    .validate_with(Validation::String(validate_resource_id::<PrivateCloudId>)),
            )
            .attr("express_route_authorization_id", Attribute::string().computed())
            .attr(
                "express_route_authorization_key",
                Attribute::string().computed().sensitive(),
            )
    }

    fn validate_id(&self, id: &str) -> Result<()> {
        AuthorizationId::parse(id)?;
        Ok(())
    }

    fn create<'a>(&'a self, meta: ResourceMeta<'a>) -> OperationFuture<'a> {
        Box::pin(async move {
            let ResourceMeta {
                client,
                data,
                deadline,
            } = meta;
            let model: AuthorizationModel = data.decode()?;
            let private_cloud = PrivateCloudId::parse(&model.private_cloud_id)?;
            let id = AuthorizationId::new(&private_cloud, &model.name);
            let sdk = AuthorizationsClient::new(client);

            ensure_absent(RESOURCE_TYPE, &id.id(), &id, sdk.get(&id).await)?;

            sdk.create_or_update_then_poll(&id, &deadline)
                .await
                .with_context(|| format!("creating {}", id))?;

            data.set_id(id.id());
            read_into(client, data).await
        })
    }

    fn read<'a>(&'a self, meta: ResourceMeta<'a>) -> OperationFuture<'a> {
        Box::pin(read_into(meta.client, meta.data))
    }

    fn delete<'a>(&'a self, meta: ResourceMeta<'a>) -> OperationFuture<'a> {
        Box::pin(async move {
            let id = AuthorizationId::parse(meta.data.require_id()?)?;
            tolerate_not_found(
                AuthorizationsClient::new(meta.client)
                    .delete_then_poll(&id, &meta.deadline)
                    .await,
            )
            .with_context(|| format!("deleting {}", id))?;
            Ok(())
        })
    }
}

async fn read_into(client: &ArmClient, data: &mut ResourceData) -> Result<()> {
    let id = AuthorizationId::parse(data.require_id()?)?;
    let result = AuthorizationsClient::new(client).get(&id).await;
    let Some(authorization) = found_or_gone(data, &id, result)? else {
        return Ok(());
    };
    data.apply(&flatten_authorization(&id, &authorization))
}

pub fn flatten_authorization(
    id: &AuthorizationId,
    authorization: &ExpressRouteAuthorization,
) -> AuthorizationModel {
    let properties = authorization.properties.as_ref();
    AuthorizationModel {
        name: id.name.clone(),
        private_cloud_id: id.private_cloud_id().id(),
        express_route_authorization_id: properties
            .and_then(|p| p.express_route_authorization_id.clone())
            .unwrap_or_default(),
        express_route_authorization_key: properties
            .and_then(|p| p.express_route_authorization_key.clone())
            .unwrap_or_default(),
    }
}
