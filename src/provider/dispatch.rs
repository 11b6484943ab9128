//! Provider dispatcher
//!
//! [`Provider`] is the surface the plugin host talks to. It looks up the
//! implementation in the [`Registry`], validates the untyped attribute map
//! at the boundary, builds the per-instance [`ResourceData`], and runs the
//! operation inside its timeout and a tracing span.

use super::lifecycle::{OperationFuture, ResourceMeta};
use super::registry::Registry;
use super::timeouts::{Operation, Timeouts};
use crate::azure::{ArmClient, Deadline};
use crate::error::{Error, Result};
use crate::schema::{ResourceData, Schema, TIMEOUTS_KEY};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::Instrument;

/// What the host persists for one instance: the canonical ID and the
/// attribute map of the last read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceState {
    pub id: String,
    pub attributes: Map<String, Value>,
}

/// Outcome of comparing prior state with a new configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PlanAction {
    Create,
    Update { attributes: Vec<String> },
    Replace { attributes: Vec<String> },
    NoOp,
}

pub struct Provider {
    registry: Registry,
    client: ArmClient,
}

impl Provider {
    pub fn new(registry: Registry, client: ArmClient) -> Self {
        Self { registry, client }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn client(&self) -> &ArmClient {
        &self.client
    }

    /// Create a new instance from `config`.
    pub async fn create(&self, resource_type: &str, config: Map<String, Value>) -> Result<InstanceState> {
        let resource = self.registry.resource(resource_type)?;
        let config = prepare(&resource.schema(), resource_type, config)?;
        let timeouts = resource.timeouts().with_overrides(config.get(TIMEOUTS_KEY))?;

        let mut data = ResourceData::new(resource_type, config);
        let deadline = self.deadline(&timeouts, Operation::Create, resource_type);
        let span = tracing::info_span!("create", resource_type);
        self.run(&deadline, |meta| resource.create(meta), &mut data)
            .instrument(span)
            .await?;

        tracing::info!("created {} {}", resource_type, data.require_id()?);
        into_state(data)
    }

    /// Refresh an instance. `None` means it no longer exists remotely.
    pub async fn read(
        &self,
        resource_type: &str,
        id: &str,
        state: Map<String, Value>,
    ) -> Result<Option<InstanceState>> {
        let resource = self.registry.resource(resource_type)?;
        resource.validate_id(id)?;
        let timeouts = resource.timeouts().with_overrides(state.get(TIMEOUTS_KEY))?;

        let mut data = ResourceData::existing(resource_type, id, state);
        let deadline = self.deadline(&timeouts, Operation::Read, resource_type);
        let span = tracing::info_span!("read", resource_type, id);
        self.run(&deadline, |meta| resource.read(meta), &mut data)
            .instrument(span)
            .await?;

        match data.id() {
            Some(_) => into_state(data).map(Some),
            None => Ok(None),
        }
    }

    /// Apply `config` to an existing instance in place.
    pub async fn update(
        &self,
        resource_type: &str,
        id: &str,
        prior: Map<String, Value>,
        config: Map<String, Value>,
    ) -> Result<InstanceState> {
        let resource = self.registry.resource(resource_type)?;
        resource.validate_id(id)?;
        let schema = resource.schema();
        let config = prepare(&schema, resource_type, config)?;

        let replace = schema.requires_replace(&prior, &config);
        if !replace.is_empty() {
            return Err(Error::RequiresReplacement {
                resource_type: resource_type.to_string(),
                attributes: replace,
            });
        }

        let timeouts = resource.timeouts().with_overrides(config.get(TIMEOUTS_KEY))?;
        let planned = schema.planned_state(&prior, &config);
        let mut data = ResourceData::for_update(resource_type, id, prior, planned);
        let deadline = self.deadline(&timeouts, Operation::Update, resource_type);
        let span = tracing::info_span!("update", resource_type, id);
        self.run(&deadline, |meta| resource.update(meta), &mut data)
            .instrument(span)
            .await?;

        tracing::info!("updated {} {}", resource_type, id);
        into_state(data)
    }

    /// Delete an instance. Deleting something already gone succeeds.
    pub async fn delete(&self, resource_type: &str, id: &str, state: Map<String, Value>) -> Result<()> {
        let resource = self.registry.resource(resource_type)?;
        resource.validate_id(id)?;
        let timeouts = resource.timeouts().with_overrides(state.get(TIMEOUTS_KEY))?;

        let mut data = ResourceData::existing(resource_type, id, state);
        let deadline = self.deadline(&timeouts, Operation::Delete, resource_type);
        let span = tracing::info_span!("delete", resource_type, id);
        self.run(&deadline, |meta| resource.delete(meta), &mut data)
            .instrument(span)
            .await?;

        tracing::info!("deleted {} {}", resource_type, id);
        Ok(())
    }

    /// Adopt an existing remote object by ID.
    pub async fn import(&self, resource_type: &str, id: &str) -> Result<InstanceState> {
        self.read(resource_type, id, Map::new())
            .await?
            .ok_or_else(|| Error::ImportNotFound { id: id.to_string() })
    }

    /// Decide what applying `config` on top of `prior` would do. No network calls.
    pub fn plan(
        &self,
        resource_type: &str,
        prior: Option<&Map<String, Value>>,
        config: Map<String, Value>,
    ) -> Result<PlanAction> {
        let resource = self.registry.resource(resource_type)?;
        let schema = resource.schema();
        let config = prepare(&schema, resource_type, config)?;
        resource.timeouts().with_overrides(config.get(TIMEOUTS_KEY))?;

        let Some(prior) = prior else {
            return Ok(PlanAction::Create);
        };

        let replace = schema.requires_replace(prior, &config);
        if !replace.is_empty() {
            return Ok(PlanAction::Replace { attributes: replace });
        }

        let planned = schema.planned_state(prior, &config);
        let changed = schema.changed_attributes(prior, &planned);
        if changed.is_empty() {
            Ok(PlanAction::NoOp)
        } else {
            Ok(PlanAction::Update { attributes: changed })
        }
    }

    /// Look up an existing object through a data source.
    pub async fn read_data_source(
        &self,
        data_source_type: &str,
        config: Map<String, Value>,
    ) -> Result<InstanceState> {
        let data_source = self.registry.data_source(data_source_type)?;
        let config = prepare(&data_source.schema(), data_source_type, config)?;
        let timeouts = data_source.timeouts().with_overrides(config.get(TIMEOUTS_KEY))?;

        let mut data = ResourceData::new(data_source_type, config);
        let deadline = self.deadline(&timeouts, Operation::Read, data_source_type);
        let span = tracing::info_span!("data", data_source_type);
        self.run(&deadline, |meta| data_source.read(meta), &mut data)
            .instrument(span)
            .await?;

        into_state(data)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn deadline(&self, timeouts: &Timeouts, operation: Operation, resource_type: &str) -> Deadline {
        self.client.deadline(
            timeouts.for_operation(operation),
            format!("{} of {}", operation, resource_type),
        )
    }

    /// Run one operation under the wall-clock budget of `deadline`.
    async fn run<'a, F>(&'a self, deadline: &Deadline, op: F, data: &'a mut ResourceData) -> Result<()>
    where
        F: FnOnce(ResourceMeta<'a>) -> OperationFuture<'a>,
    {
        let meta = ResourceMeta {
            client: &self.client,
            data,
            deadline: deadline.clone(),
        };
        match tokio::time::timeout(deadline.timeout(), op(meta)).await {
            Ok(result) => result,
            Err(_) => Err(deadline.timeout_error()),
        }
    }
}

/// Apply defaults and validate `config` before anything touches the network.
fn prepare(schema: &Schema, target: &str, mut config: Map<String, Value>) -> Result<Map<String, Value>> {
    schema.apply_defaults(&mut config);
    schema.validate(&config).map_err(|messages| Error::Validation {
        target: target.to_string(),
        messages,
    })?;
    Ok(config)
}

fn into_state(data: ResourceData) -> Result<InstanceState> {
    let id = data.require_id()?.to_string();
    Ok(InstanceState {
        id,
        attributes: data.into_attributes(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;
    use serde_json::json;

    fn provider() -> Provider {
        let config = ProviderConfig {
            subscription_id: Some("00000000-0000-0000-0000-000000000000".to_string()),
            access_token: Some("token".to_string()),
            endpoint: Some("http://127.0.0.1:9".to_string()),
            ..ProviderConfig::default()
        };
        Provider::new(Registry::new(), ArmClient::new(&config).unwrap())
    }

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    fn search_config(replicas: i64, sku: &str) -> Map<String, Value> {
        object(json!({
            "name": "search1",
            "resource_group_name": "rg1",
            "location": "westeurope",
            "sku": sku,
            "replica_count": replicas
        }))
    }

    #[test]
    fn test_plan_create_without_prior() {
        let action = provider()
            .plan("azurerm_search_service", None, search_config(1, "standard"))
            .unwrap();
        assert_eq!(action, PlanAction::Create);
    }

    #[test]
    fn test_plan_update_and_replace() {
        let p = provider();
        let mut prior = search_config(1, "standard");
        prior.insert("primary_key".to_string(), json!("secret"));
        prior.insert("partition_count".to_string(), json!(1));
        prior.insert("public_network_access_enabled".to_string(), json!(true));

        let action = p
            .plan("azurerm_search_service", Some(&prior), search_config(2, "standard"))
            .unwrap();
        assert_eq!(
            action,
            PlanAction::Update {
                attributes: vec!["replica_count".to_string()]
            }
        );

        let action = p
            .plan("azurerm_search_service", Some(&prior), search_config(1, "basic"))
            .unwrap();
        assert_eq!(
            action,
            PlanAction::Replace {
                attributes: vec!["sku".to_string()]
            }
        );

        let action = p
            .plan("azurerm_search_service", Some(&prior), search_config(1, "standard"))
            .unwrap();
        assert_eq!(action, PlanAction::NoOp);
    }

    #[test]
    fn test_plan_rejects_invalid_config() {
        let err = provider()
            .plan("azurerm_search_service", None, object(json!({"name": "x"})))
            .unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[tokio::test]
    async fn test_read_rejects_malformed_id_before_any_call() {
        let err = provider()
            .read("azurerm_search_service", "/subscriptions/s/resourceGroups/rg", Map::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidId(_)));
    }

    #[tokio::test]
    async fn test_update_refuses_force_new_change() {
        let p = provider();
        let id = "/subscriptions/s/resourceGroups/rg1/providers/Microsoft.Search/searchServices/search1";
        let err = p
            .update(
                "azurerm_search_service",
                id,
                search_config(1, "standard"),
                search_config(1, "basic"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::RequiresReplacement { .. }));
    }

    #[tokio::test]
    async fn test_unknown_resource_type() {
        let err = provider().create("azurerm_unknown", Map::new()).await.unwrap_err();
        assert!(matches!(err, Error::UnknownType { kind: "resource", .. }));
    }
}
