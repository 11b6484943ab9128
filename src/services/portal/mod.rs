//! Azure Portal (Microsoft.Portal)
//!
//! - [`ids`] - Dashboard and tenant configuration IDs
//! - [`sdk`] - API models and clients
//! - Resources: dashboard, tenant configuration
//! - Data sources: dashboard

pub mod dashboard_data_source;
pub mod dashboard_resource;
pub mod ids;
pub mod sdk;
pub mod tenant_configuration_resource;

use crate::provider::Registry;

pub fn register(registry: &mut Registry) {
    registry.register_resource(dashboard_resource::DashboardResource);
    registry.register_resource(tenant_configuration_resource::TenantConfigurationResource);
    registry.register_data_source(dashboard_data_source::DashboardDataSource);
}
