//! Azure VMware Solution (Microsoft.AVS)
//!
//! - [`ids`] - Private cloud, cluster and authorization IDs
//! - [`sdk`] - API models and clients
//! - Resources: private cloud, cluster, ExpressRoute authorization
//! - Data sources: private cloud

pub mod authorization_resource;
pub mod cluster_resource;
pub mod ids;
pub mod private_cloud_data_source;
pub mod private_cloud_resource;
pub mod sdk;

use crate::provider::Registry;

pub fn register(registry: &mut Registry) {
    registry.register_resource(private_cloud_resource::PrivateCloudResource);
    registry.register_resource(cluster_resource::ClusterResource);
    registry.register_resource(authorization_resource::ExpressRouteAuthorizationResource);
    registry.register_data_source(private_cloud_data_source::PrivateCloudDataSource);
}
