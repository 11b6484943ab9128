//! Azure Cognitive Search (Microsoft.Search)

pub mod ids;
pub mod sdk;
pub mod search_service_data_source;
pub mod search_service_resource;

use crate::provider::Registry;

pub fn register(registry: &mut Registry) {
    registry.register_resource(search_service_resource::SearchServiceResource);
    registry.register_data_source(search_service_data_source::SearchServiceDataSource);
}
