//! Azion Provider
//!
//! Manages Azion edge platform objects through the Azion control API.
//!
//! ## Module Structure
//!
//! - `config` - Provider block and environment fallbacks
//! - `client` - HTTP client with linear retry on rate limiting
//! - `api` - Typed request/response models and endpoints
//! - `resources` - Managed resource types
//! - `data_sources` - Read-only data source types
//! - `attrs` - Typed access to resource attributes
//! - `utils` - ID parsing and JSON/string conversions
//! - `provider` - AzionProvider implementation

pub mod api;
pub mod attrs;
pub mod client;
pub mod config;
pub mod data_sources;
pub mod provider;
pub mod resources;
pub mod utils;

// Re-export main types
pub use client::{ApiClient, ApiError};
pub use config::{ConfigError, ProviderConfig};
pub use provider::AzionProvider;

use azion_core::provider::{BoxFuture, Provider, ProviderResult, ResourceType};
use azion_core::resource::{Resource, ResourceId, State};

use resources::SchemaType;

// =============================================================================
// Provider Trait Implementation
// =============================================================================

impl Provider for AzionProvider {
    fn name(&self) -> &'static str {
        "azion"
    }

    fn resource_types(&self) -> Vec<Box<dyn ResourceType>> {
        self.resource_handlers()
            .into_iter()
            .map(|h| Box::new(SchemaType::new(h.type_name(), h.schema())) as Box<dyn ResourceType>)
            .collect()
    }

    fn data_source_types(&self) -> Vec<Box<dyn ResourceType>> {
        self.data_source_handlers()
            .into_iter()
            .map(|h| Box::new(SchemaType::new(h.type_name(), h.schema())) as Box<dyn ResourceType>)
            .collect()
    }

    fn read(
        &self,
        id: &ResourceId,
        identifier: Option<&str>,
    ) -> BoxFuture<'_, ProviderResult<State>> {
        let id = id.clone();
        let identifier = identifier.map(|s| s.to_string());
        Box::pin(async move { self.read_resource(&id, identifier.as_deref()).await })
    }

    fn create(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>> {
        let resource = resource.clone();
        Box::pin(async move { self.create_resource(resource).await })
    }

    fn update(
        &self,
        id: &ResourceId,
        identifier: &str,
        from: &State,
        to: &Resource,
    ) -> BoxFuture<'_, ProviderResult<State>> {
        let id = id.clone();
        let identifier = identifier.to_string();
        let from = from.clone();
        let to = to.clone();
        Box::pin(async move { self.update_resource(&id, &identifier, &from, to).await })
    }

    fn delete(&self, id: &ResourceId, identifier: &str) -> BoxFuture<'_, ProviderResult<()>> {
        let id = id.clone();
        let identifier = identifier.to_string();
        Box::pin(async move { self.delete_resource(&id, &identifier).await })
    }

    fn import(&self, id: &ResourceId, import_id: &str) -> BoxFuture<'_, ProviderResult<State>> {
        let id = id.clone();
        let import_id = import_id.to_string();
        Box::pin(async move { self.import_resource(&id, &import_id).await })
    }

    fn read_data_source(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>> {
        let resource = resource.clone();
        Box::pin(async move { self.read_data(resource).await })
    }
}
