//! Azion provider implementation
//!
//! Routes each lifecycle call to the handler registered for the resource
//! type, after validating configured attributes against its schema.

use std::collections::HashMap;

use azion_core::provider::{ProviderError, ProviderResult};
use azion_core::resource::{Resource, ResourceId, State};
use azion_core::schema::{ResourceSchema, TypeError};

use crate::client::ApiClient;
use crate::config::ProviderConfig;
use crate::data_sources::{self, DataSourceHandler};
use crate::resources::{self, ResourceHandler};

/// Azion Provider
pub struct AzionProvider {
    client: ApiClient,
    resources: HashMap<&'static str, Box<dyn ResourceHandler>>,
    data_sources: HashMap<&'static str, Box<dyn DataSourceHandler>>,
}

impl AzionProvider {
    /// Create a provider from a validated configuration
    pub fn new(config: &ProviderConfig) -> ProviderResult<Self> {
        config
            .validate()
            .map_err(|e| ProviderError::new(e.to_string()))?;
        let client = ApiClient::new(config)?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: ApiClient) -> Self {
        let resources = resources::handlers()
            .into_iter()
            .map(|h| (h.type_name(), h))
            .collect();
        let data_sources = data_sources::handlers()
            .into_iter()
            .map(|h| (h.type_name(), h))
            .collect();
        Self {
            client,
            resources,
            data_sources,
        }
    }

    /// Resource handlers sorted by type name
    pub(crate) fn resource_handlers(&self) -> Vec<&dyn ResourceHandler> {
        let mut handlers: Vec<&dyn ResourceHandler> = self
            .resources
            .values()
            .map(|h| -> &dyn ResourceHandler { h.as_ref() })
            .collect();
        handlers.sort_by_key(|h| h.type_name());
        handlers
    }

    /// Data source handlers sorted by type name
    pub(crate) fn data_source_handlers(&self) -> Vec<&dyn DataSourceHandler> {
        let mut handlers: Vec<&dyn DataSourceHandler> = self
            .data_sources
            .values()
            .map(|h| -> &dyn DataSourceHandler { h.as_ref() })
            .collect();
        handlers.sort_by_key(|h| h.type_name());
        handlers
    }

    fn handler(&self, id: &ResourceId) -> ProviderResult<&dyn ResourceHandler> {
        self.resources
            .get(id.resource_type.as_str())
            .map(|h| h.as_ref())
            .ok_or_else(|| {
                ProviderError::new(format!("Unknown resource type: {}", id.resource_type))
                    .for_resource(id.clone())
            })
    }

    fn data_source(&self, id: &ResourceId) -> ProviderResult<&dyn DataSourceHandler> {
        self.data_sources
            .get(id.resource_type.as_str())
            .map(|h| h.as_ref())
            .ok_or_else(|| {
                ProviderError::new(format!("Unknown data source type: {}", id.resource_type))
                    .for_resource(id.clone())
            })
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Read a resource; without an identifier there is nothing to read yet
    pub async fn read_resource(
        &self,
        id: &ResourceId,
        identifier: Option<&str>,
    ) -> ProviderResult<State> {
        let handler = self.handler(id)?;
        let Some(identifier) = identifier else {
            return Ok(State::not_found(id.clone()));
        };
        log::debug!("Reading {} ({})", id, identifier);
        handler.read(&self.client, id, identifier).await
    }

    pub async fn create_resource(&self, resource: Resource) -> ProviderResult<State> {
        let handler = self.handler(&resource.id)?;
        validate(&handler.schema(), &resource)?;
        log::debug!("Creating {}", resource.id);
        let state = handler.create(&self.client, &resource).await?;
        log::info!(
            "Created {} ({})",
            resource.id,
            state.identifier.as_deref().unwrap_or("-")
        );
        Ok(state)
    }

    pub async fn update_resource(
        &self,
        id: &ResourceId,
        identifier: &str,
        from: &State,
        to: Resource,
    ) -> ProviderResult<State> {
        let handler = self.handler(id)?;
        let schema = handler.schema();
        validate(&schema, &to)?;
        check_in_place(&schema, from, &to)?;
        log::debug!("Updating {} ({})", id, identifier);
        let state = handler.update(&self.client, id, identifier, from, &to).await?;
        log::info!("Updated {} ({})", id, identifier);
        Ok(state)
    }

    pub async fn delete_resource(&self, id: &ResourceId, identifier: &str) -> ProviderResult<()> {
        let handler = self.handler(id)?;
        log::debug!("Deleting {} ({})", id, identifier);
        handler.delete(&self.client, id, identifier).await?;
        log::info!("Deleted {} ({})", id, identifier);
        Ok(())
    }

    /// Validate the import ID, then read the object it names
    pub async fn import_resource(&self, id: &ResourceId, import_id: &str) -> ProviderResult<State> {
        let handler = self.handler(id)?;
        let identifier = handler
            .import_identifier(import_id)
            .map_err(|e| e.for_resource(id.clone()))?;
        log::debug!("Importing {} from '{}'", id, import_id);
        let state = handler.read(&self.client, id, &identifier).await?;
        if !state.exists {
            return Err(ProviderError::not_found(format!(
                "Cannot import {}: nothing found for '{}'",
                id, import_id
            ))
            .for_resource(id.clone()));
        }
        Ok(state)
    }

    pub async fn read_data(&self, resource: Resource) -> ProviderResult<State> {
        let handler = self.data_source(&resource.id)?;
        if !resource.is_data_source() {
            return Err(ProviderError::new(format!(
                "{} is not declared as a data source",
                resource.id
            ))
            .for_resource(resource.id.clone()));
        }
        validate(&handler.schema(), &resource)?;
        log::debug!("Reading data source {}", resource.id);
        handler.read(&self.client, &resource).await
    }
}

/// Check configured attributes against the schema, reporting every problem at once
fn validate(schema: &ResourceSchema, resource: &Resource) -> ProviderResult<()> {
    schema.validate(&resource.attributes).map_err(|errors| {
        ProviderError::new(format_type_errors(&errors)).for_resource(resource.id.clone())
    })
}

/// Attributes that force replacement cannot change through an update
fn check_in_place(schema: &ResourceSchema, from: &State, to: &Resource) -> ProviderResult<()> {
    let changed: Vec<&str> = schema
        .replace_attributes()
        .into_iter()
        .filter(|name| match (from.get(name), to.get(name)) {
            (Some(old), Some(new)) => old != new,
            // Left out of the config: the default applies, computed values stay
            (Some(old), None) => match schema.attributes.get(*name) {
                Some(attr) => match &attr.default {
                    Some(default) => old != default,
                    None => !attr.computed,
                },
                None => false,
            },
            _ => false,
        })
        .collect();
    if changed.is_empty() {
        Ok(())
    } else {
        Err(ProviderError::new(format!(
            "Cannot update in place, replacement required for: {}",
            changed.join(", ")
        ))
        .for_resource(to.id.clone()))
    }
}

fn format_type_errors(errors: &[TypeError]) -> String {
    let details: Vec<String> = errors.iter().map(|e| format!("  - {}", e)).collect();
    format!("Invalid configuration:\n{}", details.join("\n"))
}
