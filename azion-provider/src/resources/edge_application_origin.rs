//! azion_edge_application_origin

use async_trait::async_trait;
use azion_core::provider::{ProviderError, ProviderResult};
use azion_core::resource::{Attributes, Resource, ResourceId, State};
use azion_core::schema::{AttributeSchema, AttributeType, ResourceSchema, types};

use super::{ResourceHandler, api_error, found, numeric, segments};
use crate::api::edge_application::{Origin, OriginAddress, OriginRequest};
use crate::attrs::{Attrs, AttrsBuilder};
use crate::client::ApiClient;

pub const TYPE_NAME: &str = "azion_edge_application_origin";
const FORMAT: &str = "<edge_application_id>/<origin_key>";

pub const ORIGIN_TYPES: &[&str] = &[
    "single_origin",
    "load_balancer",
    "live_ingest",
    "object_storage",
];
pub const PROTOCOL_POLICIES: &[&str] = &["preserve", "http", "https"];

pub struct EdgeApplicationOrigin;

fn address_type() -> AttributeType {
    AttributeType::Object(vec![
        AttributeSchema::new("address", AttributeType::String).required(),
        AttributeSchema::new("weight", AttributeType::Int),
        AttributeSchema::new(
            "server_role",
            AttributeType::enumeration(&["primary", "backup"]),
        ),
        AttributeSchema::new("is_active", AttributeType::Bool),
    ])
}

fn expand(resource: &Resource) -> ProviderResult<OriginRequest> {
    let attrs = Attrs::new(resource);
    let addresses: Vec<OriginAddress> = attrs
        .blocks("addresses")
        .into_iter()
        .map(|a| -> ProviderResult<OriginAddress> {
            Ok(OriginAddress {
                address: a.required_str("address")?,
                weight: a.int("weight"),
                server_role: a.str("server_role"),
                is_active: a.bool("is_active"),
            })
        })
        .collect::<ProviderResult<_>>()?;

    if addresses.is_empty() {
        return Err(ProviderError::new("at least one origin address is required")
            .for_resource(resource.id.clone()));
    }

    Ok(OriginRequest {
        name: attrs.required_str("name")?,
        addresses,
        origin_type: attrs.str("origin_type"),
        origin_protocol_policy: attrs.str("origin_protocol_policy"),
        host_header: attrs.str("host_header"),
        origin_path: attrs.str("origin_path"),
        connection_timeout: attrs.int("connection_timeout"),
        timeout_between_bytes: attrs.int("timeout_between_bytes"),
        hmac_authentication: attrs.bool("hmac_authentication"),
        hmac_region_name: attrs.str("hmac_region_name"),
        hmac_access_key: attrs.str("hmac_access_key"),
        hmac_secret_key: attrs.str("hmac_secret_key"),
    })
}

fn flatten_address(address: &OriginAddress) -> Attributes {
    AttrsBuilder::new()
        .set("address", address.address.as_str())
        .set_opt("weight", address.weight)
        .set_opt("server_role", address.server_role.clone())
        .set_opt("is_active", address.is_active)
        .build()
}

fn flatten(origin: &Origin) -> Attributes {
    AttrsBuilder::new()
        .set("origin_id", origin.origin_id)
        .set("origin_key", origin.origin_key.as_str())
        .set("name", origin.name.as_str())
        .set_nonempty("origin_type", &origin.origin_type)
        .blocks(
            "addresses",
            origin.addresses.iter().map(flatten_address).collect(),
        )
        .set_nonempty("origin_protocol_policy", &origin.origin_protocol_policy)
        .set("is_origin_redirection_enabled", origin.is_origin_redirection_enabled)
        .set_nonempty("host_header", &origin.host_header)
        .set_nonempty("method", &origin.method)
        .set("origin_path", origin.origin_path.as_str())
        .set("connection_timeout", origin.connection_timeout)
        .set("timeout_between_bytes", origin.timeout_between_bytes)
        .set("hmac_authentication", origin.hmac_authentication)
        .set_nonempty("hmac_region_name", &origin.hmac_region_name)
        .set_nonempty("hmac_access_key", &origin.hmac_access_key)
        .set_nonempty("hmac_secret_key", &origin.hmac_secret_key)
        .build()
}

fn to_state(id: &ResourceId, app_id: i64, origin: &Origin, config: Option<&Resource>) -> State {
    let mut attrs = flatten(origin);
    attrs.insert("edge_application_id".to_string(), app_id.into());
    // The secret key is not echoed back; keep what was configured.
    if let Some(secret) = config.and_then(|r| r.get("hmac_secret_key")) {
        attrs
            .entry("hmac_secret_key".to_string())
            .or_insert_with(|| secret.clone());
    }
    State::existing(id.clone(), attrs).with_identifier(format!("{}/{}", app_id, origin.origin_key))
}

fn parse_identifier(id: &ResourceId, identifier: &str) -> ProviderResult<(i64, String)> {
    let parts = segments(id, identifier, FORMAT)?;
    let app_id = numeric(id, "edge_application_id", &parts[0])?;
    Ok((app_id, parts[1].clone()))
}

#[async_trait]
impl ResourceHandler for EdgeApplicationOrigin {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> ResourceSchema {
        ResourceSchema::new(TYPE_NAME)
            .with_description("Origin of an edge application")
            .attribute(
                AttributeSchema::new("edge_application_id", types::positive_int())
                    .required()
                    .requires_replace(),
            )
            .attribute(AttributeSchema::new("origin_id", AttributeType::Int).computed())
            .attribute(AttributeSchema::new("origin_key", AttributeType::String).computed())
            .attribute(AttributeSchema::new("name", AttributeType::String).required())
            .attribute(
                AttributeSchema::new("origin_type", AttributeType::enumeration(ORIGIN_TYPES))
                    .optional_computed(),
            )
            .attribute(
                AttributeSchema::new("addresses", AttributeType::List(Box::new(address_type())))
                    .required(),
            )
            .attribute(
                AttributeSchema::new(
                    "origin_protocol_policy",
                    AttributeType::enumeration(PROTOCOL_POLICIES),
                )
                .optional_computed(),
            )
            .attribute(
                AttributeSchema::new("is_origin_redirection_enabled", AttributeType::Bool)
                    .computed(),
            )
            .attribute(
                AttributeSchema::new("host_header", AttributeType::String).optional_computed(),
            )
            .attribute(AttributeSchema::new("method", AttributeType::String).computed())
            .attribute(
                AttributeSchema::new("origin_path", AttributeType::String).optional_computed(),
            )
            .attribute(
                AttributeSchema::new("connection_timeout", types::positive_int())
                    .optional_computed(),
            )
            .attribute(
                AttributeSchema::new("timeout_between_bytes", types::positive_int())
                    .optional_computed(),
            )
            .attribute(
                AttributeSchema::new("hmac_authentication", AttributeType::Bool)
                    .optional_computed(),
            )
            .attribute(
                AttributeSchema::new("hmac_region_name", AttributeType::String)
                    .optional_computed(),
            )
            .attribute(
                AttributeSchema::new("hmac_access_key", AttributeType::String)
                    .optional_computed(),
            )
            .attribute(AttributeSchema::new("hmac_secret_key", AttributeType::String).sensitive())
    }

    fn identifier_format(&self) -> &'static str {
        FORMAT
    }

    async fn create(&self, client: &ApiClient, resource: &Resource) -> ProviderResult<State> {
        let app_id = Attrs::new(resource).required_int("edge_application_id")?;
        let request = expand(resource)?;
        let origin = client
            .create_origin(app_id, &request)
            .await
            .map_err(api_error(&resource.id))?;
        log::info!(
            "Created origin {} for edge application {}",
            origin.origin_key,
            app_id
        );
        Ok(to_state(&resource.id, app_id, &origin, Some(resource)))
    }

    async fn read(
        &self,
        client: &ApiClient,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<State> {
        let (app_id, origin_key) = parse_identifier(id, identifier)?;
        Ok(match found(id, client.get_origin(app_id, &origin_key).await)? {
            Some(origin) => to_state(id, app_id, &origin, None),
            None => State::not_found(id.clone()),
        })
    }

    async fn update(
        &self,
        client: &ApiClient,
        id: &ResourceId,
        identifier: &str,
        _from: &State,
        to: &Resource,
    ) -> ProviderResult<State> {
        let (app_id, origin_key) = parse_identifier(id, identifier)?;
        let request = expand(to)?;
        let origin = client
            .update_origin(app_id, &origin_key, &request)
            .await
            .map_err(api_error(id))?;
        Ok(to_state(id, app_id, &origin, Some(to)))
    }

    async fn delete(
        &self,
        client: &ApiClient,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<()> {
        let (app_id, origin_key) = parse_identifier(id, identifier)?;
        client
            .delete_origin(app_id, &origin_key)
            .await
            .map_err(api_error(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use azion_core::resource::Value;

    fn origin_resource() -> Resource {
        let address = AttrsBuilder::new()
            .set("address", "origin.example.com")
            .set("weight", 5_i64)
            .build();
        Resource::new(TYPE_NAME, "main")
            .with_attribute("edge_application_id", 10_i64)
            .with_attribute("name", "main origin")
            .with_attribute("addresses", Value::List(vec![Value::Map(address)]))
            .with_attribute("hmac_secret_key", "s3cr3t")
    }

    #[test]
    fn expand_addresses() {
        let request = expand(&origin_resource()).unwrap();
        assert_eq!(request.addresses.len(), 1);
        assert_eq!(request.addresses[0].address, "origin.example.com");
        assert_eq!(request.addresses[0].weight, Some(5));
        assert_eq!(request.hmac_secret_key.as_deref(), Some("s3cr3t"));
    }

    #[test]
    fn expand_requires_address() {
        let resource = Resource::new(TYPE_NAME, "main")
            .with_attribute("edge_application_id", 10_i64)
            .with_attribute("name", "main origin")
            .with_attribute("addresses", Value::List(vec![]));
        assert!(expand(&resource).is_err());
    }

    #[test]
    fn state_keeps_configured_secret() {
        let resource = origin_resource();
        let origin = Origin {
            origin_id: 1,
            origin_key: "0b7e7a2c-key".to_string(),
            name: "main origin".to_string(),
            ..Default::default()
        };
        let state = to_state(&resource.id, 10, &origin, Some(&resource));
        assert_eq!(state.identifier.as_deref(), Some("10/0b7e7a2c-key"));
        assert_eq!(state.attributes["hmac_secret_key"], Value::from("s3cr3t"));

        let read_back = to_state(&resource.id, 10, &origin, None);
        assert!(!read_back.attributes.contains_key("hmac_secret_key"));
    }

    #[test]
    fn identifier_keeps_origin_key_verbatim() {
        let id = ResourceId::new(TYPE_NAME, "main");
        let (app_id, key) = parse_identifier(&id, "10/0b7e7a2c-key").unwrap();
        assert_eq!(app_id, 10);
        assert_eq!(key, "0b7e7a2c-key");
        assert!(parse_identifier(&id, "x/key").is_err());
    }
}
