//! azion_edge_firewall_edge_functions_instance

use async_trait::async_trait;
use azion_core::provider::ProviderResult;
use azion_core::resource::{Resource, ResourceId, State};
use azion_core::schema::{AttributeSchema, AttributeType, ResourceSchema, types};

use super::{ResourceHandler, api_error, found, numeric_pair};
use crate::api::edge_firewall::{FirewallFunctionInstance, FirewallFunctionInstanceRequest};
use crate::attrs::{Attrs, AttrsBuilder};
use crate::client::ApiClient;
use crate::utils::{json_string_to_object, preserve_json_string};

pub const TYPE_NAME: &str = "azion_edge_firewall_edge_functions_instance";
const FORMAT: &str = "<edge_firewall_id>/<instance_id>";

pub struct EdgeFirewallFunctionInstance;

fn expand(resource: &Resource) -> ProviderResult<FirewallFunctionInstanceRequest> {
    let attrs = Attrs::new(resource);
    let json_args = json_string_to_object("args", &attrs.str("args").unwrap_or_default())
        .map_err(|e| e.for_resource(resource.id.clone()))?;
    Ok(FirewallFunctionInstanceRequest {
        name: attrs.required_str("name")?,
        edge_function: attrs.required_int("edge_function_id")?,
        json_args,
    })
}

fn to_state(
    id: &ResourceId,
    firewall_id: i64,
    instance: &FirewallFunctionInstance,
    config: Option<&Resource>,
) -> State {
    let configured_args = config.and_then(|r| r.get("args")).and_then(|v| v.as_str());
    let attrs = AttrsBuilder::new()
        .set("edge_firewall_id", firewall_id)
        .set("instance_id", instance.id)
        .set("name", instance.name.as_str())
        .set("edge_function_id", instance.edge_function)
        .set("args", preserve_json_string(configured_args, &instance.json_args))
        .build();
    State::existing(id.clone(), attrs).with_identifier(format!("{}/{}", firewall_id, instance.id))
}

#[async_trait]
impl ResourceHandler for EdgeFirewallFunctionInstance {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> ResourceSchema {
        ResourceSchema::new(TYPE_NAME)
            .with_description("Edge function attached to an edge firewall")
            .attribute(
                AttributeSchema::new("edge_firewall_id", types::positive_int())
                    .required()
                    .requires_replace(),
            )
            .attribute(AttributeSchema::new("instance_id", AttributeType::Int).computed())
            .attribute(AttributeSchema::new("name", AttributeType::String).required())
            .attribute(AttributeSchema::new("edge_function_id", types::positive_int()).required())
            .attribute(AttributeSchema::new("args", types::json_string()).with_default("{}".into()))
    }

    fn identifier_format(&self) -> &'static str {
        FORMAT
    }

    async fn create(&self, client: &ApiClient, resource: &Resource) -> ProviderResult<State> {
        let firewall_id = Attrs::new(resource).required_int("edge_firewall_id")?;
        let request = expand(resource)?;
        let instance = client
            .create_firewall_function_instance(firewall_id, &request)
            .await
            .map_err(api_error(&resource.id))?;
        Ok(to_state(&resource.id, firewall_id, &instance, Some(resource)))
    }

    async fn read(
        &self,
        client: &ApiClient,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<State> {
        let (firewall_id, instance_id) = numeric_pair(id, identifier, FORMAT)?;
        let result = client
            .get_firewall_function_instance(firewall_id, instance_id)
            .await;
        Ok(match found(id, result)? {
            Some(instance) => to_state(id, firewall_id, &instance, None),
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
        let (firewall_id, instance_id) = numeric_pair(id, identifier, FORMAT)?;
        let request = expand(to)?;
        let instance = client
            .update_firewall_function_instance(firewall_id, instance_id, &request)
            .await
            .map_err(api_error(id))?;
        Ok(to_state(id, firewall_id, &instance, Some(to)))
    }

    async fn delete(
        &self,
        client: &ApiClient,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<()> {
        let (firewall_id, instance_id) = numeric_pair(id, identifier, FORMAT)?;
        client
            .delete_firewall_function_instance(firewall_id, instance_id)
            .await
            .map_err(api_error(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use azion_core::resource::Value;
    use serde_json::json;

    #[test]
    fn request_uses_firewall_field_names() {
        let resource = Resource::new(TYPE_NAME, "geo")
            .with_attribute("edge_firewall_id", 4_i64)
            .with_attribute("name", "geo block")
            .with_attribute("edge_function_id", 55_i64)
            .with_attribute("args", r#"{"countries":["BR"]}"#);
        let body = serde_json::to_value(expand(&resource).unwrap()).unwrap();
        assert_eq!(
            body,
            json!({
                "name": "geo block",
                "edge_function": 55,
                "json_args": {"countries": ["BR"]}
            })
        );
    }

    #[test]
    fn state_maps_back_to_attribute_names() {
        let instance = FirewallFunctionInstance {
            id: 2,
            name: "geo block".to_string(),
            edge_function: 55,
            json_args: serde_json::Value::Null,
        };
        let state = to_state(&ResourceId::new(TYPE_NAME, "geo"), 4, &instance, None);
        assert_eq!(state.identifier.as_deref(), Some("4/2"));
        assert_eq!(state.attributes["edge_function_id"], Value::Int(55));
        assert_eq!(state.attributes["args"], Value::from("{}"));
    }
}
