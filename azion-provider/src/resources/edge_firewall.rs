//! azion_edge_firewall_main_setting

use async_trait::async_trait;
use azion_core::provider::ProviderResult;
use azion_core::resource::{Attributes, Resource, ResourceId, State, Value};
use azion_core::schema::{AttributeSchema, AttributeType, ResourceSchema, types};

use super::{ResourceHandler, api_error, found, numeric};
use crate::api::edge_firewall::{EdgeFirewall, EdgeFirewallRequest};
use crate::attrs::{Attrs, AttrsBuilder};
use crate::client::ApiClient;

pub const TYPE_NAME: &str = "azion_edge_firewall_main_setting";
const FORMAT: &str = "<edge_firewall_id>";

pub struct EdgeFirewallMainSetting;

pub(crate) fn firewall_attributes() -> Vec<AttributeSchema> {
    let module = |name: &str| AttributeSchema::new(name, AttributeType::Bool).with_default(false.into());
    vec![
        AttributeSchema::new("id", AttributeType::Int).computed(),
        AttributeSchema::new("name", AttributeType::String).required(),
        AttributeSchema::new("domains", types::identifier_list())
            .with_default(Value::List(vec![]))
            .with_description("Domain IDs protected by this firewall"),
        AttributeSchema::new("is_active", AttributeType::Bool).with_default(true.into()),
        module("edge_functions_enabled"),
        module("network_protection_enabled"),
        module("waf_enabled"),
        AttributeSchema::new("debug_rules", AttributeType::Bool).optional_computed(),
        AttributeSchema::new("last_editor", AttributeType::String).computed(),
        AttributeSchema::new("modified", AttributeType::String).computed(),
    ]
}

fn expand(resource: &Resource) -> ProviderResult<EdgeFirewallRequest> {
    let attrs = Attrs::new(resource);
    Ok(EdgeFirewallRequest {
        name: attrs.required_str("name")?,
        domains: attrs.ints("domains").unwrap_or_default(),
        is_active: attrs.bool_or("is_active", true),
        edge_functions_enabled: attrs.bool_or("edge_functions_enabled", false),
        network_protection_enabled: attrs.bool_or("network_protection_enabled", false),
        waf_enabled: attrs.bool_or("waf_enabled", false),
        debug_rules: attrs.bool("debug_rules"),
    })
}

pub(crate) fn flatten(firewall: &EdgeFirewall) -> Attributes {
    AttrsBuilder::new()
        .set("id", firewall.id)
        .set("name", firewall.name.as_str())
        .ints("domains", &firewall.domains)
        .set("is_active", firewall.is_active)
        .set("edge_functions_enabled", firewall.edge_functions_enabled)
        .set("network_protection_enabled", firewall.network_protection_enabled)
        .set("waf_enabled", firewall.waf_enabled)
        .set("debug_rules", firewall.debug_rules)
        .set_nonempty("last_editor", &firewall.last_editor)
        .set_nonempty("modified", &firewall.modified)
        .build()
}

fn to_state(id: &ResourceId, firewall: &EdgeFirewall) -> State {
    State::existing(id.clone(), flatten(firewall)).with_identifier(firewall.id.to_string())
}

#[async_trait]
impl ResourceHandler for EdgeFirewallMainSetting {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> ResourceSchema {
        firewall_attributes()
            .into_iter()
            .fold(ResourceSchema::new(TYPE_NAME), ResourceSchema::attribute)
            .with_description("Main settings of an edge firewall")
    }

    fn identifier_format(&self) -> &'static str {
        FORMAT
    }

    async fn create(&self, client: &ApiClient, resource: &Resource) -> ProviderResult<State> {
        let request = expand(resource)?;
        let firewall = client
            .create_edge_firewall(&request)
            .await
            .map_err(api_error(&resource.id))?;
        log::info!("Created edge firewall {} ({})", firewall.id, firewall.name);
        Ok(to_state(&resource.id, &firewall))
    }

    async fn read(
        &self,
        client: &ApiClient,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<State> {
        let firewall_id = numeric(id, "edge_firewall_id", identifier)?;
        Ok(match found(id, client.get_edge_firewall(firewall_id).await)? {
            Some(firewall) => to_state(id, &firewall),
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
        let firewall_id = numeric(id, "edge_firewall_id", identifier)?;
        let request = expand(to)?;
        let firewall = client
            .update_edge_firewall(firewall_id, &request)
            .await
            .map_err(api_error(id))?;
        Ok(to_state(id, &firewall))
    }

    async fn delete(
        &self,
        client: &ApiClient,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<()> {
        let firewall_id = numeric(id, "edge_firewall_id", identifier)?;
        client
            .delete_edge_firewall(firewall_id)
            .await
            .map_err(api_error(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_defaults_modules_off() {
        let resource = Resource::new(TYPE_NAME, "fw")
            .with_attribute("name", "fw")
            .with_attribute("domains", Value::List(vec![Value::Int(1), Value::Int(2)]))
            .with_attribute("waf_enabled", true);
        let request = expand(&resource).unwrap();
        assert_eq!(request.domains, vec![1, 2]);
        assert!(request.waf_enabled);
        assert!(!request.network_protection_enabled);
        assert!(request.is_active);
        assert_eq!(request.debug_rules, None);
    }

    #[test]
    fn flatten_firewall() {
        let firewall = EdgeFirewall {
            id: 4,
            name: "fw".to_string(),
            domains: vec![1],
            ..Default::default()
        };
        let state = to_state(&ResourceId::new(TYPE_NAME, "fw"), &firewall);
        assert_eq!(state.identifier.as_deref(), Some("4"));
        assert_eq!(state.attributes["domains"], Value::List(vec![Value::Int(1)]));
        assert!(!state.attributes.contains_key("modified"));
    }
}
