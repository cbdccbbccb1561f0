//! azion_edge_firewall_rule_engine

use async_trait::async_trait;
use azion_core::provider::ProviderResult;
use azion_core::resource::{Attributes, Resource, ResourceId, State};
use azion_core::schema::{AttributeSchema, AttributeType, ResourceSchema, types};

use super::{ResourceHandler, api_error, found, numeric_pair};
use crate::api::edge_firewall::{
    FirewallBehavior, FirewallCriterion, FirewallRule, FirewallRuleRequest,
};
use crate::attrs::{Attrs, AttrsBuilder};
use crate::client::ApiClient;
use crate::utils::{json_scalar_to_string, string_to_json_scalar};

pub const TYPE_NAME: &str = "azion_edge_firewall_rule_engine";
const FORMAT: &str = "<edge_firewall_id>/<rule_id>";

pub struct EdgeFirewallRuleEngine;

fn behavior_type() -> AttributeType {
    AttributeType::Object(vec![
        AttributeSchema::new("name", AttributeType::String).required(),
        AttributeSchema::new("argument", AttributeType::String),
    ])
}

fn criteria_type() -> AttributeType {
    let entry = AttributeType::Object(vec![
        AttributeSchema::new("variable", AttributeType::String).required(),
        AttributeSchema::new("operator", AttributeType::String).required(),
        AttributeSchema::new("conditional", AttributeType::enumeration(&["if", "and", "or"]))
            .required(),
        AttributeSchema::new("argument", AttributeType::String),
    ]);
    AttributeType::Object(vec![
        AttributeSchema::new("entries", AttributeType::List(Box::new(entry))).required(),
    ])
}

fn expand(resource: &Resource) -> ProviderResult<FirewallRuleRequest> {
    let attrs = Attrs::new(resource);

    let behaviors = attrs
        .blocks("behaviors")
        .into_iter()
        .map(|b| {
            Ok(FirewallBehavior {
                name: b.required_str("name")?,
                argument: string_to_json_scalar(&b.str("argument").unwrap_or_default()),
            })
        })
        .collect::<ProviderResult<Vec<_>>>()?;

    let criteria = attrs
        .blocks("criteria")
        .into_iter()
        .map(|group| {
            group
                .blocks("entries")
                .into_iter()
                .map(|e| {
                    Ok(FirewallCriterion {
                        variable: e.required_str("variable")?,
                        operator: e.required_str("operator")?,
                        conditional: e.required_str("conditional")?,
                        argument: string_to_json_scalar(&e.str("argument").unwrap_or_default()),
                    })
                })
                .collect::<ProviderResult<Vec<_>>>()
        })
        .collect::<ProviderResult<Vec<_>>>()?;

    Ok(FirewallRuleRequest {
        name: attrs.required_str("name")?,
        behaviors,
        criteria,
        description: attrs.str("description"),
        is_active: attrs.bool("is_active"),
    })
}

fn flatten(rule: &FirewallRule) -> Attributes {
    let behaviors = rule
        .behaviors
        .iter()
        .map(|b| {
            AttrsBuilder::new()
                .set("name", b.name.as_str())
                .set_nonempty("argument", &json_scalar_to_string(&b.argument))
                .build()
        })
        .collect();

    let criteria = rule
        .criteria
        .iter()
        .map(|group| {
            let entries = group
                .iter()
                .map(|c| {
                    AttrsBuilder::new()
                        .set("variable", c.variable.as_str())
                        .set("operator", c.operator.as_str())
                        .set("conditional", c.conditional.as_str())
                        .set_nonempty("argument", &json_scalar_to_string(&c.argument))
                        .build()
                })
                .collect();
            AttrsBuilder::new().blocks("entries", entries).build()
        })
        .collect();

    AttrsBuilder::new()
        .set("rule_id", rule.id)
        .set("name", rule.name.as_str())
        .set("description", rule.description.as_str())
        .set("is_active", rule.is_active)
        .set("order", rule.order)
        .blocks("behaviors", behaviors)
        .blocks("criteria", criteria)
        .build()
}

fn to_state(id: &ResourceId, firewall_id: i64, rule: &FirewallRule) -> State {
    let mut attrs = flatten(rule);
    attrs.insert("edge_firewall_id".to_string(), firewall_id.into());
    State::existing(id.clone(), attrs).with_identifier(format!("{}/{}", firewall_id, rule.id))
}

#[async_trait]
impl ResourceHandler for EdgeFirewallRuleEngine {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> ResourceSchema {
        ResourceSchema::new(TYPE_NAME)
            .with_description("Rule of an edge firewall rules engine")
            .attribute(
                AttributeSchema::new("edge_firewall_id", types::positive_int())
                    .required()
                    .requires_replace(),
            )
            .attribute(AttributeSchema::new("rule_id", AttributeType::Int).computed())
            .attribute(AttributeSchema::new("name", AttributeType::String).required())
            .attribute(
                AttributeSchema::new("description", AttributeType::String).optional_computed(),
            )
            .attribute(AttributeSchema::new("is_active", AttributeType::Bool).optional_computed())
            .attribute(AttributeSchema::new("order", AttributeType::Int).computed())
            .attribute(
                AttributeSchema::new("behaviors", AttributeType::List(Box::new(behavior_type())))
                    .required(),
            )
            .attribute(
                AttributeSchema::new("criteria", AttributeType::List(Box::new(criteria_type())))
                    .required(),
            )
    }

    fn identifier_format(&self) -> &'static str {
        FORMAT
    }

    async fn create(&self, client: &ApiClient, resource: &Resource) -> ProviderResult<State> {
        let firewall_id = Attrs::new(resource).required_int("edge_firewall_id")?;
        let request = expand(resource)?;
        let rule = client
            .create_firewall_rule(firewall_id, &request)
            .await
            .map_err(api_error(&resource.id))?;
        log::info!("Created rule {} for edge firewall {}", rule.id, firewall_id);
        Ok(to_state(&resource.id, firewall_id, &rule))
    }

    async fn read(
        &self,
        client: &ApiClient,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<State> {
        let (firewall_id, rule_id) = numeric_pair(id, identifier, FORMAT)?;
        Ok(
            match found(id, client.get_firewall_rule(firewall_id, rule_id).await)? {
                Some(rule) => to_state(id, firewall_id, &rule),
                None => State::not_found(id.clone()),
            },
        )
    }

    async fn update(
        &self,
        client: &ApiClient,
        id: &ResourceId,
        identifier: &str,
        _from: &State,
        to: &Resource,
    ) -> ProviderResult<State> {
        let (firewall_id, rule_id) = numeric_pair(id, identifier, FORMAT)?;
        let request = expand(to)?;
        let rule = client
            .update_firewall_rule(firewall_id, rule_id, &request)
            .await
            .map_err(api_error(id))?;
        Ok(to_state(id, firewall_id, &rule))
    }

    async fn delete(
        &self,
        client: &ApiClient,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<()> {
        let (firewall_id, rule_id) = numeric_pair(id, identifier, FORMAT)?;
        client
            .delete_firewall_rule(firewall_id, rule_id)
            .await
            .map_err(api_error(id))
    }
}
