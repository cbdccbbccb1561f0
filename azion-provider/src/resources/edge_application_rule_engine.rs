//! azion_edge_application_rule_engine
//!
//! Rules live under a phase (`request` or `response`) of an edge
//! application, so the identifier is `appID/phase/ruleID`.

use async_trait::async_trait;
use azion_core::provider::{ProviderError, ProviderResult};
use azion_core::resource::{Attributes, Resource, ResourceId, State};
use azion_core::schema::{AttributeSchema, AttributeType, ResourceSchema, types};

use super::{ResourceHandler, api_error, found, numeric, segments};
use crate::api::edge_application::{Rule, RuleBehavior, RuleCriterion, RuleRequest};
use crate::attrs::{Attrs, AttrsBuilder};
use crate::client::ApiClient;
use crate::utils::{json_scalar_to_string, parse_import_id, string_to_json_scalar};

pub const TYPE_NAME: &str = "azion_edge_application_rule_engine";
const FORMAT: &str = "<edge_application_id>/<phase>/<rule_id>";

pub const PHASES: &[&str] = &["request", "response"];
pub const CONDITIONALS: &[&str] = &["if", "and", "or"];

pub struct EdgeApplicationRuleEngine;

fn behavior_type() -> AttributeType {
    AttributeType::Object(vec![
        AttributeSchema::new("name", AttributeType::String).required(),
        AttributeSchema::new("target", AttributeType::String)
            .with_description("Plain value, or JSON for structured targets"),
    ])
}

fn criteria_type() -> AttributeType {
    let entry = AttributeType::Object(vec![
        AttributeSchema::new("variable", AttributeType::String).required(),
        AttributeSchema::new("operator", AttributeType::String).required(),
        AttributeSchema::new("conditional", AttributeType::enumeration(CONDITIONALS)).required(),
        AttributeSchema::new("input_value", AttributeType::String),
    ]);
    AttributeType::Object(vec![
        AttributeSchema::new("entries", AttributeType::List(Box::new(entry))).required(),
    ])
}

fn check_phase(phase: &str) -> ProviderResult<()> {
    if PHASES.contains(&phase) {
        Ok(())
    } else {
        Err(ProviderError::new(format!(
            "Invalid phase '{}': expected one of {}",
            phase,
            PHASES.join(", ")
        )))
    }
}

fn expand(resource: &Resource) -> ProviderResult<RuleRequest> {
    let attrs = Attrs::new(resource);

    let behaviors = attrs
        .blocks("behaviors")
        .into_iter()
        .map(|b| {
            Ok(RuleBehavior {
                name: b.required_str("name")?,
                target: string_to_json_scalar(&b.str("target").unwrap_or_default()),
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
                    Ok(RuleCriterion {
                        variable: e.required_str("variable")?,
                        operator: e.required_str("operator")?,
                        conditional: e.required_str("conditional")?,
                        input_value: e.str("input_value").unwrap_or_default(),
                    })
                })
                .collect::<ProviderResult<Vec<_>>>()
        })
        .collect::<ProviderResult<Vec<_>>>()?;

    Ok(RuleRequest {
        name: attrs.required_str("name")?,
        behaviors,
        criteria,
        description: attrs.str("description"),
        is_active: attrs.bool("is_active"),
        order: attrs.int("order"),
    })
}

fn flatten_behavior(behavior: &RuleBehavior) -> Attributes {
    AttrsBuilder::new()
        .set("name", behavior.name.as_str())
        .set_nonempty("target", &json_scalar_to_string(&behavior.target))
        .build()
}

fn flatten_criterion(criterion: &RuleCriterion) -> Attributes {
    AttrsBuilder::new()
        .set("variable", criterion.variable.as_str())
        .set("operator", criterion.operator.as_str())
        .set("conditional", criterion.conditional.as_str())
        .set("input_value", criterion.input_value.as_str())
        .build()
}

fn flatten(rule: &Rule) -> Attributes {
    let criteria = rule
        .criteria
        .iter()
        .map(|group| {
            AttrsBuilder::new()
                .blocks("entries", group.iter().map(flatten_criterion).collect())
                .build()
        })
        .collect();

    AttrsBuilder::new()
        .set("rule_id", rule.id)
        .set("name", rule.name.as_str())
        .set("description", rule.description.as_str())
        .set("is_active", rule.is_active)
        .set("order", rule.order)
        .blocks("behaviors", rule.behaviors.iter().map(flatten_behavior).collect())
        .blocks("criteria", criteria)
        .build()
}

fn to_state(id: &ResourceId, app_id: i64, phase: &str, rule: &Rule) -> State {
    let mut attrs = flatten(rule);
    attrs.insert("edge_application_id".to_string(), app_id.into());
    attrs.insert("phase".to_string(), phase.into());
    State::existing(id.clone(), attrs).with_identifier(format!("{}/{}/{}", app_id, phase, rule.id))
}

fn parse_identifier(id: &ResourceId, identifier: &str) -> ProviderResult<(i64, String, i64)> {
    let parts = segments(id, identifier, FORMAT)?;
    let app_id = numeric(id, "edge_application_id", &parts[0])?;
    check_phase(&parts[1]).map_err(|e| e.for_resource(id.clone()))?;
    let rule_id = numeric(id, "rule_id", &parts[2])?;
    Ok((app_id, parts[1].clone(), rule_id))
}

#[async_trait]
impl ResourceHandler for EdgeApplicationRuleEngine {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> ResourceSchema {
        ResourceSchema::new(TYPE_NAME)
            .with_description("Rule of an edge application rules engine")
            .attribute(
                AttributeSchema::new("edge_application_id", types::positive_int())
                    .required()
                    .requires_replace(),
            )
            .attribute(
                AttributeSchema::new("phase", AttributeType::enumeration(PHASES))
                    .required()
                    .requires_replace(),
            )
            .attribute(AttributeSchema::new("rule_id", AttributeType::Int).computed())
            .attribute(AttributeSchema::new("name", AttributeType::String).required())
            .attribute(
                AttributeSchema::new("description", AttributeType::String).optional_computed(),
            )
            .attribute(AttributeSchema::new("is_active", AttributeType::Bool).optional_computed())
            .attribute(AttributeSchema::new("order", AttributeType::Int).optional_computed())
            .attribute(
                AttributeSchema::new("behaviors", AttributeType::List(Box::new(behavior_type())))
                    .required(),
            )
            .attribute(AttributeSchema::new(
                "criteria",
                AttributeType::List(Box::new(criteria_type())),
            ))
    }

    fn identifier_format(&self) -> &'static str {
        FORMAT
    }

    fn import_identifier(&self, import_id: &str) -> ProviderResult<String> {
        let parts = parse_import_id(import_id, FORMAT)?;
        check_phase(&parts[1])?;
        Ok(parts.join("/"))
    }

    async fn create(&self, client: &ApiClient, resource: &Resource) -> ProviderResult<State> {
        let attrs = Attrs::new(resource);
        let app_id = attrs.required_int("edge_application_id")?;
        let phase = attrs.required_str("phase")?;
        check_phase(&phase).map_err(|e| e.for_resource(resource.id.clone()))?;

        let request = expand(resource)?;
        let rule = client
            .create_rule(app_id, &phase, &request)
            .await
            .map_err(api_error(&resource.id))?;
        log::info!(
            "Created {} rule {} for edge application {}",
            phase,
            rule.id,
            app_id
        );
        Ok(to_state(&resource.id, app_id, &phase, &rule))
    }

    async fn read(
        &self,
        client: &ApiClient,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<State> {
        let (app_id, phase, rule_id) = parse_identifier(id, identifier)?;
        Ok(
            match found(id, client.get_rule(app_id, &phase, rule_id).await)? {
                Some(rule) => to_state(id, app_id, &phase, &rule),
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
        let (app_id, phase, rule_id) = parse_identifier(id, identifier)?;
        let request = expand(to)?;
        let rule = client
            .update_rule(app_id, &phase, rule_id, &request)
            .await
            .map_err(api_error(id))?;
        Ok(to_state(id, app_id, &phase, &rule))
    }

    async fn delete(
        &self,
        client: &ApiClient,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<()> {
        let (app_id, phase, rule_id) = parse_identifier(id, identifier)?;
        client
            .delete_rule(app_id, &phase, rule_id)
            .await
            .map_err(api_error(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use azion_core::resource::Value;
    use serde_json::json;

    fn rule_resource() -> Resource {
        let behavior = AttrsBuilder::new()
            .set("name", "redirect_to_301")
            .set("target", "https://example.com")
            .build();
        let entry = AttrsBuilder::new()
            .set("variable", "${uri}")
            .set("operator", "starts_with")
            .set("conditional", "if")
            .set("input_value", "/old")
            .build();
        let group = AttrsBuilder::new()
            .blocks("entries", vec![entry])
            .build();

        Resource::new(TYPE_NAME, "redirect")
            .with_attribute("edge_application_id", 10_i64)
            .with_attribute("phase", "request")
            .with_attribute("name", "redirect old paths")
            .with_attribute("behaviors", Value::List(vec![Value::Map(behavior)]))
            .with_attribute("criteria", Value::List(vec![Value::Map(group)]))
    }

    #[test]
    fn expand_rule() {
        let request = expand(&rule_resource()).unwrap();
        assert_eq!(request.behaviors[0].target, json!("https://example.com"));
        assert_eq!(request.criteria.len(), 1);
        assert_eq!(request.criteria[0][0].operator, "starts_with");
        assert_eq!(request.order, None);
    }

    #[test]
    fn behavior_without_target_omits_it() {
        let behavior = AttrsBuilder::new().set("name", "deliver").build();
        let resource = rule_resource()
            .with_attribute("behaviors", Value::List(vec![Value::Map(behavior)]));
        let request = expand(&resource).unwrap();
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["behaviors"][0], json!({"name": "deliver"}));
    }

    #[test]
    fn structured_target_round_trips_as_json_text() {
        let rule = Rule {
            id: 7,
            name: "capture".to_string(),
            behaviors: vec![RuleBehavior {
                name: "capture_match_groups".to_string(),
                target: json!({"captured_array": "arr", "subject": "${uri}"}),
            }],
            ..Default::default()
        };
        let attrs = flatten(&rule);
        let behaviors = attrs["behaviors"].as_list().unwrap();
        assert_eq!(
            behaviors[0].as_map().unwrap()["target"],
            Value::from(r#"{"captured_array":"arr","subject":"${uri}"}"#)
        );
    }

    #[test]
    fn import_validates_phase() {
        let handler = EdgeApplicationRuleEngine;
        assert_eq!(
            handler.import_identifier("10/response/7").unwrap(),
            "10/response/7"
        );
        assert!(handler.import_identifier("10/default/7").is_err());
        assert!(handler.import_identifier("10/7").is_err());
    }

    #[test]
    fn state_identifier_includes_phase() {
        let rule = Rule {
            id: 7,
            ..Default::default()
        };
        let state = to_state(&ResourceId::new(TYPE_NAME, "r"), 10, "response", &rule);
        assert_eq!(state.identifier.as_deref(), Some("10/response/7"));
        assert_eq!(state.attributes["phase"], Value::from("response"));
    }
}
