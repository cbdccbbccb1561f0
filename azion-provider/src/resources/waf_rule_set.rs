//! azion_waf_rule_set

use async_trait::async_trait;
use azion_core::provider::ProviderResult;
use azion_core::resource::{Attributes, Resource, ResourceId, State, Value};
use azion_core::schema::{AttributeSchema, AttributeType, ResourceSchema, types};

use super::{ResourceHandler, api_error, found, numeric};
use crate::api::waf::{SENSITIVITIES, THREAT_FAMILIES, ThreatSetting, WafRuleSet as ApiWafRuleSet};
use crate::attrs::{Attrs, AttrsBuilder};
use crate::client::ApiClient;

pub const TYPE_NAME: &str = "azion_waf_rule_set";
const FORMAT: &str = "<waf_id>";

pub const MODES: &[&str] = &["learning", "blocking", "counting"];
const DEFAULT_SENSITIVITY: &str = "medium";

pub struct WafRuleSet;

fn sensitivity_key(family: &str) -> String {
    format!("{}_sensitivity", family)
}

pub(crate) fn waf_attributes() -> Vec<AttributeSchema> {
    let mut attrs = vec![
        AttributeSchema::new("id", AttributeType::Int).computed(),
        AttributeSchema::new("name", AttributeType::String).required(),
        AttributeSchema::new("mode", AttributeType::enumeration(MODES))
            .with_default("learning".into()),
        AttributeSchema::new("active", AttributeType::Bool).with_default(true.into()),
        AttributeSchema::new("bypass_addresses", AttributeType::Set(Box::new(types::cidr())))
            .with_default(Value::List(vec![]))
            .with_description("Client networks never inspected by the rule set"),
    ];
    for family in THREAT_FAMILIES {
        attrs.push(AttributeSchema::new(*family, AttributeType::Bool).with_default(false.into()));
        attrs.push(
            AttributeSchema::new(sensitivity_key(family), AttributeType::enumeration(SENSITIVITIES))
                .with_default(DEFAULT_SENSITIVITY.into()),
        );
    }
    attrs
}

fn expand(resource: &Resource) -> ProviderResult<ApiWafRuleSet> {
    let attrs = Attrs::new(resource);
    let mut rule_set = ApiWafRuleSet {
        name: attrs.required_str("name")?,
        mode: attrs.str("mode").unwrap_or_else(|| "learning".to_string()),
        active: attrs.bool_or("active", true),
        bypass_addresses: attrs.strings("bypass_addresses").unwrap_or_default(),
        ..Default::default()
    };
    for family in THREAT_FAMILIES {
        rule_set.set_threat(
            family,
            ThreatSetting {
                enabled: attrs.bool_or(family, false),
                sensitivity: attrs
                    .str(&sensitivity_key(family))
                    .unwrap_or_else(|| DEFAULT_SENSITIVITY.to_string()),
            },
        );
    }
    Ok(rule_set)
}

pub(crate) fn flatten(rule_set: &ApiWafRuleSet) -> Attributes {
    let mut builder = AttrsBuilder::new()
        .set("id", rule_set.id)
        .set("name", rule_set.name.as_str())
        .set_nonempty("mode", &rule_set.mode)
        .set("active", rule_set.active)
        .strings("bypass_addresses", &rule_set.bypass_addresses);
    for family in THREAT_FAMILIES {
        if let Some(threat) = rule_set.threat(family) {
            builder = builder
                .set(family, threat.enabled)
                .set_nonempty(&sensitivity_key(family), &threat.sensitivity);
        }
    }
    builder.build()
}

fn to_state(id: &ResourceId, rule_set: &ApiWafRuleSet) -> State {
    State::existing(id.clone(), flatten(rule_set)).with_identifier(rule_set.id.to_string())
}

#[async_trait]
impl ResourceHandler for WafRuleSet {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> ResourceSchema {
        waf_attributes()
            .into_iter()
            .fold(ResourceSchema::new(TYPE_NAME), ResourceSchema::attribute)
            .with_description("Web application firewall rule set")
    }

    fn identifier_format(&self) -> &'static str {
        FORMAT
    }

    async fn create(&self, client: &ApiClient, resource: &Resource) -> ProviderResult<State> {
        let request = expand(resource)?;
        let rule_set = client
            .create_waf_rule_set(&request)
            .await
            .map_err(api_error(&resource.id))?;
        log::info!("Created WAF rule set {} ({})", rule_set.id, rule_set.name);
        Ok(to_state(&resource.id, &rule_set))
    }

    async fn read(
        &self,
        client: &ApiClient,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<State> {
        let waf_id = numeric(id, "waf_id", identifier)?;
        Ok(match found(id, client.get_waf_rule_set(waf_id).await)? {
            Some(rule_set) => to_state(id, &rule_set),
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
        let waf_id = numeric(id, "waf_id", identifier)?;
        let request = expand(to)?;
        let rule_set = client
            .update_waf_rule_set(waf_id, &request)
            .await
            .map_err(api_error(id))?;
        Ok(to_state(id, &rule_set))
    }

    async fn delete(
        &self,
        client: &ApiClient,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<()> {
        let waf_id = numeric(id, "waf_id", identifier)?;
        client.delete_waf_rule_set(waf_id).await.map_err(api_error(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_has_pair_per_family() {
        let schema = WafRuleSet.schema();
        for family in THREAT_FAMILIES {
            assert!(schema.attributes.contains_key(*family));
            assert!(schema.attributes.contains_key(&sensitivity_key(family)));
        }
    }

    #[test]
    fn expand_fills_threat_defaults() {
        let resource = Resource::new(TYPE_NAME, "main")
            .with_attribute("name", "main")
            .with_attribute("mode", "blocking")
            .with_attribute("sql_injection", true)
            .with_attribute("sql_injection_sensitivity", "high");
        let rule_set = expand(&resource).unwrap();
        assert_eq!(rule_set.mode, "blocking");
        assert!(rule_set.sql_injection);
        assert_eq!(rule_set.sql_injection_sensitivity, "high");
        assert!(!rule_set.file_upload);
        assert_eq!(rule_set.file_upload_sensitivity, "medium");
    }

    #[test]
    fn schema_rejects_bad_bypass_address() {
        let resource = Resource::new(TYPE_NAME, "main")
            .with_attribute("name", "main")
            .with_attribute(
                "bypass_addresses",
                Value::List(vec![Value::from("10.0.0.0/33")]),
            );
        assert!(WafRuleSet.schema().validate(&resource.attributes).is_err());
    }

    #[test]
    fn flatten_round_trips_threats() {
        let resource = Resource::new(TYPE_NAME, "main")
            .with_attribute("name", "main")
            .with_attribute("evading_tricks", true);
        let mut remote = expand(&resource).unwrap();
        remote.id = 21;
        let attrs = flatten(&remote);
        assert_eq!(attrs["evading_tricks"], Value::Bool(true));
        assert_eq!(attrs["evading_tricks_sensitivity"], Value::from("medium"));
        assert_eq!(attrs["id"], Value::Int(21));
    }
}
