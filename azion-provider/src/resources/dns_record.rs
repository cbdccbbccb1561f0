//! azion_intelligent_dns_record

use async_trait::async_trait;
use azion_core::provider::{ProviderError, ProviderResult};
use azion_core::resource::{Attributes, Resource, ResourceId, State};
use azion_core::schema::{AttributeSchema, AttributeType, ResourceSchema, types};

use super::{ResourceHandler, api_error, found, numeric_pair};
use crate::api::dns::{Record, RecordRequest};
use crate::attrs::{Attrs, AttrsBuilder};
use crate::client::ApiClient;

pub const TYPE_NAME: &str = "azion_intelligent_dns_record";
const FORMAT: &str = "<zone_id>/<record_id>";

pub const RECORD_TYPES: &[&str] = &[
    "A", "AAAA", "ANAME", "CAA", "CNAME", "DS", "MX", "NS", "PTR", "SRV", "TXT",
];

pub struct DnsRecord;

pub(crate) fn record_attributes() -> Vec<AttributeSchema> {
    vec![
        AttributeSchema::new("record_id", AttributeType::Int).computed(),
        AttributeSchema::new("record_type", AttributeType::enumeration(RECORD_TYPES)).required(),
        AttributeSchema::new("entry", AttributeType::String)
            .required()
            .with_description("Record name relative to the zone, `@` for the apex"),
        AttributeSchema::new(
            "answers_list",
            AttributeType::List(Box::new(AttributeType::String)),
        )
        .required(),
        AttributeSchema::new("ttl", types::positive_int()).with_default(3600_i64.into()),
        AttributeSchema::new("policy", AttributeType::enumeration(&["simple", "weighted"]))
            .with_default("simple".into()),
        AttributeSchema::new("weight", AttributeType::Int)
            .with_description("Only used by the weighted policy"),
        AttributeSchema::new("description", AttributeType::String),
    ]
}

fn expand(resource: &Resource) -> ProviderResult<(i64, RecordRequest)> {
    let attrs = Attrs::new(resource);
    let zone_id = attrs.required_int("zone_id")?;
    let policy = attrs.str("policy").unwrap_or_else(|| "simple".to_string());
    let weight = attrs.int("weight");

    if policy == "weighted" && weight.is_none() {
        return Err(ProviderError::new("weight is required when policy is weighted")
            .for_resource(resource.id.clone()));
    }

    Ok((
        zone_id,
        RecordRequest {
            record_type: attrs.required_str("record_type")?,
            entry: attrs.required_str("entry")?,
            answers_list: attrs.strings("answers_list").unwrap_or_default(),
            ttl: Some(attrs.int("ttl").unwrap_or(3600)),
            weight: if policy == "weighted" { weight } else { None },
            policy: Some(policy),
            description: attrs.str("description"),
        },
    ))
}

pub(crate) fn flatten(record: &Record) -> Attributes {
    AttrsBuilder::new()
        .set("record_id", record.record_id)
        .set("record_type", record.record_type.as_str())
        .set("entry", record.entry.as_str())
        .strings("answers_list", &record.answers_list)
        .set("ttl", record.ttl)
        .set_nonempty("policy", &record.policy)
        .set_opt("weight", record.weight)
        .set_nonempty("description", &record.description)
        .build()
}

fn to_state(id: &ResourceId, zone_id: i64, record: &Record) -> State {
    let mut attrs = flatten(record);
    attrs.insert("zone_id".to_string(), zone_id.into());
    State::existing(id.clone(), attrs)
        .with_identifier(format!("{}/{}", zone_id, record.record_id))
}

#[async_trait]
impl ResourceHandler for DnsRecord {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> ResourceSchema {
        record_attributes()
            .into_iter()
            .fold(ResourceSchema::new(TYPE_NAME), ResourceSchema::attribute)
            .attribute(
                AttributeSchema::new("zone_id", types::positive_int())
                    .required()
                    .requires_replace(),
            )
            .with_description("Record inside an Intelligent DNS zone")
    }

    fn identifier_format(&self) -> &'static str {
        FORMAT
    }

    async fn create(&self, client: &ApiClient, resource: &Resource) -> ProviderResult<State> {
        let (zone_id, request) = expand(resource)?;
        let record = client
            .create_record(zone_id, &request)
            .await
            .map_err(api_error(&resource.id))?;
        log::info!(
            "Created {} record {} in zone {}",
            record.record_type,
            record.record_id,
            zone_id
        );
        Ok(to_state(&resource.id, zone_id, &record))
    }

    async fn read(
        &self,
        client: &ApiClient,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<State> {
        let (zone_id, record_id) = numeric_pair(id, identifier, FORMAT)?;
        Ok(match found(id, client.get_record(zone_id, record_id).await)? {
            Some(record) => to_state(id, zone_id, &record),
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
        let (zone_id, record_id) = numeric_pair(id, identifier, FORMAT)?;
        let (_, request) = expand(to)?;
        let record = client
            .update_record(zone_id, record_id, &request)
            .await
            .map_err(api_error(id))?;
        Ok(to_state(id, zone_id, &record))
    }

    async fn delete(
        &self,
        client: &ApiClient,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<()> {
        let (zone_id, record_id) = numeric_pair(id, identifier, FORMAT)?;
        client
            .delete_record(zone_id, record_id)
            .await
            .map_err(api_error(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use azion_core::resource::Value;

    fn record(policy: &str) -> Resource {
        Resource::new(TYPE_NAME, "www")
            .with_attribute("zone_id", 12_i64)
            .with_attribute("record_type", "A")
            .with_attribute("entry", "www")
            .with_attribute(
                "answers_list",
                Value::List(vec![Value::from("192.0.2.1"), Value::from("192.0.2.2")]),
            )
            .with_attribute("policy", policy)
    }

    #[test]
    fn expand_simple_record_drops_weight() {
        let (zone_id, request) = expand(&record("simple").with_attribute("weight", 50_i64)).unwrap();
        assert_eq!(zone_id, 12);
        assert_eq!(request.ttl, Some(3600));
        assert_eq!(request.weight, None);
        assert_eq!(request.answers_list.len(), 2);
    }

    #[test]
    fn weighted_record_requires_weight() {
        assert!(expand(&record("weighted")).is_err());
        let (_, request) = expand(&record("weighted").with_attribute("weight", 50_i64)).unwrap();
        assert_eq!(request.weight, Some(50));
    }

    #[test]
    fn state_identifier_is_composite() {
        let remote = Record {
            record_id: 99,
            record_type: "A".to_string(),
            entry: "www".to_string(),
            ttl: 60,
            ..Default::default()
        };
        let state = to_state(&ResourceId::new(TYPE_NAME, "www"), 12, &remote);
        assert_eq!(state.identifier.as_deref(), Some("12/99"));
        assert_eq!(state.attributes["zone_id"], Value::Int(12));
        assert!(!state.attributes.contains_key("description"));
    }

    #[test]
    fn import_requires_two_segments() {
        assert_eq!(DnsRecord.import_identifier("12/99").unwrap(), "12/99");
        assert!(DnsRecord.import_identifier("12").is_err());
    }
}
