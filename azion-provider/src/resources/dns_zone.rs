//! azion_intelligent_dns_zone

use async_trait::async_trait;
use azion_core::provider::ProviderResult;
use azion_core::resource::{Attributes, Resource, ResourceId, State};
use azion_core::schema::{AttributeSchema, AttributeType, ResourceSchema};

use super::{ResourceHandler, api_error, found, numeric};
use crate::api::dns::{Zone, ZoneRequest};
use crate::attrs::{Attrs, AttrsBuilder};
use crate::client::ApiClient;

pub const TYPE_NAME: &str = "azion_intelligent_dns_zone";
const FORMAT: &str = "<zone_id>";

pub struct DnsZone;

pub(crate) fn zone_attributes() -> Vec<AttributeSchema> {
    vec![
        AttributeSchema::new("id", AttributeType::Int).computed(),
        AttributeSchema::new("name", AttributeType::String)
            .required()
            .with_description("Display name of the zone"),
        AttributeSchema::new("domain", AttributeType::String)
            .required()
            .with_description("Domain served by the zone"),
        AttributeSchema::new("is_active", AttributeType::Bool)
            .with_default(true.into()),
        AttributeSchema::new("retry", AttributeType::Int).computed(),
        AttributeSchema::new("nx_ttl", AttributeType::Int).computed(),
        AttributeSchema::new("soa_ttl", AttributeType::Int).computed(),
        AttributeSchema::new("refresh", AttributeType::Int).computed(),
        AttributeSchema::new("expiry", AttributeType::Int).computed(),
        AttributeSchema::new(
            "nameservers",
            AttributeType::List(Box::new(AttributeType::String)),
        )
        .computed(),
    ]
}

fn expand(resource: &Resource) -> ProviderResult<ZoneRequest> {
    let attrs = Attrs::new(resource);
    Ok(ZoneRequest {
        name: attrs.required_str("name")?,
        domain: attrs.required_str("domain")?,
        is_active: attrs.bool_or("is_active", true),
    })
}

pub(crate) fn flatten(zone: &Zone) -> Attributes {
    AttrsBuilder::new()
        .set("id", zone.id)
        .set("name", zone.name.as_str())
        .set("domain", zone.domain.as_str())
        .set("is_active", zone.is_active)
        .set_opt("retry", zone.retry)
        .set_opt("nx_ttl", zone.nx_ttl)
        .set_opt("soa_ttl", zone.soa_ttl)
        .set_opt("refresh", zone.refresh)
        .set_opt("expiry", zone.expiry)
        .strings("nameservers", &zone.nameservers)
        .build()
}

fn to_state(id: &ResourceId, zone: &Zone) -> State {
    State::existing(id.clone(), flatten(zone)).with_identifier(zone.id.to_string())
}

#[async_trait]
impl ResourceHandler for DnsZone {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> ResourceSchema {
        zone_attributes()
            .into_iter()
            .fold(ResourceSchema::new(TYPE_NAME), ResourceSchema::attribute)
            .with_description("Intelligent DNS hosted zone")
    }

    fn identifier_format(&self) -> &'static str {
        FORMAT
    }

    async fn create(&self, client: &ApiClient, resource: &Resource) -> ProviderResult<State> {
        let request = expand(resource)?;
        let zone = client
            .create_zone(&request)
            .await
            .map_err(api_error(&resource.id))?;
        log::info!("Created DNS zone {} ({})", zone.id, zone.domain);
        Ok(to_state(&resource.id, &zone))
    }

    async fn read(
        &self,
        client: &ApiClient,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<State> {
        let zone_id = numeric(id, "zone_id", identifier)?;
        Ok(match found(id, client.get_zone(zone_id).await)? {
            Some(zone) => to_state(id, &zone),
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
        let zone_id = numeric(id, "zone_id", identifier)?;
        let request = expand(to)?;
        let zone = client
            .update_zone(zone_id, &request)
            .await
            .map_err(api_error(id))?;
        Ok(to_state(id, &zone))
    }

    async fn delete(
        &self,
        client: &ApiClient,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<()> {
        let zone_id = numeric(id, "zone_id", identifier)?;
        client.delete_zone(zone_id).await.map_err(api_error(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use azion_core::resource::Value;

    #[test]
    fn expand_defaults_active() {
        let resource = Resource::new(TYPE_NAME, "main")
            .with_attribute("name", "main zone")
            .with_attribute("domain", "example.com");
        let request = expand(&resource).unwrap();
        assert_eq!(request.domain, "example.com");
        assert!(request.is_active);
    }

    #[test]
    fn flatten_zone() {
        let zone = Zone {
            id: 7,
            name: "main zone".to_string(),
            domain: "example.com".to_string(),
            is_active: true,
            retry: Some(7200),
            nameservers: vec!["ns1.aziondns.net".to_string()],
            ..Default::default()
        };
        let attrs = flatten(&zone);
        assert_eq!(attrs["id"], Value::Int(7));
        assert_eq!(attrs["retry"], Value::Int(7200));
        assert!(!attrs.contains_key("expiry"));
        assert_eq!(
            attrs["nameservers"],
            Value::List(vec![Value::from("ns1.aziondns.net")])
        );
    }

    #[test]
    fn schema_rejects_computed_id() {
        let resource = Resource::new(TYPE_NAME, "main")
            .with_attribute("name", "main zone")
            .with_attribute("domain", "example.com")
            .with_attribute("id", 3_i64);
        assert!(DnsZone.schema().validate(&resource.attributes).is_err());
    }
}
