//! azion_domain

use async_trait::async_trait;
use azion_core::provider::ProviderResult;
use azion_core::resource::{Attributes, Resource, ResourceId, State, Value};
use azion_core::schema::{AttributeSchema, AttributeType, ResourceSchema, types};

use super::{ResourceHandler, api_error, found, numeric};
use crate::api::domain::{Domain as ApiDomain, DomainRequest};
use crate::attrs::{Attrs, AttrsBuilder};
use crate::client::ApiClient;
use crate::utils::atoi;

pub const TYPE_NAME: &str = "azion_domain";
const FORMAT: &str = "<domain_id>";

/// Certificate managed by the platform instead of an uploaded one
pub const LETS_ENCRYPT: &str = "lets_encrypt";

pub struct Domain;

pub(crate) fn domain_attributes() -> Vec<AttributeSchema> {
    vec![
        AttributeSchema::new("id", AttributeType::Int).computed(),
        AttributeSchema::new("name", AttributeType::String).required(),
        AttributeSchema::new("cnames", AttributeType::Set(Box::new(AttributeType::String)))
            .with_default(Value::List(vec![])),
        AttributeSchema::new("cname_access_only", AttributeType::Bool).with_default(false.into()),
        AttributeSchema::new("digital_certificate_id", AttributeType::String).with_description(
            "Certificate ID, `lets_encrypt`, or unset for the platform default",
        ),
        AttributeSchema::new("edge_application_id", types::positive_int()).required(),
        AttributeSchema::new("edge_firewall_id", types::positive_int()),
        AttributeSchema::new("is_active", AttributeType::Bool).with_default(true.into()),
        AttributeSchema::new("domain_name", AttributeType::String).computed(),
        AttributeSchema::new("environment", AttributeType::String).computed(),
        AttributeSchema::new("is_mtls_enabled", AttributeType::Bool).optional_computed(),
        AttributeSchema::new(
            "mtls_verification",
            AttributeType::enumeration(&["enforce", "permissive"]),
        )
        .optional_computed(),
        AttributeSchema::new("mtls_trusted_ca_certificate_id", types::positive_int()),
    ]
}

/// Numeric IDs travel as numbers, `lets_encrypt` as a string, unset as null
fn certificate_to_wire(raw: Option<&str>) -> ProviderResult<serde_json::Value> {
    match raw.map(str::trim) {
        None | Some("") => Ok(serde_json::Value::Null),
        Some(LETS_ENCRYPT) => Ok(serde_json::Value::String(LETS_ENCRYPT.to_string())),
        Some(id) => Ok(atoi("digital_certificate_id", id)?.into()),
    }
}

fn certificate_from_wire(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn expand(resource: &Resource) -> ProviderResult<DomainRequest> {
    let attrs = Attrs::new(resource);
    let digital_certificate_id = certificate_to_wire(attrs.str("digital_certificate_id").as_deref())
        .map_err(|e| e.for_resource(resource.id.clone()))?;
    Ok(DomainRequest {
        name: attrs.required_str("name")?,
        cnames: attrs.strings("cnames").unwrap_or_default(),
        cname_access_only: attrs.bool_or("cname_access_only", false),
        edge_application_id: attrs.required_int("edge_application_id")?,
        is_active: attrs.bool_or("is_active", true),
        digital_certificate_id,
        edge_firewall_id: attrs.int("edge_firewall_id"),
        is_mtls_enabled: attrs.bool("is_mtls_enabled"),
        mtls_verification: attrs.str("mtls_verification"),
        mtls_trusted_ca_certificate_id: attrs.int("mtls_trusted_ca_certificate_id"),
    })
}

pub(crate) fn flatten(domain: &ApiDomain) -> Attributes {
    AttrsBuilder::new()
        .set("id", domain.id)
        .set("name", domain.name.as_str())
        .strings("cnames", &domain.cnames)
        .set("cname_access_only", domain.cname_access_only)
        .set_opt(
            "digital_certificate_id",
            certificate_from_wire(&domain.digital_certificate_id),
        )
        .set("edge_application_id", domain.edge_application_id)
        .set_opt("edge_firewall_id", domain.edge_firewall_id)
        .set("is_active", domain.is_active)
        .set_nonempty("domain_name", &domain.domain_name)
        .set_nonempty("environment", &domain.environment)
        .set("is_mtls_enabled", domain.is_mtls_enabled)
        .set_nonempty("mtls_verification", &domain.mtls_verification)
        .set_opt(
            "mtls_trusted_ca_certificate_id",
            domain.mtls_trusted_ca_certificate_id,
        )
        .build()
}

fn to_state(id: &ResourceId, domain: &ApiDomain) -> State {
    State::existing(id.clone(), flatten(domain)).with_identifier(domain.id.to_string())
}

#[async_trait]
impl ResourceHandler for Domain {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> ResourceSchema {
        domain_attributes()
            .into_iter()
            .fold(ResourceSchema::new(TYPE_NAME), ResourceSchema::attribute)
            .with_description("Domain routing traffic to an edge application")
    }

    fn identifier_format(&self) -> &'static str {
        FORMAT
    }

    async fn create(&self, client: &ApiClient, resource: &Resource) -> ProviderResult<State> {
        let request = expand(resource)?;
        let domain = client
            .create_domain(&request)
            .await
            .map_err(api_error(&resource.id))?;
        log::info!("Created domain {} ({})", domain.id, domain.domain_name);
        Ok(to_state(&resource.id, &domain))
    }

    async fn read(
        &self,
        client: &ApiClient,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<State> {
        let domain_id = numeric(id, "domain_id", identifier)?;
        Ok(match found(id, client.get_domain(domain_id).await)? {
            Some(domain) => to_state(id, &domain),
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
        let domain_id = numeric(id, "domain_id", identifier)?;
        let request = expand(to)?;
        let domain = client
            .update_domain(domain_id, &request)
            .await
            .map_err(api_error(id))?;
        Ok(to_state(id, &domain))
    }

    async fn delete(
        &self,
        client: &ApiClient,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<()> {
        let domain_id = numeric(id, "domain_id", identifier)?;
        client.delete_domain(domain_id).await.map_err(api_error(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn certificate_wire_forms() {
        assert_eq!(certificate_to_wire(None).unwrap(), json!(null));
        assert_eq!(certificate_to_wire(Some("")).unwrap(), json!(null));
        assert_eq!(certificate_to_wire(Some("123")).unwrap(), json!(123));
        assert_eq!(
            certificate_to_wire(Some("lets_encrypt")).unwrap(),
            json!("lets_encrypt")
        );
        assert!(certificate_to_wire(Some("abc")).is_err());

        assert_eq!(certificate_from_wire(&json!(123)).as_deref(), Some("123"));
        assert_eq!(certificate_from_wire(&json!(null)), None);
    }

    #[test]
    fn expand_domain() {
        let resource = Resource::new(TYPE_NAME, "www")
            .with_attribute("name", "www")
            .with_attribute("edge_application_id", 100_i64)
            .with_attribute("cnames", Value::List(vec![Value::from("www.example.com")]))
            .with_attribute("digital_certificate_id", "42");
        let request = expand(&resource).unwrap();
        assert_eq!(request.cnames, vec!["www.example.com"]);
        assert_eq!(request.digital_certificate_id, json!(42));
        assert!(request.is_active);

        let body = serde_json::to_value(&request).unwrap();
        assert!(body.get("edge_firewall_id").is_none());
    }

    #[test]
    fn flatten_domain() {
        let domain = ApiDomain {
            id: 5,
            name: "www".to_string(),
            digital_certificate_id: json!("lets_encrypt"),
            edge_application_id: 100,
            domain_name: "abc123.map.azionedge.net".to_string(),
            ..Default::default()
        };
        let attrs = flatten(&domain);
        assert_eq!(attrs["digital_certificate_id"], Value::from("lets_encrypt"));
        assert_eq!(
            attrs["domain_name"],
            Value::from("abc123.map.azionedge.net")
        );
        assert!(!attrs.contains_key("edge_firewall_id"));
    }
}
