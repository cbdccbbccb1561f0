//! azion_intelligent_dns_dnssec
//!
//! DNSSEC is a setting of a zone rather than an object of its own:
//! creating it patches the zone and deleting it disables signing.

use async_trait::async_trait;
use azion_core::provider::ProviderResult;
use azion_core::resource::{Attributes, Resource, ResourceId, State};
use azion_core::schema::{AttributeSchema, AttributeType, ResourceSchema, types};

use super::{ResourceHandler, api_error, found, numeric};
use crate::api::dns::{DelegationSigner, Dnssec, DnssecRequest, SlugRef};
use crate::attrs::{Attrs, AttrsBuilder};
use crate::client::ApiClient;

pub const TYPE_NAME: &str = "azion_intelligent_dns_dnssec";
const FORMAT: &str = "<zone_id>";

pub struct DnsDnssec;

fn slug_type() -> AttributeType {
    AttributeType::Object(vec![
        AttributeSchema::new("id", AttributeType::Int).computed(),
        AttributeSchema::new("slug", AttributeType::String).computed(),
    ])
}

pub(crate) fn dnssec_attributes() -> Vec<AttributeSchema> {
    vec![
        AttributeSchema::new("is_enabled", AttributeType::Bool).required(),
        AttributeSchema::new("status", AttributeType::String).computed(),
        AttributeSchema::new(
            "delegation_signer",
            AttributeType::Object(vec![
                AttributeSchema::new("digest_type", slug_type()).computed(),
                AttributeSchema::new("algorithm_type", slug_type()).computed(),
                AttributeSchema::new("digest", AttributeType::String).computed(),
                AttributeSchema::new("key_tag", AttributeType::Int).computed(),
            ]),
        )
        .computed()
        .with_description("DS record to publish at the parent zone"),
    ]
}

fn flatten_slug(slug: &SlugRef) -> Attributes {
    AttrsBuilder::new()
        .set("id", slug.id)
        .set("slug", slug.slug.as_str())
        .build()
}

fn flatten_signer(signer: &DelegationSigner) -> Attributes {
    let mut builder = AttrsBuilder::new()
        .set("digest", signer.digest.as_str())
        .set("key_tag", signer.key_tag);
    if let Some(digest_type) = &signer.digest_type {
        builder = builder.block("digest_type", flatten_slug(digest_type));
    }
    if let Some(algorithm_type) = &signer.algorithm_type {
        builder = builder.block("algorithm_type", flatten_slug(algorithm_type));
    }
    builder.build()
}

pub(crate) fn flatten(dnssec: &Dnssec) -> Attributes {
    let mut builder = AttrsBuilder::new()
        .set("is_enabled", dnssec.is_enabled)
        .set_nonempty("status", &dnssec.status);
    if let Some(signer) = &dnssec.delegation_signer {
        builder = builder.block("delegation_signer", flatten_signer(signer));
    }
    builder.build()
}

fn to_state(id: &ResourceId, zone_id: i64, dnssec: &Dnssec) -> State {
    let mut attrs = flatten(dnssec);
    attrs.insert("zone_id".to_string(), zone_id.into());
    State::existing(id.clone(), attrs).with_identifier(zone_id.to_string())
}

async fn apply(
    client: &ApiClient,
    id: &ResourceId,
    resource: &Resource,
    zone_id: i64,
) -> ProviderResult<State> {
    let request = DnssecRequest {
        is_enabled: Attrs::new(resource).bool_or("is_enabled", false),
    };
    let dnssec = client
        .update_dnssec(zone_id, &request)
        .await
        .map_err(api_error(id))?;
    Ok(to_state(id, zone_id, &dnssec))
}

#[async_trait]
impl ResourceHandler for DnsDnssec {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> ResourceSchema {
        dnssec_attributes()
            .into_iter()
            .fold(ResourceSchema::new(TYPE_NAME), ResourceSchema::attribute)
            .attribute(
                AttributeSchema::new("zone_id", types::positive_int())
                    .required()
                    .requires_replace(),
            )
            .with_description("DNSSEC signing of an Intelligent DNS zone")
    }

    fn identifier_format(&self) -> &'static str {
        FORMAT
    }

    async fn create(&self, client: &ApiClient, resource: &Resource) -> ProviderResult<State> {
        let zone_id = Attrs::new(resource).required_int("zone_id")?;
        apply(client, &resource.id, resource, zone_id).await
    }

    async fn read(
        &self,
        client: &ApiClient,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<State> {
        let zone_id = numeric(id, "zone_id", identifier)?;
        Ok(match found(id, client.get_dnssec(zone_id).await)? {
            Some(dnssec) => to_state(id, zone_id, &dnssec),
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
        apply(client, id, to, zone_id).await
    }

    async fn delete(
        &self,
        client: &ApiClient,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<()> {
        let zone_id = numeric(id, "zone_id", identifier)?;
        client
            .update_dnssec(zone_id, &DnssecRequest { is_enabled: false })
            .await
            .map_err(api_error(id))?;
        log::info!("Disabled DNSSEC on zone {}", zone_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use azion_core::resource::Value;

    #[test]
    fn flatten_with_signer() {
        let dnssec = Dnssec {
            is_enabled: true,
            status: "ready".to_string(),
            delegation_signer: Some(DelegationSigner {
                digest_type: Some(SlugRef {
                    id: 2,
                    slug: "SHA256".to_string(),
                }),
                algorithm_type: None,
                digest: "ABCDEF".to_string(),
                key_tag: 12345,
            }),
        };
        let attrs = flatten(&dnssec);
        let signer = attrs["delegation_signer"].as_map().unwrap();
        assert_eq!(signer["key_tag"], Value::Int(12345));
        assert_eq!(
            signer["digest_type"].as_map().unwrap()["slug"],
            Value::from("SHA256")
        );
        assert!(!signer.contains_key("algorithm_type"));
    }

    #[test]
    fn disabled_zone_has_no_signer() {
        let state = to_state(
            &ResourceId::new(TYPE_NAME, "main"),
            5,
            &Dnssec::default(),
        );
        assert_eq!(state.identifier.as_deref(), Some("5"));
        assert_eq!(state.attributes["is_enabled"], Value::Bool(false));
        assert!(!state.attributes.contains_key("delegation_signer"));
    }
}
