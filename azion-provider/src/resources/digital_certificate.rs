//! azion_digital_certificate

use async_trait::async_trait;
use azion_core::provider::ProviderResult;
use azion_core::resource::{Attributes, Resource, ResourceId, State};
use azion_core::schema::{AttributeSchema, AttributeType, ResourceSchema};

use super::{ResourceHandler, api_error, found, numeric};
use crate::api::digital_certificate::{
    DigitalCertificate as ApiDigitalCertificate, DigitalCertificateRequest,
};
use crate::attrs::{Attrs, AttrsBuilder};
use crate::client::ApiClient;

pub const TYPE_NAME: &str = "azion_digital_certificate";
const FORMAT: &str = "<certificate_id>";

pub struct DigitalCertificate;

pub(crate) fn certificate_attributes() -> Vec<AttributeSchema> {
    vec![
        AttributeSchema::new("id", AttributeType::Int).computed(),
        AttributeSchema::new("name", AttributeType::String).required(),
        AttributeSchema::new("certificate", AttributeType::String)
            .optional_computed()
            .with_description("PEM encoded certificate chain"),
        AttributeSchema::new("private_key", AttributeType::String).sensitive(),
        AttributeSchema::new("issuer", AttributeType::String).computed(),
        AttributeSchema::new(
            "subject_name",
            AttributeType::List(Box::new(AttributeType::String)),
        )
        .computed(),
        AttributeSchema::new("validity", AttributeType::String).computed(),
        AttributeSchema::new("status", AttributeType::String).computed(),
        AttributeSchema::new("certificate_type", AttributeType::String).computed(),
        AttributeSchema::new("managed", AttributeType::Bool).computed(),
        AttributeSchema::new("azion_information", AttributeType::String).computed(),
    ]
}

fn expand(resource: &Resource) -> ProviderResult<DigitalCertificateRequest> {
    let attrs = Attrs::new(resource);
    Ok(DigitalCertificateRequest {
        name: attrs.required_str("name")?,
        certificate: attrs.str("certificate"),
        private_key: attrs.str("private_key"),
    })
}

pub(crate) fn flatten(cert: &ApiDigitalCertificate) -> Attributes {
    AttrsBuilder::new()
        .set("id", cert.id)
        .set("name", cert.name.as_str())
        .set_opt("certificate", cert.certificate_content.clone())
        .set_nonempty("issuer", &cert.issuer)
        .strings("subject_name", &cert.subject_name)
        .set_nonempty("validity", &cert.validity)
        .set_nonempty("status", &cert.status)
        .set_nonempty("certificate_type", &cert.certificate_type)
        .set("managed", cert.managed)
        .set_nonempty("azion_information", &cert.azion_information)
        .build()
}

fn to_state(id: &ResourceId, cert: &ApiDigitalCertificate, config: Option<&Resource>) -> State {
    let mut attrs = flatten(cert);
    if let Some(config) = config {
        for key in ["certificate", "private_key"] {
            if let Some(value) = config.get(key) {
                attrs.entry(key.to_string()).or_insert_with(|| value.clone());
            }
        }
    }
    State::existing(id.clone(), attrs).with_identifier(cert.id.to_string())
}

#[async_trait]
impl ResourceHandler for DigitalCertificate {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> ResourceSchema {
        certificate_attributes()
            .into_iter()
            .fold(ResourceSchema::new(TYPE_NAME), ResourceSchema::attribute)
            .with_description("Uploaded TLS certificate and key")
    }

    fn identifier_format(&self) -> &'static str {
        FORMAT
    }

    async fn create(&self, client: &ApiClient, resource: &Resource) -> ProviderResult<State> {
        let request = expand(resource)?;
        let cert = client
            .create_digital_certificate(&request)
            .await
            .map_err(api_error(&resource.id))?;
        log::info!("Created digital certificate {} ({})", cert.id, cert.name);
        Ok(to_state(&resource.id, &cert, Some(resource)))
    }

    async fn read(
        &self,
        client: &ApiClient,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<State> {
        let cert_id = numeric(id, "certificate_id", identifier)?;
        Ok(match found(id, client.get_digital_certificate(cert_id).await)? {
            Some(cert) => to_state(id, &cert, None),
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
        let cert_id = numeric(id, "certificate_id", identifier)?;
        let request = expand(to)?;
        let cert = client
            .update_digital_certificate(cert_id, &request)
            .await
            .map_err(api_error(id))?;
        Ok(to_state(id, &cert, Some(to)))
    }

    async fn delete(
        &self,
        client: &ApiClient,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<()> {
        let cert_id = numeric(id, "certificate_id", identifier)?;
        client
            .delete_digital_certificate(cert_id)
            .await
            .map_err(api_error(id))
    }
}
