//! azion_edge_application_main_setting

use async_trait::async_trait;
use azion_core::provider::ProviderResult;
use azion_core::resource::{Attributes, Resource, ResourceId, State};
use azion_core::schema::{AttributeSchema, AttributeType, ResourceSchema, types};

use super::{ResourceHandler, api_error, found, numeric};
use crate::api::edge_application::{EdgeApplication, EdgeApplicationRequest};
use crate::attrs::{Attrs, AttrsBuilder};
use crate::client::ApiClient;

pub const TYPE_NAME: &str = "azion_edge_application_main_setting";
const FORMAT: &str = "<edge_application_id>";

pub const DELIVERY_PROTOCOLS: &[&str] = &["http", "http,https"];
pub const TLS_VERSIONS: &[&str] = &["", "tls_1_0", "tls_1_1", "tls_1_2", "tls_1_3"];

/// Module toggles, all optional booleans the API fills in when omitted
const FLAGS: &[&str] = &[
    "application_acceleration",
    "caching",
    "debug_rules",
    "device_detection",
    "edge_firewall",
    "edge_functions",
    "http3",
    "image_optimization",
    "l2_caching",
    "load_balancer",
    "raw_logs",
    "web_application_firewall",
    "websocket",
];

pub struct EdgeApplicationMainSetting;

pub(crate) fn application_attributes() -> Vec<AttributeSchema> {
    let ports = || AttributeType::List(Box::new(types::port()));
    let mut attrs = vec![
        AttributeSchema::new("id", AttributeType::Int).computed(),
        AttributeSchema::new("name", AttributeType::String).required(),
        AttributeSchema::new("active", AttributeType::Bool).computed(),
        AttributeSchema::new(
            "delivery_protocol",
            AttributeType::enumeration(DELIVERY_PROTOCOLS),
        )
        .optional_computed(),
        AttributeSchema::new("http_port", ports()).optional_computed(),
        AttributeSchema::new("https_port", ports()).optional_computed(),
        AttributeSchema::new(
            "minimum_tls_version",
            AttributeType::enumeration(TLS_VERSIONS),
        )
        .optional_computed(),
        AttributeSchema::new("supported_ciphers", AttributeType::String).optional_computed(),
    ];
    attrs.extend(
        FLAGS
            .iter()
            .map(|flag| AttributeSchema::new(*flag, AttributeType::Bool).optional_computed()),
    );
    attrs
}

fn expand(resource: &Resource) -> ProviderResult<EdgeApplicationRequest> {
    let attrs = Attrs::new(resource);
    Ok(EdgeApplicationRequest {
        name: attrs.required_str("name")?,
        delivery_protocol: attrs.str("delivery_protocol"),
        http_port: attrs.ints("http_port"),
        https_port: attrs.ints("https_port"),
        minimum_tls_version: attrs.str("minimum_tls_version"),
        supported_ciphers: attrs.str("supported_ciphers"),
        debug_rules: attrs.bool("debug_rules"),
        http3: attrs.bool("http3"),
        application_acceleration: attrs.bool("application_acceleration"),
        caching: attrs.bool("caching"),
        device_detection: attrs.bool("device_detection"),
        edge_firewall: attrs.bool("edge_firewall"),
        edge_functions: attrs.bool("edge_functions"),
        image_optimization: attrs.bool("image_optimization"),
        l2_caching: attrs.bool("l2_caching"),
        load_balancer: attrs.bool("load_balancer"),
        raw_logs: attrs.bool("raw_logs"),
        web_application_firewall: attrs.bool("web_application_firewall"),
        websocket: attrs.bool("websocket"),
    })
}

pub(crate) fn flatten(app: &EdgeApplication) -> Attributes {
    let flags = [
        ("application_acceleration", app.application_acceleration),
        ("caching", app.caching),
        ("debug_rules", app.debug_rules),
        ("device_detection", app.device_detection),
        ("edge_firewall", app.edge_firewall),
        ("edge_functions", app.edge_functions),
        ("http3", app.http3),
        ("image_optimization", app.image_optimization),
        ("l2_caching", app.l2_caching),
        ("load_balancer", app.load_balancer),
        ("raw_logs", app.raw_logs),
        ("web_application_firewall", app.web_application_firewall),
        ("websocket", app.websocket),
    ];

    flags
        .into_iter()
        .fold(AttrsBuilder::new(), |b, (name, value)| b.set(name, value))
        .set("id", app.id)
        .set("name", app.name.as_str())
        .set("active", app.active)
        .set_nonempty("delivery_protocol", &app.delivery_protocol)
        .ints("http_port", &app.http_port)
        .ints("https_port", &app.https_port)
        .set("minimum_tls_version", app.minimum_tls_version.as_str())
        .set_nonempty("supported_ciphers", &app.supported_ciphers)
        .build()
}

fn to_state(id: &ResourceId, app: &EdgeApplication) -> State {
    State::existing(id.clone(), flatten(app)).with_identifier(app.id.to_string())
}

#[async_trait]
impl ResourceHandler for EdgeApplicationMainSetting {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> ResourceSchema {
        application_attributes()
            .into_iter()
            .fold(ResourceSchema::new(TYPE_NAME), ResourceSchema::attribute)
            .with_description("Main settings of an edge application")
    }

    fn identifier_format(&self) -> &'static str {
        FORMAT
    }

    async fn create(&self, client: &ApiClient, resource: &Resource) -> ProviderResult<State> {
        let request = expand(resource)?;
        let app = client
            .create_edge_application(&request)
            .await
            .map_err(api_error(&resource.id))?;
        log::info!("Created edge application {} ({})", app.id, app.name);
        Ok(to_state(&resource.id, &app))
    }

    async fn read(
        &self,
        client: &ApiClient,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<State> {
        let app_id = numeric(id, "edge_application_id", identifier)?;
        Ok(match found(id, client.get_edge_application(app_id).await)? {
            Some(app) => to_state(id, &app),
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
        let app_id = numeric(id, "edge_application_id", identifier)?;
        let request = expand(to)?;
        let app = client
            .update_edge_application(app_id, &request)
            .await
            .map_err(api_error(id))?;
        Ok(to_state(id, &app))
    }

    async fn delete(
        &self,
        client: &ApiClient,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<()> {
        let app_id = numeric(id, "edge_application_id", identifier)?;
        client
            .delete_edge_application(app_id)
            .await
            .map_err(api_error(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use azion_core::resource::Value;

    #[test]
    fn expand_passes_only_configured_fields() {
        let resource = Resource::new(TYPE_NAME, "site")
            .with_attribute("name", "site")
            .with_attribute("delivery_protocol", "http,https")
            .with_attribute("https_port", Value::List(vec![Value::Int(443)]))
            .with_attribute("caching", true);
        let request = expand(&resource).unwrap();
        assert_eq!(request.https_port, Some(vec![443]));
        assert_eq!(request.caching, Some(true));
        assert_eq!(request.websocket, None);

        let body = serde_json::to_value(&request).unwrap();
        assert!(body.get("http_port").is_none());
        assert_eq!(body["delivery_protocol"], "http,https");
    }

    #[test]
    fn flatten_sets_every_flag() {
        let app = EdgeApplication {
            id: 100,
            name: "site".to_string(),
            http_port: vec![80],
            caching: true,
            ..Default::default()
        };
        let attrs = flatten(&app);
        for flag in FLAGS {
            assert!(attrs.contains_key(*flag), "missing {}", flag);
        }
        assert_eq!(attrs["caching"], Value::Bool(true));
        assert_eq!(attrs["http_port"], Value::List(vec![Value::Int(80)]));
    }

    #[test]
    fn schema_checks_ports() {
        let resource = Resource::new(TYPE_NAME, "site")
            .with_attribute("name", "site")
            .with_attribute("http_port", Value::List(vec![Value::Int(70000)]));
        assert!(
            EdgeApplicationMainSetting
                .schema()
                .validate(&resource.attributes)
                .is_err()
        );
    }
}
