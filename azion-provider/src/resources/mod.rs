//! Resource handlers
//!
//! Each submodule implements one resource type: its schema, the mapping
//! between attributes and API bodies, and the CRUD/import calls.
//! Composite identifiers (e.g. `appID/phase/ruleID`) use the same format
//! as the import ID, so importing only validates the ID and reads.

pub mod digital_certificate;
pub mod dns_dnssec;
pub mod dns_record;
pub mod dns_zone;
pub mod domain;
pub mod edge_application;
pub mod edge_application_cache_setting;
pub mod edge_application_function_instance;
pub mod edge_application_origin;
pub mod edge_application_rule_engine;
pub mod edge_firewall;
pub mod edge_firewall_function_instance;
pub mod edge_firewall_rule_engine;
pub mod edge_function;
pub mod environment_variable;
pub mod network_list;
pub mod waf_rule_set;

use async_trait::async_trait;
use azion_core::provider::{ProviderError, ProviderResult, ResourceType};
use azion_core::resource::{Resource, ResourceId, State};
use azion_core::schema::ResourceSchema;

use crate::client::{ApiClient, ApiError, ApiResult};
use crate::utils::parse_import_id;

/// One managed resource type
#[async_trait]
pub trait ResourceHandler: Send + Sync {
    fn type_name(&self) -> &'static str;

    fn schema(&self) -> ResourceSchema;

    /// Shape of the identifier, e.g. `<zone_id>/<record_id>`
    fn identifier_format(&self) -> &'static str;

    async fn create(&self, client: &ApiClient, resource: &Resource) -> ProviderResult<State>;

    /// Returns `State::not_found` when the remote object is gone
    async fn read(
        &self,
        client: &ApiClient,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<State>;

    async fn update(
        &self,
        client: &ApiClient,
        id: &ResourceId,
        identifier: &str,
        from: &State,
        to: &Resource,
    ) -> ProviderResult<State>;

    async fn delete(&self, client: &ApiClient, id: &ResourceId, identifier: &str)
    -> ProviderResult<()>;

    /// Validate a user-supplied import ID and turn it into an identifier
    fn import_identifier(&self, import_id: &str) -> ProviderResult<String> {
        Ok(parse_import_id(import_id, self.identifier_format())?.join("/"))
    }
}

/// All resource handlers served by the provider
pub fn handlers() -> Vec<Box<dyn ResourceHandler>> {
    vec![
        Box::new(dns_zone::DnsZone),
        Box::new(dns_record::DnsRecord),
        Box::new(dns_dnssec::DnsDnssec),
        Box::new(edge_application::EdgeApplicationMainSetting),
        Box::new(edge_application_origin::EdgeApplicationOrigin),
        Box::new(edge_application_cache_setting::EdgeApplicationCacheSetting),
        Box::new(edge_application_rule_engine::EdgeApplicationRuleEngine),
        Box::new(edge_application_function_instance::EdgeApplicationFunctionInstance),
        Box::new(edge_function::EdgeFunction),
        Box::new(domain::Domain),
        Box::new(edge_firewall::EdgeFirewallMainSetting),
        Box::new(edge_firewall_rule_engine::EdgeFirewallRuleEngine),
        Box::new(edge_firewall_function_instance::EdgeFirewallFunctionInstance),
        Box::new(waf_rule_set::WafRuleSet),
        Box::new(network_list::NetworkList),
        Box::new(environment_variable::EnvironmentVariable),
        Box::new(digital_certificate::DigitalCertificate),
    ]
}

/// Static description of a handler, exposed to the host
pub struct SchemaType {
    name: &'static str,
    schema: ResourceSchema,
}

impl SchemaType {
    pub fn new(name: &'static str, schema: ResourceSchema) -> Self {
        Self { name, schema }
    }
}

impl ResourceType for SchemaType {
    fn name(&self) -> &'static str {
        self.name
    }

    fn schema(&self) -> ResourceSchema {
        self.schema.clone()
    }
}

// =============================================================================
// Helpers shared by handlers
// =============================================================================

/// Map an API error onto a diagnostic for one resource
pub(crate) fn api_error(id: &ResourceId) -> impl Fn(ApiError) -> ProviderError + '_ {
    move |e| ProviderError::from(e).for_resource(id.clone())
}

/// Turn a 404 into `None` so read can report the object as gone
pub(crate) fn found<T>(id: &ResourceId, result: ApiResult<T>) -> ProviderResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => {
            log::info!("{} no longer exists remotely", id);
            Ok(None)
        }
        Err(e) => Err(api_error(id)(e)),
    }
}

/// Split an identifier into its segments, reporting against the resource
pub(crate) fn segments(
    id: &ResourceId,
    identifier: &str,
    format: &str,
) -> ProviderResult<Vec<String>> {
    parse_import_id(identifier, format).map_err(|e| e.for_resource(id.clone()))
}

/// Parse one numeric identifier segment
pub(crate) fn numeric(id: &ResourceId, field: &str, raw: &str) -> ProviderResult<i64> {
    crate::utils::atoi(field, raw).map_err(|e| e.for_resource(id.clone()))
}

/// Parse a `<parent>/<child>` identifier where both halves are numeric
pub(crate) fn numeric_pair(
    id: &ResourceId,
    identifier: &str,
    format: &str,
) -> ProviderResult<(i64, i64)> {
    let parts = segments(id, identifier, format)?;
    let mut names = format.split('/').map(|s| s.trim_matches(|c| c == '<' || c == '>'));
    let parent = numeric(id, names.next().unwrap_or("identifier"), &parts[0])?;
    let child = numeric(id, names.next().unwrap_or("identifier"), &parts[1])?;
    Ok((parent, child))
}
