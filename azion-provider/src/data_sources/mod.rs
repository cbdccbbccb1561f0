//! Data sources
//!
//! Read-only views over the API. Paged lists share `PagedList`, single
//! objects share `SingleObject`; both reuse the flatten mapping of the
//! matching resource. The remaining modules cover lists with their own shape.

pub mod dns_records;
pub mod environment_variables;

use async_trait::async_trait;
use azion_core::provider::{BoxFuture, ProviderResult};
use azion_core::resource::{Attributes, Resource, State, Value};
use azion_core::schema::{AttributeSchema, AttributeType, ResourceSchema, types};

use crate::api::digital_certificate::DigitalCertificate;
use crate::api::dns::{Dnssec, Zone};
use crate::api::domain::Domain;
use crate::api::edge_application::EdgeApplication;
use crate::api::edge_firewall::EdgeFirewall;
use crate::api::edge_function::EdgeFunction;
use crate::api::network_list::NetworkList;
use crate::api::waf::WafRuleSet;
use crate::api::{Page, PageQuery};
use crate::attrs::{Attrs, AttrsBuilder};
use crate::client::{ApiClient, ApiResult};
use crate::resources::{
    api_error, digital_certificate, dns_dnssec, dns_zone, domain, edge_application,
    edge_firewall, edge_function, network_list, waf_rule_set,
};

/// One read-only type
#[async_trait]
pub trait DataSourceHandler: Send + Sync {
    fn type_name(&self) -> &'static str;

    fn schema(&self) -> ResourceSchema;

    async fn read(&self, client: &ApiClient, resource: &Resource) -> ProviderResult<State>;
}

type ListFn<T> = for<'a> fn(&'a ApiClient, PageQuery) -> BoxFuture<'a, ApiResult<Page<T>>>;
type GetFn<T> = for<'a> fn(&'a ApiClient, i64) -> BoxFuture<'a, ApiResult<T>>;

/// Turn resource attribute schemas into read-only result fields
pub(crate) fn computed_fields(attributes: Vec<AttributeSchema>) -> Vec<AttributeSchema> {
    attributes
        .into_iter()
        .map(|mut a| {
            a.required = false;
            a.optional = false;
            a.computed = true;
            a.requires_replace = false;
            a.default = None;
            a
        })
        .collect()
}

/// Optional `page` / `page_size` inputs
pub(crate) fn page_query(resource: &Resource) -> PageQuery {
    let attrs = Attrs::new(resource);
    PageQuery {
        page: attrs.int("page"),
        page_size: attrs.int("page_size"),
    }
}

pub(crate) fn paging_attributes(schema: ResourceSchema) -> ResourceSchema {
    schema
        .attribute(AttributeSchema::new("page", types::positive_int()))
        .attribute(AttributeSchema::new("page_size", types::positive_int()))
        .attribute(AttributeSchema::new("counter", AttributeType::Int).computed())
        .attribute(AttributeSchema::new("total_pages", AttributeType::Int).computed())
}

/// Echo inputs and attach the paging summary
pub(crate) fn page_state(
    resource: &Resource,
    query: PageQuery,
    counter: i64,
    total_pages: i64,
    results: Vec<Attributes>,
) -> State {
    let mut attrs = resource.attributes.clone();
    attrs.extend(
        AttrsBuilder::new()
            .set_opt("page", query.page)
            .set_opt("page_size", query.page_size)
            .set("counter", counter)
            .set("total_pages", total_pages)
            .blocks("results", results)
            .build(),
    );
    State::existing(resource.id.clone(), attrs)
}

// =============================================================================
// Paged lists
// =============================================================================

pub struct PagedList<T> {
    name: &'static str,
    description: &'static str,
    fields: fn() -> Vec<AttributeSchema>,
    list: ListFn<T>,
    flatten: fn(&T) -> Attributes,
}

#[async_trait]
impl<T: Send + Sync + 'static> DataSourceHandler for PagedList<T> {
    fn type_name(&self) -> &'static str {
        self.name
    }

    fn schema(&self) -> ResourceSchema {
        paging_attributes(ResourceSchema::new(self.name))
            .attribute(
                AttributeSchema::new(
                    "results",
                    AttributeType::List(Box::new(AttributeType::Object(computed_fields(
                        (self.fields)(),
                    )))),
                )
                .computed(),
            )
            .with_description(self.description)
    }

    async fn read(&self, client: &ApiClient, resource: &Resource) -> ProviderResult<State> {
        let query = page_query(resource);
        let page = (self.list)(client, query)
            .await
            .map_err(api_error(&resource.id))?;
        log::debug!(
            "{}: {} of {} results",
            self.name,
            page.results.len(),
            page.count
        );
        let results = page.results.iter().map(self.flatten).collect();
        Ok(page_state(
            resource,
            query,
            page.count,
            page.total_pages,
            results,
        ))
    }
}

// =============================================================================
// Single objects
// =============================================================================

pub struct SingleObject<T> {
    name: &'static str,
    description: &'static str,
    /// Input attribute holding the object ID
    id_attribute: &'static str,
    fields: fn() -> Vec<AttributeSchema>,
    get: GetFn<T>,
    flatten: fn(&T) -> Attributes,
}

#[async_trait]
impl<T: Send + Sync + 'static> DataSourceHandler for SingleObject<T> {
    fn type_name(&self) -> &'static str {
        self.name
    }

    fn schema(&self) -> ResourceSchema {
        ResourceSchema::new(self.name)
            .attribute(AttributeSchema::new(self.id_attribute, types::positive_int()).required())
            .attribute(
                AttributeSchema::new(
                    "results",
                    AttributeType::Object(computed_fields((self.fields)())),
                )
                .computed(),
            )
            .with_description(self.description)
    }

    async fn read(&self, client: &ApiClient, resource: &Resource) -> ProviderResult<State> {
        let object_id = Attrs::new(resource).required_int(self.id_attribute)?;
        let object = (self.get)(client, object_id)
            .await
            .map_err(api_error(&resource.id))?;
        let mut attrs = resource.attributes.clone();
        attrs.insert("results".to_string(), Value::Map((self.flatten)(&object)));
        Ok(State::existing(resource.id.clone(), attrs).with_identifier(object_id.to_string()))
    }
}

// =============================================================================
// Registry
// =============================================================================

fn flatten_function(function: &EdgeFunction) -> Attributes {
    edge_function::flatten(function, None)
}

/// All data source handlers served by the provider
pub fn handlers() -> Vec<Box<dyn DataSourceHandler>> {
    vec![
        Box::new(PagedList::<Zone> {
            name: "azion_intelligent_dns_zones",
            description: "Intelligent DNS zones of the account",
            fields: dns_zone::zone_attributes,
            list: |c, q| Box::pin(c.list_zones(q)),
            flatten: dns_zone::flatten,
        }),
        Box::new(SingleObject::<Zone> {
            name: "azion_intelligent_dns_zone",
            description: "One Intelligent DNS zone",
            id_attribute: "id",
            fields: dns_zone::zone_attributes,
            get: |c, id| Box::pin(c.get_zone(id)),
            flatten: dns_zone::flatten,
        }),
        Box::new(dns_records::DnsRecords),
        Box::new(SingleObject::<Dnssec> {
            name: "azion_intelligent_dns_dnssec",
            description: "DNSSEC status of an Intelligent DNS zone",
            id_attribute: "zone_id",
            fields: dns_dnssec::dnssec_attributes,
            get: |c, id| Box::pin(c.get_dnssec(id)),
            flatten: dns_dnssec::flatten,
        }),
        Box::new(PagedList::<EdgeApplication> {
            name: "azion_edge_applications_main_settings",
            description: "Edge applications of the account",
            fields: edge_application::application_attributes,
            list: |c, q| Box::pin(c.list_edge_applications(q)),
            flatten: edge_application::flatten,
        }),
        Box::new(SingleObject::<EdgeApplication> {
            name: "azion_edge_application_main_settings",
            description: "Main settings of one edge application",
            id_attribute: "edge_application_id",
            fields: edge_application::application_attributes,
            get: |c, id| Box::pin(c.get_edge_application(id)),
            flatten: edge_application::flatten,
        }),
        Box::new(PagedList::<EdgeFunction> {
            name: "azion_edge_functions",
            description: "Edge functions of the account",
            fields: edge_function::function_attributes,
            list: |c, q| Box::pin(c.list_edge_functions(q)),
            flatten: flatten_function,
        }),
        Box::new(SingleObject::<EdgeFunction> {
            name: "azion_edge_function",
            description: "One edge function",
            id_attribute: "id",
            fields: edge_function::function_attributes,
            get: |c, id| Box::pin(c.get_edge_function(id)),
            flatten: flatten_function,
        }),
        Box::new(PagedList::<Domain> {
            name: "azion_domains",
            description: "Domains of the account",
            fields: domain::domain_attributes,
            list: |c, q| Box::pin(c.list_domains(q)),
            flatten: domain::flatten,
        }),
        Box::new(SingleObject::<Domain> {
            name: "azion_domain",
            description: "One domain",
            id_attribute: "id",
            fields: domain::domain_attributes,
            get: |c, id| Box::pin(c.get_domain(id)),
            flatten: domain::flatten,
        }),
        Box::new(PagedList::<EdgeFirewall> {
            name: "azion_edge_firewall_main_settings",
            description: "Edge firewalls of the account",
            fields: edge_firewall::firewall_attributes,
            list: |c, q| Box::pin(c.list_edge_firewalls(q)),
            flatten: edge_firewall::flatten,
        }),
        Box::new(PagedList::<NetworkList> {
            name: "azion_network_lists",
            description: "Network lists of the account",
            fields: network_list::network_list_attributes,
            list: |c, q| Box::pin(c.list_network_lists(q)),
            flatten: network_list::flatten,
        }),
        Box::new(SingleObject::<NetworkList> {
            name: "azion_network_list",
            description: "One network list",
            id_attribute: "id",
            fields: network_list::network_list_attributes,
            get: |c, id| Box::pin(c.get_network_list(id)),
            flatten: network_list::flatten,
        }),
        Box::new(PagedList::<WafRuleSet> {
            name: "azion_waf_rule_sets",
            description: "WAF rule sets of the account",
            fields: waf_rule_set::waf_attributes,
            list: |c, q| Box::pin(c.list_waf_rule_sets(q)),
            flatten: waf_rule_set::flatten,
        }),
        Box::new(environment_variables::EnvironmentVariables),
        Box::new(PagedList::<DigitalCertificate> {
            name: "azion_digital_certificates",
            description: "Digital certificates of the account",
            fields: digital_certificate::certificate_attributes,
            list: |c, q| Box::pin(c.list_digital_certificates(q)),
            flatten: digital_certificate::flatten,
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn data_source_names_are_unique() {
        let handlers = handlers();
        let names: HashSet<_> = handlers.iter().map(|h| h.type_name()).collect();
        assert_eq!(names.len(), handlers.len());
        assert_eq!(handlers.len(), 16);
    }

    #[test]
    fn results_are_read_only() {
        for handler in handlers() {
            let schema = handler.schema();
            let results = &schema.attributes["results"];
            assert!(results.is_read_only(), "{}", handler.type_name());
        }
    }

    #[test]
    fn computed_fields_drop_requirements() {
        let fields = computed_fields(dns_zone::zone_attributes());
        assert!(fields.iter().all(|f| f.is_read_only() && f.default.is_none()));
    }

    #[test]
    fn page_state_echoes_inputs() {
        let resource = Resource::new("azion_domains", "all")
            .with_attribute("page", 2_i64)
            .with_read_only(true);
        let query = page_query(&resource);
        assert_eq!(query.page, Some(2));
        assert_eq!(query.page_size, None);

        let state = page_state(&resource, query, 11, 2, vec![Attributes::new()]);
        assert_eq!(state.attributes["page"], Value::Int(2));
        assert_eq!(state.attributes["counter"], Value::Int(11));
        assert_eq!(state.attributes["results"].as_list().unwrap().len(), 1);
        assert!(!state.attributes.contains_key("page_size"));
    }
}
