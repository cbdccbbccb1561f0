//! azion_intelligent_dns_records
//!
//! The record list nests the records of one zone under `results`, next to
//! the zone's own ID and domain.

use async_trait::async_trait;
use azion_core::provider::ProviderResult;
use azion_core::resource::{Resource, State, Value};
use azion_core::schema::{AttributeSchema, AttributeType, ResourceSchema, types};

use super::{DataSourceHandler, computed_fields, page_query, page_state, paging_attributes};
use crate::attrs::Attrs;
use crate::client::ApiClient;
use crate::resources::{api_error, dns_record};

pub const TYPE_NAME: &str = "azion_intelligent_dns_records";

pub struct DnsRecords;

#[async_trait]
impl DataSourceHandler for DnsRecords {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> ResourceSchema {
        paging_attributes(ResourceSchema::new(TYPE_NAME))
            .attribute(AttributeSchema::new("zone_id", types::positive_int()).required())
            .attribute(AttributeSchema::new("zone_domain", AttributeType::String).computed())
            .attribute(
                AttributeSchema::new(
                    "results",
                    AttributeType::List(Box::new(AttributeType::Object(computed_fields(
                        dns_record::record_attributes(),
                    )))),
                )
                .computed(),
            )
            .with_description("Records of one Intelligent DNS zone")
    }

    async fn read(&self, client: &ApiClient, resource: &Resource) -> ProviderResult<State> {
        let zone_id = Attrs::new(resource).required_int("zone_id")?;
        let query = page_query(resource);
        let page = client
            .list_records(zone_id, query)
            .await
            .map_err(api_error(&resource.id))?;
        log::debug!(
            "zone {}: {} of {} records",
            zone_id,
            page.results.records.len(),
            page.count
        );

        let results = page
            .results
            .records
            .iter()
            .map(|record| {
                let mut attrs = dns_record::flatten(record);
                attrs.insert("zone_id".to_string(), Value::Int(zone_id));
                attrs
            })
            .collect();
        let mut state = page_state(resource, query, page.count, page.total_pages, results);
        if !page.results.zone_domain.is_empty() {
            state.attributes.insert(
                "zone_domain".to_string(),
                Value::String(page.results.zone_domain),
            );
        }
        Ok(state.with_identifier(zone_id.to_string()))
    }
}
