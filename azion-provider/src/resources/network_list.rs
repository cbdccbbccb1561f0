//! azion_network_list

use async_trait::async_trait;
use azion_core::provider::ProviderResult;
use azion_core::resource::{Attributes, Resource, ResourceId, State};
use azion_core::schema::{AttributeSchema, AttributeType, ResourceSchema};

use super::{ResourceHandler, api_error, found, numeric};
use crate::api::network_list::{NetworkList as ApiNetworkList, NetworkListRequest};
use crate::attrs::{Attrs, AttrsBuilder};
use crate::client::ApiClient;
use crate::utils::{atoi, json_scalar_to_string};

pub const TYPE_NAME: &str = "azion_network_list";
const FORMAT: &str = "<network_list_id>";

pub const LIST_TYPES: &[&str] = &["ip_cidr", "asn", "countries"];

pub struct NetworkList;

pub(crate) fn network_list_attributes() -> Vec<AttributeSchema> {
    vec![
        AttributeSchema::new("id", AttributeType::Int).computed(),
        AttributeSchema::new("name", AttributeType::String).required(),
        AttributeSchema::new("list_type", AttributeType::enumeration(LIST_TYPES))
            .required()
            .requires_replace(),
        AttributeSchema::new(
            "items_values",
            AttributeType::Set(Box::new(AttributeType::String)),
        )
        .required()
        .with_description("CIDRs, AS numbers or ISO country codes, by list_type"),
        AttributeSchema::new("last_editor", AttributeType::String).computed(),
        AttributeSchema::new("last_modified", AttributeType::String).computed(),
    ]
}

/// AS numbers are sent as integers, every other list type as strings
fn items_to_wire(list_type: &str, items: &[String]) -> ProviderResult<Vec<serde_json::Value>> {
    if list_type == "asn" {
        items
            .iter()
            .map(|item| -> ProviderResult<serde_json::Value> {
                Ok(atoi("items_values", item)?.into())
            })
            .collect()
    } else {
        Ok(items
            .iter()
            .map(|item| serde_json::Value::String(item.clone()))
            .collect())
    }
}

fn expand(resource: &Resource) -> ProviderResult<NetworkListRequest> {
    let attrs = Attrs::new(resource);
    let list_type = attrs.required_str("list_type")?;
    let items = attrs.strings("items_values").unwrap_or_default();
    let items_values =
        items_to_wire(&list_type, &items).map_err(|e| e.for_resource(resource.id.clone()))?;
    Ok(NetworkListRequest {
        name: attrs.required_str("name")?,
        list_type,
        items_values,
    })
}

pub(crate) fn flatten(list: &ApiNetworkList) -> Attributes {
    let items: Vec<String> = list.items_values.iter().map(json_scalar_to_string).collect();
    AttrsBuilder::new()
        .set("id", list.id)
        .set("name", list.name.as_str())
        .set("list_type", list.list_type.as_str())
        .strings("items_values", &items)
        .set_nonempty("last_editor", &list.last_editor)
        .set_nonempty("last_modified", &list.last_modified)
        .build()
}

fn to_state(id: &ResourceId, list: &ApiNetworkList) -> State {
    State::existing(id.clone(), flatten(list)).with_identifier(list.id.to_string())
}

#[async_trait]
impl ResourceHandler for NetworkList {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> ResourceSchema {
        network_list_attributes()
            .into_iter()
            .fold(ResourceSchema::new(TYPE_NAME), ResourceSchema::attribute)
            .with_description("Reusable list of networks, AS numbers or countries")
    }

    fn identifier_format(&self) -> &'static str {
        FORMAT
    }

    async fn create(&self, client: &ApiClient, resource: &Resource) -> ProviderResult<State> {
        let request = expand(resource)?;
        let list = client
            .create_network_list(&request)
            .await
            .map_err(api_error(&resource.id))?;
        log::info!(
            "Created network list {} with {} items",
            list.id,
            list.items_values.len()
        );
        Ok(to_state(&resource.id, &list))
    }

    async fn read(
        &self,
        client: &ApiClient,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<State> {
        let list_id = numeric(id, "network_list_id", identifier)?;
        Ok(match found(id, client.get_network_list(list_id).await)? {
            Some(list) => to_state(id, &list),
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
        let list_id = numeric(id, "network_list_id", identifier)?;
        let request = expand(to)?;
        let list = client
            .update_network_list(list_id, &request)
            .await
            .map_err(api_error(id))?;
        Ok(to_state(id, &list))
    }

    async fn delete(
        &self,
        client: &ApiClient,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<()> {
        let list_id = numeric(id, "network_list_id", identifier)?;
        client
            .delete_network_list(list_id)
            .await
            .map_err(api_error(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use azion_core::resource::Value;
    use serde_json::json;

    fn list(list_type: &str, items: &[&str]) -> Resource {
        Resource::new(TYPE_NAME, "blocked")
            .with_attribute("name", "blocked")
            .with_attribute("list_type", list_type)
            .with_attribute(
                "items_values",
                Value::List(items.iter().map(|i| Value::from(*i)).collect()),
            )
    }

    #[test]
    fn asn_items_are_sent_as_numbers() {
        let request = expand(&list("asn", &["1234", "5678"])).unwrap();
        assert_eq!(request.items_values, vec![json!(1234), json!(5678)]);
        assert!(expand(&list("asn", &["AS1234"])).is_err());
    }

    #[test]
    fn cidr_items_stay_strings() {
        let request = expand(&list("ip_cidr", &["192.0.2.0/24"])).unwrap();
        assert_eq!(request.items_values, vec![json!("192.0.2.0/24")]);
    }

    #[test]
    fn flatten_numbers_as_strings() {
        let remote = ApiNetworkList {
            id: 3,
            name: "blocked".to_string(),
            list_type: "asn".to_string(),
            items_values: vec![json!(1234)],
            ..Default::default()
        };
        let attrs = flatten(&remote);
        assert_eq!(attrs["items_values"], Value::List(vec![Value::from("1234")]));
    }
}
