//! azion_edge_function

use async_trait::async_trait;
use azion_core::provider::ProviderResult;
use azion_core::resource::{Attributes, Resource, ResourceId, State};
use azion_core::schema::{AttributeSchema, AttributeType, ResourceSchema, types};

use super::{ResourceHandler, api_error, found, numeric};
use crate::api::edge_function::{EdgeFunction as ApiEdgeFunction, EdgeFunctionRequest};
use crate::attrs::{Attrs, AttrsBuilder};
use crate::client::ApiClient;
use crate::utils::{json_string_to_object, preserve_json_string};

pub const TYPE_NAME: &str = "azion_edge_function";
const FORMAT: &str = "<edge_function_id>";

pub const LANGUAGES: &[&str] = &["javascript"];
pub const INITIATOR_TYPES: &[&str] = &["edge_application", "edge_firewall"];

pub struct EdgeFunction;

pub(crate) fn function_attributes() -> Vec<AttributeSchema> {
    vec![
        AttributeSchema::new("id", AttributeType::Int).computed(),
        AttributeSchema::new("name", AttributeType::String).required(),
        AttributeSchema::new("code", AttributeType::String)
            .required()
            .with_description("Function source code"),
        AttributeSchema::new("language", AttributeType::enumeration(LANGUAGES))
            .with_default("javascript".into()),
        AttributeSchema::new("initiator_type", AttributeType::enumeration(INITIATOR_TYPES))
            .optional_computed()
            .requires_replace(),
        AttributeSchema::new("active", AttributeType::Bool).with_default(true.into()),
        AttributeSchema::new("json_args", types::json_string()).with_default("{}".into()),
        AttributeSchema::new("function_to_run", AttributeType::String).computed(),
        AttributeSchema::new("last_editor", AttributeType::String).computed(),
        AttributeSchema::new("modified", AttributeType::String).computed(),
        AttributeSchema::new("reference_count", AttributeType::Int).computed(),
        AttributeSchema::new("is_proprietary_code", AttributeType::Bool).computed(),
    ]
}

fn expand(resource: &Resource) -> ProviderResult<EdgeFunctionRequest> {
    let attrs = Attrs::new(resource);
    let json_args = json_string_to_object("json_args", &attrs.str("json_args").unwrap_or_default())
        .map_err(|e| e.for_resource(resource.id.clone()))?;
    Ok(EdgeFunctionRequest {
        name: attrs.required_str("name")?,
        code: attrs.required_str("code")?,
        active: attrs.bool_or("active", true),
        json_args,
        language: Some(attrs.str("language").unwrap_or_else(|| "javascript".to_string())),
        initiator_type: attrs.str("initiator_type"),
    })
}

/// State attributes; `configured_args` keeps the user's JSON formatting when equivalent
pub(crate) fn flatten(function: &ApiEdgeFunction, configured_args: Option<&str>) -> Attributes {
    AttrsBuilder::new()
        .set("id", function.id)
        .set("name", function.name.as_str())
        .set("code", function.code.as_str())
        .set_nonempty("language", &function.language)
        .set_nonempty("initiator_type", &function.initiator_type)
        .set("active", function.active)
        .set(
            "json_args",
            preserve_json_string(configured_args, &function.json_args),
        )
        .set_nonempty("function_to_run", &function.function_to_run)
        .set_nonempty("last_editor", &function.last_editor)
        .set_nonempty("modified", &function.modified)
        .set("reference_count", function.reference_count)
        .set("is_proprietary_code", function.is_proprietary_code)
        .build()
}

fn to_state(id: &ResourceId, function: &ApiEdgeFunction, config: Option<&Resource>) -> State {
    let configured_args = config
        .and_then(|r| r.get("json_args"))
        .and_then(|v| v.as_str());
    State::existing(id.clone(), flatten(function, configured_args))
        .with_identifier(function.id.to_string())
}

#[async_trait]
impl ResourceHandler for EdgeFunction {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> ResourceSchema {
        function_attributes()
            .into_iter()
            .fold(ResourceSchema::new(TYPE_NAME), ResourceSchema::attribute)
            .with_description("Edge function code and default arguments")
    }

    fn identifier_format(&self) -> &'static str {
        FORMAT
    }

    async fn create(&self, client: &ApiClient, resource: &Resource) -> ProviderResult<State> {
        let request = expand(resource)?;
        let function = client
            .create_edge_function(&request)
            .await
            .map_err(api_error(&resource.id))?;
        log::info!("Created edge function {} ({})", function.id, function.name);
        Ok(to_state(&resource.id, &function, Some(resource)))
    }

    async fn read(
        &self,
        client: &ApiClient,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<State> {
        let function_id = numeric(id, "edge_function_id", identifier)?;
        Ok(match found(id, client.get_edge_function(function_id).await)? {
            Some(function) => to_state(id, &function, None),
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
        let function_id = numeric(id, "edge_function_id", identifier)?;
        let request = expand(to)?;
        let function = client
            .update_edge_function(function_id, &request)
            .await
            .map_err(api_error(id))?;
        Ok(to_state(id, &function, Some(to)))
    }

    async fn delete(
        &self,
        client: &ApiClient,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<()> {
        let function_id = numeric(id, "edge_function_id", identifier)?;
        client
            .delete_edge_function(function_id)
            .await
            .map_err(api_error(id))
    }
}
