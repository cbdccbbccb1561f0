//! azion_edge_application_edge_functions_instance

use async_trait::async_trait;
use azion_core::provider::ProviderResult;
use azion_core::resource::{Resource, ResourceId, State};
use azion_core::schema::{AttributeSchema, AttributeType, ResourceSchema, types};

use super::{ResourceHandler, api_error, found, numeric_pair};
use crate::api::edge_application::{FunctionInstance, FunctionInstanceRequest};
use crate::attrs::{Attrs, AttrsBuilder};
use crate::client::ApiClient;
use crate::utils::{json_string_to_object, preserve_json_string};

pub const TYPE_NAME: &str = "azion_edge_application_edge_functions_instance";
const FORMAT: &str = "<edge_application_id>/<instance_id>";

pub struct EdgeApplicationFunctionInstance;

fn expand(resource: &Resource) -> ProviderResult<FunctionInstanceRequest> {
    let attrs = Attrs::new(resource);
    let args = json_string_to_object("args", &attrs.str("args").unwrap_or_default())
        .map_err(|e| e.for_resource(resource.id.clone()))?;
    Ok(FunctionInstanceRequest {
        name: attrs.required_str("name")?,
        edge_function_id: attrs.required_int("edge_function_id")?,
        args,
    })
}

fn to_state(
    id: &ResourceId,
    app_id: i64,
    instance: &FunctionInstance,
    config: Option<&Resource>,
) -> State {
    let configured_args = config.and_then(|r| r.get("args")).and_then(|v| v.as_str());
    let attrs = AttrsBuilder::new()
        .set("edge_application_id", app_id)
        .set("instance_id", instance.id)
        .set("name", instance.name.as_str())
        .set("edge_function_id", instance.edge_function_id)
        .set("args", preserve_json_string(configured_args, &instance.args))
        .build();
    State::existing(id.clone(), attrs).with_identifier(format!("{}/{}", app_id, instance.id))
}

#[async_trait]
impl ResourceHandler for EdgeApplicationFunctionInstance {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> ResourceSchema {
        ResourceSchema::new(TYPE_NAME)
            .with_description("Edge function attached to an edge application")
            .attribute(
                AttributeSchema::new("edge_application_id", types::positive_int())
                    .required()
                    .requires_replace(),
            )
            .attribute(AttributeSchema::new("instance_id", AttributeType::Int).computed())
            .attribute(AttributeSchema::new("name", AttributeType::String).required())
            .attribute(AttributeSchema::new("edge_function_id", types::positive_int()).required())
            .attribute(
                AttributeSchema::new("args", types::json_string())
                    .with_default("{}".into())
                    .with_description("JSON object passed to the function"),
            )
    }

    fn identifier_format(&self) -> &'static str {
        FORMAT
    }

    async fn create(&self, client: &ApiClient, resource: &Resource) -> ProviderResult<State> {
        let app_id = Attrs::new(resource).required_int("edge_application_id")?;
        let request = expand(resource)?;
        let instance = client
            .create_function_instance(app_id, &request)
            .await
            .map_err(api_error(&resource.id))?;
        Ok(to_state(&resource.id, app_id, &instance, Some(resource)))
    }

    async fn read(
        &self,
        client: &ApiClient,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<State> {
        let (app_id, instance_id) = numeric_pair(id, identifier, FORMAT)?;
        Ok(
            match found(id, client.get_function_instance(app_id, instance_id).await)? {
                Some(instance) => to_state(id, app_id, &instance, None),
                None => State::not_found(id.clone()),
            },
        )
    }

    async fn update(
        &self,
        client: &ApiClient,
        id: &ResourceId,
        identifier: &str,
        _from: &State,
        to: &Resource,
    ) -> ProviderResult<State> {
        let (app_id, instance_id) = numeric_pair(id, identifier, FORMAT)?;
        let request = expand(to)?;
        let instance = client
            .update_function_instance(app_id, instance_id, &request)
            .await
            .map_err(api_error(id))?;
        Ok(to_state(id, app_id, &instance, Some(to)))
    }

    async fn delete(
        &self,
        client: &ApiClient,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<()> {
        let (app_id, instance_id) = numeric_pair(id, identifier, FORMAT)?;
        client
            .delete_function_instance(app_id, instance_id)
            .await
            .map_err(api_error(id))
    }
}
