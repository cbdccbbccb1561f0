//! azion_environment_variables
//!
//! The variables API returns every variable in one unpaged response.

use async_trait::async_trait;
use azion_core::provider::ProviderResult;
use azion_core::resource::{Resource, State};
use azion_core::schema::{AttributeSchema, AttributeType, ResourceSchema};

use super::{DataSourceHandler, computed_fields};
use crate::attrs::AttrsBuilder;
use crate::client::ApiClient;
use crate::resources::{api_error, environment_variable};

pub const TYPE_NAME: &str = "azion_environment_variables";

pub struct EnvironmentVariables;

#[async_trait]
impl DataSourceHandler for EnvironmentVariables {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> ResourceSchema {
        ResourceSchema::new(TYPE_NAME)
            .attribute(AttributeSchema::new("counter", AttributeType::Int).computed())
            .attribute(
                AttributeSchema::new(
                    "results",
                    AttributeType::List(Box::new(AttributeType::Object(computed_fields(
                        environment_variable::variable_attributes(),
                    )))),
                )
                .computed(),
            )
            .with_description("Environment variables of the account; secret values are omitted")
    }

    async fn read(&self, client: &ApiClient, resource: &Resource) -> ProviderResult<State> {
        let variables = client
            .list_variables()
            .await
            .map_err(api_error(&resource.id))?;
        let results = variables.iter().map(environment_variable::flatten).collect();

        let mut attrs = resource.attributes.clone();
        attrs.extend(
            AttrsBuilder::new()
                .set("counter", variables.len() as i64)
                .blocks("results", results)
                .build(),
        );
        Ok(State::existing(resource.id.clone(), attrs))
    }
}
