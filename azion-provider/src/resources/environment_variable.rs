//! azion_environment_variable
//!
//! Variables are served by a separate API and identified by UUID.
//! Secret values come back masked, so state keeps the configured value.

use std::sync::LazyLock;

use async_trait::async_trait;
use azion_core::provider::ProviderResult;
use azion_core::resource::{Attributes, Resource, ResourceId, State, Value};
use azion_core::schema::{AttributeSchema, AttributeType, ResourceSchema};
use regex::Regex;

use super::{ResourceHandler, api_error, found};
use crate::api::variable::{Variable, VariableRequest};
use crate::attrs::{Attrs, AttrsBuilder};
use crate::client::ApiClient;

pub const TYPE_NAME: &str = "azion_environment_variable";
const FORMAT: &str = "<uuid>";

static KEY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid variable key pattern")
});

pub struct EnvironmentVariable;

fn variable_key() -> AttributeType {
    AttributeType::Custom {
        name: "VariableKey".to_string(),
        base: Box::new(AttributeType::String),
        validate: |value| match value {
            Value::String(s) if KEY_PATTERN.is_match(s) => Ok(()),
            Value::String(s) => Err(format!(
                "Invalid variable key '{}': use letters, digits and underscores, not starting with a digit",
                s
            )),
            _ => Err("Expected string".to_string()),
        },
    }
}

pub(crate) fn variable_attributes() -> Vec<AttributeSchema> {
    vec![
        AttributeSchema::new("uuid", AttributeType::String).computed(),
        AttributeSchema::new("key", variable_key()).required(),
        AttributeSchema::new("value", AttributeType::String)
            .required()
            .sensitive(),
        AttributeSchema::new("secret", AttributeType::Bool)
            .with_default(false.into())
            .requires_replace(),
        AttributeSchema::new("last_editor", AttributeType::String).computed(),
        AttributeSchema::new("created_at", AttributeType::String).computed(),
        AttributeSchema::new("updated_at", AttributeType::String).computed(),
    ]
}

fn expand(resource: &Resource) -> ProviderResult<VariableRequest> {
    let attrs = Attrs::new(resource);
    Ok(VariableRequest {
        key: attrs.required_str("key")?,
        value: attrs.required_str("value")?,
        secret: attrs.bool_or("secret", false),
    })
}

/// Masked secret values are left out
pub(crate) fn flatten(variable: &Variable) -> Attributes {
    let builder = AttrsBuilder::new()
        .set("uuid", variable.uuid.as_str())
        .set("key", variable.key.as_str())
        .set("secret", variable.secret)
        .set_nonempty("last_editor", &variable.last_editor)
        .set_nonempty("created_at", &variable.created_at)
        .set_nonempty("updated_at", &variable.updated_at);
    if variable.secret {
        builder.build()
    } else {
        builder.set("value", variable.value.as_str()).build()
    }
}

fn to_state(id: &ResourceId, variable: &Variable, config: Option<&Resource>) -> State {
    let mut attrs = flatten(variable);
    if variable.secret {
        if let Some(value) = config.and_then(|r| r.get("value")) {
            attrs.insert("value".to_string(), value.clone());
        }
    }
    State::existing(id.clone(), attrs).with_identifier(variable.uuid.as_str())
}

#[async_trait]
impl ResourceHandler for EnvironmentVariable {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> ResourceSchema {
        variable_attributes()
            .into_iter()
            .fold(ResourceSchema::new(TYPE_NAME), ResourceSchema::attribute)
            .with_description("Environment variable available to edge functions")
    }

    fn identifier_format(&self) -> &'static str {
        FORMAT
    }

    async fn create(&self, client: &ApiClient, resource: &Resource) -> ProviderResult<State> {
        let request = expand(resource)?;
        let variable = client
            .create_variable(&request)
            .await
            .map_err(api_error(&resource.id))?;
        log::info!("Created environment variable {} ({})", variable.key, variable.uuid);
        Ok(to_state(&resource.id, &variable, Some(resource)))
    }

    async fn read(
        &self,
        client: &ApiClient,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<State> {
        Ok(match found(id, client.get_variable(identifier).await)? {
            Some(variable) => to_state(id, &variable, None),
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
        let request = expand(to)?;
        let variable = client
            .update_variable(identifier, &request)
            .await
            .map_err(api_error(id))?;
        Ok(to_state(id, &variable, Some(to)))
    }

    async fn delete(
        &self,
        client: &ApiClient,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<()> {
        client
            .delete_variable(identifier)
            .await
            .map_err(api_error(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_validation() {
        let t = variable_key();
        assert!(t.validate(&Value::from("API_KEY")).is_ok());
        assert!(t.validate(&Value::from("_private2")).is_ok());
        assert!(t.validate(&Value::from("2FAST")).is_err());
        assert!(t.validate(&Value::from("with-dash")).is_err());
    }

    #[test]
    fn secret_value_comes_from_config() {
        let resource = Resource::new(TYPE_NAME, "token")
            .with_attribute("key", "API_TOKEN")
            .with_attribute("value", "hunter2")
            .with_attribute("secret", true);
        let remote = Variable {
            uuid: "6f1c0c3e-0000-4000-8000-000000000001".to_string(),
            key: "API_TOKEN".to_string(),
            value: "********".to_string(),
            secret: true,
            ..Default::default()
        };

        let state = to_state(&resource.id, &remote, Some(&resource));
        assert_eq!(state.attributes["value"], Value::from("hunter2"));
        assert_eq!(
            state.identifier.as_deref(),
            Some("6f1c0c3e-0000-4000-8000-000000000001")
        );

        let read_back = to_state(&resource.id, &remote, None);
        assert!(!read_back.attributes.contains_key("value"));
    }

    #[test]
    fn plain_value_is_read_back() {
        let remote = Variable {
            uuid: "u".to_string(),
            key: "MODE".to_string(),
            value: "production".to_string(),
            ..Default::default()
        };
        let attrs = flatten(&remote);
        assert_eq!(attrs["value"], Value::from("production"));
    }
}
