//! azion_edge_application_cache_setting

use async_trait::async_trait;
use azion_core::provider::{ProviderError, ProviderResult};
use azion_core::resource::{Attributes, Resource, ResourceId, State};
use azion_core::schema::{AttributeSchema, AttributeType, ResourceSchema, types};

use super::{ResourceHandler, api_error, found, numeric_pair};
use crate::api::edge_application::{CacheSetting, CacheSettingRequest};
use crate::attrs::{Attrs, AttrsBuilder};
use crate::client::ApiClient;

pub const TYPE_NAME: &str = "azion_edge_application_cache_setting";
const FORMAT: &str = "<edge_application_id>/<cache_setting_id>";

pub const CACHE_POLICIES: &[&str] = &["honor", "override"];
pub const QUERY_STRING_MODES: &[&str] = &["ignore", "whitelist", "blacklist", "all"];
pub const COOKIE_MODES: &[&str] = &["ignore", "whitelist", "blacklist", "all"];
pub const ADAPTIVE_DELIVERY_ACTIONS: &[&str] = &["ignore", "whitelist"];

pub struct EdgeApplicationCacheSetting;

fn expand(resource: &Resource) -> ProviderResult<CacheSettingRequest> {
    let attrs = Attrs::new(resource);

    let browser = attrs.str("browser_cache_settings");
    let browser_ttl = attrs.int("browser_cache_settings_maximum_ttl");
    if browser.as_deref() == Some("override") && browser_ttl.is_none() {
        return Err(ProviderError::new(
            "browser_cache_settings_maximum_ttl is required when browser_cache_settings is override",
        )
        .for_resource(resource.id.clone()));
    }

    Ok(CacheSettingRequest {
        name: attrs.required_str("name")?,
        browser_cache_settings: browser,
        browser_cache_settings_maximum_ttl: browser_ttl,
        cdn_cache_settings: attrs.str("cdn_cache_settings"),
        cdn_cache_settings_maximum_ttl: attrs.int("cdn_cache_settings_maximum_ttl"),
        cache_by_query_string: attrs.str("cache_by_query_string"),
        query_string_fields: attrs.strings("query_string_fields"),
        enable_query_string_sort: attrs.bool("enable_query_string_sort"),
        cache_by_cookies: attrs.str("cache_by_cookies"),
        cookie_names: attrs.strings("cookie_names"),
        adaptive_delivery_action: attrs.str("adaptive_delivery_action"),
        device_group: attrs.ints("device_group"),
        enable_caching_for_post: attrs.bool("enable_caching_for_post"),
        enable_caching_for_options: attrs.bool("enable_caching_for_options"),
        enable_stale_cache: attrs.bool("enable_stale_cache"),
        l2_caching_enabled: attrs.bool("l2_caching_enabled"),
        is_slice_configuration_enabled: attrs.bool("is_slice_configuration_enabled"),
        is_slice_edge_caching_enabled: attrs.bool("is_slice_edge_caching_enabled"),
        slice_configuration_range: attrs.int("slice_configuration_range"),
    })
}

fn flatten(cache: &CacheSetting) -> Attributes {
    AttrsBuilder::new()
        .set("cache_setting_id", cache.id)
        .set("name", cache.name.as_str())
        .set_nonempty("browser_cache_settings", &cache.browser_cache_settings)
        .set(
            "browser_cache_settings_maximum_ttl",
            cache.browser_cache_settings_maximum_ttl,
        )
        .set_nonempty("cdn_cache_settings", &cache.cdn_cache_settings)
        .set(
            "cdn_cache_settings_maximum_ttl",
            cache.cdn_cache_settings_maximum_ttl,
        )
        .set_nonempty("cache_by_query_string", &cache.cache_by_query_string)
        .strings("query_string_fields", &cache.query_string_fields)
        .set("enable_query_string_sort", cache.enable_query_string_sort)
        .set_nonempty("cache_by_cookies", &cache.cache_by_cookies)
        .strings("cookie_names", &cache.cookie_names)
        .set_nonempty("adaptive_delivery_action", &cache.adaptive_delivery_action)
        .ints("device_group", &cache.device_group)
        .set("enable_caching_for_post", cache.enable_caching_for_post)
        .set("enable_caching_for_options", cache.enable_caching_for_options)
        .set("enable_stale_cache", cache.enable_stale_cache)
        .set("l2_caching_enabled", cache.l2_caching_enabled)
        .set(
            "is_slice_configuration_enabled",
            cache.is_slice_configuration_enabled,
        )
        .set(
            "is_slice_edge_caching_enabled",
            cache.is_slice_edge_caching_enabled,
        )
        .set("slice_configuration_range", cache.slice_configuration_range)
        .build()
}

fn to_state(id: &ResourceId, app_id: i64, cache: &CacheSetting) -> State {
    let mut attrs = flatten(cache);
    attrs.insert("edge_application_id".to_string(), app_id.into());
    State::existing(id.clone(), attrs).with_identifier(format!("{}/{}", app_id, cache.id))
}

#[async_trait]
impl ResourceHandler for EdgeApplicationCacheSetting {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> ResourceSchema {
        let strings = || AttributeType::List(Box::new(AttributeType::String));
        let flag = |name: &str| AttributeSchema::new(name, AttributeType::Bool).optional_computed();
        let ttl = |name: &str| AttributeSchema::new(name, AttributeType::Int).optional_computed();

        ResourceSchema::new(TYPE_NAME)
            .with_description("Cache setting of an edge application")
            .attribute(
                AttributeSchema::new("edge_application_id", types::positive_int())
                    .required()
                    .requires_replace(),
            )
            .attribute(AttributeSchema::new("cache_setting_id", AttributeType::Int).computed())
            .attribute(AttributeSchema::new("name", AttributeType::String).required())
            .attribute(
                AttributeSchema::new(
                    "browser_cache_settings",
                    AttributeType::enumeration(CACHE_POLICIES),
                )
                .optional_computed(),
            )
            .attribute(ttl("browser_cache_settings_maximum_ttl"))
            .attribute(
                AttributeSchema::new(
                    "cdn_cache_settings",
                    AttributeType::enumeration(CACHE_POLICIES),
                )
                .optional_computed(),
            )
            .attribute(ttl("cdn_cache_settings_maximum_ttl"))
            .attribute(
                AttributeSchema::new(
                    "cache_by_query_string",
                    AttributeType::enumeration(QUERY_STRING_MODES),
                )
                .optional_computed(),
            )
            .attribute(AttributeSchema::new("query_string_fields", strings()).optional_computed())
            .attribute(flag("enable_query_string_sort"))
            .attribute(
                AttributeSchema::new("cache_by_cookies", AttributeType::enumeration(COOKIE_MODES))
                    .optional_computed(),
            )
            .attribute(AttributeSchema::new("cookie_names", strings()).optional_computed())
            .attribute(
                AttributeSchema::new(
                    "adaptive_delivery_action",
                    AttributeType::enumeration(ADAPTIVE_DELIVERY_ACTIONS),
                )
                .optional_computed(),
            )
            .attribute(
                AttributeSchema::new("device_group", types::identifier_list()).optional_computed(),
            )
            .attribute(flag("enable_caching_for_post"))
            .attribute(flag("enable_caching_for_options"))
            .attribute(flag("enable_stale_cache"))
            .attribute(flag("l2_caching_enabled"))
            .attribute(flag("is_slice_configuration_enabled"))
            .attribute(flag("is_slice_edge_caching_enabled"))
            .attribute(ttl("slice_configuration_range"))
    }

    fn identifier_format(&self) -> &'static str {
        FORMAT
    }

    async fn create(&self, client: &ApiClient, resource: &Resource) -> ProviderResult<State> {
        let app_id = Attrs::new(resource).required_int("edge_application_id")?;
        let request = expand(resource)?;
        let cache = client
            .create_cache_setting(app_id, &request)
            .await
            .map_err(api_error(&resource.id))?;
        Ok(to_state(&resource.id, app_id, &cache))
    }

    async fn read(
        &self,
        client: &ApiClient,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<State> {
        let (app_id, cache_id) = numeric_pair(id, identifier, FORMAT)?;
        Ok(
            match found(id, client.get_cache_setting(app_id, cache_id).await)? {
                Some(cache) => to_state(id, app_id, &cache),
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
        let (app_id, cache_id) = numeric_pair(id, identifier, FORMAT)?;
        let request = expand(to)?;
        let cache = client
            .update_cache_setting(app_id, cache_id, &request)
            .await
            .map_err(api_error(id))?;
        Ok(to_state(id, app_id, &cache))
    }

    async fn delete(
        &self,
        client: &ApiClient,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<()> {
        let (app_id, cache_id) = numeric_pair(id, identifier, FORMAT)?;
        client
            .delete_cache_setting(app_id, cache_id)
            .await
            .map_err(api_error(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use azion_core::resource::Value;

    #[test]
    fn override_requires_ttl() {
        let resource = Resource::new(TYPE_NAME, "static")
            .with_attribute("edge_application_id", 10_i64)
            .with_attribute("name", "static")
            .with_attribute("browser_cache_settings", "override");
        assert!(expand(&resource).is_err());

        let resource = resource.with_attribute("browser_cache_settings_maximum_ttl", 600_i64);
        let request = expand(&resource).unwrap();
        assert_eq!(request.browser_cache_settings_maximum_ttl, Some(600));
        assert_eq!(request.cdn_cache_settings, None);
    }

    #[test]
    fn flatten_uses_cache_setting_id() {
        let cache = CacheSetting {
            id: 33,
            name: "static".to_string(),
            cookie_names: vec!["session".to_string()],
            ..Default::default()
        };
        let state = to_state(&ResourceId::new(TYPE_NAME, "static"), 10, &cache);
        assert_eq!(state.identifier.as_deref(), Some("10/33"));
        assert_eq!(state.attributes["cache_setting_id"], Value::Int(33));
        assert_eq!(
            state.attributes["cookie_names"],
            Value::List(vec![Value::from("session")])
        );
    }
}
