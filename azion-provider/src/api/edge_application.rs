//! Edge applications: main settings, origins, cache settings,
//! rules engine and edge function instances

use serde::{Deserialize, Serialize};

use super::{Page, PageQuery, Results, null_default, one_or_many};
use crate::client::{ApiClient, ApiResult};

// =============================================================================
// Main settings
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EdgeApplication {
    #[serde(default)]
    pub id: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub delivery_protocol: String,
    #[serde(default, deserialize_with = "one_or_many")]
    pub http_port: Vec<i64>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub https_port: Vec<i64>,
    #[serde(default, deserialize_with = "null_default")]
    pub minimum_tls_version: String,
    #[serde(default, deserialize_with = "null_default")]
    pub supported_ciphers: String,
    #[serde(default)]
    pub debug_rules: bool,
    #[serde(default)]
    pub http3: bool,
    #[serde(default)]
    pub application_acceleration: bool,
    #[serde(default)]
    pub caching: bool,
    #[serde(default)]
    pub device_detection: bool,
    #[serde(default)]
    pub edge_firewall: bool,
    #[serde(default)]
    pub edge_functions: bool,
    #[serde(default)]
    pub image_optimization: bool,
    #[serde(default)]
    pub l2_caching: bool,
    #[serde(default)]
    pub load_balancer: bool,
    #[serde(default)]
    pub raw_logs: bool,
    #[serde(default)]
    pub web_application_firewall: bool,
    #[serde(default)]
    pub websocket: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EdgeApplicationRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_protocol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_port: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub https_port: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_tls_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported_ciphers: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_rules: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http3: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_acceleration: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caching: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_detection: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge_firewall: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge_functions: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_optimization: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub l2_caching: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_balancer: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_logs: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_application_firewall: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub websocket: Option<bool>,
}

// =============================================================================
// Origins
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct OriginAddress {
    #[serde(default, deserialize_with = "null_default")]
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Origin {
    #[serde(default)]
    pub origin_id: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub origin_key: String,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub origin_type: String,
    #[serde(default, deserialize_with = "null_default")]
    pub addresses: Vec<OriginAddress>,
    #[serde(default, deserialize_with = "null_default")]
    pub origin_protocol_policy: String,
    #[serde(default)]
    pub is_origin_redirection_enabled: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub host_header: String,
    #[serde(default, deserialize_with = "null_default")]
    pub method: String,
    #[serde(default, deserialize_with = "null_default")]
    pub origin_path: String,
    #[serde(default)]
    pub connection_timeout: i64,
    #[serde(default)]
    pub timeout_between_bytes: i64,
    #[serde(default)]
    pub hmac_authentication: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub hmac_region_name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub hmac_access_key: String,
    #[serde(default, deserialize_with = "null_default")]
    pub hmac_secret_key: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OriginRequest {
    pub name: String,
    pub addresses: Vec<OriginAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_protocol_policy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_header: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_timeout: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_between_bytes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hmac_authentication: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hmac_region_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hmac_access_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hmac_secret_key: Option<String>,
}

// =============================================================================
// Cache settings
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheSetting {
    #[serde(default)]
    pub id: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub browser_cache_settings: String,
    #[serde(default)]
    pub browser_cache_settings_maximum_ttl: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub cdn_cache_settings: String,
    #[serde(default)]
    pub cdn_cache_settings_maximum_ttl: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub cache_by_query_string: String,
    #[serde(default, deserialize_with = "null_default")]
    pub query_string_fields: Vec<String>,
    #[serde(default)]
    pub enable_query_string_sort: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub cache_by_cookies: String,
    #[serde(default, deserialize_with = "null_default")]
    pub cookie_names: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub adaptive_delivery_action: String,
    #[serde(default, deserialize_with = "null_default")]
    pub device_group: Vec<i64>,
    #[serde(default)]
    pub enable_caching_for_post: bool,
    #[serde(default)]
    pub enable_caching_for_options: bool,
    #[serde(default)]
    pub enable_stale_cache: bool,
    #[serde(default)]
    pub l2_caching_enabled: bool,
    #[serde(default)]
    pub is_slice_configuration_enabled: bool,
    #[serde(default)]
    pub is_slice_edge_caching_enabled: bool,
    #[serde(default)]
    pub slice_configuration_range: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheSettingRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser_cache_settings: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser_cache_settings_maximum_ttl: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cdn_cache_settings: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cdn_cache_settings_maximum_ttl: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_by_query_string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_string_fields: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_query_string_sort: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_by_cookies: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookie_names: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adaptive_delivery_action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_group: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_caching_for_post: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_caching_for_options: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_stale_cache: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub l2_caching_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_slice_configuration_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_slice_edge_caching_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slice_configuration_range: Option<i64>,
}

// =============================================================================
// Rules engine
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct RuleBehavior {
    pub name: String,
    /// String target or structured target, depending on the behavior
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub target: serde_json::Value,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct RuleCriterion {
    pub variable: String,
    pub operator: String,
    pub conditional: String,
    #[serde(default, deserialize_with = "null_default")]
    pub input_value: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Rule {
    #[serde(default)]
    pub id: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub phase: String,
    #[serde(default, deserialize_with = "null_default")]
    pub description: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub order: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub behaviors: Vec<RuleBehavior>,
    #[serde(default, deserialize_with = "null_default")]
    pub criteria: Vec<Vec<RuleCriterion>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RuleRequest {
    pub name: String,
    pub behaviors: Vec<RuleBehavior>,
    pub criteria: Vec<Vec<RuleCriterion>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

// =============================================================================
// Edge function instances
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FunctionInstance {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub edge_function_id: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default)]
    pub args: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionInstanceRequest {
    pub name: String,
    pub edge_function_id: i64,
    pub args: serde_json::Value,
}

impl ApiClient {
    pub async fn list_edge_applications(
        &self,
        page: PageQuery,
    ) -> ApiResult<Page<EdgeApplication>> {
        self.get_with_query("/edge_applications", &page.to_query())
            .await
    }

    pub async fn get_edge_application(&self, app_id: i64) -> ApiResult<EdgeApplication> {
        let r: Results<EdgeApplication> =
            self.get(&format!("/edge_applications/{}", app_id)).await?;
        Ok(r.results)
    }

    pub async fn create_edge_application(
        &self,
        request: &EdgeApplicationRequest,
    ) -> ApiResult<EdgeApplication> {
        let r: Results<EdgeApplication> = self.post("/edge_applications", request).await?;
        Ok(r.results)
    }

    pub async fn update_edge_application(
        &self,
        app_id: i64,
        request: &EdgeApplicationRequest,
    ) -> ApiResult<EdgeApplication> {
        let r: Results<EdgeApplication> = self
            .put(&format!("/edge_applications/{}", app_id), request)
            .await?;
        Ok(r.results)
    }

    pub async fn delete_edge_application(&self, app_id: i64) -> ApiResult<()> {
        self.delete(&format!("/edge_applications/{}", app_id)).await
    }

    pub async fn get_origin(&self, app_id: i64, origin_key: &str) -> ApiResult<Origin> {
        let r: Results<Origin> = self
            .get(&format!("/edge_applications/{}/origins/{}", app_id, origin_key))
            .await?;
        Ok(r.results)
    }

    pub async fn create_origin(&self, app_id: i64, request: &OriginRequest) -> ApiResult<Origin> {
        let r: Results<Origin> = self
            .post(&format!("/edge_applications/{}/origins", app_id), request)
            .await?;
        Ok(r.results)
    }

    pub async fn update_origin(
        &self,
        app_id: i64,
        origin_key: &str,
        request: &OriginRequest,
    ) -> ApiResult<Origin> {
        let r: Results<Origin> = self
            .put(
                &format!("/edge_applications/{}/origins/{}", app_id, origin_key),
                request,
            )
            .await?;
        Ok(r.results)
    }

    pub async fn delete_origin(&self, app_id: i64, origin_key: &str) -> ApiResult<()> {
        self.delete(&format!("/edge_applications/{}/origins/{}", app_id, origin_key))
            .await
    }

    pub async fn get_cache_setting(&self, app_id: i64, cache_id: i64) -> ApiResult<CacheSetting> {
        let r: Results<CacheSetting> = self
            .get(&format!(
                "/edge_applications/{}/cache_settings/{}",
                app_id, cache_id
            ))
            .await?;
        Ok(r.results)
    }

    pub async fn create_cache_setting(
        &self,
        app_id: i64,
        request: &CacheSettingRequest,
    ) -> ApiResult<CacheSetting> {
        let r: Results<CacheSetting> = self
            .post(&format!("/edge_applications/{}/cache_settings", app_id), request)
            .await?;
        Ok(r.results)
    }

    pub async fn update_cache_setting(
        &self,
        app_id: i64,
        cache_id: i64,
        request: &CacheSettingRequest,
    ) -> ApiResult<CacheSetting> {
        let r: Results<CacheSetting> = self
            .put(
                &format!("/edge_applications/{}/cache_settings/{}", app_id, cache_id),
                request,
            )
            .await?;
        Ok(r.results)
    }

    pub async fn delete_cache_setting(&self, app_id: i64, cache_id: i64) -> ApiResult<()> {
        self.delete(&format!(
            "/edge_applications/{}/cache_settings/{}",
            app_id, cache_id
        ))
        .await
    }

    pub async fn get_rule(&self, app_id: i64, phase: &str, rule_id: i64) -> ApiResult<Rule> {
        let r: Results<Rule> = self
            .get(&rule_path(app_id, phase, Some(rule_id)))
            .await?;
        Ok(r.results)
    }

    pub async fn create_rule(
        &self,
        app_id: i64,
        phase: &str,
        request: &RuleRequest,
    ) -> ApiResult<Rule> {
        let r: Results<Rule> = self.post(&rule_path(app_id, phase, None), request).await?;
        Ok(r.results)
    }

    pub async fn update_rule(
        &self,
        app_id: i64,
        phase: &str,
        rule_id: i64,
        request: &RuleRequest,
    ) -> ApiResult<Rule> {
        let r: Results<Rule> = self
            .put(&rule_path(app_id, phase, Some(rule_id)), request)
            .await?;
        Ok(r.results)
    }

    pub async fn delete_rule(&self, app_id: i64, phase: &str, rule_id: i64) -> ApiResult<()> {
        self.delete(&rule_path(app_id, phase, Some(rule_id))).await
    }

    pub async fn get_function_instance(
        &self,
        app_id: i64,
        instance_id: i64,
    ) -> ApiResult<FunctionInstance> {
        let r: Results<FunctionInstance> = self
            .get(&format!(
                "/edge_applications/{}/functions_instances/{}",
                app_id, instance_id
            ))
            .await?;
        Ok(r.results)
    }

    pub async fn create_function_instance(
        &self,
        app_id: i64,
        request: &FunctionInstanceRequest,
    ) -> ApiResult<FunctionInstance> {
        let r: Results<FunctionInstance> = self
            .post(
                &format!("/edge_applications/{}/functions_instances", app_id),
                request,
            )
            .await?;
        Ok(r.results)
    }

    pub async fn update_function_instance(
        &self,
        app_id: i64,
        instance_id: i64,
        request: &FunctionInstanceRequest,
    ) -> ApiResult<FunctionInstance> {
        let r: Results<FunctionInstance> = self
            .put(
                &format!(
                    "/edge_applications/{}/functions_instances/{}",
                    app_id, instance_id
                ),
                request,
            )
            .await?;
        Ok(r.results)
    }

    pub async fn delete_function_instance(&self, app_id: i64, instance_id: i64) -> ApiResult<()> {
        self.delete(&format!(
            "/edge_applications/{}/functions_instances/{}",
            app_id, instance_id
        ))
        .await
    }
}

fn rule_path(app_id: i64, phase: &str, rule_id: Option<i64>) -> String {
    match rule_id {
        Some(id) => format!(
            "/edge_applications/{}/rules_engine/{}/rules/{}",
            app_id, phase, id
        ),
        None => format!("/edge_applications/{}/rules_engine/{}/rules", app_id, phase),
    }
}
