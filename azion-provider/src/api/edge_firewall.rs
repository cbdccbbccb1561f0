//! Edge firewall: main settings, rules engine and edge function instances

use serde::{Deserialize, Serialize};

use super::{Page, PageQuery, Results, null_default};
use crate::client::{ApiClient, ApiResult};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EdgeFirewall {
    #[serde(default)]
    pub id: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub domains: Vec<i64>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub edge_functions_enabled: bool,
    #[serde(default)]
    pub network_protection_enabled: bool,
    #[serde(default)]
    pub waf_enabled: bool,
    #[serde(default)]
    pub debug_rules: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub last_editor: String,
    #[serde(default, deserialize_with = "null_default")]
    pub modified: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EdgeFirewallRequest {
    pub name: String,
    pub domains: Vec<i64>,
    pub is_active: bool,
    pub edge_functions_enabled: bool,
    pub network_protection_enabled: bool,
    pub waf_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_rules: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct FirewallBehavior {
    pub name: String,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub argument: serde_json::Value,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct FirewallCriterion {
    pub variable: String,
    pub operator: String,
    pub conditional: String,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub argument: serde_json::Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FirewallRule {
    #[serde(default)]
    pub id: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub description: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub order: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub behaviors: Vec<FirewallBehavior>,
    #[serde(default, deserialize_with = "null_default")]
    pub criteria: Vec<Vec<FirewallCriterion>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FirewallRuleRequest {
    pub name: String,
    pub behaviors: Vec<FirewallBehavior>,
    pub criteria: Vec<Vec<FirewallCriterion>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FirewallFunctionInstance {
    #[serde(default)]
    pub id: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default)]
    pub edge_function: i64,
    #[serde(default)]
    pub json_args: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct FirewallFunctionInstanceRequest {
    pub name: String,
    pub edge_function: i64,
    pub json_args: serde_json::Value,
}

impl ApiClient {
    pub async fn list_edge_firewalls(&self, page: PageQuery) -> ApiResult<Page<EdgeFirewall>> {
        self.get_with_query("/edge_firewall", &page.to_query())
            .await
    }

    pub async fn get_edge_firewall(&self, firewall_id: i64) -> ApiResult<EdgeFirewall> {
        let r: Results<EdgeFirewall> =
            self.get(&format!("/edge_firewall/{}", firewall_id)).await?;
        Ok(r.results)
    }

    pub async fn create_edge_firewall(
        &self,
        request: &EdgeFirewallRequest,
    ) -> ApiResult<EdgeFirewall> {
        let r: Results<EdgeFirewall> = self.post("/edge_firewall", request).await?;
        Ok(r.results)
    }

    pub async fn update_edge_firewall(
        &self,
        firewall_id: i64,
        request: &EdgeFirewallRequest,
    ) -> ApiResult<EdgeFirewall> {
        let r: Results<EdgeFirewall> = self
            .put(&format!("/edge_firewall/{}", firewall_id), request)
            .await?;
        Ok(r.results)
    }

    pub async fn delete_edge_firewall(&self, firewall_id: i64) -> ApiResult<()> {
        self.delete(&format!("/edge_firewall/{}", firewall_id))
            .await
    }

    pub async fn get_firewall_rule(&self, firewall_id: i64, rule_id: i64) -> ApiResult<FirewallRule> {
        let r: Results<FirewallRule> = self
            .get(&format!(
                "/edge_firewall/{}/rules_engine/{}",
                firewall_id, rule_id
            ))
            .await?;
        Ok(r.results)
    }

    pub async fn create_firewall_rule(
        &self,
        firewall_id: i64,
        request: &FirewallRuleRequest,
    ) -> ApiResult<FirewallRule> {
        let r: Results<FirewallRule> = self
            .post(&format!("/edge_firewall/{}/rules_engine", firewall_id), request)
            .await?;
        Ok(r.results)
    }

    pub async fn update_firewall_rule(
        &self,
        firewall_id: i64,
        rule_id: i64,
        request: &FirewallRuleRequest,
    ) -> ApiResult<FirewallRule> {
        let r: Results<FirewallRule> = self
            .put(
                &format!("/edge_firewall/{}/rules_engine/{}", firewall_id, rule_id),
                request,
            )
            .await?;
        Ok(r.results)
    }

    pub async fn delete_firewall_rule(&self, firewall_id: i64, rule_id: i64) -> ApiResult<()> {
        self.delete(&format!(
            "/edge_firewall/{}/rules_engine/{}",
            firewall_id, rule_id
        ))
        .await
    }

    pub async fn get_firewall_function_instance(
        &self,
        firewall_id: i64,
        instance_id: i64,
    ) -> ApiResult<FirewallFunctionInstance> {
        let r: Results<FirewallFunctionInstance> = self
            .get(&format!(
                "/edge_firewall/{}/functions_instances/{}",
                firewall_id, instance_id
            ))
            .await?;
        Ok(r.results)
    }

    pub async fn create_firewall_function_instance(
        &self,
        firewall_id: i64,
        request: &FirewallFunctionInstanceRequest,
    ) -> ApiResult<FirewallFunctionInstance> {
        let r: Results<FirewallFunctionInstance> = self
            .post(
                &format!("/edge_firewall/{}/functions_instances", firewall_id),
                request,
            )
            .await?;
        Ok(r.results)
    }

    pub async fn update_firewall_function_instance(
        &self,
        firewall_id: i64,
        instance_id: i64,
        request: &FirewallFunctionInstanceRequest,
    ) -> ApiResult<FirewallFunctionInstance> {
        let r: Results<FirewallFunctionInstance> = self
            .put(
                &format!(
                    "/edge_firewall/{}/functions_instances/{}",
                    firewall_id, instance_id
                ),
                request,
            )
            .await?;
        Ok(r.results)
    }

    pub async fn delete_firewall_function_instance(
        &self,
        firewall_id: i64,
        instance_id: i64,
    ) -> ApiResult<()> {
        self.delete(&format!(
            "/edge_firewall/{}/functions_instances/{}",
            firewall_id, instance_id
        ))
        .await
    }
}
