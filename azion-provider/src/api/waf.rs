//! WAF rule sets

use serde::{Deserialize, Serialize};

use super::{Page, PageQuery, Results, null_default};
use crate::client::{ApiClient, ApiResult};

/// Threat families a rule set can inspect. Each has an on/off flag
/// (`<family>`) and a sensitivity (`<family>_sensitivity`).
pub const THREAT_FAMILIES: &[&str] = &[
    "cross_site_scripting",
    "directory_traversal",
    "evading_tricks",
    "file_upload",
    "identified_attack",
    "remote_file_inclusion",
    "sql_injection",
    "unwanted_access",
];

pub const SENSITIVITIES: &[&str] = &["lowest", "low", "medium", "high", "highest"];

/// Flag and sensitivity of a single threat family
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThreatSetting {
    pub enabled: bool,
    pub sensitivity: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WafRuleSet {
    #[serde(default, skip_serializing)]
    pub id: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub mode: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub bypass_addresses: Vec<String>,

    #[serde(default)]
    pub cross_site_scripting: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub cross_site_scripting_sensitivity: String,
    #[serde(default)]
    pub directory_traversal: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub directory_traversal_sensitivity: String,
    #[serde(default)]
    pub evading_tricks: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub evading_tricks_sensitivity: String,
    #[serde(default)]
    pub file_upload: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub file_upload_sensitivity: String,
    #[serde(default)]
    pub identified_attack: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub identified_attack_sensitivity: String,
    #[serde(default)]
    pub remote_file_inclusion: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub remote_file_inclusion_sensitivity: String,
    #[serde(default)]
    pub sql_injection: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub sql_injection_sensitivity: String,
    #[serde(default)]
    pub unwanted_access: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub unwanted_access_sensitivity: String,
}

impl WafRuleSet {
    /// Setting of a family listed in `THREAT_FAMILIES`
    pub fn threat(&self, family: &str) -> Option<ThreatSetting> {
        let (enabled, sensitivity) = match family {
            "cross_site_scripting" => (
                self.cross_site_scripting,
                &self.cross_site_scripting_sensitivity,
            ),
            "directory_traversal" => (
                self.directory_traversal,
                &self.directory_traversal_sensitivity,
            ),
            "evading_tricks" => (self.evading_tricks, &self.evading_tricks_sensitivity),
            "file_upload" => (self.file_upload, &self.file_upload_sensitivity),
            "identified_attack" => (
                self.identified_attack,
                &self.identified_attack_sensitivity,
            ),
            "remote_file_inclusion" => (
                self.remote_file_inclusion,
                &self.remote_file_inclusion_sensitivity,
            ),
            "sql_injection" => (self.sql_injection, &self.sql_injection_sensitivity),
            "unwanted_access" => (self.unwanted_access, &self.unwanted_access_sensitivity),
            _ => return None,
        };
        Some(ThreatSetting {
            enabled,
            sensitivity: sensitivity.clone(),
        })
    }

    /// Apply a setting to a family listed in `THREAT_FAMILIES`; unknown families are ignored
    pub fn set_threat(&mut self, family: &str, setting: ThreatSetting) {
        let (enabled, sensitivity) = match family {
            "cross_site_scripting" => (
                &mut self.cross_site_scripting,
                &mut self.cross_site_scripting_sensitivity,
            ),
            "directory_traversal" => (
                &mut self.directory_traversal,
                &mut self.directory_traversal_sensitivity,
            ),
            "evading_tricks" => (
                &mut self.evading_tricks,
                &mut self.evading_tricks_sensitivity,
            ),
            "file_upload" => (&mut self.file_upload, &mut self.file_upload_sensitivity),
            "identified_attack" => (
                &mut self.identified_attack,
                &mut self.identified_attack_sensitivity,
            ),
            "remote_file_inclusion" => (
                &mut self.remote_file_inclusion,
                &mut self.remote_file_inclusion_sensitivity,
            ),
            "sql_injection" => (&mut self.sql_injection, &mut self.sql_injection_sensitivity),
            "unwanted_access" => (
                &mut self.unwanted_access,
                &mut self.unwanted_access_sensitivity,
            ),
            _ => return,
        };
        *enabled = setting.enabled;
        *sensitivity = setting.sensitivity;
    }
}

impl ApiClient {
    pub async fn list_waf_rule_sets(&self, page: PageQuery) -> ApiResult<Page<WafRuleSet>> {
        self.get_with_query("/waf/rulesets", &page.to_query())
            .await
    }

    pub async fn get_waf_rule_set(&self, waf_id: i64) -> ApiResult<WafRuleSet> {
        let r: Results<WafRuleSet> = self.get(&format!("/waf/rulesets/{}", waf_id)).await?;
        Ok(r.results)
    }

    pub async fn create_waf_rule_set(&self, request: &WafRuleSet) -> ApiResult<WafRuleSet> {
        let r: Results<WafRuleSet> = self.post("/waf/rulesets", request).await?;
        Ok(r.results)
    }

    pub async fn update_waf_rule_set(
        &self,
        waf_id: i64,
        request: &WafRuleSet,
    ) -> ApiResult<WafRuleSet> {
        let r: Results<WafRuleSet> = self
            .put(&format!("/waf/rulesets/{}", waf_id), request)
            .await?;
        Ok(r.results)
    }

    pub async fn delete_waf_rule_set(&self, waf_id: i64) -> ApiResult<()> {
        self.delete(&format!("/waf/rulesets/{}", waf_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threat_round_trip_for_every_family() {
        let mut rule_set = WafRuleSet::default();
        for family in THREAT_FAMILIES {
            rule_set.set_threat(
                family,
                ThreatSetting {
                    enabled: true,
                    sensitivity: "high".to_string(),
                },
            );
        }
        for family in THREAT_FAMILIES {
            let setting = rule_set.threat(family).unwrap();
            assert!(setting.enabled, "{} not enabled", family);
            assert_eq!(setting.sensitivity, "high");
        }
        assert!(rule_set.threat("unknown").is_none());
    }

    #[test]
    fn id_is_not_serialized() {
        let rule_set = WafRuleSet {
            id: 9,
            name: "main".to_string(),
            ..Default::default()
        };
        let body = serde_json::to_value(&rule_set).unwrap();
        assert!(body.get("id").is_none());
        assert_eq!(body["name"], "main");
    }
}
