//! Domains

use serde::{Deserialize, Serialize};

use super::{Page, PageQuery, Results, null_default};
use crate::client::{ApiClient, ApiResult};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Domain {
    #[serde(default)]
    pub id: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub cnames: Vec<String>,
    #[serde(default)]
    pub cname_access_only: bool,
    /// Numeric certificate ID, `"lets_encrypt"`, or null for the Azion default
    #[serde(default)]
    pub digital_certificate_id: serde_json::Value,
    #[serde(default)]
    pub edge_application_id: i64,
    #[serde(default)]
    pub edge_firewall_id: Option<i64>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub domain_name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub environment: String,
    #[serde(default)]
    pub is_mtls_enabled: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub mtls_verification: String,
    #[serde(default)]
    pub mtls_trusted_ca_certificate_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DomainRequest {
    pub name: String,
    pub cnames: Vec<String>,
    pub cname_access_only: bool,
    pub edge_application_id: i64,
    pub is_active: bool,
    pub digital_certificate_id: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge_firewall_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_mtls_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtls_verification: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtls_trusted_ca_certificate_id: Option<i64>,
}

impl ApiClient {
    pub async fn list_domains(&self, page: PageQuery) -> ApiResult<Page<Domain>> {
        self.get_with_query("/domains", &page.to_query()).await
    }

    pub async fn get_domain(&self, domain_id: i64) -> ApiResult<Domain> {
        let r: Results<Domain> = self.get(&format!("/domains/{}", domain_id)).await?;
        Ok(r.results)
    }

    pub async fn create_domain(&self, request: &DomainRequest) -> ApiResult<Domain> {
        let r: Results<Domain> = self.post("/domains", request).await?;
        Ok(r.results)
    }

    pub async fn update_domain(&self, domain_id: i64, request: &DomainRequest) -> ApiResult<Domain> {
        let r: Results<Domain> = self
            .put(&format!("/domains/{}", domain_id), request)
            .await?;
        Ok(r.results)
    }

    pub async fn delete_domain(&self, domain_id: i64) -> ApiResult<()> {
        self.delete(&format!("/domains/{}", domain_id)).await
    }
}
