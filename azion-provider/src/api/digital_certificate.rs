//! Digital certificates

use serde::{Deserialize, Serialize};

use super::{Page, PageQuery, Results, null_default};
use crate::client::{ApiClient, ApiResult};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DigitalCertificate {
    #[serde(default)]
    pub id: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub issuer: String,
    #[serde(default, deserialize_with = "null_default")]
    pub subject_name: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub validity: String,
    #[serde(default, deserialize_with = "null_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_default")]
    pub certificate_type: String,
    #[serde(default)]
    pub managed: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub azion_information: String,
    #[serde(default)]
    pub certificate_content: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DigitalCertificateRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
}

impl ApiClient {
    pub async fn list_digital_certificates(
        &self,
        page: PageQuery,
    ) -> ApiResult<Page<DigitalCertificate>> {
        self.get_with_query("/digital_certificates", &page.to_query())
            .await
    }

    pub async fn get_digital_certificate(&self, cert_id: i64) -> ApiResult<DigitalCertificate> {
        let r: Results<DigitalCertificate> = self
            .get(&format!("/digital_certificates/{}", cert_id))
            .await?;
        Ok(r.results)
    }

    pub async fn create_digital_certificate(
        &self,
        request: &DigitalCertificateRequest,
    ) -> ApiResult<DigitalCertificate> {
        let r: Results<DigitalCertificate> =
            self.post("/digital_certificates", request).await?;
        Ok(r.results)
    }

    pub async fn update_digital_certificate(
        &self,
        cert_id: i64,
        request: &DigitalCertificateRequest,
    ) -> ApiResult<DigitalCertificate> {
        let r: Results<DigitalCertificate> = self
            .put(&format!("/digital_certificates/{}", cert_id), request)
            .await?;
        Ok(r.results)
    }

    pub async fn delete_digital_certificate(&self, cert_id: i64) -> ApiResult<()> {
        self.delete(&format!("/digital_certificates/{}", cert_id))
            .await
    }
}
