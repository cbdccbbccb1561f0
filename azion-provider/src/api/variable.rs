//! Environment variables
//!
//! Served by a separate API: objects are keyed by UUID and returned
//! without the `results` envelope.

use serde::{Deserialize, Serialize};

use super::null_default;
use crate::client::{ApiClient, ApiResult};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Variable {
    #[serde(default, deserialize_with = "null_default")]
    pub uuid: String,
    #[serde(default, deserialize_with = "null_default")]
    pub key: String,
    /// Masked by the API when `secret` is true
    #[serde(default, deserialize_with = "null_default")]
    pub value: String,
    #[serde(default)]
    pub secret: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub last_editor: String,
    #[serde(default, deserialize_with = "null_default")]
    pub created_at: String,
    #[serde(default, deserialize_with = "null_default")]
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VariableRequest {
    pub key: String,
    pub value: String,
    pub secret: bool,
}

impl ApiClient {
    pub async fn list_variables(&self) -> ApiResult<Vec<Variable>> {
        self.variables().get("/variables").await
    }

    pub async fn get_variable(&self, uuid: &str) -> ApiResult<Variable> {
        self.variables().get(&format!("/variables/{}", uuid)).await
    }

    pub async fn create_variable(&self, request: &VariableRequest) -> ApiResult<Variable> {
        self.variables().post("/variables", request).await
    }

    pub async fn update_variable(
        &self,
        uuid: &str,
        request: &VariableRequest,
    ) -> ApiResult<Variable> {
        self.variables()
            .put(&format!("/variables/{}", uuid), request)
            .await
    }

    pub async fn delete_variable(&self, uuid: &str) -> ApiResult<()> {
        self.variables()
            .delete(&format!("/variables/{}", uuid))
            .await
    }
}
