//! Edge functions

use serde::{Deserialize, Serialize};

use super::{Page, PageQuery, Results, null_default};
use crate::client::{ApiClient, ApiResult};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EdgeFunction {
    #[serde(default)]
    pub id: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub language: String,
    #[serde(default, deserialize_with = "null_default")]
    pub code: String,
    #[serde(default)]
    pub json_args: serde_json::Value,
    #[serde(default, deserialize_with = "null_default")]
    pub function_to_run: String,
    #[serde(default, deserialize_with = "null_default")]
    pub initiator_type: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub last_editor: String,
    #[serde(default, deserialize_with = "null_default")]
    pub modified: String,
    #[serde(default)]
    pub reference_count: i64,
    #[serde(default)]
    pub is_proprietary_code: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct EdgeFunctionRequest {
    pub name: String,
    pub code: String,
    pub active: bool,
    pub json_args: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initiator_type: Option<String>,
}

impl ApiClient {
    pub async fn list_edge_functions(&self, page: PageQuery) -> ApiResult<Page<EdgeFunction>> {
        self.get_with_query("/edge_functions", &page.to_query())
            .await
    }

    pub async fn get_edge_function(&self, function_id: i64) -> ApiResult<EdgeFunction> {
        let r: Results<EdgeFunction> =
            self.get(&format!("/edge_functions/{}", function_id)).await?;
        Ok(r.results)
    }

    pub async fn create_edge_function(
        &self,
        request: &EdgeFunctionRequest,
    ) -> ApiResult<EdgeFunction> {
        let r: Results<EdgeFunction> = self.post("/edge_functions", request).await?;
        Ok(r.results)
    }

    pub async fn update_edge_function(
        &self,
        function_id: i64,
        request: &EdgeFunctionRequest,
    ) -> ApiResult<EdgeFunction> {
        let r: Results<EdgeFunction> = self
            .put(&format!("/edge_functions/{}", function_id), request)
            .await?;
        Ok(r.results)
    }

    pub async fn delete_edge_function(&self, function_id: i64) -> ApiResult<()> {
        self.delete(&format!("/edge_functions/{}", function_id))
            .await
    }
}
