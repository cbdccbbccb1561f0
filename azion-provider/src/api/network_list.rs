//! Network lists

use serde::{Deserialize, Serialize};

use super::{Page, PageQuery, Results, null_default};
use crate::client::{ApiClient, ApiResult};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetworkList {
    #[serde(default)]
    pub id: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub list_type: String,
    /// Strings for `ip_cidr` and `countries`, numbers for `asn`
    #[serde(default, deserialize_with = "null_default")]
    pub items_values: Vec<serde_json::Value>,
    #[serde(default, deserialize_with = "null_default")]
    pub last_editor: String,
    #[serde(default, deserialize_with = "null_default")]
    pub last_modified: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NetworkListRequest {
    pub name: String,
    pub list_type: String,
    pub items_values: Vec<serde_json::Value>,
}

impl ApiClient {
    pub async fn list_network_lists(&self, page: PageQuery) -> ApiResult<Page<NetworkList>> {
        self.get_with_query("/network_lists", &page.to_query())
            .await
    }

    pub async fn get_network_list(&self, list_id: i64) -> ApiResult<NetworkList> {
        let r: Results<NetworkList> = self.get(&format!("/network_lists/{}", list_id)).await?;
        Ok(r.results)
    }

    pub async fn create_network_list(
        &self,
        request: &NetworkListRequest,
    ) -> ApiResult<NetworkList> {
        let r: Results<NetworkList> = self.post("/network_lists", request).await?;
        Ok(r.results)
    }

    pub async fn update_network_list(
        &self,
        list_id: i64,
        request: &NetworkListRequest,
    ) -> ApiResult<NetworkList> {
        let r: Results<NetworkList> = self
            .put(&format!("/network_lists/{}", list_id), request)
            .await?;
        Ok(r.results)
    }

    pub async fn delete_network_list(&self, list_id: i64) -> ApiResult<()> {
        self.delete(&format!("/network_lists/{}", list_id)).await
    }
}
