//! Intelligent DNS: zones, records and DNSSEC

use serde::{Deserialize, Serialize};

use super::{Page, PageQuery, Results, null_default};
use crate::client::{ApiClient, ApiError, ApiResult};

/// Page size used when scanning record lists
const RECORD_SCAN_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Zone {
    #[serde(default)]
    pub id: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub domain: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub retry: Option<i64>,
    #[serde(default)]
    pub nx_ttl: Option<i64>,
    #[serde(default)]
    pub soa_ttl: Option<i64>,
    #[serde(default)]
    pub refresh: Option<i64>,
    #[serde(default)]
    pub expiry: Option<i64>,
    #[serde(default, deserialize_with = "null_default")]
    pub nameservers: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ZoneRequest {
    pub name: String,
    pub domain: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Record {
    #[serde(default)]
    pub record_id: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub entry: String,
    #[serde(default, deserialize_with = "null_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_default")]
    pub answers_list: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub policy: String,
    #[serde(default)]
    pub weight: Option<i64>,
    #[serde(default, deserialize_with = "null_default")]
    pub record_type: String,
    #[serde(default)]
    pub ttl: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordRequest {
    pub record_type: String,
    pub entry: String,
    pub answers_list: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body of the record list endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ZoneRecords {
    #[serde(default)]
    pub zone_id: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub zone_domain: String,
    #[serde(default, deserialize_with = "null_default")]
    pub records: Vec<Record>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecordsPage {
    #[serde(default)]
    pub count: i64,
    #[serde(default)]
    pub total_pages: i64,
    #[serde(default)]
    pub results: ZoneRecords,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlugRef {
    #[serde(default)]
    pub id: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub slug: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DelegationSigner {
    #[serde(default)]
    pub digest_type: Option<SlugRef>,
    #[serde(default)]
    pub algorithm_type: Option<SlugRef>,
    #[serde(default, deserialize_with = "null_default")]
    pub digest: String,
    #[serde(default)]
    pub key_tag: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Dnssec {
    #[serde(default)]
    pub is_enabled: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub status: String,
    #[serde(default)]
    pub delegation_signer: Option<DelegationSigner>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DnssecRequest {
    pub is_enabled: bool,
}

impl ApiClient {
    pub async fn list_zones(&self, page: PageQuery) -> ApiResult<Page<Zone>> {
        self.get_with_query("/intelligent_dns", &page.to_query())
            .await
    }

    pub async fn get_zone(&self, zone_id: i64) -> ApiResult<Zone> {
        let r: Results<Zone> = self.get(&format!("/intelligent_dns/{}", zone_id)).await?;
        Ok(r.results)
    }

    pub async fn create_zone(&self, request: &ZoneRequest) -> ApiResult<Zone> {
        let r: Results<Zone> = self.post("/intelligent_dns", request).await?;
        Ok(r.results)
    }

    pub async fn update_zone(&self, zone_id: i64, request: &ZoneRequest) -> ApiResult<Zone> {
        let r: Results<Zone> = self
            .put(&format!("/intelligent_dns/{}", zone_id), request)
            .await?;
        Ok(r.results)
    }

    pub async fn delete_zone(&self, zone_id: i64) -> ApiResult<()> {
        self.delete(&format!("/intelligent_dns/{}", zone_id)).await
    }

    pub async fn list_records(&self, zone_id: i64, page: PageQuery) -> ApiResult<RecordsPage> {
        self.get_with_query(
            &format!("/intelligent_dns/{}/records", zone_id),
            &page.to_query(),
        )
        .await
    }

    /// The API has no single-record endpoint; scan the zone's record pages
    pub async fn get_record(&self, zone_id: i64, record_id: i64) -> ApiResult<Record> {
        let mut page = 1;
        loop {
            let records = self
                .list_records(zone_id, PageQuery::new(page, RECORD_SCAN_PAGE_SIZE))
                .await?;
            if let Some(record) = records
                .results
                .records
                .into_iter()
                .find(|r| r.record_id == record_id)
            {
                return Ok(record);
            }
            if page >= records.total_pages {
                return Err(ApiError::Http {
                    status: 404,
                    body: format!("record {} not found in zone {}", record_id, zone_id),
                });
            }
            page += 1;
        }
    }

    pub async fn create_record(&self, zone_id: i64, request: &RecordRequest) -> ApiResult<Record> {
        let r: Results<Record> = self
            .post(&format!("/intelligent_dns/{}/records", zone_id), request)
            .await?;
        Ok(r.results)
    }

    pub async fn update_record(
        &self,
        zone_id: i64,
        record_id: i64,
        request: &RecordRequest,
    ) -> ApiResult<Record> {
        let r: Results<Record> = self
            .put(
                &format!("/intelligent_dns/{}/records/{}", zone_id, record_id),
                request,
            )
            .await?;
        Ok(r.results)
    }

    pub async fn delete_record(&self, zone_id: i64, record_id: i64) -> ApiResult<()> {
        self.delete(&format!("/intelligent_dns/{}/records/{}", zone_id, record_id))
            .await
    }

    pub async fn get_dnssec(&self, zone_id: i64) -> ApiResult<Dnssec> {
        let r: Results<Dnssec> = self
            .get(&format!("/intelligent_dns/{}/dnssec", zone_id))
            .await?;
        Ok(r.results)
    }

    pub async fn update_dnssec(&self, zone_id: i64, request: &DnssecRequest) -> ApiResult<Dnssec> {
        let r: Results<Dnssec> = self
            .patch(&format!("/intelligent_dns/{}/dnssec", zone_id), request)
            .await?;
        Ok(r.results)
    }
}
