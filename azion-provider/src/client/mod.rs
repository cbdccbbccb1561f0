//! Azion API client
//!
//! A thin JSON client over `reqwest`. Typed endpoints live in `crate::api`
//! as `impl ApiClient` blocks, one per API area.

pub mod error;

use std::time::Duration;

use reqwest::Method;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::{DeserializeOwned, IgnoredAny};

pub use error::{ApiError, ApiResult};

use crate::config::ProviderConfig;

const ACCEPT_V3: &str = "application/json; version=3";
const LOG_BODY_LIMIT: usize = 512;

/// HTTP client for the Azion control API
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    variables_url: String,
    max_retries: u32,
    retry_delay: Duration,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("variables_url", &self.variables_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(config: &ProviderConfig) -> ApiResult<Self> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Token {}", config.api_token))
            .map_err(|e| ApiError::Build(format!("invalid token: {}", e)))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_V3));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .user_agent(concat!("azion-provider/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Build(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            variables_url: config.variables_url.trim_end_matches('/').to_string(),
            max_retries: config.max_retries,
            retry_delay: config.retry_delay(),
        })
    }

    /// Client targeting the environment variables API
    pub fn variables(&self) -> ApiClient {
        ApiClient {
            base_url: self.variables_url.clone(),
            ..self.clone()
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.send(Method::GET, path, &[], None).await
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ApiResult<T> {
        self.send(Method::GET, path, query, None).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let body = encode(body)?;
        self.send(Method::POST, path, &[], Some(&body)).await
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let body = encode(body)?;
        self.send(Method::PUT, path, &[], Some(&body)).await
    }

    pub async fn patch<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let body = encode(body)?;
        self.send(Method::PATCH, path, &[], Some(&body)).await
    }

    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        let _: IgnoredAny = self.send(Method::DELETE, path, &[], None).await?;
        Ok(())
    }

    /// Send a request, retrying HTTP 429 with a linear delay
    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&serde_json::Value>,
    ) -> ApiResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let mut attempt: u32 = 0;

        loop {
            log::debug!("[azion] {} {}", method, url);

            let mut request = self.http.request(method.clone(), &url);
            if !query.is_empty() {
                request = request.query(query);
            }
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = request
                .send()
                .await
                .map_err(|e| ApiError::Network(e.to_string()))?;
            let status = response.status().as_u16();

            if status == 429 {
                if attempt < self.max_retries {
                    attempt += 1;
                    let delay = self.retry_delay * attempt;
                    log::warn!(
                        "[azion] {} {} rate limited, retry {}/{} in {:?}",
                        method,
                        path,
                        attempt,
                        self.max_retries,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    continue;
                }
                return Err(ApiError::RateLimited {
                    attempts: attempt + 1,
                });
            }

            let text = response
                .text()
                .await
                .map_err(|e| ApiError::Network(format!("Failed to read response body: {}", e)))?;
            log::debug!("[azion] Response {}: {}", status, truncate(&text));

            if !(200..300).contains(&status) {
                return Err(ApiError::Http { status, body: text });
            }

            return decode(&text);
        }
    }
}

fn encode<B: Serialize>(body: &B) -> ApiResult<serde_json::Value> {
    serde_json::to_value(body).map_err(|e| ApiError::Decode {
        detail: format!("Failed to encode request: {}", e),
        body: String::new(),
    })
}

fn decode<T: DeserializeOwned>(text: &str) -> ApiResult<T> {
    let text = if text.trim().is_empty() { "null" } else { text };
    serde_json::from_str(text).map_err(|e| ApiError::Decode {
        detail: e.to_string(),
        body: text.to_string(),
    })
}

fn truncate(text: &str) -> &str {
    match text.char_indices().nth(LOG_BODY_LIMIT) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_empty_body_as_unit() {
        let result: ApiResult<IgnoredAny> = decode("");
        assert!(result.is_ok());
    }

    #[test]
    fn decode_error_keeps_body() {
        let result: ApiResult<u32> = decode("{\"oops\": true}");
        match result {
            Err(ApiError::Decode { body, .. }) => assert_eq!(body, "{\"oops\": true}"),
            other => panic!("expected decode error, got {:?}", other),
        }
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let long = "é".repeat(LOG_BODY_LIMIT + 10);
        assert_eq!(truncate(&long).chars().count(), LOG_BODY_LIMIT);
        assert_eq!(truncate("short"), "short");
    }

    #[test]
    fn variables_client_switches_base() {
        let config = ProviderConfig::default()
            .with_token("t")
            .with_variables_url("http://vars.local/v3/");
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.variables().base_url, "http://vars.local/v3");
        assert_eq!(client.base_url, ProviderConfig::DEFAULT_BASE_URL);
    }
}
