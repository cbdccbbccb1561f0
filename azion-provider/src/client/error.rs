//! API client errors

use azion_core::provider::ProviderError;
use thiserror::Error;

/// Errors returned by the Azion API client
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx response; the body is kept verbatim for diagnostics
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Still rate limited after exhausting retries
    #[error("Rate limited (HTTP 429) after {attempts} attempts")]
    RateLimited { attempts: u32 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to decode response: {detail}")]
    Decode { detail: String, body: String },

    #[error("Failed to build client: {0}")]
    Build(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::RateLimited { .. } => Some(429),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<ApiError> for ProviderError {
    fn from(err: ApiError) -> Self {
        let message = err.to_string();
        let base = if err.is_not_found() {
            ProviderError::not_found(message)
        } else {
            ProviderError::new(message)
        };
        base.with_cause(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_provider_not_found() {
        let err = ApiError::Http {
            status: 404,
            body: r#"{"detail":"Not found."}"#.to_string(),
        };
        assert!(err.is_not_found());

        let provider_err = ProviderError::from(err);
        assert!(provider_err.is_not_found());
        assert_eq!(provider_err.message, r#"HTTP 404: {"detail":"Not found."}"#);
    }

    #[test]
    fn rate_limited_reports_429() {
        let err = ApiError::RateLimited { attempts: 6 };
        assert_eq!(err.status(), Some(429));
        assert!(!ProviderError::from(err).is_not_found());
    }
}
