//! Typed models and endpoints of the Azion API
//!
//! Each submodule mirrors one API area: request bodies, response models
//! and the `ApiClient` methods that reach them.

pub mod digital_certificate;
pub mod dns;
pub mod domain;
pub mod edge_application;
pub mod edge_firewall;
pub mod edge_function;
pub mod network_list;
pub mod variable;
pub mod waf;

use serde::{Deserialize, Deserializer};

/// Single-object envelope: `{"results": {...}}`
#[derive(Debug, Clone, Deserialize)]
pub struct Results<T> {
    pub results: T,
}

/// Paged list envelope
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub count: i64,
    #[serde(default)]
    pub total_pages: i64,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// Pagination parameters accepted by list endpoints
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl PageQuery {
    pub fn new(page: i64, page_size: i64) -> Self {
        Self {
            page: Some(page),
            page_size: Some(page_size),
        }
    }

    pub fn to_query(self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(page) = self.page {
            query.push(("page", page.to_string()));
        }
        if let Some(page_size) = self.page_size {
            query.push(("page_size", page_size.to_string()));
        }
        query
    }
}

/// Accept either a single value or a list (e.g. `"http_port": 80` or `[80, 8080]`)
pub(crate) fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany<T> {
        One(T),
        Many(Vec<T>),
        None,
    }

    Ok(
        match Option::<OneOrMany<T>>::deserialize(deserializer)? {
            Some(OneOrMany::One(v)) => vec![v],
            Some(OneOrMany::Many(v)) => v,
            Some(OneOrMany::None) | None => Vec::new(),
        },
    )
}

/// Deserialize `null` as the type's default
pub(crate) fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Ports {
        #[serde(default, deserialize_with = "one_or_many")]
        http_port: Vec<i64>,
        #[serde(default, deserialize_with = "null_default")]
        name: String,
    }

    #[test]
    fn one_or_many_accepts_both_shapes() {
        let single: Ports = serde_json::from_value(json!({"http_port": 80})).unwrap();
        assert_eq!(single.http_port, vec![80]);

        let many: Ports = serde_json::from_value(json!({"http_port": [80, 8080]})).unwrap();
        assert_eq!(many.http_port, vec![80, 8080]);

        let missing: Ports = serde_json::from_value(json!({"http_port": null})).unwrap();
        assert!(missing.http_port.is_empty());
    }

    #[test]
    fn null_default_string() {
        let ports: Ports = serde_json::from_value(json!({"name": null})).unwrap();
        assert_eq!(ports.name, "");
    }

    #[test]
    fn page_query_params() {
        assert!(PageQuery::default().to_query().is_empty());
        assert_eq!(
            PageQuery::new(2, 50).to_query(),
            vec![("page", "2".to_string()), ("page_size", "50".to_string())]
        );
    }

    #[test]
    fn page_without_results() {
        let page: Page<i64> = serde_json::from_value(json!({"count": 0})).unwrap();
        assert!(page.results.is_empty());
        assert_eq!(page.total_pages, 0);
    }
}
