//! Intelligent DNS against a mock API

mod common;

use azion_core::provider::Provider;
use azion_core::resource::{Resource, ResourceId, State, Value};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use common::{page, provider_for, results, setup_mock_server};

fn zone_json(id: i64) -> serde_json::Value {
    json!({
        "id": id,
        "name": "example",
        "domain": "example.com",
        "is_active": true,
        "retry": 7200,
        "nx_ttl": 3600,
        "soa_ttl": 3600,
        "refresh": 43200,
        "expiry": 1209600,
        "nameservers": ["ns1.aziondns.net", "ns2.aziondns.com"]
    })
}

fn record_json(record_id: i64, entry: &str) -> serde_json::Value {
    json!({
        "record_id": record_id,
        "entry": entry,
        "description": "",
        "answers_list": ["192.0.2.1"],
        "policy": "simple",
        "weight": null,
        "record_type": "A",
        "ttl": 300
    })
}

fn records_page(records: Vec<serde_json::Value>, page: i64, total_pages: i64) -> serde_json::Value {
    json!({
        "count": records.len(),
        "total_pages": total_pages,
        "links": {"previous": null, "next": null},
        "results": {
            "zone_id": 12,
            "zone_domain": "example.com",
            "records": records,
            "page": page
        }
    })
}

#[tokio::test]
async fn create_zone_sends_token_and_body() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/intelligent_dns"))
        .and(header("Authorization", "Token test-token"))
        .and(body_json(json!({
            "name": "example",
            "domain": "example.com",
            "is_active": true
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(results(zone_json(12))))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let resource = Resource::new("azion_intelligent_dns_zone", "example")
        .with_attribute("name", "example")
        .with_attribute("domain", "example.com");

    let state = provider.create(&resource).await.unwrap();
    assert_eq!(state.identifier.as_deref(), Some("12"));
    assert_eq!(state.attributes["id"], Value::Int(12));
    assert_eq!(
        state.attributes["nameservers"],
        Value::List(vec![
            Value::from("ns1.aziondns.net"),
            Value::from("ns2.aziondns.com")
        ])
    );
}

#[tokio::test]
async fn read_missing_zone_is_not_found() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/intelligent_dns/404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Not found."})))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let id = ResourceId::new("azion_intelligent_dns_zone", "gone");
    let state = provider.read(&id, Some("404")).await.unwrap();
    assert!(!state.exists);
}

#[tokio::test]
async fn read_record_scans_pages() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/intelligent_dns/12/records"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(records_page(vec![record_json(1, "www")], 1, 2)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/intelligent_dns/12/records"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(records_page(vec![record_json(2, "api")], 2, 2)),
        )
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let id = ResourceId::new("azion_intelligent_dns_record", "api");

    let state = provider.read(&id, Some("12/2")).await.unwrap();
    assert!(state.exists);
    assert_eq!(state.attributes["entry"], Value::from("api"));
    assert_eq!(state.attributes["zone_id"], Value::Int(12));

    let missing = provider.read(&id, Some("12/3")).await.unwrap();
    assert!(!missing.exists);
}

#[tokio::test]
async fn import_record_by_composite_id() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/intelligent_dns/12/records"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(records_page(vec![record_json(5, "www")], 1, 1)),
        )
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let id = ResourceId::new("azion_intelligent_dns_record", "www");

    let state = provider.import(&id, "12/5").await.unwrap();
    assert_eq!(state.identifier.as_deref(), Some("12/5"));

    let err = provider.import(&id, "12").await.unwrap_err();
    assert!(err.message.contains("<zone_id>/<record_id>"), "{}", err);

    let err = provider.import(&id, "12/404").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn delete_dnssec_disables_it() {
    let server = setup_mock_server().await;
    Mock::given(method("PATCH"))
        .and(path("/intelligent_dns/12/dnssec"))
        .and(body_json(json!({"is_enabled": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(results(json!({
            "is_enabled": false,
            "status": "ready"
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let id = ResourceId::new("azion_intelligent_dns_dnssec", "example");
    provider.delete(&id, "12").await.unwrap();
}

#[tokio::test]
async fn records_data_source_reports_zone_and_paging() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/intelligent_dns/12/records"))
        .and(query_param("page_size", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(records_page(
            vec![record_json(1, "www"), record_json(2, "api")],
            1,
            1,
        )))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let query = Resource::new("azion_intelligent_dns_records", "all")
        .with_attribute("zone_id", 12_i64)
        .with_attribute("page_size", 10_i64)
        .with_read_only(true);

    let state: State = provider.read_data_source(&query).await.unwrap();
    assert_eq!(state.attributes["zone_domain"], Value::from("example.com"));
    assert_eq!(state.attributes["counter"], Value::Int(2));
    let results = state.attributes["results"].as_list().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[1].as_map().unwrap()["entry"], Value::from("api"));
}

#[tokio::test]
async fn zones_data_source_lists_page() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/intelligent_dns"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![zone_json(12)], 1)))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let query = Resource::new("azion_intelligent_dns_zones", "all").with_read_only(true);
    let state = provider.read_data_source(&query).await.unwrap();
    assert_eq!(state.attributes["total_pages"], Value::Int(1));
    let zone = state.attributes["results"].as_list().unwrap()[0]
        .as_map()
        .unwrap()
        .clone();
    assert_eq!(zone["domain"], Value::from("example.com"));
}
