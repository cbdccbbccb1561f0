//! Network lists, environment variables, domains and single-object data sources

mod common;

use azion_core::provider::Provider;
use azion_core::resource::{Resource, ResourceId, Value};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use common::{provider_for, results, setup_mock_server};

fn strings(items: &[&str]) -> Value {
    Value::List(items.iter().map(|s| Value::from(*s)).collect())
}

#[tokio::test]
async fn asn_network_list_round_trips_as_strings() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/network_lists"))
        .and(body_json(json!({
            "name": "blocked",
            "list_type": "asn",
            "items_values": [64500, 64501]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(results(json!({
            "id": 31,
            "name": "blocked",
            "list_type": "asn",
            "items_values": [64500, 64501],
            "last_editor": "ops@example.com"
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let resource = Resource::new("azion_network_list", "blocked")
        .with_attribute("name", "blocked")
        .with_attribute("list_type", "asn")
        .with_attribute("items_values", strings(&["64500", "64501"]));

    let state = provider.create(&resource).await.unwrap();
    assert_eq!(state.identifier.as_deref(), Some("31"));
    assert_eq!(state.attributes["items_values"], strings(&["64500", "64501"]));
}

#[tokio::test]
async fn secret_variable_value_is_kept_from_config() {
    let server = setup_mock_server().await;
    let uuid = "6f1c0c3e-0000-4000-8000-000000000001";
    Mock::given(method("POST"))
        .and(path("/variables"))
        .and(body_json(json!({
            "key": "API_TOKEN",
            "value": "hunter2",
            "secret": true
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "uuid": uuid,
            "key": "API_TOKEN",
            "value": "********",
            "secret": true
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/variables/{}", uuid)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uuid": uuid,
            "key": "API_TOKEN",
            "value": "********",
            "secret": true
        })))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let resource = Resource::new("azion_environment_variable", "token")
        .with_attribute("key", "API_TOKEN")
        .with_attribute("value", "hunter2")
        .with_attribute("secret", true);

    let created = provider.create(&resource).await.unwrap();
    assert_eq!(created.identifier.as_deref(), Some(uuid));
    assert_eq!(created.attributes["value"], Value::from("hunter2"));

    let read_back = provider.read(&resource.id, Some(uuid)).await.unwrap();
    assert!(read_back.exists);
    assert!(!read_back.attributes.contains_key("value"));
}

#[tokio::test]
async fn invalid_variable_key_is_rejected_locally() {
    let server = setup_mock_server().await;
    let provider = provider_for(&server);
    let resource = Resource::new("azion_environment_variable", "bad")
        .with_attribute("key", "1-BAD")
        .with_attribute("value", "x");

    let err = provider.create(&resource).await.unwrap_err();
    assert!(err.message.contains("Invalid variable key"), "{}", err);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn domain_certificate_id_travels_as_number() {
    let server = setup_mock_server().await;
    Mock::given(method("PUT"))
        .and(path("/domains/900"))
        .and(body_json(json!({
            "name": "site",
            "cnames": ["www.example.com"],
            "cname_access_only": true,
            "edge_application_id": 10,
            "is_active": true,
            "digital_certificate_id": 77
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(results(json!({
            "id": 900,
            "name": "site",
            "cnames": ["www.example.com"],
            "cname_access_only": true,
            "digital_certificate_id": 77,
            "edge_application_id": 10,
            "edge_firewall_id": null,
            "is_active": true,
            "domain_name": "abc123.map.azionedge.net",
            "environment": "production"
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let resource = Resource::new("azion_domain", "site")
        .with_attribute("name", "site")
        .with_attribute("cnames", strings(&["www.example.com"]))
        .with_attribute("cname_access_only", true)
        .with_attribute("edge_application_id", 10_i64)
        .with_attribute("digital_certificate_id", "77");
    let from = provider.read(&resource.id, None).await.unwrap();

    let state = provider
        .update(&resource.id, "900", &from, &resource)
        .await
        .unwrap();
    assert_eq!(state.attributes["digital_certificate_id"], Value::from("77"));
    assert_eq!(
        state.attributes["domain_name"],
        Value::from("abc123.map.azionedge.net")
    );
}

#[tokio::test]
async fn delete_of_vanished_object_reports_not_found() {
    let server = setup_mock_server().await;
    Mock::given(method("DELETE"))
        .and(path("/network_lists/5"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let id = ResourceId::new("azion_network_list", "gone");
    let err = provider.delete(&id, "5").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.resource_id, Some(id));
}

#[tokio::test]
async fn single_object_data_source_wraps_results() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/network_lists/31"))
        .respond_with(ResponseTemplate::new(200).set_body_json(results(json!({
            "id": 31,
            "name": "office",
            "list_type": "ip_cidr",
            "items_values": ["192.0.2.0/24"]
        }))))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let query = Resource::new("azion_network_list", "office")
        .with_attribute("id", 31_i64)
        .with_read_only(true);

    let state = provider.read_data_source(&query).await.unwrap();
    assert_eq!(state.identifier.as_deref(), Some("31"));
    let list = state.attributes["results"].as_map().unwrap();
    assert_eq!(list["list_type"], Value::from("ip_cidr"));
    assert_eq!(list["items_values"], strings(&["192.0.2.0/24"]));
}

#[tokio::test]
async fn environment_variables_data_source_hides_secrets() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/variables"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"uuid": "u1", "key": "MODE", "value": "production", "secret": false},
            {"uuid": "u2", "key": "API_TOKEN", "value": "********", "secret": true}
        ])))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let query = Resource::new("azion_environment_variables", "all").with_read_only(true);
    let state = provider.read_data_source(&query).await.unwrap();

    assert_eq!(state.attributes["counter"], Value::Int(2));
    let results = state.attributes["results"].as_list().unwrap();
    assert_eq!(
        results[0].as_map().unwrap()["value"],
        Value::from("production")
    );
    assert!(!results[1].as_map().unwrap().contains_key("value"));
}

#[tokio::test]
async fn unknown_data_source_is_an_error() {
    let server = setup_mock_server().await;
    let provider = provider_for(&server);
    let query = Resource::new("azion_nothing", "x").with_read_only(true);
    assert!(provider.read_data_source(&query).await.is_err());
}
