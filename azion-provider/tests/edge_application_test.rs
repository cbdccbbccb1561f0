//! Edge application resources against a mock API

mod common;

use azion_core::provider::Provider;
use azion_core::resource::{Resource, ResourceId, Value};
use azion_provider::attrs::AttrsBuilder;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use common::{provider_for, results, setup_mock_server};

fn rule_json(id: i64) -> serde_json::Value {
    json!({
        "id": id,
        "name": "cache static",
        "phase": "request",
        "description": "",
        "is_active": true,
        "order": 1,
        "behaviors": [
            {"name": "set_cache_policy", "target": "7"},
            {"name": "deliver"}
        ],
        "criteria": [[
            {
                "variable": "${uri}",
                "operator": "starts_with",
                "conditional": "if",
                "input_value": "/static"
            }
        ]]
    })
}

fn rule_resource() -> Resource {
    let behaviors = vec![
        Value::Map(
            AttrsBuilder::new()
                .set("name", "set_cache_policy")
                .set("target", "7")
                .build(),
        ),
        Value::Map(AttrsBuilder::new().set("name", "deliver").build()),
    ];
    let entry = AttrsBuilder::new()
        .set("variable", "${uri}")
        .set("operator", "starts_with")
        .set("conditional", "if")
        .set("input_value", "/static")
        .build();
    let group = AttrsBuilder::new().blocks("entries", vec![entry]).build();

    Resource::new("azion_edge_application_rule_engine", "static")
        .with_attribute("edge_application_id", 10_i64)
        .with_attribute("phase", "request")
        .with_attribute("name", "cache static")
        .with_attribute("behaviors", Value::List(behaviors))
        .with_attribute("criteria", Value::List(vec![Value::Map(group)]))
}

#[tokio::test]
async fn create_rule_posts_behaviors_and_criteria() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/edge_applications/10/rules_engine/request/rules"))
        .and(body_json(json!({
            "name": "cache static",
            "behaviors": [
                {"name": "set_cache_policy", "target": "7"},
                {"name": "deliver"}
            ],
            "criteria": [[
                {
                    "variable": "${uri}",
                    "operator": "starts_with",
                    "conditional": "if",
                    "input_value": "/static"
                }
            ]]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(results(rule_json(3))))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let state = provider.create(&rule_resource()).await.unwrap();
    assert_eq!(state.identifier.as_deref(), Some("10/request/3"));
    assert_eq!(state.attributes["rule_id"], Value::Int(3));
    assert_eq!(state.attributes["phase"], Value::from("request"));
}

#[tokio::test]
async fn import_rule_validates_phase() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/edge_applications/10/rules_engine/response/rules/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(results(rule_json(3))))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let id = ResourceId::new("azion_edge_application_rule_engine", "static");

    let state = provider.import(&id, "10/response/3").await.unwrap();
    assert_eq!(state.identifier.as_deref(), Some("10/response/3"));
    assert_eq!(state.attributes["phase"], Value::from("response"));

    let err = provider.import(&id, "10/default/3").await.unwrap_err();
    assert!(err.message.contains("Invalid phase"), "{}", err);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn rate_limited_requests_are_retried() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/edge_applications/10/rules_engine/request/rules/3"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/edge_applications/10/rules_engine/request/rules/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(results(rule_json(3))))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let id = ResourceId::new("azion_edge_application_rule_engine", "static");
    let state = provider.read(&id, Some("10/request/3")).await.unwrap();
    assert!(state.exists);
    assert_eq!(state.attributes["name"], Value::from("cache static"));
}

#[tokio::test]
async fn rate_limit_gives_up_after_max_retries() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/edge_applications/10"))
        .respond_with(ResponseTemplate::new(429))
        .expect(3)
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let id = ResourceId::new("azion_edge_application_main_setting", "site");
    let err = provider.read(&id, Some("10")).await.unwrap_err();
    assert!(err.message.contains("429"), "{}", err);
    assert!(err.message.contains("after 3 attempts"), "{}", err);
}

#[tokio::test]
async fn function_instance_keeps_configured_args_text() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/edge_applications/10/functions_instances"))
        .and(body_json(json!({
            "name": "auth",
            "edge_function_id": 55,
            "args": {"b": 2, "a": 1}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(results(json!({
            "id": 8,
            "edge_function_id": 55,
            "name": "auth",
            "args": {"a": 1, "b": 2}
        }))))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/edge_applications/10/functions_instances/8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(results(json!({
            "id": 8,
            "edge_function_id": 55,
            "name": "auth",
            "args": {"a": 1, "b": 2}
        }))))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let resource = Resource::new("azion_edge_application_edge_functions_instance", "auth")
        .with_attribute("edge_application_id", 10_i64)
        .with_attribute("name", "auth")
        .with_attribute("edge_function_id", 55_i64)
        .with_attribute("args", "{ \"b\": 2, \"a\": 1 }");

    let state = provider.create(&resource).await.unwrap();
    assert_eq!(state.identifier.as_deref(), Some("10/8"));
    assert_eq!(state.attributes["args"], Value::from("{ \"b\": 2, \"a\": 1 }"));

    let read_back = provider.read(&resource.id, Some("10/8")).await.unwrap();
    assert_eq!(read_back.attributes["args"], Value::from("{\"a\":1,\"b\":2}"));
}

#[tokio::test]
async fn invalid_args_never_reach_the_api() {
    let server = setup_mock_server().await;
    let provider = provider_for(&server);
    let resource = Resource::new("azion_edge_application_edge_functions_instance", "auth")
        .with_attribute("edge_application_id", 10_i64)
        .with_attribute("name", "auth")
        .with_attribute("edge_function_id", 55_i64)
        .with_attribute("args", "[1, 2]");

    assert!(provider.create(&resource).await.is_err());
    assert!(server.received_requests().await.unwrap().is_empty());
}
