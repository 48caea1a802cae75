use rlv::{Backend, BackendError, HttpBackend, ImportRule};
use wiremock::matchers::{body_json_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn rule_json(name: &str, priority: u32) -> serde_json::Value {
    serde_json::json!({
        "kind": "okta_import_rule",
        "metadata": { "name": name },
        "spec": {
            "priority": priority,
            "mappings": [
                {
                    "add_labels": { "label1": "value1" },
                    "match": [ { "app_ids": ["1", "2", "3"] } ]
                }
            ]
        }
    })
}

#[tokio::test]
async fn test_create_import_rule_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/okta/import_rules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rule_json("test", 100)))
        .mount(&mock_server)
        .await;

    let backend = HttpBackend::with_base_url(mock_server.uri()).unwrap();
    let mut rule: ImportRule = serde_json::from_value(rule_json("test", 100)).unwrap();
    rule.check_and_set_defaults().unwrap();

    let created = backend.create_import_rule(rule).await.unwrap();
    assert_eq!(created.name(), "test");
    assert_eq!(created.spec.priority, 100);
}

#[tokio::test]
async fn test_create_conflict_is_already_exists() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/okta/import_rules"))
        .respond_with(ResponseTemplate::new(409))
        .mount(&mock_server)
        .await;

    let backend = HttpBackend::with_base_url(mock_server.uri()).unwrap();
    let rule: ImportRule = serde_json::from_value(rule_json("test", 100)).unwrap();

    let err = backend.create_import_rule(rule).await.unwrap_err();
    assert!(matches!(err, BackendError::AlreadyExists { .. }));
}

#[tokio::test]
async fn test_get_import_rule_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/okta/import_rules/test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rule_json("test", 100)))
        .mount(&mock_server)
        .await;

    let backend = HttpBackend::with_base_url(mock_server.uri()).unwrap();
    let rule = backend.get_import_rule("test").await.unwrap();
    assert_eq!(rule.kind, "okta_import_rule");
    assert_eq!(rule.spec.mappings.len(), 1);
}

#[tokio::test]
async fn test_get_404_is_tagged_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/okta/import_rules/absent"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let backend = HttpBackend::with_base_url(mock_server.uri()).unwrap();
    let err = backend.get_import_rule("absent").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "import rule not found: 'absent'");
}

#[tokio::test]
async fn test_get_server_error_is_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/okta/import_rules/test"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&mock_server)
        .await;

    let backend = HttpBackend::with_base_url(mock_server.uri()).unwrap();
    let err = backend.get_import_rule("test").await.unwrap_err();

    match err {
        BackendError::Api { status, message } => {
            assert_eq!(status, 500);
            assert!(message.contains("internal error"));
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_update_import_rule_puts_to_named_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/v1/okta/import_rules/test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rule_json("test", 200)))
        .mount(&mock_server)
        .await;

    let backend = HttpBackend::with_base_url(mock_server.uri()).unwrap();
    let rule: ImportRule = serde_json::from_value(rule_json("test", 200)).unwrap();

    let updated = backend.update_import_rule(rule).await.unwrap();
    assert_eq!(updated.spec.priority, 200);
}

#[tokio::test]
async fn test_delete_import_rule_success_and_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v1/okta/import_rules/test"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/v1/okta/import_rules/absent"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let backend = HttpBackend::with_base_url(mock_server.uri()).unwrap();
    backend.delete_import_rule("test").await.unwrap();

    let err = backend.delete_import_rule("absent").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_bearer_token_sent_on_requests() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/okta/import_rules/test"))
        .and(header("authorization", "Bearer test_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rule_json("test", 100)))
        .mount(&mock_server)
        .await;

    let backend = HttpBackend::new(mock_server.uri(), Some("test_token".to_string())).unwrap();
    assert!(backend.get_import_rule("test").await.is_ok());
}

#[tokio::test]
async fn test_create_sends_wire_shape_without_empty_lists() {
    let mock_server = MockServer::start().await;

    let mut rule: ImportRule = serde_json::from_value(rule_json("test", 100)).unwrap();
    rule.check_and_set_defaults().unwrap();
    let expected_body = serde_json::to_string(&rule).unwrap();

    Mock::given(method("POST"))
        .and(path("/v1/okta/import_rules"))
        .and(body_json_string(&expected_body))
        .respond_with(ResponseTemplate::new(200).set_body_json(rule_json("test", 100)))
        .mount(&mock_server)
        .await;

    let backend = HttpBackend::with_base_url(mock_server.uri()).unwrap();
    assert!(backend.create_import_rule(rule).await.is_ok());
}
