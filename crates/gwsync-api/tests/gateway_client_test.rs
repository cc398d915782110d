#![allow(clippy::unwrap_used)]
// Integration tests for `GatewayClient` using wiremock.

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_bytes, body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gwsync_api::{ConfigType, Error, GatewayClient, NodeInfo, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

fn client_for(uri: &str) -> GatewayClient {
    let base_url = Url::parse(&format!("{uri}/airlock/rest/")).unwrap();
    let key: SecretString = "test-key".to_string().into();
    GatewayClient::with_base_url(base_url, &key, &TransportConfig::default()).unwrap()
}

async fn setup() -> (MockServer, GatewayClient) {
    let server = MockServer::start().await;
    let client = client_for(&server.uri());
    (server, client)
}

fn rest_path(suffix: &str) -> String {
    format!("/airlock/rest/{suffix}")
}

// ── URL construction ────────────────────────────────────────────────

#[test]
fn test_management_url_ipv4() {
    let url = GatewayClient::management_url("10.0.0.5", 443).unwrap();
    assert_eq!(url.as_str(), "https://10.0.0.5/airlock/rest/");
}

#[test]
fn test_management_url_brackets_ipv6() {
    let url = GatewayClient::management_url("fd00::5", 8443).unwrap();
    assert_eq!(url.as_str(), "https://[fd00::5]:8443/airlock/rest/");
}

// ── Session tests ───────────────────────────────────────────────────

#[tokio::test]
async fn test_create_session_sends_bearer_token() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(rest_path("session/create")))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    client.create_session().await.unwrap();
}

#[tokio::test]
async fn test_create_session_rejected() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(rest_path("session/create")))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad token"))
        .mount(&server)
        .await;

    let result = client.create_session().await;

    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_session_cookie_is_replayed() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(rest_path("session/create")))
        .respond_with(
            ResponseTemplate::new(200).insert_header("set-cookie", "JSESSIONID=abc123; Path=/"),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(rest_path("session/terminate")))
        .and(header("cookie", "JSESSIONID=abc123"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.create_session().await.unwrap();
    client.terminate_session().await.unwrap();
}

// ── Configuration tests ─────────────────────────────────────────────

#[tokio::test]
async fn test_list_configurations() {
    let (server, client) = setup().await;

    let document = json!({
        "data": [
            {
                "type": "configuration",
                "id": "17",
                "attributes": {
                    "configType": "CURRENTLY_ACTIVE",
                    "comment": "baseline",
                    "createdAt": "2024-06-15T10:30:00Z"
                }
            },
            {
                "type": "configuration",
                "id": "16",
                "attributes": { "configType": "PREVIOUSLY_ACTIVE" }
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path(rest_path("configuration/configurations")))
        .respond_with(ResponseTemplate::new(200).set_body_json(&document))
        .mount(&server)
        .await;

    let configs = client.list_configurations().await.unwrap();

    assert_eq!(configs.len(), 2);
    assert!(configs[0].is_active());
    assert_eq!(configs[0].attributes.comment.as_deref(), Some("baseline"));
    assert_eq!(configs[1].attributes.config_type, ConfigType::PreviouslyActive);
    assert!(configs[1].attributes.comment.is_none());
}

#[tokio::test]
async fn test_list_configurations_bad_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(rest_path("configuration/configurations")))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let result = client.list_configurations().await;

    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_load_active_unexpected_status() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(rest_path("configuration/configurations/load-active")))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    match client.load_active_configuration().await {
        Err(Error::Api {
            status, message, ..
        }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_export_writes_archive() {
    let (server, client) = setup().await;
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("config.zip");
    std::fs::write(&dest, b"stale").unwrap();

    Mock::given(method("GET"))
        .and(path(rest_path("configuration/configurations/export")))
        .and(header("accept", "application/zip"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PK\x03\x04zip".to_vec()))
        .mount(&server)
        .await;

    let size = client.export_configuration_file(&dest).await.unwrap();

    assert_eq!(size, 7);
    assert_eq!(std::fs::read(&dest).unwrap(), b"PK\x03\x04zip");
}

#[tokio::test]
async fn test_import_uploads_archive() {
    let (server, client) = setup().await;
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("config.zip");
    std::fs::write(&src, b"PK\x03\x04zip").unwrap();

    Mock::given(method("PUT"))
        .and(path(rest_path("configuration/configurations/import")))
        .and(header("content-type", "application/zip"))
        .and(body_bytes(b"PK\x03\x04zip".to_vec()))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.import_configuration_file(&src).await.unwrap();
}

#[tokio::test]
async fn test_import_missing_archive() {
    let (_server, client) = setup().await;
    let dir = tempfile::tempdir().unwrap();

    let result = client
        .import_configuration_file(&dir.path().join("missing.zip"))
        .await;

    assert!(
        matches!(result, Err(Error::Archive { .. })),
        "expected Archive error, got: {result:?}"
    );
}

// ── Activation tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_activate_success() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(rest_path("configuration/configurations/activate")))
        .and(body_json(json!({ "comment": "baseline (sync from A)" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client.activate("baseline (sync from A)").await.unwrap());
}

#[tokio::test]
async fn test_activate_refused() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(rest_path("configuration/configurations/activate")))
        .respond_with(ResponseTemplate::new(400).set_body_string("validation failed"))
        .mount(&server)
        .await;

    assert!(!client.activate("baseline").await.unwrap());
}

#[tokio::test]
async fn test_activate_on_closed_connection_is_disconnect() {
    let server = MockServer::start().await;
    let client = client_for(&server.uri());
    drop(server);

    let err = client.activate("baseline").await.unwrap_err();

    assert!(err.is_disconnect(), "expected disconnect, got: {err:?}");
}

// ── Node tests ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_node_read_and_patch() {
    let (server, client) = setup().await;

    let node = json!({
        "data": {
            "type": "node",
            "id": "1",
            "attributes": { "hostName": "gwB", "managementInterface": "eth0" }
        }
    });

    Mock::given(method("GET"))
        .and(path(rest_path("configuration/nodes/current")))
        .respond_with(ResponseTemplate::new(200).set_body_json(&node))
        .mount(&server)
        .await;

    let mut masked = node.clone();
    masked["data"]["attributes"]["hostName"] = json!("gwA");

    Mock::given(method("PATCH"))
        .and(path(rest_path("configuration/nodes/current")))
        .and(body_json(&masked))
        .respond_with(ResponseTemplate::new(200).set_body_json(&masked))
        .expect(1)
        .mount(&server)
        .await;

    let current = client.current_node().await.unwrap();
    assert_eq!(current, NodeInfo::from_value(node));
    assert_eq!(current.hostname(), Some("gwB"));

    client
        .patch_current_node(&current.with_hostname("gwA").unwrap())
        .await
        .unwrap();
}
