//! End-to-end tests against a local mock HTTP server.

use crate::client::{ApiClient, ClientConfig};
use crate::error::{CloudError, ErrorKind};
use crate::services::{
    AssetOwner, AssetService, AssetType, CreateAssetOptions, DataStoreOptions, DataStoreService,
    FileType, GroupService, MembersOptions, MessagingService, PlaceService, ServiceArgs,
    ServiceRegistry, SetEntryOptions, VersionType,
};
use crate::types::Payload;
use mockito::Matcher;
use serde_json::json;

const KEY: &str = "test-key";

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn client(server: &mockito::ServerGuard) -> ApiClient {
    init_tracing();
    ApiClient::with_config(KEY, ClientConfig::with_base_url(server.url())).unwrap()
}

fn entry_query(key: &str) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("datastoreName".into(), "Players".into()),
        Matcher::UrlEncoded("entryKey".into(), key.into()),
    ])
}

// ========== Data stores ==========

#[tokio::test]
async fn test_get_entry_with_metadata() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/datastores/v1/universes/1/standard-datastores/datastore/entries/entry")
        .match_query(entry_query("user_1"))
        .match_header("x-api-key", KEY)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_header("roblox-entry-created-time", "2024-01-02T03:04:05.678Z")
        .with_header("last-modified", "Tue, 02 Jan 2024 03:04:06 GMT")
        .with_header("roblox-entry-version", "08DC0B3C6A2F1E2A.0000000001.08DC0B3C6A2F1E2A.01")
        .with_header("roblox-entry-attributes", r#"{"tier":"gold"}"#)
        .with_header("roblox-entry-userids", "[1,2]")
        .with_body(r#"{"coins":10}"#)
        .create_async()
        .await;

    let store = DataStoreService::new(client(&server), 1)
        .data_store("Players", DataStoreOptions::default());
    let entry = store.get("user_1").await.unwrap();

    assert_eq!(entry.value.as_json(), Some(&json!({"coins": 10})));
    assert_eq!(
        entry.metadata.version.as_deref(),
        Some("08DC0B3C6A2F1E2A.0000000001.08DC0B3C6A2F1E2A.01")
    );
    assert_eq!(entry.metadata.attributes, Some(json!({"tier": "gold"})));
    assert_eq!(entry.metadata.user_ids, Some(vec![1, 2]));
    assert_eq!(
        entry.metadata.created_time.unwrap().to_rfc3339(),
        "2024-01-02T03:04:05.678+00:00"
    );
    assert!(entry.metadata.last_modified.is_some());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_set_exclusive_create() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/datastores/v1/universes/1/standard-datastores/datastore/entries/entry")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("datastoreName".into(), "Players".into()),
            Matcher::UrlEncoded("entryKey".into(), "user_1".into()),
            Matcher::UrlEncoded("scope".into(), "season2".into()),
            Matcher::UrlEncoded("exclusiveCreate".into(), "true".into()),
        ]))
        .match_header("x-api-key", KEY)
        .match_header("content-type", "application/json")
        .match_header("content-md5", crate::protocol::content_md5(br#"{"coins":10}"#).as_str())
        .match_header("roblox-entry-userids", "[7]")
        .match_header("roblox-entry-attributes", Matcher::Missing)
        .match_body(Matcher::JsonString(r#"{"coins":10}"#.into()))
        .with_status(200)
        .with_body(
            r#"{"version":"v1","deleted":false,"contentLength":12,"createdTime":"2024-01-02T03:04:05.678Z","objectCreatedTime":"2024-01-02T03:04:05.678Z"}"#,
        )
        .create_async()
        .await;

    let store = DataStoreService::new(client(&server), 1).data_store(
        "Players",
        DataStoreOptions {
            scope: Some("season2".into()),
        },
    );
    let written = store
        .set(
            "user_1",
            &json!({"coins": 10}),
            SetEntryOptions::new().with_user_ids(vec![7]).exclusive_create(),
        )
        .await
        .unwrap();

    assert_eq!(written.version, "v1");
    assert_eq!(written.content_length, 12);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_delete_no_content() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("DELETE", "/datastores/v1/universes/1/standard-datastores/datastore/entries/entry")
        .match_query(entry_query("gone"))
        .with_status(204)
        .create_async()
        .await;

    DataStoreService::new(client(&server), 1)
        .data_store("Players", DataStoreOptions::default())
        .delete("gone")
        .await
        .unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_not_found_is_server_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/datastores/v1/universes/1/standard-datastores/datastore/entries/entry")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":"NOT_FOUND","message":"Entry not found in the datastore."}"#)
        .create_async()
        .await;

    let err = DataStoreService::new(client(&server), 1)
        .data_store("Players", DataStoreOptions::default())
        .get("missing")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Server);
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.server_body().unwrap()["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_html_error_is_protocol_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/datastores/v1/universes/1/standard-datastores")
        .with_status(500)
        .with_header("content-type", "text/html")
        .with_body("<html>oops</html>")
        .create_async()
        .await;

    let err = DataStoreService::new(client(&server), 1)
        .list_data_stores(Default::default())
        .await
        .unwrap_err();

    assert!(matches!(
        &err,
        CloudError::Protocol { status: 500, message } if message == "500 - Internal Server Error"
    ));
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn test_malformed_version_rejected_before_request() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let err = DataStoreService::new(client(&server), 1)
        .data_store("Players", DataStoreOptions::default())
        .get_version("user_1", "bad version\n")
        .await
        .unwrap_err();

    assert!(err.is_validation());
    mock.assert_async().await;
}

// ========== Other services ==========

#[tokio::test]
async fn test_publish_message() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/messaging-service/v1/universes/3/topics/alerts")
        .match_header("x-api-key", KEY)
        .match_body(Matcher::Json(json!({"message": {"level": 2}})))
        .with_status(200)
        .create_async()
        .await;

    MessagingService::new(client(&server), 3)
        .topic("alerts")
        .publish(&json!({"level": 2}))
        .await
        .unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_publish_place() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/universes/v1/3/places/8/versions")
        .match_query(Matcher::UrlEncoded("versionType".into(), "Published".into()))
        .match_header("content-type", "application/octet-stream")
        .match_body(vec![0u8, 159, 146, 150])
        .with_status(200)
        .with_body(r#"{"versionNumber":4}"#)
        .create_async()
        .await;

    let res = PlaceService::new(client(&server), 3)
        .place(8)
        .publish(VersionType::Published, FileType::Rbxl, vec![0u8, 159, 146, 150])
        .await
        .unwrap();

    assert_eq!(res.version_number, 4);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_create_asset_multipart() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/assets/v1/assets")
        .match_header("x-api-key", KEY)
        .match_header(
            "content-type",
            Matcher::Regex("^multipart/form-data; boundary=".into()),
        )
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="request""#.into()),
            Matcher::Regex(r#"name="fileContent"; filename="logo.png""#.into()),
            Matcher::Regex(r#""groupId":5"#.into()),
            Matcher::Regex("PNGDATA".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"path":"operations/9f","done":false}"#)
        .create_async()
        .await;

    let op = AssetService::new(client(&server), 5, AssetOwner::Group)
        .create(
            AssetType::Decal,
            "Logo",
            b"PNGDATA".to_vec(),
            CreateAssetOptions {
                file_name: Some("logo.png".into()),
                content_type: Some("image/png".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(op.path.as_deref(), Some("operations/9f"));
    assert!(!op.done);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_group_members_passthrough() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/cloud/v2/groups/44/memberships")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("maxPageSize".into(), "2".into()),
            Matcher::UrlEncoded("pageToken".into(), "next".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"groupMemberships":[{"path":"groups/44/memberships/1"}],"nextPageToken":"more"}"#)
        .create_async()
        .await;

    let page = GroupService::new(client(&server), 44)
        .get_members(
            2,
            MembersOptions {
                page_token: Some("next".into()),
                filter: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(page["nextPageToken"], "more");
    assert_eq!(page["groupMemberships"].as_array().unwrap().len(), 1);
    mock.assert_async().await;
}

// ========== Transport and registry ==========

#[tokio::test]
async fn test_unreachable_host_is_transport_error() {
    init_tracing();
    let client = ApiClient::with_config(
        KEY,
        ClientConfig {
            base_url: "http://127.0.0.1:1".into(),
            request_timeout_ms: Some(2_000),
            ..Default::default()
        },
    )
    .unwrap();

    let err = GroupService::new(client, 1).get_info().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(std::error::Error::source(&err).is_some());
}

#[tokio::test]
async fn test_registry_services_reach_server() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/cloud/v2/groups/12/shout")
        .match_header("x-api-key", KEY)
        .with_status(200)
        .with_body(r#"{"content":"hello"}"#)
        .create_async()
        .await;

    let registry = ServiceRegistry::with_client(client(&server));
    registry.register("GroupService", ServiceArgs::new(12)).unwrap();

    let first = registry.get("GroupService").unwrap();
    let second = registry.get("GroupService").unwrap();
    assert!(first.ptr_eq(&second));

    let shout = first.as_group().unwrap().get_shout().await.unwrap();
    assert_eq!(shout, json!({"content": "hello"}));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_empty_success_body() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/datastores/v1/universes/1/standard-datastores/datastore/entries/entry/increment")
        .match_query(Matcher::UrlEncoded("incrementBy".into(), "-3".into()))
        .with_status(200)
        .with_header("roblox-entry-version", "v9")
        .create_async()
        .await;

    let entry = DataStoreService::new(client(&server), 1)
        .data_store("Players", DataStoreOptions::default())
        .increment("score", -3, Default::default())
        .await
        .unwrap();

    assert_eq!(entry.value, Payload::Empty);
    assert_eq!(entry.metadata.version.as_deref(), Some("v9"));
}
