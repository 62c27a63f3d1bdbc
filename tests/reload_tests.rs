//! Route reload tests: explicit reload and file watching.

use std::sync::Arc;
use std::time::Duration;

use api_mocker::{MockServer, Shutdown};
use reqwest::StatusCode;
use serde_json::{json, Value};

mod common;

use common::{eventually, start_server, MockDir};

async fn status_of(url: &str) -> StatusCode {
    match reqwest::get(url).await {
        Ok(res) => res.status(),
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

#[tokio::test]
async fn test_explicit_reload_publishes_new_routes() {
    let dir = MockDir::with_files(&[("a.json", r#"{"v":"a"}"#)]);
    let server = MockServer::bind(dir.config()).await.unwrap();
    let addr = server.local_addr().unwrap();
    let dispatcher = server.dispatcher();

    let shutdown = Shutdown::new();
    let handle = tokio::spawn(server.run(shutdown.clone()));

    let before = dispatcher.routes();
    assert_eq!(before.labels(), vec!["GET /a"]);

    dir.write("b.json", r#"{"v":"b"}"#);
    assert_eq!(status_of(&format!("http://{}/b", addr)).await, StatusCode::NOT_FOUND);

    let after = dispatcher.reload().unwrap();
    assert_eq!(after.labels(), vec!["GET /a", "GET /b"]);

    // A snapshot taken before the swap is unchanged.
    assert_eq!(before.labels(), vec!["GET /a"]);
    assert!(!Arc::ptr_eq(&before, &dispatcher.routes()));

    let res = reqwest::get(format!("http://{}/b", addr)).await.unwrap();
    assert_eq!(res.json::<Value>().await.unwrap(), json!({ "v": "b" }));

    shutdown.trigger();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_rebuild_is_deterministic() {
    let dir = MockDir::with_files(&[
        ("users.json", "[]"),
        ("users.post.json", "{}"),
        ("users-[id].json", "{}"),
        ("orders/order-[id]/items.json", "[]"),
        ("health.json", "{}"),
    ]);
    let server = MockServer::bind(dir.config()).await.unwrap();

    let first = server.routes().labels();
    let second = server.reload().unwrap().labels();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_watcher_picks_up_new_and_removed_files() {
    let dir = MockDir::with_files(&[("a.json", "{}")]);
    let config = api_mocker::MockServerConfig {
        watch: true,
        ..dir.config()
    };
    let server = start_server(config).await;
    let late_url = server.url("/late");

    assert_eq!(status_of(&late_url).await, StatusCode::NOT_FOUND);

    dir.write("late.json", r#"{"late":true}"#);
    let appeared = eventually(Duration::from_secs(10), || {
        let url = late_url.clone();
        async move { status_of(&url).await == StatusCode::OK }
    })
    .await;
    assert!(appeared, "new mock file was not picked up");

    dir.remove("late.json");
    let vanished = eventually(Duration::from_secs(10), || {
        let url = late_url.clone();
        async move { status_of(&url).await == StatusCode::NOT_FOUND }
    })
    .await;
    assert!(vanished, "removed mock file is still served");
}

#[tokio::test]
async fn test_watcher_sees_edits() {
    let dir = MockDir::with_files(&[("item.json", r#"{"v":1}"#)]);
    let config = api_mocker::MockServerConfig {
        watch: true,
        cache: true,
        ..dir.config()
    };
    let server = start_server(config).await;
    let url = server.url("/item");

    let body: Value = reqwest::get(&url).await.unwrap().json().await.unwrap();
    assert_eq!(body, json!({ "v": 1 }));

    dir.write("item.json", r#"{"v":2}"#);
    let updated = eventually(Duration::from_secs(10), || {
        let url = url.clone();
        async move {
            match reqwest::get(&url).await {
                Ok(res) => res.json::<Value>().await.ok() == Some(json!({ "v": 2 })),
                Err(_) => false,
            }
        }
    })
    .await;
    assert!(updated, "cached mock was not refreshed after an edit");
}

#[tokio::test]
async fn test_watcher_follows_renamed_directory() {
    let dir = MockDir::with_files(&[("users/list.json", r#"[{"id":1}]"#)]);
    let config = api_mocker::MockServerConfig {
        watch: true,
        ..dir.config()
    };
    let server = start_server(config).await;
    let old_url = server.url("/users/list");
    let new_url = server.url("/people/list");

    assert_eq!(status_of(&old_url).await, StatusCode::OK);
    assert_eq!(status_of(&new_url).await, StatusCode::NOT_FOUND);

    dir.rename("users", "people");
    let moved = eventually(Duration::from_secs(10), || {
        let url = new_url.clone();
        async move { status_of(&url).await == StatusCode::OK }
    })
    .await;
    assert!(moved, "routes under the renamed directory were not picked up");
    assert_eq!(status_of(&old_url).await, StatusCode::NOT_FOUND);

    let body: Value = reqwest::get(&new_url).await.unwrap().json().await.unwrap();
    assert_eq!(body, json!([{ "id": 1 }]));
}
