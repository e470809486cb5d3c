//! Startup, control loop and shutdown behaviour.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use aci_auth_server::client::request_stop;
use aci_auth_server::lifecycle::StartupError;
use aci_auth_server::{start, AuthMode, FixtureConfig};
use futures_util::future::join_all;

mod common;

use common::{basic_header, get, line_id, FailingImage, Fixture, StubImage};

#[tokio::test]
async fn test_basic_scenario() {
    let fixture = Fixture::start(AuthMode::Basic, Arc::new(StubImage::default())).await;

    let (json, ready) = fixture
        .announcement
        .trim_end()
        .rsplit_once('\n')
        .expect("announcement has a ready line");
    assert_eq!(ready, format!("Ready, waiting for connections at {}", fixture.url));

    let doc: serde_json::Value = serde_json::from_str(json).unwrap();
    assert_eq!(doc["type"], "basic");
    assert_eq!(doc["rktKind"], "auth");
    assert_eq!(doc["rktVersion"], "v1");
    let domains = doc["domains"].as_array().unwrap();
    assert_eq!(domains.len(), 1);
    assert_eq!(
        format!("https://{}", domains[0].as_str().unwrap()),
        fixture.url
    );
    assert_eq!(doc["credentials"]["user"], "bar");
    assert_eq!(doc["credentials"]["password"], "baz");

    let (status, body) = get(&fixture, "/x/prog.aci", Some(basic_header("bar:baz").as_str())).await;
    assert_eq!(status, 200);
    assert!(!body.is_empty());

    let lines = fixture.shutdown().await;
    assert_eq!(lines.len(), 3);
    assert!(lines[0].ends_with("serving /x/prog.aci"));
    assert!(lines[1].contains("done ("));
    assert_eq!(lines[2], "Byebye");
}

#[tokio::test]
async fn test_none_mode_announcement_has_no_credentials() {
    let fixture = Fixture::start(AuthMode::None, Arc::new(StubImage::default())).await;
    let (json, _) = fixture.announcement.trim_end().rsplit_once('\n').unwrap();
    let doc: serde_json::Value = serde_json::from_str(json).unwrap();
    assert_eq!(doc["type"], "none");
    assert!(doc.get("credentials").is_none());
    fixture.shutdown().await;
}

#[tokio::test]
async fn test_post_stops_any_mode_with_any_headers() {
    for mode in [AuthMode::None, AuthMode::Basic, AuthMode::OAuth] {
        let fixture = Fixture::start(mode, Arc::new(StubImage::default())).await;
        let res = common::client()
            .post(fixture.url_for("/some/where"))
            .header("Authorization", "Bearer definitely-wrong")
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 200);

        let lines = fixture.wait().await;
        assert_eq!(lines, vec!["Byebye".to_string()]);
    }
}

#[tokio::test]
async fn test_stop_client() {
    let fixture = Fixture::start(AuthMode::OAuth, Arc::new(StubImage::default())).await;
    let status = request_stop(&fixture.url).await.unwrap();
    assert!(status.is_success());
    fixture.wait().await;
}

#[tokio::test]
async fn test_concurrent_fetches_keep_per_request_order() {
    const N: usize = 8;
    let fixture = Fixture::start(AuthMode::Basic, Arc::new(StubImage::default())).await;
    let auth = basic_header("bar:baz");

    let results = join_all((0..N).map(|_| get(&fixture, "/x/prog.aci", Some(auth.as_str())))).await;
    assert!(results.iter().all(|(status, _)| *status == 200));

    let lines = fixture.shutdown().await;
    assert_eq!(lines.last().map(String::as_str), Some("Byebye"));

    let mut per_request: HashMap<&str, Vec<&str>> = HashMap::new();
    for line in &lines[..lines.len() - 1] {
        let id = line_id(line).expect("diagnostic carries a request id");
        per_request.entry(id).or_default().push(line);
    }
    assert_eq!(per_request.len(), N);
    for (id, lines) in per_request {
        assert_eq!(lines.len(), 2, "request {id}: {lines:?}");
        assert!(lines[0].contains("serving"));
        assert!(lines[1].contains("done"));
    }
}

#[tokio::test]
async fn test_build_failure_is_500_and_reported() {
    let fixture = Fixture::start(AuthMode::None, Arc::new(FailingImage)).await;

    let (status, body) = get(&fixture, "/x/prog.aci", None).await;
    assert_eq!(status, 500);
    assert!(body.is_empty(), "build detail must not leak into the response");

    let lines = fixture.shutdown().await;
    assert!(lines[0].contains("serving"));
    assert!(lines[1].contains("failed ("));
    assert!(lines[1].contains("packager exploded"));
}

#[tokio::test]
async fn test_bind_conflict_is_a_startup_error() {
    let first = start(AuthMode::None, &FixtureConfig::default(), Arc::new(StubImage::default()))
        .await
        .unwrap();

    let mut config = FixtureConfig::default();
    config.listener.bind_address = first.local_addr().to_string();
    let err = start(AuthMode::None, &config, Arc::new(StubImage::default()))
        .await
        .err()
        .expect("second bind must fail");
    assert!(matches!(err, StartupError::Bind { .. }));

    tokio::time::timeout(Duration::from_secs(15), first.stop())
        .await
        .expect("stop hung")
        .unwrap();
}

#[tokio::test]
async fn test_invalid_bind_address() {
    let mut config = FixtureConfig::default();
    config.listener.bind_address = "not-an-address".into();
    let err = start(AuthMode::None, &config, Arc::new(StubImage::default()))
        .await
        .err()
        .unwrap();
    assert!(matches!(err, StartupError::Address { .. }));
}

#[tokio::test]
async fn test_listener_is_closed_after_stop() {
    let fixture = Fixture::start(AuthMode::None, Arc::new(StubImage::default())).await;
    let url = fixture.url_for("/x/prog.aci");

    let lines = fixture.shutdown().await;
    assert_eq!(lines, vec!["Byebye".to_string()]);

    let err = common::client()
        .get(&url)
        .send()
        .await
        .expect_err("server still accepting after stop");
    assert!(err.is_connect(), "unexpected error: {err}");
}

#[tokio::test]
async fn test_stop_subcommand_logs_to_stderr() {
    let fixture = Fixture::start(AuthMode::Basic, Arc::new(StubImage::default())).await;

    let output = tokio::process::Command::new(env!("CARGO_BIN_EXE_aci-auth-server"))
        .args(["stop", fixture.url.as_str()])
        .env("RUST_LOG", "aci_auth_server=debug")
        .output()
        .await
        .expect("binary runs");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stdout.trim(), "Response status: 200 OK");
    assert!(stderr.contains("Stop request answered"), "stderr: {stderr}");

    assert_eq!(fixture.wait().await, vec!["Byebye".to_string()]);
}
