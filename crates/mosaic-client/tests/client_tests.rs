//! Mosaic client integration tests against a mock HTTP server.

use std::time::Duration;

use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mosaic_client::{wait_for_run, MosaicClient, MosaicConfig, MosaicError, PollConfig};
use mosaic_models::{FileId, RunId, RunSpec, RunStatus};

fn test_client(server: &MockServer) -> MosaicClient {
    let config = MosaicConfig::new("mk-test").with_base_url(server.uri());
    MosaicClient::new(config).unwrap()
}

/// Test the full slot / PUT / finalize upload sequence.
#[tokio::test]
async fn test_upload_bytes_full_flow() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/video/get-upload-url"))
        .and(header("authorization", "Bearer mk-test"))
        .and(body_json(serde_json::json!({
            "filename": "clip.mp4",
            "file_size": 2048,
            "content_type": "video/mp4",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "upload_url": format!("{}/signed/abc", server.uri()),
            "video_id": "vid-123",
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/signed/abc"))
        .and(header("content-type", "video/mp4"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/video/finalize-upload/vid-123"))
        .and(header("authorization", "Bearer mk-test"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"file_uuid": "file-777"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let file_id = client
        .upload_bytes("clip.mp4", vec![0u8; 2048])
        .await
        .unwrap();
    assert_eq!(file_id, FileId::from("file-777"));

    // The signed PUT must not leak the API key
    let requests = server.received_requests().await.unwrap();
    let put = requests
        .iter()
        .find(|r| r.url.path() == "/signed/abc")
        .unwrap();
    assert!(put
        .headers
        .keys()
        .all(|k| !k.as_str().eq_ignore_ascii_case("authorization")));
}

/// Test that a local file streams through the same sequence.
#[tokio::test]
async fn test_upload_file_from_disk() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let path_on_disk = dir.path().join("take one.mov");
    std::fs::write(&path_on_disk, vec![7u8; 4096]).unwrap();

    Mock::given(method("POST"))
        .and(path("/video/get-upload-url"))
        .and(body_json(serde_json::json!({
            "filename": "take one.mov",
            "file_size": 4096,
            "content_type": "video/quicktime",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "upload_url": format!("{}/signed/mov", server.uri()),
            "video_id": "vid-9",
        })))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/signed/mov"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/video/finalize-upload/vid-9"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"file_uuid": "file-9"})),
        )
        .mount(&server)
        .await;

    let client = test_client(&server);
    let file_id = client.upload_file(&path_on_disk).await.unwrap();
    assert_eq!(file_id.as_str(), "file-9");
}

/// Test that undersized uploads are rejected before any request is made.
#[tokio::test]
async fn test_upload_rejects_tiny_file() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    let err = client
        .upload_bytes("stub.mp4", vec![0u8; 10])
        .await
        .unwrap_err();
    assert!(matches!(err, MosaicError::FileTooSmall { size: 10, .. }));
}

/// Test that prompt runs send an explicit null agent_id.
#[tokio::test]
async fn test_run_agent_with_prompt_sends_null_agent_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/run-agent"))
        .and(body_json(serde_json::json!({
            "agent_id": null,
            "file_id": "file-1",
            "auto": true,
            "prompt": "cut the silences",
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"agent_run_id": "run-42"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let spec = RunSpec::prompt(FileId::from("file-1"), "cut the silences");
    let run_id = client.run_agent(&spec).await.unwrap();
    assert_eq!(run_id, RunId::from("run-42"));
}

/// Test agent runs carry the id and pass parameters through.
#[tokio::test]
async fn test_run_agent_with_agent_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/run-agent"))
        .and(body_json(serde_json::json!({
            "agent_id": "agent-7",
            "file_id": "file-1",
            "auto": false,
            "parameters": {"language": "en"},
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"agent_run_id": "run-43"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let spec = RunSpec::agent(FileId::from("file-1"), "agent-7".into())
        .with_auto(false)
        .with_parameters(serde_json::json!({"language": "en"}));
    let run_id = client.run_agent(&spec).await.unwrap();
    assert_eq!(run_id.as_str(), "run-43");
}

/// Test that wire status aliases map onto the canonical states.
#[tokio::test]
async fn test_get_run_maps_wire_aliases() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/get-agent-run-simple/run-1"))
        .and(header("authorization", "Bearer mk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "running",
            "progress": 12.5,
            "status_message": "detecting takes",
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let snapshot = client.get_run(&RunId::from("run-1")).await.unwrap();
    assert_eq!(snapshot.status, RunStatus::Processing);
    assert_eq!(snapshot.progress, Some(12.5));
    assert_eq!(snapshot.status_message.as_deref(), Some("detecting takes"));
}

/// Test output listing decode, extra fields included.
#[tokio::test]
async fn test_get_run_outputs() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/get-agent-run-outputs/run-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "outputs": [
                {"download_url": "https://cdn.example/a.mp4", "node_id": "node-aaaa-bbbb", "kind": "video"},
                {"download_url": "https://cdn.example/b.mp4"},
            ],
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let outputs = client
        .get_run_outputs(&RunId::from("run-1"))
        .await
        .unwrap();
    assert_eq!(outputs.len(), 2);
    assert_eq!(outputs[0].output_stem(), "node-aaa");
    assert_eq!(outputs[1].output_stem(), "output");
}

/// Test that API failures surface the status and body.
#[tokio::test]
async fn test_api_error_carries_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/get-agent-run-simple/run-x"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client.get_run(&RunId::from("run-x")).await.unwrap_err();
    match err {
        MosaicError::ApiStatus { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("invalid api key"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

/// Test that 5xx responses are retried and eventually succeed.
#[tokio::test]
async fn test_transient_server_errors_are_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/get-agent-run-simple/run-r"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/get-agent-run-simple/run-r"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "pending"})),
        )
        .mount(&server)
        .await;

    let client = test_client(&server);
    let snapshot = client.get_run(&RunId::from("run-r")).await.unwrap();
    assert_eq!(snapshot.status, RunStatus::Pending);
}

/// Test polling runs to a terminal state.
#[tokio::test]
async fn test_wait_for_run_polls_until_terminal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/get-agent-run-simple/run-p"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({"status": "processing", "progress": 40.0}),
        ))
        .up_to_n_times(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/get-agent-run-simple/run-p"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({"status": "success", "progress": 100.0}),
        ))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let config = PollConfig::default()
        .with_interval(Duration::from_millis(10))
        .with_deadline(Duration::from_secs(5));
    let snapshot = wait_for_run(&client, &RunId::from("run-p"), &config)
        .await
        .unwrap();
    assert_eq!(snapshot.status, RunStatus::Success);
}

/// Test the polling deadline fires on runs that never finish.
#[tokio::test]
async fn test_wait_for_run_deadline() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/get-agent-run-simple/run-d"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"status": "processing"})),
        )
        .mount(&server)
        .await;

    let client = test_client(&server);
    let config = PollConfig::default()
        .with_interval(Duration::from_millis(10))
        .with_deadline(Duration::from_millis(50));
    let err = wait_for_run(&client, &RunId::from("run-d"), &config)
        .await
        .unwrap_err();
    assert!(matches!(err, MosaicError::PollDeadline(_)));
}

/// Test URL ingestion rejects oversized files before uploading.
#[tokio::test]
async fn test_upload_from_url_rejects_oversized() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/big.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 4096]))
        .mount(&server)
        .await;

    let mut config = MosaicConfig::new("mk-test").with_base_url(server.uri());
    config.max_file_bytes = 2048;
    let client = MosaicClient::new(config).unwrap();

    let err = client
        .upload_from_url(&format!("{}/big.mp4", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, MosaicError::FileTooLarge { .. }));
}

/// Test URL ingestion only accepts http and https sources.
#[tokio::test]
async fn test_upload_from_url_rejects_odd_schemes() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    let err = client
        .upload_from_url("ftp://example.com/clip.mp4")
        .await
        .unwrap_err();
    assert!(matches!(err, MosaicError::InvalidUrl(_)));
}

/// Test streaming a download into a local file.
#[tokio::test]
async fn test_download_to_file() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/out/final.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"rendered".to_vec()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("downloads").join("final.mp4");

    let client = test_client(&server);
    let written = client
        .download_to_file(&format!("{}/out/final.mp4", server.uri()), &dest)
        .await
        .unwrap();
    assert_eq!(written, 8);
    assert_eq!(std::fs::read(&dest).unwrap(), b"rendered");
}
