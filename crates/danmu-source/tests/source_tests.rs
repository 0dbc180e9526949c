//! Bilibili source integration tests against a mock server

use danmu_core::CommentSource;
use danmu_source::{BilibiliSource, VideoId};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAYLOAD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<i>
  <chatid>279786</chatid>
  <d p="1.2,1,25,16777215,1600000000,0,aa,1">好棒</d>
  <d p="3.4,1,25,16777215,1600000001,0,bb,2">好棒</d>
  <d p="5.6,1,25,16777215,1600000002,0,cc,3">无聊</d>
  <d p="7.8,1,25,16777215,1600000003,0,dd,4"> </d>
</i>"#;

fn source(server: &MockServer) -> BilibiliSource {
    BilibiliSource::new()
        .unwrap()
        .with_base_urls(server.uri(), format!("{}/comments/", server.uri()))
}

async fn mount_view(server: &MockServer, key: &str, value: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/x/web-interface/view"))
        .and(query_param(key, value))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_payload(server: &MockServer, cid: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/comments/{cid}.xml")))
        .respond_with(ResponseTemplate::new(200).set_body_string(PAYLOAD))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_fetch_comments_from_bv_url() {
    let server = MockServer::start().await;
    mount_view(&server, "bvid", "BV1xx411c7mD", json!({"code": 0, "data": {"cid": 279786}})).await;
    mount_payload(&server, 279786).await;

    let comments = source(&server)
        .fetch_comments("https://www.bilibili.com/video/BV1xx411c7mD?p=1")
        .await
        .unwrap();

    assert_eq!(comments, vec!["好棒", "好棒", "无聊"]);
}

#[tokio::test]
async fn test_fetch_comments_from_av_id() {
    let server = MockServer::start().await;
    mount_view(&server, "aid", "170001", json!({"code": 0, "data": {"cid": 42}})).await;
    mount_payload(&server, 42).await;

    let comments = source(&server).fetch_comments("av170001").await.unwrap();
    assert_eq!(comments.len(), 3);
}

#[tokio::test]
async fn test_entries_keep_offsets() {
    let server = MockServer::start().await;
    mount_payload(&server, 7).await;

    let entries = source(&server).fetch_entries(7).await.unwrap();
    assert_eq!(entries[0].offset_secs, 1.2);
    assert_eq!(entries[2].text, "无聊");
}

#[tokio::test]
async fn test_nonzero_code_is_unavailable() {
    let server = MockServer::start().await;
    mount_view(&server, "bvid", "BV1gone", json!({"code": -404, "message": "啥都木有"})).await;

    let err = source(&server)
        .resolve_cid(&VideoId::Bv("BV1gone".into()))
        .await
        .unwrap_err();

    assert!(err.is_source_unavailable());
    assert!(err.to_string().contains("-404"));
}

#[tokio::test]
async fn test_missing_cid_is_unavailable() {
    let server = MockServer::start().await;
    mount_view(&server, "bvid", "BV1nocid", json!({"code": 0, "data": {}})).await;

    let err = source(&server).fetch_comments("BV1nocid").await.unwrap_err();
    assert!(err.is_source_unavailable());
}

#[tokio::test]
async fn test_http_error_is_unavailable() {
    let server = MockServer::start().await;
    mount_view(&server, "bvid", "BV1ok", json!({"code": 0, "data": {"cid": 9}})).await;
    Mock::given(method("GET"))
        .and(path("/comments/9.xml"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = source(&server).fetch_comments("BV1ok").await.unwrap_err();
    assert!(err.is_source_unavailable());
}

#[tokio::test]
async fn test_invalid_video_id_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = source(&server)
        .fetch_comments("https://example.com/not-a-video")
        .await
        .unwrap_err();
    assert!(err.is_source_unavailable());
}
