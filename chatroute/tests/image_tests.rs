mod common;

use chatroute::{ErrorKind, InvocationResult, RequestOptions, Turn};
use common::*;
use serde_json::json;
use wiremock::{
    matchers::{body_partial_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

#[tokio::test]
async fn dall_e_3_requests_standard_quality() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/images/generations"))
        .and(body_partial_json(json!({
            "model": "dall-e-3",
            "prompt": "a red bicycle",
            "n": 1,
            "size": "1024x1024",
            "quality": "standard"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(image_response("https://img.example/bike.png")))
        .expect(1)
        .mount(&server)
        .await;

    let result = router_for(&server)
        .route(&[Turn::user("a red bicycle")], &all_credentials(), "dall-e-3", &RequestOptions::default())
        .await
        .unwrap();
    assert_eq!(result, InvocationResult::image("https://img.example/bike.png"));
}

#[tokio::test]
async fn dall_e_2_is_small_and_has_no_quality() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/images/generations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(image_response("https://img.example/small.png")))
        .expect(1)
        .mount(&server)
        .await;

    router_for(&server)
        .route(&[Turn::user("a red bicycle")], &all_credentials(), "dall-e-2", &RequestOptions::default())
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = requests[0].body_json().unwrap();
    assert_eq!(body["size"], "512x512");
    assert_eq!(body["model"], "dall-e-2");
    assert!(body.get("quality").is_none());
}

#[tokio::test]
async fn only_the_last_turn_becomes_the_prompt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/images/generations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(image_response("https://img.example/2.png")))
        .mount(&server)
        .await;

    let conversation = [
        Turn::user("a cat"),
        Turn::assistant("https://img.example/1.png"),
        Turn::user("now make it orange"),
    ];
    router_for(&server)
        .route(&conversation, &all_credentials(), "dall-e-3", &RequestOptions::default())
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = requests[0].body_json().unwrap();
    assert_eq!(body["prompt"], "now make it orange");
}

#[tokio::test]
async fn image_response_without_url_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/images/generations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "created": 1, "data": [] })))
        .mount(&server)
        .await;

    let err = router_for(&server)
        .route(&[Turn::user("a cat")], &all_credentials(), "dall-e-3", &RequestOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedResponse);
}

#[tokio::test]
async fn ideogram_uses_api_key_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .and(header("Api-Key", IDEOGRAM_KEY))
        .and(body_partial_json(json!({
            "prompt": "a neon sign that says hello",
            "aspect_ratio": "ASPECT_1_1",
            "model": "V_2"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(image_response("https://ideogram.example/neon.png")))
        .expect(1)
        .mount(&server)
        .await;

    let result = router_for(&server)
        .route(
            &[Turn::user("a neon sign that says hello")],
            &all_credentials(),
            "ideogram-v2",
            &RequestOptions::default(),
        )
        .await
        .unwrap();
    assert_eq!(result, InvocationResult::image("https://ideogram.example/neon.png"));
}

#[tokio::test]
async fn ideogram_failure_reports_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({ "message": "prompt rejected" })))
        .mount(&server)
        .await;

    let err = router_for(&server)
        .route(&[Turn::user("x")], &all_credentials(), "ideogram-v2", &RequestOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RemoteError);
    assert_eq!(err.to_string(), "HTTP error 422: prompt rejected");
}
