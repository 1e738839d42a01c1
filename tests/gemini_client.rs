//! Gemini client against a mock generateContent endpoint.

use std::sync::Arc;
use std::time::Duration;

use astra_lib::catalog::Catalog;
use astra_lib::error::InsightError;
use astra_lib::insights::{GeminiClient, InsightGateway, InsightProvider, InsightRequest};
use astra_lib::types::InsightResult;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL: &str = "gemini-test";
const ENDPOINT: &str = "/v1beta/models/gemini-test:generateContent";

fn client_for(server: &MockServer, timeout: Duration) -> GeminiClient {
    GeminiClient::new("test-key", MODEL, &format!("{}/v1beta", server.uri()), timeout).unwrap()
}

fn candidate_text(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

fn request() -> InsightRequest {
    InsightRequest::for_projects(Catalog::builtin().projects())
}

#[tokio::test]
async fn test_generate_sends_prompt_and_schema() {
    let server = MockServer::start().await;
    let answer = r#"{"executiveSummary":"Two launches on track.","riskAlerts":["SI-02 budget not yet committed"],"financialHealth":"Healthy"}"#;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "generationConfig": { "responseMimeType": "application/json" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_text(answer)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Duration::from_secs(5));
    let result = client.generate(&request()).await.unwrap();
    assert_eq!(
        result,
        InsightResult {
            executive_summary: "Two launches on track.".to_string(),
            risk_alerts: vec!["SI-02 budget not yet committed".to_string()],
            financial_health: "Healthy".to_string(),
        }
    );

    let received = &server.received_requests().await.unwrap()[0];
    let body: serde_json::Value = serde_json::from_slice(&received.body).unwrap();
    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.starts_with("Analyze these space agency projects"));
    assert!(prompt.contains("Nebula-X Heavy Lift"));
    assert_eq!(
        body["generationConfig"]["responseJsonSchema"]["type"],
        json!("object")
    );
}

#[tokio::test]
async fn test_server_error_maps_to_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "error": { "code": 503, "message": "The model is overloaded.", "status": "UNAVAILABLE" }
        })))
        .mount(&server)
        .await;

    let err = client_for(&server, Duration::from_secs(5))
        .generate(&request())
        .await
        .unwrap_err();
    match err {
        InsightError::Api { status, ref message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "The model is overloaded. (UNAVAILABLE)");
        }
        ref other => panic!("unexpected error: {:?}", other),
    }
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_missing_field_is_schema_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_text(
            r#"{"executiveSummary":"Partial","financialHealth":"Unknown"}"#,
        )))
        .mount(&server)
        .await;

    let err = client_for(&server, Duration::from_secs(5))
        .generate(&request())
        .await
        .unwrap_err();
    assert!(matches!(err, InsightError::Schema(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_non_json_text_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(candidate_text("Everything looks fine!")),
        )
        .mount(&server)
        .await;

    let err = client_for(&server, Duration::from_secs(5))
        .generate(&request())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "malformed");
}

#[tokio::test]
async fn test_no_candidates_is_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        })))
        .mount(&server)
        .await;

    let err = client_for(&server, Duration::from_secs(5))
        .generate(&request())
        .await
        .unwrap_err();
    assert!(matches!(err, InsightError::EmptyResponse));
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(candidate_text("{}"))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let err = client_for(&server, Duration::from_millis(300))
        .generate(&request())
        .await
        .unwrap_err();
    assert!(matches!(err, InsightError::Timeout(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_gateway_falls_back_on_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&server)
        .await;

    let client = client_for(&server, Duration::from_secs(5));
    let gateway = InsightGateway::new(Arc::new(client), Duration::from_secs(5));
    let result = gateway.project_insights(Catalog::builtin().projects()).await;
    assert_eq!(result, InsightResult::fallback());
}

#[tokio::test]
async fn test_gateway_handles_empty_project_list() {
    let server = MockServer::start().await;
    let answer = r#"{"executiveSummary":"No projects in view.","riskAlerts":[],"financialHealth":"N/A"}"#;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_text(answer)))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = InsightGateway::new(
        Arc::new(client_for(&server, Duration::from_secs(5))),
        Duration::from_secs(5),
    );
    let result = gateway.project_insights(&[]).await;
    assert_eq!(result.executive_summary, "No projects in view.");
    assert!(result.risk_alerts.is_empty());

    let received = &server.received_requests().await.unwrap()[0];
    let body: serde_json::Value = serde_json::from_slice(&received.body).unwrap();
    assert!(body["contents"][0]["parts"][0]["text"]
        .as_str()
        .unwrap()
        .ends_with(": []"));
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let client = GeminiClient::new(
        "test-key",
        MODEL,
        "http://127.0.0.1:1/v1beta",
        Duration::from_secs(2),
    )
    .unwrap();
    let err = client.generate(&request()).await.unwrap_err();
    assert!(matches!(err, InsightError::Network(_)), "got {:?}", err);
    assert_eq!(err.kind(), "transport");
}
