use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::Request;
use salescopy_core::{ProviderKeys, ProviderKind};
use salescopy_llm::{ApiKey, Prompt, Provider, ProviderError, ProviderRegistry};
use salescopy_pipeline::ReaderClient;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

struct Canned(ProviderKind, &'static str);

#[async_trait]
impl Provider for Canned {
    fn kind(&self) -> ProviderKind {
        self.0
    }

    async fn generate(&self, _prompt: &Prompt, _key: &ApiKey) -> Result<String, ProviderError> {
        Ok(self.1.to_string())
    }
}

struct TimesOut;

#[async_trait]
impl Provider for TimesOut {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    async fn generate(&self, _prompt: &Prompt, _key: &ApiKey) -> Result<String, ProviderError> {
        Err(ProviderError::Timeout {
            provider: ProviderKind::Gemini,
            timeout_secs: 60,
        })
    }
}

const PRODUCT_JSON: &str = r#"{"name":"Widget","summary":"Great widget","features":["f1"],"benefits":["b1"],"use_cases":["u1"],"target_audience":"everyone"}"#;

fn app_with(answer: &'static str, reader_base: &str) -> Router {
    let registry = ProviderRegistry::new(ProviderKeys {
        openai: Some("sk-test".to_string()),
        gemini: Some("g-test".to_string()),
        grok: None,
    })
    .with_provider(Arc::new(Canned(ProviderKind::OpenAi, answer)))
    .with_provider(Arc::new(TimesOut));
    let reader = ReaderClient::new(reader_base, 5, 10_000).unwrap();
    build_app(
        AppState {
            pipeline: Pipeline::new(registry, reader),
        },
        RateLimitState::per_minute(100),
    )
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_of(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn health_returns_ok_with_meta() {
    let response = app_with("{}", "http://127.0.0.1:9")
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .header(REQUEST_ID_HEADER, "req-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_of(response).await;
    assert_eq!(json["data"]["status"], "ok");
    assert_eq!(json["meta"]["request_id"], "req-1");
}

#[tokio::test]
async fn analyze_returns_product_info() {
    let reader = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/https://example.com/product"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/plain")
                .set_body_string("Widget page"),
        )
        .mount(&reader)
        .await;

    let response = app_with(PRODUCT_JSON, &reader.uri())
        .oneshot(post_json(
            "/api/v1/analyze",
            &json!({ "url": "https://example.com/product", "model": "openai" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_of(response).await;
    assert_eq!(json["productInfo"]["name"], "Widget");
    assert_eq!(json["productInfo"]["features"], json!(["f1"]));
}

#[tokio::test]
async fn missing_field_is_a_validation_error() {
    let response = app_with("{}", "http://127.0.0.1:9")
        .oneshot(post_json("/api/v1/angles", &json!({ "model": "openai" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_of(response).await;
    assert_eq!(json["error"]["code"], "validation_error");
    assert_eq!(json["error"]["message"], "productInfo is required");
    assert!(json["meta"]["request_id"].is_string());
}

#[tokio::test]
async fn malformed_body_is_a_validation_error() {
    let response = app_with("{}", "http://127.0.0.1:9")
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/copy")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_of(response).await;
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn unknown_backend_is_rejected_explicitly() {
    let response = app_with("{}", "http://127.0.0.1:9")
        .oneshot(post_json(
            "/api/v1/angles",
            &serde_json::from_str::<Value>(&format!(
                r#"{{"model":"claude","productInfo":{PRODUCT_JSON}}}"#
            ))
            .unwrap(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_of(response).await;
    assert_eq!(json["error"]["code"], "unsupported_provider");
    assert!(json.get("angles").is_none());
}

#[tokio::test]
async fn malformed_model_output_is_a_stage_failure() {
    let response = app_with("not json at all", "http://127.0.0.1:9")
        .oneshot(post_json(
            "/api/v1/advice",
            &json!({
                "model": "openai",
                "records": [{ "platform": "Meta", "spend": 10 }]
            }),
        ))
        .await
        .unwrap();
    // advice is prose, so the raw text is a valid answer
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_of(response).await["advice"], "not json at all");

    let response = app_with("not json at all", "http://127.0.0.1:9")
        .oneshot(post_json(
            "/api/v1/adapt",
            &json!({
                "model": "openai",
                "salesChannel": "email",
                "copy": {
                    "description": "d", "main_focus": "m", "problems": [],
                    "ideal_client": "i", "target_client": "t"
                }
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = json_of(response).await;
    assert_eq!(json["error"]["code"], "stage_failed");
    assert!(json.get("adapted").is_none());
}

#[tokio::test]
async fn provider_timeout_maps_to_gateway_timeout() {
    let body: Value = serde_json::from_str(&format!(
        r#"{{"model":"gemini","productInfo":{PRODUCT_JSON}}}"#
    ))
    .unwrap();
    let response = app_with("{}", "http://127.0.0.1:9")
        .oneshot(post_json("/api/v1/angles", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(json_of(response).await["error"]["code"], "upstream_timeout");
}

#[tokio::test]
async fn overflowing_advice_totals_get_the_error_envelope() {
    let big = json!({ "platform": "Meta", "spend": "79228162514264337593543950335" });
    let response = app_with("ok", "http://127.0.0.1:9")
        .oneshot(post_json(
            "/api/v1/advice",
            &json!({ "model": "openai", "records": [big.clone(), big] }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_of(response).await;
    assert_eq!(json["error"]["code"], "validation_error");
    assert!(json.get("advice").is_none());
}

#[test]
fn rate_limited_maps_to_too_many_requests() {
    let response = ApiError::new("req-1", "rate_limited", "slow down").into_response();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}
