//! HTTP surface tests driven through the router with `oneshot`.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use loghive::adapters::http::{build_router, AppState, NAMESPACE_HEADER};
use loghive::adapters::sqlite::SqliteSampleRepository;
use loghive::domain::models::{Namespace, ServerDescriptor, SiteConfig};
use loghive::SampleRepository;

async fn app() -> (Arc<SqliteSampleRepository>, Router) {
    let repository = common::repository().await;
    let mut config = common::config();
    let mut servers = std::collections::BTreeMap::new();
    servers.insert("log_server".to_string(), ServerDescriptor { name: "Log Server".into() });
    let mut site = SiteConfig::default();
    site.sub_sites.insert("SubSite_1".to_string(), servers);
    config.sites.insert("Site_A".to_string(), site);

    let state = Arc::new(AppState::new(Arc::clone(&repository), &config));
    (repository, build_router(state, true))
}

fn report_request(namespace: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/report")
        .header("content-type", "application/json");
    if let Some(ns) = namespace {
        builder = builder.header(NAMESPACE_HEADER, ns);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, namespace: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(ns) = namespace {
        builder = builder.header(NAMESPACE_HEADER, ns);
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn valid_report(size_mb: Value) -> Value {
    json!({
        "token": common::TEST_TOKEN,
        "site": "Site_A",
        "sub_site": "SubSite_1",
        "server_type": "log_server",
        "path": "/data",
        "size_mb": size_mb
    })
}

#[tokio::test]
async fn health_returns_ok() {
    let (_, router) = app().await;
    let response = router.oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "OK");
}

#[tokio::test]
async fn report_is_recorded_in_resolved_namespace() {
    let (repository, router) = app().await;

    let response = router
        .clone()
        .oneshot(report_request(Some("test"), valid_report(json!(1024.5))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);

    let key = common::log_server();
    assert_eq!(repository.count(Namespace::Test, &key).await.unwrap(), 1);
    assert_eq!(repository.count(Namespace::Production, &key).await.unwrap(), 0);

    // No header falls back to the configured default.
    let response = router
        .oneshot(report_request(None, valid_report(json!("2048"))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(repository.count(Namespace::Production, &key).await.unwrap(), 1);
}

#[tokio::test]
async fn report_rejections_map_to_status_codes() {
    let (repository, router) = app().await;

    let mut bad_token = valid_report(json!(1));
    bad_token["token"] = json!("nope");
    let response = router.clone().oneshot(report_request(None, bad_token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "INVALID_TOKEN");

    let mut missing = valid_report(json!(1));
    missing.as_object_mut().unwrap().remove("server_type");
    let response = router.clone().oneshot(report_request(None, missing)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "MISSING_FIELD");
    assert!(body["error"].as_str().unwrap().contains("server_type"));

    let response = router
        .clone()
        .oneshot(report_request(None, valid_report(json!("lots"))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_VALUE");

    let response = router
        .clone()
        .oneshot(report_request(None, valid_report(json!(-5))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "DATA_ANOMALY");

    let response = router
        .clone()
        .oneshot(report_request(Some("staging"), valid_report(json!(1))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let malformed = Request::builder()
        .method("POST")
        .uri("/api/report")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = router.oneshot(malformed).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_JSON");

    assert!(repository.distinct_entities(Namespace::Production).await.unwrap().is_empty());
}

#[tokio::test]
async fn read_endpoints_return_derived_growth() {
    let (repository, router) = app().await;
    let key = common::log_server();
    let now = chrono::Utc::now();
    common::seed(
        &repository,
        Namespace::Production,
        &key,
        &[(100.0, now - chrono::Duration::seconds(2)), (130.0, now - chrono::Duration::seconds(1))],
    )
    .await;

    let response = router.clone().oneshot(get("/api/summary", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let summary = body_json(response).await;
    assert_eq!(summary.as_array().unwrap().len(), 1);
    assert_eq!(summary[0]["site"], "Site_A");
    assert_eq!(summary[0]["size_mb"], 130.0);

    let response = router
        .clone()
        .oneshot(get("/api/monthly/Site_A/SubSite_1/log_server", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let monthly = body_json(response).await;
    assert!(!monthly.as_array().unwrap().is_empty());

    let response = router
        .clone()
        .oneshot(get("/api/month-production/Site_A/SubSite_1/log_server", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let production = body_json(response).await;
    assert!(production.get("current_month").is_some());
    assert!(production.get("previous_month_growth").is_some());

    let response = router
        .clone()
        .oneshot(get("/api/history/Site_A/SubSite_1/log_server?days=7", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 2);

    let response = router
        .clone()
        .oneshot(get("/api/history/Site_A/SubSite_1/log_server?days=0", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Unknown entity: zeros and empty lists, never an error.
    let response = router
        .oneshot(get("/api/month-production/Nope/Nope/nope", Some("test")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["current_month_growth"], 0.0);
    assert_eq!(body["previous_month_growth"], 0.0);
}

#[tokio::test]
async fn sites_returns_configured_tree() {
    let (_, router) = app().await;
    let response = router.oneshot(get("/api/sites", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["Site_A"]["sub_sites"]["SubSite_1"]["log_server"]["name"], "Log Server");
}

#[tokio::test]
async fn demo_seed_is_test_namespace_only() {
    let (repository, router) = app().await;

    let forbidden = Request::builder()
        .method("POST")
        .uri("/api/demo/seed")
        .header(NAMESPACE_HEADER, "production")
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(forbidden).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(repository.distinct_entities(Namespace::Production).await.unwrap().is_empty());

    let allowed = Request::builder()
        .method("POST")
        .uri("/api/demo/seed")
        .header(NAMESPACE_HEADER, "test")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(allowed).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    // One configured entity, 61 daily samples.
    assert_eq!(body["rows"], 61);
    assert_eq!(body["namespace"], "test");
    assert_eq!(
        repository.count(Namespace::Test, &common::log_server()).await.unwrap(),
        61
    );
}

#[tokio::test]
async fn metrics_count_accepted_reports() {
    let (_, router) = app().await;

    for _ in 0..3 {
        let response = router
            .clone()
            .oneshot(report_request(None, valid_report(json!(10))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = router.oneshot(get("/metrics", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let text = body_text(response).await;
    assert!(text.contains("# TYPE loghive_agent_reports_total counter"));
    assert!(text.contains(
        "loghive_agent_reports_total{site=\"Site_A\",sub_site=\"SubSite_1\",server_type=\"log_server\"} 3"
    ));
}

#[tokio::test]
async fn history_with_huge_day_count_is_rejected() {
    let (_, router) = app().await;

    for days in [i64::MAX.to_string(), "9999999999999".to_string()] {
        let uri = format!("/api/history/Site_A/SubSite_1/log_server?days={days}");
        let response = router.clone().oneshot(get(&uri, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "days={days}");
        assert_eq!(body_json(response).await["code"], "INVALID_VALUE");
    }
}

#[tokio::test]
async fn bad_token_wins_over_every_other_problem() {
    let (repository, router) = app().await;

    // Wrongly typed fields would fail to decode, but the token is checked first.
    let mut mistyped = valid_report(json!(1));
    mistyped["token"] = json!("wrong");
    mistyped["site"] = json!(123);
    let response = router.clone().oneshot(report_request(None, mistyped)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "INVALID_TOKEN");

    // An unknown namespace is not reported to an unauthenticated caller.
    let mut wrong_token = valid_report(json!(1));
    wrong_token["token"] = json!("wrong");
    let response = router
        .clone()
        .oneshot(report_request(Some("staging"), wrong_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "INVALID_TOKEN");

    let mut no_token = valid_report(json!(1));
    no_token.as_object_mut().unwrap().remove("token");
    let response = router.clone().oneshot(report_request(None, no_token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // With a valid token, mistyped fields are a decode error.
    let mut mistyped = valid_report(json!(1));
    mistyped["site"] = json!(123);
    let response = router.oneshot(report_request(None, mistyped)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_JSON");

    assert!(repository.distinct_entities(Namespace::Production).await.unwrap().is_empty());
}
