//! Integration tests for [`CatalogApi`] against an in-process HTTP server.
//!
//! Each test binds an axum router on an ephemeral port that serves canned
//! catalog payloads and records what the client sent.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use assert_matches::assert_matches;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use marquee_catalog::{CatalogApi, CatalogError, MovieCatalog, FALLBACK_UPSTREAM_MESSAGE};

/// What the fake catalog saw for one request.
#[derive(Debug, Clone)]
struct Seen {
    path: &'static str,
    params: HashMap<String, String>,
    authorization: Option<String>,
    accept: Option<String>,
}

type Log = Arc<Mutex<Vec<Seen>>>;

fn record(log: &Log, path: &'static str, params: HashMap<String, String>, headers: &HeaderMap) {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
    };
    log.lock().unwrap().push(Seen {
        path,
        params,
        authorization: header("authorization"),
        accept: header("accept"),
    });
}

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// A catalog that answers both listings with fixed movies.
async fn healthy_catalog() -> (String, Log) {
    let log: Log = Arc::default();

    async fn search(
        State(log): State<Log>,
        Query(params): Query<HashMap<String, String>>,
        headers: HeaderMap,
    ) -> Json<serde_json::Value> {
        record(&log, "/search/movie", params, &headers);
        Json(json!({
            "page": 1,
            "results": [
                {"id": 1, "title": "Batman", "poster_path": "/batman.jpg", "vote_average": 7.2,
                 "release_date": "1989-06-23", "original_language": "en", "adult": false},
                {"id": 2, "title": "Batman Returns", "poster_path": null}
            ],
            "total_pages": 1,
            "total_results": 2
        }))
    }

    async fn discover(
        State(log): State<Log>,
        Query(params): Query<HashMap<String, String>>,
        headers: HeaderMap,
    ) -> Json<serde_json::Value> {
        record(&log, "/discover/movie", params, &headers);
        Json(json!({"page": 1, "results": [{"id": 99, "title": "Popular"}]}))
    }

    let router = Router::new()
        .route("/search/movie", get(search))
        .route("/discover/movie", get(discover))
        .with_state(log.clone());

    (serve(router).await, log)
}

async fn catalog_returning(status: StatusCode, body: serde_json::Value) -> String {
    let router = Router::new().route(
        "/search/movie",
        get(move || {
            let body = body.clone();
            async move { (status, Json(body)).into_response() }
        }),
    );
    serve(router).await
}

// ---------------------------------------------------------------------------
// Test: endpoint selection and headers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_query_hits_search_endpoint_with_bearer_token() {
    let (base, log) = healthy_catalog().await;
    let api = CatalogApi::new(base, "secret-key");

    let movies = api.fetch_movies("batman & robin").await.unwrap();

    assert_eq!(movies.len(), 2);
    assert_eq!(movies[0].id, 1);
    assert_eq!(movies[0].poster_path.as_deref(), Some("/batman.jpg"));
    assert_eq!(movies[1].poster_path, None);

    let seen = log.lock().unwrap().clone();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].path, "/search/movie");
    assert_eq!(seen[0].params.get("query").map(String::as_str), Some("batman & robin"));
    assert_eq!(seen[0].authorization.as_deref(), Some("Bearer secret-key"));
    assert_eq!(seen[0].accept.as_deref(), Some("application/json"));
}

#[tokio::test]
async fn empty_query_hits_discover_endpoint() {
    let (base, log) = healthy_catalog().await;
    let api = CatalogApi::new(base, "k");

    let movies = api.fetch_movies("").await.unwrap();

    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0].title, "Popular");
    let seen = log.lock().unwrap().clone();
    assert_eq!(seen[0].path, "/discover/movie");
    assert_eq!(
        seen[0].params.get("sort_by").map(String::as_str),
        Some("popularity.desc")
    );
}

// ---------------------------------------------------------------------------
// Test: result shapes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_results_are_success() {
    let base = catalog_returning(StatusCode::OK, json!({"page": 1, "results": []})).await;
    let movies = CatalogApi::new(base, "k").fetch_movies("zzzz").await.unwrap();
    assert!(movies.is_empty());
}

#[tokio::test]
async fn missing_results_are_treated_as_empty() {
    let base = catalog_returning(StatusCode::OK, json!({"page": 1})).await;
    let movies = CatalogApi::new(base, "k").fetch_movies("zzzz").await.unwrap();
    assert!(movies.is_empty());
}

// ---------------------------------------------------------------------------
// Test: failure classification
// ---------------------------------------------------------------------------

#[tokio::test]
async fn payload_failure_flag_is_upstream_error_with_provider_message() {
    let base = catalog_returning(
        StatusCode::OK,
        json!({"success": false, "status_code": 7, "status_message": "Invalid API key"}),
    )
    .await;

    let err = CatalogApi::new(base, "k").fetch_movies("batman").await.unwrap_err();

    assert!(!err.is_transport());
    assert_matches!(err, CatalogError::Upstream { message } if message == "Invalid API key");
}

#[tokio::test]
async fn payload_failure_without_message_uses_fallback() {
    let base = catalog_returning(StatusCode::OK, json!({"Response": false})).await;

    let err = CatalogApi::new(base, "k").fetch_movies("batman").await.unwrap_err();

    assert_matches!(err, CatalogError::Upstream { message } if message == FALLBACK_UPSTREAM_MESSAGE);
}

#[tokio::test]
async fn payload_with_both_failure_flags_is_upstream_error() {
    let base = catalog_returning(
        StatusCode::OK,
        json!({"success": false, "Response": false, "error": "Too many requests"}),
    )
    .await;

    let err = CatalogApi::new(base, "k").fetch_movies("batman").await.unwrap_err();

    assert!(!err.is_transport());
    assert_matches!(err, CatalogError::Upstream { message } if message == "Too many requests");
}

#[tokio::test]
async fn non_success_status_is_transport_error() {
    let base = catalog_returning(
        StatusCode::UNAUTHORIZED,
        json!({"success": false, "status_message": "Invalid API key"}),
    )
    .await;

    let err = CatalogApi::new(base, "k").fetch_movies("batman").await.unwrap_err();

    assert!(err.is_transport());
    assert_matches!(err, CatalogError::Status { status: 401, body } if body.contains("Invalid API key"));
}

#[tokio::test]
async fn unreachable_catalog_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = CatalogApi::new(format!("http://{addr}"), "k")
        .fetch_movies("batman")
        .await
        .unwrap_err();

    assert!(err.is_transport());
    assert_matches!(err, CatalogError::Request(_));
}

#[tokio::test]
async fn malformed_body_is_transport_error() {
    let router = Router::new().route("/search/movie", get(|| async { "<html>oops</html>" }));
    let base = serve(router).await;

    let err = CatalogApi::new(base, "k").fetch_movies("batman").await.unwrap_err();

    assert_matches!(err, CatalogError::Request(_));
}
