use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use pagedeck_api::{AppStateInner, router};
use pagedeck_db::Database;
use pagedeck_db::models::{NewPage, NewPost};
use pagedeck_graph::fake::{FakeGraph, FakeScope};

fn app(graph: FakeGraph, db: Database, debug_routes: bool) -> Router {
    let state = Arc::new(AppStateInner::new(db, Arc::new(graph)));
    router(state, debug_routes)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Option<String>, Value) {
    let resp = app
        .clone()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let location = resp
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, location, body)
}

#[tokio::test]
async fn dashboard_totals_and_lists() {
    let db = Database::open_in_memory().unwrap();
    let page_ref = db
        .upsert_page(&NewPage { page_id: "1", name: "Corner Bakery", category: "Bakery", followers_count: 10 })
        .unwrap()
        .id;
    for (post_id, likes) in [("1_a", 1), ("1_b", 2), ("1_c", 3)] {
        db.upsert_post(
            page_ref,
            &NewPost {
                post_id,
                message: "",
                created_time: "2024-03-01T08:00:00Z",
                likes_count: likes,
                comments_count: 0,
                shares_count: 0,
            },
        )
        .unwrap();
    }

    let app = app(FakeGraph::new(), db, false);
    let (status, _, body) = get(&app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totals"]["total_likes"], 6);
    assert_eq!(body["totals"]["total_posts"], 3);
    assert_eq!(body["pages"].as_array().unwrap().len(), 1);
    assert_eq!(body["posts"][0]["page_name"], "Corner Bakery");
    assert_eq!(body["missing_permissions"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn sync_failure_redirects_with_error_flash() {
    let app = app(FakeGraph::new(), Database::open_in_memory().unwrap(), false);

    let (status, location, _) = get(&app, "/sync-data").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/"));

    let (_, _, body) = get(&app, "/").await;
    assert_eq!(body["flashes"][0]["level"], "error");
    assert_eq!(body["flashes"][0]["message"], "Failed to fetch pages from the API.");
    assert!(body["pages"].as_array().unwrap().is_empty());

    // Flashes are shown once
    let (_, _, again) = get(&app, "/").await;
    assert!(again["flashes"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn sync_success_reports_missing_permissions() {
    let graph = FakeGraph::new()
        .with_page_token("1", "tok")
        .route(
            "me/permissions",
            json!({ "data": [{ "permission": "pages_show_list", "status": "granted" }] }),
        )
        .route("me/accounts", json!({ "data": [{ "id": "1" }] }))
        .route("1", json!({ "id": "1", "name": "Corner Bakery" }));
    let app = app(graph, Database::open_in_memory().unwrap(), false);

    get(&app, "/sync-data").await;
    let (_, _, body) = get(&app, "/").await;

    let flashes = body["flashes"].as_array().unwrap();
    assert_eq!(flashes[0]["level"], "success");
    assert_eq!(flashes[0]["message"], "Synced 1 pages, 0 posts, 0 comments and 0 messages.");
    assert_eq!(flashes[1]["level"], "warning");
    assert!(flashes[1]["message"].as_str().unwrap().contains("pages_messaging"));
    assert_eq!(body["pages"][0]["name"], "Corner Bakery");
}

#[tokio::test]
async fn debug_routes_only_when_enabled() {
    let graph = || FakeGraph::new().route("me", json!({ "id": "9", "name": "Operator" }));

    let hidden = app(graph(), Database::open_in_memory().unwrap(), false);
    let (status, _, _) = get(&hidden, "/debug/api").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let shown = app(graph(), Database::open_in_memory().unwrap(), true);
    let (status, _, body) = get(&shown, "/debug/api").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["me"]["name"], "Operator");
    assert!(body["pages"].is_null());

    let (_, _, page) = get(&shown, "/debug/pages/42").await;
    assert_eq!(page["token_scope"], "user");
}

#[tokio::test]
async fn debug_page_reports_the_token_it_sent() {
    let graph = Arc::new(
        FakeGraph::new()
            .with_page_token("7", "page-tok")
            .route("7", json!({ "id": "7", "name": "Tokened" })),
    );
    let state = Arc::new(AppStateInner::new(
        Database::open_in_memory().unwrap(),
        graph.clone(),
    ));
    let app = router(state, true);

    let (_, _, with_token) = get(&app, "/debug/pages/7").await;
    assert_eq!(with_token["token_scope"], "page");
    assert_eq!(with_token["page_info"]["name"], "Tokened");

    let (_, _, without_token) = get(&app, "/debug/pages/42").await;
    assert_eq!(without_token["token_scope"], "user");

    let calls = graph.calls();
    let scopes = |prefix: &str| -> Vec<FakeScope> {
        calls
            .iter()
            .filter(|c| c.endpoint.starts_with(prefix))
            .map(|c| c.scope)
            .collect()
    };
    assert_eq!(scopes("7").len(), 4);
    assert!(scopes("7").iter().all(|s| *s == FakeScope::Page));
    assert_eq!(scopes("42").len(), 4);
    assert!(scopes("42").iter().all(|s| *s == FakeScope::User));
}

#[tokio::test]
async fn health_ok() {
    let app = app(FakeGraph::new(), Database::open_in_memory().unwrap(), false);
    let (status, _, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
