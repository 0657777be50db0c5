use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};
use tracing::warn;

use pagedeck_graph::TokenScope;

use crate::state::AppState;

/// GET /debug/api: raw introspection responses for troubleshooting tokens.
pub async fn debug_api(State(state): State<AppState>) -> Json<Value> {
    let api = state.graph.as_ref();

    Json(json!({
        "token_debug": api.debug_token().await,
        "permissions": api.permissions().await,
        "pages": api.pages().await,
        "me": api.me().await,
    }))
}

/// GET /debug/pages/{page_id}: raw page responses, with the page token when
/// one can be obtained.
pub async fn debug_page(
    State(state): State<AppState>,
    Path(page_id): Path<String>,
) -> Json<Value> {
    let api = state.graph.as_ref();

    let page_token = api.page_token(&page_id).await;
    let scope = match page_token.as_deref() {
        Some(token) => TokenScope::Page(token),
        None => {
            warn!("No page token for {}, debugging with the user token", page_id);
            TokenScope::User
        }
    };
    let token_scope = match scope {
        TokenScope::Page(_) => "page",
        TokenScope::User => "user",
    };

    Json(json!({
        "token_scope": token_scope,
        "page_info": api.page_info(&page_id, scope).await,
        "posts": api.page_posts_simple(&page_id, scope).await,
        "feed": api.page_feed(&page_id, scope).await,
        "insights": api.page_insights(&page_id, scope).await,
    }))
}
