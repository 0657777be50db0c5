use axum::{Json, extract::State};
use tracing::error;

use pagedeck_db::Database;
use pagedeck_db::models::{CommentRow, MessageRow, PageRow, PostRow};
use pagedeck_graph::permissions::permission_report;
use pagedeck_types::api::{
    CommentView, DashboardResponse, DashboardTotals, MessageView, PageView, PostView,
};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

const POSTS_LIMIT: u32 = 20;
const COMMENTS_LIMIT: u32 = 50;
const MESSAGES_LIMIT: u32 = 50;

const RECENT_POSTS: u32 = 5;
const RECENT_COMMENTS: u32 = 10;
const RECENT_MESSAGES: u32 = 10;

struct Snapshot {
    pages: Vec<PageRow>,
    posts: Vec<PostRow>,
    comments: Vec<CommentRow>,
    messages: Vec<MessageRow>,
    recent_posts: Vec<PostRow>,
    recent_comments: Vec<CommentRow>,
    recent_messages: Vec<MessageRow>,
    totals: DashboardTotals,
}

fn load_snapshot(db: &Database) -> anyhow::Result<Snapshot> {
    Ok(Snapshot {
        pages: db.list_pages()?,
        posts: db.recent_posts(POSTS_LIMIT)?,
        comments: db.recent_comments(COMMENTS_LIMIT)?,
        messages: db.recent_messages(MESSAGES_LIMIT)?,
        recent_posts: db.recent_posts(RECENT_POSTS)?,
        recent_comments: db.recent_comments(RECENT_COMMENTS)?,
        recent_messages: db.recent_messages(RECENT_MESSAGES)?,
        totals: db.totals()?,
    })
}

/// GET /: everything stored, plus live permission status and pending flashes.
pub async fn dashboard(State(state): State<AppState>) -> ApiResult<Json<DashboardResponse>> {
    // Run blocking DB reads off the async runtime
    let db_state = state.clone();
    let snapshot = tokio::task::spawn_blocking(move || load_snapshot(&db_state.db))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal(e.to_string())
        })??;

    let permissions = permission_report(state.graph.as_ref()).await;

    Ok(Json(DashboardResponse {
        flashes: state.flashes.drain(),
        pages: snapshot.pages.into_iter().map(page_view).collect(),
        posts: snapshot.posts.into_iter().map(post_view).collect(),
        comments: snapshot.comments.into_iter().map(comment_view).collect(),
        messages: snapshot.messages.into_iter().map(message_view).collect(),
        totals: snapshot.totals,
        recent_posts: snapshot.recent_posts.into_iter().map(post_view).collect(),
        recent_comments: snapshot.recent_comments.into_iter().map(comment_view).collect(),
        recent_messages: snapshot.recent_messages.into_iter().map(message_view).collect(),
        missing_permissions: permissions.missing,
        granted_permissions: permissions.granted,
    }))
}

fn page_view(row: PageRow) -> PageView {
    PageView {
        page_id: row.page_id,
        name: row.name,
        category: row.category,
        followers_count: row.followers_count,
        created_at: row.created_at,
    }
}

fn post_view(row: PostRow) -> PostView {
    PostView {
        post_id: row.post_id,
        page_name: row.page_name,
        message: row.message,
        created_time: row.created_time,
        likes_count: row.likes_count,
        comments_count: row.comments_count,
        shares_count: row.shares_count,
    }
}

fn comment_view(row: CommentRow) -> CommentView {
    CommentView {
        comment_id: row.comment_id,
        post_id: row.post_id,
        message: row.message,
        from_name: row.from_name,
        from_id: row.from_id,
        created_time: row.created_time,
    }
}

fn message_view(row: MessageRow) -> MessageView {
    MessageView {
        message_id: row.message_id,
        page_name: row.page_name,
        from_name: row.from_name,
        from_id: row.from_id,
        message: row.message,
        created_time: row.created_time,
    }
}
