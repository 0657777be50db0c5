//! Pull pages, posts, comments and messages from the graph API into the store.
//!
//! The run walks pages one at a time and upserts as it goes. It is not
//! transactional: rows written before a failure stay written.

pub mod authors;
pub mod summary;
pub mod timestamps;

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info, warn};

use pagedeck_db::Database;
use pagedeck_db::models::{NewComment, NewMessage, NewPage, NewPost};
use pagedeck_graph::{GraphApi, TokenScope};
use pagedeck_graph::comments::fetch_comments;
use pagedeck_graph::permissions::permission_report;
use pagedeck_types::graph::{
    AccountEntry, CommentPayload, ConversationPayload, MessagePayload, PageDetail, PostPayload,
    parse_items, parse_listing,
};

use crate::authors::resolve_comment_author;
use crate::timestamps::stored_time;

pub use crate::summary::SyncSummary;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to fetch pages from the API")]
    PageListing,

    #[error("database error: {0}")]
    Database(#[from] anyhow::Error),

    #[error("store worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Run a full sync.
///
/// Only a failed page listing or a database error ends the run early; any
/// other missing resource is skipped and its siblings continue.
pub async fn run(api: &dyn GraphApi, db: &Arc<Database>) -> Result<SyncSummary, SyncError> {
    info!("Starting sync");
    let mut summary = SyncSummary::default();

    let permissions = permission_report(api).await;
    summary.missing_permissions = permissions.missing_names();
    summary.granted_permissions = permissions.granted_names();
    info!(
        "Permissions granted: {:?}, missing: {:?}",
        summary.granted_permissions, summary.missing_permissions
    );

    let pages = api
        .pages()
        .await
        .and_then(|body| parse_listing::<AccountEntry>(&body))
        .ok_or(SyncError::PageListing)?;
    if pages.malformed > 0 {
        warn!("Ignoring {} malformed page entries", pages.malformed);
    }

    for account in &pages.items {
        info!("Processing page {}", account.id);

        let Some(token) = api.page_token(&account.id).await else {
            warn!("No page token for {}, skipping", account.id);
            summary.pages_skipped += 1;
            continue;
        };

        let detail = match api.page_info(&account.id, TokenScope::Page(&token)).await {
            Some(body) => match serde_json::from_value::<PageDetail>(body) {
                Ok(detail) => detail,
                Err(e) => {
                    warn!("Malformed details for page {}: {}", account.id, e);
                    summary.pages_skipped += 1;
                    continue;
                }
            },
            None => {
                warn!("No details for page {}, skipping", account.id);
                summary.pages_skipped += 1;
                continue;
            }
        };

        let name = match detail.name() {
            "" => account.name.clone().unwrap_or_default(),
            name => name.to_string(),
        };
        let page_id = account.id.clone();
        let page_ref = write(db, move |db| {
            db.upsert_page(&NewPage {
                page_id: &page_id,
                name: &name,
                category: detail.category(),
                followers_count: detail.follower_count(),
            })
        })
        .await?
        .id;
        summary.pages_processed += 1;

        sync_posts(api, db, &account.id, page_ref, &token, &mut summary).await?;
        sync_messages(api, db, &account.id, page_ref, &token, &mut summary).await?;
    }

    info!(
        "Sync finished: {} pages ({} skipped), {} posts, {} comments, {} messages",
        summary.pages_processed,
        summary.pages_skipped,
        summary.posts_processed,
        summary.comments_processed,
        summary.messages_processed
    );
    Ok(summary)
}

async fn sync_posts(
    api: &dyn GraphApi,
    db: &Arc<Database>,
    page_id: &str,
    page_ref: i64,
    token: &str,
    summary: &mut SyncSummary,
) -> Result<(), SyncError> {
    let Some(posts) = api
        .page_posts(page_id, token)
        .await
        .and_then(|body| parse_listing::<PostPayload>(&body))
    else {
        warn!("No posts available for page {}", page_id);
        return Ok(());
    };
    if posts.malformed > 0 {
        warn!("Ignoring {} malformed posts on page {}", posts.malformed, page_id);
    }

    for post in &posts.items {
        let created_time = stored_time(post.created_time.as_deref(), Utc::now());
        let comments_count = post.comments_count();

        let payload = post.clone();
        let post_ref = write(db, move |db| {
            db.upsert_post(
                page_ref,
                &NewPost {
                    post_id: &payload.id,
                    message: payload.text(),
                    created_time: &created_time,
                    likes_count: payload.final_like_count(),
                    comments_count,
                    shares_count: payload.shares_count(),
                },
            )
        })
        .await?
        .id;
        summary.posts_processed += 1;

        if comments_count > 0 {
            sync_comments(api, db, &post.id, post_ref, token, summary).await?;
        }
    }
    Ok(())
}

async fn sync_comments(
    api: &dyn GraphApi,
    db: &Arc<Database>,
    post_id: &str,
    post_ref: i64,
    token: &str,
    summary: &mut SyncSummary,
) -> Result<(), SyncError> {
    let Some(fetched) = fetch_comments(api, post_id, token).await else {
        warn!("No comment strategy returned data for post {}", post_id);
        return Ok(());
    };
    debug!(
        "Post {}: {} comments via {:?}",
        post_id,
        fetched.items.len(),
        fetched.strategy
    );

    let comments = parse_items::<CommentPayload>(&fetched.items);
    if comments.malformed > 0 {
        warn!("Ignoring {} malformed comments on post {}", comments.malformed, post_id);
    }

    for comment in &comments.items {
        let author = resolve_comment_author(comment);
        if author.placeholder {
            debug!("Comment {} stored as {}", comment.id, author.name);
            summary.placeholder_authors += 1;
        }
        let created_time = stored_time(comment.created_time.as_deref(), Utc::now());

        let payload = comment.clone();
        write(db, move |db| {
            db.upsert_comment(
                post_ref,
                &NewComment {
                    comment_id: &payload.id,
                    message: payload.text(),
                    from_name: &author.name,
                    from_id: &author.id,
                    from_placeholder: author.placeholder,
                    created_time: &created_time,
                },
            )
        })
        .await?;
        summary.comments_processed += 1;
    }
    Ok(())
}

async fn sync_messages(
    api: &dyn GraphApi,
    db: &Arc<Database>,
    page_id: &str,
    page_ref: i64,
    token: &str,
    summary: &mut SyncSummary,
) -> Result<(), SyncError> {
    let Some(conversations) = api
        .page_conversations(page_id, token)
        .await
        .and_then(|body| parse_listing::<ConversationPayload>(&body))
    else {
        warn!("No conversations available for page {}", page_id);
        return Ok(());
    };

    for conversation in &conversations.items {
        summary.conversations_processed += 1;

        let Some(messages) = api
            .conversation_messages(&conversation.id, token)
            .await
            .and_then(|body| parse_listing::<MessagePayload>(&body))
        else {
            warn!("No messages available for conversation {}", conversation.id);
            continue;
        };
        if messages.malformed > 0 {
            warn!(
                "Ignoring {} malformed messages in conversation {}",
                messages.malformed, conversation.id
            );
        }

        for message in &messages.items {
            let text = message.text();
            let created_time = stored_time(message.created_time.as_deref(), Utc::now());

            let payload = message.clone();
            write(db, move |db| {
                db.upsert_message(
                    page_ref,
                    &NewMessage {
                        message_id: &payload.id,
                        from_name: payload.sender_name(),
                        from_id: payload.sender_id(),
                        message: &text,
                        created_time: &created_time,
                    },
                )
            })
            .await?;
            summary.messages_processed += 1;
        }
    }
    Ok(())
}

/// Run one store call on the blocking pool, off the async workers.
async fn write<T, F>(db: &Arc<Database>, f: F) -> Result<T, SyncError>
where
    F: FnOnce(&Database) -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let db = Arc::clone(db);
    let result = tokio::task::spawn_blocking(move || f(&db)).await?;
    Ok(result?)
}
